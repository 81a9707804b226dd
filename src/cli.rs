use std::{fs, path::PathBuf};

use serde::{Deserialize, Serialize};
use structopt::StructOpt;

use fblock_node::NodeConfig;
use fblock_postgres::PostgresConfig;
use fblock_scanner::ScannerConfig;

use crate::{error::ArchiveError, logger::LoggerConfig};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArchiveConfig {
    #[serde(default)]
    pub logger: LoggerConfig,
    #[serde(default)]
    pub node: NodeConfig,
    pub postgres: PostgresConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
}

#[derive(Clone, Debug, StructOpt)]
#[structopt(author, about)]
pub struct ArchiveCli {
    /// Specifies the config file.
    #[structopt(short = "c", long, name = "FILE")]
    config: PathBuf,
}

impl ArchiveCli {
    pub fn init() -> Result<ArchiveConfig, ArchiveError> {
        let cli: Self = ArchiveCli::from_args();
        let toml_str = fs::read_to_string(cli.config.as_path())?;
        let config = toml::from_str::<ArchiveConfig>(toml_str.as_str())?;
        // initialize the logger
        config.logger.clone().init()?;
        Ok(config)
    }
}
