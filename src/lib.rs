mod archive;
mod cli;
mod error;
mod logger;

pub use self::{
    archive::ArchiveSystem,
    cli::{ArchiveCli, ArchiveConfig},
    error::ArchiveError,
    logger::{ConsoleLoggerConfig, FileLoggerConfig, LoggerConfig},
};
