use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PostgresConfig {
    // connection options (parsed into PgConnectOptions)
    pub uri: String,
    // connection pool options
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Seconds to wait for a new connection before giving up.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
    /// Seconds an idle connection may linger in the pool.
    #[serde(default)]
    pub idle_timeout: Option<u64>,
    /// Seconds before a pooled connection is recycled.
    #[serde(default)]
    pub max_lifetime: Option<u64>,
    #[serde(default)]
    pub disable_statement_logging: bool,
}

impl PostgresConfig {
    pub fn uri(&self) -> &str {
        &self.uri
    }
}

fn default_min_connections() -> u32 {
    1
}

fn default_max_connections() -> u32 {
    4
}

fn default_connect_timeout() -> u64 {
    30
}
