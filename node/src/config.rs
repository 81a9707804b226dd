use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// The factomd v2 API endpoint.
    #[serde(default = "default_url")]
    pub url: String,
    /// Upper bound on a single RPC round-trip, in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout: u64,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            url: default_url(),
            request_timeout: default_request_timeout(),
        }
    }
}

fn default_url() -> String {
    // The Factom Open Node.
    "https://api.factomd.net/v2".to_string()
}

fn default_request_timeout() -> u64 {
    30
}
