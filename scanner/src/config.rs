use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Override the resume height. When unset the scanner continues from
    /// `MAX(height) + 1`, or 0 for an empty store.
    #[serde(default)]
    pub start_height: Option<u32>,
    /// Stop after ingesting this height instead of tracking the chain tip
    /// forever.
    #[serde(default)]
    pub stop_height: Option<u32>,
    /// Wait between polls of a height the chain has not produced yet.
    /// Defaults to one Factom block interval.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// How many times a failed fetch is retried before the run faults.
    #[serde(default = "default_retry_limit")]
    pub retry_limit: u32,
    /// Base delay of the capped exponential backoff between fetch retries.
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            start_height: None,
            stop_height: None,
            poll_interval_ms: default_poll_interval_ms(),
            retry_limit: default_retry_limit(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    // Factom produces one directory block every 10 minutes.
    10 * 60 * 1000
}

fn default_retry_limit() -> u32 {
    5
}

fn default_retry_backoff_ms() -> u64 {
    1000
}
