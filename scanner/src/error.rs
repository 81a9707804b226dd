use fblock_node::NodeError;
use fblock_postgres::SqlxError;

/// Faults that terminate a scan run.
///
/// Retryable transport failures and not-yet-produced heights are absorbed
/// inside the fetch loop; a benign duplicate row is absorbed by the store
/// layer. Everything that reaches this enum is fatal for the current run.
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("fetch retries exhausted: {0}")]
    Transport(#[source] NodeError),

    #[error("node reported height {reported} for requested height {requested}")]
    HeightMismatch { requested: u32, reported: u32 },

    #[error("malformed {field} hex at height {height}: {source}")]
    Codec {
        height: u32,
        field: &'static str,
        #[source]
        source: hex::FromHexError,
    },

    #[error("{0}")]
    Storage(#[from] SqlxError),
}
