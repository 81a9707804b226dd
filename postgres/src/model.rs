use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the `fblock` relation: the block-level summary of a factoid
/// block. Append-only; created exactly once per height.
///
/// `timestamp` is the millisecond timestamp of the block's first transaction
/// and is `None` for a block that carries no transactions. `price` is
/// reserved for future USD enrichment and is always `None` for now.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, FromRow)]
pub struct FblockModel {
    pub height: i64,
    pub timestamp: Option<i64>,
    pub tx_count: i32,
    pub ec_exchange_rate: i64,
    pub price: Option<f64>,
    pub key_mr: Vec<u8>,
    pub data: Vec<u8>,
}
