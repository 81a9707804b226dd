use serde::{Deserialize, Serialize};

/// A factomd v2 request envelope.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct RpcRequest<P> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<P>,
}

impl<P> RpcRequest<P> {
    pub fn new(method: &'static str, params: P) -> Self {
        Self {
            jsonrpc: "2.0",
            id: 0,
            method,
            params: Some(params),
        }
    }
}

impl RpcRequest<()> {
    pub fn without_params(method: &'static str) -> Self {
        Self {
            jsonrpc: "2.0",
            id: 0,
            method,
            params: None,
        }
    }
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorObject>,
}

#[derive(Clone, Debug, Deserialize)]
pub(crate) struct RpcErrorObject {
    pub code: i64,
    pub message: String,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct HeightParams {
    pub height: u32,
}

/// Response of `fblock-by-height`: the decoded factoid block plus the raw
/// marshalled block body as a hex string.
#[derive(Clone, Debug, Deserialize)]
pub struct FblockResponse {
    pub fblock: Fblock,
    pub rawdata: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Fblock {
    #[serde(rename = "dbheight")]
    pub height: u32,
    #[serde(rename = "keymr")]
    pub key_mr: String,
    #[serde(rename = "exchrate")]
    pub ec_exchange_rate: i64,
    #[serde(default)]
    pub transactions: Vec<FactoidTransaction>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct FactoidTransaction {
    pub millitimestamp: i64,
    #[serde(default)]
    pub txid: Option<String>,
}

/// Response of `heights`; only the directory block height is consumed.
#[derive(Clone, Copy, Debug, Deserialize)]
pub struct Heights {
    #[serde(rename = "directoryblockheight")]
    pub directory_block_height: u32,
}
