use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::{
    config::NodeConfig,
    error::NodeError,
    types::{FblockResponse, HeightParams, Heights, RpcRequest, RpcResponse},
};

/// The factomd error code for a block that does not exist (yet).
const BLOCK_NOT_FOUND: i64 = -32008;

/// A thin factomd v2 JSON-RPC client.
pub struct NodeClient {
    http: Client,
    url: Url,
}

impl NodeClient {
    pub fn new(config: NodeConfig) -> Result<Self, NodeError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout))
            .build()?;
        let url = Url::parse(&config.url)?;
        log::info!(target: "node", "Node endpoint: {}", url);
        Ok(Self { http, url })
    }

    /// Fetch the factoid block at `height`.
    ///
    /// `Ok(None)` means the node has no block at that height yet, which the
    /// caller is expected to treat as "wait for the chain tip to advance".
    pub async fn factoid_block_by_height(
        &self,
        height: u32,
    ) -> Result<Option<FblockResponse>, NodeError> {
        let request = RpcRequest::new("fblock-by-height", HeightParams { height });
        let response: RpcResponse<FblockResponse> = self
            .http
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?
            .json()
            .await?;
        match (response.result, response.error) {
            (Some(fblock), _) => Ok(Some(fblock)),
            (None, Some(error)) if error.code == BLOCK_NOT_FOUND => Ok(None),
            (None, Some(error)) => Err(NodeError::Rpc {
                code: error.code,
                message: error.message,
            }),
            (None, None) => Err(NodeError::Rpc {
                code: 0,
                message: "response carried neither result nor error".to_string(),
            }),
        }
    }

    /// Current chain heights as reported by the node.
    pub async fn heights(&self) -> Result<Heights, NodeError> {
        let request = RpcRequest::without_params("heights");
        let response: RpcResponse<Heights> = self
            .http
            .post(self.url.clone())
            .json(&request)
            .send()
            .await?
            .json()
            .await?;
        match (response.result, response.error) {
            (Some(heights), _) => Ok(heights),
            (None, Some(error)) => Err(NodeError::Rpc {
                code: error.code,
                message: error.message,
            }),
            (None, None) => Err(NodeError::Rpc {
                code: 0,
                message: "response carried neither result nor error".to_string(),
            }),
        }
    }
}
