use std::sync::Arc;

use fblock_node::{FblockResponse, NodeClient, NodeError};

/// Where fetched blocks come from.
///
/// `Ok(None)` means the height has not been produced by the chain yet.
#[async_trait::async_trait]
pub trait BlockSource: Send + Sync {
    async fn factoid_block_by_height(
        &self,
        height: u32,
    ) -> Result<Option<FblockResponse>, NodeError>;
}

#[async_trait::async_trait]
impl BlockSource for NodeClient {
    async fn factoid_block_by_height(
        &self,
        height: u32,
    ) -> Result<Option<FblockResponse>, NodeError> {
        NodeClient::factoid_block_by_height(self, height).await
    }
}

#[async_trait::async_trait]
impl<T: BlockSource + ?Sized> BlockSource for Arc<T> {
    async fn factoid_block_by_height(
        &self,
        height: u32,
    ) -> Result<Option<FblockResponse>, NodeError> {
        (**self).factoid_block_by_height(height).await
    }
}
