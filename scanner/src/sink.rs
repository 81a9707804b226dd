use std::sync::Arc;

use fblock_postgres::{FblockModel, InsertOutcome, PostgresDb, SqlxError};

/// Where ingested rows go.
#[async_trait::async_trait]
pub trait BlockSink: Send + Sync {
    /// Highest durably ingested height, `None` for an empty store.
    async fn max_height(&self) -> Result<Option<i64>, SqlxError>;

    async fn insert_fblock(&self, model: FblockModel) -> Result<InsertOutcome, SqlxError>;
}

#[async_trait::async_trait]
impl BlockSink for PostgresDb {
    async fn max_height(&self) -> Result<Option<i64>, SqlxError> {
        PostgresDb::max_height(self).await
    }

    async fn insert_fblock(&self, model: FblockModel) -> Result<InsertOutcome, SqlxError> {
        PostgresDb::insert_fblock(self, model).await
    }
}

#[async_trait::async_trait]
impl<T: BlockSink + ?Sized> BlockSink for Arc<T> {
    async fn max_height(&self) -> Result<Option<i64>, SqlxError> {
        (**self).max_height().await
    }

    async fn insert_fblock(&self, model: FblockModel) -> Result<InsertOutcome, SqlxError> {
        (**self).insert_fblock(model).await
    }
}
