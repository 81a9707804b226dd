mod insert;
pub mod query;

use std::time::Duration;

use sqlx::{
    error::Error as SqlxError,
    pool::PoolConnection,
    postgres::{PgConnectOptions, PgPool, PgPoolOptions, Postgres},
    ConnectOptions,
};

use self::insert::InsertModel;
use crate::{config::PostgresConfig, model::FblockModel};

/// SQLSTATE for a unique-constraint violation.
const UNIQUE_VIOLATION: &str = "23505";

/// Result of inserting a block row.
///
/// A duplicate height is not an error at this layer: the row is already
/// durable, which is all a resuming scanner needs to know.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InsertOutcome {
    Inserted,
    Duplicate,
}

#[derive(Clone)]
pub struct PostgresDb {
    config: PostgresConfig,
    pool: PgPool,
}

impl PostgresDb {
    pub async fn new(config: PostgresConfig) -> Result<Self, SqlxError> {
        let options = if config.disable_statement_logging {
            let mut options = config.uri().parse::<PgConnectOptions>()?;
            options.disable_statement_logging();
            options
        } else {
            config.uri().parse::<PgConnectOptions>()?
        };
        let pool = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .connect_timeout(Duration::from_secs(config.connect_timeout))
            .idle_timeout(config.idle_timeout.map(Duration::from_secs))
            .max_lifetime(config.max_lifetime.map(Duration::from_secs))
            .connect_with(options)
            .await?;
        log::info!(target: "postgres", "Postgres configuration: {:?}", config);
        Ok(Self { config, pool })
    }

    pub fn config(&self) -> &PostgresConfig {
        &self.config
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn conn(&self) -> Result<PoolConnection<Postgres>, SqlxError> {
        self.pool.acquire().await.map_err(Into::into)
    }

    /// Insert one block row, classifying a duplicate height as benign.
    pub async fn insert_fblock(&self, model: FblockModel) -> Result<InsertOutcome, SqlxError> {
        let height = model.height;
        let mut conn = self.conn().await?;
        match model.insert(&mut conn).await {
            Ok(_) => Ok(InsertOutcome::Inserted),
            Err(SqlxError::Database(err)) if err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                log::warn!(
                    target: "postgres",
                    "Fblock #{} already present, skipping",
                    height
                );
                Ok(InsertOutcome::Duplicate)
            }
            Err(err) => Err(err),
        }
    }

    /// Highest ingested height, or `None` for an empty store.
    pub async fn max_height(&self) -> Result<Option<i64>, SqlxError> {
        let mut conn = self.conn().await?;
        query::max_height(&mut conn).await
    }

    pub async fn fblock(&self, height: i64) -> Result<Option<FblockModel>, SqlxError> {
        let mut conn = self.conn().await?;
        query::fblock(height, &mut conn).await
    }

    pub async fn fblock_count(&self) -> Result<i64, SqlxError> {
        let mut conn = self.conn().await?;
        query::fblock_count(&mut conn).await
    }
}
