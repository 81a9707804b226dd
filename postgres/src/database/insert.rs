use sqlx::{
    error::Error as SqlxError,
    pool::PoolConnection,
    postgres::{PgArguments, Postgres},
    query::Query,
};

use crate::model::FblockModel;

#[async_trait::async_trait]
pub trait InsertModel: Send + Sized {
    async fn insert(self, conn: &mut PoolConnection<Postgres>) -> Result<u64, SqlxError>;
}

#[async_trait::async_trait]
impl InsertModel for FblockModel {
    async fn insert(self, conn: &mut PoolConnection<Postgres>) -> Result<u64, SqlxError> {
        // A plain insert: a conflicting height must surface as a
        // unique-violation error so the caller can classify it.
        let query: Query<'_, Postgres, PgArguments> = sqlx::query(
            r#"
            INSERT INTO fblock (height, timestamp, tx_count, ec_exchange_rate, price, key_mr, data)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(self.height)
        .bind(self.timestamp)
        .bind(self.tx_count)
        .bind(self.ec_exchange_rate)
        .bind(self.price)
        .bind(self.key_mr)
        .bind(self.data);

        log::debug!(
            target: "postgres",
            "Insert fblock into postgres, height = {}",
            self.height
        );
        let rows_affected = query.execute(conn).await?.rows_affected();
        Ok(rows_affected)
    }
}
