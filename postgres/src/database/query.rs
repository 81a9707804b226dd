use sqlx::{error::Error as SqlxError, pool::PoolConnection, postgres::Postgres, FromRow};

use crate::model::FblockModel;

pub async fn max_height(conn: &mut PoolConnection<Postgres>) -> Result<Option<i64>, SqlxError> {
    /// Return type of queries that `SELECT MAX(int)`
    #[derive(Copy, Clone, Debug, Eq, PartialEq, FromRow)]
    struct Max {
        max: Option<i64>,
    }

    let max: Max = sqlx::query_as(r#"SELECT MAX(height) FROM fblock"#)
        .fetch_one(conn)
        .await?;
    Ok(max.max)
}

pub async fn fblock(
    height: i64,
    conn: &mut PoolConnection<Postgres>,
) -> Result<Option<FblockModel>, SqlxError> {
    sqlx::query_as(
        r#"
        SELECT height, timestamp, tx_count, ec_exchange_rate, price, key_mr, data
        FROM fblock WHERE height = $1
        "#,
    )
    .bind(height)
    .fetch_optional(conn)
    .await
}

pub async fn fblock_count(conn: &mut PoolConnection<Postgres>) -> Result<i64, SqlxError> {
    /// Return type of queries that `SELECT COUNT(*)`
    #[derive(Copy, Clone, Debug, Eq, PartialEq, FromRow)]
    struct Count {
        count: i64,
    }

    let count: Count = sqlx::query_as(r#"SELECT COUNT(*) AS count FROM fblock"#)
        .fetch_one(conn)
        .await?;
    Ok(count.count)
}
