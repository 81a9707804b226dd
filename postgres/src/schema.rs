use sqlx::{error::Error as SqlxError, Connection, Executor, PgConnection};

/// Schema DDL, ordered so that every foreign key references a relation
/// created by an earlier statement. Each statement is guarded with
/// `IF NOT EXISTS` so the whole set can run on every startup.
///
/// Only `fblock` is populated by the scanner; `transaction`, `address` and
/// `address_transaction` are reserved for raw-payload decoding.
pub(crate) const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS fblock (
        height BIGINT PRIMARY KEY,
        timestamp BIGINT,
        tx_count INTEGER NOT NULL,
        ec_exchange_rate BIGINT NOT NULL,
        price DOUBLE PRECISION,
        key_mr BYTEA NOT NULL,
        data BYTEA NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS "transaction" (
        id BIGSERIAL PRIMARY KEY,
        height BIGINT NOT NULL REFERENCES fblock (height),
        fb_offset BIGINT NOT NULL,
        size BIGINT NOT NULL,
        timestamp BIGINT NOT NULL,
        total_fct_in BIGINT NOT NULL,
        total_fct_out BIGINT NOT NULL,
        total_ec_out BIGINT NOT NULL,
        hash BYTEA NOT NULL UNIQUE,
        memo TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS address (
        id BIGSERIAL PRIMARY KEY,
        balance BIGINT NOT NULL,
        adr TEXT NOT NULL UNIQUE,
        memo TEXT
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS address_transaction (
        tx_id BIGINT NOT NULL REFERENCES "transaction" (id),
        adr_id BIGINT NOT NULL REFERENCES address (id),
        amount BIGINT NOT NULL,
        PRIMARY KEY (tx_id, adr_id)
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS idx_fblock_key_mr ON fblock (key_mr)"#,
];

/// Create the relations and indexes if they are missing.
///
/// Runs inside a single transaction, so a failure leaves the schema exactly
/// as it was; a half-created schema is never observable.
pub async fn ensure_schema(url: impl AsRef<str>) -> Result<(), SqlxError> {
    let mut conn = PgConnection::connect(url.as_ref()).await?;
    let mut tx = conn.begin().await?;
    for statement in STATEMENTS {
        tx.execute(*statement).await?;
    }
    tx.commit().await?;
    log::info!(target: "postgres", "Schema is in place ({} statements)", STATEMENTS.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_statement_is_idempotent() {
        for statement in STATEMENTS {
            assert!(
                statement.contains("IF NOT EXISTS"),
                "statement is not guarded: {}",
                statement
            );
        }
    }

    #[test]
    fn relations_are_created_before_their_foreign_keys() {
        let position = |name: &str| {
            STATEMENTS
                .iter()
                .position(|s| s.contains(name))
                .unwrap_or_else(|| panic!("no statement creates {}", name))
        };
        let fblock = position("CREATE TABLE IF NOT EXISTS fblock");
        let transaction = position(r#"CREATE TABLE IF NOT EXISTS "transaction""#);
        let address = position("CREATE TABLE IF NOT EXISTS address (");
        let join = position("CREATE TABLE IF NOT EXISTS address_transaction");
        assert!(fblock < transaction);
        assert!(transaction < join);
        assert!(address < join);
    }
}
