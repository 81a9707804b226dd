mod config;
mod database;
pub mod model;
mod schema;

pub use self::{
    config::PostgresConfig,
    database::{query, InsertOutcome, PostgresDb},
    model::*,
    schema::ensure_schema,
};
pub use sqlx::error::Error as SqlxError;
