mod client;
mod config;
mod error;
mod types;

pub use self::{
    client::NodeClient,
    config::NodeConfig,
    error::NodeError,
    types::{FactoidTransaction, Fblock, FblockResponse, Heights},
};
