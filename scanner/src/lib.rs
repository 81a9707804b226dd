mod config;
mod error;
mod scanner;
mod sink;
mod source;
mod transform;

pub use self::{
    config::ScannerConfig, error::ScanError, scanner::Scanner, sink::BlockSink,
    source::BlockSource,
};
