#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("{0}")]
    Scan(#[from] fblock_scanner::ScanError),

    #[error("{0}")]
    Node(#[from] fblock_node::NodeError),

    #[error("{0}")]
    Postgres(#[from] fblock_postgres::SqlxError),

    #[error("{0}")]
    Grant(#[from] fblock_grant::GrantError),

    #[error("{0}")]
    FlumeSend(#[from] flume::SendError<()>),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Toml(#[from] toml::de::Error),
}
