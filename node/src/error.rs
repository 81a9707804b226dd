#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Url(#[from] url::ParseError),

    #[error("factomd rpc error {code}: {message}")]
    Rpc { code: i64, message: String },
}
