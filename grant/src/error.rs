#[derive(Debug, thiserror::Error)]
pub enum GrantError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("{0}")]
    Url(#[from] url::ParseError),
}
