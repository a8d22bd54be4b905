use thiserror::Error;

pub type BannerResult<T> = Result<T, BannerError>;

#[derive(Error, Debug)]
pub enum BannerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}
