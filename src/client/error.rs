use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Content API returned {status} for {url}")]
    Status { status: u16, url: String },

    #[error("Content API has no master ref")]
    MissingRef,

    #[error("Post not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
