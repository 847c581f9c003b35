use thiserror::Error;

#[derive(Debug, Error)]
pub enum SdkError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    #[error("Network error: {0}")]
    NetworkError(String),
}

pub type SdkResult<T> = Result<T, SdkError>;
