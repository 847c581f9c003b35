use thiserror::Error;

/// 消息与 action 解析错误
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    #[error("invalid actions: {0}")]
    InvalidActions(#[from] serde_json::Error),

    #[error("invalid value for {field}: {value}")]
    InvalidField { field: &'static str, value: String },
}

pub type ParseResult<T> = Result<T, ParseError>;
