use ntfy_core::ParseError;
use ntfy_sdk::SdkError;
use thiserror::Error;

/// 单个订阅的拉取失败，只影响该订阅本轮的结果
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Sdk(#[from] SdkError),
}

/// Action 执行失败，只记录日志，不会展示给用户
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("http action failed with status {status}")]
    HttpActionFailed { status: u16 },

    #[error("http action failed: {cause}")]
    HttpActionTransport { cause: String },
}

#[derive(Debug, Error)]
pub enum InteractionError {
    #[error("cannot reconstruct message from notification metadata: {0}")]
    CannotReconstructMessage(#[from] ParseError),
}
