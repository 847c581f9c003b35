pub mod client;
pub mod error;
pub mod stream;

pub use client::NtfyClient;
pub use error::{SdkError, SdkResult};
pub use stream::StreamEvent;
