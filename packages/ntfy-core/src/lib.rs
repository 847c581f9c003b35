pub mod action;
pub mod error;
pub mod message;
pub mod notification;
pub mod payload;
pub mod subscription;

pub use action::{Action, HttpAction, ViewAction};
pub use error::{ParseError, ParseResult};
pub use message::Message;
pub use notification::NotificationRequest;
pub use payload::Payload;
pub use subscription::{Subscription, topic_url};

/// 服务器用于唤醒客户端轮询的保留 topic
pub const POLL_TOPIC: &str = "~poll";
