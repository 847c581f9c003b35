use ntfy_core::message::keys;
use ntfy_core::{Message, NotificationRequest, Subscription};

/// 把 (订阅, 消息) 转换为本地通知请求，元数据足以在点击时还原消息
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationBuilder;

impl NotificationBuilder {
    pub fn build(subscription: &Subscription, message: &Message) -> NotificationRequest {
        let mut metadata = message.to_metadata();
        metadata.insert(keys::BASE_URL, subscription.base_url.as_str());
        metadata.insert(keys::TOPIC, subscription.topic.as_str());

        NotificationRequest {
            id: message.id.clone(),
            title: message.title.clone().unwrap_or_default(),
            body: message.message.clone(),
            metadata,
        }
    }
}
