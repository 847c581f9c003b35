use serde::{Deserialize, Serialize};

/// 用户订阅的服务器与 topic
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Subscription {
    pub base_url: String,
    pub topic: String,
    /// 最后一条已知消息的 id，轮询时作为 `since` 游标
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message_id: Option<String>,
}

impl Subscription {
    pub fn new(base_url: &str, topic: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            topic: topic.to_string(),
            last_message_id: None,
        }
    }

    pub fn with_last_message_id(mut self, id: &str) -> Self {
        self.last_message_id = Some(id.to_string());
        self
    }

    pub fn topic_url(&self) -> String {
        topic_url(&self.base_url, &self.topic)
    }

    pub fn matches(&self, base_url: &str, topic: &str) -> bool {
        self.base_url == base_url.trim_end_matches('/') && self.topic == topic
    }
}

pub fn topic_url(base_url: &str, topic: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), topic)
}
