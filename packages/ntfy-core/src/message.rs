use crate::action::Action;
use crate::error::{ParseError, ParseResult};
use crate::payload::Payload;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// 信封中的键名，推送载荷与通知元数据共用
pub mod keys {
    pub const ID: &str = "id";
    pub const TIME: &str = "time";
    pub const TOPIC: &str = "topic";
    pub const TITLE: &str = "title";
    pub const MESSAGE: &str = "message";
    pub const PRIORITY: &str = "priority";
    pub const TAGS: &str = "tags";
    pub const CLICK: &str = "click";
    pub const ACTIONS: &str = "actions";
    pub const BASE_URL: &str = "base_url";
}

/// 服务器下发的一条消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub topic: String,
    pub time: Option<i64>,
    pub title: Option<String>,
    pub message: String,
    pub priority: Option<u8>,
    pub tags: Vec<String>,
    pub click: Option<String>,
    /// 原始 action 列表 JSON，由 [`Message::actions`] 按需解析
    pub actions: Option<String>,
    pub base_url: Option<String>,
}

impl Message {
    /// 从推送或轮询载荷解析消息，`id` 与 `topic` 必填
    pub fn parse(payload: &Payload) -> ParseResult<Message> {
        let mut message = Self::from_fields(payload)?;
        if let Some(raw) = message.actions.as_deref() {
            if let Err(err) = Action::parse_list(raw) {
                warn!(id = %message.id, error = %err, "ignoring malformed actions");
                message.actions = None;
            }
        }
        Ok(message)
    }

    /// 写入通知元数据，点击时可由 [`Message::from_metadata`] 还原
    pub fn to_metadata(&self) -> Payload {
        let mut metadata = Payload::new()
            .with(keys::ID, self.id.as_str())
            .with(keys::TOPIC, self.topic.as_str())
            .with(keys::MESSAGE, self.message.as_str());

        if let Some(time) = self.time {
            metadata.insert(keys::TIME, time.to_string());
        }
        if let Some(title) = &self.title {
            metadata.insert(keys::TITLE, title.as_str());
        }
        if let Some(priority) = self.priority {
            metadata.insert(keys::PRIORITY, priority.to_string());
        }
        if !self.tags.is_empty() {
            metadata.insert(keys::TAGS, Value::from(self.tags.clone()).to_string());
        }
        if let Some(click) = &self.click {
            metadata.insert(keys::CLICK, click.as_str());
        }
        if let Some(actions) = &self.actions {
            metadata.insert(keys::ACTIONS, actions.as_str());
        }
        if let Some(base_url) = &self.base_url {
            metadata.insert(keys::BASE_URL, base_url.as_str());
        }
        metadata
    }

    /// 从通知元数据还原消息，action 列表保持原样
    pub fn from_metadata(metadata: &Payload) -> ParseResult<Message> {
        Self::from_fields(metadata)
    }

    /// 解析保存的 action 列表，格式错误时为空
    pub fn actions(&self) -> Vec<Action> {
        let Some(raw) = self.actions.as_deref() else {
            return Vec::new();
        };
        match Action::parse_list(raw) {
            Ok(actions) => actions,
            Err(err) => {
                warn!(id = %self.id, error = %err, "ignoring malformed actions");
                Vec::new()
            }
        }
    }

    pub fn find_action(&self, action_id: &str) -> Option<Action> {
        self.actions()
            .into_iter()
            .find(|action| action.id() == action_id)
    }

    pub fn received_at(&self) -> Option<DateTime<Utc>> {
        self.time.and_then(|secs| DateTime::from_timestamp(secs, 0))
    }

    fn from_fields(payload: &Payload) -> ParseResult<Message> {
        let id = payload
            .get_non_empty(keys::ID)
            .ok_or(ParseError::MissingRequiredField(keys::ID))?;
        let topic = payload
            .get_non_empty(keys::TOPIC)
            .ok_or(ParseError::MissingRequiredField(keys::TOPIC))?;

        Ok(Message {
            id: id.to_string(),
            topic: topic.to_string(),
            time: optional_field(payload, keys::TIME, parse_time),
            title: payload.get_non_empty(keys::TITLE).map(str::to_string),
            message: payload.get(keys::MESSAGE).unwrap_or_default().to_string(),
            priority: optional_field(payload, keys::PRIORITY, parse_priority),
            tags: payload.get(keys::TAGS).map(parse_tags).unwrap_or_default(),
            click: payload.get_non_empty(keys::CLICK).map(str::to_string),
            actions: payload.get_non_empty(keys::ACTIONS).map(str::to_string),
            base_url: payload.get_non_empty(keys::BASE_URL).map(str::to_string),
        })
    }
}

fn optional_field<T>(
    payload: &Payload,
    field: &'static str,
    parse: fn(&str) -> Option<T>,
) -> Option<T> {
    let value = payload.get_non_empty(field)?;
    let parsed = parse(value);
    if parsed.is_none() {
        let err = ParseError::InvalidField {
            field,
            value: value.to_string(),
        };
        warn!(error = %err, "ignoring field");
    }
    parsed
}

fn parse_time(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

fn parse_priority(value: &str) -> Option<u8> {
    value
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|priority| (1..=5).contains(priority))
}

// Tags arrive comma-separated from push payloads, but as a JSON array when
// flattened from a poll response.
fn parse_tags(value: &str) -> Vec<String> {
    if value.trim_start().starts_with('[') {
        if let Ok(tags) = serde_json::from_str::<Vec<String>>(value) {
            return tags.into_iter().filter(|tag| !tag.is_empty()).collect();
        }
    }
    value
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_payload() -> Payload {
        Payload::new()
            .with("id", "msg-1")
            .with("topic", "alerts")
            .with("time", "1700000000")
            .with("title", "Disk full")
            .with("message", "/var is at 98%")
            .with("priority", "4")
            .with("tags", "warning,disk")
            .with("click", "/alerts")
            .with(
                "actions",
                r#"[{"id":"a1","action":"view","url":"https://x/y"}]"#,
            )
            .with("base_url", "https://ntfy.example.com")
            .with("event", "message")
    }

    #[test]
    fn test_parse_full_payload() {
        let message = Message::parse(&full_payload()).unwrap();

        assert_eq!(message.id, "msg-1");
        assert_eq!(message.topic, "alerts");
        assert_eq!(message.time, Some(1700000000));
        assert_eq!(message.title.as_deref(), Some("Disk full"));
        assert_eq!(message.message, "/var is at 98%");
        assert_eq!(message.priority, Some(4));
        assert_eq!(message.tags, vec!["warning", "disk"]);
        assert_eq!(message.click.as_deref(), Some("/alerts"));
        assert_eq!(message.base_url.as_deref(), Some("https://ntfy.example.com"));
        assert_eq!(message.actions().len(), 1);
        assert!(message.received_at().is_some());
    }

    #[test]
    fn test_parse_minimal_payload() {
        let payload = Payload::new().with("id", "m").with("topic", "t");
        let message = Message::parse(&payload).unwrap();

        assert_eq!(message.title, None);
        assert_eq!(message.message, "");
        assert_eq!(message.click, None);
        assert_eq!(message.actions, None);
        assert!(message.actions().is_empty());
        assert!(message.tags.is_empty());
    }

    #[test]
    fn test_missing_required_fields() {
        let no_id = Payload::new().with("topic", "t").with("message", "hi");
        assert!(matches!(
            Message::parse(&no_id),
            Err(ParseError::MissingRequiredField("id"))
        ));

        let no_topic = Payload::new().with("id", "m");
        assert!(matches!(
            Message::parse(&no_topic),
            Err(ParseError::MissingRequiredField("topic"))
        ));

        let empty_id = Payload::new().with("id", "").with("topic", "t");
        assert!(matches!(
            Message::parse(&empty_id),
            Err(ParseError::MissingRequiredField("id"))
        ));
    }

    #[test]
    fn test_malformed_actions_degrade_to_none() {
        let payload = Payload::new()
            .with("id", "m")
            .with("topic", "t")
            .with("actions", "{not json");
        let message = Message::parse(&payload).unwrap();
        assert_eq!(message.actions, None);
    }

    #[test]
    fn test_invalid_optional_fields_degrade() {
        let payload = Payload::new()
            .with("id", "m")
            .with("topic", "t")
            .with("priority", "9")
            .with("time", "yesterday");
        let message = Message::parse(&payload).unwrap();
        assert_eq!(message.priority, None);
        assert_eq!(message.time, None);
    }

    #[test]
    fn test_tags_from_json_array() {
        let payload = Payload::new()
            .with("id", "m")
            .with("topic", "t")
            .with("tags", r#"["a","b"]"#);
        let message = Message::parse(&payload).unwrap();
        assert_eq!(message.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_tags_with_commas_survive_metadata() {
        let payload = Payload::new()
            .with("id", "m")
            .with("topic", "t")
            .with("tags", r#"["a,b","c"]"#);
        let message = Message::parse(&payload).unwrap();
        assert_eq!(message.tags, vec!["a,b", "c"]);

        let metadata = message.to_metadata();
        assert_eq!(metadata.get("tags"), Some(r#"["a,b","c"]"#));
        let restored = Message::from_metadata(&metadata).unwrap();
        assert_eq!(restored.tags, vec!["a,b", "c"]);
    }

    #[test]
    fn test_metadata_round_trip() {
        let message = Message::parse(&full_payload()).unwrap();
        let metadata = message.to_metadata();
        let restored = Message::from_metadata(&metadata).unwrap();
        assert_eq!(restored, message);
    }

    #[test]
    fn test_from_metadata_keeps_raw_actions() {
        // Stored metadata is not re-validated, so a schema change cannot
        // retroactively break an already displayed notification.
        let metadata = Payload::new()
            .with("id", "m")
            .with("topic", "t")
            .with("actions", r#"[{"id":"x","action":"future"}]"#);
        let message = Message::from_metadata(&metadata).unwrap();
        assert!(message.actions.is_some());
        assert!(message.actions().is_empty());
        assert!(message.find_action("x").is_none());
    }

    #[test]
    fn test_find_action() {
        let message = Message::parse(&full_payload()).unwrap();
        assert_eq!(message.find_action("a1").map(|a| a.kind()), Some("view"));
        assert!(message.find_action("a2").is_none());
    }
}
