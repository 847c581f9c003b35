use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// 扁平的键值信封，推送载荷与通知元数据共用这一格式
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(BTreeMap<String, String>);

impl Payload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// 同 `get`，空字符串视为不存在
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 将服务器返回的 JSON 对象压平为键值信封。
    ///
    /// 字符串原样保留，null 被丢弃，其余值（数字、数组、对象）以 JSON 文本保存，
    /// 所以 `actions` 数组会变成一个 JSON 编码的字符串。
    pub fn from_json_object(object: serde_json::Map<String, Value>) -> Self {
        let mut payload = Self::new();
        for (key, value) in object {
            match value {
                Value::Null => {}
                Value::String(text) => payload.insert(key, text),
                other => payload.insert(key, other.to_string()),
            }
        }
        payload
    }
}

impl<K, V> FromIterator<(K, V)> for Payload
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_non_empty() {
        let payload = Payload::new().with("title", "").with("topic", "alerts");
        assert_eq!(payload.get("title"), Some(""));
        assert_eq!(payload.get_non_empty("title"), None);
        assert_eq!(payload.get_non_empty("topic"), Some("alerts"));
        assert_eq!(payload.get_non_empty("missing"), None);
    }

    #[test]
    fn test_from_json_object_flattens_values() {
        let value = json!({
            "id": "abc",
            "time": 1700000000,
            "priority": 4,
            "click": null,
            "actions": [{"id": "a1", "action": "view", "url": "https://x/y"}]
        });
        let Value::Object(object) = value else {
            panic!("Expected object");
        };

        let payload = Payload::from_json_object(object);
        assert_eq!(payload.get("id"), Some("abc"));
        assert_eq!(payload.get("time"), Some("1700000000"));
        assert_eq!(payload.get("priority"), Some("4"));
        assert_eq!(payload.get("click"), None);

        let actions: Value = serde_json::from_str(payload.get("actions").unwrap()).unwrap();
        assert_eq!(actions[0]["id"], "a1");
    }

    #[test]
    fn test_payload_serializes_as_flat_map() {
        let payload: Payload = [("topic", "alerts"), ("base_url", "https://ntfy.sh")]
            .into_iter()
            .collect();
        let text = serde_json::to_string(&payload).unwrap();
        assert_eq!(text, r#"{"base_url":"https://ntfy.sh","topic":"alerts"}"#);

        let back: Payload = serde_json::from_str(&text).unwrap();
        assert_eq!(back, payload);
    }
}
