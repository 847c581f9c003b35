use ntfy_core::Payload;
use serde_json::Value;
use tracing::warn;

/// 服务器 JSON 流中的一条事件
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// 连接建立
    Open,
    /// 心跳包
    Keepalive,
    /// 一条消息，已压平为键值信封
    Message(Payload),
    /// 连接关闭
    Closed,
    /// 错误消息
    Error { message: String },
}

/// 解析服务器 JSON 流中的一行，没有 `event` 字段的行视为消息
pub fn parse_line(line: &str) -> Option<StreamEvent> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let object = match serde_json::from_str::<Value>(line) {
        Ok(Value::Object(object)) => object,
        Ok(_) => {
            warn!("ignoring non-object stream line");
            return None;
        }
        Err(err) => {
            warn!(error = %err, "ignoring unparsable stream line");
            return None;
        }
    };

    let event = object
        .get("event")
        .and_then(Value::as_str)
        .unwrap_or("message")
        .to_string();

    match event.as_str() {
        "message" => Some(StreamEvent::Message(Payload::from_json_object(object))),
        "open" => Some(StreamEvent::Open),
        "keepalive" => Some(StreamEvent::Keepalive),
        _ => None,
    }
}

/// 解析轮询接口返回的换行分隔 JSON，只保留消息事件
pub fn parse_messages(body: &str) -> Vec<Payload> {
    body.lines()
        .filter_map(parse_line)
        .filter_map(|event| match event {
            StreamEvent::Message(payload) => Some(payload),
            _ => None,
        })
        .collect()
}
