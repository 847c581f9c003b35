use crate::error::ParseResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use tracing::warn;

pub const DEFAULT_HTTP_METHOD: &str = "GET";

/// 用户可触发的通知按钮
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Action {
    /// 打开一个链接
    View(ViewAction),
    /// 发起一个 HTTP 请求
    Http(HttpAction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewAction {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub url: String,
    #[serde(default)]
    pub clear: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpAction {
    pub id: String,
    #[serde(default)]
    pub label: String,
    pub url: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub clear: bool,
}

fn default_method() -> String {
    DEFAULT_HTTP_METHOD.to_string()
}

impl Action {
    /// 解析消息携带的 action 列表，未知或缺字段的条目记录警告后丢弃
    pub fn parse_list(json: &str) -> ParseResult<Vec<Action>> {
        let entries: Vec<Value> = serde_json::from_str(json)?;
        let mut actions = Vec::with_capacity(entries.len());

        for entry in entries {
            let kind = entry
                .get("action")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned();
            match kind.as_str() {
                "view" | "http" => match serde_json::from_value::<Action>(entry) {
                    Ok(action) => actions.push(action),
                    Err(err) => warn!(kind = %kind, error = %err, "dropping malformed action"),
                },
                _ => warn!(kind = %kind, "dropping unsupported action"),
            }
        }

        Ok(actions)
    }

    pub fn id(&self) -> &str {
        match self {
            Action::View(view) => &view.id,
            Action::Http(http) => &http.id,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Action::View(view) => &view.label,
            Action::Http(http) => &http.label,
        }
    }

    pub fn url(&self) -> &str {
        match self {
            Action::View(view) => &view.url,
            Action::Http(http) => &http.url,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Action::View(_) => "view",
            Action::Http(_) => "http",
        }
    }
}
