use anyhow::Result;
use async_trait::async_trait;
use ntfy_client::{NotificationDisplay, UrlOpener};
use ntfy_core::{Message, NotificationRequest};
use std::sync::atomic::{AtomicUsize, Ordering};
use url::Url;

/// 在终端输出通知；`--json` 时每条通知一行 JSON，可直接交给 `tap`
#[derive(Debug, Default)]
pub struct TerminalDisplay {
    pub json: bool,
    shown: AtomicUsize,
}

impl TerminalDisplay {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            shown: AtomicUsize::new(0),
        }
    }

    pub fn shown(&self) -> usize {
        self.shown.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl NotificationDisplay for TerminalDisplay {
    async fn present(&self, request: NotificationRequest) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(&request)?);
        } else {
            println!("{}", format_request(&request));
        }
        self.shown.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// 只打印将要打开的链接
#[derive(Debug, Default)]
pub struct PrintOpener;

impl UrlOpener for PrintOpener {
    fn open(&self, url: &Url) {
        println!("🌐 Opening {}", url);
    }
}

/// 格式化通知显示
pub fn format_request(request: &NotificationRequest) -> String {
    let mut text = format!("🔔 [{}] {}", request.id, request.title);
    if let Ok(message) = Message::from_metadata(&request.metadata) {
        text.push_str(&format!("\n   Topic: {}", message.topic));
        if let Some(received_at) = message.received_at() {
            text.push_str(&format!("\n   Time: {}", received_at.format("%Y-%m-%d %H:%M:%S")));
        }
        for action in message.actions() {
            text.push_str(&format!("\n   [{}] {} → {}", action.kind(), action.label(), action.url()));
        }
    }
    text.push_str(&format!("\n   {}", request.body));
    text
}
