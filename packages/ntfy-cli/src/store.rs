use anyhow::{Context, Result};
use async_trait::async_trait;
use ntfy_client::SubscriptionStore;
use ntfy_core::Subscription;
use std::path::{Path, PathBuf};

/// 以 JSON 文件保存的订阅列表
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取订阅列表，文件不存在时为空
    pub fn load(&self) -> Result<Vec<Subscription>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let text = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).with_context(|| format!("failed to parse {}", self.path.display()))
    }

    pub fn save(&self, subscriptions: &[Subscription]) -> Result<()> {
        let text = serde_json::to_string_pretty(subscriptions)?;
        std::fs::write(&self.path, text)
            .with_context(|| format!("failed to write {}", self.path.display()))
    }

    /// 添加订阅，已存在时返回 false
    pub fn add(&self, subscription: Subscription) -> Result<bool> {
        let mut subscriptions = self.load()?;
        if subscriptions
            .iter()
            .any(|s| s.matches(&subscription.base_url, &subscription.topic))
        {
            return Ok(false);
        }
        subscriptions.push(subscription);
        self.save(&subscriptions)?;
        Ok(true)
    }

    /// 删除订阅，不存在时返回 false
    pub fn remove(&self, base_url: &str, topic: &str) -> Result<bool> {
        let mut subscriptions = self.load()?;
        let before = subscriptions.len();
        subscriptions.retain(|s| !s.matches(base_url, topic));
        if subscriptions.len() == before {
            return Ok(false);
        }
        self.save(&subscriptions)?;
        Ok(true)
    }

    /// 记录订阅最后看到的消息 id，订阅不存在时返回 false
    pub fn set_last_message_id(&self, base_url: &str, topic: &str, id: &str) -> Result<bool> {
        let mut subscriptions = self.load()?;
        let Some(subscription) = subscriptions.iter_mut().find(|s| s.matches(base_url, topic)) else {
            return Ok(false);
        };
        if subscription.last_message_id.as_deref() == Some(id) {
            return Ok(true);
        }
        subscription.last_message_id = Some(id.to_string());
        self.save(&subscriptions)?;
        Ok(true)
    }
}

#[async_trait]
impl SubscriptionStore for JsonFileStore {
    async fn list_subscriptions(&self) -> Result<Vec<Subscription>> {
        self.load()
    }
}
