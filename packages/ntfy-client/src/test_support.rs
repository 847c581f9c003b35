use crate::collaborators::*;
use crate::error::FetchError;
use async_trait::async_trait;
use ntfy_core::{NotificationRequest, Payload, Subscription};
use ntfy_sdk::SdkError;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

#[derive(Default)]
pub struct FakeStore {
    pub subscriptions: Vec<Subscription>,
    pub fail: bool,
}

#[async_trait]
impl SubscriptionStore for FakeStore {
    async fn list_subscriptions(&self) -> anyhow::Result<Vec<Subscription>> {
        if self.fail {
            anyhow::bail!("store unavailable");
        }
        Ok(self.subscriptions.clone())
    }
}

/// 永远不返回的订阅存储
pub struct HangingStore;

#[async_trait]
impl SubscriptionStore for HangingStore {
    async fn list_subscriptions(&self) -> anyhow::Result<Vec<Subscription>> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(Vec::new())
    }
}

pub enum FetchReply {
    Messages(Vec<Payload>),
    Fail,
    Hang,
}

/// 按主题返回预设结果，未知主题没有消息
#[derive(Default)]
pub struct FakeFetcher {
    pub replies: HashMap<String, FetchReply>,
}

impl FakeFetcher {
    pub fn reply(mut self, topic: &str, reply: FetchReply) -> Self {
        self.replies.insert(topic.to_string(), reply);
        self
    }
}

#[async_trait]
impl MessageFetcher for FakeFetcher {
    async fn fetch(&self, subscription: &Subscription) -> Result<Vec<Payload>, FetchError> {
        match self.replies.get(&subscription.topic) {
            Some(FetchReply::Messages(messages)) => Ok(messages.clone()),
            Some(FetchReply::Fail) => Err(SdkError::NetworkError("connection refused".to_string()).into()),
            Some(FetchReply::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(Vec::new())
            }
            None => Ok(Vec::new()),
        }
    }
}

#[derive(Default)]
pub struct RecordingDisplay {
    pub presented: Mutex<Vec<NotificationRequest>>,
    pub fail: bool,
}

impl RecordingDisplay {
    pub fn ids(&self) -> Vec<String> {
        self.presented.lock().unwrap().iter().map(|r| r.id.clone()).collect()
    }
}

#[async_trait]
impl NotificationDisplay for RecordingDisplay {
    async fn present(&self, request: NotificationRequest) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("notifications not authorized");
        }
        self.presented.lock().unwrap().push(request);
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingOpener {
    pub opened: Mutex<Vec<String>>,
}

impl UrlOpener for RecordingOpener {
    fn open(&self, url: &Url) {
        self.opened.lock().unwrap().push(url.to_string());
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: String,
    pub url: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<String>,
}

pub struct RecordingRequester {
    pub requests: Mutex<Vec<RecordedRequest>>,
    pub reply: Result<u16, String>,
}

impl RecordingRequester {
    pub fn with_status(status: u16) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            reply: Ok(status),
        }
    }

    pub fn failing(cause: &str) -> Self {
        Self {
            requests: Mutex::new(Vec::new()),
            reply: Err(cause.to_string()),
        }
    }
}

#[async_trait]
impl HttpRequester for RecordingRequester {
    async fn request(
        &self,
        method: &str,
        url: &Url,
        headers: &BTreeMap<String, String>,
        body: Option<&str>,
    ) -> Result<u16, SdkError> {
        self.requests.lock().unwrap().push(RecordedRequest {
            method: method.to_string(),
            url: url.to_string(),
            headers: headers.clone(),
            body: body.map(str::to_string),
        });
        self.reply.clone().map_err(SdkError::NetworkError)
    }
}

pub fn message_payload(id: &str, topic: &str) -> Payload {
    Payload::new()
        .with("id", id)
        .with("topic", topic)
        .with("message", format!("message {}", id))
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
