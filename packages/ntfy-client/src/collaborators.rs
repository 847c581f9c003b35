//! 管线依赖的外部协作者：订阅存储、消息拉取、通知展示、打开链接与 HTTP 请求。

use crate::error::FetchError;
use async_trait::async_trait;
use ntfy_core::{NotificationRequest, Payload, Subscription};
use ntfy_sdk::{NtfyClient, SdkError};
use std::collections::BTreeMap;
use url::Url;

/// 本地订阅列表，只读
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn list_subscriptions(&self) -> anyhow::Result<Vec<Subscription>>;
}

/// 拉取一个订阅尚未看到的原始消息载荷，按服务器顺序返回
#[async_trait]
pub trait MessageFetcher: Send + Sync {
    async fn fetch(&self, subscription: &Subscription) -> Result<Vec<Payload>, FetchError>;
}

/// 系统通知中心，只负责展示准备好的通知
#[async_trait]
pub trait NotificationDisplay: Send + Sync {
    async fn present(&self, request: NotificationRequest) -> anyhow::Result<()>;
}

/// 打开链接，不等待结果
pub trait UrlOpener: Send + Sync {
    fn open(&self, url: &Url);
}

#[async_trait]
pub trait HttpRequester: Send + Sync {
    /// 返回响应状态码，只有传输失败才是错误
    async fn request(
        &self,
        method: &str,
        url: &Url,
        headers: &BTreeMap<String, String>,
        body: Option<&str>,
    ) -> Result<u16, SdkError>;
}

#[async_trait]
impl MessageFetcher for NtfyClient {
    async fn fetch(&self, subscription: &Subscription) -> Result<Vec<Payload>, FetchError> {
        Ok(self.poll(subscription).await?)
    }
}

#[async_trait]
impl HttpRequester for NtfyClient {
    async fn request(
        &self,
        method: &str,
        url: &Url,
        headers: &BTreeMap<String, String>,
        body: Option<&str>,
    ) -> Result<u16, SdkError> {
        NtfyClient::request(self, method, url.as_str(), headers, body).await
    }
}
