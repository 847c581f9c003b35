use crate::error::*;
use crate::stream::{self, StreamEvent};
use futures_util::{SinkExt, StreamExt};
use ntfy_core::{Payload, Subscription};
use reqwest::{Client, Method};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tracing::{debug, warn};
use url::Url;

#[derive(Clone)]
pub struct NtfyClient {
    client: Client,
    pub timeout: Duration,
    pub token: Option<String>,
}

impl Default for NtfyClient {
    fn default() -> Self {
        Self::new()
    }
}

impl NtfyClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            timeout: Duration::from_secs(30),
            token: None,
        }
    }

    pub fn with_token(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }

    pub fn set_token(&mut self, token: &str) {
        self.token = Some(token.to_string());
    }

    pub fn clear_token(&mut self) {
        self.token = None;
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// 拉取订阅中尚未看到的消息，按服务器返回顺序（从旧到新）
    pub async fn poll(&self, subscription: &Subscription) -> SdkResult<Vec<Payload>> {
        let url = format!("{}/json", subscription.topic_url());
        let since = subscription.last_message_id.as_deref().unwrap_or("all");
        let mut request = self
            .client
            .get(&url)
            .timeout(self.timeout)
            .query(&[("poll", "1"), ("since", since)]);

        // 添加Authorization头如果有token
        if let Some(token) = &self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;
        let response = response.error_for_status()?;
        let body = response.text().await?;
        let messages = stream::parse_messages(&body);

        debug!(topic = %subscription.topic, count = messages.len(), "polled messages");
        Ok(messages)
    }

    /// 发起一个任意的 HTTP 请求，返回状态码；非 2xx 不算错误
    pub async fn request(
        &self,
        method: &str,
        url: &str,
        headers: &BTreeMap<String, String>,
        body: Option<&str>,
    ) -> SdkResult<u16> {
        let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())
            .map_err(|_| SdkError::InvalidMethod(method.to_string()))?;
        let url = Url::parse(url)?;

        let mut request = self.client.request(method, url).timeout(self.timeout);
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            request = request.body(body.to_string());
        }

        let response = request.send().await?;
        Ok(response.status().as_u16())
    }

    /// 通过 WebSocket 实时订阅一个 topic
    pub async fn subscribe(
        &self,
        subscription: &Subscription,
    ) -> SdkResult<tokio::sync::mpsc::UnboundedReceiver<StreamEvent>> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        let ws_url = websocket_url(subscription)?;

        let mut request = ws_url
            .as_str()
            .into_client_request()
            .map_err(|e| SdkError::NetworkError(e.to_string()))?;
        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| SdkError::NetworkError(e.to_string()))?;
            request.headers_mut().insert("Authorization", value);
        }

        match connect_async(request).await {
            Ok((ws_stream, _)) => {
                let (mut write, mut read) = ws_stream.split();
                let topic = subscription.topic.clone();

                // Handle incoming messages
                tokio::spawn(async move {
                    while let Some(msg) = read.next().await {
                        match msg {
                            Ok(Message::Text(text)) => {
                                if let Some(event) = stream::parse_line(&text) {
                                    let _ = tx.send(event);
                                }
                            }
                            Ok(Message::Close(_)) => {
                                let _ = tx.send(StreamEvent::Closed);
                                break;
                            }
                            Ok(Message::Ping(data)) => {
                                if let Err(e) = write.send(Message::Pong(data)).await {
                                    warn!(topic = %topic, error = %e, "failed to send pong");
                                    break;
                                }
                            }
                            Err(e) => {
                                let _ = tx.send(StreamEvent::Error { message: e.to_string() });
                                break;
                            }
                            _ => {}
                        }
                    }
                });

                Ok(rx)
            }
            Err(e) => Err(SdkError::NetworkError(e.to_string())),
        }
    }
}

fn websocket_url(subscription: &Subscription) -> SdkResult<Url> {
    let mut url = Url::parse(&format!("{}/ws", subscription.topic_url()))?;
    let scheme = match url.scheme() {
        "https" => "wss",
        "http" => "ws",
        other => return Err(SdkError::NetworkError(format!("unsupported scheme: {other}"))),
    };
    url.set_scheme(scheme)
        .map_err(|_| SdkError::NetworkError(format!("cannot switch to {scheme}")))?;
    Ok(url)
}
