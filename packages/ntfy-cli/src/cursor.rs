use crate::store::JsonFileStore;
use async_trait::async_trait;
use ntfy_client::{FetchError, MessageFetcher};
use ntfy_core::message::keys;
use ntfy_core::{Payload, Subscription};
use std::sync::Mutex;
use tracing::{debug, warn};

/// 拉取成功后把最后一条消息 id 写回订阅文件，下一轮只拉取之后的消息
pub struct CursorFetcher<F> {
    inner: F,
    store: JsonFileStore,
    write_lock: Mutex<()>,
}

impl<F: MessageFetcher> CursorFetcher<F> {
    pub fn new(inner: F, store: JsonFileStore) -> Self {
        Self {
            inner,
            store,
            write_lock: Mutex::new(()),
        }
    }

    fn advance(&self, subscription: &Subscription, id: &str) {
        // Fetches run concurrently, and each write rewrites the whole file.
        let _guard = self.write_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        match self
            .store
            .set_last_message_id(&subscription.base_url, &subscription.topic, id)
        {
            Ok(true) => debug!(topic_url = %subscription.topic_url(), id, "advanced since cursor"),
            Ok(false) => debug!(topic_url = %subscription.topic_url(), "subscription removed, cursor not saved"),
            Err(err) => warn!(topic_url = %subscription.topic_url(), error = %err, "failed to save since cursor"),
        }
    }
}

#[async_trait]
impl<F: MessageFetcher> MessageFetcher for CursorFetcher<F> {
    async fn fetch(&self, subscription: &Subscription) -> Result<Vec<Payload>, FetchError> {
        let payloads = self.inner.fetch(subscription).await?;
        if let Some(id) = payloads.iter().rev().find_map(|p| p.get_non_empty(keys::ID)) {
            self.advance(subscription, id);
        }
        Ok(payloads)
    }
}
