use crate::builder::NotificationBuilder;
use crate::collaborators::{MessageFetcher, NotificationDisplay, SubscriptionStore};
use crate::config::ClientConfig;
use ntfy_core::message::keys;
use ntfy_core::{Message, POLL_TOPIC, Payload, Subscription};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

/// 一轮轮询的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollResult {
    /// 触发被忽略，或没有新消息
    NoData,
    /// 交给系统展示的通知数量
    NewData(usize),
    /// 没有展示任何通知，且至少一个订阅拉取失败或超时被放弃
    Failed,
}

/// 收到轮询触发后，为每个订阅拉取新消息并展示为通知
pub struct PollDispatcher {
    store: Arc<dyn SubscriptionStore>,
    fetcher: Arc<dyn MessageFetcher>,
    display: Arc<dyn NotificationDisplay>,
    deadline: Duration,
}

impl PollDispatcher {
    pub fn new(
        store: Arc<dyn SubscriptionStore>,
        fetcher: Arc<dyn MessageFetcher>,
        display: Arc<dyn NotificationDisplay>,
        config: &ClientConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            display,
            deadline: config.poll_deadline,
        }
    }

    /// 执行一轮轮询，所有拉取结束或被中止后只调用一次 `completion`
    pub async fn on_poll_trigger<F>(&self, trigger: &Payload, completion: F)
    where
        F: FnOnce(PollResult) + Send,
    {
        let result = self.poll(trigger).await;
        completion(result);
    }

    pub async fn poll(&self, trigger: &Payload) -> PollResult {
        let topic = trigger.get(keys::TOPIC).unwrap_or_default();
        if topic != POLL_TOPIC {
            debug!(topic, "ignoring non-poll trigger");
            return PollResult::NoData;
        }

        let deadline = Instant::now() + self.deadline;
        let subscriptions = match tokio::time::timeout_at(deadline, self.store.list_subscriptions()).await {
            Ok(Ok(subscriptions)) => subscriptions,
            Ok(Err(err)) => {
                warn!(error = %err, "failed to list subscriptions");
                return PollResult::Failed;
            }
            Err(_) => {
                warn!("poll deadline elapsed while listing subscriptions");
                return PollResult::Failed;
            }
        };
        if subscriptions.is_empty() {
            debug!("no subscriptions to poll");
            return PollResult::NoData;
        }

        let displayed = Arc::new(AtomicUsize::new(0));
        let mut tasks = JoinSet::new();

        for subscription in subscriptions {
            tasks.spawn(poll_subscription(
                Arc::clone(&self.fetcher),
                Arc::clone(&self.display),
                subscription,
                Arc::clone(&displayed),
            ));
        }

        let mut failures = 0usize;
        loop {
            match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                Ok(Some(Ok(true))) => {}
                Ok(Some(Ok(false))) => failures += 1,
                Ok(Some(Err(err))) => {
                    error!(error = %err, "poll task panicked");
                    failures += 1;
                }
                Ok(None) => break,
                Err(_) => {
                    let abandoned = tasks.len();
                    warn!(abandoned, "poll deadline elapsed, abandoning fetches");
                    tasks.abort_all();
                    while tasks.join_next().await.is_some() {}
                    failures += abandoned;
                    break;
                }
            }
        }

        let displayed = displayed.load(Ordering::SeqCst);
        info!(displayed, failures, "poll cycle finished");
        match (displayed, failures) {
            (0, 0) => PollResult::NoData,
            (0, _) => PollResult::Failed,
            (n, _) => PollResult::NewData(n),
        }
    }
}

// Returns false when the fetch itself failed. Messages are presented in the
// order the server returned them.
async fn poll_subscription(
    fetcher: Arc<dyn MessageFetcher>,
    display: Arc<dyn NotificationDisplay>,
    subscription: Subscription,
    displayed: Arc<AtomicUsize>,
) -> bool {
    let payloads = match fetcher.fetch(&subscription).await {
        Ok(payloads) => payloads,
        Err(err) => {
            warn!(topic_url = %subscription.topic_url(), error = %err, "failed to fetch messages");
            return false;
        }
    };

    for payload in payloads {
        let message = match Message::parse(&payload) {
            Ok(message) => message,
            Err(err) => {
                warn!(topic_url = %subscription.topic_url(), error = %err, "skipping unparsable message");
                continue;
            }
        };

        let request = NotificationBuilder::build(&subscription, &message);
        match display.present(request).await {
            Ok(()) => {
                displayed.fetch_add(1, Ordering::SeqCst);
            }
            Err(err) => error!(id = %message.id, error = %err, "unable to create notification"),
        }
    }

    true
}
