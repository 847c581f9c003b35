use ntfy_core::topic_url;
use tokio::sync::watch;

/// 当前选中的订阅，用于应用内导航
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedSubscription {
    pub base_url: String,
    pub topic: String,
    pub topic_url: String,
}

/// 创建导航通道，发送端归点击路由，接收端归界面，后写覆盖先写
pub fn channel() -> (NavigationSender, NavigationReceiver) {
    let (tx, rx) = watch::channel(None);
    (NavigationSender { tx }, NavigationReceiver { rx })
}

#[derive(Debug)]
pub struct NavigationSender {
    tx: watch::Sender<Option<SelectedSubscription>>,
}

impl NavigationSender {
    pub fn select(&self, base_url: &str, topic: &str) {
        let base_url = base_url.trim_end_matches('/');
        self.tx.send_replace(Some(SelectedSubscription {
            base_url: base_url.to_string(),
            topic: topic.to_string(),
            topic_url: topic_url(base_url, topic),
        }));
    }
}

#[derive(Debug, Clone)]
pub struct NavigationReceiver {
    rx: watch::Receiver<Option<SelectedSubscription>>,
}

impl NavigationReceiver {
    pub fn current(&self) -> Option<SelectedSubscription> {
        self.rx.borrow().clone()
    }

    /// 等待下一次选中变化；发送端被丢弃时返回 `None`
    pub async fn changed(&mut self) -> Option<SelectedSubscription> {
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().clone()
    }
}
