use anyhow::{Context, Result};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://ntfy.sh";
const DEFAULT_POLL_DEADLINE_SECS: u64 = 25;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

/// 客户端配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// 通知元数据缺少 base_url 时使用的服务器地址
    pub default_base_url: String,
    /// 一轮轮询的时间预算，超时未完成的拉取会被放弃
    pub poll_deadline: Duration,
    pub http_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            default_base_url: DEFAULT_BASE_URL.to_string(),
            poll_deadline: Duration::from_secs(DEFAULT_POLL_DEADLINE_SECS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(base_url) = std::env::var("NTFY_BASE_URL") {
            url::Url::parse(&base_url).with_context(|| format!("invalid NTFY_BASE_URL: {base_url}"))?;
            config.default_base_url = base_url.trim_end_matches('/').to_string();
        }
        if let Some(secs) = secs_from_env("NTFY_POLL_DEADLINE_SECS")? {
            config.poll_deadline = Duration::from_secs(secs);
        }
        if let Some(secs) = secs_from_env("NTFY_HTTP_TIMEOUT_SECS")? {
            config.http_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_default_base_url(mut self, base_url: &str) -> Self {
        self.default_base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_poll_deadline(mut self, deadline: Duration) -> Self {
        self.poll_deadline = deadline;
        self
    }
}

fn secs_from_env(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(text) => {
            let secs: u64 = text
                .trim()
                .parse()
                .with_context(|| format!("invalid {key}: {text}"))?;
            anyhow::ensure!(secs > 0, "{key} must be greater than zero");
            Ok(Some(secs))
        }
        Err(_) => Ok(None),
    }
}
