use crate::collaborators::{HttpRequester, UrlOpener};
use crate::error::ActionError;
use ntfy_core::{Action, HttpAction, ViewAction};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

/// Action 执行的结果
#[derive(Debug)]
pub enum ActionOutcome {
    /// `view`：链接已交给打开链接的协作者
    Opened(Url),
    /// `http`：请求已在后台发出，句柄可用于等待结果
    Dispatched(JoinHandle<Result<u16, ActionError>>),
}

/// 执行用户点击的通知按钮
#[derive(Clone)]
pub struct ActionExecutor {
    opener: Arc<dyn UrlOpener>,
    requester: Arc<dyn HttpRequester>,
}

impl ActionExecutor {
    pub fn new(opener: Arc<dyn UrlOpener>, requester: Arc<dyn HttpRequester>) -> Self {
        Self { opener, requester }
    }

    /// 执行按钮，相对地址基于 `base_url`；`http` 在后台任务中运行，需要 Tokio 运行时
    pub fn execute(&self, action: &Action, base_url: &str) -> Result<ActionOutcome, ActionError> {
        debug!(id = action.id(), kind = action.kind(), "executing user action");
        match action {
            Action::View(view) => self.view(view, base_url),
            Action::Http(http) => self.http(http, base_url),
        }
    }

    pub fn open(&self, url: Url) -> Url {
        info!(%url, "opening URL");
        self.opener.open(&url);
        url
    }

    fn view(&self, view: &ViewAction, base_url: &str) -> Result<ActionOutcome, ActionError> {
        let url = resolve_url(base_url, &view.url)?;
        Ok(ActionOutcome::Opened(self.open(url)))
    }

    fn http(&self, http: &HttpAction, base_url: &str) -> Result<ActionOutcome, ActionError> {
        let url = resolve_url(base_url, &http.url)?;
        let runtime = tokio::runtime::Handle::try_current().map_err(|e| {
            ActionError::HttpActionTransport {
                cause: e.to_string(),
            }
        })?;

        let requester = Arc::clone(&self.requester);
        let id = http.id.clone();
        let method = http.method.clone();
        let headers = http.headers.clone();
        let body = http.body.clone();

        let handle = runtime.spawn(async move {
            match requester.request(&method, &url, &headers, body.as_deref()).await {
                Ok(status) if (200..300).contains(&status) => {
                    info!(id = %id, %method, %url, status, "http action succeeded");
                    Ok(status)
                }
                Ok(status) => {
                    let err = ActionError::HttpActionFailed { status };
                    warn!(id = %id, %method, %url, error = %err, "http action failed");
                    Err(err)
                }
                Err(e) => {
                    let err = ActionError::HttpActionTransport { cause: e.to_string() };
                    warn!(id = %id, %method, %url, error = %err, "http action failed");
                    Err(err)
                }
            }
        });

        Ok(ActionOutcome::Dispatched(handle))
    }
}

/// 解析 URL，相对地址基于订阅的服务器地址
pub fn resolve_url(base_url: &str, raw: &str) -> Result<Url, ActionError> {
    let invalid = |reason: String| ActionError::InvalidUrl {
        url: raw.to_string(),
        reason,
    };

    if raw.trim().is_empty() {
        return Err(invalid("empty URL".to_string()));
    }

    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(base_url)
            .and_then(|base| base.join(raw))
            .map_err(|e| invalid(e.to_string())),
        Err(e) => Err(invalid(e.to_string())),
    }
}
