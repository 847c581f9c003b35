use crate::config::ClientConfig;
use crate::error::{ActionError, InteractionError};
use crate::executor::{ActionExecutor, ActionOutcome, resolve_url};
use crate::navigation::NavigationSender;
use ntfy_core::{Message, Payload};
use tracing::{debug, warn};
use url::Url;

/// 一次通知交互的处理结果，执行按钮与跳转链接最多发生其一
#[derive(Debug)]
pub enum InteractionOutcome {
    ActionExecuted { action_id: String, outcome: ActionOutcome },
    ActionFailed { action_id: String, error: ActionError },
    Navigated(Url),
    NoOp,
    Swallowed(InteractionError),
}

/// 用户点击通知或通知按钮后的路由
pub struct TapRouter {
    executor: ActionExecutor,
    navigation: NavigationSender,
    default_base_url: String,
}

impl TapRouter {
    pub fn new(executor: ActionExecutor, navigation: NavigationSender, config: &ClientConfig) -> Self {
        Self {
            executor,
            navigation,
            default_base_url: config.default_base_url.clone(),
        }
    }

    /// 处理通知点击，无论结果如何都只调用一次 `completion`
    pub fn on_notification_interaction<F>(
        &self,
        metadata: &Payload,
        tapped_action_id: Option<&str>,
        completion: F,
    ) -> InteractionOutcome
    where
        F: FnOnce(),
    {
        let outcome = self.route(metadata, tapped_action_id);
        completion();
        outcome
    }

    fn route(&self, metadata: &Payload, tapped_action_id: Option<&str>) -> InteractionOutcome {
        debug!(?tapped_action_id, "notification interaction received");

        let message = match Message::from_metadata(metadata) {
            Ok(message) => message,
            Err(err) => {
                let err = InteractionError::from(err);
                warn!(error = %err, "dropping notification interaction");
                return InteractionOutcome::Swallowed(err);
            }
        };

        let base_url = message
            .base_url
            .clone()
            .unwrap_or_else(|| self.default_base_url.clone());

        self.navigation.select(&base_url, &message.topic);

        let action = tapped_action_id.and_then(|id| {
            let action = message.find_action(id);
            if action.is_none() {
                debug!(action_id = id, "tapped action not found, falling back to click URL");
            }
            action
        });

        if let Some(action) = action {
            let action_id = action.id().to_string();
            return match self.executor.execute(&action, &base_url) {
                Ok(outcome) => InteractionOutcome::ActionExecuted { action_id, outcome },
                Err(error) => {
                    warn!(action_id = %action_id, error = %error, "unable to execute action");
                    InteractionOutcome::ActionFailed { action_id, error }
                }
            };
        }

        if let Some(click) = message.click.as_deref() {
            return match resolve_url(&base_url, click) {
                Ok(url) => InteractionOutcome::Navigated(self.executor.open(url)),
                Err(err) => {
                    warn!(error = %err, "unable to open click URL");
                    InteractionOutcome::NoOp
                }
            };
        }

        InteractionOutcome::NoOp
    }
}
