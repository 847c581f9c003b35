pub mod builder;
pub mod collaborators;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod executor;
pub mod navigation;
pub mod router;

pub use builder::NotificationBuilder;
pub use collaborators::{HttpRequester, MessageFetcher, NotificationDisplay, SubscriptionStore, UrlOpener};
pub use config::ClientConfig;
pub use dispatcher::{PollDispatcher, PollResult};
pub use error::{ActionError, FetchError, InteractionError};
pub use executor::{ActionExecutor, ActionOutcome, resolve_url};
pub use navigation::{NavigationReceiver, NavigationSender, SelectedSubscription};
pub use router::{InteractionOutcome, TapRouter};

#[cfg(test)]
pub(crate) mod test_support;
