use clap::{Parser, Subcommand};
use ntfy_client::{
    ActionExecutor, ActionOutcome, ClientConfig, InteractionOutcome, NotificationBuilder,
    NotificationDisplay, PollDispatcher, TapRouter, navigation,
};
use ntfy_core::{Message, POLL_TOPIC, Payload, Subscription};
use ntfy_sdk::{NtfyClient, StreamEvent};
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use crate::cursor::CursorFetcher;
use crate::store::JsonFileStore;
use crate::terminal::{PrintOpener, TerminalDisplay};

mod cursor;
mod store;
mod subscription_commands;
mod terminal;

#[derive(Parser)]
#[command(name = "ntfy-cli")]
#[command(about = "ntfy poll-and-dispatch client")]
struct Cli {
    /// Subscription store file
    #[arg(long, env = "NTFY_STORE", default_value = "subscriptions.json")]
    store: String,

    /// Bearer token for fetching messages
    #[arg(long, env = "NTFY_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage subscriptions
    Subscriptions {
        #[command(subcommand)]
        action: subscription_commands::SubscriptionAction,
    },
    /// Handle a poll trigger: fetch new messages for every subscription
    Poll {
        /// Trigger topic, anything but the poll topic is ignored
        #[arg(long, default_value = POLL_TOPIC)]
        topic: String,
        /// Print notifications as JSON lines
        #[arg(long)]
        json: bool,
    },
    /// Handle a tap on a notification
    Tap {
        /// Notification metadata as a JSON object
        metadata: String,
        /// Id of the tapped action button
        #[arg(long)]
        action: Option<String>,
    },
    /// Listen for live messages on every subscription
    Listen {
        /// Print notifications as JSON lines
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = ClientConfig::from_env()?;
    let store = JsonFileStore::new(&cli.store);

    let mut client = NtfyClient::new().with_timeout(config.http_timeout);
    if let Some(token) = &cli.token {
        client.set_token(token);
    }

    match cli.command {
        Commands::Subscriptions { action } => {
            subscription_commands::handle_subscription_command(&store, action)?;
        }
        Commands::Poll { topic, json } => {
            let fetcher = Arc::new(CursorFetcher::new(client, store.clone()));
            let display = Arc::new(TerminalDisplay::new(json));
            let dispatcher = PollDispatcher::new(Arc::new(store), fetcher, display, &config);
            let trigger = Payload::new().with("topic", topic);

            dispatcher
                .on_poll_trigger(&trigger, |result| {
                    eprintln!("📬 Poll finished: {:?}", result);
                })
                .await;
        }
        Commands::Tap { metadata, action } => {
            let metadata: Payload = serde_json::from_str(&metadata)?;
            let client = Arc::new(client);
            let executor = ActionExecutor::new(Arc::new(PrintOpener), client);
            let (tx, rx) = navigation::channel();
            let router = TapRouter::new(executor, tx, &config);

            let outcome = router.on_notification_interaction(&metadata, action.as_deref(), || {
                info!("notification interaction handled");
            });
            report_interaction(outcome).await;

            if let Some(selected) = rx.current() {
                println!("📍 Selected subscription: {}", selected.topic_url);
            }
        }
        Commands::Listen { json } => {
            let subscriptions = store.load()?;
            if subscriptions.is_empty() {
                println!("📭 No subscriptions, add one with `subscriptions add`");
                return Ok(());
            }

            println!("🎧 Listening on {} subscription(s)...", subscriptions.len());
            println!("   Press Ctrl+C to stop");

            let display = Arc::new(TerminalDisplay::new(json));
            let mut tasks = JoinSet::new();
            for subscription in subscriptions {
                tasks.spawn(listen(client.clone(), subscription, Arc::clone(&display)));
            }

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = async { while tasks.join_next().await.is_some() {} } => {}
            }
            tasks.abort_all();
            println!("👋 Stopped after {} notification(s)", display.shown());
        }
    }

    Ok(())
}

async fn report_interaction(outcome: InteractionOutcome) {
    match outcome {
        InteractionOutcome::ActionExecuted { action_id, outcome } => match outcome {
            ActionOutcome::Opened(url) => println!("✅ Action {} opened {}", action_id, url),
            ActionOutcome::Dispatched(handle) => match handle.await {
                Ok(Ok(status)) => println!("✅ Action {} succeeded ({})", action_id, status),
                Ok(Err(e)) => eprintln!("❌ Action {} failed: {}", action_id, e),
                Err(e) => eprintln!("❌ Action {} did not complete: {}", action_id, e),
            },
        },
        InteractionOutcome::ActionFailed { action_id, error } => {
            eprintln!("❌ Action {} failed: {}", action_id, error);
        }
        InteractionOutcome::Navigated(url) => println!("✅ Navigated to {}", url),
        InteractionOutcome::NoOp => println!("ℹ️  Nothing to do"),
        InteractionOutcome::Swallowed(e) => eprintln!("❌ {}", e),
    }
}

async fn listen(client: NtfyClient, subscription: Subscription, display: Arc<TerminalDisplay>) {
    let topic_url = subscription.topic_url();
    let mut rx = match client.subscribe(&subscription).await {
        Ok(rx) => rx,
        Err(e) => {
            warn!(topic_url = %topic_url, error = %e, "failed to subscribe");
            return;
        }
    };

    while let Some(event) = rx.recv().await {
        match event {
            StreamEvent::Open => info!(topic_url = %topic_url, "subscription open"),
            StreamEvent::Keepalive => {}
            StreamEvent::Message(payload) => match Message::parse(&payload) {
                Ok(message) => {
                    let request = NotificationBuilder::build(&subscription, &message);
                    if let Err(e) = display.present(request).await {
                        warn!(error = %e, "unable to display notification");
                    }
                }
                Err(e) => warn!(topic_url = %topic_url, error = %e, "skipping unparsable message"),
            },
            StreamEvent::Closed => {
                info!(topic_url = %topic_url, "subscription closed");
                break;
            }
            StreamEvent::Error { message } => {
                warn!(topic_url = %topic_url, error = %message, "subscription error");
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_store() {
        let cli = Cli::try_parse_from(["ntfy-cli", "poll"]).unwrap();
        assert_eq!(cli.store, "subscriptions.json");
        match cli.command {
            Commands::Poll { topic, json } => {
                assert_eq!(topic, "~poll");
                assert!(!json);
            }
            _ => panic!("Expected Poll command"),
        }
    }

    #[test]
    fn test_tap_command_parsing() {
        let args = [
            "ntfy-cli",
            "--store",
            "/tmp/subs.json",
            "tap",
            r#"{"id":"m1","topic":"alerts"}"#,
            "--action",
            "a2",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.store, "/tmp/subs.json");
        match cli.command {
            Commands::Tap { metadata, action } => {
                let metadata: Payload = serde_json::from_str(&metadata).unwrap();
                assert_eq!(metadata.get("id"), Some("m1"));
                assert_eq!(action.as_deref(), Some("a2"));
            }
            _ => panic!("Expected Tap command"),
        }
    }

    #[test]
    fn test_subscription_commands_parsing() {
        let cli = Cli::try_parse_from(["ntfy-cli", "subscriptions", "add", "https://ntfy.sh", "alerts"]).unwrap();
        match cli.command {
            Commands::Subscriptions {
                action: subscription_commands::SubscriptionAction::Add { base_url, topic },
            } => {
                assert_eq!(base_url, "https://ntfy.sh");
                assert_eq!(topic, "alerts");
            }
            _ => panic!("Expected Subscriptions Add command"),
        }
    }

    #[test]
    fn test_all_commands_exist() {
        let commands = vec![
            vec!["ntfy-cli", "subscriptions", "list"],
            vec!["ntfy-cli", "subscriptions", "remove", "https://ntfy.sh", "alerts"],
            vec!["ntfy-cli", "poll", "--topic", "other", "--json"],
            vec!["ntfy-cli", "tap", "{}"],
            vec!["ntfy-cli", "listen"],
        ];

        for args in commands {
            let result = Cli::try_parse_from(args.clone());
            assert!(result.is_ok(), "Failed to parse: {:?}", args);
        }
    }

    #[test]
    fn test_tap_requires_metadata() {
        assert!(Cli::try_parse_from(["ntfy-cli", "tap"]).is_err());
    }
}
