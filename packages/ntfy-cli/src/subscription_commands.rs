use crate::store::JsonFileStore;
use anyhow::Result;
use clap::Subcommand;
use ntfy_core::Subscription;

#[derive(Subcommand)]
pub enum SubscriptionAction {
    /// List stored subscriptions
    List,
    /// Subscribe to a topic
    Add {
        /// Server base URL
        base_url: String,
        /// Topic name
        topic: String,
    },
    /// Unsubscribe from a topic
    Remove {
        /// Server base URL
        base_url: String,
        /// Topic name
        topic: String,
    },
}

pub fn handle_subscription_command(store: &JsonFileStore, action: SubscriptionAction) -> Result<()> {
    match action {
        SubscriptionAction::List => {
            let subscriptions = store.load()?;
            println!("📚 Subscriptions ({} total):", subscriptions.len());
            for (i, subscription) in subscriptions.iter().enumerate() {
                match &subscription.last_message_id {
                    Some(id) => println!("  {}. {} (since {})", i + 1, subscription.topic_url(), id),
                    None => println!("  {}. {}", i + 1, subscription.topic_url()),
                }
            }
        }
        SubscriptionAction::Add { base_url, topic } => {
            let subscription = Subscription::new(&base_url, &topic);
            let topic_url = subscription.topic_url();
            if store.add(subscription)? {
                println!("✅ Subscribed to {}", topic_url);
            } else {
                println!("ℹ️  Already subscribed to {}", topic_url);
            }
        }
        SubscriptionAction::Remove { base_url, topic } => {
            if store.remove(&base_url, &topic)? {
                println!("🗑️  Unsubscribed from {}/{}", base_url.trim_end_matches('/'), topic);
            } else {
                println!("❌ No subscription for {}/{}", base_url.trim_end_matches('/'), topic);
            }
        }
    }
    Ok(())
}
