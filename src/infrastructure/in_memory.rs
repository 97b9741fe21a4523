use crate::domain::ports::SubscriptionStore;
use crate::domain::replacement::RecordId;
use crate::domain::subscription::Subscription;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for subscriptions.
///
/// Uses `Arc<RwLock<BTreeMap<RecordId, Subscription>>>` so listings come back in id order.
#[derive(Default, Clone)]
pub struct InMemorySubscriptionStore {
    subscriptions: Arc<RwLock<BTreeMap<RecordId, Subscription>>>,
}

impl InMemorySubscriptionStore {
    /// Creates a new, empty in-memory subscription store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SubscriptionStore for InMemorySubscriptionStore {
    async fn store(&self, subscription: Subscription) -> Result<()> {
        let mut subscriptions = self.subscriptions.write().await;
        subscriptions.insert(subscription.id, subscription);
        Ok(())
    }

    async fn get(&self, id: RecordId) -> Result<Option<Subscription>> {
        let subscriptions = self.subscriptions.read().await;
        Ok(subscriptions.get(&id).cloned())
    }

    async fn for_collective(&self, slug: &str) -> Result<Vec<Subscription>> {
        let subscriptions = self.subscriptions.read().await;
        Ok(subscriptions
            .values()
            .filter(|sub| sub.from_collective_slug == slug)
            .cloned()
            .collect())
    }
}
