use super::card::CardFields;
use super::payment_method::CardToken;
use super::replacement::{ChallengeStatus, RecordId, ReplacementRequest, ReplacementResponse};
use super::subscription::Subscription;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Turns raw card details into processor tokens and drives verification challenges.
#[async_trait]
pub trait PaymentTokenizer: Send + Sync {
    /// `Err` carries the processor's own explanation.
    async fn create_token(&self, card: &CardFields) -> Result<CardToken>;
    async fn verify_challenge(&self, secret: &str) -> Result<ChallengeStatus>;
}

#[async_trait]
pub trait SubscriptionBackend: Send + Sync {
    /// `Err` means the request itself failed; processor refusals come back
    /// inside an `Ok` response.
    async fn replace(&self, request: ReplacementRequest) -> Result<ReplacementResponse>;
    async fn subscriptions(&self, slug: &str) -> Result<Vec<Subscription>>;
}

/// Asks the surrounding page to reload subscription-derived data.
#[async_trait]
pub trait DataRefresh: Send + Sync {
    async fn refetch(&self) -> Result<()>;
}

#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn store(&self, subscription: Subscription) -> Result<()>;
    async fn get(&self, id: RecordId) -> Result<Option<Subscription>>;
    async fn for_collective(&self, slug: &str) -> Result<Vec<Subscription>>;
}

pub type TokenizerBox = Arc<dyn PaymentTokenizer>;
pub type SubscriptionBackendBox = Arc<dyn SubscriptionBackend>;
pub type DataRefreshBox = Arc<dyn DataRefresh>;
pub type SubscriptionStoreBox = Box<dyn SubscriptionStore>;
