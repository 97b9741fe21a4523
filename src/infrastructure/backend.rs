use crate::domain::ports::{SubscriptionBackend, SubscriptionStoreBox};
use crate::domain::replacement::{
    ChallengeDescriptor, ProcessorError, ReplacementRequest, ReplacementResponse,
    UpdatedPaymentMethod,
};
use crate::domain::subscription::{StoredPaymentMethod, Subscription};
use crate::error::{Result, UpdaterError};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::{debug, info};

pub const AUTHENTICATION_REQUIRED: &str = "Your card requires authentication";

/// How the simulated processor answers a replacement.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ProcessorPolicy {
    #[default]
    Accept,
    /// Refuse the card outright, without a challenge.
    Decline { message: String },
    /// Attach the card but require a client-side verification first.
    RequireChallenge { secret: String },
    /// The API cannot be reached.
    Unavailable,
}

/// A subscription backend running against a local [`SubscriptionStore`].
///
/// [`SubscriptionStore`]: crate::domain::ports::SubscriptionStore
pub struct LocalSubscriptionBackend {
    store: SubscriptionStoreBox,
    policy: ProcessorPolicy,
    next_payment_method_id: AtomicU64,
    replacements: AtomicUsize,
}

impl LocalSubscriptionBackend {
    pub fn new(store: SubscriptionStoreBox, policy: ProcessorPolicy) -> Self {
        Self {
            store,
            policy,
            next_payment_method_id: AtomicU64::new(1),
            replacements: AtomicUsize::new(0),
        }
    }

    /// Inserts or overwrites a subscription.
    pub async fn seed(&self, subscription: Subscription) -> Result<()> {
        self.store.store(subscription).await
    }

    /// Number of replacement requests received, successful or not.
    pub fn replacements(&self) -> usize {
        self.replacements.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SubscriptionBackend for LocalSubscriptionBackend {
    async fn replace(&self, request: ReplacementRequest) -> Result<ReplacementResponse> {
        self.replacements.fetch_add(1, Ordering::SeqCst);

        if self.policy == ProcessorPolicy::Unavailable {
            return Err(UpdaterError::Transport("payment API unavailable".to_string()));
        }

        let mut subscription = self
            .store
            .get(request.id)
            .await?
            .ok_or_else(|| UpdaterError::NotFound(format!("order {}", request.id)))?;

        if subscription.from_collective_id != request.collective_id {
            return Err(UpdaterError::ValidationError(format!(
                "order {} does not belong to collective {}",
                request.id, request.collective_id
            )));
        }

        let processor_error = match &self.policy {
            ProcessorPolicy::Decline { message } => {
                debug!(order = %request.id, "processor declined card");
                return Ok(ReplacementResponse {
                    payment_method: None,
                    processor_error: Some(ProcessorError {
                        message: message.clone(),
                        response: None,
                    }),
                });
            }
            ProcessorPolicy::RequireChallenge { secret } => Some(ProcessorError {
                message: AUTHENTICATION_REQUIRED.to_string(),
                response: Some(ChallengeDescriptor {
                    setup_challenge_secret: secret.clone(),
                }),
            }),
            _ => None,
        };

        let method = StoredPaymentMethod {
            id: self.next_payment_method_id.fetch_add(1, Ordering::SeqCst),
            name: request.name,
            token: request.token,
            data: request.data,
            created_at: Utc::now(),
        };
        let updated = UpdatedPaymentMethod::from(&method);
        subscription.payment_method = Some(method);
        self.store.store(subscription).await?;
        info!(order = %request.id, payment_method = updated.id, "payment method attached");

        Ok(ReplacementResponse {
            payment_method: Some(updated),
            processor_error,
        })
    }

    async fn subscriptions(&self, slug: &str) -> Result<Vec<Subscription>> {
        self.store.for_collective(slug).await
    }
}
