use super::workflow::{PaymentMethodReplacementWorkflow, WorkflowConfig};
use crate::domain::ports::{DataRefresh, SubscriptionBackendBox};
use crate::domain::replacement::ReplacementContext;
use crate::domain::subscription::active_collective_names;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::RwLock;
use tracing::debug;

/// Cached names of the collectives a backer is actively supporting.
///
/// Doubles as the workflow's refresh hook: a successful replacement reloads it.
pub struct SubscriptionsView {
    backend: SubscriptionBackendBox,
    slug: String,
    names: RwLock<Vec<String>>,
    loads: AtomicUsize,
}

impl SubscriptionsView {
    pub fn new(backend: SubscriptionBackendBox, slug: impl Into<String>) -> Self {
        Self {
            backend,
            slug: slug.into(),
            names: RwLock::new(Vec::new()),
            loads: AtomicUsize::new(0),
        }
    }

    pub async fn load(&self) -> Result<()> {
        let subscriptions = self.backend.subscriptions(&self.slug).await?;
        let names = active_collective_names(&subscriptions);
        debug!(slug = %self.slug, active = names.len(), "loaded subscriptions");
        *self.names.write().await = names;
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    pub async fn names(&self) -> Vec<String> {
        self.names.read().await.clone()
    }

    /// Number of completed loads, including the initial one.
    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub async fn subtitle(&self) -> String {
        format!(
            "Add a new payment method for your recurring subscriptions ({}) before your current one expires.",
            self.names.read().await.join(", ")
        )
    }
}

#[async_trait]
impl DataRefresh for SubscriptionsView {
    async fn refetch(&self) -> Result<()> {
        self.load().await
    }
}

/// The "update payment method" page: subscription list plus the replacement form.
pub struct UpdatePaymentMethodPage {
    pub subscriptions: Arc<SubscriptionsView>,
    pub workflow: PaymentMethodReplacementWorkflow,
}

impl UpdatePaymentMethodPage {
    /// Loads the backer's subscriptions and wires the workflow to refresh them.
    pub async fn open(
        slug: &str,
        context: ReplacementContext,
        backend: SubscriptionBackendBox,
        config: WorkflowConfig,
    ) -> Result<Self> {
        let subscriptions = Arc::new(SubscriptionsView::new(backend.clone(), slug));
        subscriptions.load().await?;

        let workflow =
            PaymentMethodReplacementWorkflow::new(context, backend, subscriptions.clone(), config);

        Ok(Self {
            subscriptions,
            workflow,
        })
    }
}
