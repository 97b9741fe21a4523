use crate::domain::card::CardInput;
use crate::domain::payment_method::PaymentMethodToken;
use crate::domain::ports::{DataRefreshBox, SubscriptionBackendBox, TokenizerBox};
use crate::domain::replacement::{
    ChallengeStatus, ProcessorError, ReplacementContext, ReplacementRequest,
};
use crate::domain::state::{Event, Phase, WorkflowState};
use crate::domain::view::FormView;
use crate::error::{Result, UpdaterError, WorkflowError};
use std::future::Future;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkflowConfig {
    /// Upper bound for each collaborator call. `None` waits indefinitely.
    pub call_timeout: Option<Duration>,
}

/// Outcome of a user-initiated operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The attempt ran; carries the state it ended in.
    Accepted(WorkflowState),
    /// The workflow was not in a phase that allows the operation. Nothing was called.
    Ignored(WorkflowState),
}

impl Submission {
    pub fn state(&self) -> &WorkflowState {
        match self {
            Submission::Accepted(state) | Submission::Ignored(state) => state,
        }
    }

    pub fn is_ignored(&self) -> bool {
        matches!(self, Submission::Ignored(_))
    }
}

#[derive(Default)]
struct Session {
    state: WorkflowState,
    card: CardInput,
    tokenizer: Option<TokenizerBox>,
    /// Secret of a challenge whose verification came back pending.
    pending_secret: Option<String>,
}

impl Session {
    fn apply(&mut self, event: Event) -> &WorkflowState {
        match self.state.transition(event) {
            Ok(next) => {
                debug!(from = ?self.state.phase(), to = ?next.phase(), "phase transition");
                self.state = next;
            }
            Err(e) => warn!(error = %e, "illegal transition ignored"),
        }
        &self.state
    }
}

/// Replaces the card attached to one recurring subscription.
///
/// Collect card input, tokenize it, submit the replacement, and complete a
/// verification challenge when the processor asks for one. Only one attempt
/// may be in flight; submissions arriving meanwhile are ignored. The state
/// lock is never held across a collaborator call.
pub struct PaymentMethodReplacementWorkflow {
    context: ReplacementContext,
    backend: SubscriptionBackendBox,
    refresh: DataRefreshBox,
    config: WorkflowConfig,
    session: RwLock<Session>,
}

impl PaymentMethodReplacementWorkflow {
    pub fn new(
        context: ReplacementContext,
        backend: SubscriptionBackendBox,
        refresh: DataRefreshBox,
        config: WorkflowConfig,
    ) -> Self {
        Self {
            context,
            backend,
            refresh,
            config,
            session: RwLock::new(Session::default()),
        }
    }

    pub fn context(&self) -> &ReplacementContext {
        &self.context
    }

    pub async fn state(&self) -> WorkflowState {
        self.session.read().await.state.clone()
    }

    pub async fn view(&self) -> FormView {
        FormView::from(&self.session.read().await.state)
    }

    /// Stores the latest card input. Editing after a failure returns the form
    /// to `Collecting` and clears the message.
    pub async fn on_card_change(&self, input: CardInput) {
        let mut session = self.session.write().await;
        session.card = input;
        if session.state.phase() == Phase::Failed {
            session.apply(Event::Reset);
        }
    }

    pub async fn on_tokenizer_ready(&self, tokenizer: TokenizerBox) {
        debug!("tokenizer ready");
        self.session.write().await.tokenizer = Some(tokenizer);
    }

    /// Explicit reset from `Failed` back to `Collecting`.
    pub async fn retry(&self) -> Submission {
        let mut session = self.session.write().await;
        if session.state.phase() != Phase::Failed {
            return Submission::Ignored(session.state.clone());
        }
        Submission::Accepted(session.apply(Event::Reset).clone())
    }

    #[instrument(skip(self), fields(record_id = %self.context.record_id))]
    pub async fn submit(&self) -> Submission {
        let (card, tokenizer) = {
            let mut session = self.session.write().await;
            let phase = session.state.phase();
            if !matches!(phase, Phase::Collecting | Phase::Failed) {
                debug!(?phase, "submission ignored");
                return Submission::Ignored(session.state.clone());
            }

            let ready = match (&session.card, &session.tokenizer) {
                (CardInput::Value(card), Some(tokenizer)) => Ok((card.clone(), tokenizer.clone())),
                (CardInput::Invalid(message), Some(_)) => {
                    Err(WorkflowError::Initialization(message.clone()))
                }
                _ => Err(WorkflowError::uninitialized()),
            };
            match ready {
                Ok(ready) => {
                    session.apply(Event::Begin);
                    ready
                }
                Err(e) => {
                    warn!(error = %e, "payment form not ready");
                    return Submission::Accepted(session.apply(Event::Fail(e.to_string())).clone());
                }
            }
        };

        let token = match self.bounded(tokenizer.create_token(&card)).await {
            Ok(token) => token,
            Err(e) => return self.fail(WorkflowError::Tokenization(e.to_string())).await,
        };

        let request = ReplacementRequest::new(&self.context, PaymentMethodToken::from(token));
        info!(
            collective_id = request.collective_id,
            last4 = %request.name,
            "submitting replacement"
        );

        let response = match self.bounded(self.backend.replace(request)).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "replacement request failed");
                return self.fail(WorkflowError::Transport).await;
            }
        };

        match response.processor_error {
            None => self.succeed().await,
            Some(processor_error) => self.handle_challenge(tokenizer, processor_error).await,
        }
    }

    /// Re-checks a challenge whose verification was still pending.
    #[instrument(skip(self), fields(record_id = %self.context.record_id))]
    pub async fn resume_challenge(&self) -> Submission {
        let (tokenizer, secret) = {
            let mut session = self.session.write().await;
            if session.state.phase() != Phase::AwaitingChallenge {
                return Submission::Ignored(session.state.clone());
            }
            match (session.tokenizer.clone(), session.pending_secret.take()) {
                (Some(tokenizer), Some(secret)) => (tokenizer, secret),
                (_, secret) => {
                    // Verification already running.
                    session.pending_secret = secret;
                    return Submission::Ignored(session.state.clone());
                }
            }
        };
        self.verify(tokenizer, secret).await
    }

    async fn handle_challenge(
        &self,
        tokenizer: TokenizerBox,
        processor_error: ProcessorError,
    ) -> Submission {
        let secret = processor_error
            .response
            .map(|challenge| challenge.setup_challenge_secret)
            .filter(|secret| !secret.is_empty());
        let Some(secret) = secret else {
            return self
                .fail(WorkflowError::Challenge(processor_error.message))
                .await;
        };

        info!(reason = %processor_error.message, "processor requested verification");
        self.session.write().await.apply(Event::Challenge);
        self.verify(tokenizer, secret).await
    }

    async fn verify(&self, tokenizer: TokenizerBox, secret: String) -> Submission {
        match self.bounded(tokenizer.verify_challenge(&secret)).await {
            Ok(ChallengeStatus::Succeeded) => self.succeed().await,
            Ok(ChallengeStatus::Pending(status)) => {
                info!(%status, "verification pending");
                let mut session = self.session.write().await;
                session.pending_secret = Some(secret);
                Submission::Accepted(session.state.clone())
            }
            Err(e) => self.fail(WorkflowError::Challenge(e.to_string())).await,
        }
    }

    async fn succeed(&self) -> Submission {
        let state = {
            let mut session = self.session.write().await;
            session.card = CardInput::Empty;
            session.pending_secret = None;
            session.apply(Event::Succeed).clone()
        };
        info!("payment method replaced");

        if let Err(e) = self.refresh.refetch().await {
            warn!(error = %e, "failed to refresh subscriptions");
        }
        Submission::Accepted(state)
    }

    async fn fail(&self, error: WorkflowError) -> Submission {
        warn!(%error, "replacement failed");
        let mut session = self.session.write().await;
        session.pending_secret = None;
        Submission::Accepted(session.apply(Event::Fail(error.to_string())).clone())
    }

    async fn bounded<T>(&self, call: impl Future<Output = Result<T>>) -> Result<T> {
        match self.config.call_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| UpdaterError::Timeout(limit))?,
            None => call.await,
        }
    }
}
