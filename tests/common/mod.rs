#![allow(dead_code)]

pub mod scenarios;

use async_trait::async_trait;
use payment_method_updater::application::workflow::{
    PaymentMethodReplacementWorkflow, WorkflowConfig,
};
use payment_method_updater::domain::card::{CardFields, CardInput};
use payment_method_updater::domain::payment_method::{CardToken, TokenizedCard};
use payment_method_updater::domain::ports::{DataRefresh, PaymentTokenizer, SubscriptionBackend};
use payment_method_updater::domain::replacement::{
    ChallengeDescriptor, ChallengeStatus, ProcessorError, ReplacementContext, ReplacementRequest,
    ReplacementResponse,
};
use payment_method_updater::domain::subscription::Subscription;
use payment_method_updater::error::{Result, UpdaterError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn valid_card() -> CardFields {
    CardFields {
        number: "4242 4242 4242 4242".to_string(),
        exp_month: 12,
        exp_year: 2034,
        cvc: "123".to_string(),
        holder_name: Some("Jane Doe".to_string()),
        postal_code: None,
    }
}

/// Blocks a fake call until the test releases it.
#[derive(Default)]
pub struct Gate {
    pub entered: Notify,
    pub release: Notify,
}

impl Gate {
    async fn pass(&self) {
        self.entered.notify_one();
        self.release.notified().await;
    }
}

#[derive(Default)]
pub struct FakeTokenizer {
    pub token_error: Option<String>,
    pub verify_outcomes: Mutex<VecDeque<std::result::Result<ChallengeStatus, String>>>,
    pub token_gate: Option<Arc<Gate>>,
    pub verify_gate: Option<Arc<Gate>>,
    pub create_calls: AtomicUsize,
    pub verify_calls: AtomicUsize,
    pub secrets: Mutex<Vec<String>>,
}

impl FakeTokenizer {
    pub fn failing(message: &str) -> Self {
        Self {
            token_error: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn verifying(outcomes: Vec<std::result::Result<ChallengeStatus, String>>) -> Self {
        Self {
            verify_outcomes: Mutex::new(outcomes.into()),
            ..Default::default()
        }
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PaymentTokenizer for FakeTokenizer {
    async fn create_token(&self, card: &CardFields) -> Result<CardToken> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.token_gate {
            gate.pass().await;
        }
        if let Some(message) = &self.token_error {
            return Err(UpdaterError::Tokenizer(message.clone()));
        }
        Ok(CardToken {
            id: format!("tok_{}", self.create_calls()),
            card: TokenizedCard {
                name: card.holder_name.clone(),
                brand: "Visa".to_string(),
                last4: card.last4(),
                exp_month: card.exp_month,
                exp_year: card.exp_year,
                country: Some("US".to_string()),
                funding: Some("credit".to_string()),
                address_zip: None,
                fingerprint: None,
            },
        })
    }

    async fn verify_challenge(&self, secret: &str) -> Result<ChallengeStatus> {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.secrets.lock().unwrap().push(secret.to_string());
        if let Some(gate) = &self.verify_gate {
            gate.pass().await;
        }
        let next = self.verify_outcomes.lock().unwrap().pop_front();
        match next {
            Some(Ok(status)) => Ok(status),
            Some(Err(message)) => Err(UpdaterError::Challenge(message)),
            None => Ok(ChallengeStatus::Succeeded),
        }
    }
}

/// Backend answering from a queue of scripted responses; accepts when empty.
#[derive(Default)]
pub struct FakeBackend {
    pub responses: Mutex<VecDeque<std::result::Result<ReplacementResponse, String>>>,
    pub requests: Mutex<Vec<ReplacementRequest>>,
    pub subscriptions: Vec<Subscription>,
    pub gate: Option<Arc<Gate>>,
}

impl FakeBackend {
    pub fn scripted(responses: Vec<std::result::Result<ReplacementResponse, String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

pub fn accepted() -> ReplacementResponse {
    ReplacementResponse {
        payment_method: None,
        processor_error: None,
    }
}

pub fn challenge(secret: &str) -> ReplacementResponse {
    ReplacementResponse {
        payment_method: None,
        processor_error: Some(ProcessorError {
            message: "Your card requires authentication".to_string(),
            response: Some(ChallengeDescriptor {
                setup_challenge_secret: secret.to_string(),
            }),
        }),
    }
}

pub fn declined(message: &str) -> ReplacementResponse {
    ReplacementResponse {
        payment_method: None,
        processor_error: Some(ProcessorError {
            message: message.to_string(),
            response: None,
        }),
    }
}

#[async_trait]
impl SubscriptionBackend for FakeBackend {
    async fn replace(&self, request: ReplacementRequest) -> Result<ReplacementResponse> {
        self.requests.lock().unwrap().push(request);
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(UpdaterError::Transport(message)),
            None => Ok(accepted()),
        }
    }

    async fn subscriptions(&self, _slug: &str) -> Result<Vec<Subscription>> {
        Ok(self.subscriptions.clone())
    }
}

#[derive(Default)]
pub struct RecordingRefresh {
    pub calls: AtomicUsize,
    pub error: Option<String>,
}

impl RecordingRefresh {
    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataRefresh for RecordingRefresh {
    async fn refetch(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.error {
            Some(message) => Err(UpdaterError::Transport(message.clone())),
            None => Ok(()),
        }
    }
}

pub struct Harness {
    pub workflow: Arc<PaymentMethodReplacementWorkflow>,
    pub tokenizer: Arc<FakeTokenizer>,
    pub backend: Arc<FakeBackend>,
    pub refresh: Arc<RecordingRefresh>,
}

impl Harness {
    /// Workflow for collective 7 replacing order 42, tokenizer ready, valid card entered.
    pub async fn ready(tokenizer: FakeTokenizer, backend: FakeBackend) -> Self {
        let harness = Self::bare(tokenizer, backend, WorkflowConfig::default());
        harness
            .workflow
            .on_tokenizer_ready(harness.tokenizer.clone())
            .await;
        harness
            .workflow
            .on_card_change(CardInput::Value(valid_card()))
            .await;
        harness
    }

    /// Workflow with no tokenizer and no card input.
    pub fn bare(tokenizer: FakeTokenizer, backend: FakeBackend, config: WorkflowConfig) -> Self {
        Self::with_refresh(tokenizer, backend, RecordingRefresh::default(), config)
    }

    pub fn with_refresh(
        tokenizer: FakeTokenizer,
        backend: FakeBackend,
        refresh: RecordingRefresh,
        config: WorkflowConfig,
    ) -> Self {
        let tokenizer = Arc::new(tokenizer);
        let backend = Arc::new(backend);
        let refresh = Arc::new(refresh);
        let context = ReplacementContext::parse(7, "42").unwrap();
        let workflow = Arc::new(PaymentMethodReplacementWorkflow::new(
            context,
            backend.clone(),
            refresh.clone(),
            config,
        ));
        Self {
            workflow,
            tokenizer,
            backend,
            refresh,
        }
    }
}
