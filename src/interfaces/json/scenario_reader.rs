use crate::domain::card::CardInput;
use crate::domain::replacement::{CollectiveId, ReplacementContext};
use crate::domain::subscription::Subscription;
use crate::error::Result;
use crate::infrastructure::backend::ProcessorPolicy;
use crate::infrastructure::tokenizer::ChallengeBehavior;
use serde::Deserialize;
use std::io::Read;

fn default_true() -> bool {
    true
}

/// One simulated visit to the update page.
#[derive(Debug, Deserialize)]
pub struct Scenario {
    pub collective_id: CollectiveId,
    pub collective_slug: String,
    /// Order id exactly as it appears in the page URL.
    pub record_id: String,
    #[serde(default = "default_true")]
    pub tokenizer_ready: bool,
    #[serde(default)]
    pub card: CardInput,
    /// Corrected card inputs, each submitted after a failed attempt.
    #[serde(default)]
    pub retries: Vec<CardInput>,
    #[serde(default)]
    pub processor: ProcessorPolicy,
    #[serde(default)]
    pub challenge: ChallengeBehavior,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

impl Scenario {
    pub fn context(&self) -> Result<ReplacementContext> {
        ReplacementContext::parse(self.collective_id, &self.record_id)
    }
}

/// Reads a [`Scenario`] from a JSON source.
pub struct ScenarioReader<R: Read> {
    source: R,
}

impl<R: Read> ScenarioReader<R> {
    /// Creates a new `ScenarioReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        Self { source }
    }

    pub fn read(self) -> Result<Scenario> {
        Ok(serde_json::from_reader(self.source)?)
    }
}
