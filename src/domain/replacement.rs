use super::payment_method::{CardData, PaymentMethodToken};
use crate::error::UpdaterError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Id of the collective whose payment method is being replaced.
pub type CollectiveId = u64;

/// Id of the order (recurring subscription) receiving the new payment method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub u64);

impl FromStr for RecordId {
    type Err = UpdaterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| UpdaterError::ValidationError(format!("invalid record id: {s:?}")))
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Everything the workflow needs to know about who is replacing what.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacementContext {
    pub collective_id: CollectiveId,
    pub record_id: RecordId,
}

impl ReplacementContext {
    /// Builds a context from a raw record id as found in the page URL.
    pub fn parse(collective_id: CollectiveId, record_id: &str) -> Result<Self, UpdaterError> {
        Ok(Self {
            collective_id,
            record_id: record_id.parse()?,
        })
    }
}

/// A single replacement submission. Built fresh per attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplacementRequest {
    pub collective_id: CollectiveId,
    pub name: String,
    pub token: String,
    pub data: CardData,
    pub id: RecordId,
}

impl ReplacementRequest {
    pub fn new(context: &ReplacementContext, token: PaymentMethodToken) -> Self {
        Self {
            collective_id: context.collective_id,
            name: token.name,
            token: token.token,
            data: token.data,
            id: context.record_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeDescriptor {
    /// Empty when the processor sent a response without a setup intent.
    #[serde(default)]
    pub setup_challenge_secret: String,
}

/// A processor refusal embedded in an otherwise successful response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessorError {
    pub message: String,
    #[serde(default)]
    pub response: Option<ChallengeDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatedPaymentMethod {
    pub id: u64,
    pub data: CardData,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplacementResponse {
    pub payment_method: Option<UpdatedPaymentMethod>,
    pub processor_error: Option<ProcessorError>,
}

/// Result of a client-side verification challenge that did not error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChallengeStatus {
    Succeeded,
    /// Any non-terminal processor status, e.g. `requires_action`.
    Pending(String),
}
