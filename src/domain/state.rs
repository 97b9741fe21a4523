use crate::error::TransitionError;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Collecting,
    Submitting,
    AwaitingChallenge,
    Succeeded,
    Failed,
}

impl Phase {
    /// A replacement request is outstanding.
    pub fn is_in_flight(self) -> bool {
        matches!(self, Phase::Submitting | Phase::AwaitingChallenge)
    }
}

/// Inputs to [`WorkflowState::transition`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Begin,
    Challenge,
    Succeed,
    Fail(String),
    Reset,
}

impl Event {
    fn name(&self) -> &'static str {
        match self {
            Event::Begin => "begin",
            Event::Challenge => "challenge",
            Event::Succeed => "succeed",
            Event::Fail(_) => "fail",
            Event::Reset => "reset",
        }
    }
}

/// Phase of the replacement workflow plus the message shown when it failed.
///
/// `error_message` is `Some` exactly when `phase` is [`Phase::Failed`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct WorkflowState {
    phase: Phase,
    error_message: Option<String>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Computes the state that follows `event`, leaving `self` untouched.
    pub fn transition(&self, event: Event) -> Result<Self, TransitionError> {
        use Phase::*;

        let next = match (self.phase, event) {
            (Collecting | Failed, Event::Begin) => Self {
                phase: Submitting,
                error_message: None,
            },
            (Collecting | Failed | Submitting | AwaitingChallenge, Event::Fail(message)) => Self {
                phase: Failed,
                error_message: Some(message),
            },
            (Submitting, Event::Challenge) => Self {
                phase: AwaitingChallenge,
                error_message: None,
            },
            (Submitting | AwaitingChallenge, Event::Succeed) => Self {
                phase: Succeeded,
                error_message: None,
            },
            (Failed, Event::Reset) => Self::new(),
            (from, event) => {
                return Err(TransitionError {
                    from,
                    event: event.name(),
                });
            }
        };

        Ok(next)
    }
}
