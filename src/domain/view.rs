use super::state::{Phase, WorkflowState};
use serde::Serialize;

pub const SUCCESS_MESSAGE: &str = "Your new card info has been added";

/// What the update form shows for a given workflow state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormView {
    pub show_card_form: bool,
    pub button_label: &'static str,
    pub button_disabled: bool,
    pub loading: bool,
    pub error: Option<String>,
    pub confirmation: Option<&'static str>,
}

impl From<&WorkflowState> for FormView {
    fn from(state: &WorkflowState) -> Self {
        let phase = state.phase();
        let succeeded = phase == Phase::Succeeded;
        Self {
            show_card_form: !succeeded,
            button_label: if succeeded { "Updated" } else { "update" },
            button_disabled: succeeded || phase.is_in_flight(),
            loading: phase.is_in_flight(),
            error: state.error_message().map(str::to_string),
            confirmation: succeeded.then_some(SUCCESS_MESSAGE),
        }
    }
}
