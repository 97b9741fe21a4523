use serde::Deserialize;
use std::fmt;

/// Raw card details as typed by the user.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct CardFields {
    pub number: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub cvc: String,
    #[serde(default)]
    pub holder_name: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

impl CardFields {
    /// Digits of the card number with separators stripped.
    pub fn digits(&self) -> String {
        self.number.chars().filter(|c| c.is_ascii_digit()).collect()
    }

    pub fn last4(&self) -> String {
        let digits = self.digits();
        digits[digits.len().saturating_sub(4)..].to_string()
    }
}

impl fmt::Debug for CardFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CardFields")
            .field("number", &format_args!("**** {}", self.last4()))
            .field("exp_month", &self.exp_month)
            .field("exp_year", &self.exp_year)
            .field("cvc", &"***")
            .field("holder_name", &self.holder_name)
            .field("postal_code", &self.postal_code)
            .finish()
    }
}

/// What the card collector last reported. Replaced wholesale on every edit.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardInput {
    #[default]
    Empty,
    Value(CardFields),
    /// The collector's own validation message (e.g. "Your card number is incomplete.").
    Invalid(String),
}
