use crate::domain::card::CardFields;
use crate::domain::payment_method::{CardToken, TokenizedCard};
use crate::domain::ports::PaymentTokenizer;
use crate::domain::replacement::ChallengeStatus;
use crate::error::{Result, UpdaterError};
use async_trait::async_trait;
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use tracing::debug;

/// How the simulated processor resolves verification challenges.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChallengeBehavior {
    #[default]
    Succeed,
    Pending,
    Fail { message: String },
}

/// A tokenizer that validates cards locally and issues `tok_<n>` ids.
pub struct LocalTokenizer {
    challenge: ChallengeBehavior,
    /// Date against which expiry is checked.
    today: NaiveDate,
    next_token: AtomicU64,
    tokens_created: AtomicUsize,
    verifications: AtomicUsize,
}

impl LocalTokenizer {
    pub fn new(challenge: ChallengeBehavior) -> Self {
        Self {
            challenge,
            today: Utc::now().date_naive(),
            next_token: AtomicU64::new(1),
            tokens_created: AtomicUsize::new(0),
            verifications: AtomicUsize::new(0),
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn tokens_created(&self) -> usize {
        self.tokens_created.load(Ordering::SeqCst)
    }

    pub fn verifications(&self) -> usize {
        self.verifications.load(Ordering::SeqCst)
    }

    fn validate(&self, card: &CardFields, digits: &str) -> Result<()> {
        if !(12..=19).contains(&digits.len()) || !luhn_valid(digits) {
            return Err(UpdaterError::Tokenizer("Your card number is invalid.".into()));
        }
        if !(1..=12).contains(&card.exp_month) {
            return Err(UpdaterError::Tokenizer(
                "Your card's expiration month is invalid.".into(),
            ));
        }
        let expiry = (i32::from(card.exp_year), u32::from(card.exp_month));
        if expiry < (self.today.year(), self.today.month()) {
            return Err(UpdaterError::Tokenizer("Your card has expired.".into()));
        }
        if !(3..=4).contains(&card.cvc.len()) || !card.cvc.chars().all(|c| c.is_ascii_digit()) {
            return Err(UpdaterError::Tokenizer(
                "Your card's security code is invalid.".into(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl PaymentTokenizer for LocalTokenizer {
    async fn create_token(&self, card: &CardFields) -> Result<CardToken> {
        self.tokens_created.fetch_add(1, Ordering::SeqCst);
        let digits = card.digits();
        self.validate(card, &digits)?;

        let id = format!("tok_{}", self.next_token.fetch_add(1, Ordering::SeqCst));
        let brand = brand(&digits);
        debug!(%id, brand, last4 = %card.last4(), "issued card token");

        Ok(CardToken {
            id,
            card: TokenizedCard {
                name: card.holder_name.clone(),
                brand: brand.to_string(),
                last4: card.last4(),
                exp_month: card.exp_month,
                exp_year: card.exp_year,
                country: None,
                funding: None,
                address_zip: card.postal_code.clone(),
                fingerprint: None,
            },
        })
    }

    async fn verify_challenge(&self, secret: &str) -> Result<ChallengeStatus> {
        self.verifications.fetch_add(1, Ordering::SeqCst);
        if secret.is_empty() {
            return Err(UpdaterError::Challenge("missing challenge secret".into()));
        }
        match &self.challenge {
            ChallengeBehavior::Succeed => Ok(ChallengeStatus::Succeeded),
            ChallengeBehavior::Pending => Ok(ChallengeStatus::Pending("requires_action".into())),
            ChallengeBehavior::Fail { message } => Err(UpdaterError::Challenge(message.clone())),
        }
    }
}

fn luhn_valid(digits: &str) -> bool {
    let sum: u32 = digits
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| {
            let d = u32::from(b - b'0');
            if i % 2 == 1 {
                let doubled = d * 2;
                if doubled > 9 { doubled - 9 } else { doubled }
            } else {
                d
            }
        })
        .sum();
    sum % 10 == 0
}

fn brand(digits: &str) -> &'static str {
    let prefix = |n: usize| digits.get(..n).and_then(|p| p.parse::<u32>().ok()).unwrap_or(0);
    match (prefix(1), prefix(2), prefix(4)) {
        (4, _, _) => "Visa",
        (_, 34 | 37, _) => "American Express",
        (_, 51..=55, _) | (_, _, 2221..=2720) => "MasterCard",
        (_, 65, _) | (_, _, 6011) => "Discover",
        _ => "Unknown",
    }
}
