use serde::{Deserialize, Serialize};

/// Card metadata as returned by the processor alongside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizedCard {
    pub name: Option<String>,
    pub brand: String,
    pub last4: String,
    pub exp_month: u8,
    pub exp_year: u16,
    pub country: Option<String>,
    pub funding: Option<String>,
    pub address_zip: Option<String>,
    pub fingerprint: Option<String>,
}

/// A processor token for a single card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardToken {
    pub id: String,
    pub card: TokenizedCard,
}

/// The data blob attached to a credit card payment method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    pub full_name: Option<String>,
    pub exp_month: u8,
    pub exp_year: u16,
    pub brand: String,
    pub country: Option<String>,
    pub funding: Option<String>,
    pub zip: Option<String>,
    pub fingerprint: Option<String>,
}

/// Token fields sent to the backend. Produced once per attempt and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentMethodToken {
    pub token: String,
    /// Last four digits of the card, used as display name.
    pub name: String,
    pub data: CardData,
}

impl From<CardToken> for PaymentMethodToken {
    fn from(token: CardToken) -> Self {
        let card = token.card;
        Self {
            token: token.id,
            name: card.last4,
            data: CardData {
                full_name: card.name,
                exp_month: card.exp_month,
                exp_year: card.exp_year,
                brand: card.brand,
                country: card.country,
                funding: card.funding,
                zip: card.address_zip,
                fingerprint: card.fingerprint,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_to_payment_method() {
        let token = CardToken {
            id: "tok_1".into(),
            card: TokenizedCard {
                name: Some("Jane Doe".into()),
                brand: "Visa".into(),
                last4: "4242".into(),
                exp_month: 11,
                exp_year: 2029,
                country: Some("US".into()),
                funding: Some("credit".into()),
                address_zip: Some("10001".into()),
                fingerprint: None,
            },
        };

        let method = PaymentMethodToken::from(token);
        assert_eq!(method.token, "tok_1");
        assert_eq!(method.name, "4242");
        assert_eq!(method.data.full_name.as_deref(), Some("Jane Doe"));
        assert_eq!(method.data.zip.as_deref(), Some("10001"));

        let blob = serde_json::to_value(&method.data).unwrap();
        assert_eq!(blob["expMonth"], 11);
        assert_eq!(blob["fullName"], "Jane Doe");
    }
}
