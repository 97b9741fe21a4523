use super::payment_method::CardData;
use super::replacement::{CollectiveId, RecordId, UpdatedPaymentMethod};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interval {
    Month,
    Year,
}

/// A credit card attached to a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredPaymentMethod {
    pub id: u64,
    pub name: String,
    pub token: String,
    pub data: CardData,
    pub created_at: DateTime<Utc>,
}

impl From<&StoredPaymentMethod> for UpdatedPaymentMethod {
    fn from(method: &StoredPaymentMethod) -> Self {
        Self {
            id: method.id,
            data: method.data.clone(),
            created_at: method.created_at,
        }
    }
}

/// A recurring order placed by a collective towards another collective.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: RecordId,
    /// The paying collective.
    pub from_collective_id: CollectiveId,
    pub from_collective_slug: String,
    /// Name of the collective receiving the contributions.
    pub collective_name: String,
    pub amount: Decimal,
    pub currency: String,
    pub interval: Interval,
    pub is_active: bool,
    #[serde(default)]
    pub payment_method: Option<StoredPaymentMethod>,
}

/// Names of the collectives still receiving active contributions, in order.
pub fn active_collective_names(subscriptions: &[Subscription]) -> Vec<String> {
    subscriptions
        .iter()
        .filter(|sub| sub.is_active)
        .map(|sub| sub.collective_name.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn subscription(id: u64, name: &str, is_active: bool) -> Subscription {
        Subscription {
            id: RecordId(id),
            from_collective_id: 1,
            from_collective_slug: "backer".into(),
            collective_name: name.into(),
            amount: dec!(10.00),
            currency: "USD".into(),
            interval: Interval::Month,
            is_active,
            payment_method: None,
        }
    }

    #[test]
    fn test_active_collective_names_skips_cancelled() {
        let subs = vec![
            subscription(1, "Webpack", true),
            subscription(2, "Babel", false),
            subscription(3, "Vue", true),
        ];
        assert_eq!(active_collective_names(&subs), vec!["Webpack", "Vue"]);
    }

    #[test]
    fn test_subscription_json_amount() {
        let json = r#"{
            "id": 9,
            "from_collective_id": 1,
            "from_collective_slug": "backer",
            "collective_name": "Webpack",
            "amount": "25.50",
            "currency": "EUR",
            "interval": "year",
            "is_active": true
        }"#;
        let sub: Subscription = serde_json::from_str(json).unwrap();
        assert_eq!(sub.amount, dec!(25.50));
        assert_eq!(sub.interval, Interval::Year);
        assert!(sub.payment_method.is_none());
    }
}
