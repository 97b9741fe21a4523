use serde_json::{Value, json};
use std::io::Write;
use tempfile::NamedTempFile;

pub fn subscriptions() -> Value {
    json!([
        {
            "id": 42,
            "from_collective_id": 7,
            "from_collective_slug": "jane",
            "collective_name": "Webpack",
            "amount": "10.00",
            "currency": "USD",
            "interval": "month",
            "is_active": true
        },
        {
            "id": 43,
            "from_collective_id": 7,
            "from_collective_slug": "jane",
            "collective_name": "Babel",
            "amount": "50.00",
            "currency": "USD",
            "interval": "year",
            "is_active": false
        }
    ])
}

pub fn card(number: &str) -> Value {
    json!({"value": {"number": number, "exp_month": 12, "exp_year": 2099, "cvc": "123"}})
}

/// Base scenario for collective 7 replacing order 42 with a valid Visa card.
pub fn scenario() -> Value {
    json!({
        "collective_id": 7,
        "collective_slug": "jane",
        "record_id": "42",
        "card": card("4242 4242 4242 4242"),
        "subscriptions": subscriptions()
    })
}

pub fn write(scenario: &Value) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{}", scenario).unwrap();
    file
}
