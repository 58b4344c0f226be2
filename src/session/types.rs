/// Payloads returned by the platform
///
/// The platform is loose with types: numbers arrive as JSON numbers or as
/// decimal strings, lists are sometimes `null`. Decoding is lenient: numeric
/// fields that cannot be read become `0.0`, non-array list payloads become
/// empty lists.
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::errors::BotError;

/// Catalog entry from `/swap/token_list`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenDescriptor {
    #[serde(default)]
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub price: f64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// Entry from `/my/supply`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuppliedAsset {
    #[serde(default)]
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
}

/// Entry from `/account/assets`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountAsset {
    #[serde(default)]
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total_amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub available_amount: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub frozen_amount: f64,
}

/// Entry from `/my/borrow` and `/market/borrow`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BorrowPosition {
    #[serde(default)]
    pub symbol: String,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub amount: f64,
    #[serde(rename = "type", default)]
    pub kind: String,
}

/// `/earn/info`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EarnInfo {
    #[serde(default, deserialize_with = "lenient_f64")]
    pub balance: f64,
}

/// Result of a successful sign-in
#[derive(Debug, Clone, PartialEq)]
pub struct SessionInfo {
    pub address: String,
    /// Cookie in `name=value` form, when the server issued one
    pub cookie: Option<String>,
    pub authenticated_at: DateTime<Utc>,
    /// Whatever the verify endpoint returned (opaque)
    pub payload: Value,
}

/// Accepts numbers, numeric strings and null; anything else reads as 0
pub fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_as_f64(&value))
}

pub fn value_as_f64(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Decode a list payload; anything that is not an array is an empty list
pub fn decode_list<T: DeserializeOwned>(value: Value) -> Result<Vec<T>, BotError> {
    match value {
        Value::Array(_) => Ok(serde_json::from_value(value)?),
        _ => Ok(Vec::new()),
    }
}

/// Decode an object payload; `null` yields the type's default
pub fn decode_object<T: DeserializeOwned + Default>(value: Value) -> Result<T, BotError> {
    match value {
        Value::Null => Ok(T::default()),
        other => Ok(serde_json::from_value(other)?),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_token_descriptor_accepts_string_prices() {
        let tokens: Vec<TokenDescriptor> = decode_list(json!([
            {"symbol": "BSD", "price": "1.25", "type": "S"},
            {"symbol": "ETH", "price": 3500.5, "type": "B"},
            {"symbol": "ODD", "price": "n/a"}
        ]))
        .unwrap();

        assert_eq!(tokens[0].price, 1.25);
        assert_eq!(tokens[1].price, 3500.5);
        assert_eq!(tokens[1].kind, "B");
        assert_eq!(tokens[2].price, 0.0);
        assert_eq!(tokens[2].kind, "");
    }

    #[test]
    fn test_non_array_list_is_empty() {
        let supplies: Vec<SuppliedAsset> = decode_list(Value::Null).unwrap();
        assert!(supplies.is_empty());
        let supplies: Vec<SuppliedAsset> = decode_list(json!({"unexpected": true})).unwrap();
        assert!(supplies.is_empty());
    }

    #[test]
    fn test_wrongly_typed_entries_are_malformed() {
        let err = decode_list::<SuppliedAsset>(json!([1, 2])).unwrap_err();
        assert!(err.is_action_scoped());
        assert!(err.cause().starts_with("Malformed response"));
    }

    #[test]
    fn test_account_asset_fields() {
        let assets: Vec<AccountAsset> = decode_list(json!([
            {"symbol": "BSD", "total_amount": "10", "available_amount": "7.5", "frozen_amount": 2.5}
        ]))
        .unwrap();
        assert_eq!(assets[0].available_amount, 7.5);
        assert_eq!(assets[0].frozen_amount, 2.5);
    }

    #[test]
    fn test_earn_info_null_is_default() {
        let info: EarnInfo = decode_object(Value::Null).unwrap();
        assert_eq!(info.balance, 0.0);
        let info: EarnInfo = decode_object(json!({"balance": "12.3456"})).unwrap();
        assert_eq!(info.balance, 12.3456);
    }
}
