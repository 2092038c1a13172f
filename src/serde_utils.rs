//! Serde helpers for event payloads produced by external decoders
//!
//! Relays written in other runtimes do not agree on how to encode 64-bit
//! identifiers: some emit plain JSON numbers, others stringify them because
//! their number type cannot hold the full range. Both are accepted here.

use serde::{Deserialize, Deserializer};

/// Deserialize a `u64` from either a JSON number or a decimal string.
pub(crate) fn u64_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text.trim().parse::<u64>().map_err(|e| {
            serde::de::Error::custom(format!("invalid 64-bit identifier '{}': {}", text, e))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Holder {
        #[serde(deserialize_with = "u64_from_number_or_string")]
        uid: u64,
    }

    #[test]
    fn accepts_number() {
        let holder: Holder = serde_json::from_str(r#"{"uid": 18446744073709551615}"#).unwrap();
        assert_eq!(holder.uid, u64::MAX);
    }

    #[test]
    fn accepts_decimal_string() {
        let holder: Holder = serde_json::from_str(r#"{"uid": " 9876543210123 "}"#).unwrap();
        assert_eq!(holder.uid, 9_876_543_210_123);
    }

    #[test]
    fn rejects_garbage() {
        let result = serde_json::from_str::<Holder>(r#"{"uid": "abc"}"#);
        assert!(result.is_err());
    }
}
