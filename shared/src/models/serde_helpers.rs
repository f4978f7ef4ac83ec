//! Serde helpers for lenient request payloads
//!
//! The SPA sends some identifiers as JSON numbers (`"table_number": 5`) and
//! others as strings. These helpers accept both and normalize to `String`.

use serde::Deserializer;
use serde::de::{self, Visitor};
use std::fmt;

struct StringOrNumberVisitor;

impl<'de> Visitor<'de> for StringOrNumberVisitor {
    type Value = Option<String>;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, an integer or null")
    }

    fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(Some(value.to_string()))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        if value.fract() == 0.0 && value.is_finite() {
            Ok(Some(format!("{}", value as i64)))
        } else {
            Err(de::Error::custom(format!("expected an integer, got {value}")))
        }
    }

    fn visit_none<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_unit<E>(self) -> Result<Self::Value, E>
    where
        E: de::Error,
    {
        Ok(None)
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(StringOrNumberVisitor)
    }
}

/// Deserialize an optional value that may be a string or an integer
pub fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_option(StringOrNumberVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "opt_string_or_number")]
        value: Option<String>,
    }

    #[test]
    fn test_accepts_string_and_number() {
        let p: Probe = serde_json::from_str(r#"{"value":"A5"}"#).unwrap();
        assert_eq!(p.value.as_deref(), Some("A5"));

        let p: Probe = serde_json::from_str(r#"{"value":5}"#).unwrap();
        assert_eq!(p.value.as_deref(), Some("5"));
    }

    #[test]
    fn test_null_and_missing() {
        let p: Probe = serde_json::from_str(r#"{"value":null}"#).unwrap();
        assert!(p.value.is_none());

        let p: Probe = serde_json::from_str("{}").unwrap();
        assert!(p.value.is_none());
    }

    #[test]
    fn test_rejects_fractional_and_objects() {
        assert!(serde_json::from_str::<Probe>(r#"{"value":5.5}"#).is_err());
        assert!(serde_json::from_str::<Probe>(r#"{"value":{"a":1}}"#).is_err());
    }
}
