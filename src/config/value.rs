//! Loose option value decoding.
//!
//! The host platform stores checkbox options as `"1"`, `1`, `""` or `null`
//! depending on how and when they were saved. Every boolean option goes
//! through [`deserialize_flag`] so all of them decode the same way.

use serde::de::{self, Deserializer, Visitor};
use std::fmt;

/// Deserialize a boolean option from a bool, integer, string or null.
///
/// - integers: non-zero is `true`
/// - strings: `""`, `"0"`, `"false"`, `"off"`, `"no"` are `false`, anything else `true`
/// - null / unit: `false`
pub fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(FlagVisitor)
}

struct FlagVisitor;

impl<'de> Visitor<'de> for FlagVisitor {
    type Value = bool;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a boolean, an integer or a string flag")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<bool, E> {
        Ok(v)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<bool, E> {
        Ok(v != 0)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<bool, E> {
        Ok(v != 0)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<bool, E> {
        Ok(v != 0.0)
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<bool, E> {
        Ok(parse_flag(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<bool, E> {
        Ok(false)
    }

    fn visit_none<E: de::Error>(self) -> Result<bool, E> {
        Ok(false)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<bool, D::Error> {
        deserializer.deserialize_any(FlagVisitor)
    }
}

/// Interpret a textual flag.
pub fn parse_flag(v: &str) -> bool {
    let v = v.trim();
    !(v.is_empty()
        || v == "0"
        || v.eq_ignore_ascii_case("false")
        || v.eq_ignore_ascii_case("off")
        || v.eq_ignore_ascii_case("no"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "deserialize_flag")]
        flag: bool,
    }

    fn probe(json: &str) -> bool {
        serde_json::from_str::<Probe>(json).unwrap().flag
    }

    #[test]
    fn test_flag_from_json_shapes() {
        assert!(probe(r#"{"flag": true}"#));
        assert!(probe(r#"{"flag": "1"}"#));
        assert!(probe(r#"{"flag": 1}"#));
        assert!(probe(r#"{"flag": "yes"}"#));
        assert!(!probe(r#"{"flag": false}"#));
        assert!(!probe(r#"{"flag": ""}"#));
        assert!(!probe(r#"{"flag": "0"}"#));
        assert!(!probe(r#"{"flag": 0}"#));
        assert!(!probe(r#"{"flag": null}"#));
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("on"));
        assert!(!parse_flag(" Off "));
        assert!(!parse_flag("FALSE"));
    }
}
