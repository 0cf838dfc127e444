//! JSON and YAML codec helpers.
//!
//! JSON is used for the snapshot directory document (§6) and is decoded
//! with `sonic-rs` for speed. YAML is used for snapshot and
//! custom-snapshot documents (§6) via `serde_yaml`.

use crate::{Error, Result};
use serde::{Serialize, de::DeserializeOwned};

/// Deserialize JSON from a string.
///
/// # Errors
/// Returns an error if the JSON is invalid or does not match `T`.
pub fn from_json<T: DeserializeOwned>(s: &str) -> Result<T> {
    sonic_rs::from_str(s).map_err(Error::from)
}

/// Deserialize JSON from bytes.
///
/// # Errors
/// Returns an error if the JSON is invalid or does not match `T`.
pub fn from_json_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    sonic_rs::from_slice(bytes).map_err(Error::from)
}

/// Serialize to compact JSON.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    sonic_rs::to_string(value).map_err(Error::from)
}

/// Serialize to pretty-printed JSON.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_json_pretty<T: Serialize>(value: &T) -> Result<String> {
    sonic_rs::to_string_pretty(value).map_err(Error::from)
}

/// Deserialize YAML from a string.
///
/// # Errors
/// Returns an error if the YAML is invalid or does not match `T`.
pub fn from_yaml<T: DeserializeOwned>(s: &str) -> Result<T> {
    serde_yaml::from_str(s).map_err(Error::from)
}

/// Deserialize YAML from bytes.
///
/// # Errors
/// Returns an error if the YAML is invalid or does not match `T`.
pub fn from_yaml_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_yaml::from_slice(bytes).map_err(Error::from)
}

/// Serialize to YAML.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn to_yaml<T: Serialize>(value: &T) -> Result<String> {
    serde_yaml::to_string(value).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
    struct Point {
        name: String,
        value: i32,
    }

    #[test]
    fn json_roundtrip() {
        let p = Point {
            name: "x".to_string(),
            value: 42,
        };
        let s = to_json(&p).unwrap();
        let back: Point = from_json(&s).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn json_pretty_is_multiline() {
        let p = Point {
            name: "x".to_string(),
            value: 1,
        };
        assert!(to_json_pretty(&p).unwrap().contains('\n'));
    }

    #[test]
    fn json_invalid_errors() {
        assert!(from_json::<Point>("{not json").is_err());
    }

    #[test]
    fn yaml_roundtrip() {
        let p = Point {
            name: "y".to_string(),
            value: -3,
        };
        let s = to_yaml(&p).unwrap();
        let back: Point = from_yaml(&s).unwrap();
        assert_eq!(p, back);
    }

    #[test]
    fn yaml_invalid_errors() {
        assert!(from_yaml::<Point>("not: [valid").is_err());
    }

    proptest! {
        #[test]
        fn json_roundtrip_arbitrary(name in "[a-zA-Z0-9]{0,16}", value in any::<i32>()) {
            let p = Point { name, value };
            let s = to_json(&p).unwrap();
            let back: Point = from_json(&s).unwrap();
            prop_assert_eq!(p, back);
        }

        #[test]
        fn yaml_roundtrip_arbitrary(name in "[a-zA-Z0-9]{0,16}", value in any::<i32>()) {
            let p = Point { name, value };
            let s = to_yaml(&p).unwrap();
            let back: Point = from_yaml(&s).unwrap();
            prop_assert_eq!(p, back);
        }
    }
}
