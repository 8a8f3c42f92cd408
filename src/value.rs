use std::fmt;

use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Ordered map used for object-like values. Entry order is significant and
/// survives an encode/decode round trip.
pub type Map = IndexMap<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Number {
    PosInt(u64),
    NegInt(i64),
    Float(f64),
}

impl Number {
    /// `None` for NaN and infinities; a `Value` built through the JSON
    /// bridge or the decoder never holds a non-finite float.
    pub fn from_f64(f: f64) -> Option<Self> {
        if f.is_finite() {
            Some(Number::Float(f))
        } else {
            None
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            Number::Float(f) => f.is_finite(),
            _ => true,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::PosInt(u) => i64::try_from(*u).ok(),
            Number::NegInt(i) => Some(*i),
            Number::Float(f) => {
                let i = *f as i64;
                if i as f64 == *f {
                    Some(i)
                } else {
                    None
                }
            }
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Number::PosInt(u) => Some(*u),
            Number::NegInt(_) => None,
            Number::Float(f) => {
                if *f >= 0.0 {
                    let u = *f as u64;
                    if u as f64 == *f {
                        Some(u)
                    } else {
                        None
                    }
                } else {
                    None
                }
            }
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Number::PosInt(u) => Some(*u as f64),
            Number::NegInt(i) => Some(*i as f64),
            Number::Float(f) => Some(*f),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        if n >= 0 {
            Number::PosInt(n as u64)
        } else {
            Number::NegInt(n)
        }
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::PosInt(n)
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::from(n as i64)
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::PosInt(n as u64)
    }
}

impl From<usize> for Number {
    fn from(n: usize) -> Self {
        Number::PosInt(n as u64)
    }
}

impl From<f64> for Number {
    fn from(n: f64) -> Self {
        Number::Float(n)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = String::new();
        crate::num::write_number_into(self, &mut out);
        f.write_str(&out)
    }
}

/// Canonical in-memory representation shared by the encoder and decoder,
/// independent of the source format.
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    List(Vec<Value>),
    Map(Map),
}

impl Value {
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Scalars are the only values a tabular cell or inline list may hold.
    pub const fn is_scalar(&self) -> bool {
        matches!(
            self,
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_)
        )
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Number(n) => n.as_i64(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Map(map) => map.get(key),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Number(Number::from(i))
                } else if let Some(u) = n.as_u64() {
                    Value::Number(Number::from(u))
                } else if let Some(f) = n.as_f64() {
                    Value::Number(Number::from(f))
                } else {
                    Value::Null
                }
            }
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => {
                let mut map = Map::with_capacity(entries.len());
                for (key, value) in entries {
                    map.insert(key, Value::from(value));
                }
                Value::Map(map)
            }
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Number(n) => match n {
                Number::PosInt(u) => serde_json::Value::Number(u.into()),
                Number::NegInt(i) => serde_json::Value::Number(i.into()),
                Number::Float(f) => serde_json::Number::from_f64(f)
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null),
            },
            Value::String(s) => serde_json::Value::String(s),
            Value::List(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Map(map) => {
                let mut entries = serde_json::Map::with_capacity(map.len());
                for (key, value) in map {
                    entries.insert(key, value.into());
                }
                serde_json::Value::Object(entries)
            }
        }
    }
}

/// Parse JSON text into the value model, preserving object key order.
pub fn from_json_text(text: &str) -> Result<Value> {
    let parsed: serde_json::Value = serde_json::from_str(text).map_err(|err| Error::Parse {
        line: err.line(),
        column: err.column(),
        message: err.to_string(),
    })?;
    Ok(Value::from(parsed))
}

/// Render a value as compact JSON text. Key order is preserved; non-finite
/// floats (which cannot be built through the bridge) degrade to `null`.
pub fn to_json_text(value: &Value) -> String {
    let json = serde_json::Value::from(value.clone());
    serde_json::to_string(&json).expect("JSON serialization of a Value cannot fail")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[rstest::rstest]
    fn test_number_from_f64_rejects_non_finite() {
        assert!(Number::from_f64(f64::NAN).is_none());
        assert!(Number::from_f64(f64::INFINITY).is_none());
        assert!(Number::from_f64(f64::NEG_INFINITY).is_none());
        assert!(Number::from_f64(1.5).is_some());
    }

    #[rstest::rstest]
    fn test_number_from_i64_picks_variant() {
        assert_eq!(Number::from(5i64), Number::PosInt(5));
        assert_eq!(Number::from(0i64), Number::PosInt(0));
        assert_eq!(Number::from(-5i64), Number::NegInt(-5));
    }

    #[rstest::rstest]
    fn test_number_conversions() {
        assert_eq!(Number::PosInt(u64::MAX).as_i64(), None);
        assert_eq!(Number::NegInt(-5).as_u64(), None);
        assert_eq!(Number::Float(7.0).as_i64(), Some(7));
        assert_eq!(Number::Float(7.25).as_i64(), None);
        assert_eq!(Number::Float(-1.0).as_u64(), None);
    }

    #[rstest::rstest]
    fn test_integer_and_float_are_distinct() {
        assert_ne!(
            Value::Number(Number::PosInt(2)),
            Value::Number(Number::Float(2.0))
        );
    }

    #[rstest::rstest]
    fn test_accessors() {
        let value = Value::from(json!({"name": "Ada", "tags": [1, 2]}));
        assert_eq!(value.type_name(), "map");
        assert_eq!(value.get("name").and_then(Value::as_str), Some("Ada"));
        assert_eq!(
            value.get("tags").and_then(Value::as_list).map(<[_]>::len),
            Some(2)
        );
        assert!(value.get("missing").is_none());
        assert!(Value::Null.is_scalar());
        assert!(!value.is_scalar());
    }

    #[rstest::rstest]
    fn test_json_round_trip_preserves_key_order() {
        let text = r#"{"zeta":1,"alpha":2,"mid":{"b":1,"a":2}}"#;
        let value = from_json_text(text).unwrap();
        assert_eq!(to_json_text(&value), text);
    }

    #[rstest::rstest]
    fn test_from_json_text_reports_location() {
        let err = from_json_text("{\"a\": 1,\n  oops}").unwrap_err();
        match err {
            Error::Parse { line, .. } => assert_eq!(line, 2),
            other => panic!("expected Parse error, got {other:?}"),
        }
    }

    #[rstest::rstest]
    fn test_from_json_text_rejects_trailing_content() {
        assert!(from_json_text("{} trailing").is_err());
        assert!(from_json_text("[1, 2").is_err());
    }

    #[rstest::rstest]
    fn test_serde_json_conversion_round_trip() {
        let json = json!({"a": [1, 2.5, null], "b": {"c": true, "d": "x"}});
        let value = Value::from(json.clone());
        let back: serde_json::Value = value.into();
        assert_eq!(back, json);
    }
}
