use indexmap::IndexMap;
use num_bigint::BigInt;
use num_traits::ToPrimitive;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use thisisplural::Plural;

/// A document value adjusted to its specs.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An optional block with no value
    Null,
    Bool(bool),
    Integer(BigInt),
    Decimal(f64),
    String(String),
    List(List),
    Tuple(Tuple),
    Map(Map),
}

#[derive(Debug, Clone, PartialEq, Default, Plural)]
pub struct List(pub Vec<Value>);

/// Fixed-arity sequence; its length always equals the arity of its specs.
#[derive(Debug, Clone, PartialEq, Default, Plural)]
pub struct Tuple(pub Vec<Value>);

/// Declared fields only, in specs order.
#[derive(Debug, Clone, PartialEq, Default, Plural)]
#[plural(len, is_empty, iter, into_iter, into_iter_ref, new)]
pub struct Map(pub IndexMap<String, Value>);

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<&BigInt> {
        match self {
            Value::Integer(i) => Some(i),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Field of a map value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.as_map().and_then(|map| map.0.get(field))
    }

    /// Re-encode as JSON.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => {
                if let Some(i) = i.to_i64() {
                    serializer.serialize_i64(i)
                } else if let Some(u) = i.to_u64() {
                    serializer.serialize_u64(u)
                } else {
                    // Out of the 64-bit range JSON decoders agree on.
                    serializer.serialize_f64(i.to_f64().unwrap_or(f64::NAN))
                }
            }
            Value::Decimal(d) => serializer.serialize_f64(*d),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(List(items)) | Value::Tuple(Tuple(items)) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(Map(fields)) => {
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (name, value) in fields {
                    map.serialize_entry(name, value)?;
                }
                map.end()
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(BigInt::from(i))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serialize_nested() {
        let value = Value::Map(Map(IndexMap::from([
            ("count".to_string(), Value::from(3)),
            (
                "pair".to_string(),
                Value::Tuple(Tuple(vec![Value::from(true), Value::Null])),
            ),
            (
                "names".to_string(),
                Value::List(List(vec![Value::from("a"), Value::from("b")])),
            ),
            ("ratio".to_string(), Value::Decimal(0.5)),
        ])));

        assert_eq!(
            value.to_json().unwrap(),
            json!({"count": 3, "pair": [true, null], "names": ["a", "b"], "ratio": 0.5})
        );
    }

    #[test]
    fn test_serialize_large_integers() {
        let value = Value::Integer(BigInt::from(u64::MAX));
        assert_eq!(value.to_json().unwrap(), json!(u64::MAX));
    }

    #[test]
    fn test_accessors() {
        let value = Value::Map(Map(IndexMap::from([(
            "name".to_string(),
            Value::from("x"),
        )])));
        assert_eq!(value.get("name").and_then(Value::as_str), Some("x"));
        assert!(value.get("missing").is_none());
        assert!(Value::Null.is_null());
        assert_eq!(Value::from(false).as_bool(), Some(false));
        assert_eq!(Value::from(7).as_integer(), Some(&BigInt::from(7)));
    }
}
