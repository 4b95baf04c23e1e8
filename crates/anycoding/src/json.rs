//! JSON boundary: serde impls for [`Value`] and text helpers.
//!
//! Parsing and printing are delegated to `serde_json`. Before any tree is
//! printed it is checked for things JSON cannot carry (NaN and infinities),
//! which fail with [`Error::NotValidForSerialization`] naming the offending
//! path rather than silently turning into `null`.

use crate::codable::{Decode, Encode};
use crate::decoder::decode;
use crate::encoder::encode;
use crate::error::{Error, Result};
use crate::path::Path;
use crate::types::{Map, Value};
use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Integer(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any JSON value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(v))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
        Ok(Value::Integer(v))
    }

    /// Integers beyond `i64::MAX` lose precision and become floats.
    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
        Ok(i64::try_from(v).map_or(Value::Float(v as f64), Value::Integer))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Value, E> {
        Ok(Value::Float(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value, E> {
        Ok(Value::String(v.to_string()))
    }

    fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Value, E> {
        Ok(Value::String(v))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Value, D::Error> {
        Deserialize::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<M: MapAccess<'de>>(self, mut access: M) -> std::result::Result<Value, M::Error> {
        let mut map = Map::new();
        while let Some((key, value)) = access.next_entry::<String, Value>()? {
            map.insert(key, value);
        }
        Ok(Value::Mapping(map))
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        deserializer.deserialize_any(ValueVisitor)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
        }
    }
}

impl TryFrom<Value> for serde_json::Value {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        validate(&value)?;
        Ok(serde_json::to_value(&value)?)
    }
}

/// Check that every float in the tree is finite.
pub fn validate(value: &Value) -> Result<()> {
    let mut path = Path::root();
    validate_at(value, &mut path)
}

fn validate_at(value: &Value, path: &mut Path) -> Result<()> {
    match value {
        Value::Float(x) if !x.is_finite() => Err(Error::NotValidForSerialization(format!(
            "non-finite number {x} at {path}"
        ))),
        Value::Sequence(items) => {
            for (idx, item) in items.iter().enumerate() {
                path.push(idx);
                let outcome = validate_at(item, path);
                path.pop();
                outcome?;
            }
            Ok(())
        }
        Value::Mapping(map) => {
            for (key, item) in map {
                path.push(key);
                let outcome = validate_at(item, path);
                path.pop();
                outcome?;
            }
            Ok(())
        }
        _ => Ok(()),
    }
}

impl Value {
    /// Parse JSON text.
    pub fn from_json_str(text: &str) -> Result<Value> {
        Ok(serde_json::from_str(text)?)
    }

    /// Compact JSON text.
    pub fn to_json_string(&self) -> Result<String> {
        validate(self)?;
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON text.
    pub fn to_json_pretty(&self) -> Result<String> {
        validate(self)?;
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Encode `value` and print the tree as compact JSON.
pub fn to_json<T: Encode + ?Sized>(value: &T) -> Result<String> {
    encode(value)?.to_json_string()
}

/// Parse JSON text and decode a `T` from it.
pub fn from_json<T: Decode>(text: &str) -> Result<T> {
    decode(&Value::from_json_str(text)?)
}
