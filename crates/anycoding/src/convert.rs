//! Primitive conversion table.
//!
//! Decode direction (node kind → target):
//!
//! | from              | to              | rule                                          |
//! |-------------------|-----------------|-----------------------------------------------|
//! | integer, float    | `DateTime<Utc>` | epoch seconds, rounded to the microsecond     |
//! | string            | `Url`           | parsed; fails if unparsable                   |
//! | integer, float    | bool            | non-zero is `true`                            |
//! | float             | integers        | only when integral and in range               |
//! | integer           | float           | widening (always allowed)                     |
//! | bool              | string          | `"true"` / `"false"`                          |
//! | integer, float    | string          | decimal text                                  |
//! | string            | integers        | parsed; fails if unparsable                   |
//! | string            | bool            | exactly `"true"` or `"false"`                 |
//!
//! Encode direction: `DateTime<Utc>` → float seconds truncated to the
//! microsecond, `Url` → string, `u64` → integer when it fits in `i64`.
//!
//! Dates keep microsecond precision: an `f64` near present-day timestamps
//! resolves well under half a microsecond, so a date written and read back
//! lands on the same microsecond. Nanoseconds below that are dropped.
//!
//! With coercion off only exact kinds and integer → float widening apply.

use crate::error::{Error, Result};
use crate::path::Path;
use crate::types::{Value, ValueKind};
use chrono::{DateTime, Utc};
use url::Url;

fn not_found(expected: &'static str, value: &Value, path: &Path) -> Error {
    Error::ValueNotFound {
        expected,
        path: path.clone(),
        found: value.kind(),
    }
}

fn failure(to: &'static str, value: &Value, path: &Path) -> Error {
    Error::ConversionFailure {
        from: value.kind(),
        to,
        value: value.to_string(),
        path: path.clone(),
    }
}

/// No rule applies: structural nodes were simply not there, scalars failed to convert.
fn no_rule(to: &'static str, value: &Value, path: &Path) -> Error {
    match value.kind() {
        ValueKind::Null | ValueKind::Sequence | ValueKind::Mapping => not_found(to, value, path),
        _ => failure(to, value, path),
    }
}

pub fn to_bool(value: &Value, coerce: bool, path: &Path) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Integer(i) if coerce => Ok(*i != 0),
        Value::Float(x) if coerce => Ok(*x != 0.0),
        Value::String(s) if coerce => match s.as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(failure("bool", value, path)),
        },
        _ => Err(no_rule("bool", value, path)),
    }
}

pub fn to_i64(value: &Value, coerce: bool, path: &Path) -> Result<i64> {
    match value {
        Value::Integer(i) => Ok(*i),
        Value::Float(x) if coerce => {
            if x.fract() == 0.0 && *x >= i64::MIN as f64 && *x < i64::MAX as f64 {
                Ok(*x as i64)
            } else {
                Err(failure("i64", value, path))
            }
        }
        Value::String(s) if coerce => s.trim().parse().map_err(|_| failure("i64", value, path)),
        _ => Err(no_rule("i64", value, path)),
    }
}

pub fn to_u64(value: &Value, coerce: bool, path: &Path) -> Result<u64> {
    match value {
        Value::Integer(i) => u64::try_from(*i).map_err(|_| failure("u64", value, path)),
        Value::Float(x) if coerce => {
            if x.fract() == 0.0 && *x >= 0.0 && *x < u64::MAX as f64 {
                Ok(*x as u64)
            } else {
                Err(failure("u64", value, path))
            }
        }
        Value::String(s) if coerce => s.trim().parse().map_err(|_| failure("u64", value, path)),
        _ => Err(no_rule("u64", value, path)),
    }
}

pub fn to_f64(value: &Value, coerce: bool, path: &Path) -> Result<f64> {
    match value {
        Value::Float(x) => Ok(*x),
        Value::Integer(i) => Ok(*i as f64),
        Value::String(s) if coerce => s.trim().parse().map_err(|_| failure("f64", value, path)),
        _ => Err(no_rule("f64", value, path)),
    }
}

pub fn to_string(value: &Value, coerce: bool, path: &Path) -> Result<String> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) if coerce => Ok(b.to_string()),
        Value::Integer(i) if coerce => Ok(i.to_string()),
        Value::Float(x) if coerce => Ok(x.to_string()),
        _ => Err(no_rule("String", value, path)),
    }
}

/// Narrow an `i64` into a smaller integer type, failing out of range.
pub fn narrow<T: TryFrom<i64>>(n: i64, to: &'static str, path: &Path) -> Result<T> {
    T::try_from(n).map_err(|_| failure(to, &Value::Integer(n), path))
}

pub fn to_date(value: &Value, path: &Path) -> Result<DateTime<Utc>> {
    let date = match value {
        Value::Integer(secs) => DateTime::from_timestamp(*secs, 0),
        Value::Float(secs) if secs.is_finite() => {
            let whole = secs.floor();
            let micros = ((secs - whole) * 1e6).round() as u32;
            // Rounding can carry a full second.
            if micros >= 1_000_000 {
                DateTime::from_timestamp(whole as i64 + 1, 0)
            } else {
                DateTime::from_timestamp(whole as i64, micros * 1_000)
            }
        }
        _ => return Err(no_rule("DateTime<Utc>", value, path)),
    };
    date.ok_or_else(|| failure("DateTime<Utc>", value, path))
}

pub fn from_date(date: &DateTime<Utc>) -> Value {
    let secs = date.timestamp() as f64 + f64::from(date.timestamp_subsec_micros()) / 1e6;
    Value::Float(secs)
}

pub fn to_url(value: &Value, path: &Path) -> Result<Url> {
    match value {
        Value::String(s) => Url::parse(s).map_err(|err| Error::ConversionFailure {
            from: ValueKind::String,
            to: "Url",
            value: format!("'{s}' is not a URL ({err})"),
            path: path.clone(),
        }),
        _ => Err(no_rule("Url", value, path)),
    }
}

pub fn from_u64(n: u64, path: &Path) -> Result<Value> {
    i64::try_from(n)
        .map(Value::Integer)
        .map_err(|_| Error::ConversionFailure {
            from: ValueKind::Integer,
            to: "i64",
            value: n.to_string(),
            path: path.clone(),
        })
}
