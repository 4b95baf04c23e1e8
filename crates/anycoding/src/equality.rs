//! Structural equality and hashing for value trees.
//!
//! Two trees are equal when they have the same shape and the same scalars.
//! Scalars compare by variant first: `Integer(1)` and `Float(1.0)` differ.
//! Floats compare by value except that NaN equals NaN, so the relation is a
//! true equivalence and `Value` can be `Eq` and `Hash`.

use crate::optional::Optionality;
use crate::types::Value;
use std::hash::{Hash, Hasher};

/// Recursive structural comparison.
pub fn structural_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Integer(x), Value::Integer(y)) => x == y,
        (Value::Float(x), Value::Float(y)) => float_eq(*x, *y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Sequence(xs), Value::Sequence(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| structural_eq(x, y))
        }
        (Value::Mapping(xs), Value::Mapping(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| structural_eq(x, y)))
        }
        _ => false,
    }
}

/// Compare after flattening both sides; two absences are equal.
pub fn equal_flattened<A, B>(a: &A, b: &B) -> bool
where
    A: Optionality + ?Sized,
    B: Optionality + ?Sized,
{
    match (a.flattened(), b.flattened()) {
        (None, None) => true,
        (Some(x), Some(y)) => structural_eq(x, y),
        _ => false,
    }
}

fn float_eq(x: f64, y: f64) -> bool {
    x == y || (x.is_nan() && y.is_nan())
}

/// Bit pattern that agrees with [`float_eq`]: one NaN, one zero.
fn float_bits(x: f64) -> u64 {
    if x.is_nan() {
        f64::NAN.to_bits()
    } else if x == 0.0 {
        0.0f64.to_bits()
    } else {
        x.to_bits()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        structural_eq(self, other)
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Null => {}
            Value::Bool(b) => b.hash(state),
            Value::Integer(i) => i.hash(state),
            Value::Float(x) => float_bits(*x).hash(state),
            Value::String(s) => s.hash(state),
            Value::Sequence(items) => {
                items.len().hash(state);
                for item in items {
                    item.hash(state);
                }
            }
            // BTreeMap iterates in key order, so equal mappings feed the hasher identically.
            Value::Mapping(map) => {
                map.len().hash(state);
                for (k, v) in map {
                    k.hash(state);
                    v.hash(state);
                }
            }
        }
    }
}

macro_rules! eq_scalar {
    ($($ty:ty),*) => {
        $(
            impl PartialEq<$ty> for Value {
                fn eq(&self, other: &$ty) -> bool {
                    structural_eq(self, &Value::from(other.clone()))
                }
            }
        )*
    };
}

eq_scalar!(bool, i32, i64, f64, String);

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}
