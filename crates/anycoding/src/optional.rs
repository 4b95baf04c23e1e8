//! Optional flattening.
//!
//! `Option<Option<Value>>`, `Option<&Value>` and a bare `Value::Null` all
//! collapse to the same question: is there a concrete payload or not?

use crate::types::Value;

/// Something that may or may not hold a concrete [`Value`].
pub trait Optionality {
    /// Unwrap every optional layer; `Value::Null` counts as absent.
    fn flattened(&self) -> Option<&Value>;

    fn is_absent(&self) -> bool {
        self.flattened().is_none()
    }
}

impl Optionality for Value {
    fn flattened(&self) -> Option<&Value> {
        match self {
            Value::Null => None,
            concrete => Some(concrete),
        }
    }
}

impl<T: Optionality> Optionality for Option<T> {
    fn flattened(&self) -> Option<&Value> {
        self.as_ref().and_then(|inner| inner.flattened())
    }
}

impl<T: Optionality + ?Sized> Optionality for &T {
    fn flattened(&self) -> Option<&Value> {
        (**self).flattened()
    }
}

impl<T: Optionality + ?Sized> Optionality for Box<T> {
    fn flattened(&self) -> Option<&Value> {
        (**self).flattened()
    }
}

/// The innermost concrete value, or `None`.
pub fn flatten<O: Optionality + ?Sized>(value: &O) -> Option<&Value> {
    value.flattened()
}

/// True iff [`flatten`] finds nothing.
pub fn is_absent<O: Optionality + ?Sized>(value: &O) -> bool {
    value.flattened().is_none()
}
