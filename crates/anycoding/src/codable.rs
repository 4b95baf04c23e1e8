//! The `Encode` / `Decode` traits and their implementations for std,
//! chrono and url types.
//!
//! A shape describes itself by asking its context for exactly one container
//! view and reading or writing through it:
//!
//! ```
//! use anycoding::{Decode, Decoder, Encode, Encoder, Result};
//!
//! struct Point {
//!     x: i64,
//!     y: i64,
//! }
//!
//! impl Encode for Point {
//!     fn encode(&self, encoder: &mut Encoder) -> Result<()> {
//!         let mut map = encoder.keyed_container()?;
//!         map.encode("x", &self.x)?;
//!         map.encode("y", &self.y)
//!     }
//! }
//!
//! impl Decode for Point {
//!     fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
//!         let map = decoder.keyed_container()?;
//!         Ok(Point {
//!             x: map.decode("x")?,
//!             y: map.decode("y")?,
//!         })
//!     }
//! }
//!
//! let tree = anycoding::encode(&Point { x: 1, y: 2 }).unwrap();
//! let back: Point = anycoding::decode(&tree).unwrap();
//! assert_eq!((back.x, back.y), (1, 2));
//! ```
//!
//! Asking for the container must be the first thing an implementation does
//! (before reading the path, before any validation). That is what lets
//! [`crate::probe`] discover the shape's kind without real data.

use crate::convert;
use crate::decoder::Decoder;
use crate::encoder::Encoder;
use crate::error::{Error, Result};
use crate::types::Value;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, HashMap};
use std::hash::{BuildHasher, Hash};
use url::Url;

/// A shape that can write itself into a value tree.
pub trait Encode {
    fn encode(&self, encoder: &mut Encoder) -> Result<()>;
}

/// A shape that can read itself out of a value tree.
pub trait Decode: Sized {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self>;

    /// The value this shape takes when its node is missing or null.
    ///
    /// `Some` marks an optional shape: a missing key decodes to it instead
    /// of failing, and so does any failed decode.
    fn absent() -> Option<Self> {
        None
    }

    /// A canonical zero value, used while synthesizing.
    ///
    /// Shapes without one are synthesized by running [`Decode::decode`]
    /// against an empty context.
    fn empty() -> Option<Self> {
        None
    }
}

/// A shape with a lossless mapping to and from a simpler representation,
/// like a fieldless enum stored as its name.
pub trait RawValue: Sized {
    type Raw;

    fn raw_value(&self) -> Self::Raw;

    /// `None` when `raw` names no variant.
    fn from_raw_value(raw: Self::Raw) -> Option<Self>;

    /// The case a synthesized zero value takes, usually the first variant.
    fn first_case() -> Self;
}

/// `Encode::encode` for a [`RawValue`] shape: encodes its raw value.
pub fn encode_raw<T>(value: &T, encoder: &mut Encoder) -> Result<()>
where
    T: RawValue,
    T::Raw: Encode,
{
    value.raw_value().encode(encoder)
}

/// `Decode::decode` for a [`RawValue`] shape: decodes the raw value and maps it.
/// While synthesizing it yields [`RawValue::first_case`].
pub fn decode_raw<T>(decoder: &mut Decoder<'_>) -> Result<T>
where
    T: RawValue,
    T::Raw: Decode,
{
    if decoder.is_synthesizing() {
        return Ok(T::first_case());
    }
    let raw = decoder.decode::<T::Raw>()?;
    T::from_raw_value(raw).ok_or_else(|| {
        let node = decoder.value();
        Error::ConversionFailure {
            from: node.kind(),
            to: std::any::type_name::<T>(),
            value: node.to_string(),
            path: decoder.path().clone(),
        }
    })
}

// ============================================================================
// Scalars
// ============================================================================

impl Encode for bool {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.single_value_container()?.encode_bool(*self)
    }
}

impl Decode for bool {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        decoder.single_value_container()?.decode_bool()
    }

    fn empty() -> Option<Self> {
        Some(false)
    }
}

impl Encode for i64 {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.single_value_container()?.encode_i64(*self)
    }
}

impl Decode for i64 {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        decoder.single_value_container()?.decode_i64()
    }

    fn empty() -> Option<Self> {
        Some(0)
    }
}

impl Encode for u64 {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.single_value_container()?.encode_u64(*self)
    }
}

impl Decode for u64 {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        decoder.single_value_container()?.decode_u64()
    }

    fn empty() -> Option<Self> {
        Some(0)
    }
}

macro_rules! narrow_integer {
    ($($ty:ty),*) => {
        $(
            impl Encode for $ty {
                fn encode(&self, encoder: &mut Encoder) -> Result<()> {
                    encoder.single_value_container()?.encode_i64(*self as i64)
                }
            }

            impl Decode for $ty {
                fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
                    let scalar = decoder.single_value_container()?;
                    let wide = scalar.decode_i64()?;
                    convert::narrow(wide, stringify!($ty), scalar.path())
                }

                fn empty() -> Option<Self> {
                    Some(0)
                }
            }
        )*
    };
}

narrow_integer!(i8, i16, i32, isize, u8, u16, u32);

impl Encode for usize {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.single_value_container()?.encode_u64(*self as u64)
    }
}

impl Decode for usize {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let scalar = decoder.single_value_container()?;
        let wide = scalar.decode_i64()?;
        convert::narrow(wide, "usize", scalar.path())
    }

    fn empty() -> Option<Self> {
        Some(0)
    }
}

impl Encode for f64 {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.single_value_container()?.encode_f64(*self)
    }
}

impl Decode for f64 {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        decoder.single_value_container()?.decode_f64()
    }

    fn empty() -> Option<Self> {
        Some(0.0)
    }
}

impl Encode for f32 {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.single_value_container()?.encode_f64(f64::from(*self))
    }
}

impl Decode for f32 {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        decoder
            .single_value_container()?
            .decode_f64()
            .map(|x| x as f32)
    }

    fn empty() -> Option<Self> {
        Some(0.0)
    }
}

impl Encode for str {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.single_value_container()?.encode_str(self)
    }
}

impl Encode for String {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.single_value_container()?.encode_str(self)
    }
}

impl Decode for String {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        decoder.single_value_container()?.decode_string()
    }

    fn empty() -> Option<Self> {
        Some(String::new())
    }
}

impl Encode for char {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        let mut buf = [0u8; 4];
        encoder
            .single_value_container()?
            .encode_str(self.encode_utf8(&mut buf))
    }
}

impl Decode for char {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let scalar = decoder.single_value_container()?;
        if decoder.is_synthesizing() {
            return Ok('\0');
        }
        let text = scalar.decode_string()?;
        let mut chars = text.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(Error::ConversionFailure {
                from: scalar.value().kind(),
                to: "char",
                value: scalar.value().to_string(),
                path: scalar.path().clone(),
            }),
        }
    }

    fn empty() -> Option<Self> {
        Some('\0')
    }
}

impl Encode for () {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.single_value_container()?.encode_nil()
    }
}

impl Decode for () {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let scalar = decoder.single_value_container()?;
        if scalar.decode_nil() {
            Ok(())
        } else {
            Err(Error::ValueNotFound {
                expected: "()",
                path: scalar.path().clone(),
                found: scalar.value().kind(),
            })
        }
    }

    fn empty() -> Option<Self> {
        Some(())
    }
}

// ============================================================================
// Dates and URLs
// ============================================================================

impl Encode for DateTime<Utc> {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder
            .single_value_container()?
            .encode_value(convert::from_date(self))
    }
}

impl Decode for DateTime<Utc> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let scalar = decoder.single_value_container()?;
        if decoder.is_synthesizing() {
            return Ok(DateTime::UNIX_EPOCH);
        }
        convert::to_date(scalar.value(), scalar.path())
    }

    fn empty() -> Option<Self> {
        Some(DateTime::UNIX_EPOCH)
    }
}

impl Encode for Url {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.single_value_container()?.encode_str(self.as_str())
    }
}

impl Decode for Url {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let scalar = decoder.single_value_container()?;
        if decoder.is_synthesizing() {
            return Url::parse("about:blank")
                .map_err(|err| Error::custom(scalar.path(), err.to_string()));
        }
        convert::to_url(scalar.value(), scalar.path())
    }

    fn empty() -> Option<Self> {
        Url::parse("about:blank").ok()
    }
}

// ============================================================================
// Value
// ============================================================================

impl Encode for Value {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        encoder.single_value_container()?.encode_value(self.clone())
    }
}

impl Decode for Value {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        Ok(decoder.single_value_container()?.value().clone())
    }

    fn absent() -> Option<Self> {
        Some(Value::Null)
    }

    fn empty() -> Option<Self> {
        Some(Value::Null)
    }
}

// ============================================================================
// Wrappers
// ============================================================================

impl<T: Encode> Encode for Option<T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        match self {
            Some(inner) => inner.encode(encoder),
            None => encoder.single_value_container()?.encode_nil(),
        }
    }
}

impl<T: Decode> Decode for Option<T> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        if decoder.single_value_container()?.decode_nil() {
            return Ok(None);
        }
        decoder.decode::<T>().map(Some)
    }

    fn absent() -> Option<Self> {
        Some(None)
    }

    fn empty() -> Option<Self> {
        Some(None)
    }
}

impl<T: Encode + ?Sized> Encode for &T {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        (**self).encode(encoder)
    }
}

impl<T: Encode + ?Sized> Encode for Box<T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        (**self).encode(encoder)
    }
}

impl<T: Decode> Decode for Box<T> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        T::decode(decoder).map(Box::new)
    }

    fn absent() -> Option<Self> {
        T::absent().map(Box::new)
    }

    fn empty() -> Option<Self> {
        T::empty().map(Box::new)
    }
}

// ============================================================================
// Sequences
// ============================================================================

impl<T: Encode> Encode for [T] {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        let mut seq = encoder.unkeyed_container()?;
        for item in self {
            seq.encode(item)?;
        }
        Ok(())
    }
}

impl<T: Encode, const N: usize> Encode for [T; N] {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        self.as_slice().encode(encoder)
    }
}

impl<T: Encode> Encode for Vec<T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        self.as_slice().encode(encoder)
    }
}

impl<T: Decode> Decode for Vec<T> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let mut seq = decoder.unkeyed_container()?;
        let mut items = Vec::with_capacity(seq.count());
        while !seq.is_at_end() {
            items.push(seq.decode()?);
        }
        Ok(items)
    }

    fn empty() -> Option<Self> {
        Some(Vec::new())
    }
}

impl<A: Encode, B: Encode> Encode for (A, B) {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        let mut seq = encoder.unkeyed_container()?;
        seq.encode(&self.0)?;
        seq.encode(&self.1)
    }
}

impl<A: Decode, B: Decode> Decode for (A, B) {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let mut seq = decoder.unkeyed_container()?;
        Ok((seq.decode()?, seq.decode()?))
    }
}

impl<A: Encode, B: Encode, C: Encode> Encode for (A, B, C) {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        let mut seq = encoder.unkeyed_container()?;
        seq.encode(&self.0)?;
        seq.encode(&self.1)?;
        seq.encode(&self.2)
    }
}

impl<A: Decode, B: Decode, C: Decode> Decode for (A, B, C) {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let mut seq = decoder.unkeyed_container()?;
        Ok((seq.decode()?, seq.decode()?, seq.decode()?))
    }
}

// ============================================================================
// Mappings
// ============================================================================

impl<T: Encode> Encode for BTreeMap<String, T> {
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        let mut map = encoder.keyed_container()?;
        for (key, value) in self {
            map.encode(key, value)?;
        }
        Ok(())
    }
}

impl<T: Decode> Decode for BTreeMap<String, T> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let map = decoder.keyed_container()?;
        let mut out = Self::default();
        for key in map.keys() {
            out.insert(key.to_string(), map.decode(key)?);
        }
        Ok(out)
    }

    fn empty() -> Option<Self> {
        Some(BTreeMap::new())
    }
}

impl<K, T, S> Encode for HashMap<K, T, S>
where
    K: AsRef<str> + Eq + Hash,
    T: Encode,
    S: BuildHasher,
{
    fn encode(&self, encoder: &mut Encoder) -> Result<()> {
        let mut map = encoder.keyed_container()?;
        for (key, value) in self {
            map.encode(key.as_ref(), value)?;
        }
        Ok(())
    }
}

impl<T: Decode, S: BuildHasher + Default> Decode for HashMap<String, T, S> {
    fn decode(decoder: &mut Decoder<'_>) -> Result<Self> {
        let map = decoder.keyed_container()?;
        let mut out = Self::default();
        for key in map.keys() {
            out.insert(key.to_string(), map.decode(key)?);
        }
        Ok(out)
    }

    fn empty() -> Option<Self> {
        Some(HashMap::default())
    }
}
