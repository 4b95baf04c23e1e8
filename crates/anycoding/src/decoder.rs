//! Decoder engine: value tree → typed value.
//!
//! A [`Decoder`] is a cursor over one node of a borrowed tree plus the coding
//! path that leads to it. Shapes implementing [`Decode`] ask it for one of
//! three container views and read themselves out:
//!
//! - [`KeyedDecoder`] -- a mapping, read by key
//! - [`UnkeyedDecoder`] -- a sequence, read front to back
//! - [`SingleValueDecoder`] -- one scalar
//!
//! Every nested read happens in a child decoder whose path is the parent's
//! path plus one key, so an error deep in the tree carries its exact location
//! and siblings never observe a modified path.
//!
//! The same type also runs in two dry modes: *empty* (every container is
//! present but holds nothing, used by [`crate::empty::synthesize`]) and
//! *probe* (container requests return a sentinel, used by [`crate::probe`]).

use crate::codable::Decode;
use crate::convert;
use crate::error::{Error, Result};
use crate::optional::Optionality;
use crate::path::{Path, PathKey};
use crate::probe::{decoded_kind, ContainerKind};
use crate::types::{Map, Value, ValueKind, NULL};

static EMPTY_MAP: Map = Map::new();

/// Decoding knobs, inherited by every nested context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Apply the cross-kind rules of [`crate::convert`] (`"42"` → `42`,
    /// `1` → `true`, ...). When off, only exact kinds and integer → float apply.
    pub coerce_primitives: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            coerce_primitives: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Tree,
    Empty,
    Probe,
}

#[derive(Debug, Clone)]
struct Parent<'v> {
    node: &'v Value,
    path: Path,
}

/// Decoding context positioned at one node of a value tree.
#[derive(Debug, Clone)]
pub struct Decoder<'v> {
    node: &'v Value,
    path: Path,
    parent: Option<Parent<'v>>,
    options: DecodeOptions,
    mode: Mode,
}

/// Decode a `T` out of `value` with default options.
pub fn decode<T: Decode>(value: &Value) -> Result<T> {
    Decoder::new(value).decode()
}

/// Decode a `T` out of `value`.
pub fn decode_with<T: Decode>(value: &Value, options: DecodeOptions) -> Result<T> {
    Decoder::with_options(value, options).decode()
}

impl<'v> Decoder<'v> {
    pub fn new(value: &'v Value) -> Self {
        Self::with_options(value, DecodeOptions::default())
    }

    pub fn with_options(value: &'v Value, options: DecodeOptions) -> Self {
        Decoder {
            node: value,
            path: Path::root(),
            parent: None,
            options,
            mode: Mode::Tree,
        }
    }

    pub(crate) fn empty() -> Decoder<'static> {
        Decoder {
            node: &NULL,
            path: Path::root(),
            parent: None,
            options: DecodeOptions::default(),
            mode: Mode::Empty,
        }
    }

    pub(crate) fn probing() -> Decoder<'static> {
        Decoder {
            node: &NULL,
            path: Path::root(),
            parent: None,
            options: DecodeOptions::default(),
            mode: Mode::Probe,
        }
    }

    /// The coding path of the current node.
    ///
    /// # Panics
    ///
    /// While probing a shape's container kind. A shape that reads its path
    /// before asking for a container cannot be probed.
    pub fn path(&self) -> &Path {
        assert!(
            self.mode != Mode::Probe,
            "the coding path is not available while probing a container kind"
        );
        &self.path
    }

    /// The current node.
    pub fn value(&self) -> &'v Value {
        self.node
    }

    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    /// True while synthesizing a zero value rather than reading real data.
    pub fn is_synthesizing(&self) -> bool {
        self.mode == Mode::Empty
    }

    /// General dispatch: decode a `T` at the current node.
    ///
    /// Optional shapes short-circuit on an absent node, zero values come from
    /// [`Decode::empty`] while synthesizing, everything else runs
    /// `T::decode`. If that fails and `T` has an absent representation, the
    /// absent value is returned instead of the error.
    pub fn decode<T: Decode>(&mut self) -> Result<T> {
        match self.mode {
            Mode::Probe => return T::decode(self),
            Mode::Empty => {
                if let Some(zero) = T::empty() {
                    return Ok(zero);
                }
            }
            Mode::Tree => {}
        }
        if self.node.is_absent() {
            if let Some(none) = T::absent() {
                return Ok(none);
            }
        }
        match T::decode(self) {
            Ok(value) => Ok(value),
            Err(err) if err.is_probe() => Err(err),
            Err(err) => match T::absent() {
                Some(none) => {
                    log::debug!(
                        "{} at {} fell back to its absent value: {err}",
                        std::any::type_name::<T>(),
                        self.path
                    );
                    Ok(none)
                }
                None => Err(err),
            },
        }
    }

    fn mismatch(&self, expected: ValueKind) -> Error {
        Error::ContainerKindMismatch {
            expected,
            found: self.node.kind(),
            path: self.path.clone(),
        }
    }

    /// View the current node as a mapping.
    pub fn keyed_container(&self) -> Result<KeyedDecoder<'v>> {
        log::trace!("keyed container at {}", self.path);
        let map = match (self.mode, self.node) {
            (Mode::Probe, _) => return Err(Error::Probed(ContainerKind::Keyed)),
            (Mode::Empty, _) => &EMPTY_MAP,
            (Mode::Tree, Value::Mapping(map)) => map,
            (Mode::Tree, _) => return Err(self.mismatch(ValueKind::Mapping)),
        };
        Ok(KeyedDecoder {
            ctx: self.clone(),
            map,
        })
    }

    /// View the current node as a sequence.
    pub fn unkeyed_container(&self) -> Result<UnkeyedDecoder<'v>> {
        log::trace!("unkeyed container at {}", self.path);
        let items: &'v [Value] = match (self.mode, self.node) {
            (Mode::Probe, _) => return Err(Error::Probed(ContainerKind::Unkeyed)),
            (Mode::Empty, _) => &[],
            (Mode::Tree, Value::Sequence(items)) => items,
            (Mode::Tree, _) => return Err(self.mismatch(ValueKind::Sequence)),
        };
        Ok(UnkeyedDecoder {
            ctx: self.clone(),
            items,
            index: 0,
        })
    }

    /// View the current node as a single scalar.
    pub fn single_value_container(&self) -> Result<SingleValueDecoder<'v>> {
        if self.mode == Mode::Probe {
            return Err(Error::Probed(ContainerKind::SingleValue));
        }
        Ok(SingleValueDecoder { ctx: self.clone() })
    }

    /// Child context one key deeper; its parent link points back here.
    fn nested(&self, node: &'v Value, key: impl Into<PathKey>) -> Decoder<'v> {
        Decoder {
            node,
            path: self.path.child(key),
            parent: Some(Parent {
                node: self.node,
                path: self.path.clone(),
            }),
            options: self.options,
            mode: self.mode,
        }
    }

    /// The enclosing context, or this one at the top level.
    fn super_context(&self) -> Decoder<'v> {
        match &self.parent {
            Some(parent) => Decoder {
                node: parent.node,
                path: parent.path.clone(),
                parent: None,
                options: self.options,
                mode: self.mode,
            },
            None => self.clone(),
        }
    }
}

/// Keyed view over a mapping node.
#[derive(Debug, Clone)]
pub struct KeyedDecoder<'v> {
    ctx: Decoder<'v>,
    map: &'v Map,
}

impl<'v> KeyedDecoder<'v> {
    pub fn path(&self) -> &Path {
        &self.ctx.path
    }

    /// Keys present in the mapping (none while synthesizing).
    pub fn keys(&self) -> impl Iterator<Item = &'v str> + 'v {
        let map: &'v Map = self.map;
        map.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Whether `key` has an entry. Every key is present while synthesizing.
    pub fn contains(&self, key: &str) -> bool {
        self.ctx.mode == Mode::Empty || self.map.contains_key(key)
    }

    fn entry(&self, key: &str) -> Option<&'v Value> {
        match self.ctx.mode {
            Mode::Empty => Some(&NULL),
            _ => self.map.get(key),
        }
    }

    fn key_not_found(&self, key: &str) -> Error {
        Error::KeyNotFound {
            key: key.to_string(),
            path: self.ctx.path.clone(),
        }
    }

    /// The raw node stored under `key`.
    pub fn value(&self, key: &str) -> Result<&'v Value> {
        self.entry(key).ok_or_else(|| self.key_not_found(key))
    }

    /// True when `key` is missing or holds null.
    pub fn decode_nil(&self, key: &str) -> bool {
        self.entry(key).is_absent()
    }

    /// Decode the entry under `key`. A missing key is an error unless `T`
    /// has an absent representation (`Option`, `Value`).
    pub fn decode<T: Decode>(&self, key: &str) -> Result<T> {
        match self.entry(key) {
            Some(node) => self.ctx.nested(node, key).decode(),
            None => T::absent().ok_or_else(|| self.key_not_found(key)),
        }
    }

    /// `None` for a missing or null entry; decoding errors still propagate.
    pub fn decode_if_present<T: Decode>(&self, key: &str) -> Result<Option<T>> {
        match self.entry(key) {
            Some(node) if !node.is_absent() => self.ctx.nested(node, key).decode().map(Some),
            _ => Ok(None),
        }
    }

    /// Keyed view over the mapping stored under `key`.
    pub fn nested_keyed(&self, key: &str) -> Result<KeyedDecoder<'v>> {
        let node = self.value(key)?;
        self.ctx.nested(node, key).keyed_container()
    }

    /// Unkeyed view over the sequence stored under `key`.
    pub fn nested_unkeyed(&self, key: &str) -> Result<UnkeyedDecoder<'v>> {
        let node = self.value(key)?;
        self.ctx.nested(node, key).unkeyed_container()
    }

    /// A decoder for the node under `key`, for shapes that decode a field by hand.
    pub fn nested_decoder(&self, key: &str) -> Result<Decoder<'v>> {
        let node = self.value(key)?;
        Ok(self.ctx.nested(node, key))
    }

    /// The enclosing context of this container.
    pub fn super_decoder(&self) -> Decoder<'v> {
        self.ctx.super_context()
    }
}

/// Cursor over a sequence node.
#[derive(Debug, Clone)]
pub struct UnkeyedDecoder<'v> {
    ctx: Decoder<'v>,
    items: &'v [Value],
    index: usize,
}

impl<'v> UnkeyedDecoder<'v> {
    pub fn path(&self) -> &Path {
        &self.ctx.path
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn is_at_end(&self) -> bool {
        self.index >= self.items.len()
    }

    /// Take the element under the cursor and advance.
    fn advance(&mut self) -> Result<(usize, &'v Value)> {
        let idx = self.index;
        if self.ctx.mode == Mode::Empty {
            self.index += 1;
            return Ok((idx, &NULL));
        }
        let node = self.items.get(idx).ok_or_else(|| Error::IndexOutOfBounds {
            path: self.ctx.path.clone(),
            index: idx as isize,
            len: self.items.len(),
        })?;
        self.index += 1;
        Ok((idx, node))
    }

    /// Decode the next element.
    pub fn decode<T: Decode>(&mut self) -> Result<T> {
        let (idx, node) = self.advance()?;
        self.ctx.nested(node, idx).decode()
    }

    /// If the next element is null, consume it and return `true`.
    pub fn decode_nil(&mut self) -> Result<bool> {
        if self.ctx.mode == Mode::Empty {
            return Ok(true);
        }
        let node = self.items.get(self.index).ok_or_else(|| Error::IndexOutOfBounds {
            path: self.ctx.path.clone(),
            index: self.index as isize,
            len: self.items.len(),
        })?;
        let absent = node.is_absent();
        if absent {
            self.index += 1;
        }
        Ok(absent)
    }

    pub fn skip(&mut self) -> Result<()> {
        self.advance().map(|_| ())
    }

    pub fn nested_keyed(&mut self) -> Result<KeyedDecoder<'v>> {
        let (idx, node) = self.advance()?;
        self.ctx.nested(node, idx).keyed_container()
    }

    pub fn nested_unkeyed(&mut self) -> Result<UnkeyedDecoder<'v>> {
        let (idx, node) = self.advance()?;
        self.ctx.nested(node, idx).unkeyed_container()
    }

    pub fn super_decoder(&self) -> Decoder<'v> {
        self.ctx.super_context()
    }
}

/// View over one scalar node.
#[derive(Debug, Clone)]
pub struct SingleValueDecoder<'v> {
    ctx: Decoder<'v>,
}

impl<'v> SingleValueDecoder<'v> {
    pub fn path(&self) -> &Path {
        &self.ctx.path
    }

    pub fn value(&self) -> &'v Value {
        self.ctx.node
    }

    pub fn decode_nil(&self) -> bool {
        self.ctx.mode == Mode::Empty || self.ctx.node.is_absent()
    }

    fn synthesizing(&self) -> bool {
        self.ctx.mode == Mode::Empty
    }

    fn coerce(&self) -> bool {
        self.ctx.options.coerce_primitives
    }

    pub fn decode_bool(&self) -> Result<bool> {
        if self.synthesizing() {
            return Ok(false);
        }
        convert::to_bool(self.ctx.node, self.coerce(), &self.ctx.path)
    }

    pub fn decode_i64(&self) -> Result<i64> {
        if self.synthesizing() {
            return Ok(0);
        }
        convert::to_i64(self.ctx.node, self.coerce(), &self.ctx.path)
    }

    pub fn decode_u64(&self) -> Result<u64> {
        if self.synthesizing() {
            return Ok(0);
        }
        convert::to_u64(self.ctx.node, self.coerce(), &self.ctx.path)
    }

    pub fn decode_f64(&self) -> Result<f64> {
        if self.synthesizing() {
            return Ok(0.0);
        }
        convert::to_f64(self.ctx.node, self.coerce(), &self.ctx.path)
    }

    pub fn decode_string(&self) -> Result<String> {
        if self.synthesizing() {
            return Ok(String::new());
        }
        convert::to_string(self.ctx.node, self.coerce(), &self.ctx.path)
    }

    /// Decode a `T` from this node. Shapes that are themselves single-value
    /// read in place; keyed and unkeyed shapes re-enter general dispatch.
    pub fn decode<T: Decode>(&mut self) -> Result<T> {
        match decoded_kind::<T>() {
            ContainerKind::SingleValue => T::decode(&mut self.ctx),
            kind => {
                log::trace!(
                    "{} is a {kind} shape; dispatching at {}",
                    std::any::type_name::<T>(),
                    self.ctx.path
                );
                self.ctx.decode()
            }
        }
    }
}
