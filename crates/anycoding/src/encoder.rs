//! Encoder engine: typed value → value tree.
//!
//! An [`Encoder`] owns the tree under construction and a current coding path.
//! Shapes implementing [`Encode`] ask it for a container view positioned at
//! that path and write into it. Containers remember their own absolute path,
//! so writes land in place however deeply they nest, and each nested write
//! runs with the encoder's path set to the child's location and restored
//! afterwards (on error too). A field's own containers link back to the
//! container that wrote the field, the same way decoding contexts do.

use crate::codable::Encode;
use crate::convert;
use crate::error::{Error, Result};
use crate::path::{Path, PathKey};
use crate::probe::{encoded_kind, ContainerKind};
use crate::types::{Map, Value};

/// Encode `value` into a fresh tree.
///
/// The root is seeded with an empty mapping, an empty sequence or null,
/// according to which container `value` asks for.
pub fn encode<T: Encode + ?Sized>(value: &T) -> Result<Value> {
    let mut encoder = Encoder::new();
    encoder.root = match encoded_kind(value) {
        ContainerKind::Keyed => Value::Mapping(Map::new()),
        ContainerKind::Unkeyed => Value::Sequence(Vec::new()),
        ContainerKind::SingleValue => Value::Null,
    };
    encoder.encode_value(value)?;
    Ok(encoder.into_value())
}

/// Encoding context: the tree being built and the current coding path.
#[derive(Debug, Clone, Default)]
pub struct Encoder {
    root: Value,
    path: Path,
    /// Base of the container whose entry is being encoded, if any.
    parent: Option<Path>,
    probing: bool,
}

impl Encoder {
    pub fn new() -> Self {
        Encoder::default()
    }

    pub(crate) fn probing() -> Self {
        Encoder {
            probing: true,
            ..Encoder::default()
        }
    }

    /// The current coding path.
    ///
    /// # Panics
    ///
    /// While probing a value's container kind.
    pub fn path(&self) -> &Path {
        assert!(
            !self.probing,
            "the coding path is not available while probing a container kind"
        );
        &self.path
    }

    /// The tree built so far.
    pub fn root(&self) -> &Value {
        &self.root
    }

    pub fn into_value(self) -> Value {
        self.root
    }

    /// Encode `value` at the current path.
    pub fn encode_value<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        value.encode(self)
    }

    /// Run `f` positioned at `path` under the container at `parent`,
    /// restoring the previous position afterwards.
    fn scoped<R>(
        &mut self,
        path: Path,
        parent: Option<Path>,
        f: impl FnOnce(&mut Self) -> Result<R>,
    ) -> Result<R> {
        let saved_path = std::mem::replace(&mut self.path, path);
        let saved_parent = std::mem::replace(&mut self.parent, parent);
        let outcome = f(self);
        self.path = saved_path;
        self.parent = saved_parent;
        outcome
    }

    fn write(&mut self, path: &Path, value: Value) {
        log::trace!("write {} at {path}", value.kind());
        self.root.set(path, value);
    }

    /// Make sure `path` holds a container of `kind`, replacing anything else there.
    fn seed(&mut self, path: &Path, kind: ContainerKind) -> Result<()> {
        if self.probing {
            return Err(Error::Probed(kind));
        }
        let present = self.root.at(path);
        match kind {
            ContainerKind::Keyed if !matches!(present, Some(Value::Mapping(_))) => {
                self.write(path, Value::Mapping(Map::new()));
            }
            ContainerKind::Unkeyed if !matches!(present, Some(Value::Sequence(_))) => {
                self.write(path, Value::Sequence(Vec::new()));
            }
            _ => {}
        }
        Ok(())
    }

    fn sequence_len(&self, path: &Path) -> usize {
        self.root
            .at(path)
            .and_then(Value::as_sequence)
            .map_or(0, Vec::len)
    }

    /// A keyed container at the current path.
    pub fn keyed_container(&mut self) -> Result<KeyedEncoder<'_>> {
        let base = self.path.clone();
        self.seed(&base, ContainerKind::Keyed)?;
        let parent = self.parent.clone();
        Ok(KeyedEncoder {
            encoder: self,
            base,
            parent,
        })
    }

    /// An unkeyed container at the current path. Appends continue after any
    /// elements already there.
    pub fn unkeyed_container(&mut self) -> Result<UnkeyedEncoder<'_>> {
        let base = self.path.clone();
        self.seed(&base, ContainerKind::Unkeyed)?;
        let count = self.sequence_len(&base);
        let parent = self.parent.clone();
        Ok(UnkeyedEncoder {
            encoder: self,
            base,
            parent,
            count,
        })
    }

    /// A single-value container at the current path.
    pub fn single_value_container(&mut self) -> Result<SingleValueEncoder<'_>> {
        if self.probing {
            return Err(Error::Probed(ContainerKind::SingleValue));
        }
        let base = self.path.clone();
        let parent = self.parent.clone();
        Ok(SingleValueEncoder {
            encoder: self,
            base,
            parent,
        })
    }

    fn nested_keyed(&mut self, base: Path, parent: Path) -> Result<KeyedEncoder<'_>> {
        self.seed(&base, ContainerKind::Keyed)?;
        Ok(KeyedEncoder {
            encoder: self,
            base,
            parent: Some(parent),
        })
    }

    fn nested_unkeyed(&mut self, base: Path, parent: Path) -> Result<UnkeyedEncoder<'_>> {
        self.seed(&base, ContainerKind::Unkeyed)?;
        let count = self.sequence_len(&base);
        Ok(UnkeyedEncoder {
            encoder: self,
            base,
            parent: Some(parent),
            count,
        })
    }

    fn super_at(&mut self, path: Path) -> &mut Encoder {
        self.path = path;
        self.parent = None;
        self
    }
}

/// Keyed writer over a mapping node.
#[derive(Debug)]
pub struct KeyedEncoder<'e> {
    encoder: &'e mut Encoder,
    base: Path,
    parent: Option<Path>,
}

impl KeyedEncoder<'_> {
    pub fn path(&self) -> &Path {
        &self.base
    }

    pub fn encode<T: Encode + ?Sized>(&mut self, key: &str, value: &T) -> Result<()> {
        let path = self.base.child(key);
        let parent = Some(self.base.clone());
        self.encoder
            .scoped(path, parent, |encoder| encoder.encode_value(value))
    }

    pub fn encode_nil(&mut self, key: &str) -> Result<()> {
        let path = self.base.child(key);
        self.encoder.write(&path, Value::Null);
        Ok(())
    }

    /// Write `value` when it is `Some`; leave the key out otherwise.
    pub fn encode_if_present<T: Encode>(&mut self, key: &str, value: &Option<T>) -> Result<()> {
        match value {
            Some(inner) => self.encode(key, inner),
            None => Ok(()),
        }
    }

    pub fn nested_keyed(&mut self, key: &str) -> Result<KeyedEncoder<'_>> {
        let base = self.base.child(key);
        self.encoder.nested_keyed(base, self.base.clone())
    }

    pub fn nested_unkeyed(&mut self, key: &str) -> Result<UnkeyedEncoder<'_>> {
        let base = self.base.child(key);
        self.encoder.nested_unkeyed(base, self.base.clone())
    }

    /// The encoder positioned at the enclosing container, or at this one at the top level.
    pub fn super_encoder(&mut self) -> &mut Encoder {
        let at = self.parent.clone().unwrap_or_else(|| self.base.clone());
        self.encoder.super_at(at)
    }
}

/// Appending writer over a sequence node.
#[derive(Debug)]
pub struct UnkeyedEncoder<'e> {
    encoder: &'e mut Encoder,
    base: Path,
    parent: Option<Path>,
    count: usize,
}

impl UnkeyedEncoder<'_> {
    pub fn path(&self) -> &Path {
        &self.base
    }

    /// Number of elements written so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Path of the next slot; the count advances even if the write then fails.
    fn next_slot(&mut self) -> Path {
        let path = self.base.child(PathKey::from(self.count));
        self.count += 1;
        path
    }

    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        let path = self.next_slot();
        let parent = Some(self.base.clone());
        self.encoder
            .scoped(path, parent, |encoder| encoder.encode_value(value))
    }

    pub fn encode_nil(&mut self) -> Result<()> {
        let path = self.next_slot();
        self.encoder.write(&path, Value::Null);
        Ok(())
    }

    pub fn nested_keyed(&mut self) -> Result<KeyedEncoder<'_>> {
        let base = self.next_slot();
        self.encoder.nested_keyed(base, self.base.clone())
    }

    pub fn nested_unkeyed(&mut self) -> Result<UnkeyedEncoder<'_>> {
        let base = self.next_slot();
        self.encoder.nested_unkeyed(base, self.base.clone())
    }

    pub fn super_encoder(&mut self) -> &mut Encoder {
        let at = self.parent.clone().unwrap_or_else(|| self.base.clone());
        self.encoder.super_at(at)
    }
}

/// Writer for one scalar node.
#[derive(Debug)]
pub struct SingleValueEncoder<'e> {
    encoder: &'e mut Encoder,
    base: Path,
    parent: Option<Path>,
}

impl SingleValueEncoder<'_> {
    pub fn path(&self) -> &Path {
        &self.base
    }

    pub fn encode_nil(&mut self) -> Result<()> {
        self.encode_value(Value::Null)
    }

    pub fn encode_bool(&mut self, value: bool) -> Result<()> {
        self.encode_value(Value::Bool(value))
    }

    pub fn encode_i64(&mut self, value: i64) -> Result<()> {
        self.encode_value(Value::Integer(value))
    }

    /// Fails when `value` does not fit in an `i64`.
    pub fn encode_u64(&mut self, value: u64) -> Result<()> {
        let converted = convert::from_u64(value, &self.base)?;
        self.encode_value(converted)
    }

    pub fn encode_f64(&mut self, value: f64) -> Result<()> {
        self.encode_value(Value::Float(value))
    }

    pub fn encode_str(&mut self, value: &str) -> Result<()> {
        self.encode_value(Value::String(value.to_string()))
    }

    /// Store a ready-made node (or subtree) as is.
    pub fn encode_value(&mut self, value: Value) -> Result<()> {
        self.encoder.write(&self.base, value);
        Ok(())
    }

    /// Encode any shape in place of this scalar.
    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) -> Result<()> {
        let base = self.base.clone();
        let parent = self.parent.clone();
        self.encoder
            .scoped(base, parent, |encoder| encoder.encode_value(value))
    }
}
