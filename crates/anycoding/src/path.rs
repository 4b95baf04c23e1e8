//! Paths into a value tree, and get/set along them.
//!
//! A [`Path`] is an ordered list of [`PathKey`]s. String keys address mapping
//! entries, integer keys address sequence slots. Integer keys may be negative:
//! `-1` is the last element, wrapping around like a circular buffer.
//!
//! # Path forms
//!
//! - `"a.b.c"` -- dot path, split on `.` with empty segments dropped (all string keys)
//! - `path!["items", -1]` -- mixed keys
//! - `3`, `-1` -- a single index
//! - `Path::parse("items.-1")` -- dot path where integer-looking segments become indices
//!
//! # Reads and writes
//!
//! Reads fail with a locatable error. Writes never fail: a node of the wrong
//! kind is replaced by an empty mapping/sequence before the write descends,
//! and sequences are padded with `Null` up to the written index.
//! [`Value::try_set`] is the strict variant that refuses to replace data.
//!
//! An integer key that meets an existing mapping addresses the entry named by
//! its decimal text, for reads and writes alike: `obj.0` on `{"0": 1}` is `1`.

use crate::error::{Error, Result};
use crate::types::{Map, Value, ValueKind};
use std::fmt;

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathKey {
    /// Mapping key.
    Key(String),
    /// Sequence index; negative values count from the end.
    Index(isize),
}

impl PathKey {
    /// The key as mapping text (`Index(3)` reads as `"3"`).
    pub fn as_key(&self) -> String {
        match self {
            PathKey::Key(k) => k.clone(),
            PathKey::Index(i) => i.to_string(),
        }
    }

    pub fn as_index(&self) -> Option<isize> {
        match self {
            PathKey::Index(i) => Some(*i),
            PathKey::Key(_) => None,
        }
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Key(k) => f.write_str(k),
            PathKey::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for PathKey {
    fn from(key: &str) -> Self {
        PathKey::Key(key.to_string())
    }
}

impl From<String> for PathKey {
    fn from(key: String) -> Self {
        PathKey::Key(key)
    }
}

impl From<&String> for PathKey {
    fn from(key: &String) -> Self {
        PathKey::Key(key.clone())
    }
}

macro_rules! index_key {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PathKey {
                fn from(idx: $ty) -> Self {
                    PathKey::Index(idx as isize)
                }
            }
        )*
    };
}

index_key!(i32, i64, isize, usize, u32);

/// An ordered list of keys; the empty path is the whole value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<PathKey>);

impl Path {
    pub fn root() -> Self {
        Path(Vec::new())
    }

    /// Split a dot path into string keys. `"a..b."` is `["a", "b"]`.
    pub fn from_dot(dot_path: &str) -> Self {
        Path(
            dot_path
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(PathKey::from)
                .collect(),
        )
    }

    /// Like [`Path::from_dot`], but segments that parse as integers become indices.
    pub fn parse(text: &str) -> Self {
        Path(
            text.split('.')
                .filter(|segment| !segment.is_empty())
                .map(|segment| match segment.parse::<isize>() {
                    Ok(idx) => PathKey::Index(idx),
                    Err(_) => PathKey::from(segment),
                })
                .collect(),
        )
    }

    pub fn keys(&self) -> &[PathKey] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn push(&mut self, key: impl Into<PathKey>) {
        self.0.push(key.into());
    }

    pub fn pop(&mut self) -> Option<PathKey> {
        self.0.pop()
    }

    /// A copy of this path with `key` appended.
    pub fn child(&self, key: impl Into<PathKey>) -> Path {
        let mut keys = self.0.clone();
        keys.push(key.into());
        Path(keys)
    }

    pub fn last(&self) -> Option<&PathKey> {
        self.0.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathKey> {
        self.0.iter()
    }
}

/// `/a/b/0`; the root prints as `/`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("/");
        }
        for key in &self.0 {
            write!(f, "/{key}")?;
        }
        Ok(())
    }
}

impl From<Vec<PathKey>> for Path {
    fn from(keys: Vec<PathKey>) -> Self {
        Path(keys)
    }
}

impl<K: Into<PathKey>> FromIterator<K> for Path {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Path(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathKey;
    type IntoIter = std::slice::Iter<'a, PathKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Build a [`Path`] from mixed string and integer keys: `path!["items", -1]`.
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($key:expr),+ $(,)?) => {
        $crate::Path::from(vec![$($crate::PathKey::from($key)),+])
    };
}

/// Anything that can address a node: paths, keys, dot strings, key lists.
pub trait IntoPath {
    fn into_path(self) -> Path;
}

impl IntoPath for Path {
    fn into_path(self) -> Path {
        self
    }
}

impl IntoPath for &Path {
    fn into_path(self) -> Path {
        self.clone()
    }
}

impl IntoPath for PathKey {
    fn into_path(self) -> Path {
        Path(vec![self])
    }
}

impl IntoPath for &str {
    fn into_path(self) -> Path {
        Path::from_dot(self)
    }
}

impl IntoPath for String {
    fn into_path(self) -> Path {
        Path::from_dot(&self)
    }
}

impl IntoPath for &String {
    fn into_path(self) -> Path {
        Path::from_dot(self)
    }
}

macro_rules! index_path {
    ($($ty:ty),*) => {
        $(
            impl IntoPath for $ty {
                fn into_path(self) -> Path {
                    Path(vec![PathKey::from(self)])
                }
            }
        )*
    };
}

index_path!(i32, i64, isize, usize, u32);

impl<K: Clone + Into<PathKey>> IntoPath for &[K] {
    fn into_path(self) -> Path {
        self.iter().cloned().collect()
    }
}

impl<K: Into<PathKey>, const N: usize> IntoPath for [K; N] {
    fn into_path(self) -> Path {
        self.into_iter().collect()
    }
}

impl<K: Into<PathKey>> IntoPath for Vec<K> {
    fn into_path(self) -> Path {
        self.into_iter().collect()
    }
}

/// Resolve a possibly negative index against a sequence of `len` elements.
///
/// Non-negative indices are returned unchanged, even past the end (writes pad
/// up to them). Negative indices wrap modulo `len`; against an empty sequence
/// they resolve to `0`.
pub fn bidirectional_index(len: usize, idx: isize) -> usize {
    if idx >= 0 {
        return idx as usize;
    }
    if len == 0 {
        return 0;
    }
    (len as isize + idx).rem_euclid(len as isize) as usize
}

impl Value {
    /// The node at `path`, or the reason it cannot be reached.
    pub fn get(&self, path: impl IntoPath) -> Result<&Value> {
        let path = path.into_path();
        let mut node = self;
        for (depth, key) in path.iter().enumerate() {
            node = step(node, key, &path, depth)?;
        }
        Ok(node)
    }

    /// Try form of [`Value::get`].
    pub fn at(&self, path: impl IntoPath) -> Option<&Value> {
        self.get(path).ok()
    }

    /// Mutable access to an existing node; never creates structure.
    pub fn get_mut(&mut self, path: impl IntoPath) -> Result<&mut Value> {
        let path = path.into_path();
        let mut node = self;
        for (depth, key) in path.iter().enumerate() {
            node = step_mut(node, key, &path, depth)?;
        }
        Ok(node)
    }

    /// Write `value` at `path`, building or replacing structure as needed.
    ///
    /// An empty path replaces the whole tree.
    pub fn set(&mut self, path: impl IntoPath, value: impl Into<Value>) {
        let path = path.into_path();
        set_at(self, path.keys(), value.into());
    }

    /// Strict [`Value::set`]: fails instead of replacing a non-null node of the
    /// wrong kind. Missing mapping entries and sequence slots are still created.
    pub fn try_set(&mut self, path: impl IntoPath, value: impl Into<Value>) -> Result<()> {
        let path = path.into_path();
        check_writable(self, &path, 0)?;
        set_at(self, path.keys(), value.into());
        Ok(())
    }
}

fn prefix(path: &Path, depth: usize) -> Path {
    Path(path.keys()[..=depth].to_vec())
}

fn step<'v>(node: &'v Value, key: &PathKey, path: &Path, depth: usize) -> Result<&'v Value> {
    match node {
        Value::Mapping(map) => {
            let name = key.as_key();
            map.get(&name).ok_or_else(|| Error::PathDoesNotExist {
                path: prefix(path, depth),
                reason: format!("key '{name}' does not exist"),
            })
        }
        Value::Sequence(items) => {
            let idx = sequence_slot(items.len(), key, path, depth)?;
            items.get(idx).ok_or_else(|| Error::IndexOutOfBounds {
                path: prefix(path, depth),
                index: idx as isize,
                len: items.len(),
            })
        }
        scalar => Err(Error::PathDoesNotExist {
            path: prefix(path, depth),
            reason: format!("indexing into a {} is not allowed", scalar.kind()),
        }),
    }
}

fn step_mut<'v>(
    node: &'v mut Value,
    key: &PathKey,
    path: &Path,
    depth: usize,
) -> Result<&'v mut Value> {
    match node {
        Value::Mapping(map) => {
            let name = key.as_key();
            map.get_mut(&name).ok_or_else(|| Error::PathDoesNotExist {
                path: prefix(path, depth),
                reason: format!("key '{name}' does not exist"),
            })
        }
        Value::Sequence(items) => {
            let idx = sequence_slot(items.len(), key, path, depth)?;
            let len = items.len();
            items.get_mut(idx).ok_or_else(|| Error::IndexOutOfBounds {
                path: prefix(path, depth),
                index: idx as isize,
                len,
            })
        }
        scalar => Err(Error::PathDoesNotExist {
            path: prefix(path, depth),
            reason: format!("indexing into a {} is not allowed", scalar.kind()),
        }),
    }
}

fn sequence_slot(len: usize, key: &PathKey, path: &Path, depth: usize) -> Result<usize> {
    match key {
        PathKey::Index(i) => Ok(bidirectional_index(len, *i)),
        PathKey::Key(k) => Err(Error::PathDoesNotExist {
            path: prefix(path, depth),
            reason: format!("sequences are indexed by integers, got key '{k}'"),
        }),
    }
}

fn set_at(node: &mut Value, keys: &[PathKey], value: Value) {
    let Some((head, rest)) = keys.split_first() else {
        *node = value;
        return;
    };
    // An existing mapping takes an integer key as its text, matching `get`.
    if let (PathKey::Index(i), Value::Mapping(map)) = (head, &mut *node) {
        set_at(map.entry(i.to_string()).or_default(), rest, value);
        return;
    }
    match head {
        PathKey::Index(i) => {
            let mut items = match node.take() {
                Value::Sequence(items) => items,
                Value::Null => Vec::new(),
                other => {
                    log::debug!("replacing {} with a sequence to write index {i}", other.kind());
                    Vec::new()
                }
            };
            let idx = bidirectional_index(items.len(), *i);
            if idx >= items.len() {
                items.resize(idx + 1, Value::Null);
            }
            set_at(&mut items[idx], rest, value);
            *node = Value::Sequence(items);
        }
        PathKey::Key(k) => {
            let mut map = match node.take() {
                Value::Mapping(map) => map,
                Value::Null => Map::new(),
                other => {
                    log::debug!("replacing {} with a mapping to write key '{k}'", other.kind());
                    Map::new()
                }
            };
            set_at(map.entry(k.clone()).or_default(), rest, value);
            *node = Value::Mapping(map);
        }
    }
}

fn check_writable(node: &Value, path: &Path, depth: usize) -> Result<()> {
    let Some(key) = path.keys().get(depth) else {
        return Ok(());
    };
    let expected = match key {
        PathKey::Index(_) => ValueKind::Sequence,
        PathKey::Key(_) => ValueKind::Mapping,
    };
    match (node, key) {
        (Value::Null, _) => Ok(()),
        (Value::Sequence(items), PathKey::Index(i)) => {
            match items.get(bidirectional_index(items.len(), *i)) {
                Some(child) => check_writable(child, path, depth + 1),
                None => Ok(()),
            }
        }
        (Value::Mapping(map), key) => match map.get(&key.as_key()) {
            Some(child) => check_writable(child, path, depth + 1),
            None => Ok(()),
        },
        (other, _) => Err(Error::ContainerKindMismatch {
            expected,
            found: other.kind(),
            path: Path(path.keys()[..depth].to_vec()),
        }),
    }
}
