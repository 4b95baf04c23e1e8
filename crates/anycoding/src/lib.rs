//! # anycoding
//!
//! Bridge between an untyped, JSON-shaped value tree and strongly typed Rust
//! values. Types describe themselves through the [`Encode`] / [`Decode`]
//! traits by asking for one of three container views (keyed, unkeyed,
//! single-value); the engines turn that description into a [`Value`] tree
//! and back, tracking the coding path so every error says where it happened.
//!
//! ## Quick start
//!
//! ```rust
//! use anycoding::{path, Value};
//!
//! let mut doc = Value::from_json_str(r#"{"items":[null,1,2]}"#).unwrap();
//! assert_eq!(doc.get(path!["items", -1]).unwrap(), &Value::from(2));
//!
//! doc.set(path!["items", 5], 9);
//! assert_eq!(doc.to_json_string().unwrap(), r#"{"items":[null,1,2,null,null,9]}"#);
//!
//! let items: Vec<Option<i64>> = anycoding::decode(&doc["items"]).unwrap();
//! assert_eq!(items[1], Some(1));
//! ```
//!
//! ## Modules
//!
//! - [`types`]: the `Value` tree
//! - [`path`]: coding paths, `get`/`set` by path, bidirectional indices
//! - [`equality`]: structural equality and hashing
//! - [`optional`]: flattening of nested optionals
//! - [`codable`]: the `Encode` / `Decode` traits and std impls
//! - [`encoder`] / [`decoder`]: the engines and their container views
//! - [`convert`]: primitive conversion table
//! - [`probe`]: container-kind discovery
//! - [`empty`]: zero-value synthesis
//! - [`json`]: serde / JSON text boundary
//! - [`error`]: error types

pub mod codable;
pub mod convert;
pub mod decoder;
pub mod empty;
pub mod encoder;
pub mod equality;
pub mod error;
pub mod json;
pub mod optional;
pub mod path;
pub mod probe;
pub mod types;

pub use codable::{decode_raw, encode_raw, Decode, Encode, RawValue};
pub use decoder::{
    decode, decode_with, DecodeOptions, Decoder, KeyedDecoder, SingleValueDecoder,
    UnkeyedDecoder,
};
pub use empty::synthesize;
pub use encoder::{encode, Encoder, KeyedEncoder, SingleValueEncoder, UnkeyedEncoder};
pub use equality::{equal_flattened, structural_eq};
pub use error::{Error, Result};
pub use json::{from_json, to_json};
pub use optional::{flatten, is_absent, Optionality};
pub use path::{bidirectional_index, IntoPath, Path, PathKey};
pub use probe::{decoded_kind, encoded_kind, probe, ContainerKind};
pub use types::{Map, Value, ValueKind};
