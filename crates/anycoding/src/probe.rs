//! Container-shape probe.
//!
//! Runs a shape's own `encode`/`decode` against a context in probe mode. The
//! first container the shape asks for comes back as `Err(Error::Probed(kind))`,
//! which the shape propagates with `?` like any other error; the probe then
//! reads the kind off the sentinel. A shape that never asks for a container
//! (or fails for another reason first) is treated as single-value.

use crate::codable::{Decode, Encode};
use crate::decoder::Decoder;
use crate::empty::synthesize;
use crate::encoder::Encoder;
use crate::error::{Error, Result};
use std::fmt;

/// The three container views a shape can present itself as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    Keyed,
    Unkeyed,
    SingleValue,
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ContainerKind::Keyed => "keyed",
            ContainerKind::Unkeyed => "unkeyed",
            ContainerKind::SingleValue => "single-value",
        };
        f.write_str(name)
    }
}

fn kind_from<T>(outcome: Result<T>) -> ContainerKind {
    match outcome {
        Err(Error::Probed(kind)) => kind,
        Ok(_) => ContainerKind::SingleValue,
        Err(err) => {
            log::trace!("probe ended without a container: {err}");
            ContainerKind::SingleValue
        }
    }
}

/// Which container `value` asks for when it encodes itself.
pub fn encoded_kind<T: Encode + ?Sized>(value: &T) -> ContainerKind {
    let mut encoder = Encoder::probing();
    let kind = kind_from(value.encode(&mut encoder));
    log::trace!("{} encodes through a {kind} container", std::any::type_name::<T>());
    kind
}

/// Which container `T` asks for when it decodes itself.
pub fn decoded_kind<T: Decode>() -> ContainerKind {
    let mut decoder = Decoder::probing();
    kind_from(T::decode(&mut decoder))
}

/// Which container the shape `T` uses: encodes a synthesized zero value.
pub fn probe<T: Encode + Decode>() -> Result<ContainerKind> {
    let zero = synthesize::<T>()?;
    Ok(encoded_kind(&zero))
}
