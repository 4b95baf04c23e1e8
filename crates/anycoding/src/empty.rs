//! Zero-value synthesis.

use crate::codable::Decode;
use crate::decoder::Decoder;
use crate::error::Result;

/// Build a default instance of `T` without any input data.
///
/// Primitives, collections and wrappers come from [`Decode::empty`]. Any
/// other shape is decoded from an empty context: every keyed lookup finds an
/// absent value, every unkeyed container is already at its end, and every
/// single-value read answers nil or zero. Fields recurse the same way.
pub fn synthesize<T: Decode>() -> Result<T> {
    let mut decoder = Decoder::empty();
    decoder.decode()
}
