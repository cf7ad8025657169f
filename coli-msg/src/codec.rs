//! The `Encode`/`Decode` trait pair every marshalable type implements.
//!
//! The original library dispatches decode, encode, and erase out of one
//! mode-multiplexed function per type. Here that collapses to two traits;
//! there is no `Erase` trait at all; because every owned field is a plain
//! `String`/`Vec<u8>`/etc., `Drop` already walks and frees the type tree
//! (see `SPEC_FULL.md` §3.5, §4.3).

use crate::channel::Channel;
use crate::error::MarshalError;

/// Write `Self` onto a channel in encode mode, in declared field order.
pub trait Encode {
  /// Encode `self` onto `channel`.
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError>;
}

/// Read `Self` off a channel in decode mode, in declared field order.
pub trait Decode: Sized {
  /// Decode a value of `Self` from `channel`.
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError>;
}

/// Round-trip `v` through a fresh little-endian encode/decode channel
/// pair at `version`. Exercised extensively by this crate's own tests;
/// also handy for callers writing their own codec tests.
#[cfg(test)]
pub(crate) fn roundtrip<T>(version: crate::version::GiopVersion, v: &T) -> T
  where T: Encode + Decode
{
  let mut enc = Channel::new_encode(version, true);
  v.encode(&mut enc).unwrap();
  let bytes = enc.into_buffer();
  let mut dec = Channel::new_decode(version, true, bytes, 0);
  T::decode(&mut dec).unwrap()
}
