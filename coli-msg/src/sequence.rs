//! CDR sequence/array codecs (see `SPEC_FULL.md` §4.2, §8.2).
//!
//! A CDR sequence is `(u32 count, elements...)`; an octet sequence is
//! just the specialization where the element codec is `u8`, so both are
//! modeled by one generic `impl<T> Encode/Decode for Vec<T>`. A CDR array
//! is the same element run without the count prefix.

use crate::channel::Channel;
use crate::codec::{Decode, Encode};
use crate::error::MarshalError;

/// An octet sequence; `Vec<u8>` already implements the CDR sequence
/// codec generically, this alias just names the common case.
pub type OctetSeq = Vec<u8>;

impl<T: Encode> Encode for Vec<T> {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    (self.len() as u32).encode(channel)?;
    for elem in self {
      elem.encode(channel)?;
    }
    Ok(())
  }
}

impl<T: Decode> Decode for Vec<T> {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    let count = u32::decode(channel)? as usize;
    let mut out = Vec::with_capacity(count.min(1 << 20));
    for _ in 0..count {
      out.push(T::decode(channel)?);
    }
    Ok(out)
  }
}

/// A CDR array: a fixed-count element run with no length prefix, the
/// count being a compile-time constant of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CdrArray<T, const N: usize>(pub [T; N]);

impl<T: Encode, const N: usize> Encode for CdrArray<T, N> {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    for elem in &self.0 {
      elem.encode(channel)?;
    }
    Ok(())
  }
}

impl<T: Decode + Copy + Default, const N: usize> Decode for CdrArray<T, N> {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    let mut out = [T::default(); N];
    for slot in out.iter_mut() {
      *slot = T::decode(channel)?;
    }
    Ok(CdrArray(out))
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::assert_eqb_iter;
  use crate::codec::roundtrip;
  use crate::version::GiopVersion;

  #[test]
  fn empty_sequence_is_single_zero() {
    let mut ch = Channel::new_encode(GiopVersion::V1_2, true);
    Vec::<u32>::new().encode(&mut ch).unwrap();
    assert_eqb_iter!(ch.buffer(), &[0, 0, 0, 0]);
  }

  #[test]
  fn octet_seq_roundtrip() {
    let v: OctetSeq = vec![1, 2, 3, 4, 5];
    assert_eq!(roundtrip(GiopVersion::V1_2, &v), v);
  }

  #[test]
  fn sequence_of_longs_roundtrip() {
    let v: Vec<u32> = vec![1, 2, 3];
    assert_eq!(roundtrip(GiopVersion::V1_2, &v), v);
  }

  #[test]
  fn array_has_no_length_prefix() {
    let mut ch = Channel::new_encode(GiopVersion::V1_2, true);
    CdrArray([1u8, 2, 3]).encode(&mut ch).unwrap();
    assert_eqb_iter!(ch.buffer(), &[1, 2, 3]);
  }
}
