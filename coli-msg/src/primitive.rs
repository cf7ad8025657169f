//! CDR primitive codecs: every fixed-width primitive aligns on its
//! natural size, then reads/writes its bytes converting between CDR and
//! host byte order (see `SPEC_FULL.md` §4.2, §6.1).

use crate::channel::Channel;
use crate::codec::{Decode, Encode};
use crate::error::MarshalError;

macro_rules! impl_numeric {
  ($ty:ty, $align:expr) => {
    impl Encode for $ty {
      fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
        channel.skip(0, $align)?;
        let mut bytes = self.to_le_bytes();
        channel.maybe_swap_to(&mut bytes);
        channel.write(&bytes)
      }
    }

    impl Decode for $ty {
      fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
        channel.skip(0, $align)?;
        let mut bytes = [0u8; core::mem::size_of::<$ty>()];
        bytes.copy_from_slice(channel.read(core::mem::size_of::<$ty>())?);
        channel.maybe_swap_to(&mut bytes);
        Ok(<$ty>::from_le_bytes(bytes))
      }
    }
  };
}

impl Channel {
  /// Byte-swap a CDR-vs-host-order buffer measured against little-endian
  /// (the canonical order `to_le_bytes`/`from_le_bytes` produce).
  pub(crate) fn maybe_swap_to(&self, bytes: &mut [u8]) {
    if !self.little_endian() {
      bytes.reverse();
    }
  }
}

impl_numeric!(i16, 2);
impl_numeric!(u16, 2);
impl_numeric!(i32, 4);
impl_numeric!(u32, 4);
impl_numeric!(i64, 8);
impl_numeric!(u64, 8);
impl_numeric!(f32, 4);
impl_numeric!(f64, 8);

impl Encode for bool {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    channel.write(&[if *self { 1 } else { 0 }])
  }
}

impl Decode for bool {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    Ok(channel.read(1)?[0] != 0)
  }
}

/// CDR `octet`: an opaque byte, no alignment.
impl Encode for u8 {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    channel.write(&[*self])
  }
}

impl Decode for u8 {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    Ok(channel.read(1)?[0])
  }
}

/// CDR `char`: an 8-bit character, distinct from `octet` only in
/// intent — same wire representation, no alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorbaChar(pub u8);

impl Encode for CorbaChar {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    self.0.encode(channel)
  }
}

impl Decode for CorbaChar {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    u8::decode(channel).map(Self)
  }
}

/// CDR `wchar`: a 16-bit wide character. Alignment is 2 in GIOP 1.2+ and
/// 0 (none) in 1.0/1.1 (see `SPEC_FULL.md` §6.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WChar(pub u16);

impl Encode for WChar {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    let align = if channel.version().at_least_1_2() { 2 } else { 0 };
    channel.skip(0, align)?;
    let mut bytes = self.0.to_le_bytes();
    channel.maybe_swap_to(&mut bytes);
    channel.write(&bytes)
  }
}

impl Decode for WChar {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    let align = if channel.version().at_least_1_2() { 2 } else { 0 };
    channel.skip(0, align)?;
    let mut bytes = [0u8; 2];
    bytes.copy_from_slice(channel.read(2)?);
    channel.maybe_swap_to(&mut bytes);
    Ok(Self(u16::from_le_bytes(bytes)))
  }
}

/// CDR `long double`: a 128-bit extended-precision float.
///
/// Rust has no stable 128-bit float type, and this crate has no need to
/// do arithmetic on one — only to carry it through unmodified. This
/// newtype stores the raw 16 CDR octets verbatim (see `SPEC_FULL.md` §9's
/// open-question resolution).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongDouble(pub [u8; 16]);

impl Encode for LongDouble {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    channel.skip(0, 16)?;
    let mut bytes = self.0;
    if !channel.little_endian() {
      bytes.reverse();
    }
    channel.write(&bytes)
  }
}

impl Decode for LongDouble {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    channel.skip(0, 16)?;
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(channel.read(16)?);
    if !channel.little_endian() {
      bytes.reverse();
    }
    Ok(Self(bytes))
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
  fn primitive_roundtrip_scenario() {
    // SPEC_FULL.md §8.3 scenario 1: u32 = 0x01020304 on a little-endian
    // 1.2 channel encodes to exactly these 4 octets.
    let mut ch = Channel::new_encode(GiopVersion::V1_2, true);
    0x01020304u32.encode(&mut ch).unwrap();
    assert_eqb_iter!(ch.buffer(), &[0x04, 0x03, 0x02, 0x01]);
  }

  #[test]
  fn big_endian_roundtrip() {
    let mut ch = Channel::new_encode(GiopVersion::V1_2, false);
    0x01020304u32.encode(&mut ch).unwrap();
    assert_eqb_iter!(ch.buffer(), &[0x01, 0x02, 0x03, 0x04]);
  }

  #[test]
  fn alignment_pads_with_zero() {
    let mut ch = Channel::new_encode(GiopVersion::V1_2, true);
    1u8.encode(&mut ch).unwrap();
    42i32.encode(&mut ch).unwrap();
    assert_eqb_iter!(ch.buffer(), &[1, 0, 0, 0, 42, 0, 0, 0]);
  }

  #[test]
  fn wchar_alignment_differs_by_version() {
    let mut ch12 = Channel::new_encode(GiopVersion::V1_2, true);
    1u8.encode(&mut ch12).unwrap();
    WChar(0x41).encode(&mut ch12).unwrap();
    assert_eqb_iter!(ch12.buffer(), &[1, 0, 0x41, 0]);

    let mut ch10 = Channel::new_encode(GiopVersion::V1_0, true);
    1u8.encode(&mut ch10).unwrap();
    WChar(0x41).encode(&mut ch10).unwrap();
    assert_eqb_iter!(ch10.buffer(), &[1, 0x41, 0]);
  }

  #[test]
  fn long_double_roundtrip() {
    let v = LongDouble([7u8; 16]);
    assert_eq!(roundtrip(GiopVersion::V1_2, &v), v);
  }

  #[test]
  fn numeric_roundtrips() {
    assert_eq!(roundtrip(GiopVersion::V1_2, &(-1i16)), -1i16);
    assert_eq!(roundtrip(GiopVersion::V1_2, &(1234u32)), 1234u32);
    assert_eq!(roundtrip(GiopVersion::V1_2, &(9_999_999_999i64)), 9_999_999_999i64);
    assert_eq!(roundtrip(GiopVersion::V1_2, &(1.5f64)), 1.5f64);
  }
}
