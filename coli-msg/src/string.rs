//! CDR `string`/`wstring` codecs (see `SPEC_FULL.md` §4.2, §8.2).

use crate::channel::Channel;
use crate::codec::{Decode, Encode};
use crate::error::MarshalError;

/// CDR `string`: a 4-byte-aligned length (content + trailing NUL),
/// followed by the content and a NUL octet. The empty string and a null
/// pointer both serialize as length 1 plus a lone NUL.
impl Encode for String {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    let len = self.len() as u32 + 1;
    len.encode(channel)?;
    channel.write(self.as_bytes())?;
    channel.write(&[0u8])
  }
}

impl Decode for String {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    let len = u32::decode(channel)? as usize;
    if len == 0 {
      return Err(MarshalError::ProtocolError("string length prefix was 0 (must include NUL)".into()));
    }
    let bytes = channel.read(len)?;
    let (content, nul) = bytes.split_at(len - 1);
    if nul != [0u8] {
      return Err(MarshalError::ProtocolError("string not NUL-terminated".into()));
    }
    String::from_utf8(content.to_vec()).map_err(|e| MarshalError::ProtocolError(e.to_string()))
  }
}

/// CDR `wstring`. In GIOP 1.2+, the length is a byte count of UTF-16 data
/// with no terminator; in 1.0/1.1 it is a wide-character count including
/// a terminating wide NUL.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WString(pub String);

impl Encode for WString {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    let units: Vec<u16> = self.0.encode_utf16().collect();

    if channel.version().at_least_1_2() {
      let byte_len = (units.len() * 2) as u32;
      byte_len.encode(channel)?;
      for u in &units {
        let mut bytes = u.to_le_bytes();
        channel.maybe_swap_to(&mut bytes);
        channel.write(&bytes)?;
      }
    } else {
      let len = units.len() as u32 + 1;
      len.encode(channel)?;
      for u in &units {
        let mut bytes = u.to_le_bytes();
        channel.maybe_swap_to(&mut bytes);
        channel.write(&bytes)?;
      }
      channel.write(&[0u8, 0u8])?;
    }
    Ok(())
  }
}

impl Decode for WString {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    let len = u32::decode(channel)? as usize;

    let unit_count = if channel.version().at_least_1_2() {
      len / 2
    } else if len == 0 {
      0
    } else {
      len - 1
    };

    let mut units = Vec::with_capacity(unit_count);
    for _ in 0..unit_count {
      let mut bytes = [0u8; 2];
      bytes.copy_from_slice(channel.read(2)?);
      channel.maybe_swap_to(&mut bytes);
      units.push(u16::from_le_bytes(bytes));
    }

    if !channel.version().at_least_1_2() && len > 0 {
      let term = channel.read(2)?;
      if term != [0u8, 0u8] {
        return Err(MarshalError::ProtocolError("wstring not wide-NUL-terminated".into()));
      }
    }

    String::from_utf16(&units).map(WString)
                               .map_err(|e| MarshalError::ProtocolError(e.to_string()))
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
  fn string_scenario() {
    // SPEC_FULL.md §8.3 scenario 1, continued: "hi" after the u32.
    let mut ch = Channel::new_encode(GiopVersion::V1_2, true);
    "hi".to_string().encode(&mut ch).unwrap();
    assert_eqb_iter!(ch.buffer(), &[0x03, 0x00, 0x00, 0x00, b'h', b'i', 0x00]);
  }

  #[test]
  fn empty_string_is_len_one() {
    let mut ch = Channel::new_encode(GiopVersion::V1_2, true);
    String::new().encode(&mut ch).unwrap();
    assert_eqb_iter!(ch.buffer(), &[1, 0, 0, 0, 0]);
  }

  #[test]
  fn string_roundtrip() {
    let v = "hello, world".to_string();
    assert_eq!(roundtrip(GiopVersion::V1_2, &v), v);
  }

  #[test]
  fn wstring_len_zero_1_2_has_no_terminator() {
    let mut ch = Channel::new_encode(GiopVersion::V1_2, true);
    WString(String::new()).encode(&mut ch).unwrap();
    assert_eqb_iter!(ch.buffer(), &[0, 0, 0, 0]);
  }

  #[test]
  fn wstring_len_zero_1_0_has_wide_nul() {
    let mut ch = Channel::new_encode(GiopVersion::V1_0, true);
    WString(String::new()).encode(&mut ch).unwrap();
    assert_eqb_iter!(ch.buffer(), &[1, 0, 0, 0, 0, 0]);
  }

  #[test]
  fn wstring_roundtrip_both_versions() {
    let v = WString("héllo".to_string());
    assert_eq!(roundtrip(GiopVersion::V1_2, &v), v);
    assert_eq!(roundtrip(GiopVersion::V1_0, &v), v);
  }
}
