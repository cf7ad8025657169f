//! CDR encapsulation: a self-contained, endian-tagged nested CDR stream.
//!
//! On the wire an encapsulation is an octet sequence (`u32` length then
//! raw bytes) whose first octet is a boolean endian flag; everything
//! after that flag is a complete CDR stream with its *own* alignment
//! origin at the octet following the flag. This is the one place the
//! outer channel's alignment frame gets reset (see `SPEC_FULL.md` §3.1,
//! §4.2, §8.1).

use crate::channel::Channel;
use crate::codec::{Decode, Encode};
use crate::error::MarshalError;
use crate::version::GiopVersion;

/// Encode `value` into a fresh encapsulation at `version`/`little_endian`,
/// and write that encapsulation (as an octet sequence) onto `channel`.
pub fn encode<T: Encode>(channel: &mut Channel,
                          version: GiopVersion,
                          little_endian: bool,
                          value: &T)
                          -> Result<(), MarshalError> {
  let mut inner = Channel::new_encode(version, little_endian);
  inner.write(&[u8::from(little_endian)])?;
  inner.mark_origin();
  value.encode(&mut inner)?;
  let payload = inner.into_buffer();
  payload.encode(channel)
}

/// Read an encapsulation (an octet sequence) off `channel`, honor its
/// embedded endian octet, and decode a `T` from the payload that follows.
pub fn decode<T: Decode>(channel: &mut Channel) -> Result<T, MarshalError> {
  let bytes: Vec<u8> = Vec::<u8>::decode(channel)?;
  let little_endian = match bytes.first() {
    | Some(b) => *b != 0,
    | None => {
      return Err(MarshalError::ProtocolError("empty encapsulation: missing endian octet".into()))
    },
  };
  let mut inner = Channel::new_decode(channel.version(), little_endian, bytes, 1);
  T::decode(&mut inner)
}

/// Encode `value` into a standalone encapsulation (endian octet + payload,
/// with no outer length prefix). Used where an encapsulation is itself
/// the thing being serialized, such as a stringified `IOR` (see
/// `SPEC_FULL.md` §4.4, §6.2), rather than a field nested in a channel.
pub fn to_bytes<T: Encode>(version: GiopVersion,
                            little_endian: bool,
                            value: &T)
                            -> Result<Vec<u8>, MarshalError> {
  let mut inner = Channel::new_encode(version, little_endian);
  inner.write(&[u8::from(little_endian)])?;
  inner.mark_origin();
  value.encode(&mut inner)?;
  Ok(inner.into_buffer())
}

/// Decode a standalone encapsulation's raw bytes (endian octet + payload,
/// as produced by [`to_bytes`]) into a `T`.
pub fn from_bytes<T: Decode>(version: GiopVersion, bytes: Vec<u8>) -> Result<T, MarshalError> {
  let little_endian = match bytes.first() {
    | Some(b) => *b != 0,
    | None => {
      return Err(MarshalError::ProtocolError("empty encapsulation: missing endian octet".into()))
    },
  };
  let mut inner = Channel::new_decode(version, little_endian, bytes, 1);
  T::decode(&mut inner)
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn roundtrip_resets_alignment() {
    let mut outer = Channel::new_encode(GiopVersion::V1_2, true);
    1u8.encode(&mut outer).unwrap(); // shift outer cursor off any 4-alignment
    encode(&mut outer, GiopVersion::V1_2, true, &0x01020304u32).unwrap();
    let bytes = outer.into_buffer();

    let mut dec = Channel::new_decode(GiopVersion::V1_2, true, bytes, 0);
    let _ = u8::decode(&mut dec).unwrap();
    let v: u32 = decode(&mut dec).unwrap();
    assert_eq!(v, 0x01020304);
  }

  #[test]
  fn standalone_bytes_roundtrip() {
    let bytes = to_bytes(GiopVersion::V1_2, true, &"hi".to_string()).unwrap();
    let v: String = from_bytes(GiopVersion::V1_2, bytes).unwrap();
    assert_eq!(v, "hi");
  }

  #[test]
  fn big_endian_flag_roundtrips() {
    let mut outer = Channel::new_encode(GiopVersion::V1_2, true);
    encode(&mut outer, GiopVersion::V1_2, false, &"hi".to_string()).unwrap();
    let bytes = outer.into_buffer();

    let mut dec = Channel::new_decode(GiopVersion::V1_2, true, bytes, 0);
    let v: String = decode(&mut dec).unwrap();
    assert_eq!(v, "hi");
  }
}
