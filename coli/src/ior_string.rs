//! Stringified-IOR codec: `IOR ↔ "IOR:<hex>"` (`SPEC_FULL.md` §4.4,
//! §6.2).

use coli_msg::iop::Ior;
use coli_msg::{encapsulation, GiopVersion, MarshalError};

use crate::error::Result;

const PREFIX: &str = "IOR:";

/// Stringify `ior` as `"IOR:" + <uppercase hex of a little-endian
/// encapsulation of the IOR>`.
pub fn to_string(ior: &Ior) -> Result<String> {
  let bytes = encapsulation::to_bytes(GiopVersion::V1_2, true, ior)?;
  let mut out = String::with_capacity(PREFIX.len() + bytes.len() * 2);
  out.push_str(PREFIX);
  for b in bytes {
    out.push_str(&format!("{b:02X}"));
  }
  Ok(out)
}

/// Parse a stringified IOR produced by [`to_string`] (or any conformant
/// producer). The `"IOR:"` prefix is matched case-insensitively.
pub fn from_str(s: &str) -> Result<Ior> {
  let rest = s.get(..PREFIX.len())
              .filter(|p| p.eq_ignore_ascii_case(PREFIX))
              .map(|_| &s[PREFIX.len()..])
              .ok_or_else(|| MarshalError::InvalidStringifiedIor(format!("missing 'IOR:' prefix: {s}")))?;

  if rest.len() % 2 != 0 || !rest.bytes().all(|b| b.is_ascii_hexdigit()) {
    return Err(MarshalError::InvalidStringifiedIor(format!("malformed hex in stringified IOR: {s}")).into());
  }

  let bytes = (0..rest.len())
    .step_by(2)
    .map(|i| u8::from_str_radix(&rest[i..i + 2], 16))
    .collect::<std::result::Result<Vec<u8>, _>>()
    .map_err(|_| MarshalError::InvalidStringifiedIor(format!("malformed hex in stringified IOR: {s}")))?;

  Ok(encapsulation::from_bytes(GiopVersion::V1_2, bytes)?)
}

#[cfg(test)]
mod tests {
  use coli_msg::iop::{ProfileBody, TaggedProfile, TaggedProfileData, TAG_INTERNET_IOP};
  use pretty_assertions::assert_eq;

  use super::*;

  fn sample() -> Ior {
    Ior { type_id: "IDL:X:1.0".into(),
          profiles: vec![TaggedProfile { tag: TAG_INTERNET_IOP,
                                         data: TaggedProfileData::Iiop(ProfileBody {
                                           iiop_version: GiopVersion::V1_0,
                                           host: "h".into(),
                                           port: 9999,
                                           object_key: vec![0x01, 0x02],
                                           components: vec![],
                                         }) }] }
  }

  #[test]
  fn roundtrip() {
    let ior = sample();
    let s = to_string(&ior).unwrap();
    assert!(s.starts_with("IOR:"));
    assert_eq!(from_str(&s).unwrap(), ior);
  }

  #[test]
  fn missing_prefix_rejected() {
    assert!(from_str("garbage").is_err());
  }

  #[test]
  fn malformed_hex_rejected() {
    assert!(from_str("IOR:zz").is_err());
    assert!(from_str("IOR:0").is_err());
  }
}
