//! GIOP protocol version.

use core::fmt;

use crate::channel::Channel;
use crate::codec::{Decode, Encode};
use crate::error::MarshalError;

/// A GIOP version `major.minor`, e.g. `1.2`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GiopVersion {
  /// major version
  pub major: u8,
  /// minor version
  pub minor: u8,
}

impl GiopVersion {
  /// GIOP 1.0
  pub const V1_0: Self = Self { major: 1, minor: 0 };
  /// GIOP 1.1
  pub const V1_1: Self = Self { major: 1, minor: 1 };
  /// GIOP 1.2
  pub const V1_2: Self = Self { major: 1, minor: 2 };

  /// Is this 1.1 or later? (`components` present on `ProfileBody`, wide
  /// chars newly aligned, etc.)
  pub fn at_least_1_1(&self) -> bool {
    (self.major, self.minor) >= (1, 1)
  }

  /// Is this 1.2 or later? (8-octet header padding, `TargetAddress` in
  /// request headers, byte-counted `wstring`.)
  pub fn at_least_1_2(&self) -> bool {
    (self.major, self.minor) >= (1, 2)
  }

  /// Parse a `"M.m"` version string, e.g. from `GIOP_VERSION` or a
  /// `corbaloc:` address's `M.m@` prefix. Mirrors the original
  /// `coliVersion` helper.
  pub fn parse(s: &str) -> Result<Self, MarshalError> {
    let (maj, min) = s.split_once('.')
                      .ok_or_else(|| MarshalError::InvalidUrl(format!("bad version: {s}")))?;
    let major = maj.parse::<u8>()
                   .map_err(|_| MarshalError::InvalidUrl(format!("bad version: {s}")))?;
    let minor = min.parse::<u8>()
                   .map_err(|_| MarshalError::InvalidUrl(format!("bad version: {s}")))?;
    Ok(Self { major, minor })
  }
}

impl Default for GiopVersion {
  fn default() -> Self {
    Self::V1_2
  }
}

impl fmt::Display for GiopVersion {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}.{}", self.major, self.minor)
  }
}

/// On the wire, a version is simply two unaligned octets.
impl Encode for GiopVersion {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    self.major.encode(channel)?;
    self.minor.encode(channel)
  }
}

impl Decode for GiopVersion {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    let major = u8::decode(channel)?;
    let minor = u8::decode(channel)?;
    Ok(Self { major, minor })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_valid() {
    assert_eq!(GiopVersion::parse("1.2").unwrap(), GiopVersion { major: 1, minor: 2 });
    assert_eq!(GiopVersion::parse("1.0").unwrap(), GiopVersion::V1_0);
  }

  #[test]
  fn parse_invalid() {
    assert!(GiopVersion::parse("1").is_err());
    assert!(GiopVersion::parse("a.b").is_err());
    assert!(GiopVersion::parse("").is_err());
  }

  #[test]
  fn ordering() {
    assert!(GiopVersion::V1_2.at_least_1_1());
    assert!(GiopVersion::V1_2.at_least_1_2());
    assert!(GiopVersion::V1_1.at_least_1_1());
    assert!(!GiopVersion::V1_1.at_least_1_2());
    assert!(!GiopVersion::V1_0.at_least_1_1());
  }
}
