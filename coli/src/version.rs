//! Process-wide default GIOP version, seeded from the `GIOP_VERSION`
//! environment variable and read once via [`std::sync::OnceLock`] (see
//! `SPEC_FULL.md` §5, §9). No runtime-mutable global is exposed: callers
//! who want a different version per call just pass it explicitly.

use std::sync::OnceLock;

use coli_msg::GiopVersion;

const ENV_VAR: &str = "GIOP_VERSION";
const HARDCODED_DEFAULT: GiopVersion = GiopVersion::V1_2;

static DEFAULT: OnceLock<GiopVersion> = OnceLock::new();

/// The library's default GIOP version: the value of `GIOP_VERSION` at
/// first call, or `1.2` if unset or unparseable. Computed once per
/// process; later changes to the environment variable have no effect.
pub fn default_version() -> GiopVersion {
  *DEFAULT.get_or_init(|| {
            std::env::var(ENV_VAR).ok()
                                   .and_then(|s| GiopVersion::parse(&s).ok())
                                   .unwrap_or(HARDCODED_DEFAULT)
          })
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn parses_valid_version_strings() {
    assert_eq!(GiopVersion::parse("1.2").unwrap(), GiopVersion::V1_2);
    assert_eq!(GiopVersion::parse("1.0").unwrap(), GiopVersion::V1_0);
  }

  #[test]
  fn rejects_malformed_version_strings() {
    assert!(GiopVersion::parse("1").is_err());
    assert!(GiopVersion::parse("a.b").is_err());
    assert!(GiopVersion::parse("").is_err());
  }
}
