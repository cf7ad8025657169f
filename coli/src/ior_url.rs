//! `corbaloc:` URL codec (`SPEC_FULL.md` §4.4, §6.3).

use coli_msg::iop::{Ior, ProfileBody, TaggedProfile, TaggedProfileData, TAG_INTERNET_IOP};
use coli_msg::GiopVersion;

use crate::error::{Error, Result};

const DEFAULT_PORT: u16 = 2809;
const DEFAULT_VERSION: GiopVersion = GiopVersion::V1_0;

// Beyond ALPHA/DIGIT (handled by `is_ascii_alphanumeric`), these octets
// are kept literal rather than percent-escaped (`SPEC_FULL.md` §4.4).
const UNRESERVED_PUNCTUATION: &[u8] = b";/:?@&=+$,-_!~*'()";

fn is_literal(b: u8) -> bool {
  b.is_ascii_alphanumeric() || UNRESERVED_PUNCTUATION.contains(&b)
}

fn percent_encode(bytes: &[u8]) -> String {
  let mut out = String::with_capacity(bytes.len());
  for &b in bytes {
    if is_literal(b) {
      out.push(b as char);
    } else {
      out.push_str(&format!("%{b:02X}"));
    }
  }
  out
}

fn percent_decode(s: &str) -> Result<Vec<u8>> {
  let bytes = s.as_bytes();
  let mut out = Vec::with_capacity(bytes.len());
  let mut i = 0;
  while i < bytes.len() {
    if bytes[i] == b'%' {
      let hex =
        bytes.get(i + 1..i + 3)
             .and_then(|h| std::str::from_utf8(h).ok())
             .ok_or_else(|| Error::InvalidUrl(format!("malformed percent escape in {s}")))?;
      let byte = u8::from_str_radix(hex, 16)
        .map_err(|_| Error::InvalidUrl(format!("malformed percent escape in {s}")))?;
      out.push(byte);
      i += 3;
    } else {
      out.push(bytes[i]);
      i += 1;
    }
  }
  Ok(out)
}

fn local_host() -> String {
  std::env::var("HOSTNAME").unwrap_or_else(|_| "localhost".to_string())
}

/// Render `ior` as a `corbaloc:` URL, one address per `TAG_INTERNET_IOP`
/// profile (in profile order), the object key taken from profile 0.
pub fn to_url(ior: &Ior) -> Result<String> {
  let iiop_profiles: Vec<&ProfileBody> = ior.profiles
                                             .iter()
                                             .filter_map(|p| match &p.data {
                                               | TaggedProfileData::Iiop(body) => Some(body),
                                               | _ => None,
                                             })
                                             .collect();

  if iiop_profiles.is_empty() {
    return Err(Error::InvalidUrl("IOR has no TAG_INTERNET_IOP profile to render".into()));
  }

  let addrs: Vec<String> = iiop_profiles.iter()
                                         .map(|body| {
                                           let mut addr = "iiop:".to_string();
                                           let (major, minor) =
                                             (body.iiop_version.major, body.iiop_version.minor);
                                           if (major, minor) != (1, 0) {
                                             addr.push_str(&format!("{major}.{minor}@"));
                                           }
                                           addr.push_str(&body.host);
                                           if body.port != DEFAULT_PORT {
                                             addr.push_str(&format!(":{}", body.port));
                                           }
                                           addr
                                         })
                                         .collect();

  let mut addrs_joined = addrs.join(",");
  if addrs_joined.is_empty() || addrs_joined == "iiop:" {
    addrs_joined = ":".to_string();
  }

  let key = percent_encode(&iiop_profiles[0].object_key);
  Ok(format!("corbaloc:{addrs_joined}/{key}"))
}

/// Parse a `corbaloc:` URL into an `IOR` with one `TAG_INTERNET_IOP`
/// profile per address.
pub fn from_url(url: &str) -> Result<Ior> {
  let rest = url.strip_prefix("corbaloc:")
                .ok_or_else(|| Error::InvalidUrl(format!("missing 'corbaloc:' prefix: {url}")))?;

  let (addrs_part, key_part) = match rest.split_once('/') {
    | Some((a, k)) => (a, k),
    | None => (rest, ""),
  };

  let object_key = percent_decode(key_part)?;

  // A lone ":" is the shorthand `to_url` emits when every address elides
  // down to just "iiop:" — treat it as a single default address.
  let addrs_part = if addrs_part == ":" { "iiop:" } else { addrs_part };

  let profiles = addrs_part.split(',')
                            .map(|addr| parse_address(addr, url))
                            .collect::<Result<Vec<ProfileBody>>>()?
                            .into_iter()
                            .map(|mut body| {
                              body.object_key = object_key.clone();
                              TaggedProfile { tag: TAG_INTERNET_IOP,
                                              data: TaggedProfileData::Iiop(body) }
                            })
                            .collect();

  Ok(Ior { type_id: String::new(), profiles })
}

fn parse_address(addr: &str, whole_url: &str) -> Result<ProfileBody> {
  let rest = addr.strip_prefix("iiop:")
                 .ok_or_else(|| {
                   Error::InvalidUrl(format!("address missing 'iiop:' in {whole_url}"))
                 })?;

  let (version, rest) = match rest.split_once('@') {
    | Some((v, r)) => (parse_version(v, whole_url)?, r),
    | None => (DEFAULT_VERSION, rest),
  };

  let (host, port) = match rest.rsplit_once(':') {
    | Some((h, p)) if !p.is_empty() => {
      let port = p.parse::<u16>()
                   .map_err(|_| Error::InvalidUrl(format!("malformed port in {whole_url}")))?;
      (h, port)
    },
    | _ => (rest, DEFAULT_PORT),
  };

  let host = if host.is_empty() { local_host() } else { host.to_string() };

  Ok(ProfileBody { iiop_version: version, host, port, object_key: Vec::new(), components: Vec::new() })
}

fn parse_version(s: &str, whole_url: &str) -> Result<GiopVersion> {
  GiopVersion::parse(s).map_err(|_| Error::InvalidUrl(format!("malformed version in {whole_url}")))
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn full_address_roundtrip() {
    let ior = from_url("corbaloc:iiop:1.2@example.org:1050/MyObj").unwrap();
    let body = ior.iiop_profile(0).unwrap();
    assert_eq!(body.iiop_version, GiopVersion::V1_2);
    assert_eq!(body.host, "example.org");
    assert_eq!(body.port, 1050);
    assert_eq!(body.object_key, b"MyObj".to_vec());
    assert_eq!(to_url(&ior).unwrap(), "corbaloc:iiop:1.2@example.org:1050/MyObj");
  }

  #[test]
  fn percent_escaped_key_and_defaults() {
    let ior = from_url("corbaloc::/%41%42").unwrap();
    let body = ior.iiop_profile(0).unwrap();
    assert_eq!(body.iiop_version, GiopVersion::V1_0);
    assert_eq!(body.port, DEFAULT_PORT);
    assert_eq!(body.object_key, vec![0x41, 0x42]);
  }

  #[test]
  fn missing_corbaloc_prefix_rejected() {
    assert!(from_url("iiop:host:1/key").is_err());
  }

  #[test]
  fn missing_iiop_prefix_rejected() {
    assert!(from_url("corbaloc:host:1/key").is_err());
  }

  #[test]
  fn malformed_version_rejected() {
    assert!(from_url("corbaloc:iiop:x.y@host/key").is_err());
  }
}
