//! IOP/IIOP types: `IOR`, `TaggedProfile`, `ProfileBody`, `TaggedComponent`,
//! `ServiceContext` (see `SPEC_FULL.md` §3.3, §4.3).

use crate::channel::Channel;
use crate::codec::{Decode, Encode};
use crate::encapsulation;
use crate::error::MarshalError;
use crate::version::GiopVersion;

/// Tag of a `TaggedProfile` carrying IIOP connection information.
pub const TAG_INTERNET_IOP: u32 = 0;
/// Tag of a `TaggedProfile` carrying a sequence of `TaggedComponent`.
pub const TAG_MULTIPLE_COMPONENTS: u32 = 1;

/// `(tag, component_data)`; an opaque, tag-identified blob attached to an
/// IIOP profile (e.g. codesets, SSL port, alternate addresses).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedComponent {
  /// Component tag, from the `ComponentId` IOP namespace.
  pub tag: u32,
  /// Component payload, opaque to this crate.
  pub component_data: Vec<u8>,
}

impl Encode for TaggedComponent {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    self.tag.encode(channel)?;
    self.component_data.encode(channel)
  }
}

impl Decode for TaggedComponent {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    let tag = u32::decode(channel)?;
    let component_data = Vec::<u8>::decode(channel)?;
    Ok(Self { tag, component_data })
  }
}

/// `(context_id, context_data)`; out-of-band information piggybacked on
/// a request or reply (code sets, transactions, security).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceContext {
  /// Context ID, from the `ServiceId` IOP namespace.
  pub context_id: u32,
  /// Context payload, opaque to this crate.
  pub context_data: Vec<u8>,
}

impl Encode for ServiceContext {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    self.context_id.encode(channel)?;
    self.context_data.encode(channel)
  }
}

impl Decode for ServiceContext {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    let context_id = u32::decode(channel)?;
    let context_data = Vec::<u8>::decode(channel)?;
    Ok(Self { context_id, context_data })
  }
}

/// A list of `ServiceContext`s, carried on every request and reply
/// header.
pub type ServiceContextList = Vec<ServiceContext>;

/// The payload of a `TAG_INTERNET_IOP` profile: everything a client needs
/// to open a TCP connection to the object's server and address the
/// object once connected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileBody {
  /// The IIOP version this profile was published for. Note: this is the
  /// profile's own declared version, independent of the GIOP version of
  /// the channel carrying the profile.
  pub iiop_version: GiopVersion,
  /// Server host name or address. Never empty (see invariant in
  /// `SPEC_FULL.md` §3.3).
  pub host: String,
  /// Server TCP port.
  pub port: u16,
  /// Opaque server-side object identifier.
  pub object_key: Vec<u8>,
  /// Tagged components. Present on the wire for IIOP ≥ 1.1; represented
  /// as an empty sequence (never written) for 1.0.
  pub components: Vec<TaggedComponent>,
}

impl Encode for ProfileBody {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    self.iiop_version.encode(channel)?;
    self.host.clone().encode(channel)?;
    self.port.encode(channel)?;
    self.object_key.encode(channel)?;
    if self.iiop_version.at_least_1_1() {
      self.components.encode(channel)?;
    }
    Ok(())
  }
}

impl Decode for ProfileBody {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    let iiop_version = GiopVersion::decode(channel)?;
    let host = String::decode(channel)?;
    let port = u16::decode(channel)?;
    let object_key = Vec::<u8>::decode(channel)?;
    let components = if iiop_version.at_least_1_1() {
      Vec::<TaggedComponent>::decode(channel)?
    } else {
      Vec::new()
    };
    Ok(Self { iiop_version, host, port, object_key, components })
  }
}

/// The tag-specific payload of a `TaggedProfile`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaggedProfileData {
  /// `TAG_INTERNET_IOP`
  Iiop(ProfileBody),
  /// `TAG_MULTIPLE_COMPONENTS`
  MultipleComponents(Vec<TaggedComponent>),
  /// Any other tag: an opaque octet sequence, not re-encapsulated.
  Opaque(Vec<u8>),
}

/// `(tag, data)`; one entry in an `IOR`'s profile list.
///
/// For the two well-known tags, `data` is first marshaled into its own
/// inner encapsulation (its own endian byte) and that encapsulation is
/// then written as the outer octet sequence; any other tag carries its
/// payload raw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaggedProfile {
  /// One of `TAG_INTERNET_IOP`, `TAG_MULTIPLE_COMPONENTS`, or a
  /// vendor-specific tag.
  pub tag: u32,
  /// The tag-specific payload.
  pub data: TaggedProfileData,
}

impl Encode for TaggedProfile {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    self.tag.encode(channel)?;
    match &self.data {
      | TaggedProfileData::Iiop(body) => {
        encapsulation::encode(channel, channel.version(), channel.little_endian(), body)
      },
      | TaggedProfileData::MultipleComponents(comps) => {
        encapsulation::encode(channel, channel.version(), channel.little_endian(), comps)
      },
      | TaggedProfileData::Opaque(bytes) => bytes.encode(channel),
    }
  }
}

impl Decode for TaggedProfile {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    let tag = u32::decode(channel)?;
    let data = match tag {
      | TAG_INTERNET_IOP => TaggedProfileData::Iiop(encapsulation::decode(channel)?),
      | TAG_MULTIPLE_COMPONENTS => {
        TaggedProfileData::MultipleComponents(encapsulation::decode(channel)?)
      },
      | _ => TaggedProfileData::Opaque(Vec::<u8>::decode(channel)?),
    };
    Ok(Self { tag, data })
  }
}

/// An Interoperable Object Reference: a type ID (empty string = nil type)
/// and an ordered list of tagged profiles, each a different way to reach
/// the object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Ior {
  /// The object's repository ID, e.g. `"IDL:Foo:1.0"`. Empty for a nil
  /// object reference.
  pub type_id: String,
  /// One or more ways to reach the object.
  pub profiles: Vec<TaggedProfile>,
}

impl Ior {
  /// The `index`-th `TAG_INTERNET_IOP` profile, skipping any other
  /// profile kinds in between. Mirrors the original `coliProfile` helper
  /// (see `SPEC_FULL.md` §4.4.1): callers usually don't care about a
  /// profile's absolute position, only "the Nth way to reach this object
  /// over IIOP".
  pub fn iiop_profile(&self, index: usize) -> Option<&ProfileBody> {
    self.profiles
        .iter()
        .filter_map(|p| match &p.data {
          | TaggedProfileData::Iiop(body) => Some(body),
          | _ => None,
        })
        .nth(index)
  }

  /// Build a single-profile IOR around one `TAG_INTERNET_IOP` profile.
  /// Mirrors the original `coliMakeIOR` helper (see `SPEC_FULL.md`
  /// §4.4.1).
  pub fn from_connect_params(object_key: Vec<u8>,
                             host: String,
                             port: u16,
                             version: GiopVersion,
                             type_id: String)
                             -> Self {
    let body = ProfileBody { iiop_version: version,
                             host,
                             port,
                             object_key,
                             components: Vec::new() };
    Self { type_id,
           profiles: vec![TaggedProfile { tag: TAG_INTERNET_IOP,
                                          data: TaggedProfileData::Iiop(body) }] }
  }

  /// Resolve the `index`-th `TAG_INTERNET_IOP` profile down to
  /// [`ConnectParams`] a transport constructor can use directly.
  /// `version_override`, if given, replaces the profile's own declared
  /// IIOP version rather than using it as-is.
  pub fn connect_params(&self, index: usize, version_override: Option<GiopVersion>) -> Option<ConnectParams> {
    let profile = self.iiop_profile(index)?;
    Some(ConnectParams { host: profile.host.clone(),
                         port: profile.port,
                         version: version_override.unwrap_or(profile.iiop_version),
                         object_key: profile.object_key.clone() })
  }
}

/// Everything a caller-supplied transport constructor needs to open a
/// connection to an IOR's object: resolved host, port, the GIOP version
/// to frame with, and the object key to address once connected. The
/// resolve-only half of the original `coliOpenIOR` (see `SPEC_FULL.md`
/// §4.4.1): building the actual connection is left to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectParams {
  /// Server host name or address.
  pub host: String,
  /// Server TCP port.
  pub port: u16,
  /// The GIOP version to frame messages with.
  pub version: GiopVersion,
  /// Opaque server-side object identifier to address once connected.
  pub object_key: Vec<u8>,
}

impl Encode for Ior {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    self.type_id.clone().encode(channel)?;
    self.profiles.encode(channel)
  }
}

impl Decode for Ior {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    let type_id = String::decode(channel)?;
    let profiles = Vec::<TaggedProfile>::decode(channel)?;
    Ok(Self { type_id, profiles })
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::codec::roundtrip;

  fn sample_ior() -> Ior {
    Ior::from_connect_params(vec![0x01, 0x02],
                             "h".to_string(),
                             9999,
                             GiopVersion::V1_0,
                             "IDL:X:1.0".to_string())
  }

  #[test]
  fn ior_roundtrip() {
    let ior = sample_ior();
    assert_eq!(roundtrip(GiopVersion::V1_2, &ior), ior);
  }

  #[test]
  fn profile_body_1_0_has_no_components_on_wire() {
    let body = ProfileBody { iiop_version: GiopVersion::V1_0,
                             host: "h".into(),
                             port: 1,
                             object_key: vec![],
                             components: vec![] };
    let decoded = roundtrip(GiopVersion::V1_2, &body);
    assert_eq!(decoded.components, Vec::<TaggedComponent>::new());
  }

  #[test]
  fn profile_body_1_1_includes_components() {
    let body = ProfileBody { iiop_version: GiopVersion::V1_1,
                             host: "h".into(),
                             port: 1,
                             object_key: vec![],
                             components: vec![TaggedComponent { tag: 1,
                                                                component_data: vec![9] }] };
    let decoded = roundtrip(GiopVersion::V1_2, &body);
    assert_eq!(decoded, body);
  }

  #[test]
  fn iiop_profile_skips_non_iiop_entries() {
    let mut ior = sample_ior();
    ior.profiles.insert(0,
                        TaggedProfile { tag: 42, data: TaggedProfileData::Opaque(vec![1]) });
    assert_eq!(ior.iiop_profile(0).unwrap().port, 9999);
  }

  #[test]
  fn connect_params_uses_profile_version_by_default() {
    let ior = sample_ior();
    let params = ior.connect_params(0, None).unwrap();
    assert_eq!(params.host, "h");
    assert_eq!(params.port, 9999);
    assert_eq!(params.version, GiopVersion::V1_0);
    assert_eq!(params.object_key, vec![0x01, 0x02]);
  }

  #[test]
  fn connect_params_honors_version_override() {
    let ior = sample_ior();
    let params = ior.connect_params(0, Some(GiopVersion::V1_2)).unwrap();
    assert_eq!(params.version, GiopVersion::V1_2);
  }

  #[test]
  fn connect_params_none_when_no_iiop_profile() {
    let ior = Ior { type_id: String::new(), profiles: vec![] };
    assert_eq!(ior.connect_params(0, None), None);
  }
}
