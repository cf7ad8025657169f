//! `RequestHeader`/`ReplyHeader` and the types they're built from (see
//! `SPEC_FULL.md` §3.4, §4.5).
//!
//! GIOP 1.0 and 1.1 share one request/reply header layout; GIOP 1.2
//! introduces a third, different layout (`TargetAddress` replaces the
//! bare object key, `response_flags` replaces `response_expected`, field
//! order changes, and the header is padded to an 8-octet boundary before
//! the body). Both generations are kept as distinct types, mirroring the
//! original `RequestHeader_1_0`/`RequestHeader_1_1`/`RequestHeader`
//! (1.2+) structs.

use crate::channel::Channel;
use crate::codec::{Decode, Encode};
use crate::error::MarshalError;
use crate::iop::{Ior, ServiceContextList, TaggedProfile};

/// `response_expected`/`response_flags` semantics shared by all GIOP
/// versions, as a sync-scope. GIOP 1.0/1.1 only distinguish "none" from
/// "target"; GIOP 1.2 exposes the full range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncScope {
  /// No response will be sent.
  None,
  /// Response is guaranteed only as far as the transport.
  WithTransport,
  /// Response is guaranteed as far as the server ORB.
  WithServer,
  /// Response is guaranteed all the way to the target object (the
  /// default this crate's envelope uses for outbound requests).
  WithTarget,
}

impl SyncScope {
  fn to_wire(self) -> u8 {
    match self {
      | Self::None => 0,
      | Self::WithTransport => 1,
      | Self::WithServer => 2,
      | Self::WithTarget => 3,
    }
  }

  fn from_wire(b: u8) -> Result<Self, MarshalError> {
    Ok(match b {
      | 0 => Self::None,
      | 1 => Self::WithTransport,
      | 2 => Self::WithServer,
      | 3 => Self::WithTarget,
      | other => return Err(MarshalError::InvalidDiscriminator(other as i64)),
    })
  }
}

/// The addressing-disposition discriminant and arms of GIOP 1.2's
/// `TargetAddress`, which replaces the bare object key carried by 1.0/1.1
/// request headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetAddress {
  /// `KeyAddr`: the plain object key, same as 1.0/1.1 carried it.
  KeyAddr(Vec<u8>),
  /// `ProfileAddr`: address the object via a specific profile.
  ProfileAddr(TaggedProfile),
  /// `ReferenceAddr`: address via a specific profile index of a full IOR.
  ReferenceAddr {
    /// Index into `ior.profiles` identifying which profile the request
    /// was actually sent to.
    selected_profile_index: u32,
    /// The full IOR.
    ior: Ior,
  },
}

impl Encode for TargetAddress {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    match self {
      | Self::KeyAddr(key) => {
        0u16.encode(channel)?;
        key.encode(channel)
      },
      | Self::ProfileAddr(profile) => {
        1u16.encode(channel)?;
        profile.encode(channel)
      },
      | Self::ReferenceAddr { selected_profile_index, ior } => {
        2u16.encode(channel)?;
        selected_profile_index.encode(channel)?;
        ior.encode(channel)
      },
    }
  }
}

impl Decode for TargetAddress {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    let disc = u16::decode(channel)?;
    match disc {
      | 0 => Ok(Self::KeyAddr(Vec::<u8>::decode(channel)?)),
      | 1 => Ok(Self::ProfileAddr(TaggedProfile::decode(channel)?)),
      | 2 => {
        let selected_profile_index = u32::decode(channel)?;
        let ior = Ior::decode(channel)?;
        Ok(Self::ReferenceAddr { selected_profile_index, ior })
      },
      | other => Err(MarshalError::InvalidDiscriminator(other as i64)),
    }
  }
}

/// CSIv2 `IdentityToken`, carried in a service context on some requests.
/// Only the discriminant arms useful without a full security-context
/// implementation are modeled (see Non-goals, `SPEC_FULL.md` §1).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityToken {
  /// No identity asserted.
  Absent,
  /// An anonymous identity.
  Anonymous,
  /// An opaque principal name.
  PrincipalName(Vec<u8>),
  /// An opaque X.509 certificate chain.
  CertificateChain(Vec<u8>),
  /// An opaque generalized identity.
  GeneralizedId(Vec<u8>),
}

impl Encode for IdentityToken {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    match self {
      | Self::Absent => 0u16.encode(channel),
      | Self::Anonymous => 1u16.encode(channel),
      | Self::PrincipalName(bytes) => {
        2u16.encode(channel)?;
        bytes.encode(channel)
      },
      | Self::CertificateChain(bytes) => {
        3u16.encode(channel)?;
        bytes.encode(channel)
      },
      | Self::GeneralizedId(bytes) => {
        4u16.encode(channel)?;
        bytes.encode(channel)
      },
    }
  }
}

impl Decode for IdentityToken {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    let disc = u16::decode(channel)?;
    Ok(match disc {
      | 0 => Self::Absent,
      | 1 => Self::Anonymous,
      | 2 => Self::PrincipalName(Vec::<u8>::decode(channel)?),
      | 3 => Self::CertificateChain(Vec::<u8>::decode(channel)?),
      | 4 => Self::GeneralizedId(Vec::<u8>::decode(channel)?),
      | other => return Err(MarshalError::InvalidDiscriminator(other as i64)),
    })
  }
}

/// `RequestHeader` on GIOP 1.0 and 1.1 (byte-identical layouts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeaderLegacy {
  /// Out-of-band context piggybacked on the request.
  pub service_context: ServiceContextList,
  /// Per-stream, strictly monotonic request identifier.
  pub request_id: u32,
  /// Whether the caller expects a reply at all.
  pub response_expected: bool,
  /// Opaque server-side object identifier.
  pub object_key: Vec<u8>,
  /// IDL operation name.
  pub operation: String,
  /// Deprecated in all CORBA versions this crate targets; always empty.
  pub requesting_principal: Vec<u8>,
}

impl Encode for RequestHeaderLegacy {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    self.service_context.encode(channel)?;
    self.request_id.encode(channel)?;
    self.response_expected.encode(channel)?;
    self.object_key.encode(channel)?;
    self.operation.clone().encode(channel)?;
    self.requesting_principal.encode(channel)
  }
}

impl Decode for RequestHeaderLegacy {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    Ok(Self { service_context: ServiceContextList::decode(channel)?,
              request_id: u32::decode(channel)?,
              response_expected: bool::decode(channel)?,
              object_key: Vec::<u8>::decode(channel)?,
              operation: String::decode(channel)?,
              requesting_principal: Vec::<u8>::decode(channel)? })
  }
}

/// `RequestHeader` on GIOP 1.2 and later.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHeaderV1_2 {
  /// Per-stream, strictly monotonic request identifier.
  pub request_id: u32,
  /// Replaces 1.0/1.1's `response_expected` boolean with the full
  /// sync-scope range.
  pub response_flags: SyncScope,
  /// Replaces the bare object key with a tagged addressing union.
  pub target: TargetAddress,
  /// IDL operation name.
  pub operation: String,
  /// Out-of-band context piggybacked on the request.
  pub service_context: ServiceContextList,
}

impl Encode for RequestHeaderV1_2 {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    self.request_id.encode(channel)?;
    self.response_flags.to_wire().encode(channel)?;
    channel.write(&[0u8, 0, 0])?; // reserved[3]
    self.target.encode(channel)?;
    self.operation.clone().encode(channel)?;
    self.service_context.encode(channel)
  }
}

impl Decode for RequestHeaderV1_2 {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    let request_id = u32::decode(channel)?;
    let response_flags = SyncScope::from_wire(u8::decode(channel)?)?;
    let _reserved = channel.read(3)?;
    let target = TargetAddress::decode(channel)?;
    let operation = String::decode(channel)?;
    let service_context = ServiceContextList::decode(channel)?;
    Ok(Self { request_id, response_flags, target, operation, service_context })
  }
}

/// A version-erased request header, used by the envelope (`coli` crate)
/// so call sites don't need to match on GIOP version themselves.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestHeader {
  /// GIOP 1.0
  V1_0(RequestHeaderLegacy),
  /// GIOP 1.1
  V1_1(RequestHeaderLegacy),
  /// GIOP 1.2+
  V1_2(RequestHeaderV1_2),
}

impl RequestHeader {
  /// The request ID carried by whichever variant this is.
  pub fn request_id(&self) -> u32 {
    match self {
      | Self::V1_0(h) | Self::V1_1(h) => h.request_id,
      | Self::V1_2(h) => h.request_id,
    }
  }

  /// The operation name carried by whichever variant this is.
  pub fn operation(&self) -> &str {
    match self {
      | Self::V1_0(h) | Self::V1_1(h) => &h.operation,
      | Self::V1_2(h) => &h.operation,
    }
  }
}

/// Reply status, shared across all GIOP versions (1.2 adds two arms).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyStatus {
  /// The operation completed normally; output arguments follow.
  NoException,
  /// The operation raised a user (IDL-defined) exception.
  UserException,
  /// The operation raised a CORBA system exception.
  SystemException,
  /// The object has moved; retry at the IOR that follows.
  LocationForward,
  /// GIOP 1.2+: like `LocationForward`, but permanently (update caches).
  LocationForwardPerm,
  /// GIOP 1.2+: the server wants a different addressing mode; retry.
  NeedsAddressingMode,
}

impl ReplyStatus {
  fn to_wire(self) -> u32 {
    match self {
      | Self::NoException => 0,
      | Self::UserException => 1,
      | Self::SystemException => 2,
      | Self::LocationForward => 3,
      | Self::LocationForwardPerm => 4,
      | Self::NeedsAddressingMode => 5,
    }
  }

  fn from_wire(v: u32) -> Result<Self, MarshalError> {
    Ok(match v {
      | 0 => Self::NoException,
      | 1 => Self::UserException,
      | 2 => Self::SystemException,
      | 3 => Self::LocationForward,
      | 4 => Self::LocationForwardPerm,
      | 5 => Self::NeedsAddressingMode,
      | other => return Err(MarshalError::RemoteReplyStatus(other)),
    })
  }
}

impl Encode for ReplyStatus {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    self.to_wire().encode(channel)
  }
}

impl Decode for ReplyStatus {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    Self::from_wire(u32::decode(channel)?)
  }
}

/// `ReplyHeader` on GIOP 1.0 and 1.1 (byte-identical layouts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyHeaderLegacy {
  /// Out-of-band context piggybacked on the reply.
  pub service_context: ServiceContextList,
  /// Echoes the request's `request_id`.
  pub request_id: u32,
  /// Disposition of the reply; determines how the body is decoded.
  pub reply_status: ReplyStatus,
}

impl Encode for ReplyHeaderLegacy {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    self.service_context.encode(channel)?;
    self.request_id.encode(channel)?;
    self.reply_status.encode(channel)
  }
}

impl Decode for ReplyHeaderLegacy {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    Ok(Self { service_context: ServiceContextList::decode(channel)?,
              request_id: u32::decode(channel)?,
              reply_status: ReplyStatus::decode(channel)? })
  }
}

/// `ReplyHeader` on GIOP 1.2 and later (field order changes relative to
/// 1.0/1.1: `service_context` moves to the end).
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplyHeaderV1_2 {
  /// Echoes the request's `request_id`.
  pub request_id: u32,
  /// Disposition of the reply; determines how the body is decoded.
  pub reply_status: ReplyStatus,
  /// Out-of-band context piggybacked on the reply.
  pub service_context: ServiceContextList,
}

impl Encode for ReplyHeaderV1_2 {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    self.request_id.encode(channel)?;
    self.reply_status.encode(channel)?;
    self.service_context.encode(channel)
  }
}

impl Decode for ReplyHeaderV1_2 {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    Ok(Self { request_id: u32::decode(channel)?,
              reply_status: ReplyStatus::decode(channel)?,
              service_context: ServiceContextList::decode(channel)? })
  }
}

/// A version-erased reply header.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyHeader {
  /// GIOP 1.0
  V1_0(ReplyHeaderLegacy),
  /// GIOP 1.1
  V1_1(ReplyHeaderLegacy),
  /// GIOP 1.2+
  V1_2(ReplyHeaderV1_2),
}

impl ReplyHeader {
  /// The request ID carried by whichever variant this is.
  pub fn request_id(&self) -> u32 {
    match self {
      | Self::V1_0(h) | Self::V1_1(h) => h.request_id,
      | Self::V1_2(h) => h.request_id,
    }
  }

  /// The reply status carried by whichever variant this is.
  pub fn reply_status(&self) -> ReplyStatus {
    match self {
      | Self::V1_0(h) | Self::V1_1(h) => h.reply_status,
      | Self::V1_2(h) => h.reply_status,
    }
  }
}

/// The body of a reply whose status is `SYSTEM_EXCEPTION`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemExceptionReplyBody {
  /// Repository ID of the raised exception, e.g.
  /// `"IDL:CORBA/BAD_PARAM:1.0"`.
  pub exception_id: String,
  /// Vendor-specific minor code.
  pub minor: u32,
  /// 0 = `COMPLETED_YES`, 1 = `COMPLETED_NO`, 2 = `COMPLETED_MAYBE`.
  pub completion_status: u32,
}

impl Encode for SystemExceptionReplyBody {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    self.exception_id.clone().encode(channel)?;
    self.minor.encode(channel)?;
    self.completion_status.encode(channel)
  }
}

impl Decode for SystemExceptionReplyBody {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    Ok(Self { exception_id: String::decode(channel)?,
              minor: u32::decode(channel)?,
              completion_status: u32::decode(channel)? })
  }
}

/// `CancelRequestHeader`: the body of a `CancelRequest` message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelRequestHeader {
  /// The request ID to cancel.
  pub request_id: u32,
}

impl Encode for CancelRequestHeader {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    self.request_id.encode(channel)
  }
}

impl Decode for CancelRequestHeader {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    Ok(Self { request_id: u32::decode(channel)? })
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::codec::roundtrip;
  use crate::version::GiopVersion;

  #[test]
  fn legacy_request_header_roundtrip() {
    let h = RequestHeaderLegacy { service_context: vec![],
                                  request_id: 7,
                                  response_expected: true,
                                  object_key: vec![1, 2, 3],
                                  operation: "ping".into(),
                                  requesting_principal: vec![] };
    assert_eq!(roundtrip(GiopVersion::V1_0, &h), h);
  }

  #[test]
  fn v1_2_request_header_roundtrip() {
    let h = RequestHeaderV1_2 { request_id: 7,
                               response_flags: SyncScope::WithTarget,
                               target: TargetAddress::KeyAddr(vec![9]),
                               operation: "ping".into(),
                               service_context: vec![] };
    assert_eq!(roundtrip(GiopVersion::V1_2, &h), h);
  }

  #[test]
  fn reply_status_roundtrip() {
    for s in [ReplyStatus::NoException,
              ReplyStatus::UserException,
              ReplyStatus::SystemException,
              ReplyStatus::LocationForward,
              ReplyStatus::LocationForwardPerm,
              ReplyStatus::NeedsAddressingMode]
    {
      assert_eq!(roundtrip(GiopVersion::V1_2, &s), s);
    }
  }

  #[test]
  fn system_exception_scenario() {
    // SPEC_FULL.md §8.3 scenario 6
    let body = SystemExceptionReplyBody { exception_id: "IDL:CORBA/BAD_PARAM:1.0".into(),
                                          minor: 0,
                                          completion_status: 0 };
    assert_eq!(roundtrip(GiopVersion::V1_2, &body), body);
  }

  #[test]
  fn target_address_roundtrip() {
    let t = TargetAddress::KeyAddr(vec![1, 2]);
    assert_eq!(roundtrip(GiopVersion::V1_2, &t), t);
  }

  #[test]
  fn identity_token_roundtrip() {
    let t = IdentityToken::PrincipalName(vec![1, 2, 3]);
    assert_eq!(roundtrip(GiopVersion::V1_2, &t), t);
    assert_eq!(roundtrip(GiopVersion::V1_2, &IdentityToken::Absent), IdentityToken::Absent);
  }
}
