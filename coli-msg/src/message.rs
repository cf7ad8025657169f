//! The GIOP `MessageHeader`: the 12-octet prefix of every GIOP message
//! (see `SPEC_FULL.md` §3.4, §6.1).

use crate::channel::Channel;
use crate::codec::{Decode, Encode};
use crate::error::MarshalError;
use crate::version::GiopVersion;

const MAGIC: [u8; 4] = *b"GIOP";

/// A GIOP message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
  /// Client → server invocation.
  Request,
  /// Server → client invocation result.
  Reply,
  /// Client asks the server to abandon a request.
  CancelRequest,
  /// Client asks where an object currently lives.
  LocateRequest,
  /// Server's answer to a `LocateRequest`.
  LocateReply,
  /// Either side requests the connection be torn down.
  CloseConnection,
  /// A malformed message was received; this is the reply to it.
  MessageError,
  /// One fragment of a message split across multiple GIOP messages.
  /// Rejected by this implementation's request/reply envelope with
  /// `ProtocolError` — no fragment reassembler exists (see
  /// `SPEC_FULL.md` §9).
  Fragment,
}

impl MessageType {
  fn to_wire(self) -> u8 {
    match self {
      | Self::Request => 0,
      | Self::Reply => 1,
      | Self::CancelRequest => 2,
      | Self::LocateRequest => 3,
      | Self::LocateReply => 4,
      | Self::CloseConnection => 5,
      | Self::MessageError => 6,
      | Self::Fragment => 7,
    }
  }

  fn from_wire(b: u8) -> Result<Self, MarshalError> {
    Ok(match b {
      | 0 => Self::Request,
      | 1 => Self::Reply,
      | 2 => Self::CancelRequest,
      | 3 => Self::LocateRequest,
      | 4 => Self::LocateReply,
      | 5 => Self::CloseConnection,
      | 6 => Self::MessageError,
      | 7 => Self::Fragment,
      | other => return Err(MarshalError::ProtocolError(format!("unknown message type {other}"))),
    })
  }
}

/// The 12-octet prefix of every GIOP message: magic, version, flags,
/// message type, and body length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageHeader {
  /// Protocol version this message is framed in.
  pub version: GiopVersion,
  /// Low bit: little-endian iff set. 1.1+ bit 1: more fragments follow.
  pub little_endian: bool,
  /// 1.1+ only: another `Fragment` message continues this one.
  pub more_fragments: bool,
  /// Which kind of GIOP message this is.
  pub message_type: MessageType,
  /// Length in octets of the body that follows this header.
  pub message_size: u32,
}

impl MessageHeader {
  /// Build a header with no fragmentation flag set, the common case for
  /// every message this crate itself ever constructs.
  pub fn new(version: GiopVersion,
             little_endian: bool,
             message_type: MessageType,
             message_size: u32)
             -> Self {
    Self { version, little_endian, more_fragments: false, message_type, message_size }
  }
}

impl Encode for MessageHeader {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    channel.write(&MAGIC)?;
    self.version.encode(channel)?;

    let mut flags = u8::from(self.little_endian);
    if self.version.at_least_1_1() && self.more_fragments {
      flags |= 0b10;
    }
    flags.encode(channel)?;

    self.message_type.to_wire().encode(channel)?;

    // message_size is on the wire in the endian this header declares,
    // which may differ from `channel`'s own endianness (the header is
    // always read/written on a fresh channel matching its own flags in
    // practice, but we honor `self.little_endian` explicitly here rather
    // than trusting the channel).
    let mut bytes = self.message_size.to_le_bytes();
    if !self.little_endian {
      bytes.reverse();
    }
    channel.write(&bytes)
  }
}

impl Decode for MessageHeader {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    let magic = channel.read(4)?;
    if magic != MAGIC {
      return Err(MarshalError::ProtocolError(format!("bad magic: {magic:02x?}")));
    }
    let version = GiopVersion::decode(channel)?;
    let flags = u8::decode(channel)?;
    let little_endian = flags & 0b01 != 0;
    let more_fragments = version.at_least_1_1() && (flags & 0b10 != 0);
    let message_type = MessageType::from_wire(u8::decode(channel)?)?;

    let mut bytes = [0u8; 4];
    bytes.copy_from_slice(channel.read(4)?);
    if !little_endian {
      bytes.reverse();
    }
    let message_size = u32::from_le_bytes(bytes);

    Ok(Self { version, little_endian, more_fragments, message_type, message_size })
  }
}

/// Size in octets of a `MessageHeader` on the wire. Constant across all
/// GIOP versions.
pub const HEADER_LEN: usize = 12;

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::assert_eqb;
  use crate::codec::roundtrip;

  #[test]
  fn header_is_twelve_octets() {
    let mut ch = Channel::new_encode(GiopVersion::V1_2, true);
    MessageHeader::new(GiopVersion::V1_2, true, MessageType::Request, 0).encode(&mut ch)
                                                                        .unwrap();
    assert_eq!(ch.buffer().len(), HEADER_LEN);
  }

  #[test]
  fn roundtrip() {
    let h = MessageHeader::new(GiopVersion::V1_2, true, MessageType::Reply, 99);
    assert_eq!(roundtrip(GiopVersion::V1_2, &h), h);
  }

  #[test]
  fn bad_magic_rejected() {
    let mut ch = Channel::new_decode(GiopVersion::V1_2, true, vec![0; 12], 0);
    assert!(MessageHeader::decode(&mut ch).is_err());
  }

  #[test]
  fn message_type_wire_values() {
    assert_eqb!(MessageType::Request.to_wire(), 0);
    assert_eqb!(MessageType::Fragment.to_wire(), 7);
  }
}
