//! The request/reply envelope: `coliRequest`/`coliGetRequest`/
//! `coliReply`/`coliGetReply` (see `SPEC_FULL.md` §4.5).

use coli_msg::error::SystemExceptionBody;
use coli_msg::iop::{ConnectParams, ServiceContextList};
use coli_msg::message::{MessageHeader, MessageType};
use coli_msg::request_reply::{
  ReplyHeader, ReplyHeaderLegacy, ReplyHeaderV1_2, ReplyStatus, RequestHeader, RequestHeaderLegacy,
  RequestHeaderV1_2, SyncScope, SystemExceptionReplyBody, TargetAddress,
};
use coli_msg::{Channel, Decode, Encode, GiopVersion, MarshalError};

use crate::error::{Error, Result};
use crate::ior_string;
use crate::ior_url;
use crate::logging;
use crate::stream::{GiopStream, Timeout};

/// An already-decoded value's storage location, used for the output
/// argument list of [`get_reply`] and the input argument list of
/// [`get_request`]. Mirrors the original's `(codec, location)` pairs:
/// each entry owns a place to decode one value into.
pub trait DecodeInto {
  /// Decode one value off `channel` and overwrite `self` with it.
  fn decode_into(&mut self, channel: &mut Channel) -> std::result::Result<(), MarshalError>;
}

impl<T: Decode> DecodeInto for T {
  fn decode_into(&mut self, channel: &mut Channel) -> std::result::Result<(), MarshalError> {
    *self = T::decode(channel)?;
    Ok(())
  }
}

fn request_header(version: GiopVersion,
                   request_id: u32,
                   object_key: Vec<u8>,
                   operation: &str,
                   service_context: ServiceContextList)
                   -> RequestHeader {
  if version.at_least_1_2() {
    RequestHeader::V1_2(RequestHeaderV1_2 { request_id,
                                            response_flags: SyncScope::WithTarget,
                                            target: TargetAddress::KeyAddr(object_key),
                                            operation: operation.to_string(),
                                            service_context })
  } else {
    let legacy = RequestHeaderLegacy { service_context,
                                       request_id,
                                       response_expected: true,
                                       object_key,
                                       operation: operation.to_string(),
                                       requesting_principal: Vec::new() };
    if version.at_least_1_1() {
      RequestHeader::V1_1(legacy)
    } else {
      RequestHeader::V1_0(legacy)
    }
  }
}

/// Write an outbound request: version-appropriate header, 8-octet
/// alignment in 1.2+, then each argument in order. Returns the assigned
/// request ID so the caller can match it against a later [`get_reply`].
pub fn request(stream: &mut impl GiopStream,
                timeout: Timeout,
                version: GiopVersion,
                little_endian: bool,
                object_key: Vec<u8>,
                operation: &str,
                service_context: ServiceContextList,
                args: &[&dyn Encode])
                -> Result<u32> {
  let request_id = stream.next_request_id();
  let header = request_header(version, request_id, object_key, operation, service_context);

  let mut ch = Channel::new_encode(version, little_endian);
  match &header {
    | RequestHeader::V1_0(h) | RequestHeader::V1_1(h) => h.encode(&mut ch)?,
    | RequestHeader::V1_2(h) => {
      h.encode(&mut ch)?;
      ch.skip(0, 8)?;
    },
  }
  for arg in args {
    arg.encode(&mut ch)?;
  }

  let body = ch.into_buffer();
  let msg_header =
    MessageHeader::new(version, little_endian, MessageType::Request, body.len() as u32);

  log::debug!("{}: sending {}", stream.name(), logging::request_summary(&msg_header, &header));
  stream.write_message(timeout, &msg_header, &body)?;

  Ok(request_id)
}

/// Read one framed reply message and decode its header and output
/// arguments.
///
/// If `reply_status = NO_EXCEPTION`, each entry of `outputs` decodes one
/// value off the body in order. If `SYSTEM_EXCEPTION`, no outputs are
/// touched and this returns `Err(Error::Marshal(MarshalError::RemoteException(..)))`.
/// Any other non-zero status returns `Err(Error::Marshal(MarshalError::RemoteReplyStatus(..)))`.
pub fn get_reply(stream: &mut impl GiopStream,
                  timeout: Timeout,
                  outputs: &mut [&mut dyn DecodeInto])
                  -> Result<ReplyHeader> {
  let (msg_header, body) = stream.read_message(timeout)?;
  if msg_header.message_type != MessageType::Reply {
    return Err(MarshalError::ProtocolError(format!("expected Reply, got {:?}",
                                                     msg_header.message_type)).into());
  }

  let mut ch =
    Channel::new_decode(msg_header.version, msg_header.little_endian, body, 0);

  let reply = if msg_header.version.at_least_1_2() {
    let h = ReplyHeaderV1_2::decode(&mut ch)?;
    ch.skip(0, 8)?;
    ReplyHeader::V1_2(h)
  } else {
    let h = ReplyHeaderLegacy::decode(&mut ch)?;
    if msg_header.version.at_least_1_1() {
      ReplyHeader::V1_1(h)
    } else {
      ReplyHeader::V1_0(h)
    }
  };

  log::debug!("{}: received {}", stream.name(), logging::reply_summary(&msg_header, &reply));

  match reply.reply_status() {
    | ReplyStatus::NoException => {
      for out in outputs {
        out.decode_into(&mut ch)?;
      }
      Ok(reply)
    },
    | ReplyStatus::SystemException => {
      let body = SystemExceptionReplyBody::decode(&mut ch)?;
      Err(MarshalError::RemoteException(SystemExceptionBody { exception_id: body.exception_id,
                                                               minor: body.minor,
                                                               completion_status:
                                                                 body.completion_status }).into())
    },
    | other => Err(MarshalError::RemoteReplyStatus(reply_status_wire(other)).into()),
  }
}

fn reply_status_wire(status: ReplyStatus) -> u32 {
  match status {
    | ReplyStatus::NoException => 0,
    | ReplyStatus::UserException => 1,
    | ReplyStatus::SystemException => 2,
    | ReplyStatus::LocationForward => 3,
    | ReplyStatus::LocationForwardPerm => 4,
    | ReplyStatus::NeedsAddressingMode => 5,
  }
}

/// What [`get_request`] found on the wire: either a match on the expected
/// object key and operation (with the body decoded), or a mismatch (with
/// the header and raw body left for the caller to inspect).
#[derive(Debug)]
pub enum IncomingRequest {
  /// Object key and operation matched; `args` have been decoded in order.
  Matched {
    /// The decoded request header.
    header: RequestHeader,
  },
  /// Object key or operation did not match what the caller expected.
  Unmatched {
    /// The decoded request header.
    header: RequestHeader,
    /// The undecoded request body.
    body: Vec<u8>,
  },
}

/// Read one framed request message. If its object key and operation
/// match `expected_object_key`/`expected_operation`, decode `args` off
/// the body in order and return `Matched`; otherwise return `Unmatched`
/// with the raw body untouched.
pub fn get_request(stream: &mut impl GiopStream,
                    timeout: Timeout,
                    expected_object_key: &[u8],
                    expected_operation: &str,
                    args: &mut [&mut dyn DecodeInto])
                    -> Result<IncomingRequest> {
  let (msg_header, body) = stream.read_message(timeout)?;
  if msg_header.message_type != MessageType::Request {
    return Err(MarshalError::ProtocolError(format!("expected Request, got {:?}",
                                                     msg_header.message_type)).into());
  }

  let mut ch = Channel::new_decode(msg_header.version, msg_header.little_endian, body.clone(), 0);

  let header = if msg_header.version.at_least_1_2() {
    let h = RequestHeaderV1_2::decode(&mut ch)?;
    ch.skip(0, 8)?;
    RequestHeader::V1_2(h)
  } else {
    let h = RequestHeaderLegacy::decode(&mut ch)?;
    if msg_header.version.at_least_1_1() {
      RequestHeader::V1_1(h)
    } else {
      RequestHeader::V1_0(h)
    }
  };

  log::debug!("{}: received {}", stream.name(), logging::request_summary(&msg_header, &header));

  let object_key = match &header {
    | RequestHeader::V1_0(h) | RequestHeader::V1_1(h) => h.object_key.clone(),
    | RequestHeader::V1_2(h) => match &h.target {
      | TargetAddress::KeyAddr(key) => key.clone(),
      | _ => Vec::new(),
    },
  };

  if object_key != expected_object_key || header.operation() != expected_operation {
    return Ok(IncomingRequest::Unmatched { header, body });
  }

  for arg in args {
    arg.decode_into(&mut ch)?;
  }

  Ok(IncomingRequest::Matched { header })
}

/// Write an outbound reply with a caller-supplied request ID and status,
/// then each `(codec, value)` pair in order.
pub fn reply(stream: &mut impl GiopStream,
             timeout: Timeout,
             version: GiopVersion,
             little_endian: bool,
             request_id: u32,
             status: ReplyStatus,
             service_context: ServiceContextList,
             args: &[&dyn Encode])
             -> Result<()> {
  let header = if version.at_least_1_2() {
    ReplyHeader::V1_2(ReplyHeaderV1_2 { request_id, reply_status: status, service_context })
  } else {
    let legacy = ReplyHeaderLegacy { service_context, request_id, reply_status: status };
    if version.at_least_1_1() {
      ReplyHeader::V1_1(legacy)
    } else {
      ReplyHeader::V1_0(legacy)
    }
  };

  let mut ch = Channel::new_encode(version, little_endian);
  match &header {
    | ReplyHeader::V1_0(h) | ReplyHeader::V1_1(h) => h.encode(&mut ch)?,
    | ReplyHeader::V1_2(h) => {
      h.encode(&mut ch)?;
      ch.skip(0, 8)?;
    },
  }
  for arg in args {
    arg.encode(&mut ch)?;
  }

  let body = ch.into_buffer();
  let msg_header = MessageHeader::new(version, little_endian, MessageType::Reply, body.len() as u32);

  log::debug!("{}: sending {}", stream.name(), logging::reply_summary(&msg_header, &header));
  stream.write_message(timeout, &msg_header, &body).map_err(Error::from)
}

/// Resolve either a stringified IOR (`"IOR:..."`) or a `corbaloc:` URL
/// down to [`ConnectParams`], without opening anything. `version_override`,
/// if given, replaces the resolved profile's own declared IIOP version.
/// The resolve-only half of the original `coliOpenIOR` (`SPEC_FULL.md`
/// §4.4.1): stream construction is left to the caller's [`GiopStream`]
/// implementation.
pub fn resolve_ior_or_url(ior_or_url: &str, version_override: Option<GiopVersion>) -> Result<ConnectParams> {
  let ior = if ior_or_url.starts_with("corbaloc:") {
    ior_url::from_url(ior_or_url)?
  } else {
    ior_string::from_str(ior_or_url)?
  };

  ior.connect_params(0, version_override)
     .ok_or_else(|| Error::InvalidUrl("IOR has no TAG_INTERNET_IOP profile".into()))
}

/// Resolve `ior_or_url` via [`resolve_ior_or_url`] and hand the result to
/// `connect`, a caller-supplied `GiopStream` constructor (e.g.
/// `|p| TcpGiopStream::connect((p.host.as_str(), p.port), p.version, true)`).
/// Not a connection pool or ORB: no retry, no caching, and no transport
/// hardcoded here (see `SPEC_FULL.md` §4.4.1, §4.5).
pub fn open_client_channel<S>(ior_or_url: &str,
                              version_override: Option<GiopVersion>,
                              connect: impl FnOnce(&ConnectParams) -> Result<S>)
                              -> Result<(S, Vec<u8>)> {
  let params = resolve_ior_or_url(ior_or_url, version_override)?;
  let stream = connect(&params)?;
  Ok((stream, params.object_key))
}

#[cfg(test)]
mod tests {
  use std::net::TcpListener;

  use pretty_assertions::assert_eq;

  use super::*;
  use crate::net::TcpGiopStream;

  #[test]
  fn request_then_reply_roundtrip() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = std::thread::spawn(move || {
      let (socket, _) = listener.accept().unwrap();
      let mut stream = TcpGiopStream::from_socket(socket, GiopVersion::V1_2, true);

      let mut arg = 0u32;
      let matched = get_request(&mut stream,
                                 Timeout::Infinite,
                                 b"obj",
                                 "ping",
                                 &mut [&mut arg]).unwrap();
      let req_id = match matched {
        | IncomingRequest::Matched { header } => header.request_id(),
        | IncomingRequest::Unmatched { .. } => panic!("expected a match"),
      };
      assert_eq!(arg, 42);

      let out = 99u32;
      reply(&mut stream,
            Timeout::Infinite,
            GiopVersion::V1_2,
            true,
            req_id,
            ReplyStatus::NoException,
            vec![],
            &[&out]).unwrap();
    });

    let mut client = TcpGiopStream::connect(addr, GiopVersion::V1_2, true).unwrap();
    let arg = 42u32;
    request(&mut client,
            Timeout::Infinite,
            GiopVersion::V1_2,
            true,
            b"obj".to_vec(),
            "ping",
            vec![],
            &[&arg]).unwrap();

    let mut result = 0u32;
    get_reply(&mut client, Timeout::Infinite, &mut [&mut result]).unwrap();
    assert_eq!(result, 99);

    server.join().unwrap();
  }

  #[test]
  fn system_exception_reply_surfaces_remote_exception() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = std::thread::spawn(move || {
      let (socket, _) = listener.accept().unwrap();
      let mut stream = TcpGiopStream::from_socket(socket, GiopVersion::V1_2, true);
      let exc = SystemExceptionReplyBody { exception_id: "IDL:CORBA/BAD_PARAM:1.0".into(),
                                           minor: 0,
                                           completion_status: 0 };
      reply(&mut stream,
            Timeout::Infinite,
            GiopVersion::V1_2,
            true,
            0,
            ReplyStatus::SystemException,
            vec![],
            &[&exc]).unwrap();
    });

    let mut client = TcpGiopStream::connect(addr, GiopVersion::V1_2, true).unwrap();
    let err = get_reply(&mut client, Timeout::Infinite, &mut []).unwrap_err();
    assert!(matches!(err, Error::Marshal(MarshalError::RemoteException(_))));

    server.join().unwrap();
  }

  #[test]
  fn open_client_channel_uses_caller_supplied_constructor() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let server = std::thread::spawn(move || {
      listener.accept().unwrap();
    });

    let url = format!("corbaloc:iiop:1.2@{}:{}/obj", addr.ip(), addr.port());
    let mut constructed_with = None;
    let (stream, object_key) =
      open_client_channel(&url, None, |params| {
        constructed_with = Some(params.clone());
        TcpGiopStream::connect((params.host.as_str(), params.port), params.version, true)
      }).unwrap();

    assert_eq!(object_key, b"obj".to_vec());
    assert_eq!(stream.name(), addr.to_string());
    assert_eq!(constructed_with.unwrap().version, GiopVersion::V1_2);

    server.join().unwrap();
  }

  #[test]
  fn open_client_channel_honors_version_override() {
    let ior = coli_msg::iop::Ior::from_connect_params(b"obj".to_vec(),
                                                       "127.0.0.1".to_string(),
                                                       1,
                                                       GiopVersion::V1_0,
                                                       String::new());
    let stringified = ior_string::to_string(&ior).unwrap();
    let params = resolve_ior_or_url(&stringified, Some(GiopVersion::V1_2)).unwrap();
    assert_eq!(params.version, GiopVersion::V1_2);
  }
}
