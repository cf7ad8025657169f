//! Low-level representation of CORBA GIOP/CDR messages.
//!
//! The most notable items in `coli_msg` are [`Channel`], the endian- and
//! alignment-aware cursor that every codec reads and writes through, and
//! the [`Encode`]/[`Decode`] traits implemented for every CDR primitive and
//! every GIOP/IOP/IIOP constructed type.
//!
//! ## Scope
//! This crate only knows how to turn CDR bytes into host values and back.
//! It has no opinion about sockets, connection pools, or IDL compilation;
//! see the `coli` crate for the request/reply envelope built on top of it.
//!
//! ## Allocation
//! Every dynamically-sized field (strings, sequences, octet buffers) is
//! owned outright by the containing value (`String`, `Vec<u8>`, ...). There
//! is no generic `Array` abstraction here: this crate targets `std` only.

#![deny(missing_docs)]
#![cfg_attr(not(test), deny(unsafe_code))]
#![cfg_attr(not(test), warn(unreachable_pub))]

/// Error taxonomy for marshaling failures
pub mod error;

/// The marshaling channel: buffer + cursor + mode + version + endianness
pub mod channel;

/// `Encode`/`Decode` trait pair implemented by every marshalable type
pub mod codec;

/// CDR primitive codecs (booleans, integers, floats, octets, wide chars)
pub mod primitive;

/// CDR `string`/`wstring` codecs
pub mod string;

/// CDR sequence/array codecs
pub mod sequence;

/// CDR encapsulation: a nested, self-contained, endian-tagged CDR stream
pub mod encapsulation;

/// GIOP protocol version
pub mod version;

/// IOP/IIOP types: `IOR`, `TaggedProfile`, `ProfileBody`, `ServiceContext`
pub mod iop;

/// The CORBA `Any` type and its (partial) `TypeCode` support
pub mod any;

/// GIOP `MessageHeader` and message type
pub mod message;

/// GIOP `RequestHeader`/`ReplyHeader` family and related types
pub mod request_reply;

/// Name/value lookup tables for the various GIOP/IOP enumerations
pub mod lookup;

#[doc(inline)]
pub use channel::{Channel, Mode};
#[doc(inline)]
pub use codec::{Decode, Encode};
#[doc(inline)]
pub use error::MarshalError;
#[doc(inline)]
pub use version::GiopVersion;

#[cfg(test)]
pub(crate) mod tests {
  #[macro_export]
  macro_rules! assert_eqb {
    ($actual:expr, $expected:expr) => {
      if $actual != $expected {
        panic!("expected {:08b} to equal {:08b}", $actual, $expected)
      }
    };
  }

  #[macro_export]
  macro_rules! assert_eqb_iter {
    ($actual:expr, $expected:expr) => {
      if $actual.iter().ne($expected.iter()) {
        panic!("expected {:?} to equal {:?}",
               $actual.iter().map(|b| format!("{:08b}", b)).collect::<Vec<_>>(),
               $expected.iter().map(|b| format!("{:08b}", b)).collect::<Vec<_>>())
      }
    };
  }
}
