//! `coli` is a lightweight CORBA client/server runtime built on
//! [`coli_msg`], the CDR/GIOP marshaling core.
//!
//! ## CORBA
//! CORBA (Common Object Request Broker Architecture) is a middleware
//! standard for invoking operations on objects that may live in a
//! different process, written in a different language, on a different
//! machine. The wire protocol is GIOP (General Inter-ORB Protocol),
//! almost always carried over TCP as IIOP (Internet Inter-ORB Protocol).
//!
//! ## What this crate provides
//! - IOR codecs: stringified (`IOR:...`) and `corbaloc:` URL forms
//!   ([`ior_string`], [`ior_url`]).
//! - A request/reply envelope on top of a pluggable framed stream
//!   ([`envelope`], [`stream`]).
//! - A `std::net::TcpStream`-backed stream implementation ([`net`]).
//!
//! What it does not provide: an IDL compiler, a POA, a naming service,
//! or anything resembling connection pooling — this is the marshaling
//! and transport seam an ORB would be built on top of, not the ORB
//! itself.

#![doc(html_root_url = "https://docs.rs/coli/0.1.0")]
#![cfg_attr(any(docsrs, feature = "docs"), feature(doc_cfg))]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]
#![cfg_attr(not(test), deny(unsafe_code))]
#![cfg_attr(not(test), warn(unreachable_pub))]
#![cfg_attr(not(feature = "std"), no_std)]

pub(crate) mod logging;

/// The crate-wide error type and `Result` alias.
pub mod error;

/// Process-wide default GIOP version, seeded from `GIOP_VERSION`.
pub mod version;

/// The collaborator stream interface the envelope is built on.
pub mod stream;

/// `std::net::TcpStream`-backed [`stream::GiopStream`].
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod net;

/// Stringified-IOR codec (`"IOR:..."`).
pub mod ior_string;

/// `corbaloc:` URL codec.
pub mod ior_url;

/// The request/reply envelope: `coliRequest`/`coliGetRequest`/
/// `coliReply`/`coliGetReply`.
#[cfg(feature = "std")]
#[cfg_attr(docsrs, doc(cfg(feature = "std")))]
pub mod envelope;

#[doc(inline)]
pub use error::{Error, Result};
#[doc(inline)]
pub use stream::{GiopStream, Timeout};
#[doc(inline)]
pub use version::default_version;
