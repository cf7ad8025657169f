//! Errors raised by the marshaling core.

use core::fmt;

/// A CORBA system exception's minor code and completion status, carried
/// by [`MarshalError::RemoteException`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct SystemExceptionBody {
  /// Repository ID of the exception, e.g. `"IDL:CORBA/BAD_PARAM:1.0"`
  pub exception_id: String,
  /// Vendor-specific minor code
  pub minor: u32,
  /// 0 = `COMPLETED_YES`, 1 = `COMPLETED_NO`, 2 = `COMPLETED_MAYBE`
  pub completion_status: u32,
}

/// Every way a marshaling operation can fail.
///
/// Mirrors the taxonomy of the original library's `errno_t` return codes;
/// see each variant's doc for the operation(s) that raise it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum MarshalError {
  /// A decode read past the end of the supplied buffer.
  TruncatedBuffer {
    /// octets requested
    requested: usize,
    /// octets remaining in the buffer
    remaining: usize,
  },
  /// An alignment other than 0/1/2/4/8/16 was requested.
  InvalidAlignment(usize),
  /// A tagged-union discriminant had no matching arm and no default.
  InvalidDiscriminator(i64),
  /// An `Any`'s `TypeCode` was a non-primitive kind this implementation
  /// does not marshal (`tk_struct`, `tk_union`, `tk_sequence`, ...).
  UnsupportedTypeCode(u32),
  /// A `corbaloc:` URL was malformed.
  InvalidUrl(String),
  /// An `"IOR:..."` stringified form was malformed.
  InvalidStringifiedIor(String),
  /// An encode-side buffer failed to grow.
  OutOfMemory,
  /// A framed message had the wrong magic or an unexpected message type.
  ProtocolError(String),
  /// A reply's `reply_status` was neither `NO_EXCEPTION` nor
  /// `SYSTEM_EXCEPTION`.
  RemoteReplyStatus(u32),
  /// A reply's `reply_status` was `SYSTEM_EXCEPTION`.
  RemoteException(SystemExceptionBody),
}

impl fmt::Display for MarshalError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::TruncatedBuffer { requested, remaining } => {
        write!(f,
               "truncated buffer: requested {requested} octets but only {remaining} remain")
      },
      | Self::InvalidAlignment(a) => write!(f, "invalid alignment: {a}"),
      | Self::InvalidDiscriminator(d) => write!(f, "union discriminant {d} has no matching arm"),
      | Self::UnsupportedTypeCode(tk) => write!(f, "unsupported TypeCode kind {tk:#x}"),
      | Self::InvalidUrl(s) => write!(f, "invalid corbaloc: url: {s}"),
      | Self::InvalidStringifiedIor(s) => write!(f, "invalid stringified IOR: {s}"),
      | Self::OutOfMemory => write!(f, "out of memory growing encode buffer"),
      | Self::ProtocolError(s) => write!(f, "protocol error: {s}"),
      | Self::RemoteReplyStatus(s) => write!(f, "remote reply status {s}"),
      | Self::RemoteException(body) => {
        write!(f,
               "remote exception {} (minor {}, completed {})",
               body.exception_id, body.minor, body.completion_status)
      },
    }
  }
}

impl std::error::Error for MarshalError {}

/// Convenient alias for marshaling operations.
pub type Result<T> = core::result::Result<T, MarshalError>;
