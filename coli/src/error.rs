//! The crate-wide error type, wrapping the lower-level [`MarshalError`]
//! the way the teacher crate wraps `MessageParseError`/`MessageToBytesError`
//! in its own `core::error::What<P>`.

use std::fmt;

use coli_msg::MarshalError;

/// Every way a `coli` operation can fail.
#[derive(Debug)]
pub enum Error {
  /// A marshaling failure from `coli-msg` (bad bytes, bad discriminant,
  /// unsupported TypeCode, ...).
  Marshal(MarshalError),
  /// The underlying stream failed at the OS level.
  Io(std::io::Error),
  /// An IOR string or `corbaloc:` URL did not parse.
  InvalidUrl(String),
  /// The read or write did not complete within the caller's timeout.
  Timeout,
  /// The stream was closed or reset mid-operation.
  ConnectionLost,
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      | Self::Marshal(e) => write!(f, "marshaling error: {e}"),
      | Self::Io(e) => write!(f, "io error: {e}"),
      | Self::InvalidUrl(s) => write!(f, "invalid IOR url or stringified IOR: {s}"),
      | Self::Timeout => write!(f, "operation timed out"),
      | Self::ConnectionLost => write!(f, "connection lost"),
    }
  }
}

impl std::error::Error for Error {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      | Self::Marshal(e) => Some(e),
      | Self::Io(e) => Some(e),
      | _ => None,
    }
  }
}

impl From<MarshalError> for Error {
  fn from(e: MarshalError) -> Self {
    Self::Marshal(e)
  }
}

impl From<std::io::Error> for Error {
  fn from(e: std::io::Error) -> Self {
    match e.kind() {
      | std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock => Self::Timeout,
      | std::io::ErrorKind::ConnectionReset | std::io::ErrorKind::ConnectionAborted
      | std::io::ErrorKind::BrokenPipe | std::io::ErrorKind::UnexpectedEof => Self::ConnectionLost,
      | _ => Self::Io(e),
    }
  }
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;

  #[test]
  fn every_variant_has_a_nonempty_display() {
    let errs: Vec<Error> = vec![Error::Marshal(MarshalError::OutOfMemory),
                                Error::Io(std::io::Error::new(std::io::ErrorKind::Other, "x")),
                                Error::InvalidUrl("bad".into()),
                                Error::Timeout,
                                Error::ConnectionLost];
    for e in errs {
      assert!(!e.to_string().is_empty());
    }
  }

  #[test]
  fn io_error_kind_maps_to_semantic_variant() {
    let timeout = std::io::Error::new(std::io::ErrorKind::TimedOut, "t");
    assert!(matches!(Error::from(timeout), Error::Timeout));

    let reset = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "r");
    assert_eq!(Error::from(reset).to_string(), Error::ConnectionLost.to_string());
  }
}
