//! The collaborator stream interface the request/reply envelope is built
//! on (`SPEC_FULL.md` §6.5). The marshaling core is oblivious to
//! transport; a `GiopStream` is the seam where TCP-level I/O lives.

use coli_msg::message::MessageHeader;

use crate::error::Result;

/// How long a blocking stream operation may wait.
///
/// Mirrors the original source's timeout convention: negative means
/// "wait forever", zero means "poll and return immediately if nothing
/// is ready", positive is a bound in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Timeout {
  /// Block until the operation completes.
  Infinite,
  /// Return immediately if the operation would block.
  Poll,
  /// Block for at most this many seconds.
  Seconds(u32),
}

impl Timeout {
  /// Build a `Timeout` from the original source's signed-seconds
  /// convention: `< 0` infinite, `0` poll, `> 0` a bound in seconds.
  pub fn from_signed_seconds(seconds: i64) -> Self {
    match seconds {
      | s if s < 0 => Self::Infinite,
      | 0 => Self::Poll,
      | s => Self::Seconds(s as u32),
    }
  }
}

/// A framed, request-ID-issuing byte stream carrying GIOP messages.
///
/// Implementors own the underlying socket and are responsible for all
/// TCP-level I/O; the request/reply envelope (see [`crate::envelope`])
/// only ever calls these four operations.
pub trait GiopStream {
  /// Block (subject to `timeout`) for one complete framed GIOP message
  /// and return its header and body.
  fn read_message(&mut self, timeout: Timeout) -> Result<(MessageHeader, Vec<u8>)>;

  /// Write one complete framed GIOP message, header and body together.
  fn write_message(&mut self, timeout: Timeout, header: &MessageHeader, body: &[u8]) -> Result<()>;

  /// Allocate the next request ID for this stream. Strictly monotonic
  /// for the lifetime of the stream (see `SPEC_FULL.md` §5).
  fn next_request_id(&mut self) -> u32;

  /// A short, human-readable name for this stream, used in log output.
  fn name(&self) -> &str;
}
