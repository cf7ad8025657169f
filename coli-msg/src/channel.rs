//! The marshaling channel: a buffer, a cursor, a mode, and the
//! GIOP version/endianness the current message is encoded in.

use crate::error::MarshalError;
use crate::version::GiopVersion;

/// What a [`Channel`] is currently doing.
///
/// `Erase` is retained for fidelity with the original three-mode state
/// machine (see `SPEC_FULL.md` §3.5, §4.6) but every codec's `Erase` arm
/// is a no-op in this crate: owned fields are `String`/`Vec<u8>`/etc, and
/// dropping the host value already frees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
  /// Reading host values out of a caller-provided buffer.
  Decode,
  /// Writing host values into a buffer that grows on demand.
  Encode,
  /// No buffer I/O; dispatches the (now-trivial) recursive free.
  Erase,
}

/// An endian- and alignment-aware cursor over a growable octet buffer,
/// the single piece of state every codec in this crate reads or writes
/// through.
///
/// Alignment is always computed relative to [`Channel::origin`], not
/// relative to the start of [`Channel::buffer`] — this is what lets an
/// encapsulation (see [`crate::encapsulation`]) reset the alignment frame
/// without copying the outer buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
  buf: Vec<u8>,
  cursor: usize,
  origin: usize,
  mode: Mode,
  version: GiopVersion,
  little_endian: bool,
}

impl Channel {
  /// Create an encode channel: empty buffer, cursor and origin at 0.
  pub fn new_encode(version: GiopVersion, little_endian: bool) -> Self {
    Self { buf: Vec::new(),
           cursor: 0,
           origin: 0,
           mode: Mode::Encode,
           version,
           little_endian }
  }

  /// Create a decode channel over a caller-provided buffer, positioned
  /// at `origin` (typically 0, or the start of an encapsulation's
  /// payload).
  pub fn new_decode(version: GiopVersion, little_endian: bool, buf: Vec<u8>, origin: usize) -> Self {
    Self { buf, cursor: origin, origin, mode: Mode::Decode, version, little_endian }
  }

  /// Switch this channel's mode, e.g. from `Decode` to `Erase` once a
  /// decoded value is no longer needed. A structurally legal but inert
  /// transition in this crate (see [`Mode::Erase`]).
  pub fn set_mode(&mut self, mode: Mode) {
    self.mode = mode;
  }

  /// The channel's current mode.
  pub fn mode(&self) -> Mode {
    self.mode
  }

  /// The GIOP version this channel was created with. Fixed for the
  /// lifetime of the channel.
  pub fn version(&self) -> GiopVersion {
    self.version
  }

  /// Whether CDR primitives on this channel are little-endian.
  pub fn little_endian(&self) -> bool {
    self.little_endian
  }

  /// Current absolute cursor offset into `buffer()`.
  pub fn position(&self) -> usize {
    self.cursor
  }

  /// The offset that counts as alignment "position 0".
  pub fn origin(&self) -> usize {
    self.origin
  }

  /// Borrow the bytes written (`Encode`) or supplied (`Decode`) so far.
  pub fn buffer(&self) -> &[u8] {
    &self.buf
  }

  /// Consume the channel, yielding its buffer. Used at the end of an
  /// `Encode` channel's life to hand the finished message to a stream.
  pub fn into_buffer(self) -> Vec<u8> {
    self.buf
  }

  /// Advance the cursor to the next multiple of `alignment` relative to
  /// [`Channel::origin`], then by `n` further octets. Returns the
  /// effective total advance. `skip(0, 0)` just reports the current
  /// cursor offset; `reset()` is `skip` back to the origin.
  ///
  /// Only this three-argument form is exposed (see `SPEC_FULL.md` §9).
  pub fn skip(&mut self, n: usize, alignment: usize) -> Result<usize, MarshalError> {
    if !matches!(alignment, 0 | 1 | 2 | 4 | 8 | 16) {
      return Err(MarshalError::InvalidAlignment(alignment));
    }

    let start = self.cursor;

    if alignment > 1 {
      let rel = self.cursor - self.origin;
      let pad = (alignment - (rel % alignment)) % alignment;
      self.advance(pad)?;
    }

    self.advance(n)?;

    Ok(self.cursor - start)
  }

  /// Reset the cursor back to the origin.
  pub fn reset(&mut self) -> Result<usize, MarshalError> {
    let back = self.cursor - self.origin;
    self.cursor = self.origin;
    Ok(back)
  }

  fn advance(&mut self, n: usize) -> Result<(), MarshalError> {
    match self.mode {
      | Mode::Decode => {
        if self.cursor + n > self.buf.len() {
          return Err(MarshalError::TruncatedBuffer { requested: n,
                                                       remaining: self.buf.len() - self.cursor });
        }
        self.cursor += n;
        Ok(())
      },
      | Mode::Encode => {
        self.extend(n)?;
        self.cursor += n;
        Ok(())
      },
      | Mode::Erase => Ok(()),
    }
  }

  /// Move the alignment origin to the current cursor position. Used by
  /// [`crate::encapsulation`] to reset the alignment frame immediately
  /// after writing/reading the encapsulation's leading endian octet.
  pub(crate) fn mark_origin(&mut self) {
    self.origin = self.cursor;
  }

  /// Grow the buffer by at least `n` octets (zero-filled). A no-op
  /// outside `Encode`.
  pub fn extend(&mut self, n: usize) -> Result<(), MarshalError> {
    if self.mode != Mode::Encode {
      return Ok(());
    }
    let want = self.cursor + n;
    if want > self.buf.len() {
      self.buf.resize(want, 0);
    }
    Ok(())
  }

  /// Read exactly `n` octets at the current cursor without advancing,
  /// then advance past them. Used by decode-side primitive codecs.
  pub fn read(&mut self, n: usize) -> Result<&[u8], MarshalError> {
    if self.mode != Mode::Decode {
      return Err(MarshalError::ProtocolError("read() outside Decode mode".into()));
    }
    if self.cursor + n > self.buf.len() {
      return Err(MarshalError::TruncatedBuffer { requested: n,
                                                   remaining: self.buf.len() - self.cursor });
    }
    let start = self.cursor;
    self.cursor += n;
    Ok(&self.buf[start..start + n])
  }

  /// Write `bytes` at the current cursor, growing the buffer as needed,
  /// then advance past them. Used by encode-side primitive codecs.
  pub fn write(&mut self, bytes: &[u8]) -> Result<(), MarshalError> {
    if self.mode != Mode::Encode {
      return Ok(());
    }
    self.extend(bytes.len())?;
    let start = self.cursor;
    self.buf[start..start + bytes.len()].copy_from_slice(bytes);
    self.cursor += bytes.len();
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::assert_eqb_iter;

  #[test]
  fn skip_aligns_relative_to_origin() {
    let mut ch = Channel::new_encode(GiopVersion::V1_2, true);
    ch.skip(1, 1).unwrap();
    let advanced = ch.skip(0, 4).unwrap();
    assert_eq!(advanced, 3);
    assert_eq!(ch.position(), 4);
  }

  #[test]
  fn decode_truncated() {
    let mut ch = Channel::new_decode(GiopVersion::V1_2, true, vec![1, 2], 0);
    assert!(ch.read(3).is_err());
  }

  #[test]
  fn invalid_alignment() {
    let mut ch = Channel::new_encode(GiopVersion::V1_2, true);
    assert_eq!(ch.skip(0, 3), Err(MarshalError::InvalidAlignment(3)));
  }

  #[test]
  fn encode_then_decode_roundtrip() {
    let mut enc = Channel::new_encode(GiopVersion::V1_2, true);
    enc.write(&[1, 2, 3, 4]).unwrap();
    let bytes = enc.into_buffer();

    let mut dec = Channel::new_decode(GiopVersion::V1_2, true, bytes, 0);
    assert_eqb_iter!(dec.read(4).unwrap(), &[1, 2, 3, 4]);
  }
}
