//! The CORBA `Any` type and its (partial) `TypeCode` support.
//!
//! Only the primitive `TCKind` values are marshaled; any complex
//! TypeCode (`tk_struct`, `tk_union`, `tk_sequence`, `tk_array`,
//! `tk_value`, ...) and the CDR indirection marker `0xFFFFFFFF` fail with
//! [`MarshalError::UnsupportedTypeCode`] — this mirrors a limitation
//! present in the original source (see `SPEC_FULL.md` §4.3, §9).

use crate::channel::Channel;
use crate::codec::{Decode, Encode};
use crate::error::MarshalError;
use crate::primitive::{CorbaChar, LongDouble, WChar};
use crate::string::WString;

/// `TCKind` values this crate understands. Only the primitive kinds have
/// a defined wire value/arm pairing; anything else is
/// `UnsupportedTypeCode`.
pub mod tck {
  /// `tk_null`
  pub const TK_NULL: u32 = 0;
  /// `tk_void`
  pub const TK_VOID: u32 = 1;
  /// `tk_short`
  pub const TK_SHORT: u32 = 2;
  /// `tk_long`
  pub const TK_LONG: u32 = 3;
  /// `tk_ushort`
  pub const TK_USHORT: u32 = 4;
  /// `tk_ulong`
  pub const TK_ULONG: u32 = 5;
  /// `tk_float`
  pub const TK_FLOAT: u32 = 6;
  /// `tk_double`
  pub const TK_DOUBLE: u32 = 7;
  /// `tk_boolean`
  pub const TK_BOOLEAN: u32 = 8;
  /// `tk_char`
  pub const TK_CHAR: u32 = 9;
  /// `tk_octet`
  pub const TK_OCTET: u32 = 10;
  /// `tk_string`
  pub const TK_STRING: u32 = 18;
  /// `tk_longlong`
  pub const TK_LONGLONG: u32 = 23;
  /// `tk_ulonglong`
  pub const TK_ULONGLONG: u32 = 24;
  /// `tk_longdouble`
  pub const TK_LONGDOUBLE: u32 = 25;
  /// `tk_wchar`
  pub const TK_WCHAR: u32 = 26;
  /// `tk_wstring`
  pub const TK_WSTRING: u32 = 27;
  /// The CDR "indirection" marker: a back-reference to an
  /// already-marshaled TypeCode, used by recursive/shared complex types.
  /// Not resolved by this crate (see module docs).
  pub const INDIRECTION: u32 = 0xFFFF_FFFF;
}

/// The value half of an `Any`, restricted to the primitive `TCKind`s
/// this crate supports.
#[derive(Debug, Clone, PartialEq)]
pub enum AnyValue {
  /// `tk_null`: no value.
  Null,
  /// `tk_void`: no value.
  Void,
  /// `tk_short`
  Short(i16),
  /// `tk_long`
  Long(i32),
  /// `tk_ushort`
  UShort(u16),
  /// `tk_ulong`
  ULong(u32),
  /// `tk_float`
  Float(f32),
  /// `tk_double`
  Double(f64),
  /// `tk_boolean`
  Boolean(bool),
  /// `tk_char`
  Char(CorbaChar),
  /// `tk_octet`
  Octet(u8),
  /// `tk_string`
  Str(String),
  /// `tk_longlong`
  LongLong(i64),
  /// `tk_ulonglong`
  ULongLong(u64),
  /// `tk_longdouble`
  LongDouble(LongDouble),
  /// `tk_wchar`
  WChar(WChar),
  /// `tk_wstring`
  WString(WString),
}

/// A CORBA `Any`: a TypeCode tag plus a value of the type it names.
#[derive(Debug, Clone, PartialEq)]
pub struct Any {
  /// The value and (implicitly) its `TCKind`.
  pub value: AnyValue,
}

impl Encode for Any {
  fn encode(&self, channel: &mut Channel) -> Result<(), MarshalError> {
    match &self.value {
      | AnyValue::Null => {
        tck::TK_NULL.encode(channel)
      },
      | AnyValue::Void => tck::TK_VOID.encode(channel),
      | AnyValue::Short(v) => {
        tck::TK_SHORT.encode(channel)?;
        v.encode(channel)
      },
      | AnyValue::Long(v) => {
        tck::TK_LONG.encode(channel)?;
        v.encode(channel)
      },
      | AnyValue::UShort(v) => {
        tck::TK_USHORT.encode(channel)?;
        v.encode(channel)
      },
      | AnyValue::ULong(v) => {
        tck::TK_ULONG.encode(channel)?;
        v.encode(channel)
      },
      | AnyValue::Float(v) => {
        tck::TK_FLOAT.encode(channel)?;
        v.encode(channel)
      },
      | AnyValue::Double(v) => {
        tck::TK_DOUBLE.encode(channel)?;
        v.encode(channel)
      },
      | AnyValue::Boolean(v) => {
        tck::TK_BOOLEAN.encode(channel)?;
        v.encode(channel)
      },
      | AnyValue::Char(v) => {
        tck::TK_CHAR.encode(channel)?;
        v.encode(channel)
      },
      | AnyValue::Octet(v) => {
        tck::TK_OCTET.encode(channel)?;
        v.encode(channel)
      },
      | AnyValue::Str(v) => {
        tck::TK_STRING.encode(channel)?;
        v.clone().encode(channel)
      },
      | AnyValue::LongLong(v) => {
        tck::TK_LONGLONG.encode(channel)?;
        v.encode(channel)
      },
      | AnyValue::ULongLong(v) => {
        tck::TK_ULONGLONG.encode(channel)?;
        v.encode(channel)
      },
      | AnyValue::LongDouble(v) => {
        tck::TK_LONGDOUBLE.encode(channel)?;
        v.encode(channel)
      },
      | AnyValue::WChar(v) => {
        tck::TK_WCHAR.encode(channel)?;
        v.encode(channel)
      },
      | AnyValue::WString(v) => {
        tck::TK_WSTRING.encode(channel)?;
        v.encode(channel)
      },
    }
  }
}

impl Decode for Any {
  fn decode(channel: &mut Channel) -> Result<Self, MarshalError> {
    let kind = u32::decode(channel)?;
    let value = match kind {
      | tck::TK_NULL => AnyValue::Null,
      | tck::TK_VOID => AnyValue::Void,
      | tck::TK_SHORT => AnyValue::Short(i16::decode(channel)?),
      | tck::TK_LONG => AnyValue::Long(i32::decode(channel)?),
      | tck::TK_USHORT => AnyValue::UShort(u16::decode(channel)?),
      | tck::TK_ULONG => AnyValue::ULong(u32::decode(channel)?),
      | tck::TK_FLOAT => AnyValue::Float(f32::decode(channel)?),
      | tck::TK_DOUBLE => AnyValue::Double(f64::decode(channel)?),
      | tck::TK_BOOLEAN => AnyValue::Boolean(bool::decode(channel)?),
      | tck::TK_CHAR => AnyValue::Char(CorbaChar::decode(channel)?),
      | tck::TK_OCTET => AnyValue::Octet(u8::decode(channel)?),
      | tck::TK_STRING => AnyValue::Str(String::decode(channel)?),
      | tck::TK_LONGLONG => AnyValue::LongLong(i64::decode(channel)?),
      | tck::TK_ULONGLONG => AnyValue::ULongLong(u64::decode(channel)?),
      | tck::TK_LONGDOUBLE => AnyValue::LongDouble(LongDouble::decode(channel)?),
      | tck::TK_WCHAR => AnyValue::WChar(WChar::decode(channel)?),
      | tck::TK_WSTRING => AnyValue::WString(WString::decode(channel)?),
      | other => return Err(MarshalError::UnsupportedTypeCode(other)),
    };
    Ok(Any { value })
  }
}

#[cfg(test)]
mod tests {
  use pretty_assertions::assert_eq;

  use super::*;
  use crate::codec::roundtrip;
  use crate::version::GiopVersion;

  #[test]
  fn primitive_any_roundtrip() {
    let any = Any { value: AnyValue::ULong(42) };
    assert_eq!(roundtrip(GiopVersion::V1_2, &any), any);
  }

  #[test]
  fn string_any_roundtrip() {
    let any = Any { value: AnyValue::Str("hi".into()) };
    assert_eq!(roundtrip(GiopVersion::V1_2, &any), any);
  }

  #[test]
  fn complex_typecode_unsupported() {
    let mut ch = Channel::new_encode(GiopVersion::V1_2, true);
    15u32.encode(&mut ch).unwrap(); // tk_struct
    let bytes = ch.into_buffer();
    let mut dec = Channel::new_decode(GiopVersion::V1_2, true, bytes, 0);
    assert_eq!(Any::decode(&mut dec), Err(MarshalError::UnsupportedTypeCode(15)));
  }

  #[test]
  fn indirection_marker_unsupported() {
    let mut ch = Channel::new_encode(GiopVersion::V1_2, true);
    tck::INDIRECTION.encode(&mut ch).unwrap();
    let bytes = ch.into_buffer();
    let mut dec = Channel::new_decode(GiopVersion::V1_2, true, bytes, 0);
    assert_eq!(Any::decode(&mut dec), Err(MarshalError::UnsupportedTypeCode(tck::INDIRECTION)));
  }
}
