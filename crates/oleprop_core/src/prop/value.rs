use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::prop::Kind;

/// Dynamic native value exchanged with callers.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Absence of a value.
	Empty,
	/// Explicit null.
	Null,
	/// Boolean.
	Bool(bool),
	/// Signed 8-bit integer.
	I8(i8),
	/// Unsigned 8-bit integer.
	U8(u8),
	/// Signed 16-bit integer.
	I16(i16),
	/// Unsigned 16-bit integer.
	U16(u16),
	/// Signed 32-bit integer.
	I32(i32),
	/// Unsigned 32-bit integer.
	U32(u32),
	/// Signed 64-bit integer.
	I64(i64),
	/// Unsigned 64-bit integer.
	U64(u64),
	/// 32-bit float.
	F32(f32),
	/// 64-bit float.
	F64(f64),
	/// Scaled currency amount.
	Currency(Currency),
	/// 96-bit decimal.
	Decimal(Decimal),
	/// Status code.
	Error(i32),
	/// Single character, stored as a one-character string.
	Char(char),
	/// Text.
	String(String),
	/// Calendar timestamp.
	DateTime(DateTime<Utc>),
	/// Raw 100ns tick count since 1601-01-01 UTC.
	FileTime(FileTime),
	/// GUID.
	Guid(Uuid),
	/// Byte run.
	Blob(Vec<u8>),
	/// Clipboard descriptor.
	Clip(ClipData),
	/// Sequence with a declared element kind.
	Array(Array),
	/// Sequence whose element kind is taken from its first item.
	List(Vec<Value>),
	/// Live reference to an external object with no value mapping.
	Object(ObjectRef),
}

impl Value {
	/// Native kind of a scalar value, `None` for empty, null, sequences, and objects.
	pub fn kind(&self) -> Option<Kind> {
		Some(match self {
			Self::Bool(_) => Kind::Bool,
			Self::I8(_) => Kind::I8,
			Self::U8(_) => Kind::U8,
			Self::I16(_) => Kind::I16,
			Self::U16(_) => Kind::U16,
			Self::I32(_) => Kind::I32,
			Self::U32(_) => Kind::U32,
			Self::I64(_) => Kind::I64,
			Self::U64(_) => Kind::U64,
			Self::F32(_) => Kind::F32,
			Self::F64(_) => Kind::F64,
			Self::Currency(_) => Kind::Currency,
			Self::Decimal(_) => Kind::Decimal,
			Self::Error(_) => Kind::Error,
			Self::Char(_) => Kind::Char,
			Self::String(_) => Kind::String,
			Self::DateTime(_) => Kind::DateTime,
			Self::FileTime(_) => Kind::FileTime,
			Self::Guid(_) => Kind::Guid,
			Self::Blob(_) => Kind::Blob,
			Self::Clip(_) => Kind::Clip,
			Self::Empty | Self::Null | Self::Array(_) | Self::List(_) | Self::Object(_) => return None,
		})
	}

	/// Stable lowercase label of the runtime kind.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::Empty => "empty",
			Self::Null => "null",
			Self::Array(_) => "array",
			Self::List(_) => "list",
			Self::Object(_) => "object",
			other => other.kind().map_or("unknown", Kind::as_str),
		}
	}

	/// Convenience constructor for a declared-kind sequence.
	pub fn array(kind: Kind, items: Vec<Value>) -> Self {
		Self::Array(Array { kind, items })
	}
}

impl fmt::Display for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Empty | Self::Null => Ok(()),
			Self::Bool(v) => write!(f, "{v}"),
			Self::I8(v) => write!(f, "{v}"),
			Self::U8(v) => write!(f, "{v}"),
			Self::I16(v) => write!(f, "{v}"),
			Self::U16(v) => write!(f, "{v}"),
			Self::I32(v) => write!(f, "{v}"),
			Self::U32(v) => write!(f, "{v}"),
			Self::I64(v) => write!(f, "{v}"),
			Self::U64(v) => write!(f, "{v}"),
			Self::F32(v) => write!(f, "{v}"),
			Self::F64(v) => write!(f, "{v}"),
			Self::Currency(v) => write!(f, "{v}"),
			Self::Decimal(v) => write!(f, "{v}"),
			Self::Error(v) => write!(f, "0x{v:08x}"),
			Self::Char(v) => write!(f, "'{v}'"),
			Self::String(v) => write!(f, "'{v}'"),
			Self::DateTime(v) => write!(f, "{}", v.to_rfc3339()),
			Self::FileTime(v) => write!(f, "{}", v.0),
			Self::Guid(v) => write!(f, "{}", v.braced()),
			Self::Blob(v) => write!(f, "bytes[{}]", v.len()),
			Self::Clip(v) => write!(f, "{v}"),
			Self::Array(Array { items, .. }) | Self::List(items) => {
				for (idx, item) in items.iter().enumerate() {
					if idx > 0 {
						f.write_str(", ")?;
					}
					write!(f, "{item}")?;
				}
				Ok(())
			}
			Self::Object(v) => write!(f, "object#{}", v.0),
		}
	}
}

/// Sequence whose element kind is declared up front.
#[derive(Debug, Clone, PartialEq)]
pub struct Array {
	/// Declared element kind.
	pub kind: Kind,
	/// Elements, all expected to match `kind` unless it is [`Kind::Any`].
	pub items: Vec<Value>,
}

/// Currency amount stored as a signed integer scaled by 10 000.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Currency(pub i64);

impl Currency {
	/// Scale factor between the stored integer and the amount.
	pub const SCALE: i64 = 10_000;
}

impl fmt::Display for Currency {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let sign = if self.0 < 0 { "-" } else { "" };
		let abs = self.0.unsigned_abs();
		let scale = Self::SCALE as u64;
		write!(f, "{sign}{}.{:04}", abs / scale, abs % scale)
	}
}

/// 96-bit integer with a power-of-ten scale and a sign, in platform field order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
	/// Power of ten dividing the integer, 0..=28.
	pub scale: u8,
	/// Sign flag.
	pub negative: bool,
	/// High 32 bits of the 96-bit magnitude.
	pub hi: u32,
	/// Low 64 bits of the 96-bit magnitude.
	pub lo: u64,
}

impl Decimal {
	/// Sign byte value marking a negative decimal.
	pub const SIGN_NEGATIVE: u8 = 0x80;

	/// Build from a 128-bit magnitude truncated to 96 bits.
	pub fn new(magnitude: u128, scale: u8, negative: bool) -> Self {
		Self {
			scale,
			negative,
			hi: ((magnitude >> 64) & 0xffff_ffff) as u32,
			lo: magnitude as u64,
		}
	}

	/// 96-bit magnitude.
	pub fn magnitude(self) -> u128 {
		(u128::from(self.hi) << 64) | u128::from(self.lo)
	}

	/// Encode as the 16-byte platform layout (reserved word first).
	pub fn to_bytes(self) -> [u8; 16] {
		let mut out = [0_u8; 16];
		out[2] = self.scale;
		out[3] = if self.negative { Self::SIGN_NEGATIVE } else { 0 };
		out[4..8].copy_from_slice(&self.hi.to_le_bytes());
		out[8..16].copy_from_slice(&self.lo.to_le_bytes());
		out
	}

	/// Decode the 16-byte platform layout, ignoring the reserved word.
	pub fn from_bytes(bytes: [u8; 16]) -> Self {
		let mut hi = [0_u8; 4];
		hi.copy_from_slice(&bytes[4..8]);
		let mut lo = [0_u8; 8];
		lo.copy_from_slice(&bytes[8..16]);
		Self {
			scale: bytes[2],
			negative: bytes[3] & Self::SIGN_NEGATIVE != 0,
			hi: u32::from_le_bytes(hi),
			lo: u64::from_le_bytes(lo),
		}
	}
}

impl fmt::Display for Decimal {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let digits = self.magnitude().to_string();
		let scale = usize::from(self.scale);
		let sign = if self.negative { "-" } else { "" };
		if scale == 0 {
			return write!(f, "{sign}{digits}");
		}
		let padded = format!("{digits:0>width$}", width = scale + 1);
		let (int, frac) = padded.split_at(padded.len() - scale);
		write!(f, "{sign}{int}.{frac}")
	}
}

/// Raw 100ns tick count since 1601-01-01 UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileTime(pub u64);

impl FileTime {
	/// Split into `(low, high)` 32-bit halves.
	pub fn halves(self) -> (u32, u32) {
		(self.0 as u32, (self.0 >> 32) as u32)
	}

	/// Join `(low, high)` 32-bit halves.
	pub fn from_halves(low: u32, high: u32) -> Self {
		Self((u64::from(high) << 32) | u64::from(low))
	}
}

/// Opaque handle to an external object (interface pointer) that cannot be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectRef(pub u64);

/// Decoded clipboard-format descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ClipData {
	/// Unknown or absent format.
	#[default]
	Empty,
	/// Format identified by a GUID.
	Fmtid(Uuid),
	/// Registered clipboard format name.
	Named(String),
	/// Windows clipboard format code with payload.
	Windows {
		/// Clipboard format code.
		format: i32,
		/// Payload bytes.
		data: Vec<u8>,
	},
	/// Macintosh clipboard format code with payload.
	Macintosh {
		/// Clipboard format code.
		format: i32,
		/// Payload bytes.
		data: Vec<u8>,
	},
}

impl fmt::Display for ClipData {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Empty => Ok(()),
			Self::Fmtid(id) => write!(f, "{}", id.braced()),
			Self::Named(name) => f.write_str(name),
			Self::Windows { format, .. } | Self::Macintosh { format, .. } => {
				if *format == 0 {
					return Ok(());
				}
				write!(f, "{format}")
			}
		}
	}
}
