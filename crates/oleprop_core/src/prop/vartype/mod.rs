use std::fmt;

use crate::prop::{PropError, Result};

/// Base tag of a variant record, without modifier bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum BaseType {
	/// No value.
	Empty = 0,
	/// Explicit SQL-style null.
	Null = 1,
	/// Signed 16-bit integer.
	I2 = 2,
	/// Signed 32-bit integer.
	I4 = 3,
	/// 32-bit float.
	R4 = 4,
	/// 64-bit float.
	R8 = 5,
	/// Currency, a signed 64-bit integer scaled by 10 000.
	Cy = 6,
	/// OLE Automation date (floating day count).
	Date = 7,
	/// Length-prefixed wide string.
	Bstr = 8,
	/// Automation interface pointer.
	Dispatch = 9,
	/// Status code.
	Error = 10,
	/// 16-bit boolean, all-ones for true.
	Bool = 11,
	/// Nested variant (only valid as a vector element).
	Variant = 12,
	/// Generic interface pointer.
	Unknown = 13,
	/// 96-bit scaled decimal.
	Decimal = 14,
	/// Signed 8-bit integer.
	I1 = 16,
	/// Unsigned 8-bit integer.
	Ui1 = 17,
	/// Unsigned 16-bit integer.
	Ui2 = 18,
	/// Unsigned 32-bit integer.
	Ui4 = 19,
	/// Signed 64-bit integer.
	I8 = 20,
	/// Unsigned 64-bit integer.
	Ui8 = 21,
	/// Machine signed integer (32-bit on the wire).
	Int = 22,
	/// Machine unsigned integer (32-bit on the wire).
	Uint = 23,
	/// C-style void.
	Void = 24,
	/// Result code.
	Hresult = 25,
	/// Pointer type.
	Ptr = 26,
	/// Safe array.
	SafeArray = 27,
	/// C-style array.
	CArray = 28,
	/// User-defined type.
	UserDefined = 29,
	/// Null-terminated narrow string.
	Lpstr = 30,
	/// Null-terminated wide string.
	Lpwstr = 31,
	/// User-defined record.
	Record = 36,
	/// Signed machine pointer-sized integer.
	IntPtr = 37,
	/// Unsigned machine pointer-sized integer.
	UintPtr = 38,
	/// 100ns ticks since 1601-01-01 UTC.
	FileTime = 64,
	/// Length-prefixed byte run.
	Blob = 65,
	/// Stream reference.
	Stream = 66,
	/// Storage reference.
	Storage = 67,
	/// Stream containing an object.
	StreamedObject = 68,
	/// Storage containing an object.
	StoredObject = 69,
	/// Blob containing an object.
	BlobObject = 70,
	/// Clipboard-format descriptor.
	Cf = 71,
	/// GUID.
	Clsid = 72,
	/// Versioned stream reference.
	VersionedStream = 73,
}

impl BaseType {
	/// Map a raw base tag to its enumerated form.
	pub fn from_u16(raw: u16) -> Option<Self> {
		Some(match raw {
			0 => Self::Empty,
			1 => Self::Null,
			2 => Self::I2,
			3 => Self::I4,
			4 => Self::R4,
			5 => Self::R8,
			6 => Self::Cy,
			7 => Self::Date,
			8 => Self::Bstr,
			9 => Self::Dispatch,
			10 => Self::Error,
			11 => Self::Bool,
			12 => Self::Variant,
			13 => Self::Unknown,
			14 => Self::Decimal,
			16 => Self::I1,
			17 => Self::Ui1,
			18 => Self::Ui2,
			19 => Self::Ui4,
			20 => Self::I8,
			21 => Self::Ui8,
			22 => Self::Int,
			23 => Self::Uint,
			24 => Self::Void,
			25 => Self::Hresult,
			26 => Self::Ptr,
			27 => Self::SafeArray,
			28 => Self::CArray,
			29 => Self::UserDefined,
			30 => Self::Lpstr,
			31 => Self::Lpwstr,
			36 => Self::Record,
			37 => Self::IntPtr,
			38 => Self::UintPtr,
			64 => Self::FileTime,
			65 => Self::Blob,
			66 => Self::Stream,
			67 => Self::Storage,
			68 => Self::StreamedObject,
			69 => Self::StoredObject,
			70 => Self::BlobObject,
			71 => Self::Cf,
			72 => Self::Clsid,
			73 => Self::VersionedStream,
			_ => return None,
		})
	}

	/// Raw numeric tag.
	pub fn as_u16(self) -> u16 {
		self as u16
	}

	/// Stable `VT_*` label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Empty => "VT_EMPTY",
			Self::Null => "VT_NULL",
			Self::I2 => "VT_I2",
			Self::I4 => "VT_I4",
			Self::R4 => "VT_R4",
			Self::R8 => "VT_R8",
			Self::Cy => "VT_CY",
			Self::Date => "VT_DATE",
			Self::Bstr => "VT_BSTR",
			Self::Dispatch => "VT_DISPATCH",
			Self::Error => "VT_ERROR",
			Self::Bool => "VT_BOOL",
			Self::Variant => "VT_VARIANT",
			Self::Unknown => "VT_UNKNOWN",
			Self::Decimal => "VT_DECIMAL",
			Self::I1 => "VT_I1",
			Self::Ui1 => "VT_UI1",
			Self::Ui2 => "VT_UI2",
			Self::Ui4 => "VT_UI4",
			Self::I8 => "VT_I8",
			Self::Ui8 => "VT_UI8",
			Self::Int => "VT_INT",
			Self::Uint => "VT_UINT",
			Self::Void => "VT_VOID",
			Self::Hresult => "VT_HRESULT",
			Self::Ptr => "VT_PTR",
			Self::SafeArray => "VT_SAFEARRAY",
			Self::CArray => "VT_CARRAY",
			Self::UserDefined => "VT_USERDEFINED",
			Self::Lpstr => "VT_LPSTR",
			Self::Lpwstr => "VT_LPWSTR",
			Self::Record => "VT_RECORD",
			Self::IntPtr => "VT_INT_PTR",
			Self::UintPtr => "VT_UINT_PTR",
			Self::FileTime => "VT_FILETIME",
			Self::Blob => "VT_BLOB",
			Self::Stream => "VT_STREAM",
			Self::Storage => "VT_STORAGE",
			Self::StreamedObject => "VT_STREAMED_OBJECT",
			Self::StoredObject => "VT_STORED_OBJECT",
			Self::BlobObject => "VT_BLOB_OBJECT",
			Self::Cf => "VT_CF",
			Self::Clsid => "VT_CLSID",
			Self::VersionedStream => "VT_VERSIONED_STREAM",
		}
	}

	/// Inverse of [`classify_kind`](crate::prop::classify_kind): the native kind extracted for this tag.
	pub fn widen(self) -> Result<Kind> {
		Ok(match self {
			Self::I1 => Kind::I8,
			Self::Ui1 => Kind::U8,
			Self::I2 => Kind::I16,
			Self::Ui2 => Kind::U16,
			Self::I4 | Self::Int => Kind::I32,
			Self::Ui4 | Self::Uint => Kind::U32,
			Self::I8 => Kind::I64,
			Self::Ui8 => Kind::U64,
			Self::R4 => Kind::F32,
			Self::R8 => Kind::F64,
			Self::Bool => Kind::Bool,
			Self::Cy => Kind::Currency,
			Self::Decimal => Kind::Decimal,
			Self::Error | Self::Hresult => Kind::Error,
			Self::Date | Self::FileTime => Kind::DateTime,
			Self::Bstr | Self::Lpstr | Self::Lpwstr => Kind::String,
			Self::Clsid => Kind::Guid,
			Self::Blob => Kind::Blob,
			Self::Cf => Kind::Clip,
			Self::Variant => Kind::Any,
			Self::Empty
			| Self::Null
			| Self::Dispatch
			| Self::Unknown
			| Self::Void
			| Self::Ptr
			| Self::SafeArray
			| Self::CArray
			| Self::UserDefined
			| Self::Record
			| Self::IntPtr
			| Self::UintPtr
			| Self::Stream
			| Self::Storage
			| Self::StreamedObject
			| Self::StoredObject
			| Self::BlobObject
			| Self::VersionedStream => return Err(PropError::UnsupportedType { vt: self.as_u16() }),
		})
	}

	/// Byte width of one by-value vector element, or `None` for indirect elements.
	pub fn packed_size(self) -> Option<usize> {
		match self {
			Self::I1 | Self::Ui1 => Some(1),
			Self::I2 | Self::Ui2 | Self::Bool => Some(2),
			Self::I4 | Self::Ui4 | Self::Int | Self::Uint | Self::R4 | Self::Error | Self::Hresult => Some(4),
			Self::I8 | Self::Ui8 | Self::R8 | Self::Cy | Self::Date | Self::FileTime => Some(8),
			Self::Clsid | Self::Decimal => Some(16),
			_ => None,
		}
	}
}

impl fmt::Display for BaseType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Variant tag: one base tag plus the orthogonal vector modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VarType {
	/// Base tag.
	pub base: BaseType,
	/// Whether the record is a homogeneous vector of `base`.
	pub vector: bool,
}

impl VarType {
	/// Vector modifier bit.
	pub const VECTOR: u16 = 0x1000;
	/// Safe-array modifier bit (never produced).
	pub const ARRAY: u16 = 0x2000;
	/// By-reference modifier bit (never produced).
	pub const BYREF: u16 = 0x4000;
	/// Mask of the base tag bits.
	pub const TYPEMASK: u16 = 0x0fff;

	/// Scalar tag.
	pub const fn scalar(base: BaseType) -> Self {
		Self { base, vector: false }
	}

	/// Vector-of-`base` tag.
	pub const fn vector_of(base: BaseType) -> Self {
		Self { base, vector: true }
	}

	/// Parse a raw tag, rejecting unknown bases and any modifier except `VECTOR`.
	pub fn from_raw(raw: u16) -> Result<Self> {
		if raw & !(Self::TYPEMASK | Self::VECTOR) != 0 {
			return Err(PropError::UnsupportedType { vt: raw });
		}
		let base = BaseType::from_u16(raw & Self::TYPEMASK).ok_or(PropError::UnsupportedType { vt: raw })?;
		Ok(Self {
			base,
			vector: raw & Self::VECTOR != 0,
		})
	}

	/// Raw numeric tag including the vector bit.
	pub fn to_raw(self) -> u16 {
		let base = self.base.as_u16();
		if self.vector { base | Self::VECTOR } else { base }
	}
}

impl From<BaseType> for VarType {
	fn from(base: BaseType) -> Self {
		Self::scalar(base)
	}
}

impl fmt::Display for VarType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.vector {
			write!(f, "VT_VECTOR | {}", self.base)
		} else {
			write!(f, "{}", self.base)
		}
	}
}

/// Native element kind of a value, used for declared sequence types and the widen mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
	/// `bool`.
	Bool,
	/// `i8`.
	I8,
	/// `u8`.
	U8,
	/// `i16`.
	I16,
	/// `u16`.
	U16,
	/// `i32`.
	I32,
	/// `u32`.
	U32,
	/// `i64`.
	I64,
	/// `u64`.
	U64,
	/// `f32`.
	F32,
	/// `f64`.
	F64,
	/// Scaled currency.
	Currency,
	/// 96-bit decimal.
	Decimal,
	/// Status code.
	Error,
	/// Single character.
	Char,
	/// Text.
	String,
	/// Calendar timestamp.
	DateTime,
	/// Raw 100ns tick count.
	FileTime,
	/// GUID.
	Guid,
	/// Byte run.
	Blob,
	/// Clipboard descriptor.
	Clip,
	/// Any dynamic value.
	Any,
}

impl Kind {
	/// Stable lowercase label.
	pub fn as_str(self) -> &'static str {
		match self {
			Self::Bool => "bool",
			Self::I8 => "i8",
			Self::U8 => "u8",
			Self::I16 => "i16",
			Self::U16 => "u16",
			Self::I32 => "i32",
			Self::U32 => "u32",
			Self::I64 => "i64",
			Self::U64 => "u64",
			Self::F32 => "f32",
			Self::F64 => "f64",
			Self::Currency => "currency",
			Self::Decimal => "decimal",
			Self::Error => "error",
			Self::Char => "char",
			Self::String => "string",
			Self::DateTime => "datetime",
			Self::FileTime => "filetime",
			Self::Guid => "guid",
			Self::Blob => "blob",
			Self::Clip => "clip",
			Self::Any => "any",
		}
	}
}

impl fmt::Display for Kind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
