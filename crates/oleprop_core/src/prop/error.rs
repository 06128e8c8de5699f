use thiserror::Error;
use uuid::Uuid;

use crate::prop::Kind;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, PropError>;

/// Errors produced while classifying, building, reading, and persisting property values.
#[derive(Debug, Error)]
pub enum PropError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// Variant tag has no defined mapping.
	#[error("unsupported variant type 0x{vt:04x}")]
	UnsupportedType {
		/// Raw tag value including modifier bits.
		vt: u16,
	},
	/// Runtime value has no classification rule.
	#[error("unsupported value of kind {kind}")]
	UnsupportedValue {
		/// Logical kind of the rejected value.
		kind: &'static str,
	},
	/// Vector item does not match the vector's element kind.
	#[error("vector item {index} has kind {found}, expected {expected}")]
	TypeMismatch {
		/// Position of the offending item.
		index: usize,
		/// Element kind fixed for the vector.
		expected: Kind,
		/// Logical kind of the offending item.
		found: &'static str,
	},
	/// Byte-level engine rejected the input or output.
	#[error("serialization failed with status 0x{code:08x}")]
	SerializationFailed {
		/// Platform status code reported by the engine.
		code: i32,
	},
	/// Record was read or serialized after being released.
	#[error("variant used after release")]
	UseAfterRelease,
	/// Floating day count is outside the representable calendar range.
	#[error("ole automation date out of range: {value}")]
	InvalidDate {
		/// Offending day count.
		value: f64,
	},
	/// 100ns tick count is outside the representable calendar range.
	#[error("file time out of range: {ticks}")]
	InvalidFileTime {
		/// Offending tick count.
		ticks: u64,
	},
	/// Not enough bytes remained for a requested read.
	#[error("unexpected eof at offset {at}, need {need} bytes, remaining {rem}")]
	UnexpectedEof {
		/// Byte offset where the read was attempted.
		at: usize,
		/// Requested bytes.
		need: usize,
		/// Bytes still available.
		rem: usize,
	},
	/// Serialized property storage carried an unknown version marker.
	#[error("unsupported property storage version 0x{version:08x}")]
	InvalidStoreVersion {
		/// Parsed version marker.
		version: u32,
	},
	/// Declared structure size disagrees with its parsed contents.
	#[error("declared size {declared} does not match parsed size {actual}")]
	StoreSizeMismatch {
		/// Size field read from the image.
		declared: usize,
		/// Bytes actually consumed.
		actual: usize,
	},
	/// Command-line literal could not be parsed.
	#[error("invalid {kind} literal: {value}")]
	InvalidLiteral {
		/// Expected literal kind.
		kind: &'static str,
		/// Offending input.
		value: String,
	},
	/// Property key kind is not allowed in the target property set.
	#[error("property key kind not allowed in set {format_id}")]
	KeyKindMismatch {
		/// Format id of the target set.
		format_id: Uuid,
	},
}
