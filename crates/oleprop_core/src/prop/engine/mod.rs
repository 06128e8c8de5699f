use std::fmt;

use crate::prop::bytes::{Cursor, Writer};
use crate::prop::variant::{Elements, Payload, VectorPayload, inline};
use crate::prop::{BaseType, ClipRecord, Decimal, OwnedBuffer, PropError, Result, VarType, Variant, text};

/// Platform status code reported by an [`Engine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(pub i32);

impl Status {
	/// Success.
	pub const OK: Self = Self(0);
	/// `E_INVALIDARG`: tag or payload has no wire encoding.
	pub const INVALID_ARG: Self = Self(0x8007_0057_u32 as i32);
	/// `HRESULT_FROM_WIN32(ERROR_INSUFFICIENT_BUFFER)`: input ended early.
	pub const INSUFFICIENT_BUFFER: Self = Self(0x8007_007a_u32 as i32);
}

impl fmt::Display for Status {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "0x{:08x}", self.0)
	}
}

impl From<Status> for PropError {
	fn from(status: Status) -> Self {
		Self::SerializationFailed { code: status.0 }
	}
}

/// Byte-level serializer with the two platform primitives.
pub trait Engine {
	/// Flatten a live record into bytes.
	fn serialize(&self, variant: &Variant) -> std::result::Result<Vec<u8>, Status>;
	/// Rebuild a fully owned record from bytes.
	fn deserialize(&self, bytes: &[u8]) -> std::result::Result<Variant, Status>;
}

/// Runtime knobs for [`TypedValueEngine`].
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
	/// Deepest allowed nesting of `VT_VECTOR | VT_VARIANT` records.
	pub max_depth: usize,
}

impl Default for EngineOptions {
	fn default() -> Self {
		Self { max_depth: 8 }
	}
}

/// Built-in engine writing the property-set `TypedPropertyValue` layout.
///
/// Every value starts with a `u16` tag and two zero bytes; the value that
/// follows is padded to a 4-byte boundary. Strings are length-prefixed,
/// blobs and clip data are sized byte runs, and vectors are a `u32` count
/// followed by their elements.
#[derive(Debug, Clone, Copy, Default)]
pub struct TypedValueEngine {
	options: EngineOptions,
}

type Wire<T> = std::result::Result<T, Status>;

impl TypedValueEngine {
	/// Engine with explicit options.
	pub fn new(options: EngineOptions) -> Self {
		Self { options }
	}

	/// Active options.
	pub fn options(&self) -> EngineOptions {
		self.options
	}

	fn write_value(&self, out: &mut Writer, variant: &Variant, depth: usize) -> Wire<()> {
		if depth > self.options.max_depth {
			return Err(Status::INVALID_ARG);
		}
		let tag = variant.var_type();
		let payload = variant.payload().map_err(|_| Status::INVALID_ARG)?;
		out.put_u16_le(tag.to_raw());
		out.put_u16_le(0);
		match payload {
			Payload::Vector(vector) => self.write_vector(out, tag.base, vector, depth),
			payload => write_scalar(out, tag.base, payload),
		}
	}

	fn write_vector(&self, out: &mut Writer, base: BaseType, vector: &VectorPayload, depth: usize) -> Wire<()> {
		out.put_u32_le(vector.count);
		match &vector.elements {
			Elements::Packed(buffer) => {
				let width = vector_width(base).ok_or(Status::INVALID_ARG)?;
				let bytes = live(buffer)?;
				let len = width * vector.count as usize;
				out.put_bytes(bytes.get(..len).ok_or(Status::INVALID_ARG)?);
				out.pad4();
			}
			Elements::Indirect(items) => {
				for item in items {
					write_string(out, base, live(item)?)?;
				}
			}
			Elements::Clips(items) => {
				for item in items {
					write_clip(out, item)?;
				}
			}
			Elements::Variants(items) => {
				for item in items {
					self.write_value(out, item, depth + 1)?;
				}
			}
		}
		Ok(())
	}

	fn read_value(&self, cur: &mut Cursor<'_>, depth: usize) -> Wire<Variant> {
		if depth > self.options.max_depth {
			return Err(Status::INVALID_ARG);
		}
		let raw = cur.read_u16_le().map_err(short)?;
		let _padding = cur.read_u16_le().map_err(short)?;
		let tag = VarType::from_raw(raw).map_err(|_| Status::INVALID_ARG)?;
		let payload = if tag.vector {
			self.read_vector(cur, tag.base, depth)?
		} else {
			read_scalar(cur, tag.base)?
		};
		Ok(Variant::from_parts(tag, payload))
	}

	fn read_vector(&self, cur: &mut Cursor<'_>, base: BaseType, depth: usize) -> Wire<Payload> {
		let count = cur.read_u32_le().map_err(short)?;
		let n = count as usize;
		let elements = if let Some(width) = vector_width(base) {
			let bytes = cur.read_exact(checked_len(cur, n, width)?).map_err(short)?;
			cur.align4().map_err(short)?;
			Elements::Packed(OwnedBuffer::from_vec(bytes.to_vec()))
		} else {
			match base {
				BaseType::Lpstr | BaseType::Lpwstr | BaseType::Bstr => {
					checked_len(cur, n, 4)?;
					let items = (0..n).map(|_| read_string(cur, base).map(OwnedBuffer::from_vec)).collect::<Wire<_>>()?;
					Elements::Indirect(items)
				}
				BaseType::Cf => {
					checked_len(cur, n, 8)?;
					Elements::Clips((0..n).map(|_| read_clip(cur)).collect::<Wire<_>>()?)
				}
				BaseType::Variant => {
					checked_len(cur, n, 4)?;
					Elements::Variants((0..n).map(|_| self.read_value(cur, depth + 1)).collect::<Wire<_>>()?)
				}
				_ => return Err(Status::INVALID_ARG),
			}
		};
		Ok(Payload::Vector(VectorPayload { count, elements }))
	}
}

impl Engine for TypedValueEngine {
	fn serialize(&self, variant: &Variant) -> Wire<Vec<u8>> {
		let mut out = Writer::new();
		self.write_value(&mut out, variant, 0)?;
		Ok(out.into_bytes())
	}

	fn deserialize(&self, bytes: &[u8]) -> Wire<Variant> {
		let mut cur = Cursor::new(bytes);
		self.read_value(&mut cur, 0)
	}
}

impl Variant {
	/// Serialize with the built-in engine.
	pub fn serialize(&self) -> Result<Vec<u8>> {
		self.serialize_with(&TypedValueEngine::default())
	}

	/// Serialize with an explicit engine.
	pub fn serialize_with(&self, engine: &impl Engine) -> Result<Vec<u8>> {
		if self.is_released() {
			return Err(PropError::UseAfterRelease);
		}
		engine.serialize(self).map_err(|status| {
			log::debug!("serializing {} failed with status {status}", self.var_type());
			status.into()
		})
	}

	/// Rebuild a record with the built-in engine.
	pub fn deserialize(bytes: &[u8]) -> Result<Self> {
		Self::deserialize_with(&TypedValueEngine::default(), bytes)
	}

	/// Rebuild a record with an explicit engine. No partial record is ever returned.
	pub fn deserialize_with(engine: &impl Engine, bytes: &[u8]) -> Result<Self> {
		engine.deserialize(bytes).map_err(|status| {
			log::debug!("deserializing {} bytes failed with status {status}", bytes.len());
			status.into()
		})
	}
}

fn short(_: PropError) -> Status {
	Status::INSUFFICIENT_BUFFER
}

fn live(buffer: &OwnedBuffer) -> Wire<&[u8]> {
	buffer.as_slice().map_err(|_| Status::INVALID_ARG)
}

/// Byte length of `count` elements of at least `width` bytes, checked against the remaining input.
fn checked_len(cur: &Cursor<'_>, count: usize, width: usize) -> Wire<usize> {
	let len = count.checked_mul(width).ok_or(Status::INSUFFICIENT_BUFFER)?;
	if len > cur.remaining() {
		return Err(Status::INSUFFICIENT_BUFFER);
	}
	Ok(len)
}

/// Wire width of a by-value scalar.
fn scalar_width(base: BaseType) -> Option<usize> {
	match base {
		BaseType::Decimal | BaseType::Clsid => None,
		other => other.packed_size(),
	}
}

/// Wire width of a by-value vector element. Vectors of `DECIMAL`, `INT`, `UINT` and `HRESULT` have no encoding.
fn vector_width(base: BaseType) -> Option<usize> {
	match base {
		BaseType::Decimal | BaseType::Int | BaseType::Uint | BaseType::Hresult => None,
		other => other.packed_size(),
	}
}

fn write_scalar(out: &mut Writer, base: BaseType, payload: &Payload) -> Wire<()> {
	match (base, payload) {
		(BaseType::Empty | BaseType::Null, Payload::None) => {}
		(BaseType::Decimal, Payload::Decimal(decimal)) => out.put_bytes(&decimal.to_bytes()),
		(_, Payload::Inline(raw)) => {
			let width = scalar_width(base).ok_or(Status::INVALID_ARG)?;
			out.put_bytes(&raw[..width]);
			out.pad4();
		}
		(BaseType::Lpstr | BaseType::Lpwstr | BaseType::Bstr, Payload::Owned(buffer)) => write_string(out, base, live(buffer)?)?,
		(BaseType::Clsid, Payload::Owned(buffer)) => {
			let bytes = live(buffer)?;
			if bytes.len() != 16 {
				return Err(Status::INVALID_ARG);
			}
			out.put_bytes(bytes);
		}
		(BaseType::Blob, Payload::Owned(buffer)) => {
			let bytes = live(buffer)?;
			out.put_u32_le(u32::try_from(bytes.len()).map_err(|_| Status::INVALID_ARG)?);
			out.put_bytes(bytes);
			out.pad4();
		}
		(BaseType::Cf, Payload::Clip(record)) => write_clip(out, record)?,
		_ => return Err(Status::INVALID_ARG),
	}
	Ok(())
}

fn read_scalar(cur: &mut Cursor<'_>, base: BaseType) -> Wire<Payload> {
	Ok(match base {
		BaseType::Empty | BaseType::Null => Payload::None,
		BaseType::Decimal => Payload::Decimal(Decimal::from_bytes(cur.read_array().map_err(short)?)),
		BaseType::Lpstr | BaseType::Lpwstr | BaseType::Bstr => Payload::Owned(OwnedBuffer::from_vec(read_string(cur, base)?)),
		BaseType::Clsid => Payload::Owned(OwnedBuffer::from_vec(cur.read_exact(16).map_err(short)?.to_vec())),
		BaseType::Blob => {
			let len = cur.read_u32_le().map_err(short)? as usize;
			let bytes = cur.read_exact(len).map_err(short)?.to_vec();
			cur.align4().map_err(short)?;
			Payload::Owned(OwnedBuffer::from_vec(bytes))
		}
		BaseType::Cf => Payload::Clip(read_clip(cur)?),
		other => {
			let width = scalar_width(other).ok_or(Status::INVALID_ARG)?;
			let payload = inline(cur.read_exact(width).map_err(short)?);
			cur.align4().map_err(short)?;
			payload
		}
	})
}

/// Write an in-memory string buffer as a `CodePageString` (narrow and BSTR) or `UnicodeString` (wide).
fn write_string(out: &mut Writer, base: BaseType, bytes: &[u8]) -> Wire<()> {
	let (prefix, body) = match base {
		BaseType::Lpwstr => (bytes.len() / 2, bytes),
		BaseType::Lpstr => (bytes.len(), bytes),
		BaseType::Bstr => {
			let wide = bytes.get(4..).ok_or(Status::INVALID_ARG)?;
			(wide.len(), wide)
		}
		_ => return Err(Status::INVALID_ARG),
	};
	out.put_u32_le(u32::try_from(prefix).map_err(|_| Status::INVALID_ARG)?);
	out.put_bytes(body);
	out.pad4();
	Ok(())
}

/// Read a wire string back into its in-memory encoding.
fn read_string(cur: &mut Cursor<'_>, base: BaseType) -> Wire<Vec<u8>> {
	let prefix = cur.read_u32_le().map_err(short)? as usize;
	let len = match base {
		BaseType::Lpwstr => prefix.checked_mul(2).ok_or(Status::INSUFFICIENT_BUFFER)?,
		_ => prefix,
	};
	let body = cur.read_exact(len).map_err(short)?;
	cur.align4().map_err(short)?;
	Ok(match base {
		BaseType::Bstr => text::encode_bstr(&text::decode_wide_counted(body)),
		_ => body.to_vec(),
	})
}

fn write_clip(out: &mut Writer, record: &ClipRecord) -> Wire<()> {
	let data = record.data().map_err(|_| Status::INVALID_ARG)?.unwrap_or_default();
	let size = u32::try_from(data.len() + 4).map_err(|_| Status::INVALID_ARG)?;
	out.put_u32_le(size);
	out.put_i32_le(record.format());
	out.put_bytes(data);
	out.pad4();
	Ok(())
}

fn read_clip(cur: &mut Cursor<'_>) -> Wire<ClipRecord> {
	let size = cur.read_u32_le().map_err(short)? as usize;
	let len = size.checked_sub(4).ok_or(Status::INVALID_ARG)?;
	let format = cur.read_i32_le().map_err(short)?;
	let data = cur.read_exact(len).map_err(short)?.to_vec();
	cur.align4().map_err(short)?;
	Ok(ClipRecord::new(format, (!data.is_empty()).then_some(data)))
}

#[cfg(test)]
mod tests;
