use uuid::Uuid;

use crate::prop::time::{from_file_time, from_ole_date};
use crate::prop::variant::{Elements, Payload, VectorPayload};
use crate::prop::{Array, BaseType, Currency, Decimal, FileTime, PropError, Result, Value, VarType, Variant, text};

/// Read a record back into a dynamic value, copying every allocation.
///
/// `EMPTY` and `NULL` read back as [`Value::Empty`] and [`Value::Null`];
/// vectors read back as [`Value::Array`] with the widened element kind.
pub fn extract(variant: &Variant) -> Result<Value> {
	let tag = variant.var_type();
	match variant.payload()? {
		Payload::Vector(vector) => extract_vector(tag, vector),
		payload => extract_scalar(tag, payload),
	}
}

/// Like [`extract`], but moves a blob allocation into the value instead of copying it.
///
/// Strings are always transcoded into a fresh `String`, so only blobs move.
/// The record is left populated; callers release it afterwards.
pub fn extract_owned(variant: &mut Variant) -> Result<Value> {
	let tag = variant.var_type();
	if tag == VarType::scalar(BaseType::Blob)
		&& let Payload::Owned(buffer) = variant.payload_mut()?
	{
		return Ok(Value::Blob(buffer.take()?));
	}
	extract(variant)
}

fn extract_scalar(tag: VarType, payload: &Payload) -> Result<Value> {
	let base = tag.base;
	let unsupported = || PropError::UnsupportedType { vt: tag.to_raw() };
	match (base, payload) {
		(BaseType::Empty, _) => Ok(Value::Empty),
		(BaseType::Null, _) => Ok(Value::Null),
		(BaseType::Decimal, Payload::Decimal(decimal)) => Ok(Value::Decimal(*decimal)),
		(_, Payload::Inline(raw)) => {
			let width = base.packed_size().filter(|width| *width <= 8).ok_or_else(unsupported)?;
			read_packed(base, &raw[..width])
		}
		(BaseType::Lpwstr | BaseType::Lpstr | BaseType::Bstr, Payload::Owned(buffer)) => Ok(Value::String(text::decode(base, buffer.as_slice()?)?)),
		(BaseType::Clsid, Payload::Owned(buffer)) => read_packed(base, buffer.as_slice()?),
		(BaseType::Blob, Payload::Owned(buffer)) => Ok(Value::Blob(buffer.as_slice()?.to_vec())),
		(BaseType::Cf, Payload::Clip(record)) => Ok(Value::Clip(record.decode()?)),
		_ => Err(unsupported()),
	}
}

fn extract_vector(tag: VarType, vector: &VectorPayload) -> Result<Value> {
	let base = tag.base;
	let kind = base.widen()?;
	let count = vector.count as usize;
	let items = match &vector.elements {
		Elements::Packed(buffer) => {
			let width = base.packed_size().ok_or(PropError::UnsupportedType { vt: tag.to_raw() })?;
			let bytes = buffer.as_slice()?;
			if bytes.len() < count * width {
				return Err(PropError::UnexpectedEof {
					at: 0,
					need: count * width,
					rem: bytes.len(),
				});
			}
			bytes.chunks_exact(width).take(count).map(|slot| read_packed(base, slot)).collect::<Result<_>>()?
		}
		Elements::Indirect(items) => items
			.iter()
			.map(|item| Ok(Value::String(text::decode(base, item.as_slice()?)?)))
			.collect::<Result<_>>()?,
		Elements::Clips(items) => items.iter().map(|item| Ok(Value::Clip(item.decode()?))).collect::<Result<_>>()?,
		Elements::Variants(items) => items.iter().map(Variant::value).collect::<Result<_>>()?,
	};
	Ok(Value::Array(Array { kind, items }))
}

/// Decode one by-value slot; `slot` is exactly the tag's packed width.
fn read_packed(base: BaseType, slot: &[u8]) -> Result<Value> {
	let unsupported = || PropError::UnsupportedType { vt: base.as_u16() };
	Ok(match base {
		BaseType::I1 => Value::I8(i8::from_le_bytes(fixed(slot)?)),
		BaseType::Ui1 => Value::U8(u8::from_le_bytes(fixed(slot)?)),
		BaseType::I2 => Value::I16(i16::from_le_bytes(fixed(slot)?)),
		BaseType::Ui2 => Value::U16(u16::from_le_bytes(fixed(slot)?)),
		// Any non-zero slot reads as true.
		BaseType::Bool => Value::Bool(u16::from_le_bytes(fixed(slot)?) != 0),
		BaseType::I4 | BaseType::Int => Value::I32(i32::from_le_bytes(fixed(slot)?)),
		BaseType::Ui4 | BaseType::Uint => Value::U32(u32::from_le_bytes(fixed(slot)?)),
		BaseType::Error | BaseType::Hresult => Value::Error(i32::from_le_bytes(fixed(slot)?)),
		BaseType::I8 => Value::I64(i64::from_le_bytes(fixed(slot)?)),
		BaseType::Ui8 => Value::U64(u64::from_le_bytes(fixed(slot)?)),
		BaseType::R4 => Value::F32(f32::from_le_bytes(fixed(slot)?)),
		BaseType::R8 => Value::F64(f64::from_le_bytes(fixed(slot)?)),
		BaseType::Cy => Value::Currency(Currency(i64::from_le_bytes(fixed(slot)?))),
		BaseType::Date => Value::DateTime(from_ole_date(f64::from_le_bytes(fixed(slot)?))?),
		BaseType::FileTime => Value::DateTime(from_file_time(FileTime(u64::from_le_bytes(fixed(slot)?)))?),
		BaseType::Clsid => Value::Guid(Uuid::from_bytes_le(fixed(slot)?)),
		BaseType::Decimal => Value::Decimal(Decimal::from_bytes(fixed(slot)?)),
		_ => return Err(unsupported()),
	})
}

fn fixed<const N: usize>(slot: &[u8]) -> Result<[u8; N]> {
	slot.get(..N).and_then(|head| <[u8; N]>::try_from(head).ok()).ok_or(PropError::UnexpectedEof {
		at: 0,
		need: N,
		rem: slot.len(),
	})
}

#[cfg(test)]
mod tests;
