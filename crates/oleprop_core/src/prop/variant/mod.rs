use std::fmt;

use chrono::{DateTime, Utc};

use crate::prop::classify::check_item;
use crate::prop::time::{to_ole_date, to_positive_file_time};
use crate::prop::{BaseType, ClipRecord, Kind, OwnedBuffer, PropError, Result, Value, VarType, classify, list_element_kind, text};

/// Status code carried by the [`Variant::missing`] sentinel.
pub const DISP_E_PARAMNOTFOUND: i32 = 0x8002_0004_u32 as i32;

/// Tagged-union property record.
///
/// Owns every out-of-line allocation it carries until the record is
/// disposed or the allocation is moved out by [`Variant::take_value`].
/// Disposal is idempotent and also runs on drop.
#[derive(Debug)]
pub struct Variant {
	tag: VarType,
	payload: Payload,
	released: bool,
}

/// Payload shapes; each tag maps to exactly one of them.
#[derive(Debug)]
pub(crate) enum Payload {
	None,
	/// Little-endian scalar of at most 8 bytes.
	Inline([u8; 8]),
	Decimal(crate::prop::Decimal),
	/// Strings, GUIDs and blobs.
	Owned(OwnedBuffer),
	Clip(ClipRecord),
	Vector(VectorPayload),
}

#[derive(Debug)]
pub(crate) struct VectorPayload {
	/// Element count, never a byte count.
	pub(crate) count: u32,
	pub(crate) elements: Elements,
}

#[derive(Debug)]
pub(crate) enum Elements {
	/// `count * packed_size` bytes of by-value elements.
	Packed(OwnedBuffer),
	/// One string allocation per element.
	Indirect(Vec<OwnedBuffer>),
	Clips(Vec<ClipRecord>),
	Variants(Vec<Variant>),
}

impl Default for Variant {
	fn default() -> Self {
		Self::empty()
	}
}

impl Variant {
	/// Classify and build a record from a dynamic value.
	///
	/// [`Value::Object`] references degrade to an empty record instead of failing.
	pub fn new(value: &Value) -> Result<Self> {
		let (tag, payload) = build(value)?;
		Ok(Self::from_parts(tag, payload))
	}

	/// Rebuild this record from `value`, releasing the previous payload first.
	///
	/// On failure the record keeps its previous contents.
	pub fn populate(&mut self, value: &Value) -> Result<()> {
		let next = Self::new(value)?;
		if !self.released && !matches!(self.payload, Payload::None) {
			log::trace!("repopulating {} record, releasing previous payload", self.tag);
		}
		self.dispose();
		*self = next;
		Ok(())
	}

	/// `VT_EMPTY` record.
	pub fn empty() -> Self {
		Self::from_parts(VarType::scalar(BaseType::Empty), Payload::None)
	}

	/// `VT_NULL` record.
	pub fn null() -> Self {
		Self::from_parts(VarType::scalar(BaseType::Null), Payload::None)
	}

	/// Sentinel for an omitted optional parameter: `VT_HRESULT` carrying [`DISP_E_PARAMNOTFOUND`].
	pub fn missing() -> Self {
		Self::from_parts(VarType::scalar(BaseType::Hresult), inline(&DISP_E_PARAMNOTFOUND.to_le_bytes()))
	}

	/// `VT_LPWSTR` record.
	pub fn lpwstr(text: &str) -> Self {
		Self::from_parts(VarType::scalar(BaseType::Lpwstr), Payload::Owned(OwnedBuffer::from_vec(text::encode_wide(text))))
	}

	/// `VT_LPSTR` record, stored as UTF-8.
	pub fn lpstr(text: &str) -> Self {
		Self::from_parts(VarType::scalar(BaseType::Lpstr), Payload::Owned(OwnedBuffer::from_vec(text::encode_narrow(text))))
	}

	/// `VT_BSTR` record.
	pub fn bstr(text: &str) -> Self {
		Self::from_parts(VarType::scalar(BaseType::Bstr), Payload::Owned(OwnedBuffer::from_vec(text::encode_bstr(text))))
	}

	/// `VT_DATE` record holding an OLE Automation day count.
	pub fn ole_date(dt: DateTime<Utc>) -> Result<Self> {
		let days = to_ole_date(dt)?;
		Ok(Self::from_parts(VarType::scalar(BaseType::Date), inline(&days.to_le_bytes())))
	}

	/// `VT_CF` record taking ownership of a raw clip record.
	pub fn from_clip_record(record: ClipRecord) -> Self {
		Self::from_parts(VarType::scalar(BaseType::Cf), Payload::Clip(record))
	}

	pub(crate) fn from_parts(tag: VarType, payload: Payload) -> Self {
		Self {
			tag,
			payload,
			released: false,
		}
	}

	/// Current tag.
	pub fn var_type(&self) -> VarType {
		self.tag
	}

	/// Whether the record was disposed.
	pub fn is_released(&self) -> bool {
		self.released
	}

	/// Vector element count, or byte length for `VT_BLOB`.
	pub fn count(&self) -> Option<u32> {
		match &self.payload {
			Payload::Vector(vector) => Some(vector.count),
			Payload::Owned(buffer) if self.tag == VarType::scalar(BaseType::Blob) => u32::try_from(buffer.len()).ok(),
			_ => None,
		}
	}

	/// Raw by-value vector storage, for direct inspection of element encodings.
	pub fn packed_elements(&self) -> Result<Option<&[u8]>> {
		match self.payload()? {
			Payload::Vector(VectorPayload {
				elements: Elements::Packed(buffer),
				..
			}) => Ok(Some(buffer.as_slice()?)),
			_ => Ok(None),
		}
	}

	/// Raw inline scalar slot, `None` for non-inline payloads.
	pub fn inline_bytes(&self) -> Result<Option<[u8; 8]>> {
		match self.payload()? {
			Payload::Inline(raw) => Ok(Some(*raw)),
			_ => Ok(None),
		}
	}

	pub(crate) fn payload(&self) -> Result<&Payload> {
		if self.released {
			return Err(PropError::UseAfterRelease);
		}
		Ok(&self.payload)
	}

	pub(crate) fn payload_mut(&mut self) -> Result<&mut Payload> {
		if self.released {
			return Err(PropError::UseAfterRelease);
		}
		Ok(&mut self.payload)
	}

	/// Extract a copy of the value; the record stays populated.
	pub fn value(&self) -> Result<Value> {
		crate::prop::extract::extract(self)
	}

	/// Extract the value, moving owned allocations into it, then release the record.
	pub fn take_value(&mut self) -> Result<Value> {
		let value = crate::prop::extract::extract_owned(self)?;
		self.dispose();
		Ok(value)
	}

	/// Deep copy into an independently owned record.
	pub fn duplicate(&self) -> Result<Self> {
		let payload = match self.payload()? {
			Payload::None => Payload::None,
			Payload::Inline(raw) => Payload::Inline(*raw),
			Payload::Decimal(value) => Payload::Decimal(*value),
			Payload::Owned(buffer) => Payload::Owned(buffer.duplicate()?),
			Payload::Clip(record) => Payload::Clip(record.duplicate()?),
			Payload::Vector(vector) => {
				let elements = match &vector.elements {
					Elements::Packed(buffer) => Elements::Packed(buffer.duplicate()?),
					Elements::Indirect(items) => Elements::Indirect(items.iter().map(OwnedBuffer::duplicate).collect::<Result<_>>()?),
					Elements::Clips(items) => Elements::Clips(items.iter().map(ClipRecord::duplicate).collect::<Result<_>>()?),
					Elements::Variants(items) => Elements::Variants(items.iter().map(Variant::duplicate).collect::<Result<_>>()?),
				};
				Payload::Vector(VectorPayload {
					count: vector.count,
					elements,
				})
			}
		};
		Ok(Self::from_parts(self.tag, payload))
	}

	/// Release every owned allocation. A second call is a logged no-op.
	pub fn dispose(&mut self) {
		if self.released {
			log::trace!("ignoring repeated release of {} record", self.tag);
			return;
		}
		let freed = release_payload(&mut self.payload);
		if freed > 0 {
			log::trace!("released {freed} allocation(s) of {} record", self.tag);
		}
		self.payload = Payload::None;
		self.released = true;
	}
}

impl Drop for Variant {
	fn drop(&mut self) {
		if !self.released {
			self.dispose();
		}
	}
}

impl fmt::Display for Variant {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.value() {
			Ok(Value::String(text)) => write!(f, "'{text}'"),
			Ok(value) => write!(f, "{}: {value}", self.tag),
			Err(err) => write!(f, "{}: <{err}>", self.tag),
		}
	}
}

fn release_payload(payload: &mut Payload) -> usize {
	match payload {
		Payload::None | Payload::Inline(_) | Payload::Decimal(_) => 0,
		Payload::Owned(buffer) => usize::from(buffer.release()),
		Payload::Clip(record) => usize::from(record.release()),
		Payload::Vector(vector) => match &mut vector.elements {
			Elements::Packed(buffer) => usize::from(buffer.release()),
			Elements::Indirect(items) => items.iter_mut().map(|item| usize::from(item.release())).sum(),
			Elements::Clips(items) => items.iter_mut().map(|item| usize::from(item.release())).sum(),
			Elements::Variants(items) => {
				for item in items.iter_mut() {
					item.dispose();
				}
				items.len()
			}
		},
	}
}

pub(crate) fn inline(bytes: &[u8]) -> Payload {
	let mut raw = [0_u8; 8];
	raw[..bytes.len()].copy_from_slice(bytes);
	Payload::Inline(raw)
}

/// Boolean slot value: all ones for true.
pub(crate) const VARIANT_TRUE: u16 = 0xffff;
pub(crate) const VARIANT_FALSE: u16 = 0x0000;

fn build(value: &Value) -> Result<(VarType, Payload)> {
	if let Value::Object(object) = value {
		// Foreign objects have no encoding; they degrade to an empty record instead of failing.
		log::debug!("object reference #{} stored as VT_EMPTY", object.0);
		return Ok((VarType::scalar(BaseType::Empty), Payload::None));
	}

	let tag = classify(value)?;
	let payload = match value {
		Value::Array(array) => build_vector(tag.base, array.kind, &array.items)?,
		Value::List(items) => build_vector(tag.base, list_element_kind(items), items)?,
		scalar => build_scalar(tag.base, scalar)?,
	};
	Ok((tag, payload))
}

fn build_scalar(base: BaseType, value: &Value) -> Result<Payload> {
	Ok(match value {
		Value::Empty | Value::Null => Payload::None,
		Value::Decimal(decimal) => Payload::Decimal(*decimal),
		Value::Char(ch) => Payload::Owned(OwnedBuffer::from_vec(text::encode_wide(ch.encode_utf8(&mut [0_u8; 4])))),
		Value::String(text) => Payload::Owned(OwnedBuffer::from_vec(text::encode_wide(text))),
		Value::Guid(id) => Payload::Owned(OwnedBuffer::from_vec(id.to_bytes_le().to_vec())),
		Value::Blob(bytes) => Payload::Owned(OwnedBuffer::from_vec(bytes.clone())),
		Value::Clip(clip) => Payload::Clip(ClipRecord::encode(clip)),
		Value::Array(_) | Value::List(_) | Value::Object(_) => return Err(PropError::UnsupportedValue { kind: value.kind_name() }),
		scalar => {
			let width = base.packed_size().filter(|width| *width <= 8).ok_or(PropError::UnsupportedType { vt: base.as_u16() })?;
			let mut raw = [0_u8; 8];
			write_packed(&mut raw[..width], scalar);
			Payload::Inline(raw)
		}
	})
}

fn build_vector(base: BaseType, kind: Kind, items: &[Value]) -> Result<Payload> {
	let count = u32::try_from(items.len()).map_err(|_| PropError::UnsupportedValue { kind: "oversized vector" })?;
	for (index, item) in items.iter().enumerate() {
		check_item(kind, index, item)?;
	}

	let elements = match kind {
		Kind::Char | Kind::String => Elements::Indirect(items.iter().map(|item| OwnedBuffer::from_vec(text::encode_wide(&element_text(item)))).collect()),
		Kind::Clip => Elements::Clips(
			items
				.iter()
				.map(|item| match item {
					Value::Clip(clip) => ClipRecord::encode(clip),
					_ => ClipRecord::encode(&Default::default()),
				})
				.collect(),
		),
		Kind::Any => Elements::Variants(items.iter().map(Variant::new).collect::<Result<_>>()?),
		_ => {
			let width = base.packed_size().ok_or(PropError::UnsupportedType {
				vt: VarType::vector_of(base).to_raw(),
			})?;
			let mut buffer = OwnedBuffer::alloc(width * items.len());
			let slots = buffer.as_mut_slice()?;
			for (slot, item) in slots.chunks_exact_mut(width).zip(items) {
				write_packed(slot, item);
			}
			Elements::Packed(buffer)
		}
	};

	Ok(Payload::Vector(VectorPayload { count, elements }))
}

fn element_text(item: &Value) -> String {
	match item {
		Value::Char(ch) => ch.to_string(),
		Value::String(text) => text.clone(),
		_ => String::new(),
	}
}

/// Write a by-value scalar into a slot sized for its tag.
fn write_packed(slot: &mut [u8], value: &Value) {
	match value {
		Value::Bool(flag) => slot.copy_from_slice(&(if *flag { VARIANT_TRUE } else { VARIANT_FALSE }).to_le_bytes()),
		Value::I8(v) => slot.copy_from_slice(&v.to_le_bytes()),
		Value::U8(v) => slot.copy_from_slice(&v.to_le_bytes()),
		Value::I16(v) => slot.copy_from_slice(&v.to_le_bytes()),
		Value::U16(v) => slot.copy_from_slice(&v.to_le_bytes()),
		Value::I32(v) | Value::Error(v) => slot.copy_from_slice(&v.to_le_bytes()),
		Value::U32(v) => slot.copy_from_slice(&v.to_le_bytes()),
		Value::I64(v) => slot.copy_from_slice(&v.to_le_bytes()),
		Value::U64(v) => slot.copy_from_slice(&v.to_le_bytes()),
		Value::F32(v) => slot.copy_from_slice(&v.to_le_bytes()),
		Value::F64(v) => slot.copy_from_slice(&v.to_le_bytes()),
		Value::Currency(v) => slot.copy_from_slice(&v.0.to_le_bytes()),
		Value::Decimal(v) => slot.copy_from_slice(&v.to_bytes()),
		Value::DateTime(dt) => slot.copy_from_slice(&to_positive_file_time(*dt).0.to_le_bytes()),
		Value::FileTime(ft) => slot.copy_from_slice(&ft.0.to_le_bytes()),
		Value::Guid(id) => slot.copy_from_slice(&id.to_bytes_le()),
		_ => slot.fill(0),
	}
}
