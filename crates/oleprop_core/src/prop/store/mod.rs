use std::io::{Read, Write};

use uuid::Uuid;

use crate::prop::bytes::{Cursor, Writer};
use crate::prop::text::{decode_wide, encode_wide};
use crate::prop::{PropError, PropSpec, Properties, PropertySource, RawProperty, Result, Value, Variant};

/// Format id of the user-defined property set, the only set keyed by names.
pub const USER_DEFINED_FMTID: Uuid = Uuid::from_u128(0xd5cd_d505_2e9c_101b_9397_0800_2b2c_f9ae);

/// Version marker of a serialized property storage (`1SPS`).
pub const STORAGE_VERSION: u32 = 0x5350_5331;

/// Properties sharing one format id, in insertion order.
#[derive(Debug)]
pub struct PropertySet {
	format_id: Uuid,
	entries: Vec<(PropSpec, Variant)>,
}

impl PropertySet {
	fn new(format_id: Uuid) -> Self {
		Self {
			format_id,
			entries: Vec::new(),
		}
	}

	/// Format id of this set.
	pub fn format_id(&self) -> Uuid {
		self.format_id
	}

	/// Number of properties.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the set holds no properties.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Look up one record.
	pub fn get(&self, spec: &PropSpec) -> Option<&Variant> {
		self.entries.iter().find(|(key, _)| key == spec).map(|(_, record)| record)
	}

	/// Iterate keys and records in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&PropSpec, &Variant)> {
		self.entries.iter().map(|(key, record)| (key, record))
	}
}

/// In-memory property store with a serialized property storage image.
#[derive(Debug, Default)]
pub struct PropertyStore {
	sets: Vec<PropertySet>,
}

impl PropertyStore {
	/// Empty store.
	pub fn new() -> Self {
		Self::default()
	}

	/// Build a record from `value` and store it under `spec`.
	pub fn set(&mut self, format_id: Uuid, spec: PropSpec, value: &Value) -> Result<()> {
		check_key(format_id, &spec)?;
		let record = Variant::new(value)?;
		self.set_variant(format_id, spec, record)
	}

	/// Store an owned record under `spec`, releasing any record it replaces.
	pub fn set_variant(&mut self, format_id: Uuid, spec: PropSpec, record: Variant) -> Result<()> {
		check_key(format_id, &spec)?;
		if record.is_released() {
			return Err(PropError::UseAfterRelease);
		}

		let set = match self.sets.iter().position(|set| set.format_id == format_id) {
			Some(idx) => &mut self.sets[idx],
			None => {
				self.sets.push(PropertySet::new(format_id));
				let last = self.sets.len() - 1;
				&mut self.sets[last]
			}
		};
		match set.entries.iter_mut().find(|(key, _)| *key == spec) {
			Some((_, slot)) => *slot = record,
			None => set.entries.push((spec, record)),
		}
		Ok(())
	}

	/// Look up one record.
	pub fn get(&self, format_id: Uuid, spec: &PropSpec) -> Option<&Variant> {
		self.set_for(format_id)?.get(spec)
	}

	/// Remove one record and hand it to the caller. Empty sets are dropped.
	pub fn remove(&mut self, format_id: Uuid, spec: &PropSpec) -> Option<Variant> {
		let set_idx = self.sets.iter().position(|set| set.format_id == format_id)?;
		let set = &mut self.sets[set_idx];
		let entry_idx = set.entries.iter().position(|(key, _)| key == spec)?;
		let (_, record) = set.entries.remove(entry_idx);
		if set.entries.is_empty() {
			self.sets.remove(set_idx);
		}
		Some(record)
	}

	/// All property sets in insertion order.
	pub fn sets(&self) -> &[PropertySet] {
		&self.sets
	}

	/// The set with `format_id`, if present.
	pub fn set_for(&self, format_id: Uuid) -> Option<&PropertySet> {
		self.sets.iter().find(|set| set.format_id == format_id)
	}

	/// Total number of properties across sets.
	pub fn len(&self) -> usize {
		self.sets.iter().map(PropertySet::len).sum()
	}

	/// Whether the store holds no properties.
	pub fn is_empty(&self) -> bool {
		self.sets.is_empty()
	}

	/// Enumerate duplicated records of every set.
	pub fn source(&self) -> StoreSource<'_> {
		StoreSource {
			store: self,
			only: None,
			set_idx: 0,
			entry_idx: 0,
		}
	}

	/// Extract every property of every set.
	pub fn properties(&self) -> Properties<StoreSource<'_>> {
		Properties::new(self.source())
	}

	/// Extract every property of one set.
	pub fn set_properties(&self, format_id: Uuid) -> Properties<StoreSource<'_>> {
		Properties::new(StoreSource {
			only: Some(format_id),
			..self.source()
		})
	}

	/// Serialize into a property storage image.
	pub fn serialize(&self) -> Result<Vec<u8>> {
		let mut out = Writer::new();
		out.put_u32_le(0);
		for set in &self.sets {
			write_storage(&mut out, set)?;
		}
		out.put_u32_le(0);
		let total = image_size(out.len())?;
		out.patch_u32_le(0, total);
		Ok(out.into_bytes())
	}

	/// Parse a property storage image.
	pub fn load(bytes: &[u8]) -> Result<Self> {
		let mut cur = Cursor::new(bytes);
		let declared = cur.read_u32_le()? as usize;
		let mut store = Self::new();
		loop {
			let size = cur.read_u32_le()? as usize;
			if size == 0 {
				break;
			}
			let body_len = size.checked_sub(4).ok_or(PropError::StoreSizeMismatch { declared: size, actual: 4 })?;
			let body = cur.read_exact(body_len)?;
			store.sets.push(read_storage(body)?);
		}
		if declared != cur.pos() {
			return Err(PropError::StoreSizeMismatch {
				declared,
				actual: cur.pos(),
			});
		}
		log::debug!("loaded {} property set(s) holding {} value(s)", store.sets.len(), store.len());
		Ok(store)
	}

	/// Serialize into a writer.
	pub fn write_to(&self, mut writer: impl Write) -> Result<()> {
		writer.write_all(&self.serialize()?)?;
		Ok(())
	}

	/// Parse from a reader.
	pub fn read_from(mut reader: impl Read) -> Result<Self> {
		let mut bytes = Vec::new();
		reader.read_to_end(&mut bytes)?;
		Self::load(&bytes)
	}
}

/// [`PropertySource`] over a store, yielding duplicated records.
pub struct StoreSource<'a> {
	store: &'a PropertyStore,
	only: Option<Uuid>,
	set_idx: usize,
	entry_idx: usize,
}

impl PropertySource for StoreSource<'_> {
	fn next_raw(&mut self) -> Result<Option<RawProperty>> {
		while let Some(set) = self.store.sets.get(self.set_idx) {
			let wanted = self.only.is_none_or(|id| id == set.format_id);
			if let (true, Some((spec, record))) = (wanted, set.entries.get(self.entry_idx)) {
				self.entry_idx += 1;
				let (id, name) = match spec {
					PropSpec::Id(id) => (*id, None),
					PropSpec::Name(name) => (0, Some(name.clone())),
				};
				return Ok(Some(RawProperty {
					format_id: set.format_id,
					id,
					name,
					record: record.duplicate()?,
				}));
			}
			self.set_idx += 1;
			self.entry_idx = 0;
		}
		Ok(None)
	}
}

fn check_key(format_id: Uuid, spec: &PropSpec) -> Result<()> {
	let named = matches!(spec, PropSpec::Name(_));
	if named != (format_id == USER_DEFINED_FMTID) {
		return Err(PropError::KeyKindMismatch { format_id });
	}
	Ok(())
}

fn image_size(len: usize) -> Result<u32> {
	u32::try_from(len).map_err(|_| PropError::UnsupportedValue { kind: "oversized property storage" })
}

fn write_storage(out: &mut Writer, set: &PropertySet) -> Result<()> {
	let start = out.len();
	out.put_u32_le(0);
	out.put_u32_le(STORAGE_VERSION);
	out.put_bytes(&set.format_id.to_bytes_le());
	for (spec, record) in &set.entries {
		let value_start = out.len();
		out.put_u32_le(0);
		match spec {
			PropSpec::Id(id) => {
				out.put_u32_le(*id);
				out.put_u8(0);
			}
			PropSpec::Name(name) => {
				let name = encode_wide(name);
				out.put_u32_le(image_size(name.len())?);
				out.put_u8(0);
				out.put_bytes(&name);
			}
		}
		out.put_bytes(&record.serialize()?);
		let value_size = image_size(out.len() - value_start)?;
		out.patch_u32_le(value_start, value_size);
	}
	out.put_u32_le(0);
	let storage_size = image_size(out.len() - start)?;
	out.patch_u32_le(start, storage_size);
	Ok(())
}

/// Parse one storage body, the bytes after its size field.
fn read_storage(body: &[u8]) -> Result<PropertySet> {
	let mut cur = Cursor::new(body);
	let version = cur.read_u32_le()?;
	if version != STORAGE_VERSION {
		return Err(PropError::InvalidStoreVersion { version });
	}
	let format_id = Uuid::from_bytes_le(cur.read_array()?);
	let mut set = PropertySet::new(format_id);
	let named = format_id == USER_DEFINED_FMTID;

	loop {
		let size = cur.read_u32_le()? as usize;
		if size == 0 {
			break;
		}
		let value_len = size.checked_sub(4).ok_or(PropError::StoreSizeMismatch { declared: size, actual: 4 })?;
		let mut value = Cursor::new(cur.read_exact(value_len)?);
		let spec = if named {
			let name_len = value.read_u32_le()? as usize;
			let _reserved = value.read_u8()?;
			PropSpec::Name(decode_wide(value.read_exact(name_len)?))
		} else {
			let id = value.read_u32_le()?;
			let _reserved = value.read_u8()?;
			PropSpec::Id(id)
		};
		let record = Variant::deserialize(value.read_exact(value.remaining())?)?;
		set.entries.push((spec, record));
	}

	if cur.remaining() != 0 {
		return Err(PropError::StoreSizeMismatch {
			declared: body.len() + 4,
			actual: cur.pos() + 4,
		});
	}
	Ok(set)
}
