use uuid::Uuid;

use crate::prop::text::{decode_wide, encode_wide};
use crate::prop::{ClipData, OwnedBuffer, Result};

/// Raw clip-data record: byte size, format discriminator, and an optional payload allocation.
///
/// `size` counts the 4-byte discriminator plus the payload, matching the
/// platform record. The payload meaning depends on the discriminator, see
/// [`ClipRecord::decode`].
#[derive(Debug)]
pub struct ClipRecord {
	size: u32,
	format: i32,
	data: Option<OwnedBuffer>,
}

impl ClipRecord {
	/// Windows clipboard format code followed by the payload.
	pub const WINDOWS: i32 = -1;
	/// Macintosh clipboard format code followed by the payload.
	pub const MACINTOSH: i32 = -2;
	/// 16-byte format GUID.
	pub const FMTID: i32 = -3;

	/// Build a record from a discriminator and optional raw payload.
	pub fn new(format: i32, data: Option<Vec<u8>>) -> Self {
		let len = data.as_ref().map_or(0, Vec::len);
		Self {
			size: u32::try_from(len).map_or(u32::MAX, |len| len.saturating_add(4)),
			format,
			data: data.map(OwnedBuffer::from_vec),
		}
	}

	/// Encode a descriptor.
	pub fn encode(clip: &ClipData) -> Self {
		match clip {
			ClipData::Empty => Self::new(0, None),
			ClipData::Fmtid(id) => Self::new(Self::FMTID, Some(id.to_bytes_le().to_vec())),
			ClipData::Named(name) => {
				let data = encode_wide(name);
				let units = i32::try_from(data.len() / 2).unwrap_or(i32::MAX);
				Self::new(units, Some(data))
			}
			ClipData::Windows { format, data } => Self::new(Self::WINDOWS, Some(prefixed(*format, data))),
			ClipData::Macintosh { format, data } => Self::new(Self::MACINTOSH, Some(prefixed(*format, data))),
		}
	}

	/// Declared record size in bytes.
	pub fn size(&self) -> u32 {
		self.size
	}

	/// Format discriminator.
	pub fn format(&self) -> i32 {
		self.format
	}

	/// Borrow the payload, `None` when the record carries no allocation.
	pub fn data(&self) -> Result<Option<&[u8]>> {
		self.data.as_ref().map(OwnedBuffer::as_slice).transpose()
	}

	/// Decode into a descriptor.
	///
	/// Unknown discriminators, absent payloads on numeric formats, and
	/// payloads too short for their format decode to [`ClipData::Empty`]
	/// instead of failing; records written by other producers stay readable.
	pub fn decode(&self) -> Result<ClipData> {
		let data = self.data()?;
		let clip = match (self.format, data) {
			(Self::WINDOWS | Self::MACINTOSH, Some(bytes)) if bytes.len() >= 4 => {
				let mut code = [0_u8; 4];
				code.copy_from_slice(&bytes[..4]);
				let format = i32::from_le_bytes(code);
				let data = bytes[4..].to_vec();
				if self.format == Self::WINDOWS {
					ClipData::Windows { format, data }
				} else {
					ClipData::Macintosh { format, data }
				}
			}
			(Self::FMTID, None) => ClipData::Fmtid(Uuid::nil()),
			(Self::FMTID, Some(bytes)) => match <[u8; 16]>::try_from(bytes.get(..16).unwrap_or_default()) {
				Ok(raw) => ClipData::Fmtid(Uuid::from_bytes_le(raw)),
				Err(_) => ClipData::Fmtid(Uuid::nil()),
			},
			(format, Some(bytes)) if format > 0 => ClipData::Named(decode_wide(bytes)),
			(format, _) => {
				log::debug!("clip-data discriminator {format} decodes to an empty descriptor");
				ClipData::Empty
			}
		};
		Ok(clip)
	}

	/// Release the payload allocation; returns `false` when nothing was left.
	pub fn release(&mut self) -> bool {
		self.data.as_mut().is_some_and(OwnedBuffer::release)
	}

	/// Copy into an independently owned record.
	pub fn duplicate(&self) -> Result<Self> {
		let data = self.data.as_ref().map(OwnedBuffer::duplicate).transpose()?;
		Ok(Self {
			size: self.size,
			format: self.format,
			data,
		})
	}
}

fn prefixed(format: i32, payload: &[u8]) -> Vec<u8> {
	let mut out = Vec::with_capacity(payload.len() + 4);
	out.extend_from_slice(&format.to_le_bytes());
	out.extend_from_slice(payload);
	out
}

#[cfg(test)]
mod tests;
