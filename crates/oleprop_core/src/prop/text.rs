//! The three in-memory string encodings.

use crate::prop::{BaseType, PropError, Result};

/// UTF-16LE code units followed by a 16-bit terminator.
pub(crate) fn encode_wide(text: &str) -> Vec<u8> {
	let mut out = Vec::with_capacity(text.len() * 2 + 2);
	for unit in text.encode_utf16() {
		out.extend_from_slice(&unit.to_le_bytes());
	}
	out.extend_from_slice(&[0, 0]);
	out
}

/// UTF-8 bytes followed by a terminator.
pub(crate) fn encode_narrow(text: &str) -> Vec<u8> {
	let mut out = Vec::with_capacity(text.len() + 1);
	out.extend_from_slice(text.as_bytes());
	out.push(0);
	out
}

/// 4-byte byte-length prefix, UTF-16LE text, 16-bit terminator.
pub(crate) fn encode_bstr(text: &str) -> Vec<u8> {
	let wide = encode_wide(text);
	let len = (wide.len() - 2) as u32;
	let mut out = Vec::with_capacity(wide.len() + 4);
	out.extend_from_slice(&len.to_le_bytes());
	out.extend_from_slice(&wide);
	out
}

/// Decode null-terminated UTF-16LE text, stopping at the first terminator.
pub(crate) fn decode_wide(bytes: &[u8]) -> String {
	let units: Vec<u16> = bytes
		.chunks_exact(2)
		.map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
		.take_while(|unit| *unit != 0)
		.collect();
	String::from_utf16_lossy(&units)
}

/// Decode UTF-16LE text whose length is known, dropping only the final terminator.
pub(crate) fn decode_wide_counted(bytes: &[u8]) -> String {
	let mut units: Vec<u16> = bytes.chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]])).collect();
	if units.last() == Some(&0) {
		units.pop();
	}
	String::from_utf16_lossy(&units)
}

/// Decode null-terminated narrow text.
pub(crate) fn decode_narrow(bytes: &[u8]) -> String {
	let end = bytes.iter().position(|byte| *byte == 0).unwrap_or(bytes.len());
	String::from_utf8_lossy(&bytes[..end]).into_owned()
}

/// Decode a length-prefixed wide string; embedded terminators are kept.
pub(crate) fn decode_bstr(bytes: &[u8]) -> String {
	let Some((prefix, rest)) = bytes.split_first_chunk::<4>() else {
		return String::new();
	};
	let len = (u32::from_le_bytes(*prefix) as usize).min(rest.len());
	let units: Vec<u16> = rest[..len].chunks_exact(2).map(|pair| u16::from_le_bytes([pair[0], pair[1]])).collect();
	String::from_utf16_lossy(&units)
}

/// Decode text stored in the layout of a string tag.
pub(crate) fn decode(base: BaseType, bytes: &[u8]) -> Result<String> {
	match base {
		BaseType::Lpwstr => Ok(decode_wide(bytes)),
		BaseType::Lpstr => Ok(decode_narrow(bytes)),
		BaseType::Bstr => Ok(decode_bstr(bytes)),
		other => Err(PropError::UnsupportedType { vt: other.as_u16() }),
	}
}
