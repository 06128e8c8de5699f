use oleprop::prop::{PropError, Result, Value};

/// Parse a hex byte string; whitespace and a leading `0x` are ignored.
pub(crate) fn parse_hex(input: &str) -> Result<Vec<u8>> {
	let invalid = || PropError::InvalidLiteral {
		kind: "hex",
		value: input.to_owned(),
	};
	let trimmed = input.trim();
	let body = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")).unwrap_or(trimmed);
	let digits: Vec<u8> = body.bytes().filter(|byte| !byte.is_ascii_whitespace()).collect();
	if digits.len() % 2 != 0 {
		return Err(invalid());
	}

	digits
		.chunks_exact(2)
		.map(|pair| {
			let pair = std::str::from_utf8(pair).map_err(|_| invalid())?;
			u8::from_str_radix(pair, 16).map_err(|_| invalid())
		})
		.collect()
}

/// Render bytes as lowercase hex without separators.
pub(crate) fn hex_string(bytes: &[u8]) -> String {
	bytes.iter().map(|byte| format!("{byte:02x}")).collect()
}

/// Print a serializable payload as pretty JSON on stdout.
pub(crate) fn emit_json<T: serde::Serialize>(payload: &T) {
	match serde_json::to_string_pretty(payload) {
		Ok(text) => println!("{text}"),
		Err(err) => eprintln!("error: failed to encode json: {err}"),
	}
}

/// Map a dynamic value onto JSON. Values without a JSON counterpart render as strings.
pub(crate) fn value_json(value: &Value) -> serde_json::Value {
	use serde_json::Value as Json;

	match value {
		Value::Empty | Value::Null | Value::Object(_) => Json::Null,
		Value::Bool(v) => Json::Bool(*v),
		Value::I8(v) => Json::from(*v),
		Value::U8(v) => Json::from(*v),
		Value::I16(v) => Json::from(*v),
		Value::U16(v) => Json::from(*v),
		Value::I32(v) => Json::from(*v),
		Value::U32(v) => Json::from(*v),
		Value::I64(v) => Json::from(*v),
		Value::U64(v) => Json::from(*v),
		Value::F32(v) => serde_json::Number::from_f64(f64::from(*v)).map_or(Json::Null, Json::Number),
		Value::F64(v) => serde_json::Number::from_f64(*v).map_or(Json::Null, Json::Number),
		Value::FileTime(v) => Json::from(v.0),
		Value::Char(v) => Json::String(v.to_string()),
		Value::String(v) => Json::String(v.clone()),
		Value::DateTime(v) => Json::String(v.to_rfc3339()),
		Value::Guid(v) => Json::String(v.braced().to_string()),
		Value::Blob(v) => Json::String(hex_string(v)),
		Value::Array(array) => Json::Array(array.items.iter().map(value_json).collect()),
		Value::List(items) => Json::Array(items.iter().map(value_json).collect()),
		Value::Currency(_) | Value::Decimal(_) | Value::Error(_) | Value::Clip(_) => Json::String(value.to_string()),
	}
}
