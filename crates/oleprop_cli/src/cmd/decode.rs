use oleprop::prop::Variant;

use crate::cmd::util::{emit_json, parse_hex, value_json};

#[derive(clap::Args)]
pub struct Args {
	/// Serialized value as hex.
	pub hex: String,
	#[arg(long)]
	pub json: bool,
}

/// Deserialize one value and print its tag and extracted value.
pub fn run(args: Args) -> oleprop::prop::Result<()> {
	let bytes = parse_hex(&args.hex)?;
	let mut record = Variant::deserialize(&bytes)?;
	let var_type = record.var_type();
	let count = record.count();
	let value = record.take_value()?;

	if args.json {
		emit_json(&DecodeJson {
			var_type: var_type.to_string(),
			raw_type: var_type.to_raw(),
			count,
			value: value_json(&value),
		});
		return Ok(());
	}

	println!("type: {var_type}");
	println!("raw_type: 0x{:04x}", var_type.to_raw());
	if let Some(count) = count {
		println!("count: {count}");
	}
	println!("value: {value}");
	Ok(())
}

#[derive(serde::Serialize)]
struct DecodeJson {
	#[serde(rename = "type")]
	var_type: String,
	raw_type: u16,
	count: Option<u32>,
	value: serde_json::Value,
}
