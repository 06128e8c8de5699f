use chrono::{DateTime, Utc};
use oleprop::prop::{Currency, Kind, PropError, Result, Value, Variant};
use uuid::Uuid;

use crate::cmd::util::{hex_string, parse_hex};

/// Literal interpretation for `encode`.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum LiteralKind {
	Empty,
	Null,
	Missing,
	Bool,
	I8,
	U8,
	I16,
	U16,
	I32,
	U32,
	I64,
	U64,
	F32,
	F64,
	/// Decimal amount, stored with four fractional digits.
	Currency,
	/// Status code, decimal or `0x` hex.
	Error,
	/// Wide string.
	String,
	/// Narrow string.
	Lpstr,
	/// Length-prefixed string.
	Bstr,
	/// RFC 3339 instant stored as `FILETIME`.
	Datetime,
	/// RFC 3339 instant stored as an OLE Automation date.
	Date,
	Guid,
	/// Hex bytes.
	Blob,
}

#[derive(clap::Args)]
pub struct Args {
	#[arg(long, value_enum)]
	pub kind: LiteralKind,
	/// Literal text; with `--vector`, a comma-separated list.
	pub literal: String,
	#[arg(long)]
	pub vector: bool,
}

/// Build a record from a literal and print its serialized bytes.
pub fn run(args: Args) -> Result<()> {
	let record = build(args.kind, &args.literal, args.vector)?;
	log::debug!("encoding {record}");
	println!("{}", hex_string(&record.serialize()?));
	Ok(())
}

fn build(kind: LiteralKind, literal: &str, vector: bool) -> Result<Variant> {
	if vector {
		let element = element_kind(kind).ok_or(PropError::InvalidLiteral {
			kind: "vector element",
			value: format!("{kind:?}"),
		})?;
		let items = if literal.is_empty() {
			Vec::new()
		} else {
			literal.split(',').map(|item| parse_value(kind, item.trim())).collect::<Result<_>>()?
		};
		return Variant::new(&Value::array(element, items));
	}

	match kind {
		LiteralKind::Empty => Ok(Variant::empty()),
		LiteralKind::Null => Ok(Variant::null()),
		LiteralKind::Missing => Ok(Variant::missing()),
		LiteralKind::Lpstr => Ok(Variant::lpstr(literal)),
		LiteralKind::Bstr => Ok(Variant::bstr(literal)),
		LiteralKind::Date => Variant::ole_date(parse_instant(literal)?),
		other => Variant::new(&parse_value(other, literal)?),
	}
}

fn element_kind(kind: LiteralKind) -> Option<Kind> {
	Some(match kind {
		LiteralKind::Bool => Kind::Bool,
		LiteralKind::I8 => Kind::I8,
		LiteralKind::U8 => Kind::U8,
		LiteralKind::I16 => Kind::I16,
		LiteralKind::U16 => Kind::U16,
		LiteralKind::I32 => Kind::I32,
		LiteralKind::U32 => Kind::U32,
		LiteralKind::I64 => Kind::I64,
		LiteralKind::U64 => Kind::U64,
		LiteralKind::F32 => Kind::F32,
		LiteralKind::F64 => Kind::F64,
		LiteralKind::Currency => Kind::Currency,
		LiteralKind::Error => Kind::Error,
		LiteralKind::String => Kind::String,
		LiteralKind::Datetime => Kind::DateTime,
		LiteralKind::Guid => Kind::Guid,
		_ => return None,
	})
}

fn parse_value(kind: LiteralKind, text: &str) -> Result<Value> {
	let invalid = |label: &'static str| PropError::InvalidLiteral {
		kind: label,
		value: text.to_owned(),
	};
	Ok(match kind {
		LiteralKind::Bool => match text {
			"true" | "1" => Value::Bool(true),
			"false" | "0" => Value::Bool(false),
			_ => return Err(invalid("bool")),
		},
		LiteralKind::I8 => Value::I8(text.parse().map_err(|_| invalid("i8"))?),
		LiteralKind::U8 => Value::U8(text.parse().map_err(|_| invalid("u8"))?),
		LiteralKind::I16 => Value::I16(text.parse().map_err(|_| invalid("i16"))?),
		LiteralKind::U16 => Value::U16(text.parse().map_err(|_| invalid("u16"))?),
		LiteralKind::I32 => Value::I32(text.parse().map_err(|_| invalid("i32"))?),
		LiteralKind::U32 => Value::U32(text.parse().map_err(|_| invalid("u32"))?),
		LiteralKind::I64 => Value::I64(text.parse().map_err(|_| invalid("i64"))?),
		LiteralKind::U64 => Value::U64(text.parse().map_err(|_| invalid("u64"))?),
		LiteralKind::F32 => Value::F32(text.parse().map_err(|_| invalid("f32"))?),
		LiteralKind::F64 => Value::F64(text.parse().map_err(|_| invalid("f64"))?),
		LiteralKind::Currency => {
			let amount: f64 = text.parse().map_err(|_| invalid("currency"))?;
			Value::Currency(Currency((amount * Currency::SCALE as f64).round() as i64))
		}
		LiteralKind::Error => Value::Error(parse_status(text).ok_or_else(|| invalid("error"))?),
		LiteralKind::String => Value::String(text.to_owned()),
		LiteralKind::Datetime => Value::DateTime(parse_instant(text)?),
		LiteralKind::Guid => Value::Guid(Uuid::parse_str(text).map_err(|_| invalid("guid"))?),
		LiteralKind::Blob => Value::Blob(parse_hex(text)?),
		LiteralKind::Empty => Value::Empty,
		LiteralKind::Null => Value::Null,
		LiteralKind::Missing | LiteralKind::Lpstr | LiteralKind::Bstr | LiteralKind::Date => return Err(invalid("scalar")),
	})
}

fn parse_status(text: &str) -> Option<i32> {
	match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
		Some(hex) => u32::from_str_radix(hex, 16).ok().map(|bits| bits as i32),
		None => text.parse().ok(),
	}
}

fn parse_instant(text: &str) -> Result<DateTime<Utc>> {
	DateTime::parse_from_rfc3339(text)
		.map(|dt| dt.with_timezone(&Utc))
		.map_err(|_| PropError::InvalidLiteral {
			kind: "rfc3339",
			value: text.to_owned(),
		})
}
