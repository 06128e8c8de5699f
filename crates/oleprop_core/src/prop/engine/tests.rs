use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crate::prop::{
	ClipData, ClipRecord, Currency, Decimal, Engine, EngineOptions, Kind, PropError, Status, TypedValueEngine, Value, Variant, live_buffers,
};

fn round_trip(value: Value) {
	let original = Variant::new(&value).expect("value builds");
	let bytes = original.serialize().expect("value serializes");
	assert_eq!(bytes.len() % 4, 0, "serialized {value:?} is not 4-byte aligned");
	let back = Variant::deserialize(&bytes).expect("value deserializes");
	assert_eq!(back.var_type(), original.var_type());
	assert_eq!(back.value().expect("rebuilt record extracts"), original.value().expect("original extracts"));
}

#[test]
fn scalars_round_trip() {
	let dt = Utc.with_ymd_and_hms(2021, 7, 4, 12, 30, 0).single().expect("valid instant");
	for value in [
		Value::Empty,
		Value::Null,
		Value::Bool(true),
		Value::Bool(false),
		Value::I8(-3),
		Value::U8(250),
		Value::I16(-300),
		Value::U16(60_000),
		Value::I32(-70_000),
		Value::U32(4_000_000_000),
		Value::I64(i64::MIN),
		Value::U64(u64::MAX),
		Value::F32(1.5),
		Value::F64(-2.25),
		Value::Currency(Currency(-15_000)),
		Value::Decimal(Decimal::new(1_000_000_007, 3, false)),
		Value::Error(0x8000_4005_u32 as i32),
		Value::String(String::new()),
		Value::String("odd".to_owned()),
		Value::DateTime(dt),
		Value::Guid(Uuid::parse_str("d5cdd505-2e9c-101b-9397-08002b2cf9ae").expect("valid guid")),
		Value::Blob(Vec::new()),
		Value::Blob(vec![1, 2, 3, 4, 5]),
		Value::Clip(ClipData::Windows { format: 42, data: vec![1, 2, 3, 4] }),
		Value::Clip(ClipData::Named("Rich Text Format".to_owned())),
		Value::Clip(ClipData::Fmtid(Uuid::nil())),
		Value::Clip(ClipData::Macintosh { format: 7, data: vec![0xde, 0xad, 0xbe] }),
	] {
		round_trip(value);
	}
}

#[test]
fn vectors_round_trip_including_empty() {
	round_trip(Value::array(Kind::I16, Vec::new()));
	round_trip(Value::array(Kind::String, Vec::new()));
	round_trip(Value::array(Kind::Bool, vec![Value::Bool(true), Value::Bool(false), Value::Bool(true)]));
	round_trip(Value::array(Kind::U8, vec![Value::U8(1), Value::U8(2), Value::U8(3)]));
	round_trip(Value::List(vec![Value::String("a".to_owned()), Value::String("".to_owned()), Value::String("xyz".to_owned())]));
	round_trip(Value::array(Kind::Guid, vec![Value::Guid(Uuid::nil())]));
	round_trip(Value::array(Kind::I8, vec![Value::I8(-128), Value::I8(0), Value::I8(127)]));
	round_trip(Value::array(Kind::I32, vec![Value::I32(i32::MIN), Value::I32(5)]));
	round_trip(Value::array(Kind::F64, vec![Value::F64(0.5), Value::F64(-1e300)]));
	round_trip(Value::array(Kind::Currency, vec![Value::Currency(Currency(12_345)), Value::Currency(Currency(-1))]));
	round_trip(Value::array(Kind::Error, vec![Value::Error(0x8007_0057_u32 as i32), Value::Error(0)]));
	let dt = Utc.with_ymd_and_hms(1999, 12, 31, 23, 59, 59).single().expect("valid instant");
	round_trip(Value::array(Kind::DateTime, vec![Value::DateTime(dt)]));
	round_trip(Value::array(Kind::Clip, vec![Value::Clip(ClipData::Empty), Value::Clip(ClipData::Named("HTML Format".to_owned()))]));
	round_trip(Value::List(vec![Value::Null, Value::I32(7), Value::Blob(vec![9]), Value::List(vec![Value::U16(1)])]));
}

#[test]
fn explicit_string_encodings_round_trip() {
	for original in [Variant::lpstr("narrow"), Variant::bstr("binary"), Variant::lpwstr("wide")] {
		let back = Variant::deserialize(&original.serialize().expect("serializes")).expect("deserializes");
		assert_eq!(back.var_type(), original.var_type());
		assert_eq!(back.value().expect("extracts"), original.value().expect("extracts"));
	}
}

#[test]
fn ole_date_round_trips_as_date_tag() {
	let dt = Utc.with_ymd_and_hms(2024, 2, 29, 18, 0, 0).single().expect("valid instant");
	let original = Variant::ole_date(dt).expect("date in range");
	let back = Variant::deserialize(&original.serialize().expect("serializes")).expect("deserializes");
	assert_eq!(back.var_type(), original.var_type());
	assert_eq!(back.value().expect("extracts"), Value::DateTime(dt));
}

#[test]
fn bstr_keeps_embedded_terminators() {
	let original = Variant::bstr("a\0b");
	let back = Variant::deserialize(&original.serialize().expect("serializes")).expect("deserializes");
	assert_eq!(back.value().expect("extracts"), Value::String("a\0b".to_owned()));

	let trailing = Variant::bstr("x\0");
	let back = Variant::deserialize(&trailing.serialize().expect("serializes")).expect("deserializes");
	assert_eq!(back.value().expect("extracts"), Value::String("x\0".to_owned()));
}

#[test]
fn bstr_vector_elements_keep_embedded_terminators() {
	let bytes = [
		0x08, 0x10, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x08, 0x00, 0x00, 0x00, b'a', 0x00, 0x00, 0x00, b'b', 0x00, 0x00, 0x00,
	];
	let record = Variant::deserialize(&bytes).expect("deserializes");
	assert_eq!(record.count(), Some(1));
	assert_eq!(record.value().expect("extracts"), Value::array(Kind::String, vec![Value::String("a\0b".to_owned())]));
}

#[test]
fn missing_sentinel_round_trips() {
	let back = Variant::deserialize(&Variant::missing().serialize().expect("serializes")).expect("deserializes");
	assert_eq!(back.value().expect("extracts"), Variant::missing().value().expect("extracts"));
}

#[test]
fn i4_layout_is_tag_padding_value() {
	let bytes = Variant::new(&Value::I32(42)).expect("builds").serialize().expect("serializes");
	assert_eq!(bytes, [0x03, 0x00, 0x00, 0x00, 0x2a, 0x00, 0x00, 0x00]);
}

#[test]
fn wide_string_layout_counts_characters_with_terminator() {
	let bytes = Variant::lpwstr("ab").serialize().expect("serializes");
	assert_eq!(bytes, [0x1f, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, b'a', 0x00, b'b', 0x00, 0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn decimal_vector_is_rejected_by_engine() {
	let variant = Variant::new(&Value::array(Kind::Decimal, vec![Value::Decimal(Decimal::new(1, 0, false))])).expect("decimal vector builds in memory");
	let err = variant.serialize().expect_err("decimal vectors have no wire form");
	assert!(matches!(err, PropError::SerializationFailed { code } if code == Status::INVALID_ARG.0));
}

#[test]
fn truncated_input_reports_insufficient_buffer() {
	let bytes = Variant::new(&Value::Blob(vec![1; 10])).expect("builds").serialize().expect("serializes");
	let err = Variant::deserialize(&bytes[..9]).expect_err("truncated input fails");
	assert!(matches!(err, PropError::SerializationFailed { code } if code == Status::INSUFFICIENT_BUFFER.0));
}

#[test]
fn oversized_count_fails_before_allocating() {
	let before = live_buffers();
	let bytes = [0x02, 0x10, 0x00, 0x00, 0xff, 0xff, 0xff, 0xff, 0x01, 0x00];
	let err = Variant::deserialize(&bytes).expect_err("count exceeds input");
	assert!(matches!(err, PropError::SerializationFailed { code } if code == Status::INSUFFICIENT_BUFFER.0));
	assert_eq!(live_buffers(), before);
}

#[test]
fn failed_string_vector_releases_partial_elements() {
	let before = live_buffers();
	let mut bytes = Variant::new(&Value::List(vec![Value::String("first".to_owned()), Value::String("second".to_owned())]))
		.expect("builds")
		.serialize()
		.expect("serializes");
	bytes.truncate(bytes.len() - 4);
	assert!(Variant::deserialize(&bytes).is_err());
	assert_eq!(live_buffers(), before);
}

#[test]
fn unknown_and_modified_tags_are_invalid() {
	for tag in [0x0009_u16, 0x2003, 0x00ff] {
		let mut bytes = tag.to_le_bytes().to_vec();
		bytes.extend_from_slice(&[0, 0, 0, 0, 0, 0]);
		let err = Variant::deserialize(&bytes).expect_err("tag has no wire form");
		assert!(matches!(err, PropError::SerializationFailed { code } if code == Status::INVALID_ARG.0));
	}
}

#[test]
fn nesting_is_limited_by_options() {
	let mut value = Value::I32(1);
	for _ in 0..3 {
		value = Value::List(vec![Value::Null, value]);
	}
	let variant = Variant::new(&value).expect("nested list builds");

	let shallow = TypedValueEngine::new(EngineOptions { max_depth: 1 });
	let err = variant.serialize_with(&shallow).expect_err("too deep for engine");
	assert!(matches!(err, PropError::SerializationFailed { .. }));

	let bytes = variant.serialize().expect("default depth suffices");
	assert!(shallow.deserialize(&bytes).is_err());
	assert_eq!(TypedValueEngine::default().options().max_depth, 8);
}

#[test]
fn released_record_does_not_serialize() {
	let mut variant = Variant::new(&Value::U8(1)).expect("builds");
	variant.dispose();
	assert!(matches!(variant.serialize(), Err(PropError::UseAfterRelease)));
}

#[test]
fn fmtid_clip_without_payload_survives_wire() {
	let variant = Variant::from_clip_record(ClipRecord::new(ClipRecord::FMTID, None));
	let back = Variant::deserialize(&variant.serialize().expect("serializes")).expect("deserializes");
	assert_eq!(back.value().expect("extracts"), Value::Clip(ClipData::Fmtid(Uuid::nil())));
}
