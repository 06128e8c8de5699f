#![allow(missing_docs)]

use chrono::{TimeZone, Utc};
use oleprop::prop::{BaseType, ClipData, ClipRecord, Kind, ObjectRef, Value, VarType, Variant, from_file_time, live_buffers, to_positive_file_time};
use uuid::Uuid;

#[test]
fn bool_vector_normalizes_to_all_ones() {
	let variant = Variant::new(&Value::array(Kind::Bool, vec![Value::Bool(true), Value::Bool(false), Value::Bool(true)])).expect("bool vector builds");
	assert_eq!(variant.packed_elements().expect("live"), Some(&[0xff_u8, 0xff, 0x00, 0x00, 0xff, 0xff][..]));
	assert_eq!(
		variant.value().expect("extracts"),
		Value::array(Kind::Bool, vec![Value::Bool(true), Value::Bool(false), Value::Bool(true)])
	);
}

#[test]
fn pre_1601_date_clamps_instead_of_wrapping() {
	let dt = Utc.with_ymd_and_hms(1066, 10, 14, 9, 0, 0).single().expect("valid instant");
	let ft = to_positive_file_time(dt);
	assert_eq!(ft.0, 0);
	assert_eq!(from_file_time(ft).expect("zero decodes"), Utc.with_ymd_and_hms(1601, 1, 1, 0, 0, 0).single().expect("valid instant"));
}

#[test]
fn empty_sequence_of_known_kind_stays_a_vector() {
	let variant = Variant::new(&Value::array(Kind::String, Vec::new())).expect("empty vector builds");
	assert_eq!(variant.var_type(), VarType::vector_of(BaseType::Lpwstr));
	assert_eq!(variant.count(), Some(0));
	assert_eq!(variant.value().expect("extracts"), Value::array(Kind::String, Vec::new()));
}

#[test]
fn string_vector_preserves_order_and_count() {
	let items: Vec<Value> = ["one", "two", "three"].into_iter().map(|item| Value::String(item.to_owned())).collect();
	let variant = Variant::new(&Value::List(items.clone())).expect("list builds");
	assert_eq!(variant.count(), Some(3));
	assert_eq!(variant.value().expect("extracts"), Value::array(Kind::String, items));
}

#[test]
fn clip_data_round_trips_format_and_payload() {
	let variant = Variant::new(&Value::Clip(ClipData::Windows {
		format: 42,
		data: vec![0x01, 0x02, 0x03, 0x04],
	}))
	.expect("clip builds");
	let back = Variant::deserialize(&variant.serialize().expect("serializes")).expect("deserializes");
	assert_eq!(
		back.value().expect("extracts"),
		Value::Clip(ClipData::Windows {
			format: 42,
			data: vec![1, 2, 3, 4]
		})
	);

	let fmtid = Variant::from_clip_record(ClipRecord::new(ClipRecord::FMTID, None));
	assert_eq!(fmtid.value().expect("extracts"), Value::Clip(ClipData::Fmtid(Uuid::nil())));
}

#[test]
fn every_exit_path_releases_exactly_once() {
	let before = live_buffers();
	{
		let mut extracted = Variant::new(&Value::Blob(vec![1, 2, 3])).expect("blob builds");
		let _ = extracted.take_value().expect("takes");
		extracted.dispose();

		let mut serialized = Variant::new(&Value::List(vec![Value::String("a".to_owned())])).expect("list builds");
		let bytes = serialized.serialize().expect("serializes");
		serialized.dispose();

		let _rebuilt = Variant::deserialize(&bytes).expect("deserializes");
		let _failed = Variant::deserialize(&bytes[..bytes.len() - 2]);
	}
	assert_eq!(live_buffers(), before);
}

#[test]
fn foreign_objects_degrade_to_empty() {
	let variant = Variant::new(&Value::Object(ObjectRef(0xdead))).expect("never fails");
	assert_eq!(variant.var_type(), VarType::scalar(BaseType::Empty));
}
