use chrono::DateTime;
use uuid::Uuid;

use crate::prop::{BaseType, ClipData, FileTime, Kind, ObjectRef, PropError, Value, VarType, classify, classify_kind};

fn scalar(value: Value) -> BaseType {
	let vt = classify(&value).expect("value classifies");
	assert!(!vt.vector, "scalar value must not classify as vector");
	vt.base
}

#[test]
fn null_and_empty_are_distinct_tags() {
	assert_eq!(scalar(Value::Null), BaseType::Null);
	assert_eq!(scalar(Value::Empty), BaseType::Empty);
}

#[test]
fn numerics_classify_by_exact_width() {
	assert_eq!(scalar(Value::I8(-1)), BaseType::I1);
	assert_eq!(scalar(Value::U8(1)), BaseType::Ui1);
	assert_eq!(scalar(Value::I16(-1)), BaseType::I2);
	assert_eq!(scalar(Value::U16(1)), BaseType::Ui2);
	assert_eq!(scalar(Value::I32(-1)), BaseType::I4);
	assert_eq!(scalar(Value::U32(1)), BaseType::Ui4);
	assert_eq!(scalar(Value::I64(-1)), BaseType::I8);
	assert_eq!(scalar(Value::U64(1)), BaseType::Ui8);
	assert_eq!(scalar(Value::F32(1.0)), BaseType::R4);
	assert_eq!(scalar(Value::F64(1.0)), BaseType::R8);
}

#[test]
fn text_time_and_identity_values() {
	assert_eq!(scalar(Value::Bool(true)), BaseType::Bool);
	assert_eq!(scalar(Value::Char('x')), BaseType::Lpwstr);
	assert_eq!(scalar(Value::String("x".to_owned())), BaseType::Lpwstr);
	assert_eq!(scalar(Value::DateTime(DateTime::UNIX_EPOCH)), BaseType::FileTime);
	assert_eq!(scalar(Value::FileTime(FileTime(1))), BaseType::FileTime);
	assert_eq!(scalar(Value::Guid(Uuid::nil())), BaseType::Clsid);
	assert_eq!(scalar(Value::Blob(Vec::new())), BaseType::Blob);
	assert_eq!(scalar(Value::Clip(ClipData::Empty)), BaseType::Cf);
}

#[test]
fn declared_array_uses_declared_kind_even_when_empty() {
	let vt = classify(&Value::array(Kind::U16, Vec::new())).expect("empty declared array classifies");
	assert_eq!(vt, VarType::vector_of(BaseType::Ui2));
}

#[test]
fn list_uses_first_item_kind() {
	let vt = classify(&Value::List(vec![Value::String("a".to_owned()), Value::String("b".to_owned())])).expect("list classifies");
	assert_eq!(vt, VarType::vector_of(BaseType::Lpwstr));
}

#[test]
fn empty_or_untyped_list_falls_back_to_variant_vector() {
	assert_eq!(classify(&Value::List(Vec::new())).expect("empty list classifies"), VarType::vector_of(BaseType::Variant));
	assert_eq!(
		classify(&Value::List(vec![Value::Null, Value::I32(1)])).expect("null-led list classifies"),
		VarType::vector_of(BaseType::Variant)
	);
}

#[test]
fn object_reference_has_no_rule() {
	let err = classify(&Value::Object(ObjectRef(7))).expect_err("objects do not classify");
	assert!(matches!(err, PropError::UnsupportedValue { kind: "object" }));
}

#[test]
fn vector_of_blobs_is_rejected() {
	let err = classify(&Value::array(Kind::Blob, vec![Value::Blob(vec![1])])).expect_err("blob vectors do not exist");
	assert!(matches!(err, PropError::UnsupportedValue { .. }));
}

#[test]
fn classify_kind_and_widen_agree() {
	let kinds = [
		Kind::Bool,
		Kind::I8,
		Kind::U8,
		Kind::I16,
		Kind::U16,
		Kind::I32,
		Kind::U32,
		Kind::I64,
		Kind::U64,
		Kind::F32,
		Kind::F64,
		Kind::Currency,
		Kind::Decimal,
		Kind::Error,
		Kind::String,
		Kind::DateTime,
		Kind::Guid,
		Kind::Blob,
		Kind::Clip,
		Kind::Any,
	];
	for kind in kinds {
		assert_eq!(classify_kind(kind).widen().expect("stored tag widens"), kind);
	}
}
