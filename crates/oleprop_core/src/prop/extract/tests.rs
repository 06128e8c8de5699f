use uuid::Uuid;

use crate::prop::extract::{extract, extract_owned};
use crate::prop::variant::{Payload, inline};
use crate::prop::{BaseType, ClipData, ClipRecord, Currency, Decimal, Kind, PropError, Value, VarType, Variant, live_buffers};

#[test]
fn int_and_uint_widen_to_fixed_width() {
	let int = Variant::from_parts(VarType::scalar(BaseType::Int), inline(&(-5_i32).to_le_bytes()));
	let uint = Variant::from_parts(VarType::scalar(BaseType::Uint), inline(&7_u32.to_le_bytes()));
	assert_eq!(extract(&int).expect("int extracts"), Value::I32(-5));
	assert_eq!(extract(&uint).expect("uint extracts"), Value::U32(7));
}

#[test]
fn any_nonzero_bool_slot_is_true() {
	let variant = Variant::from_parts(VarType::scalar(BaseType::Bool), inline(&1_u16.to_le_bytes()));
	assert_eq!(extract(&variant).expect("bool extracts"), Value::Bool(true));
}

#[test]
fn currency_decimal_and_guid_keep_their_bits() {
	let currency = Variant::new(&Value::Currency(Currency(12_345))).expect("currency builds");
	assert_eq!(extract(&currency).expect("extracts"), Value::Currency(Currency(12_345)));

	let decimal = Decimal::new(314_159, 5, true);
	let variant = Variant::new(&Value::Decimal(decimal)).expect("decimal builds");
	assert_eq!(extract(&variant).expect("extracts"), Value::Decimal(decimal));

	let id = Uuid::parse_str("f29f85e0-4ff9-1068-ab91-08002b27b3d9").expect("valid guid");
	let variant = Variant::new(&Value::array(Kind::Guid, vec![Value::Guid(id), Value::Guid(Uuid::nil())])).expect("guid vector builds");
	assert_eq!(extract(&variant).expect("extracts"), Value::array(Kind::Guid, vec![Value::Guid(id), Value::Guid(Uuid::nil())]));
}

#[test]
fn fmtid_clip_without_payload_extracts_nil_guid() {
	let variant = Variant::from_clip_record(ClipRecord::new(ClipRecord::FMTID, None));
	assert_eq!(extract(&variant).expect("clip extracts"), Value::Clip(ClipData::Fmtid(Uuid::nil())));
}

#[test]
fn tags_without_mapping_are_rejected() {
	let variant = Variant::from_parts(VarType::scalar(BaseType::Dispatch), Payload::None);
	let err = extract(&variant).expect_err("interfaces do not extract");
	assert!(matches!(err, PropError::UnsupportedType { vt: 9 }));
}

#[test]
fn owned_extraction_moves_blob_allocation() {
	let before = live_buffers();
	let mut variant = Variant::new(&Value::Blob(vec![4, 5])).expect("blob builds");
	assert_eq!(extract_owned(&mut variant).expect("blob extracts"), Value::Blob(vec![4, 5]));
	assert_eq!(live_buffers(), before);
	assert!(matches!(extract(&variant), Err(PropError::UseAfterRelease)));
}

#[test]
fn clip_vector_extracts_each_descriptor() {
	let clips = vec![Value::Clip(ClipData::Named("HTML Format".to_owned())), Value::Clip(ClipData::Empty)];
	let variant = Variant::new(&Value::array(Kind::Clip, clips.clone())).expect("clip vector builds");
	assert_eq!(extract(&variant).expect("extracts"), Value::array(Kind::Clip, clips));
}
