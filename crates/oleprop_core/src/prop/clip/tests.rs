use uuid::Uuid;

use crate::prop::{ClipData, ClipRecord, PropError};

#[test]
fn windows_format_reads_leading_code_then_payload() {
	let mut raw = 42_i32.to_le_bytes().to_vec();
	raw.extend_from_slice(&[0x01, 0x02, 0x03, 0x04]);
	let record = ClipRecord::new(ClipRecord::WINDOWS, Some(raw));
	assert_eq!(record.size(), 12);

	let clip = record.decode().expect("clip decodes");
	assert_eq!(
		clip,
		ClipData::Windows {
			format: 42,
			data: vec![1, 2, 3, 4]
		}
	);
}

#[test]
fn fmtid_without_payload_is_nil_guid() {
	let record = ClipRecord::new(ClipRecord::FMTID, None);
	assert_eq!(record.decode().expect("clip decodes"), ClipData::Fmtid(Uuid::nil()));
}

#[test]
fn fmtid_uses_platform_guid_byte_order() {
	let id = Uuid::parse_str("d5cdd505-2e9c-101b-9397-08002b2cf9ae").expect("valid guid");
	let record = ClipRecord::encode(&ClipData::Fmtid(id));
	let data = record.data().expect("live").expect("payload present");
	assert_eq!(&data[..4], &[0x05, 0xd5, 0xcd, 0xd5]);
	assert_eq!(record.decode().expect("clip decodes"), ClipData::Fmtid(id));
}

#[test]
fn positive_discriminator_is_named_format() {
	let record = ClipRecord::encode(&ClipData::Named("Rich Text Format".to_owned()));
	assert_eq!(record.format(), 17);
	assert_eq!(record.decode().expect("clip decodes"), ClipData::Named("Rich Text Format".to_owned()));
}

#[test]
fn unknown_discriminator_degrades_to_empty() {
	for format in [0, -4, -100] {
		let record = ClipRecord::new(format, Some(vec![1, 2, 3, 4, 5]));
		assert_eq!(record.decode().expect("unknown formats never fail"), ClipData::Empty);
	}
	let record = ClipRecord::new(5, None);
	assert_eq!(record.decode().expect("named without payload never fails"), ClipData::Empty);
}

#[test]
fn short_numeric_payload_degrades_to_empty() {
	let record = ClipRecord::new(ClipRecord::MACINTOSH, Some(vec![1, 2]));
	assert_eq!(record.decode().expect("short payload never fails"), ClipData::Empty);
}

#[test]
fn released_record_cannot_decode() {
	let mut record = ClipRecord::encode(&ClipData::Windows { format: 3, data: vec![7] });
	assert!(record.release());
	assert!(!record.release());
	assert!(matches!(record.decode(), Err(PropError::UseAfterRelease)));
}
