use crate::prop::{OwnedBuffer, PropError, live_buffers};

#[test]
fn release_is_idempotent() {
	let before = live_buffers();
	let mut buffer = OwnedBuffer::from_vec(vec![1, 2, 3]);
	assert_eq!(live_buffers(), before + 1);

	assert!(buffer.release());
	assert!(!buffer.release());
	assert!(buffer.is_released());
	assert_eq!(live_buffers(), before);
}

#[test]
fn take_transfers_ownership_once() {
	let before = live_buffers();
	let mut buffer = OwnedBuffer::from_vec(vec![9, 8]);
	assert_eq!(buffer.take().expect("first take succeeds"), vec![9, 8]);
	assert!(matches!(buffer.take(), Err(PropError::UseAfterRelease)));
	assert!(!buffer.release());
	assert_eq!(live_buffers(), before);
}

#[test]
fn drop_releases_unreleased_buffer() {
	let before = live_buffers();
	{
		let _buffer = OwnedBuffer::alloc(32);
		assert_eq!(live_buffers(), before + 1);
	}
	assert_eq!(live_buffers(), before);
}

#[test]
fn released_buffer_cannot_be_read() {
	let mut buffer = OwnedBuffer::alloc(4);
	buffer.release();
	assert!(matches!(buffer.as_slice(), Err(PropError::UseAfterRelease)));
	assert_eq!(buffer.len(), 0);
}

#[test]
fn duplicate_is_independent() {
	let mut original = OwnedBuffer::from_vec(vec![5, 6, 7]);
	let copy = original.duplicate().expect("duplicate succeeds");
	original.release();
	assert_eq!(copy.as_slice().expect("copy stays live"), &[5, 6, 7]);
}
