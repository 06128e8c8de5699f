use std::cell::Cell;

use crate::prop::{PropError, Result};

thread_local! {
	static LIVE_BUFFERS: Cell<usize> = const { Cell::new(0) };
}

/// Number of [`OwnedBuffer`] allocations created on this thread and not yet released.
pub fn live_buffers() -> usize {
	LIVE_BUFFERS.with(Cell::get)
}

fn track_alloc() {
	LIVE_BUFFERS.with(|count| count.set(count.get() + 1));
}

fn track_release() {
	LIVE_BUFFERS.with(|count| count.set(count.get().saturating_sub(1)));
}

/// Out-of-line allocation owned by exactly one variant record.
///
/// Release is explicit and idempotent: the first [`release`](Self::release) or
/// [`take`](Self::take) ends the allocation, later calls are no-ops. Dropping
/// an unreleased buffer releases it.
#[derive(Debug)]
pub struct OwnedBuffer {
	bytes: Option<Box<[u8]>>,
}

impl OwnedBuffer {
	/// Allocate `len` zeroed bytes.
	pub fn alloc(len: usize) -> Self {
		Self::from_vec(vec![0_u8; len])
	}

	/// Take ownership of existing bytes.
	pub fn from_vec(bytes: Vec<u8>) -> Self {
		track_alloc();
		Self {
			bytes: Some(bytes.into_boxed_slice()),
		}
	}

	/// Allocation length in bytes, `0` once released.
	pub fn len(&self) -> usize {
		self.bytes.as_deref().map_or(0, <[u8]>::len)
	}

	/// Whether the allocation is empty or released.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Whether the allocation was already released or taken.
	pub fn is_released(&self) -> bool {
		self.bytes.is_none()
	}

	/// Borrow the allocation.
	pub fn as_slice(&self) -> Result<&[u8]> {
		self.bytes.as_deref().ok_or(PropError::UseAfterRelease)
	}

	/// Mutably borrow the allocation.
	pub fn as_mut_slice(&mut self) -> Result<&mut [u8]> {
		self.bytes.as_deref_mut().ok_or(PropError::UseAfterRelease)
	}

	/// Transfer ownership of the allocation to the caller.
	pub fn take(&mut self) -> Result<Vec<u8>> {
		let bytes = self.bytes.take().ok_or(PropError::UseAfterRelease)?;
		track_release();
		Ok(bytes.into_vec())
	}

	/// Release the allocation; returns `false` when nothing was left to release.
	pub fn release(&mut self) -> bool {
		if self.bytes.take().is_none() {
			return false;
		}
		track_release();
		true
	}

	/// Copy into a fresh, independently owned buffer.
	pub fn duplicate(&self) -> Result<Self> {
		Ok(Self::from_vec(self.as_slice()?.to_vec()))
	}
}

impl Drop for OwnedBuffer {
	fn drop(&mut self) {
		self.release();
	}
}

#[cfg(test)]
mod tests;
