use std::io::Read;

use crate::global::{entry::Entry, error::InternalResult};

/// A named wrapper around an [`io::Read`](Read) handle, queued for packing.
#[derive(Debug)]
pub struct Leaf<R> {
	/// source data
	pub handle: R,
	/// The relative path under which the data will be restored on extraction.
	pub id: String,
}

impl<R: Read> Leaf<R> {
	/// Creates a new [`Leaf`] wrapping around the given [`Read`] handle, with an ID
	pub fn new<S: AsRef<str>>(handle: R, id: S) -> Leaf<R> {
		Leaf {
			handle,
			id: id.as_ref().to_string(),
		}
	}

	/// Drain the handle and build the [`Entry`] to be serialized.
	pub(crate) fn process(&mut self) -> InternalResult<Entry> {
		let mut data = Vec::new();
		self.handle.read_to_end(&mut data)?;

		Ok(Entry::new(&self.id, data))
	}
}
