use std::{fmt, io::Read};

use crate::global::{
	cursor::ByteReader,
	entry::Entry,
	error::{InternalError, InternalResult},
};

/// A fully parsed archive: the ordered sequence of entries a `.sav` source
/// declared.
///
/// Parsing materializes everything in memory, payloads decompressed. Entry
/// order is the order of the source; no sorting or deduplication is applied,
/// and it is the order files are restored in.
pub struct Archive {
	entries: Vec<Entry>,
}

impl Archive {
	/// Read the whole `handle` into memory and parse it.
	/// > **A word of advice:**
	/// > Does not buffer the underlying handle, so consider wrapping `handle` in a `BufReader`
	pub fn new<T: Read>(mut handle: T) -> InternalResult<Archive> {
		let mut buffer = Vec::new();
		handle.read_to_end(&mut buffer)?;

		Archive::from_bytes(&buffer)
	}

	/// Parse an archive out of a byte buffer: a `u32` entry count followed by
	/// exactly that many records.
	///
	/// ### Errors
	/// - [`UnexpectedEof`](InternalError::UnexpectedEof) when the source is
	///   too short to hold the count itself.
	/// - [`TruncatedArchive`](InternalError::TruncatedArchive) when the source
	///   ends before `count` entries are fully read. No partial entry list is
	///   ever returned.
	/// - [`CorruptPayload`](InternalError::CorruptPayload) when any entry's
	///   payload fails to decompress.
	pub fn from_bytes(source: &[u8]) -> InternalResult<Archive> {
		let mut reader = ByteReader::new(source);
		let declared = reader.read_u32()?;

		// The count is untrusted until the entries behind it actually parse,
		// so it must not size an allocation up front
		let mut entries = Vec::new();
		for parsed in 0..declared {
			match Entry::from_reader(&mut reader) {
				Ok(entry) => entries.push(entry),
				Err(InternalError::UnexpectedEof { .. }) => {
					return Err(InternalError::TruncatedArchive { declared, parsed });
				},
				Err(err) => return Err(err),
			}
		}

		Ok(Archive { entries })
	}

	/// The parsed entries, in archive order.
	pub fn entries(&self) -> &[Entry] {
		&self.entries
	}

	/// Number of entries in the archive.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether the archive holds no entries at all.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Consume the archive and return the entries.
	pub fn into_entries(self) -> Vec<Entry> {
		self.entries
	}
}

impl fmt::Debug for Archive {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Archive").field("entries", &self.entries).finish()
	}
}
