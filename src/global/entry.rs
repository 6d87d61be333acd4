use std::fmt;

use super::{
	compressor::Compressor,
	cursor::{ByteReader, ByteWriter, Scalar, ScalarKind},
	error::{InternalError, InternalResult},
};

/// One archive record: a relative path and the uncompressed payload destined
/// for it, plus the trailer byte that follows the payload on the wire.
///
/// On the wire an entry carries a compressed payload and both sizes; in
/// memory only the uncompressed bytes are kept and the sizes are derived at
/// the moment of writing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
	/// Relative path identifying the payload's destination, path separators
	/// included as literal characters.
	pub id: String,
	/// The uncompressed payload.
	pub data: Vec<u8>,
	/// The byte following the payload, written as [`TRAILER`](crate::TRAILER)
	/// when packing. Read back but never validated.
	pub trailer: u8,
}

impl Entry {
	/// Construct an entry from a relative path and its payload, trailer set
	/// for packing.
	pub fn new<S: AsRef<str>>(id: S, data: Vec<u8>) -> Entry {
		Entry {
			id: id.as_ref().to_string(),
			data,
			trailer: crate::TRAILER,
		}
	}

	/// Parse one record at the reader's current position. (de-serialization)
	///
	/// Field order: `name_length` u32, name bytes, `compressed_size` u32,
	/// 4 reserved bytes, `uncompressed_size` u32, 4 reserved bytes, the
	/// compressed payload, 1 trailer byte.
	///
	/// ### Errors
	/// - [`UnexpectedEof`](InternalError::UnexpectedEof) when the source ends
	///   mid-record.
	/// - [`CorruptPayload`](InternalError::CorruptPayload) when the payload is
	///   not a valid zlib stream, or its decompressed length disagrees with
	///   the stored `uncompressed_size`.
	pub fn from_reader(reader: &mut ByteReader) -> InternalResult<Entry> {
		let name_length = reader.read_u32()?;
		let id = reader.read_text(name_length as usize)?;

		let compressed_size = reader.read_u32()?;
		reader.skip(crate::RESERVED_LENGTH)?;
		let uncompressed_size = reader.read_u32()?;
		reader.skip(crate::RESERVED_LENGTH)?;

		let compressed = reader.read_bytes(compressed_size as usize)?;

		let mut data = Vec::with_capacity(uncompressed_size as usize);
		Compressor::new(compressed).decompress(&mut data)?;

		if data.len() != uncompressed_size as usize {
			return Err(InternalError::CorruptPayload(format!(
				"entry {}: payload decompressed to {} byte(s), header says {}",
				id,
				data.len(),
				uncompressed_size
			)));
		}

		let trailer = reader.read_u8()?;

		Ok(Entry { id, data, trailer })
	}

	/// Serialize this record at the writer's current position.
	///
	/// The name length written is the byte length of the `id`'s UTF-8
	/// encoding, never its character count. The `compressed_size` field is
	/// reserved as a hole up front and filled once the payload is built, so
	/// the size on the wire always matches the bytes that follow it.
	pub fn to_writer(&self, writer: &mut ByteWriter) -> InternalResult {
		let mut compressed = Vec::new();
		Compressor::new(self.data.as_slice()).compress(&mut compressed)?;

		writer.write_u32(self.id.len() as u32);
		writer.write_text(&self.id);

		let compressed_size = writer.hole(ScalarKind::U32);
		writer.write_zeros(crate::RESERVED_LENGTH);
		writer.write_u32(self.data.len() as u32);
		writer.write_zeros(crate::RESERVED_LENGTH);

		writer.write_bytes(&compressed);
		writer.fill(compressed_size, Scalar::U32(compressed.len() as u32))?;

		writer.write_u8(crate::TRAILER);

		Ok(())
	}
}

impl fmt::Display for Entry {
	fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
		write!(
			f,
			"[Entry] id: {}, uncompressed size: {}, trailer: {}",
			self.id,
			self.data.len(),
			self.trailer
		)
	}
}
