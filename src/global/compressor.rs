use std::io::{self, Read, Write};

use flate2::{read::ZlibDecoder, write::ZlibEncoder, Compression};

use super::error::{InternalError, InternalResult};

/// Utility compressor wrapping a read handle, producing and consuming
/// zlib-framed DEFLATE streams.
///
/// Whole buffers in, whole buffers out: no dictionaries, no streaming
/// boundary. The byte accounting around the stream (compressed length,
/// uncompressed length) belongs to the [`Entry`](crate::prelude::Entry) codec.
#[derive(Debug)]
pub struct Compressor<T: Read> {
	data: T,
}

impl<T: Read> Compressor<T> {
	/// Construct a new compressor over a read handle
	pub fn new(data: T) -> Compressor<T> {
		Compressor { data }
	}

	/// Compress everything in the handle into `output`, at zlib's default
	/// compression level.
	pub fn compress(&mut self, output: &mut dyn Write) -> InternalResult {
		let mut encoder = ZlibEncoder::new(output, Compression::default());
		io::copy(&mut self.data, &mut encoder)?;
		encoder.finish()?;

		Ok(())
	}

	/// Decompress everything in the handle into `output`, recovering the
	/// original bytes exactly.
	///
	/// ### Errors
	/// [`CorruptPayload`](InternalError::CorruptPayload) when the handle does
	/// not hold a valid zlib stream: truncated, malformed header, or a failed
	/// adler32 check.
	pub fn decompress(&mut self, output: &mut dyn Write) -> InternalResult {
		let mut decoder = ZlibDecoder::new(&mut self.data);

		match io::copy(&mut decoder, output) {
			Ok(_) => Ok(()),
			Err(err) => Err(InternalError::CorruptPayload(err.to_string())),
		}
	}
}
