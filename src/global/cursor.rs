use super::error::{InternalError, InternalResult};

/// A forward-only read cursor over a borrowed byte buffer.
///
/// Every read consumes exactly the requested width and fails with
/// [`UnexpectedEof`](InternalError::UnexpectedEof) when fewer bytes remain.
/// Multi-byte integers are little-endian unless the method name says otherwise.
#[derive(Debug)]
pub struct ByteReader<'a> {
	buffer: &'a [u8],
	position: usize,
}

macro_rules! read_le {
	($(#[$doc:meta] $name:ident: $ty:ty),* $(,)?) => {
		$(
			#[$doc]
			pub fn $name(&mut self) -> InternalResult<$ty> {
				const WIDTH: usize = std::mem::size_of::<$ty>();
				let bytes = self.read_bytes(WIDTH)?;
				Ok(<$ty>::from_le_bytes(bytes.try_into().unwrap()))
			}
		)*
	};
}

impl<'a> ByteReader<'a> {
	/// Construct a new reader starting at the beginning of `buffer`.
	pub fn new(buffer: &'a [u8]) -> ByteReader<'a> {
		ByteReader { buffer, position: 0 }
	}

	/// Current cursor position, in bytes from the start of the buffer.
	#[inline(always)]
	pub fn position(&self) -> usize {
		self.position
	}

	/// Number of bytes left to consume.
	#[inline(always)]
	pub fn remaining(&self) -> usize {
		self.buffer.len() - self.position
	}

	/// Whether the cursor has consumed the whole buffer.
	#[inline(always)]
	pub fn is_empty(&self) -> bool {
		self.remaining() == 0
	}

	/// Consume exactly `count` bytes and return them as a sub-slice.
	pub fn read_bytes(&mut self, count: usize) -> InternalResult<&'a [u8]> {
		if count > self.remaining() {
			return Err(InternalError::UnexpectedEof {
				offset: self.position,
				needed: count - self.remaining(),
			});
		}

		let bytes = &self.buffer[self.position..self.position + count];
		self.position += count;
		Ok(bytes)
	}

	/// Advance past `count` bytes without looking at them. Used for the
	/// reserved fields of an entry.
	#[inline]
	pub fn skip(&mut self, count: usize) -> InternalResult {
		self.read_bytes(count).map(|_| ())
	}

	/// Consume a single byte.
	pub fn read_u8(&mut self) -> InternalResult<u8> {
		Ok(self.read_bytes(1)?[0])
	}

	/// Consume a single byte as a signed integer.
	pub fn read_i8(&mut self) -> InternalResult<i8> {
		Ok(self.read_u8()? as i8)
	}

	read_le! {
		/// Consume 2 bytes as a little-endian `u16`.
		read_u16: u16,
		/// Consume 2 bytes as a little-endian `i16`.
		read_i16: i16,
		/// Consume 4 bytes as a little-endian `u32`.
		read_u32: u32,
		/// Consume 4 bytes as a little-endian `i32`.
		read_i32: i32,
		/// Consume 8 bytes as a little-endian `u64`.
		read_u64: u64,
		/// Consume 8 bytes as a little-endian `i64`.
		read_i64: i64,
		/// Consume 4 bytes as a little-endian `f32`.
		read_f32: f32,
		/// Consume 8 bytes as a little-endian `f64`.
		read_f64: f64,
	}

	/// Consume 4 bytes as a big-endian `u32`. Part of the reusable cursor
	/// contract; the archive format itself is little-endian throughout.
	pub fn read_u32_be(&mut self) -> InternalResult<u32> {
		let bytes = self.read_bytes(4)?;
		Ok(u32::from_be_bytes(bytes.try_into().unwrap()))
	}

	/// Consume 4 bytes as a big-endian `i32`.
	pub fn read_i32_be(&mut self) -> InternalResult<i32> {
		let bytes = self.read_bytes(4)?;
		Ok(i32::from_be_bytes(bytes.try_into().unwrap()))
	}

	/// Consume exactly `count` bytes and decode them as UTF-8 text.
	///
	/// Decoding is lossy: ill-formed sequences become U+FFFD instead of
	/// failing, so reads never reject a name the permissive original format
	/// would have accepted.
	pub fn read_text(&mut self, count: usize) -> InternalResult<String> {
		let bytes = self.read_bytes(count)?;
		Ok(String::from_utf8_lossy(bytes).into_owned())
	}

	/// Consume bytes up to and excluding a zero byte, which is also consumed,
	/// and decode them as UTF-8 text. Fails with
	/// [`UnexpectedEof`](InternalError::UnexpectedEof) if the buffer ends
	/// before a zero byte is found.
	pub fn read_cstring(&mut self) -> InternalResult<String> {
		let haystack = &self.buffer[self.position..];

		match haystack.iter().position(|&b| b == 0) {
			Some(terminator) => {
				let text = String::from_utf8_lossy(&haystack[..terminator]).into_owned();
				self.position += terminator + 1;
				Ok(text)
			},
			None => Err(InternalError::UnexpectedEof {
				offset: self.buffer.len(),
				needed: 1,
			}),
		}
	}
}

/// The closed set of numeric types a [`Hole`] can be reserved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
	/// 8-bit unsigned
	U8,
	/// 8-bit signed
	I8,
	/// 16-bit unsigned
	U16,
	/// 16-bit signed
	I16,
	/// 32-bit unsigned
	U32,
	/// 32-bit signed
	I32,
	/// 64-bit unsigned
	U64,
	/// 64-bit signed
	I64,
	/// 32-bit float
	F32,
	/// 64-bit float
	F64,
}

impl ScalarKind {
	/// Encoded width of this kind, in bytes.
	pub const fn width(self) -> usize {
		match self {
			ScalarKind::U8 | ScalarKind::I8 => 1,
			ScalarKind::U16 | ScalarKind::I16 => 2,
			ScalarKind::U32 | ScalarKind::I32 | ScalarKind::F32 => 4,
			ScalarKind::U64 | ScalarKind::I64 | ScalarKind::F64 => 8,
		}
	}
}

/// A numeric value paired with its width/type tag, used to fill a [`Hole`].
///
/// This is the closed-union rendition of an "any number" parameter: every
/// representable value has exactly one encoding, matched exhaustively, so the
/// only runtime failure left is filling a hole with a differently-tagged
/// scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scalar {
	/// 8-bit unsigned
	U8(u8),
	/// 8-bit signed
	I8(i8),
	/// 16-bit unsigned
	U16(u16),
	/// 16-bit signed
	I16(i16),
	/// 32-bit unsigned
	U32(u32),
	/// 32-bit signed
	I32(i32),
	/// 64-bit unsigned
	U64(u64),
	/// 64-bit signed
	I64(i64),
	/// 32-bit float
	F32(f32),
	/// 64-bit float
	F64(f64),
}

impl Scalar {
	/// The width/type tag of this value.
	pub const fn kind(&self) -> ScalarKind {
		match self {
			Scalar::U8(_) => ScalarKind::U8,
			Scalar::I8(_) => ScalarKind::I8,
			Scalar::U16(_) => ScalarKind::U16,
			Scalar::I16(_) => ScalarKind::I16,
			Scalar::U32(_) => ScalarKind::U32,
			Scalar::I32(_) => ScalarKind::I32,
			Scalar::U64(_) => ScalarKind::U64,
			Scalar::I64(_) => ScalarKind::I64,
			Scalar::F32(_) => ScalarKind::F32,
			Scalar::F64(_) => ScalarKind::F64,
		}
	}
}

/// A handle to a reserved span inside a [`ByteWriter`], produced by
/// [`ByteWriter::hole`] and consumed by [`ByteWriter::fill`].
#[derive(Debug, Clone, Copy)]
pub struct Hole {
	position: usize,
	kind: ScalarKind,
}

/// A growable byte sink with an explicit write position.
///
/// The position tracks the end of the buffer during normal forward writing;
/// only [`fill`](ByteWriter::fill) ever moves it backwards, and it restores
/// the position to wherever writing had most recently reached before
/// returning.
#[derive(Debug, Default)]
pub struct ByteWriter {
	buffer: Vec<u8>,
	position: usize,
}

macro_rules! write_le {
	($(#[$doc:meta] $name:ident: $ty:ty),* $(,)?) => {
		$(
			#[$doc]
			pub fn $name(&mut self, value: $ty) {
				self.write_bytes(&value.to_le_bytes());
			}
		)*
	};
}

impl ByteWriter {
	/// Construct a new, empty writer.
	pub fn new() -> ByteWriter {
		ByteWriter::default()
	}

	/// Current write position, in bytes from the start of the buffer.
	#[inline(always)]
	pub fn position(&self) -> usize {
		self.position
	}

	/// Total number of bytes written so far.
	#[inline(always)]
	pub fn len(&self) -> usize {
		self.buffer.len()
	}

	/// Whether nothing has been written yet.
	#[inline(always)]
	pub fn is_empty(&self) -> bool {
		self.buffer.is_empty()
	}

	/// Consume the writer and return the underlying buffer.
	pub fn into_inner(self) -> Vec<u8> {
		self.buffer
	}

	/// A view of everything written so far.
	pub fn as_slice(&self) -> &[u8] {
		&self.buffer
	}

	/// Write `bytes` at the current position, overwriting in place when the
	/// position sits inside the buffer and appending past its end.
	pub fn write_bytes(&mut self, bytes: &[u8]) {
		let end = self.position + bytes.len();
		if end > self.buffer.len() {
			self.buffer.resize(end, 0);
		}

		self.buffer[self.position..end].copy_from_slice(bytes);
		self.position = end;
	}

	/// Write a single byte.
	pub fn write_u8(&mut self, value: u8) {
		self.write_bytes(&[value]);
	}

	/// Write a single signed byte.
	pub fn write_i8(&mut self, value: i8) {
		self.write_u8(value as u8);
	}

	write_le! {
		/// Write a `u16` as 2 little-endian bytes.
		write_u16: u16,
		/// Write an `i16` as 2 little-endian bytes.
		write_i16: i16,
		/// Write a `u32` as 4 little-endian bytes.
		write_u32: u32,
		/// Write an `i32` as 4 little-endian bytes.
		write_i32: i32,
		/// Write a `u64` as 8 little-endian bytes.
		write_u64: u64,
		/// Write an `i64` as 8 little-endian bytes.
		write_i64: i64,
		/// Write an `f32` as 4 little-endian bytes.
		write_f32: f32,
		/// Write an `f64` as 8 little-endian bytes.
		write_f64: f64,
	}

	/// Write `text` as UTF-8 bytes, with no terminator.
	pub fn write_text(&mut self, text: &str) {
		self.write_bytes(text.as_bytes());
	}

	/// Write `text` as UTF-8 bytes followed by a single zero byte.
	pub fn write_cstring(&mut self, text: &str) {
		self.write_bytes(text.as_bytes());
		self.write_u8(0);
	}

	/// Write `count` copies of `value`.
	pub fn write_fill(&mut self, count: usize, value: u8) {
		// Overwrites when inside the buffer, same as write_bytes
		for _ in 0..count {
			self.write_u8(value);
		}
	}

	/// Write `count` zero bytes. Used for the reserved fields of an entry.
	pub fn write_zeros(&mut self, count: usize) {
		self.write_fill(count, 0);
	}

	/// Encode `value` at the width its tag declares, little-endian.
	pub fn write_scalar(&mut self, value: Scalar) {
		match value {
			Scalar::U8(v) => self.write_u8(v),
			Scalar::I8(v) => self.write_i8(v),
			Scalar::U16(v) => self.write_u16(v),
			Scalar::I16(v) => self.write_i16(v),
			Scalar::U32(v) => self.write_u32(v),
			Scalar::I32(v) => self.write_i32(v),
			Scalar::U64(v) => self.write_u64(v),
			Scalar::I64(v) => self.write_i64(v),
			Scalar::F32(v) => self.write_f32(v),
			Scalar::F64(v) => self.write_f64(v),
		}
	}

	/// Reserve space for a numeric field whose value is not yet known.
	///
	/// Records the current position, writes `kind.width()` zero bytes and
	/// returns a [`Hole`] bound to that position and type tag. Writing then
	/// continues normally; once the value is computed, pass the handle to
	/// [`fill`](ByteWriter::fill).
	pub fn hole(&mut self, kind: ScalarKind) -> Hole {
		let position = self.position;
		self.write_zeros(kind.width());

		Hole { position, kind }
	}

	/// Retroactively fill a reserved span with `value`.
	///
	/// Repositions to the hole, overwrites the placeholder bytes with the
	/// encoded value, then restores the position to wherever writing had most
	/// recently reached. Any number of bytes may have been written between
	/// [`hole`](ByteWriter::hole) and this call.
	///
	/// ### Errors
	/// [`UnsupportedType`](InternalError::UnsupportedType) when `value`'s tag
	/// differs from the one the hole was reserved with.
	pub fn fill(&mut self, hole: Hole, value: Scalar) -> InternalResult {
		if value.kind() != hole.kind {
			return Err(InternalError::UnsupportedType {
				expected: hole.kind,
				found: value.kind(),
			});
		}

		let jump = self.position;
		self.position = hole.position;
		self.write_scalar(value);
		self.position = jump;

		Ok(())
	}
}
