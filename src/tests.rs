#![cfg(test)]
// This is meant to mirror as closely as possible, how users should use the crate

use crate::prelude::*;

// Payloads from the reference scenario: a.txt -> "Hello", sub/b.bin -> 00 01 02
const HELLO: &[u8] = b"Hello";
const BLOB: &[u8] = &[0x00, 0x01, 0x02];

#[test]
fn cursor_fixed_width_reads() -> InternalResult {
	let mut writer = ByteWriter::new();
	writer.write_u8(0xAB);
	writer.write_i8(-1);
	writer.write_u16(0xBEEF);
	writer.write_u32(0xDEAD_BEEF);
	writer.write_u64(0x0123_4567_89AB_CDEF);
	writer.write_i32(-42);
	writer.write_f32(1.5);
	writer.write_f64(-2.25);

	let buffer = writer.into_inner();
	let mut reader = ByteReader::new(&buffer);

	assert_eq!(reader.read_u8()?, 0xAB);
	assert_eq!(reader.read_i8()?, -1);
	assert_eq!(reader.read_u16()?, 0xBEEF);
	assert_eq!(reader.read_u32()?, 0xDEAD_BEEF);
	assert_eq!(reader.read_u64()?, 0x0123_4567_89AB_CDEF);
	assert_eq!(reader.read_i32()?, -42);
	assert_eq!(reader.read_f32()?, 1.5);
	assert_eq!(reader.read_f64()?, -2.25);
	assert!(reader.is_empty());

	Ok(())
}

#[test]
fn cursor_big_endian_reads() -> InternalResult {
	let buffer = [0xDE, 0xAD, 0xBE, 0xEF, 0xFF, 0xFF, 0xFF, 0xD6];
	let mut reader = ByteReader::new(&buffer);

	assert_eq!(reader.read_u32_be()?, 0xDEAD_BEEF);
	assert_eq!(reader.read_i32_be()?, -42);

	Ok(())
}

#[test]
fn cursor_rejects_reads_past_the_end() {
	let mut reader = ByteReader::new(&[1, 2, 3]);

	match reader.read_u32() {
		Err(InternalError::UnexpectedEof { offset, needed }) => {
			assert_eq!(offset, 0);
			assert_eq!(needed, 1);
		},
		other => panic!("expected UnexpectedEof, got {:?}", other),
	}

	// The failed read must not have consumed anything
	assert_eq!(reader.remaining(), 3);
	assert_eq!(reader.read_bytes(3).unwrap(), &[1, 2, 3]);
}

#[test]
fn cursor_cstring_roundtrip() -> InternalResult {
	let mut writer = ByteWriter::new();
	writer.write_cstring("savegame");
	writer.write_u8(0xFF);

	let buffer = writer.into_inner();
	let mut reader = ByteReader::new(&buffer);

	assert_eq!(reader.read_cstring()?, "savegame");
	// The zero byte was consumed along with the text
	assert_eq!(reader.read_u8()?, 0xFF);

	Ok(())
}

#[test]
fn cursor_cstring_without_terminator() {
	let mut reader = ByteReader::new(b"no terminator here");

	assert!(matches!(
		reader.read_cstring(),
		Err(InternalError::UnexpectedEof { .. })
	));
}

#[test]
fn cursor_text_uses_byte_lengths() -> InternalResult {
	// "naïve" is 5 chars but 6 bytes in UTF-8
	let mut writer = ByteWriter::new();
	writer.write_text("naïve");
	assert_eq!(writer.len(), 6);

	let buffer = writer.into_inner();
	let mut reader = ByteReader::new(&buffer);
	assert_eq!(reader.read_text(6)?, "naïve");

	Ok(())
}

#[test]
fn hole_fill_survives_interleaved_writes() -> InternalResult {
	let mut writer = ByteWriter::new();
	writer.write_text("prefix");

	let hole = writer.hole(ScalarKind::U32);
	assert_eq!(writer.position(), 10);

	// Pile plenty of bytes on top before the value is known
	for chunk in 0..64u8 {
		writer.write_fill(16, chunk);
	}
	writer.write_cstring("suffix");

	let end = writer.position();
	writer.fill(hole, Scalar::U32(0xCAFE_BABE))?;

	// Position restored to where writing had reached, not to the hole
	assert_eq!(writer.position(), end);

	let buffer = writer.into_inner();
	let mut reader = ByteReader::new(&buffer);
	assert_eq!(reader.read_text(6)?, "prefix");
	assert_eq!(reader.read_u32()?, 0xCAFE_BABE);

	Ok(())
}

#[test]
fn hole_fill_rejects_mismatched_scalar() {
	let mut writer = ByteWriter::new();
	let hole = writer.hole(ScalarKind::U32);

	match writer.fill(hole, Scalar::U16(7)) {
		Err(InternalError::UnsupportedType { expected, found }) => {
			assert_eq!(expected, ScalarKind::U32);
			assert_eq!(found, ScalarKind::U16);
		},
		other => panic!("expected UnsupportedType, got {:?}", other),
	}
}

#[test]
fn hole_widths_match_scalar_kinds() -> InternalResult {
	let mut writer = ByteWriter::new();

	let narrow = writer.hole(ScalarKind::U8);
	let wide = writer.hole(ScalarKind::F64);
	assert_eq!(writer.len(), 9);

	writer.fill(narrow, Scalar::U8(3))?;
	writer.fill(wide, Scalar::F64(0.5))?;

	let buffer = writer.into_inner();
	let mut reader = ByteReader::new(&buffer);
	assert_eq!(reader.read_u8()?, 3);
	assert_eq!(reader.read_f64()?, 0.5);

	Ok(())
}

#[test]
fn compressor_roundtrip() -> InternalResult {
	let original: Vec<u8> = (0..4096u32).map(|i| (i % 251) as u8).collect();

	let mut compressed = Vec::new();
	Compressor::new(original.as_slice()).compress(&mut compressed)?;

	let mut recovered = Vec::new();
	Compressor::new(compressed.as_slice()).decompress(&mut recovered)?;

	assert_eq!(recovered, original);
	Ok(())
}

#[test]
fn compressor_roundtrip_empty() -> InternalResult {
	let mut compressed = Vec::new();
	Compressor::new(&[] as &[u8]).compress(&mut compressed)?;

	let mut recovered = Vec::new();
	Compressor::new(compressed.as_slice()).decompress(&mut recovered)?;

	assert!(recovered.is_empty());
	Ok(())
}

#[test]
fn compressor_rejects_garbage() {
	let mut output = Vec::new();
	let result = Compressor::new(b"definitely not a zlib stream" as &[u8]).decompress(&mut output);

	assert!(matches!(result, Err(InternalError::CorruptPayload(_))));
}

#[test]
fn entry_length_accounting() -> InternalResult {
	let entry = Entry::new("sub/b.bin", BLOB.to_vec());

	let mut writer = ByteWriter::new();
	entry.to_writer(&mut writer)?;
	let buffer = writer.into_inner();

	// Walk the record by hand and check every size field against reality
	let mut reader = ByteReader::new(&buffer);
	let name_length = reader.read_u32()?;
	assert_eq!(name_length, 9);
	assert_eq!(reader.read_text(name_length as usize)?, "sub/b.bin");

	let compressed_size = reader.read_u32()?;
	assert_eq!(reader.read_bytes(4)?, &[0, 0, 0, 0]);
	let uncompressed_size = reader.read_u32()?;
	assert_eq!(reader.read_bytes(4)?, &[0, 0, 0, 0]);
	assert_eq!(uncompressed_size as usize, BLOB.len());

	let payload = reader.read_bytes(compressed_size as usize)?;
	let mut recovered = Vec::new();
	Compressor::new(payload).decompress(&mut recovered)?;
	assert_eq!(recovered, BLOB);

	assert_eq!(reader.read_u8()?, crate::TRAILER);
	assert!(reader.is_empty());

	Ok(())
}

#[test]
fn entry_name_length_is_byte_count() -> InternalResult {
	// A multi-byte name: 9 chars, 11 bytes
	let entry = Entry::new("naïve.säv", HELLO.to_vec());

	let mut writer = ByteWriter::new();
	entry.to_writer(&mut writer)?;
	let buffer = writer.into_inner();

	let mut reader = ByteReader::new(&buffer);
	assert_eq!(reader.read_u32()?, "naïve.säv".len() as u32);

	// And the same name comes back out
	let mut reader = ByteReader::new(&buffer);
	let parsed = Entry::from_reader(&mut reader)?;
	assert_eq!(parsed.id, "naïve.säv");

	Ok(())
}

#[test]
fn entry_size_mismatch_is_corrupt() -> InternalResult {
	let mut compressed = Vec::new();
	Compressor::new(HELLO).compress(&mut compressed)?;

	// A record claiming the payload inflates to 99 bytes
	let mut writer = ByteWriter::new();
	writer.write_u32(5);
	writer.write_text("a.txt");
	writer.write_u32(compressed.len() as u32);
	writer.write_zeros(crate::RESERVED_LENGTH);
	writer.write_u32(99);
	writer.write_zeros(crate::RESERVED_LENGTH);
	writer.write_bytes(&compressed);
	writer.write_u8(crate::TRAILER);

	let buffer = writer.into_inner();
	let result = Entry::from_reader(&mut ByteReader::new(&buffer));

	assert!(matches!(result, Err(InternalError::CorruptPayload(_))));
	Ok(())
}

#[test]
fn archive_roundtrip() -> InternalResult {
	let mut leaves = [Leaf::new(HELLO, "a.txt"), Leaf::new(BLOB, "sub/b.bin")];

	let mut target = Vec::new();
	let written = dump(&mut target, &mut leaves)?;
	assert_eq!(written as usize, target.len());

	// The header counts both entries
	assert_eq!(&target[..4], &[2, 0, 0, 0]);

	let archive = Archive::from_bytes(&target)?;
	assert_eq!(archive.len(), 2);

	let entries = archive.entries();
	assert_eq!(entries[0].id, "a.txt");
	assert_eq!(entries[0].data, HELLO);
	assert_eq!(entries[0].trailer, crate::TRAILER);
	assert_eq!(entries[1].id, "sub/b.bin");
	assert_eq!(entries[1].data, BLOB);

	Ok(())
}

#[test]
fn archive_preserves_order() -> InternalResult {
	// Deliberately unsorted
	let mut leaves = [
		Leaf::new(BLOB, "zzz"),
		Leaf::new(HELLO, "aaa"),
		Leaf::new(HELLO, "mmm"),
	];

	let mut target = Vec::new();
	dump(&mut target, &mut leaves)?;

	let archive = Archive::from_bytes(&target)?;
	let ids: Vec<&str> = archive.entries().iter().map(|e| e.id.as_str()).collect();
	assert_eq!(ids, ["zzz", "aaa", "mmm"]);

	Ok(())
}

#[test]
fn archive_empty() -> InternalResult {
	let mut leaves: [Leaf<&[u8]>; 0] = [];

	let mut target = Vec::new();
	dump(&mut target, &mut leaves)?;
	assert_eq!(target, [0, 0, 0, 0]);

	let archive = Archive::from_bytes(&target)?;
	assert!(archive.is_empty());

	Ok(())
}

#[test]
fn archive_trailer_is_not_validated() -> InternalResult {
	let mut leaves = [Leaf::new(HELLO, "a.txt")];
	let mut target = Vec::new();
	dump(&mut target, &mut leaves)?;

	// Stomp the trailer, the very last byte of the stream
	*target.last_mut().unwrap() = 0;

	let archive = Archive::from_bytes(&target)?;
	assert_eq!(archive.entries()[0].trailer, 0);
	assert_eq!(archive.entries()[0].data, HELLO);

	Ok(())
}

#[test]
fn archive_detects_truncation() -> InternalResult {
	let mut leaves = [Leaf::new(HELLO, "a.txt")];
	let mut target = Vec::new();
	dump(&mut target, &mut leaves)?;

	// Claim three entries while only one follows
	target[..4].copy_from_slice(&3u32.to_le_bytes());

	match Archive::from_bytes(&target) {
		Err(InternalError::TruncatedArchive { declared, parsed }) => {
			assert_eq!(declared, 3);
			assert_eq!(parsed, 1);
		},
		other => panic!("expected TruncatedArchive, got {:?}", other.map(|a| a.len())),
	}

	Ok(())
}

#[test]
fn archive_rejects_huge_declared_count() {
	// Four 0xFF bytes: a count of u32::MAX with no entries behind it. This
	// must come back as a truncation error, not balloon into an allocation
	// sized by the header.
	match Archive::from_bytes(&[0xFF; 4]) {
		Err(InternalError::TruncatedArchive { declared, parsed }) => {
			assert_eq!(declared, u32::MAX);
			assert_eq!(parsed, 0);
		},
		other => panic!("expected TruncatedArchive, got {:?}", other.map(|a| a.len())),
	}
}

#[test]
fn archive_truncated_mid_entry() -> InternalResult {
	let mut leaves = [Leaf::new(HELLO, "a.txt")];
	let mut target = Vec::new();
	dump(&mut target, &mut leaves)?;

	// Cut the record short, but leave the count intact
	target.truncate(target.len() - 4);

	assert!(matches!(
		Archive::from_bytes(&target),
		Err(InternalError::TruncatedArchive { declared: 1, parsed: 0 })
	));

	Ok(())
}

#[test]
fn filesystem_roundtrip() -> anyhow::Result<()> {
	use std::fs::{self, File};

	let source = tempfile::tempdir()?;
	fs::write(source.path().join("a.txt"), HELLO)?;
	fs::create_dir(source.path().join("sub"))?;
	fs::write(source.path().join("sub").join("b.bin"), BLOB)?;

	// Pack the tree the way the CLI does
	let archive_dir = tempfile::tempdir()?;
	let archive_path = archive_dir.path().join("roundtrip.sav");

	let mut leaves = vec![
		Leaf::new(File::open(source.path().join("a.txt"))?, "a.txt"),
		Leaf::new(File::open(source.path().join("sub").join("b.bin"))?, "sub/b.bin"),
	];
	dump(File::create(&archive_path)?, &mut leaves)?;

	// Extract into a fresh directory, creating parents ahead of each write
	let archive = Archive::new(File::open(&archive_path)?)?;
	let restored = tempfile::tempdir()?;

	for entry in archive.entries() {
		let target = restored.path().join(&entry.id);
		if let Some(parent) = target.parent() {
			fs::create_dir_all(parent)?;
		}
		fs::write(&target, &entry.data)?;
	}

	assert_eq!(fs::read(restored.path().join("a.txt"))?, HELLO);
	assert_eq!(fs::read(restored.path().join("sub").join("b.bin"))?, BLOB);

	Ok(())
}
