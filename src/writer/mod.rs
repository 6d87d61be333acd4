use std::io::{Read, Write};

mod leaf;

pub use leaf::Leaf;

use crate::global::{cursor::ByteWriter, error::InternalResult};

/// Serializes every [`Leaf`] in the queue and writes the finished archive out
/// into the target. Returns the number of bytes written.
///
/// The archive is built fully in memory first: a `u32` entry count, then each
/// leaf as one record, in slice order. Ordering is the caller's; no sorting is
/// applied here.
pub fn dump<W: Write, R: Read>(mut target: W, leaves: &mut [Leaf<R>]) -> InternalResult<u64> {
	let mut writer = ByteWriter::new();
	writer.write_u32(leaves.len() as u32);

	for leaf in leaves.iter_mut() {
		let entry = leaf.process()?;
		entry.to_writer(&mut writer)?;
	}

	let buffer = writer.into_inner();
	target.write_all(&buffer)?;

	Ok(buffer.len() as u64)
}
