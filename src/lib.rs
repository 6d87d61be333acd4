#![deny(missing_docs)]

/*!
A converter between `.sav` save archives and plain directory trees.

A `.sav` archive is a flat container: a `u32` entry count followed by that
many records, each a relative path plus an individually zlib-compressed
payload. This crate owns the binary serialization layer; the bundled `savpak`
binary is the thin CLI/filesystem glue around it.

```
use savpak::prelude::*;

let mut leaves = [
	Leaf::new(b"Hello" as &[u8], "a.txt"),
	Leaf::new(b"\x00\x01\x02" as &[u8], "sub/b.bin"),
];

let mut target = Vec::new();
dump(&mut target, &mut leaves).unwrap();

// roundtrip
let archive = Archive::from_bytes(&target).unwrap();
assert_eq!(archive.entries()[0].data, b"Hello");
```
*/

/// All tests are included in this module.
mod tests;

pub(crate) mod global;
pub(crate) mod loader;
pub(crate) mod writer;

/// File extension identifying an archive: `.sav`
pub const EXTENSION: &str = "sav";

/// Value written as the trailer byte of every freshly packed entry. The
/// trailer is read back but never validated.
pub const TRAILER: u8 = 1;

/// Width of each of the two reserved fields in an entry, always written as
/// zero and skipped on read.
pub const RESERVED_LENGTH: usize = 4;

/// Consolidated crate imports.
pub mod prelude {
	pub use crate::global::{
		compressor::Compressor,
		cursor::{ByteReader, ByteWriter, Hole, Scalar, ScalarKind},
		entry::Entry,
		error::{InternalError, InternalResult},
	};
	pub use crate::loader::Archive;
	pub use crate::writer::{dump, Leaf};
}

/// Archive reading logic, [`Archive`](crate::loader::Archive).
pub mod archive {
	pub use crate::loader::Archive;
	pub use crate::global::{entry::Entry, error::*};
}

/// Archive creation logic, [`dump`](crate::writer::dump) and [`Leaf`](crate::writer::Leaf).
pub mod builder {
	pub use crate::writer::{dump, Leaf};
	pub use crate::global::error::*;
}
