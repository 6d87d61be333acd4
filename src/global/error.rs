use std::{io, path::PathBuf};
use thiserror::Error;

use super::cursor::ScalarKind;

/// Internal `Result` type alias used by `savpak`. Basically equal to: `Result<T, InternalError>`
pub type InternalResult<T = ()> = Result<T, InternalError>;

/// All errors manifestable within `savpak` collected into a neat enum
#[derive(Debug, Error)]
pub enum InternalError {
	/// thin wrapper over [io::Error](std::io::Error), captures all IO errors
	#[error("[SavpakError::IOError] {0}")]
	IOError(#[from] io::Error),
	/// a cursor read ran past the end of the available bytes
	#[error("[SavpakError::UnexpectedEof] needed {needed} more byte(s) at offset {offset}, but the source ended")]
	UnexpectedEof {
		/// cursor position at which the read was attempted
		offset: usize,
		/// number of bytes the read still required
		needed: usize,
	},
	/// an entry's compressed payload could not be decompressed, or its
	/// decompressed length disagrees with the stored `uncompressed_size`
	#[error("[SavpakError::CorruptPayload] {0}")]
	CorruptPayload(String),
	/// the archive header declared more entries than the source actually holds
	#[error("[SavpakError::TruncatedArchive] archive declared {declared} entries but ended after {parsed}")]
	TruncatedArchive {
		/// entry count read from the archive header
		declared: u32,
		/// number of entries fully parsed before the source ended
		parsed: u32,
	},
	/// a [`Hole`](crate::prelude::Hole) was filled with a scalar of a different type than it was reserved for; a programming error, not a data error
	#[error("[SavpakError::UnsupportedType] hole reserved for {expected:?} cannot be filled with {found:?}")]
	UnsupportedType {
		/// scalar kind the hole was reserved for
		expected: ScalarKind,
		/// scalar kind that was passed to `fill`
		found: ScalarKind,
	},
	/// the CLI input path is neither an existing `.sav` file nor a directory
	#[error("[SavpakError::InvalidInputPath] {0:?} is neither a .sav archive nor a directory")]
	InvalidInputPath(PathBuf),
}
