pub mod compressor;
pub mod cursor;
pub mod entry;
pub mod error;
