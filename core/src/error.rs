use std::io;

use thiserror::Error;

use crate::tag::Tag;

#[derive(Error, Debug)]
pub enum CodecError {
	#[error("Chunk not found: {0}")]
	ChunkNotFound(Tag),
	#[error("String holds an interior NUL: {0:?}")]
	InteriorNul(String),
	#[error("I/O error")]
	IO {
		source: io::Error,
	},
	#[error("Tag must be exactly 4 printable ASCII characters: {0:?}")]
	InvalidTagLength(String),
	#[error("Payload of {0} bytes does not fit a 32-bit chunk length")]
	PayloadTooLarge(usize),
	#[error("Chunk signature mismatch: expected {expected}, found {found}")]
	SignatureMismatch {
		expected: Tag,
		found: Tag,
	},
	#[error("Character cannot be stored in a single code unit: {0:?}")]
	UnencodableChar(char),
	#[error("Unexpected end of stream")]
	UnexpectedEndOfStream,
	#[error("Unknown/unsupported axis configuration: {0}")]
	UnsupportedAxisConfiguration(u32),
}

impl From<io::Error> for CodecError {
	fn from(source: io::Error) -> Self {
		match source.kind() {
			io::ErrorKind::UnexpectedEof => CodecError::UnexpectedEndOfStream,
			_ => CodecError::IO { source },
		}
	}
}
