//! Chunks of the terrain tile (`.adt`) format.
//!
//! Every type here implements [`Chunk`](rgk_core::chunk::Chunk), so a tile is read one
//! chunk at a time with [`read_chunk`](rgk_core::chunk::read_chunk) or through a
//! [`ChunkIndex`](rgk_core::chunk::ChunkIndex).

pub mod adt;
pub mod placement;

use thiserror::Error;

use rgk_core::{
	CodecError,
	Tag
};

#[derive(Error, Debug)]
pub enum AdtImportError {
	#[error("Chunk codec error")]
	Codec {
		#[from]
		source: CodecError,
	},
	#[error("{tag} payload must be {expected} bytes, found {size}")]
	PayloadSize {
		tag: Tag,
		size: usize,
		expected: usize,
	},
	#[error("{tag} payload of {size} bytes is not a multiple of {record}")]
	RecordSize {
		tag: Tag,
		size: usize,
		record: usize,
	},
}

impl From<std::io::Error> for AdtImportError {
	fn from(source: std::io::Error) -> Self {
		AdtImportError::Codec {
			source: source.into(),
		}
	}
}

/// Checks a fixed-size payload
pub(crate) fn expect_size(tag: Tag, payload: &[u8], expected: usize) -> Result<(), AdtImportError> {
	if payload.len() != expected {
		return Err(AdtImportError::PayloadSize {
			tag: tag,
			size: payload.len(),
			expected: expected,
		});
	}

	Ok(())
}

/// Checks a payload made of whole records and returns the record count
pub(crate) fn record_count(tag: Tag, payload: &[u8], record: usize) -> Result<usize, AdtImportError> {
	if payload.len() % record != 0 {
		return Err(AdtImportError::RecordSize {
			tag: tag,
			size: payload.len(),
			record: record,
		});
	}

	Ok(payload.len() / record)
}
