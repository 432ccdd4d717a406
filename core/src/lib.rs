pub mod axis;

#[cfg(feature = "chunk")]
pub mod chunk;

pub mod error;
pub mod geom;

#[cfg(feature = "io_ext")]
pub mod io_ext;

pub mod tag;

pub use error::CodecError;
pub use tag::Tag;

/// Width of a tag field on disk
pub const TAG_SIZE: u64 = 4;
