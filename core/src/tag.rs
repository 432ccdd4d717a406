use std::fmt::{
	Debug,
	Display,
	Formatter,
	self
};

use crate::error::CodecError;

/// A 4-character chunk identifier in its logical (readable) order.
///
/// On disk the same four bytes are stored reversed, so `MVER` appears as `REVM`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag([u8; 4]);

impl Tag {
	pub const fn new(logical: [u8; 4]) -> Tag {
		Tag(logical)
	}

	/// Builds a tag from the bytes as they appear in a file
	pub const fn from_disk(raw: [u8; 4]) -> Tag {
		Tag([raw[3], raw[2], raw[1], raw[0]])
	}

	/// Returns the bytes in on-disk order
	pub const fn to_disk(self) -> [u8; 4] {
		let b = self.0;
		[b[3], b[2], b[1], b[0]]
	}

	pub const fn as_bytes(&self) -> &[u8; 4] {
		&self.0
	}
}

impl TryFrom<&str> for Tag {
	type Error = CodecError;

	/// Accepts exactly 4 printable ASCII characters
	fn try_from(s: &str) -> Result<Tag, CodecError> {
		let b = s.as_bytes();
		if s.chars().count() != 4 || !b.iter().all(|c| c.is_ascii_graphic() || *c == b' ') {
			return Err(CodecError::InvalidTagLength(s.to_string()));
		}

		Ok(Tag([b[0], b[1], b[2], b[3]]))
	}
}

impl Display for Tag {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		for b in self.as_bytes().iter() {
			write!(f, "{}", *b as char)?;
		}

		Ok(())
	}
}

impl Debug for Tag {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "Tag({})", self)
	}
}
