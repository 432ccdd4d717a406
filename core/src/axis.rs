//! Axis conventions for vectors moving between file storage and memory.
//!
//! Files store positions Z-up; the in-memory convention is Y-up. Every transform here
//! is a signed permutation of components, so conversions are exact and invertible.

use ultraviolet::vec::Vec3;

use crate::error::CodecError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum AxisConfig {
	/// Stored order, no remap
	Native = 0,
	YUp,
	ZUp,
}

impl AxisConfig {
	/// Target used when reading vectors out of a file
	pub const DECODE_DEFAULT: AxisConfig = AxisConfig::YUp;
	/// Target used when writing vectors into a file
	pub const ENCODE_DEFAULT: AxisConfig = AxisConfig::ZUp;
}

impl Default for AxisConfig {
	fn default() -> Self {
		AxisConfig::DECODE_DEFAULT
	}
}

impl TryFrom<u32> for AxisConfig {
	type Error = CodecError;

	fn try_from(value: u32) -> Result<AxisConfig, CodecError> {
		match value {
			0 => Ok(AxisConfig::Native),
			1 => Ok(AxisConfig::YUp),
			2 => Ok(AxisConfig::ZUp),
			_ => Err(CodecError::UnsupportedAxisConfiguration(value)),
		}
	}
}

/// Maps a vector as stored in a file into the requested configuration
pub fn from_file(v: Vec3, axis: AxisConfig) -> Vec3 {
	match axis {
		AxisConfig::Native => v,
		AxisConfig::YUp => Vec3::new(v.x, v.z, -v.y),
		AxisConfig::ZUp => Vec3::new(v.x, -v.z, v.y),
	}
}

/// Maps an in-memory vector into the field order written for the requested storage target
pub fn to_file(v: Vec3, axis: AxisConfig) -> Vec3 {
	match axis {
		AxisConfig::Native | AxisConfig::YUp => v,
		AxisConfig::ZUp => Vec3::new(v.x, -v.z, v.y),
	}
}

/// Converts a vector between two conventions. Native is treated as identity against
/// either up-axis convention.
pub fn convert(v: Vec3, from: AxisConfig, to: AxisConfig) -> Vec3 {
	match (from, to) {
		(AxisConfig::YUp, AxisConfig::ZUp) => Vec3::new(v.x, -v.z, v.y),
		(AxisConfig::ZUp, AxisConfig::YUp) => Vec3::new(v.x, v.z, -v.y),
		_ => v,
	}
}
