use ultraviolet::vec::Vec3;

/// Orientation stored as pitch/yaw/roll in `x`/`y`/`z`, never axis-remapped
pub type Rotator = Vec3;

/// Row-major 3×3 grid of signed 16-bit values
pub type Grid3x3 = [[i16; 3]; 3];

/// Axis-aligned bounding box
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AABox {
	pub min: Vec3,
	pub max: Vec3,
}

impl AABox {
	pub fn new(min: Vec3, max: Vec3) -> AABox {
		AABox {
			min: min,
			max: max,
		}
	}
}

impl Default for AABox {
	fn default() -> Self {
		Self {
			min: Vec3::zero(),
			max: Vec3::zero(),
		}
	}
}
