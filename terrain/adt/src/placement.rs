use bitflags::bitflags;

use byteorder::{
	LE,
	ReadBytesExt,
	WriteBytesExt
};

use ultraviolet::vec::Vec3;

use rgk_core::{
	chunk::Chunk,
	geom::{
		AABox,
		Rotator
	},
	io_ext::{
		ReadBinExt,
		WriteBinExt
	},
	Tag
};

use crate::{
	record_count,
	AdtImportError
};

/// Fixed point scale where 1024 is 1.0
pub const SCALE_ONE: u16 = 1024;

bitflags! {
	pub struct DoodadFlags: u16 {
		const BIODOME = 1;
		const SHRUBBERY = 1 << 1;
		const UNKNOWN_0004 = 1 << 2;
		const UNKNOWN_0008 = 1 << 3;
		const LIQUID_KNOWN = 1 << 5;
		const FILE_DATA_ID = 1 << 6;
		const UNKNOWN_0100 = 1 << 8;
		const ACCEPT_PROJ_TEXTURES = 1 << 12;
	}

	pub struct WmoFlags: u16 {
		const DESTROYABLE = 1;
		const USE_LOD = 1 << 1;
		const HAS_SCALE = 1 << 2;
		const FILE_DATA_ID = 1 << 3;
		const USE_SETS_FROM_MWDS = 1 << 7;
	}
}

/// One `MDDF` entry
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoodadPlacement {
	pub name_id: u32, // index into MMID
	pub unique_id: u32,
	pub position: Vec3,
	pub rotation: Rotator,
	pub scale: u16,
	pub flags: u16,
}

impl DoodadPlacement {
	pub const SIZE: usize = 36;

	fn read<R>(buf: &mut R) -> Result<DoodadPlacement, AdtImportError>
	where
		R: ReadBytesExt,
	{
		Ok(DoodadPlacement {
			name_id: buf.read_u32::<LE>()?,
			unique_id: buf.read_u32::<LE>()?,
			position: buf.read_position()?,
			rotation: buf.read_rotator()?,
			scale: buf.read_u16::<LE>()?,
			flags: buf.read_u16::<LE>()?,
		})
	}

	fn write<W>(&self, buf: &mut W) -> Result<(), AdtImportError>
	where
		W: WriteBytesExt,
	{
		buf.write_u32::<LE>(self.name_id)?;
		buf.write_u32::<LE>(self.unique_id)?;
		buf.write_position(self.position)?;
		buf.write_rotator(self.rotation)?;
		buf.write_u16::<LE>(self.scale)?;
		buf.write_u16::<LE>(self.flags)?;

		Ok(())
	}

	pub fn flag_set(&self) -> DoodadFlags {
		DoodadFlags::from_bits_truncate(self.flags)
	}

	pub fn scale_factor(&self) -> f32 {
		self.scale as f32 / SCALE_ONE as f32
	}
}

impl Default for DoodadPlacement {
	fn default() -> Self {
		Self {
			name_id: 0,
			unique_id: 0,
			position: Vec3::zero(),
			rotation: Rotator::zero(),
			scale: SCALE_ONE,
			flags: 0,
		}
	}
}

/// One `MODF` entry
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WmoPlacement {
	pub name_id: u32, // index into MWID
	pub unique_id: u32,
	pub position: Vec3,
	pub rotation: Rotator,
	pub extents: AABox,
	pub flags: u16,
	pub doodad_set: u16,
	pub name_set: u16,
	pub scale: u16, // only honored with WmoFlags::HAS_SCALE
}

impl WmoPlacement {
	pub const SIZE: usize = 64;

	fn read<R>(buf: &mut R) -> Result<WmoPlacement, AdtImportError>
	where
		R: ReadBytesExt,
	{
		Ok(WmoPlacement {
			name_id: buf.read_u32::<LE>()?,
			unique_id: buf.read_u32::<LE>()?,
			position: buf.read_position()?,
			rotation: buf.read_rotator()?,
			extents: buf.read_aabox()?,
			flags: buf.read_u16::<LE>()?,
			doodad_set: buf.read_u16::<LE>()?,
			name_set: buf.read_u16::<LE>()?,
			scale: buf.read_u16::<LE>()?,
		})
	}

	fn write<W>(&self, buf: &mut W) -> Result<(), AdtImportError>
	where
		W: WriteBytesExt,
	{
		buf.write_u32::<LE>(self.name_id)?;
		buf.write_u32::<LE>(self.unique_id)?;
		buf.write_position(self.position)?;
		buf.write_rotator(self.rotation)?;
		buf.write_aabox(&self.extents)?;
		buf.write_u16::<LE>(self.flags)?;
		buf.write_u16::<LE>(self.doodad_set)?;
		buf.write_u16::<LE>(self.name_set)?;
		buf.write_u16::<LE>(self.scale)?;

		Ok(())
	}

	pub fn flag_set(&self) -> WmoFlags {
		WmoFlags::from_bits_truncate(self.flags)
	}

	pub fn scale_factor(&self) -> f32 {
		if self.flag_set().contains(WmoFlags::HAS_SCALE) {
			self.scale as f32 / SCALE_ONE as f32
		} else {
			1.0
		}
	}
}

impl Default for WmoPlacement {
	fn default() -> Self {
		Self {
			name_id: 0,
			unique_id: 0,
			position: Vec3::zero(),
			rotation: Rotator::zero(),
			extents: AABox::default(),
			flags: 0,
			doodad_set: 0,
			name_set: 0,
			scale: 0,
		}
	}
}

/// `MDDF`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DoodadPlacements(pub Vec<DoodadPlacement>);

impl Chunk for DoodadPlacements {
	type Error = AdtImportError;

	const TAG: Tag = Tag::new(*b"MDDF");

	fn read_payload(mut payload: &[u8]) -> Result<DoodadPlacements, AdtImportError> {
		let count = record_count(Self::TAG, payload, DoodadPlacement::SIZE)?;

		let mut entries = Vec::with_capacity(count);
		for _ in 0..count {
			entries.push(DoodadPlacement::read(&mut payload)?);
		}

		Ok(DoodadPlacements(entries))
	}

	fn write_payload(&self) -> Result<Vec<u8>, AdtImportError> {
		let mut out: Vec<u8> = Vec::with_capacity(self.0.len() * DoodadPlacement::SIZE);
		for entry in self.0.iter() {
			entry.write(&mut out)?;
		}

		Ok(out)
	}
}

/// `MODF`
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WmoPlacements(pub Vec<WmoPlacement>);

impl Chunk for WmoPlacements {
	type Error = AdtImportError;

	const TAG: Tag = Tag::new(*b"MODF");

	fn read_payload(mut payload: &[u8]) -> Result<WmoPlacements, AdtImportError> {
		let count = record_count(Self::TAG, payload, WmoPlacement::SIZE)?;

		let mut entries = Vec::with_capacity(count);
		for _ in 0..count {
			entries.push(WmoPlacement::read(&mut payload)?);
		}

		Ok(WmoPlacements(entries))
	}

	fn write_payload(&self) -> Result<Vec<u8>, AdtImportError> {
		let mut out: Vec<u8> = Vec::with_capacity(self.0.len() * WmoPlacement::SIZE);
		for entry in self.0.iter() {
			entry.write(&mut out)?;
		}

		Ok(out)
	}
}
