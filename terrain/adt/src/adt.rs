use bitflags::bitflags;

use byteorder::{
	LE,
	ReadBytesExt,
	WriteBytesExt
};

use rgk_core::{
	chunk::Chunk,
	geom::Grid3x3,
	io_ext::{
		read_cstr_list,
		ReadBinExt,
		WriteBinExt
	},
	Tag
};

use crate::{
	expect_size,
	AdtImportError
};

pub const FORMAT_VERSION: u32 = 18;

bitflags! {
	pub struct HeaderFlags: u32 {
		const HAS_FLIGHT_BOUNDS = 1;
		const NORTHREND = 1 << 1;
	}
}

/// `MVER`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Version {
	pub version: u32,
}

impl Default for Version {
	fn default() -> Self {
		Self {
			version: FORMAT_VERSION,
		}
	}
}

impl Chunk for Version {
	type Error = AdtImportError;

	const TAG: Tag = Tag::new(*b"MVER");

	fn read_payload(mut payload: &[u8]) -> Result<Version, AdtImportError> {
		expect_size(Self::TAG, payload, 4)?;

		Ok(Version {
			version: payload.read_u32::<LE>()?,
		})
	}

	fn write_payload(&self) -> Result<Vec<u8>, AdtImportError> {
		let mut out: Vec<u8> = Vec::with_capacity(4);
		out.write_u32::<LE>(self.version)?;

		Ok(out)
	}
}

/// `MHDR`: tile flags and offsets of the other top-level chunks
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Header {
	pub flags: u32, // see HeaderFlags
	pub mcin: u32,
	pub mtex: u32,
	pub mmdx: u32,
	pub mmid: u32,
	pub mwmo: u32,
	pub mwid: u32,
	pub mddf: u32,
	pub modf: u32,
	pub mfbo: u32,
	pub mh2o: u32,
	pub mtxf: u32,
	unused: [u32; 4],
}

impl Header {
	pub const SIZE: usize = 64;

	/// Known flag bits; unknown bits stay in `flags`
	pub fn flag_set(&self) -> HeaderFlags {
		HeaderFlags::from_bits_truncate(self.flags)
	}
}

impl Chunk for Header {
	type Error = AdtImportError;

	const TAG: Tag = Tag::new(*b"MHDR");

	fn read_payload(mut payload: &[u8]) -> Result<Header, AdtImportError> {
		expect_size(Self::TAG, payload, Self::SIZE)?;

		Ok(Header {
			flags: payload.read_u32::<LE>()?,
			mcin: payload.read_u32::<LE>()?,
			mtex: payload.read_u32::<LE>()?,
			mmdx: payload.read_u32::<LE>()?,
			mmid: payload.read_u32::<LE>()?,
			mwmo: payload.read_u32::<LE>()?,
			mwid: payload.read_u32::<LE>()?,
			mddf: payload.read_u32::<LE>()?,
			modf: payload.read_u32::<LE>()?,
			mfbo: payload.read_u32::<LE>()?,
			mh2o: payload.read_u32::<LE>()?,
			mtxf: payload.read_u32::<LE>()?,
			unused: [
				payload.read_u32::<LE>()?,
				payload.read_u32::<LE>()?,
				payload.read_u32::<LE>()?,
				payload.read_u32::<LE>()?,
			],
		})
	}

	fn write_payload(&self) -> Result<Vec<u8>, AdtImportError> {
		let mut out: Vec<u8> = Vec::with_capacity(Self::SIZE);

		for v in [self.flags, self.mcin, self.mtex, self.mmdx, self.mmid, self.mwmo, self.mwid,
			self.mddf, self.modf, self.mfbo, self.mh2o, self.mtxf].iter().chain(self.unused.iter())
		{
			out.write_u32::<LE>(*v)?;
		}

		Ok(out)
	}
}

/// `MMDX`: doodad model file names
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelNames(pub Vec<String>);

impl Chunk for ModelNames {
	type Error = AdtImportError;

	const TAG: Tag = Tag::new(*b"MMDX");

	fn read_payload(payload: &[u8]) -> Result<ModelNames, AdtImportError> {
		Ok(ModelNames(read_cstr_list(payload)?))
	}

	fn write_payload(&self) -> Result<Vec<u8>, AdtImportError> {
		let mut out: Vec<u8> = vec![];
		out.write_cstr_list(self.0.as_slice())?;

		Ok(out)
	}
}

/// `MWMO`: world map object file names
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WmoNames(pub Vec<String>);

impl Chunk for WmoNames {
	type Error = AdtImportError;

	const TAG: Tag = Tag::new(*b"MWMO");

	fn read_payload(payload: &[u8]) -> Result<WmoNames, AdtImportError> {
		Ok(WmoNames(read_cstr_list(payload)?))
	}

	fn write_payload(&self) -> Result<Vec<u8>, AdtImportError> {
		let mut out: Vec<u8> = vec![];
		out.write_cstr_list(self.0.as_slice())?;

		Ok(out)
	}
}

/// `MFBO`: flight ceiling and floor planes
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FlightBounds {
	pub maximum: Grid3x3,
	pub minimum: Grid3x3,
}

impl FlightBounds {
	pub const SIZE: usize = 36;
}

impl Chunk for FlightBounds {
	type Error = AdtImportError;

	const TAG: Tag = Tag::new(*b"MFBO");

	fn read_payload(mut payload: &[u8]) -> Result<FlightBounds, AdtImportError> {
		expect_size(Self::TAG, payload, Self::SIZE)?;

		Ok(FlightBounds {
			maximum: payload.read_grid3x3()?,
			minimum: payload.read_grid3x3()?,
		})
	}

	fn write_payload(&self) -> Result<Vec<u8>, AdtImportError> {
		let mut out: Vec<u8> = Vec::with_capacity(Self::SIZE);
		out.write_grid3x3(&self.maximum)?;
		out.write_grid3x3(&self.minimum)?;

		Ok(out)
	}
}

#[cfg(test)]
mod tests {
	use std::io::Cursor;

	use rgk_core::{
		chunk::{
			read_chunk,
			write_chunk
		},
		CodecError
	};

	use super::*;

	#[test]
	fn test_version() {
		let mut buf = Cursor::new(Vec::<u8>::new());
		write_chunk(&Version::default(), &mut buf).unwrap();
		assert_eq!(b"REVM\x04\x00\x00\x00\x12\x00\x00\x00", buf.get_ref().as_slice());
		assert_eq!(18, read_chunk::<Version, _>(&mut buf).unwrap().version);
	}

	#[test]
	fn test_version_size() {
		assert!(matches!(Version::read_payload(&[18, 0, 0, 0, 0]),
			Err(AdtImportError::PayloadSize { size: 5, expected: 4, .. })));
	}

	#[test]
	fn test_header_flags() {
		let mut payload = vec![0u8; Header::SIZE];
		payload[0] = 0b101;
		payload[60] = 9;

		let header = Header::read_payload(&payload).unwrap();
		assert_eq!(5, header.flags);
		assert_eq!(HeaderFlags::HAS_FLIGHT_BOUNDS, header.flag_set());
		assert_eq!(payload, header.write_payload().unwrap());
	}

	#[test]
	fn test_names() {
		let names = ModelNames(vec!["world/tree01.m2".to_string(), "world/rock.m2".to_string()]);
		let payload = names.write_payload().unwrap();
		assert_eq!(b"world/tree01.m2\x00world/rock.m2\x00", payload.as_slice());
		assert_eq!(names, ModelNames::read_payload(&payload).unwrap());

		assert!(matches!(WmoNames::read_payload(b"castle.wmo"),
			Err(AdtImportError::Codec { source: CodecError::UnexpectedEndOfStream })));
		assert!(matches!(ModelNames(vec!["a\0b".to_string()]).write_payload(),
			Err(AdtImportError::Codec { source: CodecError::InteriorNul(_) })));
	}

	#[test]
	fn test_flight_bounds() {
		let bounds = FlightBounds {
			maximum: [[1, 2, 3], [4, 5, 6], [7, 8, 9]],
			minimum: [[-1, -2, -3], [-4, -5, -6], [-7, -8, -9]],
		};

		let payload = bounds.write_payload().unwrap();
		assert_eq!(FlightBounds::SIZE, payload.len());
		assert_eq!(&[1u8, 0, 2, 0, 3, 0][..], &payload[..6]);
		assert_eq!(bounds, FlightBounds::read_payload(&payload).unwrap());
	}
}
