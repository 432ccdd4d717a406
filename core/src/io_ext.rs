use byteorder::{
	LE,
	ReadBytesExt,
	WriteBytesExt
};

use std::io::{
	Read,
	Write
};

use ultraviolet::vec::Vec3;

use crate::{
	axis::{
		AxisConfig,
		from_file,
		to_file
	},
	error::CodecError,
	geom::{
		AABox,
		Grid3x3,
		Rotator
	},
	tag::Tag
};

type Result<T> = std::result::Result<T, CodecError>;

pub trait ReadBinExt: Read {
	/// Reads a null-terminated string, one byte per character
	#[inline]
	fn read_cstr(&mut self) -> Result<String> {
		let mut s = String::new();
		let mut buf = [1; 1];

		while buf[0] != 0 {
			self.read_exact(&mut buf)?;
			if buf[0] != 0 {
				s.push(buf[0] as char);
			}
		}

		Ok(s)
	}

	/// Reads a byte-reversed 4-character tag
	#[inline]
	fn read_signature(&mut self) -> Result<Tag> {
		let mut raw = [0; 4];
		self.read_exact(&mut raw)?;

		Ok(Tag::from_disk(raw))
	}

	/// Reads a little endian 3D vector in stored order
	#[inline]
	fn read_vec3_le(&mut self) -> Result<Vec3> {
		let x = self.read_f32::<LE>()?;
		let y = self.read_f32::<LE>()?;
		let z = self.read_f32::<LE>()?;

		Ok(Vec3::new(x, y, z))
	}

	/// Reads a 3D vector and maps it into the requested axis configuration
	#[inline]
	fn read_vec3_as(&mut self, axis: AxisConfig) -> Result<Vec3> {
		Ok(from_file(self.read_vec3_le()?, axis))
	}

	/// Reads a positional vector into the in-memory (Y-up) convention
	#[inline]
	fn read_position(&mut self) -> Result<Vec3> {
		self.read_vec3_as(AxisConfig::DECODE_DEFAULT)
	}

	#[inline]
	fn read_rotator(&mut self) -> Result<Rotator> {
		self.read_vec3_as(AxisConfig::Native)
	}

	/// Reads a bounding box, minimum corner first
	#[inline]
	fn read_aabox(&mut self) -> Result<AABox> {
		let min = self.read_position()?;
		let max = self.read_position()?;

		Ok(AABox::new(min, max))
	}

	#[inline]
	fn read_grid3x3(&mut self) -> Result<Grid3x3> {
		let mut grid = [[0; 3]; 3];

		for row in grid.iter_mut() {
			for cell in row.iter_mut() {
				*cell = self.read_i16::<LE>()?;
			}
		}

		Ok(grid)
	}
}

impl<R> ReadBinExt for R
where
	R: Read + ?Sized,
{
}

pub trait WriteBinExt: Write {
	/// Writes a string followed by a single zero terminator.
	/// Nothing is written when the string cannot be read back intact.
	#[inline]
	fn write_cstr(&mut self, s: &str) -> Result<()> {
		let mut out = Vec::with_capacity(s.len() + 1);

		for c in s.chars() {
			let code = c as u32;
			if code == 0 {
				return Err(CodecError::InteriorNul(s.to_string()));
			}
			if code > 0xFF {
				return Err(CodecError::UnencodableChar(c));
			}
			out.push(code as u8);
		}
		out.push(0);

		self.write_all(&out)?;
		Ok(())
	}

	/// Writes each string null-terminated, back to back, with no count prefix
	#[inline]
	fn write_cstr_list<S>(&mut self, strings: &[S]) -> Result<()>
	where
		S: AsRef<str>,
	{
		for s in strings.iter() {
			self.write_cstr(s.as_ref())?;
		}

		Ok(())
	}

	/// Validates and writes a tag given as text
	#[inline]
	fn write_signature(&mut self, tag: &str) -> Result<()> {
		self.write_tag(Tag::try_from(tag)?)
	}

	#[inline]
	fn write_tag(&mut self, tag: Tag) -> Result<()> {
		self.write_all(&tag.to_disk())?;
		Ok(())
	}

	/// Writes a little endian 3D vector in stored order
	#[inline]
	fn write_vec3_le(&mut self, v: Vec3) -> Result<()> {
		self.write_f32::<LE>(v.x)?;
		self.write_f32::<LE>(v.y)?;
		self.write_f32::<LE>(v.z)?;

		Ok(())
	}

	#[inline]
	fn write_vec3_as(&mut self, v: Vec3, axis: AxisConfig) -> Result<()> {
		self.write_vec3_le(to_file(v, axis))
	}

	/// Writes a positional vector into the on-disk (Z-up) convention
	#[inline]
	fn write_position(&mut self, v: Vec3) -> Result<()> {
		self.write_vec3_as(v, AxisConfig::ENCODE_DEFAULT)
	}

	#[inline]
	fn write_rotator(&mut self, r: Rotator) -> Result<()> {
		self.write_vec3_as(r, AxisConfig::Native)
	}

	#[inline]
	fn write_aabox(&mut self, b: &AABox) -> Result<()> {
		self.write_position(b.min)?;
		self.write_position(b.max)
	}

	#[inline]
	fn write_grid3x3(&mut self, grid: &Grid3x3) -> Result<()> {
		for row in grid.iter() {
			for cell in row.iter() {
				self.write_i16::<LE>(*cell)?;
			}
		}

		Ok(())
	}
}

impl<W> WriteBinExt for W
where
	W: Write + ?Sized,
{
}

/// Splits a block of back-to-back null-terminated strings
pub fn read_cstr_list(mut block: &[u8]) -> Result<Vec<String>> {
	let mut strings = vec![];

	while !block.is_empty() {
		strings.push(block.read_cstr()?);
	}

	Ok(strings)
}
