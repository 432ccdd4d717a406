//! Tag/length/payload chunk framing.
//!
//! A chunk file is a flat run of frames: a byte-reversed 4-character tag, a little endian
//! `u32` payload length, then exactly that many payload bytes. Payload interpretation
//! belongs to the [`Chunk`] implementation; this module only locates, frames and
//! dispatches.

use byteorder::{
	LE,
	ReadBytesExt,
	WriteBytesExt
};

use std::{
	collections::{
		hash_map::Entry,
		HashMap
	},
	io::{
		Read,
		Seek,
		SeekFrom,
		Write
	}
};

use tracing::{
	debug,
	trace
};

use crate::{
	error::CodecError,
	io_ext::{
		ReadBinExt,
		WriteBinExt
	},
	tag::Tag,
	TAG_SIZE
};

/// A record that can be framed as a chunk
pub trait Chunk: Sized {
	/// Failure type of payload decoding; framing errors convert into it
	type Error: From<CodecError>;

	const TAG: Tag;

	/// Builds a value from exactly one frame's payload
	fn read_payload(payload: &[u8]) -> Result<Self, Self::Error>;

	/// Serializes the value into a payload buffer
	fn write_payload(&self) -> Result<Vec<u8>, Self::Error>;

	fn tag(&self) -> Tag {
		Self::TAG
	}
}

/// A raw frame with its payload left uninterpreted
#[derive(Clone, Debug, PartialEq)]
pub struct ChunkFrame {
	pub tag: Tag,
	pub payload: Vec<u8>,
}

impl ChunkFrame {
	pub fn new(tag: Tag, payload: Vec<u8>) -> ChunkFrame {
		ChunkFrame {
			tag: tag,
			payload: payload,
		}
	}

	/// Reads the frame starting at the current position
	pub fn read<R>(buf: &mut R) -> Result<ChunkFrame, CodecError>
	where
		R: Read,
	{
		let tag = buf.read_signature()?;
		let length = buf.read_u32::<LE>()?;

		// grow with the data actually present rather than trusting the header
		let mut payload = vec![];
		buf.by_ref().take(length as u64).read_to_end(&mut payload)?;
		if payload.len() != length as usize {
			return Err(CodecError::UnexpectedEndOfStream);
		}

		Ok(ChunkFrame::new(tag, payload))
	}

	pub fn write<W>(&self, buf: &mut W) -> Result<(), CodecError>
	where
		W: Write,
	{
		let length = u32::try_from(self.payload.len())
			.map_err(|_| CodecError::PayloadTooLarge(self.payload.len()))?;

		buf.write_tag(self.tag)?;
		buf.write_u32::<LE>(length)?;
		buf.write_all(&self.payload)?;

		Ok(())
	}
}

/// Maps an end-of-stream read into `None`
fn or_end<T>(res: Result<T, CodecError>) -> Result<Option<T>, CodecError> {
	match res {
		Ok(v) => Ok(Some(v)),
		Err(CodecError::UnexpectedEndOfStream) => Ok(None),
		Err(e) => Err(e),
	}
}

/// Scans forward for the first frame tagged `target`.
///
/// On success the cursor rests on the first byte of the matching frame header. When the
/// stream runs out first, returns `false` with the cursor at end of stream.
pub fn find_tag<R>(buf: &mut R, target: Tag, from_start: bool) -> Result<bool, CodecError>
where
	R: Read + Seek,
{
	if from_start {
		buf.seek(SeekFrom::Start(0))?;
	}

	loop {
		let tag = match or_end(buf.read_signature())? {
			Some(tag) => tag,
			None => break,
		};

		if tag == target {
			let pos = buf.seek(SeekFrom::Current(-(TAG_SIZE as i64)))?;
			debug!(%target, offset = pos, "located chunk");
			return Ok(true);
		}

		let length = match or_end(buf.read_u32::<LE>().map_err(CodecError::from))? {
			Some(length) => length,
			None => break,
		};

		trace!(%tag, length, "skipping chunk");
		buf.seek(SeekFrom::Current(length as i64))?;
	}

	buf.seek(SeekFrom::End(0))?;
	debug!(%target, "scan exhausted");

	Ok(false)
}

/// Locates the first `C` frame from the start of the stream and decodes it
pub fn read_chunk<C, R>(buf: &mut R) -> Result<C, C::Error>
where
	C: Chunk,
	R: Read + Seek,
{
	if !find_tag(buf, C::TAG, true)? {
		return Err(CodecError::ChunkNotFound(C::TAG).into());
	}

	read_chunk_here(buf)
}

/// Decodes the frame at the current position as a `C`, without scanning.
///
/// The payload is only handed to `C` once its header tag matches `C::TAG`.
pub fn read_chunk_here<C, R>(buf: &mut R) -> Result<C, C::Error>
where
	C: Chunk,
	R: Read,
{
	let frame = ChunkFrame::read(buf)?;

	if frame.tag != C::TAG {
		return Err(CodecError::SignatureMismatch {
			expected: C::TAG,
			found: frame.tag,
		}.into());
	}

	let chunk = C::read_payload(&frame.payload)?;
	debug!(tag = %frame.tag, size = frame.payload.len(), "decoded chunk");

	Ok(chunk)
}

/// Decodes into `dest`, which is only replaced once decoding fully succeeds
pub fn read_chunk_into<C, R>(buf: &mut R, dest: &mut C) -> Result<(), C::Error>
where
	C: Chunk,
	R: Read + Seek,
{
	*dest = read_chunk::<C, R>(buf)?;
	Ok(())
}

/// Frames `chunk` as tag + length + payload
pub fn write_chunk<C, W>(chunk: &C, buf: &mut W) -> Result<(), C::Error>
where
	C: Chunk,
	W: Write,
{
	let frame = ChunkFrame::new(chunk.tag(), chunk.write_payload()?);
	frame.write(buf)?;
	debug!(tag = %frame.tag, size = frame.payload.len(), "encoded chunk");

	Ok(())
}

/// Offsets of every distinct tag in a stream, built in a single pass.
/// When a tag repeats, the first occurrence is kept.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkIndex {
	offsets: HashMap<Tag, u64>,
	order: Vec<Tag>,
}

impl ChunkIndex {
	pub fn build<R>(buf: &mut R) -> Result<ChunkIndex, CodecError>
	where
		R: Read + Seek,
	{
		let mut index = ChunkIndex::default();
		let mut offset = buf.seek(SeekFrom::Start(0))?;

		loop {
			let tag = match or_end(buf.read_signature())? {
				Some(tag) => tag,
				None => break,
			};
			let length = match or_end(buf.read_u32::<LE>().map_err(CodecError::from))? {
				Some(length) => length,
				None => break,
			};

			if let Entry::Vacant(e) = index.offsets.entry(tag) {
				e.insert(offset);
				index.order.push(tag);
			} else {
				trace!(%tag, offset, "duplicate chunk ignored");
			}

			offset = buf.seek(SeekFrom::Current(length as i64))?;
		}

		debug!(chunks = index.order.len(), "built chunk index");
		Ok(index)
	}

	pub fn offset(&self, tag: Tag) -> Option<u64> {
		self.offsets.get(&tag).copied()
	}

	pub fn contains(&self, tag: Tag) -> bool {
		self.offsets.contains_key(&tag)
	}

	/// Distinct tags in the order they first appear
	pub fn tags(&self) -> &[Tag] {
		&self.order
	}

	/// Seeks to the indexed `C` frame and decodes it
	pub fn read<C, R>(&self, buf: &mut R) -> Result<C, C::Error>
	where
		C: Chunk,
		R: Read + Seek,
	{
		let offset = self.offset(C::TAG).ok_or(CodecError::ChunkNotFound(C::TAG))?;
		buf.seek(SeekFrom::Start(offset)).map_err(CodecError::from)?;

		read_chunk_here(buf)
	}
}

#[cfg(test)]
mod tests {
	use byteorder::{
		LE,
		ReadBytesExt,
		WriteBytesExt
	};

	use std::io::{
		Cursor,
		Seek
	};

	use super::*;

	#[derive(Clone, Debug, Default, PartialEq)]
	struct Version {
		version: u32,
	}

	impl Chunk for Version {
		type Error = CodecError;

		const TAG: Tag = Tag::new(*b"MVER");

		fn read_payload(mut payload: &[u8]) -> Result<Version, CodecError> {
			Ok(Version {
				version: payload.read_u32::<LE>()?,
			})
		}

		fn write_payload(&self) -> Result<Vec<u8>, CodecError> {
			let mut out: Vec<u8> = vec![];
			out.write_u32::<LE>(self.version)?;
			Ok(out)
		}
	}

	#[derive(Clone, Debug, Default, PartialEq)]
	struct Blob(Vec<u8>);

	impl Chunk for Blob {
		type Error = CodecError;

		const TAG: Tag = Tag::new(*b"MBLB");

		fn read_payload(payload: &[u8]) -> Result<Blob, CodecError> {
			Ok(Blob(payload.to_vec()))
		}

		fn write_payload(&self) -> Result<Vec<u8>, CodecError> {
			Ok(self.0.clone())
		}
	}

	/// Fails the test if its payload is ever decoded
	struct Untouchable;

	impl Chunk for Untouchable {
		type Error = CodecError;

		const TAG: Tag = Tag::new(*b"MHDR");

		fn read_payload(_: &[u8]) -> Result<Untouchable, CodecError> {
			panic!("payload must not be decoded");
		}

		fn write_payload(&self) -> Result<Vec<u8>, CodecError> {
			Ok(vec![])
		}
	}

	fn frame(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
		let mut out: Vec<u8> = vec![];
		ChunkFrame::new(Tag::new(*tag), payload.to_vec()).write(&mut out).unwrap();
		out
	}

	/// Frames `AAAA`, `BBBB`, `CCCC` back to back
	fn abc_stream() -> Cursor<Vec<u8>> {
		let mut data = frame(b"AAAA", b"xyz");
		data.extend(frame(b"BBBB", b"hello"));
		data.extend(frame(b"CCCC", b""));
		Cursor::new(data)
	}

	#[test]
	fn test_frame_layout() {
		assert_eq!(b"REVM\x02\x00\x00\x00hi", frame(b"MVER", b"hi").as_slice());
	}

	#[test]
	fn test_find_tag() {
		let mut buf = abc_stream();
		assert!(find_tag(&mut buf, Tag::new(*b"BBBB"), true).unwrap());
		assert_eq!(11, buf.stream_position().unwrap());

		assert!(find_tag(&mut buf, Tag::new(*b"CCCC"), true).unwrap());
		assert_eq!(24, buf.stream_position().unwrap());
	}

	#[test]
	fn test_find_tag_absent() {
		let mut buf = abc_stream();
		let len = buf.get_ref().len() as u64;
		assert!(!find_tag(&mut buf, Tag::new(*b"DDDD"), true).unwrap());
		assert_eq!(len, buf.stream_position().unwrap());
	}

	#[test]
	fn test_find_tag_forward_only() {
		let mut buf = abc_stream();
		assert!(find_tag(&mut buf, Tag::new(*b"BBBB"), true).unwrap());
		assert!(!find_tag(&mut buf, Tag::new(*b"AAAA"), false).unwrap());
		assert!(find_tag(&mut buf, Tag::new(*b"AAAA"), true).unwrap());
		assert_eq!(0, buf.stream_position().unwrap());
	}

	#[test]
	fn test_find_tag_first_occurrence() {
		let mut data = frame(b"AAAA", b"1");
		data.extend(frame(b"BBBB", b"2"));
		data.extend(frame(b"AAAA", b"3"));
		let mut buf = Cursor::new(data);

		assert!(find_tag(&mut buf, Tag::new(*b"AAAA"), true).unwrap());
		assert_eq!(0, buf.stream_position().unwrap());
	}

	#[test]
	fn test_find_tag_truncated_header() {
		let mut data = frame(b"AAAA", b"xyz");
		data.extend(b"BB");
		let mut buf = Cursor::new(data);
		assert!(!find_tag(&mut buf, Tag::new(*b"BBBB"), true).unwrap());
	}

	#[test]
	fn test_find_tag_length_past_end() {
		let mut data = frame(b"AAAA", b"xyz");
		data.extend(b"BBBB\xff\x00\x00\x00short");
		let len = data.len() as u64;
		let mut buf = Cursor::new(data);

		assert!(!find_tag(&mut buf, Tag::new(*b"CCCC"), true).unwrap());
		assert_eq!(len, buf.stream_position().unwrap());
	}

	#[test]
	fn test_chunk_round_trip() {
		let mut buf = Cursor::new(Vec::<u8>::new());
		write_chunk(&Version { version: 18 }, &mut buf).unwrap();
		write_chunk(&Blob(vec![1, 2, 3, 0, 255]), &mut buf).unwrap();

		assert_eq!(Blob(vec![1, 2, 3, 0, 255]), read_chunk::<Blob, _>(&mut buf).unwrap());
		assert_eq!(Version { version: 18 }, read_chunk::<Version, _>(&mut buf).unwrap());
	}

	#[test]
	fn test_read_chunk_missing() {
		let mut buf = abc_stream();
		match read_chunk::<Version, _>(&mut buf) {
			Err(CodecError::ChunkNotFound(tag)) => assert_eq!(Version::TAG, tag),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[test]
	fn test_read_chunk_here_mismatch() {
		let mut buf = Cursor::new(frame(b"MVER", &[18, 0, 0, 0]));
		match read_chunk_here::<Untouchable, _>(&mut buf) {
			Err(CodecError::SignatureMismatch { expected, found }) => {
				assert_eq!(Tag::new(*b"MHDR"), expected);
				assert_eq!(Tag::new(*b"MVER"), found);
			},
			Err(e) => panic!("unexpected error: {}", e),
			Ok(_) => panic!("decoded a mismatched chunk"),
		}
	}

	#[test]
	fn test_truncated_payload() {
		let mut data = frame(b"MBLB", b"0123456789");
		data.truncate(12);
		let mut buf = Cursor::new(data);
		assert!(matches!(read_chunk::<Blob, _>(&mut buf), Err(CodecError::UnexpectedEndOfStream)));
	}

	#[test]
	fn test_read_chunk_into_keeps_dest_on_failure() {
		let mut dest = Version { version: 7 };
		let mut buf = Cursor::new(frame(b"MVER", &[1, 0]));
		assert!(read_chunk_into(&mut buf, &mut dest).is_err());
		assert_eq!(Version { version: 7 }, dest);

		let mut buf = Cursor::new(frame(b"MVER", &[18, 0, 0, 0]));
		read_chunk_into(&mut buf, &mut dest).unwrap();
		assert_eq!(Version { version: 18 }, dest);
	}

	#[test]
	fn test_chunk_index() {
		let mut data = abc_stream().into_inner();
		data.extend(frame(b"AAAA", b"dup"));
		data.extend(frame(b"MVER", &[18, 0, 0, 0]));
		let mut buf = Cursor::new(data);

		let index = ChunkIndex::build(&mut buf).unwrap();
		assert_eq!(
			&[Tag::new(*b"AAAA"), Tag::new(*b"BBBB"), Tag::new(*b"CCCC"), Tag::new(*b"MVER")][..],
			index.tags()
		);
		assert_eq!(Some(0), index.offset(Tag::new(*b"AAAA")));
		assert_eq!(Some(11), index.offset(Tag::new(*b"BBBB")));
		assert_eq!(Some(43), index.offset(Tag::new(*b"MVER")));
		assert!(!index.contains(Blob::TAG));

		assert_eq!(Version { version: 18 }, index.read::<Version, _>(&mut buf).unwrap());
		assert!(matches!(index.read::<Blob, _>(&mut buf), Err(CodecError::ChunkNotFound(_))));
	}
}
