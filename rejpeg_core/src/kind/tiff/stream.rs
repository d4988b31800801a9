/*!
# `Rejpeg` - In-Memory Stream
*/

use std::io::{
	Error,
	ErrorKind,
	Read,
	Result,
	Seek,
	SeekFrom,
	Write,
};



#[derive(Debug, Clone, Copy)]
/// # Memory Stream.
///
/// A read-only, random-access view over a byte slice.
///
/// Unlike `std::io::Cursor`, seeking outside the buffer is an error rather
/// than something to discover on the next read. Writing is never allowed.
pub(crate) struct MemoryStream<'a> {
	/// # Buffer.
	buf: &'a [u8],

	/// # Position.
	pos: usize,
}

impl<'a> MemoryStream<'a> {
	#[inline]
	#[must_use]
	/// # New.
	pub(crate) const fn new(buf: &'a [u8]) -> Self { Self { buf, pos: 0 } }

	#[inline]
	#[must_use]
	/// # Size.
	pub(crate) const fn size(&self) -> usize { self.buf.len() }
}

impl Read for MemoryStream<'_> {
	/// # Read.
	///
	/// Reads are clamped to whatever remains in the buffer; at the end, zero
	/// bytes are returned.
	fn read(&mut self, out: &mut [u8]) -> Result<usize> {
		let rest = self.buf.get(self.pos..).unwrap_or_default();
		let len = out.len().min(rest.len());
		out[..len].copy_from_slice(&rest[..len]);
		self.pos += len;
		Ok(len)
	}
}

impl Seek for MemoryStream<'_> {
	fn seek(&mut self, pos: SeekFrom) -> Result<u64> {
		let (base, off) = match pos {
			SeekFrom::Start(n) => (0, i128::from(n)),
			SeekFrom::Current(n) => (self.pos, i128::from(n)),
			SeekFrom::End(n) => (self.buf.len(), i128::from(n)),
		};

		let next = i128::try_from(base).ok()
			.and_then(|b| b.checked_add(off))
			.and_then(|n| usize::try_from(n).ok())
			.filter(|n| *n <= self.buf.len())
			.ok_or_else(|| Error::new(
				ErrorKind::InvalidInput,
				"seek out of bounds",
			))?;

		self.pos = next;
		u64::try_from(next).map_err(|_| Error::new(ErrorKind::InvalidInput, "seek out of bounds"))
	}
}

impl Write for MemoryStream<'_> {
	/// # Write.
	///
	/// This always fails.
	fn write(&mut self, _buf: &[u8]) -> Result<usize> {
		Err(Error::new(ErrorKind::Unsupported, crate::RejpegError::Unsupported.as_str()))
	}

	/// # Flush.
	///
	/// This always fails.
	fn flush(&mut self) -> Result<()> {
		Err(Error::new(ErrorKind::Unsupported, crate::RejpegError::Unsupported.as_str()))
	}
}
