/*!
# `Rejpeg` - TIFF Layouts

The `tiff` crate only expands Gray, RGB, RGBA, and CMYK. Palettes, greyscale
with alpha, and sub-byte greyscale are re-described as plain greyscale so the
crate still handles the strips and compression, then expanded here.
*/

use crate::{
	RejpegError,
	raster::try_buffer,
};
use rgb::RGBA8;
use super::{
	MemoryStream,
	high_byte,
};
use tiff::{
	decoder::{
		Decoder as TiffDecoder,
		DecodingResult,
	},
	tags::Tag,
};



/// # Photometric: White Is Zero.
const WHITE_IS_ZERO: u16 = 0;

/// # Photometric: Black Is Zero.
const BLACK_IS_ZERO: u16 = 1;

/// # Photometric: Palette.
const PALETTE: u16 = 3;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Sample Layout.
pub(super) enum Layout {
	/// # Handled by the `tiff` crate.
	Native,

	/// # Palette Indices (1, 2, 4, or 8 bits).
	Palette(u8),

	/// # Packed Greyscale (1, 2, or 4 bits).
	Grey {
		bits: u8,
		white: bool,
	},

	/// # Greyscale and Alpha (8 or 16 bits).
	GreyAlpha {
		wide: bool,
		white: bool,
		predictor: bool,
		alpha: bool,
	},
}

impl Layout {
	/// # From Tags.
	///
	/// ## Errors
	///
	/// Layouts that need rewriting but use a horizontal predictor on packed
	/// samples are returned as [`RejpegError::DecodeTiff`].
	pub(super) fn read(decoder: &mut TiffDecoder<MemoryStream<'_>>) -> Result<Self, RejpegError> {
		let Some(photometric) = tag_u16(decoder, Tag::PhotometricInterpretation) else {
			return Ok(Self::Native);
		};
		let samples = tag_u16(decoder, Tag::SamplesPerPixel).unwrap_or(1);
		let bits = decoder.find_tag_unsigned_vec::<u8>(Tag::BitsPerSample)
			.ok()
			.flatten()
			.and_then(|v| v.first().copied())
			.unwrap_or(1);
		let predictor = tag_u16(decoder, Tag::Predictor).unwrap_or(1);
		let extra = decoder.find_tag_unsigned_vec::<u16>(Tag::ExtraSamples)
			.ok()
			.flatten()
			.and_then(|v| v.first().copied())
			.unwrap_or(0);

		let out = match (photometric, samples, bits) {
			(PALETTE, 1, 1 | 2 | 4 | 8) => Self::Palette(bits),
			(WHITE_IS_ZERO | BLACK_IS_ZERO, 1, 1 | 2 | 4) => Self::Grey {
				bits,
				white: photometric == WHITE_IS_ZERO,
			},
			(WHITE_IS_ZERO | BLACK_IS_ZERO, 2, 8 | 16) => Self::GreyAlpha {
				wide: bits == 16,
				white: photometric == WHITE_IS_ZERO,
				predictor: predictor == 2,
				alpha: bits == 8 && (extra == 1 || extra == 2),
			},
			_ => Self::Native,
		};

		// Packed samples can't be differenced.
		if out.bits().is_some_and(|b| b < 8) && predictor != 1 {
			return Err(RejpegError::DecodeTiff);
		}

		Ok(out)
	}

	#[must_use]
	/// # Bits Per Index/Value.
	const fn bits(self) -> Option<u8> {
		match self {
			Self::Palette(bits) | Self::Grey { bits, .. } => Some(bits),
			_ => None,
		}
	}

	/// # Tag Changes.
	///
	/// Return the tags to override so the `tiff` crate reads this layout as
	/// single-sample greyscale.
	fn changes(self, width: u32, tile: Option<u32>) -> Option<Vec<(Tag, u32)>> {
		let mut out = vec![(Tag::PhotometricInterpretation, u32::from(BLACK_IS_ZERO))];
		match self {
			Self::Native => return None,
			Self::Palette(8) => {},
			Self::Palette(bits) | Self::Grey { bits, .. } => {
				let bits = u32::from(bits);
				out.push((Tag::BitsPerSample, 8));
				out.push((Tag::ImageWidth, width.checked_mul(bits)?.div_ceil(8)));
				if let Some(tile) = tile {
					let tile = tile.checked_mul(bits)?;
					if tile % 8 != 0 { return None; }
					out.push((Tag::TileWidth, tile / 8));
				}
			},
			Self::GreyAlpha { wide, .. } => {
				out.push((Tag::SamplesPerPixel, 1));
				out.push((Tag::BitsPerSample, if wide { 16 } else { 8 }));
				out.push((Tag::ImageWidth, width.checked_mul(2)?));
				out.push((Tag::Predictor, 1));
				if let Some(tile) = tile {
					out.push((Tag::TileWidth, tile.checked_mul(2)?));
				}
			},
		}

		Some(out)
	}

	/// # Rewrite.
	///
	/// Return a copy of the source with the first directory re-described for
	/// this layout.
	///
	/// ## Errors
	///
	/// BigTIFF sources, or sources whose directory can't be walked, are
	/// returned as [`RejpegError::DecodeTiff`].
	pub(super) fn rewrite(self, raw: &[u8], width: u32, tile: Option<u32>)
	-> Result<Vec<u8>, RejpegError> {
		self.changes(width, tile)
			.and_then(|changes| rewrite(raw, &changes))
			.ok_or(RejpegError::DecodeTiff)
	}

	/// # Read RGBA.
	///
	/// Read a rewritten source and expand it to 8-bit RGBA.
	///
	/// ## Errors
	///
	/// Decoding errors and missing or short data are returned as
	/// [`RejpegError::DecodeTiff`].
	pub(super) fn read_rgba(
		self,
		decoder: &mut TiffDecoder<MemoryStream<'_>>,
		width: usize,
		height: usize,
	) -> Result<Vec<RGBA8>, RejpegError> {
		let size = width.checked_mul(height).ok_or(RejpegError::Overflow)?;
		let data = decoder.read_image().map_err(|_| RejpegError::DecodeTiff)?;
		let mut out: Vec<RGBA8> = try_buffer(size)?;

		match (self, data) {
			(Self::Palette(bits), DecodingResult::U8(v)) => {
				let map = decoder.find_tag_unsigned_vec::<u16>(Tag::ColorMap)
					.map_err(|_| RejpegError::DecodeTiff)?
					.ok_or(RejpegError::DecodeTiff)?;
				let len = map.len() / 3;

				// Maps that never exceed 255 are taken as 8-bit.
				let wide = map.iter().any(|&v| 255 < v);
				let channel = |v: u16| if wide { high_byte(v) } else { low_byte(v) };

				for idx in unpack(&v, bits, width, height)? {
					let idx = usize::from(idx);
					if len <= idx { return Err(RejpegError::DecodeTiff); }
					out.push(RGBA8::new(
						channel(map[idx]),
						channel(map[len + idx]),
						channel(map[len * 2 + idx]),
						255,
					));
				}
			},
			(Self::Grey { bits, white }, DecodingResult::U8(v)) => {
				let range = (1_u16 << bits) - 1;
				for v in unpack(&v, bits, width, height)? {
					let v = u16::from(v);
					let v = scale(if white { range - v } else { v }, range);
					out.push(RGBA8::new(v, v, v, 255));
				}
			},
			(Self::GreyAlpha { wide: false, white, predictor, alpha }, DecodingResult::U8(mut v)) => {
				let v = exact(&mut v, size)?;
				if predictor { unpredict(v, width, u8::wrapping_add); }
				out.extend(v.chunks_exact(2).map(|px| {
					let g = if white { 255 - px[0] } else { px[0] };
					RGBA8::new(g, g, g, if alpha { px[1] } else { 255 })
				}));
			},
			(Self::GreyAlpha { wide: true, white, predictor, .. }, DecodingResult::U16(mut v)) => {
				let v = exact(&mut v, size)?;
				if predictor { unpredict(v, width, u16::wrapping_add); }
				out.extend(v.chunks_exact(2).map(|px| {
					let g = if white { u16::MAX - px[0] } else { px[0] };
					let g = high_byte(g);
					RGBA8::new(g, g, g, 255)
				}));
			},
			_ => return Err(RejpegError::DecodeTiff),
		}

		if out.len() == size { Ok(out) }
		else { Err(RejpegError::DecodeTiff) }
	}
}



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Byte Order.
enum ByteOrder {
	/// # Little Endian (`II`).
	Little,

	/// # Big Endian (`MM`).
	Big,
}

impl ByteOrder {
	/// # From Header.
	///
	/// BigTIFF is not supported.
	fn from_header(raw: &[u8]) -> Option<Self> {
		match raw.get(..4)? {
			b"II*\0" => Some(Self::Little),
			b"MM\0*" => Some(Self::Big),
			_ => None,
		}
	}

	/// # Read u16.
	fn u16(self, raw: &[u8]) -> Option<u16> {
		let b = <[u8; 2]>::try_from(raw.get(..2)?).ok()?;
		Some(match self {
			Self::Little => u16::from_le_bytes(b),
			Self::Big => u16::from_be_bytes(b),
		})
	}

	/// # Read u32.
	fn u32(self, raw: &[u8]) -> Option<u32> {
		let b = <[u8; 4]>::try_from(raw.get(..4)?).ok()?;
		Some(match self {
			Self::Little => u32::from_le_bytes(b),
			Self::Big => u32::from_be_bytes(b),
		})
	}

	/// # u16 Bytes.
	const fn u16_bytes(self, v: u16) -> [u8; 2] {
		match self {
			Self::Little => v.to_le_bytes(),
			Self::Big => v.to_be_bytes(),
		}
	}

	/// # u32 Bytes.
	const fn u32_bytes(self, v: u32) -> [u8; 4] {
		match self {
			Self::Little => v.to_le_bytes(),
			Self::Big => v.to_be_bytes(),
		}
	}

	/// # Directory Entry.
	///
	/// Build a single-value entry, as a SHORT when it fits, otherwise a LONG.
	fn entry(self, tag: u16, value: u32) -> [u8; 12] {
		let mut out = [0_u8; 12];
		out[..2].copy_from_slice(&self.u16_bytes(tag));
		out[4..8].copy_from_slice(&self.u32_bytes(1));
		if let Ok(short) = u16::try_from(value) {
			out[2..4].copy_from_slice(&self.u16_bytes(3));
			out[8..10].copy_from_slice(&self.u16_bytes(short));
		}
		else {
			out[2..4].copy_from_slice(&self.u16_bytes(4));
			out[8..].copy_from_slice(&self.u32_bytes(value));
		}
		out
	}
}



/// # Rewrite the First Directory.
///
/// Copy the source and append a replacement for its first directory with the
/// given tags overridden (or added). The original data and any out-of-line
/// values stay where they were, so existing offsets remain valid.
fn rewrite(raw: &[u8], changes: &[(Tag, u32)]) -> Option<Vec<u8>> {
	let order = ByteOrder::from_header(raw)?;
	let ifd = usize::try_from(order.u32(raw.get(4..)?)?).ok()?;
	let count = usize::from(order.u16(raw.get(ifd..)?)?);
	let start = ifd.checked_add(2)?;
	let end = start.checked_add(count.checked_mul(12)?)?;
	let entries = raw.get(start..end)?;

	let mut dir: Vec<[u8; 12]> = entries.chunks_exact(12)
		.filter(|e| order.u16(e).is_some_and(|tag|
			changes.iter().all(|(t, _)| t.to_u16() != tag)
		))
		.filter_map(|e| <[u8; 12]>::try_from(e).ok())
		.collect();
	dir.extend(changes.iter().map(|(t, v)| order.entry(t.to_u16(), *v)));
	dir.sort_by_key(|e| order.u16(e));
	let len = u16::try_from(dir.len()).ok()?;

	let mut out = Vec::new();
	out.try_reserve_exact(raw.len() + 7 + dir.len() * 12).ok()?;
	out.extend_from_slice(raw);
	if out.len() % 2 == 1 { out.push(0); }

	let pos = u32::try_from(out.len()).ok()?;
	out[4..8].copy_from_slice(&order.u32_bytes(pos));
	out.extend_from_slice(&order.u16_bytes(len));
	for e in &dir { out.extend_from_slice(e); }
	out.extend_from_slice(&[0; 4]);

	Some(out)
}

/// # Find a u16 Tag.
fn tag_u16(decoder: &mut TiffDecoder<MemoryStream<'_>>, tag: Tag) -> Option<u16> {
	decoder.find_tag_unsigned::<u16>(tag).ok().flatten()
}

/// # Exact Slice.
///
/// Return the first `size * 2` samples, or an error if there aren't enough.
fn exact<T>(src: &mut [T], size: usize) -> Result<&mut [T], RejpegError> {
	let len = size.checked_mul(2).ok_or(RejpegError::Overflow)?;
	src.get_mut(..len).ok_or(RejpegError::DecodeTiff)
}

#[allow(clippy::cast_possible_truncation)] // It's masked.
#[inline]
/// # Low Byte.
const fn low_byte(v: u16) -> u8 { (v & 0xFF) as u8 }

#[allow(clippy::cast_possible_truncation)] // Max is 255.
#[inline]
/// # Scale to 8 Bits.
const fn scale(v: u16, range: u16) -> u8 { (v * 255 / range) as u8 }

/// # Unpack Rows.
///
/// Split packed rows, each padded to a whole byte, into one value per pixel.
/// Eight-bit data is returned as-is.
fn unpack(src: &[u8], bits: u8, width: usize, height: usize) -> Result<Vec<u8>, RejpegError> {
	let size = width.checked_mul(height).ok_or(RejpegError::Overflow)?;
	if bits == 8 {
		return src.get(..size).map(<[u8]>::to_vec).ok_or(RejpegError::DecodeTiff);
	}

	let bits = usize::from(bits);
	let stride = width.checked_mul(bits).ok_or(RejpegError::Overflow)?.div_ceil(8);
	let rows = src.get(..stride.checked_mul(height).ok_or(RejpegError::Overflow)?)
		.ok_or(RejpegError::DecodeTiff)?;

	let mask = (1_u8 << bits) - 1;
	let mut out: Vec<u8> = try_buffer(size)?;
	for row in rows.chunks_exact(stride) {
		out.extend((0..width).map(|x| {
			let bit = x * bits;
			let shift = 8 - bits - bit % 8;
			(row[bit / 8] >> shift) & mask
		}));
	}

	Ok(out)
}

/// # Undo Horizontal Prediction.
///
/// Each row holds `width` interleaved grey/alpha pairs, each sample stored
/// as the difference from the same channel of the previous pixel.
fn unpredict<T: Copy, F: Fn(T, T) -> T>(buf: &mut [T], width: usize, add: F) {
	let stride = width * 2;
	if stride == 0 { return; }
	for row in buf.chunks_exact_mut(stride) {
		for i in 2..row.len() {
			row[i] = add(row[i], row[i - 2]);
		}
	}
}
