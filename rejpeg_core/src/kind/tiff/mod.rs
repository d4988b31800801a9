/*!
# `Rejpeg` - TIFF Images.
*/

mod layout;
mod stream;

use crate::{
	ColorKind,
	Config,
	RasterImage,
	raster::try_buffer,
	RejpegError,
	Source,
};
use dactyl::NiceU64;
use layout::Layout;
use rgb::RGBA8;
use stream::MemoryStream;
use super::Decoder;
use tiff::{
	ColorType,
	decoder::{
		Decoder as TiffDecoder,
		DecodingResult,
		Limits,
	},
	tags::Tag,
};



/// # Extra Sample: Unassociated Alpha.
const UNASSOCIATED_ALPHA: u16 = 2;



/// # TIFF Image.
pub(crate) struct ImageTiff;

impl Decoder for ImageTiff {
	#[inline]
	/// # Recognize.
	///
	/// Either byte-order marker will do; everything else is left to the
	/// decoder.
	fn recognize(raw: &[u8]) -> bool {
		raw.starts_with(b"II") || raw.starts_with(b"MM")
	}

	fn decode<'a>(raw: &'a [u8], cfg: &Config) -> Result<Source<'a>, RejpegError> {
		let stream = MemoryStream::new(raw);
		let size = stream.size();
		let mut decoder = open(stream)?;

		let (w, h) = decoder.dimensions().map_err(|_| RejpegError::DecodeTiff)?;
		let width = usize::try_from(w).map_err(|_| RejpegError::Overflow)?;
		let height = usize::try_from(h).map_err(|_| RejpegError::Overflow)?;
		if width == 0 || height == 0 { return Err(RejpegError::DecodeTiff); }

		// The declared sample count decides the flattening, regardless of
		// what the data actually turned out to be.
		let samples: u32 = decoder.find_tag_unsigned(Tag::SamplesPerPixel)
			.map_err(|_| RejpegError::DecodeTiff)?
			.unwrap_or(1);
		let color =
			if samples == 4 { ColorKind::Rgba }
			else { ColorKind::Rgb };

		let orientation: u16 = decoder.find_tag_unsigned(Tag::Orientation)
			.ok()
			.flatten()
			.unwrap_or(1);

		let layout = Layout::read(&mut decoder)?;
		let mut buf = match layout {
			Layout::Native => read_rgba(&mut decoder, width, height, cfg)?,
			_ => {
				let tile = decoder.find_tag_unsigned::<u32>(Tag::TileWidth).ok().flatten();
				let patched = layout.rewrite(raw, w, tile)?;
				let mut decoder = open(MemoryStream::new(&patched))?;
				layout.read_rgba(&mut decoder, width, height)?
			},
		};
		orient(&mut buf, width, orientation);

		if cfg.verbose() {
			let size = u64::try_from(size).unwrap_or(u64::MAX);
			fyi_msg::Msg::info(format!(
				"TIFF: {width}x{height}, {samples} sample(s) per pixel, {} bytes.",
				NiceU64::from(size).as_str(),
			))
				.with_indent(1)
				.eprint();
		}

		RasterImage::from_rgba(&buf, width, height, color, cfg.blend())
			.map(Source::Raster)
	}
}



/// # Open.
fn open(stream: MemoryStream<'_>) -> Result<TiffDecoder<MemoryStream<'_>>, RejpegError> {
	TiffDecoder::new(stream)
		.map(|d| d.with_limits(Limits::unlimited()))
		.map_err(|_| RejpegError::DecodeTiff)
}

/// # Read RGBA.
///
/// Decode the (first) image to 8-bit RGBA, top-left origin, before any
/// orientation is applied. Unassociated alpha is premultiplied.
fn read_rgba(
	decoder: &mut TiffDecoder<MemoryStream<'_>>,
	width: usize,
	height: usize,
	cfg: &Config,
) -> Result<Vec<RGBA8>, RejpegError> {
	let size = width.checked_mul(height).ok_or(RejpegError::Overflow)?;
	let color = decoder.colortype().map_err(|_| RejpegError::DecodeTiff)?;
	let data = decoder.read_image().map_err(|_| RejpegError::DecodeTiff)?;

	let (channels, samples): (usize, Vec<u8>) = match (color, data) {
		(ColorType::Gray(8), DecodingResult::U8(v)) => (1, v),
		(ColorType::RGB(8), DecodingResult::U8(v)) => (3, v),
		(ColorType::RGBA(8) | ColorType::CMYK(8), DecodingResult::U8(v)) => (4, v),
		(ColorType::Gray(16), DecodingResult::U16(v)) =>
			(1, v.iter().map(|&v| high_byte(v)).collect()),
		(ColorType::RGB(16), DecodingResult::U16(v)) =>
			(3, v.iter().map(|&v| reduce(v)).collect()),
		(ColorType::RGBA(16), DecodingResult::U16(v)) =>
			(4, v.iter().map(|&v| reduce(v)).collect()),
		_ => return Err(RejpegError::DecodeTiff),
	};

	// Make sure there's enough data.
	let expected = size.checked_mul(channels).ok_or(RejpegError::Overflow)?;
	if samples.len() < expected { return Err(RejpegError::DecodeTiff); }
	let samples = &samples[..expected];

	let declared = decoder.find_tag_unsigned::<u32>(Tag::SamplesPerPixel)
		.ok()
		.flatten()
		.unwrap_or(1);
	if cfg.verbose() && usize::try_from(declared).map_or(true, |d| d != channels) {
		fyi_msg::Msg::warning(format!(
			"TIFF declares {declared} sample(s) per pixel but decoded as {channels}.",
		))
			.with_indent(1)
			.eprint();
	}

	let unassociated = decoder.find_tag_unsigned_vec::<u16>(Tag::ExtraSamples)
		.ok()
		.flatten()
		.is_some_and(|v| v.first() == Some(&UNASSOCIATED_ALPHA));

	let mut out: Vec<RGBA8> = try_buffer(size)?;
	match (color, channels) {
		(ColorType::CMYK(_), _) => out.extend(samples.chunks_exact(4).map(|px| {
			let k = 255 - u16::from(px[3]);
			RGBA8::new(cmyk(px[0], k), cmyk(px[1], k), cmyk(px[2], k), 255)
		})),
		(_, 1) => out.extend(samples.iter().map(|&v| RGBA8::new(v, v, v, 255))),
		(_, 3) => out.extend(samples.chunks_exact(3).map(|px| RGBA8::new(px[0], px[1], px[2], 255))),
		_ if unassociated => out.extend(samples.chunks_exact(4).map(|px| RGBA8::new(
			premultiply(px[0], px[3]),
			premultiply(px[1], px[3]),
			premultiply(px[2], px[3]),
			px[3],
		))),
		_ => out.extend(samples.chunks_exact(4).map(|px| RGBA8::new(px[0], px[1], px[2], px[3]))),
	}

	Ok(out)
}

#[allow(clippy::cast_possible_truncation)] // Max is 255.
#[inline]
/// # CMYK Channel to RGB.
///
/// The key is passed pre-inverted.
const fn cmyk(c: u8, k: u16) -> u8 { (k * (255 - c as u16) / 255) as u8 }

#[allow(clippy::cast_possible_truncation)] // It's shifted.
#[inline]
/// # High Byte.
const fn high_byte(v: u16) -> u8 { (v >> 8) as u8 }

#[allow(clippy::cast_possible_truncation)] // Max is 255.
#[inline]
/// # Premultiply.
const fn premultiply(v: u8, a: u8) -> u8 {
	((v as u16 * a as u16 + 127) / 255) as u8
}

#[allow(clippy::cast_possible_truncation)] // Max is 255.
#[inline]
/// # Reduce to 8 Bits.
///
/// Scale a 16-bit sample down to the nearest 8-bit value.
const fn reduce(v: u16) -> u8 { ((v as u32 + 128) / 257) as u8 }

/// # Apply Orientation.
///
/// Flip the rows and/or columns so the image reads top-left. The transposed
/// orientations are flipped the same way as their untransposed partners.
fn orient(buf: &mut [RGBA8], width: usize, orientation: u16) {
	let (flip_h, flip_v) = match orientation {
		2 | 6 => (true, false),
		3 | 7 => (true, true),
		4 | 8 => (false, true),
		_ => (false, false),
	};

	if flip_h {
		for row in buf.chunks_exact_mut(width) { row.reverse(); }
	}

	if flip_v {
		let height = buf.len() / width;
		for y in 0..height / 2 {
			let (top, bottom) = buf.split_at_mut((height - 1 - y) * width);
			top[y * width..(y + 1) * width].swap_with_slice(&mut bottom[..width]);
		}
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::{
		BlendPolicy,
		DecodeOutcome,
	};
	use std::io::Cursor;
	use tiff::encoder::{
		colortype,
		TiffEncoder,
	};

	/// # Build a TIFF.
	///
	/// Little-endian, uncompressed, one strip. The dimension and strip tags
	/// are filled in automatically; everything is written as SHORTs.
	fn build(width: u16, height: u16, tags: &[(Tag, &[u16])], data: &[u8]) -> Vec<u8> {
		let strip = u16::try_from(data.len()).expect("Data too big.");
		let mut entries: Vec<(u16, Vec<u16>)> = vec![
			(Tag::ImageWidth.to_u16(), vec![width]),
			(Tag::ImageLength.to_u16(), vec![height]),
			(Tag::StripOffsets.to_u16(), vec![8]),
			(Tag::RowsPerStrip.to_u16(), vec![height]),
			(Tag::StripByteCounts.to_u16(), vec![strip]),
		];
		entries.extend(tags.iter().map(|(t, v)| (t.to_u16(), v.to_vec())));
		entries.sort_by_key(|e| e.0);

		// The data comes first, then any values too big to fit inline.
		let mut out = b"II*\0\0\0\0\0".to_vec();
		out.extend_from_slice(data);
		let mut values = Vec::with_capacity(entries.len());
		for (_, v) in &entries {
			if v.len() <= 2 {
				let mut inline = [0_u8; 4];
				for (dst, x) in inline.chunks_exact_mut(2).zip(v) {
					dst.copy_from_slice(&x.to_le_bytes());
				}
				values.push(inline);
			}
			else {
				if out.len() % 2 == 1 { out.push(0); }
				values.push(u32::try_from(out.len()).expect("Too big.").to_le_bytes());
				for x in v { out.extend_from_slice(&x.to_le_bytes()); }
			}
		}

		if out.len() % 2 == 1 { out.push(0); }
		let ifd = u32::try_from(out.len()).expect("Too big.");
		out[4..8].copy_from_slice(&ifd.to_le_bytes());
		out.extend_from_slice(&u16::try_from(entries.len()).expect("Too many.").to_le_bytes());
		for ((tag, v), value) in entries.iter().zip(values) {
			out.extend_from_slice(&tag.to_le_bytes());
			out.extend_from_slice(&3_u16.to_le_bytes());
			out.extend_from_slice(&u32::try_from(v.len()).expect("Too many.").to_le_bytes());
			out.extend_from_slice(&value);
		}
		out.extend_from_slice(&[0; 4]);
		out
	}

	/// # Decode to Raster.
	fn raster(raw: &[u8], cfg: &Config) -> RasterImage {
		match ImageTiff::process(raw, cfg) {
			DecodeOutcome::Decoded(Source::Raster(img)) => img,
			other => panic!("Unexpected outcome: {other:?}"),
		}
	}

	#[test]
	fn t_recognize() {
		assert!(ImageTiff::recognize(b"II*\0"));
		assert!(ImageTiff::recognize(b"MM\0*"));
		assert!(! ImageTiff::recognize(b"I"));
		assert!(! ImageTiff::recognize(b"XXXX"));
		assert!(ImageTiff::process(b"", &Config::default()).is_not_applicable());
	}

	#[test]
	fn t_rgb() {
		let src = [1_u8, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
		let mut raw = Cursor::new(Vec::new());
		TiffEncoder::new(&mut raw).expect("Encoder failed.")
			.write_image::<colortype::RGB8>(2, 2, &src)
			.expect("Write failed.");

		let img = raster(raw.get_ref(), &Config::default());
		assert_eq!((img.width(), img.height()), (2, 2));
		assert_eq!(img.pixels(), &src);
	}

	#[test]
	fn t_rgb16() {
		let src = [0x1234_u16, 0xABCD, 0xFF00];
		let mut raw = Cursor::new(Vec::new());
		TiffEncoder::new(&mut raw).expect("Encoder failed.")
			.write_image::<colortype::RGB16>(1, 1, &src)
			.expect("Write failed.");

		// Scaled to the nearest 8-bit value, not truncated.
		let img = raster(raw.get_ref(), &Config::default());
		assert_eq!(img.pixels(), &[18, 171, 254]);
	}

	#[test]
	fn t_grey16() {
		let src = [0x12FF_u16, 0xAB00];
		let mut raw = Cursor::new(Vec::new());
		TiffEncoder::new(&mut raw).expect("Encoder failed.")
			.write_image::<colortype::Gray16>(2, 1, &src)
			.expect("Write failed.");

		// Greyscale keeps the high byte.
		let img = raster(raw.get_ref(), &Config::default());
		assert_eq!(img.pixels(), &[0x12, 0x12, 0x12, 0xAB, 0xAB, 0xAB]);
	}

	#[test]
	fn t_reduce() {
		assert_eq!(reduce(0), 0);
		assert_eq!(reduce(0x1234), 18);
		assert_eq!(reduce(0xFF00), 254);
		assert_eq!(reduce(u16::MAX), 255);
	}

	#[test]
	fn t_premultiply() {
		assert_eq!(premultiply(128, 128), 64);
		assert_eq!(premultiply(255, 128), 128);
		assert_eq!(premultiply(200, 0), 0);
		assert_eq!(premultiply(10, 255), 10);
	}

	#[test]
	fn t_grey() {
		let src = [0_u8, 50, 100, 255];
		let mut raw = Cursor::new(Vec::new());
		TiffEncoder::new(&mut raw).expect("Encoder failed.")
			.write_image::<colortype::Gray8>(4, 1, &src)
			.expect("Write failed.");

		let img = raster(raw.get_ref(), &Config::default());
		assert_eq!(
			img.pixels(),
			&[0, 0, 0, 50, 50, 50, 100, 100, 100, 255, 255, 255],
		);
	}

	#[test]
	fn t_rgba() {
		let src = [
			200_u8, 100, 50, 0,
			128, 64, 255, 128,
			10, 20, 30, 255,
		];
		let mut raw = Cursor::new(Vec::new());
		TiffEncoder::new(&mut raw).expect("Encoder failed.")
			.write_image::<colortype::RGBA8>(3, 1, &src)
			.expect("Write failed.");

		// Without ExtraSamples, the alpha is taken as associated.
		let img = raster(raw.get_ref(), &Config::default());
		assert_eq!(img.pixels(), &[0, 0, 0, 64, 32, 128, 10, 20, 30]);

		let cfg = Config::default().with_blend(BlendPolicy::OnWhite);
		let img = raster(raw.get_ref(), &cfg);
		assert_eq!(img.pixels(), &[255, 255, 255, 128, 64, 255, 10, 20, 30]);
	}

	#[test]
	fn t_rgba_unassociated() {
		let src = [
			200_u8, 100, 50, 0,
			128, 64, 255, 128,
			10, 20, 30, 255,
		];
		let mut raw = Cursor::new(Vec::new());
		{
			let mut tiff = TiffEncoder::new(&mut raw).expect("Encoder failed.");
			let mut image = tiff.new_image::<colortype::RGBA8>(3, 1)
				.expect("Image failed.");
			image.encoder().write_tag(Tag::ExtraSamples, UNASSOCIATED_ALPHA)
				.expect("Tag failed.");
			image.write_data(&src).expect("Write failed.");
		}

		// Premultiplied, then blended.
		let img = raster(raw.get_ref(), &Config::default());
		assert_eq!(img.pixels(), &[0, 0, 0, 32, 16, 64, 10, 20, 30]);

		let cfg = Config::default().with_blend(BlendPolicy::OnWhite);
		let img = raster(raw.get_ref(), &cfg);
		assert_eq!(img.pixels(), &[255, 255, 255, 64, 32, 128, 10, 20, 30]);
	}

	#[test]
	fn t_cmyk_samples() {
		let src = [
			0_u8, 0, 0, 0,
			255, 0, 0, 0,
			0, 0, 0, 128,
			0, 0, 0, 255,
		];
		let mut raw = Cursor::new(Vec::new());
		TiffEncoder::new(&mut raw).expect("Encoder failed.")
			.write_image::<colortype::CMYK8>(4, 1, &src)
			.expect("Write failed.");

		// Four declared samples means RGBA flattening, but converted CMYK is
		// always opaque, so neither policy changes anything.
		let expected = [255, 255, 255, 0, 255, 255, 127, 127, 127, 0, 0, 0];
		let img = raster(raw.get_ref(), &Config::default());
		assert_eq!(img.pixels(), &expected);

		let cfg = Config::default().with_blend(BlendPolicy::OnWhite);
		let img = raster(raw.get_ref(), &cfg);
		assert_eq!(img.pixels(), &expected);
	}

	#[test]
	fn t_palette() {
		let mut map = vec![0_u16; 768];
		map[0] = 0x1000; map[256] = 0x2000; map[512] = 0x3000;
		map[1] = 0xFFFF; map[257] = 0x8000; map[513] = 0;

		let raw = build(2, 1, &[
			(Tag::PhotometricInterpretation, &[3]),
			(Tag::BitsPerSample, &[8]),
			(Tag::ColorMap, map.as_slice()),
		], &[1, 0]);
		let img = raster(&raw, &Config::default());
		assert_eq!(img.pixels(), &[255, 128, 0, 16, 32, 48]);

		// Maps with only small values are read as 8-bit.
		let map: Vec<u16> = map.iter().map(|&v| v >> 8).collect();
		let raw = build(2, 1, &[
			(Tag::PhotometricInterpretation, &[3]),
			(Tag::BitsPerSample, &[8]),
			(Tag::ColorMap, map.as_slice()),
		], &[1, 0]);
		let img = raster(&raw, &Config::default());
		assert_eq!(img.pixels(), &[255, 128, 0, 16, 32, 48]);
	}

	#[test]
	fn t_palette4() {
		let mut map = vec![0_u16; 48];
		map[1] = 0xFF00;
		map[16 + 2] = 0xFF00;

		// Indices 1, 0, 2 packed into two bytes.
		let raw = build(3, 1, &[
			(Tag::PhotometricInterpretation, &[3]),
			(Tag::BitsPerSample, &[4]),
			(Tag::ColorMap, map.as_slice()),
		], &[0x10, 0x20]);
		let img = raster(&raw, &Config::default());
		assert_eq!(img.pixels(), &[255, 0, 0, 0, 0, 0, 0, 255, 0]);
	}

	#[test]
	fn t_grey_alpha() {
		let tags = |photometric: &'static [u16], predictor: &'static [u16]| [
			(Tag::PhotometricInterpretation, photometric),
			(Tag::BitsPerSample, &[8_u16, 8][..]),
			(Tag::SamplesPerPixel, &[2][..]),
			(Tag::Predictor, predictor),
			(Tag::ExtraSamples, &[UNASSOCIATED_ALPHA][..]),
		];

		// Two samples is not four, so the alpha is ignored.
		let raw = build(2, 1, &tags(&[1], &[1]), &[10, 0, 200, 128]);
		let img = raster(&raw, &Config::default());
		assert_eq!(img.pixels(), &[10, 10, 10, 200, 200, 200]);

		// White is zero.
		let raw = build(2, 1, &tags(&[0], &[1]), &[10, 0, 200, 128]);
		let img = raster(&raw, &Config::default());
		assert_eq!(img.pixels(), &[245, 245, 245, 55, 55, 55]);

		// Differenced.
		let raw = build(2, 1, &tags(&[1], &[2]), &[10, 0, 190, 128]);
		let img = raster(&raw, &Config::default());
		assert_eq!(img.pixels(), &[10, 10, 10, 200, 200, 200]);
	}

	#[test]
	fn t_bilevel() {
		let raw = build(10, 2, &[
			(Tag::PhotometricInterpretation, &[1]),
			(Tag::BitsPerSample, &[1]),
		], &[0b1010_0000, 0b1100_0000, 0xFF, 0x00]);
		let img = raster(&raw, &Config::default());
		assert_eq!((img.width(), img.height()), (10, 2));

		let bits = [1_u8, 0, 1, 0, 0, 0, 0, 0, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 0, 0];
		for (px, bit) in img.chunks_exact(3).zip(bits) {
			let v = if bit == 1 { 255 } else { 0 };
			assert_eq!(px, [v, v, v]);
		}

		// White is zero, with the bit depth left to its default.
		let raw = build(2, 1, &[(Tag::PhotometricInterpretation, &[0])], &[0b1000_0000]);
		let img = raster(&raw, &Config::default());
		assert_eq!(img.pixels(), &[0, 0, 0, 255, 255, 255]);
	}

	#[test]
	fn t_grey2() {
		let raw = build(4, 1, &[
			(Tag::PhotometricInterpretation, &[1]),
			(Tag::BitsPerSample, &[2]),
		], &[0b0001_1011]);
		let img = raster(&raw, &Config::default());
		assert_eq!(img.pixels(), &[0, 0, 0, 85, 85, 85, 170, 170, 170, 255, 255, 255]);

		// Packed samples can't be differenced.
		let raw = build(4, 1, &[
			(Tag::PhotometricInterpretation, &[1]),
			(Tag::BitsPerSample, &[2]),
			(Tag::Predictor, &[2]),
		], &[0b0001_1011]);
		assert_eq!(
			ImageTiff::process(&raw, &Config::default()),
			DecodeOutcome::Failed(RejpegError::DecodeTiff),
		);
	}

	#[test]
	fn t_orientation() {
		let src = [1_u8, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12];
		let mut raw = Cursor::new(Vec::new());
		{
			let mut tiff = TiffEncoder::new(&mut raw).expect("Encoder failed.");
			let mut image = tiff.new_image::<colortype::RGB8>(2, 2)
				.expect("Image failed.");
			image.encoder().write_tag(Tag::Orientation, 3_u16)
				.expect("Tag failed.");
			image.write_data(&src).expect("Write failed.");
		}

		// Rotated 180 degrees.
		let img = raster(raw.get_ref(), &Config::default());
		assert_eq!(img.pixels(), &[10, 11, 12, 7, 8, 9, 4, 5, 6, 1, 2, 3]);
	}

	#[test]
	fn t_orient() {
		let px = |v: u8| RGBA8::new(v, v, v, 255);
		let src: Vec<RGBA8> = (1..=6).map(px).collect();

		let mut buf = src.clone();
		orient(&mut buf, 2, 1);
		assert_eq!(buf, src);

		let mut buf = src.clone();
		orient(&mut buf, 2, 2);
		assert_eq!(buf, [2, 1, 4, 3, 6, 5].map(px));

		let mut buf = src.clone();
		orient(&mut buf, 2, 4);
		assert_eq!(buf, [5, 6, 3, 4, 1, 2].map(px));

		let mut buf = src;
		orient(&mut buf, 2, 7);
		assert_eq!(buf, [6, 5, 4, 3, 2, 1].map(px));
	}

	#[test]
	fn t_cmyk() {
		assert_eq!(cmyk(0, 255), 255);
		assert_eq!(cmyk(255, 255), 0);
		assert_eq!(cmyk(0, 0), 0);
		assert_eq!(cmyk(51, 255), 204);
	}

	#[test]
	fn t_corrupt() {
		let cfg = Config::default();
		assert_eq!(
			ImageTiff::process(b"II*\0", &cfg),
			DecodeOutcome::Failed(RejpegError::DecodeTiff),
		);
		assert_eq!(
			ImageTiff::process(b"MM\0*\0\0\0\x08\xFF\xFF", &cfg),
			DecodeOutcome::Failed(RejpegError::DecodeTiff),
		);
	}
}
