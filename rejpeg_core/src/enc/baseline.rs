/*!
# `Rejpeg` - Baseline Encoder.

This is a plain, non-iterative JPEG encoder that satisfies the [`Encoder`]
contract using the requested quality directly. It exists so the pipeline can
run end-to-end without the perceptual optimizer linked in.
*/

use crate::{
	Encoder,
	raster::try_buffer,
	Params,
	RejpegError,
	Source,
	Stats,
};
use image::{
	codecs::jpeg::JpegEncoder,
	ExtendedColorType,
};
use jpeg_decoder::PixelFormat;
use std::borrow::Cow;



#[derive(Debug, Clone, Copy, Default)]
/// # Baseline Encoder.
pub struct BaselineEncoder;

impl Encoder for BaselineEncoder {
	fn process(&self, params: &Params, stats: &mut Stats, src: &Source<'_>)
	-> Result<Vec<u8>, RejpegError> {
		let width = u32::try_from(src.width()).map_err(|_| RejpegError::Overflow)?;
		let height = u32::try_from(src.height()).map_err(|_| RejpegError::Overflow)?;

		let pixels: Cow<[u8]> = match src {
			Source::Raster(img) => Cow::Borrowed(img.pixels()),
			Source::Jpeg { raw, .. } => Cow::Owned(jpeg_to_rgb(raw)?),
		};

		stats.debug(format!("Encoding {width}x{height} at {params}."));

		// The encoder insists on 1..=100.
		let quality = params.quality().clamp(1, 100);
		let mut out = try_buffer(pixels.len() / 4)?;
		JpegEncoder::new_with_quality(&mut out, quality)
			.encode(&pixels, width, height, ExtendedColorType::Rgb8)
			.map_err(|_| RejpegError::Encode)?;

		stats.record(out.len());
		Ok(out)
	}
}



/// # JPEG to RGB.
///
/// Fully decode a JPEG source into RGB pixels.
fn jpeg_to_rgb(mut raw: &[u8]) -> Result<Vec<u8>, RejpegError> {
	let mut jecoder = jpeg_decoder::Decoder::new(&mut raw);
	let pixels = jecoder.decode().map_err(|_| RejpegError::Encode)?;
	let info = jecoder.info().ok_or(RejpegError::Encode)?;

	match info.pixel_format {
		// Upscale greyscale to RGB.
		PixelFormat::L8 => {
			let mut out = try_buffer(pixels.len() * 3)?;
			for px in pixels { out.extend_from_slice(&[px, px, px]); }
			Ok(out)
		},
		PixelFormat::RGB24 => Ok(pixels),
		// Lossless and CMYK aren't supported.
		_ => Err(RejpegError::Encode),
	}
}



#[cfg(test)]
mod tests {
	use super::*;
	use crate::RasterImage;

	#[test]
	fn t_raster() {
		let img = RasterImage::new(vec![128; 16 * 8 * 3], 16, 8).expect("Bad image.");
		let mut stats = Stats::new(false);
		let out = BaselineEncoder.process(&Params::new(90), &mut stats, &Source::Raster(img))
			.expect("Encode failed.");

		assert!(out.starts_with(&[0xFF, 0xD8, 0xFF]));
		assert_eq!(stats.attempts(), 1);

		// And back again.
		let mut slice = out.as_slice();
		let mut jecoder = jpeg_decoder::Decoder::new(&mut slice);
		jecoder.read_info().expect("Invalid JPEG.");
		let info = jecoder.info().expect("Missing info.");
		assert_eq!((info.width, info.height), (16, 8));
	}

	#[test]
	fn t_raw_jpeg() {
		let img = RasterImage::new(vec![200; 8 * 8 * 3], 8, 8).expect("Bad image.");
		let mut stats = Stats::new(false);
		let first = BaselineEncoder.process(&Params::new(95), &mut stats, &Source::Raster(img))
			.expect("Encode failed.");

		let src = Source::Jpeg { raw: &first, width: 8, height: 8 };
		let second = BaselineEncoder.process(&Params::new(95), &mut stats, &src)
			.expect("Re-encode failed.");
		assert!(second.starts_with(&[0xFF, 0xD8, 0xFF]));
		assert_eq!(stats.attempts(), 2);
	}

	#[test]
	fn t_jpeg_to_rgb() {
		let mut raw = Vec::new();
		JpegEncoder::new_with_quality(&mut raw, 100)
			.encode(&[50_u8; 4 * 2 * 3], 4, 2, ExtendedColorType::Rgb8)
			.expect("JPEG encoding failed.");
		let out = jpeg_to_rgb(&raw).expect("Decode failed.");
		assert_eq!(out.len(), 4 * 2 * 3);
		assert!(out.iter().all(|&v| v.abs_diff(50) <= 2));

		// Greyscale is expanded.
		let mut raw = Vec::new();
		JpegEncoder::new_with_quality(&mut raw, 100)
			.encode(&[50_u8; 4 * 2], 4, 2, ExtendedColorType::L8)
			.expect("JPEG encoding failed.");
		let out = jpeg_to_rgb(&raw).expect("Decode failed.");
		assert_eq!(out.len(), 4 * 2 * 3);
		assert!(out.chunks_exact(3).all(|px| px[0] == px[1] && px[1] == px[2]));
	}

	#[test]
	fn t_bad_jpeg() {
		let src = Source::Jpeg { raw: b"nope", width: 1, height: 1 };
		let mut stats = Stats::new(false);
		assert_eq!(
			BaselineEncoder.process(&Params::new(95), &mut stats, &src),
			Err(RejpegError::Encode),
		);
	}
}
