/*!
# `Rejpeg` - PNG Images.
*/

use crate::{
	ColorKind,
	Config,
	RasterImage,
	RejpegError,
	Source,
};
use lodepng::{
	ColorMode,
	ColorType,
	Image,
};
use super::Decoder;



/// # PNG Signature.
const MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];



/// # PNG Image.
pub(crate) struct ImagePng;

impl Decoder for ImagePng {
	#[inline]
	fn recognize(raw: &[u8]) -> bool { raw.starts_with(&MAGIC) }

	/// # Decode.
	///
	/// Every PNG is first decoded to 8-bit RGBA, which takes care of
	/// unpacking low bit depths, expanding palettes and transparency keys,
	/// and dropping the low byte of 16-bit samples. The layout declared by
	/// the header then decides how that gets flattened to RGB.
	fn decode<'a>(raw: &'a [u8], cfg: &Config) -> Result<Source<'a>, RejpegError> {
		let mut decoder = lodepng::Decoder::new();
		decoder.info_raw_mut().colortype = ColorType::RGBA;
		decoder.info_raw_mut().set_bitdepth(8);

		let img = match decoder.decode(raw) {
			Ok(Image::RGBA(img)) => img,
			Ok(_) => return Err(RejpegError::Color),
			Err(_) => return Err(RejpegError::DecodePng),
		};

		let color = expanded_color(&decoder.info_png().color)
			.ok_or(RejpegError::Color)?;

		if cfg.verbose() {
			fyi_msg::Msg::info(format!(
				"PNG: {}x{}, {}.",
				img.width,
				img.height,
				color.as_str(),
			))
				.with_indent(1)
				.eprint();
		}

		RasterImage::from_rgba(&img.buffer, img.width, img.height, color, cfg.blend())
			.map(Source::Raster)
	}
}



/// # Expanded Color.
///
/// Return the layout the source would have after the standard expansion
/// transforms: greyscale stays greyscale, palettes become RGB, and a
/// transparency chunk of any kind adds an alpha channel.
fn expanded_color(mode: &ColorMode) -> Option<ColorKind> {
	let channels = match mode.colortype {
		ColorType::GREY => if mode.can_have_alpha() { 2 } else { 1 },
		ColorType::GREY_ALPHA => 2,
		ColorType::RGB => if mode.can_have_alpha() { 4 } else { 3 },
		ColorType::PALETTE => if mode.has_palette_alpha() { 4 } else { 3 },
		ColorType::RGBA => 4,
		_ => return None,
	};

	ColorKind::from_channels(channels)
}
