/*!
# `Rejpeg` - Raster Image
*/

use crate::{
	BlendPolicy,
	ColorKind,
	RejpegError,
};
use rgb::RGBA8;
use std::{
	fmt,
	ops::Deref,
};



#[derive(Clone, Eq, PartialEq)]
/// # Raster Image.
///
/// This holds canonical decoded pixels: three bytes (R, G, B) per pixel,
/// row-major, top to bottom, with any alpha already flattened.
///
/// The buffer length is always exactly `3 * width * height`.
///
/// The underlying buffer can be accessed through `Deref` as an `&[u8]`.
pub struct RasterImage {
	/// # Pixels.
	pixels: Vec<u8>,

	/// # Width.
	width: usize,

	/// # Height.
	height: usize,
}

impl AsRef<[u8]> for RasterImage {
	#[inline]
	fn as_ref(&self) -> &[u8] { self }
}

impl fmt::Debug for RasterImage {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("RasterImage")
		.field("width", &self.width)
		.field("height", &self.height)
		.finish_non_exhaustive()
	}
}

impl Deref for RasterImage {
	type Target = [u8];

	#[inline]
	fn deref(&self) -> &Self::Target { self.pixels.as_slice() }
}

/// ## Instantiation.
impl RasterImage {
	/// # New.
	///
	/// Wrap an existing RGB buffer.
	///
	/// ## Errors
	///
	/// This will return an error if the buffer length does not match the
	/// dimensions.
	pub fn new(pixels: Vec<u8>, width: usize, height: usize) -> Result<Self, RejpegError> {
		if pixels.len() == rgb_len(width, height)? {
			Ok(Self { pixels, width, height })
		}
		else { Err(RejpegError::Overflow) }
	}

	/// # From RGBA.
	///
	/// Flatten a 4-byte RGBA buffer to RGB according to the channel layout
	/// the source actually declared:
	///
	/// * Grey: the red sample is used for all three channels, unblended;
	/// * Grey + Alpha: the red sample is blended and used for all three;
	/// * RGB: samples are copied verbatim, alpha ignored;
	/// * RGBA: each sample is blended against the shared alpha;
	///
	/// ## Errors
	///
	/// Returns an error if the buffer is the wrong size for the dimensions or
	/// the output buffer cannot be allocated.
	pub(crate) fn from_rgba(
		src: &[RGBA8],
		width: usize,
		height: usize,
		color: ColorKind,
		blend: BlendPolicy,
	) -> Result<Self, RejpegError> {
		let size = rgb_len(width, height)?;
		if src.len() * 3 != size { return Err(RejpegError::Overflow); }

		let mut out = try_buffer(size)?;
		match color {
			ColorKind::Grey => for px in src {
				out.extend_from_slice(&[px.r, px.r, px.r]);
			},
			ColorKind::GreyAlpha => for px in src {
				let g = blend.blend(px.r, px.a);
				out.extend_from_slice(&[g, g, g]);
			},
			ColorKind::Rgb => for px in src {
				out.extend_from_slice(&[px.r, px.g, px.b]);
			},
			ColorKind::Rgba => for px in src {
				out.extend_from_slice(&[
					blend.blend(px.r, px.a),
					blend.blend(px.g, px.a),
					blend.blend(px.b, px.a),
				]);
			},
		}

		Ok(Self { pixels: out, width, height })
	}
}

/// ## Getters.
impl RasterImage {
	#[inline]
	#[must_use]
	/// # Height.
	pub const fn height(&self) -> usize { self.height }

	#[inline]
	#[must_use]
	/// # Pixels.
	pub fn pixels(&self) -> &[u8] { self }

	#[inline]
	#[must_use]
	/// # Take Pixels.
	///
	/// Consume the instance, stealing the pixels as an owned buffer.
	pub fn take_pixels(self) -> Vec<u8> { self.pixels }

	#[inline]
	#[must_use]
	/// # Width.
	pub const fn width(&self) -> usize { self.width }
}



/// # RGB Buffer Length.
///
/// ## Errors
///
/// Returns an error if `3 * width * height` overflows.
pub(crate) fn rgb_len(width: usize, height: usize) -> Result<usize, RejpegError> {
	width.checked_mul(height)
		.and_then(|x| x.checked_mul(3))
		.ok_or(RejpegError::Overflow)
}

/// # Try Buffer.
///
/// Return an empty vector with room for exactly `size` elements.
///
/// ## Errors
///
/// Allocation failure is reported as [`RejpegError::Allocation`] rather
/// than aborting the process.
pub(crate) fn try_buffer<T>(size: usize) -> Result<Vec<T>, RejpegError> {
	let mut out = Vec::new();
	out.try_reserve_exact(size).map_err(|_| RejpegError::Allocation)?;
	Ok(out)
}
