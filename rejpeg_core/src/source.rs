/*!
# `Rejpeg` - Encoder Source
*/

use crate::RasterImage;



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Encoder Source.
///
/// This is what a successful decode hands to the encoder: either canonical
/// RGB pixels, or, for JPEG sources, the untouched file bytes along with the
/// dimensions from the header.
pub enum Source<'a> {
	/// # Decoded Pixels.
	Raster(RasterImage),

	/// # Raw JPEG.
	Jpeg {
		/// # File Bytes.
		raw: &'a [u8],

		/// # Width.
		width: usize,

		/// # Height.
		height: usize,
	},
}

impl Source<'_> {
	#[must_use]
	/// # Width.
	pub fn width(&self) -> usize {
		match self {
			Self::Raster(img) => img.width(),
			Self::Jpeg { width, .. } => *width,
		}
	}

	#[must_use]
	/// # Height.
	pub fn height(&self) -> usize {
		match self {
			Self::Raster(img) => img.height(),
			Self::Jpeg { height, .. } => *height,
		}
	}

	#[must_use]
	/// # Dimensions.
	pub fn dimensions(&self) -> (usize, usize) { (self.width(), self.height()) }
}
