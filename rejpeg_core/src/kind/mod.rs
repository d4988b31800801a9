/*!
# `Rejpeg` - Image Kinds
*/

pub(super) mod jpeg;
pub(super) mod png;
pub(super) mod tiff;

use crate::{
	Config,
	RejpegError,
	Source,
};
use std::fmt;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Image Kind.
///
/// The closed set of source formats, each backed by its own decoder.
pub enum ImageKind {
	/// # PNG.
	Png,

	/// # TIFF.
	Tiff,

	/// # JPEG.
	Jpeg,
}

impl AsRef<str> for ImageKind {
	#[inline]
	fn as_ref(&self) -> &str { self.as_str() }
}

impl fmt::Display for ImageKind {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl ImageKind {
	/// # Decoding Order.
	///
	/// Decoders are always tried in this order; the first to claim a source
	/// owns it.
	pub const ORDER: [Self; 3] = [Self::Png, Self::Tiff, Self::Jpeg];

	#[must_use]
	/// # As String Slice.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Png => "PNG",
			Self::Tiff => "TIFF",
			Self::Jpeg => "JPEG",
		}
	}

	#[must_use]
	/// # Sniff.
	///
	/// Guess the format from the leading bytes alone. This only feeds the
	/// verbose diagnostics for unrecognized sources; the decoders do their own
	/// recognition.
	pub fn sniff(src: &[u8]) -> Option<Self> {
		if png::ImagePng::recognize(src) { Some(Self::Png) }
		else if tiff::ImageTiff::recognize(src) { Some(Self::Tiff) }
		else if src.starts_with(&[0xFF, 0xD8, 0xFF]) { Some(Self::Jpeg) }
		else { None }
	}

	/// # Process.
	///
	/// Run this kind's recognition and decoding against the source.
	pub fn process<'a>(self, raw: &'a [u8], cfg: &Config) -> DecodeOutcome<'a> {
		match self {
			Self::Png => png::ImagePng::process(raw, cfg),
			Self::Tiff => tiff::ImageTiff::process(raw, cfg),
			Self::Jpeg => jpeg::ImageJpeg::process(raw, cfg),
		}
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Decode Outcome.
pub enum DecodeOutcome<'a> {
	/// # Not This Format.
	///
	/// The source does not match the decoder's signature; try the next one.
	NotApplicable,

	/// # Decoding Failed.
	///
	/// The signature matched, but the payload could not be decoded. This is
	/// terminal; no other decoders are tried.
	Failed(RejpegError),

	/// # Decoded.
	Decoded(Source<'a>),
}

impl DecodeOutcome<'_> {
	#[inline]
	#[must_use]
	/// # Is Not Applicable?
	pub const fn is_not_applicable(&self) -> bool { matches!(self, Self::NotApplicable) }
}



/// # Decoder.
///
/// This is implemented for each source format.
pub(super) trait Decoder {
	/// # Recognize.
	///
	/// Return `true` if the source carries this format's signature.
	fn recognize(raw: &[u8]) -> bool;

	/// # Decode.
	///
	/// Decode a recognized source.
	///
	/// ## Errors
	///
	/// Return any errors encountered during decoding.
	fn decode<'a>(raw: &'a [u8], cfg: &Config) -> Result<Source<'a>, RejpegError>;

	/// # Process.
	///
	/// Recognize, then decode.
	fn process<'a>(raw: &'a [u8], cfg: &Config) -> DecodeOutcome<'a> {
		if ! Self::recognize(raw) { return DecodeOutcome::NotApplicable; }
		match Self::decode(raw, cfg) {
			Ok(src) => DecodeOutcome::Decoded(src),
			Err(e) => DecodeOutcome::Failed(e),
		}
	}
}
