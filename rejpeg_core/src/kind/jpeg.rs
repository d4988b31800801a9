/*!
# `Rejpeg` - JPEG Images.

JPEG sources are never decoded here; once the header checks out the raw bytes
are handed to the encoder as-is.
*/

use crate::{
	Config,
	RejpegError,
	Source,
};
use super::{
	DecodeOutcome,
	Decoder,
};



/// # JPEG Image.
pub(crate) struct ImageJpeg;

impl Decoder for ImageJpeg {
	#[inline]
	/// # Recognize.
	///
	/// JPEGs have no separate signature check; the header parse in
	/// [`ImageJpeg::process`] is the recognition.
	fn recognize(_raw: &[u8]) -> bool { true }

	/// # Decode.
	///
	/// Parse the header for the dimensions.
	fn decode<'a>(raw: &'a [u8], cfg: &Config) -> Result<Source<'a>, RejpegError> {
		let mut decoder = jpeg_decoder::Decoder::new(raw);
		decoder.read_info().map_err(|_| RejpegError::UnknownFormat)?;
		let info = decoder.info().ok_or(RejpegError::UnknownFormat)?;
		if info.width == 0 || info.height == 0 {
			return Err(RejpegError::UnknownFormat);
		}

		if cfg.verbose() {
			fyi_msg::Msg::info(format!(
				"JPEG: {}x{}, passing through.",
				info.width,
				info.height,
			))
				.with_indent(1)
				.eprint();
		}

		Ok(Source::Jpeg {
			raw,
			width: usize::from(info.width),
			height: usize::from(info.height),
		})
	}

	/// # Process.
	///
	/// A JPEG that can't be parsed isn't a JPEG at all, so unlike the other
	/// formats, failure here means "not applicable".
	fn process<'a>(raw: &'a [u8], cfg: &Config) -> DecodeOutcome<'a> {
		match Self::decode(raw, cfg) {
			Ok(src) => DecodeOutcome::Decoded(src),
			Err(_) => DecodeOutcome::NotApplicable,
		}
	}
}
