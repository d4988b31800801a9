/*!
# `Rejpeg` - Encoding
*/

#[cfg(feature = "baseline")] pub(super) mod baseline;
pub(super) mod quality;

use crate::{
	RejpegError,
	Source,
};
use dactyl::NiceU64;
use fyi_msg::Msg;



/// # Encoder.
///
/// This is the contract for the perceptual JPEG encoder sitting at the end
/// of the pipeline. From the pipeline's point of view it is a single
/// blocking call: pixels (or raw JPEG bytes) go in, a finished file comes
/// out.
pub trait Encoder {
	/// # Process.
	///
	/// Encode the source according to the parameters, recording whatever
	/// is useful to `stats` along the way.
	///
	/// ## Errors
	///
	/// Return [`RejpegError::Encode`] (or [`RejpegError::Allocation`]) if
	/// the source could not be encoded.
	fn process(&self, params: &quality::Params, stats: &mut Stats, src: &Source<'_>)
	-> Result<Vec<u8>, RejpegError>;
}



#[derive(Debug, Clone, Default, Eq, PartialEq)]
/// # Encoding Stats.
///
/// Counters and debug output for a single encoder run. Debug lines are only
/// printed (to STDERR) when the instance was created in debug mode.
pub struct Stats {
	/// # Debug?
	debug: bool,

	/// # Encoding Attempts.
	attempts: u32,

	/// # Output Size.
	size: u64,
}

impl Stats {
	#[must_use]
	/// # New.
	pub const fn new(debug: bool) -> Self {
		Self { debug, attempts: 0, size: 0 }
	}

	#[inline]
	#[must_use]
	/// # Encoding Attempts.
	pub const fn attempts(&self) -> u32 { self.attempts }

	#[inline]
	#[must_use]
	/// # Is Debug?
	pub const fn is_debug(&self) -> bool { self.debug }

	#[inline]
	#[must_use]
	/// # Output Size.
	pub const fn size(&self) -> u64 { self.size }

	/// # Debug.
	///
	/// Print a line of debug output, but only in debug mode.
	pub fn debug<S: AsRef<str>>(&self, msg: S) {
		if self.debug {
			Msg::plain(format!("\x1b[2m{}\x1b[0m", msg.as_ref()))
				.with_indent(1)
				.eprint();
		}
	}

	/// # Record Attempt.
	///
	/// Bump the attempt counter and note the size of the latest output.
	pub fn record(&mut self, size: usize) {
		self.attempts += 1;
		self.size = u64::try_from(size).unwrap_or(u64::MAX);
		self.debug(format!(
			"Attempt #{}: {} bytes.",
			self.attempts,
			NiceU64::from(self.size).as_str(),
		));
	}
}
