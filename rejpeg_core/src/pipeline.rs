/*!
# `Rejpeg` - Pipeline
*/

use crate::{
	Config,
	DecodeOutcome,
	Encoder,
	ImageKind,
	MemoryBudget,
	RejpegError,
	Source,
	Stats,
};
use dactyl::NiceU64;
use fyi_msg::Msg;



#[derive(Debug, Clone, Copy)]
/// # Pipeline.
///
/// This ties everything together: raw bytes are matched to a decoder,
/// checked against the memory budget, and passed along to an encoder.
///
/// ## Examples
///
/// ```no_run
/// use rejpeg_core::{BaselineEncoder, Config, Pipeline};
///
/// let raw = std::fs::read("/path/to/image.png").unwrap();
/// let cfg = Config::default().with_quality(90);
/// let jpeg = Pipeline::new(&cfg).run(&raw, &BaselineEncoder).unwrap();
/// ```
pub struct Pipeline<'a> {
	/// # Settings.
	cfg: &'a Config,
}

impl<'a> Pipeline<'a> {
	#[inline]
	#[must_use]
	/// # New.
	pub const fn new(cfg: &'a Config) -> Self { Self { cfg } }

	/// # Dispatch.
	///
	/// Try each decoder in [`ImageKind::ORDER`]. The first one to claim the
	/// source decides the outcome, successful or not.
	///
	/// ## Errors
	///
	/// If a decoder claims the source but fails, its error is returned as-is.
	/// If no decoder claims it, [`RejpegError::UnknownFormat`] is returned.
	pub fn dispatch<'b>(&self, raw: &'b [u8]) -> Result<(ImageKind, Source<'b>), RejpegError> {
		for kind in ImageKind::ORDER {
			match kind.process(raw, self.cfg) {
				DecodeOutcome::NotApplicable => {
					self.debug(format!("Not {}.", kind.as_str()));
				},
				DecodeOutcome::Failed(e) => {
					self.debug(format!("{} decoding failed.", kind.as_str()));
					return Err(e);
				},
				DecodeOutcome::Decoded(src) => return Ok((kind, src)),
			}
		}

		if let Some(kind) = ImageKind::sniff(raw) {
			self.debug(format!("Looks like {kind}, but could not be read as one."));
		}
		Err(RejpegError::UnknownFormat)
	}

	/// # Run.
	///
	/// Decode the source, make sure it fits the memory budget, and encode
	/// it.
	///
	/// ## Errors
	///
	/// This will bubble up any decoding, budget, or encoding errors. An
	/// encoder returning zero bytes is treated as [`RejpegError::Encode`].
	pub fn run<E: Encoder>(&self, raw: &[u8], enc: &E) -> Result<Vec<u8>, RejpegError> {
		let (kind, src) = self.dispatch(raw)?;
		let (width, height) = src.dimensions();

		let budget: MemoryBudget = self.cfg.budget();
		if self.cfg.verbose() {
			Msg::info(format!(
				"{kind} source, {width}x{height}; {} estimated against {budget}.",
				estimate_mb(width, height),
			))
				.eprint();
		}
		budget.check(width, height)?;

		let mut stats = Stats::new(self.cfg.verbose());
		let out = enc.process(&self.cfg.params(), &mut stats, &src)?;
		if out.is_empty() { Err(RejpegError::Encode) }
		else { Ok(out) }
	}

	/// # Debug.
	fn debug(&self, msg: String) {
		if self.cfg.verbose() {
			Msg::plain(msg).with_indent(1).eprint();
		}
	}
}



/// # Estimate (MB).
///
/// Format the budget estimate for display, e.g. "1,234MB".
fn estimate_mb(width: usize, height: usize) -> String {
	let mb = MemoryBudget::estimate(width, height) >> 20;
	let mb = u64::try_from(mb).unwrap_or(u64::MAX);
	format!("{}MB", NiceU64::from(mb).as_str())
}
