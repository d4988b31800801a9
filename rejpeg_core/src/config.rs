/*!
# `Rejpeg` - Configuration
*/

use crate::{
	BlendPolicy,
	MemoryBudget,
	Params,
};



/// # Default JPEG Quality.
pub const DEFAULT_QUALITY: u8 = 95;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Configuration.
///
/// Everything the pipeline needs to know about the run, built once up front
/// and passed by reference thereafter. Nothing here changes mid-run.
///
/// ## Examples
///
/// ```
/// use rejpeg_core::{BlendPolicy, Config};
///
/// let cfg = Config::default()
///     .with_quality(90)
///     .with_blend(BlendPolicy::OnWhite);
/// assert_eq!(cfg.quality(), 90);
/// ```
pub struct Config {
	/// # Requested JPEG Quality.
	quality: u8,

	/// # Memory Budget.
	budget: MemoryBudget,

	/// # Verbose?
	verbose: bool,

	/// # Alpha Backdrop.
	blend: BlendPolicy,
}

impl Default for Config {
	#[inline]
	fn default() -> Self {
		Self {
			quality: DEFAULT_QUALITY,
			budget: MemoryBudget::default(),
			verbose: false,
			blend: BlendPolicy::OnBlack,
		}
	}
}

/// ## Builders.
impl Config {
	#[must_use]
	/// # With Quality.
	pub const fn with_quality(self, quality: u8) -> Self {
		Self { quality, ..self }
	}

	#[must_use]
	/// # With Memory Budget.
	pub const fn with_budget(self, budget: MemoryBudget) -> Self {
		Self { budget, ..self }
	}

	#[must_use]
	/// # With Memory Limit (MB).
	///
	/// This is a convenience wrapper around [`MemoryBudget::new`]; `-1`
	/// disables the limit.
	pub const fn with_memory_limit(self, limit_mb: i64) -> Self {
		self.with_budget(MemoryBudget::new(limit_mb))
	}

	#[must_use]
	/// # With Verbosity.
	pub const fn with_verbose(self, verbose: bool) -> Self {
		Self { verbose, ..self }
	}

	#[must_use]
	/// # With Blend Policy.
	pub const fn with_blend(self, blend: BlendPolicy) -> Self {
		Self { blend, ..self }
	}
}

/// ## Getters.
impl Config {
	#[inline]
	#[must_use]
	/// # Blend Policy.
	pub const fn blend(&self) -> BlendPolicy { self.blend }

	#[inline]
	#[must_use]
	/// # Memory Budget.
	pub const fn budget(&self) -> MemoryBudget { self.budget }

	#[inline]
	#[must_use]
	/// # Encoder Parameters.
	pub fn params(&self) -> Params { Params::new(self.quality) }

	#[inline]
	#[must_use]
	/// # Requested Quality.
	pub const fn quality(&self) -> u8 { self.quality }

	#[inline]
	#[must_use]
	/// # Verbose?
	pub const fn verbose(&self) -> bool { self.verbose }
}
