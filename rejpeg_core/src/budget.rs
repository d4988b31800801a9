/*!
# `Rejpeg` - Memory Budget
*/

use crate::RejpegError;
use std::fmt;



/// # Estimated Bytes Per Pixel.
///
/// An upper estimate of how much memory the encoder will need for each pixel
/// of the source.
pub const BYTES_PER_PIXEL: u64 = 110;

/// # Default Limit (MB).
pub const DEFAULT_LIMIT_MB: i64 = 6000;

/// # Lowest Workable Limit (MB).
///
/// Budgets below this are refused outright, regardless of image size.
pub const LOWEST_LIMIT_MB: i64 = 100;

/// # Disabled Sentinel.
const DISABLED: i64 = -1;



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Memory Budget.
///
/// This gates encoding on a rough estimate of the memory it will require.
/// The check happens _after_ decoding, so it bounds the subsequent work
/// rather than the decode itself.
pub struct MemoryBudget {
	/// # Limit in MB (`None` for unlimited).
	limit_mb: Option<i64>,
}

impl Default for MemoryBudget {
	#[inline]
	fn default() -> Self { Self::new(DEFAULT_LIMIT_MB) }
}

impl fmt::Display for MemoryBudget {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.limit_mb {
			Some(mb) => write!(f, "{mb} MB"),
			None => f.write_str("unlimited"),
		}
	}
}

impl MemoryBudget {
	#[must_use]
	/// # New.
	///
	/// A value of `-1` disables the budget; any other value is taken at face
	/// value, so negatives (and anything under [`LOWEST_LIMIT_MB`]) will
	/// always fail.
	pub const fn new(limit_mb: i64) -> Self {
		if limit_mb == DISABLED { Self::unlimited() }
		else { Self { limit_mb: Some(limit_mb) } }
	}

	#[must_use]
	/// # Unlimited.
	pub const fn unlimited() -> Self { Self { limit_mb: None } }

	#[must_use]
	/// # Limit (MB).
	pub const fn limit_mb(&self) -> Option<i64> { self.limit_mb }

	#[must_use]
	/// # Is Enabled?
	pub const fn is_enabled(&self) -> bool { self.limit_mb.is_some() }

	#[must_use]
	/// # Estimate (Bytes).
	///
	/// Return the estimated memory usage for an image of the given
	/// dimensions. The math is done in 128 bits, saturating at the top.
	pub const fn estimate(width: usize, height: usize) -> u128 {
		(width as u128 * height as u128).saturating_mul(BYTES_PER_PIXEL as u128)
	}

	/// # Check.
	///
	/// Make sure an image of the given dimensions fits within the budget.
	///
	/// ## Errors
	///
	/// Returns [`RejpegError::MemoryLimit`] if the budget is enabled and
	/// either the configured limit is below the floor, or the estimate
	/// exceeds it.
	pub const fn check(&self, width: usize, height: usize) -> Result<(), RejpegError> {
		if let Some(mb) = self.limit_mb {
			if mb < LOWEST_LIMIT_MB {
				return Err(RejpegError::MemoryLimit);
			}

			// Compare bytes rather than truncated megabytes so that partial
			// overages still count.
			#[expect(clippy::cast_sign_loss, reason = "It is at least 100.")]
			let limit = (mb as u128) << 20;
			if Self::estimate(width, height) > limit {
				return Err(RejpegError::MemoryLimit);
			}
		}

		Ok(())
	}
}
