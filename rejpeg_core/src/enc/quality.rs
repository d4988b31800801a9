/*!
# `Rejpeg` - Encoding Quality.
*/

use std::fmt;



/// # Lowest Mapped Quality.
const MIN_QUALITY: u8 = 70;

/// # Highest Mapped Quality.
const MAX_QUALITY: u8 = 100;

/// # Perceptual Distance By Quality.
///
/// One entry for each JPEG quality from `70..=100`. Higher qualities demand
/// smaller perceptual distances.
const SCORE_FOR_QUALITY: [f64; 31] = [
	2.810_761, // 70
	2.729_300,
	2.689_687,
	2.636_811,
	2.547_863,
	2.525_400,
	2.473_416,
	2.366_133,
	2.338_078,
	2.318_654,
	2.201_674, // 80
	2.145_517,
	2.087_322,
	2.009_328,
	1.945_456,
	1.900_112,
	1.805_701,
	1.750_194,
	1.644_175,
	1.562_165,
	1.473_608, // 90
	1.382_021,
	1.294_298,
	1.185_402,
	1.066_781,
	0.971_769, // 95
	0.852_901,
	0.724_544,
	0.611_302,
	0.443_185,
	0.211_578, // 100
];



#[derive(Debug, Clone, Copy, PartialEq)]
/// # Encoder Parameters.
pub struct Params {
	/// # Requested JPEG Quality.
	quality: u8,

	/// # Target Perceptual Distance.
	target: f32,
}

impl fmt::Display for Params {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "quality {} (target distance {:.4})", self.quality, self.target)
	}
}

impl Params {
	#[must_use]
	/// # New.
	///
	/// Derive the encoder parameters from a requested JPEG quality.
	pub fn new(quality: u8) -> Self {
		#[expect(clippy::cast_possible_truncation, reason = "The table is small.")]
		let target = target_for_quality(f64::from(quality)) as f32;
		Self { quality, target }
	}

	#[inline]
	#[must_use]
	/// # Requested Quality.
	pub const fn quality(&self) -> u8 { self.quality }

	#[inline]
	#[must_use]
	/// # Target Perceptual Distance.
	pub const fn target(&self) -> f32 { self.target }
}



#[must_use]
/// # Target For Quality.
///
/// Map a JPEG quality to the perceptual distance the encoder should aim
/// for. Values are clamped to `70..=100`, with linear interpolation between
/// whole qualities.
pub fn target_for_quality(quality: f64) -> f64 {
	let quality = quality.clamp(f64::from(MIN_QUALITY), f64::from(MAX_QUALITY));

	#[expect(clippy::cast_possible_truncation, reason = "It is clamped.")]
	#[expect(clippy::cast_sign_loss, reason = "It is clamped.")]
	let idx = quality.trunc() as usize - usize::from(MIN_QUALITY);

	let mix = quality.fract();
	let lo = SCORE_FOR_QUALITY[idx];
	match SCORE_FOR_QUALITY.get(idx + 1) {
		Some(&hi) if 0.0 < mix => lo.mul_add(1.0 - mix, hi * mix),
		_ => lo,
	}
}
