/*!
# `Rejpeg` - Alpha Blending

The encoder has no notion of transparency, so any alpha channel has to be
flattened against a solid backdrop before the pixels are handed off.
*/

use std::fmt;



#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
/// # Blend Policy.
///
/// This determines the backdrop transparent pixels are composited against.
/// It is chosen once per run and applied uniformly to every decoder.
pub enum BlendPolicy {
	#[default]
	/// # Black Backdrop.
	OnBlack,

	/// # White Backdrop.
	OnWhite,
}

impl fmt::Display for BlendPolicy {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl BlendPolicy {
	#[must_use]
	/// # As Str.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::OnBlack => "black",
			Self::OnWhite => "white",
		}
	}

	#[inline]
	#[must_use]
	/// # Blend.
	///
	/// Composite a single sample against the backdrop.
	///
	/// Black uses rounded integer scaling: `(value * alpha + 128) / 255`.
	///
	/// White only touches fully transparent samples; anything with an alpha
	/// of at least one passes through unchanged, so partially transparent
	/// samples are never lightened.
	pub const fn blend(self, value: u8, alpha: u8) -> u8 {
		match self {
			Self::OnBlack => scale(value, alpha),
			Self::OnWhite =>
				if alpha == 0 { 255 - scale(value, alpha) }
				else { value },
		}
	}
}



#[expect(clippy::cast_possible_truncation, reason = "The result is at most 255.")]
#[expect(clippy::integer_division, reason = "Truncation is the point.")]
#[inline]
/// # Scale by Alpha.
const fn scale(value: u8, alpha: u8) -> u8 {
	((value as u16 * alpha as u16 + 128) / 255) as u8
}



#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn t_on_black() {
		for (v, a, expected) in [
			(0, 0, 0),
			(255, 255, 255),
			(200, 0, 0),
			(128, 128, 64),
			(255, 1, 1),
			(1, 1, 0),
		] {
			assert_eq!(BlendPolicy::OnBlack.blend(v, a), expected, "{v}/{a}");
		}
	}

	#[test]
	fn t_on_black_full_range() {
		for v in 0..=255_u8 {
			for a in 0..=255_u8 {
				let expected = (u32::from(v) * u32::from(a) + 128) / 255;
				assert_eq!(u32::from(BlendPolicy::OnBlack.blend(v, a)), expected);
			}

			// Opaque is always a passthrough.
			assert_eq!(BlendPolicy::OnBlack.blend(v, 255), v);
		}
	}

	#[test]
	fn t_on_white() {
		for v in 0..=255_u8 {
			// Fully transparent always goes white.
			assert_eq!(BlendPolicy::OnWhite.blend(v, 0), 255);

			// Everything else is left alone.
			for a in 1..=255_u8 {
				assert_eq!(BlendPolicy::OnWhite.blend(v, a), v);
			}
		}
	}

	#[test]
	fn t_default() {
		assert_eq!(BlendPolicy::default(), BlendPolicy::OnBlack);
	}
}
