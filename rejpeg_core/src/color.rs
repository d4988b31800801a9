/*!
# `Rejpeg` - Color Kind
*/



#[derive(Debug, Clone, Copy, Eq, PartialEq)]
/// # Decoded Color Layout.
///
/// This is the channel layout a decoder produced, after any expansion of
/// palettes, bit depths, or transparency keys.
pub enum ColorKind {
	/// # Greyscale.
	Grey,
	/// # Greyscale with Alpha.
	GreyAlpha,
	/// # RGB.
	Rgb,
	/// # RGB with Alpha.
	Rgba,
}

/// # Getters.
impl ColorKind {
	#[must_use]
	/// # From Channel Count.
	///
	/// Returns `None` for anything outside `1..=4`.
	pub const fn from_channels(channels: u32) -> Option<Self> {
		match channels {
			1 => Some(Self::Grey),
			2 => Some(Self::GreyAlpha),
			3 => Some(Self::Rgb),
			4 => Some(Self::Rgba),
			_ => None,
		}
	}

	#[inline]
	#[must_use]
	/// # Total Channels.
	///
	/// Return the number of channels.
	pub const fn channels(self) -> u32 {
		match self {
			Self::Grey => 1,
			Self::GreyAlpha => 2,
			Self::Rgb => 3,
			Self::Rgba => 4,
		}
	}

	#[inline]
	#[must_use]
	/// # Has Alpha?
	pub const fn has_alpha(self) -> bool {
		matches!(self, Self::GreyAlpha | Self::Rgba)
	}

	#[inline]
	#[must_use]
	/// # As Str.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Grey => "greyscale",
			Self::GreyAlpha => "greyscale+alpha",
			Self::Rgb => "RGB",
			Self::Rgba => "RGBA",
		}
	}
}
