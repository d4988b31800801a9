/*!
# `Rejpeg` - Error
*/

use std::{
	error::Error,
	fmt,
};



/// # Help Text.
const HELP: &str = concat!(r"
Rejpeg v", env!("CARGO_PKG_VERSION"), r"
Re-encode PNG, TIFF, and JPEG sources as perceptually-tuned JPEGs.

USAGE:
    rejpeg [FLAGS] [OPTIONS] <INPUT> <OUTPUT>

FLAGS:
        --blend-on-white  Blend pixels with transparency on white instead of
                          black.
    -h, --help            Print help information and exit.
        --nomemlimit      Do not limit memory usage.
        --verbose         Print a verbose trace of all attempts to STDERR.
    -V, --version         Print version information and exit.

OPTIONS:
        --memlimit <NUM>  Memory limit in MB. Rejpeg will fail if unable to
                          stay under the limit. Use -1 to disable.
                          [default: 6000]
        --quality <NUM>   Visual quality to aim for, expressed as a JPEG
                          quality value. [default: 95]

TRAILING ARGS:
    <INPUT>               The source image, or '-' for STDIN.
    <OUTPUT>              The destination path, or '-' for STDOUT.
");



#[derive(Debug, Copy, Clone, Eq, PartialEq)]
/// # Errors.
pub enum RejpegError {
	/// # Buffer allocation failed.
	Allocation,

	/// # Unsupported channel layout.
	Color,

	/// # PNG decoding failed.
	DecodePng,

	/// # TIFF decoding failed.
	DecodeTiff,

	/// # Encoding failed.
	Encode,

	/// # Memory budget would be exceeded.
	MemoryLimit,

	/// # No decoder claimed the source.
	UnknownFormat,

	/// # Image dimensions are too big.
	Overflow,

	/// # Invalid quality value.
	Quality,

	/// # I/O read error.
	Read,

	/// # Invalid CLI usage.
	Usage,

	/// # Unsupported stream operation.
	Unsupported,

	/// # I/O write error.
	Write,

	/// # Print Help (Not an Error).
	PrintHelp,

	/// # Print Version (Not an Error).
	PrintVersion,
}

impl Error for RejpegError {}

impl AsRef<str> for RejpegError {
	#[inline]
	fn as_ref(&self) -> &str { self.as_str() }
}

impl fmt::Display for RejpegError {
	#[inline]
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl RejpegError {
	#[must_use]
	/// # As Str.
	///
	/// Return the error as an English string slice.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Allocation => "Insufficient memory available. Make sure that there is 300MB/MPix of memory available.",
			Self::Color => "Unsupported color channel layout.",
			Self::DecodePng => "Error reading PNG data from input file.",
			Self::DecodeTiff => "Error reading TIFF data from input file.",
			Self::Encode => "The image could not be encoded.",
			Self::MemoryLimit => "Memory limit would be exceeded. Failing.",
			Self::UnknownFormat => "Unknown file format.",
			Self::Overflow => "The image dimensions are out of range.",
			Self::Quality => "The quality must be a whole number.",
			Self::Read => "Unable to read the source file.",
			Self::Usage => "Invalid usage; run with --help for more information.",
			Self::Unsupported => "The operation is not supported by in-memory streams.",
			Self::Write => "Unable to save the file.",
			Self::PrintHelp => HELP,
			Self::PrintVersion => concat!("Rejpeg v", env!("CARGO_PKG_VERSION")),
		}
	}

	#[must_use]
	/// # Exit Code.
	///
	/// Help and version screens are successes. I/O and usage problems exit
	/// with `1`. Anything that goes wrong processing the image itself,
	/// including unrecognized sources, exits with `2`.
	pub const fn exit_code(self) -> i32 {
		match self {
			Self::PrintHelp | Self::PrintVersion => 0,
			Self::Quality | Self::Read | Self::Usage | Self::Write => 1,
			Self::Allocation |
			Self::Color |
			Self::DecodePng |
			Self::DecodeTiff |
			Self::Encode |
			Self::MemoryLimit |
			Self::Overflow |
			Self::UnknownFormat |
			Self::Unsupported => 2,
		}
	}
}
