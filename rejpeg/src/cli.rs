/*!
# `Rejpeg` - CLI
*/

use argyle::Argument;
use dactyl::NiceU64;
use fyi_msg::Msg;
use rejpeg_core::{
	BlendPolicy,
	Config,
	RejpegError,
};
use std::{
	ffi::OsString,
	io::{
		Read,
		Write,
	},
	path::PathBuf,
};



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Stream.
///
/// An input or output location: either a file, or `-` for STDIN/STDOUT.
pub(super) enum Stream {
	/// # STDIN/STDOUT.
	Std,

	/// # File.
	Path(PathBuf),
}

impl From<OsString> for Stream {
	fn from(src: OsString) -> Self {
		if src == "-" { Self::Std }
		else { Self::Path(PathBuf::from(src)) }
	}
}

impl Stream {
	/// # Read.
	///
	/// Read the entire source into memory.
	///
	/// ## Errors
	///
	/// Any I/O failure, or an empty source, is returned as
	/// [`RejpegError::Read`].
	pub(super) fn read(&self) -> Result<Vec<u8>, RejpegError> {
		let raw = match self {
			Self::Std => {
				let mut out = Vec::new();
				std::io::stdin().lock()
					.read_to_end(&mut out)
					.map_err(|_| RejpegError::Read)?;
				out
			},
			Self::Path(p) => std::fs::read(p).map_err(|_| RejpegError::Read)?,
		};

		if raw.is_empty() { Err(RejpegError::Read) }
		else { Ok(raw) }
	}

	/// # Write.
	///
	/// Files are written atomically; STDOUT just gets the bytes.
	///
	/// ## Errors
	///
	/// Any I/O failure is returned as [`RejpegError::Write`].
	pub(super) fn write(&self, data: &[u8]) -> Result<(), RejpegError> {
		match self {
			Self::Std => {
				let mut handle = std::io::stdout().lock();
				handle.write_all(data)
					.and_then(|()| handle.flush())
					.map_err(|_| RejpegError::Write)
			},
			Self::Path(p) => write_atomic::write_file(p, data)
				.map_err(|_| RejpegError::Write),
		}
	}
}



#[derive(Debug, Clone, Eq, PartialEq)]
/// # Settings.
///
/// The parsed command line.
pub(super) struct Settings {
	/// # Pipeline Configuration.
	pub(super) cfg: Config,

	/// # Input.
	pub(super) input: Stream,

	/// # Output.
	pub(super) output: Stream,
}

impl Settings {
	/// # From Environment.
	///
	/// ## Errors
	///
	/// See [`Settings::parse`].
	pub(super) fn new() -> Result<Self, RejpegError> {
		let args = argyle::args()
			.with_keywords(include!(concat!(env!("OUT_DIR"), "/argyle.rs")));
		Self::parse(args)
	}

	/// # Parse.
	///
	/// ## Errors
	///
	/// Help and version requests short-circuit with the corresponding
	/// pseudo-error. Unknown flags, bad values, or anything other than
	/// exactly two paths are returned as [`RejpegError::Usage`] (or
	/// [`RejpegError::Quality`] for a quality that isn't a whole number).
	pub(super) fn parse<I>(args: I) -> Result<Self, RejpegError>
	where I: IntoIterator<Item=Argument> {
		let mut cfg = Config::default();
		let mut paths: Vec<OsString> = Vec::with_capacity(2);

		for arg in args {
			match arg {
				Argument::Key("--blend-on-white") => {
					cfg = cfg.with_blend(BlendPolicy::OnWhite);
				},
				Argument::Key("-h" | "--help") => return Err(RejpegError::PrintHelp),
				Argument::Key("--nomemlimit") => { cfg = cfg.with_memory_limit(-1); },
				Argument::Key("--verbose") => { cfg = cfg.with_verbose(true); },
				Argument::Key("-V" | "--version") => return Err(RejpegError::PrintVersion),

				Argument::KeyWithValue("--memlimit", s) => {
					let limit = s.trim().parse::<i64>().map_err(|_| RejpegError::Usage)?;
					cfg = cfg.with_memory_limit(limit);
				},
				Argument::KeyWithValue("--quality", s) => {
					// Any whole number will do; it gets clamped.
					let quality = s.trim().parse::<i64>().map_err(|_| RejpegError::Quality)?;
					cfg = cfg.with_quality(u8::try_from(quality.clamp(0, 100)).unwrap_or(100));
				},

				// Paths, or typos.
				Argument::Other(s) => {
					if s.starts_with('-') && s != "-" { return Err(RejpegError::Usage); }
					paths.push(OsString::from(s));
				},
				Argument::InvalidUtf8(s) => { paths.push(s); },

				// Everything after "--" is a path, whatever it looks like.
				Argument::End(rest) => { paths.extend(rest); },

				// Nothing else is relevant.
				_ => {},
			}
		}

		if paths.len() != 2 { return Err(RejpegError::Usage); }
		let output = Stream::from(paths.remove(1));
		let input = Stream::from(paths.remove(0));

		Ok(Self { cfg, input, output })
	}
}



/// # Print Error.
pub(super) fn print_error(err: RejpegError) {
	match err {
		RejpegError::PrintHelp | RejpegError::PrintVersion => {
			println!("{}", err.as_str());
		},
		_ => { Msg::error(err.as_str()).eprint(); },
	}
}

/// # Print Success.
///
/// This goes to STDERR in case STDOUT is busy holding the image.
pub(super) fn print_success(src_size: usize, dst_size: usize) {
	let src_size = u64::try_from(src_size).unwrap_or(u64::MAX);
	let dst_size = u64::try_from(dst_size).unwrap_or(u64::MAX);
	Msg::success(format!(
		"Wrote {} bytes. \x1b[2m(Source: {} bytes.)\x1b[0m",
		NiceU64::from(dst_size).as_str(),
		NiceU64::from(src_size).as_str(),
	))
		.eprint();
}
