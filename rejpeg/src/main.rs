/*!
# `Rejpeg`

Re-encode a PNG, TIFF, or JPEG source as a JPEG.
*/

#![warn(clippy::filetype_is_file)]
#![warn(clippy::integer_division)]
#![warn(clippy::needless_borrow)]
#![warn(clippy::nursery)]
#![warn(clippy::pedantic)]
#![warn(clippy::perf)]
#![warn(clippy::suboptimal_flops)]
#![warn(clippy::unneeded_field_pattern)]
#![warn(macro_use_extern_crate)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]
#![warn(missing_docs)]
#![warn(non_ascii_idents)]
#![warn(trivial_casts)]
#![warn(trivial_numeric_casts)]
#![warn(unreachable_pub)]
#![warn(unused_crate_dependencies)]
#![warn(unused_extern_crates)]
#![warn(unused_import_braces)]

#![allow(clippy::module_name_repetitions)]



mod cli;

use cli::Settings;
use rejpeg_core::{
	BaselineEncoder,
	Pipeline,
	RejpegError,
};



/// # Main.
///
/// This lets us bubble up errors so they can be pretty-printed, and exit
/// with the right code.
fn main() {
	if let Err(e) = _main() {
		cli::print_error(e);
		std::process::exit(e.exit_code());
	}
}

#[inline]
/// # Actual Main.
fn _main() -> Result<(), RejpegError> {
	let Settings { cfg, input, output } = Settings::new()?;

	let raw = input.read()?;
	let out = Pipeline::new(&cfg).run(&raw, &BaselineEncoder)?;
	output.write(&out)?;

	if cfg.verbose() { cli::print_success(raw.len(), out.len()); }
	Ok(())
}
