/*!
# `Rejpeg` - Library
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



mod blend;
mod budget;
mod color;
mod config;
mod enc;
mod error;
mod kind;
mod pipeline;
mod raster;
mod source;


pub use blend::BlendPolicy;
pub use budget::{
	BYTES_PER_PIXEL,
	DEFAULT_LIMIT_MB,
	LOWEST_LIMIT_MB,
	MemoryBudget,
};
pub use color::ColorKind;
pub use config::{
	Config,
	DEFAULT_QUALITY,
};
#[cfg(feature = "baseline")]
pub use enc::baseline::BaselineEncoder;
pub use enc::{
	Encoder,
	quality::{
		Params,
		target_for_quality,
	},
	Stats,
};
pub use error::RejpegError;
pub use kind::{
	DecodeOutcome,
	ImageKind,
};
pub use pipeline::Pipeline;
pub use raster::RasterImage;
pub use source::Source;
