//! NccMatch is a CPU template matcher built on the normalized correlation
//! coefficient.
//!
//! The crate scores every placement of a grayscale template over a source,
//! selects ranked non-overlapping matches, answers quick presence and
//! position queries, and sweeps source scales to find the size at which a
//! template matches best. Parallel scans are available via the `rayon`
//! feature and SIMD cross terms via the `simd` feature; both produce the same
//! scores as the scalar path.

mod candidate;
pub mod image;
pub mod kernel;
pub mod lowlevel;
pub mod search;
pub mod surface;
pub mod template;
mod trace;
pub mod util;

#[cfg(feature = "image-io")]
pub use crate::image::io;
pub use crate::image::{ImageView, IntegralImage, Raster};
pub use kernel::{correlate, correlate_with, Kernel};
pub use surface::CorrelationSurface;
pub use template::{Template, TemplatePlan};
pub use util::{CancelToken, NccMatchError, NccMatchResult};

pub use candidate::peak::Peak;
pub use candidate::select::{select_matches, select_matches_cancellable};
pub use search::{
    find_best_scale, find_image_matches, find_scale_and_position, quick_match_exist,
    quick_match_position, scale_grid, Located, Match, MatchConfig, Matcher, Point, ScaleResult,
    NO_MATCH_SCORE,
};
