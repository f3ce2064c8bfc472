//! Low-level building blocks for custom matching pipelines.
//!
//! These items expose template plans, kernels, integral images and the
//! selector for callers that want to keep a correlation surface around or
//! plug in their own ranking. Most users should prefer [`crate::Matcher`]
//! or the one-shot functions at the crate root.

pub use crate::candidate::peak::{sort_peaks_desc, Peak};
pub use crate::candidate::select::{select_matches, select_matches_cancellable};
pub use crate::image::resize::{resize, scaled_size, MAX_RESIZE_PIXELS};
pub use crate::image::IntegralImage;
pub use crate::kernel::scalar::CcoeffScalar;
#[cfg(feature = "simd")]
pub use crate::kernel::simd::CcoeffSimd;
pub use crate::kernel::Kernel;
pub use crate::surface::CorrelationSurface;
pub use crate::template::TemplatePlan;
