//! Correlation kernels.
//!
//! Every kernel computes the normalized correlation coefficient from exact
//! integer sums: window statistics come from an [`IntegralImage`] and the
//! template-window cross term is accumulated per placement. Because the sums
//! are exact, the scalar, SIMD and row-parallel kernels produce bit-identical
//! surfaces.

use crate::image::{ImageView, IntegralImage};
use crate::surface::CorrelationSurface;
use crate::template::TemplatePlan;
use crate::trace::trace_span;
use crate::util::math::{ccoeff_normed, WindowSums};

pub mod scalar;

#[cfg(feature = "simd")]
pub mod simd;

#[cfg(feature = "rayon")]
pub mod rayon;

#[cfg(not(feature = "simd"))]
pub(crate) use scalar::CcoeffScalar as Ccoeff;
#[cfg(feature = "simd")]
pub(crate) use simd::CcoeffSimd as Ccoeff;

/// Kernel trait for the normalized correlation coefficient.
///
/// Implementors only provide the cross term; scoring and the full scan are
/// shared so every kernel normalizes identically.
pub trait Kernel {
    /// Sum of `template * window` products with the template's top-left at
    /// `(x, y)`. The placement must be valid for `image`.
    fn cross(image: ImageView<'_, u8>, plan: &TemplatePlan, x: usize, y: usize) -> u64;

    /// Score at a single placement, `None` if the template does not fit there.
    fn score_at(
        image: ImageView<'_, u8>,
        integral: &IntegralImage,
        plan: &TemplatePlan,
        x: usize,
        y: usize,
    ) -> Option<f32> {
        let (tw, th) = plan.size();
        if x.checked_add(tw)? > image.width() || y.checked_add(th)? > image.height() {
            return None;
        }
        Some(score_placement::<Self>(image, integral, plan, x, y))
    }

    /// Scores every valid placement in row-major order.
    fn correlate(image: ImageView<'_, u8>, plan: &TemplatePlan) -> CorrelationSurface {
        let Some((width, height)) = CorrelationSurface::dims_for(image.size(), plan.size()) else {
            return CorrelationSurface::empty();
        };
        let _span = trace_span!("correlate", width = width, height = height).entered();

        let integral = IntegralImage::build(image);
        let mut scores = vec![0.0f32; width * height];
        for (y, row) in scores.chunks_mut(width).enumerate() {
            score_row::<Self>(image, &integral, plan, y, row);
        }
        CorrelationSurface::from_vec(width, height, scores)
    }
}

#[inline]
fn score_placement<K: Kernel + ?Sized>(
    image: ImageView<'_, u8>,
    integral: &IntegralImage,
    plan: &TemplatePlan,
    x: usize,
    y: usize,
) -> f32 {
    let (tw, th) = plan.size();
    let (sum, sum_sq) = integral.window(x, y, tw, th);
    // A flat template is scored from window statistics alone.
    let cross = if plan.is_flat() {
        0
    } else {
        K::cross(image, plan, x, y)
    };
    ccoeff_normed(plan.sums(), WindowSums { cross, sum, sum_sq })
}

/// Fills one surface row; shared by the sequential and parallel scans.
pub(crate) fn score_row<K: Kernel + ?Sized>(
    image: ImageView<'_, u8>,
    integral: &IntegralImage,
    plan: &TemplatePlan,
    y: usize,
    out: &mut [f32],
) {
    for (x, cell) in out.iter_mut().enumerate() {
        *cell = score_placement::<K>(image, integral, plan, x, y);
    }
}

/// Correlates with the default kernel (SIMD when the `simd` feature is on).
pub fn correlate(image: ImageView<'_, u8>, plan: &TemplatePlan) -> CorrelationSurface {
    <Ccoeff as Kernel>::correlate(image, plan)
}

/// Correlates sequentially or row-parallel.
#[cfg(feature = "rayon")]
pub fn correlate_with(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
    parallel: bool,
) -> CorrelationSurface {
    if parallel {
        self::rayon::correlate_par::<Ccoeff>(image, plan)
    } else {
        correlate(image, plan)
    }
}

/// Correlates sequentially; `parallel` needs the `rayon` feature.
#[cfg(not(feature = "rayon"))]
pub fn correlate_with(
    image: ImageView<'_, u8>,
    plan: &TemplatePlan,
    _parallel: bool,
) -> CorrelationSurface {
    correlate(image, plan)
}
