//! Row-parallel correlation (feature-gated).
//!
//! Surface rows are independent, so each rayon task fills whole rows with the
//! same per-placement arithmetic as the sequential scan. The output is
//! identical to [`Kernel::correlate`].

use crate::image::{ImageView, IntegralImage};
use crate::kernel::{score_row, Kernel};
use crate::surface::CorrelationSurface;
use crate::template::TemplatePlan;
use crate::trace::trace_span;
use ::rayon::prelude::*;

/// Row-parallel full scan with kernel `K`.
pub fn correlate_par<K: Kernel>(image: ImageView<'_, u8>, plan: &TemplatePlan) -> CorrelationSurface {
    let Some((width, height)) = CorrelationSurface::dims_for(image.size(), plan.size()) else {
        return CorrelationSurface::empty();
    };
    let _span = trace_span!("correlate", width = width, height = height, parallel = true).entered();

    let integral = IntegralImage::build(image);
    let mut scores = vec![0.0f32; width * height];
    scores
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| score_row::<K>(image, &integral, plan, y, row));
    CorrelationSurface::from_vec(width, height, scores)
}
