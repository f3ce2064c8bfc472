//! Exhaustive scale sweep.
//!
//! The source is resized by every factor on the grid `lo, lo + step, ...`
//! below `hi` and correlated against the unchanged template. The score curve
//! over scale is not assumed to be unimodal, so every grid point is visited.
//! The best placement wins on strict `>`; on exact ties the smaller scale is
//! kept. The parallel sweep reduces in grid order and returns the same result.

use crate::candidate::peak::Peak;
use crate::candidate::select::Point;
use crate::image::resize::resize;
use crate::image::ImageView;
use crate::kernel::correlate;
use crate::template::TemplatePlan;
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::cancel::check_opt;
use crate::util::{CancelToken, NccMatchError, NccMatchResult};

/// Score reported when no scale admits a placement.
pub const NO_MATCH_SCORE: f32 = -1.0;

/// Upper bound on the number of grid points in one sweep.
const MAX_GRID_POINTS: f64 = 1.0e6;

/// Best scale and placement found by a sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleResult {
    /// Winning scale factor, `None` if no scale admitted a placement.
    pub scale: Option<f64>,
    /// Top-left of the best placement in the resized source.
    pub position: Option<Point>,
    /// Best score, or [`NO_MATCH_SCORE`].
    pub score: f32,
}

impl ScaleResult {
    /// Result for a sweep where nothing could be evaluated.
    pub fn not_found() -> Self {
        Self {
            scale: None,
            position: None,
            score: NO_MATCH_SCORE,
        }
    }

    /// Returns true if some scale produced a placement.
    pub fn is_found(&self) -> bool {
        self.scale.is_some()
    }
}

/// Checks sweep parameters without building the grid.
pub(crate) fn validate_scale_params(scale_range: (f64, f64), scale_step: f64) -> NccMatchResult<()> {
    let (lo, hi) = scale_range;
    if !lo.is_finite() || !hi.is_finite() {
        return Err(NccMatchError::InvalidInput("scale range must be finite"));
    }
    if lo <= 0.0 {
        return Err(NccMatchError::InvalidInput("scale range must be positive"));
    }
    if !scale_step.is_finite() || scale_step <= 0.0 {
        return Err(NccMatchError::InvalidInput("scale step must be positive"));
    }
    if hi > lo && (hi - lo) / scale_step > MAX_GRID_POINTS {
        return Err(NccMatchError::InvalidInput("scale step is too small for the range"));
    }
    Ok(())
}

/// Returns the ascending scale grid `lo + i * step` for all values below `hi`.
///
/// Values are computed from the index, so the grid does not drift. An empty
/// range (`lo >= hi`) yields an empty grid.
pub fn scale_grid(scale_range: (f64, f64), scale_step: f64) -> NccMatchResult<Vec<f64>> {
    validate_scale_params(scale_range, scale_step)?;
    let (lo, hi) = scale_range;
    let mut grid = Vec::new();
    let mut i = 0u32;
    loop {
        let scale = lo + f64::from(i) * scale_step;
        if scale >= hi {
            break;
        }
        grid.push(scale);
        i += 1;
    }
    Ok(grid)
}

/// Finds the scale of `source` at which `template` correlates best.
pub fn find_best_scale(
    source: ImageView<'_, u8>,
    template: ImageView<'_, u8>,
    scale_range: (f64, f64),
    scale_step: f64,
) -> NccMatchResult<ScaleResult> {
    let plan = TemplatePlan::from_view(template);
    sweep(source, &plan, scale_range, scale_step, false, None)
}

/// Resizes the source and returns its best placement, `None` if skipped.
fn evaluate_scale(source: ImageView<'_, u8>, plan: &TemplatePlan, scale: f64) -> Option<Peak> {
    let (tw, th) = plan.size();
    let resized = match resize(source, scale) {
        Some(resized) if resized.view().fits(tw, th) => resized,
        _ => {
            trace_debug!("scale_skipped", scale = scale);
            return None;
        }
    };
    let peak = correlate(resized.view(), plan).max_peak()?;
    trace_debug!(
        "scale_evaluated",
        scale = scale,
        x = peak.x,
        y = peak.y,
        score = peak.score
    );
    Some(peak)
}

fn reduce<I>(evaluated: I) -> ScaleResult
where
    I: IntoIterator<Item = (f64, Option<Peak>)>,
{
    let mut best = ScaleResult::not_found();
    for (scale, peak) in evaluated {
        let Some(peak) = peak else { continue };
        if peak.score > best.score {
            best = ScaleResult {
                scale: Some(scale),
                position: Some(Point::new(peak.x, peak.y)),
                score: peak.score,
            };
        }
    }
    best
}

pub(crate) fn sweep(
    source: ImageView<'_, u8>,
    plan: &TemplatePlan,
    scale_range: (f64, f64),
    scale_step: f64,
    parallel: bool,
    cancel: Option<&CancelToken>,
) -> NccMatchResult<ScaleResult> {
    let grid = scale_grid(scale_range, scale_step)?;
    let _span = trace_span!("scale_sweep", scales = grid.len(), parallel = parallel).entered();

    let best = if parallel {
        sweep_par(source, plan, &grid, cancel)?
    } else {
        sweep_seq(source, plan, &grid, cancel)?
    };

    trace_event!(
        "scale_sweep_done",
        found = best.is_found(),
        scale = best.scale.unwrap_or(f64::NAN),
        score = best.score
    );
    Ok(best)
}

fn sweep_seq(
    source: ImageView<'_, u8>,
    plan: &TemplatePlan,
    grid: &[f64],
    cancel: Option<&CancelToken>,
) -> NccMatchResult<ScaleResult> {
    let mut evaluated = Vec::with_capacity(grid.len());
    for &scale in grid {
        check_opt(cancel)?;
        evaluated.push((scale, evaluate_scale(source, plan, scale)));
    }
    Ok(reduce(evaluated))
}

#[cfg(feature = "rayon")]
fn sweep_par(
    source: ImageView<'_, u8>,
    plan: &TemplatePlan,
    grid: &[f64],
    cancel: Option<&CancelToken>,
) -> NccMatchResult<ScaleResult> {
    use ::rayon::prelude::*;

    let evaluated = grid
        .par_iter()
        .map(|&scale| {
            check_opt(cancel)?;
            Ok((scale, evaluate_scale(source, plan, scale)))
        })
        .collect::<NccMatchResult<Vec<_>>>()?;
    Ok(reduce(evaluated))
}

#[cfg(not(feature = "rayon"))]
fn sweep_par(
    source: ImageView<'_, u8>,
    plan: &TemplatePlan,
    grid: &[f64],
    cancel: Option<&CancelToken>,
) -> NccMatchResult<ScaleResult> {
    sweep_seq(source, plan, grid, cancel)
}

#[cfg(test)]
mod tests {
    use super::{reduce, scale_grid, ScaleResult, NO_MATCH_SCORE};
    use crate::candidate::peak::Peak;
    use crate::util::NccMatchError;

    #[test]
    fn grid_excludes_the_upper_bound() {
        let grid = scale_grid((0.5, 2.0), 0.1).unwrap();
        assert_eq!(grid.len(), 15);
        assert_eq!(grid[0], 0.5);
        assert!(grid.iter().all(|&s| (0.5..2.0).contains(&s)));
        assert!(grid.windows(2).all(|w| w[0] < w[1]));

        let grid = scale_grid((1.0, 2.0), 0.5).unwrap();
        assert_eq!(grid, vec![1.0, 1.5]);
    }

    #[test]
    fn empty_range_and_invalid_parameters() {
        assert!(scale_grid((2.0, 1.0), 0.1).unwrap().is_empty());
        assert!(scale_grid((1.0, 1.0), 0.1).unwrap().is_empty());
        for (range, step) in [
            ((0.5, 2.0), 0.0),
            ((0.5, 2.0), -0.1),
            ((0.0, 2.0), 0.1),
            ((0.5, f64::INFINITY), 0.1),
            ((0.5, 2.0), f64::NAN),
            ((0.5, 2.0), 1e-9),
        ] {
            assert!(matches!(
                scale_grid(range, step),
                Err(NccMatchError::InvalidInput(_))
            ));
        }
    }

    #[test]
    fn reduce_keeps_the_earliest_of_equal_scores() {
        let peak = |x, score| Some(Peak { x, y: 0, score });
        let best = reduce(vec![
            (0.5, None),
            (0.6, peak(1, 0.8)),
            (0.7, peak(2, 0.9)),
            (0.8, peak(3, 0.9)),
            (0.9, peak(4, 0.1)),
        ]);
        assert_eq!(best.scale, Some(0.7));
        assert_eq!(best.position.map(|p| p.x), Some(2));
        assert_eq!(best.score, 0.9);

        let none = reduce(vec![(0.5, None)]);
        assert_eq!(none, ScaleResult::not_found());
        assert_eq!(none.score, NO_MATCH_SCORE);
        assert!(!none.is_found());
    }
}
