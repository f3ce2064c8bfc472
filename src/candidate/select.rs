//! Greedy non-overlap selection over a correlation surface.
//!
//! Candidates are visited from the highest score down. A candidate is kept
//! only if its center is at least one template diagonal away from every
//! center kept so far, so two reported matches can never be the same
//! physical template instance. The walk stops at the first score below the
//! threshold or once enough matches are kept.

use crate::candidate::peak::{sort_peaks_desc, Peak};
use crate::surface::CorrelationSurface;
use crate::trace::trace_event;
use crate::util::cancel::check_opt;
use crate::util::math::{diagonal, distance};
use crate::util::{CancelToken, NccMatchResult};
use std::convert::Infallible;

/// Integer pixel coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: usize,
    pub y: usize,
}

impl Point {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// Match reported by the multi-match search.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Match {
    /// Center of the template footprint in source pixels.
    pub center: Point,
    /// Correlation score in `[-1, 1]`.
    pub score: f32,
}

impl Match {
    /// Builds a match from a placement, centering it with floor division.
    pub fn from_peak(peak: Peak, template_size: (usize, usize)) -> Self {
        let (w, h) = template_size;
        Self {
            center: Point::new(peak.x + w / 2, peak.y + h / 2),
            score: peak.score,
        }
    }
}

/// Selects up to `max_matches` non-overlapping matches scoring at least
/// `min_threshold`, in descending score order.
pub fn select_matches(
    surface: &CorrelationSurface,
    template_size: (usize, usize),
    min_threshold: f32,
    max_matches: usize,
) -> Vec<Match> {
    let selected = select_with(surface, template_size, min_threshold, max_matches, || {
        Ok::<(), Infallible>(())
    });
    match selected {
        Ok(matches) => matches,
        Err(never) => match never {},
    }
}

/// Same as [`select_matches`], polling `cancel` between candidates.
pub fn select_matches_cancellable(
    surface: &CorrelationSurface,
    template_size: (usize, usize),
    min_threshold: f32,
    max_matches: usize,
    cancel: &CancelToken,
) -> NccMatchResult<Vec<Match>> {
    select_matches_impl(
        surface,
        template_size,
        min_threshold,
        max_matches,
        Some(cancel),
    )
}

pub(crate) fn select_matches_impl(
    surface: &CorrelationSurface,
    template_size: (usize, usize),
    min_threshold: f32,
    max_matches: usize,
    cancel: Option<&CancelToken>,
) -> NccMatchResult<Vec<Match>> {
    select_with(surface, template_size, min_threshold, max_matches, || {
        check_opt(cancel)
    })
}

/// Greedy walk; `check` runs before each candidate and aborts on `Err`.
fn select_with<E, F>(
    surface: &CorrelationSurface,
    template_size: (usize, usize),
    min_threshold: f32,
    max_matches: usize,
    mut check: F,
) -> Result<Vec<Match>, E>
where
    F: FnMut() -> Result<(), E>,
{
    if max_matches == 0 || surface.is_empty() {
        return Ok(Vec::new());
    }

    // Everything below the threshold would end the walk, so it never needs
    // to be sorted.
    let mut candidates: Vec<Peak> = surface
        .peaks()
        .filter(|peak| peak.score >= min_threshold)
        .collect();
    sort_peaks_desc(&mut candidates);

    let radius = diagonal(template_size.0, template_size.1);
    let mut accepted: Vec<Match> = Vec::with_capacity(max_matches.min(candidates.len()));
    for peak in candidates {
        check()?;
        let candidate = Match::from_peak(peak, template_size);
        let clear = accepted.iter().all(|kept| {
            distance(
                kept.center.x,
                kept.center.y,
                candidate.center.x,
                candidate.center.y,
            ) >= radius
        });
        if clear {
            accepted.push(candidate);
            if accepted.len() == max_matches {
                break;
            }
        }
    }

    trace_event!("matches_selected", count = accepted.len());
    Ok(accepted)
}
