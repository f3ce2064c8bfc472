//! Matching entry points.
//!
//! [`Matcher`] compiles a template once and answers the four queries of the
//! engine against any number of sources: ranked non-overlapping matches, a
//! presence check, the single best position, and a scale sweep. The free
//! functions below are one-shot wrappers with the conventional defaults.

pub mod sweep;

pub use crate::candidate::select::{Match, Point};
pub use sweep::{find_best_scale, scale_grid, ScaleResult, NO_MATCH_SCORE};

use crate::candidate::select::select_matches_impl;
use crate::image::ImageView;
use crate::kernel::correlate_with;
use crate::surface::CorrelationSurface;
use crate::template::{Template, TemplatePlan};
use crate::trace::{trace_debug, trace_event, trace_span};
use crate::util::{CancelToken, NccMatchError, NccMatchResult};
use sweep::{sweep, validate_scale_params};

/// Configuration for matching queries.
#[derive(Clone, Debug, PartialEq)]
pub struct MatchConfig {
    /// Minimum score for matches returned by [`Matcher::find_matches`].
    pub min_threshold: f32,
    /// Maximum number of matches returned by [`Matcher::find_matches`].
    pub max_matches: usize,
    /// Score the global maximum must reach for [`Matcher::match_exists`].
    pub exist_threshold: f32,
    /// Score the global maximum must exceed for [`Matcher::best_position`].
    pub position_threshold: f32,
    /// Half-open scale interval `[lo, hi)` swept by [`Matcher::find_scale`].
    pub scale_range: (f64, f64),
    /// Distance between consecutive scales.
    pub scale_step: f64,
    /// Use rayon for correlation rows and scale sweeps (`rayon` feature).
    pub parallel: bool,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_threshold: 0.9,
            max_matches: 5,
            exist_threshold: 0.95,
            position_threshold: 0.9,
            scale_range: (0.5, 2.0),
            scale_step: 0.1,
            parallel: false,
        }
    }
}

impl MatchConfig {
    /// Validates thresholds and the scale grid parameters.
    pub fn validate(&self) -> NccMatchResult<()> {
        for threshold in [
            self.min_threshold,
            self.exist_threshold,
            self.position_threshold,
        ] {
            if !threshold.is_finite() {
                return Err(NccMatchError::InvalidInput("thresholds must be finite"));
            }
        }
        validate_scale_params(self.scale_range, self.scale_step)
    }
}

/// Center of the single best placement.
///
/// Unlike [`Match`], the center keeps the exact half-pixel offset of
/// odd-sized templates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Located {
    pub x: f32,
    pub y: f32,
    pub score: f32,
}

/// Template matcher holding a precomputed template plan.
///
/// A matcher is immutable after construction and can be shared across
/// threads; every query allocates its own working buffers.
#[derive(Clone, Debug)]
pub struct Matcher {
    plan: TemplatePlan,
    cfg: MatchConfig,
    cancel: Option<CancelToken>,
}

impl Matcher {
    /// Creates a matcher for a template view with the default configuration.
    pub fn new(template: ImageView<'_, u8>) -> Self {
        let plan = TemplatePlan::from_view(template);
        trace_debug!(
            "template_planned",
            width = plan.width(),
            height = plan.height(),
            mean = plan.mean(),
            variance = plan.variance()
        );
        Self {
            plan,
            cfg: MatchConfig::default(),
            cancel: None,
        }
    }

    /// Creates a matcher from an owned template.
    pub fn from_template(template: &Template) -> Self {
        Self::new(template.view())
    }

    /// Returns a matcher using `cfg`.
    pub fn with_config(mut self, cfg: MatchConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns a matcher that aborts long queries once `token` is cancelled.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Returns the template plan.
    pub fn plan(&self) -> &TemplatePlan {
        &self.plan
    }

    /// Returns the full correlation surface for `image`.
    pub fn correlate(&self, image: ImageView<'_, u8>) -> CorrelationSurface {
        correlate_with(image, &self.plan, self.cfg.parallel)
    }

    /// Returns up to `max_matches` non-overlapping matches above `min_threshold`.
    pub fn find_matches(&self, image: ImageView<'_, u8>) -> NccMatchResult<Vec<Match>> {
        self.cfg.validate()?;
        let _span = trace_span!("find_matches", max_matches = self.cfg.max_matches).entered();
        if self.cfg.max_matches == 0 {
            return Ok(Vec::new());
        }
        let surface = self.correlate(image);
        select_matches_impl(
            &surface,
            self.plan.size(),
            self.cfg.min_threshold,
            self.cfg.max_matches,
            self.cancel.as_ref(),
        )
    }

    /// Returns true if the best score reaches `exist_threshold`.
    pub fn match_exists(&self, image: ImageView<'_, u8>) -> NccMatchResult<bool> {
        self.cfg.validate()?;
        let best = self.correlate(image).max_peak();
        let exists = best.is_some_and(|peak| peak.score >= self.cfg.exist_threshold);
        trace_event!(
            "match_exists",
            exists = exists,
            best_score = best.map_or(NO_MATCH_SCORE, |peak| peak.score)
        );
        Ok(exists)
    }

    /// Returns the center of the best placement if it exceeds `position_threshold`.
    pub fn best_position(&self, image: ImageView<'_, u8>) -> NccMatchResult<Located> {
        self.cfg.validate()?;
        let threshold = self.cfg.position_threshold;
        let Some(peak) = self.correlate(image).max_peak() else {
            return Err(NccMatchError::NoMatchFound {
                best_score: NO_MATCH_SCORE,
                threshold,
            });
        };
        if peak.score <= threshold {
            return Err(NccMatchError::NoMatchFound {
                best_score: peak.score,
                threshold,
            });
        }

        let (w, h) = self.plan.size();
        let located = Located {
            x: peak.x as f32 + w as f32 / 2.0,
            y: peak.y as f32 + h as f32 / 2.0,
            score: peak.score,
        };
        trace_event!(
            "best_position",
            x = located.x,
            y = located.y,
            score = located.score
        );
        Ok(located)
    }

    /// Sweeps `scale_range` and returns the best scale and top-left position.
    pub fn find_scale(&self, image: ImageView<'_, u8>) -> NccMatchResult<ScaleResult> {
        self.cfg.validate()?;
        sweep(
            image,
            &self.plan,
            self.cfg.scale_range,
            self.cfg.scale_step,
            self.cfg.parallel,
            self.cancel.as_ref(),
        )
    }
}

/// Finds up to `matches_count` non-overlapping matches scoring at least
/// `min_threshold` (conventionally 0.9 and 5).
pub fn find_image_matches(
    source: ImageView<'_, u8>,
    template: ImageView<'_, u8>,
    min_threshold: f32,
    matches_count: usize,
) -> NccMatchResult<Vec<Match>> {
    Matcher::new(template)
        .with_config(MatchConfig {
            min_threshold,
            max_matches: matches_count,
            ..MatchConfig::default()
        })
        .find_matches(source)
}

/// Returns true if the template's best score reaches `threshold`
/// (conventionally 0.95).
pub fn quick_match_exist(
    source: ImageView<'_, u8>,
    template: ImageView<'_, u8>,
    threshold: f32,
) -> NccMatchResult<bool> {
    Matcher::new(template)
        .with_config(MatchConfig {
            exist_threshold: threshold,
            ..MatchConfig::default()
        })
        .match_exists(source)
}

/// Returns the center of the best placement, or `NoMatchFound` unless its
/// score is strictly above `threshold` (conventionally 0.9).
pub fn quick_match_position(
    source: ImageView<'_, u8>,
    template: ImageView<'_, u8>,
    threshold: f32,
) -> NccMatchResult<Located> {
    Matcher::new(template)
        .with_config(MatchConfig {
            position_threshold: threshold,
            ..MatchConfig::default()
        })
        .best_position(source)
}

/// Sweeps source scales over `[lo, hi)` (conventionally `(0.5, 2.0)` with
/// step 0.1) and returns the best scale, top-left position and score.
pub fn find_scale_and_position(
    source: ImageView<'_, u8>,
    template: ImageView<'_, u8>,
    scale_range: (f64, f64),
    scale_step: f64,
) -> NccMatchResult<ScaleResult> {
    Matcher::new(template)
        .with_config(MatchConfig {
            scale_range,
            scale_step,
            ..MatchConfig::default()
        })
        .find_scale(source)
}
