//! Numeric helpers shared by the kernels and the search stages.

/// Exact sums for one template placement.
///
/// All sums are integers over `u8` samples, so the variance and covariance
/// terms below are exact; only the final normalization is floating point.
#[derive(Clone, Copy, Debug)]
pub(crate) struct WindowSums {
    /// Sum of template * window products.
    pub(crate) cross: u64,
    /// Sum of window samples.
    pub(crate) sum: u64,
    /// Sum of squared window samples.
    pub(crate) sum_sq: u64,
}

/// Template-side sums needed by [`ccoeff_normed`].
#[derive(Clone, Copy, Debug)]
pub(crate) struct TemplateSums {
    pub(crate) count: u64,
    pub(crate) sum: u64,
    /// `count * sum_sq - sum^2`, i.e. `count^2` times the variance.
    pub(crate) var_n: u128,
}

/// Returns `count * sum_sq - sum^2` without rounding.
pub(crate) fn scaled_variance(count: u64, sum: u64, sum_sq: u64) -> u128 {
    let lhs = u128::from(count) * u128::from(sum_sq);
    let rhs = u128::from(sum) * u128::from(sum);
    lhs.saturating_sub(rhs)
}

/// Normalized correlation coefficient for one placement.
///
/// Flat windows score 0 against a textured template. A flat template scores
/// 1 against a flat window of the same intensity and 0 against anything else.
pub(crate) fn ccoeff_normed(tpl: TemplateSums, win: WindowSums) -> f32 {
    let var_i = scaled_variance(tpl.count, win.sum, win.sum_sq);
    if tpl.var_n == 0 {
        return if var_i == 0 && win.sum == tpl.sum {
            1.0
        } else {
            0.0
        };
    }
    if var_i == 0 {
        return 0.0;
    }

    let num = i128::from(tpl.count) * i128::from(win.cross)
        - i128::from(tpl.sum) * i128::from(win.sum);
    let denom = (tpl.var_n as f64).sqrt() * (var_i as f64).sqrt();
    let score = num as f64 / denom;
    score.clamp(-1.0, 1.0) as f32
}

/// Length of the template diagonal, used as the exclusion radius.
pub(crate) fn diagonal(width: usize, height: usize) -> f64 {
    let w = width as f64;
    let h = height as f64;
    (w * w + h * h).sqrt()
}

/// Euclidean distance between two integer points.
pub(crate) fn distance(ax: usize, ay: usize, bx: usize, by: usize) -> f64 {
    let dx = ax as f64 - bx as f64;
    let dy = ay as f64 - by as f64;
    (dx * dx + dy * dy).sqrt()
}
