//! Dense correlation surfaces.

use crate::candidate::peak::Peak;

/// Score grid with one cell per valid template placement.
///
/// Cell `(x, y)` holds the score with the template's top-left corner at
/// column `x`, row `y` of the source. The grid has
/// `source.width - template.width + 1` columns and
/// `source.height - template.height + 1` rows, and is empty (0x0) when the
/// template does not fit.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationSurface {
    width: usize,
    height: usize,
    scores: Vec<f32>,
}

impl CorrelationSurface {
    /// Returns the surface with no valid placements.
    pub fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            scores: Vec::new(),
        }
    }

    /// Surface dimensions for a source and a template, `None` if it does not fit.
    pub fn dims_for(
        source: (usize, usize),
        template: (usize, usize),
    ) -> Option<(usize, usize)> {
        let (sw, sh) = source;
        let (tw, th) = template;
        if tw > sw || th > sh {
            return None;
        }
        Some((sw - tw + 1, sh - th + 1))
    }

    pub(crate) fn from_vec(width: usize, height: usize, scores: Vec<f32>) -> Self {
        debug_assert_eq!(scores.len(), width * height);
        Self {
            width,
            height,
            scores,
        }
    }

    /// Number of valid x offsets.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Number of valid y offsets.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns true if no placement is valid.
    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Row-major scores.
    pub fn as_slice(&self) -> &[f32] {
        &self.scores
    }

    /// Score at placement `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> Option<f32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.scores.get(y * self.width + x).copied()
    }

    /// Scores of placement row `y`.
    pub fn row(&self, y: usize) -> Option<&[f32]> {
        if y >= self.height {
            return None;
        }
        self.scores.get(y * self.width..(y + 1) * self.width)
    }

    /// Global maximum, first occurrence in row-major order.
    pub fn max_peak(&self) -> Option<Peak> {
        let mut best: Option<Peak> = None;
        for (idx, &score) in self.scores.iter().enumerate() {
            if best.map_or(true, |b| score > b.score) {
                best = Some(Peak {
                    x: idx % self.width,
                    y: idx / self.width,
                    score,
                });
            }
        }
        best
    }

    /// Iterates every cell as a peak in row-major order.
    pub fn peaks(&self) -> impl Iterator<Item = Peak> + '_ {
        self.scores.iter().enumerate().map(move |(idx, &score)| Peak {
            x: idx % self.width,
            y: idx / self.width,
            score,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::CorrelationSurface;

    #[test]
    fn dims_follow_valid_offsets() {
        assert_eq!(CorrelationSurface::dims_for((10, 8), (3, 2)), Some((8, 7)));
        assert_eq!(CorrelationSurface::dims_for((4, 4), (4, 4)), Some((1, 1)));
        assert_eq!(CorrelationSurface::dims_for((4, 4), (5, 1)), None);
        assert_eq!(CorrelationSurface::dims_for((4, 4), (1, 5)), None);
    }

    #[test]
    fn max_peak_prefers_first_occurrence() {
        let surface = CorrelationSurface::from_vec(3, 2, vec![0.1, 0.9, 0.2, 0.9, 0.3, 0.9]);
        let peak = surface.max_peak().unwrap();
        assert_eq!((peak.x, peak.y), (1, 0));
        assert_eq!(surface.get(0, 1), Some(0.9));
        assert_eq!(surface.row(1), Some(&[0.9f32, 0.3, 0.9][..]));
        assert!(CorrelationSurface::empty().max_peak().is_none());
    }
}
