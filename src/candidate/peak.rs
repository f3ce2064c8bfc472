//! Scored placement records and their canonical ordering.

use std::cmp::Ordering;

/// Single surface cell: top-left placement and its score.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// X coordinate (column) of the placement.
    pub x: usize,
    /// Y coordinate (row) of the placement.
    pub y: usize,
    /// Correlation score at the placement.
    pub score: f32,
}

/// Descending score; ties go to the lower row, then the lower column.
pub(crate) fn peak_cmp_desc(a: &Peak, b: &Peak) -> Ordering {
    b.score
        .total_cmp(&a.score)
        .then_with(|| a.y.cmp(&b.y))
        .then_with(|| a.x.cmp(&b.x))
}

/// Sorts peaks by descending score with deterministic tie-breaking.
pub fn sort_peaks_desc(peaks: &mut [Peak]) {
    peaks.sort_by(peak_cmp_desc);
}

#[cfg(test)]
mod tests {
    use super::{sort_peaks_desc, Peak};

    #[test]
    fn ties_break_by_row_then_column() {
        let mut peaks = vec![
            Peak { x: 5, y: 1, score: 0.5 },
            Peak { x: 2, y: 1, score: 0.5 },
            Peak { x: 9, y: 0, score: 0.5 },
            Peak { x: 0, y: 3, score: 0.8 },
        ];
        sort_peaks_desc(&mut peaks);
        let order: Vec<_> = peaks.iter().map(|p| (p.x, p.y)).collect();
        assert_eq!(order, vec![(0, 3), (9, 0), (2, 1), (5, 1)]);
    }
}
