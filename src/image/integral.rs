//! Summed-area tables for constant-time window statistics.

use crate::image::ImageView;

/// Integral images of samples and squared samples.
///
/// Tables have one extra leading row and column of zeros, so the sum over
/// `[x, x + w) x [y, y + h)` is four lookups. Sums are exact `u64` values.
pub struct IntegralImage {
    width: usize,
    height: usize,
    sum: Vec<u64>,
    sum_sq: Vec<u64>,
}

impl IntegralImage {
    /// Builds both tables in one row-major pass.
    pub fn build(image: ImageView<'_, u8>) -> Self {
        let width = image.width();
        let height = image.height();
        let cols = width + 1;
        let mut sum = vec![0u64; cols * (height + 1)];
        let mut sum_sq = vec![0u64; cols * (height + 1)];

        for (y, row) in image.rows().enumerate() {
            let mut row_sum = 0u64;
            let mut row_sq = 0u64;
            let above = y * cols;
            let here = (y + 1) * cols;
            for (x, &value) in row.iter().enumerate() {
                let v = u64::from(value);
                row_sum += v;
                row_sq += v * v;
                sum[here + x + 1] = sum[above + x + 1] + row_sum;
                sum_sq[here + x + 1] = sum_sq[above + x + 1] + row_sq;
            }
        }

        Self {
            width,
            height,
            sum,
            sum_sq,
        }
    }

    /// Returns `(sum, sum_sq)` over the window with top-left `(x, y)`.
    ///
    /// The window must lie inside the source image.
    pub fn window(&self, x: usize, y: usize, width: usize, height: usize) -> (u64, u64) {
        debug_assert!(x + width <= self.width && y + height <= self.height);
        let cols = self.width + 1;
        let a = y * cols + x;
        let b = y * cols + x + width;
        let c = (y + height) * cols + x;
        let d = (y + height) * cols + x + width;
        (
            self.sum[d] + self.sum[a] - self.sum[b] - self.sum[c],
            self.sum_sq[d] + self.sum_sq[a] - self.sum_sq[b] - self.sum_sq[c],
        )
    }
}
