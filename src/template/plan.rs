//! Template plan precomputation for the normalized correlation coefficient.

use crate::image::ImageView;
use crate::util::math::{scaled_variance, TemplateSums};

/// Precomputed statistics and contiguous samples of a template.
///
/// A plan is built once and reused for every placement and every scale; it
/// holds no reference to the source image.
#[derive(Clone, Debug)]
pub struct TemplatePlan {
    width: usize,
    height: usize,
    data: Vec<u8>,
    sum: u64,
    var_n: u128,
}

impl TemplatePlan {
    /// Builds a plan from a template view.
    ///
    /// Views are never empty, so this cannot fail. Flat templates are valid;
    /// see [`is_flat`](Self::is_flat).
    pub fn from_view(tpl: ImageView<'_, u8>) -> Self {
        let width = tpl.width();
        let height = tpl.height();
        let mut data = Vec::with_capacity(width * height);
        let mut sum = 0u64;
        let mut sum_sq = 0u64;
        for row in tpl.rows() {
            for &value in row {
                let v = u64::from(value);
                sum += v;
                sum_sq += v * v;
            }
            data.extend_from_slice(row);
        }
        let var_n = scaled_variance((width * height) as u64, sum, sum_sq);

        Self {
            width,
            height,
            data,
            sum,
            var_n,
        }
    }

    /// Returns the template width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the template height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the number of template pixels.
    pub fn count(&self) -> usize {
        self.width * self.height
    }

    /// Returns the row-major template samples.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the mean intensity of the template.
    pub fn mean(&self) -> f64 {
        self.sum as f64 / self.count() as f64
    }

    /// Returns the population variance of the template.
    pub fn variance(&self) -> f64 {
        let n = self.count() as f64;
        self.var_n as f64 / (n * n)
    }

    /// Returns true if every template sample has the same value.
    pub fn is_flat(&self) -> bool {
        self.var_n == 0
    }

    pub(crate) fn sums(&self) -> TemplateSums {
        TemplateSums {
            count: self.count() as u64,
            sum: self.sum,
            var_n: self.var_n,
        }
    }
}
