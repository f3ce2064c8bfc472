//! Scalar reference kernel.

use crate::kernel::Kernel;
use crate::template::TemplatePlan;
use crate::ImageView;

/// Scalar normalized correlation coefficient kernel.
pub struct CcoeffScalar;

impl Kernel for CcoeffScalar {
    fn cross(image: ImageView<'_, u8>, plan: &TemplatePlan, x: usize, y: usize) -> u64 {
        let (tw, th) = plan.size();
        let tpl = plan.data();
        let mut cross = 0u64;
        for ty in 0..th {
            let img_row = image.row(y + ty).expect("row within bounds for scan");
            let tpl_row = &tpl[ty * tw..(ty + 1) * tw];
            for (&t, &v) in tpl_row.iter().zip(&img_row[x..x + tw]) {
                cross += u64::from(t) * u64::from(v);
            }
        }
        cross
    }
}
