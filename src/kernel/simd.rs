//! SIMD kernel using the `wide` crate.
//!
//! The cross term is accumulated eight pixels at a time in `f32x8` lanes.
//! Products of `u8` samples are at most 65025, so lane sums stay exact as
//! long as they remain below 2^24; each row is processed in blocks short
//! enough to guarantee that, and every block is flushed to a `u64`. The
//! result is therefore identical to the scalar kernel.

use crate::kernel::Kernel;
use crate::template::TemplatePlan;
use crate::ImageView;
use wide::f32x8;

const LANES: usize = 8;

/// Pixels per lane before a flush: `256 * 65025 < 2^24`.
const BLOCK: usize = LANES * 256;

#[inline]
fn load_u8x8(slice: &[u8]) -> f32x8 {
    f32x8::from([
        slice[0] as f32,
        slice[1] as f32,
        slice[2] as f32,
        slice[3] as f32,
        slice[4] as f32,
        slice[5] as f32,
        slice[6] as f32,
        slice[7] as f32,
    ])
}

#[inline]
fn flush(v: f32x8) -> u64 {
    v.to_array().iter().map(|&lane| lane as u64).sum()
}

/// SIMD normalized correlation coefficient kernel.
pub struct CcoeffSimd;

impl Kernel for CcoeffSimd {
    fn cross(image: ImageView<'_, u8>, plan: &TemplatePlan, x: usize, y: usize) -> u64 {
        let (tw, th) = plan.size();
        let tpl = plan.data();
        let simd_end = tw / LANES * LANES;
        let mut cross = 0u64;

        for ty in 0..th {
            let img_row = &image.row(y + ty).expect("row within bounds for scan")[x..x + tw];
            let tpl_row = &tpl[ty * tw..(ty + 1) * tw];

            let mut block_start = 0;
            while block_start < simd_end {
                let block_end = (block_start + BLOCK).min(simd_end);
                let mut acc = f32x8::ZERO;
                let mut tx = block_start;
                while tx < block_end {
                    acc += load_u8x8(&tpl_row[tx..]) * load_u8x8(&img_row[tx..]);
                    tx += LANES;
                }
                cross += flush(acc);
                block_start = block_end;
            }

            for tx in simd_end..tw {
                cross += u64::from(tpl_row[tx]) * u64::from(img_row[tx]);
            }
        }
        cross
    }
}
