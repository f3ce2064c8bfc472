//! Uniform rescaling of grayscale rasters.
//!
//! The output size is `round(width * scale) x round(height * scale)`. The same
//! factor maps both axes, so the aspect ratio follows the source. Shrinking
//! uses area averaging: each destination pixel is the coverage-weighted mean
//! of the source pixels under its footprint `[i / s, (i + 1) / s)`, which
//! anti-aliases the result. Enlarging uses bilinear sampling at pixel
//! centers. A factor of exactly 1 copies the input.

use crate::image::{ImageView, Raster};

/// Largest destination raster, in pixels.
pub const MAX_RESIZE_PIXELS: usize = i32::MAX as usize;

/// Returns the destination size for `scale`, or `None` if it rounds to zero
/// or exceeds [`MAX_RESIZE_PIXELS`].
pub fn scaled_size(width: usize, height: usize, scale: f64) -> Option<(usize, usize)> {
    if !scale.is_finite() || scale <= 0.0 {
        return None;
    }
    let w = (width as f64 * scale).round();
    let h = (height as f64 * scale).round();
    let limit = MAX_RESIZE_PIXELS as f64;
    if w < 1.0 || h < 1.0 || w > limit || h > limit {
        return None;
    }
    let (w, h) = (w as usize, h as usize);
    match w.checked_mul(h) {
        Some(pixels) if pixels <= MAX_RESIZE_PIXELS => Some((w, h)),
        _ => None,
    }
}

/// Resizes `src` by `scale`, returning `None` if the result would be empty.
pub fn resize(src: ImageView<'_, u8>, scale: f64) -> Option<Raster> {
    let (dst_width, dst_height) = scaled_size(src.width(), src.height(), scale)?;
    if scale == 1.0 {
        return Some(Raster::from_view(src));
    }
    if scale < 1.0 {
        Some(resize_area(src, scale, dst_width, dst_height))
    } else {
        Some(resize_bilinear(src, scale, dst_width, dst_height))
    }
}

/// Coverage of one destination pixel over the source axis.
struct Span {
    start: usize,
    weights: Vec<f64>,
}

fn area_spans(src_len: usize, dst_len: usize, scale: f64) -> Vec<Span> {
    let inv = 1.0 / scale;
    let limit = src_len as f64;
    (0..dst_len)
        .map(|i| {
            let lo = (i as f64 * inv).min(limit);
            let hi = ((i + 1) as f64 * inv).min(limit);
            let first = (lo.floor() as usize).min(src_len - 1);
            let last = (hi.ceil() as usize).clamp(first + 1, src_len);
            let mut weights = Vec::with_capacity(last - first);
            for s in first..last {
                let cell_lo = (s as f64).max(lo);
                let cell_hi = ((s + 1) as f64).min(hi);
                weights.push((cell_hi - cell_lo).max(0.0));
            }
            if weights.iter().sum::<f64>() <= 0.0 {
                // Rounding pushed the footprint past the edge; fall back to the
                // nearest source sample.
                weights.iter_mut().for_each(|w| *w = 0.0);
                if let Some(w) = weights.last_mut() {
                    *w = 1.0;
                }
            }
            Span {
                start: first,
                weights,
            }
        })
        .collect()
}

fn to_u8(value: f64) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

fn resize_area(src: ImageView<'_, u8>, scale: f64, dst_width: usize, dst_height: usize) -> Raster {
    let xs = area_spans(src.width(), dst_width, scale);
    let ys = area_spans(src.height(), dst_height, scale);

    // Horizontal pass into a float buffer, one row per source row.
    let mut horiz = vec![0.0f64; dst_width * src.height()];
    for (y, row) in src.rows().enumerate() {
        let out = &mut horiz[y * dst_width..(y + 1) * dst_width];
        for (dst, span) in out.iter_mut().zip(&xs) {
            let mut acc = 0.0;
            let mut total = 0.0;
            for (k, &w) in span.weights.iter().enumerate() {
                acc += w * f64::from(row[span.start + k]);
                total += w;
            }
            *dst = acc / total;
        }
    }

    let mut data = vec![0u8; dst_width * dst_height];
    for (y, span) in ys.iter().enumerate() {
        let total: f64 = span.weights.iter().sum();
        for x in 0..dst_width {
            let mut acc = 0.0;
            for (k, &w) in span.weights.iter().enumerate() {
                acc += w * horiz[(span.start + k) * dst_width + x];
            }
            data[y * dst_width + x] = to_u8(acc / total);
        }
    }

    Raster {
        data,
        width: dst_width,
        height: dst_height,
    }
}

fn bilinear_taps(src_len: usize, dst_len: usize, scale: f64) -> Vec<(usize, usize, f64)> {
    let max = (src_len - 1) as f64;
    (0..dst_len)
        .map(|i| {
            let pos = ((i as f64 + 0.5) / scale - 0.5).clamp(0.0, max);
            let i0 = pos.floor() as usize;
            let i1 = (i0 + 1).min(src_len - 1);
            (i0, i1, pos - i0 as f64)
        })
        .collect()
}

fn resize_bilinear(
    src: ImageView<'_, u8>,
    scale: f64,
    dst_width: usize,
    dst_height: usize,
) -> Raster {
    let xs = bilinear_taps(src.width(), dst_width, scale);
    let ys = bilinear_taps(src.height(), dst_height, scale);
    let mut data = Vec::with_capacity(dst_width * dst_height);

    for &(y0, y1, fy) in &ys {
        let row0 = src.row(y0).expect("row in bounds");
        let row1 = src.row(y1).expect("row in bounds");
        for &(x0, x1, fx) in &xs {
            let top = f64::from(row0[x0]) * (1.0 - fx) + f64::from(row0[x1]) * fx;
            let bottom = f64::from(row1[x0]) * (1.0 - fx) + f64::from(row1[x1]) * fx;
            data.push(to_u8(top * (1.0 - fy) + bottom * fy));
        }
    }

    Raster {
        data,
        width: dst_width,
        height: dst_height,
    }
}

#[cfg(test)]
mod tests {
    use super::{resize, scaled_size};
    use crate::image::ImageView;

    #[test]
    fn half_scale_averages_two_by_two_blocks() {
        let data: Vec<u8> = (0u8..16).collect();
        let view = ImageView::from_slice(&data, 4, 4).unwrap();
        let out = resize(view, 0.5).unwrap();
        assert_eq!((out.width(), out.height()), (2, 2));
        assert_eq!(out.data(), &[3u8, 5, 11, 13]);
    }

    #[test]
    fn unit_scale_copies_strided_input() {
        let data: Vec<u8> = (0u8..12).collect();
        let view = ImageView::new(&data, 3, 3, 4).unwrap();
        let out = resize(view, 1.0).unwrap();
        assert_eq!(out.data(), &[0u8, 1, 2, 4, 5, 6, 8, 9, 10]);
    }

    #[test]
    fn enlarging_constant_image_stays_constant() {
        let data = vec![77u8; 6 * 4];
        let view = ImageView::from_slice(&data, 6, 4).unwrap();
        let out = resize(view, 1.7).unwrap();
        assert_eq!((out.width(), out.height()), (10, 7));
        assert!(out.data().iter().all(|&v| v == 77));
    }

    #[test]
    fn non_integer_shrink_preserves_mean_of_constant_regions() {
        let data = vec![200u8; 10 * 10];
        let view = ImageView::from_slice(&data, 10, 10).unwrap();
        let out = resize(view, 0.3).unwrap();
        assert_eq!((out.width(), out.height()), (3, 3));
        assert!(out.data().iter().all(|&v| v == 200));
    }

    #[test]
    fn sizes_round_and_reject_empty_results() {
        assert_eq!(scaled_size(100, 50, 0.5), Some((50, 25)));
        assert_eq!(scaled_size(10, 10, 0.25), Some((3, 3)));
        assert_eq!(scaled_size(3, 3, 0.1), None);
        assert_eq!(scaled_size(3, 3, 0.0), None);
        assert_eq!(scaled_size(3, 3, f64::NAN), None);
    }

    #[test]
    fn oversized_destinations_are_rejected() {
        assert_eq!(scaled_size(100, 100, 1e9), None);
        assert_eq!(scaled_size(1, 1, 1e300), None);
        assert_eq!(scaled_size(65536, 1, 32768.0), None);
        assert_eq!(scaled_size(1, 1, 46340.0), Some((46340, 46340)));
        assert!(resize(ImageView::from_slice(&[7u8; 4], 2, 2).unwrap(), 1e12).is_none());
    }
}
