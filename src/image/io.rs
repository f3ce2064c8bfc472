//! Decoding helpers built on the `image` crate.
//!
//! Available when the `image-io` feature is enabled. Color inputs are
//! converted to 8-bit luma before matching.

use crate::image::{ImageView, Raster};
use crate::util::{NccMatchError, NccMatchResult};
use std::path::Path;

/// Creates a borrowed view over a grayscale image buffer.
pub fn view_from_gray_image(img: &::image::GrayImage) -> NccMatchResult<ImageView<'_, u8>> {
    ImageView::from_slice(img.as_raw(), img.width() as usize, img.height() as usize)
}

/// Copies a grayscale image buffer into a raster.
pub fn raster_from_gray_image(img: &::image::GrayImage) -> NccMatchResult<Raster> {
    Raster::new(
        img.as_raw().clone(),
        img.width() as usize,
        img.height() as usize,
    )
}

/// Converts any decoded image to a luma raster.
pub fn raster_from_dynamic_image(img: &::image::DynamicImage) -> NccMatchResult<Raster> {
    raster_from_gray_image(&img.to_luma8())
}

/// Loads an image from disk as a grayscale raster.
pub fn load_gray_image<P: AsRef<Path>>(path: P) -> NccMatchResult<Raster> {
    let img = ::image::open(path).map_err(|err| NccMatchError::ImageIo {
        reason: err.to_string(),
    })?;
    raster_from_dynamic_image(&img)
}
