//! Raster views, owned rasters and resampling.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. ROI slices are zero-copy
//! views into the same backing slice and retain the original stride.
//!
//! `Raster` is the owned, contiguous counterpart produced by decoding or
//! resizing. Neither type can be empty: zero-sized rasters are rejected when
//! they are constructed, before any matching work starts.

use crate::util::{NccMatchError, NccMatchResult};

pub(crate) mod integral;
#[cfg(feature = "image-io")]
pub mod io;
pub mod resize;

pub use integral::IntegralImage;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> NccMatchResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> NccMatchResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(NccMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the backing slice including any row padding.
    pub fn as_slice(&self) -> &'a [T] {
        self.data
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }

    /// Iterates rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &'a [T]> + '_ {
        (0..self.height).filter_map(move |y| self.row(y))
    }

    /// Returns true if a `width x height` template fits inside this view.
    pub fn fits(&self, width: usize, height: usize) -> bool {
        width <= self.width && height <= self.height
    }

    /// Returns a zero-copy ROI view into the same backing buffer.
    pub fn roi(
        &self,
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    ) -> NccMatchResult<ImageView<'a, T>> {
        if width == 0 || height == 0 {
            return Err(NccMatchError::InvalidInput("roi must not be empty"));
        }
        let end_x = x.checked_add(width);
        let end_y = y.checked_add(height);
        match (end_x, end_y) {
            (Some(end_x), Some(end_y)) if end_x <= self.width && end_y <= self.height => {}
            _ => return Err(NccMatchError::InvalidInput("roi exceeds image bounds")),
        }

        let start = y
            .checked_mul(self.stride)
            .and_then(|v| v.checked_add(x))
            .ok_or(NccMatchError::InvalidInput("roi offset overflows"))?;
        let data = self
            .data
            .get(start..)
            .ok_or(NccMatchError::BufferTooSmall {
                needed: start.saturating_add(1),
                got: self.data.len(),
            })?;

        ImageView::new(data, width, height, self.stride)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> NccMatchResult<usize> {
    if width == 0 || height == 0 {
        return Err(NccMatchError::InvalidInput("raster must not be empty"));
    }
    if stride < width {
        return Err(NccMatchError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(NccMatchError::InvalidInput("raster dimensions overflow"))
}

/// Owned contiguous grayscale raster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    data: Vec<u8>,
    width: usize,
    height: usize,
}

impl Raster {
    /// Creates a raster from a row-major buffer of exactly `width * height` samples.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> NccMatchResult<Self> {
        let needed = required_len(width, height, width)?;
        if data.len() < needed {
            return Err(NccMatchError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        if data.len() > needed {
            return Err(NccMatchError::InvalidInput(
                "raster buffer is larger than width * height",
            ));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Creates a raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn<F>(width: usize, height: usize, mut f: F) -> NccMatchResult<Self>
    where
        F: FnMut(usize, usize) -> u8,
    {
        let mut data = Vec::with_capacity(width.saturating_mul(height));
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self::new(data, width, height)
    }

    /// Copies a (possibly strided) view into a contiguous raster.
    pub fn from_view(view: ImageView<'_, u8>) -> Self {
        let mut data = Vec::with_capacity(view.width() * view.height());
        for row in view.rows() {
            data.extend_from_slice(row);
        }
        Self {
            data,
            width: view.width(),
            height: view.height(),
        }
    }

    /// Returns a borrowed view of the raster.
    pub fn view(&self) -> ImageView<'_, u8> {
        ImageView {
            data: &self.data,
            width: self.width,
            height: self.height,
            stride: self.width,
        }
    }

    /// Returns the raster width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the raster height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the row-major samples.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consumes the raster and returns its samples.
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}
