//! Template storage and planning utilities.

use crate::image::{ImageView, Raster};
use crate::util::NccMatchResult;

mod plan;

pub use plan::TemplatePlan;

/// Owned template image in contiguous grayscale format.
#[derive(Clone, Debug)]
pub struct Template {
    img: Raster,
}

impl Template {
    /// Creates a template from a contiguous grayscale buffer.
    pub fn new(data: Vec<u8>, width: usize, height: usize) -> NccMatchResult<Self> {
        let img = Raster::new(data, width, height)?;
        Ok(Self { img })
    }

    /// Wraps an existing raster.
    pub fn from_raster(img: Raster) -> Self {
        Self { img }
    }

    /// Returns a borrowed view of the template data.
    pub fn view(&self) -> ImageView<'_, u8> {
        self.img.view()
    }

    /// Precomputes the statistics used by the correlation kernels.
    pub fn plan(&self) -> TemplatePlan {
        TemplatePlan::from_view(self.view())
    }
}
