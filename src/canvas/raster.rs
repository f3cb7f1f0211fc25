use std::ops::Range;

use image::{ImageBuffer, Rgb, RgbImage};

use crate::canvas::Canvas;
use crate::error::{LayoutError, Result};

/// One full-size raster for static output, one pixel per cell
#[derive(Clone, Debug)]
pub struct StaticCanvas {
    buffer: RgbImage,
}

impl StaticCanvas {
    /// Black canvas of the given size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            buffer: ImageBuffer::new(width, height),
        }
    }

    /// Paint a horizontal run of cells on row `y`
    pub fn fill_span(&mut self, xs: Range<u32>, y: u32, color: Rgb<u8>) -> Result<()> {
        for x in xs {
            self.paint(x, y, color)?;
        }
        Ok(())
    }

    pub fn as_image(&self) -> &RgbImage {
        &self.buffer
    }
}

impl Canvas for StaticCanvas {
    fn paint(&mut self, x: u32, y: u32, color: Rgb<u8>) -> Result<()> {
        let (width, height) = self.buffer.dimensions();
        if x >= width || y >= height {
            return Err(LayoutError::CoordinateOutOfBounds { x, y, width, height }.into());
        }
        self.buffer.put_pixel(x, y, color);
        Ok(())
    }
}
