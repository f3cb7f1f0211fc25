//! # Canvas Module
//!
//! Pixel buffers that frames are painted into. Both canvases address logical
//! cells; the animated canvas blows each cell up to a 2×2 block so single LEDs
//! stay visible at normal GIF viewing sizes.

pub mod animated;
pub mod raster;

use image::Rgb;

use crate::error::Result;

pub use animated::{AnimatedCanvas, FrameSink, SUPERSAMPLE};
pub use raster::StaticCanvas;

/// A surface addressed in logical cells
pub trait Canvas {
    /// Paint one cell. Later writes to the same cell win.
    fn paint(&mut self, x: u32, y: u32, color: Rgb<u8>) -> Result<()>;
}
