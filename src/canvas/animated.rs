use image::{ImageBuffer, Rgb, RgbImage};

use crate::canvas::Canvas;
use crate::error::{LayoutError, Result};

/// Output pixels per logical cell along each axis
pub const SUPERSAMPLE: u32 = 2;

/// Receives finished animation frames in order
pub trait FrameSink {
    fn push_frame(&mut self, frame: &RgbImage) -> Result<()>;
}

impl FrameSink for Vec<RgbImage> {
    fn push_frame(&mut self, frame: &RgbImage) -> Result<()> {
        self.push(frame.clone());
        Ok(())
    }
}

/// Single live frame buffer for animated output.
///
/// Paint a frame, then [`commit_frame`](Self::commit_frame) hands it to the
/// sink and clears the buffer for the next one.
pub struct AnimatedCanvas<S: FrameSink> {
    buffer: RgbImage,
    width: u32,
    height: u32,
    sink: S,
    committed: usize,
}

impl<S: FrameSink> AnimatedCanvas<S> {
    /// Canvas of `width` x `height` cells (2x that in pixels)
    pub fn new(width: u32, height: u32, sink: S) -> Self {
        Self {
            buffer: ImageBuffer::new(width * SUPERSAMPLE, height * SUPERSAMPLE),
            width,
            height,
            sink,
            committed: 0,
        }
    }

    /// Pixel dimensions of every emitted frame
    pub fn pixel_size(&self) -> (u32, u32) {
        self.buffer.dimensions()
    }

    /// The frame currently being painted
    pub fn current(&self) -> &RgbImage {
        &self.buffer
    }

    /// Frames handed to the sink so far
    pub fn committed(&self) -> usize {
        self.committed
    }

    /// Send the current frame to the sink and start a blank one
    pub fn commit_frame(&mut self) -> Result<()> {
        self.sink.push_frame(&self.buffer)?;
        self.committed += 1;
        self.buffer.fill(0);
        Ok(())
    }

    /// Give back the sink once all frames are committed
    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: FrameSink> Canvas for AnimatedCanvas<S> {
    fn paint(&mut self, x: u32, y: u32, color: Rgb<u8>) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(LayoutError::CoordinateOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            }
            .into());
        }

        let (px, py) = (x * SUPERSAMPLE, y * SUPERSAMPLE);
        for dy in 0..SUPERSAMPLE {
            for dx in 0..SUPERSAMPLE {
                self.buffer.put_pixel(px + dx, py + dy, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn lit_pixels(image: &RgbImage) -> Vec<(u32, u32)> {
        image
            .enumerate_pixels()
            .filter(|(_, _, p)| p.0 != [0, 0, 0])
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    #[test]
    fn test_paint_fills_two_by_two_block() {
        let mut canvas = AnimatedCanvas::new(4, 3, Vec::<RgbImage>::new());
        canvas.paint(1, 2, Rgb([9, 8, 7])).unwrap();

        assert_eq!(canvas.pixel_size(), (8, 6));
        assert_eq!(lit_pixels(canvas.current()), vec![(2, 4), (3, 4), (2, 5), (3, 5)]);
        assert_eq!(canvas.current().get_pixel(3, 5), &Rgb([9, 8, 7]));
    }

    #[test]
    fn test_later_write_wins() {
        let mut canvas = AnimatedCanvas::new(2, 2, Vec::<RgbImage>::new());
        canvas.paint(0, 0, Rgb([1, 1, 1])).unwrap();
        canvas.paint(0, 0, Rgb([5, 6, 7])).unwrap();
        assert_eq!(canvas.current().get_pixel(1, 1), &Rgb([5, 6, 7]));
    }

    #[test]
    fn test_commit_emits_frame_and_clears() {
        let mut canvas = AnimatedCanvas::new(2, 2, Vec::<RgbImage>::new());
        canvas.paint(0, 0, Rgb([255, 0, 0])).unwrap();
        canvas.commit_frame().unwrap();
        canvas.paint(1, 1, Rgb([0, 255, 0])).unwrap();
        canvas.commit_frame().unwrap();

        assert_eq!(canvas.committed(), 2);
        assert!(lit_pixels(canvas.current()).is_empty());

        let frames = canvas.into_sink();
        assert_eq!(lit_pixels(&frames[0]), vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
        assert_eq!(lit_pixels(&frames[1]), vec![(2, 2), (3, 2), (2, 3), (3, 3)]);
    }

    #[test]
    fn test_out_of_bounds_cell() {
        let mut canvas = AnimatedCanvas::new(2, 2, Vec::<RgbImage>::new());
        let err = canvas.paint(2, 0, Rgb([1, 1, 1])).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CoordinateOutOfBounds);
    }
}
