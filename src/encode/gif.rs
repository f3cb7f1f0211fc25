use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use gif::{Encoder, Repeat};
use image::RgbImage;
use tracing::debug;

use crate::canvas::FrameSink;
use crate::error::{EncodingError, RenderError, Result};

/// Streams frames into a looping GIF as they are painted
pub struct GifWriter<W: Write = BufWriter<File>> {
    encoder: Encoder<W>,
    width: u16,
    height: u16,
    delay: u16,
    speed: i32,
    frames: usize,
    path: Option<PathBuf>,
}

impl GifWriter {
    /// Create `path` and write the GIF header
    pub fn create<P: AsRef<Path>>(
        path: P,
        width: u32,
        height: u32,
        delay: u16,
        speed: i32,
    ) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut writer = Self::new(BufWriter::new(file), width, height, delay, speed)?;
        writer.path = Some(path.to_path_buf());
        Ok(writer)
    }
}

impl<W: Write> GifWriter<W> {
    /// Start an infinitely looping GIF on `writer`.
    ///
    /// `delay` is the per-frame display time in centiseconds and `speed` the
    /// NeuQuant sampling factor used for each frame's palette.
    pub fn new(writer: W, width: u32, height: u32, delay: u16, speed: i32) -> Result<Self> {
        let too_large = || EncodingError::TooLarge {
            format: "GIF",
            width,
            height,
        };
        let w = u16::try_from(width).map_err(|_| too_large())?;
        let h = u16::try_from(height).map_err(|_| too_large())?;

        let mut encoder = Encoder::new(writer, w, h, &[]).map_err(gif_error)?;
        encoder.set_repeat(Repeat::Infinite).map_err(gif_error)?;

        Ok(Self {
            encoder,
            width: w,
            height: h,
            delay,
            speed,
            frames: 0,
            path: None,
        })
    }

    /// Frames written so far
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// Write the trailer and flush, returning the underlying writer
    pub fn finish(self) -> Result<W> {
        if let Some(path) = &self.path {
            debug!("Finished {:?}: {} frames", path, self.frames);
        }
        let mut writer = self.encoder.into_inner().map_err(gif_error)?;
        writer.flush()?;
        Ok(writer)
    }
}

impl<W: Write> FrameSink for GifWriter<W> {
    fn push_frame(&mut self, frame: &RgbImage) -> Result<()> {
        if frame.dimensions() != (self.width as u32, self.height as u32) {
            return Err(EncodingError::Gif {
                reason: format!(
                    "frame is {}x{} but the animation is {}x{}",
                    frame.width(),
                    frame.height(),
                    self.width,
                    self.height
                ),
            }
            .into());
        }

        let mut gif_frame = gif::Frame::from_rgb_speed(self.width, self.height, frame.as_raw(), self.speed);
        gif_frame.delay = self.delay;
        self.encoder.write_frame(&gif_frame).map_err(gif_error)?;
        self.frames += 1;
        Ok(())
    }
}

fn gif_error<E: std::fmt::Display>(error: E) -> RenderError {
    EncodingError::Gif {
        reason: error.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};

    fn solid(width: u32, height: u32, color: [u8; 3]) -> RgbImage {
        ImageBuffer::from_pixel(width, height, Rgb(color))
    }

    #[test]
    fn test_writes_decodable_animation() {
        let mut writer = GifWriter::new(Vec::new(), 4, 2, 2, 10).unwrap();
        writer.push_frame(&solid(4, 2, [255, 0, 0])).unwrap();
        writer.push_frame(&solid(4, 2, [0, 0, 255])).unwrap();
        assert_eq!(writer.frames(), 2);
        let bytes = writer.finish().unwrap();

        let mut options = gif::DecodeOptions::new();
        options.set_color_output(gif::ColorOutput::RGBA);
        let mut decoder = options.read_info(bytes.as_slice()).unwrap();
        assert_eq!((decoder.width(), decoder.height()), (4, 2));

        let mut decoded = Vec::new();
        while let Some(frame) = decoder.read_next_frame().unwrap() {
            assert_eq!(frame.delay, 2);
            decoded.push(frame.buffer[..3].to_vec());
        }
        assert_eq!(decoded, vec![vec![255, 0, 0], vec![0, 0, 255]]);
    }

    #[test]
    fn test_rejects_mismatched_frame() {
        let mut writer = GifWriter::new(Vec::new(), 4, 2, 2, 10).unwrap();
        assert!(writer.push_frame(&solid(2, 2, [0, 0, 0])).is_err());
    }

    #[test]
    fn test_rejects_oversized_canvas() {
        assert!(GifWriter::new(Vec::new(), 70_000, 2, 2, 10).is_err());
    }
}
