use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::RgbImage;

use crate::error::{EncodingError, RenderError, Result};

/// Write `image` as an 8-bit RGB PNG
pub fn write_png<P: AsRef<Path>>(image: &RgbImage, path: P) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), image.width(), image.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Best);

    let mut writer = encoder.write_header().map_err(png_error)?;
    writer.write_image_data(image.as_raw()).map_err(png_error)?;
    writer.finish().map_err(png_error)?;
    Ok(())
}

fn png_error(error: png::EncodingError) -> RenderError {
    EncodingError::Png {
        reason: error.to_string(),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb};
    use tempfile::tempdir;

    #[test]
    fn test_png_is_lossless() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.png");
        let image: RgbImage = ImageBuffer::from_fn(5, 3, |x, y| Rgb([x as u8 * 40, y as u8 * 80, 7]));

        write_png(&image, &path).unwrap();

        let decoded = image::open(&path).unwrap().to_rgb8();
        assert_eq!(decoded, image);
    }
}
