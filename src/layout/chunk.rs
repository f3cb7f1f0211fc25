use std::ops::Range;

use crate::error::{ConfigError, InputError, Result};

/// Frames past which the default image height steps up, paired with that height.
/// Logs at or below the last threshold fit in a single column.
const HEIGHT_BUCKETS: [(usize, u32); 3] = [(30_000, 3000), (10_000, 2000), (2_000, 1000)];

/// How a static image splits a render log into side-by-side columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    total_frames: usize,
    num_leds: u32,
    gutter_width: u32,
    height: u32,
    columns: u32,
    width: u32,
}

impl ChunkPlan {
    /// Plan the layout for `total_frames` frames of `num_leds` LEDs.
    ///
    /// Without an explicit height, long logs are folded into columns of
    /// 1000, 2000 or 3000 rows so the image stays a sensible shape.
    pub fn plan(
        total_frames: usize,
        num_leds: usize,
        gutter_width: u32,
        explicit_height: Option<u32>,
    ) -> Result<Self> {
        if total_frames == 0 {
            return Err(InputError::EmptyInput { path: String::new() }.into());
        }

        let height = match explicit_height {
            Some(0) => {
                return Err(ConfigError::InvalidValue {
                    key: "strip.height".to_string(),
                    value: "0".to_string(),
                }
                .into())
            }
            Some(height) => height,
            None => default_height(total_frames),
        };

        let columns = u32::try_from(total_frames.div_ceil(height as usize)).map_err(|_| {
            ConfigError::InvalidValue {
                key: "strip.height".to_string(),
                value: height.to_string(),
            }
        })?;
        let num_leds = u32::try_from(num_leds).map_err(|_| ConfigError::InvalidValue {
            key: "strip.num_leds".to_string(),
            value: num_leds.to_string(),
        })?;

        let width = columns
            .checked_mul(num_leds)
            .and_then(|leds| leds.checked_add(gutter_width.checked_mul(columns - 1)?))
            .ok_or_else(|| ConfigError::InvalidValue {
                key: "strip.num_leds".to_string(),
                value: format!("{} (image would be wider than {} pixels)", num_leds, u32::MAX),
            })?;

        Ok(Self {
            total_frames,
            num_leds,
            gutter_width,
            height,
            columns,
            width,
        })
    }

    /// Rows in the output image
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of chunks placed side by side
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Full image width including gutters
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn num_leds(&self) -> u32 {
        self.num_leds
    }

    pub fn total_frames(&self) -> usize {
        self.total_frames
    }

    /// Gutters are only drawn when there is something to separate
    pub fn is_multi_column(&self) -> bool {
        self.columns > 1
    }

    /// Chunk (column) that holds `frame_index`
    pub fn chunk_index(&self, frame_index: usize) -> u32 {
        (frame_index / self.height as usize) as u32
    }

    /// Row of `frame_index` within its chunk
    pub fn row(&self, frame_index: usize) -> u32 {
        (frame_index % self.height as usize) as u32
    }

    /// Left edge of chunk `chunk`. Saturates past the last chunk so the
    /// canvas bounds check rejects it.
    pub fn chunk_origin(&self, chunk: u32) -> u32 {
        chunk
            .saturating_mul(self.num_leds)
            .saturating_add(chunk.saturating_mul(self.gutter_width))
    }

    /// Frames that land in chunk `chunk`
    pub fn chunk_frames(&self, chunk: u32) -> Range<usize> {
        let start = (chunk as usize * self.height as usize).min(self.total_frames);
        let end = (start + self.height as usize).min(self.total_frames);
        start..end
    }

    pub fn chunk_len(&self, chunk: u32) -> usize {
        self.chunk_frames(chunk).len()
    }

    /// Gutter pixels to the right of the chunk holding `frame_index`, or an
    /// empty range for the last chunk and single-column images
    pub fn gutter_span(&self, frame_index: usize) -> Range<u32> {
        let chunk = self.chunk_index(frame_index);
        if !self.is_multi_column() || chunk + 1 >= self.columns {
            return 0..0;
        }
        let start = self.chunk_origin(chunk) + self.num_leds;
        start..start + self.gutter_width
    }
}

fn default_height(total_frames: usize) -> u32 {
    HEIGHT_BUCKETS
        .iter()
        .find(|(threshold, _)| total_frames > *threshold)
        .map(|&(_, height)| height)
        // At most 2000 frames here
        .unwrap_or(total_frames as u32)
}
