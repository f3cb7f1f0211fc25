//! # Layout Module
//!
//! Maps an LED in a given frame to the canvas cell it is painted into.
//!
//! - [`PositionalLayout`] reads fixed (x, y) positions from a location file and
//!   is shared by every frame of every file in a run.
//! - [`LinearLayout`] lays each frame out as one pixel row, folding long logs
//!   into side-by-side chunks described by a [`ChunkPlan`].

pub mod chunk;

use std::sync::Arc;

use crate::error::{LayoutError, Result};
use crate::source::LocationTable;

pub use chunk::ChunkPlan;

/// Resolves canvas cells for LEDs
pub trait LayoutResolver: Send + Sync {
    /// Cell for LED `led_index` of frame `frame_index`
    fn coordinates(&self, frame_index: usize, led_index: usize) -> Result<(u32, u32)>;
}

/// Explicit per-LED positions from a location table
#[derive(Debug, Clone)]
pub struct PositionalLayout {
    table: Arc<LocationTable>,
}

impl PositionalLayout {
    pub fn new(table: Arc<LocationTable>) -> Self {
        Self { table }
    }
}

impl LayoutResolver for PositionalLayout {
    fn coordinates(&self, _frame_index: usize, led_index: usize) -> Result<(u32, u32)> {
        self.table.get(led_index).ok_or_else(|| {
            LayoutError::IndexOutOfRange {
                index: led_index,
                len: self.table.len(),
            }
            .into()
        })
    }
}

/// One row per frame, chunks placed left to right
#[derive(Debug, Clone, Copy)]
pub struct LinearLayout {
    plan: ChunkPlan,
}

impl LinearLayout {
    pub fn new(plan: ChunkPlan) -> Self {
        Self { plan }
    }
}

impl LayoutResolver for LinearLayout {
    fn coordinates(&self, frame_index: usize, led_index: usize) -> Result<(u32, u32)> {
        let num_leds = self.plan.num_leds() as usize;
        if led_index >= num_leds {
            return Err(LayoutError::IndexOutOfRange {
                index: led_index,
                len: num_leds,
            }
            .into());
        }

        let chunk = self.plan.chunk_index(frame_index);
        let x = self.plan.chunk_origin(chunk) + led_index as u32;
        Ok((x, self.plan.row(frame_index)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_positional_lookup() {
        let layout = PositionalLayout::new(Arc::new(LocationTable::new(vec![(0, 0), (3, 1), (2, 2)])));
        assert_eq!(layout.coordinates(0, 1).unwrap(), (3, 1));
        assert_eq!(layout.coordinates(99, 1).unwrap(), (3, 1));
    }

    #[test]
    fn test_positional_index_out_of_range() {
        let layout = PositionalLayout::new(Arc::new(LocationTable::new(vec![(0, 0)])));
        let err = layout.coordinates(0, 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IndexOutOfRange);
    }

    #[test]
    fn test_linear_single_column() {
        let layout = LinearLayout::new(ChunkPlan::plan(50, 8, 10, None).unwrap());
        assert_eq!(layout.coordinates(0, 0).unwrap(), (0, 0));
        assert_eq!(layout.coordinates(49, 7).unwrap(), (7, 49));
    }

    #[test]
    fn test_linear_wraps_into_next_chunk() {
        let layout = LinearLayout::new(ChunkPlan::plan(25, 4, 10, Some(10)).unwrap());
        assert_eq!(layout.coordinates(9, 3).unwrap(), (3, 9));
        assert_eq!(layout.coordinates(10, 0).unwrap(), (14, 0));
        assert_eq!(layout.coordinates(24, 2).unwrap(), (30, 4));
    }

    #[test]
    fn test_linear_rejects_extra_leds() {
        let layout = LinearLayout::new(ChunkPlan::plan(5, 4, 10, None).unwrap());
        assert!(layout.coordinates(0, 4).is_err());
    }
}
