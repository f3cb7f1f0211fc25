//! # Encoding Module
//!
//! Writers for finished canvases: a streaming looping GIF, a lossless PNG, and
//! the external size-optimization pass applied to GIFs.

pub mod gif;
pub mod optimizer;
pub mod png;

pub use self::gif::GifWriter;
pub use self::optimizer::{GifOptimizer, Optimization};
pub use self::png::write_png;
