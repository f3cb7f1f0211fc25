//! # ledlog-render
//!
//! Turn LED render logs into images you can look at.
//!
//! A render log is a CSV file with one row per frame and three color fields
//! (red, green, blue) per LED. This library renders such logs either as a
//! looping GIF that shows every LED at its physical position, or as a PNG
//! timeline with one pixel row per frame.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! use ledlog_render::{
//!     config::Config,
//!     pipeline::{AnimationRenderer, JobDispatcher, ProgressReporter},
//!     source::LocationTable,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::default();
//! let locations = Arc::new(LocationTable::load("led_locations.csv")?);
//! let renderer = AnimationRenderer::new(&config, locations);
//!
//! let dispatcher = JobDispatcher::new(config.jobs.workers, ProgressReporter::new(true));
//! let report = dispatcher.run(&renderer, &[PathBuf::from("show_2d.csv")])?;
//! assert!(report.is_success());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`source`] - Render log and location file readers
//! - [`layout`] - Where each LED lands on the canvas
//! - [`canvas`] - Animated (supersampled) and static pixel buffers
//! - [`encode`] - GIF, PNG and the GIF optimizer pass
//! - [`pipeline`] - Per-file renderers and the parallel job dispatcher
//! - [`config`] - Configuration management
//!
//! ## Custom Renderers
//!
//! Anything implementing [`Renderer`](pipeline::Renderer) can be run by the
//! dispatcher:
//!
//! ```rust,no_run
//! use std::path::{Path, PathBuf};
//! use ledlog_render::pipeline::{FileProgress, RenderSummary, Renderer};
//! use ledlog_render::Result;
//!
//! struct FrameCounter;
//!
//! impl Renderer for FrameCounter {
//!     fn name(&self) -> &str {
//!         "count"
//!     }
//!
//!     fn output_path(&self, input: &Path) -> PathBuf {
//!         input.with_extension("txt")
//!     }
//!
//!     fn render(&self, input: &Path, output: &Path, progress: &FileProgress) -> Result<RenderSummary> {
//!         // Your rendering here
//!         todo!()
//!     }
//! }
//! ```

pub mod canvas;
pub mod config;
pub mod encode;
pub mod error;
pub mod layout;
pub mod pipeline;
pub mod source;

// Re-export commonly used types for convenience
pub use crate::{
    config::Config,
    error::{ErrorKind, RenderError, Result},
    pipeline::{AnimationRenderer, JobDispatcher, Renderer, StripRenderer},
};
