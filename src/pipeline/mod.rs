//! # Render Pipeline
//!
//! Per-file renderers for the two output modes, the worker pool that runs
//! them over a batch of logs, and the progress display shared by both.

pub mod dispatcher;
pub mod engine;
pub mod progress;

// Re-exports for convenience
pub use dispatcher::{check_inputs, DispatchReport, JobDispatcher, JobOutcome};
pub use engine::{paint_frame, AnimationRenderer, RenderSummary, Renderer, StripRenderer};
pub use progress::{FileProgress, LogWriter, ProgressReporter};
