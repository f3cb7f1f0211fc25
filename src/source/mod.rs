//! # Input Module
//!
//! Readers for render logs (one CSV row of RGB triples per frame) and LED
//! location files.

pub mod frames;
pub mod locations;
pub mod types;

pub use frames::{FrameSource, Frames};
pub use locations::LocationTable;
pub use types::Frame;
