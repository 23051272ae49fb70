//! Driveway dwell monitor
//!
//! Pipeline-facing layer around [`dwelltrack`]: filters the raw per-frame
//! detections an external inference pipeline delivers, drives one tracker
//! update per frame, and produces the overlay boxes a renderer draws.
//!
//! The inference pipeline itself (capture, hardware-accelerated detection,
//! pixel decoding, drawing) lives outside this crate; the boundary is
//! `Vec<Detection>` in, `Vec<OverlayBox>` out.

pub mod config;
pub mod error;
pub mod ingest;
pub mod monitor;
pub mod types;

pub use config::MonitorConfig;
pub use error::{MonitorError, Result};
pub use monitor::FrameMonitor;
pub use types::{Detection, OverlayBox};

/// Get library version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
