//! Monitor configuration

use crate::error::{MonitorError, Result};
use dwelltrack::TrackerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a [`FrameMonitor`](crate::FrameMonitor), fixed at
/// construction and not reconfigurable mid-run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Detections at or below this confidence are dropped at ingestion.
    pub confidence_threshold: f32,

    /// Only detections carrying this label are tracked (single-class).
    pub target_label: String,

    /// Minimum IoU for a detection to claim an existing track.
    pub overlap_threshold: f32,

    /// Consecutive unmatched frames tolerated before a track is dropped.
    /// A frame count, not a duration: 300 is 10s at 30fps.
    pub max_disappeared: u32,

    /// Dwell span in seconds after which a track counts as present.
    pub present_after_secs: f64,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.4,
            target_label: "person".to_string(),
            overlap_threshold: 0.3,
            max_disappeared: 300,
            present_after_secs: 3.0,
        }
    }
}

impl MonitorConfig {
    /// Load a configuration from a JSON file. Missing fields fall back to
    /// their defaults; the result is validated before being returned.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.confidence_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.confidence_threshold)
        {
            return Err(MonitorError::config(format!(
                "confidence_threshold must be within [0, 1], got {}",
                self.confidence_threshold
            )));
        }
        if !self.overlap_threshold.is_finite() || !(0.0..=1.0).contains(&self.overlap_threshold) {
            return Err(MonitorError::config(format!(
                "overlap_threshold must be within [0, 1], got {}",
                self.overlap_threshold
            )));
        }
        if self.target_label.is_empty() {
            return Err(MonitorError::config("target_label must not be empty"));
        }
        if !self.present_after_secs.is_finite() || self.present_after_secs < 0.0 {
            return Err(MonitorError::config(format!(
                "present_after_secs must be non-negative, got {}",
                self.present_after_secs
            )));
        }
        Ok(())
    }

    /// The subset of settings the core tracker consumes.
    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            overlap_threshold: self.overlap_threshold,
            max_disappeared: self.max_disappeared,
            present_after_secs: self.present_after_secs,
        }
    }
}
