//! Inbound and outbound data models for the monitor

use dwelltrack::{Bbox, DwellStatus};
use serde::{Deserialize, Serialize};

/// One detection delivered by the upstream inference pipeline for a frame.
///
/// Coordinates are integer pixel units already widened to `f32`; confidence
/// is the raw model score in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub label: String,
    pub confidence: f32,
    pub bbox: Bbox,
}

impl Detection {
    pub fn new<S: Into<String>>(label: S, confidence: f32, bbox: Bbox) -> Self {
        Self {
            label: label.into(),
            confidence,
            bbox,
        }
    }
}

/// Draw instruction for one track matched in the current frame.
///
/// The renderer draws `bbox` as a rectangle with `label` as its caption.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayBox {
    pub id: u32,
    pub bbox: Bbox,
    pub status: DwellStatus,
    pub label: String,
}

impl OverlayBox {
    pub fn new(id: u32, bbox: Bbox, status: DwellStatus) -> Self {
        let label = format!("ID: {} ({})", id, status);
        Self {
            id,
            bbox,
            status,
            label,
        }
    }
}
