//! Ingestion boundary: filtering and validation of raw detections

use crate::config::MonitorConfig;
use crate::error::{MonitorError, Result};
use crate::types::Detection;
use dwelltrack::Bbox;

/// Filter a raw detection batch down to the boxes the tracker should see.
///
/// Keeps detections whose confidence exceeds the configured threshold and
/// whose label matches the target label. Malformed geometry is rejected
/// here with an error; the tracker treats clean input as a precondition and
/// never validates.
pub fn filter_detections(detections: &[Detection], config: &MonitorConfig) -> Result<Vec<Bbox>> {
    let mut boxes = Vec::with_capacity(detections.len());

    for detection in detections {
        validate(detection)?;

        if detection.confidence > config.confidence_threshold
            && detection.label == config.target_label
        {
            boxes.push(detection.bbox);
        } else {
            log::trace!(
                "dropped detection: label={} confidence={:.2}",
                detection.label,
                detection.confidence
            );
        }
    }

    Ok(boxes)
}

fn validate(detection: &Detection) -> Result<()> {
    let b = detection.bbox;

    if ![b.x, b.y, b.width, b.height].iter().all(|v| v.is_finite()) {
        log::warn!("rejected detection with non-finite geometry: {}", b);
        return Err(MonitorError::invalid_detection(format!(
            "non-finite coordinates in {}",
            b
        )));
    }
    if b.width < 0.0 || b.height < 0.0 {
        log::warn!("rejected detection with negative extent: {}", b);
        return Err(MonitorError::invalid_detection(format!(
            "negative extent in {}",
            b
        )));
    }
    if !detection.confidence.is_finite() {
        return Err(MonitorError::invalid_detection(format!(
            "non-finite confidence {}",
            detection.confidence
        )));
    }

    Ok(())
}
