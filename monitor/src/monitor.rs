//! Per-frame driver bridging an external detection callback into the tracker

use crate::config::MonitorConfig;
use crate::error::Result;
use crate::ingest::filter_detections;
use crate::types::{Detection, OverlayBox};
use dwelltrack::{DwellTracker, TrackEvent};

/// Owns one camera's tracking state and processes one detection batch per
/// frame.
///
/// This is the adapter an external pipeline invokes from its per-frame
/// callback: it counts frames, filters the batch at the ingestion boundary,
/// runs the tracker, and returns draw instructions for the renderer.
/// Instances are independent, so one process can monitor several cameras.
pub struct FrameMonitor {
    config: MonitorConfig,
    tracker: DwellTracker,
    frame_count: u64,
}

impl FrameMonitor {
    pub fn new(config: MonitorConfig) -> Result<Self> {
        config.validate()?;
        log::info!(
            "frame monitor: target={} confidence>{:.2} overlap>{:.2} max_disappeared={}",
            config.target_label,
            config.confidence_threshold,
            config.overlap_threshold,
            config.max_disappeared
        );
        Ok(Self {
            tracker: DwellTracker::new(config.tracker_config()),
            config,
            frame_count: 0,
        })
    }

    /// Process one frame's raw detections, stamping match history with the
    /// wall clock. Returns the overlays for every track matched this frame.
    pub fn process_frame(&mut self, detections: &[Detection]) -> Result<Vec<OverlayBox>> {
        self.process_inner(detections, None)
    }

    /// Deterministic variant for tests and recorded replays: the caller
    /// supplies the frame timestamp in seconds.
    pub fn process_frame_at(
        &mut self,
        detections: &[Detection],
        now: f64,
    ) -> Result<Vec<OverlayBox>> {
        self.process_inner(detections, Some(now))
    }

    fn process_inner(
        &mut self,
        detections: &[Detection],
        now: Option<f64>,
    ) -> Result<Vec<OverlayBox>> {
        self.frame_count += 1;

        let boxes = filter_detections(detections, &self.config)?;
        log::debug!(
            "frame {}: {} of {} detections kept",
            self.frame_count,
            boxes.len(),
            detections.len()
        );

        match now {
            Some(now) => self.tracker.update(&boxes, now),
            None => self.tracker.update_now(&boxes),
        }

        Ok(self.overlays())
    }

    /// Draw instructions for every track matched in the current frame, in
    /// ascending id order.
    fn overlays(&self) -> Vec<OverlayBox> {
        self.tracker
            .visible()
            .map(|track| OverlayBox::new(track.id(), track.bbox(), self.tracker.status(track.id())))
            .collect()
    }

    /// Frames processed so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Read access to the underlying tracker between frames.
    pub fn tracker(&self) -> &DwellTracker {
        &self.tracker
    }

    /// Drain lifecycle events recorded since the last drain.
    pub fn take_events(&mut self) -> Vec<TrackEvent> {
        self.tracker.take_events()
    }
}
