//! Greedy IoU-based dwell tracking library
//!
//! This crate maintains persistent identities for objects detected across
//! video frames. Detections arrive as one batch of bounding boxes per frame;
//! the tracker associates them with live tracks by box overlap, ages out
//! tracks that stop matching, and classifies how long each object has been
//! in the scene.
//!
//! ```rust,ignore
//! use dwelltrack::{Bbox, DwellTracker, TrackerConfig};
//!
//! let mut tracker = DwellTracker::new(TrackerConfig::default());
//!
//! // One call per frame, detections already filtered upstream.
//! let detections = vec![Bbox::new(10.0, 10.0, 20.0, 20.0)];
//! tracker.update(&detections, 0.0);
//!
//! for track in tracker.visible() {
//!     println!("{}: {}", track.id(), tracker.status(track.id()));
//! }
//! ```

pub mod bbox;
pub mod events;
pub mod tracker;

pub use bbox::{iou_matrix, Bbox};
pub use events::TrackEvent;
pub use tracker::{DwellStatus, DwellTracker, Track, TrackerConfig};
