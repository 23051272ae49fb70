//! Track lifecycle events

use crate::bbox::Bbox;

/// Lifecycle notification recorded by the tracker during an update pass.
///
/// Events accumulate in an internal buffer and are handed out through
/// [`DwellTracker::take_events`](crate::DwellTracker::take_events); callers
/// that only read track state can ignore them entirely.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackEvent {
    /// A detection failed to match any live track and opened a new identity.
    Entered { id: u32, bbox: Bbox, at: f64 },
    /// A live track matched a detection this frame.
    Matched { id: u32, bbox: Bbox },
    /// A track exceeded the disappearance timeout and was removed.
    Left { id: u32, seen_for: f64 },
}

impl TrackEvent {
    /// Track id the event refers to.
    pub fn id(&self) -> u32 {
        match self {
            Self::Entered { id, .. } | Self::Matched { id, .. } | Self::Left { id, .. } => *id,
        }
    }
}
