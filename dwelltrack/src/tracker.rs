//! Greedy overlap tracker with disappearance timeout
//!
//! One `update` call per frame: age every live track, greedily associate the
//! frame's detections by IoU, then prune tracks that have been unmatched for
//! longer than the configured timeout. Assignment is deliberately greedy
//! (first detection to claim a track wins) rather than globally optimal.

use crate::bbox::{iou_matrix, Bbox};
use crate::events::TrackEvent;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// Tracker tuning knobs, fixed at construction.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Minimum IoU for a detection to claim a live track.
    pub overlap_threshold: f32,
    /// Consecutive unmatched frames tolerated before a track is removed.
    pub max_disappeared: u32,
    /// Dwell span in seconds after which a track reports `Present`.
    pub present_after_secs: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            overlap_threshold: 0.3,
            max_disappeared: 300, // 10s at 30fps
            present_after_secs: 3.0,
        }
    }
}

/// Dwell classification for a tracked object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DwellStatus {
    /// No match history recorded for the queried id.
    Unknown,
    /// Matched only once, or seen for less than the presence span.
    Arriving,
    /// Matched at least twice across the presence span or longer.
    Present,
}

impl fmt::Display for DwellStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown => write!(f, "Unknown"),
            Self::Arriving => write!(f, "Arriving"),
            Self::Present => write!(f, "Present"),
        }
    }
}

/// A persistent identity for one physical object in the scene.
#[derive(Debug, Clone)]
pub struct Track {
    id: u32,
    bbox: Bbox,
    disappeared: u32,
    history: Vec<f64>,
}

impl Track {
    fn new(id: u32, bbox: Bbox, now: f64) -> Self {
        Self {
            id,
            bbox,
            disappeared: 0,
            history: vec![now],
        }
    }

    /// Unique id, assigned at creation and never reused.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Latest matched (or initial) position.
    pub fn bbox(&self) -> Bbox {
        self.bbox
    }

    /// Frames since the last successful match; 0 exactly when the track
    /// matched in the current frame.
    pub fn disappeared(&self) -> u32 {
        self.disappeared
    }

    /// Timestamps of every matched frame, oldest first. Never pruned.
    pub fn history(&self) -> &[f64] {
        &self.history
    }

    /// Seconds between the first and latest match.
    pub fn dwell_secs(&self) -> f64 {
        match (self.history.first(), self.history.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Whether the track matched a detection in the current frame.
    pub fn is_visible(&self) -> bool {
        self.disappeared == 0
    }
}

/// Greedy IoU tracker that classifies dwell state per track.
///
/// Single-threaded, call-and-return: `update` must finish before the next
/// frame's detections arrive, and read accessors are only valid between
/// updates. Callers that move the tracker off-thread serialize access
/// themselves.
#[derive(Debug)]
pub struct DwellTracker {
    config: TrackerConfig,
    tracks: BTreeMap<u32, Track>,
    next_track_id: u32,
    events: Vec<TrackEvent>,
    n_frames: u64,
}

impl DwellTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_first_id(config, 0)
    }

    /// Tracker whose ids start at `first_id` instead of 0, for callers that
    /// shard id spaces across cameras.
    pub fn with_first_id(config: TrackerConfig, first_id: u32) -> Self {
        Self {
            config,
            tracks: BTreeMap::new(),
            next_track_id: first_id,
            events: Vec::new(),
            n_frames: 0,
        }
    }

    /// Main update function, called exactly once per frame.
    ///
    /// `now` is the frame timestamp in seconds; it lands in the history of
    /// every track that matches this frame. An empty batch is valid and acts
    /// as a pure aging/pruning frame.
    pub fn update(&mut self, detections: &[Bbox], now: f64) {
        self.n_frames += 1;

        // Step 1: every live track starts the frame unmatched
        self.age_tracks();

        // Step 2: greedy association in detection order
        self.match_detections(detections, now);

        // Step 3: drop tracks past the disappearance timeout
        self.prune_stale();
    }

    /// `update` stamped with the current wall clock.
    pub fn update_now(&mut self, detections: &[Bbox]) {
        self.update(detections, unix_now());
    }

    fn age_tracks(&mut self) {
        for track in self.tracks.values_mut() {
            track.disappeared += 1;
        }
    }

    /// Associate detections with live tracks, creating a track for every
    /// detection left unmatched.
    ///
    /// Candidates are the tracks alive when the frame began, at their
    /// pre-frame positions; each can be claimed at most once, and a claimed
    /// track is excluded for the rest of the pass. Per detection the highest
    /// IoU above the threshold wins, earliest id on ties.
    fn match_detections(&mut self, detections: &[Bbox], now: f64) {
        let ids: Vec<u32> = self.tracks.keys().copied().collect();
        let boxes: Vec<Bbox> = self.tracks.values().map(|t| t.bbox).collect();
        let ious = iou_matrix(detections, &boxes);
        let mut claimed = vec![false; ids.len()];

        for (det_idx, det) in detections.iter().enumerate() {
            let mut best: Option<(usize, f32)> = None;
            for track_idx in 0..ids.len() {
                if claimed[track_idx] {
                    continue;
                }
                let iou = ious[(det_idx, track_idx)];
                if iou > self.config.overlap_threshold && best.map_or(true, |(_, b)| iou > b) {
                    best = Some((track_idx, iou));
                }
            }

            match best {
                Some((track_idx, iou)) => {
                    claimed[track_idx] = true;
                    let id = ids[track_idx];
                    if let Some(track) = self.tracks.get_mut(&id) {
                        track.bbox = *det;
                        track.disappeared = 0;
                        track.history.push(now);
                        log::trace!("track {} matched with IoU {:.3}", id, iou);
                        self.events.push(TrackEvent::Matched { id, bbox: *det });
                    }
                }
                None => self.create_track(*det, now),
            }
        }
    }

    fn create_track(&mut self, bbox: Bbox, now: f64) {
        let id = self.next_track_id;
        self.next_track_id += 1;
        self.tracks.insert(id, Track::new(id, bbox, now));
        log::debug!("track {} entered at {}", id, bbox);
        self.events.push(TrackEvent::Entered { id, bbox, at: now });
    }

    /// Remove tracks that haven't matched for too long. Strict comparison:
    /// a track survives exactly `max_disappeared` unmatched frames and is
    /// removed on the next.
    fn prune_stale(&mut self) {
        let max_disappeared = self.config.max_disappeared;
        let events = &mut self.events;
        self.tracks.retain(|id, track| {
            if track.disappeared > max_disappeared {
                log::debug!("track {} left after {:.1}s in scene", id, track.dwell_secs());
                events.push(TrackEvent::Left {
                    id: *id,
                    seen_for: track.dwell_secs(),
                });
                false
            } else {
                true
            }
        });
    }

    /// Dwell classification for `track_id`.
    ///
    /// Because history is never pruned, the dwell span is measured from the
    /// track's creation forever, so the Arriving → Present transition is
    /// monotonic.
    pub fn status(&self, track_id: u32) -> DwellStatus {
        let history = match self.tracks.get(&track_id) {
            Some(track) if !track.history.is_empty() => &track.history,
            _ => return DwellStatus::Unknown,
        };

        if history.len() < 2 {
            return DwellStatus::Arriving;
        }

        let span = history[history.len() - 1] - history[0];
        if span < self.config.present_after_secs {
            DwellStatus::Arriving
        } else {
            DwellStatus::Present
        }
    }

    /// All live tracks in ascending id order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// Tracks that matched a detection this frame, the set a renderer draws.
    pub fn visible(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values().filter(|t| t.is_visible())
    }

    pub fn get(&self, track_id: u32) -> Option<&Track> {
        self.tracks.get(&track_id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Number of `update` calls processed so far.
    pub fn frame_count(&self) -> u64 {
        self.n_frames
    }

    /// Drain the lifecycle events recorded since the last drain.
    pub fn take_events(&mut self) -> Vec<TrackEvent> {
        std::mem::take(&mut self.events)
    }

    /// Drop all live tracks. Identities are never reused, so the id counter
    /// survives a clear.
    pub fn clear(&mut self) {
        self.tracks.clear();
        self.events.clear();
    }
}

fn unix_now() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn tracker() -> DwellTracker {
        DwellTracker::new(TrackerConfig::default())
    }

    #[test]
    fn test_creation() {
        let mut tracker = tracker();
        tracker.update(&[Bbox::new(10.0, 10.0, 20.0, 20.0)], 0.0);

        assert_eq!(tracker.len(), 1);
        let track = tracker.get(0).unwrap();
        assert_eq!(track.id(), 0);
        assert_eq!(track.disappeared(), 0);
        assert_eq!(track.history().len(), 1);
    }

    #[test]
    fn test_persistence_via_overlap() {
        let mut tracker = tracker();
        tracker.update(&[Bbox::new(10.0, 10.0, 20.0, 20.0)], 0.0);
        tracker.update(&[Bbox::new(11.0, 11.0, 20.0, 20.0)], 0.033);

        // Matched, not recreated
        assert_eq!(tracker.len(), 1);
        let track = tracker.get(0).unwrap();
        assert_eq!(track.disappeared(), 0);
        assert_eq!(track.history().len(), 2);
        assert_eq!(track.bbox(), Bbox::new(11.0, 11.0, 20.0, 20.0));
    }

    #[test]
    fn test_non_match_creates_new_id() {
        let mut tracker = tracker();
        tracker.update(&[Bbox::new(10.0, 10.0, 20.0, 20.0)], 0.0);
        tracker.update(&[Bbox::new(500.0, 500.0, 20.0, 20.0)], 0.033);

        assert_eq!(tracker.len(), 2);
        let ids: Vec<u32> = tracker.tracks().map(|t| t.id()).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_aging_and_pruning() {
        let config = TrackerConfig {
            max_disappeared: 3,
            ..TrackerConfig::default()
        };
        let mut tracker = DwellTracker::new(config);
        tracker.update(&[Bbox::new(10.0, 10.0, 20.0, 20.0)], 0.0);

        // Survives exactly max_disappeared unmatched frames
        for _ in 0..3 {
            tracker.update(&[], 0.0);
        }
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.get(0).unwrap().disappeared(), 3);

        // Removed on the next
        tracker.update(&[], 0.0);
        assert!(tracker.is_empty());
    }

    #[test]
    fn test_removed_track_gets_fresh_id() {
        let config = TrackerConfig {
            max_disappeared: 1,
            ..TrackerConfig::default()
        };
        let mut tracker = DwellTracker::new(config);
        let bbox = Bbox::new(10.0, 10.0, 20.0, 20.0);
        tracker.update(&[bbox], 0.0);
        tracker.update(&[], 0.1);
        tracker.update(&[], 0.2);
        assert!(tracker.is_empty());

        // Same object reappearing is a new identity, never reattached
        tracker.update(&[bbox], 0.3);
        assert_eq!(tracker.len(), 1);
        assert_eq!(tracker.tracks().next().unwrap().id(), 1);
        assert_eq!(tracker.tracks().next().unwrap().history().len(), 1);
    }

    #[test]
    fn test_status_transition() {
        let mut tracker = tracker();
        let bbox = Bbox::new(10.0, 10.0, 20.0, 20.0);

        tracker.update(&[bbox], 100.0);
        assert_eq!(tracker.status(0), DwellStatus::Arriving); // single entry

        tracker.update(&[bbox], 101.0);
        assert_eq!(tracker.status(0), DwellStatus::Arriving); // span 1.0s

        tracker.update(&[bbox], 102.9);
        assert_eq!(tracker.status(0), DwellStatus::Arriving); // span 2.9s

        tracker.update(&[bbox], 103.0);
        assert_eq!(tracker.status(0), DwellStatus::Present); // span 3.0s

        // Monotonic: history only grows, span never shrinks
        tracker.update(&[bbox], 103.1);
        assert_eq!(tracker.status(0), DwellStatus::Present);
    }

    #[test]
    fn test_status_unknown() {
        let tracker = tracker();
        assert_eq!(tracker.status(42), DwellStatus::Unknown);
    }

    #[test]
    fn test_no_double_matching() {
        let mut tracker = tracker();
        tracker.update(&[Bbox::new(10.0, 10.0, 20.0, 20.0)], 0.0);

        // Both detections overlap the track above threshold; only one claims it
        let dets = [
            Bbox::new(11.0, 11.0, 20.0, 20.0),
            Bbox::new(12.0, 12.0, 20.0, 20.0),
        ];
        tracker.update(&dets, 0.033);

        assert_eq!(tracker.len(), 2);
        let track0 = tracker.get(0).unwrap();
        assert_eq!(track0.history().len(), 2);
        assert_eq!(track0.bbox(), dets[0]);
        let track1 = tracker.get(1).unwrap();
        assert_eq!(track1.history().len(), 1);
        assert_eq!(track1.bbox(), dets[1]);
    }

    #[test]
    fn test_highest_iou_wins() {
        let mut tracker = tracker();
        tracker.update(
            &[
                Bbox::new(0.0, 0.0, 20.0, 20.0),
                Bbox::new(10.0, 0.0, 20.0, 20.0),
            ],
            0.0,
        );

        // Overlaps both tracks, but lines up exactly with track 1
        tracker.update(&[Bbox::new(10.0, 0.0, 20.0, 20.0)], 0.033);

        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.get(0).unwrap().disappeared(), 1);
        assert_eq!(tracker.get(1).unwrap().disappeared(), 0);
    }

    #[test]
    fn test_matches_do_not_chain_within_frame() {
        let mut tracker = tracker();
        tracker.update(&[Bbox::new(0.0, 0.0, 20.0, 20.0)], 0.0);

        // First detection drags the track to (5, 0); the second overlaps the
        // moved box above threshold but not the pre-frame one, so it opens a
        // new track instead of chaining off the fresh position.
        let dets = [
            Bbox::new(5.0, 0.0, 20.0, 20.0),
            Bbox::new(14.0, 0.0, 20.0, 20.0),
        ];
        tracker.update(&dets, 0.033);

        assert_eq!(tracker.len(), 2);
        assert_eq!(tracker.get(0).unwrap().bbox(), dets[0]);
    }

    #[test]
    fn test_visible_excludes_unmatched() {
        let mut tracker = tracker();
        tracker.update(&[Bbox::new(10.0, 10.0, 20.0, 20.0)], 0.0);
        tracker.update(&[Bbox::new(500.0, 500.0, 20.0, 20.0)], 0.033);

        let visible: Vec<u32> = tracker.visible().map(|t| t.id()).collect();
        assert_eq!(visible, vec![1]);
        assert_eq!(tracker.len(), 2);
    }

    #[test]
    fn test_events() {
        let config = TrackerConfig {
            max_disappeared: 1,
            ..TrackerConfig::default()
        };
        let mut tracker = DwellTracker::new(config);
        let bbox = Bbox::new(10.0, 10.0, 20.0, 20.0);

        tracker.update(&[bbox], 0.0);
        let events = tracker.take_events();
        assert_eq!(events, vec![TrackEvent::Entered { id: 0, bbox, at: 0.0 }]);

        tracker.update(&[bbox], 1.0);
        assert_eq!(tracker.take_events(), vec![TrackEvent::Matched { id: 0, bbox }]);

        tracker.update(&[], 2.0);
        tracker.update(&[], 3.0);
        let events = tracker.take_events();
        assert_eq!(events.len(), 1);
        match &events[0] {
            TrackEvent::Left { id, seen_for } => {
                assert_eq!(*id, 0);
                assert_abs_diff_eq!(*seen_for, 1.0, epsilon = 1e-9);
            }
            other => panic!("expected Left event, got {:?}", other),
        }

        // Drained buffer stays empty until something happens
        assert!(tracker.take_events().is_empty());
    }

    #[test]
    fn test_empty_frames_are_valid() {
        let mut tracker = tracker();
        tracker.update(&[], 0.0);
        tracker.update(&[], 0.033);
        assert!(tracker.is_empty());
        assert_eq!(tracker.frame_count(), 2);
    }

    #[test]
    fn test_clear_keeps_id_counter() {
        let mut tracker = tracker();
        tracker.update(&[Bbox::new(10.0, 10.0, 20.0, 20.0)], 0.0);
        tracker.clear();
        assert!(tracker.is_empty());

        tracker.update(&[Bbox::new(10.0, 10.0, 20.0, 20.0)], 1.0);
        assert_eq!(tracker.tracks().next().unwrap().id(), 1);
    }

    #[test]
    fn test_with_first_id() {
        let mut tracker = DwellTracker::with_first_id(TrackerConfig::default(), 1000);
        tracker.update(&[Bbox::new(10.0, 10.0, 20.0, 20.0)], 0.0);
        assert_eq!(tracker.tracks().next().unwrap().id(), 1000);
    }
}
