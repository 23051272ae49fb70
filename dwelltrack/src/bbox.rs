//! Bounding box operations and IoU calculations

use ndarray::prelude::*;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Axis-aligned bounding box in pixel coordinates, stored as top-left
/// corner plus extent. Dimensions are non-negative by precondition; the
/// ingestion layer validates before boxes reach the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bbox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn xmax(&self) -> f32 {
        self.x + self.width
    }

    pub fn ymax(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Intersection over union with `other`.
    ///
    /// Boxes disjoint on either axis yield 0.0, and a zero-area union yields
    /// 0.0 rather than dividing by zero, so degenerate boxes never match.
    pub fn iou(&self, other: &Bbox) -> f32 {
        let x_left = self.x.max(other.x);
        let y_top = self.y.max(other.y);
        let x_right = self.xmax().min(other.xmax());
        let y_bottom = self.ymax().min(other.ymax());

        if x_right <= x_left || y_bottom <= y_top {
            return 0.0;
        }

        let intersection = (x_right - x_left) * (y_bottom - y_top);
        let union = self.area() + other.area() - intersection;

        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }
}

impl fmt::Display for Bbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bbox({}, {}, {}x{})",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Compute the IoU matrix between detections and track boxes.
/// Returns: (n_detections, n_tracks) IoU matrix
pub fn iou_matrix(detections: &[Bbox], tracks: &[Bbox]) -> Array2<f32> {
    let n_dets = detections.len();
    let n_tracks = tracks.len();

    if n_dets == 0 || n_tracks == 0 {
        return Array2::zeros((n_dets, n_tracks));
    }

    // Parallel computation of IoU matrix rows
    let iou_data: Vec<f32> = detections
        .par_iter()
        .flat_map(|det| {
            tracks
                .iter()
                .map(|track| det.iou(track))
                .collect::<Vec<_>>()
        })
        .collect();

    Array2::from_shape_vec((n_dets, n_tracks), iou_data).unwrap()
}
