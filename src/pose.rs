//! Pose landmark data model
//!
//! Mirrors the MediaPipe Pose output: 33 landmarks per frame in
//! normalized image coordinates, each with a visibility score.

use serde::Deserialize;

/// Total landmarks per MediaPipe Pose frame
pub const LANDMARK_COUNT: usize = 33;

/// Values per landmark in the flat JS array (x, y, z, visibility)
pub const VALUES_PER_LANDMARK: usize = 4;

/// Body joints the analysis cares about, mapped to MediaPipe Pose indices
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Joint {
    Nose,
    LeftShoulder,
    RightShoulder,
    LeftElbow,
    RightElbow,
    LeftWrist,
    RightWrist,
    LeftHip,
    RightHip,
    LeftKnee,
    RightKnee,
    LeftAnkle,
    RightAnkle,
}

impl Joint {
    /// MediaPipe Pose landmark index
    pub const fn index(self) -> usize {
        match self {
            Joint::Nose => 0,
            Joint::LeftShoulder => 11,
            Joint::RightShoulder => 12,
            Joint::LeftElbow => 13,
            Joint::RightElbow => 14,
            Joint::LeftWrist => 15,
            Joint::RightWrist => 16,
            Joint::LeftHip => 23,
            Joint::RightHip => 24,
            Joint::LeftKnee => 25,
            Joint::RightKnee => 26,
            Joint::LeftAnkle => 27,
            Joint::RightAnkle => 28,
        }
    }
}

/// A single landmark point (normalized coordinates)
#[derive(Clone, Copy, Debug, Default)]
pub struct Landmark {
    /// 0-1 normalized, left to right
    pub x: f32,
    /// 0-1 normalized, top to bottom
    pub y: f32,
    /// Relative depth, hips at 0
    pub z: f32,
    /// Detection confidence in [0, 1]
    pub visibility: f32,
}

/// One frame of pose landmarks as pushed by the pose-estimation side.
///
/// Immutable once built; the analysis core only reads it.
#[derive(Clone)]
pub struct LandmarkFrame {
    landmarks: [Landmark; LANDMARK_COUNT],
    /// Monotonically increasing frame index
    pub frame_index: u64,
    /// Capture timestamp in milliseconds (performance.now() on the JS side)
    pub timestamp_ms: f64,
    /// False when the pose model reported no detection for this frame
    pub detected: bool,
}

impl LandmarkFrame {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT], frame_index: u64, timestamp_ms: f64) -> Self {
        Self {
            landmarks,
            frame_index,
            timestamp_ms,
            detected: true,
        }
    }

    /// Frame for a video frame where the pose model found nothing
    pub fn empty(frame_index: u64, timestamp_ms: f64) -> Self {
        Self {
            landmarks: [Landmark::default(); LANDMARK_COUNT],
            frame_index,
            timestamp_ms,
            detected: false,
        }
    }

    pub fn landmark(&self, joint: Joint) -> &Landmark {
        &self.landmarks[joint.index()]
    }

    /// (x, y) position of a joint
    pub fn point(&self, joint: Joint) -> (f32, f32) {
        let lm = self.landmark(joint);
        (lm.x, lm.y)
    }

    pub fn visibility(&self, joint: Joint) -> f32 {
        self.landmark(joint).visibility
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joint_indices_match_mediapipe() {
        assert_eq!(Joint::Nose.index(), 0);
        assert_eq!(Joint::LeftShoulder.index(), 11);
        assert_eq!(Joint::RightWrist.index(), 16);
        assert_eq!(Joint::RightAnkle.index(), 28);
    }

    #[test]
    fn empty_frame_is_not_detected() {
        let frame = LandmarkFrame::empty(7, 123.0);
        assert!(!frame.detected);
        assert_eq!(frame.frame_index, 7);
        assert_eq!(frame.visibility(Joint::LeftShoulder), 0.0);
    }

    #[test]
    fn landmark_lookup_by_joint() {
        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        landmarks[Joint::LeftElbow.index()] = Landmark {
            x: 0.4,
            y: 0.6,
            z: 0.0,
            visibility: 0.9,
        };
        let frame = LandmarkFrame::new(landmarks, 0, 0.0);
        assert_eq!(frame.point(Joint::LeftElbow), (0.4, 0.6));
        assert_eq!(frame.visibility(Joint::LeftElbow), 0.9);
    }
}
