//! Frame usability gate
//!
//! A frame is usable only when the pose model detected a body and
//! every joint the active exercise needs clears the visibility
//! threshold. Degraded frames are not dropped - they flow through the
//! pipeline tagged, and downstream components hold state across them.

use crate::pose::{Joint, LandmarkFrame};

/// Default minimum per-joint visibility, matching the detection
/// confidence the pose model itself is run with
pub const DEFAULT_MIN_VISIBILITY: f32 = 0.5;

/// Whether a frame can be trusted for phase and scoring decisions
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStatus {
    Usable,
    Degraded,
}

impl FrameStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            FrameStatus::Usable => "usable",
            FrameStatus::Degraded => "degraded",
        }
    }

    pub fn is_degraded(self) -> bool {
        self == FrameStatus::Degraded
    }
}

/// Visibility gate for one exercise session
pub struct VisibilityGate {
    min_visibility: f32,
    required: Vec<Joint>,
}

impl VisibilityGate {
    pub fn new(min_visibility: f32, required: Vec<Joint>) -> Self {
        Self {
            min_visibility,
            required,
        }
    }

    /// Classify a frame. Never consumes or mutates it.
    pub fn check(&self, frame: &LandmarkFrame) -> FrameStatus {
        if !frame.detected {
            return FrameStatus::Degraded;
        }

        for &joint in &self.required {
            if frame.visibility(joint) < self.min_visibility {
                return FrameStatus::Degraded;
            }
        }

        FrameStatus::Usable
    }
}
