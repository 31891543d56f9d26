//! Per-frame angle extraction
//!
//! Computes the named body angles the exercise configs reference:
//! arm (shoulder-elbow-wrist), leg (hip-knee-ankle) and trunk
//! (shoulder-hip-knee), each side independently.

use serde::Deserialize;

use super::angles::joint_angle;
use crate::pose::{Joint, LandmarkFrame};

/// Which body angle drives an exercise's phase transitions
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Arm,
    Leg,
    Trunk,
}

impl SignalKind {
    /// Joints that must be visible for this signal to be trusted
    pub fn required_joints(self) -> &'static [Joint] {
        match self {
            SignalKind::Arm => &[
                Joint::LeftShoulder,
                Joint::RightShoulder,
                Joint::LeftElbow,
                Joint::RightElbow,
                Joint::LeftWrist,
                Joint::RightWrist,
            ],
            SignalKind::Leg => &[
                Joint::LeftHip,
                Joint::RightHip,
                Joint::LeftKnee,
                Joint::RightKnee,
                Joint::LeftAnkle,
                Joint::RightAnkle,
            ],
            SignalKind::Trunk => &[
                Joint::LeftShoulder,
                Joint::RightShoulder,
                Joint::LeftHip,
                Joint::RightHip,
                Joint::LeftKnee,
                Joint::RightKnee,
            ],
        }
    }
}

/// All body angles computed for one frame.
///
/// `None` means the angle was geometrically undefined this frame.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameAngles {
    pub left_arm: Option<f32>,
    pub right_arm: Option<f32>,
    pub left_leg: Option<f32>,
    pub right_leg: Option<f32>,
    pub left_trunk: Option<f32>,
    pub right_trunk: Option<f32>,
}

impl FrameAngles {
    /// (left, right) pair for a signal kind
    pub fn pair(&self, kind: SignalKind) -> (Option<f32>, Option<f32>) {
        match kind {
            SignalKind::Arm => (self.left_arm, self.right_arm),
            SignalKind::Leg => (self.left_leg, self.right_leg),
            SignalKind::Trunk => (self.left_trunk, self.right_trunk),
        }
    }

    /// The driving angle for a signal kind: mean of both sides when
    /// available, one side as fallback, `None` when neither resolved.
    pub fn driving(&self, kind: SignalKind) -> Option<f32> {
        match self.pair(kind) {
            (Some(l), Some(r)) => Some((l + r) / 2.0),
            (Some(l), None) => Some(l),
            (None, Some(r)) => Some(r),
            (None, None) => None,
        }
    }
}

/// Compute every named angle for one frame
pub fn extract_angles(frame: &LandmarkFrame) -> FrameAngles {
    let angle = |a: Joint, vertex: Joint, b: Joint| {
        joint_angle(frame.point(a), frame.point(vertex), frame.point(b))
    };

    FrameAngles {
        left_arm: angle(Joint::LeftShoulder, Joint::LeftElbow, Joint::LeftWrist),
        right_arm: angle(Joint::RightShoulder, Joint::RightElbow, Joint::RightWrist),
        left_leg: angle(Joint::LeftHip, Joint::LeftKnee, Joint::LeftAnkle),
        right_leg: angle(Joint::RightHip, Joint::RightKnee, Joint::RightAnkle),
        left_trunk: angle(Joint::LeftShoulder, Joint::LeftHip, Joint::LeftKnee),
        right_trunk: angle(Joint::RightShoulder, Joint::RightHip, Joint::RightKnee),
    }
}
