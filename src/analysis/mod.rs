//! Exercise analysis core - pure Rust, no wasm dependencies
//!
//! Re-exports only. All logic in submodules.

pub mod angles;
pub mod engine;
pub mod features;
pub mod phase;
pub mod reps;
pub mod scoring;
pub mod session;
pub mod smoothing;
pub mod visibility;

pub use angles::{axis_offset, joint_angle, Axis};
pub use engine::{ExerciseEngine, FrameOutput};
pub use features::{extract_angles, FrameAngles, SignalKind};
pub use phase::{PhaseChange, PhaseState, PhaseTracker};
pub use reps::{CycleEvent, RepCounter};
pub use scoring::{Deduction, FormScorer, RepScore};
pub use session::{SessionSummary, SessionTracker};
pub use smoothing::AngleSmoother;
pub use visibility::{FrameStatus, VisibilityGate};
