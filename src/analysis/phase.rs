//! Exercise phase state machine
//!
//! Tracks which phase of the movement cycle the body is in, using one
//! trigger threshold per phase. Hysteresis comes from the enforced
//! separation between adjacent triggers: an angle hovering between
//! them satisfies neither and the state holds.
//!
//! Degraded frames never move the state. After enough of them in a
//! row the machine falls to `Unknown`, which tells the rep counter
//! that in-flight cycle timing is no longer trustworthy.

use std::rc::Rc;

use crate::exercises::config::ExerciseConfig;

/// Current phase: an index into the config's cycle, or unknown
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PhaseState {
    Known(usize),
    Unknown,
}

/// Emitted whenever the active phase changes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: PhaseState,
    pub to: PhaseState,
    pub frame_index: u64,
}

/// Per-session phase tracker
pub struct PhaseTracker {
    config: Rc<ExerciseConfig>,
    state: PhaseState,
    degraded_streak: u32,
}

impl PhaseTracker {
    pub fn new(config: Rc<ExerciseConfig>) -> Self {
        Self {
            config,
            state: PhaseState::Unknown,
            degraded_streak: 0,
        }
    }

    pub fn state(&self) -> PhaseState {
        self.state
    }

    /// Active phase name, or "unknown"
    pub fn phase_name(&self) -> &str {
        match self.state {
            PhaseState::Known(i) => self.config.phase_name(i),
            PhaseState::Unknown => "unknown",
        }
    }

    /// Feed one frame's driving angle. `None` marks a degraded frame
    /// or an undefined angle - both are the same confidence gap.
    pub fn advance(&mut self, angle: Option<f32>, frame_index: u64) -> Option<PhaseChange> {
        let Some(angle) = angle else {
            return self.advance_degraded(frame_index);
        };
        self.degraded_streak = 0;

        let next = match self.state {
            PhaseState::Unknown => {
                // Re-establish: first phase in cycle order whose
                // trigger the angle already satisfies. Inside the
                // deadband nothing matches and we stay unknown.
                self.config
                    .phases
                    .iter()
                    .position(|p| p.triggered_by(angle))?
            }
            PhaseState::Known(current) => {
                let candidate = (current + 1) % self.config.phases.len();
                if !self.config.phases[candidate].triggered_by(angle) {
                    return None;
                }
                candidate
            }
        };

        self.transition_to(PhaseState::Known(next), frame_index)
    }

    fn advance_degraded(&mut self, frame_index: u64) -> Option<PhaseChange> {
        if self.state == PhaseState::Unknown {
            return None;
        }
        self.degraded_streak += 1;
        if self.degraded_streak >= self.config.max_degraded_frames {
            self.degraded_streak = 0;
            return self.transition_to(PhaseState::Unknown, frame_index);
        }
        None
    }

    fn transition_to(&mut self, to: PhaseState, frame_index: u64) -> Option<PhaseChange> {
        if to == self.state {
            return None;
        }
        let change = PhaseChange {
            from: self.state,
            to,
            frame_index,
        };
        self.state = to;
        Some(change)
    }
}
