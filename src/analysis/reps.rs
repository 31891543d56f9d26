//! Repetition counting over phase-change events
//!
//! A repetition is one full traversal of the declared phase cycle:
//! the machine leaves the start phase, visits every other phase in
//! order, and returns to the start. Partial or out-of-order phase
//! noise never counts, and a debounce interval rejects mechanically
//! impossible rep rates from detector jitter.

use std::rc::Rc;

use super::phase::{PhaseChange, PhaseState};
use crate::exercises::config::ExerciseConfig;

/// Cycle outcomes surfaced to the scorer and the session
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CycleEvent {
    /// A validated repetition was counted
    Completed { rep_index: u32, timestamp_ms: f64 },
    /// The in-flight cycle was broken by an unknown excursion;
    /// buffered per-rep state must be discarded
    Invalidated { frame_index: u64 },
}

/// Per-session repetition counter
pub struct RepCounter {
    config: Rc<ExerciseConfig>,
    rep_count: u32,
    /// True once the machine has anchored at the start phase
    armed: bool,
    /// Phases visited in order since the last anchor
    visited: usize,
    last_rep_ms: Option<f64>,
}

impl RepCounter {
    pub fn new(config: Rc<ExerciseConfig>) -> Self {
        Self {
            config,
            rep_count: 0,
            armed: false,
            visited: 0,
            last_rep_ms: None,
        }
    }

    /// Total validated repetitions. Monotonically non-decreasing.
    pub fn rep_count(&self) -> u32 {
        self.rep_count
    }

    /// Consume one phase-change event.
    pub fn observe(&mut self, change: &PhaseChange, timestamp_ms: f64) -> Option<CycleEvent> {
        let to = match change.to {
            PhaseState::Unknown => {
                self.armed = false;
                self.visited = 0;
                return Some(CycleEvent::Invalidated {
                    frame_index: change.frame_index,
                });
            }
            PhaseState::Known(index) => index,
        };

        let cycle_len = self.config.phases.len();

        if !self.armed {
            // A cycle only starts from the start phase.
            if to == 0 {
                self.armed = true;
                self.visited = 0;
            }
            return None;
        }

        let expected = if self.visited + 1 < cycle_len {
            self.visited + 1
        } else {
            0
        };

        if to != expected {
            // Out-of-order arrival: the partial cycle is void.
            self.armed = to == 0;
            self.visited = 0;
            return None;
        }

        if to == 0 {
            // Back at the start with the whole cycle visited.
            self.visited = 0;
            if self.debounced(timestamp_ms) {
                return None;
            }
            self.rep_count += 1;
            self.last_rep_ms = Some(timestamp_ms);
            return Some(CycleEvent::Completed {
                rep_index: self.rep_count,
                timestamp_ms,
            });
        }

        self.visited += 1;
        None
    }

    /// Too soon after the previous counted rep?
    fn debounced(&self, timestamp_ms: f64) -> bool {
        match self.last_rep_ms {
            Some(last) => timestamp_ms - last < self.config.min_rep_interval_ms,
            None => false,
        }
    }
}
