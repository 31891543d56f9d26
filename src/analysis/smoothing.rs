//! Moving-average smoothing for the driving angle
//!
//! Short window over recent angle samples to keep detector jitter out
//! of the phase thresholds. Degraded frames never enter the window.

use std::collections::VecDeque;

/// Moving-average window over the driving angle
pub struct AngleSmoother {
    window: usize,
    history: VecDeque<f32>,
}

impl AngleSmoother {
    /// `window` of 0 or 1 disables smoothing
    pub fn new(window: usize) -> Self {
        Self {
            window,
            history: VecDeque::with_capacity(window.max(1)),
        }
    }

    /// Add a sample and return the current window mean
    pub fn push(&mut self, angle: f32) -> f32 {
        if self.window <= 1 {
            return angle;
        }

        self.history.push_back(angle);
        if self.history.len() > self.window {
            self.history.pop_front();
        }

        self.history.iter().sum::<f32>() / self.history.len() as f32
    }

    /// Drop all history (on session reset)
    pub fn clear(&mut self) {
        self.history.clear();
    }
}
