//! Session accumulation and summary
//!
//! Thin aggregate over the per-frame outputs: rep totals, duration,
//! per-rep scores. Finalized once when the workout ends and handed
//! across the JS boundary as JSON.

use serde::Serialize;

use super::scoring::RepScore;

/// Read-only summary of a finished session
#[derive(Clone, Debug, Serialize)]
pub struct SessionSummary {
    pub exercise: String,
    pub total_reps: u32,
    pub duration_seconds: f64,
    pub average_form_score: f32,
    /// Final form score per repetition, in completion order
    pub rep_scores: Vec<f32>,
    /// Completion timestamp of each repetition (ms, caller clock)
    pub rep_times_ms: Vec<f64>,
}

/// Per-session accumulator, updated once per processed frame
pub struct SessionTracker {
    exercise: String,
    start_ms: Option<f64>,
    last_ms: f64,
    reps: Vec<RepScore>,
}

impl SessionTracker {
    pub fn new(exercise: impl Into<String>) -> Self {
        Self {
            exercise: exercise.into(),
            start_ms: None,
            last_ms: 0.0,
            reps: Vec::new(),
        }
    }

    /// Note a processed frame's timestamp
    pub fn record_frame(&mut self, timestamp_ms: f64) {
        if self.start_ms.is_none() {
            self.start_ms = Some(timestamp_ms);
        }
        self.last_ms = timestamp_ms;
    }

    /// Attach a completed repetition's final score
    pub fn record_rep(&mut self, rep: RepScore) {
        self.reps.push(rep);
    }

    pub fn rep_scores(&self) -> &[RepScore] {
        &self.reps
    }

    /// Consume the tracker into the final read-only summary
    pub fn finalize(self, total_reps: u32) -> SessionSummary {
        let duration_seconds = match self.start_ms {
            Some(start) => (self.last_ms - start) / 1000.0,
            None => 0.0,
        };
        let average_form_score = if self.reps.is_empty() {
            0.0
        } else {
            self.reps.iter().map(|r| r.score).sum::<f32>() / self.reps.len() as f32
        };

        SessionSummary {
            exercise: self.exercise,
            total_reps,
            duration_seconds,
            average_form_score,
            rep_scores: self.reps.iter().map(|r| r.score).collect(),
            rep_times_ms: self.reps.iter().map(|r| r.timestamp_ms).collect(),
        }
    }
}
