//! Form scoring with explainable deductions
//!
//! Every usable frame starts at 100 and loses points per violated
//! rule from the variant's deduction tables. The result is a score
//! plus the list of (reason, amount) pairs that produced it, so the
//! UI can say why, not just how much.
//!
//! Per-frame scores are buffered across the current cycle; when the
//! rep counter validates the cycle they reduce to one final score.

use std::rc::Rc;

use serde::Serialize;

use super::angles::axis_offset;
use super::features::FrameAngles;
use crate::exercises::config::{ExerciseConfig, ScoreReduction};
use crate::pose::LandmarkFrame;

/// One applied deduction: what and how much
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Deduction {
    pub reason: String,
    pub amount: f32,
}

/// Final score attached to one completed repetition, with the
/// summary of what went wrong during it
#[derive(Clone, Debug, Serialize)]
pub struct RepScore {
    pub rep_index: u32,
    pub score: f32,
    pub timestamp_ms: f64,
    /// Worst deduction per reason observed across the cycle
    pub deductions: Vec<Deduction>,
}

/// Per-session form scorer
pub struct FormScorer {
    config: Rc<ExerciseConfig>,
    live_score: f32,
    live_deductions: Vec<Deduction>,
    cycle_scores: Vec<f32>,
    cycle_deductions: Vec<Deduction>,
}

impl FormScorer {
    pub fn new(config: Rc<ExerciseConfig>) -> Self {
        Self {
            config,
            live_score: 100.0,
            live_deductions: Vec::new(),
            cycle_scores: Vec::new(),
            cycle_deductions: Vec::new(),
        }
    }

    pub fn live_score(&self) -> f32 {
        self.live_score
    }

    pub fn deductions(&self) -> &[Deduction] {
        &self.live_deductions
    }

    /// Score one frame.
    ///
    /// `phase_name` is `None` while the phase machine is in unknown;
    /// phase-conditioned rules are skipped then. A `held` frame
    /// (degraded or no driving angle) computes nothing - the previous
    /// live score carries forward so feedback does not flicker on a
    /// single missed detection.
    pub fn score_frame(
        &mut self,
        frame: &LandmarkFrame,
        angles: &FrameAngles,
        phase_name: Option<&str>,
        held: bool,
    ) {
        if held {
            self.cycle_scores.push(self.live_score);
            return;
        }

        let mut deductions = Vec::new();

        if let Some(phase) = phase_name {
            for rule in &self.config.form.range_rules {
                if rule.phase != phase {
                    continue;
                }
                let Some(angle) = angles.driving(rule.signal) else {
                    continue;
                };
                let out_of_range = if angle < rule.min_deg {
                    rule.min_deg - angle
                } else if angle > rule.max_deg {
                    angle - rule.max_deg
                } else {
                    continue;
                };
                let amount = (out_of_range * rule.per_degree).min(rule.cap);
                if amount > 0.0 {
                    deductions.push(Deduction {
                        reason: rule.label.clone(),
                        amount,
                    });
                }
            }
        }

        if let Some(rule) = &self.config.form.asymmetry {
            if let (Some(left), Some(right)) = angles.pair(rule.signal) {
                if (left - right).abs() > rule.tolerance_deg {
                    deductions.push(Deduction {
                        reason: rule.label.clone(),
                        amount: rule.penalty,
                    });
                }
            }
        }

        for rule in &self.config.form.alignment_rules {
            let offset = axis_offset(frame.point(rule.first), frame.point(rule.second), rule.axis);
            if offset < rule.min_offset || offset > rule.max_offset {
                deductions.push(Deduction {
                    reason: rule.label.clone(),
                    amount: rule.penalty,
                });
            }
        }

        let total: f32 = deductions.iter().map(|d| d.amount).sum();
        self.live_score = (100.0 - total).clamp(0.0, 100.0);
        for deduction in &deductions {
            self.note_cycle_deduction(deduction);
        }
        self.live_deductions = deductions;
        self.cycle_scores.push(self.live_score);
    }

    /// Track the worst amount seen per reason across the cycle
    fn note_cycle_deduction(&mut self, deduction: &Deduction) {
        match self
            .cycle_deductions
            .iter_mut()
            .find(|d| d.reason == deduction.reason)
        {
            Some(existing) => existing.amount = existing.amount.max(deduction.amount),
            None => self.cycle_deductions.push(deduction.clone()),
        }
    }

    /// Reduce the buffered cycle into one final rep score and clear
    /// the buffer for the next cycle.
    pub fn complete_rep(&mut self, rep_index: u32, timestamp_ms: f64) -> RepScore {
        let score = match self.config.rep_score_reduction {
            ScoreReduction::Min => self
                .cycle_scores
                .iter()
                .copied()
                .fold(f32::INFINITY, f32::min),
            ScoreReduction::Mean => {
                self.cycle_scores.iter().sum::<f32>() / self.cycle_scores.len() as f32
            }
        };
        // An empty buffer cannot happen mid-session (the completing
        // frame is scored first), but stay defined anyway.
        let score = if self.cycle_scores.is_empty() {
            self.live_score
        } else {
            score
        };
        self.cycle_scores.clear();

        RepScore {
            rep_index,
            score,
            timestamp_ms,
            deductions: std::mem::take(&mut self.cycle_deductions),
        }
    }

    /// Discard the buffer after a broken cycle; no final score exists.
    pub fn invalidate_cycle(&mut self) {
        self.cycle_scores.clear();
        self.cycle_deductions.clear();
    }
}
