//! Per-frame analysis pipeline
//!
//! One engine per workout session. Each landmark frame flows through
//! visibility gate -> angle extraction -> smoothing -> phase machine
//! -> rep counter -> form scorer, synchronously and in order; the
//! result is one [`FrameOutput`] for the presentation side to poll.

use std::rc::Rc;

use super::features::{extract_angles, FrameAngles};
use super::phase::{PhaseState, PhaseTracker};
use super::reps::{CycleEvent, RepCounter};
use super::scoring::{Deduction, FormScorer};
use super::session::{SessionSummary, SessionTracker};
use super::smoothing::AngleSmoother;
use super::visibility::{FrameStatus, VisibilityGate};
use crate::exercises::config::{ConfigError, ExerciseConfig};
use crate::pose::LandmarkFrame;

/// Everything downstream consumers need after one processed frame
#[derive(Clone, Debug)]
pub struct FrameOutput {
    pub frame_index: u64,
    pub status: FrameStatus,
    /// Active phase name, "unknown" during startup/occlusion
    pub phase: String,
    /// Smoothed driving angle, when defined this frame
    pub angle: Option<f32>,
    pub rep_count: u32,
    pub live_score: f32,
    pub deductions: Vec<Deduction>,
    /// Cycle completions/invalidations that happened on this frame
    pub events: Vec<CycleEvent>,
}

/// The exercise analysis core for one session
pub struct ExerciseEngine {
    config: Rc<ExerciseConfig>,
    gate: VisibilityGate,
    smoother: AngleSmoother,
    phases: PhaseTracker,
    reps: RepCounter,
    scorer: FormScorer,
    session: SessionTracker,
}

impl ExerciseEngine {
    /// Build an engine for a validated config. The only fatal path:
    /// a malformed config refuses to construct, nothing per-frame
    /// ever fails.
    pub fn new(config: ExerciseConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let config = Rc::new(config);

        Ok(Self {
            gate: VisibilityGate::new(config.min_visibility, config.required_joints()),
            smoother: AngleSmoother::new(config.smoothing_window),
            phases: PhaseTracker::new(Rc::clone(&config)),
            reps: RepCounter::new(Rc::clone(&config)),
            scorer: FormScorer::new(Rc::clone(&config)),
            session: SessionTracker::new(config.name.clone()),
            config,
        })
    }

    pub fn config(&self) -> &ExerciseConfig {
        &self.config
    }

    pub fn rep_count(&self) -> u32 {
        self.reps.rep_count()
    }

    pub fn phase_name(&self) -> &str {
        self.phases.phase_name()
    }

    /// Most recently completed repetition, with its deduction summary
    pub fn last_rep(&self) -> Option<&super::scoring::RepScore> {
        self.session.rep_scores().last()
    }

    /// Process one frame to completion. Frames must arrive in
    /// timestamp order; the caller owns the frame and it is never
    /// mutated here.
    pub fn process(&mut self, frame: &LandmarkFrame) -> FrameOutput {
        let status = self.gate.check(frame);
        let angles = extract_angles(frame);

        let smoothed = self.driving_angle(status, &angles);
        let change = self.phases.advance(smoothed, frame.frame_index);

        let phase_name = match self.phases.state() {
            PhaseState::Known(i) => Some(self.config.phase_name(i).to_owned()),
            PhaseState::Unknown => None,
        };
        self.scorer.score_frame(
            frame,
            &angles,
            phase_name.as_deref(),
            smoothed.is_none(),
        );

        let mut events = Vec::new();
        if let Some(change) = change {
            if let Some(event) = self.reps.observe(&change, frame.timestamp_ms) {
                match event {
                    CycleEvent::Completed {
                        rep_index,
                        timestamp_ms,
                    } => {
                        let rep = self.scorer.complete_rep(rep_index, timestamp_ms);
                        self.session.record_rep(rep);
                    }
                    CycleEvent::Invalidated { .. } => self.scorer.invalidate_cycle(),
                }
                events.push(event);
            }
        }

        self.session.record_frame(frame.timestamp_ms);

        FrameOutput {
            frame_index: frame.frame_index,
            status,
            phase: phase_name.unwrap_or_else(|| "unknown".to_owned()),
            angle: smoothed,
            rep_count: self.reps.rep_count(),
            live_score: self.scorer.live_score(),
            deductions: self.scorer.deductions().to_vec(),
            events,
        }
    }

    /// End the session; finalizes the summary with whatever has
    /// accumulated (clean cancellation, nothing is rolled back).
    pub fn finish(self) -> SessionSummary {
        self.session.finalize(self.reps.rep_count())
    }

    /// Smoothed driving angle, or `None` when this frame cannot be
    /// trusted (degraded, or the angle was geometrically undefined).
    /// Degraded frames stay out of the smoothing window.
    fn driving_angle(&mut self, status: FrameStatus, angles: &FrameAngles) -> Option<f32> {
        if status.is_degraded() {
            return None;
        }
        let raw = angles.driving(self.config.signal)?;
        Some(self.smoother.push(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::features::SignalKind;
    use crate::exercises::config::{
        AsymmetryRule, FormRules, PhaseSpec, RangeRule, ScoreReduction, TriggerDirection,
    };
    use crate::pose::{Joint, Landmark, LANDMARK_COUNT};
    use approx::assert_relative_eq;

    /// Frame whose left and right elbow angles are exactly as given.
    /// The wrist is rotated about the elbow; shoulder sits above it.
    fn arm_frame(left_deg: f32, right_deg: f32, index: u64, timestamp_ms: f64) -> LandmarkFrame {
        let mut landmarks = [Landmark {
            x: 0.5,
            y: 0.5,
            z: 0.0,
            visibility: 1.0,
        }; LANDMARK_COUNT];

        let mut place_arm = |shoulder: Joint, elbow: Joint, wrist: Joint, x: f32, deg: f32| {
            let rad = deg.to_radians();
            landmarks[shoulder.index()] = Landmark {
                x,
                y: 0.2,
                z: 0.0,
                visibility: 1.0,
            };
            landmarks[elbow.index()] = Landmark {
                x,
                y: 0.4,
                z: 0.0,
                visibility: 1.0,
            };
            landmarks[wrist.index()] = Landmark {
                x: x + 0.2 * rad.sin(),
                y: 0.4 - 0.2 * rad.cos(),
                z: 0.0,
                visibility: 1.0,
            };
        };
        place_arm(
            Joint::LeftShoulder,
            Joint::LeftElbow,
            Joint::LeftWrist,
            0.4,
            left_deg,
        );
        place_arm(
            Joint::RightShoulder,
            Joint::RightElbow,
            Joint::RightWrist,
            0.6,
            right_deg,
        );

        LandmarkFrame::new(landmarks, index, timestamp_ms)
    }

    fn pushup_config() -> ExerciseConfig {
        ExerciseConfig {
            name: "push_ups".into(),
            display_name: "Push-ups".into(),
            signal: SignalKind::Arm,
            phases: vec![
                PhaseSpec {
                    name: "up".into(),
                    trigger_deg: 160.0,
                    direction: TriggerDirection::Above,
                },
                PhaseSpec {
                    name: "down".into(),
                    trigger_deg: 100.0,
                    direction: TriggerDirection::Below,
                },
            ],
            min_visibility: 0.5,
            smoothing_window: 1,
            max_degraded_frames: 5,
            min_rep_interval_ms: 300.0,
            min_trigger_separation: 10.0,
            rep_score_reduction: ScoreReduction::Min,
            form: FormRules::default(),
        }
    }

    /// Push-up sequence 170, 170, 95, 80, 95, 170: exactly one rep,
    /// final score reflecting the depth deduction in the down phase.
    #[test]
    fn scenario_a_single_pushup_cycle() {
        let mut config = pushup_config();
        config.form.range_rules.push(RangeRule {
            phase: "down".into(),
            signal: SignalKind::Arm,
            min_deg: 85.0,
            max_deg: 180.0,
            per_degree: 1.0,
            cap: 20.0,
            label: "Go lower".into(),
        });
        let mut engine = ExerciseEngine::new(config).unwrap();

        let mut last = None;
        for (i, angle) in [170.0, 170.0, 95.0, 80.0, 95.0, 170.0].iter().enumerate() {
            let frame = arm_frame(*angle, *angle, i as u64, i as f64 * 100.0);
            last = Some(engine.process(&frame));
        }

        let last = last.unwrap();
        assert_eq!(last.rep_count, 1);
        assert_eq!(last.phase, "up");
        assert!(matches!(
            last.events.as_slice(),
            [CycleEvent::Completed { rep_index: 1, .. }]
        ));

        let rep = engine.last_rep().unwrap();
        assert_eq!(rep.deductions.len(), 1);
        assert_eq!(rep.deductions[0].reason, "Go lower");

        let summary = engine.finish();
        assert_eq!(summary.total_reps, 1);
        assert_eq!(summary.rep_scores.len(), 1);
        // worst moment: 80 deg, 5 deg below the ideal range
        assert_relative_eq!(summary.rep_scores[0], 95.0, epsilon = 0.05);
        assert!(summary.rep_scores[0] <= 100.0);
    }

    /// A 4-frame degraded gap below the escalation threshold: the
    /// cycle survives and still counts once.
    #[test]
    fn scenario_b_short_degraded_gap_keeps_cycle() {
        let mut engine = ExerciseEngine::new(pushup_config()).unwrap();

        let mut index = 0u64;
        let mut push = |engine: &mut ExerciseEngine, angle: Option<f32>| {
            let ts = index as f64 * 100.0;
            let frame = match angle {
                Some(a) => arm_frame(a, a, index, ts),
                None => LandmarkFrame::empty(index, ts),
            };
            index += 1;
            engine.process(&frame)
        };

        push(&mut engine, Some(170.0));
        push(&mut engine, Some(95.0));
        for _ in 0..4 {
            let out = push(&mut engine, None);
            assert_eq!(out.phase, "down"); // held, not unknown
        }
        let out = push(&mut engine, Some(170.0));

        assert_eq!(out.rep_count, 1);
    }

    /// A 10-frame degraded gap beyond the threshold: unknown, cycle
    /// invalidated, no rep even though the angles resume correctly.
    #[test]
    fn scenario_c_long_degraded_gap_invalidates_cycle() {
        let mut engine = ExerciseEngine::new(pushup_config()).unwrap();

        let mut index = 0u64;
        let mut push = |engine: &mut ExerciseEngine, angle: Option<f32>| {
            let ts = index as f64 * 100.0;
            let frame = match angle {
                Some(a) => arm_frame(a, a, index, ts),
                None => LandmarkFrame::empty(index, ts),
            };
            index += 1;
            engine.process(&frame)
        };

        push(&mut engine, Some(170.0));
        push(&mut engine, Some(95.0));

        let mut saw_invalidation = false;
        for _ in 0..10 {
            let out = push(&mut engine, None);
            saw_invalidation |= out
                .events
                .iter()
                .any(|e| matches!(e, CycleEvent::Invalidated { .. }));
        }
        assert!(saw_invalidation);

        let out = push(&mut engine, Some(170.0));
        assert_eq!(out.phase, "up");
        assert_eq!(out.rep_count, 0);
    }

    /// Bicep-curl asymmetry for 3 consecutive frames: exactly one
    /// asymmetry deduction per frame, no duplicates.
    #[test]
    fn scenario_d_asymmetry_deducts_once_per_frame() {
        let mut config = pushup_config();
        config.name = "bicep_curls".into();
        config.form.asymmetry = Some(AsymmetryRule {
            signal: SignalKind::Arm,
            tolerance_deg: 25.0,
            penalty: 20.0,
            label: "Curl both arms together".into(),
        });
        let mut engine = ExerciseEngine::new(config).unwrap();

        // establish a phase first
        engine.process(&arm_frame(170.0, 170.0, 0, 0.0));

        for i in 1..=3 {
            let frame = arm_frame(90.0, 130.0, i, i as f64 * 100.0);
            let out = engine.process(&frame);

            let asym: Vec<_> = out
                .deductions
                .iter()
                .filter(|d| d.reason == "Curl both arms together")
                .collect();
            assert_eq!(asym.len(), 1);
            assert_relative_eq!(out.live_score, 80.0);
        }
    }

    /// A single degraded frame changes nothing observable.
    #[test]
    fn degraded_frame_holds_all_outputs() {
        let mut engine = ExerciseEngine::new(pushup_config()).unwrap();

        engine.process(&arm_frame(170.0, 170.0, 0, 0.0));
        let before = engine.process(&arm_frame(95.0, 95.0, 1, 100.0));

        let held = engine.process(&LandmarkFrame::empty(2, 200.0));
        assert_eq!(held.status, FrameStatus::Degraded);
        assert_eq!(held.phase, before.phase);
        assert_eq!(held.rep_count, before.rep_count);
        assert_relative_eq!(held.live_score, before.live_score);
    }

    /// Low visibility on a required joint degrades the frame even
    /// when the detection flag is set.
    #[test]
    fn low_visibility_degrades_frame() {
        let mut engine = ExerciseEngine::new(pushup_config()).unwrap();
        engine.process(&arm_frame(170.0, 170.0, 0, 0.0));

        let mut frame = arm_frame(95.0, 95.0, 1, 100.0);
        // rebuild with a low-confidence wrist
        let mut landmarks = [Landmark {
            x: 0.5,
            y: 0.5,
            z: 0.0,
            visibility: 1.0,
        }; LANDMARK_COUNT];
        for joint in [
            Joint::LeftShoulder,
            Joint::LeftElbow,
            Joint::LeftWrist,
            Joint::RightShoulder,
            Joint::RightElbow,
            Joint::RightWrist,
        ] {
            landmarks[joint.index()] = *frame.landmark(joint);
        }
        landmarks[Joint::LeftWrist.index()].visibility = 0.2;
        frame = LandmarkFrame::new(landmarks, 1, 100.0);

        let out = engine.process(&frame);
        assert_eq!(out.status, FrameStatus::Degraded);
        assert_eq!(out.phase, "up"); // held
    }

    /// Debounce inside the engine: two full cycles 100 ms apart only
    /// count once.
    #[test]
    fn debounce_rejects_second_cycle() {
        let mut engine = ExerciseEngine::new(pushup_config()).unwrap();

        let angles = [170.0, 95.0, 170.0, 95.0, 170.0];
        let mut last_count = 0;
        for (i, angle) in angles.iter().enumerate() {
            let frame = arm_frame(*angle, *angle, i as u64, i as f64 * 50.0);
            last_count = engine.process(&frame).rep_count;
        }
        assert_eq!(last_count, 1);
    }

    #[test]
    fn invalid_config_refuses_to_build() {
        let mut config = pushup_config();
        config.phases[1].trigger_deg = 158.0;
        assert!(ExerciseEngine::new(config).is_err());
    }

    /// Smoothing keeps a transient spike from flipping the phase.
    #[test]
    fn smoothing_filters_single_frame_spike() {
        let mut config = pushup_config();
        config.smoothing_window = 5;
        let mut engine = ExerciseEngine::new(config).unwrap();

        for i in 0..5 {
            engine.process(&arm_frame(170.0, 170.0, i, i as f64 * 100.0));
        }
        // one spiked frame at 90 deg: window mean stays above the
        // down trigger
        let out = engine.process(&arm_frame(90.0, 90.0, 5, 500.0));
        assert_eq!(out.phase, "up");
    }
}
