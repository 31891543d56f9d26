//! Built-in exercise variants
//!
//! The same catalog the JS side can ship as JSON, available directly
//! by name. Thresholds follow the original trainer tuning; every
//! variant keeps a wide gap between its triggers so angle jitter
//! cannot flip phases.

use super::config::{
    AlignmentRule, AsymmetryRule, ConfigError, ExerciseConfig, FormRules, PhaseSpec, RangeRule,
    Result, ScoreReduction, TriggerDirection,
};
use crate::analysis::angles::Axis;
use crate::analysis::features::SignalKind;
use crate::pose::Joint;

/// Names of every built-in variant
pub const BUILTIN_NAMES: [&str; 6] = [
    "push_ups",
    "squats",
    "lunges",
    "pull_ups",
    "bicep_curls",
    "shoulder_press",
];

/// Look up a built-in variant by name
pub fn builtin(name: &str) -> Result<ExerciseConfig> {
    match name {
        "push_ups" => Ok(push_ups()),
        "squats" => Ok(squats()),
        "lunges" => Ok(lunges()),
        "pull_ups" => Ok(pull_ups()),
        "bicep_curls" => Ok(bicep_curls()),
        "shoulder_press" => Ok(shoulder_press()),
        other => Err(ConfigError::UnknownExercise(other.to_owned())),
    }
}

fn base(name: &str, display_name: &str, signal: SignalKind, phases: Vec<PhaseSpec>) -> ExerciseConfig {
    ExerciseConfig {
        name: name.into(),
        display_name: display_name.into(),
        signal,
        phases,
        min_visibility: 0.5,
        smoothing_window: 5,
        max_degraded_frames: 5,
        min_rep_interval_ms: 300.0,
        min_trigger_separation: 10.0,
        rep_score_reduction: ScoreReduction::Min,
        form: FormRules::default(),
    }
}

fn phase(name: &str, trigger_deg: f32, direction: TriggerDirection) -> PhaseSpec {
    PhaseSpec {
        name: name.into(),
        trigger_deg,
        direction,
    }
}

pub fn push_ups() -> ExerciseConfig {
    let mut config = base(
        "push_ups",
        "Push-ups",
        SignalKind::Arm,
        vec![
            phase("up", 160.0, TriggerDirection::Above),
            phase("down", 70.0, TriggerDirection::Below),
        ],
    );
    config.form = FormRules {
        range_rules: vec![
            RangeRule {
                phase: "down".into(),
                signal: SignalKind::Arm,
                min_deg: 60.0,
                max_deg: 120.0,
                per_degree: 1.0,
                cap: 20.0,
                label: "Go lower - chest to ground".into(),
            },
            RangeRule {
                phase: "down".into(),
                signal: SignalKind::Trunk,
                min_deg: 160.0,
                max_deg: 180.0,
                per_degree: 0.75,
                cap: 15.0,
                label: "Keep your back straight".into(),
            },
            RangeRule {
                phase: "up".into(),
                signal: SignalKind::Trunk,
                min_deg: 160.0,
                max_deg: 180.0,
                per_degree: 0.75,
                cap: 15.0,
                label: "Keep your back straight".into(),
            },
        ],
        asymmetry: Some(AsymmetryRule {
            signal: SignalKind::Arm,
            tolerance_deg: 15.0,
            penalty: 10.0,
            label: "Keep arms symmetric".into(),
        }),
        alignment_rules: vec![
            AlignmentRule {
                first: Joint::LeftWrist,
                second: Joint::LeftShoulder,
                axis: Axis::X,
                min_offset: -0.1,
                max_offset: 0.1,
                penalty: 10.0,
                label: "Keep wrists under shoulders".into(),
            },
            AlignmentRule {
                first: Joint::RightWrist,
                second: Joint::RightShoulder,
                axis: Axis::X,
                min_offset: -0.1,
                max_offset: 0.1,
                penalty: 10.0,
                label: "Keep wrists under shoulders".into(),
            },
        ],
    };
    config
}

pub fn squats() -> ExerciseConfig {
    let mut config = base(
        "squats",
        "Squats",
        SignalKind::Leg,
        vec![
            phase("up", 160.0, TriggerDirection::Above),
            phase("down", 70.0, TriggerDirection::Below),
        ],
    );
    config.form = FormRules {
        range_rules: vec![RangeRule {
            phase: "down".into(),
            signal: SignalKind::Leg,
            min_deg: 60.0,
            max_deg: 120.0,
            per_degree: 1.0,
            cap: 20.0,
            label: "Squat deeper - thighs parallel to ground".into(),
        }],
        asymmetry: Some(AsymmetryRule {
            signal: SignalKind::Leg,
            tolerance_deg: 20.0,
            penalty: 10.0,
            label: "Balance both legs evenly".into(),
        }),
        alignment_rules: vec![
            AlignmentRule {
                first: Joint::LeftHip,
                second: Joint::LeftKnee,
                axis: Axis::X,
                min_offset: -0.1,
                max_offset: 0.1,
                penalty: 15.0,
                label: "Keep knees tracking over toes".into(),
            },
            AlignmentRule {
                first: Joint::RightHip,
                second: Joint::RightKnee,
                axis: Axis::X,
                min_offset: -0.1,
                max_offset: 0.1,
                penalty: 15.0,
                label: "Keep knees tracking over toes".into(),
            },
        ],
    };
    config
}

pub fn lunges() -> ExerciseConfig {
    let mut config = base(
        "lunges",
        "Lunges",
        SignalKind::Leg,
        vec![
            phase("up", 160.0, TriggerDirection::Above),
            phase("down", 80.0, TriggerDirection::Below),
        ],
    );
    config.form = FormRules {
        range_rules: vec![RangeRule {
            phase: "down".into(),
            signal: SignalKind::Leg,
            min_deg: 70.0,
            max_deg: 110.0,
            per_degree: 1.0,
            cap: 20.0,
            label: "Lower until the front thigh is parallel".into(),
        }],
        asymmetry: None,
        alignment_rules: vec![AlignmentRule {
            first: Joint::LeftKnee,
            second: Joint::LeftAnkle,
            axis: Axis::X,
            min_offset: -0.12,
            max_offset: 0.12,
            penalty: 15.0,
            label: "Keep the front knee over the ankle".into(),
        }],
    };
    config
}

pub fn pull_ups() -> ExerciseConfig {
    let mut config = base(
        "pull_ups",
        "Pull-ups",
        SignalKind::Arm,
        vec![
            phase("down", 160.0, TriggerDirection::Above),
            phase("up", 40.0, TriggerDirection::Below),
        ],
    );
    config.form = FormRules {
        range_rules: vec![
            RangeRule {
                phase: "down".into(),
                signal: SignalKind::Arm,
                min_deg: 150.0,
                max_deg: 180.0,
                per_degree: 0.5,
                cap: 10.0,
                label: "Full arm extension at the bottom".into(),
            },
            RangeRule {
                phase: "up".into(),
                signal: SignalKind::Arm,
                min_deg: 0.0,
                max_deg: 50.0,
                per_degree: 0.5,
                cap: 15.0,
                label: "Pull your chin over the bar".into(),
            },
        ],
        asymmetry: Some(AsymmetryRule {
            signal: SignalKind::Arm,
            tolerance_deg: 20.0,
            penalty: 15.0,
            label: "Pull evenly with both arms".into(),
        }),
        alignment_rules: Vec::new(),
    };
    config
}

pub fn bicep_curls() -> ExerciseConfig {
    let mut config = base(
        "bicep_curls",
        "Bicep Curls",
        SignalKind::Arm,
        vec![
            phase("down", 160.0, TriggerDirection::Above),
            phase("up", 30.0, TriggerDirection::Below),
        ],
    );
    config.form = FormRules {
        range_rules: Vec::new(),
        asymmetry: Some(AsymmetryRule {
            signal: SignalKind::Arm,
            tolerance_deg: 25.0,
            penalty: 20.0,
            label: "Curl both arms together".into(),
        }),
        alignment_rules: vec![
            AlignmentRule {
                first: Joint::LeftElbow,
                second: Joint::LeftShoulder,
                axis: Axis::X,
                min_offset: -0.15,
                max_offset: 0.15,
                penalty: 15.0,
                label: "Keep elbows close to your body".into(),
            },
            AlignmentRule {
                first: Joint::RightElbow,
                second: Joint::RightShoulder,
                axis: Axis::X,
                min_offset: -0.15,
                max_offset: 0.15,
                penalty: 15.0,
                label: "Keep elbows close to your body".into(),
            },
        ],
    };
    config
}

pub fn shoulder_press() -> ExerciseConfig {
    let mut config = base(
        "shoulder_press",
        "Shoulder Press",
        SignalKind::Arm,
        vec![
            phase("down", 60.0, TriggerDirection::Below),
            phase("up", 165.0, TriggerDirection::Above),
        ],
    );
    config.form = FormRules {
        range_rules: vec![RangeRule {
            phase: "up".into(),
            signal: SignalKind::Arm,
            min_deg: 160.0,
            max_deg: 180.0,
            per_degree: 0.5,
            cap: 10.0,
            label: "Press to full lockout".into(),
        }],
        asymmetry: Some(AsymmetryRule {
            signal: SignalKind::Arm,
            tolerance_deg: 15.0,
            penalty: 10.0,
            label: "Press both arms together".into(),
        }),
        alignment_rules: Vec::new(),
    };
    config
}
