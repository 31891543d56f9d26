//! Exercise variant configuration
//!
//! One config fully describes an exercise variant: the phase cycle
//! with its trigger thresholds, the angle signal that drives it, and
//! the form rules the scorer applies. Configs arrive as JSON from the
//! exercise catalog, are validated once at session start, and stay
//! immutable for the session's lifetime.

use serde::Deserialize;
use thiserror::Error;

use crate::analysis::angles::Axis;
use crate::analysis::features::SignalKind;
use crate::pose::Joint;

/// Errors detected at config-load time. The only fatal failures in
/// the engine - nothing per-frame ever raises one.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Malformed JSON from the catalog side.
    #[error("malformed config json: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A phase cycle needs at least two phases to produce repetitions.
    #[error("phase cycle needs at least two phases, got {0}")]
    TooFewPhases(usize),

    /// Adjacent triggers inside the hysteresis deadband.
    #[error("triggers for '{a}' ({a_deg} deg) and '{b}' ({b_deg} deg) are closer than {min_separation} deg")]
    TriggersTooClose {
        a: String,
        a_deg: f32,
        b: String,
        b_deg: f32,
        min_separation: f32,
    },

    /// A form rule names a phase the cycle does not declare.
    #[error("form rule references undeclared phase '{0}'")]
    UnknownPhase(String),

    /// Requested a variant the built-in library does not define.
    #[error("unknown exercise '{0}'")]
    UnknownExercise(String),

    /// Out-of-range numeric parameter.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

impl ConfigError {
    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        Self::InvalidParameter(reason.into())
    }
}

/// Result type for config loading and validation
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Side of a threshold the driving angle must reach to enter a phase
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerDirection {
    Above,
    Below,
}

/// One phase of the movement cycle and the trigger that enters it
#[derive(Clone, Debug, Deserialize)]
pub struct PhaseSpec {
    pub name: String,
    /// Angle threshold in degrees that enters this phase
    pub trigger_deg: f32,
    pub direction: TriggerDirection,
}

impl PhaseSpec {
    /// Does this angle enter the phase?
    pub fn triggered_by(&self, angle: f32) -> bool {
        match self.direction {
            TriggerDirection::Above => angle >= self.trigger_deg,
            TriggerDirection::Below => angle <= self.trigger_deg,
        }
    }
}

/// How per-frame scores reduce to one score per repetition
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScoreReduction {
    /// The rep is only as good as its worst moment
    #[default]
    Min,
    Mean,
}

/// Ideal angle range for one phase; out-of-range degrees deduct
/// proportionally, capped
#[derive(Clone, Debug, Deserialize)]
pub struct RangeRule {
    pub phase: String,
    pub signal: SignalKind,
    pub min_deg: f32,
    pub max_deg: f32,
    pub per_degree: f32,
    pub cap: f32,
    pub label: String,
}

/// Left/right angle difference beyond tolerance; fixed deduction,
/// at most once per frame
#[derive(Clone, Debug, Deserialize)]
pub struct AsymmetryRule {
    pub signal: SignalKind,
    pub tolerance_deg: f32,
    pub penalty: f32,
    pub label: String,
}

/// Signed axis offset between two joints outside [min, max]; fixed
/// deduction (wrist under shoulder, knee cave-in, elbow drift)
#[derive(Clone, Debug, Deserialize)]
pub struct AlignmentRule {
    pub first: Joint,
    pub second: Joint,
    pub axis: Axis,
    pub min_offset: f32,
    pub max_offset: f32,
    pub penalty: f32,
    pub label: String,
}

/// Deduction tables applied by the form scorer
#[derive(Clone, Debug, Deserialize, Default)]
pub struct FormRules {
    #[serde(default)]
    pub range_rules: Vec<RangeRule>,
    #[serde(default)]
    pub asymmetry: Option<AsymmetryRule>,
    #[serde(default)]
    pub alignment_rules: Vec<AlignmentRule>,
}

fn default_min_visibility() -> f32 {
    crate::analysis::visibility::DEFAULT_MIN_VISIBILITY
}

fn default_smoothing_window() -> usize {
    5
}

fn default_max_degraded_frames() -> u32 {
    5
}

fn default_min_rep_interval_ms() -> f64 {
    300.0
}

fn default_min_trigger_separation() -> f32 {
    10.0
}

/// Full configuration for one exercise variant
#[derive(Clone, Debug, Deserialize)]
pub struct ExerciseConfig {
    pub name: String,
    #[serde(default)]
    pub display_name: String,

    /// Angle signal that drives phase transitions
    pub signal: SignalKind,

    /// Phase cycle in movement order; the first phase is the start of
    /// every repetition
    pub phases: Vec<PhaseSpec>,

    /// Minimum per-joint visibility for a usable frame
    #[serde(default = "default_min_visibility")]
    pub min_visibility: f32,

    /// Moving-average window over the driving angle (1 disables)
    #[serde(default = "default_smoothing_window")]
    pub smoothing_window: usize,

    /// Consecutive degraded frames before phase state falls to unknown
    #[serde(default = "default_max_degraded_frames")]
    pub max_degraded_frames: u32,

    /// Minimum wall time between counted repetitions
    #[serde(default = "default_min_rep_interval_ms")]
    pub min_rep_interval_ms: f64,

    /// Smallest allowed gap between adjacent phase triggers
    #[serde(default = "default_min_trigger_separation")]
    pub min_trigger_separation: f32,

    #[serde(default)]
    pub rep_score_reduction: ScoreReduction,

    #[serde(default)]
    pub form: FormRules,
}

impl ExerciseConfig {
    /// Parse a catalog JSON config. Does not validate; call
    /// [`ExerciseConfig::validate`] before building an engine.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Fail-fast validation run once at session start.
    pub fn validate(&self) -> Result<()> {
        if self.phases.len() < 2 {
            return Err(ConfigError::TooFewPhases(self.phases.len()));
        }

        // Hysteresis: every pair of adjacent triggers (including the
        // cycle wrap) must be separated by the configured deadband.
        for i in 0..self.phases.len() {
            let a = &self.phases[i];
            let b = &self.phases[(i + 1) % self.phases.len()];
            if (a.trigger_deg - b.trigger_deg).abs() < self.min_trigger_separation {
                return Err(ConfigError::TriggersTooClose {
                    a: a.name.clone(),
                    a_deg: a.trigger_deg,
                    b: b.name.clone(),
                    b_deg: b.trigger_deg,
                    min_separation: self.min_trigger_separation,
                });
            }
        }

        if !(0.0..=1.0).contains(&self.min_visibility) {
            return Err(ConfigError::invalid_parameter(format!(
                "min_visibility {} outside [0, 1]",
                self.min_visibility
            )));
        }
        if self.smoothing_window > 30 {
            return Err(ConfigError::invalid_parameter(format!(
                "smoothing_window {} exceeds 30 frames",
                self.smoothing_window
            )));
        }
        if self.min_rep_interval_ms < 0.0 {
            return Err(ConfigError::invalid_parameter(
                "min_rep_interval_ms must be non-negative",
            ));
        }
        for phase in &self.phases {
            if !(0.0..=180.0).contains(&phase.trigger_deg) {
                return Err(ConfigError::invalid_parameter(format!(
                    "trigger for phase '{}' outside [0, 180]",
                    phase.name
                )));
            }
        }

        for rule in &self.form.range_rules {
            if !self.phases.iter().any(|p| p.name == rule.phase) {
                return Err(ConfigError::UnknownPhase(rule.phase.clone()));
            }
            if rule.min_deg > rule.max_deg {
                return Err(ConfigError::invalid_parameter(format!(
                    "range rule '{}' has min above max",
                    rule.label
                )));
            }
            if rule.per_degree < 0.0 || rule.cap < 0.0 {
                return Err(ConfigError::invalid_parameter(format!(
                    "range rule '{}' has negative weights",
                    rule.label
                )));
            }
        }
        if let Some(rule) = &self.form.asymmetry {
            if rule.tolerance_deg < 0.0 || rule.penalty < 0.0 {
                return Err(ConfigError::invalid_parameter(
                    "asymmetry rule has negative tolerance or penalty",
                ));
            }
        }
        for rule in &self.form.alignment_rules {
            if rule.min_offset > rule.max_offset {
                return Err(ConfigError::invalid_parameter(format!(
                    "alignment rule '{}' has min_offset above max_offset",
                    rule.label
                )));
            }
            if rule.penalty < 0.0 {
                return Err(ConfigError::invalid_parameter(format!(
                    "alignment rule '{}' has negative penalty",
                    rule.label
                )));
            }
        }

        Ok(())
    }

    /// Every joint the visibility gate must see for this variant
    pub fn required_joints(&self) -> Vec<Joint> {
        let mut joints: Vec<Joint> = self.signal.required_joints().to_vec();

        let mut add = |joint: Joint| {
            if !joints.contains(&joint) {
                joints.push(joint);
            }
        };

        for rule in &self.form.range_rules {
            for &joint in rule.signal.required_joints() {
                add(joint);
            }
        }
        if let Some(rule) = &self.form.asymmetry {
            for &joint in rule.signal.required_joints() {
                add(joint);
            }
        }
        for rule in &self.form.alignment_rules {
            add(rule.first);
            add(rule.second);
        }

        joints
    }

    /// Phase name by cycle index
    pub fn phase_name(&self, index: usize) -> &str {
        &self.phases[index].name
    }
}
