//! Exercise variant configuration and the built-in catalog
//!
//! Re-exports only. All logic in submodules.

pub mod config;
pub mod library;

pub use config::{ConfigError, ExerciseConfig, FormRules, PhaseSpec, TriggerDirection};
pub use library::{builtin, BUILTIN_NAMES};
