//! Fitness Web - Exercise Form Analysis Engine
//!
//! Entry point for the WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen glue that delegates to submodules
//!
//! MediaPipe Pose runs in the browser; JavaScript pushes one landmark
//! frame per video frame through the bridge, and the analysis core
//! (pure Rust, natively testable) tracks phases, counts reps and
//! scores form.

pub mod analysis;
mod bridge;
pub mod exercises;
pub mod pose;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    current_angle, current_phase, end_session, is_session_active, last_frame_degraded,
    last_rep_json, live_deductions_json, live_form_score, push_empty_frame, push_landmark_frame,
    rep_count, start_builtin_session, start_session,
};

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}
