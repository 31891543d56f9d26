//! Bridge module - JS <-> Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod landmarks;
mod session;

pub use landmarks::{push_empty_frame, push_landmark_frame, FRAME_VALUES};

pub use session::{
    current_angle, current_phase, end_session, is_session_active, last_frame_degraded,
    last_rep_json, live_deductions_json, live_form_score, rep_count, start_builtin_session,
    start_session,
};
