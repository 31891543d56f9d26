//! Session lifecycle and analysis outputs for JavaScript
//!
//! Owns the engine for the active workout. JS starts a session with a
//! config, frames flow in through the landmark bridge, and the UI
//! polls the getters here after each frame for phase, rep count and
//! live form feedback.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::analysis::{ExerciseEngine, FrameOutput};
use crate::exercises::{builtin, ExerciseConfig};
use crate::pose::LandmarkFrame;

struct SessionState {
    engine: ExerciseEngine,
    last_output: Option<FrameOutput>,
}

thread_local! {
    static SESSION: RefCell<Option<SessionState>> = RefCell::new(None);
}

fn install(config: ExerciseConfig) -> Result<(), JsValue> {
    let name = config.name.clone();
    let engine = ExerciseEngine::new(config).map_err(|e| JsValue::from_str(&e.to_string()))?;

    super::landmarks::reset_frames();
    SESSION.with(|session_cell| {
        *session_cell.borrow_mut() = Some(SessionState {
            engine,
            last_output: None,
        });
    });

    web_sys::console::log_1(&format!("Session started: {name}").into());
    Ok(())
}

/// Start a workout from a catalog JSON config. Rejects malformed
/// configs up front - a bad config never reaches frame processing.
#[wasm_bindgen]
pub fn start_session(config_json: &str) -> Result<(), JsValue> {
    let config =
        ExerciseConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    install(config)
}

/// Start a workout from a built-in variant name ("push_ups",
/// "squats", ...)
#[wasm_bindgen]
pub fn start_builtin_session(name: &str) -> Result<(), JsValue> {
    let config = builtin(name).map_err(|e| JsValue::from_str(&e.to_string()))?;
    install(config)
}

#[wasm_bindgen]
pub fn is_session_active() -> bool {
    SESSION.with(|session_cell| session_cell.borrow().is_some())
}

/// Feed one frame through the engine (called from the landmark
/// bridge). Frames pushed with no active session are ignored.
pub(crate) fn process_frame(frame: &LandmarkFrame) {
    SESSION.with(|session_cell| {
        if let Some(session) = session_cell.borrow_mut().as_mut() {
            let output = session.engine.process(frame);
            session.last_output = Some(output);
        }
    });
}

/// Total validated repetitions so far
#[wasm_bindgen]
pub fn rep_count() -> u32 {
    SESSION.with(|session_cell| {
        session_cell
            .borrow()
            .as_ref()
            .map(|s| s.engine.rep_count())
            .unwrap_or(0)
    })
}

/// Active phase name, "unknown" during startup/occlusion
#[wasm_bindgen]
pub fn current_phase() -> String {
    SESSION.with(|session_cell| {
        session_cell
            .borrow()
            .as_ref()
            .map(|s| s.engine.phase_name().to_owned())
            .unwrap_or_else(|| "unknown".to_owned())
    })
}

/// Live form score for the last processed frame
#[wasm_bindgen]
pub fn live_form_score() -> f32 {
    SESSION.with(|session_cell| {
        session_cell
            .borrow()
            .as_ref()
            .and_then(|s| s.last_output.as_ref())
            .map(|o| o.live_score)
            .unwrap_or(100.0)
    })
}

/// Deduction list for the last processed frame as a JSON array of
/// {reason, amount}
#[wasm_bindgen]
pub fn live_deductions_json() -> String {
    SESSION.with(|session_cell| {
        let deductions = session_cell
            .borrow()
            .as_ref()
            .and_then(|s| s.last_output.as_ref())
            .map(|o| o.deductions.clone())
            .unwrap_or_default();
        serde_json::to_string(&deductions).unwrap_or_else(|_| "[]".to_owned())
    })
}

/// Was the last processed frame degraded?
#[wasm_bindgen]
pub fn last_frame_degraded() -> bool {
    SESSION.with(|session_cell| {
        session_cell
            .borrow()
            .as_ref()
            .and_then(|s| s.last_output.as_ref())
            .map(|o| o.status.is_degraded())
            .unwrap_or(false)
    })
}

/// Smoothed driving angle of the last processed frame, NaN when it
/// was undefined (NaN crosses the JS boundary cleanly)
#[wasm_bindgen]
pub fn current_angle() -> f32 {
    SESSION.with(|session_cell| {
        session_cell
            .borrow()
            .as_ref()
            .and_then(|s| s.last_output.as_ref())
            .and_then(|o| o.angle)
            .unwrap_or(f32::NAN)
    })
}

/// Most recently completed repetition as JSON ({rep_index, score,
/// timestamp_ms, deductions}), or "null" before the first rep
#[wasm_bindgen]
pub fn last_rep_json() -> String {
    SESSION.with(|session_cell| {
        let json = session_cell
            .borrow()
            .as_ref()
            .and_then(|s| s.engine.last_rep().map(serde_json::to_string));
        match json {
            Some(Ok(json)) => json,
            _ => "null".to_owned(),
        }
    })
}

/// End the workout and return the session summary as JSON. The
/// session is consumed; further frames are ignored until a new one
/// starts.
#[wasm_bindgen]
pub fn end_session() -> Result<String, JsValue> {
    let state = SESSION.with(|session_cell| session_cell.borrow_mut().take());
    let Some(state) = state else {
        return Err(JsValue::from_str("no active session"));
    };

    let summary = state.engine.finish();
    web_sys::console::log_1(
        &format!(
            "Session ended: {} reps, average form {:.1}",
            summary.total_reps, summary.average_form_score
        )
        .into(),
    );

    serde_json::to_string(&summary).map_err(|e| JsValue::from_str(&e.to_string()))
}
