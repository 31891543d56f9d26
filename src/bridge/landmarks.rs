//! Landmark frame ingestion from JavaScript
//!
//! Receives MediaPipe Pose results from JS one video frame at a time
//! and forwards each frame into the active session. Frames are pushed
//! in order; the frame index is assigned here and only ever grows.

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::pose::{Landmark, LandmarkFrame, LANDMARK_COUNT, VALUES_PER_LANDMARK};

/// Expected length of the flat JS array: 33 landmarks x (x, y, z,
/// visibility)
pub const FRAME_VALUES: usize = LANDMARK_COUNT * VALUES_PER_LANDMARK;

// Thread-local frame counter (WASM is single-threaded)
thread_local! {
    static NEXT_INDEX: RefCell<u64> = RefCell::new(0);
}

fn take_next_index() -> u64 {
    NEXT_INDEX.with(|index_cell| {
        let mut index = index_cell.borrow_mut();
        let current = *index;
        *index += 1;
        current
    })
}

/// Called from JavaScript with a flat Float32Array of 132 values
/// (33 landmarks x x, y, z, visibility) and the capture timestamp
/// from performance.now().
#[wasm_bindgen]
pub fn push_landmark_frame(timestamp_ms: f64, data: &[f32]) {
    if data.len() != FRAME_VALUES {
        web_sys::console::warn_1(
            &format!(
                "Invalid landmark data length: {} (expected {})",
                data.len(),
                FRAME_VALUES
            )
            .into(),
        );
        return;
    }

    let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
    for (i, lm) in landmarks.iter_mut().enumerate() {
        let base = i * VALUES_PER_LANDMARK;
        *lm = Landmark {
            x: data[base],
            y: data[base + 1],
            z: data[base + 2],
            visibility: data[base + 3],
        };
    }

    let frame = LandmarkFrame::new(landmarks, take_next_index(), timestamp_ms);
    super::session::process_frame(&frame);
}

/// Called from JavaScript when the pose model reported no detection
/// for this video frame. The frame still advances the stream - a
/// detection gap must flow through the pipeline, not vanish from it.
#[wasm_bindgen]
pub fn push_empty_frame(timestamp_ms: f64) {
    let frame = LandmarkFrame::empty(take_next_index(), timestamp_ms);
    super::session::process_frame(&frame);
}

/// Restart the frame index stream (new workout, new video)
pub(crate) fn reset_frames() {
    NEXT_INDEX.with(|index_cell| {
        *index_cell.borrow_mut() = 0;
    });
}
