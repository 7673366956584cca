use crate::input::InputSnapshot;
use crate::state::{AppState, AutoMode};
use log::debug;

/// Proportional field of view change per unit of input
pub const ANGLE_SPEED: f32 = 0.05;
/// Proportional aspect change per unit of input
pub const ASPECT_SPEED: f32 = 0.01;
/// Proportional far clip change per unit of input
pub const CLIP_SPEED: f32 = 0.05;

/// Smallest field of view kept after clamping
pub const MIN_ANGLE: f32 = 0.0001;
/// Largest field of view kept after clamping
pub const MAX_ANGLE: f32 = 179.9999;
/// Smallest aspect kept after clamping
pub const MIN_ASPECT: f32 = 0.0001;
/// Minimum gap between the near and far clipping distances
pub const CLIP_EPSILON: f32 = 0.0001;

/// What the frame loop should do after an update
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Continue,
    Exit,
}

/// Advances the state by one frame.
///
/// Blocks run in a fixed order every frame: exit check, mouse mode cycle,
/// angle, aspect, far limit. An auto-driven parameter ignores manual input
/// for that frame while the other two stay under manual control.
pub fn update(state: &mut AppState, input: &InputSnapshot, total_seconds: f64) -> Control {
    let control = if input.back_requested() {
        Control::Exit
    } else {
        Control::Continue
    };

    // Cycle auto mode on the left button's press edge
    let left_pressed = input.mouse.left_button;
    if !state.mouse_pressed && left_pressed {
        state.auto_mode = state.auto_mode.next();
        debug!("auto mode -> {}", state.auto_mode);
    }
    state.mouse_pressed = left_pressed;

    let wave = sine_wave(total_seconds);
    let keys = &input.keyboard;
    let pad = &input.gamepad;

    // Field of view
    state.angle += pad.left_stick_y * state.angle * ANGLE_SPEED;
    if keys.down {
        state.angle -= state.angle * ANGLE_SPEED;
    }
    if keys.up {
        state.angle += state.angle * ANGLE_SPEED;
    }
    if state.auto_mode == AutoMode::Angle {
        state.angle = wave * 90.0;
    }
    if state.angle <= 0.0 {
        state.angle = MIN_ANGLE;
    } else if state.angle >= 180.0 {
        state.angle = MAX_ANGLE;
    }

    // Aspect ratio
    state.aspect -= pad.left_trigger * state.aspect * ASPECT_SPEED;
    state.aspect += pad.right_trigger * state.aspect * ASPECT_SPEED;
    if keys.left {
        state.aspect -= state.aspect * ASPECT_SPEED;
    }
    if keys.right {
        state.aspect += state.aspect * ASPECT_SPEED;
    }
    if state.auto_mode == AutoMode::Aspect {
        state.aspect = wave * 2.0;
    }
    // `max` also replaces NaN
    state.aspect = state.aspect.max(MIN_ASPECT);

    // Far clipping distance
    state.far_limit += pad.right_stick_y * state.far_limit * CLIP_SPEED;
    if keys.z {
        state.far_limit -= state.far_limit * CLIP_SPEED;
    }
    if keys.a {
        state.far_limit += state.far_limit * CLIP_SPEED;
    }
    if state.auto_mode == AutoMode::FarLimit {
        state.far_limit = wave * 8.0;
    }
    if state.far_limit <= state.near_limit {
        state.far_limit = state.near_limit + CLIP_EPSILON;
    }

    control
}

/// `sin(t) + 1`, in `0.0..=2.0`
fn sine_wave(total_seconds: f64) -> f32 {
    (total_seconds.sin() + 1.0) as f32
}
