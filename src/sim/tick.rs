//! Per-frame simulation step
//!
//! Order within a frame is fixed: input, bullet physics, display
//! reconciliation, wave motion. The renderer reads the state afterwards.

use super::bullets::{reconcile_display, spawn_bullet, step_bullets};
use super::state::{Mode, SimulationState};
use super::wave::{refresh_colliders, step_wave};

/// Logical input for a single frame
///
/// Each direction is already the OR of its two physical keys; `fire` and
/// `pause` are edges (pressed this frame), not held state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    pub pause: bool,
}

/// Move the player, refresh its collider, and fire on the fire edge
///
/// Each asserted direction applies `speed * dt` on its axis when the ship is
/// still inside the field on that side. Opposite directions both apply and
/// cancel; diagonals are not normalized.
pub fn apply_input(state: &mut SimulationState, input: &InputSnapshot, dt: f32) {
    let field = state.config.field;
    let player = state.player_mut();
    let step = player.speed * dt;
    let half_width = player.base_len / 2.0;

    if input.right && player.position.x <= field.width - half_width {
        player.position.x += step;
    }
    if input.left && player.position.x >= half_width {
        player.position.x -= step;
    }
    if input.up && player.position.y >= player.clearance {
        player.position.y -= step;
    }
    if input.down && player.position.y <= field.height - player.clearance {
        player.position.y += step;
    }
    player.refresh_collider();

    if input.fire {
        spawn_bullet(state);
    }
}

/// Advance the simulation by one frame
pub fn tick(state: &mut SimulationState, input: &InputSnapshot, dt: f32) {
    if input.pause {
        match state.mode {
            Mode::InPlay => {
                state.mode = Mode::Paused;
                log::info!("Paused");
                return;
            }
            Mode::Paused => {
                state.mode = Mode::InPlay;
                log::info!("Resumed");
            }
            Mode::Menu => {}
        }
    }

    if state.mode != Mode::InPlay {
        return;
    }

    let dt = dt.max(0.0);
    apply_input(state, input, dt);
    step_bullets(state, dt);
    reconcile_display(state);

    let width = state.config.field.width;
    let tuning = state.config.wave;
    let (wave, enemies, rng) = state.wave_parts_mut();
    step_wave(wave, enemies, rng, width, &tuning, dt);
    refresh_colliders(wave, enemies);
}
