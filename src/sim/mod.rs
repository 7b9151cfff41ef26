//! Simulation module
//!
//! Entity state and per-frame logic. Nothing here draws or reads devices:
//! - Entity records live in arena regions, not individual heap allocations
//! - Wave randomness comes from the seeded RNG in the state
//! - Entities are visited in slot order every frame

pub mod arena;
pub mod bullets;
pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;
pub mod wave;

pub use arena::{Arena, Memory, Slot};
pub use bullets::{displayed, reconcile_display, spawn_bullet, step_bullets};
pub use collision::{bullet_hits_enemy, enemies_hit_by, overlaps};
pub use rect::Rect;
pub use state::{Bullet, Enemy, EnemyWave, Flag, Mode, Player, SimulationState, WavePhase};
pub use tick::{InputSnapshot, apply_input, tick};
pub use wave::{EnemyKind, build_enemy, build_wave, ease_in_out, step_wave};
