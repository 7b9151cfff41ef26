//! Wave Invaders - arena-backed arcade simulation core
//!
//! Core modules:
//! - `sim`: Entity simulation (arenas, bullets, enemy wave, collision)
//! - `renderer`: Per-frame draw list and triangle tessellation
//! - `platform`: Keyboard to input snapshot mapping
//! - `config`: Data-driven tuning loaded from JSON

pub mod config;
pub mod error;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::SimConfig;
pub use error::{ArenaError, SimError};

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Play-field extent (logical units)
    pub const FIELD_WIDTH: f32 = 640.0;
    pub const FIELD_HEIGHT: f32 = 320.0;

    /// Long-lived region: player, bullet pools
    pub const LONG_LIVED_BYTES: usize = 64 * 1024 * 1024;
    /// Per-level region: enemy wave and its enemies
    pub const PER_LEVEL_BYTES: usize = 128 * 1024 * 1024;

    /// Player ship
    pub const PLAYER_BASE_LEN: f32 = 20.0;
    pub const PLAYER_SPEED: f32 = 200.0;
    pub const PLAYER_SCALE: f32 = 25.0;
    pub const PLAYER_SHAPE_POINTS: usize = 8;
    /// Half of the apex angle of the ship triangle (degrees)
    pub const PLAYER_HALF_ANGLE_DEG: f32 = 20.0;

    /// Bullet pool
    pub const PLAYER_BULLETS: usize = 50;
    pub const BULLET_VELOCITY: Vec2 = Vec2::new(0.0, -500.0);
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 10.0;

    /// Enemy wave
    pub const ENEMY_COUNT: usize = 5;
    pub const MAX_ENEMIES: usize = 256;
    pub const MAX_SHAPE_POINTS: usize = 14;
    pub const WAVE_ORIGIN: Vec2 = Vec2::new(100.0, 50.0);
    pub const ENEMY_SPACING: f32 = 50.0;
    pub const ENEMY_COLLIDER_SIZE: f32 = 50.0;
    pub const ALIEN_SCALE: f32 = 22.0;
    pub const BOSS_SCALE: f32 = 50.0;

    /// Seconds the wave rests between traversals
    pub const WAVE_IDLE_SECS: f32 = 5.0;
    /// Seconds one eased traversal takes
    pub const WAVE_TRAVERSE_SECS: f32 = 1.0;
    /// Target offsets are sampled from [-range, range)
    pub const WAVE_OFFSET_RANGE: f32 = 100.0;

    /// Collider debug outline thickness
    pub const COLLIDER_OUTLINE: f32 = 2.0;
}

/// Vertical clearance of a ship triangle with the given base and half apex angle
#[inline]
pub fn ship_clearance(base_len: f32, half_angle_deg: f32) -> f32 {
    (base_len / 2.0) / half_angle_deg.to_radians().tan()
}
