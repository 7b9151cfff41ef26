//! Simulation tuning
//!
//! Loaded once at startup from JSON. Every field has a default, so a config
//! file only needs to name what it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::SimError;

/// Play-field extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

/// Player ship tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Movement speed (units per second, per axis)
    pub speed: f32,
    /// Ship base length
    pub base_len: f32,
    /// Render scale applied to the shape template
    pub scale: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: PLAYER_SPEED,
            base_len: PLAYER_BASE_LEN,
            scale: PLAYER_SCALE,
        }
    }
}

/// Bullet pool tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    /// Pool capacity (live and display arrays each hold this many)
    pub capacity: usize,
    /// Upward speed (positive number, applied as -y)
    pub speed: f32,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            capacity: PLAYER_BULLETS,
            speed: -BULLET_VELOCITY.y,
        }
    }
}

/// Enemy wave tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Enemies in the wave
    pub enemy_count: usize,
    /// Enemy kind tag (0 = alien, 1 = boss)
    pub kind: u32,
    /// Seconds between traversals
    pub idle_secs: f32,
    /// Seconds per traversal
    pub traverse_secs: f32,
    /// Symmetric range for sampled target offsets
    pub offset_range: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            enemy_count: ENEMY_COUNT,
            kind: 0,
            idle_secs: WAVE_IDLE_SECS,
            traverse_secs: WAVE_TRAVERSE_SECS,
            offset_range: WAVE_OFFSET_RANGE,
        }
    }
}

/// Backing region sizes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    pub long_lived_bytes: usize,
    pub per_level_bytes: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            long_lived_bytes: LONG_LIVED_BYTES,
            per_level_bytes: PER_LEVEL_BYTES,
        }
    }
}

/// Complete simulation configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub field: FieldConfig,
    pub player: PlayerConfig,
    pub bullets: BulletConfig,
    pub wave: WaveConfig,
    pub memory: MemoryConfig,
    /// Seed for wave traversal targets
    pub seed: u64,
    /// Emit collider outlines alongside shapes
    pub show_colliders: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            player: PlayerConfig::default(),
            bullets: BulletConfig::default(),
            wave: WaveConfig::default(),
            memory: MemoryConfig::default(),
            seed: 0x5EED,
            show_colliders: true,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SimError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SimError> {
        let floats = [
            ("field.width", self.field.width),
            ("field.height", self.field.height),
            ("player.speed", self.player.speed),
            ("player.base_len", self.player.base_len),
            ("player.scale", self.player.scale),
            ("bullets.speed", self.bullets.speed),
            ("wave.idle_secs", self.wave.idle_secs),
            ("wave.traverse_secs", self.wave.traverse_secs),
            ("wave.offset_range", self.wave.offset_range),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, v)| !v.is_finite()) {
            return Err(SimError::InvalidConfig(format!("{name} must be finite, got {value}")));
        }

        if self.field.width <= 0.0 || self.field.height <= 0.0 {
            return Err(SimError::InvalidConfig(format!(
                "field extent must be positive, got {}x{}",
                self.field.width, self.field.height
            )));
        }
        if self.player.speed < 0.0 {
            return Err(SimError::InvalidConfig("player speed must not be negative".into()));
        }
        if self.player.base_len <= 0.0 {
            return Err(SimError::InvalidConfig("player base length must be positive".into()));
        }
        if self.bullets.capacity == 0 {
            return Err(SimError::InvalidConfig("bullet capacity must be non-zero".into()));
        }
        // Bullets only expire by crossing the top of the field
        if self.bullets.speed <= 0.0 {
            return Err(SimError::InvalidConfig("bullet speed must be positive".into()));
        }
        if self.wave.enemy_count == 0 || self.wave.enemy_count > MAX_ENEMIES {
            return Err(SimError::InvalidConfig(format!(
                "enemy count must be in 1..={MAX_ENEMIES}, got {}",
                self.wave.enemy_count
            )));
        }
        if self.wave.idle_secs < 0.0 {
            return Err(SimError::InvalidConfig("wave idle duration must not be negative".into()));
        }
        if self.wave.traverse_secs <= 0.0 {
            return Err(SimError::InvalidConfig("traverse duration must be positive".into()));
        }
        if self.wave.offset_range <= 0.0 {
            return Err(SimError::InvalidConfig("wave offset range must be positive".into()));
        }
        Ok(())
    }
}
