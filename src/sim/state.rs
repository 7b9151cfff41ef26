//! Entity records and simulation state
//!
//! Every entity record is plain old data living inside one of the two arenas.
//! `SimulationState` owns the arenas and the slots that locate each record.

use bytemuck::{Pod, Zeroable};
use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::arena::{Memory, Slot};
use super::rect::Rect;
use super::wave::{self, WaveSlots};
use crate::config::{FieldConfig, PlayerConfig, SimConfig};
use crate::consts::*;
use crate::error::SimError;
use crate::ship_clearance;

/// Boolean stored as a 32-bit word so records stay `Pod`
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Flag(u32);

impl Flag {
    pub const OFF: Self = Self(0);
    pub const ON: Self = Self(1);

    #[inline]
    pub fn is_set(self) -> bool {
        self.0 != 0
    }
}

impl From<bool> for Flag {
    fn from(on: bool) -> Self {
        if on { Self::ON } else { Self::OFF }
    }
}

/// Ship outline in local space (unit base, apex at -1), drawn as a triangle fan
pub const PLAYER_SHAPE: [Vec2; PLAYER_SHAPE_POINTS] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(0.0, -1.0),
    Vec2::new(-0.5, 0.0),
    Vec2::new(-0.25, 0.25),
    Vec2::new(0.0, 0.0),
    Vec2::new(0.25, 0.25),
    Vec2::new(0.5, 0.0),
    Vec2::new(0.0, -1.0),
];

/// The player's ship
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Player {
    pub position: Vec2,
    /// Units per second along each axis
    pub speed: f32,
    pub scale: f32,
    /// Collider width
    pub base_len: f32,
    /// Collider height; also the muzzle offset above `position`
    pub clearance: f32,
    pub collider: Rect,
    pub shape: [Vec2; PLAYER_SHAPE_POINTS],
}

impl Player {
    /// Ship centered at the bottom of the field
    pub fn spawn(tuning: &PlayerConfig, field: &FieldConfig) -> Self {
        let clearance = ship_clearance(tuning.base_len, PLAYER_HALF_ANGLE_DEG);
        let mut player = Self {
            position: Vec2::new(field.width / 2.0, field.height - clearance),
            speed: tuning.speed,
            scale: tuning.scale,
            base_len: tuning.base_len,
            clearance,
            collider: Rect::default(),
            shape: PLAYER_SHAPE,
        };
        player.refresh_collider();
        player
    }

    /// Recompute the collider from the current position
    pub fn refresh_collider(&mut self) {
        self.collider = Rect::new(
            self.position.x - self.base_len / 2.0,
            self.position.y - self.clearance,
            self.base_len,
            self.clearance,
        );
    }

    /// Where bullets leave the ship
    #[inline]
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.position.x, self.position.y - self.clearance)
    }

    /// Shape template scaled and placed in field coordinates
    pub fn scaled_shape(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.shape.iter().map(|p| self.position + *p * self.scale)
    }
}

/// A pooled player bullet
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Bullet {
    pub position: Vec2,
    /// Muzzle point the bullet was fired from
    pub spawn: Vec2,
    pub velocity: Vec2,
    pub collider: Rect,
    pub active: Flag,
}

impl Bullet {
    /// Re-center the collider on the current position
    #[inline]
    pub fn refresh_collider(&mut self) {
        self.collider = Rect::centered(self.position, self.collider.size());
    }
}

/// One member of an enemy wave
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Enemy {
    pub position: Vec2,
    pub collider: Rect,
    pub scale: f32,
    pub active: Flag,
    /// Number of valid points in `shape`
    pub point_count: u32,
    pub shape: [Vec2; MAX_SHAPE_POINTS],
}

impl Enemy {
    /// The valid part of the shape template
    pub fn shape(&self) -> &[Vec2] {
        let count = (self.point_count as usize).min(MAX_SHAPE_POINTS);
        &self.shape[..count]
    }

    /// Shape template scaled and placed in field coordinates
    pub fn scaled_shape(&self) -> impl Iterator<Item = Vec2> + '_ {
        self.shape().iter().map(|p| self.position + *p * self.scale)
    }

    /// Re-center the collider on the current position, keeping its size
    pub fn refresh_collider(&mut self) {
        self.collider = Rect::centered(self.position, self.collider.size());
    }
}

/// Group-movement phase of a wave
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WavePhase {
    /// Accumulating the idle timer
    Idle,
    /// Easing the origin from `start` toward `target`
    Traversing,
}

/// Header of an enemy wave; the enemies themselves follow in their own slot
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct EnemyWave {
    /// Shared reference position of every member enemy
    pub origin: Vec2,
    /// Origin snapshot taken when the current traversal began
    pub start: Vec2,
    /// Origin the current traversal eases toward
    pub target: Vec2,
    pub enemy_count: u32,
    /// Enemy kind tag, see [`wave::EnemyKind`]
    pub kind: u32,
    pub traversing: Flag,
    /// Seconds spent idle since the last traversal
    pub idle_timer: f32,
    /// Seconds into the current traversal
    pub traverse_clock: f32,
}

impl EnemyWave {
    pub fn phase(&self) -> WavePhase {
        if self.traversing.is_set() {
            WavePhase::Traversing
        } else {
            WavePhase::Idle
        }
    }
}

/// High-level mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    InPlay,
    Menu,
    Paused,
}

/// Complete simulation state
///
/// Built once at startup and passed by `&mut` through every frame step.
#[derive(Debug)]
pub struct SimulationState {
    pub mode: Mode,
    /// Live bullets in the pool
    pub bullet_count: u32,
    pub config: SimConfig,
    memory: Memory,
    player: Slot<Player>,
    bullets: Slot<Bullet>,
    display_bullets: Slot<Bullet>,
    level: WaveSlots,
    rng: Pcg32,
}

impl SimulationState {
    /// Provision both regions and lay out every entity record
    pub fn new(config: SimConfig) -> Result<Self, SimError> {
        config.validate()?;

        let mut memory =
            Memory::provision(config.memory.long_lived_bytes, config.memory.per_level_bytes)?;

        let region = &mut memory.long_lived;
        let player = region.alloc_one::<Player>()?;
        let bullets = region.alloc::<Bullet>(config.bullets.capacity)?;
        let display_bullets = region.alloc::<Bullet>(config.bullets.capacity)?;
        *region.record_mut(player) = Player::spawn(&config.player, &config.field);
        log::info!(
            "Long-lived layout: player @{}, bullets @{}, display @{} ({} bytes used)",
            player.offset(),
            bullets.offset(),
            display_bullets.offset(),
            region.used()
        );

        let level = wave::build_wave(&mut memory.per_level, &config)?;

        Ok(Self {
            mode: Mode::InPlay,
            bullet_count: 0,
            rng: Pcg32::seed_from_u64(config.seed),
            config,
            memory,
            player,
            bullets,
            display_bullets,
            level,
        })
    }

    /// Drop the current wave and rebuild it from a fresh per-level region
    ///
    /// The long-lived region (player and bullets) is untouched.
    pub fn restart_level(&mut self) -> Result<(), SimError> {
        self.memory.per_level.reset();
        self.level = wave::build_wave(&mut self.memory.per_level, &self.config)?;
        log::info!("Level restarted");
        Ok(())
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn player(&self) -> &Player {
        self.memory.long_lived.record(self.player)
    }

    pub fn player_mut(&mut self) -> &mut Player {
        self.memory.long_lived.record_mut(self.player)
    }

    /// Authoritative bullet pool
    pub fn bullets(&self) -> &[Bullet] {
        self.memory.long_lived.get(self.bullets)
    }

    /// Bullets eligible for rendering
    pub fn display_bullets(&self) -> &[Bullet] {
        self.memory.long_lived.get(self.display_bullets)
    }

    /// Live and display pools, borrowed together
    pub fn bullet_pools_mut(&mut self) -> (&mut [Bullet], &mut [Bullet]) {
        self.memory
            .long_lived
            .pair_mut(self.bullets, self.display_bullets)
    }

    pub fn wave(&self) -> &EnemyWave {
        self.memory.per_level.record(self.level.wave)
    }

    pub fn enemies(&self) -> &[Enemy] {
        self.memory.per_level.get(self.level.enemies)
    }

    /// Wave header, enemies and the RNG, borrowed together
    pub fn wave_parts_mut(&mut self) -> (&mut EnemyWave, &mut [Enemy], &mut Pcg32) {
        let (wave, enemies) = self
            .memory
            .per_level
            .pair_mut(self.level.wave, self.level.enemies);
        (&mut wave[0], enemies, &mut self.rng)
    }
}
