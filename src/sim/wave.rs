//! Enemy construction and the wave group-movement state machine
//!
//! A wave rests for `idle_secs`, then eases its origin toward a random
//! horizontal target over `traverse_secs`, dragging every active enemy along
//! by the same per-frame delta. Enemies that would leave the field stay put
//! for that frame while their siblings keep moving.

use std::f32::consts::PI;

use glam::Vec2;
use rand::Rng;

use super::arena::{Arena, Slot};
use super::rect::Rect;
use super::state::{Enemy, EnemyWave, Flag};
use crate::config::{SimConfig, WaveConfig};
use crate::consts::*;
use crate::error::SimError;

/// Compact alien silhouette (triangle fan)
pub const ALIEN_SHAPE: [Vec2; 14] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(0.0, -1.0),
    Vec2::new(-0.5, -0.5),
    Vec2::new(-1.0, 0.0),
    Vec2::new(-0.5, 0.25),
    Vec2::new(0.0, 0.25),
    Vec2::new(-0.25, 0.25),
    Vec2::new(0.0, 1.0),
    Vec2::new(0.25, 0.25),
    Vec2::new(0.0, 0.25),
    Vec2::new(0.5, 0.25),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.5, -0.5),
    Vec2::new(0.0, -1.0),
];

/// Wide box-like boss silhouette (triangle fan)
pub const BOSS_SHAPE: [Vec2; 8] = [
    Vec2::new(0.0, 0.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(1.0, 1.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(-1.0, 1.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(0.0, -1.0),
    Vec2::new(1.0, -1.0),
];

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Alien,
    Boss,
}

impl EnemyKind {
    /// Tag stored in the wave header
    pub fn tag(self) -> u32 {
        match self {
            EnemyKind::Alien => 0,
            EnemyKind::Boss => 1,
        }
    }

    pub fn template(self) -> &'static [Vec2] {
        match self {
            EnemyKind::Alien => &ALIEN_SHAPE,
            EnemyKind::Boss => &BOSS_SHAPE,
        }
    }

    pub fn scale(self) -> f32 {
        match self {
            EnemyKind::Alien => ALIEN_SCALE,
            EnemyKind::Boss => BOSS_SCALE,
        }
    }
}

impl TryFrom<u32> for EnemyKind {
    type Error = SimError;

    fn try_from(tag: u32) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(EnemyKind::Alien),
            1 => Ok(EnemyKind::Boss),
            other => Err(SimError::InvalidEnemyKind(other)),
        }
    }
}

/// Where a wave lives inside the per-level region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveSlots {
    pub wave: Slot<EnemyWave>,
    pub enemies: Slot<Enemy>,
}

/// Initialize the enemy record at `index` for the given kind
///
/// The record comes back inactive at the origin with a default 50x50
/// collider; the caller places and activates it.
pub fn build_enemy(
    enemies: &mut [Enemy],
    kind: EnemyKind,
    index: usize,
) -> Result<&mut Enemy, SimError> {
    let count = enemies.len();
    let enemy = enemies
        .get_mut(index)
        .ok_or(SimError::EnemyIndex { index, count })?;

    let template = kind.template();
    enemy.scale = kind.scale();
    enemy.active = Flag::OFF;
    enemy.position = Vec2::ZERO;
    enemy.collider = Rect::new(0.0, 0.0, ENEMY_COLLIDER_SIZE, ENEMY_COLLIDER_SIZE);
    enemy.point_count = template.len() as u32;
    enemy.shape = [Vec2::ZERO; MAX_SHAPE_POINTS];
    enemy.shape[..template.len()].copy_from_slice(template);

    Ok(enemy)
}

/// Carve a wave and its enemies from the per-level region and line them up
pub fn build_wave(region: &mut Arena, config: &SimConfig) -> Result<WaveSlots, SimError> {
    let kind = EnemyKind::try_from(config.wave.kind)?;
    let count = config.wave.enemy_count;

    let slots = WaveSlots {
        wave: region.alloc_one::<EnemyWave>()?,
        enemies: region.alloc::<Enemy>(count)?,
    };

    let (wave, enemies) = region.pair_mut(slots.wave, slots.enemies);
    let wave = &mut wave[0];
    *wave = EnemyWave {
        origin: WAVE_ORIGIN,
        start: WAVE_ORIGIN,
        target: WAVE_ORIGIN,
        enemy_count: count as u32,
        kind: kind.tag(),
        traversing: Flag::OFF,
        idle_timer: 0.0,
        traverse_clock: 0.0,
    };

    for i in 0..count {
        let enemy = build_enemy(enemies, kind, i)?;
        enemy.position = wave.origin + Vec2::new(i as f32 * ENEMY_SPACING, 0.0);
        enemy.active = Flag::ON;
        enemy.refresh_collider();
    }

    let origin = wave.origin;
    log::info!(
        "Built {:?} wave of {} at ({}, {}), {} bytes of per-level region used",
        kind,
        count,
        origin.x,
        origin.y,
        region.used()
    );
    Ok(slots)
}

/// Ease-in-out curve: slow at both ends, fastest at t = 0.5
#[inline]
pub fn ease_in_out(t: f32) -> f32 {
    (1.0 - (PI * t).cos()) / 2.0
}

/// Leave `Idle`: snapshot the origin and pick a new horizontal target
pub fn begin_traversal<R: Rng + ?Sized>(wave: &mut EnemyWave, rng: &mut R, offset_range: f32) {
    wave.idle_timer = 0.0;
    wave.start = wave.origin;
    wave.target = Vec2::new(rng.random_range(-offset_range..offset_range), wave.start.y);
    wave.traverse_clock = 0.0;
    wave.traversing = Flag::ON;
    log::debug!(
        "Wave traversal: ({}, {}) -> ({}, {})",
        wave.start.x,
        wave.start.y,
        wave.target.x,
        wave.target.y
    );
}

/// Advance the wave's movement state machine by `dt`
pub fn step_wave<R: Rng + ?Sized>(
    wave: &mut EnemyWave,
    enemies: &mut [Enemy],
    rng: &mut R,
    field_width: f32,
    tuning: &WaveConfig,
    dt: f32,
) {
    if !wave.traversing.is_set() {
        wave.idle_timer += dt;
        if wave.idle_timer < tuning.idle_secs {
            return;
        }
        begin_traversal(wave, rng, tuning.offset_range);
    }

    wave.traverse_clock += dt;
    let mut t = wave.traverse_clock / tuning.traverse_secs;
    if t >= 1.0 {
        t = 1.0;
        wave.traversing = Flag::OFF;
    }

    let next = wave.start.lerp(wave.target, ease_in_out(t));
    let delta = Vec2::new(next.x - wave.origin.x, 0.0);

    let count = (wave.enemy_count as usize).min(enemies.len());
    for enemy in enemies[..count].iter_mut().filter(|e| e.active.is_set()) {
        let moved = enemy.collider.translated(delta);
        // Per-enemy clamp: an enemy that would leave the field skips this frame
        if moved.left() >= 0.0 && moved.right() <= field_width {
            enemy.position.x += delta.x;
            enemy.collider = moved;
        }
    }

    wave.origin = next;
    log::trace!("Wave origin: ({}, {})", wave.origin.x, wave.origin.y);
    if !wave.traversing.is_set() {
        log::debug!("Wave traversal finished at ({}, {})", wave.origin.x, wave.origin.y);
    }
}

/// Re-center every active enemy's collider on its position
pub fn refresh_colliders(wave: &EnemyWave, enemies: &mut [Enemy]) {
    let count = (wave.enemy_count as usize).min(enemies.len());
    for enemy in enemies[..count].iter_mut().filter(|e| e.active.is_set()) {
        enemy.refresh_collider();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::tests::test_config;
    use crate::sim::state::{SimulationState, WavePhase};
    use bytemuck::Zeroable;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn positions(state: &SimulationState) -> Vec<Vec2> {
        state.enemies().iter().map(|e| e.position).collect()
    }

    #[test]
    fn test_build_alien() {
        let mut enemies = [Enemy::zeroed(); 2];
        let enemy = build_enemy(&mut enemies, EnemyKind::Alien, 1).unwrap();
        assert_eq!(enemy.scale, 22.0);
        assert!(!enemy.active.is_set());
        assert_eq!(enemy.position, Vec2::ZERO);
        assert_eq!(enemy.collider, Rect::new(0.0, 0.0, 50.0, 50.0));
        assert_eq!(enemy.shape(), &ALIEN_SHAPE[..]);
        // Sibling untouched
        assert_eq!(enemies[0], Enemy::zeroed());
    }

    #[test]
    fn test_build_boss_uses_boss_silhouette() {
        let mut enemies = [Enemy::zeroed(); 1];
        let enemy = build_enemy(&mut enemies, EnemyKind::Boss, 0).unwrap();
        assert_eq!(enemy.scale, 50.0);
        assert_eq!(enemy.point_count, 8);
        assert_eq!(enemy.shape(), &BOSS_SHAPE[..]);
        assert!(enemy.shape[8..].iter().all(|p| *p == Vec2::ZERO));
    }

    #[test]
    fn test_build_enemy_index_out_of_range() {
        let mut enemies = [Enemy::zeroed(); 2];
        assert!(matches!(
            build_enemy(&mut enemies, EnemyKind::Alien, 2),
            Err(SimError::EnemyIndex { index: 2, count: 2 })
        ));
    }

    #[test]
    fn test_invalid_kind_tag() {
        assert!(matches!(EnemyKind::try_from(7), Err(SimError::InvalidEnemyKind(7))));
        assert_eq!(EnemyKind::try_from(1).unwrap(), EnemyKind::Boss);

        let mut config = test_config();
        config.wave.kind = 2;
        let mut region = Arena::new("per-level", 4096).unwrap();
        assert!(matches!(
            build_wave(&mut region, &config),
            Err(SimError::InvalidEnemyKind(2))
        ));
        // Nothing carved for a rejected wave
        assert_eq!(region.used(), 0);
    }

    #[test]
    fn test_build_wave_lines_up_enemies() {
        let state = SimulationState::new(test_config()).unwrap();
        let wave = state.wave();
        assert_eq!(wave.origin, WAVE_ORIGIN);
        assert_eq!(wave.enemy_count, 5);
        assert_eq!(wave.kind, EnemyKind::Alien.tag());

        for (i, enemy) in state.enemies().iter().enumerate() {
            assert!(enemy.active.is_set());
            assert_eq!(enemy.position, Vec2::new(100.0 + i as f32 * 50.0, 50.0));
            assert_eq!(enemy.collider, Rect::centered(enemy.position, Vec2::splat(50.0)));
        }
    }

    #[test]
    fn test_ease_boundaries() {
        assert!(ease_in_out(0.0).abs() < 1e-6);
        assert!((ease_in_out(1.0) - 1.0).abs() < 1e-6);
        assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
        // Symmetric about the midpoint
        assert!((ease_in_out(0.25) + ease_in_out(0.75) - 1.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn prop_ease_is_monotonic(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(ease_in_out(lo) <= ease_in_out(hi) + 1e-6);
        }

        #[test]
        fn prop_ease_stays_in_unit_range(t in 0.0f32..=1.0) {
            let e = ease_in_out(t);
            prop_assert!((-1e-6..=1.0 + 1e-6).contains(&e));
        }
    }

    #[test]
    fn test_idle_wave_does_not_move() {
        let mut state = SimulationState::new(test_config()).unwrap();
        let before = positions(&state);
        let tuning = state.config.wave;
        let width = state.config.field.width;

        for _ in 0..40 {
            let (wave, enemies, rng) = state.wave_parts_mut();
            step_wave(wave, enemies, rng, width, &tuning, 0.1);
        }

        assert_eq!(state.wave().phase(), WavePhase::Idle);
        assert!((state.wave().idle_timer - 4.0).abs() < 1e-3);
        assert_eq!(positions(&state), before);
        assert_eq!(state.wave().origin, WAVE_ORIGIN);
    }

    #[test]
    fn test_idle_to_traversing_to_idle() {
        let mut state = SimulationState::new(test_config()).unwrap();
        let tuning = state.config.wave;
        let width = state.config.field.width;

        for _ in 0..9 {
            let (wave, enemies, rng) = state.wave_parts_mut();
            step_wave(wave, enemies, rng, width, &tuning, 0.5);
        }
        assert_eq!(state.wave().phase(), WavePhase::Idle);

        // Timer hits 5s: traversal starts and advances in the same step
        {
            let (wave, enemies, rng) = state.wave_parts_mut();
            step_wave(wave, enemies, rng, width, &tuning, 0.5);
        }
        let wave = *state.wave();
        assert_eq!(wave.phase(), WavePhase::Traversing);
        assert_eq!(wave.idle_timer, 0.0);
        assert_eq!(wave.start, WAVE_ORIGIN);
        assert!((-100.0..100.0).contains(&wave.target.x));
        assert_eq!(wave.target.y, WAVE_ORIGIN.y);
        assert!((wave.traverse_clock - 0.5).abs() < 1e-6);
        let midpoint = (wave.start.x + wave.target.x) / 2.0;
        assert!((wave.origin.x - midpoint).abs() < 1e-3);

        {
            let (wave, enemies, rng) = state.wave_parts_mut();
            step_wave(wave, enemies, rng, width, &tuning, 0.5);
        }
        let wave = *state.wave();
        assert_eq!(wave.phase(), WavePhase::Idle);
        assert!((wave.origin.x - wave.target.x).abs() < 1e-3);
        assert_eq!(wave.origin.y, WAVE_ORIGIN.y);
    }

    #[test]
    fn test_per_enemy_clamp_is_independent() {
        let mut enemies = [Enemy::zeroed(); 2];
        for (i, x) in [(0, 100.0), (1, 600.0)] {
            let enemy = build_enemy(&mut enemies, EnemyKind::Alien, i).unwrap();
            enemy.position = Vec2::new(x, 50.0);
            enemy.active = Flag::ON;
            enemy.refresh_collider();
        }

        let mut wave = EnemyWave::zeroed();
        wave.origin = Vec2::new(100.0, 50.0);
        wave.start = wave.origin;
        wave.target = Vec2::new(130.0, 50.0);
        wave.enemy_count = 2;
        wave.traversing = Flag::ON;

        let tuning = WaveConfig::default();
        let mut rng = Pcg32::seed_from_u64(3);
        step_wave(&mut wave, &mut enemies, &mut rng, 640.0, &tuning, 1.0);

        // Right edge 625 + 30 would cross 640: this enemy stays
        assert_eq!(enemies[1].position, Vec2::new(600.0, 50.0));
        assert_eq!(enemies[1].collider.x, 575.0);
        // Its sibling moves by the full delta
        assert!((enemies[0].position.x - 130.0).abs() < 1e-3);
        assert!((enemies[0].collider.x - 105.0).abs() < 1e-3);
        // The origin advances regardless
        assert!((wave.origin.x - 130.0).abs() < 1e-3);
        assert_eq!(wave.phase(), WavePhase::Idle);
    }

    #[test]
    fn test_inactive_enemies_are_not_moved() {
        let mut enemies = [Enemy::zeroed(); 1];
        let enemy = build_enemy(&mut enemies, EnemyKind::Alien, 0).unwrap();
        enemy.position = Vec2::new(200.0, 50.0);

        let mut wave = EnemyWave::zeroed();
        wave.origin = Vec2::new(100.0, 50.0);
        wave.start = wave.origin;
        wave.target = Vec2::new(50.0, 50.0);
        wave.enemy_count = 1;
        wave.traversing = Flag::ON;

        let mut rng = Pcg32::seed_from_u64(3);
        step_wave(&mut wave, &mut enemies, &mut rng, 640.0, &WaveConfig::default(), 1.0);
        assert_eq!(enemies[0].position, Vec2::new(200.0, 50.0));
    }

    #[test]
    fn test_same_seed_same_target() {
        let mut a = SimulationState::new(test_config()).unwrap();
        let mut b = SimulationState::new(test_config()).unwrap();
        let tuning = a.config.wave;

        for state in [&mut a, &mut b] {
            let (wave, enemies, rng) = state.wave_parts_mut();
            step_wave(wave, enemies, rng, 640.0, &tuning, 5.0);
        }
        assert_eq!(a.wave().target, b.wave().target);
        assert_eq!(positions(&a), positions(&b));
    }

    #[test]
    fn test_refresh_colliders_recenters() {
        let mut state = SimulationState::new(test_config()).unwrap();
        let (wave, enemies, _) = state.wave_parts_mut();
        enemies[2].position.x += 12.0;
        refresh_colliders(wave, enemies);
        let enemy = enemies[2];
        assert_eq!(enemy.collider, Rect::centered(enemy.position, Vec2::splat(50.0)));
    }
}
