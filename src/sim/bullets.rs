//! Player bullet pool
//!
//! Bullets live in a fixed-capacity array in the long-lived region. A parallel
//! display array mirrors the bullets that were active and on-field at the end
//! of the last step; [`reconcile_display`] clears entries whose live bullet
//! has expired so a dead bullet never reaches the renderer.

use glam::Vec2;

use super::rect::Rect;
use super::state::{Bullet, Flag, SimulationState};
use crate::consts::{BULLET_HEIGHT, BULLET_WIDTH};

/// Fire from the player's muzzle into the first free slot
///
/// Returns the slot index, or `None` when the pool is exhausted. Exhaustion is
/// normal under sustained fire and is not reported.
pub fn spawn_bullet(state: &mut SimulationState) -> Option<usize> {
    let muzzle = state.player().muzzle();
    let velocity = Vec2::new(0.0, -state.config.bullets.speed);

    let (live, _) = state.bullet_pools_mut();
    let (index, bullet) = live
        .iter_mut()
        .enumerate()
        .find(|(_, b)| !b.active.is_set())?;

    *bullet = Bullet {
        position: muzzle,
        spawn: muzzle,
        velocity,
        collider: Rect::centered(muzzle, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT)),
        active: Flag::ON,
    };
    state.bullet_count += 1;
    Some(index)
}

/// Move active bullets, expire those past the top of the field, and mirror
/// the survivors into the display array
pub fn step_bullets(state: &mut SimulationState, dt: f32) {
    let mut expired = 0;
    let (live, display) = state.bullet_pools_mut();

    for (bullet, shown) in live.iter_mut().zip(display.iter_mut()) {
        if !bullet.active.is_set() {
            continue;
        }

        bullet.position += bullet.velocity * dt;
        bullet.refresh_collider();

        if bullet.position.y < 0.0 {
            bullet.active = Flag::OFF;
            expired += 1;
        } else {
            *shown = *bullet;
        }
    }

    state.bullet_count = state.bullet_count.saturating_sub(expired);
}

/// Force display entries inactive wherever the live bullet is inactive
pub fn reconcile_display(state: &mut SimulationState) {
    let (live, display) = state.bullet_pools_mut();
    for (bullet, shown) in live.iter().zip(display.iter_mut()) {
        if !bullet.active.is_set() {
            shown.active = Flag::OFF;
        }
    }
}

/// Bullets to hand to the renderer this frame
pub fn displayed(state: &SimulationState) -> impl Iterator<Item = &Bullet> {
    state.display_bullets().iter().filter(|b| b.active.is_set())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_BULLETS;
    use crate::sim::state::tests::test_config;

    fn new_state() -> SimulationState {
        SimulationState::new(test_config()).unwrap()
    }

    fn live_count(state: &SimulationState) -> usize {
        state.bullets().iter().filter(|b| b.active.is_set()).count()
    }

    #[test]
    fn test_spawn_at_muzzle() {
        let mut state = new_state();
        let muzzle = state.player().muzzle();

        assert_eq!(spawn_bullet(&mut state), Some(0));
        let bullet = state.bullets()[0];
        assert!(bullet.active.is_set());
        assert_eq!(bullet.position, muzzle);
        assert_eq!(bullet.spawn, muzzle);
        assert_eq!(bullet.velocity, Vec2::new(0.0, -500.0));
        assert_eq!(bullet.collider, Rect::centered(muzzle, Vec2::new(5.0, 10.0)));
        assert_eq!(state.bullet_count, 1);
        // Only one bullet per call
        assert_eq!(live_count(&state), 1);
    }

    #[test]
    fn test_pool_exhaustion_is_silent() {
        let mut state = new_state();
        for _ in 0..PLAYER_BULLETS {
            assert!(spawn_bullet(&mut state).is_some());
        }
        let first = state.bullets()[0];

        for _ in 0..10 {
            assert_eq!(spawn_bullet(&mut state), None);
        }
        assert_eq!(state.bullet_count as usize, PLAYER_BULLETS);
        assert_eq!(live_count(&state), PLAYER_BULLETS);
        // The oldest bullet was not recycled
        assert_eq!(state.bullets()[0], first);

        // Sustained fire leaves it to expire on its own schedule
        let mut frames = 0;
        loop {
            step_bullets(&mut state, 1.0 / 60.0);
            reconcile_display(&mut state);
            if !state.bullets()[0].active.is_set() {
                break;
            }
            assert_eq!(spawn_bullet(&mut state), None);
            frames += 1;
            assert!(frames < 1000);
        }

        // The whole volley left the top together
        assert_eq!(state.bullet_count, 0);
        assert!(!state.display_bullets()[0].active.is_set());
        assert_eq!(displayed(&state).count(), 0);

        assert_eq!(spawn_bullet(&mut state), Some(0));
        assert_eq!(state.bullet_count, 1);
    }

    #[test]
    fn test_freed_slot_is_reused_first() {
        let mut state = new_state();
        for _ in 0..3 {
            spawn_bullet(&mut state);
        }
        state.bullet_pools_mut().0[1].active = Flag::OFF;
        state.bullet_count -= 1;

        assert_eq!(spawn_bullet(&mut state), Some(1));
        assert_eq!(state.bullet_count, 3);
    }

    #[test]
    fn test_three_bullets_step() {
        let mut state = new_state();
        for expected in 0..3 {
            assert_eq!(spawn_bullet(&mut state), Some(expected));
        }
        let start: Vec<f32> = state.bullets()[..3].iter().map(|b| b.position.y).collect();

        step_bullets(&mut state, 0.1);
        reconcile_display(&mut state);

        for (i, y) in start.iter().enumerate() {
            let bullet = state.bullets()[i];
            assert!(bullet.active.is_set());
            assert!((y - bullet.position.y - 50.0).abs() < 1e-3);
            assert_eq!(bullet.collider, Rect::centered(bullet.position, Vec2::new(5.0, 10.0)));
            assert_eq!(state.display_bullets()[i], bullet);
        }
        assert_eq!(displayed(&state).count(), 3);
        assert_eq!(state.bullet_count, 3);
    }

    #[test]
    fn test_expired_bullet_never_displayed() {
        let mut state = new_state();
        spawn_bullet(&mut state);

        let mut saw_stale = false;
        for _ in 0..100 {
            step_bullets(&mut state, 1.0 / 60.0);
            saw_stale |= state
                .bullets()
                .iter()
                .zip(state.display_bullets())
                .any(|(live, shown)| !live.active.is_set() && shown.active.is_set());

            reconcile_display(&mut state);
            for (live, shown) in state.bullets().iter().zip(state.display_bullets()) {
                if !live.active.is_set() {
                    assert!(!shown.active.is_set());
                }
            }
        }

        // The expiry step alone leaves the previous copy behind
        assert!(saw_stale);
        assert_eq!(state.bullet_count, 0);
        assert_eq!(displayed(&state).count(), 0);
    }

    #[test]
    fn test_bullet_leaves_top_and_deactivates() {
        let mut state = new_state();
        spawn_bullet(&mut state);
        let y = state.bullets()[0].position.y;

        // One big step carries it past y = 0
        step_bullets(&mut state, y / 500.0 + 0.01);
        assert!(!state.bullets()[0].active.is_set());
        assert_eq!(state.bullet_count, 0);
    }
}
