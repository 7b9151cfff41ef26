//! Collision tests between axis-aligned colliders
//!
//! Nothing in the frame step consumes hits yet; bullet-vs-enemy checks and
//! any later pairing call into [`overlaps`] directly.

use super::rect::Rect;
use super::state::{Bullet, Enemy};

/// Open-interval AABB intersection
///
/// Rectangles that only share an edge do not overlap.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.left() < b.right() && a.right() > b.left() && a.top() < b.bottom() && a.bottom() > b.top()
}

/// Whether an active bullet intersects an active enemy
pub fn bullet_hits_enemy(bullet: &Bullet, enemy: &Enemy) -> bool {
    bullet.active.is_set() && enemy.active.is_set() && overlaps(&bullet.collider, &enemy.collider)
}

/// Indices of active enemies hit by an active bullet
pub fn enemies_hit_by<'a>(
    bullet: &'a Bullet,
    enemies: &'a [Enemy],
) -> impl Iterator<Item = usize> + 'a {
    enemies
        .iter()
        .enumerate()
        .filter(move |(_, enemy)| bullet_hits_enemy(bullet, enemy))
        .map(|(i, _)| i)
}
