//! Rendering boundary
//!
//! The simulation never draws. After each tick a [`Frame`] captures what is
//! visible (player, displayable bullets, active enemies) and replays it onto
//! any [`Canvas`], such as the [`VertexCanvas`] triangle-list builder.

pub mod shapes;
pub mod vertex;

use glam::Vec2;

pub use shapes::VertexCanvas;
pub use vertex::{Vertex, colors};

use crate::consts::COLLIDER_OUTLINE;
use crate::sim::bullets::displayed;
use crate::sim::rect::Rect;
use crate::sim::state::SimulationState;

/// RGBA color
pub type Color = [f32; 4];

/// Drawing collaborator
pub trait Canvas {
    /// Filled convex-ish polygon as a triangle fan around `points[0]`
    fn fill_fan(&mut self, points: &[Vec2], color: Color);
    fn fill_rect(&mut self, area: &Rect, color: Color);
    fn outline_rect(&mut self, area: &Rect, thickness: f32, color: Color);
}

/// A polygon stored in the frame's shared point buffer
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PolygonDraw {
    start: usize,
    len: usize,
    pub collider: Rect,
}

/// A displayable bullet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletDraw {
    pub position: Vec2,
    pub collider: Rect,
}

/// Everything visible after one tick
///
/// Reused across frames so steady-state capture does not allocate.
#[derive(Debug, Default)]
pub struct Frame {
    points: Vec<Vec2>,
    pub player: PolygonDraw,
    pub bullets: Vec<BulletDraw>,
    pub enemies: Vec<PolygonDraw>,
    /// Draw collider outlines
    pub show_colliders: bool,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the frame contents with the current state
    pub fn capture(&mut self, state: &SimulationState) {
        self.points.clear();
        self.bullets.clear();
        self.enemies.clear();
        self.show_colliders = state.config.show_colliders;

        let player = state.player();
        self.player = self.push_polygon(player.scaled_shape(), player.collider);

        self.bullets.extend(displayed(state).map(|b| BulletDraw {
            position: b.position,
            collider: b.collider,
        }));

        let count = state.wave().enemy_count as usize;
        for enemy in state.enemies().iter().take(count).filter(|e| e.active.is_set()) {
            let polygon = self.push_polygon(enemy.scaled_shape(), enemy.collider);
            self.enemies.push(polygon);
        }
    }

    /// Field-space points of a captured polygon
    pub fn points(&self, polygon: &PolygonDraw) -> &[Vec2] {
        &self.points[polygon.start..polygon.start + polygon.len]
    }

    /// Replay onto a canvas: player, then bullets, then enemies
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) {
        if self.show_colliders {
            canvas.outline_rect(&self.player.collider, COLLIDER_OUTLINE, colors::COLLIDER);
        }
        canvas.fill_fan(self.points(&self.player), colors::PLAYER);

        for bullet in &self.bullets {
            canvas.fill_rect(&bullet.collider, colors::BULLET);
        }

        for enemy in &self.enemies {
            if self.show_colliders {
                canvas.outline_rect(&enemy.collider, COLLIDER_OUTLINE, colors::COLLIDER);
            }
            canvas.fill_fan(self.points(enemy), colors::ENEMY);
        }
    }

    fn push_polygon(&mut self, points: impl Iterator<Item = Vec2>, collider: Rect) -> PolygonDraw {
        let start = self.points.len();
        self.points.extend(points);
        PolygonDraw {
            start,
            len: self.points.len() - start,
            collider,
        }
    }
}
