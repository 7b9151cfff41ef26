//! Triangle-list vertices and the game's palette

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

use super::Color;

/// Field-space vertex with a flat color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: Color,
}

impl Vertex {
    #[inline]
    pub fn at(point: Vec2, color: Color) -> Self {
        Self {
            position: point.to_array(),
            color,
        }
    }
}

/// Raw bytes of a vertex list, ready for a buffer upload
pub fn as_bytes(vertices: &[Vertex]) -> &[u8] {
    bytemuck::cast_slice(vertices)
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const PLAYER: Color = [0.0, 0.475, 0.945, 1.0]; // Blue
    pub const BULLET: Color = [0.902, 0.161, 0.216, 1.0]; // Red
    pub const ENEMY: Color = [0.0, 0.894, 0.188, 1.0]; // Green
    /// Debug outline
    pub const COLLIDER: Color = BULLET;
}
