//! Shape tessellation for 2D primitives
//!
//! Everything comes out as a plain triangle list, three vertices per triangle.

use glam::Vec2;

use super::vertex::{self, Vertex};
use super::{Canvas, Color};
use crate::sim::rect::Rect;

/// Triangles of a fan around `points[0]`
pub fn triangle_fan(points: &[Vec2], color: Color) -> Vec<Vertex> {
    if points.len() < 3 {
        return Vec::new();
    }

    let hub = points[0];
    let mut vertices = Vec::with_capacity((points.len() - 2) * 3);
    for pair in points[1..].windows(2) {
        vertices.push(Vertex::at(hub, color));
        vertices.push(Vertex::at(pair[0], color));
        vertices.push(Vertex::at(pair[1], color));
    }

    vertices
}

/// Filled rectangle (two triangles)
pub fn rect(rect: &Rect, color: Color) -> Vec<Vertex> {
    let [tl, tr, br, bl] = rect.corners();
    [tl, tr, br, br, bl, tl]
        .into_iter()
        .map(|corner| Vertex::at(corner, color))
        .collect()
}

/// Rectangle outline drawn inward from the edges
pub fn rect_outline(outer: &Rect, thickness: f32, color: Color) -> Vec<Vertex> {
    let t = thickness.min(outer.width / 2.0).min(outer.height / 2.0).max(0.0);
    let side_height = (outer.height - 2.0 * t).max(0.0);

    let strips = [
        // Top and bottom span the full width
        Rect::new(outer.x, outer.y, outer.width, t),
        Rect::new(outer.x, outer.bottom() - t, outer.width, t),
        // Sides fill the gap between them
        Rect::new(outer.x, outer.y + t, t, side_height),
        Rect::new(outer.right() - t, outer.y + t, t, side_height),
    ];

    strips.iter().flat_map(|strip| rect(strip, color)).collect()
}

/// Canvas that accumulates a triangle list for upload
#[derive(Debug, Default)]
pub struct VertexCanvas {
    pub vertices: Vec<Vertex>,
}

impl VertexCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop last frame's triangles, keeping the allocation
    pub fn clear(&mut self) {
        self.vertices.clear();
    }

    pub fn triangle_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Vertex data as bytes for upload
    pub fn bytes(&self) -> &[u8] {
        vertex::as_bytes(&self.vertices)
    }
}

impl Canvas for VertexCanvas {
    fn fill_fan(&mut self, points: &[Vec2], color: Color) {
        self.vertices.extend(triangle_fan(points, color));
    }

    fn fill_rect(&mut self, area: &Rect, color: Color) {
        self.vertices.extend(rect(area, color));
    }

    fn outline_rect(&mut self, area: &Rect, thickness: f32, color: Color) {
        self.vertices.extend(rect_outline(area, thickness, color));
    }
}
