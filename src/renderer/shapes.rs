//! Shape generation for 2D primitives
//!
//! Everything is emitted as a plain triangle list in playfield pixels
//! (origin top-left, y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;
use crate::Color;

/// Generate vertices for an axis-aligned filled rectangle
pub fn rect(pos: Vec2, size: Vec2, color: Color) -> Vec<Vertex> {
    if size.x <= 0.0 || size.y <= 0.0 {
        return Vec::new();
    }
    let (x0, y0) = (pos.x, pos.y);
    let (x1, y1) = (pos.x + size.x, pos.y + size.y);
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: Color, segments: u32) -> Vec<Vertex> {
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radius * theta1.cos(),
            center.y + radius * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radius * theta2.cos(),
            center.y + radius * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a stroked arc from `theta_start` to `theta_end`
/// (radians, y down, so 0..PI sweeps through the bottom)
pub fn arc_stroke(
    center: Vec2,
    radius: f32,
    theta_start: f32,
    theta_end: f32,
    thickness: f32,
    color: Color,
    segments: u32,
) -> Vec<Vertex> {
    let segments = segments.max(1);
    let span = theta_end - theta_start;
    let inner_r = (radius - thickness / 2.0).max(0.0);
    let outer_r = radius + thickness / 2.0;

    let mut vertices = Vec::with_capacity((segments * 6) as usize);

    for i in 0..segments {
        let theta1 = theta_start + span * (i as f32 / segments as f32);
        let theta2 = theta_start + span * ((i + 1) as f32 / segments as f32);

        let dir1 = Vec2::new(theta1.cos(), theta1.sin());
        let dir2 = Vec2::new(theta2.cos(), theta2.sin());
        let inner1 = center + dir1 * inner_r;
        let outer1 = center + dir1 * outer_r;
        let inner2 = center + dir2 * inner_r;
        let outer2 = center + dir2 * outer_r;

        // Two triangles per segment
        vertices.push(Vertex::new(inner1.x, inner1.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(inner2.x, inner2.y, color));

        vertices.push(Vertex::new(inner2.x, inner2.y, color));
        vertices.push(Vertex::new(outer1.x, outer1.y, color));
        vertices.push(Vertex::new(outer2.x, outer2.y, color));
    }

    vertices
}

/// Horizontal progress bar: full-width track with a `fraction` wide fill on top
pub fn bar(pos: Vec2, size: Vec2, fraction: f32, track: Color, fill: Color) -> Vec<Vertex> {
    let fraction = fraction.clamp(0.0, 1.0);
    let mut vertices = rect(pos, size, track);
    vertices.extend(rect(pos, Vec2::new(size.x * fraction, size.y), fill));
    vertices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette;

    #[test]
    fn test_rect_corners() {
        let v = rect(Vec2::new(10.0, 20.0), Vec2::new(5.0, 3.0), palette::RED);
        assert_eq!(v.len(), 6);
        let xs: Vec<f32> = v.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = v.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 15.0);
        assert_eq!(ys.iter().cloned().fold(f32::MAX, f32::min), 20.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 23.0);
    }

    #[test]
    fn test_empty_rect_has_no_vertices() {
        assert!(rect(Vec2::ZERO, Vec2::new(0.0, 3.0), palette::RED).is_empty());
    }

    #[test]
    fn test_circle_stays_within_radius() {
        let center = Vec2::new(50.0, 50.0);
        let v = circle(center, 10.0, palette::BLUE, 24);
        assert_eq!(v.len(), 72);
        for vertex in v {
            let d = Vec2::from(vertex.position).distance(center);
            assert!(d <= 10.0 + 1e-3);
        }
    }

    #[test]
    fn test_smile_arc_sweeps_below_center() {
        let center = Vec2::new(0.0, 0.0);
        let v = arc_stroke(center, 10.0, 0.0, PI, 2.0, palette::BLACK, 8);
        assert_eq!(v.len(), 48);
        assert!(v.iter().all(|v| v.position[1] >= -1e-3));
    }

    #[test]
    fn test_bar_fill_width() {
        let v = bar(
            Vec2::ZERO,
            Vec2::new(20.0, 3.0),
            0.25,
            palette::LIGHT_CORAL,
            palette::MEDIUM_SEA_GREEN,
        );
        assert_eq!(v.len(), 12);
        let fill_right = v[6..]
            .iter()
            .map(|v| v.position[0])
            .fold(f32::MIN, f32::max);
        assert_eq!(fill_right, 5.0);

        // Empty bar keeps only the track
        let empty = bar(Vec2::ZERO, Vec2::new(20.0, 3.0), 0.0, palette::RED, palette::BLUE);
        assert_eq!(empty.len(), 6);
    }
}
