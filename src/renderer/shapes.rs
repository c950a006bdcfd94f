//! Shape generation for 2D primitives
//!
//! All shapes are emitted in game pixels (y grows down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

/// Axis-aligned filled rectangle from its top-left corner
pub fn rect(top_left: Vec2, size: Vec2, color: [f32; 4]) -> Vec<Vertex> {
    let (x0, y0) = (top_left.x, top_left.y);
    let (x1, y1) = (top_left.x + size.x, top_left.y + size.y);
    vec![
        Vertex::new(x0, y0, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x0, y1, color),
        Vertex::new(x1, y0, color),
        Vertex::new(x1, y1, color),
    ]
}

/// Generate vertices for a filled ellipse
pub fn ellipse(center: Vec2, radii: Vec2, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    let segments = segments.max(3);
    let mut vertices = Vec::with_capacity((segments * 3) as usize);

    for i in 0..segments {
        let theta1 = (i as f32 / segments as f32) * 2.0 * PI;
        let theta2 = ((i + 1) as f32 / segments as f32) * 2.0 * PI;

        // Triangle from center to edge
        vertices.push(Vertex::new(center.x, center.y, color));
        vertices.push(Vertex::new(
            center.x + radii.x * theta1.cos(),
            center.y + radii.y * theta1.sin(),
            color,
        ));
        vertices.push(Vertex::new(
            center.x + radii.x * theta2.cos(),
            center.y + radii.y * theta2.sin(),
            color,
        ));
    }

    vertices
}

/// Generate vertices for a filled circle
pub fn circle(center: Vec2, radius: f32, color: [f32; 4], segments: u32) -> Vec<Vertex> {
    ellipse(center, Vec2::splat(radius), color, segments)
}

/// Square body with rounded corners, squashed by `scale` around its base
///
/// `center` is the unscaled center and `size` the unscaled edge length; the
/// bottom edge stays put so the jelly squashes into the platform.
pub fn jelly_body(
    center: Vec2,
    size: f32,
    scale: Vec2,
    color: [f32; 4],
    segments: u32,
) -> Vec<Vertex> {
    let w = size * scale.x;
    let h = size * scale.y;
    let base = center.y + size * 0.5;
    let top_left = Vec2::new(center.x - w * 0.5, base - h);
    let r = (w.min(h) * 0.25).max(0.0);
    let corner_segments = (segments / 4).max(2);

    let mut vertices = Vec::with_capacity(18 + (4 * corner_segments * 3) as usize);
    // Cross of two rectangles, then four corner fans
    vertices.extend(rect(
        top_left + Vec2::new(r, 0.0),
        Vec2::new(w - 2.0 * r, h),
        color,
    ));
    vertices.extend(rect(
        top_left + Vec2::new(0.0, r),
        Vec2::new(r, h - 2.0 * r),
        color,
    ));
    vertices.extend(rect(
        top_left + Vec2::new(w - r, r),
        Vec2::new(r, h - 2.0 * r),
        color,
    ));

    let corners = [
        (top_left + Vec2::new(w - r, r), -PI * 0.5),
        (top_left + Vec2::new(r, r), PI),
        (top_left + Vec2::new(r, h - r), PI * 0.5),
        (top_left + Vec2::new(w - r, h - r), 0.0),
    ];
    for (corner, start) in corners {
        for i in 0..corner_segments {
            let a1 = start + (i as f32 / corner_segments as f32) * PI * 0.5;
            let a2 = start + ((i + 1) as f32 / corner_segments as f32) * PI * 0.5;
            vertices.push(Vertex::new(corner.x, corner.y, color));
            vertices.push(Vertex::new(
                corner.x + r * a1.cos(),
                corner.y + r * a1.sin(),
                color,
            ));
            vertices.push(Vertex::new(
                corner.x + r * a2.cos(),
                corner.y + r * a2.sin(),
                color,
            ));
        }
    }

    vertices
}
