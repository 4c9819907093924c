//! Shape generation for 2D primitives
//!
//! Everything is emitted as a triangle list in playfield pixels (y down).

use glam::Vec2;
use std::f32::consts::PI;

use super::vertex::Vertex;

fn quad(out: &mut Vec<Vertex>, corners: [Vec2; 4], colors: [[f32; 4]; 4]) {
    let [a, b, c, d] = corners;
    out.push(Vertex::new(a.x, a.y, colors[0]));
    out.push(Vertex::new(b.x, b.y, colors[1]));
    out.push(Vertex::new(c.x, c.y, colors[2]));

    out.push(Vertex::new(a.x, a.y, colors[0]));
    out.push(Vertex::new(c.x, c.y, colors[2]));
    out.push(Vertex::new(d.x, d.y, colors[3]));
}

/// Axis-aligned filled rectangle from its top-left corner
pub fn rect(out: &mut Vec<Vertex>, pos: Vec2, size: Vec2, color: [f32; 4]) {
    gradient_rect(out, pos, size, color, color);
}

/// Rectangle shaded from `top` to `bottom`
pub fn gradient_rect(
    out: &mut Vec<Vertex>,
    pos: Vec2,
    size: Vec2,
    top: [f32; 4],
    bottom: [f32; 4],
) {
    let corners = [
        pos,
        Vec2::new(pos.x + size.x, pos.y),
        pos + size,
        Vec2::new(pos.x, pos.y + size.y),
    ];
    quad(out, corners, [top, top, bottom, bottom]);
}

/// Rectangle outline drawn inside its bounds
pub fn rect_outline(out: &mut Vec<Vertex>, pos: Vec2, size: Vec2, thickness: f32, color: [f32; 4]) {
    let t = thickness.min(size.x / 2.0).min(size.y / 2.0);
    rect(out, pos, Vec2::new(size.x, t), color);
    rect(out, Vec2::new(pos.x, pos.y + size.y - t), Vec2::new(size.x, t), color);
    rect(out, Vec2::new(pos.x, pos.y + t), Vec2::new(t, size.y - 2.0 * t), color);
    rect(
        out,
        Vec2::new(pos.x + size.x - t, pos.y + t),
        Vec2::new(t, size.y - 2.0 * t),
        color,
    );
}

pub fn triangle(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, c: Vec2, color: [f32; 4]) {
    out.push(Vertex::new(a.x, a.y, color));
    out.push(Vertex::new(b.x, b.y, color));
    out.push(Vertex::new(c.x, c.y, color));
}

/// Straight segment of the given width
pub fn line(out: &mut Vec<Vertex>, from: Vec2, to: Vec2, width: f32, color: [f32; 4]) {
    let dir = (to - from).normalize_or_zero();
    let perp = Vec2::new(-dir.y, dir.x) * (width / 2.0);
    quad(
        out,
        [from + perp, to + perp, to - perp, from - perp],
        [color; 4],
    );
}

/// Filled ellipse with radii `radii`, rotated by `rotation` radians
///
/// `inner` colors the centre and `outer` the rim, which gives a cheap radial
/// gradient when they differ.
pub fn ellipse(
    out: &mut Vec<Vertex>,
    center: Vec2,
    radii: Vec2,
    rotation: f32,
    inner: [f32; 4],
    outer: [f32; 4],
    segments: u32,
) {
    let rot = Vec2::from_angle(rotation);
    let point = |i: u32| {
        let theta = (i as f32 / segments as f32) * 2.0 * PI;
        let local = Vec2::new(radii.x * theta.cos(), radii.y * theta.sin());
        center + rot.rotate(local)
    };

    for i in 0..segments {
        let p1 = point(i);
        let p2 = point(i + 1);

        // Triangle from center to edge
        out.push(Vertex::new(center.x, center.y, inner));
        out.push(Vertex::new(p1.x, p1.y, outer));
        out.push(Vertex::new(p2.x, p2.y, outer));
    }
}

/// Seven-segment layout per decimal digit, segments `a` to `g`
const DIGIT_SEGMENTS: [u8; 10] = [
    0b0111111, // 0
    0b0000110, // 1
    0b1011011, // 2
    0b1001111, // 3
    0b1100110, // 4
    0b1101101, // 5
    0b1111101, // 6
    0b0000111, // 7
    0b1111111, // 8
    0b1101111, // 9
];

/// Segments lit for one digit
pub fn segments_for_digit(digit: u32) -> u8 {
    DIGIT_SEGMENTS[(digit % 10) as usize]
}

/// Draw `value` centred on `center` in seven-segment style
pub fn number(out: &mut Vec<Vertex>, value: u32, center: Vec2, height: f32, color: [f32; 4]) {
    let text = value.to_string();
    let digit_w = height * 0.5;
    let gap = height * 0.2;
    let stroke = (height * 0.12).max(1.0);
    let total = text.len() as f32 * digit_w + (text.len().saturating_sub(1)) as f32 * gap;
    let mut x = center.x - total / 2.0;
    let top = center.y - height / 2.0;

    for ch in text.chars() {
        let Some(digit) = ch.to_digit(10) else {
            continue;
        };
        let lit = segments_for_digit(digit);
        let half = height / 2.0;
        // (x, y, w, h) for a..g
        let segs = [
            (x, top, digit_w, stroke),
            (x + digit_w - stroke, top, stroke, half),
            (x + digit_w - stroke, top + half, stroke, half),
            (x, top + height - stroke, digit_w, stroke),
            (x, top + half, stroke, half),
            (x, top, stroke, half),
            (x, top + half - stroke / 2.0, digit_w, stroke),
        ];
        for (i, (sx, sy, sw, sh)) in segs.into_iter().enumerate() {
            if lit & (1 << i) != 0 {
                rect(out, Vec2::new(sx, sy), Vec2::new(sw, sh), color);
            }
        }
        x += digit_w + gap;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_corners() {
        let mut out = Vec::new();
        rect(&mut out, Vec2::new(10.0, 20.0), Vec2::new(30.0, 5.0), [1.0; 4]);
        assert_eq!(out.len(), 6);
        let xs: Vec<f32> = out.iter().map(|v| v.position[0]).collect();
        let ys: Vec<f32> = out.iter().map(|v| v.position[1]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 40.0);
        assert_eq!(ys.iter().cloned().fold(f32::MIN, f32::max), 25.0);
    }

    #[test]
    fn test_gradient_rect_colors_by_edge() {
        let mut out = Vec::new();
        let top = [1.0, 0.0, 0.0, 1.0];
        let bottom = [0.0, 0.0, 1.0, 1.0];
        gradient_rect(&mut out, Vec2::ZERO, Vec2::new(4.0, 4.0), top, bottom);
        for v in &out {
            let expected = if v.position[1] == 0.0 { top } else { bottom };
            assert_eq!(v.color, expected);
        }
    }

    #[test]
    fn test_ellipse_vertex_count_and_extent() {
        let mut out = Vec::new();
        ellipse(
            &mut out,
            Vec2::new(100.0, 100.0),
            Vec2::new(20.0, 10.0),
            0.0,
            [1.0; 4],
            [1.0; 4],
            32,
        );
        assert_eq!(out.len(), 96);
        for v in &out {
            assert!((v.position[0] - 100.0).abs() <= 20.0 + 1e-3);
            assert!((v.position[1] - 100.0).abs() <= 10.0 + 1e-3);
        }
    }

    #[test]
    fn test_rotated_ellipse_swaps_axes() {
        let mut out = Vec::new();
        ellipse(
            &mut out,
            Vec2::ZERO,
            Vec2::new(20.0, 10.0),
            PI / 2.0,
            [1.0; 4],
            [1.0; 4],
            16,
        );
        for v in &out {
            assert!(v.position[0].abs() <= 10.0 + 1e-3);
        }
    }

    #[test]
    fn test_seven_segment_digits() {
        assert_eq!(segments_for_digit(8).count_ones(), 7);
        assert_eq!(segments_for_digit(1).count_ones(), 2);
        assert_eq!(segments_for_digit(0) & (1 << 6), 0);

        let mut out = Vec::new();
        number(&mut out, 10, Vec2::new(50.0, 50.0), 16.0, [0.0, 0.0, 0.0, 1.0]);
        // "1" has 2 segments and "0" has 6
        assert_eq!(out.len(), (2 + 6) * 6);
    }

    #[test]
    fn test_line_has_width() {
        let mut out = Vec::new();
        line(&mut out, Vec2::ZERO, Vec2::new(10.0, 0.0), 4.0, [1.0; 4]);
        assert_eq!(out.len(), 6);
        let max_y = out.iter().map(|v| v.position[1]).fold(f32::MIN, f32::max);
        assert!((max_y - 2.0).abs() < 1e-5);
    }
}
