//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
///
/// Scene code works in playfield pixels; the render state maps them to NDC
/// just before upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for game elements (sRGB, straight alpha)
pub mod colors {
    use crate::sim::Archetype;

    pub const BACKGROUND_TOP: [f32; 4] = [0.635, 0.502, 0.851, 1.0];
    pub const BACKGROUND_BOTTOM: [f32; 4] = [0.337, 0.188, 0.694, 1.0];
    pub const OUTLINE: [f32; 4] = [0.2, 0.2, 0.2, 1.0];

    pub const STONE: [f32; 4] = [0.545, 0.533, 0.514, 1.0];
    pub const STONE_SPECK: [f32; 4] = [0.125, 0.122, 0.122, 0.2];
    pub const WOOD: [f32; 4] = [0.725, 0.396, 0.161, 1.0];
    pub const WOOD_GRAIN: [f32; 4] = [0.196, 0.102, 0.008, 0.6];
    pub const WOOD_KNOT: [f32; 4] = [0.212, 0.133, 0.051, 0.9];
    pub const ICE: [f32; 4] = [0.678, 0.847, 0.902, 1.0];
    pub const ICE_SHEEN: [f32; 4] = [0.357, 0.671, 0.773, 0.6];
    pub const ICE_FLAKE: [f32; 4] = [1.0, 1.0, 1.0, 0.99];
    pub const METAL: [f32; 4] = [0.690, 0.769, 0.871, 1.0];
    pub const METAL_TOP: [f32; 4] = [1.0, 0.988, 0.988, 0.93];
    pub const METAL_BOTTOM: [f32; 4] = [0.0, 0.0, 0.0, 0.73];
    pub const RIVET: [f32; 4] = [0.314, 0.314, 0.314, 0.81];
    pub const SPIKE: [f32; 4] = [0.333, 0.333, 0.333, 1.0];
    pub const GLASS: [f32; 4] = [1.0, 1.0, 1.0, 0.18];
    pub const GLASS_TOP: [f32; 4] = [1.0, 1.0, 1.0, 0.4];
    pub const GLASS_BOTTOM: [f32; 4] = [0.784, 0.941, 1.0, 0.3];
    pub const GLASS_GLINT: [f32; 4] = [1.0, 1.0, 1.0, 0.6];
    pub const GLASS_CRACK: [f32; 4] = [0.353, 0.490, 0.502, 1.0];

    pub const MARKER: [f32; 4] = [1.0, 0.843, 0.0, 1.0];
    pub const MARKER_INK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    pub const BALL: [f32; 4] = [0.133, 0.545, 0.133, 1.0];
    pub const BALL_HIGHLIGHT: [f32; 4] = [0.827, 0.992, 0.741, 1.0];
    pub const BALL_CROSS: [f32; 4] = [0.0, 0.392, 0.0, 1.0];
    pub const SHADOW: [f32; 4] = [0.0, 0.0, 0.0, 0.3];

    /// Base fill for a platform material
    pub fn archetype(archetype: Archetype) -> [f32; 4] {
        match archetype {
            Archetype::Stone => STONE,
            Archetype::Wood => WOOD,
            Archetype::Ice => ICE,
            Archetype::Metal => METAL,
            Archetype::Glass => GLASS,
        }
    }

    /// HSL (hue in degrees) to sRGB
    pub fn hsl(hue: f32, saturation: f32, lightness: f32, alpha: f32) -> [f32; 4] {
        let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
        let h = hue.rem_euclid(360.0) / 60.0;
        let x = c * (1.0 - (h % 2.0 - 1.0).abs());
        let (r, g, b) = match h as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };
        let m = lightness - c / 2.0;
        [r + m, g + m, b + m, alpha]
    }
}
