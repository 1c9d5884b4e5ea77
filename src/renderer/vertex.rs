//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

use crate::Color;

/// Simple 2D vertex with position (playfield pixels) and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: Color) -> Self {
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

/// Colors for screen elements that aren't part of the simulation palette
pub mod colors {
    use crate::palette;
    use crate::Color;

    /// Canvas clear color
    pub const BACKGROUND: Color = palette::rgb(245, 240, 225);
    /// Eyes and mouth
    pub const FACE: Color = palette::BLACK;
    pub const FACE_SICK: Color = palette::DARK_GREEN;
    /// Freshness bar
    pub const BAR_TRACK: Color = palette::LIGHT_CORAL;
    pub const BAR_FILL: Color = palette::MEDIUM_SEA_GREEN;
    /// Single player end overlay
    pub const GAME_OVER_OVERLAY: Color = [0.0, 0.0, 0.0, 0.7];
    /// Alpha of the winner's color over the field
    pub const WINNER_OVERLAY_ALPHA: f32 = 0.8;
}
