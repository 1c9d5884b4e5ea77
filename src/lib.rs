//! Ćevap Chase - catch the ćevap before it rots
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, collisions, match state)
//! - `input`: Key bindings and held-key snapshots
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Data-driven rules and display preferences

pub mod error;
pub mod input;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use input::{Control, Controls, KeyBindings};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Playfield size in canvas pixels
    pub const PLAYFIELD_WIDTH: f32 = 800.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Food stays fresh this long after spawning (ms)
    pub const ROT_TIME_LIMIT_MS: f64 = 10_000.0;
    /// Eating rotten food makes a player sick for this long (ms)
    pub const SICKNESS_DURATION_MS: f64 = 3_000.0;
    /// Score that wins a 1v1 match or blows up the single player
    pub const WIN_SCORE: u32 = 10;

    /// Food geometry
    pub const FOOD_WIDTH: f32 = 20.0;
    pub const FOOD_HEIGHT: f32 = 10.0;

    /// Player movement per tick (pixels)
    pub const PLAYER_SPEED: f32 = 5.0;

    /// Explosion defaults
    pub const EXPLOSION_PARTICLES: usize = 100;
    pub const PARTICLE_MIN_RADIUS: f32 = 2.0;
    pub const PARTICLE_MAX_RADIUS: f32 = 7.0;
    pub const PARTICLE_MIN_SPEED: f32 = 1.0;
    pub const PARTICLE_MAX_SPEED: f32 = 5.0;
    pub const PARTICLE_MIN_DECAY: f32 = 0.01;
    pub const PARTICLE_MAX_DECAY: f32 = 0.02;
}

/// RGBA color, components in 0..=1
pub type Color = [f32; 4];

/// Named colors shared by the simulation (particle palette) and the renderer
pub mod palette {
    use super::Color;

    /// Build an opaque color from 8-bit channels
    pub const fn rgb(r: u8, g: u8, b: u8) -> Color {
        [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
    }

    pub const RED: Color = rgb(255, 0, 0);
    pub const ORANGE: Color = rgb(255, 165, 0);
    pub const YELLOW: Color = rgb(255, 255, 0);
    pub const DARK_RED: Color = rgb(139, 0, 0);
    pub const BLUE: Color = rgb(0, 0, 255);
    pub const LIGHT_BLUE: Color = rgb(173, 216, 230);
    pub const DARK_OLIVE_GREEN: Color = rgb(85, 107, 47);
    pub const LIGHT_GREEN: Color = rgb(144, 238, 144);
    pub const DARK_SEA_GREEN: Color = rgb(143, 188, 143);
    pub const DARK_GREEN: Color = rgb(0, 100, 0);
    pub const BLACK: Color = rgb(0, 0, 0);
    pub const LIGHT_CORAL: Color = rgb(240, 128, 128);
    pub const MEDIUM_SEA_GREEN: Color = rgb(60, 179, 113);
    /// Fresh ćevap brown
    pub const FOOD_FRESH: Color = rgb(0x8B, 0x45, 0x13);
    /// Rotten ćevap
    pub const FOOD_ROTTEN: Color = rgb(0x55, 0x6B, 0x2F);

    /// Same color with a different alpha
    #[inline]
    pub fn with_alpha(color: Color, alpha: f32) -> Color {
        [color[0], color[1], color[2], alpha]
    }
}
