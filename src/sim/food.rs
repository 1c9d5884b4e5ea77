//! The shared ćevap and its freshness timer

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{FOOD_HEIGHT, FOOD_WIDTH};

/// The single collectible item both players chase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Food {
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub visible: bool,
    /// One-way until the next respawn
    pub is_rotten: bool,
    /// Timestamp (ms) of the last respawn
    pub spawned_at: f64,
}

impl Default for Food {
    fn default() -> Self {
        Self::new()
    }
}

impl Food {
    /// Hidden food at the origin; `respawn` places it
    pub fn new() -> Self {
        Self {
            pos: Vec2::ZERO,
            width: FOOD_WIDTH,
            height: FOOD_HEIGHT,
            visible: false,
            is_rotten: false,
            spawned_at: 0.0,
        }
    }

    /// Place the food uniformly at random fully inside a `w` x `h` playfield
    pub fn respawn<R: Rng>(&mut self, rng: &mut R, w: f32, h: f32, now: f64) {
        let x = rng.random::<f32>() * (w - self.width).max(0.0);
        let y = rng.random::<f32>() * (h - self.height).max(0.0);
        self.pos = Vec2::new(x, y);
        self.visible = true;
        self.is_rotten = false;
        self.spawned_at = now;
    }

    /// Rot once the time limit has elapsed. Returns true on the tick it turns.
    pub fn check_rot(&mut self, now: f64, limit: f64) -> bool {
        if self.visible && !self.is_rotten && now - self.spawned_at >= limit {
            self.is_rotten = true;
            return true;
        }
        false
    }

    /// Remaining freshness in 0..=1 (1 = just spawned)
    pub fn freshness(&self, now: f64, limit: f64) -> f32 {
        let elapsed = now - self.spawned_at;
        (1.0 - elapsed / limit).clamp(0.0, 1.0) as f32
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }
}
