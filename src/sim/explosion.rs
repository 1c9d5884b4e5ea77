//! Explosion particles for the single player finale

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Player;
use crate::consts::*;
use crate::{Color, palette};

/// A particle for the explosion effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Pixels per tick
    pub vel: Vec2,
    pub radius: f32,
    pub color: Color,
    /// 1.0 at spawn, removed at <= 0
    pub alpha: f32,
    /// Alpha lost per tick
    pub decay: f32,
}

impl Particle {
    /// Advance one tick
    #[inline]
    pub fn step(&mut self) {
        self.pos += self.vel;
        self.alpha -= self.decay;
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.alpha > 0.0
    }
}

/// Colors a player can burst into. Sick colors only join while sick.
pub fn particle_palette(player: &Player) -> Vec<Color> {
    let look = &player.appearance;
    let mut colors = vec![palette::RED, palette::ORANGE, palette::YELLOW, palette::DARK_RED];
    colors.push(look.body);
    colors.extend(look.belly);
    if player.is_sick {
        colors.push(look.sick_body);
        colors.extend(look.sick_belly);
    }
    colors
}

/// Spawn `count` particles at the player's visual center
pub fn spawn_explosion<R: Rng>(player: &Player, count: usize, rng: &mut R) -> Vec<Particle> {
    let center = player.visual_center();
    let colors = particle_palette(player);

    (0..count)
        .map(|_| {
            let radius = rng.random_range(PARTICLE_MIN_RADIUS..PARTICLE_MAX_RADIUS);
            let speed = rng.random_range(PARTICLE_MIN_SPEED..PARTICLE_MAX_SPEED);
            let angle = rng.random_range(0.0..TAU);
            let color = colors[rng.random_range(0..colors.len())];
            Particle {
                pos: center,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                radius,
                color,
                alpha: 1.0,
                decay: rng.random_range(PARTICLE_MIN_DECAY..PARTICLE_MAX_DECAY),
            }
        })
        .collect()
}

/// Step all particles and drop the faded ones. Returns true once none are left.
pub fn update_particles(particles: &mut Vec<Particle>) -> bool {
    for particle in particles.iter_mut() {
        particle.step();
    }
    particles.retain(Particle::is_alive);
    particles.is_empty()
}
