//! Scene tessellation
//!
//! Turns the per-frame [`Scene`] into a triangle list in playfield pixels.
//! Text (end-screen captions, scores) lives in the HTML overlay, not here.

use std::f32::consts::PI;

use glam::Vec2;

use super::shapes;
use super::vertex::{Vertex, colors};
use crate::palette;
use crate::settings::Settings;
use crate::sim::{FoodSprite, Particle, PlayerSprite, Rules, Scene};

/// Eye square side (pixels)
const EYE_SIZE: f32 = 5.0;
/// Mouth line thickness (pixels)
const MOUTH_THICKNESS: f32 = 2.0;
/// Freshness bar sits this far above the food
const BAR_OFFSET: f32 = 5.0;
const BAR_HEIGHT: f32 = 3.0;

/// Build the triangle list for one frame
pub fn build_vertices(scene: &Scene, settings: &Settings, rules: &Rules) -> Vec<Vertex> {
    let segments = settings.quality.circle_segments();
    let full = Vec2::new(rules.playfield_width, rules.playfield_height);
    let mut vertices = Vec::new();

    match scene {
        Scene::Menu | Scene::Blank => {}
        Scene::Field { food, players } => {
            if let Some(food) = food {
                vertices.extend(food_vertices(food, settings.freshness_bar));
            }
            for player in players {
                vertices.extend(player_vertices(player, segments));
            }
        }
        Scene::Explosion { particles } => {
            if settings.particles {
                vertices.extend(particle_vertices(particles, segments));
            }
        }
        Scene::GameOver { .. } => {
            vertices.extend(shapes::rect(Vec2::ZERO, full, colors::GAME_OVER_OVERLAY));
        }
        Scene::Winner { color, .. } => {
            let overlay = palette::with_alpha(*color, colors::WINNER_OVERLAY_ALPHA);
            vertices.extend(shapes::rect(Vec2::ZERO, full, overlay));
        }
    }

    vertices
}

/// Body, belly, eyes and mouth
pub fn player_vertices(player: &PlayerSprite, segments: u32) -> Vec<Vertex> {
    let look = &player.appearance;
    let (body, belly_color, face) = if player.sick {
        (look.sick_body, look.sick_belly.or(look.belly), colors::FACE_SICK)
    } else {
        (look.body, look.belly, colors::FACE)
    };

    let size = Vec2::new(player.width, player.height);
    let mut vertices = shapes::rect(player.pos, size, body);

    if let (Some(belly), Some(color)) = (player.belly, belly_color) {
        let center = player.pos
            + Vec2::new(player.width / 2.0, belly.center_offset(player.height));
        vertices.extend(shapes::circle(center, belly.radius, color, segments));
    }

    let eye = Vec2::splat(EYE_SIZE);
    let eye_y = player.pos.y + player.height * 0.2;
    vertices.extend(shapes::rect(
        Vec2::new(player.pos.x + player.width * 0.3, eye_y),
        eye,
        face,
    ));
    vertices.extend(shapes::rect(
        Vec2::new(player.pos.x + player.width * 0.6, eye_y),
        eye,
        face,
    ));

    let mouth_radius = player.width * 0.2;
    let mouth = Vec2::new(
        player.pos.x + player.width / 2.0,
        player.pos.y + player.height * 0.6,
    );
    let mouth_segments = (segments / 2).max(4);
    if player.sick {
        // Frown: upper half, dropped a little
        vertices.extend(shapes::arc_stroke(
            mouth + Vec2::new(0.0, mouth_radius * 0.5),
            mouth_radius,
            PI,
            2.0 * PI,
            MOUTH_THICKNESS,
            face,
            mouth_segments,
        ));
    } else {
        vertices.extend(shapes::arc_stroke(
            mouth,
            mouth_radius,
            0.0,
            PI,
            MOUTH_THICKNESS,
            face,
            mouth_segments,
        ));
    }

    vertices
}

/// Food rectangle, plus the freshness bar while it is still fresh
pub fn food_vertices(food: &FoodSprite, freshness_bar: bool) -> Vec<Vertex> {
    let color = if food.rotten {
        palette::FOOD_ROTTEN
    } else {
        palette::FOOD_FRESH
    };
    let mut vertices = shapes::rect(food.pos, Vec2::new(food.width, food.height), color);

    if freshness_bar && !food.rotten && food.freshness > 0.0 {
        vertices.extend(shapes::bar(
            food.pos - Vec2::new(0.0, BAR_OFFSET),
            Vec2::new(food.width, BAR_HEIGHT),
            food.freshness,
            colors::BAR_TRACK,
            colors::BAR_FILL,
        ));
    }

    vertices
}

/// One circle per live particle, at its current alpha
pub fn particle_vertices(particles: &[Particle], segments: u32) -> Vec<Vertex> {
    let segments = (segments / 2).max(6);
    particles
        .iter()
        .filter(|p| p.is_alive())
        .flat_map(|p| {
            let color = palette::with_alpha(p.color, p.alpha);
            shapes::circle(p.pos, p.radius, color, segments)
        })
        .collect()
}
