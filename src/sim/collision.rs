//! Player vs food collision detection
//!
//! Plain axis-aligned rectangles. The belly is approximated by pushing the
//! player's bottom edge down by half the belly radius.

use super::food::Food;
use super::state::Player;

/// Axis-aligned box in playfield pixels (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hitbox {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Hitbox {
    /// Strict overlap: boxes that only share an edge do not collide
    #[inline]
    pub fn overlaps(&self, other: &Hitbox) -> bool {
        self.left < other.right
            && self.right > other.left
            && self.top < other.bottom
            && self.bottom > other.top
    }
}

/// Player hitbox, stretched downward for a belly
pub fn player_hitbox(player: &Player) -> Hitbox {
    let bottom = match player.belly {
        Some(belly) => player.pos.y + player.height + belly.radius / 2.0,
        None => player.pos.y + player.height,
    };
    Hitbox {
        left: player.pos.x,
        right: player.pos.x + player.width,
        top: player.pos.y,
        bottom,
    }
}

pub fn food_hitbox(food: &Food) -> Hitbox {
    Hitbox {
        left: food.pos.x,
        right: food.pos.x + food.width,
        top: food.pos.y,
        bottom: food.pos.y + food.height,
    }
}

/// True if a visible player is touching visible food
pub fn player_food_collision(player: &Player, food: &Food) -> bool {
    if !player.visible || !food.visible {
        return false;
    }
    player_hitbox(player).overlaps(&food_hitbox(food))
}
