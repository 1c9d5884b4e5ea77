//! Player movement and playfield bounds

use serde::{Deserialize, Serialize};

use super::state::{Player, Rules};

/// Directions a player is holding this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Directions {
    pub const NONE: Directions = Directions {
        up: false,
        down: false,
        left: false,
        right: false,
    };

    pub fn any(&self) -> bool {
        self.up || self.down || self.left || self.right
    }
}

/// Step the player by `speed` per held direction, then clamp.
/// Diagonals are intentionally not normalized.
pub fn apply_movement(player: &mut Player, held: Directions, rules: &Rules) {
    if held.up {
        player.pos.y -= player.speed;
    }
    if held.down {
        player.pos.y += player.speed;
    }
    if held.left {
        player.pos.x -= player.speed;
    }
    if held.right {
        player.pos.x += player.speed;
    }

    clamp_to_playfield(player, rules.playfield_width, rules.playfield_height);
}

/// Keep the body (and belly) inside a `w` x `h` playfield
pub fn clamp_to_playfield(player: &mut Player, w: f32, h: f32) {
    let max_x = (w - player.width).max(0.0);
    let max_y = (h - player.height - player.bottom_margin()).max(0.0);

    // min/max instead of clamp: never panics and flushes NaN to the bounds
    player.pos.x = player.pos.x.min(max_x).max(0.0);
    player.pos.y = player.pos.y.min(max_y).max(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;

    fn held(up: bool, down: bool, left: bool, right: bool) -> Directions {
        Directions { up, down, left, right }
    }

    #[test]
    fn test_single_direction_moves_by_speed() {
        let rules = Rules::default();
        let mut player = Player::two(&rules);
        let start = player.pos;

        apply_movement(&mut player, held(false, false, false, true), &rules);
        assert_eq!(player.pos, start + Vec2::new(5.0, 0.0));

        apply_movement(&mut player, held(true, false, false, false), &rules);
        assert_eq!(player.pos, start + Vec2::new(5.0, -5.0));
    }

    #[test]
    fn test_diagonal_is_not_normalized() {
        let rules = Rules::default();
        let mut player = Player::two(&rules);
        let start = player.pos;
        apply_movement(&mut player, held(false, true, false, true), &rules);
        assert_eq!(player.pos - start, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn test_opposite_directions_cancel() {
        let rules = Rules::default();
        let mut player = Player::two(&rules);
        let start = player.pos;
        apply_movement(&mut player, held(true, true, true, true), &rules);
        assert_eq!(player.pos, start);
    }

    #[test]
    fn test_clamps_to_left_and_top() {
        let rules = Rules::default();
        let mut player = Player::two(&rules);
        player.pos = Vec2::new(2.0, 3.0);
        apply_movement(&mut player, held(true, false, true, false), &rules);
        assert_eq!(player.pos, Vec2::ZERO);
    }

    #[test]
    fn test_bottom_boundary_accounts_for_belly() {
        let rules = Rules::default();
        let mut p1 = Player::one(&rules);
        p1.pos = Vec2::new(790.0, 599.0);
        apply_movement(&mut p1, held(false, true, false, true), &rules);

        let expected_y = 600.0 - 50.0 - (35.0 - 50.0 / 1.5);
        assert_eq!(p1.pos.x, 750.0);
        assert!((p1.pos.y - expected_y).abs() < 1e-4);

        let mut p2 = Player::two(&rules);
        p2.pos = Vec2::new(790.0, 599.0);
        apply_movement(&mut p2, held(false, true, false, true), &rules);
        assert_eq!(p2.pos, Vec2::new(760.0, 540.0));
    }

    #[test]
    fn test_clamp_recovers_from_nan() {
        let rules = Rules::default();
        let mut player = Player::two(&rules);
        player.pos = Vec2::new(f32::NAN, f32::NAN);
        clamp_to_playfield(&mut player, 800.0, 600.0);
        assert!(player.pos.x.is_finite() && player.pos.y.is_finite());
    }
}
