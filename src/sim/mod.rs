//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Time comes in as a `now` argument, never read from a clock
//! - Seeded RNG only
//! - Fixed update order (player one before player two)
//! - No rendering or platform dependencies

pub mod collision;
pub mod explosion;
pub mod food;
pub mod movement;
pub mod state;
pub mod tick;

pub use collision::{Hitbox, food_hitbox, player_food_collision, player_hitbox};
pub use explosion::{Particle, particle_palette, spawn_explosion, update_particles};
pub use food::Food;
pub use movement::{Directions, apply_movement, clamp_to_playfield};
pub use state::{
    Appearance, Belly, GameEvent, GameMode, GamePhase, GameState, Player, PlayerSlot, Rules,
};
pub use tick::{
    FoodSprite, Frame, PlayerSprite, Scene, TickInput, resolve_collision, start_explosion, tick,
};
