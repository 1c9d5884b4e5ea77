//! Per-frame simulation tick
//!
//! One call per rendered frame. Dispatches on the match phase, applies the
//! update in a fixed order and hands back what the renderer should draw.

use glam::Vec2;

use super::collision::player_food_collision;
use super::explosion::{Particle, spawn_explosion, update_particles};
use super::movement::{Directions, apply_movement};
use super::state::{Appearance, Belly, GameEvent, GameMode, GamePhase, GameState, PlayerSlot};
use crate::Color;

/// Held directions for both players, sampled once per tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Indexed by `PlayerSlot::index`
    pub players: [Directions; 2],
}

impl TickInput {
    /// Input with only `slot` holding `held`
    pub fn single(slot: PlayerSlot, held: Directions) -> Self {
        let mut input = Self::default();
        input.players[slot.index()] = held;
        input
    }

    #[inline]
    pub fn held(&self, slot: PlayerSlot) -> Directions {
        self.players[slot.index()]
    }
}

/// A player as the renderer needs it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerSprite {
    pub slot: PlayerSlot,
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub belly: Option<Belly>,
    pub appearance: Appearance,
    pub sick: bool,
}

/// The food as the renderer needs it
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FoodSprite {
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub rotten: bool,
    /// 1.0 fresh out of the grill, 0.0 about to rot
    pub freshness: f32,
}

/// What to draw this frame
#[derive(Debug, Clone, PartialEq)]
pub enum Scene {
    /// No match running
    Menu,
    /// Phase changed mid-tick; draw nothing
    Blank,
    Field {
        food: Option<FoodSprite>,
        players: Vec<PlayerSprite>,
    },
    Explosion {
        particles: Vec<Particle>,
    },
    GameOver {
        name: String,
        score: u32,
    },
    Winner {
        slot: PlayerSlot,
        name: String,
        /// Winner's healthy body color
        color: Color,
        scores: [u32; 2],
    },
}

/// Result of one tick
#[derive(Debug, Clone)]
pub struct Frame {
    /// Phase after the update
    pub phase: GamePhase,
    pub scene: Scene,
    /// Everything that happened since the previous tick
    pub events: Vec<GameEvent>,
    /// The driver should stop scheduling ticks
    pub halted: bool,
}

/// Advance the match by one frame at wall-clock time `now` (ms)
pub fn tick(state: &mut GameState, input: &TickInput, now: f64) -> Frame {
    let (scene, halted) = match state.phase {
        GamePhase::Waiting => (Scene::Menu, true),
        GamePhase::Playing => (tick_playing(state, input, now), false),
        GamePhase::Exploding => (tick_exploding(state), false),
        GamePhase::GameOver => (game_over_scene(state), true),
        GamePhase::Winner => (winner_scene(state), true),
    };

    Frame {
        phase: state.phase,
        scene,
        events: state.drain_events(),
        halted,
    }
}

fn tick_playing(state: &mut GameState, input: &TickInput, now: f64) -> Scene {
    state.time_ticks += 1;

    if state.food.check_rot(now, state.rules.rot_time_limit_ms) {
        log::debug!("Food rotted after {:.0} ms", now - state.food.spawned_at);
        state.events.push(GameEvent::FoodRotted);
    }

    let slots = state.active_slots();
    for &slot in slots {
        let duration = state.rules.sickness_duration_ms;
        if state.player_mut(slot).check_sickness(now, duration) {
            log::debug!("{} recovered", state.player(slot).name);
            state.events.push(GameEvent::PlayerRecovered(slot));
        }
    }

    for &slot in slots {
        apply_movement(&mut state.players[slot.index()], input.held(slot), &state.rules);
    }

    // Fixed order: player one wins a same-frame tie
    let hit = slots
        .iter()
        .copied()
        .find(|&slot| player_food_collision(state.player(slot), &state.food));
    if let Some(slot) = hit {
        resolve_collision(state, slot, now);
    }

    if state.phase == GamePhase::Playing {
        field_scene(state, now)
    } else {
        Scene::Blank
    }
}

/// Apply the consequences of `slot` touching the food
pub fn resolve_collision(state: &mut GameState, slot: PlayerSlot, now: f64) {
    if state.food.is_rotten {
        state.player_mut(slot).afflict(now);
        log::debug!("{} ate a rotten ćevap", state.player(slot).name);
        state.events.push(GameEvent::PlayerSick(slot));
    } else {
        let score = state.scores[slot.index()].saturating_add(1);
        state.scores[slot.index()] = score;
        state.events.push(GameEvent::ScoreChanged { slot, score });

        if score >= state.rules.win_score {
            match state.mode {
                GameMode::Single => start_explosion(state, slot),
                GameMode::TwoPlayer => {
                    log::info!("{} wins with {}", state.player(slot).name, score);
                    state.winner = Some(slot);
                    state.set_phase(GamePhase::Winner);
                }
            }
            return;
        }
    }

    state.respawn_food(now);
}

/// Blow up `slot`: hide it and the food, fill the particle set
pub fn start_explosion(state: &mut GameState, slot: PlayerSlot) {
    let count = state.rules.explosion_particles;
    let particles = spawn_explosion(&state.players[slot.index()], count, &mut state.rng);

    state.players[slot.index()].visible = false;
    state.food.hide();
    state.particles = particles;
    state.events.push(GameEvent::ExplosionStarted {
        slot,
        particles: count,
    });
    state.set_phase(GamePhase::Exploding);
}

fn tick_exploding(state: &mut GameState) -> Scene {
    state.time_ticks += 1;

    let done = update_particles(&mut state.particles);
    let scene = Scene::Explosion {
        particles: state.particles.clone(),
    };
    if done {
        state.set_phase(GamePhase::GameOver);
    }
    scene
}

fn field_scene(state: &GameState, now: f64) -> Scene {
    let item = &state.food;
    let food = item.visible.then(|| FoodSprite {
        pos: item.pos,
        width: item.width,
        height: item.height,
        rotten: item.is_rotten,
        freshness: item.freshness(now, state.rules.rot_time_limit_ms),
    });

    let players = state
        .active_slots()
        .iter()
        .map(|&slot| (slot, state.player(slot)))
        .filter(|(_, p)| p.visible)
        .map(|(slot, p)| PlayerSprite {
            slot,
            pos: p.pos,
            width: p.width,
            height: p.height,
            belly: p.belly,
            appearance: p.appearance,
            sick: p.is_sick,
        })
        .collect();

    Scene::Field { food, players }
}

fn game_over_scene(state: &GameState) -> Scene {
    Scene::GameOver {
        name: state.player(PlayerSlot::One).name.clone(),
        score: state.score(PlayerSlot::One),
    }
}

fn winner_scene(state: &GameState) -> Scene {
    let slot = state.winner.unwrap_or(PlayerSlot::One);
    let player = state.player(slot);
    Scene::Winner {
        slot,
        name: player.name.clone(),
        color: player.appearance.body,
        scores: state.scores,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RIGHT: Directions = Directions {
        up: false,
        down: false,
        left: false,
        right: true,
    };

    fn started(mode: GameMode) -> GameState {
        let mut state = GameState::new(12345);
        state.start(mode, 0.0);
        // Park the food in a corner nobody starts near
        state.food.pos = Vec2::new(700.0, 20.0);
        state.drain_events();
        state
    }

    /// Drop the food right on top of a player
    fn feed(state: &mut GameState, slot: PlayerSlot) {
        state.food.pos = state.player(slot).pos + Vec2::new(5.0, 5.0);
    }

    #[test]
    fn test_waiting_renders_menu_and_halts() {
        let mut state = GameState::new(1);
        let frame = tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(frame.phase, GamePhase::Waiting);
        assert_eq!(frame.scene, Scene::Menu);
        assert!(frame.halted);
    }

    #[test]
    fn test_playing_renders_field() {
        let mut state = started(GameMode::TwoPlayer);
        let frame = tick(&mut state, &TickInput::default(), 16.0);
        assert!(!frame.halted);
        match frame.scene {
            Scene::Field { food, players } => {
                assert!(food.is_some());
                assert_eq!(players.len(), 2);
                assert!(players[0].belly.is_some());
                assert!(players[1].belly.is_none());
            }
            other => panic!("expected field, got {:?}", other),
        }
    }

    #[test]
    fn test_single_mode_only_draws_player_one() {
        let mut state = started(GameMode::Single);
        let frame = tick(&mut state, &TickInput::default(), 16.0);
        let Scene::Field { players, .. } = frame.scene else {
            panic!("expected field");
        };
        assert_eq!(players.len(), 1);
        assert_eq!(players[0].slot, PlayerSlot::One);
    }

    #[test]
    fn test_food_rots_at_limit() {
        // Food spawned fresh at t=0, nobody touches it
        let mut state = started(GameMode::Single);
        let frame = tick(&mut state, &TickInput::default(), 9_999.0);
        assert!(!state.food.is_rotten);
        assert!(!frame.events.contains(&GameEvent::FoodRotted));

        let frame = tick(&mut state, &TickInput::default(), 10_000.0);
        assert!(state.food.is_rotten);
        assert!(frame.events.contains(&GameEvent::FoodRotted));
    }

    #[test]
    fn test_single_player_explodes_at_win_score() {
        let mut state = started(GameMode::Single);
        state.scores[0] = 9;
        feed(&mut state, PlayerSlot::One);

        let frame = tick(&mut state, &TickInput::default(), 100.0);

        assert_eq!(state.score(PlayerSlot::One), 10);
        assert_eq!(frame.phase, GamePhase::Exploding);
        assert!(!state.player(PlayerSlot::One).visible);
        assert!(!state.food.visible);
        assert_eq!(state.particles.len(), 100);
        // Phase changed mid-frame, so nothing is drawn
        assert_eq!(frame.scene, Scene::Blank);
        assert!(frame.events.contains(&GameEvent::ExplosionStarted {
            slot: PlayerSlot::One,
            particles: 100,
        }));
    }

    #[test]
    fn test_win_threshold_is_exact() {
        let mut state = started(GameMode::Single);
        for expected in 1..=10u32 {
            feed(&mut state, PlayerSlot::One);
            let frame = tick(&mut state, &TickInput::default(), expected as f64 * 100.0);
            assert_eq!(state.score(PlayerSlot::One), expected);
            if expected < 10 {
                assert_eq!(frame.phase, GamePhase::Playing, "exploded early at {}", expected);
            } else {
                assert_eq!(frame.phase, GamePhase::Exploding);
            }
        }
    }

    #[test]
    fn test_rotten_food_makes_player_two_sick() {
        let mut state = started(GameMode::TwoPlayer);
        state.food.is_rotten = true;
        feed(&mut state, PlayerSlot::Two);
        let old_pos = state.food.pos;

        let frame = tick(&mut state, &TickInput::default(), 500.0);

        assert!(state.player(PlayerSlot::Two).is_sick);
        assert_eq!(state.player(PlayerSlot::Two).sickness_started_at, 500.0);
        assert_eq!(state.scores, [0, 0]);
        assert!(state.food.visible);
        assert!(!state.food.is_rotten);
        assert_ne!(state.food.pos, old_pos);
        assert!(frame.events.contains(&GameEvent::PlayerSick(PlayerSlot::Two)));
    }

    #[test]
    fn test_sickness_wears_off_through_tick() {
        let mut state = started(GameMode::Single);
        state.food.is_rotten = true;
        feed(&mut state, PlayerSlot::One);
        tick(&mut state, &TickInput::default(), 1_000.0);
        assert!(state.player(PlayerSlot::One).is_sick);

        // Keep the fresh food out of reach
        state.food.hide();
        tick(&mut state, &TickInput::default(), 3_999.0);
        assert!(state.player(PlayerSlot::One).is_sick);

        let frame = tick(&mut state, &TickInput::default(), 4_000.0);
        assert!(!state.player(PlayerSlot::One).is_sick);
        assert!(frame.events.contains(&GameEvent::PlayerRecovered(PlayerSlot::One)));
    }

    #[test]
    fn test_sick_player_still_moves() {
        let mut state = started(GameMode::Single);
        state.food.hide();
        state.player_mut(PlayerSlot::One).afflict(0.0);
        let start = state.player(PlayerSlot::One).pos;

        tick(&mut state, &TickInput::single(PlayerSlot::One, RIGHT), 10.0);
        assert_eq!(state.player(PlayerSlot::One).pos, start + Vec2::new(5.0, 0.0));
    }

    #[test]
    fn test_two_player_winner_freezes_input() {
        let mut state = started(GameMode::TwoPlayer);
        state.scores = [9, 7];
        feed(&mut state, PlayerSlot::One);

        let frame = tick(&mut state, &TickInput::default(), 100.0);
        assert_eq!(frame.phase, GamePhase::Winner);
        assert_eq!(state.winner, Some(PlayerSlot::One));
        assert_eq!(state.scores, [10, 7]);
        assert!(!frame.halted);

        let positions = [state.players[0].pos, state.players[1].pos];
        let input = TickInput {
            players: [RIGHT, RIGHT],
        };
        let frame = tick(&mut state, &input, 116.0);
        assert!(frame.halted);
        assert_eq!([state.players[0].pos, state.players[1].pos], positions);
        match frame.scene {
            Scene::Winner { slot, name, scores, .. } => {
                assert_eq!(slot, PlayerSlot::One);
                assert_eq!(name, "Željko Kovačević");
                assert_eq!(scores, [10, 7]);
            }
            other => panic!("expected winner screen, got {:?}", other),
        }
    }

    #[test]
    fn test_player_two_can_win() {
        let mut state = started(GameMode::TwoPlayer);
        state.scores = [3, 9];
        feed(&mut state, PlayerSlot::Two);
        tick(&mut state, &TickInput::default(), 100.0);
        assert_eq!(state.phase, GamePhase::Winner);
        assert_eq!(state.winner, Some(PlayerSlot::Two));
    }

    #[test]
    fn test_player_one_wins_same_frame_tie() {
        let mut state = started(GameMode::TwoPlayer);
        // Stack both players on the food
        state.players[1].pos = state.players[0].pos;
        feed(&mut state, PlayerSlot::One);

        tick(&mut state, &TickInput::default(), 100.0);
        assert_eq!(state.scores, [1, 0]);
    }

    #[test]
    fn test_fresh_bite_respawns_food() {
        let mut state = started(GameMode::Single);
        feed(&mut state, PlayerSlot::One);
        let frame = tick(&mut state, &TickInput::default(), 250.0);

        assert_eq!(state.scores, [1, 0]);
        assert_eq!(state.food.spawned_at, 250.0);
        assert!(frame.events.contains(&GameEvent::ScoreChanged {
            slot: PlayerSlot::One,
            score: 1,
        }));
        assert!(
            frame
                .events
                .iter()
                .any(|e| matches!(e, GameEvent::FoodRespawned { .. }))
        );
    }

    #[test]
    fn test_explosion_ends_in_game_over_on_empty_tick() {
        let mut state = started(GameMode::Single);
        state.scores[0] = 9;
        feed(&mut state, PlayerSlot::One);
        tick(&mut state, &TickInput::default(), 100.0);
        assert_eq!(state.phase, GamePhase::Exploding);

        let mut now = 100.0;
        let mut ticks = 0;
        loop {
            now += 16.0;
            ticks += 1;
            let frame = tick(&mut state, &TickInput::default(), now);
            if state.particles.is_empty() {
                assert_eq!(frame.phase, GamePhase::GameOver);
                break;
            }
            assert_eq!(frame.phase, GamePhase::Exploding);
            assert!(ticks < 200, "explosion never finished");
        }

        let frame = tick(&mut state, &TickInput::default(), now + 16.0);
        assert!(frame.halted);
        assert_eq!(
            frame.scene,
            Scene::GameOver {
                name: "Željko Kovačević".to_string(),
                score: 10,
            }
        );
    }

    #[test]
    fn test_scores_never_regress() {
        let mut state = started(GameMode::TwoPlayer);
        let mut last = state.scores;
        let mut now = 0.0;
        for i in 0..200 {
            now += 16.0;
            if i % 7 == 0 {
                feed(&mut state, PlayerSlot::Two);
            }
            if i % 11 == 0 {
                state.food.is_rotten = true;
            }
            let frame = tick(&mut state, &TickInput::default(), now);
            assert!(state.scores[0] >= last[0] && state.scores[1] >= last[1]);
            last = state.scores;
            if frame.halted {
                break;
            }
        }
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut state = started(GameMode::TwoPlayer);
        state.scores = [9, 0];
        feed(&mut state, PlayerSlot::One);
        tick(&mut state, &TickInput::default(), 100.0);
        assert!(state.phase.is_terminal());

        state.reset();
        let frame = tick(&mut state, &TickInput::default(), 200.0);
        assert_eq!(frame.phase, GamePhase::Waiting);
        assert!(state.winner.is_none());

        state.start(GameMode::Single, 300.0);
        let frame = tick(&mut state, &TickInput::default(), 316.0);
        assert_eq!(frame.phase, GamePhase::Playing);
        assert_eq!(state.scores, [0, 0]);
    }

    #[test]
    fn test_determinism() {
        // Two states with same seed should produce identical results
        let mut state1 = GameState::new(99999);
        let mut state2 = GameState::new(99999);
        state1.start(GameMode::Single, 0.0);
        state2.start(GameMode::Single, 0.0);
        assert_eq!(state1.food.pos, state2.food.pos);

        let mut now = 0.0;
        for round in 0..10 {
            now += 100.0;
            let held = if round % 2 == 0 { RIGHT } else { Directions::NONE };
            let input = TickInput::single(PlayerSlot::One, held);
            feed(&mut state1, PlayerSlot::One);
            feed(&mut state2, PlayerSlot::One);
            tick(&mut state1, &input, now);
            tick(&mut state2, &input, now);
            assert_eq!(state1.food.pos, state2.food.pos);
        }

        assert_eq!(state1.phase, GamePhase::Exploding);
        assert_eq!(state1.particles, state2.particles);
    }
}
