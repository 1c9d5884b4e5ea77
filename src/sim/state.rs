//! Match state and core entity types
//!
//! Everything a match needs lives in [`GameState`]; nothing is global.

use std::fmt;
use std::str::FromStr;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::explosion::Particle;
use super::food::Food;
use crate::consts::*;
use crate::error::{Error, Result};
use crate::palette;
use crate::Color;

/// Which of the two players
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub const ALL: [PlayerSlot; 2] = [PlayerSlot::One, PlayerSlot::Two];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerSlot::One => 0,
            PlayerSlot::Two => 1,
        }
    }
}

/// Match mode, chosen from the menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GameMode {
    /// One player; reaching the win score ends in an explosion
    #[default]
    Single,
    /// 1v1 race to the win score
    TwoPlayer,
}

impl GameMode {
    /// Slots taking part in a match of this mode, in evaluation order
    pub fn active_slots(self) -> &'static [PlayerSlot] {
        match self {
            GameMode::Single => &[PlayerSlot::One],
            GameMode::TwoPlayer => &PlayerSlot::ALL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameMode::Single => "single",
            GameMode::TwoPlayer => "1v1",
        }
    }
}

impl FromStr for GameMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "single" | "singleplayer" | "1p" => Ok(GameMode::Single),
            "1v1" | "two" | "twoplayer" | "2p" => Ok(GameMode::TwoPlayer),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Menu shown, no match running
    Waiting,
    /// Active gameplay
    Playing,
    /// Single player blew up, particles still flying
    Exploding,
    /// Single player run over
    GameOver,
    /// 1v1 decided
    Winner,
}

impl GamePhase {
    /// Terminal phases are only left by an explicit start/reset
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Winner)
    }
}

impl fmt::Display for GamePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GamePhase::Waiting => "waiting",
            GamePhase::Playing => "playing",
            GamePhase::Exploding => "exploding",
            GamePhase::GameOver => "gameOver",
            GamePhase::Winner => "winner",
        };
        f.write_str(name)
    }
}

/// Circular belly drawn over the lower part of a player's body.
/// Also stretches the hitbox and the bottom boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Belly {
    pub radius: f32,
}

impl Belly {
    /// Belly center measured from the top of the body
    #[inline]
    pub fn center_offset(&self, body_height: f32) -> f32 {
        body_height / 1.5
    }

    /// How far the belly reaches below the body rectangle
    #[inline]
    pub fn bottom_margin(&self, body_height: f32) -> f32 {
        self.radius - self.center_offset(body_height)
    }
}

/// Player colors, healthy and sick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Appearance {
    pub body: Color,
    pub belly: Option<Color>,
    pub sick_body: Color,
    pub sick_belly: Option<Color>,
}

/// A player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Top-left corner of the body rectangle
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub belly: Option<Belly>,
    /// Pixels per tick per held direction
    pub speed: f32,
    pub appearance: Appearance,
    pub visible: bool,
    pub is_sick: bool,
    /// Timestamp (ms) of the last rotten bite
    pub sickness_started_at: f64,
}

impl Player {
    /// Željko: arrow keys, big belly
    pub fn one(rules: &Rules) -> Self {
        let mut player = Self {
            name: "Željko Kovačević".to_string(),
            pos: Vec2::ZERO,
            width: 50.0,
            height: 50.0,
            belly: Some(Belly { radius: 35.0 }),
            speed: PLAYER_SPEED,
            appearance: Appearance {
                body: palette::BLUE,
                belly: Some(palette::LIGHT_BLUE),
                sick_body: palette::DARK_OLIVE_GREEN,
                sick_belly: Some(palette::LIGHT_GREEN),
            },
            visible: true,
            is_sick: false,
            sickness_started_at: 0.0,
        };
        player.pos = player.home(PlayerSlot::One, rules);
        player
    }

    /// Davor: WASD, tall and thin
    pub fn two(rules: &Rules) -> Self {
        let mut player = Self {
            name: "Davor Cafuta".to_string(),
            pos: Vec2::ZERO,
            width: 40.0,
            height: 60.0,
            belly: None,
            speed: PLAYER_SPEED,
            appearance: Appearance {
                body: palette::RED,
                belly: None,
                sick_body: palette::DARK_SEA_GREEN,
                sick_belly: None,
            },
            visible: true,
            is_sick: false,
            sickness_started_at: 0.0,
        };
        player.pos = player.home(PlayerSlot::Two, rules);
        player
    }

    /// Start position for a slot: left quarter for one, right quarter for two
    pub fn home(&self, slot: PlayerSlot, rules: &Rules) -> Vec2 {
        let (w, h) = (rules.playfield_width, rules.playfield_height);
        match slot {
            PlayerSlot::One => Vec2::new(w / 4.0, h / 2.0 - 40.0),
            PlayerSlot::Two => Vec2::new(w / 4.0 * 3.0 - self.width, h / 2.0 - self.height / 2.0),
        }
    }

    /// Put the player back home, visible and healthy
    pub fn respawn(&mut self, slot: PlayerSlot, rules: &Rules) {
        self.pos = self.home(slot, rules);
        self.visible = true;
        self.is_sick = false;
        self.sickness_started_at = 0.0;
    }

    /// Bottom of the drawn figure relative to `pos.y + height`
    #[inline]
    pub fn bottom_margin(&self) -> f32 {
        self.belly
            .map(|b| b.bottom_margin(self.height))
            .unwrap_or(0.0)
    }

    /// Visual center (belly center when there is one)
    pub fn visual_center(&self) -> Vec2 {
        let dy = match self.belly {
            Some(belly) => belly.center_offset(self.height),
            None => self.height / 2.0,
        };
        Vec2::new(self.pos.x + self.width / 2.0, self.pos.y + dy)
    }

    /// Mark sick as of `now`
    pub fn afflict(&mut self, now: f64) {
        self.is_sick = true;
        self.sickness_started_at = now;
    }

    /// Clear sickness once it has run its course. Returns true on recovery.
    pub fn check_sickness(&mut self, now: f64, duration: f64) -> bool {
        if self.is_sick && now - self.sickness_started_at >= duration {
            self.is_sick = false;
            return true;
        }
        false
    }
}

/// Tunable match rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub rot_time_limit_ms: f64,
    pub sickness_duration_ms: f64,
    pub win_score: u32,
    pub explosion_particles: usize,
}

impl Default for Rules {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,
            rot_time_limit_ms: ROT_TIME_LIMIT_MS,
            sickness_duration_ms: SICKNESS_DURATION_MS,
            win_score: WIN_SCORE,
            explosion_particles: EXPLOSION_PARTICLES,
        }
    }
}

impl Rules {
    /// Reject rules the simulation cannot keep its invariants under
    pub fn validate(&self) -> Result<()> {
        let (w, h) = (self.playfield_width, self.playfield_height);
        if !w.is_finite() || !h.is_finite() {
            return Err(Error::InvalidRules("playfield size must be finite".into()));
        }

        // Every entity has to fit inside the playfield
        let roster = [Player::one(self), Player::two(self)];
        let need_w = roster
            .iter()
            .map(|p| p.width)
            .fold(FOOD_WIDTH, f32::max);
        let need_h = roster
            .iter()
            .map(|p| p.height + p.bottom_margin())
            .fold(FOOD_HEIGHT, f32::max);
        if w < need_w || h < need_h {
            return Err(Error::InvalidRules(format!(
                "playfield {}x{} is smaller than the largest entity ({}x{})",
                w, h, need_w, need_h
            )));
        }

        if !(self.rot_time_limit_ms > 0.0) {
            return Err(Error::InvalidRules("rot time limit must be positive".into()));
        }
        if !(self.sickness_duration_ms > 0.0) {
            return Err(Error::InvalidRules("sickness duration must be positive".into()));
        }
        if self.win_score == 0 {
            return Err(Error::InvalidRules("win score must be at least 1".into()));
        }
        if self.explosion_particles == 0 {
            return Err(Error::InvalidRules("explosion needs at least one particle".into()));
        }
        Ok(())
    }
}

/// Notifications for the score/HUD display
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    ScoreChanged { slot: PlayerSlot, score: u32 },
    FoodRotted,
    FoodRespawned { pos: Vec2 },
    PlayerSick(PlayerSlot),
    PlayerRecovered(PlayerSlot),
    ExplosionStarted { slot: PlayerSlot, particles: usize },
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub rules: Rules,
    pub mode: GameMode,
    pub phase: GamePhase,
    /// Indexed by `PlayerSlot::index`
    pub players: [Player; 2],
    pub scores: [u32; 2],
    /// Set only in `Winner`
    pub winner: Option<PlayerSlot>,
    /// The one shared ćevap
    pub food: Food,
    /// Live explosion particles
    pub particles: Vec<Particle>,
    /// Ticks run since the last start
    pub time_ticks: u64,
    /// Food placement and particle RNG
    pub(crate) rng: Pcg32,
    /// Events raised since the last tick drained them
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// New state with default rules, waiting in the menu
    pub fn new(seed: u64) -> Self {
        Self::build(seed, Rules::default())
    }

    /// New state with custom rules
    pub fn with_rules(seed: u64, rules: Rules) -> Result<Self> {
        rules.validate()?;
        Ok(Self::build(seed, rules))
    }

    fn build(seed: u64, rules: Rules) -> Self {
        let players = [Player::one(&rules), Player::two(&rules)];
        Self {
            seed,
            mode: GameMode::Single,
            phase: GamePhase::Waiting,
            players,
            scores: [0; 2],
            winner: None,
            food: Food::new(),
            particles: Vec::new(),
            time_ticks: 0,
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            rules,
        }
    }

    /// Start a fresh match in `mode` at time `now` (ms)
    pub fn start(&mut self, mode: GameMode, now: f64) {
        self.mode = mode;
        self.scores = [0; 2];
        self.winner = None;
        self.particles.clear();
        self.time_ticks = 0;
        for slot in PlayerSlot::ALL {
            self.players[slot.index()].respawn(slot, &self.rules);
        }
        self.respawn_food(now);
        log::info!("Match started: {} (seed {})", mode.as_str(), self.seed);
        self.set_phase(GamePhase::Playing);
    }

    /// Back to the menu without reloading anything
    pub fn reset(&mut self) {
        self.scores = [0; 2];
        self.winner = None;
        self.particles.clear();
        self.time_ticks = 0;
        for slot in PlayerSlot::ALL {
            self.players[slot.index()].respawn(slot, &self.rules);
        }
        self.food.hide();
        self.set_phase(GamePhase::Waiting);
    }

    #[inline]
    pub fn player(&self, slot: PlayerSlot) -> &Player {
        &self.players[slot.index()]
    }

    #[inline]
    pub fn player_mut(&mut self, slot: PlayerSlot) -> &mut Player {
        &mut self.players[slot.index()]
    }

    #[inline]
    pub fn score(&self, slot: PlayerSlot) -> u32 {
        self.scores[slot.index()]
    }

    /// Slots taking part in the current match
    #[inline]
    pub fn active_slots(&self) -> &'static [PlayerSlot] {
        self.mode.active_slots()
    }

    /// Move the food somewhere new, fresh
    pub(crate) fn respawn_food(&mut self, now: f64) {
        self.food.respawn(
            &mut self.rng,
            self.rules.playfield_width,
            self.rules.playfield_height,
            now,
        );
        log::debug!("Food respawned at ({:.1}, {:.1})", self.food.pos.x, self.food.pos.y);
        self.events.push(GameEvent::FoodRespawned { pos: self.food.pos });
    }

    pub(crate) fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        if from == to {
            return;
        }
        log::info!("Phase {} -> {}", from, to);
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_waits_in_menu() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Waiting);
        assert_eq!(state.scores, [0, 0]);
        assert!(state.winner.is_none());
        assert!(!state.food.visible);
    }

    #[test]
    fn test_start_resets_match() {
        let mut state = GameState::new(7);
        state.scores = [4, 6];
        state.players[0].pos = Vec2::new(3.0, 3.0);
        state.players[1].afflict(10.0);
        state.players[0].visible = false;

        state.start(GameMode::TwoPlayer, 500.0);

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.mode, GameMode::TwoPlayer);
        assert_eq!(state.scores, [0, 0]);
        assert_eq!(state.players[0].pos, Vec2::new(200.0, 260.0));
        assert_eq!(state.players[1].pos, Vec2::new(560.0, 270.0));
        assert!(state.players.iter().all(|p| p.visible && !p.is_sick));
        assert!(state.food.visible);
        assert!(!state.food.is_rotten);
        assert_eq!(state.food.spawned_at, 500.0);
    }

    #[test]
    fn test_start_raises_phase_event() {
        let mut state = GameState::new(7);
        state.start(GameMode::Single, 0.0);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::PhaseChanged {
            from: GamePhase::Waiting,
            to: GamePhase::Playing,
        }));
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_reset_returns_to_waiting() {
        let mut state = GameState::new(7);
        state.start(GameMode::Single, 0.0);
        state.scores[0] = 5;
        state.reset();
        assert_eq!(state.phase, GamePhase::Waiting);
        assert_eq!(state.scores, [0, 0]);
        assert!(!state.food.visible);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("single".parse::<GameMode>().unwrap(), GameMode::Single);
        assert_eq!("1v1".parse::<GameMode>().unwrap(), GameMode::TwoPlayer);
        assert_eq!("TwoPlayer".parse::<GameMode>().unwrap(), GameMode::TwoPlayer);
        assert!(matches!(
            "3v3".parse::<GameMode>(),
            Err(Error::UnknownMode(m)) if m == "3v3"
        ));
    }

    #[test]
    fn test_active_slots() {
        assert_eq!(GameMode::Single.active_slots(), &[PlayerSlot::One]);
        assert_eq!(
            GameMode::TwoPlayer.active_slots(),
            &[PlayerSlot::One, PlayerSlot::Two]
        );
    }

    #[test]
    fn test_belly_geometry() {
        let rules = Rules::default();
        let p1 = Player::one(&rules);
        let margin = p1.bottom_margin();
        assert!((margin - (35.0 - 50.0 / 1.5)).abs() < 1e-5);
        let center = p1.visual_center();
        assert!((center.y - (p1.pos.y + 50.0 / 1.5)).abs() < 1e-5);

        let p2 = Player::two(&rules);
        assert_eq!(p2.bottom_margin(), 0.0);
        assert_eq!(p2.visual_center(), p2.pos + Vec2::new(20.0, 30.0));
    }

    #[test]
    fn test_sickness_expires_exactly_on_time() {
        let mut player = Player::two(&Rules::default());
        player.afflict(1_000.0);
        assert!(!player.check_sickness(3_999.9, SICKNESS_DURATION_MS));
        assert!(player.is_sick);
        assert!(player.check_sickness(4_000.0, SICKNESS_DURATION_MS));
        assert!(!player.is_sick);
        // Already healthy, nothing to report
        assert!(!player.check_sickness(9_000.0, SICKNESS_DURATION_MS));
    }

    #[test]
    fn test_rules_validation() {
        assert!(Rules::default().validate().is_ok());

        let tiny = Rules {
            playfield_width: 30.0,
            ..Rules::default()
        };
        assert!(matches!(tiny.validate(), Err(Error::InvalidRules(_))));

        let no_win = Rules {
            win_score: 0,
            ..Rules::default()
        };
        assert!(no_win.validate().is_err());

        let never_rots = Rules {
            rot_time_limit_ms: 0.0,
            ..Rules::default()
        };
        assert!(never_rots.validate().is_err());

        let nan = Rules {
            sickness_duration_ms: f64::NAN,
            ..Rules::default()
        };
        assert!(nan.validate().is_err());

        assert!(GameState::with_rules(1, tiny).is_err());
    }
}
