//! Session simulation state
//!
//! Everything one running sub-game owns: the input buffer, score, active
//! group and the live entity collections. Entities are kept in plain vectors
//! in spawn order and referred to by id.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::entities::{FlyingWord, Plane, Projectile};
use super::particles::{ExplosionParticle, TrailParticle, WindParticle};
use crate::consts::*;
use crate::deck::Card;

/// Entity identifier, unique within a session
pub type EntityId = u32;

/// Playfield dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Vertical band clear of the score panel and input bar
    pub fn safe_band(&self) -> (f32, f32) {
        let top = SAFE_TOP;
        let bottom = (self.height - SAFE_BOTTOM).max(top);
        (top, bottom)
    }

    pub fn clamp_to_safe_band(&self, y: f32) -> f32 {
        let (top, bottom) = self.safe_band();
        y.clamp(top, bottom)
    }

    /// Uniform height inside the safe band
    pub fn random_safe_y<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        let (top, bottom) = self.safe_band();
        top + rng.random::<f32>() * (bottom - top)
    }
}

/// Things that happened during a tick or key press, drained by the session
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    WordSpawned { id: EntityId },
    /// A keystroke launched a projectile
    Fired { target: EntityId, ch: char },
    /// A projectile reached its word
    Hit { target: EntityId },
    /// The typed buffer matched a word's answer
    WordSolved { id: EntityId },
    /// A word blew up, either shot down after solving or at the left edge
    WordExploded { id: EntityId, success: bool },
    /// First boundary breach of the session
    GameOverTriggered,
    GroupAdvanced { index: usize },
    /// Last group cleared
    DeckCompleted,
}

/// The slice of the deck currently eligible to spawn
#[derive(Debug, Clone, Default)]
pub struct ActiveGroup {
    pub index: usize,
    /// Cards not yet solved in this group
    pub cards: Vec<Card>,
}

/// Complete sub-game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub rng: Pcg32,
    pub playfield: Playfield,
    /// Speed setting (1-10)
    pub speed: u8,
    pub score: u32,
    /// What the player has typed since the last solve/clear
    pub input: String,
    pub group: ActiveGroup,
    pub plane: Plane,
    /// Live words in spawn order
    pub words: Vec<FlyingWord>,
    pub projectiles: Vec<Projectile>,
    pub explosions: Vec<ExplosionParticle>,
    pub wind: Vec<WindParticle>,
    pub trails: Vec<TrailParticle>,
    /// Wall-clock time of the last spawn check that fired (ms)
    pub last_spawn_ms: f64,
    /// Wall-clock time of the last idle wander re-target (ms)
    pub last_wander_ms: f64,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// A word escaped; teardown is scheduled
    pub game_over_pending: bool,
    /// Every group has been cleared
    pub finished: bool,
    /// Events not yet handed to the session
    pub events: Vec<GameEvent>,
    next_id: EntityId,
}

impl GameState {
    pub fn new(seed: u64, playfield: Playfield, speed: u8) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            playfield,
            speed: crate::clamp_speed(speed as i32),
            score: 0,
            input: String::new(),
            group: ActiveGroup::default(),
            plane: Plane::new(&playfield),
            words: Vec::new(),
            projectiles: Vec::new(),
            explosions: Vec::new(),
            wind: Vec::new(),
            trails: Vec::new(),
            last_spawn_ms: 0.0,
            last_wander_ms: 0.0,
            time_ticks: 0,
            game_over_pending: false,
            finished: false,
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Replace the active group
    pub fn load_group(&mut self, index: usize, cards: Vec<Card>) {
        log::info!("Level {}: {} cards", index + 1, cards.len());
        self.group = ActiveGroup { index, cards };
    }

    pub fn word(&self, id: EntityId) -> Option<&FlyingWord> {
        self.words.iter().find(|w| w.id == id)
    }

    pub fn word_index(&self, id: EntityId) -> Option<usize> {
        self.words.iter().position(|w| w.id == id)
    }

    /// Words on screen still waiting for an answer
    pub fn unsolved_on_screen(&self) -> usize {
        self.words.iter().filter(|w| w.is_targetable()).count()
    }

    /// Record an event for the session
    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Push wall-clock timers forward so a pause doesn't count toward them
    pub fn shift_timers(&mut self, delta_ms: f64) {
        self.last_spawn_ms += delta_ms;
        self.last_wander_ms += delta_ms;
    }

    /// Drop every entity and pending event (teardown)
    pub fn clear_entities(&mut self) {
        self.words.clear();
        self.projectiles.clear();
        self.explosions.clear();
        self.wind.clear();
        self.trails.clear();
        self.events.clear();
        self.input.clear();
    }
}
