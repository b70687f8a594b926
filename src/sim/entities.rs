//! Gameplay entities: the plane, flying words and projectiles
//!
//! Entities are plain data. Each one advances by fixed per-tick deltas; nothing
//! here is scaled by frame time.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{EntityId, Playfield};
use crate::consts::*;
use crate::deck::Card;

/// Stable colour key for a piece of text (FNV-1a over UTF-16 code units)
pub fn color_key(text: &str) -> u32 {
    text.encode_utf16().fold(2_166_136_261u32, |hash, unit| {
        (hash ^ unit as u32).wrapping_mul(16_777_619)
    })
}

/// The player's plane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plane {
    /// Fixed horizontal position
    pub x: f32,
    pub y: f32,
    /// Where the plane is easing toward
    pub target_y: f32,
    /// Current tilt in degrees (positive = nose down)
    pub tilt: f32,
}

impl Plane {
    pub fn new(playfield: &Playfield) -> Self {
        let y = playfield.height / 2.0;
        Self {
            x: PLANE_X,
            y,
            target_y: y,
            tilt: 0.0,
        }
    }

    pub fn set_target_y(&mut self, y: f32) {
        self.target_y = y;
    }

    /// Ease position and tilt toward their targets (never teleports)
    pub fn update(&mut self) {
        let dy = self.target_y - self.y;
        self.y += dy * PLANE_EASING;

        // Hold the tilt until we're close to the target
        let target_tilt = if dy.abs() > TILT_HOLD_DISTANCE {
            dy.signum() * MAX_TILT
        } else {
            0.0
        };
        self.tilt += (target_tilt - self.tilt) * TILT_EASING;
    }

    /// Where projectiles leave the plane
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.x + MUZZLE_OFFSET, self.y)
    }
}

/// A card flying across the playfield
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlyingWord {
    pub id: EntityId,
    pub card: Card,
    pub pos: Vec2,
    /// Pixels per tick, leftward
    pub speed: f32,
    pub hits_received: u32,
    pub is_solved: bool,
    pub is_dead: bool,
    /// Palette lookup key (see `view::palette`)
    pub color_key: u32,
    /// Ticks left on the hit flash
    pub flash_ticks: u8,
}

impl FlyingWord {
    pub fn new(id: EntityId, card: Card, pos: Vec2, speed: f32) -> Self {
        let color_key = color_key(&card.question);
        Self {
            id,
            card,
            pos,
            speed,
            hits_received: 0,
            is_solved: false,
            is_dead: false,
            color_key,
            flash_ticks: 0,
        }
    }

    /// Move one tick. Returns true if this step breached the left edge
    /// while the word was still unanswered.
    pub fn advance(&mut self) -> bool {
        self.pos.x -= self.speed;
        self.flash_ticks = self.flash_ticks.saturating_sub(1);
        self.pos.x < 0.0 && !self.is_dead && !self.is_solved
    }

    /// Can still be aimed at and answered
    pub fn is_targetable(&self) -> bool {
        !self.is_solved && !self.is_dead
    }

    /// Hits needed before a solved word may explode
    pub fn hits_required(&self) -> u32 {
        self.card.answer_len() as u32
    }

    /// Solved and shot once per letter
    pub fn ready_to_explode(&self) -> bool {
        self.is_solved && !self.is_dead && self.hits_received >= self.hits_required()
    }

    /// Take a projectile hit. Dead words ignore hits.
    pub fn take_hit(&mut self) -> bool {
        if self.is_dead {
            return false;
        }
        self.hits_received += 1;
        self.flash_ticks = FLASH_TICKS;
        true
    }

    /// Should be dropped from the live collection
    pub fn is_gone(&self) -> bool {
        self.is_dead || self.pos.x < WORD_DESPAWN_X
    }
}

/// Outcome of moving a projectile one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectileStep {
    /// Still travelling
    Flying,
    /// Reached its target this tick
    Hit,
    /// Target vanished; remove without effect
    Lost,
}

/// A typed character flying toward its target word
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: EntityId,
    pub pos: Vec2,
    pub target: EntityId,
    pub ch: char,
}

impl Projectile {
    pub fn new(id: EntityId, pos: Vec2, target: EntityId, ch: char) -> Self {
        Self { id, pos, target, ch }
    }

    /// Home in on `target` (the word with our target id, if still present)
    pub fn advance(&mut self, target: Option<&FlyingWord>) -> ProjectileStep {
        let Some(word) = target.filter(|w| w.id == self.target && !w.is_dead) else {
            return ProjectileStep::Lost;
        };

        let delta = word.pos - self.pos;
        let dist = delta.length();
        if dist < PROJECTILE_SPEED {
            return ProjectileStep::Hit;
        }

        self.pos += delta / dist * PROJECTILE_SPEED;
        ProjectileStep::Flying
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(answer: &str, x: f32) -> FlyingWord {
        FlyingWord::new(1, Card::new("q", answer), Vec2::new(x, 300.0), 2.0)
    }

    #[test]
    fn test_color_key_is_fnv1a() {
        // Known FNV-1a 32-bit vectors
        assert_eq!(color_key(""), 0x811c_9dc5);
        assert_eq!(color_key("a"), 0xe40c_292c);
        assert_eq!(color_key("casa"), color_key("casa"));
    }

    #[test]
    fn test_plane_eases_without_teleporting() {
        let mut plane = Plane::new(&Playfield::default());
        let start = plane.y;
        plane.set_target_y(start + 100.0);
        plane.update();
        assert!((plane.y - (start + 10.0)).abs() < 1e-4);
        assert!(plane.tilt > 0.0);

        for _ in 0..200 {
            plane.update();
        }
        assert!((plane.y - plane.target_y).abs() < 0.01);
        assert!(plane.tilt.abs() < 0.5, "tilt should relax, was {}", plane.tilt);
    }

    #[test]
    fn test_word_breach_only_when_unanswered() {
        let mut w = word("dog", 1.0);
        assert!(w.advance());

        let mut solved = word("dog", 1.0);
        solved.is_solved = true;
        assert!(!solved.advance());
        assert!(!solved.is_gone());

        let mut dead = word("dog", 1.0);
        dead.is_dead = true;
        assert!(!dead.advance());
        assert!(dead.is_gone());
    }

    #[test]
    fn test_word_hits() {
        let mut w = word("casa", 500.0);
        assert!(w.take_hit());
        assert_eq!(w.flash_ticks, FLASH_TICKS);
        assert!(!w.ready_to_explode());
        w.is_solved = true;
        for _ in 0..3 {
            w.take_hit();
        }
        assert!(w.ready_to_explode());

        w.is_dead = true;
        assert!(!w.take_hit());
        assert_eq!(w.hits_received, 4);
    }

    #[test]
    fn test_projectile_homes_and_hits() {
        let target = word("dog", 300.0);
        let mut p = Projectile::new(2, Vec2::new(120.0, 300.0), target.id, 'd');

        let mut steps = 0;
        loop {
            match p.advance(Some(&target)) {
                ProjectileStep::Flying => steps += 1,
                ProjectileStep::Hit => break,
                ProjectileStep::Lost => panic!("target is alive"),
            }
            assert!(steps < 100);
        }
        assert_eq!(steps, 12);
    }

    #[test]
    fn test_projectile_lost_without_target() {
        let mut p = Projectile::new(2, Vec2::ZERO, 9, 'x');
        assert_eq!(p.advance(None), ProjectileStep::Lost);

        let mut dead = word("dog", 50.0);
        dead.id = 9;
        dead.is_dead = true;
        assert_eq!(p.advance(Some(&dead)), ProjectileStep::Lost);
    }
}
