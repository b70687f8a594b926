//! Cosmetic particles: explosion debris, wind streaks and the plane's trail
//!
//! None of these affect gameplay. Each `update` returns false once the
//! particle has expired.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::Playfield;

/// Debris thrown out by an exploding word or a projectile hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplosionParticle {
    pub pos: Vec2,
    pub vel: Vec2,
    /// 1.0 at birth, dead at 0
    pub life: f32,
    /// Life lost per tick
    pub decay: f32,
    /// Palette key of the word it came from
    pub color_key: u32,
}

impl ExplosionParticle {
    pub fn new<R: Rng + ?Sized>(pos: Vec2, color_key: u32, rng: &mut R) -> Self {
        let angle = rng.random::<f32>() * std::f32::consts::TAU;
        let speed = rng.random::<f32>() * 5.0 + 2.0;
        Self {
            pos,
            vel: Vec2::new(angle.cos(), angle.sin()) * speed,
            life: 1.0,
            decay: rng.random::<f32>() * 0.05 + 0.02,
            color_key,
        }
    }

    pub fn update(&mut self) -> bool {
        self.pos += self.vel;
        self.life -= self.decay;
        self.life > 0.0
    }
}

/// Background streak sweeping right to left
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindParticle {
    pub pos: Vec2,
    pub speed: f32,
    pub length: f32,
}

impl WindParticle {
    /// New streak just past the right edge at a random height
    pub fn spawn<R: Rng + ?Sized>(playfield: &Playfield, rng: &mut R) -> Self {
        Self {
            pos: Vec2::new(
                playfield.width + rng.random::<f32>() * 100.0,
                rng.random::<f32>() * playfield.height,
            ),
            speed: 15.0 + rng.random::<f32>() * 10.0,
            length: 20.0 + rng.random::<f32>() * 30.0,
        }
    }

    pub fn update(&mut self) -> bool {
        self.pos.x -= self.speed;
        self.pos.x >= -self.length
    }
}

/// Exhaust puff left behind the plane
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrailParticle {
    pub pos: Vec2,
    pub opacity: f32,
}

impl TrailParticle {
    pub const DRIFT: f32 = 5.0;
    pub const FADE: f32 = 0.05;

    pub fn new(pos: Vec2) -> Self {
        Self { pos, opacity: 0.8 }
    }

    pub fn update(&mut self) -> bool {
        self.pos.x -= Self::DRIFT;
        self.opacity -= Self::FADE;
        self.opacity > 0.0
    }
}
