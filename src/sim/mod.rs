//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - Fixed per-tick movement deltas
//! - Seeded RNG only
//! - Wall-clock time is passed in, never read

pub mod distance;
pub mod entities;
pub mod particles;
pub mod progression;
pub mod spawn;
pub mod state;
pub mod targeting;
pub mod tick;

pub use distance::levenshtein;
pub use entities::{FlyingWord, Plane, Projectile, ProjectileStep, color_key};
pub use particles::{ExplosionParticle, TrailParticle, WindParticle};
pub use state::{ActiveGroup, EntityId, GameEvent, GameState, Playfield};
pub use targeting::{Key, find_best_match};
pub use tick::tick;
