//! Fixed-step simulation tick
//!
//! One call advances every entity by its per-tick delta. Wall-clock time is
//! only consulted for the spawn and idle-wander timers.

use rand::Rng;

use super::entities::ProjectileStep;
use super::particles::{TrailParticle, WindParticle};
use super::state::GameState;
use super::{progression, spawn, targeting};
use crate::consts::*;

/// Advance the game state by one tick at wall-clock time `now_ms`
pub fn tick(state: &mut GameState, now_ms: f64) {
    if state.finished {
        return;
    }
    state.time_ticks += 1;

    spawn::run(state, now_ms);

    // Background
    if state.rng.random::<f32>() < WIND_SPAWN_CHANCE {
        let streak = WindParticle::spawn(&state.playfield, &mut state.rng);
        state.wind.push(streak);
    }
    state.wind.retain_mut(|w| w.update());
    state.trails.retain_mut(|t| t.update());

    // Plane
    targeting::aim_plane(state, now_ms);
    state.plane.update();
    if state.rng.random::<f32>() < TRAIL_SPAWN_CHANCE {
        let at = glam::Vec2::new(state.plane.x, state.plane.y);
        state.trails.push(TrailParticle::new(at));
    }

    // Words
    for idx in 0..state.words.len() {
        if state.words[idx].advance() {
            progression::breach(state, idx);
        }
    }

    // Projectiles (before dropping dead words so late hits still resolve)
    let mut projectiles = std::mem::take(&mut state.projectiles);
    projectiles.retain_mut(|p| match p.advance(state.word(p.target)) {
        ProjectileStep::Flying => true,
        ProjectileStep::Hit => {
            if let Some(idx) = state.word_index(p.target) {
                progression::register_hit(state, idx, p.pos);
            }
            false
        }
        ProjectileStep::Lost => false,
    });
    state.projectiles = projectiles;

    state.words.retain(|w| !w.is_gone());
    state.explosions.retain_mut(|e| e.update());
}
