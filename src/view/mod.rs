//! Presentation
//!
//! [`Frame`] is a plain, serializable picture of the playfield at one instant.
//! It carries no behaviour: the browser renderer (`dom`) turns it into
//! elements, and anything else (a JS overlay, a debug dump) can consume it
//! as JSON.

#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod palette;

use serde::Serialize;

use crate::sim::{EntityId, GameState};

/// Vertical bob amplitude of a flying word (pixels)
const BOB_AMPLITUDE: f32 = 5.0;
/// Bob period divisor (ms)
const BOB_RATE_MS: f64 = 500.0;

#[derive(Debug, Clone, Serialize)]
pub struct PlaneView {
    pub x: f32,
    pub y: f32,
    /// Degrees
    pub tilt: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct WordView {
    pub id: EntityId,
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub color: &'static str,
    pub solved: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub id: EntityId,
    pub x: f32,
    pub y: f32,
    pub ch: char,
}

#[derive(Debug, Clone, Serialize)]
pub struct SparkView {
    pub x: f32,
    pub y: f32,
    pub opacity: f32,
    pub color: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreakView {
    pub x: f32,
    pub y: f32,
    pub length: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PuffView {
    pub x: f32,
    pub y: f32,
    pub opacity: f32,
}

/// Everything needed to draw one frame
#[derive(Debug, Clone, Serialize)]
pub struct Frame {
    pub dark: bool,
    pub plane: PlaneView,
    pub words: Vec<WordView>,
    pub projectiles: Vec<ProjectileView>,
    pub sparks: Vec<SparkView>,
    pub wind: Vec<StreakView>,
    pub trail: Vec<PuffView>,
    pub input: String,
    pub score: u32,
    /// 1-based
    pub level: usize,
}

impl Frame {
    pub fn capture(state: &GameState, now_ms: f64, dark: bool) -> Self {
        let words = state
            .words
            .iter()
            .map(|w| {
                let bob = ((now_ms / BOB_RATE_MS + w.id as f64).sin() as f32) * BOB_AMPLITUDE;
                let color = if w.flash_ticks > 0 {
                    palette::flash_color(dark)
                } else {
                    palette::word_color(w.color_key, dark)
                };
                WordView {
                    id: w.id,
                    text: w.card.question.clone(),
                    x: w.pos.x,
                    y: w.pos.y + bob,
                    color,
                    solved: w.is_solved,
                }
            })
            .collect();

        Self {
            dark,
            plane: PlaneView {
                x: state.plane.x,
                y: state.plane.y,
                tilt: state.plane.tilt,
            },
            words,
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    id: p.id,
                    x: p.pos.x,
                    y: p.pos.y,
                    ch: p.ch,
                })
                .collect(),
            sparks: state
                .explosions
                .iter()
                .map(|e| SparkView {
                    x: e.pos.x,
                    y: e.pos.y,
                    opacity: e.life.clamp(0.0, 1.0),
                    color: palette::word_color(e.color_key, dark),
                })
                .collect(),
            wind: state
                .wind
                .iter()
                .map(|w| StreakView {
                    x: w.pos.x,
                    y: w.pos.y,
                    length: w.length,
                })
                .collect(),
            trail: state
                .trails
                .iter()
                .map(|t| PuffView {
                    x: t.pos.x,
                    y: t.pos.y,
                    opacity: t.opacity,
                })
                .collect(),
            input: state.input.clone(),
            score: state.score,
            level: state.group.index + 1,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
