//! Match detection, hits, explosions and group ("level") progression

use glam::Vec2;

use super::particles::ExplosionParticle;
use super::state::{EntityId, GameEvent, GameState};
use crate::consts::EXPLOSION_PARTICLES;
use crate::deck::GroupSource;

/// Solve the first word whose answer equals the typed buffer (raw or trimmed).
///
/// Returns the solved word's id.
pub fn check_matches(state: &mut GameState, groups: &dyn GroupSource) -> Option<EntityId> {
    let cleaned = state.input.trim();
    let idx = state.words.iter().position(|w| {
        w.is_targetable() && (w.card.answer == state.input || w.card.answer == cleaned)
    })?;

    let word = &mut state.words[idx];
    word.is_solved = true;
    let id = word.id;
    let card = word.card.clone();
    log::debug!("Solved '{}' -> '{}'", card.question, card.answer);

    state.input.clear();
    state.score += 1;
    if let Some(pos) = state.group.cards.iter().position(|c| *c == card) {
        state.group.cards.remove(pos);
    }
    state.emit(GameEvent::WordSolved { id });

    // Shots that landed while the player was still typing count toward the payoff
    if state.words[idx].ready_to_explode() {
        explode_word(state, idx, true);
    }

    advance_group_if_cleared(state, groups);
    Some(id)
}

/// A projectile reached word `idx` at `at`
pub fn register_hit(state: &mut GameState, idx: usize, at: Vec2) {
    let Some(word) = state.words.get_mut(idx) else {
        return;
    };
    if !word.take_hit() {
        return;
    }
    let id = word.id;
    let color_key = word.color_key;

    let spark = ExplosionParticle::new(at, color_key, &mut state.rng);
    state.explosions.push(spark);
    state.emit(GameEvent::Hit { target: id });

    if state.words[idx].ready_to_explode() {
        explode_word(state, idx, true);
    }
}

/// Blow up word `idx`: debris, mark dead, report success or failure
pub fn explode_word(state: &mut GameState, idx: usize, success: bool) {
    let Some(word) = state.words.get_mut(idx) else {
        return;
    };
    if word.is_dead {
        return;
    }
    word.is_dead = true;
    let id = word.id;
    let center = word.pos;
    let color_key = word.color_key;

    for _ in 0..EXPLOSION_PARTICLES {
        let p = ExplosionParticle::new(center, color_key, &mut state.rng);
        state.explosions.push(p);
    }
    state.emit(GameEvent::WordExploded { id, success });
}

/// Word `idx` crossed the left edge unanswered
pub fn breach(state: &mut GameState, idx: usize) {
    explode_word(state, idx, false);

    if !state.game_over_pending {
        state.game_over_pending = true;
        log::info!("Word escaped - game over (score {})", state.score);
        state.emit(GameEvent::GameOverTriggered);
    }
}

/// Move to the next group once this one is solved and nothing unsolved is flying
pub fn advance_group_if_cleared(state: &mut GameState, groups: &dyn GroupSource) {
    if state.finished || !state.group.cards.is_empty() || state.unsolved_on_screen() > 0 {
        return;
    }

    let next = state.group.index + 1;
    match groups.group(next) {
        Some(cards) if !cards.is_empty() => {
            state.load_group(next, cards);
            state.emit(GameEvent::GroupAdvanced { index: next });
        }
        _ => {
            state.finished = true;
            log::info!("Deck completed (score {})", state.score);
            state.emit(GameEvent::DeckCompleted);
        }
    }
}
