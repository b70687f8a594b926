//! Spawn scheduler - introduces words from the active group over time

use glam::Vec2;
use rand::Rng;

use super::entities::FlyingWord;
use super::state::{EntityId, GameEvent, GameState};
use crate::consts::*;
use crate::deck::Card;
use crate::speed_multiplier;

/// Time between spawns for a speed setting, floored at the minimum interval
pub fn spawn_interval_ms(speed: u8) -> f64 {
    (SPAWN_INTERVAL_MS / speed_multiplier(speed) as f64).max(MIN_SPAWN_INTERVAL_MS)
}

/// Word travel speed (pixels per tick) for a speed setting
pub fn word_speed(speed: u8) -> f32 {
    WORD_SPEED_BASE * speed_multiplier(speed)
}

/// Group cards not already flying as an unanswered word
pub fn available_cards(state: &GameState) -> Vec<&Card> {
    state
        .group
        .cards
        .iter()
        .filter(|card| {
            !state
                .words
                .iter()
                .any(|w| w.is_targetable() && &w.card == *card)
        })
        .collect()
}

/// Spawn one word from a random available card, if there is one
pub fn spawn_word(state: &mut GameState) -> Option<EntityId> {
    let mut available: Vec<Card> = available_cards(state).into_iter().cloned().collect();
    if available.is_empty() {
        log::trace!("Spawn skipped: every group card is on screen");
        return None;
    }

    let pick = state.rng.random_range(0..available.len());
    let card = available.swap_remove(pick);

    let x = state.playfield.width + WORD_SPAWN_OFFSET;
    let y = state.playfield.random_safe_y(&mut state.rng);
    let speed = word_speed(state.speed);

    let id = state.next_entity_id();
    log::debug!("Spawned word #{} '{}'", id, card.question);
    state.words.push(FlyingWord::new(id, card, Vec2::new(x, y), speed));
    state.emit(GameEvent::WordSpawned { id });
    Some(id)
}

/// Spawn if the interval has elapsed since the last spawn check
pub fn run(state: &mut GameState, now_ms: f64) {
    if now_ms - state.last_spawn_ms > spawn_interval_ms(state.speed) {
        spawn_word(state);
        state.last_spawn_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Playfield;

    fn state_with(answers: &[&str]) -> GameState {
        let mut state = GameState::new(42, Playfield::default(), 1);
        let cards = answers
            .iter()
            .map(|a| Card::new(format!("q-{a}"), *a))
            .collect();
        state.load_group(0, cards);
        state
    }

    #[test]
    fn test_interval_monotonic_with_floor() {
        let mut prev = f64::INFINITY;
        for speed in MIN_SPEED..=MAX_SPEED {
            let interval = spawn_interval_ms(speed);
            assert!(interval <= prev, "interval grew at speed {}", speed);
            assert!(interval >= MIN_SPAWN_INTERVAL_MS);
            prev = interval;
        }
        assert_eq!(spawn_interval_ms(1), SPAWN_INTERVAL_MS);
        // Out-of-range settings are clamped, not extrapolated
        assert_eq!(spawn_interval_ms(0), spawn_interval_ms(1));
        assert_eq!(spawn_interval_ms(200), spawn_interval_ms(10));
    }

    #[test]
    fn test_word_speed_grows() {
        assert!(word_speed(10) > word_speed(1));
        assert!((word_speed(1) - WORD_SPEED_BASE).abs() < 1e-6);
    }

    #[test]
    fn test_spawn_position() {
        let mut state = state_with(&["dog"]);
        let id = spawn_word(&mut state).unwrap();
        let word = state.word(id).unwrap();
        assert_eq!(word.pos.x, state.playfield.width + WORD_SPAWN_OFFSET);
        let (top, bottom) = state.playfield.safe_band();
        assert!(word.pos.y >= top && word.pos.y <= bottom);
        assert_eq!(state.events, vec![GameEvent::WordSpawned { id }]);
    }

    #[test]
    fn test_no_duplicates_on_screen() {
        let mut state = state_with(&["uno", "dos", "tres"]);
        for _ in 0..3 {
            assert!(spawn_word(&mut state).is_some());
        }
        // Every card is flying; further spawns are silent no-ops
        assert!(spawn_word(&mut state).is_none());
        assert_eq!(state.words.len(), 3);

        let mut answers: Vec<_> = state.words.iter().map(|w| w.card.answer.clone()).collect();
        answers.sort();
        assert_eq!(answers, vec!["dos", "tres", "uno"]);
    }

    #[test]
    fn test_solved_word_frees_its_card() {
        let mut state = state_with(&["uno"]);
        spawn_word(&mut state);
        assert!(available_cards(&state).is_empty());
        state.words[0].is_solved = true;
        assert_eq!(available_cards(&state).len(), 1);
    }

    #[test]
    fn test_empty_group_never_spawns() {
        let mut state = state_with(&[]);
        run(&mut state, 10_000.0);
        assert!(state.words.is_empty());
        assert_eq!(state.last_spawn_ms, 10_000.0);
    }

    #[test]
    fn test_run_respects_interval() {
        let mut state = state_with(&["a", "b", "c"]);
        state.last_spawn_ms = 1000.0;
        run(&mut state, 1000.0 + SPAWN_INTERVAL_MS);
        assert!(state.words.is_empty(), "interval must be strictly exceeded");
        run(&mut state, 1001.0 + SPAWN_INTERVAL_MS);
        assert_eq!(state.words.len(), 1);
        assert_eq!(state.last_spawn_ms, 1001.0 + SPAWN_INTERVAL_MS);
    }
}
