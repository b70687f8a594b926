//! Targeting and keyboard input
//!
//! Keystrokes fire projectiles at whichever word the typed prefix most
//! resembles; the plane follows that word, or wanders when idle.

use rand::Rng;

use super::distance::{char_prefix, levenshtein};
use super::entities::{FlyingWord, Projectile};
use super::progression;
use super::state::{EntityId, GameEvent, GameState};
use crate::consts::*;
use crate::deck::GroupSource;

/// Keys the sub-game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A printable character
    Char(char),
    Backspace,
    Enter,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value; other named keys are ignored
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "Backspace" => Some(Key::Backspace),
            "Enter" => Some(Key::Enter),
            _ => {
                let mut chars = key.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) if !c.is_control() => Some(Key::Char(c)),
                    _ => None,
                }
            }
        }
    }
}

/// Best target for the typed buffer.
///
/// Only unsolved, live words qualify. An empty buffer picks the first one;
/// otherwise the smallest edit distance between the buffer and the answer cut
/// to the buffer's length wins, ties going to the earlier word.
pub fn find_best_match(words: &[FlyingWord], input: &str) -> Option<EntityId> {
    let mut candidates = words.iter().filter(|w| w.is_targetable());

    if input.is_empty() {
        return candidates.next().map(|w| w.id);
    }

    let typed = input.chars().count();
    let mut best: Option<(usize, EntityId)> = None;
    for word in candidates {
        let dist = levenshtein(input, char_prefix(&word.card.answer, typed));
        if best.is_none_or(|(d, _)| dist < d) {
            best = Some((dist, word.id));
        }
    }
    best.map(|(_, id)| id)
}

/// Launch a projectile carrying `ch` at the current best match
pub fn fire(state: &mut GameState, ch: char) -> Option<EntityId> {
    let target = find_best_match(&state.words, &state.input)?;
    let id = state.next_entity_id();
    let muzzle = state.plane.muzzle();
    state.projectiles.push(Projectile::new(id, muzzle, target, ch));
    state.emit(GameEvent::Fired { target, ch });
    Some(id)
}

/// Apply one keystroke
pub fn handle_key(state: &mut GameState, key: Key, groups: &dyn GroupSource) {
    if state.finished {
        return;
    }

    match key {
        Key::Char(c) => {
            let lower: String = c.to_lowercase().collect();
            state.input.push_str(&lower);
            let shown = lower.chars().next().unwrap_or(c);
            if fire(state, shown).is_none() {
                log::trace!("No target for '{}'", shown);
            }
            progression::check_matches(state, groups);
        }
        Key::Backspace => {
            state.input.pop();
            progression::check_matches(state, groups);
        }
        Key::Enter => state.input.clear(),
    }
}

/// Point the plane at the best match, or let it wander while nothing is typed
pub fn aim_plane(state: &mut GameState, now_ms: f64) {
    if !state.input.is_empty() {
        if let Some(y) = find_best_match(&state.words, &state.input)
            .and_then(|id| state.word(id))
            .map(|w| w.pos.y)
        {
            state.plane.set_target_y(y);
        }
        return;
    }

    if now_ms - state.last_wander_ms > WANDER_INTERVAL_MS {
        let offset = (state.rng.random::<f32>() - 0.5) * (WANDER_RANGE * 2.0);
        let y = state.playfield.clamp_to_safe_band(state.plane.y + offset);
        state.plane.set_target_y(y);
        state.last_wander_ms = now_ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Card, Deck};
    use crate::sim::state::Playfield;
    use glam::Vec2;

    fn state_with(answers: &[&str]) -> (GameState, Deck) {
        let cards: Vec<Card> = answers
            .iter()
            .map(|a| Card::new(format!("q-{a}"), *a))
            .collect();
        let deck = Deck::new(cards.clone());
        let mut state = GameState::new(9, Playfield::default(), 5);
        state.load_group(0, cards.clone());
        for (i, card) in cards.into_iter().enumerate() {
            let id = state.next_entity_id();
            let pos = Vec2::new(800.0 + i as f32 * 50.0, 150.0 + i as f32 * 100.0);
            state.words.push(FlyingWord::new(id, card, pos, 1.0));
        }
        (state, deck)
    }

    fn answer_of(state: &GameState, id: EntityId) -> &str {
        &state.word(id).unwrap().card.answer
    }

    #[test]
    fn test_key_from_dom() {
        assert_eq!(Key::from_dom("a"), Some(Key::Char('a')));
        assert_eq!(Key::from_dom("ñ"), Some(Key::Char('ñ')));
        assert_eq!(Key::from_dom(" "), Some(Key::Char(' ')));
        assert_eq!(Key::from_dom("Backspace"), Some(Key::Backspace));
        assert_eq!(Key::from_dom("Enter"), Some(Key::Enter));
        assert_eq!(Key::from_dom("Shift"), None);
        assert_eq!(Key::from_dom("ArrowLeft"), None);
        assert_eq!(Key::from_dom(""), None);
    }

    #[test]
    fn test_best_match_prefers_prefix() {
        let (state, _) = state_with(&["casa", "caso", "mesa"]);
        let id = find_best_match(&state.words, "cas").unwrap();
        let answer = answer_of(&state, id);
        assert!(answer == "casa" || answer == "caso");
        // Tie goes to the earlier word
        assert_eq!(answer, "casa");

        let id = find_best_match(&state.words, "me").unwrap();
        assert_eq!(answer_of(&state, id), "mesa");
    }

    #[test]
    fn test_best_match_empty_input_and_filters() {
        let (mut state, _) = state_with(&["uno", "dos"]);
        assert_eq!(find_best_match(&state.words, ""), Some(state.words[0].id));

        state.words[0].is_solved = true;
        assert_eq!(find_best_match(&state.words, ""), Some(state.words[1].id));
        assert_eq!(find_best_match(&state.words, "un"), Some(state.words[1].id));

        state.words[1].is_dead = true;
        assert_eq!(find_best_match(&state.words, "un"), None);
        assert_eq!(find_best_match(&[], "x"), None);
    }

    #[test]
    fn test_typing_fires_and_solves() {
        let (mut state, deck) = state_with(&["sol", "luna"]);
        for c in "SOL".chars() {
            handle_key(&mut state, Key::Char(c), &deck);
        }
        assert_eq!(state.projectiles.len(), 3);
        assert!(state.projectiles.iter().all(|p| p.target == state.words[0].id));
        assert_eq!(state.projectiles[0].ch, 's');
        assert!(state.words[0].is_solved);
        assert!(state.input.is_empty());
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_no_target_no_projectile() {
        let (mut state, deck) = state_with(&[]);
        handle_key(&mut state, Key::Char('x'), &deck);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.input, "x");
    }

    #[test]
    fn test_backspace_rechecks_match() {
        let (mut state, deck) = state_with(&["gato"]);
        state.input = "gatos".into();
        handle_key(&mut state, Key::Backspace, &deck);
        assert!(state.words[0].is_solved);
        assert!(state.projectiles.is_empty(), "backspace never fires");
    }

    #[test]
    fn test_enter_clears_without_firing() {
        let (mut state, deck) = state_with(&["gato"]);
        state.input = "ga".into();
        handle_key(&mut state, Key::Enter, &deck);
        assert!(state.input.is_empty());
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_plane_tracks_target() {
        let (mut state, _) = state_with(&["uno", "dos"]);
        state.input = "do".into();
        aim_plane(&mut state, 0.0);
        assert_eq!(state.plane.target_y, state.words[1].pos.y);
    }

    #[test]
    fn test_idle_wander_interval_and_band() {
        let (mut state, _) = state_with(&[]);
        state.last_wander_ms = 1000.0;
        let before = state.plane.target_y;

        aim_plane(&mut state, 1500.0);
        assert_eq!(state.plane.target_y, before);
        assert_eq!(state.last_wander_ms, 1000.0);

        let (top, bottom) = state.playfield.safe_band();
        let mut now = 1000.0;
        for _ in 0..50 {
            now += WANDER_INTERVAL_MS + 1.0;
            aim_plane(&mut state, now);
            assert_eq!(state.last_wander_ms, now);
            let t = state.plane.target_y;
            assert!(t >= top && t <= bottom);
            assert!((t - state.plane.y).abs() <= WANDER_RANGE + 1e-3);
        }
    }
}
