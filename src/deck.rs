//! Deck collaborator: cards, groups ("levels") and level scopes
//!
//! The session only ever reads a deck through [`GroupSource`], one fixed-size
//! group at a time.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::consts::GROUP_SIZE;

/// A single flash card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Card {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            hint: None,
        }
    }

    /// Answer length in chars - the number of hits a solved word must take
    pub fn answer_len(&self) -> usize {
        self.answer.chars().count()
    }
}

/// Anything that can hand out groups of cards by index
pub trait GroupSource {
    /// Cards of group `index`, or `None` once the deck is exhausted
    fn group(&self, index: usize) -> Option<Vec<Card>>;
}

/// An ordered card list split into fixed-size groups
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StoredDeck")]
pub struct Deck {
    cards: Vec<Card>,
    /// Always at least 1
    group_size: usize,
}

/// Serialized form; normalized through [`Deck::with_group_size`]
#[derive(Deserialize)]
struct StoredDeck {
    cards: Vec<Card>,
    #[serde(default = "default_group_size")]
    group_size: usize,
}

fn default_group_size() -> usize {
    GROUP_SIZE
}

impl From<StoredDeck> for Deck {
    fn from(stored: StoredDeck) -> Self {
        Self::with_group_size(stored.cards, stored.group_size)
    }
}

impl Default for Deck {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Deck {
    pub fn new(cards: Vec<Card>) -> Self {
        Self::with_group_size(cards, GROUP_SIZE)
    }

    pub fn with_group_size(cards: Vec<Card>, group_size: usize) -> Self {
        Self {
            cards,
            group_size: group_size.max(1),
        }
    }

    /// Parse a JSON array of cards
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let cards: Vec<Card> = serde_json::from_str(json)?;
        let before = cards.len();
        let cards: Vec<Card> = cards
            .into_iter()
            .filter(|c| !c.question.trim().is_empty() && !c.answer.trim().is_empty())
            .collect();
        if cards.len() != before {
            log::warn!("Dropped {} cards with empty question or answer", before - cards.len());
        }
        log::info!("Loaded deck with {} cards", cards.len());
        Ok(Self::new(cards))
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn group_size(&self) -> usize {
        self.group_size
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of groups (levels), counting a trailing partial group
    pub fn level_count(&self) -> usize {
        self.cards.len().div_ceil(self.group_size)
    }

    /// Shuffle card order in place
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Restrict the deck to the levels covered by `scope`
    pub fn scoped(&self, scope: LevelScope) -> Self {
        let len = self.cards.len();
        let start = scope
            .start
            .saturating_sub(1)
            .saturating_mul(self.group_size)
            .min(len);
        let end = scope.end.saturating_mul(self.group_size).clamp(start, len);
        Self {
            cards: self.cards[start..end].to_vec(),
            group_size: self.group_size,
        }
    }
}

impl GroupSource for Deck {
    fn group(&self, index: usize) -> Option<Vec<Card>> {
        let start = index.checked_mul(self.group_size)?;
        if start >= self.cards.len() {
            return None;
        }
        let end = (start + self.group_size).min(self.cards.len());
        Some(self.cards[start..end].to_vec())
    }
}

/// Inclusive, 1-based range of levels to drill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelScope {
    pub start: usize,
    pub end: usize,
}

impl LevelScope {
    /// Parse `"N"` (level N to the last) or `"N-M"`.
    ///
    /// Zero bounds fall back to the first/last level, reversed ranges are
    /// swapped and both ends are clamped to `max_level`.
    pub fn parse(input: &str, max_level: usize) -> Option<Self> {
        if max_level == 0 {
            return None;
        }

        let input = input.trim();
        let all_digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());

        let (mut start, mut end): (usize, usize) = match input.split_once('-') {
            Some((a, b)) if all_digits(a) && all_digits(b) => (a.parse().ok()?, b.parse().ok()?),
            None if all_digits(input) => (input.parse().ok()?, max_level),
            _ => {
                log::warn!("Invalid level scope: {}", input);
                return None;
            }
        };

        if start == 0 {
            start = 1;
        }
        if end == 0 {
            end = max_level;
        }
        if start > end {
            std::mem::swap(&mut start, &mut end);
        }

        Some(Self {
            start: start.min(max_level),
            end: end.min(max_level),
        })
    }
}
