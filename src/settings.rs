//! Game settings and preferences
//!
//! Global player preferences, persisted in LocalStorage. Nothing about a
//! running session is stored here.

use serde::{Deserialize, Serialize};

use crate::clamp_speed;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Flying speed (1-10); also shortens the spawn interval
    pub speed: u8,

    // === Sound ===
    /// Gun, shot, explosion and chime on correct answers
    pub correct_sound: bool,
    /// Explosion and buzz when a word escapes
    pub wrong_sound: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,

    // === Display ===
    /// Neon palette on a dark background
    pub dark_mode: bool,

    // === Deck ===
    /// Shuffle the deck before grouping it into levels
    pub shuffle_cards: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: 1,
            correct_sound: true,
            wrong_sound: true,
            master_volume: 0.8,
            sfx_volume: 1.0,
            dark_mode: true,
            shuffle_cards: false,
        }
    }
}

impl Settings {
    /// Store a raw speed value, clamped into range
    pub fn set_speed(&mut self, raw: i32) {
        self.speed = clamp_speed(raw);
    }

    /// Repair values that may have been hand-edited in storage
    pub fn sanitized(mut self) -> Self {
        self.speed = clamp_speed(self.speed as i32);
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self
    }

    /// Parse stored JSON; unknown or missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "flying_words_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No settings storage on native; using defaults ({})", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.speed, 1);
        assert!(s.correct_sound && s.wrong_sound && s.dark_mode);
    }

    #[test]
    fn test_set_speed_clamps() {
        let mut s = Settings::default();
        s.set_speed(0);
        assert_eq!(s.speed, 1);
        s.set_speed(11);
        assert_eq!(s.speed, 10);
        s.set_speed(6);
        assert_eq!(s.speed, 6);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let s = Settings::from_json(r#"{"speed": 40, "wrong_sound": false}"#).unwrap();
        assert_eq!(s.speed, 10);
        assert!(!s.wrong_sound);
        assert!(s.correct_sound);
        assert_eq!(s.master_volume, 0.8);
    }

    #[test]
    fn test_garbage_json_is_an_error() {
        assert!(Settings::from_json("not json").is_err());
    }
}
