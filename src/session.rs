//! Session lifecycle: start, per-frame driving, pause bookkeeping, teardown
//!
//! The host calls [`Session::frame`] once per animation frame with the
//! current time and whether a blocking surface (modal) is visible, and feeds
//! keystrokes through [`Session::handle_key`]. Everything else happens here:
//! pause edges, deferred sounds and the delayed game over.

use crate::audio::{AudioSink, NullAudio, SoundEffect};
use crate::consts::*;
use crate::deck::GroupSource;
use crate::deferred::DeferredQueue;
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, Key, Playfield, targeting, tick};

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Never started
    Inactive,
    Active,
    /// Suspended by the host or a blocking surface
    Paused,
    /// Torn down; `start` may be called again
    Stopped,
}

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Every group was cleared
    Completed { score: u32 },
    /// A word escaped past the left edge
    GameOver { score: u32 },
}

impl SessionOutcome {
    pub fn score(&self) -> u32 {
        match *self {
            SessionOutcome::Completed { score } | SessionOutcome::GameOver { score } => score,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum DeferredAction {
    GameOver,
    Play(SoundEffect),
}

type OutcomeCallback = Box<dyn FnOnce(SessionOutcome)>;

/// One flying-words sub-game
pub struct Session {
    state: GameState,
    deck: Box<dyn GroupSource>,
    settings: Settings,
    audio: Box<dyn AudioSink>,
    phase: SessionPhase,
    host_paused: bool,
    surface_blocking: bool,
    pause_started_ms: Option<f64>,
    deferred: DeferredQueue<DeferredAction>,
    on_complete: Option<OutcomeCallback>,
    seed: u64,
}

impl Session {
    pub fn new(
        deck: impl GroupSource + 'static,
        settings: Settings,
        playfield: Playfield,
        seed: u64,
    ) -> Self {
        Self {
            state: GameState::new(seed, playfield, settings.speed),
            deck: Box::new(deck),
            settings,
            audio: Box::new(NullAudio),
            phase: SessionPhase::Inactive,
            host_paused: false,
            surface_blocking: false,
            pause_started_ms: None,
            deferred: DeferredQueue::new(),
            on_complete: None,
            seed,
        }
    }

    /// Route sound effects to `audio` instead of discarding them
    pub fn with_audio(mut self, audio: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(audio);
        self
    }

    /// Begin a fresh run at group 0.
    ///
    /// Returns false (and does nothing) if a run is already in progress or
    /// the deck has no first group.
    pub fn start(&mut self, now_ms: f64, on_complete: impl FnOnce(SessionOutcome) + 'static) -> bool {
        if self.is_active() {
            log::warn!("Session already running");
            return false;
        }
        let Some(cards) = self.deck.group(0).filter(|g| !g.is_empty()) else {
            log::warn!("Deck has no cards; session not started");
            return false;
        };

        let playfield = self.state.playfield;
        self.state = GameState::new(self.seed, playfield, self.settings.speed);
        // Next run gets a different word order
        self.seed = self.seed.wrapping_add(0x9E37_79B9_7F4A_7C15);

        self.state.load_group(0, cards);
        self.state.last_spawn_ms = now_ms;
        self.state.last_wander_ms = now_ms;

        self.deferred.cancel_all();
        self.host_paused = false;
        self.surface_blocking = false;
        self.pause_started_ms = None;
        self.on_complete = Some(Box::new(on_complete));
        self.phase = SessionPhase::Active;
        log::info!("Session started (speed {})", self.state.speed);
        true
    }

    /// Tear down. Safe in any phase; the completion callback is dropped uncalled.
    pub fn stop(&mut self) {
        self.state.clear_entities();
        self.state.score = 0;
        self.deferred.cancel_all();
        self.on_complete = None;
        self.pause_started_ms = None;
        self.host_paused = false;
        self.surface_blocking = false;
        if self.phase != SessionPhase::Stopped {
            log::info!("Session stopped");
        }
        self.phase = SessionPhase::Stopped;
    }

    /// Host-driven suspension (tab hidden, menu opened)
    pub fn pause(&mut self, now_ms: f64) {
        self.host_paused = true;
        self.update_pause(now_ms);
    }

    pub fn resume(&mut self, now_ms: f64) {
        self.host_paused = false;
        self.update_pause(now_ms);
    }

    /// Drive one animation frame. Returns whether the host should request
    /// another.
    pub fn frame(&mut self, now_ms: f64, blocking_surface_visible: bool) -> bool {
        if !self.is_active() {
            return false;
        }

        self.surface_blocking = blocking_surface_visible;
        self.update_pause(now_ms);
        if self.phase == SessionPhase::Paused {
            return true;
        }

        for action in self.deferred.take_due(now_ms) {
            match action {
                DeferredAction::Play(effect) => self.audio.play(effect),
                DeferredAction::GameOver => {
                    let score = self.state.score;
                    self.finish(SessionOutcome::GameOver { score });
                    return false;
                }
            }
        }

        tick(&mut self.state, now_ms);
        self.dispatch_events(now_ms);
        self.is_active()
    }

    /// Feed one keystroke. Ignored unless the session is running and unpaused.
    pub fn handle_key(&mut self, key: Key, now_ms: f64) {
        if self.phase != SessionPhase::Active {
            return;
        }
        targeting::handle_key(&mut self.state, key, self.deck.as_ref());
        self.dispatch_events(now_ms);
    }

    /// Change speed; affects words spawned from now on
    pub fn set_speed(&mut self, raw: i32) {
        self.settings.set_speed(raw);
        self.state.speed = self.settings.speed;
    }

    /// Window resized; new spawns and the safe band follow the new size
    pub fn set_playfield(&mut self, playfield: Playfield) {
        self.state.playfield = playfield;
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Running, paused or not
    pub fn is_active(&self) -> bool {
        matches!(self.phase, SessionPhase::Active | SessionPhase::Paused)
    }

    /// Enter or leave the paused phase when the combined pause signal changes
    fn update_pause(&mut self, now_ms: f64) {
        let want_pause = self.host_paused || self.surface_blocking;
        match (self.phase, want_pause) {
            (SessionPhase::Active, true) => {
                self.phase = SessionPhase::Paused;
                self.pause_started_ms = Some(now_ms);
                log::debug!("Paused at {:.0}ms", now_ms);
            }
            (SessionPhase::Paused, false) => {
                let paused_for = now_ms - self.pause_started_ms.take().unwrap_or(now_ms);
                let paused_for = paused_for.max(0.0);
                self.state.shift_timers(paused_for);
                self.deferred.postpone(paused_for);
                self.phase = SessionPhase::Active;
                log::debug!("Resumed after {:.0}ms", paused_for);
            }
            _ => {}
        }
    }

    /// Turn simulation events into sounds, deferred actions and outcomes
    fn dispatch_events(&mut self, now_ms: f64) {
        let correct = self.settings.correct_sound;
        let wrong = self.settings.wrong_sound;

        for event in self.state.drain_events() {
            match event {
                GameEvent::Fired { .. } if correct => self.audio.play(SoundEffect::Gun),
                GameEvent::Hit { .. } if correct => self.audio.play(SoundEffect::Shot),
                GameEvent::WordExploded { success: true, .. } if correct => {
                    self.audio.play(SoundEffect::Explosion);
                    self.deferred.schedule_after(
                        now_ms,
                        CHIME_DELAY_MS,
                        DeferredAction::Play(SoundEffect::Correct),
                    );
                }
                GameEvent::WordExploded { success: false, .. } if wrong => {
                    self.audio.play(SoundEffect::Explosion);
                    self.deferred.schedule_after(
                        now_ms,
                        CHIME_DELAY_MS,
                        DeferredAction::Play(SoundEffect::Wrong),
                    );
                }
                GameEvent::GameOverTriggered => {
                    self.deferred
                        .schedule_after(now_ms, GAME_OVER_DELAY_MS, DeferredAction::GameOver);
                }
                GameEvent::GroupAdvanced { index } => {
                    log::debug!("Advanced to level {}", index + 1);
                }
                GameEvent::DeckCompleted => {
                    let score = self.state.score;
                    self.finish(SessionOutcome::Completed { score });
                    return;
                }
                _ => {}
            }
        }
    }

    fn finish(&mut self, outcome: SessionOutcome) {
        let callback = self.on_complete.take();
        self.stop();
        log::info!("Session over: {:?}", outcome);
        if let Some(callback) = callback {
            callback(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Card, Deck};
    use crate::sim::FlyingWord;
    use crate::sim::spawn::spawn_interval_ms;
    use glam::Vec2;
    use std::cell::RefCell;
    use std::rc::Rc;

    const T0: f64 = 1000.0;

    #[derive(Clone, Default)]
    struct Recorder(Rc<RefCell<Vec<SoundEffect>>>);

    impl AudioSink for Recorder {
        fn play(&mut self, effect: SoundEffect) {
            self.0.borrow_mut().push(effect);
        }
    }

    type Outcomes = Rc<RefCell<Vec<SessionOutcome>>>;

    fn session(answers: &[&str]) -> (Session, Recorder) {
        let cards = answers
            .iter()
            .map(|a| Card::new(format!("q-{a}"), *a))
            .collect();
        let recorder = Recorder::default();
        let session = Session::new(Deck::new(cards), Settings::default(), Playfield::default(), 7)
            .with_audio(recorder.clone());
        (session, recorder)
    }

    fn start(session: &mut Session, now: f64) -> Outcomes {
        let outcomes: Outcomes = Rc::default();
        let sink = outcomes.clone();
        assert!(session.start(now, move |o| sink.borrow_mut().push(o)));
        outcomes
    }

    fn push_word(session: &mut Session, answer: &str, x: f32) {
        let id = session.state.next_entity_id();
        let card = Card::new(format!("q-{answer}"), answer);
        session
            .state
            .words
            .push(FlyingWord::new(id, card, Vec2::new(x, 300.0), 1.5));
    }

    fn type_str(session: &mut Session, text: &str, now: f64) {
        for c in text.chars() {
            session.handle_key(Key::Char(c), now);
        }
    }

    #[test]
    fn test_pause_time_does_not_count_toward_spawn() {
        let (mut s, _) = session(&["uno", "dos"]);
        start(&mut s, T0);
        let interval = spawn_interval_ms(1);

        assert!(s.frame(T0 + 100.0, true));
        assert_eq!(s.phase(), SessionPhase::Paused);
        assert!(s.frame(T0 + 300.0, true));
        assert!(s.frame(T0 + 600.0, false));
        assert_eq!(s.phase(), SessionPhase::Active);

        s.frame(T0 + interval + 500.0, false);
        assert!(s.state().words.is_empty(), "spawned before the paused time was made up");
        s.frame(T0 + interval + 501.0, false);
        assert_eq!(s.state().words.len(), 1);
    }

    #[test]
    fn test_nothing_ticks_while_paused() {
        let (mut s, _) = session(&["uno"]);
        start(&mut s, T0);
        s.pause(T0);
        for i in 1..=10 {
            assert!(s.frame(T0 + i as f64 * 1000.0, false), "host pause keeps the loop alive");
        }
        assert_eq!(s.state().time_ticks, 0);

        // Keys are ignored while paused
        s.handle_key(Key::Char('u'), T0 + 10_000.0);
        assert!(s.state().input.is_empty());

        s.resume(T0 + 10_000.0);
        s.frame(T0 + 10_016.0, false);
        assert_eq!(s.state().time_ticks, 1);
        assert!(s.state().words.is_empty());
    }

    #[test]
    fn test_host_and_surface_pause_combine() {
        let (mut s, _) = session(&["uno"]);
        start(&mut s, T0);
        s.pause(T0 + 10.0);
        s.frame(T0 + 20.0, true);
        s.resume(T0 + 30.0);
        assert_eq!(s.phase(), SessionPhase::Paused, "modal still open");
        s.frame(T0 + 40.0, false);
        assert_eq!(s.phase(), SessionPhase::Active);
        assert_eq!(s.state().last_spawn_ms, T0 + 30.0);
    }

    #[test]
    fn test_completion_fires_once() {
        let (mut s, sounds) = session(&["sol"]);
        let outcomes = start(&mut s, T0);
        s.frame(T0 + 2001.0, false);
        assert_eq!(s.state().words.len(), 1);

        type_str(&mut s, "sol", T0 + 2100.0);
        assert_eq!(*outcomes.borrow(), vec![SessionOutcome::Completed { score: 1 }]);
        assert_eq!(s.phase(), SessionPhase::Stopped);
        assert!(!s.frame(T0 + 2200.0, false));

        s.handle_key(Key::Enter, T0 + 2300.0);
        s.stop();
        assert_eq!(outcomes.borrow().len(), 1);
        assert_eq!(sounds.0.borrow().iter().filter(|e| **e == SoundEffect::Gun).count(), 3);
    }

    #[test]
    fn test_game_over_after_delay_once() {
        let (mut s, sounds) = session(&["uno", "dos"]);
        let outcomes = start(&mut s, T0);
        push_word(&mut s, "uno", 1.0);
        push_word(&mut s, "dos", 1.2);

        let breach_at = T0 + 16.0;
        assert!(s.frame(breach_at, false));
        assert_eq!(
            *sounds.0.borrow(),
            vec![SoundEffect::Explosion, SoundEffect::Explosion]
        );

        assert!(s.frame(breach_at + CHIME_DELAY_MS, false));
        assert_eq!(
            sounds.0.borrow().iter().filter(|e| **e == SoundEffect::Wrong).count(),
            2
        );

        assert!(s.frame(breach_at + GAME_OVER_DELAY_MS - 1.0, false));
        assert!(outcomes.borrow().is_empty());
        assert!(!s.frame(breach_at + GAME_OVER_DELAY_MS, false));
        assert_eq!(*outcomes.borrow(), vec![SessionOutcome::GameOver { score: 0 }]);
        assert!(!s.frame(breach_at + 5000.0, false));
        assert_eq!(outcomes.borrow().len(), 1);
    }

    #[test]
    fn test_pause_postpones_game_over() {
        let (mut s, _) = session(&["uno"]);
        let outcomes = start(&mut s, T0);
        push_word(&mut s, "uno", 1.0);
        s.frame(T0 + 16.0, false);

        s.frame(T0 + 100.0, true);
        s.frame(T0 + 1100.0, false);
        assert!(outcomes.borrow().is_empty());
        s.frame(T0 + 16.0 + GAME_OVER_DELAY_MS + 999.0, false);
        assert!(outcomes.borrow().is_empty());
        s.frame(T0 + 16.0 + GAME_OVER_DELAY_MS + 1000.0, false);
        assert_eq!(outcomes.borrow().len(), 1);
    }

    #[test]
    fn test_stop_cancels_pending_outcome_and_sounds() {
        let (mut s, sounds) = session(&["uno"]);
        let outcomes = start(&mut s, T0);
        push_word(&mut s, "uno", 1.0);
        s.frame(T0 + 16.0, false);
        s.stop();
        sounds.0.borrow_mut().clear();

        assert!(!s.frame(T0 + 2000.0, false));
        assert!(outcomes.borrow().is_empty());
        assert!(sounds.0.borrow().is_empty(), "delayed buzz was cancelled");
        assert_eq!(s.score(), 0);
        assert!(s.state().words.is_empty());
    }

    #[test]
    fn test_stop_is_safe_in_any_phase() {
        let (mut s, _) = session(&["uno"]);
        s.stop();
        s.stop();
        assert_eq!(s.phase(), SessionPhase::Stopped);

        start(&mut s, T0);
        s.pause(T0 + 5.0);
        s.stop();
        assert!(!s.is_active());
        assert!(!s.frame(T0 + 10.0, false));

        // Restartable
        start(&mut s, T0 + 20.0);
        assert!(s.frame(T0 + 30.0, false));
    }

    #[test]
    fn test_start_guards() {
        let (mut s, _) = session(&["uno"]);
        start(&mut s, T0);
        assert!(!s.start(T0, |_| {}), "already running");

        let (mut empty, _) = session(&[]);
        assert!(!empty.start(T0, |_| {}));
        assert_eq!(empty.phase(), SessionPhase::Inactive);
        assert!(!empty.frame(T0, false));
    }

    #[test]
    fn test_correct_sound_flag_mutes_gun() {
        let (mut s, sounds) = session(&["sol", "mar"]);
        s.settings.correct_sound = false;
        start(&mut s, T0);
        push_word(&mut s, "sol", 800.0);
        type_str(&mut s, "so", T0 + 1.0);
        assert!(sounds.0.borrow().is_empty());
        assert_eq!(s.state().projectiles.len(), 2);
    }

    #[test]
    fn test_resized_playfield_drives_spawns() {
        let (mut s, _) = session(&["uno"]);
        start(&mut s, T0);
        s.set_playfield(Playfield::new(800.0, 600.0));

        s.frame(T0 + spawn_interval_ms(1) + 1.0, false);
        let word = &s.state().words[0];
        assert!(word.pos.x > 850.0 && word.pos.x <= 900.0, "x = {}", word.pos.x);
        assert!((120.0..=480.0).contains(&word.pos.y), "y = {}", word.pos.y);

        // Survives a restart
        s.stop();
        start(&mut s, T0);
        assert_eq!(s.state().playfield, Playfield::new(800.0, 600.0));
    }

    #[test]
    fn test_set_speed_applies_live() {
        let (mut s, _) = session(&["uno"]);
        start(&mut s, T0);
        s.set_speed(15);
        assert_eq!(s.state().speed, MAX_SPEED);
        assert_eq!(s.settings().speed, MAX_SPEED);
    }
}
