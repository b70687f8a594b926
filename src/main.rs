//! Flying Words entry point
//!
//! In the browser this exposes start/stop/pause/resume to the host page and
//! runs the frame loop. Natively it plays a short headless demo run.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::Document;

    use flying_words::audio::AudioManager;
    use flying_words::platform::{self, blocking_surface_visible, now_ms};
    use flying_words::sim::{Key, Playfield};
    use flying_words::view::Frame;
    use flying_words::view::dom::DomRenderer;
    use flying_words::{Deck, LevelScope, Session, SessionOutcome, Settings};

    /// Browser-side state shared by the frame loop and event handlers
    struct App {
        document: Document,
        settings: Settings,
        session: Option<Session>,
        renderer: Option<DomRenderer>,
        /// Written by the session's completion callback, read after the loop
        /// releases its borrow
        outcome: Rc<RefCell<Option<SessionOutcome>>>,
        on_complete: Option<js_sys::Function>,
        loop_running: bool,
        /// Pending animation-frame request, cancelled on stop
        raf_id: Option<i32>,
    }

    impl App {
        fn playfield(&self) -> Playfield {
            let size = web_sys::window().map(|w| {
                (
                    w.inner_width().ok().and_then(|v| v.as_f64()),
                    w.inner_height().ok().and_then(|v| v.as_f64()),
                )
            });
            match size {
                Some((Some(w), Some(h))) => Playfield::new(w as f32, h as f32),
                _ => Playfield::default(),
            }
        }

        /// Advance and draw one frame. Returns whether to keep looping.
        fn frame(&mut self) -> bool {
            let Some(session) = self.session.as_mut() else {
                return false;
            };
            let now = now_ms();
            let blocking = blocking_surface_visible(&self.document);
            let running = session.frame(now, blocking);

            if running {
                if let Some(renderer) = self.renderer.as_mut() {
                    let frame = Frame::capture(session.state(), now, self.settings.dark_mode);
                    if let Err(e) = renderer.render(&frame) {
                        log::error!("Render failed: {:?}", e);
                    }
                }
            } else {
                self.teardown();
            }
            running
        }

        fn teardown(&mut self) {
            if let Some(renderer) = self.renderer.take() {
                renderer.detach();
            }
        }
    }

    thread_local! {
        static APP: RefCell<Option<Rc<RefCell<App>>>> = const { RefCell::new(None) };
    }

    fn app() -> Result<Rc<RefCell<App>>, JsValue> {
        APP.with(|cell| cell.borrow().clone())
            .ok_or_else(|| JsValue::from_str("flying words not initialized"))
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }
        log::info!("Flying Words starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document; flying words disabled");
            return;
        };

        let app = Rc::new(RefCell::new(App {
            document,
            settings: Settings::load(),
            session: None,
            renderer: None,
            outcome: Rc::default(),
            on_complete: None,
            loop_running: false,
            raf_id: None,
        }));
        setup_keyboard(app.clone());
        setup_resize(app.clone());
        APP.with(|cell| *cell.borrow_mut() = Some(app));
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if event.ctrl_key() || event.meta_key() || event.alt_key() {
                return;
            }
            let Some(key) = Key::from_dom(&event.key()) else {
                return;
            };
            let mut a = app.borrow_mut();
            let Some(session) = a.session.as_mut().filter(|s| s.is_active()) else {
                return;
            };
            // Keep Backspace/space from navigating or scrolling the page
            event.prevent_default();
            session.handle_key(key, now_ms());
        });
        let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let mut a = app.borrow_mut();
            let playfield = a.playfield();
            if let Some(session) = a.session.as_mut() {
                session.set_playfield(playfield);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle = app.clone();
        let closure = Closure::once(move |_time: f64| {
            game_loop(app);
        });
        let id = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok();
        // A cancelled request never runs, so the closure is leaked either way
        closure.forget();
        handle.borrow_mut().raf_id = id;
    }

    fn cancel_animation_frame(app: &mut App) {
        if let (Some(id), Some(window)) = (app.raf_id.take(), web_sys::window()) {
            window.cancel_animation_frame(id).ok();
        }
        app.loop_running = false;
    }

    fn game_loop(app: Rc<RefCell<App>>) {
        app.borrow_mut().raf_id = None;
        let keep_going = app.borrow_mut().frame();

        // Callback runs with no borrow held so it may call back into us
        deliver_outcome(&app);

        if keep_going {
            request_animation_frame(app);
        } else {
            app.borrow_mut().loop_running = false;
        }
    }

    fn deliver_outcome(app: &Rc<RefCell<App>>) {
        let (outcome, callback) = {
            let a = app.borrow();
            let outcome = a.outcome.borrow_mut().take();
            (outcome, a.on_complete.clone())
        };
        let (Some(outcome), Some(callback)) = (outcome, callback) else {
            return;
        };
        let kind = match outcome {
            SessionOutcome::Completed { .. } => "completed",
            SessionOutcome::GameOver { .. } => "game_over",
        };
        if let Err(e) = callback.call2(&JsValue::NULL, &kind.into(), &outcome.score().into()) {
            log::error!("Completion callback failed: {:?}", e);
        }
    }

    pub fn start(
        deck_json: &str,
        level_scope: Option<String>,
        on_complete: js_sys::Function,
    ) -> Result<bool, JsValue> {
        let app_rc = app()?;
        let mut guard = app_rc.borrow_mut();
        let a = &mut *guard;
        if a.session.as_ref().is_some_and(|s| s.is_active()) {
            log::warn!("Flying words already running");
            return Ok(false);
        }

        let mut deck = Deck::from_json(deck_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let seed = platform::clock_seed();
        if a.settings.shuffle_cards {
            let mut rng = <rand_pcg::Pcg32 as rand::SeedableRng>::seed_from_u64(seed);
            deck.shuffle(&mut rng);
        }
        if let Some(scope) = level_scope.and_then(|s| LevelScope::parse(&s, deck.level_count())) {
            log::info!("Drilling levels {}-{}", scope.start, scope.end);
            deck = deck.scoped(scope);
        }

        let audio = AudioManager::new(a.settings.master_volume, a.settings.sfx_volume);
        audio.resume();
        let mut session = Session::new(deck, a.settings.clone(), a.playfield(), seed).with_audio(audio);

        let sink = a.outcome.clone();
        if !session.start(now_ms(), move |outcome| *sink.borrow_mut() = Some(outcome)) {
            return Ok(false);
        }

        a.renderer = Some(DomRenderer::attach(&a.document)?);
        a.session = Some(session);
        a.on_complete = Some(on_complete);

        let needs_loop = !a.loop_running;
        a.loop_running = true;
        drop(guard);
        if needs_loop {
            request_animation_frame(app_rc);
        }
        Ok(true)
    }

    pub fn stop() {
        let Ok(app) = app() else { return };
        let mut a = app.borrow_mut();
        if let Some(session) = a.session.as_mut() {
            session.stop();
        }
        cancel_animation_frame(&mut a);
        a.teardown();
    }

    pub fn pause() {
        let Ok(app) = app() else { return };
        if let Some(session) = app.borrow_mut().session.as_mut() {
            session.pause(now_ms());
        }
    }

    pub fn resume() {
        let Ok(app) = app() else { return };
        if let Some(session) = app.borrow_mut().session.as_mut() {
            session.resume(now_ms());
        }
    }

    pub fn score() -> u32 {
        app()
            .ok()
            .and_then(|app| app.borrow().session.as_ref().map(|s| s.score()))
            .unwrap_or(0)
    }

    pub fn set_speed(raw: i32) {
        let Ok(app) = app() else { return };
        let mut a = app.borrow_mut();
        a.settings.set_speed(raw);
        a.settings.save();
        if let Some(session) = a.session.as_mut() {
            session.set_speed(raw);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

/// Start a run. `deck_json` is an array of `{question, answer, hint?}`;
/// `level_scope` is `"3"` or `"2-4"`. `on_complete(kind, score)` is called
/// once with `"completed"` or `"game_over"`.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn start_flying_words(
    deck_json: &str,
    level_scope: Option<String>,
    on_complete: js_sys::Function,
) -> Result<bool, JsValue> {
    wasm_game::start(deck_json, level_scope, on_complete)
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn stop_flying_words() {
    wasm_game::stop();
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn pause_flying_words() {
    wasm_game::pause();
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn resume_flying_words() {
    wasm_game::resume();
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn flying_words_score() -> u32 {
    wasm_game::score()
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn set_flying_words_speed(raw: i32) {
    wasm_game::set_speed(raw);
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Flying Words (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play in the browser");

    match demo::run() {
        Some(outcome) => log::info!("Demo finished: {:?}", outcome),
        None => log::warn!("Demo ran out of frames without an outcome"),
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless autopilot: types the answer of the word closest to the plane
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::cell::Cell;
    use std::rc::Rc;

    use flying_words::consts::FRAME_MS;
    use flying_words::sim::{Key, Playfield};
    use flying_words::{Card, Deck, Session, SessionOutcome, Settings};

    const DECK: &str = r#"[
        {"question": "perro", "answer": "dog"},
        {"question": "gato", "answer": "cat"},
        {"question": "casa", "answer": "house"},
        {"question": "sol", "answer": "sun"},
        {"question": "luna", "answer": "moon"},
        {"question": "agua", "answer": "water", "hint": "wa..."},
        {"question": "fuego", "answer": "fire"}
    ]"#;

    /// Frames between autopilot keystrokes
    const KEY_EVERY: u64 = 5;
    /// A simulated modal is open during these frames
    const MODAL_FRAMES: std::ops::Range<u64> = 600..720;
    const MAX_FRAMES: u64 = 60 * 60 * 5;

    pub fn run() -> Option<SessionOutcome> {
        let deck = match Deck::from_json(DECK) {
            Ok(deck) => deck,
            Err(e) => {
                log::error!("Demo deck is invalid: {}", e);
                return None;
            }
        };
        log::info!("Demo deck: {} cards in {} levels", deck.len(), deck.level_count());

        let mut settings = Settings::load();
        settings.set_speed(4);
        let mut session = Session::new(deck, settings, Playfield::default(), 2024);

        let outcome = Rc::new(Cell::new(None));
        let sink = outcome.clone();
        let mut now = 0.0;
        session.start(now, move |o| sink.set(Some(o)));

        for frame in 0..MAX_FRAMES {
            now += FRAME_MS;
            let modal_open = MODAL_FRAMES.contains(&frame);
            if !session.frame(now, modal_open) {
                break;
            }
            if !modal_open && frame % KEY_EVERY == 0 {
                if let Some(key) = next_key(&session) {
                    session.handle_key(key, now);
                }
            }
            if frame % 600 == 0 {
                log::info!(
                    "frame {:>5}: level {} score {} words {}",
                    frame,
                    session.state().group.index + 1,
                    session.score(),
                    session.state().words.len()
                );
            }
        }
        outcome.get()
    }

    /// Next keystroke toward the answer of the leftmost visible, unsolved word
    fn next_key(session: &Session) -> Option<Key> {
        let state = session.state();
        let target: &Card = state
            .words
            .iter()
            .filter(|w| w.is_targetable() && w.pos.x < state.playfield.width)
            .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
            .map(|w| &w.card)?;

        match target.answer.strip_prefix(state.input.as_str()) {
            Some(rest) => rest.chars().next().map(Key::Char),
            None => Some(Key::Enter),
        }
    }
}
