//! Pizza Shooter entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, MouseEvent};

    use pizza_shooter::Tuning;
    use pizza_shooter::consts::*;
    use pizza_shooter::sim::{FieldRect, GamePhase, GameState, TickInput, UiAction, tick};

    const FIELD_ID: &str = "play-field";

    /// Game instance holding all state
    struct Game {
        state: GameState,
        accumulator: f64,
        last_time: f64,
        input: TickInput,
    }

    impl Game {
        fn new(seed: u64, tuning: Tuning) -> Self {
            let state = GameState::with_tuning(seed, tuning).unwrap_or_else(|e| {
                log::warn!("Rejected tuning ({}), using defaults", e);
                GameState::new(seed)
            });
            Self {
                state,
                accumulator: 0.0,
                last_time: 0.0,
                input: TickInput::default(),
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt_ms: f64, field: Option<FieldRect>) {
            self.accumulator += dt_ms.min(100.0);
            self.input.field = field;

            let step = f64::from(SIM_DT_MS);
            let mut substeps = 0;
            while self.accumulator >= step && substeps < MAX_SUBSTEPS {
                tick(&mut self.state, &self.input);
                self.accumulator -= step;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.clicks.clear();
                self.input.action = None;
                self.input.pointer_x = None;
            }

            for event in self.state.drain_events() {
                log::debug!("{:?}", event);
            }
        }

        /// Update HUD and screens in DOM
        fn update_hud(&self, document: &Document) {
            let state = &self.state;
            set_text(document, "hud-score", &state.score.to_string());
            set_text(document, "hud-level", &state.level.to_string());
            set_text(document, "hud-time", &format!("{}s", state.time_left));
            set_text(document, "hud-multiplier", &format!("{}x Multiplier!", state.multiplier));
            set_visible(document, "hud-multiplier", state.multiplier > 1);

            set_visible(document, "menu-screen", state.phase == GamePhase::Menu);
            set_visible(document, "game-screen", state.phase == GamePhase::Playing);
            set_visible(document, "game-over-screen", state.phase == GamePhase::GameOver);

            if state.phase == GamePhase::GameOver {
                set_text(document, "final-score", &state.score.to_string());
                set_text(document, "final-level", &state.level.to_string());
                set_text(document, "best-level", &state.max_level.to_string());
            }

            // Entities are drawn by the page from the snapshot
            if let Some(field) = document.get_element_by_id(FIELD_ID) {
                if let Ok(json) = serde_json::to_string(&state.snapshot()) {
                    let _ = field.set_attribute("data-snapshot", &json);
                }
            }
        }
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.set_attribute("class", if visible { "" } else { "hidden" });
        }
    }

    /// The play field's bounding box, if it is laid out
    fn field_rect(document: &Document) -> Option<FieldRect> {
        let rect = document.get_element_by_id(FIELD_ID)?.get_bounding_client_rect();
        Some(FieldRect::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ))
    }

    /// Balance overrides from an inline `<script id="tuning" type="application/json">`
    fn load_tuning(document: &Document) -> Tuning {
        let Some(json) = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content())
        else {
            return Tuning::default();
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning overrides");
                tuning
            }
            Err(e) => {
                log::warn!("{}; using default tuning", e);
                Tuning::default()
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Pizza Shooter starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Game::new(seed, load_tuning(&document))));
        log::info!("Game initialized with seed: {}", seed);

        setup_input_handlers(&document, game.clone());
        setup_buttons(&document, game.clone());

        request_animation_frame(game);

        log::info!("Pizza Shooter running!");
    }

    fn setup_input_handlers(document: &Document, game: Rc<RefCell<Game>>) {
        // Pointer move is global so the turret tracks the cursor outside the field
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                game.borrow_mut().input.pointer_x = Some(event.client_x() as f32);
            });
            let _ = window
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Clicks on the play field fire
        if let Some(field) = document.get_element_by_id(FIELD_ID) {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let click = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                game.borrow_mut().input.clicks.push(click);
            });
            let _ = field.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("No #{} element; clicks will be ignored", FIELD_ID);
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        let buttons = [
            ("start-btn", UiAction::Start),
            ("restart-btn", UiAction::Restart),
            ("menu-btn", UiAction::Menu),
            ("over-menu-btn", UiAction::Menu),
        ];
        for (id, action) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.action = Some(action);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt_ms = if g.last_time > 0.0 {
                time - g.last_time
            } else {
                f64::from(SIM_DT_MS)
            };
            g.last_time = time;

            g.update(dt_ms, field_rect(&document));
            g.update_hud(&document);
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Pizza Shooter (native) starting...");
    log::info!("Native mode runs a headless demo round - use `trunk serve` for the web version");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    demo_round(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play one round with the autopilot and report the result
#[cfg(not(target_arch = "wasm32"))]
fn demo_round(seed: u64) {
    use pizza_shooter::sim::{GameEvent, GamePhase, GameState, TickInput, UiAction, tick};

    let mut state = GameState::new(seed);
    let start = TickInput {
        action: Some(UiAction::Start),
        idle_mode: true,
        ..Default::default()
    };
    tick(&mut state, &start);

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let (mut hits, mut pickups) = (0u32, 0u32);
    while state.phase == GamePhase::Playing {
        tick(&mut state, &input);
        for event in state.drain_events() {
            match event {
                GameEvent::TargetHit { .. } => hits += 1,
                GameEvent::PowerUpCollected { .. } => pickups += 1,
                other => log::debug!("{:?}", other),
            }
        }
    }

    println!(
        "Seed {}: score {}, level {}, {} targets hit, {} power-ups collected",
        seed, state.score, state.level, hits, pickups
    );
}
