//! Jelly Jump entry point
//!
//! Web builds wire the DOM, WebGPU and Web Audio around the simulation driver.
//! Native builds run a headless autoplay session and log how it went.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent};

    use jelly_jump::audio::{AudioManager, SoundEffect};
    use jelly_jump::renderer::{RenderState, build_scene};
    use jelly_jump::sim::{GameEvent, GamePhase, Observer, Simulation, Viewport};
    use jelly_jump::{HighScores, Settings, Tuning};

    fn document() -> Option<Document> {
        web_sys::window()?.document()
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    /// Keeps the DOM HUD in sync with simulation notifications
    struct Hud {
        document: Document,
    }

    impl Observer for Hud {
        fn on_score(&mut self, score: u64) {
            set_text(&self.document, "score", &score.to_string());
        }

        fn on_combo(&mut self, combo: u32) {
            set_text(&self.document, "combo", &format!("x{combo}"));
            set_hidden(&self.document, "combo-box", combo == 0);
        }

        fn on_fever(&mut self, fever: bool) {
            set_hidden(&self.document, "fever", !fever);
            if let Some(body) = self.document.body() {
                let _ = body.class_list().toggle_with_force("fever", fever);
            }
        }

        fn on_phase(&mut self, phase: GamePhase) {
            set_hidden(&self.document, "start-screen", phase != GamePhase::Start);
            set_hidden(&self.document, "game-over", phase != GamePhase::GameOver);
            set_hidden(&self.document, "hud", phase == GamePhase::Start);
        }
    }

    /// Shared handle so the frontend can also play non-simulation sounds
    struct Sfx(Rc<RefCell<AudioManager>>);

    impl Observer for Sfx {
        fn on_event(&mut self, event: GameEvent) {
            self.0.borrow_mut().on_event(event);
        }
    }

    /// Game instance holding all state
    struct Game {
        sim: Simulation,
        render_state: Option<RenderState>,
        canvas: HtmlCanvasElement,
        settings: Settings,
        high_scores: HighScores,
        audio: Rc<RefCell<AudioManager>>,
        /// Pending animation frame, cancelled on teardown
        raf_handle: Option<i32>,
        last_phase: GamePhase,
    }

    impl Game {
        /// One-button input: jump while playing, otherwise start a run
        fn press(&mut self) {
            self.audio.borrow().resume();
            match self.sim.phase() {
                GamePhase::Playing => self.sim.request_jump(),
                GamePhase::Start => self.sim.start(),
                GamePhase::GameOver => self.restart(),
            }
        }

        fn restart(&mut self) {
            let seed = js_sys::Date::now() as u64;
            self.sim.restart(seed);
        }

        fn toggle_mute(&mut self) {
            self.settings.muted = !self.settings.muted;
            self.audio.borrow_mut().set_muted(self.settings.muted);
            self.settings.save();
            log::info!("Muted: {}", self.settings.muted);
        }

        /// Match the canvas backing store to its CSS size
        fn fit_canvas(&mut self) {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let client_w = self.canvas.client_width().max(1);
            let client_h = self.canvas.client_height().max(1);
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            self.canvas.set_width(width);
            self.canvas.set_height(height);

            self.sim.resize(client_w as f32, client_h as f32);
            let viewport = self.sim.state().viewport;
            if let Some(render_state) = &mut self.render_state {
                render_state.resize(width, height, viewport);
            }
        }

        /// Advance the simulation and react to phase changes
        fn update(&mut self, time: f64) {
            self.sim.frame(time);

            let phase = self.sim.phase();
            if phase != self.last_phase {
                if phase == GamePhase::GameOver {
                    self.record_score();
                }
                self.last_phase = phase;
            }
        }

        fn record_score(&mut self) {
            let score = self.sim.displayed_score();
            let best_streak = self.sim.state().score.best_streak;
            let Some(document) = document() else { return };

            set_text(&document, "final-score", &score.to_string());
            set_text(&document, "final-streak", &best_streak.to_string());

            let rank = self
                .high_scores
                .add_score(score, best_streak, js_sys::Date::now());
            set_hidden(&document, "new-best", rank != Some(1));
            if let Some(rank) = rank {
                self.high_scores.save();
                log::info!("High score #{rank}: {score}");
                if rank == 1 {
                    self.audio.borrow().play(SoundEffect::HighScore);
                }
            }
            if let Some(top) = self.high_scores.top_score() {
                set_text(&document, "best", &top.to_string());
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = &mut self.render_state else {
                return;
            };
            let vertices = build_scene(self.sim.state(), &self.settings);
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost) => {
                    let viewport = render_state.viewport;
                    render_state.resize(render_state.size.0, render_state.size.1, viewport);
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Floating popups are DOM text over the canvas (game px == CSS px)
        fn render_popups(&self) {
            let Some(document) = document() else { return };
            let Some(layer) = document.get_element_by_id("popups") else {
                return;
            };
            let mut html = String::new();
            for text in &self.sim.state().texts {
                let [r, g, b, _] = text.color;
                html.push_str(&format!(
                    "<span class=\"popup\" style=\"left:{:.0}px;top:{:.0}px;opacity:{:.2};color:rgb({},{},{})\">{}</span>",
                    text.pos.x,
                    text.pos.y,
                    text.life.clamp(0.0, 1.0),
                    (r * 255.0) as u8,
                    (g * 255.0) as u8,
                    (b * 255.0) as u8,
                    text.text,
                ));
            }
            layer.set_inner_html(&html);
        }

        /// Stop the loop for good and flush preferences
        fn teardown(&mut self) {
            self.sim.shutdown();
            if let (Some(handle), Some(window)) = (self.raf_handle.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(handle);
            }
            self.settings.save();
        }
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Jelly Jump starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        set_hidden(&document, "loading", true);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let viewport = Viewport::new(client_w as f32, client_h as f32);

        let settings = Settings::load();
        let high_scores = HighScores::load();
        if let Some(top) = high_scores.top_score() {
            set_text(&document, "best", &top.to_string());
        }

        let seed = js_sys::Date::now() as u64;
        let mut sim = Simulation::new(seed, Tuning::default(), viewport)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        sim.set_particle_cap(settings.max_particles());
        log::info!("Game initialized with seed: {}", seed);

        let audio = Rc::new(RefCell::new(AudioManager::with_settings(&settings)));
        sim.subscribe(Box::new(Hud {
            document: document.clone(),
        }));
        sim.subscribe(Box::new(Sfx(audio.clone())));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let dpr = window.device_pixel_ratio();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let render_state = RenderState::new(surface, &adapter, width, height, viewport)
            .await
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let game = Rc::new(RefCell::new(Game {
            sim,
            render_state: Some(render_state),
            canvas: canvas.clone(),
            settings,
            high_scores,
            audio,
            raf_handle: None,
            last_phase: GamePhase::Start,
        }));

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(&document, game.clone());
        setup_window_handlers(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Jelly Jump running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse click
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().press();
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().press();
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let Some(window) = web_sys::window() else {
                return;
            };
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.repeat() {
                    return;
                }
                match event.key().as_str() {
                    " " | "ArrowUp" | "Enter" | "w" | "W" => {
                        event.prevent_default();
                        game.borrow_mut().press();
                    }
                    "m" | "M" => game.borrow_mut().toggle_mute(),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        if let Some(btn) = document.get_element_by_id("start-btn") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let mut g = game.borrow_mut();
                g.audio.borrow().resume();
                g.sim.start();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("restart-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().restart();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_window_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        // Resize keeps the run going with the new viewport
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().fit_canvas();
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Page going away
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().teardown();
                log::info!("Torn down");
            });
            let _ = window
                .add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let handle_game = game.clone();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let handle = window
            .request_animation_frame(closure.as_ref().unchecked_ref())
            .ok();
        handle_game.borrow_mut().raf_handle = handle;
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.raf_handle = None;
            if !g.sim.is_running() {
                return;
            }

            g.update(time);
            g.render();
            g.render_popups();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    log::info!("Jelly Jump (native) starting...");
    log::info!("Native mode runs headless - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let tuning = match args.next() {
        Some(path) => jelly_jump::Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => jelly_jump::Tuning::default(),
    };

    let summary = autoplay::run(seed, tuning)?;
    println!(
        "seed {seed}: score {} after {} steps, best streak {}",
        summary.score, summary.steps, summary.best_streak
    );
    Ok(())
}

/// Headless bot that plays one run
#[cfg(not(target_arch = "wasm32"))]
mod autoplay {
    use jelly_jump::sim::{GameEvent, GamePhase, GameState, Observer, Simulation, Viewport};
    use jelly_jump::{Tuning, TuningError};

    /// Give up after five minutes of game time
    const MAX_STEPS: u64 = 5 * 60 * 60;
    /// Steps the jelly needs to rise to the next platform, roughly
    const LEAD_STEPS: f32 = 20.0;

    pub struct Summary {
        pub score: u64,
        pub best_streak: u32,
        pub steps: u64,
    }

    struct EventLog;

    impl Observer for EventLog {
        fn on_event(&mut self, event: GameEvent) {
            log::debug!("{:?}", event);
        }

        fn on_fever(&mut self, fever: bool) {
            if fever {
                log::info!("Fever!");
            }
        }
    }

    /// Jump when the next platform up is predicted to be under the jelly
    fn should_jump(state: &GameState) -> bool {
        let Some(current) = state.resting_platform() else {
            return false;
        };
        let next = state
            .platforms
            .iter()
            .filter(|p| p.pos.y < current.pos.y)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y));
        let Some(next) = next else {
            return false;
        };
        let predicted = next.center_x() + next.vel_x * LEAD_STEPS;
        (predicted - state.actor.pos.x).abs() < next.width * 0.25
    }

    pub fn run(seed: u64, tuning: Tuning) -> Result<Summary, TuningError> {
        let mut sim = Simulation::new(seed, tuning, Viewport::default())?;
        sim.subscribe(Box::new(EventLog));
        sim.start();

        let mut steps = 0;
        while sim.phase() == GamePhase::Playing && steps < MAX_STEPS {
            if should_jump(sim.state()) {
                sim.request_jump();
            }
            sim.step();
            steps += 1;
        }

        Ok(Summary {
            score: sim.displayed_score(),
            best_streak: sim.state().score.best_streak,
            steps,
        })
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
