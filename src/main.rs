//! Cube Maze entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use cube_maze::Settings;
    use cube_maze::audio::{AudioManager, SoundEffect};
    use cube_maze::platform::{FpsCounter, FrameClock};
    use cube_maze::renderer::{FollowCamera, SceneRenderState};
    use cube_maze::sim::{GameEvent, GamePhase, GameState, InputState, TickInput, tick};
    use cube_maze::tuning::Tuning;

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        render_state: Option<SceneRenderState>,
        audio: AudioManager,
        clock: FrameClock,
        fps: FpsCounter,
        keys: InputState,
        // One-shot commands, consumed by the next tick
        pause: bool,
        skip_level: bool,
        autopilot: bool,
        /// Set when the level text in the HUD needs refreshing
        hud_dirty: bool,
        /// Stop ticking after an unrecoverable sim error
        halted: bool,
    }

    impl Game {
        fn new(state: GameState, settings: Settings) -> Self {
            let mut audio = AudioManager::new();
            audio.set_master_volume(settings.master_volume);
            audio.set_muted(settings.muted);
            Self {
                state,
                settings,
                render_state: None,
                audio,
                clock: FrameClock::new(),
                fps: FpsCounter::default(),
                keys: InputState::default(),
                pause: false,
                skip_level: false,
                autopilot: false,
                hud_dirty: true,
                halted: false,
            }
        }

        /// Run simulation ticks for this frame
        fn update(&mut self, time: f64) {
            let ticks = self.clock.advance(time);
            self.fps.record(time);
            if self.halted {
                return;
            }

            for _ in 0..ticks {
                let input = TickInput {
                    keys: self.keys,
                    pause: self.pause,
                    skip_level: self.skip_level,
                    autopilot: self.autopilot,
                };
                if input.pause {
                    self.audio.play(SoundEffect::Pause);
                    self.hud_dirty = true;
                }
                if let Err(e) = tick(&mut self.state, &input) {
                    log::error!("Level load failed: {}", e);
                    self.halted = true;
                    break;
                }

                self.pause = false;
                self.skip_level = false;
            }

            for event in self.state.drain_events() {
                if matches!(event, GameEvent::LevelLoaded { .. }) {
                    self.hud_dirty = true;
                }
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.state) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&mut self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if self.settings.show_fps {
                set_text(&document, "#hud-fps .hud-value", &self.fps.fps().to_string());
            }

            if !self.hud_dirty {
                return;
            }
            self.hud_dirty = false;

            set_text(&document, "#hud-level .hud-value", &self.state.level().to_string());
            let dimension = self.state.dimension();
            set_text(
                &document,
                "#hud-size .hud-value",
                &format!("{}x{}", dimension, dimension),
            );
            set_hidden(&document, "hud-fps", !self.settings.show_fps);
            set_hidden(&document, "pause-menu", self.state.phase != GamePhase::Paused);
        }

        /// Queue a pause unless already paused
        fn auto_pause(&mut self, reason: &str) {
            if self.state.phase == GamePhase::Playing && !self.pause {
                self.pause = true;
                log::info!("Auto-paused ({})", reason);
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    /// Toggle the `hidden` class, leaving the element's other classes alone
    fn set_hidden(document: &Document, id: &str, hidden: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn canvas_pixel_size(window: &web_sys::Window, canvas: &HtmlCanvasElement) -> (u32, u32) {
        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width() as f64 * dpr) as u32;
        let height = (canvas.client_height() as f64 * dpr) as u32;
        (width.max(1), height.max(1))
    }

    fn js_err(e: impl std::fmt::Display) -> JsValue {
        JsValue::from_str(&e.to_string())
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).map_err(js_err)?;

        log::info!("Cube Maze starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        set_hidden(&document, "loading", true);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let (width, height) = canvas_pixel_size(&window, &canvas);
        canvas.set_width(width);
        canvas.set_height(height);

        // Initialize game
        let settings = Settings::load();
        let tuning = settings.apply_to(&Tuning::default());
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let state = GameState::new(seed, tuning).map_err(js_err)?;
        log::info!("Game initialized with seed: {}", seed);

        let camera = FollowCamera::from_settings(&settings);
        let game = Rc::new(RefCell::new(Game::new(state, settings)));

        // Initialize WebGPU, falling back to WebGL2
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(js_err)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(js_err)?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = SceneRenderState::new(surface, &adapter, width, height, camera)
            .await
            .map_err(js_err)?;
        game.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(game.clone());
        setup_resize(&canvas, game.clone());
        setup_pause_menu(game.clone());
        setup_auto_pause(game.clone());

        set_hidden(&document, "hud", false);

        request_animation_frame(game);

        log::info!("Cube Maze running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                let key = event.key();

                // Browsers only allow audio after a gesture
                g.audio.resume();

                if g.keys.handle_key(&key, true) {
                    // Arrow keys would otherwise scroll the page
                    event.prevent_default();
                    return;
                }
                if event.repeat() {
                    return;
                }
                match key.as_str() {
                    "Escape" => g.pause = true,
                    "+" | "=" => g.skip_level = true, // Debug: skip to next level
                    "i" | "I" => {
                        g.autopilot = !g.autopilot;
                        log::info!("Autopilot: {}", g.autopilot);
                    }
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keys.handle_key(&event.key(), false);
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_resize(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else { return };
            let (width, height) = canvas_pixel_size(&window, &canvas);
            canvas.set_width(width);
            canvas.set_height(height);
            if let Some(render_state) = game.borrow_mut().render_state.as_mut() {
                render_state.resize(width, height);
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn setup_pause_menu(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        if let Some(btn) = document.get_element_by_id("resume-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if g.state.phase == GamePhase::Paused {
                    g.pause = true; // Toggle back to playing
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut g = game.borrow_mut();
                    g.keys.clear();
                    g.auto_pause("tab hidden");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside): keyup never arrives, so drop held keys
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                let mut g = game.borrow_mut();
                g.keys.clear();
                g.auto_pause("window blur");
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: the autopilot plays a few levels and reports the times
///
/// Usage: `cube-maze [seed] [levels]`
#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cube_maze::Tuning;
    use cube_maze::consts::SIM_DT;
    use cube_maze::sim::{GameEvent, GameState, TickInput, tick};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Cube Maze (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    let mut args = std::env::args().skip(1);
    let seed: u64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(42);
    let levels: u32 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(3);

    let mut state = GameState::new(seed, Tuning::default())?;
    log::debug!("Level 1 layout:\n{}", state.layout.maze.to_ascii());

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    // Generous budget: far more ticks than any route through the largest maze
    let budget: u64 = (1..=levels as u64).map(|l| 2_000 * l * l).sum();
    while state.level() <= levels && state.time_ticks < budget {
        tick(&mut state, &input)?;
        for event in state.drain_events() {
            match event {
                GameEvent::ExitReached { level, ticks } => println!(
                    "level {:>3}  {:>5} ticks  ({:.1} s)",
                    level,
                    ticks,
                    ticks as f32 * SIM_DT
                ),
                GameEvent::LevelLoaded { level, .. } => {
                    log::debug!("Level {} layout:\n{}", level, state.layout.maze.to_ascii());
                }
                GameEvent::MoveBlocked => {}
            }
        }
    }

    if state.level() > levels {
        println!("✓ Autopilot cleared {} levels (seed {})", levels, seed);
        Ok(())
    } else {
        Err(format!("autopilot stuck on level {} after {} ticks", state.level(), state.time_ticks).into())
    }
}
