//! The Infinity Bounce entry point
//!
//! Handles platform-specific initialization and runs the game loop. On the
//! web this drives the canvas, DOM HUD and Web Audio; natively it runs a
//! headless autopilot and logs a summary of each run.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent};

    use infinity_bounce::audio::{self, AudioSink, WebAudio};
    use infinity_bounce::consts::*;
    use infinity_bounce::input::{Direction, InputState, Key, key_from_code};
    use infinity_bounce::renderer::{RenderState, build_scene};
    use infinity_bounce::sim::{GameEvent, GamePhase, GameState, MenuAnimation, tick};
    use infinity_bounce::{Layout, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        menu: MenuAnimation,
        settings: Settings,
        layout: Layout,
        render_state: Option<RenderState>,
        audio: WebAudio,
        input: InputState,
        accumulator: f32,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
        last_phase: GamePhase,
        /// Result of the last finished run, for the game-over screen
        last_result: Option<(u64, bool)>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings, layout: Layout) -> Self {
            Self {
                state: GameState::new(seed, layout.viewport()),
                menu: MenuAnimation::new(layout.menu_bounds(), seed ^ 0x5eed),
                audio: WebAudio::new(&settings),
                settings,
                layout,
                render_state: None,
                input: InputState::new(),
                accumulator: 0.0,
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
                last_phase: GamePhase::Menu,
                last_result: None,
            }
        }

        /// Run simulation ticks
        fn update(&mut self, dt: f32, time: f64) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.snapshot();
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;

                // Clear one-shot inputs after processing
                self.input.after_tick();

                if self.state.phase == GamePhase::Menu {
                    if self.last_phase != GamePhase::Menu {
                        self.menu.reset();
                    }
                    self.menu.step();
                }
                self.last_phase = self.state.phase;
            }
            // Drop backlog we could not simulate
            if substeps == MAX_SUBSTEPS {
                self.accumulator = self.accumulator.min(SIM_DT);
            }

            let events = self.state.drain_events();
            for event in &events {
                if let GameEvent::GameOver { score, new_best } = event {
                    self.last_result = Some((*score, *new_best));
                }
            }
            audio::dispatch(&mut self.audio, &events);
            self.audio.update(dt as f64 * 1000.0);

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Calculate FPS from oldest to newest frame
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let Some(render_state) = self.render_state.as_mut() else {
                return;
            };
            let vertices = build_scene(&self.state, Some(&self.menu), &self.settings);
            match render_state.render(&vertices) {
                Ok(_) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                    render_state.reconfigure();
                }
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    log::error!("Out of memory!");
                }
                Err(e) => log::warn!("Render error: {:?}", e),
            }
        }

        /// Apply a new window size to the canvas, sim and renderer
        fn apply_layout(&mut self, layout: Layout, canvas: &HtmlCanvasElement, dpr: f64) {
            let (width, height) = size_canvas(canvas, &layout, dpr);
            self.layout = layout;
            self.state.set_viewport(layout.viewport());
            self.menu.set_bounds(layout.menu_bounds());
            if let Some(render_state) = self.render_state.as_mut() {
                let logical = (layout.canvas_width as f32, layout.canvas_height as f32);
                render_state.resize(width, height, logical);
            }
        }

        /// Update HUD elements in DOM
        fn update_hud(&self, document: &Document) {
            let phase = self.state.phase;
            let in_run = matches!(phase, GamePhase::Playing | GamePhase::Dying);

            set_visible(document, "hud", phase != GamePhase::Menu);
            set_text(document, "#hud-score .hud-value", &self.state.score.to_string());
            set_text(
                document,
                "#hud-best .hud-value",
                &self.state.high_score.best().to_string(),
            );
            set_text(
                document,
                "#hud-combo .hud-value",
                &self.state.combo.display.to_string(),
            );
            set_text(
                document,
                "#hud-tier .hud-value",
                &self.state.current_archetype().hud_label(),
            );

            set_visible(document, "hud-fps", self.settings.show_fps);
            if self.settings.show_fps {
                set_text(document, "#hud-fps .hud-value", &self.fps.to_string());
            }

            // Combo banner
            match self.state.combo.banner_text().filter(|_| in_run) {
                Some(text) => {
                    set_visible(document, "combo-banner", true);
                    set_text(document, "#combo-banner", text);
                }
                None => set_visible(document, "combo-banner", false),
            }

            set_visible(document, "menu-screen", phase == GamePhase::Menu);
            set_visible(document, "touch-controls", self.layout.mobile && in_run);

            set_visible(document, "game-over", phase == GamePhase::GameOver);
            if phase == GamePhase::GameOver {
                let (score, new_best) = self.last_result.unwrap_or((self.state.score, false));
                set_text(document, "#final-score", &score.to_string());
                set_text(
                    document,
                    "#final-best",
                    &self.state.high_score.best().to_string(),
                );
                set_visible(document, "new-best", new_best);
            }
        }
    }

    fn set_text(document: &Document, selector: &str, text: &str) {
        if let Some(el) = document.query_selector(selector).ok().flatten() {
            if el.text_content().as_deref() != Some(text) {
                el.set_text_content(Some(text));
            }
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let class = if visible { "" } else { "hidden" };
            let _ = el.set_attribute("class", class);
        }
    }

    /// Size the canvas backing store and CSS box; returns device pixels
    fn size_canvas(canvas: &HtmlCanvasElement, layout: &Layout, dpr: f64) -> (u32, u32) {
        let width = (layout.canvas_width as f64 * dpr) as u32;
        let height = (layout.canvas_height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let _ = canvas.set_attribute(
            "style",
            &format!(
                "width:{}px;height:{}px",
                layout.canvas_width, layout.canvas_height
            ),
        );
        (width, height)
    }

    fn window_layout(window: &web_sys::Window) -> Layout {
        let w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(720.0);
        let h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(960.0);
        Layout::from_window(w, h)
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("The Infinity Bounce starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        // Hide loading indicator
        set_visible(&document, "loading", false);

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let settings = Settings::load();
        let layout = window_layout(&window);
        let dpr = window.device_pixel_ratio();
        let (width, height) = size_canvas(&canvas, &layout, dpr);

        // Initialize game
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let game = Rc::new(RefCell::new(Game::new(seed, settings, layout)));
        log::info!("Game initialized with seed: {}", seed);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("Failed to create surface: {e}")))?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to get adapter: {e}")))?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let logical = (layout.canvas_width as f32, layout.canvas_height as f32);
        let render_state = RenderState::new(surface, &adapter, width, height, logical)
            .await
            .map_err(|e| JsValue::from_str(&format!("Failed to create device: {e}")))?;
        game.borrow_mut().render_state = Some(render_state);

        // Set up input handlers
        setup_keyboard(game.clone())?;
        setup_buttons(&document, game.clone());
        setup_touch_controls(&document, game.clone());
        setup_resize(canvas, game.clone())?;

        // Start game loop
        request_animation_frame(game);

        log::info!("The Infinity Bounce running!");
        Ok(())
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let Some(key) = key_from_code(&event.code()) else {
                    return;
                };
                // Keep arrows and space from scrolling the page
                if matches!(key, Key::Left | Key::Right | Key::Jump) {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.key_down(key, event.repeat());
            });
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = key_from_code(&event.code()) {
                    game.borrow_mut().input.key_up(key);
                }
            });
            window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Window blur: forget held keys so the ball does not run away
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                game.borrow_mut().input.clear();
            });
            window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn on_click(document: &Document, id: &str, handler: impl FnMut(web_sys::Event) + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(web_sys::Event)>::new(handler);
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(document: &Document, game: Rc<RefCell<Game>>) {
        for id in ["start-btn", "restart-btn"] {
            let game = game.clone();
            on_click(document, id, move |_event| {
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.input.request_start();
            });
        }

        on_click(document, "menu-btn", move |_event| {
            game.borrow_mut().input.request_menu();
        });
    }

    fn setup_touch_controls(document: &Document, game: Rc<RefCell<Game>>) {
        let buttons: [(&str, Option<Direction>); 3] = [
            ("touch-left", Some(Direction::Left)),
            ("touch-right", Some(Direction::Right)),
            ("touch-jump", None),
        ];

        for (id, direction) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            // Touch and mouse both count as a tap
            for event_name in ["touchstart", "mousedown"] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    g.audio.resume();
                    match direction {
                        Some(direction) => g.input.touch_move(direction),
                        None => g.input.touch_jump(),
                    }
                });
                let _ = btn
                    .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
                closure.forget();
            }
        }
    }

    fn setup_resize(canvas: HtmlCanvasElement, game: Rc<RefCell<Game>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let layout = window_layout(&window);
            let dpr = window.device_pixel_ratio();
            let mut g = game.borrow_mut();
            if g.layout != layout {
                log::info!(
                    "Resized to {}x{} ({})",
                    layout.canvas_width,
                    layout.canvas_height,
                    if layout.mobile { "mobile" } else { "desktop" }
                );
                g.apply_layout(layout, &canvas, dpr);
            }
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            // Calculate delta time
            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt, time);
            g.render();
            if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                g.update_hud(&document);
            }
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_game::run().await {
        log::error!("Startup failed: {:?}", e);
        web_sys::console::error_1(&e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use serde::Serialize;

    use infinity_bounce::Settings;
    use infinity_bounce::audio::{self, AudioSink, NullAudio};
    use infinity_bounce::consts::TICK_MS;
    use infinity_bounce::sim::{DeathCause, GameEvent, GamePhase, GameState, TickInput, Viewport, tick};

    /// Ticks after which a run is cut short
    const MAX_RUN_TICKS: u64 = 60 * 60 * 5;
    const RUNS: u32 = 3;

    /// What a finished run looked like
    #[derive(Debug, Serialize)]
    struct RunSummary {
        run: u32,
        seed: u64,
        ticks: u64,
        score: u64,
        platforms: u32,
        tier: &'static str,
        cause: Option<DeathCause>,
        best: u64,
        new_best: bool,
        finished_runs: u32,
    }

    /// Steer toward the lowest platform above the ball and hop when grounded
    fn autopilot(state: &GameState) -> TickInput {
        let ball = &state.ball;
        let target = state
            .platforms
            .iter()
            .filter(|p| !p.broken && p.top() < ball.bottom() - 1.0)
            .max_by(|a, b| a.top().total_cmp(&b.top()));

        let mut input = TickInput::default();
        if let Some(target) = target {
            let center = target.left() + target.size.x / 2.0;
            let dx = center - ball.pos.x;
            if dx.abs() > target.size.x / 4.0 {
                input.left = dx < 0.0;
                input.right = dx > 0.0;
            }
        }
        // Air jump near the apex
        input.jump = ball.grounded || (ball.can_double_jump && ball.vel.y > -1.0);
        input
    }

    pub fn run(settings: Settings) {
        let seed = settings.seed.unwrap_or_else(rand::random);
        let mut state = GameState::new(seed, Viewport::default());
        let mut sink = NullAudio::default();
        log::info!("Headless autopilot, seed {}", seed);

        for run in 1..=RUNS {
            tick(
                &mut state,
                &TickInput {
                    start: true,
                    ..Default::default()
                },
            );

            let mut cause = None;
            let mut new_best = false;
            while state.phase != GamePhase::GameOver && state.time_ticks < MAX_RUN_TICKS {
                let input = if state.phase == GamePhase::Playing {
                    autopilot(&state)
                } else {
                    TickInput::default()
                };
                tick(&mut state, &input);

                let events = state.drain_events();
                for event in &events {
                    match event {
                        GameEvent::Died { cause: c } => cause = Some(*c),
                        GameEvent::GameOver { new_best: b, .. } => new_best = *b,
                        GameEvent::Combo { banner, .. } => log::debug!("{}", banner),
                        _ => {}
                    }
                }
                audio::dispatch(&mut sink, &events);
                sink.update(TICK_MS);
            }

            if state.phase != GamePhase::GameOver {
                log::warn!(
                    "Run {} hit the tick limit at score {}{}",
                    run,
                    state.score,
                    if state.high_score.qualifies(state.score) {
                        " (would have been a new best)"
                    } else {
                        ""
                    }
                );
                sink.stop_music();
            }

            let summary = RunSummary {
                run,
                seed,
                ticks: state.time_ticks,
                score: state.score,
                platforms: state.platform_count,
                tier: state.current_archetype().name(),
                cause,
                best: state.high_score.best(),
                new_best,
                finished_runs: state.high_score.runs,
            };
            match serde_json::to_string(&summary) {
                Ok(json) => log::info!("{}", json),
                Err(e) => log::error!("Could not encode summary: {}", e),
            }
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("The Infinity Bounce (native) starting...");
    log::info!("Native mode runs headless - use `trunk serve` for the web version");

    let path = std::env::args().nth(1).map(std::path::PathBuf::from);
    let settings = infinity_bounce::Settings::load(path.as_deref());
    headless::run(settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
