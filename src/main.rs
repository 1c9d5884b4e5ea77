//! Ćevap Chase entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use cevap_chase::renderer::{RenderState, build_vertices};
    use cevap_chase::sim::{
        GameEvent, GameMode, GamePhase, GameState, PlayerSlot, Scene, tick,
    };
    use cevap_chase::{Controls, Settings};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        settings: Settings,
        controls: Controls,
        render_state: Option<RenderState>,
        /// An animation frame is scheduled
        running: bool,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(settings: Settings, controls: Controls) -> Self {
            let state = new_state(&settings);
            Self {
                state,
                settings,
                controls,
                render_state: None,
                running: false,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Begin a match from the menu
        fn start(&mut self, mode: GameMode) {
            // Fresh seed per match unless pinned in settings
            if self.settings.seed.is_none() {
                self.state = new_state(&self.settings);
            }
            self.controls.clear();
            self.state.start(mode, now());
            self.state.drain_events();

            let document = document();
            show(&document, "menu", false);
            show(&document, "gameArea", true);
            show(&document, "endScreen", false);
            show(&document, "p2ScoreDisplay", mode == GameMode::TwoPlayer);
            set_text(&document, "score1", "0");
            set_text(&document, "score2", "0");
            let info = match mode {
                GameMode::Single => "Koristi strelice (Arrow Keys) za kretanje.",
                GameMode::TwoPlayer => "Željko: Strelice | Davor: WASD",
            };
            set_text(&document, "controlsInfo", info);
        }

        /// Back to the menu from an end screen
        fn restart(&mut self) {
            self.state.reset();
            self.state.drain_events();
            self.controls.clear();
            self.render(&Scene::Menu);

            let document = document();
            show(&document, "endScreen", false);
            show(&document, "gameArea", false);
            show(&document, "menu", true);
            log::info!("Back to menu");
        }

        /// Run one tick and draw it. Returns true once the loop should stop.
        fn step(&mut self, time: f64) -> bool {
            let input = self.controls.snapshot();
            let frame = tick(&mut self.state, &input, time);

            if frame.phase != GamePhase::Playing {
                self.controls.clear();
            }

            let document = document();
            for event in &frame.events {
                self.apply_event(&document, event);
            }

            self.render(&frame.scene);
            self.track_fps(&document, time);

            if frame.halted {
                self.show_end_screen(&document, &frame.scene);
            }
            frame.halted
        }

        fn apply_event(&self, document: &Document, event: &GameEvent) {
            match event {
                GameEvent::ScoreChanged { slot, score } => {
                    let id = match slot {
                        PlayerSlot::One => "score1",
                        PlayerSlot::Two => "score2",
                    };
                    set_text(document, id, &score.to_string());
                }
                other => log::debug!("{:?}", other),
            }
        }

        /// Render the current frame
        fn render(&mut self, scene: &Scene) {
            let vertices = build_vertices(scene, &self.settings, &self.state.rules);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        fn track_fps(&mut self, document: &Document, time: f64) {
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;

            // Oldest sample sits at the next write position
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (59_000.0 / elapsed).round() as u32;
                }
            }

            if self.settings.show_fps {
                set_text(document, "fps", &self.fps.to_string());
            }
        }

        fn show_end_screen(&self, document: &Document, scene: &Scene) {
            let (title, message, result) = match scene {
                Scene::GameOver { score, .. } => (
                    "KABOOM!".to_string(),
                    "Željko je pojeo previše ćevapa!".to_string(),
                    format!("Konačni rezultat: {}", score),
                ),
                Scene::Winner { name, scores, .. } => (
                    "POBJEDNIK!".to_string(),
                    name.clone(),
                    format!("Rezultat: {} - {}", scores[0], scores[1]),
                ),
                _ => return,
            };
            set_text(document, "endTitle", &title);
            set_text(document, "endMessage", &message);
            set_text(document, "endScore", &result);
            set_text(document, "endHint", "Pritisni R (ili F5) za ponovnu igru.");
            show(document, "endScreen", true);
        }
    }

    fn new_state(settings: &Settings) -> GameState {
        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        match GameState::with_rules(seed, settings.rules.clone()) {
            Ok(state) => state,
            Err(e) => {
                log::error!("{}; falling back to default rules", e);
                GameState::new(seed)
            }
        }
    }

    fn now() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn document() -> Document {
        web_sys::window()
            .and_then(|w| w.document())
            .expect("no document")
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn show(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let class = if visible { "" } else { "hidden" };
            let _ = el.set_attribute("class", class);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Ćevap Chase starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let settings = Settings::load();
        let controls = match settings.controls() {
            Ok(controls) => controls,
            Err(e) => {
                log::warn!("Bad key bindings ({}); using defaults", e);
                Controls::default()
            }
        };

        let width = settings.rules.playfield_width as u32;
        let height = settings.rules.playfield_height as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let playfield = glam::Vec2::new(
            settings.rules.playfield_width,
            settings.rules.playfield_height,
        );
        show(&document, "fpsDisplay", settings.show_fps);
        let game = Rc::new(RefCell::new(Game::new(settings, controls)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(surface, &adapter, width, height, playfield).await {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Rendering disabled: {}", e),
        }

        setup_menu_buttons(game.clone());
        setup_keyboard(game.clone());

        show(&document, "menu", true);
        show(&document, "gameArea", false);
        log::info!("Ćevap Chase ready");
    }

    fn setup_menu_buttons(game: Rc<RefCell<Game>>) {
        let document = document();

        for (id, mode) in [
            ("singlePlayerBtn", GameMode::Single),
            ("1v1Btn", GameMode::TwoPlayer),
        ] {
            if let Some(btn) = document.get_element_by_id(id) {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                    let schedule = {
                        let mut g = game.borrow_mut();
                        if g.state.phase != GamePhase::Waiting {
                            return;
                        }
                        g.start(mode);
                        !std::mem::replace(&mut g.running, true)
                    };
                    if schedule {
                        request_animation_frame(game.clone());
                    }
                });
                let _ = btn
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
                closure.forget();
            } else {
                log::warn!("Missing #{}", id);
            }
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                let mut g = game.borrow_mut();
                match g.state.phase {
                    GamePhase::Playing => {
                        if g.controls.is_bound(&key) {
                            event.prevent_default();
                        }
                        g.controls.press(&key);
                    }
                    phase if phase.is_terminal() && Controls::is_restart_key(&key) => {
                        event.prevent_default();
                        g.restart();
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
                game.borrow_mut().controls.release(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
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
        let halted = {
            let mut g = game.borrow_mut();
            let halted = g.step(time);
            if halted {
                g.running = false;
            }
            halted
        };

        if !halted {
            request_animation_frame(game);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Ćevap Chase (native) starting...");
    log::info!("The playable version runs in the browser; this plays a headless demo match");

    let settings = match std::env::args().nth(1) {
        Some(path) => match cevap_chase::Settings::load_file(std::path::Path::new(&path)) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => cevap_chase::Settings::default(),
    };

    if let Err(e) = demo::run(&settings) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted single player match: player one walks straight at the food
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use cevap_chase::input::Control;
    use cevap_chase::sim::{
        GameMode, GameState, PlayerSlot, Scene, food_hitbox, player_hitbox, tick,
    };
    use cevap_chase::{Controls, Result, Settings};

    /// 60 fps
    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after ten simulated minutes
    const MAX_TICKS: u64 = 60 * 60 * 10;

    pub fn run(settings: &Settings) -> Result<()> {
        let seed = settings.seed.unwrap_or(0xCE7A9);
        let mut state = GameState::with_rules(seed, settings.rules.clone())?;
        let mut controls = settings.controls()?;

        let mut now = 0.0;
        state.start(GameMode::Single, now);

        loop {
            steer(&state, &mut controls);
            let frame = tick(&mut state, &controls.snapshot(), now);
            for event in &frame.events {
                log::info!("[{:>5}] {:?}", state.time_ticks, event);
            }

            if frame.halted {
                if let Scene::GameOver { name, score } = &frame.scene {
                    log::info!("KABOOM! {} finished on {}", name, score);
                }
                return Ok(());
            }
            if state.time_ticks >= MAX_TICKS {
                log::warn!("Demo stopped after {} ticks", state.time_ticks);
                return Ok(());
            }
            now += FRAME_MS;
        }
    }

    /// Hold the keys that move player one's hitbox toward the food
    fn steer(state: &GameState, controls: &mut Controls) {
        controls.clear();
        if !state.food.visible {
            return;
        }

        let player = state.player(PlayerSlot::One);
        let p = player_hitbox(player);
        let f = food_hitbox(&state.food);
        let dx = (f.left + f.right) / 2.0 - (p.left + p.right) / 2.0;
        let dy = (f.top + f.bottom) / 2.0 - (p.top + p.bottom) / 2.0;
        let dead_zone = player.speed / 2.0;

        let keys = controls.bindings(PlayerSlot::One).clone();
        let mut hold = |control: Control| controls.press(keys.key(control));
        if dx > dead_zone {
            hold(Control::Right);
        } else if dx < -dead_zone {
            hold(Control::Left);
        }
        if dy > dead_zone {
            hold(Control::Down);
        } else if dy < -dead_zone {
            hold(Control::Up);
        }
    }
}
