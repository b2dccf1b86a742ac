//! Mega Invaders entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, KeyboardEvent,
    };

    use mega_invaders::assets::AssetKind;
    use mega_invaders::audio::{self, WebAudio};
    use mega_invaders::consts::*;
    use mega_invaders::platform::{FrameClock, InputLatch, Key, input, map_key};
    use mega_invaders::renderer::{PixelSprite, RenderState, SpriteBank, build_scene};
    use mega_invaders::sim::{Simulation, autopilot_input, seeded, tick};
    use mega_invaders::ui::HudSnapshot;
    use mega_invaders::{Settings, Tuning};
    use rand_pcg::Pcg32;

    /// Widest pixel grid a decoded image is reduced to
    const SPRITE_MAX_COLS: usize = 32;

    /// Game instance holding all state
    struct Game {
        sim: Simulation,
        rng: Pcg32,
        render_state: Option<RenderState>,
        clock: FrameClock,
        latch: InputLatch,
        audio: WebAudio,
        settings: Settings,
        sprites: SpriteBank,
        /// Demo autopilot drives the held controls
        autopilot: bool,
        /// Last HUD written to the DOM
        shown_hud: Option<HudSnapshot>,
    }

    impl Game {
        fn new(seed: u64, settings: Settings, touch_detected: bool) -> Self {
            let mut sim = Simulation::new(Tuning::default(), seed);
            settings.apply_to(&mut sim, touch_detected);
            let mut audio = WebAudio::new();
            audio.set_volumes(settings.master_volume, settings.sfx_volume, settings.muted);
            Self {
                sim,
                rng: seeded(seed.rotate_left(17)),
                render_state: None,
                clock: FrameClock::new(),
                latch: InputLatch::new(),
                audio,
                settings,
                sprites: SpriteBank::default(),
                autopilot: false,
                shown_hud: None,
            }
        }

        /// Sample input, step once, route the step's side effects
        fn update(&mut self, time: f64) {
            if self.latch.take_autopilot_toggle() {
                self.autopilot = !self.autopilot;
                log::info!("Autopilot: {}", self.autopilot);
            }
            if self.latch.take_mute_toggle() {
                let muted = self.settings.toggle_muted();
                self.audio.set_volumes(
                    self.settings.master_volume,
                    self.settings.sfx_volume,
                    muted,
                );
                log::info!("Muted: {}", muted);
            }

            let dt = self.clock.advance(time);
            let mut input = self.latch.snapshot(time);
            if self.autopilot {
                let auto = autopilot_input(&self.sim, time);
                input.left = auto.left;
                input.right = auto.right;
                input.fire = auto.fire;
                input.special |= auto.special;
            }

            tick(&mut self.sim, &input, dt, &mut self.rng);

            let events = self.sim.drain_events();
            audio::dispatch(&events, &mut self.audio);
        }

        /// Render the current frame
        fn render(&mut self) {
            let vertices = build_scene(&self.sim, &self.sprites, &self.settings);
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

        fn update_hud(&mut self) {
            if self.shown_hud.as_ref() == Some(&self.sim.hud) {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let hud = self.sim.hud.clone();

            if let Some(el) = document.get_element_by_id("score") {
                el.set_text_content(Some(&hud.score.to_string()));
            }
            if let Some(el) = document.get_element_by_id("lives") {
                el.set_text_content(Some(&hud.lives.to_string()));
            }
            if let Some(el) = document.get_element_by_id("level") {
                el.set_text_content(Some(&hud.level.to_string()));
            }
            if let Some(el) = document.get_element_by_id("mega") {
                el.set_text_content(Some(hud.mega_label()));
                let _ = el.set_attribute("style", &format!("color: {}", hud.mega_color()));
            }
            if let Some(el) = document.get_element_by_id("gameOverOverlay") {
                let hidden = if hud.game_over { "false" } else { "true" };
                let _ = el.set_attribute("aria-hidden", hidden);
            }

            self.shown_hud = Some(hud);
        }
    }

    fn touch_detected(window: &web_sys::Window) -> bool {
        ["(hover: none)", "(pointer: coarse)"].iter().any(|query| {
            window
                .match_media(query)
                .ok()
                .flatten()
                .is_some_and(|list| list.matches())
        })
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Mega Invaders starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let dpr = window.device_pixel_ratio();
        let width = (canvas.client_width().max(1) as f64 * dpr) as u32;
        let height = (canvas.client_height().max(1) as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);

        let seed = js_sys::Date::now() as u64;
        let settings = Settings::load();
        let touch = touch_detected(&window);
        if let Some(body) = document.body() {
            let _ = body
                .class_list()
                .toggle_with_force("touch", settings.touch_enabled(touch));
        }
        let game = Rc::new(RefCell::new(Game::new(seed, settings, touch)));

        log::info!("Game initialized with seed: {}", seed);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(
            surface,
            &adapter,
            width,
            height,
            (CANVAS_WIDTH, CANVAS_HEIGHT),
        )
        .await
        {
            Ok(render_state) => game.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {:?}", e),
        }

        load_image(
            game.clone(),
            AssetKind::MegaProjectile,
            &["./hulk.png", "./assets/hulk.png"],
        );
        load_image(game.clone(), AssetKind::PlayerShip, &["./assets/ship.png"]);

        setup_keyboard(game.clone());
        setup_touch_controls(game.clone());
        setup_restart_buttons(game.clone());
        setup_auto_pause(game.clone());

        request_animation_frame(game);

        log::info!("Mega Invaders running!");
    }

    /// Down-sample a loaded image through a scratch 2D canvas.
    /// Fails for cross-origin images, which then draw as the stand-in.
    fn decode_image(img: &HtmlImageElement, width: u32, height: u32) -> Option<PixelSprite> {
        let document = web_sys::window()?.document()?;
        let scratch: HtmlCanvasElement = document.create_element("canvas").ok()?.dyn_into().ok()?;
        scratch.set_width(width);
        scratch.set_height(height);
        let ctx: CanvasRenderingContext2d = scratch.get_context("2d").ok()??.dyn_into().ok()?;
        ctx.draw_image_with_html_image_element(img, 0.0, 0.0).ok()?;
        let data = ctx
            .get_image_data(0.0, 0.0, width as f64, height as f64)
            .ok()?
            .data();
        PixelSprite::from_rgba(width as usize, height as usize, &data.0, SPRITE_MAX_COLS)
    }

    /// Load an image asset, trying each path in turn
    fn load_image(game: Rc<RefCell<Game>>, kind: AssetKind, paths: &'static [&'static str]) {
        let Ok(img) = HtmlImageElement::new() else {
            return;
        };
        let attempt = Rc::new(Cell::new(0usize));

        {
            let game = game.clone();
            let img_ref = img.clone();
            let onload = Closure::<dyn FnMut()>::new(move || {
                let (w, h) = (img_ref.natural_width(), img_ref.natural_height());
                let sprite = decode_image(&img_ref, w, h);
                let mut g = game.borrow_mut();
                g.sim.assets.mark_ready(kind, w as f32, h as f32);
                match kind {
                    AssetKind::PlayerShip => g.sprites.player = sprite,
                    AssetKind::MegaProjectile => g.sprites.mega = sprite,
                }
                log::info!("{:?} image loaded ({}x{})", kind, w, h);
            });
            img.set_onload(Some(onload.as_ref().unchecked_ref()));
            onload.forget();
        }

        {
            let img_ref = img.clone();
            let onerror = Closure::<dyn FnMut()>::new(move || {
                let next = attempt.get() + 1;
                attempt.set(next);
                match paths.get(next) {
                    Some(path) => img_ref.set_src(path),
                    None => {
                        log::warn!("{:?} image unavailable, using stand-in", kind);
                        game.borrow_mut().sim.assets.mark_unavailable(kind);
                    }
                }
            });
            img.set_onerror(Some(onerror.as_ref().unchecked_ref()));
            onerror.forget();
        }

        if let Some(first) = paths.first() {
            img.set_src(first);
        }
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if input::prevents_default(&key) {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                // Browsers only allow audio after a gesture
                g.audio.unlock();
                if event.repeat() {
                    return;
                }
                if let Some(control) = map_key(&key) {
                    g.latch.press(control);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(control) = map_key(&event.key()) {
                    game.borrow_mut().latch.release(control);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn add_listener(
        element: &web_sys::Element,
        events: &[&str],
        game: &Rc<RefCell<Game>>,
        action: fn(&mut Game),
    ) {
        for event in events {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |e: web_sys::Event| {
                e.prevent_default();
                action(&mut game.borrow_mut());
            });
            let _ = element
                .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch_controls(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        const HOLD: [&str; 2] = ["pointerdown", "touchstart"];
        const LIFT: [&str; 4] = ["pointerup", "pointercancel", "pointerleave", "touchend"];

        let holds: [(&str, fn(&mut Game), fn(&mut Game)); 3] = [
            (
                "btnLeft",
                |g| g.latch.press(Key::Left),
                |g| g.latch.release(Key::Left),
            ),
            (
                "btnRight",
                |g| g.latch.press(Key::Right),
                |g| g.latch.release(Key::Right),
            ),
            (
                "btnFire",
                |g| g.latch.press(Key::Fire),
                |g| g.latch.release(Key::Fire),
            ),
        ];
        for (id, down, up) in holds {
            if let Some(el) = document.get_element_by_id(id) {
                add_listener(&el, &HOLD, &game, down);
                add_listener(&el, &LIFT, &game, up);
            }
        }

        if let Some(el) = document.get_element_by_id("btnMega") {
            add_listener(&el, &["click"], &game, |g| g.latch.press(Key::Special));
        }
        if let Some(el) = document.get_element_by_id("btnPause") {
            add_listener(&el, &["click"], &game, |g| g.latch.press(Key::Pause));
        }
    }

    fn setup_restart_buttons(game: Rc<RefCell<Game>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        for id in ["restartBtn", "overlayRestartBtn"] {
            if let Some(btn) = document.get_element_by_id(id) {
                add_listener(&btn, &["click"], &game, |g| g.latch.press(Key::Restart));
            }
        }
    }

    fn setup_auto_pause(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        // Visibility change (tab switch, minimize)
        {
            let game = game.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    g.latch.release_all();
                    if g.sim.is_running() {
                        g.latch.request_pause();
                        log::info!("Auto-paused (tab hidden)");
                    }
                } else {
                    // rAF stops while hidden; don't count the gap as a frame
                    g.clock.reset();
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let mut g = game.borrow_mut();
                g.latch.release_all();
                if g.sim.is_running() {
                    g.latch.request_pause();
                    log::info!("Auto-paused (window blur)");
                }
            });
            let _ = window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
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
            g.update(time);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_game::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mega Invaders (native) starting...");
    log::info!("Native mode runs a headless autopilot session - use `trunk serve` to play");

    headless::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use mega_invaders::audio::{self, NullAudio};
    use mega_invaders::sim::{GameEvent, Simulation, autopilot_input, seeded, tick};
    use mega_invaders::Tuning;

    const FRAME_DT: f32 = 1.0 / 60.0;
    const DEFAULT_FRAMES: u32 = 60 * 60;

    /// Tuning from the file named by `INVADERS_TUNING`, or defaults
    fn load_tuning() -> Tuning {
        let Ok(path) = std::env::var("INVADERS_TUNING") else {
            return Tuning::default();
        };
        let json = match std::fs::read_to_string(&path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Cannot read tuning file {}: {}", path, e);
                return Tuning::default();
            }
        };
        match Tuning::from_json(&json) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path);
                tuning
            }
            Err(e) => {
                log::warn!("{} - using default tuning", e);
                Tuning::default()
            }
        }
    }

    fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    pub fn run() {
        let tuning = load_tuning();
        let seed: u64 = env_or("INVADERS_SEED", 0x5eed);
        let frames: u32 = env_or("INVADERS_FRAMES", DEFAULT_FRAMES);

        let mut sim = Simulation::new(tuning, seed);
        let mut rng = seeded(seed);
        let mut sink = NullAudio;
        let mut now_ms = 0.0;

        for _ in 0..frames {
            let input = autopilot_input(&sim, now_ms);
            tick(&mut sim, &input, FRAME_DT, &mut rng);

            let events = sim.drain_events();
            audio::dispatch(&events, &mut sink);
            if events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })) {
                break;
            }
            now_ms += FRAME_DT as f64 * 1000.0;
        }

        log::info!(
            "Session ended after {:.1}s of game time",
            now_ms / 1000.0
        );
        match serde_json::to_string_pretty(&sim.hud) {
            Ok(json) => println!("{}", json),
            Err(e) => log::warn!("Cannot serialise HUD: {}", e),
        }
    }
}
