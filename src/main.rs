//! Tilt Maze entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{KeyboardEvent, TouchEvent};

    use tilt_maze::Settings;
    use tilt_maze::input::PermissionStep;
    use tilt_maze::levels;
    use tilt_maze::platform::web::{self, SharedInput, WebSensors};
    use tilt_maze::sim::{Run, RunPhase, tick};

    /// Game instance holding the current run
    struct Game {
        run: Run,
        settings: Settings,
    }

    impl Game {
        fn load_level(&mut self, number: u32) -> Result<(), levels::LevelError> {
            let level = levels::level(number)?;
            self.run = Run::new(level, &self.settings.physics);
            Ok(())
        }

        /// Branch on the run outcome: retry on a hole, next level on the goal
        fn advance(&mut self) {
            match self.run.phase {
                RunPhase::Lost => self.run.retry(),
                RunPhase::Won => {
                    let next = self.run.level_number + 1;
                    if next <= levels::level_count() {
                        if let Err(e) = self.load_level(next) {
                            log::error!("{}", e);
                        }
                    }
                }
                RunPhase::Playing | RunPhase::Paused => {}
            }
        }

        fn toggle_pause(&mut self) {
            match self.run.phase {
                RunPhase::Playing => self.run.pause(),
                RunPhase::Paused => self.run.resume(),
                _ => {}
            }
        }

        fn update_hud(&self, input: &SharedInput) {
            set_text("hud-level", &self.run.level_number.to_string());
            set_text("hud-time", &format!("{:.1}", self.run.elapsed_secs()));
            set_text("hud-mode", input.borrow().mode().as_str());
        }
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(id))
        {
            el.set_text_content(Some(text));
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Tilt Maze starting...");

        let settings = Settings::load();
        let level = match levels::level(1) {
            Ok(level) => level,
            Err(e) => {
                log::error!("{}", e);
                return;
            }
        };

        let input = WebSensors::shared(settings.input);
        input
            .borrow_mut()
            .set_listener(|notice| set_text("status", &notice.to_string()));

        let game = Rc::new(RefCell::new(Game {
            run: Run::new(level, &settings.physics),
            settings,
        }));

        setup_keyboard(game.clone(), input.clone());
        setup_touch(input.clone());
        setup_buttons(game.clone(), input.clone());

        request_animation_frame(game, input);

        log::info!("Tilt Maze running!");
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>, input: SharedInput) {
        let window = web_sys::window().unwrap();

        {
            let input = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if input.borrow_mut().key_down(&key) {
                    event.prevent_default();
                    return;
                }
                match key.as_str() {
                    "Escape" | "p" | "P" => game.borrow_mut().toggle_pause(),
                    "r" | "R" => game.borrow_mut().run.retry(),
                    "c" | "C" => input.borrow_mut().calibrate(now_ms()),
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if input.borrow_mut().key_up(&event.key()) {
                    event.prevent_default();
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_touch(input: SharedInput) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Touch start
        {
            let input = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                if let Some(touch) = event.touches().get(0) {
                    input
                        .borrow_mut()
                        .touch_start(touch.client_x() as f32, touch.client_y() as f32);
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch move
        {
            let input = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    input
                        .borrow_mut()
                        .touch_move(touch.client_x() as f32, touch.client_y() as f32);
                }
            });
            let _ = document
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                input.borrow_mut().touch_end();
            });
            let _ = document
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>, input: SharedInput) {
        let document = web_sys::window().unwrap().document().unwrap();

        // Enable tilt: the prompt has to start inside this click handler
        if let Some(btn) = document.get_element_by_id("tilt-btn") {
            let input = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let step = input.borrow_mut().begin_permission();
                if let PermissionStep::Prompt(source) = step {
                    let pending = web::prompt(source);
                    let input = input.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        let result = pending.await;
                        input.borrow_mut().finish_permission(source, result);
                    });
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("calibrate-btn") {
            let input = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                input.borrow_mut().calibrate(now_ms());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("pause-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().toggle_pause();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, input: SharedInput) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, input, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, input: SharedInput, time: f64) {
        {
            input.borrow_mut().frame(time);
            let control = input.borrow().tilt();

            let mut g = game.borrow_mut();
            if tick(&mut g.run, control).is_some() && g.run.is_finished() {
                g.advance();
            }
            g.update_hud(&input);
        }

        request_animation_frame(game, input);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tilt Maze (native) starting...");
    log::info!("Native mode has no renderer - run with `trunk serve` for the web version");

    if let Err(e) = headless_run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive level 1 with scripted keys: right along the top corridor, then down
#[cfg(not(target_arch = "wasm32"))]
fn headless_run() -> Result<(), tilt_maze::LevelError> {
    use tilt_maze::platform::HeadlessSensors;
    use tilt_maze::sim::{Run, RunPhase, tick};
    use tilt_maze::{InputNormalizer, Settings, levels};

    let settings = Settings::load();
    let mut input = InputNormalizer::with_tuning(HeadlessSensors, settings.input);
    input.set_listener(|notice| log::info!("{}", notice));

    let mut run = Run::new(levels::level(1)?, &settings.physics);
    input.key_down("ArrowRight");

    let mut turned = false;
    for frame in 0..1200u32 {
        if !turned && run.ball.pos.x > 5.2 {
            input.key_up("ArrowRight");
            input.key_down("ArrowDown");
            turned = true;
        }
        input.frame(frame as f64 * 1000.0 / 60.0);
        tick(&mut run, input.tilt());
        if run.is_finished() {
            break;
        }
    }

    match run.phase {
        RunPhase::Won => println!("Level 1 cleared in {:.2}s", run.elapsed_secs()),
        RunPhase::Lost => println!("Ball lost after {:.2}s", run.elapsed_secs()),
        _ => println!(
            "Ball at ({:.2}, {:.2}) after {:.2}s",
            run.ball.pos.x,
            run.ball.pos.y,
            run.elapsed_secs()
        ),
    }
    Ok(())
}
