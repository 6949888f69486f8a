//! Expression Shooter entry point
//!
//! Handles platform-specific initialization and runs the game loop. In the
//! browser this wires the DOM to the session; natively it plays a headless demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlCanvasElement, HtmlElement, HtmlInputElement,
        KeyboardEvent, MouseEvent, TouchEvent,
    };

    use expr_shooter::consts::*;
    use expr_shooter::persistence::{KeyValueStore, open_default_store};
    use expr_shooter::platform;
    use expr_shooter::renderer::canvas2d::Canvas2d;
    use expr_shooter::renderer::render_frame;
    use expr_shooter::sim::{GameEvent, GameState, TickInput, tick};
    use expr_shooter::{ScoreBoard, Settings};

    fn document() -> Document {
        web_sys::window()
            .and_then(|w| w.document())
            .expect("no document")
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = document().get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if hidden {
                classes.add_1("hidden")
            } else {
                classes.remove_1("hidden")
            };
        }
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    fn input_element(id: &str) -> Option<HtmlInputElement> {
        document()
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    }

    fn answer_buttons() -> Vec<HtmlElement> {
        let mut buttons = Vec::new();
        if let Ok(nodes) = document().query_selector_all(".answer-btn") {
            for i in 0..nodes.length() {
                if let Some(el) = nodes.get(i).and_then(|n| n.dyn_into::<HtmlElement>().ok()) {
                    buttons.push(el);
                }
            }
        }
        buttons
    }

    /// Attach a click handler to the element with `id`
    fn on_click(id: &str, mut handler: impl FnMut() + 'static) {
        if let Some(el) = document().get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                handler();
            });
            let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Game instance holding all state
    struct Game {
        state: GameState,
        scores: ScoreBoard<Box<dyn KeyValueStore>>,
        settings_store: Box<dyn KeyValueStore>,
        canvas: Canvas2d,
        /// Screen shake jitter (kept off the simulation RNG)
        fx_rng: Pcg32,
        input: TickInput,
        last_time: f64,
        // FPS tracking
        frame_times: [f64; 60],
        frame_index: usize,
        fps: u32,
    }

    impl Game {
        fn new(seed: u64, canvas: Canvas2d, size: Vec2) -> Self {
            let settings_store = open_default_store();
            let settings = Settings::load(&settings_store);
            Self {
                state: GameState::new(seed, size, settings),
                scores: ScoreBoard::new(open_default_store()),
                settings_store,
                canvas,
                fx_rng: Pcg32::seed_from_u64(seed.rotate_left(17)),
                input: TickInput::default(),
                last_time: 0.0,
                frame_times: [0.0; 60],
                frame_index: 0,
                fps: 0,
            }
        }

        /// Run simulation ticks and react to what happened
        fn update(&mut self, dt: f32, time: f64) {
            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input, dt);

            for event in self.state.drain_events() {
                self.handle_event(event);
            }

            // Track frame times for FPS
            self.frame_times[self.frame_index] = time;
            self.frame_index = (self.frame_index + 1) % 60;
            let oldest_time = self.frame_times[self.frame_index];
            if oldest_time > 0.0 {
                let elapsed = time - oldest_time;
                if elapsed > 0.0 {
                    self.fps = (60000.0 / elapsed).round() as u32;
                }
            }
        }

        fn handle_event(&mut self, event: GameEvent) {
            match event {
                GameEvent::QuestionSpawned { .. } => {
                    let labels = self
                        .state
                        .answers
                        .as_ref()
                        .map(|a| a.answers.clone())
                        .unwrap_or_default();
                    for (button, label) in answer_buttons().iter().zip(labels.iter()) {
                        button.set_text_content(Some(label));
                        let _ = button.class_list().remove_2("correct", "wrong");
                        let _ = button.remove_attribute("disabled");
                    }
                }
                GameEvent::Shot {
                    answer_index,
                    correct,
                } => {
                    for (i, button) in answer_buttons().iter().enumerate() {
                        let _ = button.set_attribute("disabled", "");
                        if i == answer_index {
                            let _ = button
                                .class_list()
                                .add_1(if correct { "correct" } else { "wrong" });
                        }
                    }
                }
                GameEvent::LearnPrompt { correct } => {
                    if let Some(prompt) = &self.state.learn {
                        set_text("learn-expression", &prompt.expression);
                        set_text("learn-result", &format!("= {}", prompt.correct_answer));
                        set_text("learn-explanation", &prompt.explanation);
                        if let Some(el) = document().get_element_by_id("learn-result") {
                            el.set_class_name(if correct { "correct" } else { "wrong" });
                        }
                        set_hidden("learn-hint", !prompt.requires_dismiss);
                        set_hidden("learn-popup", false);
                    }
                }
                GameEvent::GameOver { score, .. } => {
                    set_hidden("hud", true);
                    set_hidden("answers", true);
                    set_hidden("gameover-screen", false);
                    set_text("final-score-value", &score.to_string());

                    let qualifies = self.scores.is_high_score(score);
                    set_hidden("highscore-entry", !qualifies);
                    if qualifies {
                        if let Some(input) = input_element("initials-input") {
                            input.set_value("");
                            let _ = input.focus();
                        }
                    }
                }
                GameEvent::AnswerCorrect { .. }
                | GameEvent::AnswerWrong { .. }
                | GameEvent::LevelUp { .. }
                | GameEvent::Victory => {}
            }
        }

        /// Render the current frame
        fn render(&mut self) {
            let shake = self.state.effects.shake_offset(&mut self.fx_rng);
            let snapshot = self.state.snapshot();
            render_frame(&snapshot, &mut self.canvas, shake);
        }

        /// Update HUD elements in DOM
        fn update_hud(&self) {
            let hud = self.state.snapshot().hud;
            set_text("score", &hud.score.to_string());

            let lost = hud.max_lives.saturating_sub(hud.lives) as usize;
            let hearts = "❤️".repeat(hud.lives as usize) + &"🖤".repeat(lost);
            set_text("lives", &hearts);

            set_hidden("combo", !hud.show_combo);
            if hud.show_combo {
                set_text("combo", &format!("🔥 x{}", hud.combo));
            }

            // Auto-dismissed prompts close here
            if self.state.learn.is_none() {
                set_hidden("learn-popup", true);
            }

            set_hidden("fps", !self.state.settings.show_fps);
            if self.state.settings.show_fps {
                set_text("fps", &format!("{} FPS", self.fps));
            }
        }

        fn start_game(&mut self) {
            self.state.start_game();
            self.input = TickInput::default();
            for id in ["start-screen", "gameover-screen", "scores-screen", "learn-popup"] {
                set_hidden(id, true);
            }
            set_hidden("hud", false);
            set_hidden("answers", false);
            // Fresh session raised QuestionSpawned; show its answers now
            for event in self.state.drain_events() {
                self.handle_event(event);
            }
        }

        fn show_menu(&mut self) {
            self.state.return_to_menu();
            set_hidden("start-screen", false);
            for id in [
                "gameover-screen",
                "scores-screen",
                "hud",
                "answers",
                "learn-popup",
            ] {
                set_hidden(id, true);
            }
        }

        fn show_scores(&self) {
            set_hidden("start-screen", true);
            set_hidden("scores-screen", false);

            let document = document();
            let Some(list) = document.get_element_by_id("scores-list") else {
                return;
            };
            list.set_text_content(None);

            let scores = self.scores.scores();
            if scores.is_empty() {
                if let Ok(item) = document.create_element("li") {
                    item.set_text_content(Some("No scores yet!"));
                    let _ = list.append_child(&item);
                }
                return;
            }
            for (i, entry) in scores.iter().enumerate() {
                if let Ok(item) = document.create_element("li") {
                    item.set_text_content(Some(&format!(
                        "{}. {}  {}  {}",
                        i + 1,
                        entry.name,
                        entry.score,
                        entry.date
                    )));
                    let _ = list.append_child(&item);
                }
            }
        }

        fn save_high_score(&mut self) {
            let name = input_element("initials-input")
                .map(|input| input.value())
                .unwrap_or_default();
            let rank = self
                .scores
                .add_score(&name, self.state.score, &platform::today());
            match rank {
                Some(rank) => log::info!("Score {} saved at rank {}", self.state.score, rank),
                None => log::info!("Score {} did not place", self.state.score),
            }
            set_hidden("highscore-entry", true);
        }

        fn set_learn_mode(&mut self, enabled: bool) {
            self.state.set_learn_mode(enabled);
            self.state.settings.save(&mut self.settings_store);
        }

        fn resize(&mut self, canvas: &HtmlCanvasElement) {
            let container = document().get_element_by_id("game-container");
            let (w, h) = container
                .map(|c| (c.client_width(), c.client_height()))
                .unwrap_or((DEFAULT_CANVAS_WIDTH as i32, DEFAULT_CANVAS_HEIGHT as i32));
            if w <= 0 || h <= 0 {
                return;
            }
            canvas.set_width(w as u32);
            canvas.set_height(h as u32);
            self.state.resize(w as f32, h as f32);
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Expression Shooter starting...");

        let canvas = document()
            .get_element_by_id("game-canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
            .expect("no #game-canvas");
        let ctx = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
            .expect("no 2d context");

        let size = Vec2::new(canvas.width() as f32, canvas.height() as f32);
        let game = Game::new(
            platform::session_seed(),
            Canvas2d::new(canvas.clone(), ctx),
            size,
        );
        let learn_mode = game.state.settings.learn_mode;
        let game = Rc::new(RefCell::new(game));
        game.borrow_mut().resize(&canvas);

        if let Some(toggle) = input_element("learn-mode-toggle") {
            toggle.set_checked(learn_mode);
        }

        setup_input_handlers(&canvas, game.clone());
        setup_buttons(game.clone());

        // Start game loop
        request_animation_frame(game);

        log::info!("Expression Shooter running!");
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        // Mouse move and click both steer - absolute x within the canvas
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = canvas_clone.get_bounding_client_rect();
                let x = event.client_x() as f64 - rect.left();
                game.borrow_mut().input.target_x = Some(x as f32);
            });
            for kind in ["mousemove", "click"] {
                let _ = canvas
                    .add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            }
            closure.forget();
        }

        // Touch move
        {
            let game = game.clone();
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(touch) = event.touches().get(0) {
                    let rect = canvas_clone.get_bounding_client_rect();
                    let x = touch.client_x() as f64 - rect.left();
                    game.borrow_mut().input.target_x = Some(x as f32);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Answer buttons
        for (index, button) in answer_buttons().into_iter().enumerate() {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().input.shoot = Some(index);
            });
            let _ =
                button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Keyboard
        {
            let game = game.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut g = game.borrow_mut();
                match event.key().as_str() {
                    "1" => g.input.shoot = Some(0),
                    "2" => g.input.shoot = Some(1),
                    "3" => g.input.shoot = Some(2),
                    " " => g.input.dismiss = true,
                    "Escape" | "p" | "P" => g.input.pause = true,
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window resize
        {
            let canvas_clone = canvas.clone();
            let window = web_sys::window().expect("no window");
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().resize(&canvas_clone);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click("start-btn", move || game.borrow_mut().start_game());
        }
        {
            let game = game.clone();
            on_click("restart-btn", move || game.borrow_mut().start_game());
        }
        {
            let game = game.clone();
            on_click("scores-btn", move || game.borrow().show_scores());
        }
        {
            let game = game.clone();
            on_click("back-btn", move || game.borrow_mut().show_menu());
        }
        {
            let game = game.clone();
            on_click("menu-btn", move || game.borrow_mut().show_menu());
        }
        {
            let game = game.clone();
            on_click("save-score-btn", move || game.borrow_mut().save_high_score());
        }
        {
            let game = game.clone();
            on_click("learn-popup", move || game.borrow_mut().input.dismiss = true);
        }

        // Enter in the initials field saves
        if let Some(input) = input_element("initials-input") {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() == "Enter" {
                    game.borrow_mut().save_high_score();
                }
            });
            let _ = input.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Learn mode toggle
        if let Some(toggle) = input_element("learn-mode-toggle") {
            let toggle_clone = toggle.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let enabled = toggle_clone.checked();
                game.borrow_mut().set_learn_mode(enabled);
                log::info!("Learn mode: {}", enabled);
            });
            let _ =
                toggle.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
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
    log::info!("Expression Shooter (native) starting...");
    log::info!("Native mode plays a headless demo - build for wasm32 to play in the browser");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(expr_shooter::platform::session_seed);
    autoplay(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a session with a simulated player that answers correctly 80% of the time
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(seed: u64) {
    use glam::Vec2;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg32;

    use expr_shooter::consts::*;
    use expr_shooter::persistence::MemoryStore;
    use expr_shooter::sim::{GameEvent, GamePhase, GameState, TickInput, tick};
    use expr_shooter::{ScoreBoard, Settings, platform};

    /// Ten simulated minutes
    const MAX_FRAMES: u32 = 60 * 60 * 10;

    let settings = Settings {
        learn_mode: false,
        ..Default::default()
    };
    let mut state = GameState::new(
        seed,
        Vec2::new(DEFAULT_CANVAS_WIDTH, DEFAULT_CANVAS_HEIGHT),
        settings,
    );
    let mut player = Pcg32::seed_from_u64(seed ^ 0x5eed);

    log::info!("Autoplay with seed {}", seed);
    state.start_game();

    let mut frames = 0;
    while state.phase == GamePhase::Playing && frames < MAX_FRAMES {
        let mut input = TickInput::default();
        if state.answers_enabled() {
            if let Some(answers) = &state.answers {
                let index = if player.random_bool(0.8) {
                    answers.correct_index
                } else {
                    (answers.correct_index + player.random_range(1..ANSWER_COUNT)) % ANSWER_COUNT
                };
                input.shoot = Some(index);
                input.target_x = Some(player.random_range(0.0..DEFAULT_CANVAS_WIDTH));
            }
        }
        tick(&mut state, &input, SIM_DT);

        for event in state.drain_events() {
            match event {
                GameEvent::LevelUp { category } => {
                    println!(
                        "[{:>5}] level up: {} ({} answered)",
                        frames,
                        category.display_name(),
                        state.questions_answered
                    );
                }
                GameEvent::Victory => println!("[{:>5}] victory!", frames),
                GameEvent::AnswerWrong { lives } => {
                    log::debug!("wrong answer, {} lives left", lives);
                }
                _ => {}
            }
        }
        frames += 1;
    }

    let mut board = ScoreBoard::new(MemoryStore::default());
    let rank = board.add_score("cpu", state.score, &platform::today());

    println!(
        "Final score {} after {} questions (max combo {}, {} lives left, phase {:?})",
        state.score, state.questions_answered, state.max_combo, state.lives, state.phase
    );
    if let Some(rank) = rank {
        println!("Leaderboard rank: {}", rank);
    }
}
