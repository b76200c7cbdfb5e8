//! Gift Hunt entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        AddEventListenerOptions, Element, EventTarget, HtmlCanvasElement, KeyboardEvent, MouseEvent,
        TouchEvent,
    };

    use gift_hunt::consts::*;
    use gift_hunt::input::{
        DoubleTapGuard, DpadButton, InputMapper, KeyAction, map_key, suppresses_default,
    };
    use gift_hunt::renderer::{CanvasRenderer, build_frame};
    use gift_hunt::scores::{self, LeaderboardView, SUBMIT_SUCCESS_TEXT, ScoreClient, SubmitError};
    use gift_hunt::settings::Settings;
    use gift_hunt::sim::{GameEvent, GameState, TickInput, collect, tick, tick_clock};
    use gift_hunt::ui::{self, MessageKind, MessageLine, ids};

    struct Game {
        state: GameState,
        input: InputMapper,
        renderer: CanvasRenderer,
        settings: Settings,
        scores: ScoreClient,
        messages: MessageLine,
        sparkle_rng: rand::rngs::ThreadRng,
    }

    impl Game {
        fn update(&mut self) {
            let input = TickInput {
                directions: self.input.directions(),
            };
            tick(&mut self.state, &input);
            self.dispatch_events();
        }

        fn render(&mut self) {
            let cmds = build_frame(&self.state, &mut self.sparkle_rng, &self.settings);
            self.renderer.render(&cmds);
            ui::render_message(self.messages.current(js_sys::Date::now()));
        }

        fn show_message(&mut self, text: impl Into<String>, kind: MessageKind) {
            self.messages.show(text, kind, js_sys::Date::now());
        }

        fn collect(&mut self) {
            if collect(&mut self.state).is_some() {
                self.dispatch_events();
            }
        }

        /// Mirror simulation events into the page
        fn dispatch_events(&mut self) {
            for event in self.state.drain_events() {
                match event {
                    GameEvent::NearItemChanged(near) => self.messages.set_prompt(near.is_some()),
                    GameEvent::ItemCollected { kind, .. } => {
                        ui::set_text(ids::FOUND, &self.state.found_count.to_string());
                        ui::add_inventory_item(kind.name());
                        self.show_message(ui::found_message(kind), MessageKind::Success);
                    }
                    GameEvent::Completed { elapsed_secs } => schedule_score_prompt(elapsed_secs),
                }
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Gift Hunt starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(ids::CANVAS)
            .expect("no canvas")
            .dyn_into()?;
        canvas.set_width((MAP_W as f32 * TILE) as u32);
        canvas.set_height((MAP_H as f32 * TILE) as u32);
        let renderer = CanvasRenderer::new(&canvas)?;

        let settings = Settings::load();
        let seed = settings.map_seed(js_sys::Date::now() as u64);
        let state = GameState::with_size(seed, MAP_W, MAP_H, settings.item_count);
        log::info!(
            "Map generated with seed {} ({} items hidden)",
            seed,
            state.total_items()
        );

        ui::set_text(ids::TOTAL, &state.total_items().to_string());
        ui::set_text(ids::FOUND, "0");
        ui::set_text(ids::TIMER, "0");

        let game = Rc::new(RefCell::new(Game {
            state,
            input: InputMapper::new(),
            renderer,
            scores: ScoreClient::new(settings.api_base.clone()),
            messages: MessageLine::new(),
            settings,
            sparkle_rng: rand::rng(),
        }));

        setup_keyboard(game.clone());
        setup_dpad(game.clone());
        setup_buttons(game.clone());
        setup_modal_backdrops();
        setup_double_tap_guard();
        start_clock(game.clone());

        load_leaderboard(&game);
        request_animation_frame(game);

        log::info!("Gift Hunt running!");
        Ok(())
    }

    fn schedule_score_prompt(elapsed_secs: u32) {
        let closure = Closure::once(move || {
            ui::set_text(ids::FINAL_TIME, &elapsed_secs.to_string());
            ui::set_modal_visible(ids::SCORE_MODAL, true);
            ui::reset_identifier_input();
        });
        if let Some(window) = web_sys::window() {
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                SCORE_PROMPT_DELAY_MS,
            );
        }
        closure.forget();
    }

    fn start_clock(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut g = game.borrow_mut();
            if tick_clock(&mut g.state) {
                ui::set_text(ids::TIMER, &g.state.elapsed_secs.to_string());
            }
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            CLOCK_PERIOD_MS,
        );
        closure.forget();
    }

    fn setup_keyboard(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let key = event.key();
                if suppresses_default(&key) {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                match map_key(&key) {
                    Some(KeyAction::Collect) => g.collect(),
                    Some(KeyAction::Move(_)) => g.input.key_down(&key),
                    None => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().input.key_up(&event.key());
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Button under a touch, read from its `data-dir` attribute
    fn touched_button(event: &TouchEvent) -> Option<DpadButton> {
        let target: Element = event.target()?.dyn_into().ok()?;
        let button = target.closest("button").ok()??;
        DpadButton::from_str(&button.get_attribute("data-dir")?)
    }

    fn setup_dpad(game: Rc<RefCell<Game>>) {
        let document = web_sys::window().unwrap().document().unwrap();
        let Some(dpad) = document.get_element_by_id(ids::DPAD) else {
            log::warn!("No #{} element, touch controls disabled", ids::DPAD);
            return;
        };

        // Touch start
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(button) = touched_button(&event) {
                    game.borrow_mut().input.dpad_press(button);
                }
            });
            let _ = dpad
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch end
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                game.borrow_mut().input.dpad_release();
            });
            let _ = dpad
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn on_click(id: &str, handler: impl FnMut(MouseEvent) + 'static) {
        let document = web_sys::window().unwrap().document().unwrap();
        let Some(el) = document.get_element_by_id(id) else {
            log::warn!("No #{} element", id);
            return;
        };
        let closure = Closure::<dyn FnMut(MouseEvent)>::new(handler);
        let _ = el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        {
            let game = game.clone();
            on_click(ids::COLLECT_BTN, move |_| game.borrow_mut().collect());
        }
        {
            let game = game.clone();
            on_click(ids::SUBMIT_BTN, move |_| submit_score(&game));
        }
        on_click(ids::CANCEL_BTN, |_| {
            ui::set_modal_visible(ids::SCORE_MODAL, false)
        });
        on_click(ids::LEADERBOARD_BTN, move |_| {
            load_leaderboard(&game);
            ui::set_modal_visible(ids::LEADERBOARD_MODAL, true);
        });
        on_click(ids::CLOSE_LEADERBOARD_BTN, |_| {
            ui::set_modal_visible(ids::LEADERBOARD_MODAL, false)
        });
        on_click(ids::FULLSCREEN_BTN, |_| ui::toggle_fullscreen());
    }

    /// Clicking the dimmed area around a modal closes it
    fn setup_modal_backdrops() {
        let document = web_sys::window().unwrap().document().unwrap();
        for id in [ids::SCORE_MODAL, ids::LEADERBOARD_MODAL] {
            let Some(modal) = document.get_element_by_id(id) else {
                continue;
            };
            let backdrop: EventTarget = modal.clone().into();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                if event.target().as_ref() == Some(&backdrop) {
                    ui::set_modal_visible(id, false);
                }
            });
            let _ = modal.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn submit_score(game: &Rc<RefCell<Game>>) {
        let identifier = ui::input_value(ids::IDENTIFIER_INPUT);
        let request = {
            let mut g = game.borrow_mut();
            let elapsed = g.state.elapsed_secs;
            g.scores.begin_submit(&identifier, elapsed)
        };

        let request = match request {
            Ok(request) => request,
            // Already pending; the button is disabled meanwhile
            Err(SubmitError::InFlight) => return,
            Err(e) => {
                game.borrow_mut().show_message(e.to_string(), MessageKind::Error);
                return;
            }
        };

        ui::set_disabled(ids::SUBMIT_BTN, true);
        let game = game.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = scores::send(&request).await;
            let outcome = game.borrow_mut().scores.finish_submit(result);
            ui::set_disabled(ids::SUBMIT_BTN, false);

            match outcome {
                Ok(()) => {
                    game.borrow_mut()
                        .show_message(SUBMIT_SUCCESS_TEXT, MessageKind::Success);
                    ui::set_modal_visible(ids::SCORE_MODAL, false);
                    load_leaderboard(&game);
                }
                Err(e) => game
                    .borrow_mut()
                    .show_message(e.to_string(), MessageKind::Error),
            }
        });
    }

    fn load_leaderboard(game: &Rc<RefCell<Game>>) {
        let fetch = game.borrow_mut().scores.begin_leaderboard();
        let game = game.clone();
        wasm_bindgen_futures::spawn_local(async move {
            let result = scores::send(&fetch.request).await;
            if !game.borrow().scores.is_current_leaderboard(fetch.generation) {
                log::debug!("Dropping stale leaderboard #{}", fetch.generation);
                return;
            }
            let view = LeaderboardView::from_response(result);
            ui::set_html(ids::LEADERBOARD, &view.to_html());
        });
    }

    /// Page-wide touchend listener that blocks double-tap zoom
    fn setup_double_tap_guard() {
        let document = web_sys::window().unwrap().document().unwrap();
        let mut guard = DoubleTapGuard::default();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
            if guard.touch_end(js_sys::Date::now()) {
                event.prevent_default();
            }
        });
        // Must be non-passive for prevent_default to take effect
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        let _ = document.add_event_listener_with_callback_and_add_event_listener_options(
            "touchend",
            closure.as_ref().unchecked_ref(),
            &options,
        );
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            game_loop(game);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>) {
        {
            let mut g = game.borrow_mut();
            g.update();
            g.render();
        }

        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Gift Hunt (native) starting...");
    log::info!("Native mode runs a headless demo - run with `trunk serve` for the web version");

    demo::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless walkthrough: route to each item over passable tiles and collect it
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use std::collections::{HashMap, VecDeque};
    use std::time::{SystemTime, UNIX_EPOCH};

    use glam::IVec2;

    use gift_hunt::consts::*;
    use gift_hunt::input::{Direction, DirectionSet};
    use gift_hunt::sim::{GameState, TickInput, TileMap, collect, is_passable, tick, tick_clock};
    use gift_hunt::{Settings, manhattan, tile_center};

    /// Frames per simulated clock second
    const FRAMES_PER_SECOND: u64 = 60;
    const MAX_FRAMES: u64 = FRAMES_PER_SECOND * 600;
    /// Close enough to a waypoint centre, in pixels
    const ARRIVE_EPSILON: f32 = PLAYER_SPEED / 2.0;

    const NEIGHBOURS: [IVec2; 4] = [IVec2::X, IVec2::NEG_X, IVec2::Y, IVec2::NEG_Y];

    pub fn run() {
        let settings = Settings::load();
        let fallback = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        let seed = settings.map_seed(fallback);
        let mut state = GameState::with_size(seed, MAP_W, MAP_H, settings.item_count);

        println!("Seed {}, {} items hidden", seed, state.total_items());
        println!("{}", state.map);

        let mut frame = 0u64;
        while !state.completed && frame < MAX_FRAMES {
            let Some(path) = route_to_next_item(&state) else {
                log::warn!("Remaining items are unreachable");
                break;
            };
            for waypoint in path {
                let target = tile_center(waypoint);
                while frame < MAX_FRAMES {
                    let Some(directions) = steer(state.player.pos, target) else {
                        break;
                    };
                    tick(&mut state, &TickInput { directions });
                    frame += 1;
                    if frame % FRAMES_PER_SECOND == 0 {
                        tick_clock(&mut state);
                    }
                }
            }
            tick(&mut state, &TickInput::default());
            frame += 1;
            if let Some(kind) = collect(&mut state) {
                println!(
                    "[{:>3}s] found {} at {:?}",
                    state.elapsed_secs,
                    kind.name(),
                    state.player.tile()
                );
            }
            state.drain_events();
        }

        println!(
            "Found {}/{} items in {}s ({} frames)",
            state.found_count,
            state.total_items(),
            state.elapsed_secs,
            frame
        );
    }

    /// One axis at a time so the box never clips a corner
    fn steer(pos: glam::Vec2, target: glam::Vec2) -> Option<DirectionSet> {
        let delta = target - pos;
        let dir = if delta.x.abs() > ARRIVE_EPSILON {
            if delta.x > 0.0 { Direction::Right } else { Direction::Left }
        } else if delta.y.abs() > ARRIVE_EPSILON {
            if delta.y > 0.0 { Direction::Down } else { Direction::Up }
        } else {
            return None;
        };
        Some(DirectionSet::none().with(dir))
    }

    /// Shortest tile path to any passable tile in pickup range of an unfound item
    fn route_to_next_item(state: &GameState) -> Option<Vec<IVec2>> {
        let goals: Vec<IVec2> = state
            .items
            .iter()
            .filter(|item| !item.found)
            .map(|item| item.tile)
            .collect();
        let is_goal = |tile: IVec2| goals.iter().any(|&g| manhattan(tile, g) <= PICKUP_RANGE);
        bfs(&state.map, state.player.tile(), is_goal)
    }

    fn bfs(map: &TileMap, start: IVec2, is_goal: impl Fn(IVec2) -> bool) -> Option<Vec<IVec2>> {
        let mut came_from: HashMap<IVec2, IVec2> = HashMap::new();
        let mut queue = VecDeque::from([start]);
        came_from.insert(start, start);

        while let Some(tile) = queue.pop_front() {
            if is_goal(tile) {
                let mut path = vec![tile];
                let mut cur = tile;
                while cur != start {
                    cur = came_from[&cur];
                    path.push(cur);
                }
                path.reverse();
                return Some(path);
            }
            for step in NEIGHBOURS {
                let next = tile + step;
                if is_passable(map, next) && !came_from.contains_key(&next) {
                    came_from.insert(next, tile);
                    queue.push_back(next);
                }
            }
        }
        None
    }
}
