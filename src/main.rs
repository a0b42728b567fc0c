//! Emoji Clash entry point
//!
//! The web build drives the simulation from `requestAnimationFrame` and draws
//! entities as DOM elements. The native build runs a headless round.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlElement, HtmlInputElement};

    use emoji_clash::SimConfig;
    use emoji_clash::sim::{Arena, SimPhase, Simulation, parse_count};
    use emoji_clash::view::{Scene, ViewOp};

    /// Game instance holding all state
    struct Game {
        sim: Simulation,
        scene: Scene,
        /// DOM element per shown entity
        elements: HashMap<u32, HtmlElement>,
        document: Document,
        arena_el: HtmlElement,
        /// Bumped on every spawn/reset so stale frame callbacks stop
        round: u64,
    }

    impl Game {
        fn new(sim: Simulation, document: Document, arena_el: HtmlElement) -> Self {
            Self {
                sim,
                scene: Scene::new(),
                elements: HashMap::new(),
                document,
                arena_el,
                round: 0,
            }
        }

        /// Arena size as currently laid out (may change on resize)
        fn arena(&self) -> Arena {
            Arena::new(
                self.arena_el.offset_width() as f32,
                self.arena_el.offset_height() as f32,
            )
        }

        fn place(el: &HtmlElement, x: f32, y: f32, radius: f32) {
            let style = el.style();
            let _ = style.set_property("left", &format!("{}px", x - radius));
            let _ = style.set_property("top", &format!("{}px", y - radius));
        }

        /// Apply view operations to the DOM
        fn apply(&mut self, ops: Vec<ViewOp>) {
            for op in ops {
                match op {
                    ViewOp::Create { id, kind, pos, radius } => {
                        let Some(el) = self
                            .document
                            .create_element("div")
                            .ok()
                            .and_then(|e| e.dyn_into::<HtmlElement>().ok())
                        else {
                            log::warn!("Could not create element for entity {}", id);
                            continue;
                        };
                        el.set_class_name("emoji");
                        el.set_text_content(Some(self.sim.roster().glyph(kind)));
                        let _ = el
                            .style()
                            .set_property("font-size", &format!("{}px", radius * 2.0));
                        Self::place(&el, pos.x, pos.y, radius);
                        let _ = self.arena_el.append_child(&el);
                        self.elements.insert(id, el);
                    }
                    ViewOp::Move { id, pos } => {
                        if let Some(el) = self.elements.get(&id) {
                            Self::place(el, pos.x, pos.y, self.sim.config.entity_radius);
                        }
                    }
                    ViewOp::Retype { id, kind } => {
                        if let Some(el) = self.elements.get(&id) {
                            el.set_text_content(Some(self.sim.roster().glyph(kind)));
                        }
                    }
                    ViewOp::Remove { id } => {
                        if let Some(el) = self.elements.remove(&id) {
                            el.remove();
                        }
                    }
                }
            }
        }

        fn render(&mut self) {
            let ops = self.scene.sync(self.sim.entities());
            self.apply(ops);
        }

        fn announce(&self, text: Option<&str>) {
            if let Some(el) = self.document.get_element_by_id("winner-announcement") {
                match text {
                    Some(text) => {
                        el.set_text_content(Some(text));
                        let _ = el.class_list().remove_1("hidden");
                    }
                    None => {
                        let _ = el.class_list().add_1("hidden");
                    }
                }
            }
        }

        /// Clear the arena and go idle
        fn reset(&mut self) {
            self.round += 1;
            self.sim.reset();
            let ops = self.scene.clear();
            self.apply(ops);
            self.announce(None);
        }

        /// Spawn a new round; returns the round number to drive, if any
        fn spawn(&mut self, count_text: &str) -> Option<u64> {
            self.reset();
            let arena = self.arena();
            let result = parse_count(count_text, self.sim.config.max_entities)
                .and_then(|count| self.sim.spawn(count, arena));
            match result {
                Ok(report) => {
                    if report.is_short() {
                        self.announce(Some(&format!(
                            "Only {} of {} fit!",
                            report.placed, report.requested
                        )));
                    }
                    self.render();
                    Some(self.round)
                }
                Err(e) => {
                    log::warn!("Spawn failed: {}", e);
                    self.announce(Some(&e.to_string()));
                    None
                }
            }
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, round: u64) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game, round);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, round: u64) {
        let keep_going = {
            let mut g = game.borrow_mut();
            if g.round != round || g.sim.phase != SimPhase::Running {
                return;
            }

            let arena = g.arena();
            let report = g.sim.tick(arena);
            g.render();

            if let Some(kind) = report.winner {
                let glyph = g.sim.roster().glyph(kind).to_string();
                g.announce(Some(&format!("{} Wins!", glyph)));
            }
            g.sim.phase == SimPhase::Running
        };

        if keep_going {
            request_animation_frame(game, round);
        }
    }

    fn show_screen(document: &Document, menu: bool) {
        let (show, hide) = if menu {
            ("main-menu", "game-screen")
        } else {
            ("game-screen", "main-menu")
        };
        if let Some(el) = document.get_element_by_id(show) {
            let _ = el.class_list().remove_1("hidden");
        }
        if let Some(el) = document.get_element_by_id(hide) {
            let _ = el.class_list().add_1("hidden");
        }
    }

    fn on_click(document: &Document, id: &str, handler: impl FnMut(web_sys::MouseEvent) + 'static) {
        if let Some(btn) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(web_sys::MouseEvent)>::new(handler);
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        } else {
            log::warn!("Missing #{} button", id);
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Emoji Clash starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let arena_el: HtmlElement = document
            .get_element_by_id("arena")
            .expect("no arena")
            .dyn_into()
            .expect("arena is not an HTML element");

        let seed = js_sys::Date::now() as u64;
        // Write back so the stored config is there to edit
        let config = SimConfig::load();
        config.save();
        let sim = match Simulation::new(config, seed) {
            Ok(sim) => sim,
            Err(e) => {
                log::warn!("Stored config rejected ({}), using defaults", e);
                Simulation::new(SimConfig::default(), seed).expect("default config is valid")
            }
        };
        let game = Rc::new(RefCell::new(Game::new(sim, document.clone(), arena_el)));
        log::info!("Game initialized with seed: {}", seed);

        {
            let doc = document.clone();
            on_click(&document, "start-button", move |_| {
                show_screen(&doc, false);
            });
        }

        {
            let game = game.clone();
            let doc = document.clone();
            on_click(&document, "back-button", move |_| {
                show_screen(&doc, true);
                game.borrow_mut().reset();
            });
        }

        {
            let doc = document.clone();
            on_click(&document, "spawn-button", move |_| {
                let text = doc
                    .get_element_by_id("emoji-count")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                    .map(|input| input.value())
                    .unwrap_or_default();
                let round = game.borrow_mut().spawn(&text);
                if let Some(round) = round {
                    request_animation_frame(game.clone(), round);
                }
            });
        }

        log::info!("Emoji Clash running!");
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
    log::info!("Emoji Clash (native) starting...");

    // Usage: emoji-clash [seed] [count] [preset]
    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(12345);
    let count = args.next().unwrap_or_else(|| "30".to_string());
    let preset = args
        .next()
        .and_then(|s| emoji_clash::Preset::from_str(&s))
        .unwrap_or_default();

    if let Err(e) = headless::run(seed, &count, preset) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use emoji_clash::sim::{Arena, Simulation, parse_count};
    use emoji_clash::{Preset, SimConfig, SimError};

    /// Give up on rounds that cycle forever
    const MAX_TICKS: u64 = 100_000;
    /// Progress log interval (about ten seconds at 60 fps)
    const REPORT_EVERY: u64 = 600;
    const ARENA: Arena = Arena::new(800.0, 600.0);

    fn census_line(sim: &Simulation) -> String {
        sim.roster()
            .kinds()
            .zip(sim.census())
            .map(|(kind, n)| format!("{} {}", sim.roster().glyph(kind), n))
            .collect::<Vec<_>>()
            .join("  ")
    }

    pub fn run(seed: u64, count: &str, preset: Preset) -> Result<(), SimError> {
        let config = SimConfig::from_preset(preset);
        let count = parse_count(count, config.max_entities)?;
        let mut sim = Simulation::new(config, seed)?;

        let report = sim.spawn(count, ARENA)?;
        println!(
            "{} preset, seed {}: {} entities ({})",
            preset.as_str(),
            seed,
            report.placed,
            census_line(&sim)
        );

        while sim.time_ticks < MAX_TICKS {
            if sim.tick(ARENA).winner.is_some() {
                break;
            }
            if sim.time_ticks % REPORT_EVERY == 0 {
                log::info!("tick {}: {}", sim.time_ticks, census_line(&sim));
            }
        }

        match sim.winner {
            Some(kind) => println!(
                "{} {} wins after {} ticks",
                sim.roster().glyph(kind),
                sim.roster().name(kind),
                sim.time_ticks
            ),
            None => println!(
                "No winner after {} ticks ({})",
                sim.time_ticks,
                census_line(&sim)
            ),
        }
        Ok(())
    }
}
