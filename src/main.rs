//! Throwable entry point
//!
//! Handles platform-specific initialization and runs the tick loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_toy {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, HtmlElement, MouseEvent, Performance, Window};

    use throwable::platform::{Clock, LoopScheduler, Surface};
    use throwable::{LaunchConfig, Session, Tuning};

    /// `performance.now()` clock
    struct PerformanceClock {
        performance: Performance,
    }

    impl Clock for PerformanceClock {
        fn now_ms(&self) -> f64 {
            self.performance.now()
        }
    }

    /// The `#throwable` element plus the two score readouts
    struct DomSurface {
        object: HtmlElement,
        score: Element,
        high_score: Element,
    }

    impl DomSurface {
        fn set_style(&self, property: &str, value: &str) {
            let _ = self.object.style().set_property(property, value);
        }

        fn apply_launch_config(&self, config: &LaunchConfig) {
            if let Some(color) = config.background_color() {
                self.set_style("background-color", color);
            }
            if let Some(image) = config.background_image() {
                self.set_style("background-image", &image);
            }
        }
    }

    impl Surface for DomSurface {
        fn set_object_position(&mut self, position: Vec2) {
            self.set_style("left", &format!("{}px", position.x));
            self.set_style("top", &format!("{}px", position.y));
        }

        fn set_object_size(&mut self, size: Vec2) {
            self.set_style("width", &format!("{}px", size.x));
            self.set_style("height", &format!("{}px", size.y));
        }

        fn set_score_text(&mut self, text: &str) {
            self.score.set_text_content(Some(text));
        }

        fn set_high_score_text(&mut self, text: &str) {
            self.high_score.set_text_content(Some(text));
        }
    }

    /// Toy instance shared by the timer and the event listeners
    struct Toy {
        session: Session,
        scheduler: LoopScheduler,
        surface: DomSurface,
        clock: PerformanceClock,
    }

    fn missing(what: &str) -> JsValue {
        JsValue::from_str(&format!("missing {}", what))
    }

    fn element<T: JsCast>(document: &Document, selector: &str) -> Result<T, JsValue> {
        document
            .query_selector(selector)?
            .ok_or_else(|| missing(selector))?
            .dyn_into::<T>()
            .map_err(|_| JsValue::from_str(&format!("{} has the wrong element type", selector)))
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Throwable starting...");

        let window = web_sys::window().ok_or_else(|| missing("window"))?;
        let document = window.document().ok_or_else(|| missing("document"))?;
        let root = document
            .document_element()
            .ok_or_else(|| missing("document element"))?;
        let viewport = Vec2::new(root.client_width() as f32, root.client_height() as f32);
        let clock = PerformanceClock {
            performance: window.performance().ok_or_else(|| missing("performance"))?,
        };

        let surface = DomSurface {
            object: element(&document, "#throwable")?,
            score: element(&document, "#score")?,
            high_score: element(&document, "#high-score")?,
        };
        surface.apply_launch_config(&LaunchConfig::from_location());

        let tuning = Tuning::load();
        let scheduler = LoopScheduler::new(tuning.step_ms);
        let session = Session::new(viewport, tuning, clock.now_ms());
        let toy = Rc::new(RefCell::new(Toy {
            session,
            scheduler,
            surface,
            clock,
        }));

        setup_click_handler(&document, toy.clone())?;
        setup_page_lifecycle(&window, toy.clone())?;

        let generation = {
            let mut t = toy.borrow_mut();
            t.scheduler.start();
            t.scheduler.generation()
        };
        main_loop(toy, generation);

        log::info!("Throwable running!");
        Ok(())
    }

    fn setup_click_handler(document: &Document, toy: Rc<RefCell<Toy>>) -> Result<(), JsValue> {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            let at = Vec2::new(event.client_x() as f32, event.client_y() as f32);
            toy.borrow_mut().session.click(at);
        });
        document.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Stop ticking when the page is hidden for good or cached, resume if it
    /// comes back from the back/forward cache. A timeout frozen with the page
    /// still fires after restore; its stale generation keeps it from ticking.
    fn setup_page_lifecycle(window: &Window, toy: Rc<RefCell<Toy>>) -> Result<(), JsValue> {
        {
            let toy = toy.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                toy.borrow_mut().scheduler.stop();
            });
            window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let restarted = {
                    let mut t = toy.borrow_mut();
                    t.scheduler.start().then(|| t.scheduler.generation())
                };
                if let Some(generation) = restarted {
                    main_loop(toy.clone(), generation);
                }
            });
            window.add_event_listener_with_callback("pageshow", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    /// One tick of the chain started under `generation`
    fn main_loop(toy: Rc<RefCell<Toy>>, generation: u64) {
        let next = {
            let mut guard = toy.borrow_mut();
            let t = &mut *guard;
            if !t.scheduler.is_current(generation) {
                return;
            }
            let frame = t.session.tick(t.clock.now_ms());
            frame.present(&mut t.surface);
            t.scheduler.complete_tick(generation)
        };

        if let Some(delay) = next {
            schedule_tick(toy, generation, delay);
        }
    }

    fn schedule_tick(toy: Rc<RefCell<Toy>>, generation: u64, delay_ms: u32) {
        let Some(window) = web_sys::window() else {
            log::error!("Window gone, tick loop halted");
            return;
        };
        let callback = Closure::once_into_js(move || main_loop(toy, generation));
        if let Err(e) = window.set_timeout_with_callback_and_timeout_and_arguments_0(
            callback.unchecked_ref(),
            delay_ms as i32,
        ) {
            log::error!("Failed to schedule tick: {:?}", e);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_toy::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use glam::Vec2;
    use throwable::platform::HeadlessRunner;
    use throwable::{LaunchConfig, Tuning};

    env_logger::init();
    log::info!("Throwable (native) starting...");
    log::info!("Native mode runs headless - serve the wasm build for the interactive page");

    let config = LaunchConfig::from_location();
    if let Some(image) = config.background_image() {
        log::info!("Object background: {}", image);
    }

    let viewport = Vec2::new(1280.0, 720.0);
    let mut runner = HeadlessRunner::new(viewport, Tuning::load());

    // Let the ball drop, then fling it at each corner in turn.
    let throws = [
        Vec2::ZERO,
        Vec2::new(viewport.x, 0.0),
        Vec2::new(viewport.x, viewport.y),
        Vec2::new(0.0, viewport.y),
    ];
    runner.run(60);
    report(&runner);
    for target in throws {
        runner.click(target);
        runner.run(45);
        report(&runner);
    }
    runner.stop();
}

#[cfg(not(target_arch = "wasm32"))]
fn report(runner: &throwable::platform::HeadlessRunner) {
    let Some(frame) = runner.last_frame() else {
        return;
    };
    println!(
        "t={:>6.0}ms  score={:>5}  high={:>5}  pos=({:>7.1}, {:>7.1})  size=({:>5.1}, {:>5.1})",
        runner.now_ms(),
        frame.display_score(),
        frame.display_high_score(),
        frame.object.position.x,
        frame.object.position.y,
        frame.object.size.x,
        frame.object.size.y,
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
