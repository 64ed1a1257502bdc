//! Tripl Vision entry point
//!
//! Wires the DOM to the interaction core and runs the background loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::{Rc, Weak};

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Document, HtmlCanvasElement, HtmlElement, PointerEvent, Window};

    use tripl_vision::content;
    use tripl_vision::renderer::canvas::CanvasSurface;
    use tripl_vision::renderer::render;
    use tripl_vision::sim::{Action, App, AppEvent, Clock, Rect, Stage};
    use tripl_vision::Settings;

    #[wasm_bindgen(inline_js = "
        export function copy_text(text) {
            if (!navigator.clipboard) {
                return Promise.reject(new Error('clipboard unavailable'));
            }
            return navigator.clipboard.writeText(text);
        }
    ")]
    extern "C" {
        fn copy_text(text: &str) -> js_sys::Promise;
    }

    type FrameClosure = Closure<dyn FnMut(f64)>;
    type PointerClosure = Closure<dyn FnMut(PointerEvent)>;

    /// Window-level pointer listeners, present only during the puzzle
    struct PointerListeners {
        on_move: PointerClosure,
        on_up: PointerClosure,
    }

    /// Browser session: the core plus everything tied to the page
    struct Shell {
        app: App,
        window: Window,
        document: Document,
        surface: Option<CanvasSurface>,
        frame_cb: Option<FrameClosure>,
        frame_handle: Option<i32>,
        pointer: Option<PointerListeners>,
    }

    impl Shell {
        /// `now_ms` shares the time origin of requestAnimationFrame timestamps
        fn clock_at(now_ms: f64) -> Clock {
            Clock {
                now_ms,
                unix_secs: (js_sys::Date::now() / 1000.0) as u64,
            }
        }

        fn clock(&self) -> Clock {
            let now_ms = match self.window.performance() {
                Some(performance) => performance.now(),
                None => js_sys::Date::now(),
            };
            Self::clock_at(now_ms)
        }

        fn dispatch(&mut self, action: Action) -> Vec<AppEvent> {
            let clock = self.clock();
            self.app.dispatch(action, clock)
        }

        /// Read the pyramid's on-screen box so hit tests follow the layout
        fn sync_pyramid_bounds(&mut self) {
            if let Some(el) = self.document.get_element_by_id("pyramid") {
                let r = el.get_bounding_client_rect();
                let rect = Rect::new(r.left() as f32, r.top() as f32, r.width() as f32, r.height() as f32);
                self.dispatch(Action::SetPyramidBounds(rect));
            }
        }

        fn cancel_frame(&mut self) {
            if let Some(handle) = self.frame_handle.take() {
                let _ = self.window.cancel_animation_frame(handle);
            }
        }

        fn request_frame(&mut self) {
            let Some(cb) = self.frame_cb.as_ref() else {
                return;
            };
            match self.window.request_animation_frame(cb.as_ref().unchecked_ref()) {
                Ok(handle) => self.frame_handle = Some(handle),
                Err(e) => log::warn!("requestAnimationFrame failed: {:?}", e),
            }
        }

        fn detach_pointer(&mut self) {
            if let Some(listeners) = self.pointer.take() {
                let _ = self.window.remove_event_listener_with_callback(
                    "pointermove",
                    listeners.on_move.as_ref().unchecked_ref(),
                );
                let _ = self.window.remove_event_listener_with_callback(
                    "pointerup",
                    listeners.on_up.as_ref().unchecked_ref(),
                );
                log::debug!("Pointer listeners removed");
            }
        }

        fn set_text(&self, id: &str, text: &str) {
            if let Some(el) = self.document.get_element_by_id(id) {
                el.set_text_content(Some(text));
            }
        }

        fn set_hidden(&self, id: &str, hidden: bool) {
            if let Some(el) = self.document.get_element_by_id(id) {
                let _ = el.class_list().toggle_with_force("hidden", hidden);
            }
        }

        fn eye_element(&self, id: u32) -> Option<HtmlElement> {
            self.document
                .query_selector(&format!(".eye[data-id='{id}']"))
                .ok()
                .flatten()
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        }

        fn render_eyes(&self) {
            for eye in self.app.eyes() {
                if let Some(el) = self.eye_element(eye.id) {
                    let style = el.style();
                    let _ = style.set_property("left", &format!("{}px", eye.pos.x));
                    let _ = style.set_property("top", &format!("{}px", eye.pos.y));
                    let _ = el.class_list().toggle_with_force("placed", eye.placed);
                }
            }
        }

        /// Show the section for the current stage and fill in its text
        fn render_stage(&self) {
            let stage = self.app.stage();
            self.set_text("enter-btn", content::button_label(Stage::Intro).unwrap_or_default());
            self.set_text("copy-btn", content::COPY_LABEL);
            self.set_text("restart-btn", content::button_label(Stage::Complete).unwrap_or_default());
            self.set_hidden("stage-intro", stage != Stage::Intro);
            self.set_hidden("stage-puzzle", stage != Stage::Puzzle);
            self.set_hidden("stage-layer", content::layer(stage).is_none());
            self.set_hidden("stage-complete", stage != Stage::Complete);

            match stage {
                Stage::Intro => {
                    self.set_text("intro-text", content::INTRO_TEXT);
                    self.set_text("intro-subtitle", content::INTRO_SUBTITLE);
                }
                Stage::Puzzle => {
                    self.set_text("puzzle-title", &content::puzzle_title(stage.layer()));
                    self.set_text("puzzle-hint", content::PUZZLE_HINT);
                    if let Some(el) = self.document.get_element_by_id("pyramid-container") {
                        let _ = el.class_list().remove_1("active");
                    }
                    self.render_eyes();
                }
                Stage::Complete => {
                    self.set_text("completion-title", content::COMPLETION_TITLE);
                    self.set_text("code-display", self.app.narrative().code().unwrap_or_default());
                    self.set_text("completion-message", content::COMPLETION_MESSAGE);
                }
                layer_stage => {
                    let Some(c) = content::layer(layer_stage) else {
                        return;
                    };
                    let narrative = self.app.narrative();
                    self.set_text("layer-title", c.title);
                    self.set_text("layer-message", c.message);
                    self.set_text("layer-hint", c.hint.unwrap_or_default());
                    self.set_hidden("layer-hint", c.hint.is_none());
                    self.set_text("layer-found", c.found_caption.unwrap_or_default());
                    self.set_hidden("layer-found", c.found_caption.is_none());
                    if layer_stage == Stage::Layer4 {
                        self.set_text(
                            "layer-summary",
                            &format!(
                                "{}\n{}",
                                content::found_summary(narrative.found()),
                                content::cipher_line(narrative.cipher_key())
                            ),
                        );
                    }
                    self.set_hidden("layer-summary", layer_stage != Stage::Layer4);
                    self.set_text(
                        "continue-btn",
                        content::button_label(layer_stage).unwrap_or(c.button),
                    );
                }
            }
        }
    }

    /// React to everything the core reported
    fn handle_events(shell: &Rc<RefCell<Shell>>, events: Vec<AppEvent>) {
        for event in events {
            match event {
                AppEvent::StageChanged { from, to } => {
                    log::debug!("Rendering {} (from {})", to, from);
                    shell.borrow().render_stage();
                }
                AppEvent::EyePlaced(_) | AppEvent::EyeUnplaced(_) => shell.borrow().render_eyes(),
                AppEvent::PuzzleSolved => {
                    let s = shell.borrow();
                    if let Some(el) = s.document.get_element_by_id("pyramid-container") {
                        let _ = el.class_list().add_1("active");
                    }
                }
                AppEvent::ListenersAttached => attach_pointer(shell),
                AppEvent::ListenersDetached => shell.borrow_mut().detach_pointer(),
                AppEvent::BackgroundStarted => start_loop(shell),
                AppEvent::BackgroundStopped => {
                    let mut s = shell.borrow_mut();
                    s.cancel_frame();
                    if let Some(surface) = s.surface.as_ref() {
                        surface.clear();
                    }
                }
                AppEvent::CopyRequested(code) => {
                    let window = shell.borrow().window.clone();
                    wasm_bindgen_futures::spawn_local(async move {
                        match JsFuture::from(copy_text(&code)).await {
                            Ok(_) => {
                                let _ = window.alert_with_message(content::COPIED_NOTICE);
                            }
                            Err(e) => log::warn!("Clipboard write failed: {:?}", e),
                        }
                    });
                }
                AppEvent::CodeGenerated(code) => log::info!("Verification code: {}", code),
                AppEvent::ElementsFound(found) => log::debug!("Found elements {:?}", found),
                AppEvent::CompletionScheduled { .. } | AppEvent::CompletionCancelled => {}
            }
        }
    }

    fn dispatch(shell: &Rc<RefCell<Shell>>, action: Action) {
        let events = shell.borrow_mut().dispatch(action);
        handle_events(shell, events);
    }

    /// Cancel any running loop, then start a fresh one. The closure holds a
    /// weak handle; `Shell` owns the closure.
    fn start_loop(shell: &Rc<RefCell<Shell>>) {
        let mut s = shell.borrow_mut();
        s.cancel_frame();
        let handle: Weak<RefCell<Shell>> = Rc::downgrade(shell);
        s.frame_cb = Some(Closure::new(move |ts: f64| {
            if let Some(shell) = handle.upgrade() {
                on_frame(&shell, ts);
            }
        }));
        s.request_frame();
        log::debug!("Background loop started");
    }

    fn on_frame(shell: &Rc<RefCell<Shell>>, ts: f64) {
        let events = {
            let mut s = shell.borrow_mut();
            s.frame_handle = None;
            let events = s.app.frame(Shell::clock_at(ts));
            let Shell { app, surface, .. } = &mut *s;
            if let Some(field) = app.background() {
                render(field, surface.as_mut());
            }
            events
        };
        handle_events(shell, events);

        let mut s = shell.borrow_mut();
        if s.app.stage().background_active() && s.frame_handle.is_none() {
            s.request_frame();
        }
    }

    fn attach_pointer(shell: &Rc<RefCell<Shell>>) {
        let on_move = {
            let shell = shell.clone();
            PointerClosure::new(move |event: PointerEvent| {
                let pos = Vec2::new(event.client_x() as f32, event.client_y() as f32);
                let mut s = shell.borrow_mut();
                if s.app.puzzle().and_then(|p| p.grabbed()).is_some() {
                    s.dispatch(Action::PointerMove(pos));
                    s.render_eyes();
                }
            })
        };
        let on_up = {
            let shell = shell.clone();
            PointerClosure::new(move |_event: PointerEvent| {
                shell.borrow_mut().sync_pyramid_bounds();
                dispatch(&shell, Action::PointerUp);
                shell.borrow().render_eyes();
            })
        };

        let mut s = shell.borrow_mut();
        s.detach_pointer();
        let _ = s
            .window
            .add_event_listener_with_callback("pointermove", on_move.as_ref().unchecked_ref());
        let _ = s
            .window
            .add_event_listener_with_callback("pointerup", on_up.as_ref().unchecked_ref());
        s.pointer = Some(PointerListeners { on_move, on_up });
        log::debug!("Pointer listeners attached");
    }

    fn on_click(document: &Document, id: &str, handler: impl FnMut() + 'static) -> Result<(), JsValue> {
        let Some(btn) = document.get_element_by_id(id) else {
            log::warn!("Missing #{}", id);
            return Ok(());
        };
        let closure = Closure::<dyn FnMut()>::new(handler);
        btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_buttons(shell: &Rc<RefCell<Shell>>) -> Result<(), JsValue> {
        let document = shell.borrow().document.clone();

        let s = shell.clone();
        on_click(&document, "enter-btn", move || dispatch(&s, Action::Enter))?;

        let s = shell.clone();
        on_click(&document, "continue-btn", move || {
            let action = if s.borrow().app.stage() == Stage::Layer4 {
                Action::Reveal
            } else {
                Action::Continue
            };
            dispatch(&s, action);
        })?;

        let s = shell.clone();
        on_click(&document, "copy-btn", move || dispatch(&s, Action::CopyCode))?;

        let s = shell.clone();
        on_click(&document, "restart-btn", move || {
            let seed = js_sys::Date::now() as u64;
            dispatch(&s, Action::Restart { seed });
        })?;

        Ok(())
    }

    fn setup_eyes(shell: &Rc<RefCell<Shell>>) -> Result<(), JsValue> {
        for id in 1..=tripl_vision::consts::EYE_COUNT as u32 {
            let Some(el) = shell.borrow().eye_element(id) else {
                log::warn!("Missing eye {}", id);
                continue;
            };
            let s = shell.clone();
            let closure = PointerClosure::new(move |event: PointerEvent| {
                event.prevent_default();
                dispatch(&s, Action::Grab(id));
            });
            el.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
        }

        log::info!("Tripl Vision starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let width = window.inner_width()?.as_f64().unwrap_or(0.0);
        let height = window.inner_height()?.as_f64().unwrap_or(0.0);

        let canvas = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok());

        let settings = canvas
            .as_ref()
            .and_then(|c| c.get_attribute("data-settings"))
            .map(|json| {
                Settings::from_json(&json).unwrap_or_else(|e| {
                    log::warn!("Ignoring settings: {}", e);
                    Settings::default()
                })
            })
            .unwrap_or_default();

        // Missing canvas or context leaves the background as a no-op
        let surface = match canvas {
            Some(canvas) => CanvasSurface::attach(&canvas, width as u32, height as u32)
                .map_err(|e| log::warn!("Background disabled: {:?}", e))
                .ok(),
            None => {
                log::warn!("Background disabled: no #canvas");
                None
            }
        };

        let seed = js_sys::Date::now() as u64;
        let app = App::new(settings, Vec2::new(width as f32, height as f32), seed);
        log::info!("Session seed: {}", seed);

        let shell = Rc::new(RefCell::new(Shell {
            app,
            window,
            document,
            surface,
            frame_cb: None,
            frame_handle: None,
            pointer: None,
        }));

        setup_buttons(&shell)?;
        setup_eyes(&shell)?;
        shell.borrow().render_stage();

        log::info!("Tripl Vision ready");
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_app::run() {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Tripl Vision (native) starting...");
    log::info!("The interactive version runs in the browser - build for wasm32 with `trunk serve`");

    println!("\nRunning headless walkthrough...");
    walkthrough();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a full session against the core with scripted input
#[cfg(not(target_arch = "wasm32"))]
fn walkthrough() {
    use std::time::{SystemTime, UNIX_EPOCH};

    use glam::Vec2;
    use tripl_vision::sim::{Action, App, Clock, Rect, Stage, TargetZone};
    use tripl_vision::Settings;

    let unix_secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let mut now_ms = 0.0;
    let mut clock = |advance: f64| {
        now_ms += advance;
        Clock { now_ms, unix_secs }
    };

    let mut app = App::new(Settings::default(), Vec2::new(1280.0, 720.0), unix_secs);
    let pyramid = Rect::new(540.0, 235.0, 200.0, 250.0);

    app.dispatch(Action::Enter, clock(0.0));
    app.dispatch(Action::SetPyramidBounds(pyramid), clock(0.0));
    for (id, zone) in (1..=3).zip(TargetZone::pyramid_vertices(&pyramid)) {
        app.dispatch(Action::Grab(id), clock(16.0));
        app.dispatch(Action::PointerMove(zone.center), clock(16.0));
        app.dispatch(Action::PointerUp, clock(16.0));
    }
    // Let the settle delay elapse
    for _ in 0..60 {
        if app.stage() != Stage::Puzzle {
            break;
        }
        app.frame(clock(16.0));
    }

    for _ in 0..3 {
        app.dispatch(Action::Continue, clock(16.0));
    }
    app.dispatch(Action::Reveal, clock(16.0));

    let narrative = app.narrative();
    println!("Stage: {}", narrative.stage());
    println!("Found elements: {:?} (cipher key {})", narrative.found(), narrative.cipher_key());
    println!("Verification code: {}", narrative.code().unwrap_or("-"));
}
