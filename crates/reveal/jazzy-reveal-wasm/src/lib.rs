use std::cell::RefCell;
use std::rc::{Rc, Weak};

use js_sys::{Array, JSON};
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use jazzy_reveal_core::{Engine, EngineConfig};

mod host;
mod logger;

pub use host::{convert_entries, convert_records, detect_capabilities, WebHost};
pub use logger::init_logging;

const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Parse `{ speed, delay, offset }` through the core JSON loader.
fn parse_options(options: &JsValue) -> Result<EngineConfig, JsError> {
    if jsvalue_is_undefined_or_null(options) {
        return Ok(EngineConfig::default());
    }
    let s = JSON::stringify(options)
        .map_err(|e| JsError::new(&format!("options stringify error: {:?}", e)))?
        .as_string()
        .ok_or_else(|| JsError::new("options: stringify produced non-string"))?;
    EngineConfig::from_json(&s).map_err(|e| JsError::new(&format!("options error: {e}")))
}

/// Engine, host and the browser callbacks that drive them.
struct Runtime {
    engine: Engine<WebHost>,
    host: WebHost,
    // Dropped with the runtime, after `dispose` has disconnected their observers.
    _intersect_cb: Closure<dyn FnMut(Array, web_sys::IntersectionObserver)>,
    _mutate_cb: Closure<dyn FnMut(Array, web_sys::MutationObserver)>,
    frame_cb: Closure<dyn FnMut(f64)>,
    resize_cb: Closure<dyn FnMut(web_sys::Event)>,
    frame_handle: Option<i32>,
}

type Slot = Rc<RefCell<Option<Runtime>>>;

impl Runtime {
    /// Request the next animation frame if the engine wants one and none is pending.
    fn schedule(&mut self) {
        if self.frame_handle.is_some() || !self.engine.wants_frame() {
            return;
        }
        match self
            .host
            .window()
            .request_animation_frame(self.frame_cb.as_ref().unchecked_ref())
        {
            Ok(handle) => self.frame_handle = Some(handle),
            Err(e) => log::warn!("requestAnimationFrame failed: {e:?}"),
        }
    }

    fn frame(&mut self, now_ms: f64) {
        self.frame_handle = None;
        self.engine.on_frame(&mut self.host, now_ms);
        self.schedule();
    }

    fn dispose(&mut self) {
        if let Some(handle) = self.frame_handle.take() {
            let _ = self.host.window().cancel_animation_frame(handle);
        }
        let _ = self
            .host
            .window()
            .remove_event_listener_with_callback("resize", self.resize_cb.as_ref().unchecked_ref());
        self.engine.dispose(&mut self.host);
    }
}

/// Run `f` against the runtime if it is still alive and not already borrowed.
fn with_runtime(slot: &Weak<RefCell<Option<Runtime>>>, f: impl FnOnce(&mut Runtime)) {
    let Some(slot) = slot.upgrade() else {
        return;
    };
    let Ok(mut guard) = slot.try_borrow_mut() else {
        log::warn!("jazzy callback re-entered; dropping batch");
        return;
    };
    if let Some(rt) = guard.as_mut() {
        f(rt);
    }
}

#[wasm_bindgen]
pub struct JazzyReveal {
    slot: Slot,
}

#[wasm_bindgen]
impl JazzyReveal {
    /// Start revealing `[data-jazzy]` elements. Pass `{ speed, delay, offset }`
    /// or undefined/null for defaults.
    /// Example:
    ///   new JazzyReveal({ speed: 800, offset: 40 })
    #[wasm_bindgen(constructor)]
    pub fn new(options: JsValue) -> Result<JazzyReveal, JsError> {
        console_error_panic_hook::set_once();
        let config = parse_options(&options)?;

        let window = web_sys::window().ok_or_else(|| JsError::new("jazzy: no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsError::new("jazzy: no document"))?;

        let slot: Slot = Rc::new(RefCell::new(None));

        let weak = Rc::downgrade(&slot);
        let on_intersect = Closure::<dyn FnMut(Array, web_sys::IntersectionObserver)>::new(
            move |entries: Array, _observer| {
                let entries = convert_entries(&entries);
                with_runtime(&weak, |rt| {
                    rt.engine.on_intersections(&mut rt.host, &entries);
                    rt.schedule();
                });
            },
        );

        let weak = Rc::downgrade(&slot);
        let on_mutate = Closure::<dyn FnMut(Array, web_sys::MutationObserver)>::new(
            move |records: Array, _observer| {
                let records = convert_records(&records);
                with_runtime(&weak, |rt| {
                    rt.engine.on_mutations(&mut rt.host, &records);
                    rt.schedule();
                });
            },
        );
        let mutations = web_sys::MutationObserver::new(on_mutate.as_ref().unchecked_ref())
            .map_err(|e| JsError::new(&format!("MutationObserver error: {:?}", e)))?;

        let weak = Rc::downgrade(&slot);
        let frame_cb = Closure::<dyn FnMut(f64)>::new(move |now: f64| {
            with_runtime(&weak, |rt| rt.frame(now));
        });

        let weak = Rc::downgrade(&slot);
        let resize_cb = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event| {
            with_runtime(&weak, |rt| rt.engine.on_resize(&rt.host));
        });
        window
            .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
            .map_err(|e| JsError::new(&format!("resize listener error: {:?}", e)))?;

        let on_intersect_fn: js_sys::Function = on_intersect.as_ref().clone().unchecked_into();

        let mut host = WebHost::new(window, document, on_intersect_fn, mutations);
        let engine = Engine::new(config, &mut host);

        let mut rt = Runtime {
            engine,
            host,
            _intersect_cb: on_intersect,
            _mutate_cb: on_mutate,
            frame_cb,
            resize_cb,
            frame_handle: None,
        };
        rt.schedule();
        *slot.borrow_mut() = Some(rt);

        Ok(JazzyReveal { slot })
    }

    /// Current counters as `{ strategy, pending, activated, running_ramps, running }`.
    #[wasm_bindgen]
    pub fn stats(&self) -> Result<JsValue, JsError> {
        let guard = self.slot.borrow();
        let rt = guard
            .as_ref()
            .ok_or_else(|| JsError::new("jazzy: runtime missing"))?;
        swb::to_value(&rt.engine.stats()).map_err(|e| JsError::new(&format!("stats error: {e}")))
    }

    /// Events since the last call (tracked, activated, count_finished, disposed).
    #[wasm_bindgen(js_name = drainEvents)]
    pub fn drain_events(&self) -> Result<JsValue, JsError> {
        let mut guard = self.slot.borrow_mut();
        let rt = guard
            .as_mut()
            .ok_or_else(|| JsError::new("jazzy: runtime missing"))?;
        let events = rt.engine.drain_events();
        swb::to_value(&events).map_err(|e| JsError::new(&format!("events error: {e}")))
    }

    /// "observer" or "polling".
    #[wasm_bindgen]
    pub fn strategy(&self) -> Result<JsValue, JsError> {
        let guard = self.slot.borrow();
        let rt = guard
            .as_ref()
            .ok_or_else(|| JsError::new("jazzy: runtime missing"))?;
        swb::to_value(&rt.engine.strategy_kind())
            .map_err(|e| JsError::new(&format!("strategy error: {e}")))
    }

    /// Stop tracking, disconnect observers and cancel the frame loop.
    #[wasm_bindgen]
    pub fn dispose(&self) {
        if let Some(rt) = self.slot.borrow_mut().as_mut() {
            rt.dispose();
        }
    }
}

impl Drop for JazzyReveal {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.slot.try_borrow_mut() {
            if let Some(rt) = guard.as_mut() {
                rt.dispose();
            }
        }
    }
}

/// Page bootstrap: returns `undefined` when the user prefers reduced motion,
/// otherwise a running `JazzyReveal`.
#[wasm_bindgen]
pub fn boot(options: JsValue) -> Result<Option<JazzyReveal>, JsError> {
    let window = web_sys::window().ok_or_else(|| JsError::new("jazzy: no window"))?;
    let reduced = window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .is_some_and(|mql| mql.matches());
    if reduced {
        log::info!("reduced motion requested; jazzy not started");
        return Ok(None);
    }
    JazzyReveal::new(options).map(Some)
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
