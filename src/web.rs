// web.rs - Browser host, JS render target and the exported PortalEffect
//
// The page owns the actual WebGL renderer. We hand it textures once at
// mount and two Float32 views per frame (camera block and instance records,
// see render.rs). Scroll, pointer and resize come from window listeners.

use std::cell::{Cell, RefCell};
use std::fmt::Display;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{AddEventListenerOptions, Event, HtmlCanvasElement, MouseEvent, Window};

use crate::config::{EffectConfig, EffectKind};
use crate::effect::{Effect, FrameCallback, Host, Mode, Surface};
use crate::error::EffectError;
use crate::input::SharedTracker;
use crate::render::FrameEncoder;
use crate::texture::{Texture, TextureId};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

#[wasm_bindgen]
extern "C" {
    /// Page-side renderer that consumes encoded frames.
    pub type RenderTarget;

    #[wasm_bindgen(method, catch, js_name = uploadTexture)]
    fn upload_texture(
        this: &RenderTarget,
        id: u32,
        width: u32,
        height: u32,
        repeat_u: f32,
        repeat_v: f32,
        rgba: &[u8],
    ) -> Result<(), JsValue>;

    #[wasm_bindgen(method)]
    fn draw(this: &RenderTarget, camera: &[f32], instances: &[f32]);

    #[wasm_bindgen(method)]
    fn release(this: &RenderTarget);
}

fn host_error(e: JsValue) -> EffectError {
    EffectError::Host(format!("{:?}", e))
}

fn js_error(e: impl Display) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}

// ============================================================================
// Host
// ============================================================================

type Listener = Closure<dyn FnMut(Event)>;

pub struct WebHost {
    window: Window,
    canvas: HtmlCanvasElement,
    listeners: Vec<(&'static str, Listener)>,
    frame: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>,
    handle: Rc<Cell<Option<i32>>>,
}

impl WebHost {
    pub fn new(canvas: HtmlCanvasElement, class_name: Option<String>) -> Result<Self, EffectError> {
        let window = web_sys::window().ok_or(EffectError::Unsupported("window"))?;
        if let Some(class) = class_name.filter(|c| !c.is_empty()) {
            canvas.set_class_name(&class);
        }
        let host = Self {
            window,
            canvas,
            listeners: Vec::new(),
            frame: Rc::new(RefCell::new(None)),
            handle: Rc::new(Cell::new(None)),
        };
        if let Some((w, h)) = host.viewport() {
            fit_canvas(&host.canvas, w, h);
        }
        Ok(host)
    }

    fn listen(&mut self, kind: &'static str, passive: bool, f: Listener) -> Result<(), EffectError> {
        let opts = AddEventListenerOptions::new();
        opts.set_passive(passive);
        self.window
            .add_event_listener_with_callback_and_add_event_listener_options(
                kind,
                f.as_ref().unchecked_ref(),
                &opts,
            )
            .map_err(host_error)?;
        self.listeners.push((kind, f));
        Ok(())
    }
}

fn viewport_of(window: &Window) -> Option<(f32, f32)> {
    let w = window.inner_width().ok()?.as_f64()?;
    let h = window.inner_height().ok()?.as_f64()?;
    Some((w as f32, h as f32))
}

fn fit_canvas(canvas: &HtmlCanvasElement, w: f32, h: f32) {
    canvas.set_width(w.max(1.0) as u32);
    canvas.set_height(h.max(1.0) as u32);
}

impl Host for WebHost {
    fn viewport(&self) -> Option<(f32, f32)> {
        viewport_of(&self.window)
    }

    fn scroll_offset(&self) -> f32 {
        self.window.scroll_y().unwrap_or(0.0) as f32
    }

    fn attach_listeners(&mut self, tracker: SharedTracker) -> Result<(), EffectError> {
        let (t, win) = (tracker.clone(), self.window.clone());
        let on_scroll = Closure::wrap(Box::new(move |_: Event| {
            t.borrow_mut().on_scroll(win.scroll_y().unwrap_or(0.0) as f32);
        }) as Box<dyn FnMut(Event)>);
        self.listen("scroll", true, on_scroll)?;

        let t = tracker.clone();
        let on_move = Closure::wrap(Box::new(move |e: Event| {
            if let Some(m) = e.dyn_ref::<MouseEvent>() {
                t.borrow_mut().on_pointer_move(m.client_x() as f32, m.client_y() as f32);
            }
        }) as Box<dyn FnMut(Event)>);
        self.listen("pointermove", true, on_move)?;

        let (win, canvas) = (self.window.clone(), self.canvas.clone());
        let on_resize = Closure::wrap(Box::new(move |_: Event| {
            if let Some((w, h)) = viewport_of(&win) {
                fit_canvas(&canvas, w, h);
                tracker.borrow_mut().on_resize(w, h);
            }
        }) as Box<dyn FnMut(Event)>);
        self.listen("resize", false, on_resize)
    }

    fn detach_listeners(&mut self) {
        for (kind, f) in self.listeners.drain(..) {
            let _ = self.window.remove_event_listener_with_callback(kind, f.as_ref().unchecked_ref());
        }
    }

    fn start_frames(&mut self, mut frame: FrameCallback) -> Result<(), EffectError> {
        let (slot, handle, window) = (self.frame.clone(), self.handle.clone(), self.window.clone());
        *self.frame.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            frame(now);
            let next = slot
                .borrow()
                .as_ref()
                .and_then(|f| window.request_animation_frame(f.as_ref().unchecked_ref()).ok());
            handle.set(next);
        }) as Box<dyn FnMut(f64)>));

        let first = match self.frame.borrow().as_ref() {
            Some(f) => self.window.request_animation_frame(f.as_ref().unchecked_ref()),
            None => return Err(EffectError::Unsupported("animation frames")),
        };
        self.handle.set(Some(first.map_err(host_error)?));
        Ok(())
    }

    fn stop_frames(&mut self) {
        if let Some(id) = self.handle.take() {
            let _ = self.window.cancel_animation_frame(id);
        }
        // Breaks the closure's reference to its own slot
        self.frame.borrow_mut().take();
    }
}

// ============================================================================
// Surface
// ============================================================================

pub struct JsSurface {
    target: RenderTarget,
}

impl Surface for JsSurface {
    fn upload_texture(&mut self, id: TextureId, tex: &Texture) -> Result<(), EffectError> {
        self.target
            .upload_texture(id.0, tex.width, tex.height, tex.repeat[0], tex.repeat[1], tex.rgba())
            .map_err(host_error)
    }

    fn draw(&mut self, frame: &FrameEncoder) {
        self.target.draw(frame.camera(), frame.instances());
    }

    fn release(&mut self) {
        self.target.release();
    }
}

// ============================================================================
// Export
// ============================================================================

/// One mounted background effect. Construct, `mount()`, and `unmount()`
/// when the component goes away.
#[wasm_bindgen]
pub struct PortalEffect {
    kind: EffectKind,
    inner: Option<Effect<WebHost, JsSurface>>,
}

#[wasm_bindgen]
impl PortalEffect {
    /// `kind` is "gate" or "tunnel".
    #[wasm_bindgen(constructor)]
    pub fn new(
        kind: &str,
        canvas: HtmlCanvasElement,
        class_name: Option<String>,
        target: RenderTarget,
    ) -> Result<PortalEffect, JsValue> {
        let kind = EffectKind::parse(kind).ok_or_else(|| js_error(format!("unknown effect {:?}", kind)))?;
        Ok(Self::create(EffectConfig::preset(kind), canvas, class_name, target))
    }

    /// Like `new`, but the preset is taken from a JSON override.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(
        json: &str,
        canvas: HtmlCanvasElement,
        class_name: Option<String>,
        target: RenderTarget,
    ) -> Result<PortalEffect, JsValue> {
        let cfg = EffectConfig::from_json(json).map_err(js_error)?;
        Ok(Self::create(cfg, canvas, class_name, target))
    }

    fn create(
        cfg: EffectConfig,
        canvas: HtmlCanvasElement,
        class_name: Option<String>,
        target: RenderTarget,
    ) -> PortalEffect {
        let kind = cfg.kind();
        let inner = match WebHost::new(canvas, class_name) {
            Ok(host) => Some(Effect::new(cfg, host, JsSurface { target })),
            Err(e) => {
                log::warn!("{} effect disabled: {}", kind.name(), e);
                None
            }
        };
        PortalEffect { kind, inner }
    }

    pub fn mount(&mut self) {
        if let Some(effect) = self.inner.as_mut() {
            if let Err(e) = effect.mount() {
                log::warn!("{} effect failed to mount: {}", self.kind.name(), e);
            }
        }
    }

    pub fn unmount(&mut self) {
        if let Some(effect) = self.inner.as_mut() {
            effect.unmount();
        }
    }

    pub fn progress(&self) -> f32 {
        self.inner.as_ref().map_or(0.0, |e| e.progress())
    }

    #[wasm_bindgen(getter)]
    pub fn kind(&self) -> String {
        self.kind.name().to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn animating(&self) -> bool {
        self.inner.as_ref().is_some_and(|e| e.mode() == Mode::Animating)
    }
}
