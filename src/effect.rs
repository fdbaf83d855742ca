// effect.rs - Effect lifecycle: mount, per-frame tick, unmount
//
// The effect owns everything it creates. Host is the page environment
// (viewport, scroll, listeners, frame clock); Surface is whatever turns the
// encoded frame into pixels. Both are traits so the lifecycle runs the same
// under a browser and under a test double.

use std::cell::RefCell;
use std::rc::Rc;

use crate::anim::Controller;
use crate::config::EffectConfig;
use crate::error::EffectError;
use crate::input::{InputTracker, ScrollCurve, SharedTracker};
use crate::render::FrameEncoder;
use crate::scene::{self, SceneRoot};
use crate::texture::{Texture, TextureBank, TextureId};

/// Longest frame step; a backgrounded tab should not teleport the camera.
const MAX_FRAME_SECONDS: f32 = 0.25;
const FIRST_FRAME_SECONDS: f32 = 1.0 / 60.0;

/// Called with the frame timestamp in milliseconds.
pub type FrameCallback = Box<dyn FnMut(f64)>;

pub trait Host {
    /// CSS pixel size of the viewport, None when there is no window.
    fn viewport(&self) -> Option<(f32, f32)>;
    fn scroll_offset(&self) -> f32;
    /// Wire scroll, pointer and resize events into `tracker`.
    fn attach_listeners(&mut self, tracker: SharedTracker) -> Result<(), EffectError>;
    fn detach_listeners(&mut self);
    /// Call `frame` once per display frame until stop_frames.
    fn start_frames(&mut self, frame: FrameCallback) -> Result<(), EffectError>;
    fn stop_frames(&mut self);
}

pub trait Surface {
    fn upload_texture(&mut self, id: TextureId, texture: &Texture) -> Result<(), EffectError>;
    fn draw(&mut self, frame: &FrameEncoder);
    fn release(&mut self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Unmounted,
    /// Listeners and frame loop running
    Animating,
    /// Environment lacked a capability; one frame was drawn at progress 0
    Static,
}

/// Everything the frame callback touches.
struct Running<S> {
    scene: SceneRoot,
    controller: Controller,
    encoder: FrameEncoder,
    tracker: SharedTracker,
    surface: Rc<RefCell<S>>,
    last: Option<f64>,
}

impl<S: Surface> Running<S> {
    fn tick(&mut self, now_ms: f64) {
        let dt = match self.last {
            None => FIRST_FRAME_SECONDS,
            Some(prev) => (((now_ms - prev) / 1000.0) as f32).min(MAX_FRAME_SECONDS),
        };
        self.last = Some(now_ms);

        let (scroll, pointer) = {
            let t = self.tracker.borrow();
            (t.scroll(), t.pointer())
        };
        self.controller.step(dt, &mut self.scene, scroll, pointer);
        self.encoder.encode(&self.scene);
        self.surface.borrow_mut().draw(&self.encoder);
    }
}

pub struct Effect<H: Host, S: Surface + 'static> {
    config: EffectConfig,
    host: H,
    surface: Rc<RefCell<S>>,
    running: Option<Rc<RefCell<Running<S>>>>,
    textures: Option<TextureBank>,
    mode: Mode,
}

impl<H: Host, S: Surface + 'static> Effect<H, S> {
    pub fn new(config: EffectConfig, host: H, surface: S) -> Self {
        Self {
            config,
            host,
            surface: Rc::new(RefCell::new(surface)),
            running: None,
            textures: None,
            mode: Mode::Unmounted,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn config(&self) -> &EffectConfig {
        &self.config
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn surface(&self) -> &Rc<RefCell<S>> {
        &self.surface
    }

    pub fn textures(&self) -> Option<&TextureBank> {
        self.textures.as_ref()
    }

    /// Current eased scroll progress, 0 when not animating.
    pub fn progress(&self) -> f32 {
        self.running
            .as_ref()
            .map_or(0.0, |r| r.borrow().tracker.borrow().scroll().progress)
    }

    /// Run `f` against the live scene, if animating.
    pub fn with_scene<R>(&self, f: impl FnOnce(&SceneRoot) -> R) -> Option<R> {
        self.running.as_ref().map(|r| f(&r.borrow().scene))
    }

    /// Build textures and scene, then start listening and animating.
    /// Mounting twice is a no-op.
    pub fn mount(&mut self) -> Result<(), EffectError> {
        if self.mode != Mode::Unmounted {
            return Ok(());
        }
        self.config.validate()?;

        let mut bank = TextureBank::new(self.config.texture_seed);
        let scene = scene::build(&self.config, &mut bank)?;
        {
            let mut surface = self.surface.borrow_mut();
            for (id, tex) in bank.iter() {
                if let Err(e) = surface.upload_texture(id, tex) {
                    log::warn!("texture {} upload failed: {}", tex.kind.name(), e);
                }
            }
        }
        let controller = Controller::new(&self.config);
        let encoder = FrameEncoder::new(&scene);
        log::info!(
            "mounting {} effect: {} parts, {} textures ({} KiB)",
            self.config.kind().name(),
            scene.len(),
            bank.len(),
            bank.byte_size() / 1024
        );
        self.textures = Some(bank);

        let Some((w, h)) = self.host.viewport() else {
            log::warn!("no viewport, drawing a static frame");
            self.draw_static(scene, encoder);
            return Ok(());
        };

        let mut tracker = InputTracker::new(ScrollCurve::from(self.config.scroll()), w, h);
        tracker.on_scroll(self.host.scroll_offset());
        let tracker = tracker.shared();

        if let Err(e) = self.host.attach_listeners(tracker.clone()) {
            log::warn!("listeners unavailable ({}), drawing a static frame", e);
            self.host.detach_listeners();
            self.draw_static(scene, encoder);
            return Ok(());
        }

        let running = Rc::new(RefCell::new(Running {
            scene,
            controller,
            encoder,
            tracker,
            surface: self.surface.clone(),
            last: None,
        }));
        let frame = running.clone();
        let started = self.host.start_frames(Box::new(move |now| frame.borrow_mut().tick(now)));
        if let Err(e) = started {
            log::warn!("frame clock unavailable ({}), drawing a static frame", e);
            self.host.stop_frames();
            self.host.detach_listeners();
            let Running { scene, encoder, .. } = match Rc::try_unwrap(running) {
                Ok(cell) => cell.into_inner(),
                Err(_) => {
                    // The host kept the callback despite failing; nothing to draw with
                    self.mode = Mode::Static;
                    return Ok(());
                }
            };
            self.draw_static(scene, encoder);
            return Ok(());
        }

        self.running = Some(running);
        self.mode = Mode::Animating;
        Ok(())
    }

    /// Stop the frame loop, detach listeners and free the surface, scene and
    /// textures. Safe to call any number of times.
    pub fn unmount(&mut self) {
        if self.mode == Mode::Unmounted {
            return;
        }
        if self.mode == Mode::Animating {
            self.host.stop_frames();
            self.host.detach_listeners();
        }
        match self.surface.try_borrow_mut() {
            Ok(mut s) => s.release(),
            Err(_) => log::warn!("surface busy during unmount, release skipped"),
        }
        self.running = None;
        self.textures = None;
        self.mode = Mode::Unmounted;
        log::info!("unmounted {} effect", self.config.kind().name());
    }

    fn draw_static(&mut self, scene: SceneRoot, mut encoder: FrameEncoder) {
        encoder.encode(&scene);
        self.surface.borrow_mut().draw(&encoder);
        self.mode = Mode::Static;
    }
}

impl<H: Host, S: Surface + 'static> Drop for Effect<H, S> {
    fn drop(&mut self) {
        self.unmount();
    }
}
