// Test doubles: a Host that counts what it was asked to do and a Surface
// that records what it was given.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use portal_engine::render::CAMERA_FLOATS;
use portal_engine::texture::TextureId;
use portal_engine::{EffectError, FrameCallback, FrameEncoder, Host, SharedTracker, Surface, Texture};

pub const VIEWPORT: (f32, f32) = (1280.0, 800.0);
pub const FRAME_MS: f64 = 1000.0 / 60.0;

#[derive(Default)]
pub struct HostLog {
    pub listeners: usize,
    pub frame: Option<FrameCallback>,
    pub tracker: Option<SharedTracker>,
    pub frames_started: usize,
    pub now: f64,
}

pub struct CountingHost {
    pub viewport: Option<(f32, f32)>,
    pub offset: f32,
    pub fail_listeners: bool,
    pub fail_frames: bool,
    pub log: Rc<RefCell<HostLog>>,
}

impl CountingHost {
    pub fn new() -> (Self, Rc<RefCell<HostLog>>) {
        let log = Rc::new(RefCell::new(HostLog::default()));
        let host = Self {
            viewport: Some(VIEWPORT),
            offset: 0.0,
            fail_listeners: false,
            fail_frames: false,
            log: log.clone(),
        };
        (host, log)
    }
}

impl Host for CountingHost {
    fn viewport(&self) -> Option<(f32, f32)> {
        self.viewport
    }

    fn scroll_offset(&self) -> f32 {
        self.offset
    }

    fn attach_listeners(&mut self, tracker: SharedTracker) -> Result<(), EffectError> {
        if self.fail_listeners {
            return Err(EffectError::Host("addEventListener threw".into()));
        }
        let mut log = self.log.borrow_mut();
        log.listeners += 3;
        log.tracker = Some(tracker);
        Ok(())
    }

    fn detach_listeners(&mut self) {
        let mut log = self.log.borrow_mut();
        log.listeners = 0;
        log.tracker = None;
    }

    fn start_frames(&mut self, frame: FrameCallback) -> Result<(), EffectError> {
        if self.fail_frames {
            return Err(EffectError::Unsupported("requestAnimationFrame"));
        }
        let mut log = self.log.borrow_mut();
        log.frame = Some(frame);
        log.frames_started += 1;
        Ok(())
    }

    fn stop_frames(&mut self) {
        self.log.borrow_mut().frame = None;
    }
}

/// Run `n` display frames at 60 Hz. Returns how many actually fired.
pub fn run_frames(log: &Rc<RefCell<HostLog>>, n: usize) -> usize {
    let mut fired = 0;
    for _ in 0..n {
        let (cb, now) = {
            let mut l = log.borrow_mut();
            l.now += FRAME_MS;
            (l.frame.take(), l.now)
        };
        let Some(mut cb) = cb else { break };
        cb(now);
        fired += 1;
        let mut l = log.borrow_mut();
        if l.frame.is_none() {
            l.frame = Some(cb);
        }
    }
    fired
}

/// Deliver a scroll event through the attached listener.
pub fn scroll_to(log: &Rc<RefCell<HostLog>>, offset: f32) {
    if let Some(t) = &log.borrow().tracker {
        t.borrow_mut().on_scroll(offset);
    }
}

pub fn point_at(log: &Rc<RefCell<HostLog>>, x: f32, y: f32) {
    if let Some(t) = &log.borrow().tracker {
        t.borrow_mut().on_pointer_move(x, y);
    }
}

#[derive(Default)]
pub struct SurfaceLog {
    pub uploads: Vec<(TextureId, u32, u32)>,
    pub draws: usize,
    pub camera: [f32; CAMERA_FLOATS],
    pub instances: Vec<f32>,
    pub released: usize,
}

pub struct RecordingSurface {
    pub log: Rc<RefCell<SurfaceLog>>,
}

impl RecordingSurface {
    pub fn new() -> (Self, Rc<RefCell<SurfaceLog>>) {
        let log = Rc::new(RefCell::new(SurfaceLog::default()));
        (Self { log: log.clone() }, log)
    }
}

impl Surface for RecordingSurface {
    fn upload_texture(&mut self, id: TextureId, texture: &Texture) -> Result<(), EffectError> {
        assert_eq!(texture.rgba().len(), (texture.width * texture.height * 4) as usize);
        self.log.borrow_mut().uploads.push((id, texture.width, texture.height));
        Ok(())
    }

    fn draw(&mut self, frame: &FrameEncoder) {
        let mut log = self.log.borrow_mut();
        log.draws += 1;
        log.camera = *frame.camera();
        log.instances.clear();
        log.instances.extend_from_slice(frame.instances());
    }

    fn release(&mut self) {
        self.log.borrow_mut().released += 1;
    }
}
