// input.rs - Scroll and pointer signals
//
// Listeners write here; the frame callback reads. Only the latest value is
// kept, so a burst of scroll events costs nothing extra per frame.

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::ScrollConfig;

/// Ease-out curve: progress = p^k. A bad exponent eases linearly.
pub fn ease(p: f32, k: f32) -> f32 {
    let p = if p.is_finite() { p.clamp(0.0, 1.0) } else { 0.0 };
    if !k.is_finite() || k <= 0.0 {
        return p;
    }
    p.powf(k).clamp(0.0, 1.0)
}

#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct ScrollState {
    /// Page scroll offset in CSS pixels
    pub raw_offset: f32,
    /// Eased progress in [0, 1]
    pub progress: f32,
}

/// Pointer in normalized device coordinates, y up.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct PointerState {
    pub x: f32,
    pub y: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollCurve {
    pub distance_vh: f32,
    pub exponent: f32,
}

impl From<ScrollConfig> for ScrollCurve {
    fn from(c: ScrollConfig) -> Self {
        Self { distance_vh: c.distance_vh, exponent: c.exponent }
    }
}

impl ScrollCurve {
    /// Scroll distance covering the whole animation.
    pub fn distance(&self, viewport_h: f32) -> f32 {
        viewport_h * self.distance_vh
    }

    pub fn progress(&self, offset: f32, viewport_h: f32) -> f32 {
        let d = self.distance(viewport_h);
        if !(d.is_finite() && d > 0.0) {
            return 0.0;
        }
        ease(offset / d, self.exponent)
    }
}

pub struct InputTracker {
    curve: ScrollCurve,
    viewport: (f32, f32),
    scroll: ScrollState,
    pointer: PointerState,
}

pub type SharedTracker = Rc<RefCell<InputTracker>>;

impl InputTracker {
    pub fn new(curve: ScrollCurve, width: f32, height: f32) -> Self {
        Self {
            curve,
            viewport: (width, height),
            scroll: ScrollState::default(),
            pointer: PointerState::default(),
        }
    }

    pub fn shared(self) -> SharedTracker {
        Rc::new(RefCell::new(self))
    }

    pub fn on_scroll(&mut self, offset: f32) {
        let offset = if offset.is_finite() { offset.max(0.0) } else { 0.0 };
        self.scroll = ScrollState {
            raw_offset: offset,
            progress: self.curve.progress(offset, self.viewport.1),
        };
    }

    pub fn on_pointer_move(&mut self, client_x: f32, client_y: f32) {
        let (w, h) = self.viewport;
        if !(w > 0.0 && h > 0.0) || !client_x.is_finite() || !client_y.is_finite() {
            self.pointer = PointerState::default();
            return;
        }
        self.pointer = PointerState {
            x: (client_x / w * 2.0 - 1.0).clamp(-1.0, 1.0),
            y: (-(client_y / h * 2.0 - 1.0)).clamp(-1.0, 1.0),
        };
    }

    /// New viewport: the retained offset maps onto the new scroll distance.
    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.viewport = (width, height);
        self.on_scroll(self.scroll.raw_offset);
    }

    pub fn scroll(&self) -> ScrollState {
        self.scroll
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn viewport(&self) -> (f32, f32) {
        self.viewport
    }
}
