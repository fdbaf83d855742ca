// anim/ - Per-frame damped animation
//
// Each frame every animated value moves a fraction of the way toward its
// target. The fraction is derived from dt so 30 Hz and 144 Hz displays
// converge at the same wall-clock rate as 60 Hz.

pub mod targets;

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use crate::config::{EffectConfig, Family};
use crate::input::{PointerState, ScrollState};
use crate::scene::{PartId, Rig, SceneRoot};

/// Damping factors are tuned per 60 Hz frame.
const REFERENCE_HZ: f32 = 60.0;
const PHASE_EPSILON: f32 = 1e-3;

/// Fraction of the remaining distance covered in `dt` seconds, given the
/// per-frame factor `f` at 60 Hz. Always in [0, 1].
pub fn damping(f: f32, dt: f32) -> f32 {
    let f = f.clamp(0.0, 1.0);
    (1.0 - (1.0 - f).powf(dt * REFERENCE_HZ)).clamp(0.0, 1.0)
}

fn approach(current: &mut f32, target: f32, alpha: f32) {
    if target.is_finite() {
        *current += (target - *current) * alpha;
    }
}

fn approach_vec3(current: &mut Vec3, target: Vec3, alpha: f32) {
    if target.is_finite() {
        *current += (target - *current) * alpha;
    }
}

/// Coarse label for logs. Derived from the leaf angle, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DoorPhase {
    Closed,
    Opening,
    Open,
}

pub struct Controller {
    family: Family,
    /// Seconds of animation time, drives the ring pulse
    elapsed: f32,
}

impl Controller {
    pub fn new(cfg: &EffectConfig) -> Self {
        Self { family: cfg.family, elapsed: 0.0 }
    }

    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Advance one frame. Bad `dt` leaves the scene untouched.
    pub fn step(&mut self, dt: f32, scene: &mut SceneRoot, scroll: ScrollState, pointer: PointerState) {
        if !dt.is_finite() || dt <= 0.0 {
            return;
        }
        self.elapsed += dt;
        let p = scroll.progress;

        match (&self.family, &scene.rig) {
            (Family::Gate(g), Rig::Door(rig)) => {
                let (root, left, right) = (rig.root, rig.left, rig.right);
                let t = targets::door(&g.motion, p, pointer);
                let s = &g.motion.smoothing;

                approach_vec3(&mut scene.camera.position, t.camera_position, damping(s.camera_position, dt));
                approach_vec3(&mut scene.camera.rotation, t.camera_rotation, damping(s.camera_rotation, dt));

                let a = damping(s.doors, dt);
                rotate_y(scene, left, t.left, a);
                rotate_y(scene, right, t.right, a);
                tilt(scene, root, t.rig_rotation, damping(s.parallax, dt));
            }
            (Family::Tunnel(c), Rig::Tunnel(rig)) => {
                let t = targets::tunnel(c, p, pointer);
                let a = damping(c.motion.smoothing, dt);

                approach_vec3(&mut scene.camera.position, t.camera_position, a);
                approach_vec3(&mut scene.camera.rotation, t.camera_rotation, a);
                let (root, interior) = (rig.root, rig.interior);
                tilt(scene, root, t.rig_rotation, a);

                let n = c.layout.ring_count as usize;
                let m = &c.motion;
                for i in 0..n {
                    let Some(&id) = (match &scene.rig {
                        Rig::Tunnel(r) => r.arches.get(i),
                        Rig::Door(_) => None,
                    }) else {
                        break;
                    };
                    let pulse = targets::ring_pulse(self.elapsed, i, m.pulse_amplitude, m.pulse_rate);
                    if let Some(ring) = scene.get_mut(id) {
                        ring.opacity = targets::ring_opacity(i, p, n, m.faded_opacity);
                        ring.local.scale = ring.base.scale * Vec3::new(pulse, pulse, 1.0);
                    }
                }

                if let Some(room) = scene.get_mut(interior) {
                    room.opacity = t.interior_opacity;
                    room.visible = t.interior_opacity > 0.0;
                }
            }
            _ => log::warn!("controller and scene were built for different effects"),
        }
    }

    /// Door label for the current leaf angle; None for the tunnel.
    pub fn door_phase(scene: &SceneRoot) -> Option<DoorPhase> {
        let Rig::Door(rig) = &scene.rig else {
            return None;
        };
        let angle = scene.get(rig.right)?.local.rotation.y.abs();
        Some(if angle < PHASE_EPSILON {
            DoorPhase::Closed
        } else if angle > FRAC_PI_2 - PHASE_EPSILON {
            DoorPhase::Open
        } else {
            DoorPhase::Opening
        })
    }
}

fn rotate_y(scene: &mut SceneRoot, id: PartId, target: f32, alpha: f32) {
    if let Some(part) = scene.get_mut(id) {
        let goal = part.base.rotation.y + target;
        approach(&mut part.local.rotation.y, goal, alpha);
    }
}

fn tilt(scene: &mut SceneRoot, id: PartId, target: Vec3, alpha: f32) {
    if let Some(part) = scene.get_mut(id) {
        let goal = part.base.rotation + target;
        approach_vec3(&mut part.local.rotation, goal, alpha);
    }
}
