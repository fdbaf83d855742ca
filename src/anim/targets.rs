// targets.rs - Where everything wants to be for a given progress
//
// Pure functions of (progress, pointer). The controller approaches these
// with damping; nothing here is stored between frames.

use std::f32::consts::FRAC_PI_2;

use glam::{Vec3, vec3};

use crate::config::{DoorMotion, TunnelConfig};
use crate::input::{PointerState, ease};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DoorTargets {
    pub camera_position: Vec3,
    pub camera_rotation: Vec3,
    /// Hinge angles about Y; left swings negative, right positive
    pub left: f32,
    pub right: f32,
    pub rig_rotation: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TunnelTargets {
    pub camera_position: Vec3,
    pub look_at: Vec3,
    pub camera_rotation: Vec3,
    pub rig_rotation: Vec3,
    pub interior_opacity: f32,
}

pub fn door(m: &DoorMotion, progress: f32, pointer: PointerState) -> DoorTargets {
    let p = progress.clamp(0.0, 1.0);
    let (left, right) = door_rotation(p, m.open_exponent);
    DoorTargets {
        camera_position: m.camera_start + vec3(0.0, m.rise * p, -m.travel * p),
        camera_rotation: vec3(m.tilt * p, 0.0, 0.0),
        left,
        right,
        rig_rotation: parallax(pointer, m.parallax),
    }
}

/// (left, right) leaf angles: ∓(π/2)·p^k.
pub fn door_rotation(progress: f32, exponent: f32) -> (f32, f32) {
    let a = FRAC_PI_2 * ease(progress, exponent);
    (-a, a)
}

pub fn tunnel(cfg: &TunnelConfig, progress: f32, pointer: PointerState) -> TunnelTargets {
    let (l, m) = (&cfg.layout, &cfg.motion);
    let p = progress.clamp(0.0, 1.0);
    let length = l.length();

    let camera_position = m.camera_start + vec3(0.0, m.rise * p, -p * (length + m.overshoot));
    let look_at = vec3(0.0, m.look_height + m.look_rise * p, -p * length * m.look_ahead);
    TunnelTargets {
        camera_position,
        look_at,
        camera_rotation: look_rotation(camera_position, look_at),
        rig_rotation: parallax(pointer, m.parallax),
        interior_opacity: reveal_opacity(p, m.reveal_threshold, m.reveal_ramp),
    }
}

/// Rig tilt from the pointer: pitch follows y, yaw follows x.
pub fn parallax(pointer: PointerState, gain: [f32; 2]) -> Vec3 {
    vec3(pointer.y * gain[0], pointer.x * gain[1], 0.0)
}

/// Ring `i` of `n` has been passed once i < progress·n.
pub fn ring_faded(i: usize, progress: f32, n: usize) -> bool {
    (i as f32) < progress * n as f32
}

pub fn ring_opacity(i: usize, progress: f32, n: usize, faded: f32) -> f32 {
    if ring_faded(i, progress, n) { faded } else { 1.0 }
}

/// Breathing scale factor for ring `i` at time `t` seconds.
pub fn ring_pulse(t: f32, i: usize, amplitude: f32, rate: f32) -> f32 {
    1.0 + (t * rate + i as f32).sin() * amplitude
}

/// 0 up to the threshold, then a linear ramp to 1.
pub fn reveal_opacity(progress: f32, threshold: f32, ramp: f32) -> f32 {
    ((progress - threshold) * ramp).clamp(0.0, 1.0)
}

/// Euler XYZ rotation that points a -Z looking camera from `eye` at `target`.
pub fn look_rotation(eye: Vec3, target: Vec3) -> Vec3 {
    let d = (target - eye).normalize_or_zero();
    if d == Vec3::ZERO {
        return Vec3::ZERO;
    }
    // Rx(a)·Ry(b)·(-Z) = (-sin b, cos b·sin a, -cos b·cos a)
    let yaw = (-d.x).clamp(-1.0, 1.0).asin();
    let pitch = d.y.atan2(-d.z);
    vec3(pitch, yaw, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Transform;

    const EPS: f32 = 1e-5;

    fn near(a: f32, b: f32) -> bool {
        (a - b).abs() < EPS
    }

    #[test]
    fn door_angles_span_closed_to_quarter_turn() {
        assert_eq!(door_rotation(0.0, 0.7), (-0.0, 0.0));
        let (l, r) = door_rotation(1.0, 0.7);
        assert!(near(l, -FRAC_PI_2) && near(r, FRAC_PI_2));
        let (l, r) = door_rotation(0.3, 0.7);
        assert!(l < 0.0 && r > 0.0 && near(l, -r));
    }

    #[test]
    fn gate_camera_endpoints() {
        let m = DoorMotion::default();
        let start = door(&m, 0.0, PointerState::default());
        assert_eq!(start.camera_position, vec3(0.0, 2.0, 8.0));
        let end = door(&m, 1.0, PointerState::default());
        assert!((end.camera_position - vec3(0.0, 2.5, -2.0)).length() < EPS);
        assert!(near(end.camera_rotation.x, 0.1));
    }

    #[test]
    fn tunnel_camera_endpoints() {
        let cfg = TunnelConfig::default();
        let end = tunnel(&cfg, 1.0, PointerState::default());
        assert!((end.camera_position - vec3(0.0, 1.4, -13.0)).length() < EPS);
        assert!((end.look_at - vec3(0.0, 0.5, -10.8)).length() < EPS);
        assert_eq!(end.interior_opacity, 1.0);
    }

    #[test]
    fn camera_depth_decreases_with_progress() {
        let gate = DoorMotion::default();
        let tun = TunnelConfig::default();
        let (mut gz, mut tz) = (f32::INFINITY, f32::INFINITY);
        for i in 0..=20 {
            let p = i as f32 / 20.0;
            let g = door(&gate, p, PointerState::default()).camera_position.z;
            let t = tunnel(&tun, p, PointerState::default()).camera_position.z;
            assert!(g < gz && t < tz);
            (gz, tz) = (g, t);
        }
    }

    #[test]
    fn parallax_ignores_progress() {
        let m = DoorMotion::default();
        let ptr = PointerState { x: 1.0, y: -1.0 };
        let a = door(&m, 0.1, ptr).rig_rotation;
        let b = door(&m, 0.9, ptr).rig_rotation;
        assert_eq!(a, b);
        assert!(near(a.x, -0.01) && near(a.y, 0.03));
    }

    #[test]
    fn rings_fade_as_they_are_passed() {
        let faded: Vec<bool> = (0..8).map(|i| ring_faded(i, 0.5, 8)).collect();
        assert_eq!(faded, [true, true, true, true, false, false, false, false]);
        assert!(!ring_faded(0, 0.0, 8));
        assert_eq!(ring_opacity(7, 1.0, 8, 0.3), 0.3);
    }

    #[test]
    fn reveal_is_a_ramp() {
        assert_eq!(reveal_opacity(0.5, 0.5, 2.0), 0.0);
        assert!(near(reveal_opacity(0.75, 0.5, 2.0), 0.5));
        assert_eq!(reveal_opacity(1.0, 0.5, 2.0), 1.0);
    }

    #[test]
    fn look_rotation_points_camera_at_target() {
        let eye = vec3(0.0, 1.0, 5.0);
        let target = vec3(2.0, 0.3, -4.0);
        let r = look_rotation(eye, target);
        let cam = Transform { translation: eye, rotation: r, scale: Vec3::ONE };
        let fwd = cam.quat() * Vec3::NEG_Z;
        assert!((fwd - (target - eye).normalize()).length() < 1e-4);
        assert_eq!(look_rotation(eye, eye), Vec3::ZERO);
    }
}
