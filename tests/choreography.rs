mod common;

use std::cell::RefCell;
use std::f32::consts::FRAC_PI_2;
use std::rc::Rc;

use glam::{Vec3, vec3};

use common::{CountingHost, HostLog, RecordingSurface, SurfaceLog, point_at, run_frames, scroll_to};
use portal_engine::anim::{Controller, DoorPhase};
use portal_engine::scene::Rig;
use portal_engine::{Effect, EffectConfig, Mode, SceneRoot};

type Mounted = (Effect<CountingHost, RecordingSurface>, Rc<RefCell<HostLog>>, Rc<RefCell<SurfaceLog>>);

fn mounted(cfg: EffectConfig) -> Mounted {
    let (host, hlog) = CountingHost::new();
    let (surface, slog) = RecordingSurface::new();
    let mut fx = Effect::new(cfg, host, surface);
    fx.mount().unwrap();
    assert_eq!(fx.mode(), Mode::Animating);
    (fx, hlog, slog)
}

fn close(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < 1e-3
}

fn door_angles(scene: &SceneRoot) -> (f32, f32) {
    let Rig::Door(rig) = &scene.rig else { panic!("expected door rig") };
    let left = scene.get(rig.left).unwrap();
    let right = scene.get(rig.right).unwrap();
    (
        left.local.rotation.y - left.base.rotation.y,
        right.local.rotation.y - right.base.rotation.y,
    )
}

#[test]
fn gate_at_top_of_page_stays_closed() {
    let (fx, hlog, slog) = mounted(EffectConfig::gate());
    run_frames(&hlog, 120);

    assert_eq!(fx.progress(), 0.0);
    let (left, right) = fx.with_scene(door_angles).unwrap();
    assert_eq!((left, right), (0.0, 0.0));
    assert_eq!(fx.with_scene(Controller::door_phase).unwrap(), Some(DoorPhase::Closed));
    assert_eq!(&slog.borrow().camera[..3], &[0.0, 2.0, 8.0]);
}

#[test]
fn gate_full_scroll_opens_doors_and_dollies_in() {
    let (fx, hlog, slog) = mounted(EffectConfig::gate());
    // 1.5 viewport heights of 800 px
    scroll_to(&hlog, 1200.0);
    assert_eq!(fx.progress(), 1.0);

    run_frames(&hlog, 30);
    let (left, _) = fx.with_scene(door_angles).unwrap();
    assert!(left < 0.0 && left > -FRAC_PI_2, "doors still swinging: {}", left);
    assert_eq!(fx.with_scene(Controller::door_phase).unwrap(), Some(DoorPhase::Opening));

    run_frames(&hlog, 1500);
    let (left, right) = fx.with_scene(door_angles).unwrap();
    assert!((left + FRAC_PI_2).abs() < 1e-3, "left {}", left);
    assert!((right - FRAC_PI_2).abs() < 1e-3, "right {}", right);
    assert_eq!(fx.with_scene(Controller::door_phase).unwrap(), Some(DoorPhase::Open));

    let cam = slog.borrow().camera;
    assert!(close(vec3(cam[0], cam[1], cam[2]), vec3(0.0, 2.5, -2.0)), "camera {:?}", &cam[..3]);
    assert!((cam[3] - 0.1).abs() < 1e-3);
}

#[test]
fn gate_scrolling_back_closes_doors() {
    let (fx, hlog, _) = mounted(EffectConfig::gate());
    scroll_to(&hlog, 1200.0);
    run_frames(&hlog, 600);
    scroll_to(&hlog, 0.0);
    run_frames(&hlog, 1500);
    let (left, right) = fx.with_scene(door_angles).unwrap();
    assert!(left.abs() < 1e-3 && right.abs() < 1e-3);
}

#[test]
fn tunnel_halfway_fades_the_passed_rings() {
    let cfg = EffectConfig::from_json(
        r#"{"kind": "tunnel", "scroll": {"distance_vh": 2.0, "exponent": 1.0}}"#,
    )
    .unwrap();
    let (fx, hlog, _) = mounted(cfg);
    scroll_to(&hlog, 800.0);
    assert_eq!(fx.progress(), 0.5);
    run_frames(&hlog, 2);

    let opacities = fx
        .with_scene(|s| {
            let Rig::Tunnel(rig) = &s.rig else { panic!("expected tunnel rig") };
            rig.arches.iter().map(|&id| s.get(id).unwrap().opacity).collect::<Vec<_>>()
        })
        .unwrap();
    assert_eq!(opacities, vec![0.3, 0.3, 0.3, 0.3, 1.0, 1.0, 1.0, 1.0]);

    // Exactly at the threshold the room is still hidden
    let interior_visible = fx
        .with_scene(|s| match &s.rig {
            Rig::Tunnel(rig) => s.get(rig.interior).unwrap().visible,
            Rig::Door(_) => panic!("expected tunnel rig"),
        })
        .unwrap();
    assert!(!interior_visible);
}

#[test]
fn tunnel_end_reveals_the_room() {
    let (fx, hlog, slog) = mounted(EffectConfig::tunnel());
    scroll_to(&hlog, 1600.0);
    run_frames(&hlog, 1500);

    let (opacity, visible) = fx
        .with_scene(|s| match &s.rig {
            Rig::Tunnel(rig) => {
                let room = s.get(rig.interior).unwrap();
                (room.opacity, room.visible)
            }
            Rig::Door(_) => panic!("expected tunnel rig"),
        })
        .unwrap();
    assert_eq!(opacity, 1.0);
    assert!(visible);

    let cam = slog.borrow().camera;
    assert!(close(vec3(cam[0], cam[1], cam[2]), vec3(0.0, 1.4, -13.0)), "camera {:?}", &cam[..3]);
    // fov and fog come from the tunnel stage
    assert_eq!(cam[6], 60.0);
    assert_eq!(cam[7], 0.02);
}

#[test]
fn pointer_tilts_the_rig() {
    let (fx, hlog, _) = mounted(EffectConfig::gate());
    // Top-right corner is (1, 1) in device coordinates
    point_at(&hlog, 1280.0, 0.0);
    run_frames(&hlog, 1000);

    let rot = fx
        .with_scene(|s| match &s.rig {
            Rig::Door(rig) => s.get(rig.root).unwrap().local.rotation,
            Rig::Tunnel(_) => panic!("expected door rig"),
        })
        .unwrap();
    assert!(close(rot, vec3(0.01, 0.03, 0.0)), "rig rotation {:?}", rot);
}

#[test]
fn long_stall_is_clamped() {
    let (fx, hlog, slog) = mounted(EffectConfig::gate());
    run_frames(&hlog, 1);
    scroll_to(&hlog, 1200.0);
    // A ten-second gap between frames moves at most a quarter second's worth
    hlog.borrow_mut().now += 10_000.0;
    run_frames(&hlog, 1);

    let z = slog.borrow().camera[2];
    assert!(z < 8.0 && z > -2.0, "camera z {}", z);
    let (left, _) = fx.with_scene(door_angles).unwrap();
    assert!(left > -FRAC_PI_2 + 0.01);
}
