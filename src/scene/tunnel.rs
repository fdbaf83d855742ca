// tunnel.rs - Tunnel scene: receding terracotta arches and an interior room
//
// Ring i sits at z = -i * spacing with a shrinking scale and a darkening
// tint, which reads as depth even before fog. The interior room hangs off
// the same rig so parallax moves it with the arches.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use super::{CameraState, Group, Material, Part, PartId, Rig, SceneRoot, Shape, Transform, TunnelRig};
use crate::color::Rgb;
use crate::config::{TunnelConfig, TunnelLayout};
use crate::texture::{TextureBank, TextureId, TextureKind};

// Ring cover frames, beyond the arch opening
const OUTER_MARGIN: f32 = 0.4;
const INNER_MARGIN: f32 = 0.2;
const SIDE_WALL_GAP: f32 = 1.5;
const STRIP_OVERHANG: f32 = 3.0;
const OPENING_FILL: f32 = 0.92;
const OPENING_OPACITY: f32 = 0.05;

// Whole-tunnel shell
const SHELL_CENTER_Z: f32 = -8.0;
const SHELL_LENGTH: f32 = 40.0;
const SHELL_HALF_WIDTH: f32 = 6.0;
const SHELL_FLOOR_Y: f32 = -2.0;
const SHELL_CEILING_Y: f32 = 5.0;

// Interior room
const INTERIOR_FLOOR_Y: f32 = -1.8;
const INTERIOR_HALF_WIDTH: f32 = 7.0;

const TERRACOTTA: Rgb = Rgb::hex(0xa67c52);
const CLAY_DARK: Rgb = Rgb::hex(0x8b6f47);
const BLUSH: Rgb = Rgb::hex(0xf5d4c4);
const CREAM: Rgb = Rgb::hex(0xfaf8f3);
const LINEN: Rgb = Rgb::hex(0xf5e6d3);

pub(super) fn build(cfg: &TunnelConfig, bank: &mut TextureBank) -> SceneRoot {
    let wall = bank.get_or_synthesize(TextureKind::Terracotta);
    let camera = CameraState { position: cfg.motion.camera_start, rotation: Vec3::ZERO };
    let mut scene = SceneRoot::empty(camera, cfg.stage);
    let l = &cfg.layout;

    let root = scene.add(None, Part::node("tunnel_rig", Group::Rig, Transform::IDENTITY));
    let arches: Vec<PartId> = (0..l.ring_count).map(|i| arch(&mut scene, root, l, wall, i)).collect();
    let interior = interior(&mut scene, root, l);
    shell(&mut scene, wall);

    scene.rig = Rig::Tunnel(TunnelRig { root, arches, interior });
    scene
}

fn arch(scene: &mut SceneRoot, root: PartId, l: &TunnelLayout, wall: TextureId, i: u32) -> PartId {
    let s = l.ring_scale(i);
    let tint = l.tint * l.ring_intensity(i);
    let (w, h, d) = (l.arch_width, l.arch_height, l.arch_depth);
    let g = Group::Arch;

    let at = Transform::at(0.0, 0.0, -(i as f32) * l.spacing).scaled(s, s, 1.0);
    let ring = scene.add(Some(root), Part::node(format!("arch_{i}"), g, at));

    let cover = Material::textured(wall, tint, 0.15, 0.75);
    let body = Material::textured(wall, tint, 0.1, 0.8);
    let trim = Material::flat(tint, 0.3, 0.6);
    let side_x = w * 0.5 + SIDE_WALL_GAP;
    let strip_y = h * 0.5 + 0.75;

    let pieces = [
        ("outer", Shape::cuboid(w + OUTER_MARGIN, h + OUTER_MARGIN, 0.15), Transform::at(0.0, 0.0, -0.1), cover),
        ("inner", Shape::cuboid(w + INNER_MARGIN, h + INNER_MARGIN, 0.2), Transform::IDENTITY, body),
        ("beam_top", Shape::cuboid(w + INNER_MARGIN, d, d), Transform::at(0.0, h * 0.5, 0.05), body),
        ("beam_left", Shape::cuboid(d, h, d), Transform::at(-w * 0.5, 0.0, 0.05), body),
        ("beam_right", Shape::cuboid(d, h, d), Transform::at(w * 0.5, 0.0, 0.05), body),
        (
            "wall_left",
            Shape::plane(h + 1.0, h + 1.0),
            Transform::at(-side_x, 0.0, 0.05).rotated(0.0, FRAC_PI_2, 0.0),
            body,
        ),
        (
            "wall_right",
            Shape::plane(h + 1.0, h + 1.0),
            Transform::at(side_x, 0.0, 0.05).rotated(0.0, -FRAC_PI_2, 0.0),
            body,
        ),
        ("strip_top", Shape::cuboid(w + STRIP_OVERHANG, 0.5, 0.15), Transform::at(0.0, strip_y, 0.05), body),
        ("strip_bottom", Shape::cuboid(w + STRIP_OVERHANG, 0.5, 0.15), Transform::at(0.0, -strip_y, 0.05), body),
        ("trim_top", Shape::cuboid(w * 0.6, 0.1, 0.05), Transform::at(0.0, h * 0.3, 0.08), trim),
        ("trim_bottom", Shape::cuboid(w * 0.6, 0.1, 0.05), Transform::at(0.0, -h * 0.3, 0.08), trim),
        (
            "opening",
            Shape::plane(w * OPENING_FILL, h * OPENING_FILL),
            Transform::at(0.0, 0.0, 0.1),
            Material::flat(Rgb::WHITE, 0.0, 0.0).translucent(OPENING_OPACITY),
        ),
    ];
    for (name, shape, at, m) in pieces {
        scene.add(Some(ring), Part::solid(format!("arch_{i}_{name}"), g, shape, at, m));
    }
    ring
}

fn interior(scene: &mut SceneRoot, root: PartId, l: &TunnelLayout) -> PartId {
    let g = Group::InteriorReveal;
    let node = scene.add(
        Some(root),
        Part::node("interior", g, Transform::at(0.0, 0.0, l.interior_z())).hidden(),
    );
    let solid = |scene: &mut SceneRoot, parent, name: &str, shape, at, m| {
        scene.add(Some(parent), Part::solid(name, g, shape, at, m))
    };

    solid(scene, node, "interior_back", Shape::plane(14.0, 9.0), Transform::IDENTITY, Material::flat(Rgb::hex(0xf5e8d8), 0.0, 0.9));
    let side = Material::flat(CREAM, 0.0, 0.9);
    solid(
        scene,
        node,
        "interior_left",
        Shape::plane(9.0, 9.0),
        Transform::at(-INTERIOR_HALF_WIDTH, 0.0, 0.0).rotated(0.0, FRAC_PI_2, 0.0),
        side,
    );
    solid(
        scene,
        node,
        "interior_right",
        Shape::plane(9.0, 9.0),
        Transform::at(INTERIOR_HALF_WIDTH, 0.0, 0.0).rotated(0.0, -FRAC_PI_2, 0.0),
        side,
    );

    sofa(scene, node, "sofa_left", Transform::at(-2.0, INTERIOR_FLOOR_Y, 2.0).rotated(0.0, 0.3, 0.0), BLUSH);
    sofa(scene, node, "sofa_right", Transform::at(2.5, INTERIOR_FLOOR_Y, 1.5).rotated(0.0, -0.4, 0.0), Rgb::hex(0xfaf0e6));

    let table = scene.add(Some(node), Part::node("coffee_table", g, Transform::at(0.0, INTERIOR_FLOOR_Y, 2.2)));
    solid(scene, table, "coffee_table_top", Shape::cuboid(1.5, 0.06, 0.8), Transform::at(0.0, 0.2, 0.0), Material::flat(TERRACOTTA, 0.15, 0.85));
    for (n, (x, z)) in [(-0.6, -0.3), (0.6, -0.3), (-0.6, 0.3), (0.6, 0.3)].into_iter().enumerate() {
        solid(
            scene,
            table,
            &format!("coffee_table_leg_{n}"),
            Shape::cylinder(0.04, 0.4, 12),
            Transform::at(x, -0.2, z),
            Material::flat(CLAY_DARK, 0.2, 0.8),
        );
    }

    for (name, x) in [("ottoman_left", -1.0), ("ottoman_right", 1.0)] {
        solid(scene, node, name, Shape::cuboid(0.8, 0.3, 0.6), Transform::at(x, INTERIOR_FLOOR_Y, 3.0), Material::flat(TERRACOTTA, 0.1, 0.85));
    }
    solid(scene, node, "pouf", Shape::cylinder(0.4, 0.1, 16), Transform::at(0.0, -1.65, 3.2), Material::flat(CLAY_DARK, 0.1, 0.9));
    solid(scene, node, "rug", Shape::cylinder(2.5, 0.05, 32), Transform::at(0.0, -1.9, 2.0), Material::flat(BLUSH, 0.0, 0.95));
    solid(scene, node, "shelf", Shape::cuboid(1.5, 0.6, 0.15), Transform::at(0.0, 2.5, 0.3), Material::flat(TERRACOTTA, 0.2, 0.8));

    // Oval skylights: flat discs facing the camera, squashed vertically
    for (n, x) in [-2.0, 0.0, 2.0].into_iter().enumerate() {
        solid(
            scene,
            node,
            &format!("skylight_{n}"),
            Shape::cylinder(0.8, 0.02, 32),
            Transform::at(x, 4.0, 0.1).rotated(FRAC_PI_2, 0.0, 0.0).scaled(1.0, 1.0, 0.625),
            Material::flat(Rgb::WHITE, 0.0, 0.2).translucent(0.9),
        );
    }
    node
}

fn sofa(scene: &mut SceneRoot, parent: PartId, name: &str, at: Transform, color: Rgb) {
    let g = Group::InteriorReveal;
    let node = scene.add(Some(parent), Part::node(name, g, at));
    let fabric = Material::flat(color, 0.0, 0.95);
    let cushion = Material::flat(LINEN, 0.0, 0.98);
    let pieces = [
        ("base", Shape::cuboid(3.0, 0.7, 1.2), Transform::at(0.0, 0.35, 0.0), fabric),
        ("back", Shape::cuboid(3.0, 1.1, 0.25), Transform::at(0.0, 0.9, -0.5), fabric),
        ("arm_left", Shape::cuboid(0.25, 0.7, 1.2), Transform::at(-1.5, 0.55, 0.0), fabric),
        ("arm_right", Shape::cuboid(0.25, 0.7, 1.2), Transform::at(1.5, 0.55, 0.0), fabric),
        ("seat_left", Shape::cuboid(1.0, 0.2, 0.7), Transform::at(-0.8, 0.55, 0.25), cushion),
        ("seat_right", Shape::cuboid(1.0, 0.2, 0.7), Transform::at(0.8, 0.55, 0.25), cushion),
        ("bolster", Shape::cuboid(2.8, 0.25, 0.4), Transform::at(0.0, 0.9, -0.3), cushion),
    ];
    for (piece, shape, at, m) in pieces {
        scene.add(Some(node), Part::solid(format!("{name}_{piece}"), g, shape, at, m));
    }
}

/// Floor, ceiling and terracotta walls running the length of the tunnel.
fn shell(scene: &mut SceneRoot, wall: TextureId) {
    let g = Group::RoomShell;
    let node = scene.add(None, Part::node("tunnel_shell", g, Transform::at(0.0, 0.0, SHELL_CENTER_Z)));
    let side = Material::textured(wall, TERRACOTTA, 0.1, 0.85);
    let pieces = [
        (
            "tunnel_floor",
            Shape::plane(SHELL_HALF_WIDTH * 2.0 + 8.0, SHELL_LENGTH),
            Transform::at(0.0, SHELL_FLOOR_Y, 0.0).rotated(-FRAC_PI_2, 0.0, 0.0),
            Material::flat(BLUSH, 0.01, 0.98),
        ),
        (
            "tunnel_ceiling",
            Shape::plane(SHELL_HALF_WIDTH * 2.0 + 8.0, SHELL_LENGTH),
            Transform::at(0.0, SHELL_CEILING_Y, 0.0).rotated(FRAC_PI_2, 0.0, 0.0),
            Material::flat(CREAM, 0.01, 0.97),
        ),
        (
            "tunnel_wall_left",
            Shape::plane(SHELL_LENGTH, 10.0),
            Transform::at(-SHELL_HALF_WIDTH, 0.0, 0.0).rotated(0.0, FRAC_PI_2, 0.0),
            side,
        ),
        (
            "tunnel_wall_right",
            Shape::plane(SHELL_LENGTH, 10.0),
            Transform::at(SHELL_HALF_WIDTH, 0.0, 0.0).rotated(0.0, -FRAC_PI_2, 0.0),
            side,
        ),
    ];
    for (name, shape, at, m) in pieces {
        scene.add(Some(node), Part::solid(name, g, shape, at, m));
    }
}
