// door.rs - Gate scene: two hinged wooden leaves in a panelled room
//
// Leaves hang from pivots on the outer edges of the opening, so a pivot's
// Y rotation swings its leaf like a real door. Detail sizes scale with the
// leaf so layout overrides keep the proportions.

use std::f32::consts::FRAC_PI_2;

use super::{CameraState, DoorRig, Group, Material, Part, PartId, Rig, SceneRoot, Shape, Transform};
use crate::color::Rgb;
use crate::config::{DoorLayout, GateConfig};
use crate::texture::{TextureBank, TextureId, TextureKind};

// Leaf detail, as fractions of the leaf size
const INSET_WIDTH: f32 = 0.8;
const INSET_SHORT: f32 = 0.2;
const INSET_TALL: f32 = 0.3;
const INSET_ROW: f32 = 0.325;
const INSET_DEPTH: f32 = 0.03;
const HANDLE_INSET: f32 = 0.1;
const HINGE_ROW: f32 = 0.375;

// Room shell
const ROOM_HALF_WIDTH: f32 = 5.0;
const ROOM_BACK_Z: f32 = -3.0;
const ROOM_FLOOR_Y: f32 = -2.5;
const ROOM_CEILING_Y: f32 = 5.0;
const BASEBOARD_Y: f32 = -2.3;
const CROWN_Y: f32 = 4.8;

const LEAF_COLOR: Rgb = Rgb::hex(0xd4a574);
const INSET_COLOR: Rgb = Rgb::hex(0xc49a6a);
const FRAME_COLOR: Rgb = Rgb::hex(0xb8956a);
const STOP_COLOR: Rgb = Rgb::hex(0xa8855a);
const CROWN_COLOR: Rgb = Rgb::hex(0xc4a574);
const WALL_COLOR: Rgb = Rgb::hex(0xf5f0e8);
const CEILING_COLOR: Rgb = Rgb::hex(0xfaf8f3);
const SURROUND_COLOR: Rgb = Rgb::hex(0xf0e8d8);

struct Maps {
    wood: TextureId,
    metal: TextureId,
    normal: TextureId,
    roughness: TextureId,
}

impl Maps {
    fn wood(&self, color: Rgb, roughness: f32) -> Material {
        Material::textured(self.wood, color, 0.05, roughness)
            .with_normal(self.normal)
            .with_roughness_map(self.roughness)
    }

    fn metal(&self, color: Rgb, metalness: f32, roughness: f32) -> Material {
        Material::textured(self.metal, color, metalness, roughness)
    }
}

pub(super) fn build(cfg: &GateConfig, bank: &mut TextureBank) -> SceneRoot {
    let maps = Maps {
        wood: bank.get_or_synthesize(TextureKind::Wood),
        metal: bank.get_or_synthesize(TextureKind::Metal),
        normal: bank.get_or_synthesize(TextureKind::NormalMap),
        roughness: bank.get_or_synthesize(TextureKind::RoughnessMap),
    };
    let camera = CameraState { position: cfg.motion.camera_start, rotation: glam::Vec3::ZERO };
    let mut scene = SceneRoot::empty(camera, cfg.stage);

    let l = &cfg.layout;
    let root = scene.add(None, Part::node("door_rig", Group::Rig, Transform::at(0.0, l.elevation, 0.0)));
    let left = leaf(&mut scene, root, l, &maps, "left", -1.0);
    let right = leaf(&mut scene, root, l, &maps, "right", 1.0);
    frame(&mut scene, root, l, &maps);
    room(&mut scene, &maps);

    scene.rig = Rig::Door(DoorRig { root, left, right });
    scene
}

/// One leaf on its hinge pivot. `side` is -1 for left, +1 for right.
fn leaf(scene: &mut SceneRoot, root: PartId, l: &DoorLayout, maps: &Maps, name: &str, side: f32) -> PartId {
    let (w, h, t) = (l.panel_width, l.panel_height, l.panel_thickness);
    let hinge_x = side * (l.panel_offset + w * 0.5);
    let pivot = scene.add(
        Some(root),
        Part::node(format!("{name}_door"), Group::DoorPanel, Transform::at(hinge_x, 0.0, 0.0)),
    );

    // Leaf center relative to its hinge; the free edge points at the centerline
    let cx = -side * w * 0.5;
    let g = Group::DoorPanel;
    scene.add(
        Some(pivot),
        Part::solid(
            format!("{name}_leaf"),
            g,
            Shape::cuboid(w, h, t),
            Transform::at(cx, 0.0, 0.0),
            maps.wood(LEAF_COLOR, 0.7),
        ),
    );

    let inset_z = t * 0.5 + 0.01;
    let insets = [
        ("top", INSET_ROW * h, INSET_SHORT * h),
        ("middle", 0.0, INSET_TALL * h),
        ("bottom", -INSET_ROW * h, INSET_SHORT * h),
    ];
    for (row, y, height) in insets {
        scene.add(
            Some(pivot),
            Part::solid(
                format!("{name}_inset_{row}"),
                g,
                Shape::cuboid(w * INSET_WIDTH, height, INSET_DEPTH),
                Transform::at(cx, y, inset_z),
                maps.wood(INSET_COLOR, 0.75),
            ),
        );
    }

    let handle_x = cx - side * (w * 0.5 - HANDLE_INSET);
    let handle = scene.add(
        Some(pivot),
        Part::node(format!("{name}_handle"), g, Transform::at(handle_x, 0.0, inset_z + 0.01)),
    );
    scene.add(
        Some(handle),
        Part::solid(
            format!("{name}_handle_knob"),
            g,
            Shape::cylinder(0.08, 0.2, 16),
            Transform::IDENTITY.rotated(FRAC_PI_2, 0.0, 0.0),
            maps.metal(Rgb::hex(0xc0c0c0), 0.95, 0.1),
        ),
    );
    scene.add(
        Some(handle),
        Part::solid(
            format!("{name}_handle_plate"),
            g,
            Shape::cuboid(0.15, 0.15, 0.05),
            Transform::at(0.0, 0.0, 0.12),
            maps.metal(Rgb::hex(0xa0a0a0), 0.95, 0.1),
        ),
    );

    // Hinge blocks just inside the hinge edge
    let hinge_inset = -side * 0.05;
    for (row, y) in [("top", HINGE_ROW * h), ("bottom", -HINGE_ROW * h)] {
        scene.add(
            Some(pivot),
            Part::solid(
                format!("{name}_hinge_{row}"),
                g,
                Shape::cuboid(0.12, 0.3, 0.08),
                Transform::at(hinge_inset, y, t * 0.5),
                maps.metal(Rgb::hex(0x8a8a8a), 0.9, 0.2),
            ),
        );
    }
    pivot
}

fn frame(scene: &mut SceneRoot, root: PartId, l: &DoorLayout, maps: &Maps) {
    let span = 2.0 * (l.panel_offset + l.panel_width * 0.5);
    let jamb_x = span * 0.5;
    let head_y = l.panel_height * 0.5 + l.frame_width * 0.4;
    let post_h = l.panel_height + l.frame_width;
    let z = -l.frame_depth / 3.0;
    let g = Group::Frame;

    let node = scene.add(Some(root), Part::node("door_frame", g, Transform::IDENTITY));
    let pieces = [
        ("frame_top", Shape::cuboid(span, l.frame_width, l.frame_depth), Transform::at(0.0, head_y, z)),
        ("frame_bottom", Shape::cuboid(span, l.frame_width, l.frame_depth), Transform::at(0.0, -head_y, z)),
        ("frame_left", Shape::cuboid(l.frame_width, post_h, l.frame_depth), Transform::at(-jamb_x, 0.0, z)),
        ("frame_right", Shape::cuboid(l.frame_width, post_h, l.frame_depth), Transform::at(jamb_x, 0.0, z)),
    ];
    for (name, shape, at) in pieces {
        scene.add(Some(node), Part::solid(name, g, shape, at, maps.wood(FRAME_COLOR, 0.8)));
    }

    let stop = Material { roughness_map: None, ..maps.wood(STOP_COLOR, 0.85) };
    scene.add(
        Some(node),
        Part::solid(
            "frame_stop",
            g,
            Shape::cuboid(span - 0.2, post_h - 0.2, 0.05),
            Transform::at(0.0, 0.0, -0.05),
            stop,
        ),
    );
}

fn room(scene: &mut SceneRoot, maps: &Maps) {
    let g = Group::RoomShell;
    let node = scene.add(None, Part::node("room", g, Transform::IDENTITY));
    let span = ROOM_HALF_WIDTH * 2.0;
    let wall = Material::flat(WALL_COLOR, 0.05, 0.9);
    let trim = |color, roughness| Material { normal: None, roughness_map: None, ..maps.wood(color, roughness) };

    let walls = [
        ("wall_left", Transform::at(-ROOM_HALF_WIDTH, 0.0, 0.0).rotated(0.0, FRAC_PI_2, 0.0)),
        ("wall_right", Transform::at(ROOM_HALF_WIDTH, 0.0, 0.0).rotated(0.0, -FRAC_PI_2, 0.0)),
        ("wall_back", Transform::at(0.0, 0.0, ROOM_BACK_Z)),
    ];
    for (name, at) in walls {
        scene.add(Some(node), Part::solid(name, g, Shape::plane(span, span), at, wall));
    }
    scene.add(
        Some(node),
        Part::solid(
            "ceiling",
            g,
            Shape::plane(span, span),
            Transform::at(0.0, ROOM_CEILING_Y, 0.0).rotated(FRAC_PI_2, 0.0, 0.0),
            Material::flat(CEILING_COLOR, 0.02, 0.95),
        ),
    );
    scene.add(
        Some(node),
        Part::solid(
            "floor",
            g,
            Shape::plane(span * 2.0, span * 2.0),
            Transform::at(0.0, ROOM_FLOOR_Y, 0.0).rotated(-FRAC_PI_2, 0.0, 0.0),
            maps.wood(LEAF_COLOR, 0.8),
        ),
    );

    // Baseboards and crown moldings run along each wall
    let runs = [
        ("baseboard", BASEBOARD_Y, 0.15, 0.4, FRAME_COLOR),
        ("crown", CROWN_Y, 0.2, 0.3, CROWN_COLOR),
    ];
    for (name, y, depth, height, color) in runs {
        let m = trim(color, 0.85);
        scene.add(
            Some(node),
            Part::solid(
                format!("{name}_left"),
                g,
                Shape::cuboid(depth, height, span),
                Transform::at(-ROOM_HALF_WIDTH, y, 0.0),
                m,
            ),
        );
        scene.add(
            Some(node),
            Part::solid(
                format!("{name}_right"),
                g,
                Shape::cuboid(depth, height, span),
                Transform::at(ROOM_HALF_WIDTH, y, 0.0),
                m,
            ),
        );
        scene.add(
            Some(node),
            Part::solid(
                format!("{name}_back"),
                g,
                Shape::cuboid(span, height, depth),
                Transform::at(0.0, y, ROOM_BACK_Z),
                m,
            ),
        );
    }

    scene.add(
        Some(node),
        Part::solid(
            "door_surround",
            g,
            Shape::cuboid(5.0, 5.0, 0.3),
            Transform::at(0.0, 0.0, -0.15),
            Material::flat(SURROUND_COLOR, 0.05, 0.9),
        ),
    );
}
