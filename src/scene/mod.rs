// scene/ - Flat scene arena for the portal effects
//
// Parts live in one Vec in insertion order; a parent always precedes its
// children, so world transforms resolve in a single forward pass. The rigs
// hold the handful of ids the animation controller drives each frame.

mod door;
pub mod part;
mod tunnel;

use glam::Vec3;

use crate::config::{EffectConfig, Family, Stage};
use crate::error::ConfigError;
use crate::texture::TextureBank;

pub use part::{Group, Material, Part, PartId, Shape, Transform};

/// Camera pose, only ever moved by damped interpolation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraState {
    pub position: Vec3,
    /// Euler XYZ, radians
    pub rotation: Vec3,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DoorRig {
    /// Parallax target
    pub root: PartId,
    /// Hinge pivots
    pub left: PartId,
    pub right: PartId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TunnelRig {
    /// Parallax target
    pub root: PartId,
    /// Ring groups, nearest first
    pub arches: Vec<PartId>,
    pub interior: PartId,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Rig {
    Door(DoorRig),
    Tunnel(TunnelRig),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SceneRoot {
    parts: Vec<Part>,
    pub camera: CameraState,
    pub rig: Rig,
    pub stage: Stage,
}

impl SceneRoot {
    fn empty(camera: CameraState, stage: Stage) -> Self {
        // Rig ids are patched by the builders once the rig exists
        let rig = Rig::Door(DoorRig { root: PartId(0), left: PartId(0), right: PartId(0) });
        Self { parts: Vec::new(), camera, rig, stage }
    }

    /// Append a part under `parent` (None = scene root).
    pub fn add(&mut self, parent: Option<PartId>, mut part: Part) -> PartId {
        debug_assert!(parent.is_none_or(|p| p.index() < self.parts.len()));
        part.parent = parent;
        let id = PartId(self.parts.len() as u32);
        self.parts.push(part);
        id
    }

    pub fn get(&self, id: PartId) -> Option<&Part> {
        self.parts.get(id.index())
    }

    pub fn get_mut(&mut self, id: PartId) -> Option<&mut Part> {
        self.parts.get_mut(id.index())
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<PartId> {
        self.parts.iter().position(|p| p.name == name).map(|i| PartId(i as u32))
    }

    pub fn count(&self, group: Group) -> usize {
        self.parts.iter().filter(|p| p.group == group).count()
    }

    pub fn drawable_count(&self) -> usize {
        self.parts.iter().filter(|p| p.shape.is_drawable()).count()
    }
}

/// Build the scene for a config. Textures come from `bank` and are
/// synthesized on first use.
pub fn build(cfg: &EffectConfig, bank: &mut TextureBank) -> Result<SceneRoot, ConfigError> {
    cfg.validate()?;
    let scene = match &cfg.family {
        Family::Gate(g) => door::build(g, bank),
        Family::Tunnel(t) => tunnel::build(t, bank),
    };
    log::debug!(
        "built {} scene: {} parts, {} drawable",
        cfg.kind().name(),
        scene.len(),
        scene.drawable_count()
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GateConfig, TunnelConfig};
    use crate::texture::{TextureKind, TextureParams};

    /// Small tiles keep the tests quick; geometry is unaffected.
    fn bank() -> TextureBank {
        let mut bank = TextureBank::new(1);
        for kind in TextureKind::ALL {
            let p = TextureParams { size: 16, ..TextureParams::preset(kind, 1) };
            bank.set_params(kind, p);
        }
        bank
    }

    #[test]
    fn parents_precede_children() {
        for cfg in [EffectConfig::gate(), EffectConfig::tunnel()] {
            let scene = build(&cfg, &mut bank()).unwrap();
            for (i, p) in scene.parts().iter().enumerate() {
                if let Some(parent) = p.parent {
                    assert!(parent.index() < i, "{} before its parent", p.name);
                }
            }
        }
    }

    #[test]
    fn builds_are_structurally_identical() {
        for cfg in [EffectConfig::gate(), EffectConfig::tunnel()] {
            let a = build(&cfg, &mut bank()).unwrap();
            let b = build(&cfg, &mut bank()).unwrap();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn door_scene_has_two_leaves_and_room() {
        let scene = build(&EffectConfig::gate(), &mut bank()).unwrap();
        let Rig::Door(rig) = &scene.rig else { panic!("expected door rig") };
        assert_eq!(scene.get(rig.left).map(|p| p.group), Some(Group::DoorPanel));
        assert_eq!(scene.get(rig.right).map(|p| p.group), Some(Group::DoorPanel));

        // Hinges sit on the outer edges of the opening
        let l = scene.get(rig.left).unwrap().base.translation;
        let r = scene.get(rig.right).unwrap().base.translation;
        assert!((l.x + 2.25).abs() < 1e-6 && (r.x - 2.25).abs() < 1e-6);

        assert!(scene.find("left_leaf").is_some());
        assert!(scene.find("right_handle_knob").is_some());
        assert_eq!(scene.count(Group::Frame), 6);
        assert!(scene.count(Group::RoomShell) >= 12);
        assert_eq!(scene.camera.position, GateConfig::default().motion.camera_start);
    }

    #[test]
    fn tunnel_scene_places_rings_and_interior() {
        let cfg = EffectConfig::tunnel();
        let scene = build(&cfg, &mut bank()).unwrap();
        let Rig::Tunnel(rig) = &scene.rig else { panic!("expected tunnel rig") };
        let layout = TunnelConfig::default().layout;
        assert_eq!(rig.arches.len(), layout.ring_count as usize);

        for (i, &id) in rig.arches.iter().enumerate() {
            let p = scene.get(id).unwrap();
            assert_eq!(p.group, Group::Arch);
            assert!((p.base.translation.z + i as f32 * layout.spacing).abs() < 1e-6);
            let s = layout.ring_scale(i as u32);
            assert!((p.base.scale.x - s).abs() < 1e-6 && p.base.scale.z == 1.0);
        }

        let interior = scene.get(rig.interior).unwrap();
        assert_eq!(interior.group, Group::InteriorReveal);
        assert!((interior.base.translation.z + 14.0).abs() < 1e-6);
        assert!(!interior.visible);
        assert!(scene.find("sofa_left_base").is_some());
    }

    #[test]
    fn ring_count_changes_only_ring_parts() {
        let mut small = TunnelConfig::default();
        small.layout.ring_count = 3;
        let a = build(&EffectConfig { texture_seed: 1, family: Family::Tunnel(small) }, &mut bank())
            .unwrap();
        let b = build(&EffectConfig::tunnel(), &mut bank()).unwrap();
        let per_ring = (b.len() - a.len()) / 5;
        assert_eq!(b.len() - a.len(), per_ring * 5);
        assert_eq!(a.count(Group::Arch), 3 * per_ring);
    }

    #[test]
    fn invalid_config_is_rejected_before_textures() {
        let mut t = TunnelConfig::default();
        t.layout.ring_count = 0;
        let cfg = EffectConfig { texture_seed: 1, family: Family::Tunnel(t) };
        let mut bank = bank();
        assert_eq!(build(&cfg, &mut bank), Err(ConfigError::NoRings));
        assert!(bank.is_empty());
    }

    #[test]
    fn textures_are_shared_between_parts() {
        let mut bank = bank();
        let scene = build(&EffectConfig::gate(), &mut bank).unwrap();
        assert!(scene.len() > TextureKind::COUNT);
        // wood, metal, normal, roughness
        assert_eq!(bank.len(), 4);
        let wood = bank.id_of(TextureKind::Wood).unwrap();
        let uses = scene.parts().iter().filter(|p| p.material.is_some_and(|m| m.albedo == Some(wood)));
        assert!(uses.count() > 5);
    }
}
