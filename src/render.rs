// render.rs - Encode scene state to flat f32 buffers
//
// Output layout (for the JS rendering target):
//   camera    12 floats: position xyz, rotation xyz, fov (deg), fog density,
//                        background rgb, instance count
//   instances 32 floats per visible drawable part:
//     0-15   world matrix, column-major
//     16-19  tint rgb, composed opacity
//     20-21  metalness, roughness
//     22     shape code (1 box, 2 cylinder, 3 plane)
//     23-26  shape dims
//     27-29  albedo / normal / roughness texture ids (-1 = none)
//     30     transparent flag
//     31     part index

use glam::Mat4;

use crate::scene::SceneRoot;

pub const CAMERA_FLOATS: usize = 12;
pub const INSTANCE_FLOATS: usize = 32;

const NO_TEXTURE: f32 = -1.0;

pub struct FrameEncoder {
    camera: [f32; CAMERA_FLOATS],
    out: Vec<f32>,
    // Per-part scratch, indexed like the scene arena
    world: Vec<Mat4>,
    opacity: Vec<f32>,
    shown: Vec<bool>,
    count: usize,
}

impl FrameEncoder {
    /// Size every buffer for `scene` so encoding never allocates.
    pub fn new(scene: &SceneRoot) -> Self {
        let n = scene.len();
        Self {
            camera: [0.0; CAMERA_FLOATS],
            out: Vec::with_capacity(scene.drawable_count() * INSTANCE_FLOATS),
            world: vec![Mat4::IDENTITY; n],
            opacity: vec![1.0; n],
            shown: vec![true; n],
            count: 0,
        }
    }

    pub fn clear(&mut self) {
        self.out.clear();
        self.count = 0;
    }

    pub fn camera(&self) -> &[f32; CAMERA_FLOATS] {
        &self.camera
    }

    pub fn instances(&self) -> &[f32] {
        &self.out
    }

    pub fn instance_count(&self) -> usize {
        self.count
    }

    pub fn ptr(&self) -> *const f32 {
        self.out.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    /// World transform of part `i` from the last encode.
    pub fn world(&self, i: usize) -> Option<Mat4> {
        self.world.get(i).copied()
    }

    /// Resolve the hierarchy and pack one frame.
    pub fn encode(&mut self, scene: &SceneRoot) {
        self.clear();
        if self.world.len() != scene.len() {
            // Scene changed shape after mount; size up once and carry on
            self.world.resize(scene.len(), Mat4::IDENTITY);
            self.opacity.resize(scene.len(), 1.0);
            self.shown.resize(scene.len(), true);
        }

        for (i, part) in scene.parts().iter().enumerate() {
            let local = part.local.matrix();
            let (world, opacity, shown) = match part.parent {
                Some(p) => {
                    let p = p.index();
                    (self.world[p] * local, self.opacity[p] * part.opacity, self.shown[p] && part.visible)
                }
                None => (local, part.opacity, part.visible),
            };
            self.world[i] = world;
            self.opacity[i] = opacity;
            self.shown[i] = shown;

            let Some(m) = part.material else { continue };
            let alpha = opacity * m.opacity;
            if !shown || !part.shape.is_drawable() || alpha <= 0.0 {
                continue;
            }

            self.out.extend_from_slice(&world.to_cols_array());
            self.out.extend_from_slice(&[m.color.r, m.color.g, m.color.b, alpha]);
            self.out.extend_from_slice(&[m.metalness, m.roughness, part.shape.code()]);
            self.out.extend_from_slice(&part.shape.dims());
            let tex = |id: Option<crate::texture::TextureId>| id.map_or(NO_TEXTURE, |t| t.0 as f32);
            self.out.extend_from_slice(&[tex(m.albedo), tex(m.normal), tex(m.roughness_map)]);
            let transparent = m.transparent || alpha < 1.0;
            self.out.extend_from_slice(&[if transparent { 1.0 } else { 0.0 }, i as f32]);
            self.count += 1;
        }

        let cam = &scene.camera;
        let st = &scene.stage;
        self.camera = [
            cam.position.x,
            cam.position.y,
            cam.position.z,
            cam.rotation.x,
            cam.rotation.y,
            cam.rotation.z,
            st.fov_deg,
            st.fog_density,
            st.background.r,
            st.background.g,
            st.background.b,
            self.count as f32,
        ];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::config::EffectConfig;
    use crate::scene::{self, CameraState, Group, Material, Part, PartId, Rig, Shape, Transform};
    use crate::texture::{TextureBank, TextureKind, TextureParams};
    use glam::Vec3;

    fn tiny_bank() -> TextureBank {
        let mut bank = TextureBank::new(0);
        for kind in TextureKind::ALL {
            bank.set_params(kind, TextureParams { size: 8, ..TextureParams::preset(kind, 0) });
        }
        bank
    }

    #[test]
    fn record_layout_is_fixed_width() {
        let scene = scene::build(&EffectConfig::gate(), &mut tiny_bank()).unwrap();
        let mut enc = FrameEncoder::new(&scene);
        enc.encode(&scene);
        assert_eq!(enc.len(), enc.instance_count() * INSTANCE_FLOATS);
        assert_eq!(enc.instance_count(), scene.drawable_count());
        assert_eq!(enc.camera()[11], enc.instance_count() as f32);
        assert_eq!(enc.camera()[6], 50.0);
    }

    #[test]
    fn encoding_reuses_its_buffer() {
        let scene = scene::build(&EffectConfig::tunnel(), &mut tiny_bank()).unwrap();
        let mut enc = FrameEncoder::new(&scene);
        enc.encode(&scene);
        let ptr = enc.ptr();
        let cap = enc.out.capacity();
        for _ in 0..10 {
            enc.encode(&scene);
        }
        assert_eq!(enc.ptr(), ptr);
        assert_eq!(enc.out.capacity(), cap);
    }

    #[test]
    fn hidden_interior_is_skipped() {
        let scene = scene::build(&EffectConfig::tunnel(), &mut tiny_bank()).unwrap();
        let Rig::Tunnel(rig) = &scene.rig else { panic!() };
        let hidden = scene.parts().iter().filter(|p| p.shape.is_drawable() && p.group == Group::InteriorReveal).count();
        let mut enc = FrameEncoder::new(&scene);
        enc.encode(&scene);
        assert!(hidden > 0);
        assert_eq!(enc.instance_count(), scene.drawable_count() - hidden);
        assert!(!scene.get(rig.interior).unwrap().visible);
    }

    #[test]
    fn transparent_flag_follows_material_and_fade() {
        let mut scene = scene::build(&EffectConfig::tunnel(), &mut tiny_bank()).unwrap();
        let id = |name: &str| scene.find(name).unwrap();
        let (outer, opening, next) = (id("arch_0_outer"), id("arch_0_opening"), id("arch_1_outer"));
        let ring = id("arch_0");
        let flag = |enc: &FrameEncoder, part: PartId| {
            let i = part.index() as f32;
            enc.instances().chunks_exact(INSTANCE_FLOATS).find(|r| r[31] == i).map(|r| r[30])
        };
        let mut enc = FrameEncoder::new(&scene);
        enc.encode(&scene);
        assert_eq!(flag(&enc, outer), Some(0.0));
        assert_eq!(flag(&enc, opening), Some(1.0));

        // Fading the ring group makes its opaque pieces blend too
        scene.get_mut(ring).unwrap().opacity = 0.3;
        enc.encode(&scene);
        assert_eq!(flag(&enc, outer), Some(1.0));
        assert_eq!(flag(&enc, next), Some(0.0));
    }

    #[test]
    fn world_transform_and_opacity_compose() {
        let camera = CameraState { position: Vec3::ZERO, rotation: Vec3::ZERO };
        let mut scene = scene::build(&EffectConfig::gate(), &mut tiny_bank()).unwrap();
        scene.camera = camera;
        let parent = scene.add(None, Part::node("p", Group::Rig, Transform::at(1.0, 0.0, 0.0).scaled(2.0, 2.0, 2.0)));
        scene.get_mut(parent).unwrap().opacity = 0.5;
        let m = Material::flat(Rgb::WHITE, 0.0, 1.0).translucent(0.5);
        let child = scene.add(Some(parent), Part::solid("c", Group::Rig, Shape::cuboid(1.0, 1.0, 1.0), Transform::at(1.0, 0.0, 0.0), m));

        let mut enc = FrameEncoder::new(&scene);
        enc.encode(&scene);
        let w = enc.world(child.index()).unwrap();
        assert!((w.transform_point3(Vec3::ZERO) - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-6);

        let rec = enc.instances().chunks_exact(INSTANCE_FLOATS).last().unwrap();
        assert_eq!(rec[19], 0.25);
        assert_eq!(rec[30], 1.0);
        assert_eq!(rec[31], child.index() as f32);
    }
}
