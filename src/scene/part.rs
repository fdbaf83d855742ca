// part.rs - Rigid parts, transforms and materials
//
// A part is one node of the flat scene arena. Geometry is described, not
// tessellated: the rendering surface turns Shape dimensions into meshes.

use glam::{EulerRot, Mat4, Quat, Vec2, Vec3};

use crate::color::Rgb;
use crate::texture::TextureId;

/// Index into SceneRoot's part arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartId(pub u32);

impl PartId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Transform-only node
    Group,
    Box { size: Vec3 },
    /// Y-axis cylinder
    Cylinder { radius: f32, height: f32, segments: u32 },
    /// XY plane facing +Z
    Plane { size: Vec2 },
}

impl Shape {
    pub fn cuboid(x: f32, y: f32, z: f32) -> Self {
        Shape::Box { size: Vec3::new(x, y, z) }
    }

    pub fn cylinder(radius: f32, height: f32, segments: u32) -> Self {
        Shape::Cylinder { radius, height, segments }
    }

    pub fn plane(w: f32, h: f32) -> Self {
        Shape::Plane { size: Vec2::new(w, h) }
    }

    pub fn is_drawable(&self) -> bool {
        !matches!(self, Shape::Group)
    }

    /// Wire code used by the frame encoder.
    pub fn code(&self) -> f32 {
        match self {
            Shape::Group => 0.0,
            Shape::Box { .. } => 1.0,
            Shape::Cylinder { .. } => 2.0,
            Shape::Plane { .. } => 3.0,
        }
    }

    /// Up to four dimensions: box (x, y, z), cylinder (r, h, segments),
    /// plane (w, h).
    pub fn dims(&self) -> [f32; 4] {
        match *self {
            Shape::Group => [0.0; 4],
            Shape::Box { size } => [size.x, size.y, size.z, 0.0],
            Shape::Cylinder { radius, height, segments } => [radius, height, segments as f32, 0.0],
            Shape::Plane { size } => [size.x, size.y, 0.0, 0.0],
        }
    }
}

/// Translation, Euler XYZ rotation (radians), scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform =
        Transform { translation: Vec3::ZERO, rotation: Vec3::ZERO, scale: Vec3::ONE };

    pub fn at(x: f32, y: f32, z: f32) -> Self {
        Self { translation: Vec3::new(x, y, z), ..Self::IDENTITY }
    }

    pub fn rotated(mut self, x: f32, y: f32, z: f32) -> Self {
        self.rotation = Vec3::new(x, y, z);
        self
    }

    pub fn scaled(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vec3::new(x, y, z);
        self
    }

    pub fn quat(&self) -> Quat {
        Quat::from_euler(EulerRot::XYZ, self.rotation.x, self.rotation.y, self.rotation.z)
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.translation)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub albedo: Option<TextureId>,
    pub normal: Option<TextureId>,
    pub roughness_map: Option<TextureId>,
    pub color: Rgb,
    pub metalness: f32,
    pub roughness: f32,
    pub opacity: f32,
    pub transparent: bool,
}

impl Material {
    pub fn flat(color: Rgb, metalness: f32, roughness: f32) -> Self {
        Self {
            albedo: None,
            normal: None,
            roughness_map: None,
            color,
            metalness,
            roughness,
            opacity: 1.0,
            transparent: false,
        }
    }

    pub fn textured(albedo: TextureId, color: Rgb, metalness: f32, roughness: f32) -> Self {
        Self { albedo: Some(albedo), ..Self::flat(color, metalness, roughness) }
    }

    pub fn with_normal(mut self, normal: TextureId) -> Self {
        self.normal = Some(normal);
        self
    }

    pub fn with_roughness_map(mut self, map: TextureId) -> Self {
        self.roughness_map = Some(map);
        self
    }

    pub fn translucent(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self.transparent = true;
        self
    }
}

/// Logical grouping used by the animation controller and for census.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Group {
    /// Parallax root of an effect
    Rig,
    DoorPanel,
    Frame,
    RoomShell,
    Arch,
    InteriorReveal,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Part {
    pub name: String,
    pub shape: Shape,
    pub group: Group,
    /// None means the scene root
    pub parent: Option<PartId>,
    /// Transform as built. Animation targets are offsets from here.
    pub base: Transform,
    /// Current transform, written by the controller
    pub local: Transform,
    pub material: Option<Material>,
    pub visible: bool,
    /// Multiplies the material opacity of this part and all descendants
    pub opacity: f32,
}

impl Part {
    pub fn node(name: impl Into<String>, group: Group, at: Transform) -> Self {
        Self {
            name: name.into(),
            shape: Shape::Group,
            group,
            parent: None,
            base: at,
            local: at,
            material: None,
            visible: true,
            opacity: 1.0,
        }
    }

    pub fn solid(
        name: impl Into<String>,
        group: Group,
        shape: Shape,
        at: Transform,
        material: Material,
    ) -> Self {
        Self { shape, material: Some(material), ..Self::node(name, group, at) }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}
