// ============================================================================
// PORTAL ENGINE - Scroll-driven 3D backgrounds with procedural textures
// ============================================================================
//
// Two effects share one pipeline:
//
//   texture   seeded RGBA tiles (wood, metal, terracotta, roughness, normal)
//   scene     flat part arena built once per mount
//   input     scroll/pointer -> eased progress and NDC pointer
//   anim      damped per-frame approach to pure targets
//   render    scene -> flat f32 frame buffers
//   effect    mount / frame / unmount against a Host and a Surface
//   web       browser Host, JS render target, wasm export (wasm32 only)

pub mod anim;
pub mod color;
pub mod config;
pub mod effect;
pub mod error;
pub mod input;
pub mod render;
pub mod scene;
pub mod texture;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{EffectConfig, EffectKind};
pub use effect::{Effect, FrameCallback, Host, Mode, Surface};
pub use error::{ConfigError, EffectError};
pub use input::{InputTracker, PointerState, ScrollState, SharedTracker};
pub use render::FrameEncoder;
pub use scene::SceneRoot;
pub use texture::{Texture, TextureBank, TextureKind, TextureParams, synthesize};
