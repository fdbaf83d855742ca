// config.rs - Effect presets and JSON overrides
//
// Every number the effects use lives here. The presets reproduce the tuned
// look of the site; JSON may override any subset of fields.
//
//   {"kind": "tunnel", "texture_seed": 7, "layout": {"ring_count": 12}}

use glam::{Vec3, vec3};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::color::Rgb;
use crate::error::ConfigError;

pub const DEFAULT_TEXTURE_SEED: u64 = 0xDEADBEEF;

/// Each ring is a dozen parts; past this the scene stops being a background.
pub const MAX_RINGS: u32 = 256;

// Scroll span as a multiple of viewport height, and easing exponent
const GATE_SCROLL_VH: f32 = 1.5;
const GATE_SCROLL_EXPONENT: f32 = 0.8;
const TUNNEL_SCROLL_VH: f32 = 2.0;
const TUNNEL_SCROLL_EXPONENT: f32 = 0.7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectKind {
    Gate,
    Tunnel,
}

impl EffectKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "gate" | "door" => Some(EffectKind::Gate),
            "tunnel" | "portal" => Some(EffectKind::Tunnel),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EffectKind::Gate => "gate",
            EffectKind::Tunnel => "tunnel",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct ScrollConfig {
    /// Scroll distance for the full animation, in viewport heights
    pub distance_vh: f32,
    /// `progress = linear^exponent`
    pub exponent: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self { distance_vh: GATE_SCROLL_VH, exponent: GATE_SCROLL_EXPONENT }
    }
}

/// What the rendering surface needs besides geometry.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Stage {
    pub background: Rgb,
    pub fov_deg: f32,
    pub fog_density: f32,
}

impl Default for Stage {
    fn default() -> Self {
        Self { background: Rgb::hex(0xf5f5f0), fov_deg: 50.0, fog_density: 0.0 }
    }
}

// ============================================================================
// Gate (door) effect
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct DoorLayout {
    /// Height of the door assembly's center
    pub elevation: f32,
    pub panel_width: f32,
    pub panel_height: f32,
    pub panel_thickness: f32,
    /// Distance from the centerline to each leaf's center
    pub panel_offset: f32,
    pub frame_width: f32,
    pub frame_depth: f32,
}

impl Default for DoorLayout {
    fn default() -> Self {
        Self {
            elevation: 3.5,
            panel_width: 1.5,
            panel_height: 4.0,
            panel_thickness: 0.12,
            panel_offset: 1.5,
            frame_width: 0.5,
            frame_depth: 0.3,
        }
    }
}

/// Per-frame smoothing factors at 60 Hz.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct DoorSmoothing {
    pub doors: f32,
    pub camera_position: f32,
    pub camera_rotation: f32,
    pub parallax: f32,
}

impl Default for DoorSmoothing {
    fn default() -> Self {
        Self { doors: 0.12, camera_position: 0.08, camera_rotation: 0.05, parallax: 0.1 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct DoorMotion {
    pub camera_start: Vec3,
    /// Forward dolly over the full scroll
    pub travel: f32,
    pub rise: f32,
    /// Pitch added at full scroll (radians)
    pub tilt: f32,
    /// Exponent applied to progress before opening the leaves
    pub open_exponent: f32,
    /// Rig rotation per unit pointer: [x from pointer.y, y from pointer.x]
    pub parallax: [f32; 2],
    pub smoothing: DoorSmoothing,
}

impl Default for DoorMotion {
    fn default() -> Self {
        Self {
            camera_start: vec3(0.0, 2.0, 8.0),
            travel: 10.0,
            rise: 0.5,
            tilt: 0.1,
            open_exponent: 0.7,
            parallax: [0.01, 0.03],
            smoothing: DoorSmoothing::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct GateConfig {
    pub scroll: ScrollConfig,
    pub layout: DoorLayout,
    pub motion: DoorMotion,
    pub stage: Stage,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            scroll: ScrollConfig { distance_vh: GATE_SCROLL_VH, exponent: GATE_SCROLL_EXPONENT },
            layout: DoorLayout::default(),
            motion: DoorMotion::default(),
            stage: Stage::default(),
        }
    }
}

// ============================================================================
// Tunnel (portal) effect
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct TunnelLayout {
    pub ring_count: u32,
    pub spacing: f32,
    pub arch_width: f32,
    pub arch_height: f32,
    pub arch_depth: f32,
    /// Scale lost by the farthest ring
    pub scale_falloff: f32,
    /// Tint intensity lost by the farthest ring
    pub color_falloff: f32,
    /// Gap between the last ring and the interior room
    pub interior_gap: f32,
    pub tint: Rgb,
}

impl Default for TunnelLayout {
    fn default() -> Self {
        Self {
            ring_count: 8,
            spacing: 1.5,
            arch_width: 3.5,
            arch_height: 4.5,
            arch_depth: 0.4,
            scale_falloff: 0.3,
            color_falloff: 0.2,
            interior_gap: 3.5,
            tint: Rgb::new(0.65, 0.49, 0.32),
        }
    }
}

impl TunnelLayout {
    pub fn length(&self) -> f32 {
        self.ring_count as f32 * self.spacing
    }

    pub fn ring_scale(&self, i: u32) -> f32 {
        1.0 - (i as f32 / self.ring_count as f32) * self.scale_falloff
    }

    pub fn ring_intensity(&self, i: u32) -> f32 {
        1.0 - (i as f32 / self.ring_count as f32) * self.color_falloff
    }

    pub fn interior_z(&self) -> f32 {
        -(self.ring_count.saturating_sub(1) as f32) * self.spacing - self.interior_gap
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct TunnelMotion {
    pub camera_start: Vec3,
    /// Extra travel past the tunnel length so the camera clears the last ring
    pub overshoot: f32,
    pub rise: f32,
    /// Fraction of the tunnel length the look-at point covers
    pub look_ahead: f32,
    pub look_height: f32,
    pub look_rise: f32,
    pub parallax: [f32; 2],
    pub faded_opacity: f32,
    pub reveal_threshold: f32,
    pub reveal_ramp: f32,
    pub pulse_amplitude: f32,
    pub pulse_rate: f32,
    pub smoothing: f32,
}

impl Default for TunnelMotion {
    fn default() -> Self {
        Self {
            camera_start: vec3(0.0, 1.0, 5.0),
            overshoot: 6.0,
            rise: 0.4,
            look_ahead: 0.9,
            look_height: 0.3,
            look_rise: 0.2,
            parallax: [0.05, 0.1],
            faded_opacity: 0.3,
            reveal_threshold: 0.5,
            reveal_ramp: 2.0,
            pulse_amplitude: 0.02,
            pulse_rate: 0.5,
            smoothing: 0.1,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct TunnelConfig {
    pub scroll: ScrollConfig,
    pub layout: TunnelLayout,
    pub motion: TunnelMotion,
    pub stage: Stage,
}

impl Default for TunnelConfig {
    fn default() -> Self {
        Self {
            scroll: ScrollConfig { distance_vh: TUNNEL_SCROLL_VH, exponent: TUNNEL_SCROLL_EXPONENT },
            layout: TunnelLayout::default(),
            motion: TunnelMotion::default(),
            stage: Stage { background: Rgb::hex(0xf5d4c4), fov_deg: 60.0, fog_density: 0.02 },
        }
    }
}

// ============================================================================
// Top level
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Family {
    Gate(GateConfig),
    Tunnel(TunnelConfig),
}

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct EffectConfig {
    pub texture_seed: u64,
    #[serde(flatten)]
    pub family: Family,
}

impl EffectConfig {
    pub fn gate() -> Self {
        Self { texture_seed: DEFAULT_TEXTURE_SEED, family: Family::Gate(GateConfig::default()) }
    }

    pub fn tunnel() -> Self {
        Self { texture_seed: DEFAULT_TEXTURE_SEED, family: Family::Tunnel(TunnelConfig::default()) }
    }

    pub fn preset(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Gate => Self::gate(),
            EffectKind::Tunnel => Self::tunnel(),
        }
    }

    /// Parse a JSON override. `kind` picks the preset; every field left out,
    /// at any depth, keeps that preset's value.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let patch: Value = serde_json::from_str(json)?;
        let kind = patch
            .get("kind")
            .ok_or_else(|| ConfigError::Parse("missing \"kind\"".into()))?;
        let kind: EffectKind = serde_json::from_value(kind.clone())?;

        let mut merged = serde_json::to_value(Self::preset(kind))?;
        overlay(&mut merged, patch);
        let cfg: EffectConfig = serde_json::from_value(merged)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn kind(&self) -> EffectKind {
        match self.family {
            Family::Gate(_) => EffectKind::Gate,
            Family::Tunnel(_) => EffectKind::Tunnel,
        }
    }

    pub fn scroll(&self) -> ScrollConfig {
        match &self.family {
            Family::Gate(g) => g.scroll,
            Family::Tunnel(t) => t.scroll,
        }
    }

    pub fn stage(&self) -> Stage {
        match &self.family {
            Family::Gate(g) => g.stage,
            Family::Tunnel(t) => t.stage,
        }
    }

    /// Reject configs that would build degenerate geometry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("scroll.distance_vh", self.scroll().distance_vh)?;
        match &self.family {
            Family::Gate(g) => {
                let l = &g.layout;
                positive("layout.panel_width", l.panel_width)?;
                positive("layout.panel_height", l.panel_height)?;
                positive("layout.panel_thickness", l.panel_thickness)?;
                positive("layout.panel_offset", l.panel_offset)?;
                positive("layout.frame_width", l.frame_width)?;
                positive("layout.frame_depth", l.frame_depth)?;
            }
            Family::Tunnel(t) => {
                let l = &t.layout;
                if l.ring_count == 0 {
                    return Err(ConfigError::NoRings);
                }
                if l.ring_count > MAX_RINGS {
                    return Err(ConfigError::TooManyRings { count: l.ring_count, max: MAX_RINGS });
                }
                positive("layout.spacing", l.spacing)?;
                positive("layout.arch_width", l.arch_width)?;
                positive("layout.arch_height", l.arch_height)?;
                positive("layout.arch_depth", l.arch_depth)?;
                fraction("layout.scale_falloff", l.scale_falloff)?;
                fraction("layout.color_falloff", l.color_falloff)?;
                if !(l.interior_gap.is_finite() && l.interior_gap >= 0.0) {
                    return Err(ConfigError::OutOfRange { field: "layout.interior_gap", value: l.interior_gap });
                }
            }
        }
        Ok(())
    }
}

/// Recursively write `patch` over `base`. Objects merge key by key; any
/// other value replaces what was there.
fn overlay(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                overlay(base.entry(key).or_insert(Value::Null), value);
            }
        }
        (base, patch) => *base = patch,
    }
}

/// Finite and in [0, 1).
fn fraction(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange { field, value })
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}
