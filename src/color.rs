// color.rs - Linear RGB color in [0, 1]
//
// Used for material tints, texture palettes and the stage background.
// Deserializes from "#rrggbb" strings so JSON overrides read like CSS, or
// from [r, g, b] floats. Serializes as floats so presets round-trip exactly.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(try_from = "RgbRepr", into = "[f32; 3]")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// 0xRRGGBB
    pub const fn hex(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xff) as f32 / 255.0,
            g: ((v >> 8) & 0xff) as f32 / 255.0,
            b: (v & 0xff) as f32 / 255.0,
        }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self { r: r as f32 / 255.0, g: g as f32 / 255.0, b: b as f32 / 255.0 }
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        [
            (self.r.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
            (self.g.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
            (self.b.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
        ]
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        self + (other - self) * t
    }
}

impl std::ops::Add for Rgb {
    type Output = Self;
    fn add(self, o: Self) -> Self {
        Self { r: self.r + o.r, g: self.g + o.g, b: self.b + o.b }
    }
}

impl std::ops::Sub for Rgb {
    type Output = Self;
    fn sub(self, o: Self) -> Self {
        Self { r: self.r - o.r, g: self.g - o.g, b: self.b - o.b }
    }
}

impl std::ops::Mul<f32> for Rgb {
    type Output = Self;
    fn mul(self, s: f32) -> Self {
        Self { r: self.r * s, g: self.g * s, b: self.b * s }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RgbRepr {
    Hex(String),
    Floats([f32; 3]),
}

impl TryFrom<RgbRepr> for Rgb {
    type Error = String;

    fn try_from(r: RgbRepr) -> Result<Self, Self::Error> {
        match r {
            RgbRepr::Hex(s) => Rgb::try_from(s),
            RgbRepr::Floats([r, g, b]) => Ok(Rgb::new(r, g, b)),
        }
    }
}

impl From<Rgb> for [f32; 3] {
    fn from(c: Rgb) -> Self {
        [c.r, c.g, c.b]
    }
}

impl TryFrom<String> for Rgb {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        let digits = s.strip_prefix('#').unwrap_or(&s);
        if digits.len() != 6 {
            return Err(format!("expected #rrggbb, got {:?}", s));
        }
        u32::from_str_radix(digits, 16)
            .map(Rgb::hex)
            .map_err(|_| format!("expected #rrggbb, got {:?}", s))
    }
}
