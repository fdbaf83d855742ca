// texture/ - Procedural texture synthesis
//
// synthesize() turns (kind, params) into an RGBA8 tile with repeat wrapping.
// Output depends only on the params (the seed included), so a pinned seed
// reproduces the same bytes. TextureBank memoizes one texture per kind for
// the lifetime of an effect.

mod materials;
pub mod raster;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::color::Rgb;
use raster::Canvas;

/// Largest tile edge we are willing to allocate.
pub const MAX_TEXTURE_SIZE: u32 = 4096;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TextureKind {
    Wood,
    Metal,
    Terracotta,
    RoughnessMap,
    NormalMap,
}

impl TextureKind {
    pub const COUNT: usize = 5;
    pub const ALL: [TextureKind; Self::COUNT] = [
        TextureKind::Wood,
        TextureKind::Metal,
        TextureKind::Terracotta,
        TextureKind::RoughnessMap,
        TextureKind::NormalMap,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            TextureKind::Wood => "wood",
            TextureKind::Metal => "metal",
            TextureKind::Terracotta => "terracotta",
            TextureKind::RoughnessMap => "roughness",
            TextureKind::NormalMap => "normal",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Wrap {
    Repeat,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub base: Rgb,
    /// Light strokes: grain, scratches, stucco lines
    pub accent: Rgb,
    /// Dark strokes or the far end of the base gradient
    pub shade: Rgb,
    /// Knots, wear blobs
    pub blemish: Rgb,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureParams {
    pub size: u32,
    pub seed: u64,
    pub grain_density: u32,
    pub blemish_count: u32,
    pub palette: Palette,
    pub repeat: [f32; 2],
}

impl TextureParams {
    /// Tuned defaults for each material.
    pub fn preset(kind: TextureKind, seed: u64) -> Self {
        match kind {
            TextureKind::Wood => Self {
                size: 1024,
                seed,
                grain_density: 80,
                blemish_count: 8,
                palette: Palette {
                    base: Rgb::hex(0xd4a574),
                    accent: Rgb::from_rgb8(180, 160, 140),
                    shade: Rgb::from_rgb8(140, 100, 70),
                    blemish: Rgb::from_rgb8(100, 70, 40),
                },
                repeat: [1.0, 2.0],
            },
            TextureKind::Metal => Self {
                size: 256,
                seed,
                grain_density: 100,
                blemish_count: 0,
                palette: Palette {
                    base: Rgb::hex(0x2a2a2a),
                    accent: Rgb::WHITE,
                    shade: Rgb::hex(0x1a1a1a),
                    blemish: Rgb::hex(0x1a1a1a),
                },
                repeat: [1.0, 1.0],
            },
            TextureKind::Terracotta => Self {
                size: 1024,
                seed,
                grain_density: 150,
                blemish_count: 80,
                palette: Palette {
                    base: Rgb::hex(0xa67c52),
                    accent: Rgb::from_rgb8(120, 85, 60),
                    shade: Rgb::hex(0x6b4e35),
                    blemish: Rgb::from_rgb8(140, 100, 70),
                },
                repeat: [1.0, 1.0],
            },
            TextureKind::RoughnessMap => Self {
                size: 512,
                seed,
                grain_density: 0,
                blemish_count: 50,
                palette: Palette {
                    base: Rgb::hex(0x808080),
                    accent: Rgb::hex(0x969696),
                    shade: Rgb::hex(0x646464),
                    blemish: Rgb::hex(0x808080),
                },
                repeat: [1.0, 1.0],
            },
            TextureKind::NormalMap => Self {
                size: 512,
                seed,
                grain_density: 8,
                blemish_count: 0,
                palette: Palette {
                    base: Rgb::new(0.5, 0.5, 1.0),
                    accent: Rgb::new(0.5, 0.5, 1.0),
                    shade: Rgb::new(0.5, 0.5, 1.0),
                    blemish: Rgb::new(0.5, 0.5, 1.0),
                },
                repeat: [1.0, 1.0],
            },
        }
    }
}

#[derive(Clone, Debug)]
pub struct Texture {
    pub kind: TextureKind,
    pub width: u32,
    pub height: u32,
    pub wrap: Wrap,
    pub repeat: [f32; 2],
    /// True when synthesis fell back to a flat 1x1 tile
    pub fallback: bool,
    rgba: Vec<u8>,
}

impl Texture {
    /// Lowest-detail stand-in: one opaque pixel of the base color.
    pub fn flat(kind: TextureKind, color: Rgb, repeat: [f32; 2]) -> Self {
        let [r, g, b] = color.to_rgb8();
        Self {
            kind,
            width: 1,
            height: 1,
            wrap: Wrap::Repeat,
            repeat,
            fallback: true,
            rgba: vec![r, g, b, 255],
        }
    }

    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Texel with repeat addressing; any integer coordinate is valid.
    pub fn texel(&self, x: i64, y: i64) -> [u8; 4] {
        let x = x.rem_euclid(self.width as i64) as usize;
        let y = y.rem_euclid(self.height as i64) as usize;
        let i = (y * self.width as usize + x) * 4;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }

    /// Nearest sample at UV, wrapping outside [0, 1).
    pub fn sample(&self, u: f32, v: f32) -> [u8; 4] {
        let x = (u * self.width as f32).floor() as i64;
        let y = (v * self.height as f32).floor() as i64;
        self.texel(x, y)
    }
}

/// Build one texture. Never fails: impossible sizes or allocation failure
/// degrade to a flat tile of the palette base.
pub fn synthesize(kind: TextureKind, params: &TextureParams) -> Texture {
    let flat = || Texture::flat(kind, params.palette.base, params.repeat);

    if params.size == 0 || params.size > MAX_TEXTURE_SIZE {
        log::warn!("{} texture size {} out of range, using flat color", kind.name(), params.size);
        return flat();
    }
    let Some(mut canvas) = Canvas::new(params.size, params.size) else {
        log::warn!("could not allocate {} texture, using flat color", kind.name());
        return flat();
    };

    let mut rng = StdRng::seed_from_u64(params.seed);
    match kind {
        TextureKind::Wood => materials::wood(&mut canvas, params, &mut rng),
        TextureKind::Metal => materials::metal(&mut canvas, params, &mut rng),
        TextureKind::Terracotta => materials::terracotta(&mut canvas, params, &mut rng),
        TextureKind::RoughnessMap => materials::roughness(&mut canvas, params, &mut rng),
        TextureKind::NormalMap => materials::normal(&mut canvas, params),
    }

    let Some(rgba) = canvas.into_rgba() else {
        log::warn!("could not pack {} texture, using flat color", kind.name());
        return flat();
    };
    log::debug!("synthesized {} texture {}x{}", kind.name(), params.size, params.size);

    Texture {
        kind,
        width: params.size,
        height: params.size,
        wrap: Wrap::Repeat,
        repeat: params.repeat,
        fallback: false,
        rgba,
    }
}

/// Index into a TextureBank.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

/// Per-effect texture store. Each kind is synthesized at most once.
pub struct TextureBank {
    seed: u64,
    slots: Vec<Texture>,
    lookup: [Option<TextureId>; TextureKind::COUNT],
    overrides: [Option<TextureParams>; TextureKind::COUNT],
}

impl TextureBank {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            slots: Vec::with_capacity(TextureKind::COUNT),
            lookup: [None; TextureKind::COUNT],
            overrides: [None; TextureKind::COUNT],
        }
    }

    /// Replace the preset params for a kind. Only affects later synthesis.
    pub fn set_params(&mut self, kind: TextureKind, params: TextureParams) {
        self.overrides[kind.index()] = Some(params);
    }

    /// Seed for a kind: the bank seed salted so materials don't correlate.
    pub fn seed_for(&self, kind: TextureKind) -> u64 {
        self.seed ^ (kind.index() as u64 + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    pub fn params_for(&self, kind: TextureKind) -> TextureParams {
        self.overrides[kind.index()]
            .unwrap_or_else(|| TextureParams::preset(kind, self.seed_for(kind)))
    }

    pub fn get_or_synthesize(&mut self, kind: TextureKind) -> TextureId {
        if let Some(id) = self.lookup[kind.index()] {
            return id;
        }
        let params = self.params_for(kind);
        let id = TextureId(self.slots.len() as u32);
        self.slots.push(synthesize(kind, &params));
        self.lookup[kind.index()] = Some(id);
        id
    }

    pub fn get(&self, id: TextureId) -> Option<&Texture> {
        self.slots.get(id.0 as usize)
    }

    pub fn id_of(&self, kind: TextureKind) -> Option<TextureId> {
        self.lookup[kind.index()]
    }

    /// Number of textures synthesized so far.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &Texture)> {
        self.slots.iter().enumerate().map(|(i, t)| (TextureId(i as u32), t))
    }

    pub fn byte_size(&self) -> usize {
        self.slots.iter().map(|t| t.rgba.len()).sum()
    }
}
