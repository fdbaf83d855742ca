// materials.rs - Procedural surface generators
//
// Each generator paints a base field, then scatters stochastic strokes and
// blobs over it. Counts and palettes come from TextureParams; the ranges
// below shape the look and are the same for every seed.

use rand::Rng;
use rand::rngs::StdRng;
use std::f32::consts::TAU;

use super::TextureParams;
use super::raster::Canvas;
use crate::color::Rgb;

/// Per-channel random lift of up to `amount` (in 8-bit units).
fn jitter(c: Rgb, amount: [f32; 3], rng: &mut StdRng) -> Rgb {
    Rgb::new(
        c.r + rng.random::<f32>() * amount[0] / 255.0,
        c.g + rng.random::<f32>() * amount[1] / 255.0,
        c.b + rng.random::<f32>() * amount[2] / 255.0,
    )
}

/// Light oak: grain bands of two weights plus a few knots.
pub fn wood(canvas: &mut Canvas, p: &TextureParams, rng: &mut StdRng) {
    let size = canvas.height() as f32;
    let base = p.palette.base;
    canvas.fill_vertical(&[(0.0, base * 1.03), (0.5, base * 0.95), (1.0, base * 1.03)]);

    // Fine light grain
    let light = p.grain_density.max(1);
    for i in 0..light {
        let y = (i as f32 / light as f32) * size + (i as f32 * 0.3).sin() * 15.0;
        let lift = rng.random::<f32>() * 40.0;
        let c = p.palette.accent + Rgb::new(lift, lift, lift) * (1.0 / 255.0);
        let width = 1.0 + rng.random::<f32>() * 1.5;
        canvas.stroke_band(y, width, c, 0.4);
    }

    // Darker grain for depth
    let dark = (p.grain_density / 4).max(1);
    for i in 0..dark {
        let y = (i as f32 / dark as f32) * size + (i as f32 * 0.5).sin() * 20.0;
        let c = jitter(p.palette.shade, [20.0, 15.0, 10.0], rng);
        let width = 2.0 + rng.random::<f32>() * 2.0;
        canvas.stroke_band(y, width, c, 0.5);
    }

    // Knots
    let w = canvas.width() as f32;
    for _ in 0..p.blemish_count {
        let x = rng.random::<f32>() * w;
        let y = rng.random::<f32>() * size;
        let r = 30.0 + rng.random::<f32>() * 40.0;
        let c = jitter(p.palette.blemish, [30.0, 20.0, 15.0], rng);
        canvas.fill_circle(x, y, r, c, 0.6);
    }
}

/// Brushed dark metal with faint scratches.
pub fn metal(canvas: &mut Canvas, p: &TextureParams, rng: &mut StdRng) {
    let base = p.palette.base;
    let mid = p.palette.shade;
    canvas.fill_diagonal(&[(0.0, base), (0.5, mid), (1.0, base)]);

    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    for _ in 0..p.grain_density {
        let x = rng.random::<f32>() * w;
        let y = rng.random::<f32>() * h;
        let dx = (rng.random::<f32>() - 0.5) * 20.0;
        let dy = (rng.random::<f32>() - 0.5) * 20.0;
        let a = 0.05 + rng.random::<f32>() * 0.1;
        canvas.stroke_line(x, y, x + dx, y + dy, 0.5, p.palette.accent, a);
    }
}

/// Stucco-like terracotta: radial warm gradient, blobs, fine lines, speckles.
pub fn terracotta(canvas: &mut Canvas, p: &TextureParams, rng: &mut StdRng) {
    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    let base = p.palette.base;
    canvas.fill_radial(
        w * 0.5,
        &[
            (0.0, base),
            (0.3, Rgb::hex(0x8b6f47)),
            (0.7, Rgb::hex(0x7d5f3f)),
            (1.0, p.palette.shade),
        ],
    );

    for _ in 0..p.blemish_count {
        let x = rng.random::<f32>() * w;
        let y = rng.random::<f32>() * h;
        let r = 20.0 + rng.random::<f32>() * 60.0;
        let c = jitter(p.palette.blemish, [30.0, 25.0, 20.0], rng);
        canvas.fill_circle(x, y, r, c, 0.3);
    }

    let lines = p.grain_density.max(1);
    for i in 0..lines {
        let y = (i as f32 / lines as f32) * h + (i as f32 * 0.1).sin() * 8.0;
        let c = jitter(p.palette.accent, [40.0, 35.0, 25.0], rng);
        let width = 0.3 + rng.random::<f32>() * 1.2;
        canvas.stroke_band(y, width, c, 0.2);
    }

    let speckles = p.blemish_count * 5 / 2;
    for _ in 0..speckles {
        let x = rng.random::<f32>() * w;
        let y = rng.random::<f32>() * h;
        let c = jitter(p.palette.accent + Rgb::hex(0x0a0a05), [50.0, 40.0, 30.0], rng);
        let a = 0.1 + rng.random::<f32>() * 0.2;
        let sw = 2.0 + rng.random::<f32>() * 4.0;
        let sh = 2.0 + rng.random::<f32>() * 4.0;
        canvas.fill_rect(x, y, sw, sh, c, a);
    }
}

/// Medium gray with darker and lighter patches.
pub fn roughness(canvas: &mut Canvas, p: &TextureParams, rng: &mut StdRng) {
    canvas.fill(p.palette.base);
    let (w, h) = (canvas.width() as f32, canvas.height() as f32);
    for _ in 0..p.blemish_count {
        let x = rng.random::<f32>() * w;
        let y = rng.random::<f32>() * h;
        let r = 10.0 + rng.random::<f32>() * 20.0;
        let g = (100.0 + rng.random::<f32>() * 50.0) / 255.0;
        canvas.fill_circle(x, y, r, Rgb::new(g, g, g), 1.0);
    }
}

/// Tangent-space grain ripple. `grain_density` is the number of full periods
/// across the tile so the pattern wraps cleanly.
pub fn normal(canvas: &mut Canvas, p: &TextureParams) {
    let freq = TAU * p.grain_density.max(1) as f32 / canvas.width() as f32;
    canvas.fill_with(|x, _| {
        let grain = (x as f32 * freq).sin() * 0.3 + 0.7;
        let v = (128.0 + grain * 20.0) / 255.0;
        Rgb::new(v, v, 1.0)
    });
}
