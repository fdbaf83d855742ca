// raster.rs - 2D canvas for texture synthesis on a tiny-skia Pixmap
//
// The base field is always opaque. Every primitive is drawn again at the
// ±width/±height offsets it overlaps, so the finished tile repeats without
// seams. Paints use tiny-skia's default source-over blending.

use tiny_skia::{
    Color, FillRule, GradientStop, IntSize, LinearGradient, Paint, PathBuilder, Pixmap, Point,
    RadialGradient, Rect, Shader, SpreadMode, Stroke, Transform,
};

use crate::color::Rgb;

/// Gradient stop: (offset in [0, 1], color). Offsets must be ascending.
pub type Stop = (f32, Rgb);

/// Axis-aligned extent of a primitive: (min x, min y, max x, max y).
type Bounds = (f32, f32, f32, f32);

pub struct Canvas {
    w: u32,
    h: u32,
    pixmap: Pixmap,
}

fn color(c: Rgb, alpha: f32) -> Color {
    let [r, g, b] = c.to_rgb8();
    Color::from_rgba8(r, g, b, (alpha.clamp(0.0, 1.0) * 255.0).round() as u8)
}

fn solid(c: Rgb, alpha: f32) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color(c, alpha));
    paint.anti_alias = true;
    paint
}

fn gradient_stops(stops: &[Stop]) -> Vec<GradientStop> {
    stops.iter().map(|&(t, c)| GradientStop::new(t, color(c, 1.0))).collect()
}

impl Canvas {
    /// Returns None when the buffer cannot be allocated.
    pub fn new(w: u32, h: u32) -> Option<Self> {
        let size = IntSize::from_wh(w, h)?;
        let n = (w as usize).checked_mul(h as usize)?.checked_mul(4)?;
        let mut data = Vec::new();
        data.try_reserve_exact(n).ok()?;
        data.resize(n, 0);
        let pixmap = Pixmap::from_vec(data, size)?;
        Some(Self { w, h, pixmap })
    }

    pub fn width(&self) -> u32 {
        self.w
    }

    pub fn height(&self) -> u32 {
        self.h
    }

    pub fn get(&self, x: u32, y: u32) -> Rgb {
        self.pixmap
            .pixel(x, y)
            .map(|p| {
                let c = p.demultiply();
                Rgb::from_rgb8(c.red(), c.green(), c.blue())
            })
            .unwrap_or_default()
    }

    pub fn fill(&mut self, c: Rgb) {
        self.pixmap.fill(color(c, 1.0));
    }

    /// Per-pixel fill, used for deterministic fields like normal grain.
    pub fn fill_with(&mut self, f: impl Fn(u32, u32) -> Rgb) {
        let w = self.w;
        for (i, px) in self.pixmap.data_mut().chunks_exact_mut(4).enumerate() {
            let [r, g, b] = f(i as u32 % w, i as u32 / w).to_rgb8();
            px.copy_from_slice(&[r, g, b, 255]);
        }
    }

    fn fill_shader(&mut self, shader: Option<Shader<'static>>, stops: &[Stop]) {
        let Some(shader) = shader else {
            // Degenerate gradient: flat first stop
            self.fill(stops.first().map_or(Rgb::default(), |s| s.1));
            return;
        };
        let mut paint = Paint::default();
        paint.shader = shader;
        if let Some(rect) = Rect::from_xywh(0.0, 0.0, self.w as f32, self.h as f32) {
            self.pixmap.fill_rect(rect, &paint, Transform::identity(), None);
        }
    }

    /// Top-to-bottom gradient.
    pub fn fill_vertical(&mut self, stops: &[Stop]) {
        let shader = LinearGradient::new(
            Point::from_xy(0.0, 0.0),
            Point::from_xy(0.0, self.h as f32),
            gradient_stops(stops),
            SpreadMode::Pad,
            Transform::identity(),
        );
        self.fill_shader(shader, stops);
    }

    /// Diagonal gradient along (x/w + y/h) mod 1. Seamless when the first and
    /// last stops share a color.
    pub fn fill_diagonal(&mut self, stops: &[Stop]) {
        let (w, h) = (self.w as f32, self.h as f32);
        // End point d with d/|d|² = (1/w, 1/h), so the gradient parameter is x/w + y/h
        let k = 1.0 / (1.0 / (w * w) + 1.0 / (h * h));
        let shader = LinearGradient::new(
            Point::from_xy(0.0, 0.0),
            Point::from_xy(k / w, k / h),
            gradient_stops(stops),
            SpreadMode::Repeat,
            Transform::identity(),
        );
        self.fill_shader(shader, stops);
    }

    /// Radial gradient centered on the tile.
    pub fn fill_radial(&mut self, radius: f32, stops: &[Stop]) {
        let center = Point::from_xy(self.w as f32 * 0.5, self.h as f32 * 0.5);
        let shader = RadialGradient::new(
            center,
            center,
            radius.max(f32::EPSILON),
            gradient_stops(stops),
            SpreadMode::Pad,
            Transform::identity(),
        );
        self.fill_shader(shader, stops);
    }

    /// Run `draw` once per tile offset whose copy of `bounds` touches the canvas.
    fn tiled(&mut self, bounds: Bounds, mut draw: impl FnMut(&mut Pixmap, Transform)) {
        let (w, h) = (self.w as f32, self.h as f32);
        let (x0, y0, x1, y1) = bounds;
        for dy in [-h, 0.0, h] {
            if y0 + dy >= h || y1 + dy <= 0.0 {
                continue;
            }
            for dx in [-w, 0.0, w] {
                if x0 + dx >= w || x1 + dx <= 0.0 {
                    continue;
                }
                draw(&mut self.pixmap, Transform::from_translate(dx, dy));
            }
        }
    }

    /// Full-width horizontal band centered on `y`.
    pub fn stroke_band(&mut self, y: f32, width: f32, c: Rgb, a: f32) {
        let w = self.w as f32;
        let Some(rect) = Rect::from_xywh(0.0, y - width * 0.5, w, width) else {
            return;
        };
        let paint = solid(c, a);
        self.tiled((0.0, rect.top(), w, rect.bottom()), |pm, t| pm.fill_rect(rect, &paint, t, None));
    }

    /// Anti-aliased line segment.
    pub fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, width: f32, c: Rgb, a: f32) {
        let mut pb = PathBuilder::new();
        pb.move_to(x0, y0);
        pb.line_to(x1, y1);
        let Some(path) = pb.finish() else {
            return;
        };
        let stroke = Stroke { width, ..Stroke::default() };
        let paint = solid(c, a);
        let hw = width * 0.5;
        let bounds = (x0.min(x1) - hw, y0.min(y1) - hw, x0.max(x1) + hw, y0.max(y1) + hw);
        self.tiled(bounds, |pm, t| pm.stroke_path(&path, &paint, &stroke, t, None));
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, r: f32, c: Rgb, a: f32) {
        let Some(path) = PathBuilder::from_circle(cx, cy, r) else {
            return;
        };
        let paint = solid(c, a);
        self.tiled((cx - r, cy - r, cx + r, cy + r), |pm, t| {
            pm.fill_path(&path, &paint, FillRule::Winding, t, None)
        });
    }

    /// Pixel-snapped rectangle, at least one pixel each way.
    pub fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, c: Rgb, a: f32) {
        let Some(rect) = Rect::from_xywh(x.round(), y.round(), w.round().max(1.0), h.round().max(1.0)) else {
            return;
        };
        let paint = solid(c, a);
        let bounds = (rect.left(), rect.top(), rect.right(), rect.bottom());
        self.tiled(bounds, |pm, t| pm.fill_rect(rect, &paint, t, None));
    }

    /// Demultiplied RGBA8 with alpha forced to 255. None if the output cannot
    /// be allocated.
    pub fn into_rgba(self) -> Option<Vec<u8>> {
        let mut out = Vec::new();
        out.try_reserve_exact(self.pixmap.data().len()).ok()?;
        for p in self.pixmap.pixels() {
            let c = p.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), 255]);
        }
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb = Rgb::WHITE;
    const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    #[test]
    fn rejects_empty_canvas() {
        assert!(Canvas::new(0, 16).is_none());
        assert!(Canvas::new(16, 0).is_none());
    }

    #[test]
    fn circle_wraps_across_edges() {
        let mut c = Canvas::new(32, 32).unwrap();
        c.fill(BLACK);
        c.fill_circle(0.0, 0.0, 4.0, WHITE, 1.0);
        // Quadrants land in all four corners
        assert_eq!(c.get(0, 0), WHITE);
        assert_eq!(c.get(31, 0), WHITE);
        assert_eq!(c.get(0, 31), WHITE);
        assert_eq!(c.get(31, 31), WHITE);
        assert_eq!(c.get(16, 16), BLACK);
    }

    #[test]
    fn band_covers_every_column() {
        let mut c = Canvas::new(64, 16).unwrap();
        c.fill(BLACK);
        c.stroke_band(8.0, 2.0, WHITE, 1.0);
        for x in 0..64 {
            assert_eq!(c.get(x, 7), WHITE);
            assert_eq!(c.get(x, 8), WHITE);
            assert_eq!(c.get(x, 0), BLACK);
        }
    }

    #[test]
    fn band_wraps_vertically() {
        let mut c = Canvas::new(16, 16).unwrap();
        c.fill(BLACK);
        c.stroke_band(0.0, 2.0, WHITE, 1.0);
        assert_eq!(c.get(3, 0), WHITE);
        assert_eq!(c.get(3, 15), WHITE);
        assert_eq!(c.get(3, 8), BLACK);
    }

    #[test]
    fn line_is_partial_alpha() {
        let mut c = Canvas::new(16, 16).unwrap();
        c.fill(BLACK);
        c.stroke_line(2.0, 8.5, 14.0, 8.5, 1.0, WHITE, 0.5);
        let p = c.get(8, 8);
        assert!((p.r - 0.5).abs() < 0.01, "{:?}", p);
        assert_eq!(c.get(8, 2), BLACK);
    }

    #[test]
    fn translucent_rect_blends_over_base() {
        let mut c = Canvas::new(8, 8).unwrap();
        c.fill(WHITE);
        c.fill_rect(2.0, 2.0, 3.0, 3.0, BLACK, 0.25);
        assert!((c.get(3, 3).r - 0.75).abs() < 0.01);
        assert_eq!(c.get(6, 6), WHITE);
    }

    #[test]
    fn diagonal_gradient_is_seamless_with_matching_ends() {
        let mut c = Canvas::new(64, 64).unwrap();
        let stops = [(0.0, BLACK), (0.5, WHITE), (1.0, BLACK)];
        c.fill_diagonal(&stops);
        for y in 0..64 {
            let a = c.get(63, y);
            let b = c.get(0, y);
            assert!((a.r - b.r).abs() < 0.1);
        }
    }

    #[test]
    fn rgba_output_is_opaque() {
        let mut c = Canvas::new(8, 4).unwrap();
        c.fill(Rgb::hex(0x808080));
        let rgba = c.into_rgba().unwrap();
        assert_eq!(rgba.len(), 8 * 4 * 4);
        assert!(rgba.chunks_exact(4).all(|p| p[3] == 255));
        assert_eq!(&rgba[..3], &[0x80, 0x80, 0x80]);
    }
}
