//! Colors and the handful of 2D shapes the renderers need.
//!
//! Shapes take floating-point coordinates and are snapped to the pixel grid.
//! Rectangles and strips are written directly; polygons go through tiny-skia
//! with anti-aliasing off, so output stays byte-for-byte reproducible.

use super::framebuffer::Framebuffer;
use tiny_skia::{FillRule, Paint, PathBuilder, PixmapMut, Transform};
use tracing::trace;

/// An RGBA8 color.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub [u8; 4]);

impl Color {
    /// Fully transparent black, the contents of a new buffer.
    pub const TRANSPARENT: Color = Color([0, 0, 0, 0]);
    /// Opaque black.
    pub const BLACK: Color = Color::hex(0x000000);

    /// Opaque color from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Color([(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255])
    }

    /// Color from straight (non-premultiplied) channels.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Color([r, g, b, a])
    }

    /// Red channel.
    pub fn r(self) -> u8 {
        self.0[0]
    }

    /// Green channel.
    pub fn g(self) -> u8 {
        self.0[1]
    }

    /// Blue channel.
    pub fn b(self) -> u8 {
        self.0[2]
    }

    /// Alpha channel.
    pub fn a(self) -> u8 {
        self.0[3]
    }

    /// Linear interpolation between two colors, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color([
            mix(self.0[0], other.0[0]),
            mix(self.0[1], other.0[1]),
            mix(self.0[2], other.0[2]),
            mix(self.0[3], other.0[3]),
        ])
    }
}

/// Fills the axis-aligned rectangle `[x, x + w) × [y, y + h)`.
pub fn fill_rect(fb: &mut Framebuffer, x: f64, y: f64, w: f64, h: f64, color: Color) {
    let (x0, x1) = (x.round() as i64, (x + w).round() as i64);
    let (y0, y1) = (y.round() as i64, (y + h).round() as i64);
    for py in y0.max(0)..y1.min(fb.height() as i64) {
        for px in x0.max(0)..x1.min(fb.width() as i64) {
            fb.set_pixel(px, py, color);
        }
    }
}

/// Draws a one-pixel outline just inside the rectangle's edges.
pub fn stroke_rect(fb: &mut Framebuffer, x: f64, y: f64, w: f64, h: f64, color: Color) {
    let (x0, x1) = (x.round() as i64, (x + w).round() as i64 - 1);
    let (y0, y1) = (y.round() as i64, (y + h).round() as i64 - 1);
    if x1 < x0 || y1 < y0 {
        return;
    }
    for px in x0..=x1 {
        fb.set_pixel(px, y0, color);
        fb.set_pixel(px, y1, color);
    }
    for py in y0..=y1 {
        fb.set_pixel(x0, py, color);
        fb.set_pixel(x1, py, color);
    }
}

/// Fills a vertical run of pixels `[y0, y1)` in column `x`.
pub fn vertical_line(fb: &mut Framebuffer, x: i64, y0: i64, y1: i64, color: Color) {
    for y in y0.max(0)..y1.min(fb.height() as i64) {
        fb.set_pixel(x, y, color);
    }
}

/// Fills rows `[y0, y1)` with a top-to-bottom gradient from `top` to `bottom`.
pub fn vertical_gradient(fb: &mut Framebuffer, y0: u32, y1: u32, top: Color, bottom: Color) {
    let y1 = y1.min(fb.height());
    let span = y1.saturating_sub(y0).max(1) as f64;
    for y in y0..y1 {
        let t = (y - y0) as f64 / span;
        let color = top.lerp(bottom, t);
        for x in 0..fb.width() {
            fb.set_pixel(x as i64, y as i64, color);
        }
    }
}

/// Fills the closed polygon `points`, mapped through `transform`.
///
/// A pixel is covered when its centre lies inside. Colors with alpha below 255
/// are blended source-over, which matches straight alpha as long as the pixels
/// underneath are opaque.
pub fn fill_polygon(
    fb: &mut Framebuffer,
    points: &[(f32, f32)],
    transform: Transform,
    color: Color,
) {
    let [first, rest @ ..] = points else {
        return;
    };
    let mut pb = PathBuilder::new();
    pb.move_to(first.0, first.1);
    for &(x, y) in rest {
        pb.line_to(x, y);
    }
    pb.close();
    let Some(path) = pb.finish() else {
        trace!(points = points.len(), "degenerate polygon skipped");
        return;
    };

    let (width, height) = (fb.width(), fb.height());
    let Some(mut pixmap) = PixmapMut::from_bytes(fb.as_bytes_mut(), width, height) else {
        return;
    };
    let mut paint = Paint::default();
    paint.set_color_rgba8(color.r(), color.g(), color.b(), color.a());
    paint.anti_alias = false;
    pixmap.fill_path(&path, &paint, FillRule::Winding, transform, None);
}
