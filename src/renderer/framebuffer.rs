//! CPU-side RGBA pixel buffer that every renderer draws into.

use super::primitives::Color;
use crate::error::Result;
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// An RGBA8 raster. Writes outside the buffer are clipped silently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Framebuffer {
    image: RgbaImage,
}

impl Framebuffer {
    /// Creates a buffer filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Fills the whole buffer with `color`.
    pub fn clear(&mut self, color: Color) {
        let px = Rgba(color.0);
        self.image.pixels_mut().for_each(|p| *p = px);
    }

    /// Overwrites the pixel at `(x, y)`; out-of-bounds writes are dropped.
    #[inline]
    pub fn set_pixel(&mut self, x: i64, y: i64, color: Color) {
        if x >= 0 && y >= 0 && x < self.width() as i64 && y < self.height() as i64 {
            self.image.put_pixel(x as u32, y as u32, Rgba(color.0));
        }
    }

    /// Returns the pixel at `(x, y)`.
    ///
    /// # Panics
    /// If the coordinates are outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        Color(self.image.get_pixel(x, y).0)
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_bytes(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Mutable raw RGBA bytes, for handing the buffer to a rasterizer.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }

    /// Borrows the underlying image.
    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    /// Consumes the buffer, returning the underlying image.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Encodes the buffer as PNG.
    pub fn encode_png(&self) -> Result<Vec<u8>> {
        let mut bytes = Cursor::new(Vec::new());
        self.image.write_to(&mut bytes, ImageFormat::Png)?;
        Ok(bytes.into_inner())
    }

    /// Writes the buffer to `path` as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_bounds_writes_are_clipped() {
        let mut fb = Framebuffer::new(4, 3);
        fb.set_pixel(-1, 0, Color::hex(0xffffff));
        fb.set_pixel(4, 0, Color::hex(0xffffff));
        fb.set_pixel(0, 3, Color::hex(0xffffff));
        assert!(fb.as_bytes().iter().all(|&b| b == 0));
        fb.set_pixel(3, 2, Color::hex(0x102030));
        assert_eq!(fb.pixel(3, 2), Color::hex(0x102030));
    }

    #[test]
    fn test_png_signature_and_decode() {
        let mut fb = Framebuffer::new(8, 8);
        fb.clear(Color::hex(0x3b82f6));
        let png = fb.encode_png().unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        let decoded = image::load_from_memory(&png).unwrap().to_rgba8();
        assert_eq!(decoded.get_pixel(5, 5).0, Color::hex(0x3b82f6).0);
    }

    #[test]
    fn test_save_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        Framebuffer::new(2, 2).save_png(&path).unwrap();
        assert!(path.exists());
    }
}
