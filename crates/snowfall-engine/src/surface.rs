//! Drawing targets for the render pass.

use snowfall_core::{ImageBuffer, Rgba, SurfaceSize};

/// Something particles can be painted onto.
pub trait Surface {
    /// Surface dimensions in pixels.
    fn size(&self) -> SurfaceSize;

    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Paint `image` scaled to a `size x size` square with its top-left
    /// corner at `(x, y)`, multiplying every pixel's alpha by `alpha / 255`.
    fn draw_image(&mut self, image: &ImageBuffer, x: f32, y: f32, size: u32, alpha: u8);
}

/// In-memory RGBA surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    size: SurfaceSize,
    pixels: Vec<Rgba>,
}

impl Canvas {
    /// Create a transparent canvas.
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            pixels: vec![Rgba::TRANSPARENT; size.width as usize * size.height as usize],
        }
    }

    /// Pixel at `(x, y)`, or `None` outside the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.size.width as usize + x as usize)
            .copied()
    }

    /// Whether every pixel is fully transparent.
    pub fn is_blank(&self) -> bool {
        self.pixels.iter().all(|p| p.is_transparent())
    }
}

impl Surface for Canvas {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn clear(&mut self) {
        self.pixels.fill(Rgba::TRANSPARENT);
    }

    fn draw_image(&mut self, image: &ImageBuffer, x: f32, y: f32, size: u32, alpha: u8) {
        if size == 0 || alpha == 0 {
            return;
        }

        let left = x.floor() as i64;
        let top = y.floor() as i64;
        let width = i64::from(self.size.width);
        let height = i64::from(self.size.height);
        let extent = i64::from(size);

        // Clip the destination square against the canvas
        let x0 = left.max(0);
        let y0 = top.max(0);
        let x1 = (left + extent).min(width);
        let y1 = (top + extent).min(height);

        for py in y0..y1 {
            let v = (py - top) as f32 / size as f32;
            let row = py as usize * self.size.width as usize;
            for px in x0..x1 {
                let u = (px - left) as f32 / size as f32;
                let src = image.sample(u, v).with_alpha_factor(alpha);
                if src.is_transparent() {
                    continue;
                }
                let dst = &mut self.pixels[row + px as usize];
                *dst = dst.blend(src);
            }
        }
    }
}
