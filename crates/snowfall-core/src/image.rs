//! Pre-decoded pixel buffers used as snowflake images.

use crate::SnowfallError;

/// An 8-bit RGBA colour with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::new(255, 255, 255, 255);

    /// Create a colour from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Whether the colour contributes nothing when blended.
    pub const fn is_transparent(self) -> bool {
        self.a == 0
    }

    /// Same colour with its alpha scaled by `factor / 255`.
    pub fn with_alpha_factor(self, factor: u8) -> Self {
        let a = (u16::from(self.a) * u16::from(factor) + 127) / 255;
        Self { a: a as u8, ..self }
    }

    /// Source-over blend of `src` onto `self`.
    pub fn blend(self, src: Self) -> Self {
        if src.a == 255 {
            return src;
        }
        if src.a == 0 {
            return self;
        }

        let sa = f32::from(src.a) / 255.0;
        let da = f32::from(self.a) / 255.0;
        let out_a = sa + da * (1.0 - sa);
        if out_a <= 0.0 {
            return Self::TRANSPARENT;
        }

        let channel = |s: u8, d: u8| {
            let c = (f32::from(s) * sa + f32::from(d) * da * (1.0 - sa)) / out_a;
            c.round().clamp(0.0, 255.0) as u8
        };

        Self {
            r: channel(src.r, self.r),
            g: channel(src.g, self.g),
            b: channel(src.b, self.b),
            a: (out_a * 255.0).round() as u8,
        }
    }
}

/// A decoded image: `width * height` pixels in row-major order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl ImageBuffer {
    /// Build an image from raw RGBA8 bytes.
    ///
    /// Fails with [`SnowfallError::UnsupportedImage`] when a dimension is zero
    /// or the byte count does not match `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, bytes: &[u8]) -> Result<Self, SnowfallError> {
        if width == 0 || height == 0 {
            return Err(SnowfallError::UnsupportedImage(format!(
                "image has zero dimension ({width}x{height})"
            )));
        }

        let expected = width as usize * height as usize * 4;
        if bytes.len() != expected {
            return Err(SnowfallError::UnsupportedImage(format!(
                "expected {expected} bytes for a {width}x{height} RGBA image, got {}",
                bytes.len()
            )));
        }

        let pixels = bytes
            .chunks_exact(4)
            .map(|p| Rgba::new(p[0], p[1], p[2], p[3]))
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build an image from an ASCII mask: `#` is an opaque `color` pixel,
    /// anything else is transparent. Short rows are padded with transparency.
    pub fn from_mask(rows: &[&str], color: Rgba) -> Result<Self, SnowfallError> {
        let height = rows.len();
        let width = rows.iter().map(|r| r.chars().count()).max().unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(SnowfallError::UnsupportedImage("empty image mask".to_string()));
        }

        let mut pixels = Vec::with_capacity(width * height);
        for row in rows {
            let mut len = 0;
            for ch in row.chars() {
                pixels.push(if ch == '#' { color } else { Rgba::TRANSPARENT });
                len += 1;
            }
            pixels.extend(std::iter::repeat_n(Rgba::TRANSPARENT, width - len));
        }

        Ok(Self {
            width: width as u32,
            height: height as u32,
            pixels,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels
            .get(y as usize * self.width as usize + x as usize)
            .copied()
    }

    /// Nearest-neighbour sample at normalized coordinates in `[0, 1)`.
    pub fn sample(&self, u: f32, v: f32) -> Rgba {
        let x = ((u * self.width as f32) as u32).min(self.width - 1);
        let y = ((v * self.height as f32) as u32).min(self.height - 1);
        self.pixel(x, y).unwrap_or(Rgba::TRANSPARENT)
    }
}
