//! A 2D drawing surface represented as a flat array of RGBA pixels.

/// An RGBA colour, straight (non-premultiplied) alpha.
pub type Rgba = [u8; 4];

/// A drawing surface stored as row-major RGBA pixels.
///
/// Row 0 is the top of the image.
#[derive(Clone, Debug)]
pub struct RgbaSurface {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Pixel data in row-major RGBA format. Length = `width * height * 4`.
    pub pixels: Vec<u8>,
}

impl RgbaSurface {
    /// Create a fully transparent surface with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Fill every pixel with `color`.
    pub fn clear(&mut self, color: Rgba) {
        for px in self.pixels.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Set a single pixel's RGBA value.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        let idx = self.index(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&color);
    }

    /// Get a pixel's RGBA value.
    ///
    /// # Panics
    ///
    /// Panics if `x >= width` or `y >= height`.
    pub fn get_pixel(&self, x: u32, y: u32) -> Rgba {
        let idx = self.index(x, y);
        [
            self.pixels[idx],
            self.pixels[idx + 1],
            self.pixels[idx + 2],
            self.pixels[idx + 3],
        ]
    }

    /// Composite `color` over the pixel with the given coverage in `[0, 1]`.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba, coverage: f32) {
        let src_a = f32::from(color[3]) / 255.0 * coverage.clamp(0.0, 1.0);
        if src_a <= 0.0 {
            return;
        }
        let dst = self.get_pixel(x, y);
        let dst_a = f32::from(dst[3]) / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);

        let mut out = [0u8; 4];
        for c in 0..3 {
            let s = f32::from(color[c]);
            let d = f32::from(dst[c]);
            let v = (s * src_a + d * dst_a * (1.0 - src_a)) / out_a;
            out[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        self.set_pixel(x, y, out);
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Returns the number of pixels in the surface.
    pub fn pixel_count(&self) -> u32 {
        self.width * self.height
    }

    /// Number of pixels that differ from `background`.
    pub fn painted_pixel_count(&self, background: Rgba) -> usize {
        self.pixels
            .chunks_exact(4)
            .filter(|px| *px != background.as_slice())
            .count()
    }
}
