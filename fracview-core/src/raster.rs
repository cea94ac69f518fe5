/// A computed image: packed `0xRRGGBB` pixels, row-major.
///
/// Rasters are built column by column by the renderer and become read-only
/// once published through an `Arc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u32>,
}

impl Raster {
    /// Create a raster filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> u32 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }

    /// Write one column, top row first.
    pub fn set_column(&mut self, x: u32, column: &[u32]) {
        debug_assert_eq!(column.len(), self.height as usize);
        let stride = self.width as usize;
        for (y, &rgb) in column.iter().enumerate() {
            self.pixels[y * stride + x as usize] = rgb;
        }
    }

    /// Heap footprint of the pixel data, used for cache accounting.
    pub fn byte_len(&self) -> usize {
        self.pixels.len() * std::mem::size_of::<u32>()
    }

    /// Expand to 8-bit RGB triplets for image encoders.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixels.len() * 3);
        for &rgb in &self.pixels {
            out.extend_from_slice(&[(rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8]);
        }
        out
    }
}
