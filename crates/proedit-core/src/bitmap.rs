//! CPU bitmaps produced by texture generators (text, stickers, effects).
//!
//! Always packed RGBA8 with a row stride aligned to 64 bytes so the drawing
//! surface can upload rows without repacking.

use std::sync::Arc;

/// A packed RGBA8 bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    /// Bytes per row (may include padding).
    pub stride: usize,
    pub data: Vec<u8>,
}

impl Bitmap {
    /// Create a transparent bitmap.
    pub fn new(width: u32, height: u32) -> Self {
        let min_stride = width as usize * 4;
        let stride = (min_stride + 63) & !63;
        Self {
            width,
            height,
            stride,
            data: vec![0u8; stride * height as usize],
        }
    }

    /// Create a bitmap filled with one color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let mut bitmap = Self::new(width, height);
        for y in 0..height {
            for px in bitmap.row_mut(y).chunks_exact_mut(4) {
                px.copy_from_slice(&rgba);
            }
        }
        bitmap
    }

    /// Visible pixels of a row (padding excluded).
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride;
        &self.data[start..start + self.width as usize * 4]
    }

    #[inline]
    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let start = y as usize * self.stride;
        let end = start + self.width as usize * 4;
        &mut self.data[start..end]
    }

    /// RGBA of a single pixel, if in bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = x as usize * 4;
        let row = self.row(y);
        Some([row[i], row[i + 1], row[i + 2], row[i + 3]])
    }

    /// Total memory usage in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len()
    }
}

/// Shared ownership handle, the form in which cached bitmaps are handed out.
pub type SharedBitmap = Arc<Bitmap>;
