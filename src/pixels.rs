//! RGBA frame buffers and boolean region masks.

use image::RgbaImage;

use crate::error::{Error, Result};
use crate::types::PixelRect;

/// A row-major RGBA8 frame buffer with its origin at the top-left corner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    data: Vec<u8>,
    width: u32,
    height: u32,
}

impl PixelBuffer {
    /// Wrap raw RGBA samples. `data` must hold exactly `width * height * 4` bytes.
    pub fn new(data: Vec<u8>, width: u32, height: u32) -> Result<Self> {
        if data.len() != sample_count(width, height) * 4 {
            return Err(Error::BufferSize {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// A buffer with every pixel set to `rgba`.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take(sample_count(width, height) * 4)
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    pub fn from_fn<F>(width: u32, height: u32, f: F) -> Self
    where
        F: Fn(u32, u32) -> [u8; 4],
    {
        let mut data = Vec::with_capacity(sample_count(width, height) * 4);
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&f(x, y));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }

    /// RGBA sample at (x, y), or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.sample(self.index(x, y)))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x >= self.width || y >= self.height {
            return;
        }
        let base = self.index(x, y) * 4;
        self.data[base..base + 4].copy_from_slice(&rgba);
    }

    /// RGBA sample by linear pixel index. Callers guarantee the index is in range.
    #[inline]
    pub(crate) fn sample(&self, idx: usize) -> [u8; 4] {
        let base = idx * 4;
        [
            self.data[base],
            self.data[base + 1],
            self.data[base + 2],
            self.data[base + 3],
        ]
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Copy out the pixels inside `rect`, clipped to the buffer.
    pub fn crop(&self, rect: PixelRect) -> PixelBuffer {
        let x0 = rect.x.min(self.width);
        let y0 = rect.y.min(self.height);
        let x1 = rect.right().min(self.width);
        let y1 = rect.bottom().min(self.height);
        let (w, h) = (x1 - x0, y1 - y0);

        let mut data = Vec::with_capacity(sample_count(w, h) * 4);
        for y in y0..y1 {
            let start = self.index(x0, y) * 4;
            let end = start + w as usize * 4;
            data.extend_from_slice(&self.data[start..end]);
        }
        PixelBuffer {
            data,
            width: w,
            height: h,
        }
    }

    /// Convert into an `image` crate buffer, e.g. for saving to disk.
    pub fn into_rgba_image(self) -> Result<RgbaImage> {
        let (width, height) = (self.width, self.height);
        let len = self.data.len();
        RgbaImage::from_raw(width, height, self.data).ok_or(Error::BufferSize { width, height, len })
    }
}

impl From<RgbaImage> for PixelBuffer {
    fn from(img: RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            data: img.into_raw(),
            width,
            height,
        }
    }
}

/// A boolean inclusion grid aligned to a [`PixelBuffer`].
///
/// Tracks a bounding rectangle of its set pixels so scans only visit the
/// area that can contain `true` entries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionMask {
    bits: Vec<bool>,
    width: u32,
    height: u32,
    bounds: PixelRect,
}

impl RegionMask {
    /// An all-false mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            bits: vec![false; sample_count(width, height)],
            width,
            height,
            bounds: PixelRect::default(),
        }
    }

    /// Clear the mask and resize it, reusing the existing allocation.
    pub fn reset(&mut self, width: u32, height: u32) {
        self.bits.clear();
        self.bits.resize(sample_count(width, height), false);
        self.width = width;
        self.height = height;
        self.bounds = PixelRect::default();
    }

    /// Mask selecting every pixel of `rect`, clipped to the grid.
    pub fn from_rect(width: u32, height: u32, rect: PixelRect) -> Self {
        let mut mask = Self::new(width, height);
        mask.fill_rect(rect);
        mask
    }

    /// Mask selecting the pixels of an external label map equal to `category`,
    /// e.g. the hair class of a segmentation model.
    pub fn from_category(labels: &[u8], width: u32, height: u32, category: u8) -> Result<Self> {
        if labels.len() != sample_count(width, height) {
            return Err(Error::BufferSize {
                width,
                height,
                len: labels.len(),
            });
        }
        let mut mask = Self::new(width, height);
        for (idx, &label) in labels.iter().enumerate() {
            if label == category {
                let x = (idx % width as usize) as u32;
                let y = (idx / width as usize) as u32;
                mask.set(x, y);
            }
        }
        Ok(mask)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Rectangle enclosing every set pixel; empty when nothing is set.
    pub fn bounds(&self) -> PixelRect {
        self.bounds
    }

    pub fn is_set(&self, x: u32, y: u32) -> bool {
        x < self.width && y < self.height && self.bits[y as usize * self.width as usize + x as usize]
    }

    pub fn set(&mut self, x: u32, y: u32) {
        if x >= self.width || y >= self.height {
            return;
        }
        self.bits[y as usize * self.width as usize + x as usize] = true;
        self.bounds = if self.bounds.is_empty() {
            PixelRect::new(x, y, 1, 1)
        } else {
            let x0 = self.bounds.x.min(x);
            let y0 = self.bounds.y.min(y);
            let x1 = self.bounds.right().max(x + 1);
            let y1 = self.bounds.bottom().max(y + 1);
            PixelRect::new(x0, y0, x1 - x0, y1 - y0)
        };
    }

    pub fn fill_rect(&mut self, rect: PixelRect) {
        let x1 = rect.right().min(self.width);
        let y1 = rect.bottom().min(self.height);
        for y in rect.y..y1 {
            for x in rect.x..x1 {
                self.set(x, y);
            }
        }
    }

    /// Clear every pixel that is set in `other`. Bounds are left as an
    /// over-approximation.
    pub fn subtract(&mut self, other: &RegionMask) {
        let b = other.bounds;
        for y in b.y..b.bottom().min(self.height) {
            for x in b.x..b.right().min(self.width) {
                if other.is_set(x, y) {
                    self.bits[y as usize * self.width as usize + x as usize] = false;
                }
            }
        }
    }

    /// Linear indices of set pixels in row-major scan order.
    pub fn selected(&self) -> impl Iterator<Item = usize> + '_ {
        let b = self.bounds;
        let w = self.width as usize;
        (b.y..b.bottom()).flat_map(move |y| {
            let row = y as usize * w;
            (b.x..b.right())
                .map(move |x| row + x as usize)
                .filter(move |&idx| self.bits[idx])
        })
    }

    pub fn count(&self) -> usize {
        self.selected().count()
    }

    pub fn is_empty(&self) -> bool {
        self.selected().next().is_none()
    }
}

fn sample_count(width: u32, height: u32) -> usize {
    width as usize * height as usize
}
