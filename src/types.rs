use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A 2D point in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A single detector landmark.
///
/// `x` and `y` are normalized to [0,1] relative to the frame width and height.
/// `z` is the detector's relative depth and is only read by pose estimation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Landmark {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Scale the normalized position into pixel space of a `width`x`height` frame.
    pub fn to_pixel(&self, width: u32, height: u32) -> Point {
        Point::new(self.x * f64::from(width), self.y * f64::from(height))
    }
}

/// An ordered landmark set as produced by the detector for one frame.
/// Index `i` always refers to the same anatomical point.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet {
    pub points: Vec<Landmark>,
}

impl LandmarkSet {
    pub fn new(points: Vec<Landmark>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Landmark> {
        self.points.get(index)
    }

    /// Look up a landmark, reporting a malformed set instead of panicking.
    pub fn landmark(&self, index: usize) -> Result<&Landmark> {
        self.points.get(index).ok_or(Error::MissingLandmark {
            index,
            len: self.points.len(),
        })
    }

    /// Fail unless the set holds at least `expected` points.
    pub fn require(&self, expected: usize) -> Result<()> {
        if self.points.len() < expected {
            return Err(Error::InvalidLandmarks {
                expected,
                got: self.points.len(),
            });
        }
        Ok(())
    }

    /// Map a list of landmark indices to pixel-space points.
    pub fn pixel_polygon(&self, indices: &[usize], width: u32, height: u32) -> Result<Vec<Point>> {
        indices
            .iter()
            .map(|&i| self.landmark(i).map(|l| l.to_pixel(width, height)))
            .collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Landmark> {
        self.points.iter()
    }
}

impl From<Vec<Landmark>> for LandmarkSet {
    fn from(points: Vec<Landmark>) -> Self {
        Self { points }
    }
}

impl std::ops::Index<usize> for LandmarkSet {
    type Output = Landmark;

    fn index(&self, idx: usize) -> &Self::Output {
        &self.points[idx]
    }
}

/// Axis-aligned face box in pixel units.
///
/// `area_ratio` is the box area as a percentage of the frame area.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub area_ratio: f64,
}

impl BoundingBox {
    /// Snap the box outward to whole pixels, clipped to the frame.
    pub fn to_pixel_rect(&self, frame_width: u32, frame_height: u32) -> PixelRect {
        let fw = f64::from(frame_width);
        let fh = f64::from(frame_height);
        let x0 = self.x.floor().clamp(0.0, fw);
        let y0 = self.y.floor().clamp(0.0, fh);
        let x1 = (self.x + self.width).ceil().clamp(x0, fw);
        let y1 = (self.y + self.height).ceil().clamp(y0, fh);
        PixelRect {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        }
    }
}

/// Integer pixel rectangle, half-open on the right and bottom edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for (u8, u8, u8) {
    fn from(c: Rgb) -> Self {
        (c.r, c.g, c.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}
