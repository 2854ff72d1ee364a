//! Dominant color extraction by exact-match histogram mode.
//!
//! The representative color of a region is always a value that actually
//! occurs in the frame; nothing is averaged or blended.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::Result;
use crate::pixels::{PixelBuffer, RegionMask};
use crate::raster::rasterize_into;
use crate::types::{LandmarkSet, Rgb};
use crate::zones::{Zone, ZoneTable};

/// A color and how many qualifying pixels carry it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColorCount {
    pub color: Rgb,
    pub count: usize,
}

/// Dominant color of one zone for one frame. `None` means the zone had no
/// visible pixels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneColor {
    pub zone: String,
    pub color: Option<Rgb>,
}

struct Bin {
    count: usize,
    first_seen: usize,
}

/// Count exact (r,g,b) values of masked, non-transparent pixels.
fn histogram(buffer: &PixelBuffer, mask: &RegionMask) -> HashMap<Rgb, Bin> {
    let mut bins: HashMap<Rgb, Bin> = HashMap::new();
    let mask_width = mask.width() as usize;
    let mut seen = 0;

    for idx in mask.selected() {
        let x = (idx % mask_width) as u32;
        let y = (idx / mask_width) as u32;
        let Some([r, g, b, a]) = buffer.pixel(x, y) else {
            continue;
        };
        if a == 0 {
            continue;
        }
        bins.entry(Rgb::new(r, g, b))
            .or_insert(Bin {
                count: 0,
                first_seen: seen,
            })
            .count += 1;
        seen += 1;
    }
    bins
}

/// Most frequent exact color under `mask`, ignoring fully transparent pixels.
///
/// Ties go to the color encountered first in row-major scan order. Returns
/// `None` when no pixel qualifies.
pub fn dominant_color(buffer: &PixelBuffer, mask: &RegionMask) -> Option<Rgb> {
    histogram(buffer, mask)
        .into_iter()
        .max_by(|(_, a), (_, b)| a.count.cmp(&b.count).then(b.first_seen.cmp(&a.first_seen)))
        .map(|(color, _)| color)
}

/// The `n` most frequent colors under `mask`, most frequent first, ties in
/// scan order.
pub fn top_colors(buffer: &PixelBuffer, mask: &RegionMask, n: usize) -> Vec<ColorCount> {
    let mut ranked: Vec<(Rgb, Bin)> = histogram(buffer, mask).into_iter().collect();
    ranked.sort_by(|(_, a), (_, b)| b.count.cmp(&a.count).then(a.first_seen.cmp(&b.first_seen)));
    ranked
        .into_iter()
        .take(n)
        .map(|(color, bin)| ColorCount {
            color,
            count: bin.count,
        })
        .collect()
}

/// Dominant color of a single zone, rasterized into `scratch`.
pub fn zone_color(
    buffer: &PixelBuffer,
    landmarks: &LandmarkSet,
    zone: &Zone,
    scratch: &mut RegionMask,
) -> Result<Option<Rgb>> {
    let (width, height) = (buffer.width(), buffer.height());
    let polygon = landmarks.pixel_polygon(&zone.indices, width, height)?;
    rasterize_into(scratch, &polygon, width, height);
    Ok(dominant_color(buffer, scratch))
}

/// Dominant color of every zone in `table`, in zone-name order.
pub fn zone_colors(buffer: &PixelBuffer, landmarks: &LandmarkSet, table: &ZoneTable) -> Result<Vec<ZoneColor>> {
    let mut scratch = RegionMask::default();
    zone_colors_with(buffer, landmarks, table, &mut scratch)
}

pub(crate) fn zone_colors_with(
    buffer: &PixelBuffer,
    landmarks: &LandmarkSet,
    table: &ZoneTable,
    scratch: &mut RegionMask,
) -> Result<Vec<ZoneColor>> {
    table
        .iter()
        .map(|zone| {
            let color = zone_color(buffer, landmarks, zone, scratch)?;
            if color.is_none() {
                log::debug!("zone {} has no visible color this frame", zone.name);
            }
            Ok(ZoneColor {
                zone: zone.name.clone(),
                color,
            })
        })
        .collect()
}
