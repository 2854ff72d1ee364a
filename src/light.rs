//! Face versus background luminance and exposure.
//!
//! Luminance uses BT.709 weights on channels normalized to [0,1]:
//! Y = 0.2126 R + 0.7152 G + 0.0722 B.

use serde::{Deserialize, Serialize};

use crate::pixels::{PixelBuffer, RegionMask};
use crate::types::{BoundingBox, PixelRect};

/// Offset inside the logarithm of the log-average luminance.
pub const LOG_LUMINANCE_EPSILON: f64 = 1e-4;

/// Lighting statistics for one frame. Every field is finite; empty regions
/// contribute zeros.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LuminanceMetrics {
    pub foreground_luminance: f64,
    pub background_luminance: f64,
    pub foreground_log_luminance: f64,
    pub background_log_luminance: f64,
    pub weber_contrast: f64,
    pub foreground_rms_contrast: f64,
    pub background_rms_contrast: f64,
    pub exposure_value: f64,
}

/// Relative luminance of one RGBA sample.
pub fn luminance(rgba: [u8; 4]) -> f64 {
    let r = f64::from(rgba[0]) / 255.0;
    let g = f64::from(rgba[1]) / 255.0;
    let b = f64::from(rgba[2]) / 255.0;
    0.2126 * r + 0.7152 * g + 0.0722 * b
}

/// Per-region luminance summary.
#[derive(Debug, Default)]
struct RegionStats {
    count: usize,
    mean: f64,
    log_mean: f64,
    rms_contrast: f64,
}

impl RegionStats {
    /// Two passes over the mask: means first, then deviations from the mean.
    fn collect(buffer: &PixelBuffer, mask: &RegionMask) -> Self {
        let samples = || {
            let mask_width = mask.width() as usize;
            mask.selected().filter_map(move |idx| {
                let x = (idx % mask_width) as u32;
                let y = (idx / mask_width) as u32;
                buffer.pixel(x, y).map(luminance)
            })
        };

        let (mut count, mut sum, mut log_sum) = (0usize, 0.0, 0.0);
        for lum in samples() {
            count += 1;
            sum += lum;
            log_sum += (LOG_LUMINANCE_EPSILON + lum).ln();
        }
        if count == 0 {
            return Self::default();
        }

        let n = count as f64;
        let mean = sum / n;
        let variance = samples().map(|lum| (lum - mean).powi(2)).sum::<f64>() / n;

        Self {
            count,
            mean,
            log_mean: (log_sum / n).exp(),
            rms_contrast: variance.sqrt(),
        }
    }
}

/// (fg - bg) / bg, zero when the background is black or empty.
pub fn weber_contrast(foreground: f64, background: f64) -> f64 {
    if background == 0.0 {
        return 0.0;
    }
    (foreground - background) / background
}

/// log2(fg / bg), zero when either side is black or empty.
pub fn exposure_value(foreground: f64, background: f64) -> f64 {
    if background == 0.0 || foreground == 0.0 {
        return 0.0;
    }
    (foreground / background).log2()
}

/// Compare face and background lighting.
pub fn light_metrics(buffer: &PixelBuffer, face_mask: &RegionMask, background_mask: &RegionMask) -> LuminanceMetrics {
    let fg = RegionStats::collect(buffer, face_mask);
    let bg = RegionStats::collect(buffer, background_mask);

    log::trace!("luminance samples: face {}, background {}", fg.count, bg.count);
    let foreground_luminance = fg.mean;
    let background_luminance = bg.mean;

    LuminanceMetrics {
        foreground_luminance,
        background_luminance,
        foreground_log_luminance: fg.log_mean,
        background_log_luminance: bg.log_mean,
        weber_contrast: weber_contrast(foreground_luminance, background_luminance),
        foreground_rms_contrast: fg.rms_contrast,
        background_rms_contrast: bg.rms_contrast,
        exposure_value: exposure_value(foreground_luminance, background_luminance),
    }
}

/// Face box grown by `margin` pixels on each side, clipped to the frame.
/// May be empty when the frame itself is.
pub fn background_rect(face: &BoundingBox, frame_width: u32, frame_height: u32, margin: f64) -> PixelRect {
    let grown = BoundingBox {
        x: face.x - margin,
        y: face.y - margin,
        width: face.width + 2.0 * margin,
        height: face.height + 2.0 * margin,
        area_ratio: 0.0,
    };
    grown.to_pixel_rect(frame_width, frame_height)
}

/// Fill `out` with the background ring: the inflated rectangle minus the face.
pub fn background_mask_into(
    out: &mut RegionMask,
    face: &BoundingBox,
    face_mask: &RegionMask,
    frame_width: u32,
    frame_height: u32,
    margin: f64,
) {
    out.reset(frame_width, frame_height);
    let rect = background_rect(face, frame_width, frame_height, margin);
    if rect.is_empty() {
        log::debug!("background rectangle collapsed to nothing");
        return;
    }
    out.fill_rect(rect);
    out.subtract(face_mask);
}
