//! Per-frame analysis: one call per incoming frame from the driver loop.

use std::time::Instant;

use serde::Serialize;

use crate::color::{top_colors, zone_colors_with, ColorCount, ZoneColor};
use crate::config::Config;
use crate::error::Result;
use crate::geometry::{angles, bounding_box, FaceAngles};
use crate::light::{background_mask_into, light_metrics, LuminanceMetrics};
use crate::mask::cut_out;
use crate::pixels::{PixelBuffer, RegionMask};
use crate::quality::{QualityGate, QualityVerdict, TriggerThrottle};
use crate::raster::rasterize_into;
use crate::types::{BoundingBox, LandmarkSet};
use crate::zones::{ZoneTable, FACE_CONTOUR, LANDMARK_COUNT};

/// Masks reused from frame to frame so the hot loop does not reallocate.
#[derive(Debug, Default)]
pub struct FrameArena {
    zone: RegionMask,
    face: RegionMask,
    background: RegionMask,
}

impl FrameArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Face outline mask of the most recent frame.
    pub fn face_mask(&self) -> &RegionMask {
        &self.face
    }

    /// Background ring mask of the most recent frame.
    pub fn background_mask(&self) -> &RegionMask {
        &self.background
    }
}

/// Everything computed for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameReport {
    pub bounding_box: BoundingBox,
    /// `None` when the pose could not be determined.
    pub angles: Option<FaceAngles>,
    pub zone_colors: Vec<ZoneColor>,
    /// Most frequent colors inside the face outline.
    pub face_colors: Vec<ColorCount>,
    pub light: LuminanceMetrics,
    pub verdict: QualityVerdict,
    pub triggered: bool,
    /// Present only on frames where the throttle fired.
    #[serde(skip)]
    pub masked_face: Option<PixelBuffer>,
}

/// Runs the geometry, color, light and quality stages over a frame.
#[derive(Debug)]
pub struct FrameAnalyzer {
    config: Config,
    zones: ZoneTable,
    gate: QualityGate,
    arena: FrameArena,
}

impl FrameAnalyzer {
    /// Analyzer over the built-in zone table.
    pub fn new(config: Config) -> Self {
        Self::with_zones(config, ZoneTable::standard().clone())
    }

    pub fn with_zones(config: Config, zones: ZoneTable) -> Self {
        let gate = QualityGate::new(config.quality);
        Self {
            config,
            zones,
            gate,
            arena: FrameArena::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn zones(&self) -> &ZoneTable {
        &self.zones
    }

    pub fn arena(&self) -> &FrameArena {
        &self.arena
    }

    /// A throttle configured from this analyzer's trigger settings.
    pub fn throttle(&self) -> TriggerThrottle {
        TriggerThrottle::new(self.config.trigger.interval())
    }

    /// Analyze one frame.
    ///
    /// The masked face crop is produced only when the frame passes the gate
    /// and `throttle` allows a trigger at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidLandmarks`] for sets smaller than the
    /// face mesh, or [`crate::Error::MissingLandmark`] when a zone refers
    /// past the end of the set.
    pub fn analyze(
        &mut self,
        buffer: &PixelBuffer,
        landmarks: &LandmarkSet,
        throttle: &mut TriggerThrottle,
        now: Instant,
    ) -> Result<FrameReport> {
        if let Err(e) = landmarks.require(LANDMARK_COUNT) {
            log::warn!("skipping frame: {e}");
            return Err(e);
        }

        let (width, height) = (buffer.width(), buffer.height());
        let geometry = &self.config.geometry;

        let bbox = bounding_box(landmarks, width, height, geometry.bbox_padding);
        let angles = angles(landmarks);
        let zone_colors = zone_colors_with(buffer, landmarks, &self.zones, &mut self.arena.zone)?;

        let contour = landmarks.pixel_polygon(&FACE_CONTOUR, width, height)?;
        rasterize_into(&mut self.arena.face, &contour, width, height);
        let face_colors = top_colors(buffer, &self.arena.face, self.config.colors.top_colors);

        background_mask_into(
            &mut self.arena.background,
            &bbox,
            &self.arena.face,
            width,
            height,
            geometry.background_margin,
        );
        let light = light_metrics(buffer, &self.arena.face, &self.arena.background);

        let verdict = self.gate.evaluate(&bbox, angles.as_ref(), &light);
        let triggered = throttle.should_trigger(&verdict, now);
        let masked_face = triggered.then(|| cut_out(buffer, &self.arena.face, landmarks));

        Ok(FrameReport {
            bounding_box: bbox,
            angles,
            zone_colors,
            face_colors,
            light,
            verdict,
            triggered,
            masked_face,
        })
    }
}
