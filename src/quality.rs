//! Frame quality gate and the throttle for expensive downstream work.

use std::fmt;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::geometry::FaceAngles;
use crate::light::LuminanceMetrics;
use crate::types::BoundingBox;

/// Acceptance thresholds for a single frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityThresholds {
    /// Yaw, pitch and roll must each stay strictly below this (degrees)
    pub max_angle_deg: f64,
    /// Minimum face box area as a percentage of the frame
    pub min_area_ratio: f64,
    /// Exposure value the face should sit at relative to the background
    pub target_exposure: f64,
    /// Allowed distance from `target_exposure`
    pub exposure_tolerance: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            max_angle_deg: 10.0,
            min_area_ratio: 19.0,
            target_exposure: 1.0,
            exposure_tolerance: 0.2,
        }
    }
}

/// Corrective hint for one failed check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityHint {
    FaceTooSmall,
    PoorLight,
    NotFrontal,
}

impl QualityHint {
    pub fn message(&self) -> &'static str {
        match self {
            QualityHint::FaceTooSmall => "face not centered/too small",
            QualityHint::PoorLight => "poor light",
            QualityHint::NotFrontal => "face not frontal",
        }
    }
}

impl fmt::Display for QualityHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Outcome of the gate for one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityVerdict {
    pub is_good_angle: bool,
    pub is_good_ratio: bool,
    pub is_good_light_exposure: bool,
    pub overall_good: bool,
    /// One entry per failed check, in the order ratio, light, angle.
    pub hints: Vec<QualityHint>,
}

/// Stateless per-frame gate.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityGate {
    thresholds: QualityThresholds,
}

impl QualityGate {
    pub fn new(thresholds: QualityThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &QualityThresholds {
        &self.thresholds
    }

    /// Run every check independently and collect the hints of all that fail.
    ///
    /// Undetermined angles (`None`) fail the angle check.
    pub fn evaluate(
        &self,
        bbox: &BoundingBox,
        angles: Option<&FaceAngles>,
        light: &LuminanceMetrics,
    ) -> QualityVerdict {
        let t = &self.thresholds;

        let is_good_ratio = bbox.area_ratio >= t.min_area_ratio;
        let is_good_light_exposure = (light.exposure_value - t.target_exposure).abs() <= t.exposure_tolerance;
        let is_good_angle = angles.is_some_and(|a| a.max_abs() < t.max_angle_deg);

        let mut hints = Vec::new();
        if !is_good_ratio {
            hints.push(QualityHint::FaceTooSmall);
        }
        if !is_good_light_exposure {
            hints.push(QualityHint::PoorLight);
        }
        if !is_good_angle {
            hints.push(QualityHint::NotFrontal);
        }

        let overall_good = hints.is_empty();
        log::debug!(
            "quality verdict: ratio {:.1}% ev {:.2} angles {:?} -> {}",
            bbox.area_ratio,
            light.exposure_value,
            angles,
            if overall_good { "good" } else { "rejected" }
        );

        QualityVerdict {
            is_good_angle,
            is_good_ratio,
            is_good_light_exposure,
            overall_good,
            hints,
        }
    }
}

/// Minimum spacing between downstream triggers, owned by the driver loop.
#[derive(Debug, Clone)]
pub struct TriggerThrottle {
    interval: Duration,
    last_trigger: Option<Instant>,
}

impl TriggerThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_trigger: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn last_trigger(&self) -> Option<Instant> {
        self.last_trigger
    }

    /// Decide whether this frame fires the expensive path, recording `now`
    /// when it does. Only good frames can trigger.
    pub fn should_trigger(&mut self, verdict: &QualityVerdict, now: Instant) -> bool {
        if !verdict.overall_good {
            return false;
        }
        if let Some(last) = self.last_trigger {
            if now.saturating_duration_since(last) < self.interval {
                return false;
            }
        }
        self.last_trigger = Some(now);
        log::debug!("trigger fired");
        true
    }

    /// Forget the last trigger so the next good frame fires immediately.
    pub fn reset(&mut self) {
        self.last_trigger = None;
    }
}
