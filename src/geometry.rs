//! Face bounding box and head pose angles from fixed landmark pairs.
//!
//! Pose is read directly off anatomical landmark vectors rather than solved
//! against a 3D model, so it needs no camera intrinsics. It is a coarse
//! "facing the camera" signal, not a 6-DoF pose.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{BoundingBox, Landmark, LandmarkSet};
use crate::zones::{CHIN_BOTTOM, FACE_LEFT, FACE_RIGHT, FOREHEAD_TOP, LANDMARK_COUNT, ROLL_LEFT, ROLL_RIGHT};

/// Head rotation in degrees, each in (-180, 180] and rounded to 0.1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceAngles {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl FaceAngles {
    /// Largest absolute angle of the three.
    pub fn max_abs(&self) -> f64 {
        self.yaw.abs().max(self.pitch.abs()).max(self.roll.abs())
    }
}

/// Minimal box around every landmark in pixel space, grown by `padding` on
/// each side and clipped to the frame.
///
/// An empty landmark set or an empty frame yields an all-zero box.
pub fn bounding_box(landmarks: &LandmarkSet, frame_width: u32, frame_height: u32, padding: f64) -> BoundingBox {
    if landmarks.is_empty() {
        return BoundingBox::default();
    }

    let fw = f64::from(frame_width);
    let fh = f64::from(frame_height);

    let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
    let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
    for l in landmarks.iter() {
        let p = l.to_pixel(frame_width, frame_height);
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }
    if !(min_x.is_finite() && min_y.is_finite() && max_x.is_finite() && max_y.is_finite()) {
        log::warn!("landmark set contains non-finite coordinates");
        return BoundingBox::default();
    }

    let x0 = (min_x - padding).clamp(0.0, fw);
    let y0 = (min_y - padding).clamp(0.0, fh);
    let x1 = (max_x + padding).clamp(x0, fw);
    let y1 = (max_y + padding).clamp(y0, fh);

    let width = x1 - x0;
    let height = y1 - y0;
    let frame_area = fw * fh;
    let area_ratio = if frame_area > 0.0 {
        100.0 * (width * height) / frame_area
    } else {
        0.0
    };

    BoundingBox {
        x: x0,
        y: y0,
        width,
        height,
        area_ratio,
    }
}

/// Estimate yaw, pitch and roll.
///
/// # Errors
///
/// Returns [`Error::InvalidLandmarks`] when the set has fewer than
/// [`LANDMARK_COUNT`] points or the geometry produces non-finite angles.
pub fn estimate_angles(landmarks: &LandmarkSet) -> Result<FaceAngles> {
    landmarks.require(LANDMARK_COUNT)?;

    let top = &landmarks[FOREHEAD_TOP];
    let bottom = &landmarks[CHIN_BOTTOM];
    let left = &landmarks[FACE_LEFT];
    let right = &landmarks[FACE_RIGHT];

    let roll = finish(roll_degrees(&landmarks[ROLL_LEFT], &landmarks[ROLL_RIGHT]));
    let pitch = finish(pitch_degrees(top, bottom));
    let yaw = finish(yaw_degrees(left, right, top, bottom));

    match (yaw, pitch, roll) {
        (Some(yaw), Some(pitch), Some(roll)) => Ok(FaceAngles { yaw, pitch, roll }),
        _ => Err(Error::InvalidLandmarks {
            expected: LANDMARK_COUNT,
            got: landmarks.len(),
        }),
    }
}

/// Like [`estimate_angles`], with `None` standing for "undetermined".
pub fn angles(landmarks: &LandmarkSet) -> Option<FaceAngles> {
    match estimate_angles(landmarks) {
        Ok(a) => Some(a),
        Err(e) => {
            log::debug!("face angles undetermined: {e}");
            None
        }
    }
}

/// Tilt of the forehead line, counter-clockwise positive.
fn roll_degrees(left: &Landmark, right: &Landmark) -> f64 {
    let dx = right.x - left.x;
    let dy = right.y - left.y;
    -dy.atan2(dx).to_degrees()
}

/// Direction of the forehead-to-chin vector; straight down reads as zero.
fn pitch_degrees(top: &Landmark, bottom: &Landmark) -> f64 {
    let dx = bottom.x - top.x;
    let dy = bottom.y - top.y;
    dy.atan2(dx).to_degrees() - 90.0
}

/// Heading of the face plane normal, spanned by the horizontal and vertical
/// landmark vectors.
fn yaw_degrees(left: &Landmark, right: &Landmark, top: &Landmark, bottom: &Landmark) -> f64 {
    let h = [right.x - left.x, right.y - left.y, right.z - left.z];
    let v = [bottom.x - top.x, bottom.y - top.y, bottom.z - top.z];

    let normal_x = h[1] * v[2] - h[2] * v[1];
    let normal_z = h[0] * v[1] - h[1] * v[0];

    normal_x.atan2(normal_z).to_degrees()
}

/// Wrap an angle in degrees into (-180, 180].
pub fn normalize_angle(degrees: f64) -> f64 {
    if !degrees.is_finite() {
        return degrees;
    }
    let mut a = degrees % 360.0;
    if a > 180.0 {
        a -= 360.0;
    } else if a <= -180.0 {
        a += 360.0;
    }
    a
}

/// Round to one decimal with halves going up, then wrap, so rounding can
/// never leave the range. Negative zero comes out as zero.
fn finish(degrees: f64) -> Option<f64> {
    if !degrees.is_finite() {
        return None;
    }
    let rounded = (degrees * 10.0 + 0.5).floor() / 10.0;
    Some(normalize_angle(rounded) + 0.0)
}
