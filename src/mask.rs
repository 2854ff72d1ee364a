//! Face cut-out: everything outside the face outline blacked out, cropped
//! to the face box.

use crate::error::{Error, Result};
use crate::geometry::bounding_box;
use crate::pixels::{PixelBuffer, RegionMask};
use crate::raster::rasterize_into;
use crate::types::LandmarkSet;
use crate::zones::FACE_CONTOUR;

/// Produce a new buffer holding only the face.
///
/// RGB channels of pixels outside the face contour are zeroed, alpha is
/// kept, and the result is cropped to the unpadded landmark bounding box.
/// The input buffer is never modified.
///
/// # Errors
///
/// Returns [`Error::InvalidLandmarks`] if the landmark set lacks any contour index.
pub fn masked_face(buffer: &PixelBuffer, landmarks: &LandmarkSet) -> Result<PixelBuffer> {
    let mut scratch = RegionMask::default();
    masked_face_with(buffer, landmarks, &mut scratch)
}

/// [`masked_face`] rasterizing into a caller-owned mask.
pub fn masked_face_with(
    buffer: &PixelBuffer,
    landmarks: &LandmarkSet,
    scratch: &mut RegionMask,
) -> Result<PixelBuffer> {
    let (width, height) = (buffer.width(), buffer.height());
    let contour = landmarks
        .pixel_polygon(&FACE_CONTOUR, width, height)
        .map_err(|_| contour_shortfall(landmarks))?;
    rasterize_into(scratch, &contour, width, height);
    Ok(cut_out(buffer, scratch, landmarks))
}

/// A set too short to hold every face outline index.
fn contour_shortfall(landmarks: &LandmarkSet) -> Error {
    let needed = FACE_CONTOUR.iter().max().map_or(0, |&i| i + 1);
    log::warn!("face outline needs {} landmarks, set has {}", needed, landmarks.len());
    Error::InvalidLandmarks {
        expected: needed,
        got: landmarks.len(),
    }
}

/// Crop `buffer` to the landmark box, blacking out pixels not in `face_mask`.
pub(crate) fn cut_out(buffer: &PixelBuffer, face_mask: &RegionMask, landmarks: &LandmarkSet) -> PixelBuffer {
    let (width, height) = (buffer.width(), buffer.height());
    let rect = bounding_box(landmarks, width, height, 0.0).to_pixel_rect(width, height);
    let mut face = buffer.crop(rect);

    for y in 0..face.height() {
        for x in 0..face.width() {
            if !face_mask.is_set(rect.x + x, rect.y + y) {
                if let Some([_, _, _, a]) = face.pixel(x, y) {
                    face.set_pixel(x, y, [0, 0, 0, a]);
                }
            }
        }
    }

    log::debug!("masked face crop {}x{} at ({}, {})", face.width(), face.height(), rect.x, rect.y);
    face
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Landmark;
    use crate::zones::LANDMARK_COUNT;

    /// Face contour laid out as a circle of radius 0.3 around the frame center.
    fn circular_face() -> LandmarkSet {
        let mut points = vec![Landmark::new(0.5, 0.5, 0.0); LANDMARK_COUNT];
        let n = FACE_CONTOUR.len() as f64;
        for (k, &idx) in FACE_CONTOUR.iter().enumerate() {
            let t = k as f64 / n * std::f64::consts::TAU;
            points[idx] = Landmark::new(0.5 + 0.3 * t.sin(), 0.5 - 0.3 * t.cos(), 0.0);
        }
        LandmarkSet::new(points)
    }

    #[test]
    fn crops_to_face_and_blacks_out_corners() {
        let buf = PixelBuffer::filled(100, 100, [200, 150, 100, 255]);
        let face = masked_face(&buf, &circular_face()).unwrap();

        assert!((59..=61).contains(&face.width()));
        assert!((59..=61).contains(&face.height()));
        // corner of the box lies outside the circle
        assert_eq!(face.pixel(0, 0), Some([0, 0, 0, 255]));
        let (cx, cy) = (face.width() / 2, face.height() / 2);
        assert_eq!(face.pixel(cx, cy), Some([200, 150, 100, 255]));
        // input untouched
        assert_eq!(buf.pixel(0, 0), Some([200, 150, 100, 255]));
    }

    #[test]
    fn alpha_is_preserved_outside_face() {
        let buf = PixelBuffer::filled(50, 50, [10, 20, 30, 77]);
        let face = masked_face(&buf, &circular_face()).unwrap();
        assert_eq!(face.pixel(0, 0), Some([0, 0, 0, 77]));
    }

    #[test]
    fn missing_contour_landmarks_fail() {
        let buf = PixelBuffer::filled(10, 10, [1, 1, 1, 255]);
        let set = LandmarkSet::new(vec![Landmark::new(0.5, 0.5, 0.0); 100]);
        assert!(matches!(
            masked_face(&buf, &set),
            Err(Error::InvalidLandmarks { expected: 455, got: 100 })
        ));
    }
}
