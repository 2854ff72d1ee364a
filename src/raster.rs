//! Polygon rasterization into region masks.
//!
//! Inclusion uses the even-odd rule evaluated at pixel centers, so a pixel
//! (x, y) is inside when (x + 0.5, y + 0.5) is.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::pixels::RegionMask;
use crate::types::{LandmarkSet, PixelRect, Point};

/// Where a region's outline comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegionSource {
    /// Landmark indices, scaled to pixels through the current frame's set.
    FromLandmarks(Vec<usize>),
    /// Points already normalized to [0,1] frame coordinates.
    FromPoints(Vec<Point>),
}

impl RegionSource {
    /// Resolve to a pixel-space polygon for a `width`x`height` frame.
    pub fn resolve(&self, landmarks: &LandmarkSet, width: u32, height: u32) -> Result<Vec<Point>> {
        match self {
            RegionSource::FromLandmarks(indices) => landmarks.pixel_polygon(indices, width, height),
            RegionSource::FromPoints(points) => Ok(points
                .iter()
                .map(|p| Point::new(p.x * f64::from(width), p.y * f64::from(height)))
                .collect()),
        }
    }
}

/// Calculate the area of a polygon using the shoelace formula.
pub fn polygon_area(points: &[Point]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = points.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += points[i].x * points[j].y;
        area -= points[j].x * points[i].y;
    }

    (area / 2.0).abs()
}

/// Even-odd (ray casting) point-in-polygon test.
pub fn point_in_polygon(x: f64, y: f64, polygon: &[Point]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (pi, pj) = (polygon[i], polygon[j]);
        if (pi.y > y) != (pj.y > y) && x < (pj.x - pi.x) * (y - pi.y) / (pj.y - pi.y) + pi.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// True when the polygon cannot enclose any area: fewer than three distinct
/// vertices, a non-finite vertex, or every vertex on one line.
///
/// Self-intersecting outlines are not degenerate even when their signed
/// lobes cancel.
pub fn is_degenerate(polygon: &[Point]) -> bool {
    if polygon.len() < 3 {
        return true;
    }
    if polygon.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return true;
    }

    let origin = polygon[0];
    let Some(&axis) = polygon.iter().find(|&&p| p != origin) else {
        return true;
    };
    let (ax, ay) = (axis.x - origin.x, axis.y - origin.y);
    !polygon.iter().any(|p| {
        let cross = ax * (p.y - origin.y) - ay * (p.x - origin.x);
        cross != 0.0
    })
}

/// Pixel rectangle that can contain centers inside `polygon`, clipped to the grid.
fn scan_bounds(polygon: &[Point], width: u32, height: u32) -> PixelRect {
    let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
    let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
    for p in polygon {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
        max_x = max_x.max(p.x);
        max_y = max_y.max(p.y);
    }

    let fw = f64::from(width);
    let fh = f64::from(height);
    let x0 = min_x.floor().clamp(0.0, fw);
    let y0 = min_y.floor().clamp(0.0, fh);
    let x1 = max_x.ceil().clamp(x0, fw);
    let y1 = max_y.ceil().clamp(y0, fh);
    PixelRect::new(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32)
}

/// Rasterize a closed polygon into a fresh `width`x`height` mask.
pub fn rasterize(polygon: &[Point], width: u32, height: u32) -> RegionMask {
    let mut mask = RegionMask::new(width, height);
    rasterize_into(&mut mask, polygon, width, height);
    mask
}

/// Rasterize into an existing mask, reusing its allocation.
///
/// Only pixels within the polygon's own bounding box are tested. Degenerate
/// polygons leave the mask all-false.
pub fn rasterize_into(mask: &mut RegionMask, polygon: &[Point], width: u32, height: u32) {
    mask.reset(width, height);
    if is_degenerate(polygon) {
        log::debug!("degenerate polygon with {} vertices selects nothing", polygon.len());
        return;
    }

    let bounds = scan_bounds(polygon, width, height);
    log::trace!("rasterizing {} vertices over {:?}", polygon.len(), bounds);

    for y in bounds.y..bounds.bottom() {
        let cy = f64::from(y) + 0.5;
        for x in bounds.x..bounds.right() {
            if point_in_polygon(f64::from(x) + 0.5, cy, polygon) {
                mask.set(x, y);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Landmark;
    use proptest::prelude::*;

    fn pts(coords: &[(f64, f64)]) -> Vec<Point> {
        coords.iter().map(|&c| Point::from(c)).collect()
    }

    #[test]
    fn test_polygon_area_triangle() {
        let triangle = pts(&[(0.0, 0.0), (4.0, 0.0), (2.0, 3.0)]);
        assert!((polygon_area(&triangle) - 6.0).abs() < 0.01);
    }

    #[test]
    fn test_polygon_area_square() {
        let square = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        assert!((polygon_area(&square) - 100.0).abs() < 0.01);
    }

    #[test]
    fn rectangle_selects_exact_pixels() {
        let rect = pts(&[(2.0, 3.0), (6.0, 3.0), (6.0, 8.0), (2.0, 8.0)]);
        let mask = rasterize(&rect, 10, 10);
        assert_eq!(mask.count(), 20);
        assert!(mask.is_set(2, 3));
        assert!(mask.is_set(5, 7));
        assert!(!mask.is_set(6, 3));
        assert!(!mask.is_set(1, 3));
    }

    #[test]
    fn polygon_outside_buffer_selects_nothing() {
        let rect = pts(&[(20.0, 20.0), (30.0, 20.0), (30.0, 30.0)]);
        assert!(rasterize(&rect, 10, 10).is_empty());
    }

    #[test]
    fn polygon_partially_outside_is_clipped() {
        let rect = pts(&[(-5.0, -5.0), (5.0, -5.0), (5.0, 5.0), (-5.0, 5.0)]);
        let mask = rasterize(&rect, 10, 10);
        assert_eq!(mask.count(), 25);
    }

    #[test]
    fn degenerate_polygons_select_nothing() {
        assert!(rasterize(&pts(&[(1.0, 1.0), (8.0, 8.0)]), 10, 10).is_empty());
        assert!(rasterize(&pts(&[(1.0, 1.0), (1.0, 1.0), (8.0, 8.0), (8.0, 8.0)]), 10, 10).is_empty());
        // collinear
        assert!(rasterize(&pts(&[(0.0, 0.0), (5.0, 5.0), (9.0, 9.0)]), 10, 10).is_empty());
        assert!(is_degenerate(&pts(&[(0.0, 0.0), (5.0, 5.0), (9.0, 9.0), (2.0, 2.0)])));
        assert!(rasterize(&pts(&[(0.0, 0.0), (f64::NAN, 5.0), (9.0, 0.0)]), 10, 10).is_empty());
        assert!(rasterize(&[], 10, 10).is_empty());
    }

    #[test]
    fn self_intersecting_polygon_uses_even_odd() {
        // bowtie: signed lobes cancel but both triangles are filled
        let bowtie = pts(&[(0.0, 0.0), (10.0, 10.0), (10.0, 0.0), (0.0, 10.0)]);
        assert!(!is_degenerate(&bowtie));

        let expected = (0..10u32)
            .flat_map(|y| (0..10u32).map(move |x| (x, y)))
            .filter(|&(x, y)| point_in_polygon(f64::from(x) + 0.5, f64::from(y) + 0.5, &bowtie))
            .count();
        let mask = rasterize(&bowtie, 10, 10);
        assert_eq!(expected, 50);
        assert_eq!(mask.count(), expected);
        assert!(mask.is_set(9, 5));
        assert!(!mask.is_set(5, 1));
    }

    #[test]
    fn concave_polygon_uses_even_odd() {
        // U shape: notch between x=3..7 above y=5
        let u = pts(&[
            (0.0, 0.0),
            (3.0, 0.0),
            (3.0, 5.0),
            (7.0, 5.0),
            (7.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
        ]);
        let mask = rasterize(&u, 10, 10);
        assert!(!mask.is_set(5, 2));
        assert!(mask.is_set(5, 7));
        assert!(mask.is_set(1, 1));
        assert_eq!(mask.count(), 80);
    }

    #[test]
    fn rasterize_into_reuses_mask() {
        let mut mask = RegionMask::new(10, 10);
        let big = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        rasterize_into(&mut mask, &big, 10, 10);
        assert_eq!(mask.count(), 100);
        let small = pts(&[(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)]);
        rasterize_into(&mut mask, &small, 10, 10);
        assert_eq!(mask.count(), 4);
    }

    #[test]
    fn region_sources_resolve_to_pixels() {
        let landmarks = LandmarkSet::new(vec![
            Landmark::new(0.1, 0.2, 0.0),
            Landmark::new(0.5, 0.5, 0.0),
        ]);
        let from_landmarks = RegionSource::FromLandmarks(vec![1, 0]);
        assert_eq!(
            from_landmarks.resolve(&landmarks, 100, 50).unwrap(),
            pts(&[(50.0, 25.0), (10.0, 10.0)])
        );
        let from_points = RegionSource::FromPoints(pts(&[(0.5, 1.0)]));
        assert_eq!(from_points.resolve(&landmarks, 100, 50).unwrap(), pts(&[(50.0, 50.0)]));
        assert!(RegionSource::FromLandmarks(vec![2]).resolve(&landmarks, 100, 50).is_err());
    }

    proptest! {
        #[test]
        fn prop_triangle_count_tracks_area(
            ax in 5.0f64..95.0, ay in 5.0f64..95.0,
            bx in 5.0f64..95.0, by in 5.0f64..95.0,
            cx in 5.0f64..95.0, cy in 5.0f64..95.0,
        ) {
            let tri = vec![Point::new(ax, ay), Point::new(bx, by), Point::new(cx, cy)];
            let a = Point::new(ax, ay);
            let b = Point::new(bx, by);
            let c = Point::new(cx, cy);
            let perimeter = a.distance(&b) + b.distance(&c) + c.distance(&a);
            let area = polygon_area(&tri);
            let count = rasterize(&tri, 100, 100).count() as f64;
            prop_assert!((count - area).abs() <= perimeter + 4.0,
                "count {} area {} perimeter {}", count, area, perimeter);
        }

        #[test]
        fn prop_two_points_never_select(
            ax in -10.0f64..110.0, ay in -10.0f64..110.0,
            bx in -10.0f64..110.0, by in -10.0f64..110.0,
        ) {
            let line = vec![Point::new(ax, ay), Point::new(bx, by), Point::new(ax, ay)];
            prop_assert!(rasterize(&line, 100, 100).is_empty());
        }
    }
}
