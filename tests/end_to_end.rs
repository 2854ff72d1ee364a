//! Integration tests over synthetic frames with known colors.

use face_probe::{
    dominant_color, point_in_polygon, rasterize, zones::LANDMARK_COUNT, Config, FrameAnalyzer, Landmark,
    LandmarkSet, PixelBuffer, PixelRect, Point, RegionMask, RegionSource, Rgb, Zone, ZoneTable,
};
use std::time::Instant;

const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

/// Triangle corners in normalized frame coordinates.
const TRIANGLE: [(f64, f64); 3] = [(0.2, 0.2), (0.8, 0.2), (0.5, 0.8)];

/// 100x100 blue frame with the triangle filled red, sampled at pixel centers.
fn red_triangle_frame() -> PixelBuffer {
    let polygon: Vec<Point> = TRIANGLE.iter().map(|&(x, y)| Point::new(x * 100.0, y * 100.0)).collect();
    PixelBuffer::from_fn(100, 100, |x, y| {
        if point_in_polygon(f64::from(x) + 0.5, f64::from(y) + 0.5, &polygon) {
            RED
        } else {
            BLUE
        }
    })
}

/// A full mesh whose first three points trace the triangle; the rest sit in its middle.
fn triangle_landmarks() -> LandmarkSet {
    let mut points = vec![Landmark::new(0.5, 0.4, 0.0); LANDMARK_COUNT];
    for (i, &(x, y)) in TRIANGLE.iter().enumerate() {
        points[i] = Landmark::new(x, y, 0.0);
    }
    LandmarkSet::new(points)
}

#[test]
fn red_triangle_zone_on_blue_background() {
    let frame = red_triangle_frame();
    let landmarks = triangle_landmarks();

    let zone = RegionSource::FromLandmarks(vec![0, 1, 2]);
    let polygon = zone.resolve(&landmarks, 100, 100).unwrap();
    let zone_mask = rasterize(&polygon, 100, 100);
    assert_eq!(dominant_color(&frame, &zone_mask), Some(Rgb::new(255, 0, 0)));

    let mut outside = RegionMask::from_rect(100, 100, PixelRect::new(0, 0, 100, 100));
    outside.subtract(&zone_mask);
    assert_eq!(dominant_color(&frame, &outside), Some(Rgb::new(0, 0, 255)));

    let corner = RegionSource::FromPoints(vec![
        Point::new(0.0, 0.0),
        Point::new(0.15, 0.0),
        Point::new(0.15, 0.15),
        Point::new(0.0, 0.15),
    ]);
    let corner_mask = rasterize(&corner.resolve(&landmarks, 100, 100).unwrap(), 100, 100);
    assert_eq!(corner_mask.count(), 225);
    assert_eq!(dominant_color(&frame, &corner_mask), Some(Rgb::new(0, 0, 255)));
}

#[test]
fn analyzer_reports_custom_zone_colors() {
    let zones = ZoneTable::new(
        vec![
            Zone {
                name: "triangle".to_string(),
                indices: vec![0, 1, 2],
            },
            Zone {
                name: "sliver".to_string(),
                indices: vec![3, 4, 5],
            },
        ],
        LANDMARK_COUNT,
    )
    .unwrap();

    let mut analyzer = FrameAnalyzer::with_zones(Config::default(), zones);
    let mut throttle = analyzer.throttle();
    let report = analyzer
        .analyze(&red_triangle_frame(), &triangle_landmarks(), &mut throttle, Instant::now())
        .unwrap();

    // sorted by name: sliver, triangle
    assert_eq!(report.zone_colors.len(), 2);
    assert_eq!(report.zone_colors[0].zone, "sliver");
    assert_eq!(report.zone_colors[0].color, None);
    assert_eq!(report.zone_colors[1].zone, "triangle");
    assert_eq!(report.zone_colors[1].color, Some(Rgb::new(255, 0, 0)));

    // every metric stays finite even though the face outline collapsed
    let l = report.light;
    for v in [
        l.foreground_luminance,
        l.background_luminance,
        l.foreground_log_luminance,
        l.background_log_luminance,
        l.weber_contrast,
        l.foreground_rms_contrast,
        l.background_rms_contrast,
        l.exposure_value,
    ] {
        assert!(v.is_finite());
    }
    assert!(!report.verdict.overall_good);
    assert!(report.masked_face.is_none());
}

#[test]
fn frames_round_trip_through_image_crate() {
    let frame = red_triangle_frame();
    let image = frame.clone().into_rgba_image().unwrap();
    assert_eq!(image.dimensions(), (100, 100));
    assert_eq!(PixelBuffer::from(image), frame);
}

#[test]
fn landmark_json_parses_with_and_without_depth() {
    let json = r#"[{"x": 0.1, "y": 0.2, "z": -0.05}, {"x": 0.3, "y": 0.4}]"#;
    let set: LandmarkSet = serde_json::from_str(json).unwrap();
    assert_eq!(set.len(), 2);
    assert_eq!(set[0].z, -0.05);
    assert_eq!(set[1].z, 0.0);
}
