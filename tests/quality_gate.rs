//! Frame quality gate scenarios through the public API.

use face_probe::{
    BoundingBox, Config, FaceAngles, LuminanceMetrics, QualityGate, QualityHint, QualityThresholds, TriggerThrottle,
};
use std::time::{Duration, Instant};

fn face_box(area_ratio: f64) -> BoundingBox {
    BoundingBox {
        x: 10.0,
        y: 10.0,
        width: 50.0,
        height: 50.0,
        area_ratio,
    }
}

fn exposure(ev: f64) -> LuminanceMetrics {
    LuminanceMetrics {
        exposure_value: ev,
        ..LuminanceMetrics::default()
    }
}

const FRONTAL: FaceAngles = FaceAngles {
    yaw: 0.0,
    pitch: 0.0,
    roll: 0.0,
};

#[test]
fn well_framed_face_passes() {
    let verdict = QualityGate::default().evaluate(&face_box(25.0), Some(&FRONTAL), &exposure(1.0));
    assert!(verdict.overall_good);
    assert!(verdict.is_good_angle && verdict.is_good_ratio && verdict.is_good_light_exposure);
    assert!(verdict.hints.is_empty());
}

#[test]
fn small_face_fails_only_on_ratio() {
    let verdict = QualityGate::default().evaluate(&face_box(5.0), Some(&FRONTAL), &exposure(1.0));
    assert!(!verdict.overall_good);
    assert_eq!(verdict.hints, vec![QualityHint::FaceTooSmall]);
    assert_eq!(verdict.hints[0].to_string(), "face not centered/too small");
}

#[test]
fn turned_face_is_not_frontal() {
    let turned = FaceAngles {
        yaw: 25.0,
        ..FRONTAL
    };
    let verdict = QualityGate::default().evaluate(&face_box(25.0), Some(&turned), &exposure(1.0));
    assert_eq!(verdict.hints, vec![QualityHint::NotFrontal]);
    assert_eq!(verdict.hints[0].to_string(), "face not frontal");
}

#[test]
fn thresholds_come_from_config() {
    let config = Config::from_yaml("quality:\n  min_area_ratio: 40.0\n  exposure_tolerance: 0.5\n").unwrap();
    let gate = QualityGate::new(config.quality);
    assert_eq!(gate.thresholds().min_area_ratio, 40.0);

    let verdict = gate.evaluate(&face_box(25.0), Some(&FRONTAL), &exposure(0.6));
    assert!(!verdict.is_good_ratio);
    assert!(verdict.is_good_light_exposure);
    assert_eq!(QualityThresholds::default().min_area_ratio, 19.0);
}

#[test]
fn throttle_only_fires_for_good_frames() {
    let gate = QualityGate::default();
    let good = gate.evaluate(&face_box(25.0), Some(&FRONTAL), &exposure(1.0));
    let bad = gate.evaluate(&face_box(25.0), Some(&FRONTAL), &exposure(0.0));

    let mut throttle = TriggerThrottle::new(Duration::from_millis(200));
    let start = Instant::now();
    let fired: Vec<bool> = (0..10u64)
        .map(|i| {
            let verdict = if i == 3 { &bad } else { &good };
            throttle.should_trigger(verdict, start + Duration::from_millis(i * 50))
        })
        .collect();

    // 0ms fires, 150ms is bad, 200ms fires, 400ms fires
    assert_eq!(
        fired,
        vec![true, false, false, false, true, false, false, false, true, false]
    );
}
