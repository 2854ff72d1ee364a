//! # face-probe
//!
//! Per-frame face analysis from a dense landmark mesh and an RGBA frame.
//!
//! This crate provides:
//! - **Zone Colors**: dominant exact color of named facial regions (cheeks, lips, eyes...)
//! - **Head Pose**: yaw, pitch and roll read off fixed landmark pairs
//! - **Face Box and Cut-out**: normalized bounding box and a masked, cropped face image
//! - **Lighting**: face versus background luminance, contrast and exposure value
//! - **Quality Gate**: a per-frame verdict with corrective hints and a trigger throttle
//!
//! Landmarks follow the 468-point face mesh layout with (x, y) normalized to
//! [0,1] over the frame and a relative depth z.
//!
//! ## Algorithm Overview
//!
//! 1. Compute the landmark bounding box and head pose angles
//! 2. Rasterize every zone polygon and take the histogram mode of its pixels
//! 3. Rasterize the face outline and a background ring around the face box
//! 4. Compare face and background luminance
//! 5. Gate the frame on pose, face size and exposure
//! 6. When the gate passes and the throttle allows, cut out the masked face
//!
//! ## Quick Start
//!
//! ```rust
//! use face_probe::{Config, FrameAnalyzer, Landmark, LandmarkSet, PixelBuffer};
//! use std::time::Instant;
//!
//! let mut analyzer = FrameAnalyzer::new(Config::default());
//! let mut throttle = analyzer.throttle();
//!
//! // Frame and landmarks normally come from a camera and a landmark detector
//! let frame = PixelBuffer::filled(640, 480, [180, 140, 120, 255]);
//! let landmarks = LandmarkSet::new(vec![Landmark::new(0.5, 0.5, 0.0); 468]);
//!
//! let report = analyzer.analyze(&frame, &landmarks, &mut throttle, Instant::now()).unwrap();
//! for hint in &report.verdict.hints {
//!     println!("{hint}");
//! }
//! ```
//!
//! ## Single Regions
//!
//! The stages are also usable on their own:
//!
//! ```rust
//! use face_probe::{dominant_color, rasterize, PixelBuffer, Point, Rgb};
//!
//! let frame = PixelBuffer::filled(10, 10, [255, 0, 0, 255]);
//! let square = [
//!     Point::new(2.0, 2.0),
//!     Point::new(8.0, 2.0),
//!     Point::new(8.0, 8.0),
//!     Point::new(2.0, 8.0),
//! ];
//! let mask = rasterize(&square, 10, 10);
//! assert_eq!(dominant_color(&frame, &mask), Some(Rgb::new(255, 0, 0)));
//! ```

mod color;
pub mod config;
mod error;
mod geometry;
mod light;
mod mask;
mod pipeline;
mod pixels;
mod quality;
mod raster;
mod types;
pub mod zones;

pub use color::{dominant_color, top_colors, zone_color, zone_colors, ColorCount, ZoneColor};
pub use config::Config;
pub use error::{Error, Result};
pub use geometry::{angles, bounding_box, estimate_angles, normalize_angle, FaceAngles};
pub use light::{
    background_mask_into, background_rect, exposure_value, light_metrics, luminance, weber_contrast,
    LuminanceMetrics, LOG_LUMINANCE_EPSILON,
};
pub use mask::{masked_face, masked_face_with};
pub use pipeline::{FrameAnalyzer, FrameArena, FrameReport};
pub use pixels::{PixelBuffer, RegionMask};
pub use quality::{QualityGate, QualityHint, QualityThresholds, QualityVerdict, TriggerThrottle};
pub use raster::{is_degenerate, point_in_polygon, polygon_area, rasterize, rasterize_into, RegionSource};
pub use types::{BoundingBox, Landmark, LandmarkSet, PixelRect, Point, Rgb};
pub use zones::{Zone, ZoneTable};
