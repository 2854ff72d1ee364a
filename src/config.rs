//! YAML configuration for the frame analyzer.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::quality::QualityThresholds;

/// Analyzer configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Frame quality gate thresholds
    pub quality: QualityThresholds,

    /// Bounding box and background region
    pub geometry: GeometryConfig,

    /// Downstream trigger throttling
    pub trigger: TriggerConfig,

    /// Color reporting
    pub colors: ColorConfig,
}

/// Bounding box parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeometryConfig {
    /// Pixels added on each side of the reported face box
    pub bbox_padding: f64,

    /// Pixels the background rectangle extends beyond the face box
    pub background_margin: f64,
}

/// Trigger throttle parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerConfig {
    /// Minimum time between two triggers, in milliseconds
    pub interval_ms: u64,
}

/// Color reporting parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Number of most frequent face colors to report
    pub top_colors: usize,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            bbox_padding: 0.0,
            background_margin: 50.0,
        }
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self { interval_ms: 1000 }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self { top_colors: 5 }
    }
}

impl TriggerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn check_threshold(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::Config(format!("{name} must be a finite, non-negative number, got {value}")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML text
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: Self =
            serde_yaml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a YAML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content =
            serde_yaml::to_string(self).map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content)?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        check_threshold("quality.max_angle_deg", self.quality.max_angle_deg)?;
        check_threshold("quality.min_area_ratio", self.quality.min_area_ratio)?;
        check_threshold("quality.target_exposure", self.quality.target_exposure)?;
        check_threshold("quality.exposure_tolerance", self.quality.exposure_tolerance)?;
        check_threshold("geometry.bbox_padding", self.geometry.bbox_padding)?;
        check_threshold("geometry.background_margin", self.geometry.background_margin)?;

        if self.colors.top_colors == 0 {
            return Err(Error::Config("colors.top_colors must be greater than 0".to_string()));
        }

        Ok(())
    }
}

/// Example configuration file content
pub const EXAMPLE_CONFIG: &str = r#"# face-probe configuration

# Frame quality gate
quality:
  max_angle_deg: 10.0
  min_area_ratio: 19.0
  target_exposure: 1.0
  exposure_tolerance: 0.2

# Face box and background ring (pixels)
geometry:
  bbox_padding: 0.0
  background_margin: 50.0

# Masked face trigger throttle
trigger:
  interval_ms: 1000

# Color report
colors:
  top_colors: 5
"#;
