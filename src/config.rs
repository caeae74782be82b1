// src/config.rs

//! Defines the configuration structures for a single slab invocation.
//!
//! A configuration describes one `(snapshot, TilingSpec)` pair: which slice of
//! the light cone this slab is, which field to project, any extra cell cuts,
//! and the output resolution. Everything is deserialized from JSON, with
//! defaults for every missing value, and checked by `Config::validate` before
//! any stage runs.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;
use crate::geometry::Axis;
use crate::predicate::CellPredicate;

// --- Top-Level Configuration Structure ---

/// Represents the complete configuration for one slab.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)] // Apply default values for the entire struct if a field is missing.
pub struct Config {
    /// Placement of this slab within the light cone.
    pub slice: TilingSpec,
    /// Field (and optional weight) to project.
    pub fields: FieldConfig,
    /// Extra cell selections, ANDed with the depth cut.
    pub field_cuts: Vec<CellPredicate>,
    /// Output resolution, in pixels along each side.
    pub pixels: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            slice: TilingSpec::default(),
            fields: FieldConfig::default(),
            field_cuts: Vec::new(),
            pixels: 512,
        }
    }
}

impl Config {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json).context("Failed to parse config JSON")?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config = Self::from_json_str(&text)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.slice.validate()?;
        self.fields.validate()?;
        if self.pixels == 0 {
            return Err(ConfigError::ZeroPixels);
        }
        Ok(())
    }
}

// --- Tiling Specification ---

/// Where a slab sits in the light cone and how much of the domain it covers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TilingSpec {
    /// Line-of-sight axis, `0`, `1` or `2`.
    pub projection_axis: Axis,
    /// Randomized center, in normalized `[0, 1)` units per axis. The lateral
    /// components set the shift; the axial one sets the depth window.
    pub projection_center: [f64; 3],
    /// Fraction of the domain depth integrated, in `(0, 1]`.
    pub box_depth_fraction: f64,
    /// Field of view in domain widths; may exceed 1.
    pub box_width_fraction: f64,
    pub redshift: f64,
    /// Snapshot this slab is drawn from (used in logs).
    pub source: String,
}

impl Default for TilingSpec {
    fn default() -> Self {
        TilingSpec {
            projection_axis: Axis::X,
            projection_center: [0.0; 3],
            box_depth_fraction: 1.0,
            box_width_fraction: 1.0,
            redshift: 0.0,
            source: String::new(),
        }
    }
}

impl TilingSpec {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let width = self.box_width_fraction;
        if !(width.is_finite() && width > 0.0) {
            return Err(ConfigError::InvalidBoxWidth(width));
        }
        let depth = self.box_depth_fraction;
        if !(depth.is_finite() && depth > 0.0 && depth <= 1.0) {
            return Err(ConfigError::InvalidBoxDepth(depth));
        }
        for (axis, &value) in self.projection_center.iter().enumerate() {
            if !value.is_finite() {
                return Err(ConfigError::NonFiniteCenter { axis, value });
            }
        }
        Ok(())
    }

    /// Lateral shift in domain units: the center components on the two
    /// image axes, scaled by the corresponding domain widths.
    pub fn lateral_center(&self) -> [f64; 2] {
        let (a, b) = self.projection_axis.lateral();
        [
            self.projection_center[a.index()],
            self.projection_center[b.index()],
        ]
    }

    pub fn depth_center(&self) -> f64 {
        self.projection_center[self.projection_axis.index()]
    }
}

// --- Field Configuration ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FieldConfig {
    /// Name of the projected field.
    pub name: String,
    /// Optional weight field. The output then carries `field * weight` and
    /// the weight image itself.
    pub weight: Option<String>,
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            name: "density".to_string(),
            weight: None,
        }
    }
}

impl FieldConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyFieldName);
        }
        if matches!(self.weight.as_deref(), Some("")) {
            return Err(ConfigError::EmptyWeightName);
        }
        Ok(())
    }
}
