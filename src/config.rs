//! Clustering configuration.
//!
//! Defaults reproduce the map screen's behavior: a 60 px neighbor radius on a
//! 512 px tile, clustering up to zoom 20, and at least 3 points per cluster.
use crate::error::{FieldmapError, Result};
use serde::de::Error;
use std::path::Path;

/// Largest usable `max_zoom`; cluster ids reserve 5 bits for the origin zoom.
pub const MAX_SUPPORTED_ZOOM: u8 = 30;

/// What the index builder does with records whose coordinates are unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InvalidCoordinatePolicy {
    /// Skip the record, log it, and count it in the build report.
    #[default]
    Exclude,
    /// Fail the whole build on the first invalid record.
    Reject,
}

/// Spatial index configuration
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClusterConfig {
    /// Neighbor radius in pixels, measured against `extent`
    #[serde(default = "ClusterConfig::default_radius")]
    pub radius: f64,

    /// Tile extent in pixels
    #[serde(default = "ClusterConfig::default_extent")]
    pub extent: f64,

    #[serde(default)]
    pub min_zoom: u8,

    /// Highest zoom with clustering; raw points live one level above it
    #[serde(default = "ClusterConfig::default_max_zoom")]
    pub max_zoom: u8,

    /// Minimum number of points that form a cluster
    #[serde(default = "ClusterConfig::default_min_points")]
    pub min_points: usize,

    #[serde(default)]
    pub invalid_coordinates: InvalidCoordinatePolicy,
}

impl ClusterConfig {
    const fn default_radius() -> f64 {
        60.0
    }

    const fn default_extent() -> f64 {
        512.0
    }

    const fn default_max_zoom() -> u8 {
        20
    }

    const fn default_min_points() -> usize {
        3
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_extent(mut self, extent: f64) -> Self {
        self.extent = extent;
        self
    }

    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    pub fn with_min_points(mut self, min_points: usize) -> Self {
        self.min_points = min_points;
        self
    }

    pub fn with_invalid_coordinates(mut self, policy: InvalidCoordinatePolicy) -> Self {
        self.invalid_coordinates = policy;
        self
    }

    /// Neighbor radius in normalized world units at `zoom`.
    pub(crate) fn radius_at(&self, zoom: u8) -> f64 {
        self.radius / (self.extent * f64::powi(2.0, i32::from(zoom)))
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(format!("Radius must be a positive number, got {}", self.radius));
        }

        if !self.extent.is_finite() || self.extent <= 0.0 {
            return Err(format!("Extent must be a positive number, got {}", self.extent));
        }

        if self.min_zoom > self.max_zoom {
            return Err(format!(
                "min_zoom ({}) must not exceed max_zoom ({})",
                self.min_zoom, self.max_zoom
            ));
        }

        if self.max_zoom > MAX_SUPPORTED_ZOOM {
            return Err(format!(
                "max_zoom must be at most {}, got {}",
                MAX_SUPPORTED_ZOOM, self.max_zoom
            ));
        }

        if self.min_points < 2 {
            return Err(format!(
                "min_points must be at least 2, got {}",
                self.min_points
            ));
        }

        Ok(())
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: ClusterConfig = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: ClusterConfig = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load a configuration file, choosing the format from its extension.
    ///
    /// `.json` is always supported; `.toml` requires the `toml` feature.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&contents)
                .map_err(|e| FieldmapError::InvalidConfig(e.to_string())),
            #[cfg(feature = "toml")]
            Some("toml") => Self::from_toml(&contents)
                .map_err(|e| FieldmapError::InvalidConfig(e.to_string())),
            other => Err(FieldmapError::InvalidConfig(format!(
                "Unsupported config format: {}",
                other.unwrap_or("<none>")
            ))),
        }
    }
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            radius: Self::default_radius(),
            extent: Self::default_extent(),
            min_zoom: 0,
            max_zoom: Self::default_max_zoom(),
            min_points: Self::default_min_points(),
            invalid_coordinates: InvalidCoordinatePolicy::default(),
        }
    }
}
