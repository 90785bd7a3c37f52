//! Command-line configuration.

use crate::data::Datasets;
use crate::map::MAX_LATITUDE;
use clap::Parser;
use std::path::PathBuf;
use thiserror::Error;

/// Highest zoom level the viewport supports
pub const ZOOM_LIMIT: u8 = 18;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("zoom {zoom} is outside the bounds {min}..={max}")]
    ZoomOutOfBounds { zoom: u8, min: u8, max: u8 },

    #[error("max zoom {0} exceeds the supported limit {limit}", limit = ZOOM_LIMIT)]
    ZoomLimit(u8),

    #[error("center ({lat}, {lon}) is not a valid map position")]
    InvalidCenter { lat: f64, lon: f64 },
}

/// Terminal map of U.S. airports and air traffic control towers
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
pub struct Cli {
    /// Airport point GeoJSON
    #[arg(long, default_value = "assets/airports.geojson")]
    pub airports: PathBuf,

    /// State polygon GeoJSON
    #[arg(long, default_value = "assets/us-states.geojson")]
    pub states: PathBuf,

    /// Optional GeoJSON outlines drawn under everything else
    #[arg(long)]
    pub basemap: Option<PathBuf>,

    /// Initial center latitude
    #[arg(long, default_value_t = 39.38, allow_negative_numbers = true)]
    pub center_lat: f64,

    /// Initial center longitude
    #[arg(long, default_value_t = -97.92, allow_negative_numbers = true)]
    pub center_lon: f64,

    /// Initial zoom level
    #[arg(long, default_value_t = 7)]
    pub zoom: u8,

    #[arg(long, default_value_t = 3)]
    pub min_zoom: u8,

    #[arg(long, default_value_t = 8)]
    pub max_zoom: u8,

    /// Never use Braille sub-cell dots
    #[arg(long)]
    pub no_retina: bool,

    /// Directory for the session log
    #[arg(long, default_value = "logs")]
    pub log_dir: PathBuf,
}

/// Validated view and data settings
#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub center_lat: f64,
    pub center_lon: f64,
    pub zoom: u8,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub detect_retina: bool,
    pub datasets: Datasets,
    pub basemap: Option<PathBuf>,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            center_lat: 39.38,
            center_lon: -97.92,
            zoom: 7,
            min_zoom: 3,
            max_zoom: 8,
            detect_retina: true,
            datasets: Datasets {
                airports: PathBuf::from("assets/airports.geojson"),
                states: PathBuf::from("assets/us-states.geojson"),
            },
            basemap: None,
        }
    }
}

impl MapOptions {
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.max_zoom > ZOOM_LIMIT {
            return Err(ConfigError::ZoomLimit(self.max_zoom));
        }
        if self.min_zoom > self.zoom || self.zoom > self.max_zoom {
            return Err(ConfigError::ZoomOutOfBounds {
                zoom: self.zoom,
                min: self.min_zoom,
                max: self.max_zoom,
            });
        }
        let lat_ok = self.center_lat.is_finite() && self.center_lat.abs() <= MAX_LATITUDE;
        let lon_ok = self.center_lon.is_finite() && self.center_lon.abs() <= 180.0;
        if !lat_ok || !lon_ok {
            return Err(ConfigError::InvalidCenter {
                lat: self.center_lat,
                lon: self.center_lon,
            });
        }
        Ok(self)
    }
}

impl Cli {
    pub fn map_options(&self) -> Result<MapOptions, ConfigError> {
        MapOptions {
            center_lat: self.center_lat,
            center_lon: self.center_lon,
            zoom: self.zoom,
            min_zoom: self.min_zoom,
            max_zoom: self.max_zoom,
            detect_retina: !self.no_retina,
            datasets: Datasets {
                airports: self.airports.clone(),
                states: self.states.clone(),
            },
            basemap: self.basemap.clone(),
        }
        .validate()
    }
}
