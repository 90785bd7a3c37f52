//! Loading of the airport and state feature collections.
//!
//! Features are converted into validated records at parse time. Missing or
//! malformed attributes get explicit defaults; features without usable
//! geometry are skipped. Only a file that cannot be read or is not a GeoJSON
//! FeatureCollection fails the whole dataset.

mod basemap;
mod error;

pub use basemap::{builtin_outline, load_outlines};
pub use error::DataError;

use crate::theme::TowerFlag;
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue, Value};
use glam::DVec2;
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};
use tracing::{debug, info};

/// One airport from the point dataset
#[derive(Clone, Debug, PartialEq)]
pub struct AirportRecord {
    /// (lon, lat)
    pub position: DVec2,
    pub name: String,
    /// Passengers boarding by airlines (`TOT_ENP`)
    pub enplanements: f64,
    /// Feet above sea level (`ELEV`)
    pub elevation: f64,
    pub tower: TowerFlag,
}

impl AirportRecord {
    pub fn from_feature(feature: &Feature) -> Option<Self> {
        let position = match feature.geometry.as_ref().map(|g| &g.value) {
            Some(Value::Point(coords)) if coords.len() >= 2 => DVec2::new(coords[0], coords[1]),
            _ => return None,
        };
        let props = feature.properties.as_ref();

        Some(Self {
            position,
            name: prop_str(props, "AIRPT_NAME").unwrap_or_else(|| "Unknown".to_string()),
            enplanements: prop_f64(props, "TOT_ENP").unwrap_or(0.0),
            elevation: prop_f64(props, "ELEV").unwrap_or(0.0),
            tower: prop_str(props, "CNTL_TWR")
                .map(|code| TowerFlag::from_code(&code))
                .unwrap_or_default(),
        })
    }
}

/// One state from the polygon dataset
#[derive(Clone, Debug, PartialEq)]
pub struct StateRecord {
    pub name: String,
    /// Number of airports in the state; missing or negative counts read as 0
    pub airport_count: u32,
    /// All rings of all parts in (lon, lat), filled with the even-odd rule
    pub rings: Vec<Vec<DVec2>>,
}

impl StateRecord {
    pub fn from_feature(feature: &Feature) -> Option<Self> {
        let rings: Vec<Vec<DVec2>> = match feature.geometry.as_ref().map(|g| &g.value) {
            Some(Value::Polygon(rings)) => rings.iter().map(|r| to_ring(r)).collect(),
            Some(Value::MultiPolygon(polygons)) => {
                polygons.iter().flatten().map(|r| to_ring(r)).collect()
            }
            _ => return None,
        };
        if rings.iter().all(|r| r.len() < 3) {
            return None;
        }
        let props = feature.properties.as_ref();

        Some(Self {
            name: prop_str(props, "name").unwrap_or_else(|| "Unknown".to_string()),
            airport_count: prop_i64(props, "count")
                .map(|c| c.clamp(0, i64::from(u32::MAX)) as u32)
                .unwrap_or(0),
            rings,
        })
    }
}

fn to_ring(coords: &[Vec<f64>]) -> Vec<DVec2> {
    coords
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| DVec2::new(c[0], c[1]))
        .collect()
}

fn prop<'a>(props: Option<&'a JsonObject>, key: &str) -> Option<&'a JsonValue> {
    props.and_then(|p| p.get(key))
}

fn prop_str(props: Option<&JsonObject>, key: &str) -> Option<String> {
    match prop(props, key)? {
        JsonValue::String(s) => Some(s.clone()),
        JsonValue::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn prop_f64(props: Option<&JsonObject>, key: &str) -> Option<f64> {
    let value = match prop(props, key)? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|v| v.is_finite())
}

fn prop_i64(props: Option<&JsonObject>, key: &str) -> Option<i64> {
    match prop(props, key)? {
        JsonValue::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(whole_above)),
        JsonValue::String(s) => {
            let s = s.trim();
            s.parse().ok().or_else(|| s.parse().ok().and_then(whole_above))
        }
        _ => None,
    }
}

/// Smallest integer not below `v`, so fractional counts classify like the
/// strict `>` thresholds they are compared against
fn whole_above(v: f64) -> Option<i64> {
    v.is_finite().then(|| v.ceil() as i64)
}

/// Read and parse a GeoJSON FeatureCollection
pub fn read_feature_collection(path: &Path) -> Result<FeatureCollection, DataError> {
    let mut bytes = fs::read(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let value: JsonValue = simd_json::serde::from_slice(&mut bytes).map_err(|source| DataError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let geojson = GeoJson::from_json_value(value).map_err(|source| DataError::GeoJson {
        path: path.to_path_buf(),
        source: Box::new(source),
    })?;

    match geojson {
        GeoJson::FeatureCollection(fc) => Ok(fc),
        _ => Err(DataError::NotFeatureCollection {
            path: path.to_path_buf(),
        }),
    }
}

fn convert<T: Send>(
    path: &Path,
    kind: &str,
    fc: &FeatureCollection,
    from_feature: fn(&Feature) -> Option<T>,
) -> Vec<T> {
    let records: Vec<T> = fc.features.par_iter().filter_map(from_feature).collect();
    let skipped = fc.features.len() - records.len();
    if skipped > 0 {
        debug!(path = %path.display(), kind, skipped, "skipped features without usable geometry");
    }
    info!(path = %path.display(), kind, count = records.len(), "loaded features");
    records
}

/// Load the airport point dataset
pub fn load_airports(path: &Path) -> Result<Vec<AirportRecord>, DataError> {
    let fc = read_feature_collection(path)?;
    Ok(convert(path, "airports", &fc, AirportRecord::from_feature))
}

/// Load the state polygon dataset
pub fn load_states(path: &Path) -> Result<Vec<StateRecord>, DataError> {
    let fc = read_feature_collection(path)?;
    Ok(convert(path, "states", &fc, StateRecord::from_feature))
}

/// Locations of the two feature collections
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Datasets {
    pub airports: PathBuf,
    pub states: PathBuf,
}

/// Completion of one background load
#[derive(Debug)]
pub enum LoadEvent {
    Airports(Result<Vec<AirportRecord>, DataError>),
    States(Result<Vec<StateRecord>, DataError>),
}

/// Start both dataset loads in the background. Each sends exactly one
/// [`LoadEvent`]; they may arrive in either order.
pub fn spawn_loaders(datasets: &Datasets) -> Receiver<LoadEvent> {
    let (tx, rx) = mpsc::channel();

    let airports = datasets.airports.clone();
    let airports_tx = tx.clone();
    rayon::spawn(move || {
        let _ = airports_tx.send(LoadEvent::Airports(load_airports(&airports)));
    });

    let states = datasets.states.clone();
    rayon::spawn(move || {
        let _ = tx.send(LoadEvent::States(load_states(&states)));
    });

    rx
}
