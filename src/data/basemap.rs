use super::{read_feature_collection, DataError};
use geojson::{Geometry, Value};
use glam::DVec2;
use std::path::Path;

/// Load outline lines from any GeoJSON FeatureCollection: line strings as-is,
/// polygons by their exterior rings.
pub fn load_outlines(path: &Path) -> Result<Vec<Vec<DVec2>>, DataError> {
    let fc = read_feature_collection(path)?;
    let mut lines = Vec::new();
    for feature in &fc.features {
        if let Some(ref geometry) = feature.geometry {
            collect_lines(geometry, &mut lines);
        }
    }
    Ok(lines)
}

fn to_line(coords: &[Vec<f64>]) -> Vec<DVec2> {
    coords
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| DVec2::new(c[0], c[1]))
        .collect()
}

fn collect_lines(geometry: &Geometry, lines: &mut Vec<Vec<DVec2>>) {
    match &geometry.value {
        Value::LineString(coords) => lines.push(to_line(coords)),
        Value::MultiLineString(parts) => lines.extend(parts.iter().map(|c| to_line(c))),
        Value::Polygon(rings) => {
            if let Some(exterior) = rings.first() {
                lines.push(to_line(exterior));
            }
        }
        Value::MultiPolygon(polygons) => {
            for rings in polygons {
                if let Some(exterior) = rings.first() {
                    lines.push(to_line(exterior));
                }
            }
        }
        Value::GeometryCollection(geometries) => {
            for g in geometries {
                collect_lines(g, lines);
            }
        }
        _ => {}
    }
}

/// Coarse North American coastline used when no basemap file is given
pub fn builtin_outline() -> Vec<Vec<DVec2>> {
    const MAINLAND: &[(f64, f64)] = &[
        (-124.7, 48.4), (-124.1, 46.2), (-124.0, 43.0), (-124.3, 40.4),
        (-122.4, 37.2), (-120.6, 34.6), (-117.2, 32.6), (-114.8, 30.2),
        (-112.2, 28.9), (-109.9, 23.0), (-105.7, 20.4), (-104.3, 19.1),
        (-97.8, 15.9), (-94.2, 16.2), (-92.2, 14.5), (-94.8, 18.5),
        (-97.2, 20.8), (-97.6, 25.9), (-97.2, 27.8), (-94.7, 29.4),
        (-90.0, 29.1), (-88.9, 30.4), (-85.4, 29.7), (-82.8, 27.9),
        (-81.2, 25.2), (-80.1, 25.8), (-80.6, 28.5), (-81.4, 30.7),
        (-79.2, 33.2), (-75.5, 35.2), (-76.0, 37.0), (-74.0, 39.4),
        (-73.9, 40.6), (-70.0, 41.7), (-70.7, 43.1), (-67.0, 44.8),
        (-64.0, 45.4), (-66.0, 44.2), (-61.0, 45.8), (-64.5, 48.9),
        (-66.7, 50.2), (-60.0, 50.2), (-56.0, 52.0), (-60.5, 55.5),
        (-64.5, 60.3), (-69.5, 58.8), (-77.6, 62.2), (-78.6, 58.6),
        (-76.7, 56.0), (-79.5, 51.5), (-82.3, 52.9), (-85.5, 55.3),
        (-92.5, 57.0), (-94.3, 58.7), (-94.6, 61.0), (-90.5, 64.0),
        (-96.0, 67.5), (-108.0, 68.4), (-115.0, 68.0), (-124.0, 69.5),
        (-136.0, 69.2), (-141.0, 69.6), (-156.7, 71.3), (-166.2, 68.9),
        (-162.6, 66.5), (-168.0, 65.6), (-161.8, 64.4), (-165.3, 62.4),
        (-164.7, 60.2), (-157.5, 58.6), (-162.3, 55.0), (-155.5, 57.5),
        (-151.9, 59.4), (-146.7, 60.6), (-139.8, 59.6), (-136.4, 58.1),
        (-131.5, 55.0), (-130.1, 54.2), (-127.8, 50.9), (-124.7, 48.4),
    ];
    const HAWAII: &[(f64, f64)] = &[
        (-155.9, 20.2), (-155.0, 19.7), (-155.7, 18.9), (-156.0, 19.6),
        (-155.9, 20.2),
    ];

    [MAINLAND, HAWAII]
        .iter()
        .map(|part| part.iter().map(|&(lon, lat)| DVec2::new(lon, lat)).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_outline_is_closed() {
        for line in builtin_outline() {
            assert!(line.len() >= 4);
            assert_eq!(line.first(), line.last());
        }
    }

    #[test]
    fn test_collect_polygon_exteriors_only() {
        let geometry: Geometry = r#"{"type":"Polygon","coordinates":[[[0,0],[4,0],[4,4],[0,0]],[[1,1],[2,1],[2,2],[1,1]]]}"#
            .parse::<geojson::GeoJson>()
            .map(|g| match g {
                geojson::GeoJson::Geometry(g) => g,
                other => panic!("expected geometry, got {:?}", other),
            })
            .unwrap();
        let mut lines = Vec::new();
        collect_lines(&geometry, &mut lines);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].len(), 4);
    }
}
