//! Map overlays: the legend and the scale bar.

use crate::color::Rgb;
use crate::map::projection::Viewport;
use crate::theme::{density_class_label, Theme, DENSITY_CLASSES};

/// Opacity of the density swatches over the legend background
pub const SWATCH_OPACITY: f64 = 0.5;

/// One line of the legend
#[derive(Clone, Debug, PartialEq)]
pub enum LegendRow {
    Heading(&'static str),
    /// Density class swatch
    Swatch { color: Rgb, label: String },
    /// Airport marker sample
    Marker { color: Rgb, label: &'static str },
    Separator,
}

/// Legend built once from the theme. Density classes run from highest to
/// lowest, followed by the two tower classes.
#[derive(Clone, Debug)]
pub struct Legend {
    rows: Vec<LegendRow>,
}

impl Legend {
    pub fn new(theme: &Theme) -> Self {
        let mut rows = vec![LegendRow::Heading("# Airport")];
        rows.extend((0..DENSITY_CLASSES).rev().map(|class| LegendRow::Swatch {
            color: theme.density[class],
            label: density_class_label(class),
        }));
        rows.push(LegendRow::Separator);
        rows.push(LegendRow::Heading("Traffic Control Tower"));
        rows.extend(
            ["Available", "Not Available"]
                .into_iter()
                .zip(theme.towers)
                .map(|(label, color)| LegendRow::Marker { color, label }),
        );
        Self { rows }
    }

    pub fn rows(&self) -> &[LegendRow] {
        &self.rows
    }

    /// Widest label, for sizing the overlay
    pub fn label_width(&self) -> usize {
        self.rows
            .iter()
            .map(|row| match row {
                LegendRow::Heading(text) => text.chars().count(),
                LegendRow::Swatch { label, .. } => label.chars().count() + 3,
                LegendRow::Marker { label, .. } => label.chars().count() + 2,
                LegendRow::Separator => 0,
            })
            .max()
            .unwrap_or(0)
    }
}

/// One graduation of the scale bar
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleLine {
    pub label: String,
    /// Bar length in dots
    pub width: usize,
}

/// Metric and imperial scale for the current view
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleBar {
    pub metric: ScaleLine,
    pub imperial: ScaleLine,
}

const EARTH_RADIUS_M: f64 = 6_371_000.0;
const FEET_PER_METER: f64 = 3.2808399;
const FEET_PER_MILE: f64 = 5280.0;

impl ScaleBar {
    /// Measure the ground distance spanned by `max_width` dots across the
    /// middle of the view and round it down to a readable length.
    pub fn measure(viewport: &Viewport, max_width: usize) -> Option<Self> {
        if max_width == 0 {
            return None;
        }
        let y = (viewport.height / 2) as i32;
        let (lon0, lat0) = viewport.unproject(0, y);
        let (lon1, lat1) = viewport.unproject(max_width as i32, y);
        let max_meters = haversine_m(lon0, lat0, lon1, lat1);
        if max_meters <= 0.0 || !max_meters.is_finite() {
            return None;
        }

        let meters = round_num(max_meters);
        let metric = ScaleLine {
            label: if meters < 1000.0 {
                format!("{} m", meters)
            } else {
                format!("{} km", meters / 1000.0)
            },
            width: bar_width(max_width, meters / max_meters),
        };

        let max_feet = max_meters * FEET_PER_METER;
        let imperial = if max_feet > FEET_PER_MILE {
            let max_miles = max_feet / FEET_PER_MILE;
            let miles = round_num(max_miles);
            ScaleLine {
                label: format!("{} mi", miles),
                width: bar_width(max_width, miles / max_miles),
            }
        } else {
            let feet = round_num(max_feet);
            ScaleLine {
                label: format!("{} ft", feet),
                width: bar_width(max_width, feet / max_feet),
            }
        };

        Some(Self { metric, imperial })
    }
}

fn bar_width(max_width: usize, ratio: f64) -> usize {
    (max_width as f64 * ratio).round() as usize
}

/// Round down to 1, 2, 3 or 5 times a power of ten
fn round_num(num: f64) -> f64 {
    let pow10 = 10f64.powi(num.floor().to_string().len() as i32 - 1);
    let d = num / pow10;
    let d = if d >= 10.0 {
        10.0
    } else if d >= 5.0 {
        5.0
    } else if d >= 3.0 {
        3.0
    } else if d >= 2.0 {
        2.0
    } else {
        1.0
    };
    pow10 * d
}

/// Great-circle distance in meters
fn haversine_m(lon1: f64, lat1: f64, lon2: f64, lat2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();
    EARTH_RADIUS_M * c
}
