//! Classification of airports and states into colour classes.
//!
//! The [`Theme`] holds both palettes and is built once at startup, then shared
//! read-only by the layers and the legend so they always index the same colours.

use crate::color::{Mode, Rgb, Scale, YL_OR_RD};

/// Number of airport marker classes
pub const TOWER_CLASSES: usize = 2;

/// Number of state density classes
pub const DENSITY_CLASSES: usize = 7;

/// Inclusive upper bound of each density class except the last (open-ended) one
pub const DENSITY_THRESHOLDS: [i64; DENSITY_CLASSES - 1] = [10, 20, 30, 40, 50, 60];

/// Air traffic control tower presence, as recorded in `CNTL_TWR`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum TowerFlag {
    Present,
    Absent,
    /// Anything other than the two recognised codes
    #[default]
    Unknown,
}

impl TowerFlag {
    pub fn from_code(code: &str) -> Self {
        match code {
            "Y" => TowerFlag::Present,
            "N" => TowerFlag::Absent,
            _ => TowerFlag::Unknown,
        }
    }
}

/// Marker class: 0 when a tower is present, 1 otherwise
pub fn tower_color_class(flag: TowerFlag) -> usize {
    match flag {
        TowerFlag::Present => 0,
        TowerFlag::Absent | TowerFlag::Unknown => 1,
    }
}

/// Fill class for a state's airport count.
///
/// Classes are half-open steps of ten: `<=10` is 0, `11..=20` is 1, and so on
/// up to `>60` which is 6. Negative counts fall into class 0.
pub fn density_color_class(count: i64) -> usize {
    DENSITY_THRESHOLDS
        .iter()
        .position(|&upper| count <= upper)
        .unwrap_or(DENSITY_CLASSES - 1)
}

/// Human-readable range for a density class, e.g. `"11-20"` or `"60+"`
pub fn density_class_label(class: usize) -> String {
    let class = class.min(DENSITY_CLASSES - 1);
    if class == DENSITY_CLASSES - 1 {
        format!("{}+", DENSITY_THRESHOLDS[DENSITY_CLASSES - 2])
    } else {
        let lower = if class == 0 { 0 } else { DENSITY_THRESHOLDS[class - 1] + 1 };
        format!("{}-{}", lower, DENSITY_THRESHOLDS[class])
    }
}

/// Palettes and fixed colours for the whole session
#[derive(Clone, Debug, PartialEq)]
pub struct Theme {
    /// Marker colours by tower class
    pub towers: [Rgb; TOWER_CLASSES],
    /// Fill colours by density class
    pub density: [Rgb; DENSITY_CLASSES],
    /// Stroke colour of a hovered state
    pub highlight: Rgb,
    /// Stroke colour of a resting state
    pub stroke: Rgb,
}

impl Theme {
    pub fn new() -> Self {
        Self {
            towers: Scale::new(&[Rgb::DARK_RED, Rgb::ORANGE])
                .mode(Mode::Lch)
                .colors::<TOWER_CLASSES>(),
            density: Scale::new(&YL_OR_RD).colors::<DENSITY_CLASSES>(),
            highlight: Rgb::DARK_RED,
            stroke: Rgb::WHITE,
        }
    }

    pub fn tower_color(&self, flag: TowerFlag) -> Rgb {
        self.towers[tower_color_class(flag)]
    }

    pub fn density_color(&self, count: i64) -> Rgb {
        self.density[density_color_class(count)]
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new()
    }
}
