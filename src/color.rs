//! Colour values and multi-stop colour scales.
//!
//! Scales sample evenly spaced stops over `[0, 1]`, interpolating either in
//! sRGB or in CIE LCh (hue takes the short way round the wheel).

use std::fmt;

/// An opaque sRGB colour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);
    pub const DARK_RED: Rgb = Rgb::new(0x8b, 0x00, 0x00);
    pub const ORANGE: Rgb = Rgb::new(0xff, 0xa5, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value
    pub const fn from_hex(hex: u32) -> Self {
        Self::new((hex >> 16) as u8, (hex >> 8) as u8, hex as u8)
    }

    /// Composite `self` at `alpha` over an opaque `under` colour
    pub fn blend(self, under: Rgb, alpha: f64) -> Rgb {
        let a = alpha.clamp(0.0, 1.0);
        let mix = |top: u8, bottom: u8| (top as f64 * a + bottom as f64 * (1.0 - a)).round() as u8;
        Rgb::new(mix(self.r, under.r), mix(self.g, under.g), mix(self.b, under.b))
    }

    /// Relative luminance in `[0, 1]`, used to pick readable text on swatches
    pub fn luminance(self) -> f64 {
        let (r, g, b) = (srgb_to_linear(self.r), srgb_to_linear(self.g), srgb_to_linear(self.b));
        0.2126 * r + 0.7152 * g + 0.0722 * b
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for ratatui::style::Color {
    fn from(c: Rgb) -> Self {
        ratatui::style::Color::Rgb(c.r, c.g, c.b)
    }
}

/// ColorBrewer YlOrRd, 9 classes
pub const YL_OR_RD: [Rgb; 9] = [
    Rgb::from_hex(0xffffcc),
    Rgb::from_hex(0xffeda0),
    Rgb::from_hex(0xfed976),
    Rgb::from_hex(0xfeb24c),
    Rgb::from_hex(0xfd8d3c),
    Rgb::from_hex(0xfc4e2a),
    Rgb::from_hex(0xe31a1c),
    Rgb::from_hex(0xbd0026),
    Rgb::from_hex(0x800026),
];

/// Colour space used between scale stops
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Rgb,
    Lch,
}

/// A colour ramp through evenly spaced stops
#[derive(Clone, Debug)]
pub struct Scale {
    stops: Vec<Rgb>,
    mode: Mode,
}

impl Scale {
    /// Create a scale; a single stop yields a constant scale
    pub fn new(stops: &[Rgb]) -> Self {
        Self {
            stops: stops.to_vec(),
            mode: Mode::Rgb,
        }
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Colour at position `t` in `[0, 1]` (clamped)
    pub fn at(&self, t: f64) -> Rgb {
        match self.stops.as_slice() {
            [] => Rgb::WHITE,
            [only] => *only,
            stops => {
                if t <= 0.0 {
                    return stops[0];
                }
                if t >= 1.0 {
                    return stops[stops.len() - 1];
                }
                let pos = t * (stops.len() - 1) as f64;
                let idx = (pos.floor() as usize).min(stops.len() - 2);
                let frac = pos - idx as f64;
                match self.mode {
                    Mode::Rgb => lerp_rgb(stops[idx], stops[idx + 1], frac),
                    Mode::Lch => lerp_lch(stops[idx], stops[idx + 1], frac),
                }
            }
        }
    }

    /// Sample `N` evenly spaced colours, first and last being the end stops
    pub fn colors<const N: usize>(&self) -> [Rgb; N] {
        std::array::from_fn(|i| {
            let t = if N <= 1 { 0.0 } else { i as f64 / (N - 1) as f64 };
            self.at(t)
        })
    }
}

fn lerp_rgb(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let mix = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round().clamp(0.0, 255.0) as u8;
    Rgb::new(mix(a.r, b.r), mix(a.g, b.g), mix(a.b, b.b))
}

fn lerp_lch(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let (l0, c0, h0) = lab_to_lch(rgb_to_lab(a));
    let (l1, c1, h1) = lab_to_lch(rgb_to_lab(b));

    let dh = if h1 > h0 && h1 - h0 > 180.0 {
        h1 - (h0 + 360.0)
    } else if h1 < h0 && h0 - h1 > 180.0 {
        h1 + 360.0 - h0
    } else {
        h1 - h0
    };

    let l = l0 + t * (l1 - l0);
    let c = c0 + t * (c1 - c0);
    let h = (h0 + t * dh).rem_euclid(360.0);
    lab_to_rgb(lch_to_lab(l, c, h))
}

// D65 reference white
const XN: f64 = 0.950470;
const YN: f64 = 1.0;
const ZN: f64 = 1.088830;

const T0: f64 = 4.0 / 29.0;
const T1: f64 = 6.0 / 29.0;
const T2: f64 = 3.0 * T1 * T1;
const T3: f64 = T1 * T1 * T1;

fn srgb_to_linear(c: u8) -> f64 {
    let c = c as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f64) -> u8 {
    let v = if c <= 0.0031308 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    };
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

fn xyz_to_lab_f(t: f64) -> f64 {
    if t > T3 {
        t.cbrt()
    } else {
        t / T2 + T0
    }
}

fn lab_to_xyz_f(t: f64) -> f64 {
    if t > T1 {
        t * t * t
    } else {
        T2 * (t - T0)
    }
}

fn rgb_to_lab(c: Rgb) -> (f64, f64, f64) {
    let (r, g, b) = (srgb_to_linear(c.r), srgb_to_linear(c.g), srgb_to_linear(c.b));
    let x = xyz_to_lab_f((0.4124564 * r + 0.3575761 * g + 0.1804375 * b) / XN);
    let y = xyz_to_lab_f((0.2126729 * r + 0.7151522 * g + 0.0721750 * b) / YN);
    let z = xyz_to_lab_f((0.0193339 * r + 0.1191920 * g + 0.9503041 * b) / ZN);
    (116.0 * y - 16.0, 500.0 * (x - y), 200.0 * (y - z))
}

fn lab_to_rgb((l, a, b): (f64, f64, f64)) -> Rgb {
    let y = (l + 16.0) / 116.0;
    let x = y + a / 500.0;
    let z = y - b / 200.0;

    let x = XN * lab_to_xyz_f(x);
    let y = YN * lab_to_xyz_f(y);
    let z = ZN * lab_to_xyz_f(z);

    Rgb::new(
        linear_to_srgb(3.2404542 * x - 1.5371385 * y - 0.4985314 * z),
        linear_to_srgb(-0.9692660 * x + 1.8760108 * y + 0.0415560 * z),
        linear_to_srgb(0.0556434 * x - 0.2040259 * y + 1.0572252 * z),
    )
}

fn lab_to_lch((l, a, b): (f64, f64, f64)) -> (f64, f64, f64) {
    let c = (a * a + b * b).sqrt();
    let h = b.atan2(a).to_degrees().rem_euclid(360.0);
    (l, c, h)
}

fn lch_to_lab(l: f64, c: f64, h: f64) -> (f64, f64, f64) {
    let h = h.to_radians();
    (l, h.cos() * c, h.sin() * c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_display() {
        assert_eq!(Rgb::from_hex(0xfd8d3c).to_string(), "#fd8d3c");
        assert_eq!(Rgb::DARK_RED.to_string(), "#8b0000");
    }

    #[test]
    fn test_yl_or_rd_seven_classes() {
        let colors = Scale::new(&YL_OR_RD).colors::<7>();
        let hex: Vec<String> = colors.iter().map(|c| c.to_string()).collect();
        assert_eq!(
            hex,
            ["#ffffcc", "#ffe692", "#febf5a", "#fd8d3c", "#f43d25", "#ca0923", "#800026"]
        );
    }

    #[test]
    fn test_two_colors_are_end_stops() {
        let colors = Scale::new(&[Rgb::DARK_RED, Rgb::ORANGE]).mode(Mode::Lch).colors::<2>();
        assert_eq!(colors, [Rgb::DARK_RED, Rgb::ORANGE]);
    }

    #[test]
    fn test_lab_round_trip() {
        for c in YL_OR_RD {
            assert_eq!(lab_to_rgb(rgb_to_lab(c)), c);
        }
    }

    #[test]
    fn test_lch_midpoint_is_between_in_lightness() {
        let mid = Scale::new(&[Rgb::DARK_RED, Rgb::ORANGE]).mode(Mode::Lch).at(0.5);
        let (l_mid, _, _) = rgb_to_lab(mid);
        let (l0, _, _) = rgb_to_lab(Rgb::DARK_RED);
        let (l1, _, _) = rgb_to_lab(Rgb::ORANGE);
        assert!(l_mid > l0 && l_mid < l1);
    }

    #[test]
    fn test_blend() {
        assert_eq!(Rgb::new(0, 0, 0).blend(Rgb::WHITE, 0.5), Rgb::new(128, 128, 128));
        assert_eq!(Rgb::DARK_RED.blend(Rgb::WHITE, 1.0), Rgb::DARK_RED);
        assert_eq!(Rgb::DARK_RED.blend(Rgb::WHITE, 0.0), Rgb::WHITE);
    }
}
