use std::env;

/// Terminals whose glyph sets or redraw behaviour rule out the richer rendering paths
const LEGACY_TERMS: [&str; 6] = ["dumb", "linux", "vt100", "vt102", "vt220", "cons25"];

/// What the attached terminal can render
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Draw with 2x4 Braille dots per cell; otherwise one ASCII glyph per cell
    pub braille: bool,
    /// Non-ASCII glyphs (the plane marker) are available
    pub unicode: bool,
    /// Hovered polygons may be raised above their siblings
    pub bring_to_front: bool,
}

impl Capabilities {
    /// Everything enabled
    pub const FULL: Capabilities = Capabilities {
        braille: true,
        unicode: true,
        bring_to_front: true,
    };

    /// Probe `TERM` and the locale. Braille is only used when `detect_retina` is set.
    pub fn detect(detect_retina: bool) -> Self {
        let term = env::var("TERM").ok();
        let locale = ["LC_ALL", "LC_CTYPE", "LANG"]
            .iter()
            .find_map(|key| env::var(key).ok().filter(|v| !v.is_empty()));
        Self::from_env(term.as_deref(), locale.as_deref(), detect_retina)
    }

    pub fn from_env(term: Option<&str>, locale: Option<&str>, detect_retina: bool) -> Self {
        let legacy = term.is_some_and(|t| LEGACY_TERMS.contains(&t));
        let utf8 = locale.is_some_and(|l| {
            let l = l.to_ascii_lowercase();
            l.contains("utf-8") || l.contains("utf8")
        });
        let unicode = utf8 && !legacy;

        Self {
            braille: detect_retina && unicode,
            unicode,
            bring_to_front: !legacy,
        }
    }

    /// Glyph used for airport markers
    pub fn marker_glyph(&self) -> char {
        if self.unicode {
            '✈'
        } else {
            '+'
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::FULL
    }
}
