use crate::braille::BrailleCanvas;
use crate::color::Rgb;
use crate::data::{builtin_outline, load_outlines, DataError};
use crate::map::geometry::{stroke_path, Stroke};
use crate::map::projection::Viewport;
use glam::DVec2;
use std::path::Path;

/// Light basemap paper colour
pub const PAPER: Rgb = Rgb::from_hex(0xf2f0eb);
/// Coastline ink
pub const COASTLINE: Rgb = Rgb::from_hex(0x9aa5ad);

/// Background layer every overlay is composited onto
#[derive(Clone, Debug)]
pub struct BaseLayer {
    pub name: String,
    pub lines: Vec<Vec<DVec2>>,
    pub background: Rgb,
    pub ink: Rgb,
    pub attribution: String,
}

impl BaseLayer {
    /// Built-in coarse coastline
    pub fn builtin() -> Self {
        Self {
            name: "Coastline".to_string(),
            lines: builtin_outline(),
            background: PAPER,
            ink: COASTLINE,
            attribution: "Base Map: built-in outline".to_string(),
        }
    }

    /// Outlines from a GeoJSON file
    pub fn from_file(path: &Path) -> Result<Self, DataError> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "Basemap".to_string());
        Ok(Self {
            attribution: format!("Base Map: {}", name),
            name,
            lines: load_outlines(path)?,
            background: PAPER,
            ink: COASTLINE,
        })
    }

    pub fn render(&self, canvas: &mut BrailleCanvas, viewport: &Viewport) {
        canvas.fill_all(self.background);
        let stroke = Stroke {
            color: self.ink,
            thickness: 1,
            dash: None,
        };
        for line in &self.lines {
            let points: Vec<(i32, i32)> = line.iter().map(|p| viewport.project(p.x, p.y)).collect();
            stroke_path(canvas, &points, stroke, viewport.width as i32);
        }
    }
}
