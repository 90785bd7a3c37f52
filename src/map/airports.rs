use crate::braille::BrailleCanvas;
use crate::color::Rgb;
use crate::data::AirportRecord;
use crate::map::popup::{format_number, Popup};
use crate::map::projection::Viewport;
use crate::theme::{tower_color_class, Theme};

/// An airport marker with its precomputed class, colour and popup
#[derive(Clone, Debug)]
pub struct AirportMarker {
    pub record: AirportRecord,
    /// Tower class: 0 = tower present
    pub class: usize,
    pub color: Rgb,
    pub popup: Popup,
}

impl AirportMarker {
    pub fn new(record: AirportRecord, theme: &Theme) -> Self {
        let class = tower_color_class(record.tower);
        let popup = Popup::new(record.position)
            .section("Airport Name", record.name.clone())
            .section("Passengers boarding by airlines", format_number(record.enplanements))
            .section("Elevation Above Sea Level", format_number(record.elevation));
        Self {
            color: theme.towers[class],
            class,
            popup,
            record,
        }
    }

    /// Character cell the marker occupies, if on the canvas
    fn cell(&self, viewport: &Viewport, canvas_width: usize, canvas_height: usize) -> Option<(usize, usize)> {
        let (px, py) = viewport.project(self.record.position.x, self.record.position.y);
        if px < 0 || py < 0 {
            return None;
        }
        let (cx, cy) = (px as usize / 2, py as usize / 4);
        (cx < canvas_width && cy < canvas_height).then_some((cx, cy))
    }
}

/// Airport point layer
pub struct AirportLayer {
    markers: Vec<AirportMarker>,
}

impl AirportLayer {
    pub fn new(records: Vec<AirportRecord>, theme: &Theme) -> Self {
        Self {
            markers: records.into_iter().map(|r| AirportMarker::new(r, theme)).collect(),
        }
    }

    pub fn markers(&self) -> &[AirportMarker] {
        &self.markers
    }

    /// Draw one glyph per marker; later markers cover earlier ones
    pub fn render(&self, canvas: &mut BrailleCanvas, viewport: &Viewport, glyph: char) {
        let (w, h) = (canvas.width(), canvas.height());
        for marker in &self.markers {
            if let Some((cx, cy)) = marker.cell(viewport, w, h) {
                canvas.put_glyph(cx, cy, glyph, marker.color);
            }
        }
    }

    /// Topmost marker drawn in a character cell
    pub fn marker_at(&self, viewport: &Viewport, cell: (usize, usize)) -> Option<&AirportMarker> {
        let (w, h) = (viewport.width.div_ceil(2), viewport.height.div_ceil(4));
        self.markers
            .iter()
            .rev()
            .find(|m| m.cell(viewport, w, h) == Some(cell))
    }
}
