//! State polygons: density fill, popups and hover highlighting.
//!
//! Each feature is a two-state machine driven by pointer events:
//!
//! ```text
//!            Enter                 Exit
//!   Normal ─────────▶ Highlighted ─────▶ Normal
//!   Normal ◀─┐ Click (no-op)
//!            └──────
//! ```
//!
//! Leaving the highlighted state rebuilds the resting style from the feature's
//! own airport count, so any number of hover cycles ends in the same style.

use crate::braille::BrailleCanvas;
use crate::capabilities::Capabilities;
use crate::color::Rgb;
use crate::data::StateRecord;
use crate::map::geometry::{bounding_box, fill_rings, rings_contain, stroke_path, DashArray, Stroke};
use crate::map::popup::Popup;
use crate::map::projection::Viewport;
use crate::theme::Theme;
use glam::DVec2;
use std::sync::Arc;

/// Stroke width of a resting state
pub const RESTING_WEIGHT: u8 = 3;
/// Stroke width of a hovered state
pub const HIGHLIGHT_WEIGHT: u8 = 5;
pub const FILL_OPACITY: f64 = 0.7;
pub const RESTING_DASH: DashArray = DashArray::uniform(4);

/// Visual style of one polygon
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PathStyle {
    pub fill_color: Rgb,
    pub fill_opacity: f64,
    /// Stroke width in screen pixels
    pub weight: u8,
    pub color: Rgb,
    pub opacity: f64,
    pub dash_array: Option<DashArray>,
}

impl PathStyle {
    /// Style of a state that is not hovered, from its airport count alone
    pub fn resting(airport_count: i64, theme: &Theme) -> Self {
        Self {
            fill_color: theme.density_color(airport_count),
            fill_opacity: FILL_OPACITY,
            weight: RESTING_WEIGHT,
            color: theme.stroke,
            opacity: 1.0,
            dash_array: Some(RESTING_DASH),
        }
    }

    /// This style with the hover emphasis applied; the fill is kept
    pub fn highlighted(self, theme: &Theme) -> Self {
        Self {
            weight: HIGHLIGHT_WEIGHT,
            color: theme.highlight,
            dash_array: None,
            fill_opacity: FILL_OPACITY,
            ..self
        }
    }

    /// Canvas stroke: a pen dot for every started three pixels of weight
    pub fn stroke(&self, background: Rgb) -> Stroke {
        Stroke {
            color: self.color.blend(background, self.opacity),
            thickness: i32::from(self.weight.div_ceil(3)).max(1),
            dash: self.dash_array,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Interaction {
    #[default]
    Normal,
    Highlighted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    Enter,
    Exit,
    Click,
}

/// One rendered state
#[derive(Clone, Debug)]
pub struct StateFeature {
    pub record: StateRecord,
    pub style: PathStyle,
    pub interaction: Interaction,
    pub popup: Popup,
    bbox: (DVec2, DVec2),
}

impl StateFeature {
    pub fn new(record: StateRecord, theme: &Theme) -> Self {
        let bbox = bounding_box(&record.rings).unwrap_or((DVec2::ZERO, DVec2::ZERO));
        let popup = Popup::new((bbox.0 + bbox.1) / 2.0)
            .section("Name of the State", record.name.clone())
            .section("Number of Airports", record.airport_count.to_string());

        Self {
            style: PathStyle::resting(i64::from(record.airport_count), theme),
            interaction: Interaction::Normal,
            popup,
            bbox,
            record,
        }
    }

    /// Apply a pointer event and return the resulting state
    pub fn handle(&mut self, event: PointerEvent, theme: &Theme) -> Interaction {
        let resting = PathStyle::resting(i64::from(self.record.airport_count), theme);
        match event {
            PointerEvent::Enter => {
                self.style = resting.highlighted(theme);
                self.interaction = Interaction::Highlighted;
            }
            PointerEvent::Exit => {
                self.style = resting;
                self.interaction = Interaction::Normal;
            }
            // Reserved for zoom-to-feature
            PointerEvent::Click => {}
        }
        self.interaction
    }

    /// Whether a (lon, lat) position falls inside the state
    pub fn contains(&self, position: DVec2) -> bool {
        let (min, max) = self.bbox;
        position.cmpge(min).all() && position.cmple(max).all() && rings_contain(&self.record.rings, position)
    }

    fn render(&self, canvas: &mut BrailleCanvas, viewport: &Viewport, background: Rgb) {
        if !viewport.bbox_might_be_visible(self.bbox.0, self.bbox.1) {
            return;
        }

        let projected: Vec<Vec<DVec2>> = self
            .record
            .rings
            .iter()
            .map(|ring| ring.iter().map(|p| viewport.project_f64(p.x, p.y)).collect())
            .collect();
        fill_rings(
            canvas,
            &projected,
            self.style.fill_color.blend(background, self.style.fill_opacity),
        );

        let stroke = self.style.stroke(background);
        for ring in &projected {
            let mut points: Vec<(i32, i32)> = ring
                .iter()
                .map(|p| (p.x.floor() as i32, p.y.floor() as i32))
                .collect();
            if let Some(&first) = points.first() {
                points.push(first);
            }
            stroke_path(canvas, &points, stroke, viewport.width as i32);
        }
    }
}

/// All states plus their draw order (last is drawn on top)
pub struct StateLayer {
    features: Vec<StateFeature>,
    order: Vec<usize>,
    theme: Arc<Theme>,
    caps: Capabilities,
}

impl StateLayer {
    pub fn new(records: Vec<StateRecord>, theme: Arc<Theme>, caps: Capabilities) -> Self {
        let features: Vec<StateFeature> = records
            .into_iter()
            .map(|r| StateFeature::new(r, &theme))
            .collect();
        let order = (0..features.len()).collect();
        Self {
            features,
            order,
            theme,
            caps,
        }
    }

    pub fn feature(&self, idx: usize) -> Option<&StateFeature> {
        self.features.get(idx)
    }

    /// Feature indices from bottom to top
    pub fn draw_order(&self) -> &[usize] {
        &self.order
    }

    /// Deliver a pointer event to one feature. Entering also raises the
    /// feature to the top when the terminal supports it.
    pub fn dispatch(&mut self, idx: usize, event: PointerEvent) -> Option<Interaction> {
        let feature = self.features.get_mut(idx)?;
        let state = feature.handle(event, &self.theme);
        if event == PointerEvent::Enter && self.caps.bring_to_front {
            self.bring_to_front(idx);
        }
        Some(state)
    }

    pub fn bring_to_front(&mut self, idx: usize) {
        if let Some(pos) = self.order.iter().position(|&i| i == idx) {
            let idx = self.order.remove(pos);
            self.order.push(idx);
        }
    }

    /// Topmost feature containing a (lon, lat) position
    pub fn feature_at(&self, position: DVec2) -> Option<usize> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|&idx| self.features[idx].contains(position))
    }

    /// Fill and stroke every visible state, bottom to top
    pub fn render(&self, canvas: &mut BrailleCanvas, viewport: &Viewport, background: Rgb) {
        for &idx in &self.order {
            self.features[idx].render(canvas, viewport, background);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, count: u32, x0: f64, y0: f64) -> StateRecord {
        StateRecord {
            name: name.to_string(),
            airport_count: count,
            rings: vec![vec![
                DVec2::new(x0, y0),
                DVec2::new(x0 + 4.0, y0),
                DVec2::new(x0 + 4.0, y0 + 4.0),
                DVec2::new(x0, y0 + 4.0),
                DVec2::new(x0, y0),
            ]],
        }
    }

    fn layer(caps: Capabilities) -> StateLayer {
        let records = vec![
            record("Kansas", 45, -100.0, 37.0),
            record("Nebraska", 0, -100.0, 41.0),
            // Overlaps Kansas' north-east corner
            record("Iowa", 61, -97.0, 40.0),
        ];
        StateLayer::new(records, Arc::new(Theme::new()), caps)
    }

    #[test]
    fn test_resting_style() {
        let theme = Theme::new();
        let style = PathStyle::resting(45, &theme);
        assert_eq!(style.fill_color, theme.density[4]);
        assert_eq!(style.fill_opacity, 0.7);
        assert_eq!(style.weight, 3);
        assert_eq!(style.color, Rgb::WHITE);
        assert_eq!(style.dash_array, Some(DashArray::uniform(4)));
    }

    #[test]
    fn test_stroke_thickness() {
        let theme = Theme::new();
        let resting = PathStyle::resting(1, &theme);
        assert_eq!(resting.stroke(Rgb::WHITE).thickness, 1);
        assert_eq!(resting.highlighted(&theme).stroke(Rgb::WHITE).thickness, 2);
    }

    #[test]
    fn test_enter_and_exit() {
        let mut layer = layer(Capabilities::FULL);
        let theme = Theme::new();

        assert_eq!(layer.dispatch(0, PointerEvent::Enter), Some(Interaction::Highlighted));
        let style = layer.feature(0).unwrap().style;
        assert_eq!(style.weight, 5);
        assert_eq!(style.color, theme.highlight);
        assert_eq!(style.dash_array, None);
        assert_eq!(style.fill_color, theme.density[4]);

        assert_eq!(layer.dispatch(0, PointerEvent::Exit), Some(Interaction::Normal));
        assert_eq!(layer.feature(0).unwrap().style, PathStyle::resting(45, &theme));
    }

    #[test]
    fn test_hover_cycles_are_idempotent() {
        let mut cycled = layer(Capabilities::FULL);
        for _ in 0..5 {
            cycled.dispatch(2, PointerEvent::Enter);
            cycled.dispatch(2, PointerEvent::Enter);
            cycled.dispatch(2, PointerEvent::Exit);
        }
        let mut fresh = layer(Capabilities::FULL);
        fresh.dispatch(2, PointerEvent::Exit);
        assert_eq!(cycled.feature(2).unwrap().style, fresh.feature(2).unwrap().style);
        assert_eq!(cycled.feature(2).unwrap().interaction, Interaction::Normal);
    }

    #[test]
    fn test_click_is_noop() {
        let mut layer = layer(Capabilities::FULL);
        let before = layer.feature(1).unwrap().style;
        assert_eq!(layer.dispatch(1, PointerEvent::Click), Some(Interaction::Normal));
        assert_eq!(layer.feature(1).unwrap().style, before);
        assert_eq!(layer.draw_order(), &[0, 1, 2]);

        layer.dispatch(1, PointerEvent::Enter);
        layer.dispatch(1, PointerEvent::Click);
        assert_eq!(layer.feature(1).unwrap().interaction, Interaction::Highlighted);
    }

    #[test]
    fn test_enter_raises_to_front() {
        let mut layer = layer(Capabilities::FULL);
        layer.dispatch(0, PointerEvent::Enter);
        assert_eq!(layer.draw_order(), &[1, 2, 0]);
        // Kansas now wins the overlap with Iowa
        assert_eq!(layer.feature_at(DVec2::new(-96.5, 40.5)), Some(0));
    }

    #[test]
    fn test_raise_skipped_without_capability() {
        let caps = Capabilities {
            bring_to_front: false,
            ..Capabilities::FULL
        };
        let mut layer = layer(caps);
        layer.dispatch(0, PointerEvent::Enter);
        assert_eq!(layer.draw_order(), &[0, 1, 2]);
        assert_eq!(layer.feature(0).unwrap().interaction, Interaction::Highlighted);
    }

    #[test]
    fn test_feature_at() {
        let layer = layer(Capabilities::FULL);
        assert_eq!(layer.feature_at(DVec2::new(-98.0, 38.0)), Some(0));
        assert_eq!(layer.feature_at(DVec2::new(-98.0, 43.0)), Some(1));
        // Overlap goes to the later (upper) feature
        assert_eq!(layer.feature_at(DVec2::new(-96.5, 40.5)), Some(2));
        assert_eq!(layer.feature_at(DVec2::new(-120.0, 30.0)), None);
    }

    #[test]
    fn test_popup() {
        let layer = layer(Capabilities::FULL);
        let text = layer.feature(0).unwrap().popup.text();
        assert!(text.contains("Name of the State\nKansas"));
        assert!(text.contains("Number of Airports\n45"));
    }

    #[test]
    fn test_render_fills_with_bucket_color() {
        let layer = layer(Capabilities::FULL);
        let theme = Theme::new();
        let viewport = Viewport::new(-98.0, 39.0, 7, 80, 80);
        let mut canvas = BrailleCanvas::new(40, 20);
        layer.render(&mut canvas, &viewport, Rgb::WHITE);

        let p = viewport.project(-98.0, 39.0);
        let cell = canvas.cell((p.0 / 2) as usize, (p.1 / 4) as usize).unwrap();
        assert_eq!(cell.bg, Some(theme.density[4].blend(Rgb::WHITE, 0.7)));
    }
}
