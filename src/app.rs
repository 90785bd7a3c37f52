use crate::capabilities::Capabilities;
use crate::config::MapOptions;
use crate::data::LoadEvent;
use crate::map::{
    AirportLayer, BaseLayer, Legend, MapRenderer, PointerEvent, Popup, StateLayer, Viewport,
};
use crate::theme::Theme;
use glam::DVec2;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Application state
pub struct App {
    pub viewport: Viewport,
    /// View restored by `reset_view`
    home: Viewport,
    pub map_renderer: MapRenderer,
    pub theme: Arc<Theme>,
    pub legend: Legend,
    pub caps: Capabilities,
    /// Open info box, at most one
    pub popup: Option<Popup>,
    /// State currently under the pointer
    pub hovered: Option<usize>,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position
    pub mouse_pos: Option<(u16, u16)>,
    /// Whether the pointer moved since the button went down
    drag_moved: bool,
}

/// Braille dots per character cell, horizontally and vertically
const CELL_DOTS: (usize, usize) = (2, 4);

/// Map area in dots for a terminal of `width` x `height` cells: two border
/// columns, two border rows and one status row are taken from the map.
fn map_dots(width: usize, height: usize) -> (usize, usize) {
    (
        width.saturating_sub(2) * CELL_DOTS.0,
        height.saturating_sub(3) * CELL_DOTS.1,
    )
}

impl App {
    pub fn new(width: usize, height: usize, options: &MapOptions, base: BaseLayer, caps: Capabilities) -> Self {
        let (dots_w, dots_h) = map_dots(width, height);
        let viewport = Viewport::new(options.center_lon, options.center_lat, options.zoom, dots_w, dots_h)
            .with_zoom_bounds(options.min_zoom, options.max_zoom);
        let theme = Arc::new(Theme::new());

        Self {
            home: viewport.clone(),
            viewport,
            map_renderer: MapRenderer::new(base),
            legend: Legend::new(&theme),
            theme,
            caps,
            popup: None,
            hovered: None,
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
            drag_moved: false,
        }
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        let (dots_w, dots_h) = map_dots(width, height);
        self.viewport.width = dots_w;
        self.viewport.height = dots_h;
        self.update_hover();
    }

    /// Attach (or record the failure of) a finished background load
    pub fn handle_load(&mut self, event: LoadEvent) {
        match event {
            LoadEvent::States(Ok(records)) => {
                info!(count = records.len(), "state layer ready");
                let layer = StateLayer::new(records, Arc::clone(&self.theme), self.caps);
                self.map_renderer.attach_states(layer);
                self.update_hover();
            }
            LoadEvent::States(Err(err)) => {
                warn!(error = %err, "state layer unavailable");
                self.map_renderer.states.fail(err.to_string());
            }
            LoadEvent::Airports(Ok(records)) => {
                info!(count = records.len(), "airport layer ready");
                let layer = AirportLayer::new(records, &self.theme);
                self.map_renderer.attach_airports(layer);
            }
            LoadEvent::Airports(Err(err)) => {
                warn!(error = %err, "airport layer unavailable");
                self.map_renderer.airports.fail(err.to_string());
            }
        }
    }

    /// Terminal cell to the dot at its center, if the cell is on the map
    pub fn pixel_at(&self, col: u16, row: u16) -> Option<(i32, i32)> {
        if col == 0 || row == 0 {
            return None;
        }
        let (cx, cy) = (col as usize - 1, row as usize - 1);
        if cx * CELL_DOTS.0 >= self.viewport.width || cy * CELL_DOTS.1 >= self.viewport.height {
            return None;
        }
        Some(((cx * 2 + 1) as i32, (cy * 4 + 2) as i32))
    }

    /// Terminal cell to (lon, lat)
    pub fn position_at(&self, col: u16, row: u16) -> Option<DVec2> {
        let (px, py) = self.pixel_at(col, row)?;
        let (lon, lat) = self.viewport.unproject(px, py);
        Some(DVec2::new(lon, lat))
    }

    /// Pan the map
    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
        self.update_hover();
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
        self.update_hover();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
        self.update_hover();
    }

    /// Zoom in towards a screen position (terminal column/row)
    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.pixel_at(col, row) {
            self.viewport.zoom_in_at(px, py);
            self.update_hover();
        }
    }

    /// Zoom out from a screen position (terminal column/row)
    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        if let Some((px, py)) = self.pixel_at(col, row) {
            self.viewport.zoom_out_at(px, py);
            self.update_hover();
        }
    }

    /// Back to the initial center and zoom
    pub fn reset_view(&mut self) {
        let (width, height) = (self.viewport.width, self.viewport.height);
        self.viewport = Viewport {
            width,
            height,
            ..self.home.clone()
        };
        self.popup = None;
        self.update_hover();
    }

    pub fn toggle_base(&mut self) {
        self.map_renderer.toggle_base();
    }

    pub fn toggle_states(&mut self) {
        self.map_renderer.toggle_states();
        self.update_hover();
    }

    pub fn toggle_airports(&mut self) {
        self.map_renderer.toggle_airports();
    }

    /// Request quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Escape closes the popup first, then quits
    pub fn escape(&mut self) {
        if self.popup.take().is_none() {
            self.quit();
        }
    }

    pub fn close_popup(&mut self) {
        self.popup = None;
    }

    /// Pointer moved over the terminal without a button held
    pub fn pointer_moved(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
        self.update_hover();
    }

    /// Pointer left the map
    pub fn pointer_left(&mut self) {
        self.mouse_pos = None;
        self.update_hover();
    }

    /// Send exit/enter to the states whose hover status changed
    fn update_hover(&mut self) {
        let target = if self.map_renderer.settings.show_states {
            self.mouse_pos
                .and_then(|(col, row)| self.position_at(col, row))
                .and_then(|p| self.map_renderer.states.ready()?.feature_at(p))
        } else {
            None
        };
        if target == self.hovered {
            return;
        }

        if let Some(states) = self.map_renderer.states.ready_mut() {
            if let Some(prev) = self.hovered {
                states.dispatch(prev, PointerEvent::Exit);
            }
            if let Some(next) = target {
                states.dispatch(next, PointerEvent::Enter);
            }
        }
        self.hovered = target;
    }

    /// Click at a terminal cell: an airport under the pointer wins over the
    /// state beneath it. Clicking empty map closes the popup.
    pub fn click(&mut self, col: u16, row: u16) {
        let Some((px, py)) = self.pixel_at(col, row) else {
            return;
        };
        let settings = self.map_renderer.settings.clone();

        if settings.show_airports {
            let cell = (px as usize / CELL_DOTS.0, py as usize / CELL_DOTS.1);
            let marker = self
                .map_renderer
                .airports
                .ready()
                .and_then(|layer| layer.marker_at(&self.viewport, cell));
            if let Some(marker) = marker {
                debug!(name = %marker.record.name, "airport popup");
                self.popup = Some(marker.popup.clone());
                return;
            }
        }

        if settings.show_states {
            let (lon, lat) = self.viewport.unproject(px, py);
            let position = DVec2::new(lon, lat);
            if let Some(states) = self.map_renderer.states.ready_mut() {
                if let Some(idx) = states.feature_at(position) {
                    states.dispatch(idx, PointerEvent::Click);
                    self.popup = states.feature(idx).map(|f| f.popup.anchored_at(position));
                    return;
                }
            }
        }

        self.popup = None;
    }

    pub fn mouse_down(&mut self, col: u16, row: u16) {
        self.last_mouse = Some((col, row));
        self.drag_moved = false;
    }

    /// Drag pans the map by whole cells
    pub fn handle_drag(&mut self, col: u16, row: u16) {
        if let Some((last_col, last_row)) = self.last_mouse {
            let dx = (last_col as i32 - col as i32) * CELL_DOTS.0 as i32;
            let dy = (last_row as i32 - row as i32) * CELL_DOTS.1 as i32;
            if dx != 0 || dy != 0 {
                self.drag_moved = true;
                self.pan(dx, dy);
            }
        }
        self.last_mouse = Some((col, row));
        self.mouse_pos = Some((col, row));
    }

    /// Button released: a press without movement is a click
    pub fn mouse_up(&mut self, col: u16, row: u16) {
        if self.last_mouse.is_some() && !self.drag_moved {
            self.click(col, row);
        }
        self.last_mouse = None;
        self.drag_moved = false;
    }

    /// Get current zoom level as a string
    pub fn zoom_level(&self) -> String {
        format!("{}", self.viewport.zoom)
    }

    /// Get current center coordinates as a string
    pub fn center_coords(&self) -> String {
        format!(
            "{:.2}°{}, {:.2}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }

    /// Name of the hovered state
    pub fn hovered_name(&self) -> Option<&str> {
        let states = self.map_renderer.states.ready()?;
        states.feature(self.hovered?).map(|f| f.record.name.as_str())
    }

    /// Load status of both feature layers
    pub fn layer_status(&self) -> String {
        format!(
            "states:{} airports:{}",
            self.map_renderer.states.status(),
            self.map_renderer.airports.status()
        )
    }
}
