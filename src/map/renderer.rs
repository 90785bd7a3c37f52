use crate::braille::BrailleCanvas;
use crate::capabilities::Capabilities;
use crate::map::airports::AirportLayer;
use crate::map::base::BaseLayer;
use crate::map::projection::Viewport;
use crate::map::states::StateLayer;
use tracing::{debug, warn};

/// Data attribution shown under the map
pub const ATTRIBUTION: &str =
    "Airport & Traffic Control Towers Data © US Government | US States Boundaries © Mike Bostock of D3";
/// Map author credit, shown after the base layer's attribution
pub const AUTHOR_CREDIT: &str = "Made By Catharina Depari";

/// Holder for a layer that arrives asynchronously
pub enum LayerSlot<T> {
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> LayerSlot<T> {
    /// Attach a finished layer. Only the first result is kept, whatever order
    /// the loads complete in; returns whether this call attached it.
    pub fn attach(&mut self, layer: T) -> bool {
        match self {
            LayerSlot::Loading => {
                *self = LayerSlot::Ready(layer);
                true
            }
            _ => false,
        }
    }

    /// Record a failed load, unless a layer is already attached
    pub fn fail(&mut self, reason: String) -> bool {
        match self {
            LayerSlot::Loading => {
                *self = LayerSlot::Failed(reason);
                true
            }
            _ => false,
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            LayerSlot::Ready(layer) => Some(layer),
            _ => None,
        }
    }

    pub fn ready_mut(&mut self) -> Option<&mut T> {
        match self {
            LayerSlot::Ready(layer) => Some(layer),
            _ => None,
        }
    }

    /// Short status for the status bar
    pub fn status(&self) -> &'static str {
        match self {
            LayerSlot::Loading => "loading",
            LayerSlot::Ready(_) => "ready",
            LayerSlot::Failed(_) => "failed",
        }
    }
}

impl<T> Default for LayerSlot<T> {
    fn default() -> Self {
        LayerSlot::Loading
    }
}

/// Display settings for map layers
#[derive(Clone)]
pub struct DisplaySettings {
    pub show_base: bool,
    pub show_states: bool,
    pub show_airports: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_base: true,
            show_states: true,
            show_airports: true,
        }
    }
}

/// Owns the base layer and both feature layers, and composites them
pub struct MapRenderer {
    base: BaseLayer,
    pub states: LayerSlot<StateLayer>,
    pub airports: LayerSlot<AirportLayer>,
    pub settings: DisplaySettings,
}

impl MapRenderer {
    pub fn new(base: BaseLayer) -> Self {
        Self {
            base,
            states: LayerSlot::Loading,
            airports: LayerSlot::Loading,
            settings: DisplaySettings::default(),
        }
    }

    pub fn base(&self) -> &BaseLayer {
        &self.base
    }

    /// Replace the base layer; there is only ever one
    pub fn set_base_layer(&mut self, base: BaseLayer) {
        debug!(name = %base.name, "base layer set");
        self.base = base;
    }

    pub fn attach_states(&mut self, layer: StateLayer) {
        if !self.states.attach(layer) {
            warn!("state layer already attached, ignoring");
        }
    }

    pub fn attach_airports(&mut self, layer: AirportLayer) {
        if !self.airports.attach(layer) {
            warn!("airport layer already attached, ignoring");
        }
    }

    /// Full attribution line: data sources, the base layer, then the author
    pub fn attribution(&self) -> String {
        format!("{} | {} | {}", ATTRIBUTION, self.base.attribution, AUTHOR_CREDIT)
    }

    /// Render all layers, bottom to top: base, states, airports
    pub fn render(
        &self,
        width: usize,
        height: usize,
        viewport: &Viewport,
        caps: &Capabilities,
    ) -> BrailleCanvas {
        let mut canvas = BrailleCanvas::new(width, height);

        if self.settings.show_base {
            self.base.render(&mut canvas, viewport);
        }

        if self.settings.show_states {
            if let Some(states) = self.states.ready() {
                states.render(&mut canvas, viewport, self.base.background);
            }
        }

        if self.settings.show_airports {
            if let Some(airports) = self.airports.ready() {
                airports.render(&mut canvas, viewport, caps.marker_glyph());
            }
        }

        canvas
    }

    pub fn toggle_base(&mut self) {
        self.settings.show_base = !self.settings.show_base;
    }

    pub fn toggle_states(&mut self) {
        self.settings.show_states = !self.settings.show_states;
    }

    pub fn toggle_airports(&mut self) {
        self.settings.show_airports = !self.settings.show_airports;
    }
}
