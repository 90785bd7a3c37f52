pub mod airports;
pub mod base;
pub mod controls;
pub mod geometry;
pub mod popup;
mod projection;
mod renderer;
pub mod states;

pub use airports::AirportLayer;
pub use base::BaseLayer;
pub use controls::{Legend, ScaleBar};
pub use popup::Popup;
pub use projection::{Viewport, DOTS_PER_TILE, MAX_LATITUDE};
pub use renderer::{LayerSlot, MapRenderer, ATTRIBUTION};
pub use states::{Interaction, PointerEvent, StateLayer};
