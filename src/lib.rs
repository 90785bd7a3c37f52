pub mod app;
pub mod braille;
pub mod capabilities;
pub mod color;
pub mod config;
pub mod data;
pub mod logging;
pub mod map;
pub mod theme;
pub mod ui;
