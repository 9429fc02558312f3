//! User Interface layer for basket
//!
//! - Theme definitions and colors
//! - Reusable widgets (popups, status bar, spinner)
//! - Main render function

pub mod render;
pub mod theme;
pub mod widgets;

pub use render::render;
pub use theme::Theme;
