//! Terminal UI module using ratatui.
//!
//! - `render`: frame layout, status bar and overlays
//! - `input`: keyboard handling
//! - `styles`: color palette and text styles
//! - `pages`: persons listing and person detail rendering

pub mod input;
pub mod pages;
pub mod render;
pub mod styles;
