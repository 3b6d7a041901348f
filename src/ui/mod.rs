//! UI module - GPUI views and components
//!
//! This module contains all UI-related code:
//! - `components/` - The converter view and its pieces (list, header, status bar)
//! - `theme` - OS-aware light and dark mode color schemes

pub mod components;
pub mod theme;

pub use theme::Theme;
