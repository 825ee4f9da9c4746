//! Paint model shared between the scene and renderers.
//!
//! Scope:
//! - color representation (premultiplied alpha)
//!
//! Geometry types remain in `coords`.

pub mod color;

pub use color::Color;
