//! Seismo engine crate.
//!
//! Runtime split:
//! - `device`: GPU device/queue/surface ownership (wgpu).
//! - `window`: window + event loop runtime (winit).
//! - `time`: frame clock.
//! - `core`: application trait and per-frame contexts.
//!
//! Graph stack:
//! - `coords`: logical-pixel geometry primitives.
//! - `paint`: premultiplied color.
//! - `scene`: sample window, dirty tracking, vertex builders, materials.
//! - `render`: node renderers that turn scene state into draw calls.

pub mod core;
pub mod device;
pub mod time;
pub mod window;

pub mod coords;
pub mod logging;
pub mod paint;
pub mod render;
pub mod scene;
