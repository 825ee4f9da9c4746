//! Per-node renderers for the graph's retained nodes.

mod common;

pub mod grid;
pub mod line;
pub mod noise;

pub use grid::GridRenderer;
pub use line::LineRenderer;
pub use noise::NoiseRenderer;
