//! Scene core for the live sample graph.
//!
//! Responsibilities:
//! - own the rolling sample window and the per-pass dirty protocol
//! - turn rectangle + samples into GPU-ready vertex buffers
//! - hold line materials and their uniform wire format
//!
//! Everything here is CPU-side and deterministic; the `render` module consumes
//! these types and owns all wgpu state.

mod geometry;
mod graph;
mod material;
mod node;
mod observer;
mod samples;

pub use geometry::{GRID_STEP, GridVertex, LineVertex, Topology, grid_lines, line_strip};
pub use graph::{GraphNodes, GraphScene, GraphStyle, LineStyle};
pub use material::{LineMaterial, LineUniforms};
pub use node::{BackgroundNode, GeometryNode, GridNode, LineNode};
pub use observer::{PassObserver, Rebuild};
pub use samples::SampleBuffer;
