//! GPU rendering subsystem.
//!
//! Renderers consume retained `scene` nodes and issue GPU commands via wgpu.
//! Each renderer owns its GPU resources (pipelines, buffers) and builds them
//! lazily against the current surface format.
//!
//! Convention:
//! - CPU geometry is in logical pixels (top-left origin, +Y down).
//! - Vertex shaders convert to NDC using a viewport (or transform) uniform.

mod ctx;
mod graph;
pub mod nodes;

pub use ctx::{RenderCtx, RenderTarget};
pub use graph::GraphRenderer;
