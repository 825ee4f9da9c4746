//! Shared GPU types and utilities used by the node renderers.

use glam::Mat4;

use crate::coords::Viewport;
use crate::render::RenderCtx;
use crate::scene::{GeometryNode, GridVertex, LineVertex, Topology};

// ── blend ─────────────────────────────────────────────────────────────────

pub(super) fn premul_alpha_blend() -> wgpu::BlendState {
    wgpu::BlendState {
        color: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
        alpha: wgpu::BlendComponent {
            src_factor: wgpu::BlendFactor::One,
            dst_factor: wgpu::BlendFactor::OneMinusSrcAlpha,
            operation: wgpu::BlendOperation::Add,
        },
    }
}

// ── topology ──────────────────────────────────────────────────────────────

pub(super) fn primitive_topology(topology: Topology) -> wgpu::PrimitiveTopology {
    match topology {
        Topology::LineList => wgpu::PrimitiveTopology::LineList,
        Topology::TriangleStrip => wgpu::PrimitiveTopology::TriangleStrip,
    }
}

// ── vertex layouts ────────────────────────────────────────────────────────

const GRID_VERTEX_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

pub(super) fn grid_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<GridVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &GRID_VERTEX_ATTRS,
    }
}

const LINE_VERTEX_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32];

pub(super) fn line_vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<LineVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &LINE_VERTEX_ATTRS,
    }
}

// ── uniforms ──────────────────────────────────────────────────────────────

/// Minimum binding size for a uniform struct `T`.
///
/// Centralising this avoids `.unwrap()` at each renderer's pipeline-creation
/// site; uniform structs are non-empty by construction.
pub(super) fn ubo_min_binding_size<T>() -> std::num::NonZeroU64 {
    std::num::NonZeroU64::new(std::mem::size_of::<T>() as u64)
        .expect("uniform structs have non-zero size by construction")
}

/// Orthographic logical-px to NDC matrix (top-left origin, +Y down).
pub(super) fn ortho_transform(viewport: Viewport) -> Mat4 {
    Mat4::orthographic_rh(
        0.0,
        viewport.width.max(1.0),
        viewport.height.max(1.0),
        0.0,
        -1.0,
        1.0,
    )
}

// ── node vertex buffers ───────────────────────────────────────────────────

/// Grow-on-demand vertex buffer mirroring one geometry node.
///
/// Uploads happen only when the node reports fresh geometry or the buffer
/// does not exist yet. Capacity grows in powers of two and never shrinks.
pub(super) struct NodeVbo {
    label: &'static str,
    buffer: Option<wgpu::Buffer>,
    capacity: u64,
    vertex_count: u32,
}

impl NodeVbo {
    pub(super) fn new(label: &'static str) -> Self {
        Self {
            label,
            buffer: None,
            capacity: 0,
            vertex_count: 0,
        }
    }

    /// Mirrors `node` into GPU memory, consuming its dirty flag.
    ///
    /// Returns `true` when there is something to draw.
    pub(super) fn sync(&mut self, ctx: &RenderCtx<'_>, node: &mut dyn GeometryNode) -> bool {
        let dirty = node.take_geometry_dirty();
        self.sync_with(ctx, node, dirty)
    }

    /// Same as [`sync`](Self::sync) with the dirty decision made by the
    /// caller. Used where one upload serves several nodes.
    pub(super) fn sync_with(
        &mut self,
        ctx: &RenderCtx<'_>,
        node: &dyn GeometryNode,
        dirty: bool,
    ) -> bool {
        self.vertex_count = node.vertex_count() as u32;

        let bytes = node.vertex_bytes();
        if bytes.is_empty() {
            return false;
        }

        if dirty || self.buffer.is_none() {
            self.upload(ctx, bytes);
        }
        self.buffer.is_some()
    }

    fn upload(&mut self, ctx: &RenderCtx<'_>, bytes: &[u8]) {
        let needed = bytes.len() as u64;
        if self.buffer.is_none() || self.capacity < needed {
            let capacity = needed.next_power_of_two().max(256);
            self.buffer = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some(self.label),
                size: capacity,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
            self.capacity = capacity;
        }
        if let Some(buffer) = self.buffer.as_ref() {
            ctx.queue.write_buffer(buffer, 0, bytes);
        }
    }

    #[inline]
    pub(super) fn buffer(&self) -> Option<&wgpu::Buffer> {
        self.buffer.as_ref()
    }

    #[inline]
    pub(super) fn vertex_count(&self) -> u32 {
        self.vertex_count
    }
}
