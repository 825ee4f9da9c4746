use std::num::NonZeroU64;

use crate::coords::Viewport;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::{GeometryNode, LineNode, LineUniforms};

use super::common::{
    NodeVbo, line_vertex_layout, ortho_transform, premul_alpha_blend, primitive_topology,
};

/// GPU-side size of [`LineUniforms`]: WGSL rounds the 92-byte struct up to a
/// 16-byte multiple. Only the first 92 bytes are ever written.
const LINE_UBO_SIZE: u64 = 96;

/// Renderer for the stroked line layers.
///
/// Layers draw in slice order within one pass. Two cooperating shortcuts:
/// - layers holding the same geometry snapshot share one vertex buffer, so
///   the bytes upload once and bind per draw;
/// - layers whose materials compare equal share one uniform block and bind
///   group, and adjacent equal draws skip rebinding entirely.
pub struct LineRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,
    bind_group_layout: Option<wgpu::BindGroupLayout>,

    slots: Vec<LineSlot>,
    written_viewport: Option<Viewport>,
}

/// Per-layer GPU state, index-aligned with the caller's layer order.
struct LineSlot {
    vbo: NodeVbo,
    ubo: Option<wgpu::Buffer>,
    bind_group: Option<wgpu::BindGroup>,
    block: LineUniforms,
    block_written: bool,
}

impl LineSlot {
    fn new() -> Self {
        Self {
            vbo: NodeVbo::new("seismo line vbo"),
            ubo: None,
            bind_group: None,
            block: LineUniforms::zeroed(),
            block_written: false,
        }
    }
}

impl LineRenderer {
    pub fn new() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            slots: Vec::new(),
            written_viewport: None,
        }
    }

    /// Renders `layers` into `target`, back to front in slice order.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        layers: &mut [&mut LineNode],
    ) {
        let Some(first) = layers.first() else { return };
        let topology = primitive_topology(first.topology());
        self.ensure_pipeline(ctx, topology);

        while self.slots.len() < layers.len() {
            self.slots.push(LineSlot::new());
        }

        // Geometry sync. A layer holding the snapshot of an earlier layer
        // draws from that layer's buffer; the group uploads at most once.
        let mut dirty = Vec::with_capacity(layers.len());
        let mut vbo_source = Vec::with_capacity(layers.len());
        for i in 0..layers.len() {
            dirty.push(layers[i].take_geometry_dirty());
            let leader = (0..i).find(|&j| layers[i].shares_geometry_with(layers[j]));
            vbo_source.push(leader.unwrap_or(i));
        }
        for i in 0..layers.len() {
            if vbo_source[i] == i {
                self.slots[i].vbo.sync_with(ctx, &*layers[i], dirty[i]);
            }
        }

        // Uniform sync. Materials are immutable, so a slot's block is filled
        // on first use and then only the transform part moves with the
        // viewport; a layer whose material compares equal to an earlier one
        // borrows that layer's bind group instead of owning a block.
        let viewport_changed = self.written_viewport != Some(ctx.viewport);
        let mut bind_source = Vec::with_capacity(layers.len());
        for i in 0..layers.len() {
            let leader =
                (0..i).find(|&j| layers[i].material().compare(layers[j].material()).is_eq());
            bind_source.push(leader.unwrap_or(i));
        }

        let transform = ortho_transform(ctx.viewport);
        for i in 0..layers.len() {
            if bind_source[i] != i {
                continue;
            }
            self.ensure_slot_bindings(ctx, i);

            let slot = &mut self.slots[i];
            let first_write = !slot.block_written;
            if first_write || viewport_changed {
                layers[i].material().write_uniforms(
                    &mut slot.block,
                    Some(&transform),
                    first_write.then_some(1.0),
                );
                if let Some(ubo) = slot.ubo.as_ref() {
                    ctx.queue.write_buffer(ubo, 0, slot.block.as_bytes());
                }
                slot.block_written = true;
            }
        }
        self.written_viewport = Some(ctx.viewport);

        let Some(pipeline) = self.pipeline.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("seismo line pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);

        let mut bound: Option<usize> = None;
        for i in 0..layers.len() {
            let vbo_slot = &self.slots[vbo_source[i]];
            let count = vbo_slot.vbo.vertex_count();
            if count == 0 {
                continue;
            }
            let Some(vbo) = vbo_slot.vbo.buffer() else { continue };

            if bound != Some(bind_source[i]) {
                let Some(bind_group) = self.slots[bind_source[i]].bind_group.as_ref() else {
                    continue;
                };
                rpass.set_bind_group(0, bind_group, &[]);
                bound = Some(bind_source[i]);
            }

            rpass.set_vertex_buffer(0, vbo.slice(..));
            rpass.draw(0..count, 0..1);
        }
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>, topology: wgpu::PrimitiveTopology) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader_src = include_str!("shaders/line.wgsl");
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("seismo line shader"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("seismo line bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(line_ubo_binding_size()),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("seismo line pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    // Newer wgpu uses immediate constants; keep disabled.
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("seismo line pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[line_vertex_layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: Some(premul_alpha_blend()),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),

            multiview_mask: None,
            cache: None,
        });

        log::debug!("line pipeline created for {:?}", ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        // Bind groups were built against the old layout.
        for slot in &mut self.slots {
            slot.ubo = None;
            slot.bind_group = None;
            slot.block_written = false;
        }
        self.written_viewport = None;
    }

    fn ensure_slot_bindings(&mut self, ctx: &RenderCtx<'_>, index: usize) {
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let slot = &mut self.slots[index];
        if slot.ubo.is_some() && slot.bind_group.is_some() {
            return;
        }

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("seismo line ubo"),
            size: LINE_UBO_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("seismo line bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        slot.ubo = Some(ubo);
        slot.bind_group = Some(bind_group);
    }
}

impl Default for LineRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn line_ubo_binding_size() -> NonZeroU64 {
    NonZeroU64::new(LINE_UBO_SIZE).expect("line uniform size is non-zero by construction")
}
