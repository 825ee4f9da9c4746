use bytemuck::{Pod, Zeroable};

use crate::coords::Rect;
use crate::render::{RenderCtx, RenderTarget};
use crate::scene::BackgroundNode;

use super::common::{premul_alpha_blend, ubo_min_binding_size};

/// Noise cell pitch in logical pixels.
const NOISE_CELL: f32 = 2.0;

/// Backdrop renderer: one quad filled with procedural value noise.
///
/// The fragment shader hashes the framebuffer cell index and mixes the
/// node's two tones, so no texture is involved and the pattern is stable
/// frame to frame. Cells are scaled by the DPI factor to keep their logical
/// size constant.
pub struct NoiseRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    bind_group_layout: Option<wgpu::BindGroupLayout>,
    bind_group: Option<wgpu::BindGroup>,
    ubo: Option<wgpu::Buffer>,
    written_uniforms: Option<NoiseUniforms>,

    quad_vbo: Option<wgpu::Buffer>,
    quad_written: bool,
}

impl NoiseRenderer {
    pub fn new() -> Self {
        Self {
            pipeline_format: None,
            pipeline: None,
            bind_group_layout: None,
            bind_group: None,
            ubo: None,
            written_uniforms: None,
            quad_vbo: None,
            quad_written: false,
        }
    }

    /// Renders `node` into `target`. Draws nothing while the rect is empty.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        node: &mut BackgroundNode,
    ) {
        self.ensure_pipeline(ctx);
        self.ensure_bindings(ctx);

        let rect_dirty = node.take_rect_dirty();
        let rect = node.rect();
        if rect.is_empty() {
            return;
        }

        if rect_dirty || !self.quad_written {
            self.write_quad(ctx, rect);
        }
        self.write_uniforms(ctx, node);

        let Some(pipeline) = self.pipeline.as_ref() else { return };
        let Some(bind_group) = self.bind_group.as_ref() else { return };
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("seismo noise pass"),
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
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, quad_vbo.slice(..));
        rpass.draw(0..4, 0..1);
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) {
        if self.pipeline_format == Some(ctx.surface_format) && self.pipeline.is_some() {
            return;
        }

        let shader_src = include_str!("shaders/noise.wgsl");
        let shader = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("seismo noise shader"),
            source: wgpu::ShaderSource::Wgsl(shader_src.into()),
        });

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("seismo noise bgl"),
                    entries: &[wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                        ty: wgpu::BindingType::Buffer {
                            ty: wgpu::BufferBindingType::Uniform,
                            has_dynamic_offset: false,
                            min_binding_size: Some(ubo_min_binding_size::<NoiseUniforms>()),
                        },
                        count: None,
                    }],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("seismo noise pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    // Newer wgpu uses immediate constants; keep disabled.
                    immediate_size: 0,
                });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("seismo noise pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
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
                topology: wgpu::PrimitiveTopology::TriangleStrip,
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

        log::debug!("noise pipeline created for {:?}", ctx.surface_format);

        self.pipeline_format = Some(ctx.surface_format);
        self.pipeline = Some(pipeline);
        self.bind_group_layout = Some(bind_group_layout);

        self.bind_group = None;
        self.ubo = None;
        self.written_uniforms = None;
    }

    fn ensure_bindings(&mut self, ctx: &RenderCtx<'_>) {
        if self.bind_group.is_some() && self.ubo.is_some() {
            return;
        }
        let Some(bgl) = self.bind_group_layout.as_ref() else { return };

        let ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("seismo noise ubo"),
            size: std::mem::size_of::<NoiseUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("seismo noise bind group"),
            layout: bgl,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: ubo.as_entire_binding(),
            }],
        });

        self.ubo = Some(ubo);
        self.bind_group = Some(bind_group);
    }

    fn write_quad(&mut self, ctx: &RenderCtx<'_>, rect: Rect) {
        if self.quad_vbo.is_none() {
            self.quad_vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
                label: Some("seismo noise quad vbo"),
                size: (4 * std::mem::size_of::<QuadVertex>()) as u64,
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                mapped_at_creation: false,
            }));
        }
        let Some(quad_vbo) = self.quad_vbo.as_ref() else { return };

        let (min, max) = (rect.min(), rect.max());
        let corners = [
            QuadVertex { pos: [min.x, min.y] },
            QuadVertex { pos: [max.x, min.y] },
            QuadVertex { pos: [min.x, max.y] },
            QuadVertex { pos: [max.x, max.y] },
        ];
        ctx.queue.write_buffer(quad_vbo, 0, bytemuck::cast_slice(&corners));
        self.quad_written = true;
    }

    fn write_uniforms(&mut self, ctx: &RenderCtx<'_>, node: &BackgroundNode) {
        let Some(ubo) = self.ubo.as_ref() else { return };

        let uniforms = NoiseUniforms {
            viewport: [ctx.viewport.width.max(1.0), ctx.viewport.height.max(1.0)],
            cell: NOISE_CELL * ctx.scale_factor.max(1.0),
            _pad: 0.0,
            tone_dark: node.tone_dark().to_array(),
            tone_light: node.tone_light().to_array(),
        };
        if self.written_uniforms == Some(uniforms) {
            return;
        }
        ctx.queue.write_buffer(ubo, 0, bytemuck::bytes_of(&uniforms));
        self.written_uniforms = Some(uniforms);
    }
}

impl Default for NoiseRenderer {
    fn default() -> Self {
        Self::new()
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
struct NoiseUniforms {
    viewport: [f32; 2],
    cell: f32,
    _pad: f32,
    tone_dark: [f32; 4],
    tone_light: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    pos: [f32; 2], // logical px
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}
