//! Instanced rectangle canvas
//!
//! Rectangles are queued on the CPU with [`Canvas::draw_rect`] and drawn in a
//! single instanced pass by [`Canvas::present`].

use crate::context::{RenderContext, RenderError};
use bytemuck::{Pod, Zeroable};
use nasr_core::{Color, Rect};
use wgpu::util::DeviceExt;

const INITIAL_CAPACITY: usize = 64;

/// Screen dimensions for the pixel-to-NDC transform
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct CanvasUniforms {
    pub screen_size: [f32; 2],
    pub _pad: [f32; 2],
}

/// Per-rectangle instance data
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RectInstance {
    pub position: [f32; 2],
    pub size: [f32; 2],
    /// Linear-space RGBA
    pub color: [f32; 4],
}

impl RectInstance {
    const ATTRIBS: [wgpu::VertexAttribute; 3] =
        wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<RectInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBS,
        }
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Convert an sRGB color to the linear values an sRGB surface expects
pub fn to_linear(color: Color) -> [f32; 4] {
    [
        srgb_to_linear(color.r),
        srgb_to_linear(color.g),
        srgb_to_linear(color.b),
        color.a,
    ]
}

/// CPU-side queue of rectangles for the next frame
#[derive(Debug, Default, Clone)]
pub struct RectBatch {
    instances: Vec<RectInstance>,
}

impl RectBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a rectangle. Empty rectangles are dropped.
    pub fn push(&mut self, rect: Rect, color: Color) -> bool {
        if rect.is_empty() {
            return false;
        }
        self.instances.push(RectInstance {
            position: [rect.x, rect.y],
            size: [rect.width, rect.height],
            color: to_linear(color),
        });
        true
    }

    pub fn instances(&self) -> &[RectInstance] {
        &self.instances
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    pub fn clear(&mut self) {
        self.instances.clear();
    }
}

/// The rectangle pipeline plus its per-frame buffers
pub struct Canvas {
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    batch: RectBatch,
    clear: Color,
}

impl Canvas {
    pub fn new(context: &RenderContext) -> Self {
        let device = &context.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Rect Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("rect_shader.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("Canvas Bind Group Layout"),
        });

        let uniforms = CanvasUniforms {
            screen_size: [context.config.width as f32, context.config.height as f32],
            _pad: [0.0; 2],
        };
        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Canvas Uniform Buffer"),
            contents: bytemuck::cast_slice(&[uniforms]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("Canvas Bind Group"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Rect Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Rect Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_rect"),
                buffers: &[RectInstance::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_rect"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: context.format(),
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let instance_buffer = create_instance_buffer(device, INITIAL_CAPACITY);

        Self {
            pipeline,
            uniform_buffer,
            bind_group,
            instance_buffer,
            instance_capacity: INITIAL_CAPACITY,
            batch: RectBatch::new(),
            clear: Color::BLACK,
        }
    }

    /// Set the color the next frame is cleared to
    pub fn clear_color(&mut self, color: Color) {
        self.clear = color;
    }

    /// Queue a rectangle in pixel coordinates (top-left origin)
    pub fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.batch.push(rect, color);
    }

    /// Rectangles queued for the next `present`
    pub fn rect_count(&self) -> usize {
        self.batch.len()
    }

    /// Draw the queued rectangles to the surface and clear the batch
    pub fn present(&mut self, context: &RenderContext) -> Result<(), RenderError> {
        let clear = self.clear;
        let mut batch = std::mem::take(&mut self.batch);
        let result = self.present_batch(context, &mut batch, clear);
        self.batch = batch;
        result
    }

    /// Draw a batch queued outside the canvas, then clear it
    pub fn present_batch(
        &mut self,
        context: &RenderContext,
        batch: &mut RectBatch,
        clear: Color,
    ) -> Result<(), RenderError> {
        let output = match context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                context.reconfigure();
                batch.clear();
                return Ok(());
            }
            Err(e) => {
                batch.clear();
                return Err(RenderError::SurfaceError(e.to_string()));
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.encode(context, &view, batch.instances(), clear);
        output.present();
        batch.clear();
        Ok(())
    }

    fn encode(
        &mut self,
        context: &RenderContext,
        view: &wgpu::TextureView,
        instances: &[RectInstance],
        clear: Color,
    ) {
        let device = &context.device;
        let queue = &context.queue;

        let uniforms = CanvasUniforms {
            screen_size: [context.config.width as f32, context.config.height as f32],
            _pad: [0.0; 2],
        };
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[uniforms]));

        let count = instances.len();
        if count > self.instance_capacity {
            self.instance_capacity = count.next_power_of_two();
            self.instance_buffer = create_instance_buffer(device, self.instance_capacity);
        }
        if count > 0 {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Canvas Encoder"),
        });

        {
            let [r, g, b, a] = to_linear(clear);
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Canvas Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            if count > 0 {
                render_pass.set_pipeline(&self.pipeline);
                render_pass.set_bind_group(0, &self.bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.instance_buffer.slice(..));
                render_pass.draw(0..6, 0..count as u32);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Rect Instance Buffer"),
        size: (capacity * std::mem::size_of::<RectInstance>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
