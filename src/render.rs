use std::borrow::Cow;

use glam::{Mat4, Vec3, Vec4};
use log::warn;
use sphere_swarm::{Icosphere, InstanceSink, OrbitCamera, Presentation};
use wgpu::util::DeviceExt;

use crate::gpu::GpuContext;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};

/// Light traveling straight down.
const LIGHT_DIRECTION: Vec3 = Vec3::NEG_Y;
const LIGHT_INTENSITY: f32 = 2.0;

#[repr(C)]
#[derive(bytemuck::Pod, bytemuck::Zeroable, Clone, Copy)]
struct SceneUniform {
    view_proj: Mat4,
    light: Vec4,
}

pub struct RenderModule {
    scene_buffer: wgpu::Buffer,
    vertices_buffer: wgpu::Buffer,
    indices_buffer: wgpu::Buffer,
    index_count: u32,

    matrix_buffer: wgpu::Buffer,
    color_buffer: wgpu::Buffer,

    depth_view: wgpu::TextureView,

    bind_group: wgpu::BindGroup,
    pipeline: wgpu::RenderPipeline,
}

impl RenderModule {
    pub fn new(
        gpu: &GpuContext,
        mesh: &Icosphere,
        max_instances: usize,
    ) -> Self {
        let device = &gpu.device;
        let shader_module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: None,
            source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(include_str!("render.wgsl"))),
        });

        let scene_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Scene Uniform Buffer"),
            size: std::mem::size_of::<SceneUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let vertices_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Vertices"),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Sphere Indices"),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        // never zero sized, an empty swarm still binds valid buffers
        let instances = max_instances.max(1) as u64;
        let matrix_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Matrices"),
            size: std::mem::size_of::<Mat4>() as u64 * instances,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let color_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Colors"),
            size: std::mem::size_of::<Vec4>() as u64 * instances,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: None,
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: scene_buffer.as_entire_binding(),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("render"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: None,
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vertex",
                buffers: &[
                    wgpu::VertexBufferLayout {
                        array_stride: 3 * 4,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: 16 * 4,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![1 => Float32x4, 2 => Float32x4, 3 => Float32x4, 4 => Float32x4],
                    },
                    wgpu::VertexBufferLayout {
                        array_stride: 4 * 4,
                        step_mode: wgpu::VertexStepMode::Instance,
                        attributes: &wgpu::vertex_attr_array![5 => Float32x4],
                    },
                ],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fragment",
                targets: &[Some(gpu.config.format.into())],
            }),
            primitive: wgpu::PrimitiveState {
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        Self {
            scene_buffer,
            vertices_buffer,
            indices_buffer,
            index_count: mesh.indices.len() as u32,

            matrix_buffer,
            color_buffer,

            depth_view: create_depth_view(device, gpu.config.width, gpu.config.height),

            bind_group,
            pipeline,
        }
    }

    pub fn update_size(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }

        self.depth_view = create_depth_view(device, width, height);
    }

    pub fn update_camera(&self, queue: &wgpu::Queue, camera: &OrbitCamera) {
        let scene = SceneUniform {
            view_proj: camera.view_projection(),
            light: LIGHT_DIRECTION.extend(LIGHT_INTENSITY),
        };
        queue.write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&scene));
    }

    pub fn begin_pass<'a>(
        &'a self,
        encoder: &'a mut wgpu::CommandEncoder,
        view: &'a wgpu::TextureView,
        num_instances: u32,
    ) -> wgpu::RenderPass<'a> {
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: None,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        if num_instances > 0 {
            rpass.set_pipeline(&self.pipeline);
            rpass.set_bind_group(0, &self.bind_group, &[]);
            rpass.set_vertex_buffer(0, self.vertices_buffer.slice(..));
            rpass.set_vertex_buffer(1, self.matrix_buffer.slice(..));
            rpass.set_vertex_buffer(2, self.color_buffer.slice(..));
            rpass.set_index_buffer(self.indices_buffer.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..self.index_count, 0, 0..num_instances);
        }

        rpass
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let texture = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("Depth Texture"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });

    texture.create_view(&wgpu::TextureViewDescriptor::default())
}

/// One frame's view of the GPU, handed to the render loop.
pub struct FrameTarget<'f, 'w> {
    pub gpu: &'f GpuContext<'w>,
    pub render_module: &'f RenderModule,
}

impl InstanceSink for FrameTarget<'_, '_> {
    type Error = wgpu::SurfaceError;

    fn write_matrices(&mut self, matrices: &[Mat4]) {
        if !matrices.is_empty() {
            self.gpu.queue.write_buffer(
                &self.render_module.matrix_buffer,
                0,
                bytemuck::cast_slice(matrices),
            );
        }
    }

    fn write_colors(&mut self, colors: &[Vec4]) {
        if !colors.is_empty() {
            self.gpu.queue.write_buffer(
                &self.render_module.color_buffer,
                0,
                bytemuck::cast_slice(colors),
            );
        }
    }

    fn submit(&mut self, instance_count: u32) -> Result<Presentation, wgpu::SurfaceError> {
        let frame = match self.gpu.surface.get_current_texture() {
            Ok(frame) => frame,
            // the window changed under us or the compositor is slow, try again next frame
            Err(e @ (wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Timeout)) => {
                warn!("Skipping frame: {e}");
                self.gpu.reconfigure_surface();
                return Ok(Presentation::Skipped);
            }
            Err(e) => return Err(e),
        };

        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });

        self.render_module
            .begin_pass(&mut encoder, &view, instance_count);

        self.gpu.queue.submit(Some(encoder.finish()));
        frame.present();

        Ok(Presentation::Presented)
    }
}
