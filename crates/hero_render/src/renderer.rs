//! wgpu implementation of [`Renderer`].

use std::sync::Arc;

use glam::Vec3;
use hero_core::scene::{MeshBundle, MeshPrimitive, ModelSlot, SceneGraph};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::backend::Renderer;
use crate::camera::PerspectiveCamera;
use crate::gpu_context::GpuContext;
use crate::mesh_pipeline::{FrameUniform, MeshPipeline, MeshUniform};
use crate::vertex::MeshVertex;

pub struct RendererConfig {
    pub antialias: bool,
    pub exposure: f32,
    pub clear_color: [f32; 4],
}

struct GpuPrimitive {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    base_color: [f32; 4],
}

struct GpuModel {
    primitives: Vec<GpuPrimitive>,
}

impl GpuModel {
    /// Free the GPU memory now rather than whenever the handles drop.
    fn destroy(self) {
        for primitive in self.primitives {
            primitive.vertex_buffer.destroy();
            primitive.index_buffer.destroy();
            primitive.uniform_buffer.destroy();
        }
    }
}

pub struct WgpuRenderer {
    gpu: GpuContext,
    pipeline: MeshPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    models: [Option<GpuModel>; 2],
    exposure: f32,
    clear_color: wgpu::Color,
    context_lost: bool,
    frames_rendered: u64,
}

impl WgpuRenderer {
    pub fn new(window: Arc<Window>, config: RendererConfig) -> Result<Self, String> {
        let gpu = GpuContext::new(window, config.antialias)?;
        let pipeline = MeshPipeline::new(&gpu.device, gpu.surface_format, gpu.sample_count);

        let frame_buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Hero Frame Uniform"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Hero Frame Bind Group"),
            layout: &pipeline.frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let [r, g, b, a] = config.clear_color;
        Ok(Self {
            gpu,
            pipeline,
            frame_buffer,
            frame_bind_group,
            models: [None, None],
            exposure: config.exposure,
            clear_color: wgpu::Color {
                r: r as f64,
                g: g as f64,
                b: b as f64,
                a: a as f64,
            },
            context_lost: false,
            frames_rendered: 0,
        })
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    fn upload_primitive(&self, slot: ModelSlot, primitive: &MeshPrimitive) -> Option<GpuPrimitive> {
        if primitive.positions.is_empty() {
            return None;
        }
        let has_normals = primitive.normals.len() == primitive.positions.len();
        let vertices: Vec<MeshVertex> = primitive
            .positions
            .iter()
            .enumerate()
            .map(|(i, p)| MeshVertex {
                position: p.to_array(),
                normal: if has_normals {
                    primitive.normals[i].to_array()
                } else {
                    Vec3::Y.to_array()
                },
            })
            .collect();
        let indices: Vec<u32> = if primitive.indices.is_empty() {
            (0..vertices.len() as u32).collect()
        } else {
            primitive.indices.clone()
        };

        let device = &self.gpu.device;
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{slot} Vertex Buffer")),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{slot} Index Buffer")),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{slot} Mesh Uniform")),
            size: std::mem::size_of::<MeshUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{slot} Mesh Bind Group")),
            layout: &self.pipeline.mesh_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        Some(GpuPrimitive {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
            uniform_buffer,
            bind_group,
            base_color: primitive.base_color,
        })
    }
}

impl Renderer for WgpuRenderer {
    fn resize_surface(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        let physical_w = ((width as f32) * pixel_ratio).round() as u32;
        let physical_h = ((height as f32) * pixel_ratio).round() as u32;
        self.gpu.resize(physical_w, physical_h);
    }

    fn upload_model(&mut self, slot: ModelSlot, bundle: &MeshBundle) {
        if self.context_lost {
            log::warn!("Skipping {slot} upload: graphics context was lost");
            return;
        }
        let primitives: Vec<GpuPrimitive> = bundle
            .primitives
            .iter()
            .filter_map(|p| self.upload_primitive(slot, p))
            .collect();
        log::info!(
            "Uploaded {slot} model '{}' ({} primitives, {} vertices)",
            bundle.name,
            primitives.len(),
            bundle.vertex_count()
        );
        if let Some(previous) = self.models[slot.index()].replace(GpuModel { primitives }) {
            previous.destroy();
        }
    }

    fn render(&mut self, scene: &SceneGraph, camera: &PerspectiveCamera) {
        if self.context_lost {
            return;
        }
        let Some((output, surface_view)) = self.gpu.begin_frame() else {
            return;
        };

        let frame = FrameUniform::new(camera, &scene.lights, self.exposure);
        self.gpu
            .queue
            .write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));
        for model in scene.models() {
            let Some(gpu_model) = &self.models[model.slot.index()] else {
                continue;
            };
            let matrix = model.transform.matrix();
            for primitive in &gpu_model.primitives {
                let uniform = MeshUniform::new(matrix, primitive.base_color);
                self.gpu.queue.write_buffer(
                    &primitive.uniform_buffer,
                    0,
                    bytemuck::bytes_of(&uniform),
                );
            }
        }

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Hero Frame Encoder"),
            });
        {
            let (view, resolve_target) = match self.gpu.msaa_view() {
                Some(msaa) => (msaa, Some(&surface_view)),
                None => (&surface_view, None),
            };
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Hero Mesh Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: self.gpu.depth_view(),
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_pipeline(&self.pipeline.pipeline);
            pass.set_bind_group(0, &self.frame_bind_group, &[]);
            for model in scene.models() {
                let Some(gpu_model) = &self.models[model.slot.index()] else {
                    continue;
                };
                for primitive in &gpu_model.primitives {
                    pass.set_bind_group(1, &primitive.bind_group, &[]);
                    pass.set_vertex_buffer(0, primitive.vertex_buffer.slice(..));
                    pass.set_index_buffer(primitive.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                    pass.draw_indexed(0..primitive.index_count, 0, 0..1);
                }
            }
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        self.frames_rendered += 1;
    }

    fn release_model(&mut self, slot: ModelSlot) {
        if let Some(model) = self.models[slot.index()].take() {
            model.destroy();
            log::info!("Released GPU resources for {slot}");
        }
    }

    fn force_context_loss(&mut self) -> bool {
        for &slot in ModelSlot::ALL {
            self.release_model(slot);
        }
        self.frame_buffer.destroy();
        self.context_lost = true;
        log::info!("Graphics context released on request");
        true
    }
}
