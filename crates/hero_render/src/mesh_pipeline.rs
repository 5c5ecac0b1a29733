use glam::{Mat4, Vec3};
use hero_core::scene::{Light, LightKind};

use crate::camera::PerspectiveCamera;
use crate::gpu_context::DEPTH_FORMAT;
use crate::vertex::MeshVertex;

pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub eye: [f32; 4],
    pub ambient: [f32; 4],
    pub light_dirs: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    pub light_colors: [[f32; 4]; MAX_DIRECTIONAL_LIGHTS],
    pub params: [f32; 4],
}

impl FrameUniform {
    pub fn new(camera: &PerspectiveCamera, lights: &[Light], exposure: f32) -> Self {
        let camera_uniform = camera.build_uniform();
        let mut uniform = Self {
            view_proj: camera_uniform.view_proj,
            eye: camera_uniform.eye,
            ambient: [0.0; 4],
            light_dirs: [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS],
            light_colors: [[0.0; 4]; MAX_DIRECTIONAL_LIGHTS],
            params: [exposure, 0.0, 0.0, 0.0],
        };
        let mut ambient = Vec3::ZERO;
        let mut directional = 0usize;
        for light in lights {
            let radiance = light.color * light.intensity;
            match light.kind {
                LightKind::Ambient => ambient += radiance,
                LightKind::Directional { position } => {
                    if directional == MAX_DIRECTIONAL_LIGHTS {
                        log::warn!("Ignoring directional light beyond the first {MAX_DIRECTIONAL_LIGHTS}");
                        continue;
                    }
                    uniform.light_dirs[directional] = position.normalize_or_zero().extend(0.0).to_array();
                    uniform.light_colors[directional] = radiance.extend(1.0).to_array();
                    directional += 1;
                }
            }
        }
        uniform.ambient = ambient.extend(1.0).to_array();
        uniform.params[1] = directional as f32;
        uniform
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshUniform {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 4],
    pub base_color: [f32; 4],
}

impl MeshUniform {
    pub fn new(model: Mat4, base_color: [f32; 4]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            normal: model.inverse().transpose().to_cols_array_2d(),
            base_color,
        }
    }
}

pub struct MeshPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub frame_layout: wgpu::BindGroupLayout,
    pub mesh_layout: wgpu::BindGroupLayout,
}

impl MeshPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, sample_count: u32) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Hero Mesh Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/mesh.wgsl").into()),
        });

        let frame_layout = uniform_layout(device, "Hero Frame Layout", wgpu::ShaderStages::VERTEX_FRAGMENT);
        let mesh_layout = uniform_layout(device, "Hero Mesh Layout", wgpu::ShaderStages::VERTEX_FRAGMENT);

        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Hero Mesh Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &mesh_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Hero Mesh Pipeline"),
            layout: Some(&layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::PREMULTIPLIED_ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                // glTF assets are not reliably closed; draw both faces.
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        Self {
            pipeline,
            frame_layout,
            mesh_layout,
        }
    }
}

fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use hero_core::scene::lighting_rig;

    #[test]
    fn frame_uniform_packs_the_lighting_rig() {
        let camera = PerspectiveCamera::new(34.0, 1.5, 0.1, 1000.0);
        let uniform = FrameUniform::new(&camera, &lighting_rig(), 1.28);
        assert_eq!(uniform.params[0], 1.28);
        assert_eq!(uniform.params[1], 4.0);
        assert!((uniform.ambient[0] - 0.75).abs() < 1e-6);
        let key = Vec3::from_slice(&uniform.light_dirs[0][..3]);
        assert!((key.length() - 1.0).abs() < 1e-5);
    }

    #[test]
    fn uniform_sizes_are_sixteen_byte_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniform>() % 16, 0);
        assert_eq!(std::mem::size_of::<MeshUniform>() % 16, 0);
    }
}
