//! The render pass that draws the instanced quad scene.
//!
//! One pipeline exists for each combination of the two render-mode flags
//! (fill/line polygon mode × depth test on/off), so a toggle is just a
//! different pipeline bind. The pass layout never changes: a depth
//! attachment is always present, and "depth test off" is a pipeline whose
//! compare function is `Always` with writes disabled.
//!
//! Per-instance model matrices live in a single uniform buffer with
//! 256-byte aligned slots addressed by dynamic offsets. All slots are
//! written once in [`ScenePass::prepare`] before the frame is encoded;
//! wgpu snapshots buffer contents at submit, so rewriting one slot between
//! draws would make every draw see the last value.

use anyhow::Result;

use crate::camera::Camera;
use crate::gpu::GpuContext;
use crate::mesh::{Mesh, Vertex};
use crate::scene::Instance;

/// Camera uniforms shared by every instance in a frame.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct CameraUniforms {
    view: [[f32; 4]; 4],
    proj: [[f32; 4]; 4],
}

/// Per-instance model uniforms, one 256-byte slot each.
#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct ModelUniforms {
    model: [[f32; 4]; 4],
}

/// Stride between model uniform slots. 256 is the largest minimum dynamic
/// offset alignment wgpu permits, so it is valid everywhere.
const MODEL_UNIFORM_STRIDE: u64 = 256;

/// Capacity of the model uniform buffer, in instances.
pub const MAX_INSTANCES: usize = 16;

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

fn pipeline_index(wireframe: bool, depth_test: bool) -> usize {
    (wireframe as usize) << 1 | depth_test as usize
}

/// Draws the quad scene: camera uniforms, per-instance model uniforms, and
/// one indexed draw per instance in list order.
pub struct ScenePass {
    /// Indexed by [`pipeline_index`]: fill/line × depth off/on.
    pipelines: [wgpu::RenderPipeline; 4],
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    depth_texture: wgpu::Texture,
    /// View into the depth texture for render pass attachment.
    pub(crate) depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl ScenePass {
    /// Creates the pass: shader module, the four pipelines, uniform buffers
    /// and bind groups, and a depth buffer sized to the current surface.
    pub fn new(gpu: &GpuContext) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/scene.wgsl").into()),
        });

        // Camera uniform buffer (group 0)
        let camera_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Camera Uniforms"),
            size: std::mem::size_of::<CameraUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let camera_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
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
            });

        let camera_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Camera Bind Group"),
            layout: &camera_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: camera_buffer.as_entire_binding(),
            }],
        });

        // Model uniform buffer (group 1), one slot per instance
        let model_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniforms"),
            size: MODEL_UNIFORM_STRIDE * MAX_INSTANCES as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let model_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Model Bind Group Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            });

        let model_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout: &model_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &model_buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ModelUniforms>() as u64),
                }),
            }],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[&camera_bind_group_layout, &model_bind_group_layout],
            push_constant_ranges: &[],
        });

        let make_pipeline = |wireframe: bool, depth_test: bool| {
            let label = format!(
                "Scene Pipeline ({}, depth {})",
                if wireframe { "line" } else { "fill" },
                if depth_test { "on" } else { "off" },
            );
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label.as_str()),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs"),
                    buffers: &[Vertex::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.config.format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    // Half the quads are mirrored; culling would eat them.
                    cull_mode: None,
                    polygon_mode: if wireframe {
                        wgpu::PolygonMode::Line
                    } else {
                        wgpu::PolygonMode::Fill
                    },
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: DEPTH_FORMAT,
                    depth_write_enabled: depth_test,
                    depth_compare: if depth_test {
                        wgpu::CompareFunction::Less
                    } else {
                        wgpu::CompareFunction::Always
                    },
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let pipelines = [
            make_pipeline(false, false),
            make_pipeline(false, true),
            make_pipeline(true, false),
            make_pipeline(true, true),
        ];

        let (depth_texture, depth_view) = Self::create_depth_texture(gpu);

        Self {
            pipelines,
            camera_buffer,
            camera_bind_group,
            model_buffer,
            model_bind_group,
            depth_texture,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
        }
    }

    fn create_depth_texture(gpu: &GpuContext) -> (wgpu::Texture, wgpu::TextureView) {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        (texture, view)
    }

    /// Ensures the depth buffer matches the current surface size.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            let (texture, view) = Self::create_depth_texture(gpu);
            self.depth_texture = texture;
            self.depth_view = view;
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    /// Writes this frame's camera uniforms and every instance's model
    /// matrix into their buffers. Call before encoding the render pass.
    pub fn prepare(&self, gpu: &GpuContext, camera: &Camera, instances: &[Instance]) -> Result<()> {
        anyhow::ensure!(
            instances.len() <= MAX_INSTANCES,
            "instance list exceeds uniform buffer capacity ({} > {MAX_INSTANCES})",
            instances.len(),
        );

        let camera_uniforms = CameraUniforms {
            view: camera.view_matrix().to_cols_array_2d(),
            proj: camera.projection_matrix(gpu.aspect()).to_cols_array_2d(),
        };
        gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniforms]),
        );

        let mut slots = vec![0u8; instances.len() * MODEL_UNIFORM_STRIDE as usize];
        for (i, instance) in instances.iter().enumerate() {
            let uniforms = ModelUniforms {
                model: instance.model_matrix().to_cols_array_2d(),
            };
            let start = i * MODEL_UNIFORM_STRIDE as usize;
            let end = start + std::mem::size_of::<ModelUniforms>();
            slots[start..end].copy_from_slice(bytemuck::bytes_of(&uniforms));
        }
        gpu.queue.write_buffer(&self.model_buffer, 0, &slots);

        Ok(())
    }

    /// Encodes one indexed draw per prepared instance, in list order.
    ///
    /// `wireframe` and `depth_test` pick one of the four pipelines. The
    /// render pass must carry the pass's own depth attachment.
    pub fn render(
        &self,
        render_pass: &mut wgpu::RenderPass,
        mesh: &Mesh,
        instance_count: usize,
        wireframe: bool,
        depth_test: bool,
    ) {
        if instance_count == 0 {
            return;
        }

        render_pass.set_pipeline(&self.pipelines[pipeline_index(wireframe, depth_test)]);
        render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
        render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

        for i in 0..instance_count {
            let offset = (i as u64 * MODEL_UNIFORM_STRIDE) as u32;
            render_pass.set_bind_group(1, &self.model_bind_group, &[offset]);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_index_covers_all_four_modes() {
        let indices = [
            pipeline_index(false, false),
            pipeline_index(false, true),
            pipeline_index(true, false),
            pipeline_index(true, true),
        ];
        assert_eq!(indices, [0, 1, 2, 3]);
    }

    #[test]
    fn model_uniforms_fit_their_slot() {
        assert!(std::mem::size_of::<ModelUniforms>() as u64 <= MODEL_UNIFORM_STRIDE);
    }

    #[test]
    fn scene_fits_the_uniform_buffer() {
        assert!(crate::scene::INSTANCE_COUNT <= MAX_INSTANCES);
    }
}
