//! The base geometry every instance draws: five colored vertices, two
//! triangles.

use crate::gpu::GpuContext;

/// A vertex with interleaved position and color.
///
/// `#[repr(C)]` plus the bytemuck derives give a predictable 24-byte layout
/// for GPU upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

impl Vertex {
    /// Vertex buffer layout: two `Float32x3` attributes, stride 24 bytes.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // color
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
        ],
    };

    pub const fn new(position: [f32; 3], color: [f32; 3]) -> Self {
        Self { position, color }
    }
}

/// The five base vertices, one color per corner.
///
/// Vertex 3 is never referenced and vertex 4 shares its position; both are
/// kept so the geometry matches the scene as it has always been uploaded.
pub const QUAD_VERTICES: [Vertex; 5] = [
    Vertex::new([-0.5, -0.5, 0.0], [1.0, 0.0, 0.0]),
    Vertex::new([-0.5, 0.5, 0.0], [0.0, 1.0, 0.0]),
    Vertex::new([0.5, -0.5, 0.0], [0.0, 0.0, 1.0]),
    Vertex::new([0.5, 0.5, 0.0], [1.0, 1.0, 0.0]),
    Vertex::new([0.5, 0.5, 0.0], [1.0, 0.0, 1.0]),
];

/// Two triangles sharing an edge.
pub const QUAD_INDICES: [u32; 6] = [0, 1, 2, 1, 2, 4];

/// GPU-resident geometry with vertex and index buffers.
///
/// Uploaded once at startup and never mutated afterward.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
}

impl Mesh {
    /// Uploads vertex and index data to static GPU buffers.
    pub fn new(gpu: &GpuContext, vertices: &[Vertex], indices: &[u32]) -> Self {
        use wgpu::util::DeviceExt;

        debug_assert!(
            indices.iter().all(|&i| (i as usize) < vertices.len()),
            "index out of bounds for vertex buffer"
        );

        let vertex_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Quad Vertex Buffer"),
                contents: bytemuck::cast_slice(vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let index_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Quad Index Buffer"),
                contents: bytemuck::cast_slice(indices),
                usage: wgpu::BufferUsages::INDEX,
            });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    /// The sketch's fixed two-triangle quad.
    pub fn quad(gpu: &GpuContext) -> Self {
        Self::new(gpu, &QUAD_VERTICES, &QUAD_INDICES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_stay_within_vertex_count() {
        for &index in &QUAD_INDICES {
            assert!((index as usize) < QUAD_VERTICES.len());
        }
    }

    #[test]
    fn index_count_is_two_triangles() {
        assert_eq!(QUAD_INDICES.len(), 6);
    }

    #[test]
    fn layout_stride_matches_vertex_size() {
        assert_eq!(Vertex::LAYOUT.array_stride, 24);
        assert_eq!(std::mem::size_of::<Vertex>(), 24);
    }
}
