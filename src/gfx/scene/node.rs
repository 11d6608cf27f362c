//! Renderable scene nodes.
//!
//! A node owns one generated mesh, its world transform, a flat color, and
//! lazily created GPU buffers. Interaction code never touches nodes; it
//! reads the bounds and anchor captured into the registry at build time.

use std::ops::Range;

use cgmath::{Matrix4, Vector3};
use wgpu::Device;

use super::vertex::Vertex3D;
use crate::gfx::geometry::{Aabb, GeometryData};

/// Per-node uniform data: model matrix plus flat color.
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct NodeUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
}

/// GPU-side resources for one node, created by [`SceneNode::init_gpu_resources`].
pub struct NodeGpuResources {
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
}

pub struct SceneNode {
    pub name: String,
    pub transform: Matrix4<f32>,
    pub color: [f32; 4],
    /// Read back from the registry each frame; hidden nodes are skipped by
    /// the render host.
    pub visible: bool,
    vertices: Vec<Vertex3D>,
    indices: Vec<u32>,
    index_count: u32,
    local_bounds: Aabb,
    vertex_buffer: Option<wgpu::Buffer>,
    index_buffer: Option<wgpu::Buffer>,
    gpu_resources: Option<NodeGpuResources>,
}

impl SceneNode {
    /// Builds a node from generated geometry placed by `transform`.
    pub fn from_geometry(
        name: &str,
        geometry: &GeometryData,
        transform: Matrix4<f32>,
        color: [f32; 4],
    ) -> Self {
        let vertices = (0..geometry.vertices.len())
            .map(|i| Vertex3D {
                position: geometry.vertices[i],
                normal: geometry.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect();

        Self {
            name: name.to_string(),
            transform,
            color,
            visible: true,
            vertices,
            indices: geometry.indices.clone(),
            index_count: geometry.indices.len() as u32,
            local_bounds: geometry.local_bounds(),
            vertex_buffer: None,
            index_buffer: None,
            gpu_resources: None,
        }
    }

    /// World-space bounds of the placed mesh.
    pub fn world_bounds(&self) -> Aabb {
        self.local_bounds.transform(&self.transform)
    }

    /// Representative world point for label anchoring.
    pub fn anchor(&self) -> Vector3<f32> {
        self.world_bounds().center()
    }

    /// Uploads vertex, index, and uniform data.
    ///
    /// `node_layout` is the per-node bind group layout owned by the render
    /// host; it matches group 1 of the pipeline.
    pub fn init_gpu_resources(&mut self, device: &Device, node_layout: &wgpu::BindGroupLayout) {
        let vertex_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Node Vertex Buffer"),
                contents: bytemuck::cast_slice(&self.vertices),
                usage: wgpu::BufferUsages::VERTEX,
            },
        );
        let index_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Node Index Buffer"),
                contents: bytemuck::cast_slice(&self.indices),
                usage: wgpu::BufferUsages::INDEX,
            },
        );

        let uniform = NodeUniform {
            // cgmath matrices are column-major, which is what the GPU expects
            model: *self.transform.as_ref(),
            color: self.color,
        };
        let uniform_buffer = wgpu::util::DeviceExt::create_buffer_init(
            device,
            &wgpu::util::BufferInitDescriptor {
                label: Some("Node Uniform Buffer"),
                contents: bytemuck::bytes_of(&uniform),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            },
        );
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Node Bind Group"),
            layout: node_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        self.vertex_buffer = Some(vertex_buffer);
        self.index_buffer = Some(index_buffer);
        self.gpu_resources = Some(NodeGpuResources {
            uniform_buffer,
            bind_group,
        });
    }
}

pub trait DrawNode<'a> {
    fn draw_node(&mut self, node: &'a SceneNode);
    fn draw_node_instanced(&mut self, node: &'a SceneNode, instances: Range<u32>);
}

impl<'a, 'b> DrawNode<'b> for wgpu::RenderPass<'a>
where
    'b: 'a,
{
    fn draw_node(&mut self, node: &'b SceneNode) {
        self.draw_node_instanced(node, 0..1);
    }

    fn draw_node_instanced(&mut self, node: &'b SceneNode, instances: Range<u32>) {
        // Skip nodes that were never uploaded.
        let (Some(vertex_buffer), Some(index_buffer), Some(gpu)) = (
            &node.vertex_buffer,
            &node.index_buffer,
            &node.gpu_resources,
        ) else {
            return;
        };

        self.set_bind_group(1, &gpu.bind_group, &[]);
        self.set_vertex_buffer(0, vertex_buffer.slice(..));
        self.set_index_buffer(index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        self.draw_indexed(0..node.index_count, 0, instances);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gfx::geometry::generate_cuboid;

    #[test]
    fn node_bounds_and_anchor_follow_the_transform() {
        let node = SceneNode::from_geometry(
            "pelvis",
            &generate_cuboid(3.0, 0.8, 2.0),
            Matrix4::from_translation(Vector3::new(0.0, -1.0, 0.0)),
            [0.5, 0.3, 0.1, 1.0],
        );

        let bounds = node.world_bounds();
        assert_eq!(node.anchor(), Vector3::new(0.0, -1.0, 0.0));
        assert!((bounds.min.y - (-1.4)).abs() < 1e-5);
        assert!((bounds.max.x - 1.5).abs() < 1e-5);
    }
}
