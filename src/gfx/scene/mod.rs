//! # Scene Management
//!
//! The flat list of renderable nodes behind the anatomy registry. The
//! registry refers to nodes by index; the graph never grows or shrinks
//! after construction, so indices stay stable for a whole session.

pub mod node;
pub mod vertex;

pub use node::{DrawNode, SceneNode};
pub use vertex::Vertex3D;

use wgpu::Device;

use crate::interact::visibility;
use crate::registry::AnatomyRegistry;

/// Owns every renderable node in the scene.
#[derive(Default)]
pub struct SceneGraph {
    pub nodes: Vec<SceneNode>,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node and returns its stable index.
    pub fn add_node(&mut self, node: SceneNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Copies effective part visibility from the registry onto the nodes so
    /// the render host can skip hidden ones. Nodes without a registered part
    /// (the grid plane) are left alone.
    pub fn sync_visibility(&mut self, registry: &AnatomyRegistry) {
        for part in registry.all_parts() {
            let visible = visibility::is_part_visible(registry, &part.id).unwrap_or(false);
            if let Some(node) = self.nodes.get_mut(part.geometry.node_index) {
                node.visible = visible;
            }
        }
    }

    /// Uploads GPU resources for all nodes. Must run once the device exists
    /// and before the first frame.
    pub fn init_gpu_resources(&mut self, device: &Device, node_layout: &wgpu::BindGroupLayout) {
        for node in self.nodes.iter_mut() {
            node.init_gpu_resources(device, node_layout);
        }
    }
}
