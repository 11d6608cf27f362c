//! # Camera
//!
//! Orbit camera around the anatomy model, its mouse controller, and the
//! uniform layout shared with the render pipeline. The camera is the only
//! [`crate::interact::CameraRig`] implementation in the crate; the
//! interaction core sees it exclusively through that trait.

pub mod camera_controller;
pub mod orbit_camera;

pub use camera_controller::CameraController;
pub use orbit_camera::{OrbitCamera, ViewPreset};

use cgmath::{Matrix4, SquareMatrix};

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable, Debug)]
pub struct CameraUniform {
    /// Eye position in homogeneous coordinates.
    ///
    /// Homogeneous coordinates are used to fulfill the 16 byte alignment
    /// requirement.
    pub view_position: [f32; 4],

    /// View projection matrix.
    pub view_proj: [[f32; 4]; 4],
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self {
            view_position: [0.0; 4],
            view_proj: convert_matrix4_to_array(Matrix4::identity()),
        }
    }
}

pub fn convert_matrix4_to_array(matrix4: Matrix4<f32>) -> [[f32; 4]; 4] {
    let mut result = [[0.0; 4]; 4];

    for i in 0..4 {
        for j in 0..4 {
            result[i][j] = matrix4[i][j];
        }
    }

    result
}
