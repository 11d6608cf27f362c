use cgmath::*;

use super::{convert_matrix4_to_array, CameraUniform};
use crate::gfx::geometry::Ray;
use crate::interact::CameraRig;

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: cgmath::Matrix4<f32> = cgmath::Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.5,
    0.0, 0.0, 0.0, 1.0,
);

/// Named camera placements matching the view buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewPreset {
    Reset,
    Front,
    Back,
    Top,
    Side,
}

/// Y-up orbit camera around the anatomy model.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub distance: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub eye: Vector3<f32>,
    pub target: Vector3<f32>,
    pub up: Vector3<f32>,
    pub min_distance: f32,
    pub max_distance: f32,
    pub aspect: f32,
    pub fovy: Rad<f32>,
    pub znear: f32,
    pub zfar: f32,
    pub uniform: CameraUniform,
}

impl OrbitCamera {
    pub fn new(distance: f32, pitch: f32, yaw: f32, target: Vector3<f32>, aspect: f32) -> Self {
        let mut camera = Self {
            distance,
            pitch,
            yaw,
            eye: Vector3::zero(), // recomputed by update()
            target,
            up: Vector3::unit_y(),
            min_distance: 2.0,
            max_distance: 50.0,
            aspect,
            fovy: Rad(std::f32::consts::PI / 4.0),
            znear: 0.1,
            zfar: 1000.0,
            uniform: CameraUniform::default(),
        };
        camera.update();
        camera
    }

    pub fn build_view_projection_matrix(&self) -> Matrix4<f32> {
        let eye = Point3::from_vec(self.eye);
        let target = Point3::from_vec(self.target);
        let view = Matrix4::look_at_rh(eye, target, self.up);
        let proj =
            OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar);
        proj * view
    }

    pub fn set_distance(&mut self, distance: f32) {
        self.distance = distance.clamp(self.min_distance, self.max_distance);
        self.update();
    }

    pub fn add_distance(&mut self, delta: f32) {
        let corrected_zoom = f32::log10(self.distance.max(1.1)) * delta;
        self.set_distance(self.distance + corrected_zoom);
    }

    pub fn set_pitch(&mut self, pitch: f32) {
        // Stay shy of the poles so look_at keeps a well-defined up.
        self.pitch = pitch.clamp(-1.5, 1.5);
        self.update();
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.set_pitch(self.pitch + delta);
    }

    pub fn set_yaw(&mut self, yaw: f32) {
        self.yaw = yaw;
        self.update();
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.set_yaw(self.yaw + delta);
    }

    /// Jumps to one of the canned viewpoints.
    pub fn apply_preset(&mut self, preset: ViewPreset) {
        use std::f32::consts::{FRAC_PI_2, PI};

        self.target = Vector3::new(0.0, 2.0, 0.0);
        let (distance, pitch, yaw) = match preset {
            ViewPreset::Reset => (12.0, 0.35, 0.25),
            ViewPreset::Front => (15.0, 0.13, 0.0),
            ViewPreset::Back => (15.0, 0.13, PI),
            ViewPreset::Side => (15.0, 0.13, FRAC_PI_2),
            ViewPreset::Top => (20.0, 1.45, 0.0),
        };
        self.distance = distance;
        self.pitch = pitch;
        self.yaw = yaw;
        self.update();
    }

    pub fn resize_projection(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
        self.update_view_proj();
    }

    /// Refreshes the GPU uniform from the current placement.
    pub fn update_view_proj(&mut self) {
        self.uniform.view_position = [self.eye.x, self.eye.y, self.eye.z, 1.0];
        self.uniform.view_proj = convert_matrix4_to_array(self.build_view_projection_matrix());
    }

    /// Recomputes the eye from distance, pitch, and yaw (Y-up spherical).
    fn update(&mut self) {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        self.eye = self.target
            + self.distance * Vector3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw);
        self.update_view_proj();
    }
}

impl CameraRig for OrbitCamera {
    fn ray_from_ndc(&self, ndc_x: f32, ndc_y: f32) -> Ray {
        let view_proj = self.build_view_projection_matrix();
        let inv_view_proj = view_proj.invert().unwrap_or_else(Matrix4::identity);

        // Unproject the pointer on the near and far planes (wgpu depth range
        // is [0, 1]) and run the ray between them.
        let near = inv_view_proj * Vector4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far = inv_view_proj * Vector4::new(ndc_x, ndc_y, 1.0, 1.0);

        let near_3d = near.truncate() / near.w;
        let far_3d = far.truncate() / far.w;

        Ray::new(near_3d, far_3d - near_3d)
    }

    fn project_to_ndc(&self, world: Vector3<f32>) -> Vector3<f32> {
        let clip = self.build_view_projection_matrix() * world.extend(1.0);
        if clip.w <= f32::EPSILON {
            // Behind the camera; any z >= 1 marks the point as not shown.
            return Vector3::new(0.0, 0.0, 2.0);
        }
        clip.truncate() / clip.w
    }
}
