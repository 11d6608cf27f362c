//! # Graphics Module
//!
//! Rendering-side functionality for the anatomy explorer: the orbit camera,
//! procedural geometry, the renderable scene graph, and the wgpu render
//! host. The interaction core in [`crate::interact`] deliberately consumes
//! only two things from here: the [`camera`] through the rig seam, and the
//! bounds/anchor data captured from [`scene`] nodes at registration time.

pub mod camera;
pub mod geometry;
pub mod render_host;
pub mod scene;

// Re-export commonly used types
pub use camera::OrbitCamera;
pub use render_host::RenderHost;
