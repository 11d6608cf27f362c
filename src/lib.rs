// src/lib.rs
//! Vesalius
//!
//! An interactive 3D human anatomy explorer built on wgpu and winit. Six
//! stylized body systems render as generated primitives; clicking a part
//! selects it and opens an info panel, systems toggle on and off as wholes,
//! and floating labels track their parts on screen.
//!
//! ## Architecture
//!
//! - [`registry`] - identity and metadata for systems and parts
//! - [`interact`] - visibility, picking, labels, and selection
//! - [`gfx`] - orbit camera, generated geometry, scene graph, render host
//! - [`model`] - the built-in six-system catalog
//! - [`assets`] - OBJ loading for additional model systems
//! - [`ui`] - Dear ImGui chrome
//! - [`app`] - window lifecycle and the event loop
//!
//! ## Usage
//!
//! ```no_run
//! let app = vesalius::default();
//! app.run();
//! ```

pub mod app;
pub mod assets;
pub mod gfx;
pub mod interact;
pub mod model;
pub mod registry;
pub mod ui;

// Re-export main types for convenience
pub use app::ExplorerApp;
pub use registry::{AnatomyPart, AnatomyRegistry, AnatomySystem, RegistryError};

/// Creates a default explorer application instance
pub fn default() -> ExplorerApp {
    pollster::block_on(ExplorerApp::new())
}
