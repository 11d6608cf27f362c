//! # User Interface Module
//!
//! Dear ImGui chrome for the anatomy explorer, split in two layers:
//!
//! - [`UiManager`] owns the ImGui context, winit platform glue, and the
//!   wgpu renderer. It decides when the UI captures input so camera and
//!   picking code can stand down.
//! - [`UiChrome`] builds the actual widgets each frame: the system
//!   visibility panel, display options, search, the part info panel, and
//!   the projected label overlay. It never mutates application state
//!   itself; it emits [`ChromeAction`]s for the app loop to apply.

pub mod chrome;
pub mod manager;

pub use chrome::{ChromeAction, UiChrome};
pub use manager::UiManager;
