/// Renderer module - the engine-facing contract and its four components

// Module declarations
pub mod renderer;
pub mod state_controller;
pub mod program_binder;
pub mod resource_binder;
pub mod frame_renderer;
pub mod device_renderer;

// Re-export everything from renderer.rs
pub use renderer::*;

// Re-export from other modules
pub use state_controller::{StateController, PipelineState};
pub use program_binder::{bind_program, ProgramBinder, ScopedShader};
pub use resource_binder::ResourceBinder;
pub use frame_renderer::FrameRenderer;
pub use device_renderer::DeviceRenderer;
