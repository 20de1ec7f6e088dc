/// Graphics device module - the capability surface the render layer invokes

// Module declarations
pub mod graphics_device;
pub mod mock_graphics_device;

// Re-export everything from graphics_device.rs
pub use graphics_device::*;

// Deterministic device for running the render layer without a GPU
pub use mock_graphics_device::{
    MockGraphicsDevice, MockDraw, MockBufferData, MockTextureData, MOCK_OUT_OF_MEMORY,
};
