/*!
# Vis3D Render

Backend-agnostic rendering layer for the Vis3D engine.

This crate shields the engine from the graphics API. It moves already-parsed
shader source and already-loaded mesh/texture buffers into GPU-resident state,
and issues one draw per visible object each frame.

## Architecture

- **GraphicsDevice**: Capability trait wrapping the raw graphics API calls
  (implemented by the OpenGL backend and by `MockGraphicsDevice`)
- **Renderer**: Object-safe engine-facing contract
- **DeviceRenderer**: `Renderer` implementation over any `GraphicsDevice`
- **StateController / ProgramBinder / ResourceBinder / FrameRenderer**:
  the four components `DeviceRenderer` is composed of

All operations run on the thread owning the graphics context.
*/

// Internal modules
mod error;
mod engine;
pub mod log;
pub mod config;
pub mod graphics_device;
pub mod resource;
pub mod renderer;

// Main vis3d namespace module
pub mod vis3d {
    // Error types
    pub use crate::error::{Error, Result, ResourceKind};

    // Logger registry
    pub use crate::engine::Engine;

    // Configuration
    pub use crate::config::RendererConfig;

    // Renderer contract
    pub use crate::renderer::{Renderer, DeviceRenderer, DrawDescriptor};

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Graphics capability sub-module
    pub mod device {
        pub use crate::graphics_device::*;
    }

    // Render sub-module with all rendering types
    pub mod render {
        pub use crate::renderer::*;
    }

    // Resource sub-module
    pub mod resource {
        pub use crate::resource::*;
    }
}

// Re-export math library at crate root
pub use glam;
