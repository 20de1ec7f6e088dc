//! Error types for the Vis3D render layer
//!
//! Every failure of the layer is reported through [`Error`]. All variants are
//! recoverable at the call site: the caller decides whether to retry with
//! corrected data, substitute a fallback, or abandon the asset.

use std::fmt;
use crate::graphics_device::ShaderStage;

/// Result type for Vis3D render operations
pub type Result<T> = std::result::Result<T, Error>;

/// Kind of CPU resource being moved to the GPU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    /// Static model geometry
    Mesh,
    /// Dynamic bitmap-font banner geometry
    Glyphs,
    /// RGBA texture
    Texture,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResourceKind::Mesh => write!(f, "mesh"),
            ResourceKind::Glyphs => write!(f, "glyphs"),
            ResourceKind::Texture => write!(f, "texture"),
        }
    }
}

/// Vis3D render errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// A shader stage failed to compile. `log` is the compiler diagnostic.
    CompileError {
        stage: ShaderStage,
        log: String,
    },

    /// The program failed to link. `log` is the linker diagnostic.
    LinkError {
        log: String,
    },

    /// The program linked but declared uniforms could not be located
    MissingUniforms {
        shader: String,
        names: Vec<String>,
    },

    /// Mesh, glyph or texture upload rejected
    BindError {
        kind: ResourceKind,
        reason: String,
    },

    /// Viewport dimensions must both be positive
    ViewportError {
        width: i32,
        height: i32,
    },

    /// Draw descriptor references an unbound, released or zero resource
    InvalidDescriptor(String),

    /// Stale or unbound handle passed to a map/release operation
    InvalidResource(String),

    /// Operation issued before `Renderer::init`
    NotInitialized,

    /// Initialization failed (context version, repeated init)
    InitializationFailed(String),

    /// Backend-specific error
    BackendError(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::CompileError { stage, log } => {
                write!(f, "{:?} shader compile failed: {}", stage, log)
            }
            Error::LinkError { log } => write!(f, "Shader link failed: {}", log),
            Error::MissingUniforms { shader, names } => {
                write!(f, "Shader '{}' is missing uniforms: {}", shader, names.join(", "))
            }
            Error::BindError { kind, reason } => write!(f, "Failed binding {}: {}", kind, reason),
            Error::ViewportError { width, height } => {
                write!(f, "Invalid viewport {}x{}", width, height)
            }
            Error::InvalidDescriptor(msg) => write!(f, "Invalid draw descriptor: {}", msg),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::NotInitialized => write!(f, "Renderer not initialized"),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
