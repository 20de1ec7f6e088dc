//! Resource module
//!
//! CPU-side resources handed to the render layer for binding, and the
//! generational handles that refer to their GPU-resident counterparts.

pub mod mesh;
pub mod texture;
pub mod shader;
pub mod shader_library;
pub mod material;
pub mod light;

pub use mesh::{
    Mesh, MeshHandle,
    VERTEX_LOCATION, NORMAL_LOCATION, TEX_COORD_LOCATION,
    VERTEX_SPAN, NORMAL_SPAN, TEX_COORD_SPAN, MAX_VERTICES,
};
pub use texture::{Texture, TextureHandle};
pub use shader::{Shader, ProgramHandle, ProgramState, UniformKind, ATTRIBUTE_NAMES};
pub use material::{Material, Rgb};
pub use light::Light;
