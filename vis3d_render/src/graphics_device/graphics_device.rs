/// GraphicsDevice trait - explicit graphics capability object
///
/// Every component of the render layer receives the device as an argument
/// instead of reaching for an ambient driver context. Backends implement the
/// trait over a real API (`vis3d_render_opengl::GlowDevice`) or in memory
/// (`MockGraphicsDevice`).

use std::fmt;
use bitflags::bitflags;
use crate::error::Result;

// ============================================================================
// Common types
// ============================================================================

/// Shader pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// Vertex shader
    Vertex,
    /// Fragment/Pixel shader
    Fragment,
}

/// Pipeline attributes toggled with `Renderer::enable`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// Alpha blending
    Blend,
    /// Backface culling
    Cull,
    /// Z-buffer (depth) test
    DepthTest,
}

impl Attribute {
    /// All attributes, in a fixed order
    pub const ALL: [Attribute; 3] = [Attribute::Blend, Attribute::Cull, Attribute::DepthTest];
}

/// Blend factors used by the blend function
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlendFactor {
    Zero,
    One,
    SrcAlpha,
    OneMinusSrcAlpha,
}

bitflags! {
    /// Buffers cleared by `GraphicsDevice::clear`
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ClearMask: u32 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
    }
}

/// How buffer data is expected to be updated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferUsage {
    /// Uploaded once, drawn many times (models)
    Static,
    /// Re-uploaded often (glyph banners)
    Dynamic,
}

/// Texture coordinate wrapping outside 0..1
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureWrap {
    ClampToEdge,
    Repeat,
}

/// Value pushed to a uniform location
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UniformValue {
    Int(i32),
    Float(f32),
    Vec2([f32; 2]),
    Vec3([f32; 3]),
    Vec4([f32; 4]),
    /// Column-major 3x3 matrix
    Mat3([f32; 9]),
    /// Column-major 4x4 matrix
    Mat4([f32; 16]),
}

/// Read-only device capabilities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// Context version (major, minor)
    pub context_version: (u32, u32),
    /// Largest accepted texture width/height in pixels
    pub max_texture_size: u32,
    /// Number of texture image units
    pub max_texture_units: u32,
    /// Human readable renderer description
    pub renderer_name: String,
}

// ============================================================================
// GraphicsDevice trait
// ============================================================================

/// Raw graphics API surface
///
/// Handles are opaque associated types owned by the device. Calls are
/// synchronous and must be issued from the thread owning the context.
/// Creation calls return `Err` only when the driver cannot allocate a name;
/// errors from data uploads are reported later through `take_error`.
pub trait GraphicsDevice {
    type Shader: Copy + fmt::Debug;
    type Program: Copy + fmt::Debug;
    type VertexArray: Copy + fmt::Debug;
    type Buffer: Copy + fmt::Debug;
    type Texture: Copy + fmt::Debug;
    type UniformLocation: Clone + fmt::Debug;

    /// Query device capabilities
    fn info(&self) -> DeviceInfo;

    /// Pop the oldest pending error code, if any
    fn take_error(&mut self) -> Option<u32>;

    // ===== PIPELINE STATE =====

    fn set_attribute(&mut self, attribute: Attribute, enabled: bool);
    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor);
    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32);
    fn clear(&mut self, mask: ClearMask);
    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32);

    // ===== SHADER OBJECTS =====

    fn create_shader(&mut self, stage: ShaderStage) -> Result<Self::Shader>;

    /// Set the shader source. Fragments are concatenated in order.
    fn shader_source(&mut self, shader: Self::Shader, fragments: &[String]);
    fn compile_shader(&mut self, shader: Self::Shader);
    fn shader_compile_status(&self, shader: Self::Shader) -> bool;
    fn shader_info_log(&self, shader: Self::Shader) -> String;
    fn delete_shader(&mut self, shader: Self::Shader);

    // ===== PROGRAMS =====

    fn create_program(&mut self) -> Result<Self::Program>;
    fn attach_shader(&mut self, program: Self::Program, shader: Self::Shader);
    fn bind_attrib_location(&mut self, program: Self::Program, index: u32, name: &str);
    fn link_program(&mut self, program: Self::Program);
    fn program_link_status(&self, program: Self::Program) -> bool;
    fn program_info_log(&self, program: Self::Program) -> String;
    fn delete_program(&mut self, program: Self::Program);
    fn uniform_location(&self, program: Self::Program, name: &str) -> Option<Self::UniformLocation>;
    fn use_program(&mut self, program: Option<Self::Program>);
    fn set_uniform(&mut self, location: &Self::UniformLocation, value: UniformValue);

    // ===== GEOMETRY =====

    fn create_vertex_array(&mut self) -> Result<Self::VertexArray>;
    fn bind_vertex_array(&mut self, vertex_array: Option<Self::VertexArray>);
    fn delete_vertex_array(&mut self, vertex_array: Self::VertexArray);
    fn create_buffer(&mut self) -> Result<Self::Buffer>;
    fn delete_buffer(&mut self, buffer: Self::Buffer);

    /// Upload per-vertex floats into `buffer` and point layout `location`
    /// at it with `span` floats per vertex. Applies to the bound vertex array.
    fn upload_vertex_data(
        &mut self,
        buffer: Self::Buffer,
        location: u32,
        span: i32,
        data: &[f32],
        usage: BufferUsage,
    );

    /// Upload triangle indices into `buffer` as the element buffer of the
    /// bound vertex array
    fn upload_index_data(&mut self, buffer: Self::Buffer, data: &[u16], usage: BufferUsage);

    /// Draw `index_count` u16 indices of the bound vertex array as triangles
    fn draw_triangles(&mut self, index_count: i32);

    // ===== TEXTURES =====

    fn create_texture(&mut self) -> Result<Self::Texture>;

    /// Upload RGBA8 pixels, generate mipmaps and set filtering/wrapping.
    /// Leaves no texture bound.
    fn upload_texture_rgba8(
        &mut self,
        texture: Self::Texture,
        width: u32,
        height: u32,
        pixels: &[u8],
        wrap: TextureWrap,
    );
    fn active_texture(&mut self, unit: u32);
    fn bind_texture(&mut self, texture: Option<Self::Texture>);
    fn delete_texture(&mut self, texture: Self::Texture);
}
