/// Renderer trait - engine-facing rendering contract

use glam::{Mat4, Vec3};

use crate::error::Result;
use crate::graphics_device::Attribute;
use crate::resource::{
    Light, Material, Mesh, MeshHandle, ProgramHandle, Shader, Texture, TextureHandle,
};

// ============================================================================
// Common types
// ============================================================================

/// Renderer statistics, accumulated since the last `begin_frame`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RendererStats {
    /// Number of draw calls this frame
    pub draw_calls: u32,
    /// Number of triangles drawn this frame
    pub triangles: u32,
}

/// Everything needed to draw one visible object once
///
/// Built fresh for each draw and never stored. Every handle must refer to
/// a resource whose bind succeeded.
#[derive(Debug, Clone, Copy)]
pub struct DrawDescriptor<'a> {
    /// Model-view matrix
    pub model_view: Mat4,
    /// Model-view-projection matrix
    pub model_view_projection: Mat4,
    /// Per-axis model scale
    pub scale: Vec3,
    /// Light used by the lit shaders
    pub light: Light,
    /// Model transparency, multiplied with the material transparency
    pub alpha: f32,
    /// Distance at which fading shaders reach full transparency
    pub fade: f32,
    /// Texture rotation speed
    pub rotation_speed: f32,
    /// Mesh or glyph banner to draw
    pub mesh: MeshHandle,
    /// Linked program to draw with
    pub program: ProgramHandle,
    /// Surface colours, opaque white diffuse when absent
    pub material: Option<&'a Material>,
    /// Texture unit sampled through the `uv` uniform
    pub texture_unit: Option<u32>,
}

impl<'a> DrawDescriptor<'a> {
    /// Descriptor with identity transforms, unit scale, full opacity and
    /// no material or texture
    pub fn new(mesh: MeshHandle, program: ProgramHandle) -> Self {
        Self {
            model_view: Mat4::IDENTITY,
            model_view_projection: Mat4::IDENTITY,
            scale: Vec3::ONE,
            light: Light::default(),
            alpha: 1.0,
            fade: 100.0,
            rotation_speed: 0.0,
            mesh,
            program,
            material: None,
            texture_unit: None,
        }
    }

    pub fn with_transforms(mut self, model_view: Mat4, model_view_projection: Mat4) -> Self {
        self.model_view = model_view;
        self.model_view_projection = model_view_projection;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.light = light;
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_fade(mut self, fade: f32) -> Self {
        self.fade = fade;
        self
    }

    pub fn with_rotation_speed(mut self, rotation_speed: f32) -> Self {
        self.rotation_speed = rotation_speed;
        self
    }

    pub fn with_material(mut self, material: &'a Material) -> Self {
        self.material = Some(material);
        self
    }

    pub fn with_texture_unit(mut self, unit: u32) -> Self {
        self.texture_unit = Some(unit);
        self
    }
}

// ============================================================================
// Renderer trait
// ============================================================================

/// Main renderer trait
///
/// The set of operations the engine relies on, independent of the graphics
/// backend. Implemented by `DeviceRenderer` over any `GraphicsDevice`.
/// `init` must be called exactly once before anything else.
pub trait Renderer {
    /// Validate the context and put the pipeline in its default state
    fn init(&mut self) -> Result<()>;

    /// Clear the colour and depth buffers
    fn clear(&mut self);

    /// Set the clear colour
    fn color(&mut self, r: f32, g: f32, b: f32, a: f32);

    /// Enable or disable a pipeline attribute
    fn enable(&mut self, attribute: Attribute, enabled: bool);

    /// Set the viewport size
    ///
    /// # Arguments
    ///
    /// * `width` - Viewport width in pixels, must be positive
    /// * `height` - Viewport height in pixels, must be positive
    fn viewport(&mut self, width: i32, height: i32) -> Result<()>;

    /// Bind a texture to a numbered sampler unit
    ///
    /// # Arguments
    ///
    /// * `unit` - Texture unit later referenced by `DrawDescriptor::texture_unit`
    /// * `texture` - A bound texture
    fn map_texture(&mut self, unit: u32, texture: &Texture) -> Result<()>;

    /// Upload model geometry. The CPU buffers are emptied on success.
    fn bind_model(&mut self, mesh: &mut Mesh) -> Result<MeshHandle>;

    /// Upload a glyph banner. Glyphs are expected to change often.
    fn bind_glyphs(&mut self, glyphs: &mut Mesh) -> Result<MeshHandle>;

    /// Upload texture pixels. The pixel buffer is emptied on success.
    fn bind_texture(&mut self, texture: &mut Texture) -> Result<TextureHandle>;

    /// Compile and link a shader, resolving its uniforms
    fn bind_shader(&mut self, shader: &mut Shader) -> Result<ProgramHandle>;

    /// Draw one visible object
    fn render(&mut self, descriptor: &DrawDescriptor) -> Result<()>;

    /// Delete the GPU copy of a model or glyph banner
    fn release_model(&mut self, mesh: &mut Mesh) -> Result<()>;

    /// Delete the GPU copy of a texture and clear its unit mappings
    fn release_texture(&mut self, texture: &mut Texture) -> Result<()>;

    /// Delete a linked program
    fn release_shader(&mut self, shader: &mut Shader) -> Result<()>;

    /// Reset the per-frame statistics
    fn begin_frame(&mut self);

    /// Get statistics about the current frame
    fn stats(&self) -> RendererStats;
}
