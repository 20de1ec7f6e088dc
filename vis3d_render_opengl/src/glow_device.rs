/// GlowDevice - OpenGL implementation of the GraphicsDevice trait
///
/// Thin translation layer: every trait call maps onto one or a few glow
/// calls. Validation and bookkeeping stay in the render layer.

use std::sync::Arc;
use glow::HasContext;
use vis3d_render::vis3d::{Error, Result};
use vis3d_render::vis3d::device::{
    Attribute, BlendFactor, BufferUsage, ClearMask, DeviceInfo, GraphicsDevice, ShaderStage,
    TextureWrap, UniformValue,
};
use vis3d_render::{engine_err, engine_trace};

/// OpenGL graphics device
///
/// Shares the context with the windowing layer. All calls must be issued on
/// the thread where the context is current.
pub struct GlowDevice {
    gl: Arc<glow::Context>,
}

impl GlowDevice {
    pub fn new(gl: Arc<glow::Context>) -> Self {
        Self { gl }
    }

    /// Underlying glow context
    pub fn gl(&self) -> &Arc<glow::Context> {
        &self.gl
    }

    fn creation_failed(what: &str, reason: String) -> Error {
        engine_err!("vis3d::opengl", "Failed to create {}: {}", what, reason)
    }
}

// ============================================================================
// Enum conversion
// ============================================================================

pub(crate) fn stage_to_gl(stage: ShaderStage) -> u32 {
    match stage {
        ShaderStage::Vertex => glow::VERTEX_SHADER,
        ShaderStage::Fragment => glow::FRAGMENT_SHADER,
    }
}

pub(crate) fn attribute_to_gl(attribute: Attribute) -> u32 {
    match attribute {
        Attribute::Blend => glow::BLEND,
        Attribute::Cull => glow::CULL_FACE,
        Attribute::DepthTest => glow::DEPTH_TEST,
    }
}

pub(crate) fn blend_factor_to_gl(factor: BlendFactor) -> u32 {
    match factor {
        BlendFactor::Zero => glow::ZERO,
        BlendFactor::One => glow::ONE,
        BlendFactor::SrcAlpha => glow::SRC_ALPHA,
        BlendFactor::OneMinusSrcAlpha => glow::ONE_MINUS_SRC_ALPHA,
    }
}

pub(crate) fn clear_mask_to_gl(mask: ClearMask) -> u32 {
    let mut bits = 0;
    if mask.contains(ClearMask::COLOR) {
        bits |= glow::COLOR_BUFFER_BIT;
    }
    if mask.contains(ClearMask::DEPTH) {
        bits |= glow::DEPTH_BUFFER_BIT;
    }
    bits
}

pub(crate) fn usage_to_gl(usage: BufferUsage) -> u32 {
    match usage {
        BufferUsage::Static => glow::STATIC_DRAW,
        BufferUsage::Dynamic => glow::DYNAMIC_DRAW,
    }
}

pub(crate) fn wrap_to_gl(wrap: TextureWrap) -> i32 {
    match wrap {
        TextureWrap::ClampToEdge => glow::CLAMP_TO_EDGE as i32,
        TextureWrap::Repeat => glow::REPEAT as i32,
    }
}

/// GL error code as None when the queue is empty
pub(crate) fn error_code(code: u32) -> Option<u32> {
    if code == glow::NO_ERROR {
        None
    } else {
        Some(code)
    }
}

// ============================================================================
// GraphicsDevice implementation
// ============================================================================

impl GraphicsDevice for GlowDevice {
    type Shader = glow::Shader;
    type Program = glow::Program;
    type VertexArray = glow::VertexArray;
    type Buffer = glow::Buffer;
    type Texture = glow::Texture;
    type UniformLocation = glow::UniformLocation;

    fn info(&self) -> DeviceInfo {
        let version = self.gl.version();
        unsafe {
            DeviceInfo {
                context_version: (version.major, version.minor),
                max_texture_size: self.gl.get_parameter_i32(glow::MAX_TEXTURE_SIZE).max(0) as u32,
                max_texture_units: self
                    .gl
                    .get_parameter_i32(glow::MAX_COMBINED_TEXTURE_IMAGE_UNITS)
                    .max(0) as u32,
                renderer_name: self.gl.get_parameter_string(glow::RENDERER),
            }
        }
    }

    fn take_error(&mut self) -> Option<u32> {
        unsafe { error_code(self.gl.get_error()) }
    }

    // ===== PIPELINE STATE =====

    fn set_attribute(&mut self, attribute: Attribute, enabled: bool) {
        let cap = attribute_to_gl(attribute);
        unsafe {
            if enabled {
                self.gl.enable(cap);
            } else {
                self.gl.disable(cap);
            }
        }
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        unsafe {
            self.gl.blend_func(blend_factor_to_gl(src), blend_factor_to_gl(dst));
        }
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        unsafe {
            self.gl.clear_color(r, g, b, a);
        }
    }

    fn clear(&mut self, mask: ClearMask) {
        unsafe {
            self.gl.clear(clear_mask_to_gl(mask));
        }
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        unsafe {
            self.gl.viewport(x, y, width, height);
        }
    }

    // ===== SHADER OBJECTS =====

    fn create_shader(&mut self, stage: ShaderStage) -> Result<glow::Shader> {
        unsafe {
            self.gl
                .create_shader(stage_to_gl(stage))
                .map_err(|reason| Self::creation_failed("shader", reason))
        }
    }

    fn shader_source(&mut self, shader: glow::Shader, fragments: &[String]) {
        let source = fragments.concat();
        unsafe {
            self.gl.shader_source(shader, &source);
        }
    }

    fn compile_shader(&mut self, shader: glow::Shader) {
        unsafe {
            self.gl.compile_shader(shader);
        }
    }

    fn shader_compile_status(&self, shader: glow::Shader) -> bool {
        unsafe { self.gl.get_shader_compile_status(shader) }
    }

    fn shader_info_log(&self, shader: glow::Shader) -> String {
        unsafe { self.gl.get_shader_info_log(shader) }
    }

    fn delete_shader(&mut self, shader: glow::Shader) {
        unsafe {
            self.gl.delete_shader(shader);
        }
    }

    // ===== PROGRAMS =====

    fn create_program(&mut self) -> Result<glow::Program> {
        unsafe {
            self.gl
                .create_program()
                .map_err(|reason| Self::creation_failed("program", reason))
        }
    }

    fn attach_shader(&mut self, program: glow::Program, shader: glow::Shader) {
        unsafe {
            self.gl.attach_shader(program, shader);
        }
    }

    fn bind_attrib_location(&mut self, program: glow::Program, index: u32, name: &str) {
        unsafe {
            self.gl.bind_attrib_location(program, index, name);
        }
    }

    fn link_program(&mut self, program: glow::Program) {
        unsafe {
            self.gl.link_program(program);
        }
    }

    fn program_link_status(&self, program: glow::Program) -> bool {
        unsafe { self.gl.get_program_link_status(program) }
    }

    fn program_info_log(&self, program: glow::Program) -> String {
        unsafe { self.gl.get_program_info_log(program) }
    }

    fn delete_program(&mut self, program: glow::Program) {
        unsafe {
            self.gl.delete_program(program);
        }
    }

    fn uniform_location(&self, program: glow::Program, name: &str) -> Option<glow::UniformLocation> {
        unsafe { self.gl.get_uniform_location(program, name) }
    }

    fn use_program(&mut self, program: Option<glow::Program>) {
        unsafe {
            self.gl.use_program(program);
        }
    }

    fn set_uniform(&mut self, location: &glow::UniformLocation, value: UniformValue) {
        let location = Some(location);
        unsafe {
            match value {
                UniformValue::Int(x) => self.gl.uniform_1_i32(location, x),
                UniformValue::Float(x) => self.gl.uniform_1_f32(location, x),
                UniformValue::Vec2([x, y]) => self.gl.uniform_2_f32(location, x, y),
                UniformValue::Vec3([x, y, z]) => self.gl.uniform_3_f32(location, x, y, z),
                UniformValue::Vec4([x, y, z, w]) => self.gl.uniform_4_f32(location, x, y, z, w),
                UniformValue::Mat3(m) => self.gl.uniform_matrix_3_f32_slice(location, false, &m),
                UniformValue::Mat4(m) => self.gl.uniform_matrix_4_f32_slice(location, false, &m),
            }
        }
    }

    // ===== GEOMETRY =====

    fn create_vertex_array(&mut self) -> Result<glow::VertexArray> {
        unsafe {
            self.gl
                .create_vertex_array()
                .map_err(|reason| Self::creation_failed("vertex array", reason))
        }
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<glow::VertexArray>) {
        unsafe {
            self.gl.bind_vertex_array(vertex_array);
        }
    }

    fn delete_vertex_array(&mut self, vertex_array: glow::VertexArray) {
        unsafe {
            self.gl.delete_vertex_array(vertex_array);
        }
    }

    fn create_buffer(&mut self) -> Result<glow::Buffer> {
        unsafe {
            self.gl
                .create_buffer()
                .map_err(|reason| Self::creation_failed("buffer", reason))
        }
    }

    fn delete_buffer(&mut self, buffer: glow::Buffer) {
        unsafe {
            self.gl.delete_buffer(buffer);
        }
    }

    fn upload_vertex_data(
        &mut self,
        buffer: glow::Buffer,
        location: u32,
        span: i32,
        data: &[f32],
        usage: BufferUsage,
    ) {
        engine_trace!(
            "vis3d::opengl",
            "Uploading {} floats to attribute {} (span {})",
            data.len(),
            location,
            span
        );
        unsafe {
            self.gl.bind_buffer(glow::ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(
                glow::ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                usage_to_gl(usage),
            );
            self.gl.vertex_attrib_pointer_f32(location, span, glow::FLOAT, false, 0, 0);
            self.gl.enable_vertex_attrib_array(location);
            self.gl.bind_buffer(glow::ARRAY_BUFFER, None);
        }
    }

    fn upload_index_data(&mut self, buffer: glow::Buffer, data: &[u16], usage: BufferUsage) {
        // The element binding is vertex array state; it stays bound
        unsafe {
            self.gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(buffer));
            self.gl.buffer_data_u8_slice(
                glow::ELEMENT_ARRAY_BUFFER,
                bytemuck::cast_slice(data),
                usage_to_gl(usage),
            );
        }
    }

    fn draw_triangles(&mut self, index_count: i32) {
        unsafe {
            self.gl.draw_elements(glow::TRIANGLES, index_count, glow::UNSIGNED_SHORT, 0);
        }
    }

    // ===== TEXTURES =====

    fn create_texture(&mut self) -> Result<glow::Texture> {
        unsafe {
            self.gl
                .create_texture()
                .map_err(|reason| Self::creation_failed("texture", reason))
        }
    }

    fn upload_texture_rgba8(
        &mut self,
        texture: glow::Texture,
        width: u32,
        height: u32,
        pixels: &[u8],
        wrap: TextureWrap,
    ) {
        let wrap = wrap_to_gl(wrap);
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            self.gl.tex_image_2d(
                glow::TEXTURE_2D,
                0,
                glow::RGBA8 as i32,
                width as i32,
                height as i32,
                0,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(pixels)),
            );
            self.gl.generate_mipmap(glow::TEXTURE_2D);
            self.gl.tex_parameter_i32(
                glow::TEXTURE_2D,
                glow::TEXTURE_MIN_FILTER,
                glow::LINEAR_MIPMAP_LINEAR as i32,
            );
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_MAG_FILTER, glow::LINEAR as i32);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_S, wrap);
            self.gl.tex_parameter_i32(glow::TEXTURE_2D, glow::TEXTURE_WRAP_T, wrap);
            self.gl.bind_texture(glow::TEXTURE_2D, None);
        }
    }

    fn active_texture(&mut self, unit: u32) {
        unsafe {
            self.gl.active_texture(glow::TEXTURE0 + unit);
        }
    }

    fn bind_texture(&mut self, texture: Option<glow::Texture>) {
        unsafe {
            self.gl.bind_texture(glow::TEXTURE_2D, texture);
        }
    }

    fn delete_texture(&mut self, texture: glow::Texture) {
        unsafe {
            self.gl.delete_texture(texture);
        }
    }
}

#[cfg(test)]
#[path = "glow_device_tests.rs"]
mod tests;
