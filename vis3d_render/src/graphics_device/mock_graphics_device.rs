/// Mock GraphicsDevice (no GPU required)
///
/// Deterministic in-memory implementation of the graphics capability surface.
/// It lets the binders and the frame renderer run in unit tests and headless
/// tools, and records every call for later inspection.
///
/// Shader rules:
/// - a stage compiles when its source declares `main(` and its braces and
///   parentheses balance
/// - linking fails when a fragment `in` variable has no vertex `out` of the
///   same name
/// - every `uniform` declared in either stage receives a location

use std::collections::VecDeque;
use rustc_hash::{FxHashMap, FxHashSet};
use crate::error::Result;
use crate::graphics_device::{
    Attribute, BlendFactor, BufferUsage, ClearMask, DeviceInfo, GraphicsDevice,
    ShaderStage, TextureWrap, UniformValue,
};

/// Out-of-memory error code (GL_OUT_OF_MEMORY) for fault injection
pub const MOCK_OUT_OF_MEMORY: u32 = 0x0505;

// ============================================================================
// Mock objects
// ============================================================================

#[derive(Debug, Clone)]
struct MockShaderObject {
    stage: ShaderStage,
    source: String,
    compiled: bool,
    log: String,
}

#[derive(Debug, Clone, Default)]
struct MockProgram {
    attached: Vec<u32>,
    attrib_locations: Vec<(u32, String)>,
    linked: bool,
    log: String,
    uniforms: FxHashMap<String, u32>,
}

/// Contents of a mock buffer
#[derive(Debug, Clone, PartialEq)]
pub enum MockBufferData {
    Empty,
    Vertex { location: u32, span: i32, len: usize, usage: BufferUsage },
    Index { len: usize, usage: BufferUsage },
}

/// Contents of a mock texture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockTextureData {
    pub width: u32,
    pub height: u32,
    pub wrap: TextureWrap,
}

/// One recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub struct MockDraw {
    pub program: Option<u32>,
    pub vertex_array: Option<u32>,
    pub index_count: i32,
    pub active_unit: u32,
}

// ============================================================================
// MockGraphicsDevice
// ============================================================================

/// In-memory graphics device
#[derive(Debug)]
pub struct MockGraphicsDevice {
    info: DeviceInfo,
    next_id: u32,
    /// Every call issued, in order (e.g. `"compile_shader(1)"`)
    pub commands: Vec<String>,
    shaders: FxHashMap<u32, MockShaderObject>,
    programs: FxHashMap<u32, MockProgram>,
    vertex_arrays: FxHashSet<u32>,
    buffers: FxHashMap<u32, MockBufferData>,
    textures: FxHashMap<u32, Option<MockTextureData>>,
    attributes: FxHashMap<Attribute, bool>,
    blend_func: Option<(BlendFactor, BlendFactor)>,
    clear_color: [f32; 4],
    viewport: Option<(i32, i32, i32, i32)>,
    clear_count: u32,
    state_changes: u32,
    current_program: Option<u32>,
    bound_vertex_array: Option<u32>,
    active_unit: u32,
    unit_textures: FxHashMap<u32, u32>,
    uniform_values: FxHashMap<u32, UniformValue>,
    compiled_stages: Vec<ShaderStage>,
    deleted_shaders: u32,
    draws: Vec<MockDraw>,
    pending_errors: VecDeque<u32>,
    upload_failure: Option<u32>,
}

impl Default for MockGraphicsDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl MockGraphicsDevice {
    /// Create a device reporting a 3.3 context, 4096px textures and 16 units
    pub fn new() -> Self {
        Self::with_info(DeviceInfo {
            context_version: (3, 3),
            max_texture_size: 4096,
            max_texture_units: 16,
            renderer_name: "vis3d mock device".to_string(),
        })
    }

    /// Create a device reporting the given capabilities
    pub fn with_info(info: DeviceInfo) -> Self {
        Self {
            info,
            next_id: 1,
            commands: Vec::new(),
            shaders: FxHashMap::default(),
            programs: FxHashMap::default(),
            vertex_arrays: FxHashSet::default(),
            buffers: FxHashMap::default(),
            textures: FxHashMap::default(),
            attributes: FxHashMap::default(),
            blend_func: None,
            clear_color: [0.0; 4],
            viewport: None,
            clear_count: 0,
            state_changes: 0,
            current_program: None,
            bound_vertex_array: None,
            active_unit: 0,
            unit_textures: FxHashMap::default(),
            uniform_values: FxHashMap::default(),
            compiled_stages: Vec::new(),
            deleted_shaders: 0,
            draws: Vec::new(),
            pending_errors: VecDeque::new(),
            upload_failure: None,
        }
    }

    // ===== FAULT INJECTION =====

    /// Make the next buffer or texture upload raise `code`
    pub fn fail_next_upload(&mut self, code: u32) {
        self.upload_failure = Some(code);
    }

    /// Queue an error as if raised by a call outside the render layer
    pub fn inject_error(&mut self, code: u32) {
        self.pending_errors.push_back(code);
    }

    // ===== INSPECTION =====

    pub fn is_enabled(&self, attribute: Attribute) -> bool {
        self.attributes.get(&attribute).copied().unwrap_or(false)
    }

    pub fn blend_function(&self) -> Option<(BlendFactor, BlendFactor)> {
        self.blend_func
    }

    pub fn current_clear_color(&self) -> [f32; 4] {
        self.clear_color
    }

    pub fn current_viewport(&self) -> Option<(i32, i32, i32, i32)> {
        self.viewport
    }

    pub fn clear_count(&self) -> u32 {
        self.clear_count
    }

    /// Number of state-setting calls (attributes, blend, clear color, viewport)
    pub fn state_changes(&self) -> u32 {
        self.state_changes
    }

    /// Stages passed to `compile_shader`, in call order
    pub fn compiled_stages(&self) -> &[ShaderStage] {
        &self.compiled_stages
    }

    pub fn live_shader_count(&self) -> usize {
        self.shaders.len()
    }

    pub fn deleted_shader_count(&self) -> u32 {
        self.deleted_shaders
    }

    pub fn live_program_count(&self) -> usize {
        self.programs.len()
    }

    pub fn live_vertex_array_count(&self) -> usize {
        self.vertex_arrays.len()
    }

    pub fn live_buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn live_texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn buffer_data(&self, buffer: u32) -> Option<&MockBufferData> {
        self.buffers.get(&buffer)
    }

    pub fn texture_data(&self, texture: u32) -> Option<MockTextureData> {
        self.textures.get(&texture).copied().flatten()
    }

    /// Texture bound to `unit`, if any
    pub fn texture_on_unit(&self, unit: u32) -> Option<u32> {
        self.unit_textures.get(&unit).copied()
    }

    pub fn current_program(&self) -> Option<u32> {
        self.current_program
    }

    pub fn bound_vertex_array(&self) -> Option<u32> {
        self.bound_vertex_array
    }

    pub fn active_unit(&self) -> u32 {
        self.active_unit
    }

    /// Attribute locations bound on `program` before linking
    pub fn attrib_locations(&self, program: u32) -> Vec<(u32, String)> {
        self.programs
            .get(&program)
            .map(|p| p.attrib_locations.clone())
            .unwrap_or_default()
    }

    /// Last value pushed to the uniform `name` of `program`
    pub fn uniform_value(&self, program: u32, name: &str) -> Option<UniformValue> {
        let location = self.programs.get(&program)?.uniforms.get(name)?;
        self.uniform_values.get(location).copied()
    }

    pub fn draws(&self) -> &[MockDraw] {
        &self.draws
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn take_upload_failure(&mut self) {
        if let Some(code) = self.upload_failure.take() {
            self.pending_errors.push_back(code);
        }
    }
}

// ============================================================================
// Source inspection helpers
// ============================================================================

/// Split GLSL-like source into declaration statements
fn statements(source: &str) -> impl Iterator<Item = Vec<&str>> + '_ {
    source
        .split(|c: char| c == ';' || c == '\n' || c == '{' || c == '}')
        .map(|statement| statement.split_whitespace().collect::<Vec<_>>())
        .filter(|tokens| !tokens.is_empty())
}

/// Names declared with the storage `qualifier` (`in`, `out`, `uniform`)
fn declared_names(source: &str, qualifier: &str) -> Vec<String> {
    statements(source)
        .filter(|tokens| tokens.len() >= 3 && tokens[0] == qualifier)
        .filter_map(|tokens| tokens.last().map(|name| {
            name.split('[').next().unwrap_or(name).to_string()
        }))
        .collect()
}

/// Check the source the way the mock compiler does
fn compile_source(stage: ShaderStage, source: &str) -> std::result::Result<(), String> {
    if !source.contains("main(") {
        return Err(format!("0:0(0): error: {:?} shader has no main function", stage));
    }
    for (open, close) in [('{', '}'), ('(', ')')] {
        let mut depth = 0i32;
        for (index, c) in source.chars().enumerate() {
            if c == open {
                depth += 1;
            } else if c == close {
                depth -= 1;
                if depth < 0 {
                    return Err(format!("0:{}(0): error: syntax error, unexpected '{}'", index, close));
                }
            }
        }
        if depth != 0 {
            return Err(format!("0:0(0): error: syntax error, unmatched '{}'", open));
        }
    }
    Ok(())
}

// ============================================================================
// GraphicsDevice implementation
// ============================================================================

impl GraphicsDevice for MockGraphicsDevice {
    type Shader = u32;
    type Program = u32;
    type VertexArray = u32;
    type Buffer = u32;
    type Texture = u32;
    type UniformLocation = u32;

    fn info(&self) -> DeviceInfo {
        self.info.clone()
    }

    fn take_error(&mut self) -> Option<u32> {
        self.pending_errors.pop_front()
    }

    fn set_attribute(&mut self, attribute: Attribute, enabled: bool) {
        self.commands.push(format!("set_attribute({:?}, {})", attribute, enabled));
        self.state_changes += 1;
        self.attributes.insert(attribute, enabled);
    }

    fn blend_func(&mut self, src: BlendFactor, dst: BlendFactor) {
        self.commands.push(format!("blend_func({:?}, {:?})", src, dst));
        self.state_changes += 1;
        self.blend_func = Some((src, dst));
    }

    fn clear_color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        self.commands.push(format!("clear_color({}, {}, {}, {})", r, g, b, a));
        self.state_changes += 1;
        self.clear_color = [r, g, b, a];
    }

    fn clear(&mut self, mask: ClearMask) {
        self.commands.push(format!("clear({:?})", mask));
        self.clear_count += 1;
    }

    fn viewport(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.commands.push(format!("viewport({}, {}, {}, {})", x, y, width, height));
        self.state_changes += 1;
        self.viewport = Some((x, y, width, height));
    }

    fn create_shader(&mut self, stage: ShaderStage) -> Result<u32> {
        let id = self.allocate_id();
        self.commands.push(format!("create_shader({:?})", stage));
        self.shaders.insert(id, MockShaderObject {
            stage,
            source: String::new(),
            compiled: false,
            log: String::new(),
        });
        Ok(id)
    }

    fn shader_source(&mut self, shader: u32, fragments: &[String]) {
        self.commands.push(format!("shader_source({})", shader));
        if let Some(object) = self.shaders.get_mut(&shader) {
            object.source = fragments.concat();
        }
    }

    fn compile_shader(&mut self, shader: u32) {
        self.commands.push(format!("compile_shader({})", shader));
        if let Some(object) = self.shaders.get_mut(&shader) {
            self.compiled_stages.push(object.stage);
            match compile_source(object.stage, &object.source) {
                Ok(()) => {
                    object.compiled = true;
                    object.log.clear();
                }
                Err(log) => {
                    object.compiled = false;
                    object.log = log;
                }
            }
        }
    }

    fn shader_compile_status(&self, shader: u32) -> bool {
        self.shaders.get(&shader).map(|s| s.compiled).unwrap_or(false)
    }

    fn shader_info_log(&self, shader: u32) -> String {
        self.shaders.get(&shader).map(|s| s.log.clone()).unwrap_or_default()
    }

    fn delete_shader(&mut self, shader: u32) {
        self.commands.push(format!("delete_shader({})", shader));
        if self.shaders.remove(&shader).is_some() {
            self.deleted_shaders += 1;
        }
    }

    fn create_program(&mut self) -> Result<u32> {
        let id = self.allocate_id();
        self.commands.push("create_program".to_string());
        self.programs.insert(id, MockProgram::default());
        Ok(id)
    }

    fn attach_shader(&mut self, program: u32, shader: u32) {
        self.commands.push(format!("attach_shader({}, {})", program, shader));
        if let Some(p) = self.programs.get_mut(&program) {
            p.attached.push(shader);
        }
    }

    fn bind_attrib_location(&mut self, program: u32, index: u32, name: &str) {
        self.commands.push(format!("bind_attrib_location({}, {}, {})", program, index, name));
        if let Some(p) = self.programs.get_mut(&program) {
            p.attrib_locations.push((index, name.to_string()));
        }
    }

    fn link_program(&mut self, program: u32) {
        self.commands.push(format!("link_program({})", program));

        // Attached shader objects may be deleted after linking, so the
        // sources are read now, as a driver would.
        let Some(attached) = self.programs.get(&program).map(|p| p.attached.clone()) else {
            return;
        };
        let mut vertex = None;
        let mut fragment = None;
        for id in attached {
            if let Some(object) = self.shaders.get(&id).filter(|s| s.compiled) {
                match object.stage {
                    ShaderStage::Vertex => vertex = Some(object.source.clone()),
                    ShaderStage::Fragment => fragment = Some(object.source.clone()),
                }
            }
        }

        let outcome = match (vertex, fragment) {
            (Some(vertex), Some(fragment)) => {
                let outputs = declared_names(&vertex, "out");
                let unmatched: Vec<String> = declared_names(&fragment, "in")
                    .into_iter()
                    .filter(|name| !outputs.contains(name))
                    .collect();
                if unmatched.is_empty() {
                    let mut names = declared_names(&vertex, "uniform");
                    names.extend(declared_names(&fragment, "uniform"));
                    Ok(names)
                } else {
                    Err(format!(
                        "error: fragment shader input(s) {} not written by vertex shader",
                        unmatched.join(", ")
                    ))
                }
            }
            _ => Err("error: program needs a compiled vertex and fragment shader".to_string()),
        };

        let mut locations = FxHashMap::default();
        if let Ok(names) = &outcome {
            for name in names {
                if !locations.contains_key(name) {
                    let location = self.allocate_id();
                    locations.insert(name.clone(), location);
                }
            }
        }
        if let Some(p) = self.programs.get_mut(&program) {
            match outcome {
                Ok(_) => {
                    p.linked = true;
                    p.log.clear();
                    p.uniforms = locations;
                }
                Err(log) => {
                    p.linked = false;
                    p.log = log;
                    p.uniforms.clear();
                }
            }
        }
    }

    fn program_link_status(&self, program: u32) -> bool {
        self.programs.get(&program).map(|p| p.linked).unwrap_or(false)
    }

    fn program_info_log(&self, program: u32) -> String {
        self.programs.get(&program).map(|p| p.log.clone()).unwrap_or_default()
    }

    fn delete_program(&mut self, program: u32) {
        self.commands.push(format!("delete_program({})", program));
        if self.programs.remove(&program).is_some() && self.current_program == Some(program) {
            self.current_program = None;
        }
    }

    fn uniform_location(&self, program: u32, name: &str) -> Option<u32> {
        self.programs
            .get(&program)
            .filter(|p| p.linked)
            .and_then(|p| p.uniforms.get(name).copied())
    }

    fn use_program(&mut self, program: Option<u32>) {
        self.commands.push(format!("use_program({:?})", program));
        self.current_program = program;
    }

    fn set_uniform(&mut self, location: &u32, value: UniformValue) {
        self.commands.push(format!("set_uniform({})", location));
        self.uniform_values.insert(*location, value);
    }

    fn create_vertex_array(&mut self) -> Result<u32> {
        let id = self.allocate_id();
        self.commands.push("create_vertex_array".to_string());
        self.vertex_arrays.insert(id);
        Ok(id)
    }

    fn bind_vertex_array(&mut self, vertex_array: Option<u32>) {
        self.commands.push(format!("bind_vertex_array({:?})", vertex_array));
        self.bound_vertex_array = vertex_array;
    }

    fn delete_vertex_array(&mut self, vertex_array: u32) {
        self.commands.push(format!("delete_vertex_array({})", vertex_array));
        self.vertex_arrays.remove(&vertex_array);
        if self.bound_vertex_array == Some(vertex_array) {
            self.bound_vertex_array = None;
        }
    }

    fn create_buffer(&mut self) -> Result<u32> {
        let id = self.allocate_id();
        self.commands.push("create_buffer".to_string());
        self.buffers.insert(id, MockBufferData::Empty);
        Ok(id)
    }

    fn delete_buffer(&mut self, buffer: u32) {
        self.commands.push(format!("delete_buffer({})", buffer));
        self.buffers.remove(&buffer);
    }

    fn upload_vertex_data(&mut self, buffer: u32, location: u32, span: i32, data: &[f32], usage: BufferUsage) {
        self.commands.push(format!("upload_vertex_data({}, {}, {})", buffer, location, span));
        if let Some(slot) = self.buffers.get_mut(&buffer) {
            *slot = MockBufferData::Vertex { location, span, len: data.len(), usage };
        }
        self.take_upload_failure();
    }

    fn upload_index_data(&mut self, buffer: u32, data: &[u16], usage: BufferUsage) {
        self.commands.push(format!("upload_index_data({})", buffer));
        if let Some(slot) = self.buffers.get_mut(&buffer) {
            *slot = MockBufferData::Index { len: data.len(), usage };
        }
        self.take_upload_failure();
    }

    fn draw_triangles(&mut self, index_count: i32) {
        self.commands.push(format!("draw_triangles({})", index_count));
        self.draws.push(MockDraw {
            program: self.current_program,
            vertex_array: self.bound_vertex_array,
            index_count,
            active_unit: self.active_unit,
        });
    }

    fn create_texture(&mut self) -> Result<u32> {
        let id = self.allocate_id();
        self.commands.push("create_texture".to_string());
        self.textures.insert(id, None);
        Ok(id)
    }

    fn upload_texture_rgba8(&mut self, texture: u32, width: u32, height: u32, _pixels: &[u8], wrap: TextureWrap) {
        self.commands.push(format!("upload_texture_rgba8({}, {}, {})", texture, width, height));
        if let Some(slot) = self.textures.get_mut(&texture) {
            *slot = Some(MockTextureData { width, height, wrap });
        }
        self.take_upload_failure();
    }

    fn active_texture(&mut self, unit: u32) {
        self.commands.push(format!("active_texture({})", unit));
        self.active_unit = unit;
    }

    fn bind_texture(&mut self, texture: Option<u32>) {
        self.commands.push(format!("bind_texture({:?})", texture));
        match texture {
            Some(texture) => {
                self.unit_textures.insert(self.active_unit, texture);
            }
            None => {
                self.unit_textures.remove(&self.active_unit);
            }
        }
    }

    fn delete_texture(&mut self, texture: u32) {
        self.commands.push(format!("delete_texture({})", texture));
        self.textures.remove(&texture);
        self.unit_textures.retain(|_, bound| *bound != texture);
    }
}

#[cfg(test)]
#[path = "mock_graphics_device_tests.rs"]
mod tests;
