/// Shader program binder - compile, link and uniform resolution
///
/// `bind_program` runs the two-stage compile and the link against a program
/// object. Intermediate shader objects live in `ScopedShader` guards and are
/// deleted on every exit path. `ProgramBinder` owns the linked programs and
/// hands out generational `ProgramHandle`s.

use std::ops::{Deref, DerefMut};
use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::graphics_device::{GraphicsDevice, ShaderStage};
use crate::resource::{ProgramHandle, ProgramState, Shader, UniformKind, ATTRIBUTE_NAMES};
use crate::{engine_debug, engine_error};

// ============================================================================
// ScopedShader
// ============================================================================

/// Shader object deleted when the guard goes out of scope
///
/// The guard borrows the device and dereferences to it, so device calls can
/// be made through it while it is alive. Guards nest: a second guard can be
/// created from the first one.
pub struct ScopedShader<'a, D: GraphicsDevice> {
    device: &'a mut D,
    shader: D::Shader,
}

impl<'a, D: GraphicsDevice> ScopedShader<'a, D> {
    /// Create a shader object for `stage`
    pub fn create(device: &'a mut D, stage: ShaderStage) -> Result<Self> {
        let shader = device.create_shader(stage)?;
        Ok(Self { device, shader })
    }

    /// The guarded shader object
    pub fn shader(&self) -> D::Shader {
        self.shader
    }
}

impl<'a, D: GraphicsDevice> Deref for ScopedShader<'a, D> {
    type Target = D;

    fn deref(&self) -> &D {
        self.device
    }
}

impl<'a, D: GraphicsDevice> DerefMut for ScopedShader<'a, D> {
    fn deref_mut(&mut self) -> &mut D {
        self.device
    }
}

impl<'a, D: GraphicsDevice> Drop for ScopedShader<'a, D> {
    fn drop(&mut self) {
        self.device.delete_shader(self.shader);
    }
}

// ============================================================================
// bind_program
// ============================================================================

/// Compile `vertex` and `fragment` and link them into `program`
///
/// The fragment stage is only created once the vertex stage compiled.
/// `state` tracks progress and ends as `Linked` or `Failed`. There is no
/// validation step after linking, as validation needs a bound vertex array.
pub fn bind_program<D: GraphicsDevice>(
    device: &mut D,
    program: D::Program,
    vertex: &[String],
    fragment: &[String],
    state: &mut ProgramState,
) -> Result<()> {
    *state = ProgramState::Uncompiled;
    let outcome = compile_and_link(device, program, vertex, fragment, state);
    if let Err(error) = &outcome {
        *state = ProgramState::Failed(error.clone());
    }
    outcome
}

fn compile_and_link<D: GraphicsDevice>(
    device: &mut D,
    program: D::Program,
    vertex: &[String],
    fragment: &[String],
    state: &mut ProgramState,
) -> Result<()> {
    let mut vertex_shader = ScopedShader::create(device, ShaderStage::Vertex)?;
    let vs = vertex_shader.shader();
    compile_stage(&mut *vertex_shader, vs, ShaderStage::Vertex, vertex)?;
    vertex_shader.attach_shader(program, vs);
    *state = ProgramState::VertexCompiled;

    let mut fragment_shader = ScopedShader::create(&mut *vertex_shader, ShaderStage::Fragment)?;
    let fs = fragment_shader.shader();
    compile_stage(&mut *fragment_shader, fs, ShaderStage::Fragment, fragment)?;
    fragment_shader.attach_shader(program, fs);
    *state = ProgramState::FragmentCompiled;

    fragment_shader.link_program(program);
    if !fragment_shader.program_link_status(program) {
        let log = non_empty_log(fragment_shader.program_info_log(program), "program failed to link without a log");
        return Err(Error::LinkError { log });
    }
    *state = ProgramState::Linked;
    Ok(())
}

fn compile_stage<D: GraphicsDevice>(
    device: &mut D,
    shader: D::Shader,
    stage: ShaderStage,
    source: &[String],
) -> Result<()> {
    device.shader_source(shader, source);
    device.compile_shader(shader);
    if device.shader_compile_status(shader) {
        return Ok(());
    }
    let log = non_empty_log(device.shader_info_log(shader), "shader failed to compile without a log");
    Err(Error::CompileError { stage, log })
}

fn non_empty_log(log: String, fallback: &str) -> String {
    if log.trim().is_empty() {
        fallback.to_string()
    } else {
        log
    }
}

// ============================================================================
// ProgramBinder
// ============================================================================

/// Linked program and the conventional uniforms it exposes
pub(crate) struct GpuProgram<D: GraphicsDevice> {
    pub(crate) program: D::Program,
    pub(crate) uniforms: Vec<(UniformKind, D::UniformLocation)>,
}

impl<D: GraphicsDevice> GpuProgram<D> {
    /// True when the program reads a texture through the `uv` sampler
    pub(crate) fn samples_texture(&self) -> bool {
        self.uniforms.iter().any(|(kind, _)| *kind == UniformKind::Sampler)
    }
}

/// Arena of linked programs
pub struct ProgramBinder<D: GraphicsDevice> {
    programs: SlotMap<ProgramHandle, GpuProgram<D>>,
}

impl<D: GraphicsDevice> Default for ProgramBinder<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: GraphicsDevice> ProgramBinder<D> {
    pub fn new() -> Self {
        Self {
            programs: SlotMap::with_key(),
        }
    }

    /// Number of live programs
    pub fn len(&self) -> usize {
        self.programs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }

    /// True when `handle` refers to a live program
    pub fn contains(&self, handle: ProgramHandle) -> bool {
        self.programs.contains_key(handle)
    }

    pub(crate) fn get(&self, handle: ProgramHandle) -> Option<&GpuProgram<D>> {
        self.programs.get(handle)
    }

    /// Compile, link and resolve the uniforms of `shader`
    ///
    /// A shader that is already bound keeps its handle: the new program
    /// replaces the old one once it linked. If the reload fails, the old
    /// program stays bound and usable under that handle and the state keeps
    /// describing it. A first bind that fails leaves the shader unbound with
    /// a `Failed` state.
    pub fn bind_shader(&mut self, device: &mut D, shader: &mut Shader) -> Result<ProgramHandle> {
        let existing = shader.handle().filter(|handle| self.programs.contains_key(*handle));
        if existing.is_none() {
            shader.set_handle(None);
        }

        let mut state = ProgramState::Uncompiled;
        let linked = match self.link_shader(device, shader, &mut state) {
            Ok(linked) => linked,
            Err(error) => {
                engine_error!("vis3d::ProgramBinder", "Shader '{}': {}", shader.name, error);
                if existing.is_none() {
                    shader.set_state(ProgramState::Failed(error.clone()));
                }
                return Err(error);
            }
        };

        let handle = match existing.and_then(|h| self.programs.get_mut(h).map(|slot| (h, slot))) {
            Some((handle, slot)) => {
                let previous = std::mem::replace(slot, linked);
                device.delete_program(previous.program);
                handle
            }
            None => self.programs.insert(linked),
        };
        shader.set_handle(Some(handle));
        shader.set_state(state);
        engine_debug!("vis3d::ProgramBinder", "Shader '{}' linked", shader.name);
        Ok(handle)
    }

    fn link_shader(&self, device: &mut D, shader: &Shader, state: &mut ProgramState) -> Result<GpuProgram<D>> {
        if shader.vertex.is_empty() {
            return Err(Error::CompileError {
                stage: ShaderStage::Vertex,
                log: "no vertex source".to_string(),
            });
        }
        if shader.fragment.is_empty() {
            return Err(Error::CompileError {
                stage: ShaderStage::Fragment,
                log: "no fragment source".to_string(),
            });
        }

        let program = device.create_program()?;
        for (index, name) in ATTRIBUTE_NAMES {
            device.bind_attrib_location(program, index, name);
        }
        let uniforms = bind_program(device, program, &shader.vertex, &shader.fragment, state)
            .and_then(|()| resolve_uniforms(device, program, shader));
        match uniforms {
            Ok(uniforms) => Ok(GpuProgram { program, uniforms }),
            Err(error) => {
                device.delete_program(program);
                Err(error)
            }
        }
    }

    /// Delete the program of `shader` and invalidate its handle
    pub fn release(&mut self, device: &mut D, shader: &mut Shader) -> Result<()> {
        let released = shader.handle().map(|handle| self.discard(device, handle)).unwrap_or(false);
        shader.set_handle(None);
        shader.set_state(ProgramState::Uncompiled);
        if released {
            Ok(())
        } else {
            engine_error!("vis3d::ProgramBinder", "Shader '{}' is not bound", shader.name);
            Err(Error::InvalidResource(format!("shader '{}' is not bound", shader.name)))
        }
    }

    fn discard(&mut self, device: &mut D, handle: ProgramHandle) -> bool {
        match self.programs.remove(handle) {
            Some(gpu) => {
                device.delete_program(gpu.program);
                true
            }
            None => false,
        }
    }
}

/// Look up every declared uniform, keeping the conventional ones
fn resolve_uniforms<D: GraphicsDevice>(
    device: &D,
    program: D::Program,
    shader: &Shader,
) -> Result<Vec<(UniformKind, D::UniformLocation)>> {
    let mut uniforms = Vec::with_capacity(shader.uniforms.len());
    let mut missing = Vec::new();
    for name in &shader.uniforms {
        match device.uniform_location(program, name) {
            Some(location) => {
                if let Some(kind) = UniformKind::from_name(name) {
                    uniforms.push((kind, location));
                }
            }
            None => missing.push(name.clone()),
        }
    }
    if missing.is_empty() {
        Ok(uniforms)
    } else {
        Err(Error::MissingUniforms {
            shader: shader.name.clone(),
            names: missing,
        })
    }
}

#[cfg(test)]
#[path = "program_binder_tests.rs"]
mod tests;
