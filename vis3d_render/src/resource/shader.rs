//! Resource-level shader type.
//!
//! A `Shader` carries the source fragments of a vertex/fragment stage pair
//! and the uniforms the program is expected to expose. Binding compiles and
//! links the sources into a GPU program identified by a [`ProgramHandle`].

use slotmap::new_key_type;
use crate::error::Error;
use crate::resource::shader_library;

new_key_type! {
    /// Generational handle to a linked GPU program
    pub struct ProgramHandle;
}

/// Attribute locations bound before linking, matching the mesh layout
pub const ATTRIBUTE_NAMES: [(u32, &str); 3] = [(0, "in_v"), (1, "in_n"), (2, "in_t")];

// ============================================================================
// PROGRAM STATE
// ============================================================================

/// Progress of a shader through compile and link
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ProgramState {
    #[default]
    Uncompiled,
    VertexCompiled,
    FragmentCompiled,
    Linked,
    /// Compile, link or uniform resolution failed
    Failed(Error),
}

impl ProgramState {
    pub fn is_linked(&self) -> bool {
        matches!(self, ProgramState::Linked)
    }
}

// ============================================================================
// UNIFORM CONVENTION
// ============================================================================

/// Uniforms driven from a draw descriptor, recognised by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UniformKind {
    /// `mvpm`: model-view-projection matrix
    ModelViewProjection,
    /// `mvm`: model-view matrix
    ModelView,
    /// `nm`: normal matrix
    Normal,
    /// `l`: light position
    LightPosition,
    /// `ld`: light colour
    LightColor,
    /// `ka`: material ambient colour
    Ambient,
    /// `kd`: material diffuse colour
    Diffuse,
    /// `ks`: material specular colour
    Specular,
    /// `scale`: per-axis model scale
    Scale,
    /// `fd`: fade distance
    Fade,
    /// `alpha`: transparency
    Alpha,
    /// `uv`: texture sampler unit
    Sampler,
    /// `time`: seconds since the renderer was created
    Time,
    /// `resolution`: viewport size in pixels
    Resolution,
    /// `rs`: rotation speed
    RotationSpeed,
}

impl UniformKind {
    /// Map a uniform name to its conventional meaning
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "mvpm" => Self::ModelViewProjection,
            "mvm" => Self::ModelView,
            "nm" => Self::Normal,
            "l" => Self::LightPosition,
            "ld" => Self::LightColor,
            "ka" => Self::Ambient,
            "kd" => Self::Diffuse,
            "ks" => Self::Specular,
            "scale" => Self::Scale,
            "fd" => Self::Fade,
            "alpha" => Self::Alpha,
            "uv" => Self::Sampler,
            "time" => Self::Time,
            "resolution" => Self::Resolution,
            "rs" => Self::RotationSpeed,
            _ => return None,
        })
    }
}

// ============================================================================
// SHADER
// ============================================================================

/// Vertex and fragment sources plus their expected uniforms
#[derive(Debug, Clone, Default)]
pub struct Shader {
    /// Unique shader name
    pub name: String,
    /// Vertex source fragments, concatenated in order
    pub vertex: Vec<String>,
    /// Fragment source fragments, concatenated in order
    pub fragment: Vec<String>,
    /// Uniform names the linked program must expose
    pub uniforms: Vec<String>,
    handle: Option<ProgramHandle>,
    state: ProgramState,
}

impl Shader {
    /// Create an unbound shader. Uniforms are detected from the sources.
    pub fn new(name: impl Into<String>, vertex: Vec<String>, fragment: Vec<String>) -> Self {
        let mut shader = Self {
            name: name.into(),
            vertex,
            fragment,
            ..Default::default()
        };
        shader.detect_uniforms();
        shader
    }

    /// Replace the expected uniform names
    pub fn with_uniforms<S: Into<String>>(mut self, uniforms: impl IntoIterator<Item = S>) -> Self {
        self.uniforms = uniforms.into_iter().map(Into::into).collect();
        self
    }

    /// Ready-made shader by name: `flat`, `flata`, `gouraud`, `phong`,
    /// `uv`, `uva`, `uvra` or `bb`
    pub fn builtin(name: &str) -> Option<Self> {
        let (vertex, fragment) = shader_library::sources(name)?;
        let mut shader = Self::new(
            name,
            vertex.iter().map(|line| line.to_string()).collect(),
            fragment.iter().map(|line| line.to_string()).collect(),
        );
        shader.ensure_new_lines();
        Some(shader)
    }

    /// Trim every fragment and terminate it with a newline so that
    /// line-per-fragment sources concatenate into valid text
    pub fn ensure_new_lines(&mut self) {
        for line in self.vertex.iter_mut().chain(self.fragment.iter_mut()) {
            *line = format!("{}\n", line.trim());
        }
    }

    /// Fill `uniforms` from the `uniform <type> <name>;` declarations of
    /// both stages
    pub fn detect_uniforms(&mut self) {
        let mut names: Vec<String> = Vec::new();
        let source = self.vertex.iter().chain(self.fragment.iter());
        for statement in source.flat_map(|fragment| fragment.split(|c: char| c == ';' || c == '\n')) {
            let tokens: Vec<&str> = statement.split_whitespace().collect();
            if tokens.len() >= 3 && tokens[0] == "uniform" {
                let name = tokens[tokens.len() - 1];
                let name = name.split('[').next().unwrap_or(name);
                if !names.iter().any(|known| known == name) {
                    names.push(name.to_string());
                }
            }
        }
        self.uniforms = names;
    }

    /// Program handle, present once the shader linked
    pub fn handle(&self) -> Option<ProgramHandle> {
        self.handle
    }

    pub fn is_bound(&self) -> bool {
        self.handle.is_some()
    }

    /// Compile/link progress of the last bind
    pub fn state(&self) -> &ProgramState {
        &self.state
    }

    pub(crate) fn set_handle(&mut self, handle: Option<ProgramHandle>) {
        self.handle = handle;
    }

    pub(crate) fn set_state(&mut self, state: ProgramState) {
        self.state = state;
    }
}

#[cfg(test)]
#[path = "shader_tests.rs"]
mod tests;
