//! Resource-level mesh type.
//!
//! A `Mesh` holds model (or glyph banner) geometry in the layout the shaders
//! expect:
//!
//! | Data        | Layout location | Floats per vertex | Required |
//! |-------------|-----------------|-------------------|----------|
//! | vertices    | 0 (`in_v`)      | 4 (x, y, z, w)    | yes      |
//! | normals     | 1 (`in_n`)      | 3                 | no       |
//! | tex coords  | 2 (`in_t`)      | 2 (u, v)          | glyphs   |
//!
//! Faces are `u16` triangle indices, so a mesh holds at most
//! [`MAX_VERTICES`] vertices. The CPU buffers are surrendered once the mesh
//! is bound: the binder empties them after copying the data to the card.

use slotmap::new_key_type;
use crate::error::ResourceKind;

// ===== SLOT MAP KEY =====

new_key_type! {
    /// Generational handle to a bound mesh.
    ///
    /// A handle becomes stale when its mesh is released; stale handles are
    /// rejected by the renderer instead of aliasing a newer mesh.
    pub struct MeshHandle;
}

/// Layout location of vertex positions
pub const VERTEX_LOCATION: u32 = 0;
/// Layout location of vertex normals
pub const NORMAL_LOCATION: u32 = 1;
/// Layout location of texture coordinates
pub const TEX_COORD_LOCATION: u32 = 2;

/// Floats per vertex position
pub const VERTEX_SPAN: usize = 4;
/// Floats per normal
pub const NORMAL_SPAN: usize = 3;
/// Floats per texture coordinate
pub const TEX_COORD_SPAN: usize = 2;

/// Largest vertex count addressable by u16 faces
pub const MAX_VERTICES: usize = u16::MAX as usize + 1;

// ============================================================================
// MESH
// ============================================================================

/// 3D model data ready to be bound to the graphics card
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Unique mesh name
    pub name: String,
    /// Vertex positions, arranged as [][4]f32
    pub vertices: Vec<f32>,
    /// Vertex normals, arranged as [][3]f32
    pub normals: Vec<f32>,
    /// Texture coordinates, arranged as [][2]f32
    pub tex_coords: Vec<f32>,
    /// Triangle indices, arranged as [][3]u16
    pub faces: Vec<u16>,
    handle: Option<MeshHandle>,
}

impl Mesh {
    /// Create an empty, unbound mesh
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set vertex positions (4 floats per vertex)
    pub fn with_vertices(mut self, vertices: Vec<f32>) -> Self {
        self.vertices = vertices;
        self
    }

    /// Set vertex normals (3 floats per vertex)
    pub fn with_normals(mut self, normals: Vec<f32>) -> Self {
        self.normals = normals;
        self
    }

    /// Set texture coordinates (2 floats per vertex)
    pub fn with_tex_coords(mut self, tex_coords: Vec<f32>) -> Self {
        self.tex_coords = tex_coords;
        self
    }

    /// Set triangle indices
    pub fn with_faces(mut self, faces: Vec<u16>) -> Self {
        self.faces = faces;
        self
    }

    /// GPU handle, present once a bind succeeded
    pub fn handle(&self) -> Option<MeshHandle> {
        self.handle
    }

    /// True once the mesh has a GPU handle
    pub fn is_bound(&self) -> bool {
        self.handle.is_some()
    }

    /// Number of vertices described by the position data
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / VERTEX_SPAN
    }

    /// Total bytes held by the CPU buffers
    pub fn size_bytes(&self) -> usize {
        (self.vertices.len() + self.normals.len() + self.tex_coords.len()) * std::mem::size_of::<f32>()
            + self.faces.len() * std::mem::size_of::<u16>()
    }

    /// Check the buffers describe a drawable mesh of the given kind.
    ///
    /// Returns the reason the graphics layer would reject the data.
    pub fn validate(&self, kind: ResourceKind) -> std::result::Result<(), String> {
        if self.vertices.is_empty() {
            return Err("no vertex data".to_string());
        }
        if self.vertices.len() % VERTEX_SPAN != 0 {
            return Err(format!(
                "{} vertex floats is not a multiple of {}",
                self.vertices.len(), VERTEX_SPAN
            ));
        }
        let count = self.vertex_count();
        if count > MAX_VERTICES {
            return Err(format!("{} vertices exceeds the limit of {}", count, MAX_VERTICES));
        }
        if kind == ResourceKind::Mesh && !self.normals.is_empty() && self.normals.len() != count * NORMAL_SPAN {
            return Err(format!("{} normal floats for {} vertices", self.normals.len(), count));
        }
        if kind == ResourceKind::Glyphs && self.tex_coords.is_empty() {
            return Err("glyphs need texture coordinates".to_string());
        }
        if !self.tex_coords.is_empty() && self.tex_coords.len() != count * TEX_COORD_SPAN {
            return Err(format!("{} texture coordinate floats for {} vertices", self.tex_coords.len(), count));
        }
        if self.faces.is_empty() {
            return Err("no face data".to_string());
        }
        if self.faces.len() % 3 != 0 {
            return Err(format!("{} face indices do not form triangles", self.faces.len()));
        }
        if let Some(index) = self.faces.iter().find(|&&index| index as usize >= count) {
            return Err(format!("face index {} out of range for {} vertices", index, count));
        }
        Ok(())
    }

    pub(crate) fn set_handle(&mut self, handle: Option<MeshHandle>) {
        self.handle = handle;
    }

    /// Drop the CPU copy once the data lives on the card
    pub(crate) fn release_cpu_data(&mut self) {
        self.vertices = Vec::new();
        self.normals = Vec::new();
        self.tex_coords = Vec::new();
        self.faces = Vec::new();
    }
}

#[cfg(test)]
#[path = "mesh_tests.rs"]
mod tests;
