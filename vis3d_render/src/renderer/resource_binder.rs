/// Resource binder - mesh, glyph and texture upload, texture unit mapping
///
/// Data is validated before any device call, uploaded, and the device error
/// flag is checked afterwards. A successful bind empties the CPU buffers of
/// the resource; a failed one keeps them so the same object can be retried.
///
/// Every upload goes into freshly created GPU objects. Rebinding a bound
/// resource keeps its handle: the new objects replace the old ones only once
/// the upload succeeded, and the old ones are then deleted.

use slotmap::SlotMap;

use crate::error::{Error, Result, ResourceKind};
use crate::graphics_device::{BufferUsage, GraphicsDevice, TextureWrap};
use crate::resource::{
    Mesh, MeshHandle, Texture, TextureHandle,
    VERTEX_LOCATION, NORMAL_LOCATION, TEX_COORD_LOCATION,
    VERTEX_SPAN, NORMAL_SPAN, TEX_COORD_SPAN,
};
use crate::{engine_debug, engine_error, engine_warn};

// ============================================================================
// GPU-side records
// ============================================================================

/// Vertex array and buffers of a bound mesh
pub(crate) struct GpuMesh<D: GraphicsDevice> {
    pub(crate) vertex_array: D::VertexArray,
    vertices: D::Buffer,
    normals: Option<D::Buffer>,
    tex_coords: Option<D::Buffer>,
    faces: D::Buffer,
    pub(crate) index_count: i32,
    kind: ResourceKind,
}

impl<D: GraphicsDevice> GpuMesh<D> {
    fn buffers(&self) -> impl Iterator<Item = D::Buffer> {
        [Some(self.vertices), self.normals, self.tex_coords, Some(self.faces)]
            .into_iter()
            .flatten()
    }

    fn delete(self, device: &mut D) {
        for buffer in self.buffers() {
            device.delete_buffer(buffer);
        }
        device.delete_vertex_array(self.vertex_array);
    }
}

/// Texture object of a bound texture
pub(crate) struct GpuTexture<D: GraphicsDevice> {
    texture: D::Texture,
    width: u32,
    height: u32,
}

/// Objects created during one bind, deleted if the bind fails
struct Allocation<D: GraphicsDevice> {
    vertex_array: Option<D::VertexArray>,
    buffers: Vec<D::Buffer>,
}

impl<D: GraphicsDevice> Allocation<D> {
    fn new() -> Self {
        Self {
            vertex_array: None,
            buffers: Vec::new(),
        }
    }

    fn vertex_array(&mut self, device: &mut D) -> std::result::Result<D::VertexArray, String> {
        let vertex_array = device.create_vertex_array().map_err(|e| e.to_string())?;
        self.vertex_array = Some(vertex_array);
        Ok(vertex_array)
    }

    fn buffer(&mut self, device: &mut D) -> std::result::Result<D::Buffer, String> {
        let buffer = device.create_buffer().map_err(|e| e.to_string())?;
        self.buffers.push(buffer);
        Ok(buffer)
    }

    fn discard(self, device: &mut D) {
        for buffer in self.buffers {
            device.delete_buffer(buffer);
        }
        if let Some(vertex_array) = self.vertex_array {
            device.delete_vertex_array(vertex_array);
        }
    }
}

// ============================================================================
// ResourceBinder
// ============================================================================

/// Arenas of bound meshes and textures, plus the texture unit table
pub struct ResourceBinder<D: GraphicsDevice> {
    meshes: SlotMap<MeshHandle, GpuMesh<D>>,
    textures: SlotMap<TextureHandle, GpuTexture<D>>,
    units: Vec<Option<TextureHandle>>,
    max_texture_size: u32,
    check_errors: bool,
}

impl<D: GraphicsDevice> ResourceBinder<D> {
    /// Create a binder with no texture units. `configure` sets the limits
    /// once the device is known.
    pub fn new(check_errors: bool) -> Self {
        Self {
            meshes: SlotMap::with_key(),
            textures: SlotMap::with_key(),
            units: Vec::new(),
            max_texture_size: 0,
            check_errors,
        }
    }

    /// Set the largest texture size and the number of addressable units
    pub fn configure(&mut self, max_texture_size: u32, texture_units: u32) {
        self.max_texture_size = max_texture_size;
        self.units = vec![None; texture_units as usize];
    }

    pub fn texture_unit_count(&self) -> u32 {
        self.units.len() as u32
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn contains_mesh(&self, handle: MeshHandle) -> bool {
        self.meshes.contains_key(handle)
    }

    pub fn contains_texture(&self, handle: TextureHandle) -> bool {
        self.textures.contains_key(handle)
    }

    /// Texture mapped on `unit`, if any
    pub fn unit_mapping(&self, unit: u32) -> Option<TextureHandle> {
        self.units.get(unit as usize).copied().flatten()
    }

    pub(crate) fn mesh(&self, handle: MeshHandle) -> Option<&GpuMesh<D>> {
        self.meshes.get(handle)
    }

    /// GPU texture mapped on `unit`, if the mapping is still live
    pub(crate) fn unit_texture(&self, unit: u32) -> Option<D::Texture> {
        let handle = self.unit_mapping(unit)?;
        self.textures.get(handle).map(|gpu| gpu.texture)
    }

    // ===== MESHES =====

    /// Upload `mesh` as a model (static) or a glyph banner (dynamic)
    pub fn bind_mesh(&mut self, device: &mut D, mesh: &mut Mesh, kind: ResourceKind) -> Result<MeshHandle> {
        self.drain_stale_errors(device, kind, &mesh.name);
        if let Err(reason) = mesh.validate(kind) {
            return Err(bind_failed(kind, &mesh.name, reason));
        }

        let existing = mesh.handle().filter(|handle| self.meshes.contains_key(*handle));
        let mut fresh = Allocation::new();
        let outcome = upload_mesh(device, mesh, kind, &mut fresh);
        device.bind_vertex_array(None);
        let outcome = outcome.and_then(|gpu| match device.take_error() {
            Some(code) => {
                drain(device);
                Err(format!("device error 0x{:04X} during upload", code))
            }
            None => Ok(gpu),
        });

        let gpu = match outcome {
            Ok(gpu) => gpu,
            Err(reason) => {
                fresh.discard(device);
                return Err(bind_failed(kind, &mesh.name, reason));
            }
        };

        let handle = match existing.and_then(|h| self.meshes.get_mut(h).map(|slot| (h, slot))) {
            Some((handle, slot)) => {
                let previous = std::mem::replace(slot, gpu);
                previous.delete(device);
                handle
            }
            None => self.meshes.insert(gpu),
        };
        engine_debug!(
            "vis3d::ResourceBinder",
            "Bound {} '{}' ({} vertices, {} triangles)",
            kind, mesh.name, mesh.vertex_count(), mesh.faces.len() / 3
        );
        mesh.set_handle(Some(handle));
        mesh.release_cpu_data();
        Ok(handle)
    }

    /// Delete the vertex array and buffers of `mesh`
    pub fn release_mesh(&mut self, device: &mut D, mesh: &mut Mesh) -> Result<()> {
        let gpu = mesh.handle().and_then(|handle| self.meshes.remove(handle));
        mesh.set_handle(None);
        let Some(gpu) = gpu else {
            engine_error!("vis3d::ResourceBinder", "Mesh '{}' is not bound", mesh.name);
            return Err(Error::InvalidResource(format!("mesh '{}' is not bound", mesh.name)));
        };
        let kind = gpu.kind;
        gpu.delete(device);
        engine_debug!("vis3d::ResourceBinder", "Released {} '{}'", kind, mesh.name);
        Ok(())
    }

    // ===== TEXTURES =====

    /// Upload RGBA pixels, generating mipmaps
    pub fn bind_texture(&mut self, device: &mut D, texture: &mut Texture) -> Result<TextureHandle> {
        let kind = ResourceKind::Texture;
        self.drain_stale_errors(device, kind, &texture.name);
        if let Err(reason) = texture.validate(self.max_texture_size) {
            return Err(bind_failed(kind, &texture.name, reason));
        }

        let existing = texture.handle().filter(|handle| self.textures.contains_key(*handle));
        let gpu_texture = match device.create_texture() {
            Ok(created) => created,
            Err(error) => return Err(bind_failed(kind, &texture.name, error.to_string())),
        };

        let wrap = if texture.repeat { TextureWrap::Repeat } else { TextureWrap::ClampToEdge };
        device.upload_texture_rgba8(gpu_texture, texture.width, texture.height, &texture.pixels, wrap);
        if let Some(code) = device.take_error() {
            drain(device);
            device.delete_texture(gpu_texture);
            return Err(bind_failed(kind, &texture.name, format!("device error 0x{:04X} during upload", code)));
        }

        let record = GpuTexture {
            texture: gpu_texture,
            width: texture.width,
            height: texture.height,
        };
        let handle = match existing.and_then(|h| self.textures.get_mut(h).map(|slot| (h, slot))) {
            Some((handle, slot)) => {
                let previous = std::mem::replace(slot, record);
                device.delete_texture(previous.texture);
                self.rebind_units(device, handle, gpu_texture);
                handle
            }
            None => self.textures.insert(record),
        };
        engine_debug!(
            "vis3d::ResourceBinder",
            "Bound texture '{}' ({}x{})",
            texture.name, texture.width, texture.height
        );
        texture.set_handle(Some(handle));
        texture.release_cpu_data();
        Ok(handle)
    }

    /// Assign a bound texture to a numbered sampler unit and bind it there
    pub fn map_texture_unit(&mut self, device: &mut D, unit: u32, texture: &Texture) -> Result<()> {
        let unit_count = self.units.len();
        if unit as usize >= unit_count {
            engine_error!(
                "vis3d::ResourceBinder",
                "Texture unit {} out of range (0..{})",
                unit, unit_count
            );
            return Err(Error::InvalidResource(format!(
                "texture unit {} out of range (0..{})",
                unit, unit_count
            )));
        }
        let Some((handle, gpu_texture)) = texture
            .handle()
            .and_then(|h| self.textures.get(h).map(|gpu| (h, gpu.texture)))
        else {
            engine_error!("vis3d::ResourceBinder", "Texture '{}' is not bound", texture.name);
            return Err(Error::InvalidResource(format!("texture '{}' is not bound", texture.name)));
        };
        self.units[unit as usize] = Some(handle);
        device.active_texture(unit);
        device.bind_texture(Some(gpu_texture));
        Ok(())
    }

    /// Delete the texture object of `texture` and clear its unit mappings
    pub fn release_texture(&mut self, device: &mut D, texture: &mut Texture) -> Result<()> {
        let removed = texture.handle().and_then(|handle| self.textures.remove(handle).map(|gpu| (handle, gpu)));
        texture.set_handle(None);
        let Some((handle, gpu)) = removed else {
            engine_error!("vis3d::ResourceBinder", "Texture '{}' is not bound", texture.name);
            return Err(Error::InvalidResource(format!("texture '{}' is not bound", texture.name)));
        };
        for slot in self.units.iter_mut().filter(|slot| **slot == Some(handle)) {
            *slot = None;
        }
        device.delete_texture(gpu.texture);
        engine_debug!(
            "vis3d::ResourceBinder",
            "Released texture '{}' ({}x{})",
            texture.name, gpu.width, gpu.height
        );
        Ok(())
    }

    /// Put the replacement texture back on every unit mapped to `handle`
    fn rebind_units(&self, device: &mut D, handle: TextureHandle, texture: D::Texture) {
        for (unit, mapped) in self.units.iter().enumerate() {
            if *mapped == Some(handle) {
                device.active_texture(unit as u32);
                device.bind_texture(Some(texture));
            }
        }
    }

    fn drain_stale_errors(&self, device: &mut D, kind: ResourceKind, name: &str) {
        if !self.check_errors {
            return;
        }
        while let Some(code) = device.take_error() {
            engine_warn!(
                "vis3d::ResourceBinder",
                "Device error 0x{:04X} pending before binding {} '{}'",
                code, kind, name
            );
        }
    }
}

/// Upload the streams of `mesh` into a new vertex array
///
/// Streams the mesh lacks get no buffer, so their attributes stay disabled.
fn upload_mesh<D: GraphicsDevice>(
    device: &mut D,
    mesh: &Mesh,
    kind: ResourceKind,
    fresh: &mut Allocation<D>,
) -> std::result::Result<GpuMesh<D>, String> {
    let usage = match kind {
        ResourceKind::Glyphs => BufferUsage::Dynamic,
        _ => BufferUsage::Static,
    };

    let vertex_array = fresh.vertex_array(device)?;
    device.bind_vertex_array(Some(vertex_array));

    let vertices = fresh.buffer(device)?;
    device.upload_vertex_data(vertices, VERTEX_LOCATION, VERTEX_SPAN as i32, &mesh.vertices, usage);

    let normals = if kind == ResourceKind::Mesh && !mesh.normals.is_empty() {
        let buffer = fresh.buffer(device)?;
        device.upload_vertex_data(buffer, NORMAL_LOCATION, NORMAL_SPAN as i32, &mesh.normals, usage);
        Some(buffer)
    } else {
        None
    };

    let tex_coords = if !mesh.tex_coords.is_empty() {
        let buffer = fresh.buffer(device)?;
        device.upload_vertex_data(buffer, TEX_COORD_LOCATION, TEX_COORD_SPAN as i32, &mesh.tex_coords, usage);
        Some(buffer)
    } else {
        None
    };

    let faces = fresh.buffer(device)?;
    device.upload_index_data(faces, &mesh.faces, usage);

    Ok(GpuMesh {
        vertex_array,
        vertices,
        normals,
        tex_coords,
        faces,
        index_count: mesh.faces.len() as i32,
        kind,
    })
}

fn drain<D: GraphicsDevice>(device: &mut D) {
    while device.take_error().is_some() {}
}

fn bind_failed(kind: ResourceKind, name: &str, reason: String) -> Error {
    engine_error!("vis3d::ResourceBinder", "Failed binding {} '{}': {}", kind, name, reason);
    Error::BindError {
        kind,
        reason: format!("'{}': {}", name, reason),
    }
}

#[cfg(test)]
#[path = "resource_binder_tests.rs"]
mod tests;
