/// Frame renderer - one draw call per draw descriptor
///
/// The descriptor is checked against the binders before any device command
/// is issued. The draw path itself does not allocate.

use std::time::Instant;
use glam::Mat3;

use crate::error::{Error, Result};
use crate::graphics_device::{GraphicsDevice, UniformValue};
use crate::renderer::{DrawDescriptor, ProgramBinder, RendererStats, ResourceBinder};
use crate::resource::{Rgb, UniformKind};
use crate::engine_error;

/// Material colours used when a descriptor has no material
const DEFAULT_AMBIENT: Rgb = Rgb::BLACK;
const DEFAULT_DIFFUSE: Rgb = Rgb::WHITE;
const DEFAULT_SPECULAR: Rgb = Rgb::BLACK;

/// Issues draws and keeps per-frame statistics
#[derive(Debug)]
pub struct FrameRenderer {
    started: Instant,
    stats: RendererStats,
}

impl Default for FrameRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameRenderer {
    /// Create a renderer; the `time` uniform counts from now
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            stats: RendererStats::default(),
        }
    }

    pub fn stats(&self) -> RendererStats {
        self.stats
    }

    /// Reset the statistics for a new frame
    pub fn begin_frame(&mut self) {
        self.stats = RendererStats::default();
    }

    /// Seconds elapsed since creation
    pub fn elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// Draw one visible object
    ///
    /// # Arguments
    ///
    /// * `device` - Graphics device owning every handle
    /// * `programs` - Binder that linked `descriptor.program`
    /// * `resources` - Binder holding `descriptor.mesh` and the texture units
    /// * `viewport` - Current viewport size, pushed to `resolution`
    /// * `descriptor` - Transforms, scalars and handles of the object
    pub fn render<D: GraphicsDevice>(
        &mut self,
        device: &mut D,
        programs: &ProgramBinder<D>,
        resources: &ResourceBinder<D>,
        viewport: Option<(i32, i32)>,
        descriptor: &DrawDescriptor,
    ) -> Result<()> {
        let Some(program) = programs.get(descriptor.program) else {
            return Err(invalid("program handle is null or stale"));
        };
        let Some(mesh) = resources.mesh(descriptor.mesh) else {
            return Err(invalid("mesh handle is null or stale"));
        };
        let texture = match descriptor.texture_unit {
            Some(unit) => match resources.unit_texture(unit) {
                Some(texture) => Some((unit, texture)),
                None => {
                    engine_error!("vis3d::FrameRenderer", "No texture mapped on unit {}", unit);
                    return Err(Error::InvalidDescriptor(format!("no texture mapped on unit {}", unit)));
                }
            },
            None => None,
        };
        if texture.is_none() && program.samples_texture() {
            return Err(invalid("program samples a texture but no texture unit was given"));
        }

        device.bind_vertex_array(Some(mesh.vertex_array));
        device.use_program(Some(program.program));
        if let Some((unit, texture)) = texture {
            device.active_texture(unit);
            device.bind_texture(Some(texture));
        }

        let time = self.elapsed();
        for (kind, location) in &program.uniforms {
            if let Some(value) = uniform_value(*kind, descriptor, viewport, time) {
                device.set_uniform(location, value);
            }
        }
        device.draw_triangles(mesh.index_count);

        device.active_texture(0);
        device.use_program(None);
        device.bind_vertex_array(None);

        self.stats.draw_calls += 1;
        self.stats.triangles += (mesh.index_count / 3) as u32;
        Ok(())
    }
}

/// Value of a conventional uniform for this draw
fn uniform_value(
    kind: UniformKind,
    descriptor: &DrawDescriptor,
    viewport: Option<(i32, i32)>,
    time: f32,
) -> Option<UniformValue> {
    let material = descriptor.material;
    Some(match kind {
        UniformKind::ModelViewProjection => UniformValue::Mat4(descriptor.model_view_projection.to_cols_array()),
        UniformKind::ModelView => UniformValue::Mat4(descriptor.model_view.to_cols_array()),
        UniformKind::Normal => UniformValue::Mat3(Mat3::from_mat4(descriptor.model_view).to_cols_array()),
        UniformKind::LightPosition => UniformValue::Vec4(descriptor.light.position_uniform()),
        UniformKind::LightColor => UniformValue::Vec3(descriptor.light.color.to_array()),
        UniformKind::Ambient => UniformValue::Vec3(material.map_or(DEFAULT_AMBIENT, |m| m.ka).to_array()),
        UniformKind::Diffuse => UniformValue::Vec3(material.map_or(DEFAULT_DIFFUSE, |m| m.kd).to_array()),
        UniformKind::Specular => UniformValue::Vec3(material.map_or(DEFAULT_SPECULAR, |m| m.ks).to_array()),
        UniformKind::Scale => UniformValue::Vec3(descriptor.scale.to_array()),
        UniformKind::Fade => UniformValue::Float(descriptor.fade),
        UniformKind::Alpha => UniformValue::Float(descriptor.alpha * material.map_or(1.0, |m| m.tr)),
        UniformKind::Sampler => UniformValue::Int(descriptor.texture_unit? as i32),
        UniformKind::Time => UniformValue::Float(time),
        UniformKind::Resolution => {
            let (width, height) = viewport.unwrap_or((0, 0));
            UniformValue::Vec2([width as f32, height as f32])
        }
        UniformKind::RotationSpeed => UniformValue::Float(descriptor.rotation_speed),
    })
}

fn invalid(reason: &str) -> Error {
    engine_error!("vis3d::FrameRenderer", "Invalid draw descriptor: {}", reason);
    Error::InvalidDescriptor(reason.to_string())
}

#[cfg(test)]
#[path = "frame_renderer_tests.rs"]
mod tests;
