/// DeviceRenderer - `Renderer` implementation over any `GraphicsDevice`
///
/// Owns the device and composes the state controller, the two binders and
/// the frame renderer. Each component receives the device explicitly.

use crate::config::RendererConfig;
use crate::error::{Error, Result, ResourceKind};
use crate::graphics_device::{Attribute, GraphicsDevice};
use crate::renderer::{
    DrawDescriptor, FrameRenderer, ProgramBinder, Renderer, RendererStats, ResourceBinder,
    StateController,
};
use crate::resource::{Mesh, MeshHandle, ProgramHandle, Shader, Texture, TextureHandle};
use crate::{engine_error, engine_info};

/// Renderer driving a single graphics device
pub struct DeviceRenderer<D: GraphicsDevice> {
    device: D,
    config: RendererConfig,
    initialized: bool,
    state: StateController,
    programs: ProgramBinder<D>,
    resources: ResourceBinder<D>,
    frame: FrameRenderer,
}

impl<D: GraphicsDevice> DeviceRenderer<D> {
    /// Create an uninitialized renderer. Call `init` before anything else.
    pub fn new(device: D, config: RendererConfig) -> Self {
        let resources = ResourceBinder::new(config.check_errors);
        Self {
            device,
            config,
            initialized: false,
            state: StateController::new(),
            programs: ProgramBinder::new(),
            resources,
            frame: FrameRenderer::new(),
        }
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    pub fn device_mut(&mut self) -> &mut D {
        &mut self.device
    }

    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn state(&self) -> &StateController {
        &self.state
    }

    pub fn programs(&self) -> &ProgramBinder<D> {
        &self.programs
    }

    pub fn resources(&self) -> &ResourceBinder<D> {
        &self.resources
    }

    fn ensure_initialized(&self, operation: &str) -> Result<()> {
        if self.initialized {
            Ok(())
        } else {
            engine_error!("vis3d::Renderer", "{} called before init", operation);
            Err(Error::NotInitialized)
        }
    }
}

impl<D: GraphicsDevice> Renderer for DeviceRenderer<D> {
    fn init(&mut self) -> Result<()> {
        if self.initialized {
            engine_error!("vis3d::Renderer", "Renderer already initialized");
            return Err(Error::InitializationFailed("renderer already initialized".to_string()));
        }

        let info = self.device.info();
        if !self.config.accepts_version(info.context_version) {
            let (major, minor) = info.context_version;
            let (min_major, min_minor) = self.config.min_context_version;
            let message = format!(
                "context version {}.{} is below the required {}.{}",
                major, minor, min_major, min_minor
            );
            engine_error!("vis3d::Renderer", "{}", message);
            return Err(Error::InitializationFailed(message));
        }

        let texture_units = self.config.max_texture_units.min(info.max_texture_units);
        self.resources.configure(info.max_texture_size, texture_units);
        self.state.reset(&mut self.device);
        self.initialized = true;

        engine_info!(
            "vis3d::Renderer",
            "Initialized on {} (context {}.{}, {} texture units, max texture {}px)",
            info.renderer_name,
            info.context_version.0,
            info.context_version.1,
            texture_units,
            info.max_texture_size
        );
        Ok(())
    }

    fn clear(&mut self) {
        if self.ensure_initialized("clear").is_ok() {
            self.state.clear(&mut self.device);
        }
    }

    fn color(&mut self, r: f32, g: f32, b: f32, a: f32) {
        if self.ensure_initialized("color").is_ok() {
            self.state.set_clear_color(&mut self.device, r, g, b, a);
        }
    }

    fn enable(&mut self, attribute: Attribute, enabled: bool) {
        if self.ensure_initialized("enable").is_ok() {
            self.state.enable(&mut self.device, attribute, enabled);
        }
    }

    fn viewport(&mut self, width: i32, height: i32) -> Result<()> {
        self.ensure_initialized("viewport")?;
        self.state.set_viewport(&mut self.device, width, height)
    }

    fn map_texture(&mut self, unit: u32, texture: &Texture) -> Result<()> {
        self.ensure_initialized("map_texture")?;
        self.resources.map_texture_unit(&mut self.device, unit, texture)
    }

    fn bind_model(&mut self, mesh: &mut Mesh) -> Result<MeshHandle> {
        self.ensure_initialized("bind_model")?;
        self.resources.bind_mesh(&mut self.device, mesh, ResourceKind::Mesh)
    }

    fn bind_glyphs(&mut self, glyphs: &mut Mesh) -> Result<MeshHandle> {
        self.ensure_initialized("bind_glyphs")?;
        self.resources.bind_mesh(&mut self.device, glyphs, ResourceKind::Glyphs)
    }

    fn bind_texture(&mut self, texture: &mut Texture) -> Result<TextureHandle> {
        self.ensure_initialized("bind_texture")?;
        self.resources.bind_texture(&mut self.device, texture)
    }

    fn bind_shader(&mut self, shader: &mut Shader) -> Result<ProgramHandle> {
        self.ensure_initialized("bind_shader")?;
        self.programs.bind_shader(&mut self.device, shader)
    }

    fn render(&mut self, descriptor: &DrawDescriptor) -> Result<()> {
        self.ensure_initialized("render")?;
        self.frame.render(
            &mut self.device,
            &self.programs,
            &self.resources,
            self.state.viewport(),
            descriptor,
        )
    }

    fn release_model(&mut self, mesh: &mut Mesh) -> Result<()> {
        self.ensure_initialized("release_model")?;
        self.resources.release_mesh(&mut self.device, mesh)
    }

    fn release_texture(&mut self, texture: &mut Texture) -> Result<()> {
        self.ensure_initialized("release_texture")?;
        self.resources.release_texture(&mut self.device, texture)
    }

    fn release_shader(&mut self, shader: &mut Shader) -> Result<()> {
        self.ensure_initialized("release_shader")?;
        self.programs.release(&mut self.device, shader)
    }

    fn begin_frame(&mut self) {
        self.frame.begin_frame();
    }

    fn stats(&self) -> RendererStats {
        self.frame.stats()
    }
}

#[cfg(test)]
#[path = "device_renderer_tests.rs"]
mod tests;
