/*!
# Vis3D Render - OpenGL Backend

OpenGL 3.2+ implementation of the Vis3D render layer.

This crate provides [`GlowDevice`], a `GraphicsDevice` over the glow bindings.
Plugging it into `DeviceRenderer` gives a complete `Renderer`.

Context creation and buffer swapping stay with the windowing layer: the
caller hands over an already current `glow::Context`.
*/

mod glow_device;

pub use glow_device::GlowDevice;

use std::sync::Arc;
use vis3d_render::vis3d::{DeviceRenderer, RendererConfig};

/// Renderer over an OpenGL context
pub type OpenGlRenderer = DeviceRenderer<GlowDevice>;

/// Wrap a current OpenGL context into an uninitialized renderer
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use vis3d_render::vis3d::{Renderer, RendererConfig};
///
/// # fn context() -> glow::Context { unimplemented!() }
/// let gl = Arc::new(context());
/// let mut renderer = vis3d_render_opengl::create_renderer(gl, RendererConfig::default());
/// renderer.init()?;
/// # Ok::<(), vis3d_render::vis3d::Error>(())
/// ```
pub fn create_renderer(gl: Arc<glow::Context>, config: RendererConfig) -> OpenGlRenderer {
    DeviceRenderer::new(GlowDevice::new(gl), config)
}
