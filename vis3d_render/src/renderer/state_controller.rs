/// State controller - cached pipeline attributes, clear colour and viewport
///
/// Every setter compares against the cached state first, so re-issuing the
/// same state never reaches the device.

use crate::error::{Error, Result};
use crate::graphics_device::{Attribute, BlendFactor, ClearMask, GraphicsDevice};
use crate::engine_error;

/// Blend function installed alongside alpha blending
const ALPHA_BLEND: (BlendFactor, BlendFactor) = (BlendFactor::SrcAlpha, BlendFactor::OneMinusSrcAlpha);

/// Pipeline state as last issued to the device
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineState {
    pub blend: bool,
    pub cull: bool,
    pub depth_test: bool,
    pub blend_func: (BlendFactor, BlendFactor),
    pub clear_color: [f32; 4],
    /// Width and height, unset until the first viewport call
    pub viewport: Option<(i32, i32)>,
}

impl Default for PipelineState {
    fn default() -> Self {
        Self {
            blend: false,
            cull: false,
            depth_test: false,
            blend_func: ALPHA_BLEND,
            clear_color: [0.0, 0.0, 0.0, 0.0],
            viewport: None,
        }
    }
}

impl PipelineState {
    pub fn is_enabled(&self, attribute: Attribute) -> bool {
        match attribute {
            Attribute::Blend => self.blend,
            Attribute::Cull => self.cull,
            Attribute::DepthTest => self.depth_test,
        }
    }

    fn flag_mut(&mut self, attribute: Attribute) -> &mut bool {
        match attribute {
            Attribute::Blend => &mut self.blend,
            Attribute::Cull => &mut self.cull,
            Attribute::DepthTest => &mut self.depth_test,
        }
    }
}

/// Owner of the pipeline state cache
#[derive(Debug, Default)]
pub struct StateController {
    state: PipelineState,
}

impl StateController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached state
    pub fn state(&self) -> &PipelineState {
        &self.state
    }

    /// Current viewport size, if one was set
    pub fn viewport(&self) -> Option<(i32, i32)> {
        self.state.viewport
    }

    /// Force the device into the default state regardless of the cache
    pub fn reset<D: GraphicsDevice>(&mut self, device: &mut D) {
        let state = PipelineState::default();
        for attribute in Attribute::ALL {
            device.set_attribute(attribute, false);
        }
        device.blend_func(state.blend_func.0, state.blend_func.1);
        let [r, g, b, a] = state.clear_color;
        device.clear_color(r, g, b, a);
        self.state = state;
    }

    /// Enable or disable an attribute. Enabling blending also installs the
    /// alpha blend function.
    pub fn enable<D: GraphicsDevice>(&mut self, device: &mut D, attribute: Attribute, enabled: bool) {
        if self.state.is_enabled(attribute) == enabled {
            return;
        }
        device.set_attribute(attribute, enabled);
        *self.state.flag_mut(attribute) = enabled;

        if attribute == Attribute::Blend && enabled && self.state.blend_func != ALPHA_BLEND {
            device.blend_func(ALPHA_BLEND.0, ALPHA_BLEND.1);
            self.state.blend_func = ALPHA_BLEND;
        }
    }

    pub fn set_clear_color<D: GraphicsDevice>(&mut self, device: &mut D, r: f32, g: f32, b: f32, a: f32) {
        let color = [r, g, b, a];
        if self.state.clear_color != color {
            device.clear_color(r, g, b, a);
            self.state.clear_color = color;
        }
    }

    /// Set the viewport to `width` x `height` pixels from the origin
    pub fn set_viewport<D: GraphicsDevice>(&mut self, device: &mut D, width: i32, height: i32) -> Result<()> {
        if width <= 0 || height <= 0 {
            engine_error!("vis3d::StateController", "Invalid viewport {}x{}", width, height);
            return Err(Error::ViewportError { width, height });
        }
        if self.state.viewport != Some((width, height)) {
            device.viewport(0, 0, width, height);
            self.state.viewport = Some((width, height));
        }
        Ok(())
    }

    /// Clear the colour and depth buffers
    pub fn clear<D: GraphicsDevice>(&self, device: &mut D) {
        device.clear(ClearMask::COLOR | ClearMask::DEPTH);
    }
}

#[cfg(test)]
#[path = "state_controller_tests.rs"]
mod tests;
