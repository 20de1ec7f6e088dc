//! Point light used by the lit shaders.

use glam::Vec3;
use crate::resource::material::Rgb;

/// Point light in eye coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub position: Vec3,
    pub color: Rgb,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            color: Rgb::WHITE,
        }
    }
}

impl Light {
    pub fn new(position: Vec3, color: Rgb) -> Self {
        Self { position, color }
    }

    /// Position as the homogeneous point pushed to the `l` uniform
    pub fn position_uniform(&self) -> [f32; 4] {
        [self.position.x, self.position.y, self.position.z, 1.0]
    }
}
