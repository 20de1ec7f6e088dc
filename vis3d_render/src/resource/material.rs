//! Surface material colours.

/// Linear RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0.0, g: 0.0, b: 0.0 };
    pub const WHITE: Rgb = Rgb { r: 1.0, g: 1.0, b: 1.0 };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

/// Colour response of a surface to light
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub name: String,
    /// Diffuse colour
    pub kd: Rgb,
    /// Ambient colour
    pub ka: Rgb,
    /// Specular colour
    pub ks: Rgb,
    /// Transparency, 1 is opaque
    pub tr: f32,
}

impl Material {
    /// Opaque grey material
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kd: Rgb::new(0.5, 0.5, 0.5),
            ka: Rgb::new(0.1, 0.1, 0.1),
            ks: Rgb::BLACK,
            tr: 1.0,
        }
    }

    pub fn with_diffuse(mut self, kd: Rgb) -> Self {
        self.kd = kd;
        self
    }

    pub fn with_ambient(mut self, ka: Rgb) -> Self {
        self.ka = ka;
        self
    }

    pub fn with_specular(mut self, ks: Rgb) -> Self {
        self.ks = ks;
        self
    }

    pub fn with_transparency(mut self, tr: f32) -> Self {
        self.tr = tr;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_material_defaults_opaque() {
        let material = Material::new("grey");
        assert_eq!(material.tr, 1.0);
        assert_eq!(material.kd.to_array(), [0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_material_builders() {
        let material = Material::new("red")
            .with_diffuse(Rgb::new(1.0, 0.0, 0.0))
            .with_ambient(Rgb::BLACK)
            .with_specular(Rgb::WHITE)
            .with_transparency(0.25);
        assert_eq!(material.kd, Rgb::new(1.0, 0.0, 0.0));
        assert_eq!(material.ka, Rgb::BLACK);
        assert_eq!(material.ks, Rgb::WHITE);
        assert_eq!(material.tr, 0.25);
    }
}
