//! Resource-level texture type.
//!
//! Textures are 2D RGBA8 pictures mapped onto meshes. The pixel data is
//! copied to the graphics card when bound and released from CPU memory
//! afterwards.

use slotmap::new_key_type;

new_key_type! {
    /// Generational handle to a bound texture
    pub struct TextureHandle;
}

/// RGBA8 texture ready to be bound to the graphics card
#[derive(Debug, Clone, Default)]
pub struct Texture {
    /// Unique texture name
    pub name: String,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// RGBA8 pixels, row-major, 4 bytes per pixel
    pub pixels: Vec<u8>,
    /// Repeat the texture when UVs leave 0..1 (clamp to edge otherwise)
    pub repeat: bool,
    handle: Option<TextureHandle>,
}

impl Texture {
    /// Create an unbound texture from RGBA8 pixels
    pub fn new(name: impl Into<String>, width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            pixels,
            repeat: false,
            handle: None,
        }
    }

    /// Enable or disable UV repeat
    pub fn with_repeat(mut self, repeat: bool) -> Self {
        self.repeat = repeat;
        self
    }

    /// GPU handle, present once a bind succeeded
    pub fn handle(&self) -> Option<TextureHandle> {
        self.handle
    }

    /// True once the texture has a GPU handle
    pub fn is_bound(&self) -> bool {
        self.handle.is_some()
    }

    /// Check the pixel data can be uploaded to a device accepting textures
    /// up to `max_size` pixels wide and high
    pub fn validate(&self, max_size: u32) -> std::result::Result<(), String> {
        if self.width == 0 || self.height == 0 {
            return Err(format!("invalid size {}x{}", self.width, self.height));
        }
        if self.width > max_size || self.height > max_size {
            return Err(format!(
                "size {}x{} exceeds the device limit of {}",
                self.width, self.height, max_size
            ));
        }
        let expected = self.width as usize * self.height as usize * 4;
        if self.pixels.len() != expected {
            return Err(format!(
                "{} pixel bytes, expected {} for {}x{} RGBA",
                self.pixels.len(), expected, self.width, self.height
            ));
        }
        Ok(())
    }

    pub(crate) fn set_handle(&mut self, handle: Option<TextureHandle>) {
        self.handle = handle;
    }

    pub(crate) fn release_cpu_data(&mut self) {
        self.pixels = Vec::new();
    }
}
