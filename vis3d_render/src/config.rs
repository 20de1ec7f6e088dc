/// Renderer configuration

/// Renderer configuration
#[derive(Debug, Clone, PartialEq)]
pub struct RendererConfig {
    /// Lowest accepted context version (major, minor)
    pub min_context_version: (u32, u32),
    /// Number of texture units `map_texture` may address.
    /// Clamped at init to what the device reports.
    pub max_texture_units: u32,
    /// Warn about device errors left over by calls outside the render layer
    /// before each bind
    pub check_errors: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            min_context_version: (3, 2),
            max_texture_units: 10,
            check_errors: cfg!(debug_assertions),
        }
    }
}

impl RendererConfig {
    /// True when `version` satisfies `min_context_version`
    pub fn accepts_version(&self, version: (u32, u32)) -> bool {
        version >= self.min_context_version
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RendererConfig::default();
        assert_eq!(config.min_context_version, (3, 2));
        assert_eq!(config.max_texture_units, 10);
        assert_eq!(config.check_errors, cfg!(debug_assertions));
    }

    #[test]
    fn test_accepts_version() {
        let config = RendererConfig::default();
        assert!(config.accepts_version((3, 2)));
        assert!(config.accepts_version((3, 3)));
        assert!(config.accepts_version((4, 1)));
        assert!(!config.accepts_version((3, 1)));
        assert!(!config.accepts_version((2, 9)));
    }
}
