//! Configuration for uniform trees and texture unit allocation.

/// Runtime options shared by [`UniformTree`](crate::UniformTree) and
/// [`TextureUnitAllocator`](crate::TextureUnitAllocator).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformsConfig {
    /// Number of texture units the context exposes.
    /// Allocating past this limit logs a warning but still hands out the unit.
    pub max_texture_units: u32,
    /// Reject values whose component count does not match the reflected
    /// uniform instead of uploading them as-is.
    pub check_value_shapes: bool,
}

impl Default for UniformsConfig {
    fn default() -> Self {
        Self {
            max_texture_units: 16,
            check_value_shapes: false,
        }
    }
}

impl UniformsConfig {
    /// Create a configuration with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of texture units the context supports.
    pub fn with_max_texture_units(mut self, units: u32) -> Self {
        self.max_texture_units = units;
        self
    }

    /// Reject values whose shape does not match the uniform type.
    pub fn with_value_shape_checks(mut self, enabled: bool) -> Self {
        self.check_value_shapes = enabled;
        self
    }
}
