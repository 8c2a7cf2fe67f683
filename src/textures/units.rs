//! Texture unit allocation for sampler uniforms.

use std::sync::Arc;

use super::{Texture, TextureId};
use crate::backend::{GlBackend, TextureTarget};
use crate::config::UniformsConfig;

/// Hands out texture units and binds textures to them.
///
/// Sampler setters allocate one unit per sampler element on every set, so
/// the owner must [`reset`](TextureUnitAllocator::reset) allocation at each
/// draw boundary.
pub trait TextureUnits {
    /// Next free unit index.
    fn alloc_tex_unit(&mut self) -> i32;
    fn set_texture_2d(&mut self, texture: &Texture, unit: i32);
    fn set_texture_cube(&mut self, texture: &Texture, unit: i32);
    fn set_texture_3d(&mut self, texture: &Texture, unit: i32);
}

/// What is currently bound on one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BoundTexture {
    target: TextureTarget,
    texture: TextureId,
    version: u32,
}

/// [`TextureUnits`] over a [`GlBackend`], skipping redundant binds.
pub struct TextureUnitAllocator<B: GlBackend> {
    gl: Arc<B>,
    used_units: u32,
    max_units: u32,
    active_unit: Option<u32>,
    bound: Vec<Option<BoundTexture>>,
}

impl<B: GlBackend> TextureUnitAllocator<B> {
    /// Create an allocator limited to `config.max_texture_units`.
    pub fn new(gl: Arc<B>, config: &UniformsConfig) -> Self {
        Self {
            gl,
            used_units: 0,
            max_units: config.max_texture_units,
            active_unit: None,
            bound: Vec::new(),
        }
    }

    /// Start allocating from unit 0 again. Bindings stay cached.
    pub fn reset(&mut self) {
        self.used_units = 0;
    }

    /// Units handed out since the last reset.
    pub fn used_units(&self) -> u32 {
        self.used_units
    }

    /// Get the unit limit.
    pub fn max_units(&self) -> u32 {
        self.max_units
    }

    fn bind(&mut self, target: TextureTarget, texture: &Texture, unit: i32) {
        let Ok(unit) = u32::try_from(unit) else {
            log::warn!("TextureUnitAllocator: ignoring bind to negative unit {unit}");
            return;
        };
        let slot = unit as usize;
        if self.bound.len() <= slot {
            self.bound.resize(slot + 1, None);
        }

        let wanted = BoundTexture {
            target,
            texture: texture.id(),
            version: texture.version,
        };
        if self.bound[slot] == Some(wanted) {
            return;
        }

        if self.active_unit != Some(unit) {
            self.gl.active_texture(unit);
            self.active_unit = Some(unit);
        }
        self.gl.bind_texture(target, texture);
        self.bound[slot] = Some(wanted);
    }
}

impl<B: GlBackend> TextureUnits for TextureUnitAllocator<B> {
    fn alloc_tex_unit(&mut self) -> i32 {
        let unit = self.used_units;
        if unit >= self.max_units {
            log::warn!(
                "TextureUnitAllocator: trying to use {} texture units, context supports {}",
                unit + 1,
                self.max_units
            );
        }
        self.used_units += 1;
        unit as i32
    }

    fn set_texture_2d(&mut self, texture: &Texture, unit: i32) {
        self.bind(TextureTarget::Texture2d, texture, unit);
    }

    fn set_texture_cube(&mut self, texture: &Texture, unit: i32) {
        self.bind(TextureTarget::TextureCubeMap, texture, unit);
    }

    fn set_texture_3d(&mut self, texture: &Texture, unit: i32) {
        self.bind(TextureTarget::Texture3d, texture, unit);
    }
}
