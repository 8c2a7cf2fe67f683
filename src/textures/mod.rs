//! Textures as seen by sampler uniforms.
//!
//! - [`Texture`] - description of a texture and its sampling state
//! - [`placeholders`] - textures bound when a sampler receives none
//! - [`TextureUnits`] / [`TextureUnitAllocator`] - per-draw unit allocation

pub mod placeholders;
mod texture;
mod units;

pub use texture::{
    CompareFunction, FilterMode, PixelFormat, PixelType, Texture, TextureId, TextureImage,
    TextureKind,
};
pub use units::{TextureUnitAllocator, TextureUnits};
