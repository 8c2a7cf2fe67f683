//! RedLilium GL Uniforms - shader uniform reflection and cached uploads
//!
//! Reflects the active uniforms of a linked GL program into a tree of typed
//! setters and keeps a per-leaf cache of the last uploaded value, so a draw
//! only reaches the driver for uniforms that actually changed.
//!
//! # Features
//! - Name-path parsing of reflected names (`uLights[2].color`, `uBones[0]`)
//! - Struct, array-of-struct and pure array uniforms
//! - Sampler uniforms with per-draw texture unit allocation and placeholder
//!   textures for unbound samplers
//! - Vertex attribute descriptors
//! - Number and boolean keyframe tracks
//! - A recording dummy backend for tests and benchmarks (`dummy` feature)

pub mod animation;
pub mod attribute;
pub mod backend;
pub mod config;
pub mod error;
pub mod textures;
pub mod uniforms;

pub use animation::{BooleanKeyframeTrack, KeyframeTrack, NumberKeyframeTrack, TrackKind};
pub use attribute::{ActiveAttribute, ProgramAttributes};
pub use backend::{ActiveInfo, GlBackend, TextureTarget, UniformType};
pub use config::UniformsConfig;
pub use error::{Result, UniformError};
pub use textures::{Texture, TextureUnitAllocator, TextureUnits};
pub use uniforms::{UniformNode, UniformTree, UniformValue};

#[cfg(feature = "dummy")]
pub use backend::{DummyBackend, DummyProgram};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log the crate version. Call once after installing a logger.
pub fn init() {
    log::info!("RedLilium GL Uniforms v{}", VERSION);
}
