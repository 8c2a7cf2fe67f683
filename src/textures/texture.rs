//! Texture resource description.
//!
//! A [`Texture`] describes what should be resident on the GPU; backends
//! upload and bind it by [`TextureId`]. Textures are shared through `Arc`
//! between materials and uniform values.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::backend::TextureTarget;

/// Process-unique texture identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u64);

impl TextureId {
    fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Dimensionality of a texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureKind {
    #[default]
    Texture2d,
    Cube,
    Texture3d,
}

impl TextureKind {
    pub fn target(self) -> TextureTarget {
        match self {
            Self::Texture2d => TextureTarget::Texture2d,
            Self::Cube => TextureTarget::TextureCubeMap,
            Self::Texture3d => TextureTarget::Texture3d,
        }
    }
}

/// Pixel layout of the texel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelFormat {
    Red,
    Rgb,
    #[default]
    Rgba,
    Depth,
    DepthStencil,
}

/// Component storage type of the texel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PixelType {
    #[default]
    UnsignedByte,
    HalfFloat,
    Float,
    UnsignedInt24_8,
    Float32UnsignedInt24_8Rev,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FilterMode {
    Nearest,
    #[default]
    Linear,
    LinearMipmapLinear,
}

/// Depth comparison used by shadow samplers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareFunction {
    Never,
    Less,
    Equal,
    LessEqual,
    Greater,
    NotEqual,
    GreaterEqual,
    Always,
}

/// CPU-side texel storage. `data` is `None` for textures that only
/// allocate storage (depth targets, render targets).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureImage {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub data: Option<Vec<u8>>,
}

impl TextureImage {
    pub fn new_2d(width: u32, height: u32, data: Option<Vec<u8>>) -> Self {
        Self {
            width,
            height,
            depth: 1,
            data,
        }
    }
}

/// Description of a texture and its sampling state.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    id: TextureId,
    pub label: Option<String>,
    pub kind: TextureKind,
    pub image: Option<TextureImage>,
    pub format: PixelFormat,
    pub pixel_type: PixelType,
    pub mag_filter: FilterMode,
    pub min_filter: FilterMode,
    pub compare: Option<CompareFunction>,
    pub generate_mipmaps: bool,
    /// Bumped whenever the description changes and needs re-upload.
    pub version: u32,
}

impl Texture {
    pub fn new(kind: TextureKind) -> Self {
        Self {
            id: TextureId::next(),
            label: None,
            kind,
            image: None,
            format: PixelFormat::Rgba,
            pixel_type: PixelType::UnsignedByte,
            mag_filter: FilterMode::Linear,
            min_filter: FilterMode::LinearMipmapLinear,
            compare: None,
            generate_mipmaps: true,
            version: 0,
        }
    }

    pub fn new_2d() -> Self {
        Self::new(TextureKind::Texture2d)
    }

    pub fn new_cube() -> Self {
        Self::new(TextureKind::Cube)
    }

    pub fn new_3d() -> Self {
        Self::new(TextureKind::Texture3d)
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn target(&self) -> TextureTarget {
        self.kind.target()
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_image(mut self, image: TextureImage) -> Self {
        self.image = Some(image);
        self.version += 1;
        self
    }

    pub fn with_format(mut self, format: PixelFormat, pixel_type: PixelType) -> Self {
        self.format = format;
        self.pixel_type = pixel_type;
        self
    }

    pub fn with_filters(mut self, mag: FilterMode, min: FilterMode) -> Self {
        self.mag_filter = mag;
        self.min_filter = min;
        self
    }

    pub fn with_compare(mut self, compare: CompareFunction) -> Self {
        self.compare = Some(compare);
        self
    }

    pub fn with_mipmaps(mut self, generate: bool) -> Self {
        self.generate_mipmaps = generate;
        self
    }

    /// Mark the texture as needing re-upload.
    pub fn touch(&mut self) {
        self.version += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = Texture::new_2d();
        let b = Texture::new_2d();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_targets() {
        assert_eq!(Texture::new_2d().target(), TextureTarget::Texture2d);
        assert_eq!(Texture::new_cube().target(), TextureTarget::TextureCubeMap);
        assert_eq!(Texture::new_3d().target(), TextureTarget::Texture3d);
    }

    #[test]
    fn test_with_image_bumps_version() {
        let mut texture = Texture::new_2d()
            .with_label("checker")
            .with_image(TextureImage::new_2d(2, 2, Some(vec![0; 16])));
        assert_eq!(texture.version, 1);
        texture.touch();
        assert_eq!(texture.version, 2);
        assert_eq!(texture.label.as_deref(), Some("checker"));
    }
}
