//! Placeholder textures bound to samplers that receive no texture.
//!
//! Each placeholder is built on first use and lives for the rest of the
//! process. They are shared read-only; backends upload them like any other
//! texture, keyed by id.

use std::sync::OnceLock;

use super::{CompareFunction, FilterMode, PixelFormat, PixelType, Texture, TextureImage};
use crate::backend::UniformType;

/// 2x2 opaque black texture for ordinary 2D samplers.
pub fn texture_2d() -> &'static Texture {
    static TEXTURE: OnceLock<Texture> = OnceLock::new();
    TEXTURE.get_or_init(|| {
        let texel = [0u8, 0, 0, 255];
        let data = texel.repeat(4);
        Texture::new_2d()
            .with_label("placeholder_2d")
            .with_image(TextureImage::new_2d(2, 2, Some(data)))
            .with_filters(FilterMode::Nearest, FilterMode::Nearest)
            .with_mipmaps(false)
    })
}

/// 2x2 depth-stencil texture with a `Less` comparison for shadow samplers.
pub fn shadow_2d() -> &'static Texture {
    static TEXTURE: OnceLock<Texture> = OnceLock::new();
    TEXTURE.get_or_init(|| {
        Texture::new_2d()
            .with_label("placeholder_shadow_2d")
            .with_image(TextureImage::new_2d(2, 2, None))
            .with_format(PixelFormat::DepthStencil, PixelType::Float32UnsignedInt24_8Rev)
            .with_filters(FilterMode::Nearest, FilterMode::Nearest)
            .with_compare(CompareFunction::Less)
            .with_mipmaps(false)
    })
}

/// Cube texture for cube and cube-shadow samplers.
pub fn cube() -> &'static Texture {
    static TEXTURE: OnceLock<Texture> = OnceLock::new();
    TEXTURE.get_or_init(|| Texture::new_cube().with_label("placeholder_cube"))
}

/// 3D texture for 3D samplers.
pub fn texture_3d() -> &'static Texture {
    static TEXTURE: OnceLock<Texture> = OnceLock::new();
    TEXTURE.get_or_init(|| Texture::new_3d().with_label("placeholder_3d"))
}

/// Placeholder matching a sampler type, `None` for non-sampler types.
pub fn for_sampler(ty: UniformType) -> Option<&'static Texture> {
    match ty {
        UniformType::Sampler2d => Some(texture_2d()),
        UniformType::Sampler2dShadow => Some(shadow_2d()),
        UniformType::SamplerCube | UniformType::SamplerCubeShadow => Some(cube()),
        UniformType::Sampler3d => Some(texture_3d()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::textures::TextureKind;

    #[test]
    fn test_placeholders_are_created_once() {
        assert_eq!(texture_2d().id(), texture_2d().id());
        assert!(std::ptr::eq(cube(), cube()));
    }

    #[test]
    fn test_placeholder_2d_is_opaque_black() {
        let image = texture_2d().image.as_ref().expect("placeholder has an image");
        assert_eq!((image.width, image.height), (2, 2));
        let data = image.data.as_ref().expect("placeholder has texel data");
        assert_eq!(data.len(), 16);
        assert!(data.chunks(4).all(|texel| texel == [0, 0, 0, 255]));
        assert!(!texture_2d().generate_mipmaps);
    }

    #[test]
    fn test_shadow_placeholder_is_depth_stencil() {
        let shadow = shadow_2d();
        assert_eq!(shadow.format, PixelFormat::DepthStencil);
        assert_eq!(shadow.compare, Some(CompareFunction::Less));
    }

    #[test]
    fn test_for_sampler() {
        assert_eq!(
            for_sampler(UniformType::SamplerCubeShadow).map(|t| t.kind),
            Some(TextureKind::Cube)
        );
        assert_eq!(
            for_sampler(UniformType::Sampler3d).map(|t| t.id()),
            Some(texture_3d().id())
        );
        assert!(for_sampler(UniformType::FloatVec3).is_none());
    }
}
