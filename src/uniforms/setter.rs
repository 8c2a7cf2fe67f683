//! Upload strategies for uniform leaves.
//!
//! Every leaf keeps a cache of the last uploaded components and only calls
//! into the driver when a component differs. The strategy is picked once at
//! construction from the reflected type; leaves of unsupported types get no
//! strategy and ignore sets.

use super::value::UniformValue;
use crate::backend::{GlBackend, UniformType, UploadKind};
use crate::textures::{placeholders, Texture, TextureUnits};

/// Reusable buffers for flattening values before comparison.
///
/// Owned by the tree and reused across sets; a leaf copies what it needs
/// into its own cache before the buffer is touched again.
#[derive(Debug, Default)]
pub struct UploadScratch {
    floats: Vec<f32>,
    ints: Vec<i32>,
    units: Vec<i32>,
}

impl UploadScratch {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Everything a set needs besides the value: the context, the texture unit
/// allocator and scratch space.
pub struct UploadContext<'a, B: GlBackend> {
    pub(crate) gl: &'a B,
    pub(crate) textures: &'a mut dyn TextureUnits,
    pub(crate) scratch: &'a mut UploadScratch,
    pub(crate) check_shapes: bool,
}

impl<'a, B: GlBackend> UploadContext<'a, B> {
    pub fn new(
        gl: &'a B,
        textures: &'a mut dyn TextureUnits,
        scratch: &'a mut UploadScratch,
    ) -> Self {
        Self {
            gl,
            textures,
            scratch,
            check_shapes: false,
        }
    }

    pub fn with_value_shape_checks(mut self, enabled: bool) -> Self {
        self.check_shapes = enabled;
        self
    }
}

/// Last uploaded components of a leaf.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniformCache {
    floats: Vec<f32>,
    ints: Vec<i32>,
}

impl UniformCache {
    /// Cached float components (float vectors and matrices).
    pub fn floats(&self) -> &[f32] {
        &self.floats
    }

    /// Cached integer components (ints, bools and sampler units).
    pub fn ints(&self) -> &[i32] {
        &self.ints
    }

    pub fn is_empty(&self) -> bool {
        self.floats.is_empty() && self.ints.is_empty()
    }
}

fn arrays_equal<T: PartialEq>(cache: &[T], values: &[T]) -> bool {
    cache.len() == values.len() && cache.iter().zip(values).all(|(a, b)| a == b)
}

fn copy_array<T: Copy>(cache: &mut Vec<T>, values: &[T]) {
    cache.clear();
    cache.extend_from_slice(values);
}

fn load_floats(out: &mut Vec<f32>, value: Option<&UniformValue>, absent_len: usize) {
    out.clear();
    match value {
        Some(value) => value.collect_floats(out),
        None => out.resize(absent_len, 0.0),
    }
}

fn load_ints(out: &mut Vec<i32>, value: Option<&UniformValue>, absent_len: usize) {
    out.clear();
    match value {
        Some(value) => value.collect_ints(out),
        None => out.resize(absent_len, 0),
    }
}

fn shape_matches(len: usize, components: usize, max_elements: usize) -> bool {
    len > 0 && len % components == 0 && len / components <= max_elements
}

fn bind_sampler(
    textures: &mut dyn TextureUnits,
    ty: UniformType,
    texture: Option<&Texture>,
    unit: i32,
) {
    let Some(texture) = texture.or_else(|| placeholders::for_sampler(ty)) else {
        return;
    };
    match ty {
        UniformType::Sampler2d | UniformType::Sampler2dShadow => {
            textures.set_texture_2d(texture, unit)
        }
        UniformType::SamplerCube | UniformType::SamplerCubeShadow => {
            textures.set_texture_cube(texture, unit)
        }
        UniformType::Sampler3d => textures.set_texture_3d(texture, unit),
        _ => {}
    }
}

/// Change-detecting upload strategy of one leaf.
#[derive(Debug, Clone)]
pub struct UniformSetter {
    uniform_type: Option<UniformType>,
    cache: UniformCache,
}

impl UniformSetter {
    pub(crate) fn new(raw_type: u32) -> Self {
        Self {
            uniform_type: UniformType::from_gl(raw_type),
            cache: UniformCache::default(),
        }
    }

    pub fn uniform_type(&self) -> Option<UniformType> {
        self.uniform_type
    }

    pub fn cache(&self) -> &UniformCache {
        &self.cache
    }

    /// Per-component set: scalar/vector uploads through `uniform{N}f` or
    /// `uniform{N}i`, matrices and samplers as in [`Self::set_single`].
    pub(crate) fn set_one<B: GlBackend>(
        &mut self,
        location: &B::UniformLocation,
        value: Option<&UniformValue>,
        ctx: &mut UploadContext<'_, B>,
    ) {
        let Some(ty) = self.uniform_type else {
            log::trace!("skipping set on uniform of unsupported type");
            return;
        };

        match ty.upload_kind() {
            UploadKind::Float(n) => {
                let values = &mut ctx.scratch.floats;
                load_floats(values, value, n);
                if ctx.check_shapes && values.len() != n {
                    log::warn!("rejecting value with {} components for {:?}", values.len(), ty);
                    return;
                }
                values.resize(n, 0.0);
                if arrays_equal(&self.cache.floats, values) {
                    return;
                }
                let gl = ctx.gl;
                match n {
                    1 => gl.uniform_1f(location, values[0]),
                    2 => gl.uniform_2f(location, values[0], values[1]),
                    3 => gl.uniform_3f(location, values[0], values[1], values[2]),
                    _ => gl.uniform_4f(location, values[0], values[1], values[2], values[3]),
                }
                copy_array(&mut self.cache.floats, values);
            }
            UploadKind::Int(n) => {
                let values = &mut ctx.scratch.ints;
                load_ints(values, value, n);
                if ctx.check_shapes && values.len() != n {
                    log::warn!("rejecting value with {} components for {:?}", values.len(), ty);
                    return;
                }
                values.resize(n, 0);
                if arrays_equal(&self.cache.ints, values) {
                    return;
                }
                let gl = ctx.gl;
                match n {
                    1 => gl.uniform_1i(location, values[0]),
                    2 => gl.uniform_2i(location, values[0], values[1]),
                    3 => gl.uniform_3i(location, values[0], values[1], values[2]),
                    _ => gl.uniform_4i(location, values[0], values[1], values[2], values[3]),
                }
                copy_array(&mut self.cache.ints, values);
            }
            UploadKind::Matrix(dim) => self.set_floats(ty, location, value, dim * dim, 1, ctx),
            UploadKind::Sampler => self.set_sampler(ty, location, value, ctx),
        }
    }

    /// Whole-value set of a non-array leaf.
    pub(crate) fn set_single<B: GlBackend>(
        &mut self,
        location: &B::UniformLocation,
        value: Option<&UniformValue>,
        ctx: &mut UploadContext<'_, B>,
    ) {
        let Some(ty) = self.uniform_type else {
            log::trace!("skipping set on uniform of unsupported type");
            return;
        };

        match ty.upload_kind() {
            UploadKind::Float(1) | UploadKind::Int(1) | UploadKind::Sampler => {
                self.set_one(location, value, ctx)
            }
            UploadKind::Float(n) => self.set_floats(ty, location, value, n, 1, ctx),
            UploadKind::Int(n) => self.set_ints(ty, location, value, n, 1, ctx),
            UploadKind::Matrix(dim) => self.set_floats(ty, location, value, dim * dim, 1, ctx),
        }
    }

    /// Whole-array set of a pure array leaf with `size` elements.
    pub(crate) fn set_array<B: GlBackend>(
        &mut self,
        location: &B::UniformLocation,
        size: usize,
        value: Option<&UniformValue>,
        ctx: &mut UploadContext<'_, B>,
    ) {
        let Some(ty) = self.uniform_type else {
            log::trace!("skipping set on uniform array of unsupported type");
            return;
        };

        match ty.upload_kind() {
            UploadKind::Float(n) => self.set_floats(ty, location, value, n, size, ctx),
            UploadKind::Int(n) => self.set_ints(ty, location, value, n, size, ctx),
            UploadKind::Matrix(dim) => self.set_floats(ty, location, value, dim * dim, size, ctx),
            UploadKind::Sampler => self.set_sampler_array(ty, location, size, value, ctx),
        }
    }

    fn set_floats<B: GlBackend>(
        &mut self,
        ty: UniformType,
        location: &B::UniformLocation,
        value: Option<&UniformValue>,
        components: usize,
        elements: usize,
        ctx: &mut UploadContext<'_, B>,
    ) {
        let values = &mut ctx.scratch.floats;
        load_floats(values, value, components * elements);
        if ctx.check_shapes && !shape_matches(values.len(), components, elements) {
            log::warn!("rejecting value with {} components for {:?}", values.len(), ty);
            return;
        }
        if arrays_equal(&self.cache.floats, values) {
            return;
        }

        let gl = ctx.gl;
        match ty.upload_kind() {
            UploadKind::Matrix(2) => gl.uniform_matrix_2fv(location, false, values),
            UploadKind::Matrix(3) => gl.uniform_matrix_3fv(location, false, values),
            UploadKind::Matrix(_) => gl.uniform_matrix_4fv(location, false, values),
            UploadKind::Float(1) => gl.uniform_1fv(location, values),
            UploadKind::Float(2) => gl.uniform_2fv(location, values),
            UploadKind::Float(3) => gl.uniform_3fv(location, values),
            _ => gl.uniform_4fv(location, values),
        }
        copy_array(&mut self.cache.floats, values);
    }

    fn set_ints<B: GlBackend>(
        &mut self,
        ty: UniformType,
        location: &B::UniformLocation,
        value: Option<&UniformValue>,
        components: usize,
        elements: usize,
        ctx: &mut UploadContext<'_, B>,
    ) {
        let values = &mut ctx.scratch.ints;
        load_ints(values, value, components * elements);
        if ctx.check_shapes && !shape_matches(values.len(), components, elements) {
            log::warn!("rejecting value with {} components for {:?}", values.len(), ty);
            return;
        }
        if arrays_equal(&self.cache.ints, values) {
            return;
        }

        let gl = ctx.gl;
        match components {
            1 => gl.uniform_1iv(location, values),
            2 => gl.uniform_2iv(location, values),
            3 => gl.uniform_3iv(location, values),
            _ => gl.uniform_4iv(location, values),
        }
        copy_array(&mut self.cache.ints, values);
    }

    fn set_sampler<B: GlBackend>(
        &mut self,
        ty: UniformType,
        location: &B::UniformLocation,
        value: Option<&UniformValue>,
        ctx: &mut UploadContext<'_, B>,
    ) {
        if ctx.check_shapes && value.is_some_and(|v| !matches!(v, UniformValue::Texture(_))) {
            log::warn!("rejecting non-texture value for {:?}", ty);
            return;
        }

        let unit = ctx.textures.alloc_tex_unit();
        let texture = value.and_then(|v| v.texture_at(0));
        bind_sampler(ctx.textures, ty, texture, unit);

        if self.cache.ints.as_slice() == [unit] {
            return;
        }
        ctx.gl.uniform_1i(location, unit);
        copy_array(&mut self.cache.ints, &[unit]);
    }

    fn set_sampler_array<B: GlBackend>(
        &mut self,
        ty: UniformType,
        location: &B::UniformLocation,
        size: usize,
        value: Option<&UniformValue>,
        ctx: &mut UploadContext<'_, B>,
    ) {
        let count = match value {
            Some(value) => match value.texture_count() {
                Some(count) => count,
                None if ctx.check_shapes => {
                    log::warn!("rejecting non-texture value for {:?} array", ty);
                    return;
                }
                None => size,
            },
            None => size,
        };
        if ctx.check_shapes && count > size {
            log::warn!("rejecting {} textures for {:?}[{}]", count, ty, size);
            return;
        }

        let units = &mut ctx.scratch.units;
        units.clear();
        for _ in 0..count {
            units.push(ctx.textures.alloc_tex_unit());
        }
        for (index, &unit) in units.iter().enumerate() {
            let texture = value.and_then(|v| v.texture_at(index));
            bind_sampler(ctx.textures, ty, texture, unit);
        }

        if arrays_equal(&self.cache.ints, units) {
            return;
        }
        ctx.gl.uniform_1iv(location, units);
        copy_array(&mut self.cache.ints, units);
    }
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::backend::{gl, DummyBackend, DummyLocation, GlCall, TextureTarget};
    use crate::config::UniformsConfig;
    use crate::textures::TextureUnitAllocator;

    struct Harness {
        gl: Arc<DummyBackend>,
        units: TextureUnitAllocator<DummyBackend>,
        scratch: UploadScratch,
    }

    impl Harness {
        fn new() -> Self {
            let gl = Arc::new(DummyBackend::new());
            let units = TextureUnitAllocator::new(gl.clone(), &UniformsConfig::default());
            Self {
                gl,
                units,
                scratch: UploadScratch::new(),
            }
        }

        fn ctx(&mut self) -> UploadContext<'_, DummyBackend> {
            UploadContext::new(&*self.gl, &mut self.units, &mut self.scratch)
        }
    }

    const LOC: DummyLocation = DummyLocation(3);

    #[test]
    fn test_float_scalar_uploads_once() {
        let mut h = Harness::new();
        let mut setter = UniformSetter::new(gl::FLOAT);
        let value = UniformValue::Float(0.5);

        setter.set_single(&LOC, Some(&value), &mut h.ctx());
        setter.set_single(&LOC, Some(&value), &mut h.ctx());

        assert_eq!(h.gl.take_calls(), vec![GlCall::Uniform1f(LOC, 0.5)]);
        assert_eq!(setter.cache().floats(), &[0.5]);
    }

    #[test]
    fn test_vector_set_uses_vector_upload() {
        let mut h = Harness::new();
        let mut setter = UniformSetter::new(gl::FLOAT_VEC3);
        let value = UniformValue::from([1.0f32, 2.0, 3.0]);

        setter.set_single(&LOC, Some(&value), &mut h.ctx());

        assert_eq!(
            h.gl.take_calls(),
            vec![GlCall::UniformFv {
                location: LOC,
                components: 3,
                data: vec![1.0, 2.0, 3.0],
            }]
        );
    }

    #[test]
    fn test_set_one_uses_component_upload() {
        let mut h = Harness::new();
        let mut setter = UniformSetter::new(gl::INT_VEC2);

        setter.set_one(&LOC, Some(&UniformValue::from([4, 5])), &mut h.ctx());
        setter.set_one(&LOC, Some(&UniformValue::from([4, 5])), &mut h.ctx());
        setter.set_one(&LOC, Some(&UniformValue::from([4, 6])), &mut h.ctx());

        assert_eq!(
            h.gl.take_calls(),
            vec![
                GlCall::Uniform2i(LOC, [4, 5]),
                GlCall::Uniform2i(LOC, [4, 6]),
            ]
        );
    }

    #[test]
    fn test_bool_vector_uploads_as_ints() {
        let mut h = Harness::new();
        let mut setter = UniformSetter::new(gl::BOOL_VEC3);

        setter.set_single(&LOC, Some(&UniformValue::from([true, false, true])), &mut h.ctx());

        assert_eq!(setter.cache().ints(), &[1, 0, 1]);
        assert_eq!(h.gl.upload_count(), 1);
    }

    #[test]
    fn test_matrix_uploads_in_full_through_both_paths() {
        let mut h = Harness::new();
        let mut setter = UniformSetter::new(gl::FLOAT_MAT2);
        let value = UniformValue::from([1.0f32, 0.0, 0.0, 1.0]);

        setter.set_one(&LOC, Some(&value), &mut h.ctx());
        setter.set_single(&LOC, Some(&value), &mut h.ctx());

        assert_eq!(
            h.gl.take_calls(),
            vec![GlCall::UniformMatrixFv {
                location: LOC,
                dim: 2,
                transpose: false,
                data: vec![1.0, 0.0, 0.0, 1.0],
            }]
        );
    }

    #[test]
    fn test_exact_comparison_detects_tiny_change() {
        let mut h = Harness::new();
        let mut setter = UniformSetter::new(gl::FLOAT_VEC2);

        setter.set_single(&LOC, Some(&UniformValue::from([1.0f32, 1.0])), &mut h.ctx());
        setter.set_single(
            &LOC,
            Some(&UniformValue::from([1.0f32, 1.0 + f32::EPSILON])),
            &mut h.ctx(),
        );

        assert_eq!(h.gl.upload_count(), 2);
        assert_eq!(setter.cache().floats(), &[1.0, 1.0 + f32::EPSILON]);
    }

    #[test]
    fn test_absent_value_uploads_zeros() {
        let mut h = Harness::new();
        let mut setter = UniformSetter::new(gl::FLOAT_VEC4);

        setter.set_single(&LOC, None, &mut h.ctx());
        setter.set_single(&LOC, None, &mut h.ctx());

        assert_eq!(setter.cache().floats(), &[0.0; 4]);
        assert_eq!(h.gl.upload_count(), 1);
    }

    #[test]
    fn test_float_array() {
        let mut h = Harness::new();
        let mut setter = UniformSetter::new(gl::FLOAT);
        let value = UniformValue::from([1.0f32, 2.0, 3.0]);

        setter.set_array(&LOC, 3, Some(&value), &mut h.ctx());
        setter.set_array(&LOC, 3, Some(&value), &mut h.ctx());

        assert_eq!(
            h.gl.take_calls(),
            vec![GlCall::UniformFv {
                location: LOC,
                components: 1,
                data: vec![1.0, 2.0, 3.0],
            }]
        );
    }

    #[test]
    fn test_shorter_array_value_replaces_cache() {
        let mut h = Harness::new();
        let mut setter = UniformSetter::new(gl::INT);

        setter.set_array(&LOC, 4, Some(&UniformValue::from([1, 2, 3])), &mut h.ctx());
        setter.set_array(&LOC, 4, Some(&UniformValue::from([1, 2])), &mut h.ctx());

        assert_eq!(setter.cache().ints(), &[1, 2]);
        assert_eq!(h.gl.upload_count(), 2);
    }

    #[test]
    fn test_sampler_binds_placeholder_when_absent() {
        let mut h = Harness::new();
        let mut setter = UniformSetter::new(gl::SAMPLER_2D_SHADOW);

        setter.set_single(&LOC, Some(&UniformValue::Texture(None)), &mut h.ctx());

        assert_eq!(
            h.gl.take_calls(),
            vec![
                GlCall::ActiveTexture(0),
                GlCall::BindTexture {
                    target: TextureTarget::Texture2d,
                    texture: placeholders::shadow_2d().id(),
                },
                GlCall::Uniform1i(LOC, 0),
            ]
        );
    }

    #[test]
    fn test_sampler_unit_upload_is_cached() {
        let mut h = Harness::new();
        let mut setter = UniformSetter::new(gl::SAMPLER_CUBE);
        let texture = Arc::new(crate::textures::Texture::new_cube());
        let value = UniformValue::from(texture.clone());

        setter.set_single(&LOC, Some(&value), &mut h.ctx());
        h.units.reset();
        setter.set_single(&LOC, Some(&value), &mut h.ctx());

        assert_eq!(h.gl.upload_count(), 1);
        assert_eq!(setter.cache().ints(), &[0]);
    }

    #[test]
    fn test_sampler_array_allocates_units_per_element() {
        let mut h = Harness::new();
        let mut setter = UniformSetter::new(gl::SAMPLER_3D);
        let texture = Arc::new(crate::textures::Texture::new_3d());
        let value = UniformValue::Textures(vec![Some(texture.clone()), None]);

        setter.set_array(&LOC, 2, Some(&value), &mut h.ctx());

        let calls = h.gl.take_calls();
        assert!(calls.contains(&GlCall::BindTexture {
            target: TextureTarget::Texture3d,
            texture: texture.id(),
        }));
        assert!(calls.contains(&GlCall::BindTexture {
            target: TextureTarget::Texture3d,
            texture: placeholders::texture_3d().id(),
        }));
        assert_eq!(
            calls.last(),
            Some(&GlCall::UniformIv {
                location: LOC,
                components: 1,
                data: vec![0, 1],
            })
        );
    }

    #[test]
    fn test_unsupported_type_is_noop() {
        let mut h = Harness::new();
        let mut setter = UniformSetter::new(gl::UNSIGNED_INT);

        setter.set_single(&LOC, Some(&UniformValue::Int(1)), &mut h.ctx());
        setter.set_array(&LOC, 2, Some(&UniformValue::Int(1)), &mut h.ctx());

        assert!(h.gl.calls().is_empty());
        assert!(setter.cache().is_empty());
    }

    #[test]
    fn test_shape_checks_reject_mismatched_values() {
        let mut h = Harness::new();
        let mut setter = UniformSetter::new(gl::FLOAT_VEC3);
        let value = UniformValue::from([1.0f32, 2.0]);

        setter.set_single(&LOC, Some(&value), &mut h.ctx().with_value_shape_checks(true));
        assert_eq!(h.gl.upload_count(), 0);

        setter.set_single(&LOC, Some(&value), &mut h.ctx());
        assert_eq!(h.gl.upload_count(), 1);
    }
}
