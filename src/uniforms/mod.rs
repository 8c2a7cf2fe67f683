//! Uniform reflection and change-detecting uploads.
//!
//! A [`UniformTree`] is built once per linked program. It reflects every
//! active uniform, parses its name with [`parse_uniform_name`] and files the
//! location under a tree of struct nodes and leaves. At draw time values are
//! set by top-level name; each leaf compares against its cache and reaches
//! the driver only when something changed.
//!
//! ```ignore
//! let mut tree = UniformTree::new(gl.clone(), &program)?;
//! let mut units = TextureUnitAllocator::new(gl, &UniformsConfig::default());
//!
//! tree.set("uModel", &model.into(), &mut units);
//! tree.set("uLights", &UniformValue::list(lights), &mut units);
//! units.reset();
//! ```

mod node;
mod path;
mod setter;
mod value;

use std::sync::Arc;

pub use node::{PureArrayUniform, SingleUniform, StructuredUniform, UniformContainer, UniformNode};
pub use path::{
    is_pure_array_suffix, parse_uniform_name, LeafKind, PathSegment, Subscript, UniformId,
    UniformPath,
};
pub use setter::{UniformCache, UniformSetter, UploadContext, UploadScratch};
pub use value::UniformValue;

use crate::backend::GlBackend;
use crate::config::UniformsConfig;
use crate::error::Result;
use crate::textures::TextureUnits;

/// Root of the uniform tree of one program.
pub struct UniformTree<B: GlBackend> {
    gl: Arc<B>,
    root: UniformContainer<B::UniformLocation>,
    scratch: UploadScratch,
    config: UniformsConfig,
}

impl<B: GlBackend> UniformTree<B> {
    /// Reflect `program` with the default configuration.
    pub fn new(gl: Arc<B>, program: &B::Program) -> Result<Self> {
        Self::with_config(gl, program, UniformsConfig::default())
    }

    /// Reflect `program`.
    ///
    /// Fails if a reflected name cannot be parsed. Uniforms the context
    /// reports without a location are skipped.
    pub fn with_config(gl: Arc<B>, program: &B::Program, config: UniformsConfig) -> Result<Self> {
        let mut root = UniformContainer::default();
        let count = gl.active_uniform_count(program);
        let mut skipped = 0;

        for index in 0..count {
            let Some(info) = gl.active_uniform(program, index) else {
                log::debug!("UniformTree: no info for active uniform {index}");
                skipped += 1;
                continue;
            };
            let Some(location) = gl.uniform_location(program, &info.name) else {
                log::debug!("UniformTree: uniform {:?} has no location, skipping", info.name);
                skipped += 1;
                continue;
            };

            let path = parse_uniform_name(&info.name)?;
            if !root.insert(&path, &info, location) {
                skipped += 1;
            }
        }

        log::debug!(
            "UniformTree: reflected {} active uniforms into {} top-level nodes ({} skipped)",
            count,
            root.len(),
            skipped
        );

        Ok(Self {
            gl,
            root,
            scratch: UploadScratch::new(),
            config,
        })
    }

    /// Set a top-level uniform. Unknown names are ignored.
    pub fn set(&mut self, name: &str, value: &UniformValue, textures: &mut dyn TextureUnits) {
        self.set_optional(name, Some(value), textures);
    }

    /// Set a top-level uniform, `None` uploading zeros or binding
    /// placeholder textures.
    pub fn set_optional(
        &mut self,
        name: &str,
        value: Option<&UniformValue>,
        textures: &mut dyn TextureUnits,
    ) {
        let Some(node) = self.root.get_mut(name) else {
            log::trace!("UniformTree: no uniform {name:?}");
            return;
        };
        let mut ctx = UploadContext::new(&*self.gl, textures, &mut self.scratch)
            .with_value_shape_checks(self.config.check_value_shapes);
        node.set(value, &mut ctx);
    }

    /// Set a top-level uniform through the per-component path.
    pub fn set_value(&mut self, name: &str, value: &UniformValue, textures: &mut dyn TextureUnits) {
        let Some(node) = self.root.get_mut(name) else {
            log::trace!("UniformTree: no uniform {name:?}");
            return;
        };
        let mut ctx = UploadContext::new(&*self.gl, textures, &mut self.scratch)
            .with_value_shape_checks(self.config.check_value_shapes);
        node.set_value(Some(value), &mut ctx);
    }

    /// Whether `name` is a top-level uniform.
    pub fn has(&self, name: &str) -> bool {
        self.root.contains(name)
    }

    pub fn get(&self, name: &str) -> Option<&UniformNode<B::UniformLocation>> {
        self.root.get(name)
    }

    /// Number of top-level nodes.
    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Top-level nodes in reflection order.
    pub fn iter(&self) -> impl Iterator<Item = &UniformNode<B::UniformLocation>> {
        self.root.nodes().iter()
    }

    pub fn config(&self) -> &UniformsConfig {
        &self.config
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.gl
    }
}

#[cfg(all(test, feature = "dummy"))]
mod tests {
    use super::*;
    use crate::backend::{gl, DummyBackend, DummyLocation, DummyProgram, GlCall, TextureTarget};
    use crate::error::UniformError;
    use crate::textures::{placeholders, TextureUnitAllocator};

    type Setup = (
        Arc<DummyBackend>,
        UniformTree<DummyBackend>,
        TextureUnitAllocator<DummyBackend>,
    );

    fn setup(program: DummyProgram) -> Setup {
        let gl = Arc::new(DummyBackend::new());
        let tree = UniformTree::new(gl.clone(), &program).unwrap();
        let units = TextureUnitAllocator::new(gl.clone(), &UniformsConfig::default());
        (gl, tree, units)
    }

    #[test]
    fn test_top_level_order_follows_reflection() {
        let program = DummyProgram::new()
            .with_uniform("uView", gl::FLOAT_MAT4, 1)
            .with_uniform("uFog.color", gl::FLOAT_VEC3, 1)
            .with_uniform("uAlpha", gl::FLOAT, 1)
            .with_uniform("uFog.density", gl::FLOAT, 1);
        let (_gl, tree, _units) = setup(program);

        let ids: Vec<_> = tree.iter().map(|n| n.id().to_string()).collect();
        assert_eq!(ids, ["uView", "uFog", "uAlpha"]);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn test_has_sees_only_top_level() {
        let program = DummyProgram::new().with_uniform("uFog.color", gl::FLOAT_VEC3, 1);
        let (gl, mut tree, mut units) = setup(program);

        assert!(tree.has("uFog"));
        assert!(!tree.has("color"));
        assert!(!tree.has("uFog.color"));

        tree.set("unknown", &UniformValue::Float(1.0), &mut units);
        assert!(gl.calls().is_empty());
    }

    #[test]
    fn test_uniform_without_location_is_skipped() {
        let program = DummyProgram::new()
            .with_uniform("uA", gl::FLOAT, 1)
            .with_uniform("uB", gl::FLOAT, 1)
            .without_location("uB");
        let (_gl, tree, _units) = setup(program);

        assert!(tree.has("uA"));
        assert!(!tree.has("uB"));
    }

    #[test]
    fn test_malformed_name_fails_construction() {
        let program = DummyProgram::new().with_uniform("uLight.", gl::FLOAT, 1);
        let gl = Arc::new(DummyBackend::new());
        assert!(matches!(
            UniformTree::new(gl, &program),
            Err(UniformError::MalformedName { .. })
        ));
    }

    #[test]
    fn test_missing_struct_field_uploads_zero() {
        let program = DummyProgram::new()
            .with_uniform("uFog.color", gl::FLOAT_VEC3, 1)
            .with_uniform("uFog.density", gl::FLOAT, 1);
        let (gl, mut tree, mut units) = setup(program);

        tree.set(
            "uFog",
            &UniformValue::structure([("density", 0.25f32)]),
            &mut units,
        );

        assert_eq!(
            gl.take_calls(),
            vec![
                GlCall::UniformFv {
                    location: DummyLocation(0),
                    components: 3,
                    data: vec![0.0, 0.0, 0.0],
                },
                GlCall::Uniform1f(DummyLocation(1), 0.25),
            ]
        );
    }

    #[test]
    fn test_absent_sampler_binds_placeholder() {
        let program = DummyProgram::new().with_uniform("uMap", gl::SAMPLER_2D, 1);
        let (gl, mut tree, mut units) = setup(program);

        tree.set_optional("uMap", None, &mut units);

        assert_eq!(
            gl.take_calls(),
            vec![
                GlCall::ActiveTexture(0),
                GlCall::BindTexture {
                    target: TextureTarget::Texture2d,
                    texture: placeholders::texture_2d().id(),
                },
                GlCall::Uniform1i(DummyLocation(0), 0),
            ]
        );
    }

    #[test]
    fn test_shape_checks_follow_config() {
        let program = DummyProgram::new().with_uniform("uColor", gl::FLOAT_VEC3, 1);
        let gl = Arc::new(DummyBackend::new());
        let config = UniformsConfig::default().with_value_shape_checks(true);
        let mut tree = UniformTree::with_config(gl.clone(), &program, config).unwrap();
        let mut units = TextureUnitAllocator::new(gl.clone(), tree.config());

        tree.set("uColor", &UniformValue::Float(1.0), &mut units);
        assert_eq!(gl.upload_count(), 0);

        tree.set("uColor", &UniformValue::from([1.0f32, 1.0, 1.0]), &mut units);
        assert_eq!(gl.upload_count(), 1);
    }

    #[test]
    fn test_set_value_uses_component_upload() {
        let program = DummyProgram::new().with_uniform("uOffset", gl::FLOAT_VEC2, 1);
        let (gl, mut tree, mut units) = setup(program);

        tree.set_value("uOffset", &UniformValue::from([0.5f32, 0.25]), &mut units);

        assert_eq!(
            gl.take_calls(),
            vec![GlCall::Uniform2f(DummyLocation(0), [0.5, 0.25])]
        );
    }
}
