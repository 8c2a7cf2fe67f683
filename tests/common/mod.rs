//! Shared setup for uniform tree integration tests.

use std::sync::Arc;

use redlilium_gl_uniforms::backend::gl;
use redlilium_gl_uniforms::{
    DummyBackend, DummyProgram, TextureUnitAllocator, UniformTree, UniformValue, UniformsConfig,
};

/// Install a test logger once per test binary.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Tree, backend and unit allocator wired together over a dummy context.
pub struct Fixture {
    pub gl: Arc<DummyBackend>,
    pub tree: UniformTree<DummyBackend>,
    pub units: TextureUnitAllocator<DummyBackend>,
}

impl Fixture {
    pub fn new(program: DummyProgram) -> Self {
        Self::with_config(program, UniformsConfig::default())
    }

    pub fn with_config(program: DummyProgram, config: UniformsConfig) -> Self {
        init_logging();
        let gl = Arc::new(DummyBackend::new());
        let units = TextureUnitAllocator::new(gl.clone(), &config);
        let tree = UniformTree::with_config(gl.clone(), &program, config)
            .expect("program reflection should succeed");
        Self { gl, tree, units }
    }

    /// Set a top-level uniform, then reset unit allocation as a draw would.
    pub fn set(&mut self, name: &str, value: &UniformValue) {
        self.tree.set(name, value, &mut self.units);
        self.units.reset();
    }

    /// Uploads recorded since the last call.
    pub fn take_uploads(&self) -> usize {
        self.gl
            .take_calls()
            .iter()
            .filter(|call| call.is_upload())
            .count()
    }
}

/// Program with a matrix, an array of light structs and a 2D sampler.
pub fn lit_program() -> DummyProgram {
    DummyProgram::new()
        .with_uniform("uMat", gl::FLOAT_MAT4, 1)
        .with_uniform("uLights[0].color", gl::FLOAT_VEC3, 1)
        .with_uniform("uLights[0].intensity", gl::FLOAT, 1)
        .with_uniform("uLights[1].color", gl::FLOAT_VEC3, 1)
        .with_uniform("uLights[1].intensity", gl::FLOAT, 1)
        .with_uniform("uLights[2].color", gl::FLOAT_VEC3, 1)
        .with_uniform("uLights[2].intensity", gl::FLOAT, 1)
        .with_uniform("uSampler", gl::SAMPLER_2D, 1)
}

/// Light struct value.
pub fn light(color: [f32; 3], intensity: f32) -> UniformValue {
    UniformValue::structure([
        ("color", UniformValue::from(color)),
        ("intensity", UniformValue::from(intensity)),
    ])
}
