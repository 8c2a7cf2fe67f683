//! Dummy GL backend for testing and development.
//!
//! This backend doesn't talk to a driver. Reflection answers come from a
//! [`DummyProgram`] description and every state-setting call is recorded as
//! a [`GlCall`] so tests can assert exactly what would reach the driver.

use parking_lot::Mutex;

use super::traits::GlBackend;
use super::types::{ActiveInfo, TextureTarget};
use crate::textures::{Texture, TextureId};

/// Uniform location handed out by [`DummyBackend`]: the reflection index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DummyLocation(pub u32);

/// A linked program as the dummy backend reflects it.
#[derive(Debug, Clone, Default)]
pub struct DummyProgram {
    uniforms: Vec<ActiveInfo>,
    attributes: Vec<ActiveInfo>,
    missing_locations: Vec<String>,
}

impl DummyProgram {
    /// Create a program with nothing active.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an active uniform, reflected in insertion order.
    pub fn with_uniform(mut self, name: &str, ty: u32, size: u32) -> Self {
        self.uniforms.push(ActiveInfo::new(name, ty, size));
        self
    }

    /// Add an active vertex attribute, reflected in insertion order.
    pub fn with_attribute(mut self, name: &str, ty: u32, size: u32) -> Self {
        self.attributes.push(ActiveInfo::new(name, ty, size));
        self
    }

    /// Report the uniform as active but without a location.
    pub fn without_location(mut self, name: &str) -> Self {
        self.missing_locations.push(name.to_string());
        self
    }

    /// Active uniforms in reflection order.
    pub fn uniforms(&self) -> &[ActiveInfo] {
        &self.uniforms
    }
}

/// A state-setting call recorded by [`DummyBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum GlCall {
    Uniform1f(DummyLocation, f32),
    Uniform2f(DummyLocation, [f32; 2]),
    Uniform3f(DummyLocation, [f32; 3]),
    Uniform4f(DummyLocation, [f32; 4]),
    UniformFv {
        location: DummyLocation,
        components: usize,
        data: Vec<f32>,
    },
    Uniform1i(DummyLocation, i32),
    Uniform2i(DummyLocation, [i32; 2]),
    Uniform3i(DummyLocation, [i32; 3]),
    Uniform4i(DummyLocation, [i32; 4]),
    UniformIv {
        location: DummyLocation,
        components: usize,
        data: Vec<i32>,
    },
    UniformMatrixFv {
        location: DummyLocation,
        dim: usize,
        transpose: bool,
        data: Vec<f32>,
    },
    ActiveTexture(u32),
    BindTexture {
        target: TextureTarget,
        texture: TextureId,
    },
}

impl GlCall {
    /// Location targeted by a uniform upload, `None` for texture calls.
    pub fn location(&self) -> Option<DummyLocation> {
        match self {
            Self::Uniform1f(location, _)
            | Self::Uniform2f(location, _)
            | Self::Uniform3f(location, _)
            | Self::Uniform4f(location, _)
            | Self::Uniform1i(location, _)
            | Self::Uniform2i(location, _)
            | Self::Uniform3i(location, _)
            | Self::Uniform4i(location, _) => Some(*location),
            Self::UniformFv { location, .. }
            | Self::UniformIv { location, .. }
            | Self::UniformMatrixFv { location, .. } => Some(*location),
            Self::ActiveTexture(_) | Self::BindTexture { .. } => None,
        }
    }

    /// Whether this is a `uniform*` call.
    pub fn is_upload(&self) -> bool {
        self.location().is_some()
    }
}

/// Dummy GL backend.
#[derive(Debug, Default)]
pub struct DummyBackend {
    calls: Mutex<Vec<GlCall>>,
}

impl DummyBackend {
    /// Create a new dummy backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the backend name.
    pub fn name(&self) -> &'static str {
        "Dummy Backend"
    }

    /// Snapshot of every recorded call.
    pub fn calls(&self) -> Vec<GlCall> {
        self.calls.lock().clone()
    }

    /// Drain the recorded calls.
    pub fn take_calls(&self) -> Vec<GlCall> {
        std::mem::take(&mut *self.calls.lock())
    }

    /// Number of recorded uniform uploads.
    pub fn upload_count(&self) -> usize {
        self.calls.lock().iter().filter(|call| call.is_upload()).count()
    }

    /// Recorded uploads to one location.
    pub fn uploads_to(&self, location: DummyLocation) -> Vec<GlCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.location() == Some(location))
            .cloned()
            .collect()
    }

    /// Forget the recorded calls.
    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    fn record(&self, call: GlCall) {
        log::trace!("DummyBackend: {:?}", call);
        self.calls.lock().push(call);
    }
}

impl GlBackend for DummyBackend {
    type Program = DummyProgram;
    type UniformLocation = DummyLocation;

    fn active_uniform_count(&self, program: &DummyProgram) -> u32 {
        program.uniforms.len() as u32
    }

    fn active_uniform(&self, program: &DummyProgram, index: u32) -> Option<ActiveInfo> {
        program.uniforms.get(index as usize).cloned()
    }

    fn uniform_location(&self, program: &DummyProgram, name: &str) -> Option<DummyLocation> {
        if program.missing_locations.iter().any(|missing| missing == name) {
            return None;
        }
        program
            .uniforms
            .iter()
            .position(|info| info.name == name)
            .map(|index| DummyLocation(index as u32))
    }

    fn active_attribute_count(&self, program: &DummyProgram) -> u32 {
        program.attributes.len() as u32
    }

    fn active_attribute(&self, program: &DummyProgram, index: u32) -> Option<ActiveInfo> {
        program.attributes.get(index as usize).cloned()
    }

    fn attrib_location(&self, program: &DummyProgram, name: &str) -> i32 {
        program
            .attributes
            .iter()
            .position(|info| info.name == name)
            .map_or(-1, |index| index as i32)
    }

    fn uniform_1f(&self, location: &DummyLocation, x: f32) {
        self.record(GlCall::Uniform1f(*location, x));
    }

    fn uniform_2f(&self, location: &DummyLocation, x: f32, y: f32) {
        self.record(GlCall::Uniform2f(*location, [x, y]));
    }

    fn uniform_3f(&self, location: &DummyLocation, x: f32, y: f32, z: f32) {
        self.record(GlCall::Uniform3f(*location, [x, y, z]));
    }

    fn uniform_4f(&self, location: &DummyLocation, x: f32, y: f32, z: f32, w: f32) {
        self.record(GlCall::Uniform4f(*location, [x, y, z, w]));
    }

    fn uniform_1fv(&self, location: &DummyLocation, data: &[f32]) {
        self.record_fv(location, 1, data);
    }

    fn uniform_2fv(&self, location: &DummyLocation, data: &[f32]) {
        self.record_fv(location, 2, data);
    }

    fn uniform_3fv(&self, location: &DummyLocation, data: &[f32]) {
        self.record_fv(location, 3, data);
    }

    fn uniform_4fv(&self, location: &DummyLocation, data: &[f32]) {
        self.record_fv(location, 4, data);
    }

    fn uniform_1i(&self, location: &DummyLocation, x: i32) {
        self.record(GlCall::Uniform1i(*location, x));
    }

    fn uniform_2i(&self, location: &DummyLocation, x: i32, y: i32) {
        self.record(GlCall::Uniform2i(*location, [x, y]));
    }

    fn uniform_3i(&self, location: &DummyLocation, x: i32, y: i32, z: i32) {
        self.record(GlCall::Uniform3i(*location, [x, y, z]));
    }

    fn uniform_4i(&self, location: &DummyLocation, x: i32, y: i32, z: i32, w: i32) {
        self.record(GlCall::Uniform4i(*location, [x, y, z, w]));
    }

    fn uniform_1iv(&self, location: &DummyLocation, data: &[i32]) {
        self.record_iv(location, 1, data);
    }

    fn uniform_2iv(&self, location: &DummyLocation, data: &[i32]) {
        self.record_iv(location, 2, data);
    }

    fn uniform_3iv(&self, location: &DummyLocation, data: &[i32]) {
        self.record_iv(location, 3, data);
    }

    fn uniform_4iv(&self, location: &DummyLocation, data: &[i32]) {
        self.record_iv(location, 4, data);
    }

    fn uniform_matrix_2fv(&self, location: &DummyLocation, transpose: bool, data: &[f32]) {
        self.record_matrix(location, 2, transpose, data);
    }

    fn uniform_matrix_3fv(&self, location: &DummyLocation, transpose: bool, data: &[f32]) {
        self.record_matrix(location, 3, transpose, data);
    }

    fn uniform_matrix_4fv(&self, location: &DummyLocation, transpose: bool, data: &[f32]) {
        self.record_matrix(location, 4, transpose, data);
    }

    fn active_texture(&self, unit: u32) {
        self.record(GlCall::ActiveTexture(unit));
    }

    fn bind_texture(&self, target: TextureTarget, texture: &Texture) {
        self.record(GlCall::BindTexture {
            target,
            texture: texture.id(),
        });
    }
}

impl DummyBackend {
    fn record_fv(&self, location: &DummyLocation, components: usize, data: &[f32]) {
        self.record(GlCall::UniformFv {
            location: *location,
            components,
            data: data.to_vec(),
        });
    }

    fn record_iv(&self, location: &DummyLocation, components: usize, data: &[i32]) {
        self.record(GlCall::UniformIv {
            location: *location,
            components,
            data: data.to_vec(),
        });
    }

    fn record_matrix(&self, location: &DummyLocation, dim: usize, transpose: bool, data: &[f32]) {
        self.record(GlCall::UniformMatrixFv {
            location: *location,
            dim,
            transpose,
            data: data.to_vec(),
        });
    }
}
