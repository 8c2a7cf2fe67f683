//! Graphics context abstraction consumed by the uniform and attribute layers.

use crate::backend::types::{ActiveInfo, TextureTarget};
use crate::textures::Texture;

/// Shader reflection and state-setting entry points of a GL-style context.
///
/// Methods take `&self`: a context is a shared handle owned by the thread
/// that renders, and uniform trees keep it in an `Arc`. Uploads target the
/// currently bound program.
pub trait GlBackend {
    /// Linked program handle.
    type Program;
    /// Opaque location returned by uniform reflection.
    type UniformLocation: Clone + std::fmt::Debug;

    // Reflection

    /// Number of active uniforms in a linked program.
    fn active_uniform_count(&self, program: &Self::Program) -> u32;

    /// Metadata of the active uniform at `index`.
    fn active_uniform(&self, program: &Self::Program, index: u32) -> Option<ActiveInfo>;

    /// Location of a uniform by its reflected name.
    fn uniform_location(
        &self,
        program: &Self::Program,
        name: &str,
    ) -> Option<Self::UniformLocation>;

    /// Number of active vertex attributes in a linked program.
    fn active_attribute_count(&self, program: &Self::Program) -> u32;

    /// Metadata of the active attribute at `index`.
    fn active_attribute(&self, program: &Self::Program, index: u32) -> Option<ActiveInfo>;

    /// Attribute location, `-1` when the attribute is not active.
    fn attrib_location(&self, program: &Self::Program, name: &str) -> i32;

    // Float uploads

    fn uniform_1f(&self, location: &Self::UniformLocation, x: f32);
    fn uniform_2f(&self, location: &Self::UniformLocation, x: f32, y: f32);
    fn uniform_3f(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32);
    fn uniform_4f(&self, location: &Self::UniformLocation, x: f32, y: f32, z: f32, w: f32);
    fn uniform_1fv(&self, location: &Self::UniformLocation, data: &[f32]);
    fn uniform_2fv(&self, location: &Self::UniformLocation, data: &[f32]);
    fn uniform_3fv(&self, location: &Self::UniformLocation, data: &[f32]);
    fn uniform_4fv(&self, location: &Self::UniformLocation, data: &[f32]);

    // Integer and boolean uploads

    fn uniform_1i(&self, location: &Self::UniformLocation, x: i32);
    fn uniform_2i(&self, location: &Self::UniformLocation, x: i32, y: i32);
    fn uniform_3i(&self, location: &Self::UniformLocation, x: i32, y: i32, z: i32);
    fn uniform_4i(&self, location: &Self::UniformLocation, x: i32, y: i32, z: i32, w: i32);
    fn uniform_1iv(&self, location: &Self::UniformLocation, data: &[i32]);
    fn uniform_2iv(&self, location: &Self::UniformLocation, data: &[i32]);
    fn uniform_3iv(&self, location: &Self::UniformLocation, data: &[i32]);
    fn uniform_4iv(&self, location: &Self::UniformLocation, data: &[i32]);

    // Matrix uploads (column-major)

    fn uniform_matrix_2fv(&self, location: &Self::UniformLocation, transpose: bool, data: &[f32]);
    fn uniform_matrix_3fv(&self, location: &Self::UniformLocation, transpose: bool, data: &[f32]);
    fn uniform_matrix_4fv(&self, location: &Self::UniformLocation, transpose: bool, data: &[f32]);

    // Texturing

    /// Select the texture unit subsequent binds apply to.
    fn active_texture(&self, unit: u32);

    /// Bind a texture to the active unit.
    fn bind_texture(&self, target: TextureTarget, texture: &Texture);
}
