//! Active vertex attributes of a linked program.
//!
//! Reflection reports each attribute's GL type; the descriptor derives how
//! many components a vertex buffer must feed it, in which component format,
//! and how many consecutive locations it occupies (matrices take one
//! location per column).
//!
//! ```ignore
//! let attributes = ProgramAttributes::new(&*gl, &program);
//! if let Some(position) = attributes.get("aPosition") {
//!     bind_buffer(position.location, position.count, position.format);
//! }
//! ```

use std::collections::HashMap;

use crate::backend::{gl, ActiveInfo, GlBackend};

/// Components fed to an attribute of GL type `ty`, 0 for unknown types.
pub fn attribute_count(ty: u32) -> u32 {
    match ty {
        gl::FLOAT | gl::BYTE | gl::UNSIGNED_BYTE | gl::UNSIGNED_SHORT => 1,
        gl::FLOAT_VEC2 => 2,
        gl::FLOAT_VEC3 => 3,
        gl::FLOAT_VEC4 => 4,
        gl::FLOAT_MAT2 => 4,
        gl::FLOAT_MAT3 => 9,
        gl::FLOAT_MAT4 => 16,
        _ => 0,
    }
}

/// Component format of an attribute of GL type `ty`.
///
/// Integer storage types pass through; everything else reads floats.
pub fn attribute_format(ty: u32) -> u32 {
    match ty {
        gl::UNSIGNED_BYTE => gl::UNSIGNED_BYTE,
        gl::UNSIGNED_SHORT => gl::UNSIGNED_SHORT,
        gl::BYTE => gl::BYTE,
        _ => gl::FLOAT,
    }
}

/// Consecutive locations used by an attribute of GL type `ty`.
pub fn attribute_location_size(ty: u32) -> u32 {
    match ty {
        gl::FLOAT_MAT2 => 2,
        gl::FLOAT_MAT3 => 3,
        gl::FLOAT_MAT4 => 4,
        _ => 1,
    }
}

/// One active vertex attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveAttribute {
    pub name: String,
    /// GL type enum.
    pub ty: u32,
    /// Array size reported by reflection.
    pub size: u32,
    /// Location, `-1` if the context reports none.
    pub location: i32,
    pub count: u32,
    pub format: u32,
    pub location_size: u32,
}

impl ActiveAttribute {
    /// Describe an attribute from its reflected info and location.
    pub fn new(info: &ActiveInfo, location: i32) -> Self {
        Self {
            name: info.name.clone(),
            ty: info.ty,
            size: info.size,
            location,
            count: attribute_count(info.ty),
            format: attribute_format(info.ty),
            location_size: attribute_location_size(info.ty),
        }
    }

    /// Reflect one attribute of `program`, querying its location.
    pub fn reflect<B: GlBackend>(gl: &B, program: &B::Program, info: &ActiveInfo) -> Self {
        Self::new(info, gl.attrib_location(program, &info.name))
    }

    pub fn has_location(&self) -> bool {
        self.location >= 0
    }
}

/// All active attributes of a program, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct ProgramAttributes {
    attributes: HashMap<String, ActiveAttribute>,
}

impl ProgramAttributes {
    pub fn new<B: GlBackend>(gl: &B, program: &B::Program) -> Self {
        let count = gl.active_attribute_count(program);
        let attributes: HashMap<_, _> = (0..count)
            .filter_map(|index| gl.active_attribute(program, index))
            .map(|info| {
                let attribute = ActiveAttribute::reflect(gl, program, &info);
                (attribute.name.clone(), attribute)
            })
            .collect();

        log::debug!(
            "ProgramAttributes: reflected {} of {} active attributes",
            attributes.len(),
            count
        );
        Self { attributes }
    }

    pub fn get(&self, name: &str) -> Option<&ActiveAttribute> {
        self.attributes.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveAttribute> {
        self.attributes.values()
    }
}
