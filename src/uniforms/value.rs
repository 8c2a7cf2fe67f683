//! Values accepted by uniform setters.

use std::collections::HashMap;
use std::sync::Arc;

use glam::{IVec2, IVec3, IVec4, Mat2, Mat3, Mat4, Vec2, Vec3, Vec4};

use super::path::UniformId;
use crate::textures::Texture;

/// A value for one node of the uniform tree.
///
/// Numeric leaves read any numeric variant as a flat component sequence:
/// a `vec3` accepts `Floats(vec![r, g, b])`, an array of `vec3` accepts a
/// flat `Floats` of `3 * n` components or a `List` of per-element values.
/// Struct nodes look their children up with [`UniformValue::field`].
#[derive(Debug, Clone)]
pub enum UniformValue {
    Float(f32),
    Int(i32),
    Bool(bool),
    Floats(Vec<f32>),
    Ints(Vec<i32>),
    Bools(Vec<bool>),
    /// Sampler value; `None` binds the placeholder texture.
    Texture(Option<Arc<Texture>>),
    /// Sampler array value.
    Textures(Vec<Option<Arc<Texture>>>),
    /// Struct value, fields keyed by member name.
    Struct(HashMap<String, UniformValue>),
    /// Array value, elements addressed by index.
    List(Vec<UniformValue>),
}

impl UniformValue {
    /// Build a struct value from `(member, value)` pairs.
    pub fn structure<K, V, I>(fields: I) -> Self
    where
        K: Into<String>,
        V: Into<UniformValue>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self::Struct(
            fields
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Build an array value from its elements.
    pub fn list<V, I>(items: I) -> Self
    where
        V: Into<UniformValue>,
        I: IntoIterator<Item = V>,
    {
        Self::List(items.into_iter().map(Into::into).collect())
    }

    /// Flatten a slice of float-component POD values, e.g. `&[Vec3]`.
    ///
    /// Returns `None` if `T` is not a whole number of `f32`s.
    pub fn from_pod_slice<T: bytemuck::Pod>(items: &[T]) -> Option<Self> {
        bytemuck::try_cast_slice::<T, f32>(items)
            .ok()
            .map(|floats| Self::Floats(floats.to_vec()))
    }

    /// Child value for a struct or array-element node.
    ///
    /// Struct values are looked up by member name (array element ids by
    /// their decimal key), list values by index.
    pub fn field(&self, id: &UniformId) -> Option<&UniformValue> {
        match (self, id) {
            (Self::Struct(fields), id) => fields.get(id.key().as_ref()),
            (Self::List(items), UniformId::Index(index)) => items.get(*index as usize),
            _ => None,
        }
    }

    pub fn is_texture(&self) -> bool {
        matches!(self, Self::Texture(_) | Self::Textures(_))
    }

    /// Append this value's numeric components as floats.
    pub(crate) fn collect_floats(&self, out: &mut Vec<f32>) {
        match self {
            Self::Float(v) => out.push(*v),
            Self::Int(v) => out.push(*v as f32),
            Self::Bool(v) => out.push(if *v { 1.0 } else { 0.0 }),
            Self::Floats(values) => out.extend_from_slice(values),
            Self::Ints(values) => out.extend(values.iter().map(|&v| v as f32)),
            Self::Bools(values) => out.extend(values.iter().map(|&v| if v { 1.0 } else { 0.0 })),
            Self::List(items) => items.iter().for_each(|item| item.collect_floats(out)),
            Self::Texture(_) | Self::Textures(_) | Self::Struct(_) => {}
        }
    }

    /// Append this value's numeric components as integers. Booleans map to
    /// 0/1, floats are truncated.
    pub(crate) fn collect_ints(&self, out: &mut Vec<i32>) {
        match self {
            Self::Float(v) => out.push(*v as i32),
            Self::Int(v) => out.push(*v),
            Self::Bool(v) => out.push(i32::from(*v)),
            Self::Floats(values) => out.extend(values.iter().map(|&v| v as i32)),
            Self::Ints(values) => out.extend_from_slice(values),
            Self::Bools(values) => out.extend(values.iter().map(|&v| i32::from(v))),
            Self::List(items) => items.iter().for_each(|item| item.collect_ints(out)),
            Self::Texture(_) | Self::Textures(_) | Self::Struct(_) => {}
        }
    }

    /// Number of sampler elements carried by a sampler array value.
    pub(crate) fn texture_count(&self) -> Option<usize> {
        match self {
            Self::Textures(textures) => Some(textures.len()),
            Self::List(items) => Some(items.len()),
            Self::Texture(_) => Some(1),
            _ => None,
        }
    }

    /// Sampler element `index` of a sampler or sampler array value.
    pub(crate) fn texture_at(&self, index: usize) -> Option<&Texture> {
        match self {
            Self::Texture(texture) if index == 0 => texture.as_deref(),
            Self::Textures(textures) => textures.get(index).and_then(|t| t.as_deref()),
            Self::List(items) => match items.get(index) {
                Some(Self::Texture(texture)) => texture.as_deref(),
                _ => None,
            },
            _ => None,
        }
    }
}

impl From<f32> for UniformValue {
    fn from(v: f32) -> Self {
        Self::Float(v)
    }
}

impl From<i32> for UniformValue {
    fn from(v: i32) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for UniformValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl<const N: usize> From<[f32; N]> for UniformValue {
    fn from(v: [f32; N]) -> Self {
        Self::Floats(v.to_vec())
    }
}

impl<const N: usize> From<[i32; N]> for UniformValue {
    fn from(v: [i32; N]) -> Self {
        Self::Ints(v.to_vec())
    }
}

impl<const N: usize> From<[bool; N]> for UniformValue {
    fn from(v: [bool; N]) -> Self {
        Self::Bools(v.to_vec())
    }
}

impl From<Vec<f32>> for UniformValue {
    fn from(v: Vec<f32>) -> Self {
        Self::Floats(v)
    }
}

impl From<&[f32]> for UniformValue {
    fn from(v: &[f32]) -> Self {
        Self::Floats(v.to_vec())
    }
}

impl From<Vec<i32>> for UniformValue {
    fn from(v: Vec<i32>) -> Self {
        Self::Ints(v)
    }
}

impl From<Vec2> for UniformValue {
    fn from(v: Vec2) -> Self {
        Self::Floats(v.to_array().to_vec())
    }
}

impl From<Vec3> for UniformValue {
    fn from(v: Vec3) -> Self {
        Self::Floats(v.to_array().to_vec())
    }
}

impl From<Vec4> for UniformValue {
    fn from(v: Vec4) -> Self {
        Self::Floats(v.to_array().to_vec())
    }
}

impl From<IVec2> for UniformValue {
    fn from(v: IVec2) -> Self {
        Self::Ints(v.to_array().to_vec())
    }
}

impl From<IVec3> for UniformValue {
    fn from(v: IVec3) -> Self {
        Self::Ints(v.to_array().to_vec())
    }
}

impl From<IVec4> for UniformValue {
    fn from(v: IVec4) -> Self {
        Self::Ints(v.to_array().to_vec())
    }
}

impl From<Mat2> for UniformValue {
    fn from(m: Mat2) -> Self {
        Self::Floats(m.to_cols_array().to_vec())
    }
}

impl From<Mat3> for UniformValue {
    fn from(m: Mat3) -> Self {
        Self::Floats(m.to_cols_array().to_vec())
    }
}

impl From<Mat4> for UniformValue {
    fn from(m: Mat4) -> Self {
        Self::Floats(m.to_cols_array().to_vec())
    }
}

impl From<Arc<Texture>> for UniformValue {
    fn from(texture: Arc<Texture>) -> Self {
        Self::Texture(Some(texture))
    }
}

impl From<Option<Arc<Texture>>> for UniformValue {
    fn from(texture: Option<Arc<Texture>>) -> Self {
        Self::Texture(texture)
    }
}

impl From<Vec<UniformValue>> for UniformValue {
    fn from(items: Vec<UniformValue>) -> Self {
        Self::List(items)
    }
}
