//! Nodes of the uniform tree.

use std::collections::HashMap;

use super::path::{LeafKind, PathSegment, UniformId, UniformPath};
use super::setter::{UniformCache, UniformSetter, UploadContext};
use super::value::UniformValue;
use crate::backend::{ActiveInfo, GlBackend, UniformType};

/// Leaf owning one location and holding a single value.
#[derive(Debug, Clone)]
pub struct SingleUniform<L> {
    id: UniformId,
    location: L,
    setter: UniformSetter,
}

impl<L> SingleUniform<L> {
    /// Get the key within the parent.
    pub fn id(&self) -> &UniformId {
        &self.id
    }

    /// Get the driver location.
    pub fn location(&self) -> &L {
        &self.location
    }

    pub fn uniform_type(&self) -> Option<UniformType> {
        self.setter.uniform_type()
    }

    pub fn cache(&self) -> &UniformCache {
        self.setter.cache()
    }
}

/// Leaf for a bottom-level array reflected as one slot of `size` elements.
#[derive(Debug, Clone)]
pub struct PureArrayUniform<L> {
    id: UniformId,
    location: L,
    size: usize,
    setter: UniformSetter,
}

impl<L> PureArrayUniform<L> {
    /// Get the key within the parent.
    pub fn id(&self) -> &UniformId {
        &self.id
    }

    /// Get the driver location.
    pub fn location(&self) -> &L {
        &self.location
    }

    /// Reflected element count.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn uniform_type(&self) -> Option<UniformType> {
        self.setter.uniform_type()
    }

    pub fn cache(&self) -> &UniformCache {
        self.setter.cache()
    }
}

/// Intermediate node: a struct, or one element of an array of structs.
#[derive(Debug, Clone)]
pub struct StructuredUniform<L> {
    id: UniformId,
    children: UniformContainer<L>,
}

impl<L> StructuredUniform<L> {
    pub fn id(&self) -> &UniformId {
        &self.id
    }

    pub fn children(&self) -> &[UniformNode<L>] {
        self.children.nodes()
    }

    pub fn child(&self, key: &str) -> Option<&UniformNode<L>> {
        self.children.get(key)
    }
}

/// A node of the uniform tree.
#[derive(Debug, Clone)]
pub enum UniformNode<L> {
    Single(SingleUniform<L>),
    PureArray(PureArrayUniform<L>),
    Struct(StructuredUniform<L>),
}

impl<L> UniformNode<L> {
    pub fn id(&self) -> &UniformId {
        match self {
            Self::Single(node) => &node.id,
            Self::PureArray(node) => &node.id,
            Self::Struct(node) => &node.id,
        }
    }

    /// Child nodes in first-reflected order; empty for leaves.
    pub fn children(&self) -> &[UniformNode<L>] {
        match self {
            Self::Struct(node) => node.children(),
            _ => &[],
        }
    }

    pub fn child(&self, key: &str) -> Option<&UniformNode<L>> {
        match self {
            Self::Struct(node) => node.child(key),
            _ => None,
        }
    }

    /// Location of a leaf, `None` for struct nodes.
    pub fn location(&self) -> Option<&L> {
        match self {
            Self::Single(node) => Some(&node.location),
            Self::PureArray(node) => Some(&node.location),
            Self::Struct(_) => None,
        }
    }

    pub fn uniform_type(&self) -> Option<UniformType> {
        match self {
            Self::Single(node) => node.uniform_type(),
            Self::PureArray(node) => node.uniform_type(),
            Self::Struct(_) => None,
        }
    }

    /// Element count: the reflected size for pure arrays, 1 for single leaves.
    pub fn size(&self) -> Option<usize> {
        match self {
            Self::Single(_) => Some(1),
            Self::PureArray(node) => Some(node.size),
            Self::Struct(_) => None,
        }
    }

    pub fn cache(&self) -> Option<&UniformCache> {
        match self {
            Self::Single(node) => Some(node.cache()),
            Self::PureArray(node) => Some(node.cache()),
            Self::Struct(_) => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        !matches!(self, Self::Struct(_))
    }

    /// Whole-value set. Struct nodes pass each child its field of `value`,
    /// or nothing when the field is missing.
    pub fn set<B>(&mut self, value: Option<&UniformValue>, ctx: &mut UploadContext<'_, B>)
    where
        B: GlBackend<UniformLocation = L>,
    {
        match self {
            Self::Single(node) => node.setter.set_single(&node.location, value, ctx),
            Self::PureArray(node) => node.setter.set_array(&node.location, node.size, value, ctx),
            Self::Struct(node) => {
                for child in node.children.nodes_mut() {
                    let field = value.and_then(|v| v.field(child.id()));
                    child.set(field, ctx);
                }
            }
        }
    }

    /// Per-component set. Identical to [`Self::set`] for matrices, samplers
    /// and pure arrays.
    pub fn set_value<B>(&mut self, value: Option<&UniformValue>, ctx: &mut UploadContext<'_, B>)
    where
        B: GlBackend<UniformLocation = L>,
    {
        match self {
            Self::Single(node) => node.setter.set_one(&node.location, value, ctx),
            Self::PureArray(node) => node.setter.set_array(&node.location, node.size, value, ctx),
            Self::Struct(node) => {
                for child in node.children.nodes_mut() {
                    let field = value.and_then(|v| v.field(child.id()));
                    child.set_value(field, ctx);
                }
            }
        }
    }
}

/// Ordered children with lookup by key.
#[derive(Debug, Clone)]
pub struct UniformContainer<L> {
    seq: Vec<UniformNode<L>>,
    map: HashMap<String, usize>,
}

impl<L> Default for UniformContainer<L> {
    fn default() -> Self {
        Self {
            seq: Vec::new(),
            map: HashMap::new(),
        }
    }
}

impl<L> UniformContainer<L> {
    pub fn nodes(&self) -> &[UniformNode<L>] {
        &self.seq
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut UniformNode<L>> {
        self.seq.iter_mut()
    }

    pub fn get(&self, key: &str) -> Option<&UniformNode<L>> {
        self.map.get(key).map(|&index| &self.seq[index])
    }

    pub(crate) fn get_mut(&mut self, key: &str) -> Option<&mut UniformNode<L>> {
        let index = *self.map.get(key)?;
        self.seq.get_mut(index)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.seq.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seq.is_empty()
    }

    fn push(&mut self, node: UniformNode<L>) -> usize {
        let index = self.seq.len();
        self.map.insert(node.id().key().into_owned(), index);
        self.seq.push(node);
        index
    }

    /// Insert the leaf described by `path`, creating struct nodes along the
    /// way. Returns `false` if the path conflicts with an existing node.
    pub(crate) fn insert(&mut self, path: &UniformPath, info: &ActiveInfo, location: L) -> bool {
        self.insert_at(path.parents(), path.leaf(), path.leaf_kind(), info, location)
    }

    fn insert_at(
        &mut self,
        parents: &[PathSegment],
        leaf: &PathSegment,
        kind: LeafKind,
        info: &ActiveInfo,
        location: L,
    ) -> bool {
        let Some((parent, rest)) = parents.split_first() else {
            return self.insert_leaf(leaf, kind, info, location);
        };

        let key = parent.id.key();
        let index = match self.map.get(key.as_ref()) {
            Some(&index) => index,
            None => self.push(UniformNode::Struct(StructuredUniform {
                id: parent.id.clone(),
                children: UniformContainer::default(),
            })),
        };

        match &mut self.seq[index] {
            UniformNode::Struct(node) => node.children.insert_at(rest, leaf, kind, info, location),
            _ => {
                log::warn!(
                    "uniform {:?} nests under leaf {:?}, skipping",
                    info.name,
                    parent.id.key()
                );
                false
            }
        }
    }

    fn insert_leaf(
        &mut self,
        leaf: &PathSegment,
        kind: LeafKind,
        info: &ActiveInfo,
        location: L,
    ) -> bool {
        if self.contains(leaf.id.key().as_ref()) {
            log::warn!("uniform {:?} is reflected twice, skipping", info.name);
            return false;
        }

        let setter = UniformSetter::new(info.ty);
        let id = leaf.id.clone();
        let node = match kind {
            LeafKind::Single => UniformNode::Single(SingleUniform {
                id,
                location,
                setter,
            }),
            LeafKind::PureArray => UniformNode::PureArray(PureArrayUniform {
                id,
                location,
                size: info.size.max(1) as usize,
                setter,
            }),
        };
        self.push(node);
        true
    }
}
