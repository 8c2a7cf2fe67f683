//! Parser for reflected uniform names.
//!
//! Drivers flatten structured uniforms into dotted/bracketed names:
//!
//! ```text
//! uModel              single value
//! uBones[0]           pure array, element count comes from reflection
//! uLights[2].color    member of element 2 of an array of structs
//! uCascade.splits[0]  pure array inside a struct
//! ```
//!
//! The name is read as a sequence of `identifier`, optional `]`, optional
//! `[` or `.`. Every segment but the last opens an intermediate node; the
//! last one is the leaf that owns the location.

use std::borrow::Cow;
use std::fmt;

use crate::error::{Result, UniformError};

/// Identifier of a node in the uniform tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UniformId {
    /// Struct member or top-level uniform name.
    Name(String),
    /// Array element index.
    Index(u32),
}

impl UniformId {
    /// Key used for lookups among siblings. Indices use their decimal form,
    /// so element `2` is keyed `"2"`.
    pub fn key(&self) -> Cow<'_, str> {
        match self {
            Self::Name(name) => Cow::Borrowed(name),
            Self::Index(index) => Cow::Owned(index.to_string()),
        }
    }

    pub fn as_index(&self) -> Option<u32> {
        match self {
            Self::Index(index) => Some(*index),
            Self::Name(_) => None,
        }
    }
}

impl fmt::Display for UniformId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Token following an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subscript {
    /// `.` - a struct member follows.
    Member,
    /// `[` - an array index follows.
    Index,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    pub id: UniformId,
    /// The identifier was closed by `]`, i.e. it is an array index.
    pub closes_index: bool,
    pub subscript: Option<Subscript>,
}

/// Kind of node the last segment of a path creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    Single,
    PureArray,
}

/// A parsed uniform name: intermediate segments followed by the leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniformPath {
    segments: Vec<PathSegment>,
    leaf_kind: LeafKind,
}

impl UniformPath {
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Segments that become struct nodes.
    pub fn parents(&self) -> &[PathSegment] {
        &self.segments[..self.segments.len() - 1]
    }

    pub fn leaf(&self) -> &PathSegment {
        &self.segments[self.segments.len() - 1]
    }

    pub fn leaf_kind(&self) -> LeafKind {
        self.leaf_kind
    }
}

/// Parse a reflected uniform name into its path.
pub fn parse_uniform_name(name: &str) -> Result<UniformPath> {
    let bytes = name.as_bytes();
    let mut segments = Vec::new();
    let mut pos = 0;

    loop {
        let Some(token) = next_token(bytes, pos) else {
            return Err(UniformError::MalformedName {
                name: name.to_string(),
            });
        };
        pos = token.end;

        let ident = &name[token.ident_start..token.ident_end];
        let id = if token.closes_index {
            let index = ident.parse().map_err(|_| UniformError::MalformedName {
                name: name.to_string(),
            })?;
            UniformId::Index(index)
        } else {
            UniformId::Name(ident.to_string())
        };

        let leaf_kind = match token.subscript {
            None => Some(LeafKind::Single),
            Some(Subscript::Index) if is_pure_array_suffix(bytes.len(), token.end) => {
                Some(LeafKind::PureArray)
            }
            Some(_) => None,
        };

        segments.push(PathSegment {
            id,
            closes_index: token.closes_index,
            subscript: token.subscript,
        });

        if let Some(leaf_kind) = leaf_kind {
            return Ok(UniformPath {
                segments,
                leaf_kind,
            });
        }
    }
}

/// Whether an opening `[` ending at `token_end` starts the trailing `0]`
/// that marks a bottom-level array reported as one slot.
///
/// This follows the GLES/WebGL reflection convention; other reflection
/// schemes need their own rule here.
pub fn is_pure_array_suffix(name_len: usize, token_end: usize) -> bool {
    token_end + 2 == name_len
}

struct Token {
    ident_start: usize,
    ident_end: usize,
    closes_index: bool,
    subscript: Option<Subscript>,
    end: usize,
}

fn is_word(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'_'
}

/// Find the next `(\w+)(\])?([\[.])?` match at or after `pos`.
fn next_token(bytes: &[u8], mut pos: usize) -> Option<Token> {
    while pos < bytes.len() && !is_word(bytes[pos]) {
        pos += 1;
    }
    if pos >= bytes.len() {
        return None;
    }

    let ident_start = pos;
    while pos < bytes.len() && is_word(bytes[pos]) {
        pos += 1;
    }
    let ident_end = pos;

    let closes_index = bytes.get(pos) == Some(&b']');
    if closes_index {
        pos += 1;
    }

    let subscript = match bytes.get(pos) {
        Some(b'[') => Some(Subscript::Index),
        Some(b'.') => Some(Subscript::Member),
        _ => None,
    };
    if subscript.is_some() {
        pos += 1;
    }

    Some(Token {
        ident_start,
        ident_end,
        closes_index,
        subscript,
        end: pos,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(path: &UniformPath) -> Vec<String> {
        path.segments().iter().map(|s| s.id.to_string()).collect()
    }

    #[test]
    fn test_plain_name_is_single_leaf() {
        let path = parse_uniform_name("uModelMatrix").unwrap();
        assert_eq!(ids(&path), ["uModelMatrix"]);
        assert_eq!(path.leaf_kind(), LeafKind::Single);
        assert!(path.parents().is_empty());
    }

    #[test]
    fn test_bottom_level_array_is_pure_array() {
        let path = parse_uniform_name("uBones[0]").unwrap();
        assert_eq!(ids(&path), ["uBones"]);
        assert_eq!(path.leaf_kind(), LeafKind::PureArray);
        assert_eq!(path.leaf().subscript, Some(Subscript::Index));
    }

    #[test]
    fn test_array_of_structs() {
        let path = parse_uniform_name("uLights[2].color").unwrap();
        assert_eq!(ids(&path), ["uLights", "2", "color"]);
        assert_eq!(path.segments()[1].id, UniformId::Index(2));
        assert!(path.segments()[1].closes_index);
        assert_eq!(path.segments()[1].subscript, Some(Subscript::Member));
        assert_eq!(path.leaf_kind(), LeafKind::Single);
    }

    #[test]
    fn test_struct_member_array() {
        let path = parse_uniform_name("uCascade.splits[0]").unwrap();
        assert_eq!(ids(&path), ["uCascade", "splits"]);
        assert_eq!(path.leaf_kind(), LeafKind::PureArray);
    }

    #[test]
    fn test_nested_arrays_of_structs() {
        let path = parse_uniform_name("a[1].b[3].c[0]").unwrap();
        assert_eq!(ids(&path), ["a", "1", "b", "3", "c"]);
        assert_eq!(path.leaf_kind(), LeafKind::PureArray);
    }

    #[test]
    fn test_array_of_arrays_leaf_is_index() {
        let path = parse_uniform_name("grid[2][0]").unwrap();
        assert_eq!(ids(&path), ["grid", "2"]);
        assert_eq!(path.leaf().id, UniformId::Index(2));
        assert_eq!(path.leaf_kind(), LeafKind::PureArray);
    }

    #[test]
    fn test_parsing_is_deterministic() {
        let name = "uShadows[1].matrix";
        assert_eq!(
            parse_uniform_name(name).unwrap(),
            parse_uniform_name(name).unwrap()
        );
    }

    #[test]
    fn test_malformed_names() {
        for name in ["", "[]", ".", "uLight.", "uLights[1]."] {
            assert_eq!(
                parse_uniform_name(name),
                Err(UniformError::MalformedName {
                    name: name.to_string()
                }),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_non_numeric_index_is_rejected() {
        assert!(parse_uniform_name("a[b].c").is_err());
    }

    #[test]
    fn test_id_keys() {
        assert_eq!(UniformId::Index(5).key(), "5");
        assert_eq!(UniformId::Name("color".into()).key(), "color");
        assert_eq!(UniformId::Index(5).as_index(), Some(5));
    }
}
