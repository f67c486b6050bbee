//! The provider seam: concrete tree representations and the generic node
//! that walks them.
//!
//! A backing format only has to answer shape-level questions through
//! [`Tree`]. [`TreeNode`] layers the [`Node`] contract on top, including
//! absent-node tracking, so every provider gets the same navigation and
//! failure behaviour.

use std::collections::HashMap;

use crate::{
    error::{NodeError, Result},
    key::{Key, Path},
    kind::{Kind, Primitive},
    node::Node,
};

/// A concrete tree representation that [`TreeNode`] can navigate.
pub trait Tree {
    fn kind(&self) -> Kind;

    /// The leaf view of this value, or `None` for arrays and objects.
    fn primitive(&self) -> Option<Primitive<'_>>;

    /// Look up a field on an object. Returns `None` for non-objects.
    fn field(&self, name: &str) -> Option<&Self>;

    /// The elements of an array in order. Returns `None` for non-arrays.
    fn elements(&self) -> Option<&[Self]>
    where
        Self: Sized;

    /// The entries of an object. Returns `None` for non-objects.
    fn entries(&self) -> Option<Vec<(&str, &Self)>>;

    /// A node positioned at this value.
    fn root(&self) -> TreeNode<'_, Self>
    where
        Self: Sized,
    {
        TreeNode::new(self)
    }
}

/// The first navigation step that failed to resolve.
#[derive(Debug, Clone, PartialEq)]
struct Missing {
    parent: Path,
    key: Key,
}

impl Missing {
    fn to_error(&self) -> NodeError {
        match &self.key {
            Key::Name(_) => NodeError::KeyNotFound {
                path: self.parent.clone(),
                key: self.key.clone(),
            },
            Key::Index(index) => NodeError::IndexOutOfRange {
                path: self.parent.clone(),
                index: *index,
            },
        }
    }
}

/// A position in a [`Tree`], possibly absent.
///
/// Navigation never fails. Stepping off the tree yields an absent node that
/// remembers the first step that could not be resolved; later steps keep
/// that first failure, and every extraction on it reports it.
#[derive(Debug)]
pub struct TreeNode<'a, T> {
    position: Position<'a, T>,
    path: Path,
}

#[derive(Debug)]
enum Position<'a, T> {
    Present(&'a T),
    Absent(Missing),
}

impl<T> Clone for Position<'_, T> {
    fn clone(&self) -> Self {
        match self {
            Position::Present(tree) => Position::Present(*tree),
            Position::Absent(missing) => Position::Absent(missing.clone()),
        }
    }
}

impl<T> Clone for TreeNode<'_, T> {
    fn clone(&self) -> Self {
        TreeNode {
            position: self.position.clone(),
            path: self.path.clone(),
        }
    }
}

impl<'a, T: Tree> TreeNode<'a, T> {
    pub fn new(tree: &'a T) -> Self {
        TreeNode {
            position: Position::Present(tree),
            path: Path::new(),
        }
    }

    /// The value this node resolved to, if it is present.
    pub fn tree(&self) -> Option<&'a T> {
        match self.position {
            Position::Present(tree) => Some(tree),
            Position::Absent(_) => None,
        }
    }

    fn present(&self, tree: &'a T, key: Key) -> Self {
        TreeNode {
            position: Position::Present(tree),
            path: self.path.join(key),
        }
    }

    /// The value this node resolved to, or the error describing why it is
    /// absent.
    pub fn resolve(&self) -> Result<&'a T> {
        match &self.position {
            Position::Present(tree) => Ok(*tree),
            Position::Absent(missing) => Err(missing.to_error()),
        }
    }

    fn mismatch(&self, expected: &'static str, found: Kind) -> NodeError {
        NodeError::TypeMismatch {
            path: self.path.clone(),
            expected,
            found,
        }
    }
}

/// Resolve a possibly negative index against a list length.
fn resolve_index(index: i64, len: usize) -> Option<usize> {
    if index < 0 {
        let back = usize::try_from(index.unsigned_abs()).ok()?;
        len.checked_sub(back)
    } else {
        usize::try_from(index).ok().filter(|i| *i < len)
    }
}

impl<'a, T: Tree> Node for TreeNode<'a, T> {
    fn child(&self, key: &Key) -> Self {
        let tree = match &self.position {
            Position::Present(tree) => *tree,
            Position::Absent(missing) => {
                return TreeNode {
                    position: Position::Absent(missing.clone()),
                    path: self.path.join(key),
                };
            }
        };

        let found = match key {
            Key::Name(name) => tree.field(name),
            Key::Index(index) => tree
                .elements()
                .and_then(|items| resolve_index(*index, items.len()).map(|i| &items[i])),
        };

        match found {
            Some(child) => self.present(child, key.clone()),
            None => {
                tracing::trace!(path = %self.path, key = %key, kind = %tree.kind(), "navigation left the tree");
                TreeNode {
                    position: Position::Absent(Missing {
                        parent: self.path.clone(),
                        key: key.clone(),
                    }),
                    path: self.path.join(key),
                }
            }
        }
    }

    fn is_present(&self) -> bool {
        matches!(self.position, Position::Present(_))
    }

    fn kind(&self) -> Kind {
        self.tree().map_or(Kind::Absent, |tree| tree.kind())
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn primitive(&self) -> Result<Option<Primitive<'_>>> {
        Ok(self.resolve()?.primitive())
    }

    fn array(&self) -> Result<Vec<Self>> {
        let tree = self.resolve()?;
        let items = tree
            .elements()
            .ok_or_else(|| self.mismatch("array", tree.kind()))?;

        Ok(items
            .iter()
            .enumerate()
            .map(|(i, item)| self.present(item, Key::from(i)))
            .collect())
    }

    fn dictionary(&self) -> Result<HashMap<String, Self>> {
        let tree = self.resolve()?;
        let entries = tree
            .entries()
            .ok_or_else(|| self.mismatch("object", tree.kind()))?;

        Ok(entries
            .into_iter()
            .map(|(name, value)| (name.to_string(), self.present(value, Key::from(name))))
            .collect())
    }
}

impl Tree for serde_json::Value {
    fn kind(&self) -> Kind {
        match self {
            serde_json::Value::Null => Kind::Null,
            serde_json::Value::Bool(_) => Kind::Boolean,
            serde_json::Value::Number(n) if n.is_i64() => Kind::Integer,
            serde_json::Value::Number(_) => Kind::Float,
            serde_json::Value::String(_) => Kind::String,
            serde_json::Value::Array(_) => Kind::Array,
            serde_json::Value::Object(_) => Kind::Object,
        }
    }

    /// Integers that fit `i64` are integers; every other number, including
    /// `u64` values above `i64::MAX`, is exposed as a float.
    fn primitive(&self) -> Option<Primitive<'_>> {
        match self {
            serde_json::Value::Null => Some(Primitive::Null),
            serde_json::Value::Bool(b) => Some(Primitive::Boolean(*b)),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Some(Primitive::Integer(i)),
                None => n.as_f64().map(Primitive::Float),
            },
            serde_json::Value::String(s) => Some(Primitive::String(s)),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    fn field(&self, name: &str) -> Option<&Self> {
        self.as_object().and_then(|map| map.get(name))
    }

    fn elements(&self) -> Option<&[Self]> {
        self.as_array().map(Vec::as_slice)
    }

    fn entries(&self) -> Option<Vec<(&str, &Self)>> {
        self.as_object()
            .map(|map| map.iter().map(|(k, v)| (k.as_str(), v)).collect())
    }
}
