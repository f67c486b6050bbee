//! The node contract.
//!
//! [`Node`] has a handful of primitive operations that a provider
//! implements; everything else (path navigation, optional reads, typed
//! scalars, collection mapping and transform application) is a provided
//! method written in terms of those primitives.
//!
//! Navigation is total: [`Node::child`] always returns a node, and a step
//! that cannot be resolved produces an absent node. Only the terminal call
//! decides whether absence is an error, so the same path expression serves
//! required and optional reads alike:
//!
//! ```
//! use keypath::{Node, NodeError, Tree};
//! use serde_json::json;
//!
//! let doc = json!({"user": {"name": "Ada"}});
//! let email = doc.root().at(["user", "email"]);
//!
//! assert!(email.optional().is_none());
//! assert!(matches!(
//!     email.required().value::<String>(),
//!     Err(NodeError::KeyNotFound { .. })
//! ));
//! ```

use std::collections::HashMap;

use crate::{
    error::{NodeError, Result},
    key::{Key, Path},
    kind::{Kind, Primitive},
    scalar::Scalar,
    transform::Transform,
};

/// One position in a dynamically shaped tree.
pub trait Node: Clone {
    /// Step into the child addressed by `key`. Never fails; a missing child
    /// yields an absent node.
    fn child(&self, key: &Key) -> Self;

    /// Whether every navigation step leading here resolved.
    fn is_present(&self) -> bool;

    /// The kind of value at this position, [`Kind::Absent`] if none.
    fn kind(&self) -> Kind;

    /// The keys walked from the root to reach this node.
    fn path(&self) -> &Path;

    /// The leaf value, `None` for arrays and objects. Fails on absent nodes.
    fn primitive(&self) -> Result<Option<Primitive<'_>>>;

    /// The elements of an array, in order.
    fn array(&self) -> Result<Vec<Self>>;

    /// The fields of an object.
    fn dictionary(&self) -> Result<HashMap<String, Self>>;

    /// Step into a single child.
    fn get(&self, key: impl Into<Key>) -> Self {
        self.child(&key.into())
    }

    /// Walk a sequence of keys left to right. An empty sequence returns
    /// this node unchanged.
    fn at<I>(&self, path: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Key>,
    {
        path.into_iter()
            .fold(self.clone(), |node, key| node.child(&key.into()))
    }

    /// This node if it is present. Never fails.
    ///
    /// An index step resolves when it addresses an existing element,
    /// counting from the end when negative: on a three-element array `-1`
    /// through `-3` are present and `-4` is absent.
    fn optional(&self) -> Option<Self> {
        self.is_present().then(|| self.clone())
    }

    /// Identity view that marks a read as required at the call site.
    fn required(&self) -> &Self {
        self
    }

    /// Decode the leaf into `T`.
    fn value<T: Scalar>(&self) -> Result<T> {
        let primitive = self.primitive()?.ok_or_else(|| NodeError::TypeMismatch {
            path: self.path().clone(),
            expected: T::NAME,
            found: self.kind(),
        })?;

        T::decode(primitive).map_err(|err| err.into_node_error::<T>(self.path(), primitive))
    }

    /// Decode the leaf into `T`, or `None` when the node is absent.
    /// Present nodes of the wrong kind still fail.
    fn optional_value<T: Scalar>(&self) -> Result<Option<T>> {
        self.optional().map(|node| node.value()).transpose()
    }

    /// Run a transform on this node.
    fn apply<X: Transform>(&self, transform: &X) -> Result<X::Output> {
        transform.apply(self)
    }

    /// Decode every element of an array, stopping at the first failure.
    fn array_of<T: Scalar>(&self) -> Result<Vec<T>> {
        self.array()?.iter().map(|item| item.value()).collect()
    }

    /// Transform every element of an array, stopping at the first failure.
    fn array_with<X: Transform>(&self, transform: &X) -> Result<Vec<X::Output>> {
        self.array()?
            .iter()
            .map(|item| transform.apply(item))
            .collect()
    }

    /// Decode every field of an object, stopping at the first failure.
    ///
    /// Fields are visited in key order so the reported failure does not
    /// depend on the backing map's iteration order.
    fn dictionary_of<T: Scalar>(&self) -> Result<HashMap<String, T>> {
        sorted_entries(self.dictionary()?)
            .map(|(name, node)| node.value().map(|value| (name, value)))
            .collect()
    }

    /// Transform every field of an object, stopping at the first failure.
    fn dictionary_with<X: Transform>(
        &self,
        transform: &X,
    ) -> Result<HashMap<String, X::Output>> {
        sorted_entries(self.dictionary()?)
            .map(|(name, node)| transform.apply(&node).map(|value| (name, value)))
            .collect()
    }
}

fn sorted_entries<N>(map: HashMap<String, N>) -> impl Iterator<Item = (String, N)> {
    let mut entries: Vec<_> = map.into_iter().collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    entries.into_iter()
}

/// Apply `transform` to `node`.
///
/// Transforms compose only through this entry point; chaining two
/// transforms is the caller's job.
pub fn apply<X: Transform, N: Node>(transform: &X, node: &N) -> Result<X::Output> {
    transform.apply(node)
}
