//! Error types for navigation, extraction and transforms.
//!
//! Every failure is raised at the call that detects it and handed back
//! unchanged through any composing call: collection mapping and transform
//! chains return the first error they see, never a partial result or a
//! default value.

use thiserror::Error;

use crate::{key::Key, key::Path, kind::Kind};

/// Errors produced when extracting from a node or applying a transform.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NodeError {
    /// A named field was missing somewhere along the path, or a name was
    /// used on a node that is not an object.
    #[error("key not found: {key} at {path}")]
    KeyNotFound { path: Path, key: Key },

    /// An index fell outside the list, or an index was used on a node that
    /// is not an array.
    #[error("index out of range: [{index}] at {path}")]
    IndexOutOfRange { path: Path, index: i64 },

    /// The node exists but holds a different kind of value.
    #[error("type mismatch at {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: Path,
        expected: &'static str,
        found: Kind,
    },

    /// A number exists but the requested numeric type cannot hold it
    /// exactly.
    #[error("number out of range at {path}: {value} does not fit {target}")]
    NumberOutOfRange {
        path: Path,
        value: String,
        target: &'static str,
    },

    /// A transform rejected the node.
    #[error("transform failed at {path}: {reason}")]
    TransformFailed { path: Path, reason: String },
}

impl NodeError {
    /// Build a transform failure with a human-readable reason.
    pub fn transform_failed(path: &Path, reason: impl Into<String>) -> Self {
        NodeError::TransformFailed {
            path: path.clone(),
            reason: reason.into(),
        }
    }

    /// The path of the node that failed. For missing keys this is the
    /// parent the lookup was attempted on.
    pub fn path(&self) -> &Path {
        match self {
            NodeError::KeyNotFound { path, .. }
            | NodeError::IndexOutOfRange { path, .. }
            | NodeError::TypeMismatch { path, .. }
            | NodeError::NumberOutOfRange { path, .. }
            | NodeError::TransformFailed { path, .. } => path,
        }
    }

    /// Whether this error means the node was absent rather than malformed.
    pub fn is_missing(&self) -> bool {
        matches!(
            self,
            NodeError::KeyNotFound { .. } | NodeError::IndexOutOfRange { .. }
        )
    }
}

/// Convenience type alias for results carrying a [`NodeError`].
pub type Result<T> = std::result::Result<T, NodeError>;

/// Errors from parsing path text such as `$[user][0][name]`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("unexpected input at offset {offset}: expected `[key]`")]
    UnexpectedInput { offset: usize },

    #[error("empty segment at offset {offset}")]
    EmptySegment { offset: usize },

    #[error("index `{text}` at offset {offset} does not fit a 64-bit integer")]
    InvalidIndex { offset: usize, text: String },
}

/// Errors from compiling a date pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateFormatError {
    #[error("unsupported pattern field `{field}` at offset {offset}")]
    UnsupportedField { field: String, offset: usize },

    #[error("unterminated quote starting at offset {offset}")]
    UnterminatedQuote { offset: usize },

    #[error("fractional seconds at offset {offset} must follow a literal `.`")]
    DetachedFraction { offset: usize },

    /// A week number without the year it counts in, or a week-numbering
    /// year without a week number. Such a pattern could never match.
    #[error("week date at offset {offset} needs both a week number and its year")]
    IncompleteWeekDate { offset: usize },

    #[error("pattern `{pattern}` is too complex to match: {reason}")]
    TooComplex { pattern: String, reason: String },
}
