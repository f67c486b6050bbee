//! Typed, path-based access to JSON-like trees.
//!
//! Navigate a tree with [`Node::get`] and [`Node::at`], then pick the read
//! policy at the leaf: [`Node::value`] for required values,
//! [`Node::optional`] / [`Node::optional_value`] for optional ones,
//! [`Node::array_of`] and [`Node::dictionary_of`] for collections, and
//! [`Node::apply`] for [`Transform`]s such as [`DateTransform`] and
//! [`RawValueTransform`].
//!
//! ```
//! use keypath::{Node, Path, Tree};
//! use serde_json::json;
//!
//! let doc = json!({"orders": [{"id": 7, "total": 12.5}]});
//! let first = doc.root().at(&Path::parse("$[orders][0]").unwrap());
//!
//! assert_eq!(first.get("id").value::<u32>().unwrap(), 7);
//! assert_eq!(first.get("total").value::<f64>().unwrap(), 12.5);
//! assert_eq!(first.get("note").optional_value::<String>().unwrap(), None);
//! ```

#[cfg(feature = "cli")]
pub mod cli;
pub mod date;
pub mod error;
pub mod key;
pub mod kind;
pub mod node;
pub mod raw;
pub mod scalar;
pub mod transform;
pub mod tree;
pub mod value;

pub use date::{Calendar, DateFormat, DateTransform, Locale};
pub use error::{DateFormatError, NodeError, PathError, Result};
pub use key::{Key, Path};
pub use kind::{Kind, Primitive};
pub use node::{Node, apply};
pub use raw::{RawValue, RawValueTransform};
pub use scalar::{DecodeError, Scalar};
pub use transform::Transform;
pub use tree::{Tree, TreeNode};
pub use value::Value;
