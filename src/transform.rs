use crate::{error::Result, node::Node};

/// A reusable conversion from a node to a richer value.
///
/// Transforms are pure: any configuration is fixed when the transform is
/// built, and applying one never changes it. They work on any [`Node`]
/// implementation, so the same transform serves every tree provider.
///
/// # Examples
///
/// ```
/// use keypath::{Node, NodeError, Result, Transform, Tree};
/// use serde_json::json;
///
/// /// Reads a `"#rrggbb"` string into its three channels.
/// struct Rgb;
///
/// impl Transform for Rgb {
///     type Output = (u8, u8, u8);
///
///     fn apply<N: Node>(&self, node: &N) -> Result<Self::Output> {
///         let text: String = node.value()?;
///         let bad = || NodeError::transform_failed(node.path(), "expected #rrggbb");
///         let hex = text.strip_prefix('#').filter(|h| h.len() == 6).ok_or_else(bad)?;
///         let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
///         Ok((channel(0)?, channel(2)?, channel(4)?))
///     }
/// }
///
/// let doc = json!({"accent": "#ff8000"});
/// assert_eq!(doc.root().get("accent").apply(&Rgb).unwrap(), (255, 128, 0));
/// ```
pub trait Transform {
    type Output;

    fn apply<N: Node>(&self, node: &N) -> Result<Self::Output>;
}

impl<X: Transform> Transform for &X {
    type Output = X::Output;

    fn apply<N: Node>(&self, node: &N) -> Result<Self::Output> {
        (**self).apply(node)
    }
}
