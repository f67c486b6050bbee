use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;

use crate::error::PathError;

/// A single navigation step into a node.
///
/// Keys are navigation input only; trees never store them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// Object field access by name
    ///
    /// # Examples
    /// - `$[name]` → `Name("name")`
    /// - `$["first name"]` → `Name("first name")`
    Name(String),

    /// Array element access by index
    ///
    /// # Examples
    /// - `$[items][0]` → `Index(0)`
    /// - `$[items][-1]` → `Index(-1)` (counts from the end)
    Index(i64),
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) if is_bare(name) => write!(f, "[{}]", name),
            Key::Name(name) => {
                write!(f, "[\"{}\"]", name.replace('\\', "\\\\").replace('"', "\\\""))
            }
            Key::Index(index) => write!(f, "[{}]", index),
        }
    }
}

/// Whether a name can be printed without quotes and still parse back as a name.
fn is_bare(name: &str) -> bool {
    !name.is_empty()
        && name.parse::<i64>().is_err()
        && name.trim() == name
        && !name.contains(['[', ']', '"'])
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<&String> for Key {
    fn from(name: &String) -> Self {
        Key::Name(name.clone())
    }
}

impl From<i64> for Key {
    fn from(index: i64) -> Self {
        Key::Index(index)
    }
}

impl From<i32> for Key {
    fn from(index: i32) -> Self {
        Key::Index(index.into())
    }
}

impl From<usize> for Key {
    fn from(index: usize) -> Self {
        Key::Index(i64::try_from(index).unwrap_or(i64::MAX))
    }
}

impl From<&Key> for Key {
    fn from(key: &Key) -> Self {
        key.clone()
    }
}

/// An ordered sequence of keys describing a multi-level descent.
///
/// For the text `$[items][0][price]`, the path holds:
/// - `Key::Name("items")`
/// - `Key::Index(0)`
/// - `Key::Name("price")`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path(Vec<Key>);

impl Path {
    /// The empty path. Navigating it returns the starting node unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the bracket syntax `$[user][0]["display name"]`.
    ///
    /// The leading `$` is optional. An optionally signed integer is an index;
    /// a bare word or a double-quoted string is a name.
    pub fn parse(text: &str) -> Result<Self, PathError> {
        let trimmed = text.trim_start();
        let mut offset = text.len() - trimmed.len();
        let mut rest = trimmed;

        if let Some(after) = rest.strip_prefix('$') {
            offset += 1;
            rest = after;
        }

        let mut keys = Vec::new();
        loop {
            let skipped = rest.len() - rest.trim_start().len();
            offset += skipped;
            rest = &rest[skipped..];
            if rest.is_empty() {
                break;
            }

            let caps = SEGMENT
                .captures(rest)
                .ok_or(PathError::UnexpectedInput { offset })?;

            let key = if let Some(quoted) = caps.name("quoted") {
                Key::Name(unescape(quoted.as_str()))
            } else if let Some(index) = caps.name("index") {
                let index = index
                    .as_str()
                    .parse::<i64>()
                    .map_err(|_| PathError::InvalidIndex {
                        offset,
                        text: index.as_str().to_string(),
                    })?;
                Key::Index(index)
            } else {
                let bare = caps.name("bare").map_or("", |m| m.as_str().trim());
                if bare.is_empty() {
                    return Err(PathError::EmptySegment { offset });
                }
                Key::Name(bare.to_string())
            };

            keys.push(key);
            let consumed = caps.get(0).map_or(0, |m| m.end());
            offset += consumed;
            rest = &rest[consumed..];
        }

        Ok(Path(keys))
    }

    /// Append a key to the end of this path.
    pub fn push(&mut self, key: impl Into<Key>) {
        self.0.push(key.into());
    }

    /// Return a new path with `key` appended.
    pub fn join(&self, key: impl Into<Key>) -> Self {
        let mut next = self.clone();
        next.push(key);
        next
    }

    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Key> {
        self.0.iter()
    }
}

static SEGMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\[\s*(?:"(?P<quoted>(?:[^"\\]|\\.)*)"|(?P<index>[+-]?\d+)|(?P<bare>[^\[\]"]*?))\s*\]"#,
    )
    .expect("path segment pattern is valid")
});

fn unescape(quoted: &str) -> String {
    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for key in &self.0 {
            write!(f, "{}", key)?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

impl From<Vec<Key>> for Path {
    fn from(keys: Vec<Key>) -> Self {
        Path(keys)
    }
}

impl From<Key> for Path {
    fn from(key: Key) -> Self {
        Path(vec![key])
    }
}

impl<K: Into<Key>> FromIterator<K> for Path {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Path(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a Key;
    type IntoIter = std::slice::Iter<'a, Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Path {
    type Item = Key;
    type IntoIter = std::vec::IntoIter<Key>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
