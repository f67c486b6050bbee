use std::collections::HashMap;

use crate::{
    kind::{Kind, Primitive},
    tree::Tree,
};

/// A JSON-like value that can be built by hand and navigated as a tree.
///
/// This type represents all JSON types with a distinction between integers
/// and floats (unlike standard JSON which only has "number"). Object keys
/// are unique; inserting a key twice keeps the last value.
///
/// # Examples
///
/// ```
/// use keypath::{Node, Tree, Value};
/// use std::collections::HashMap;
///
/// let mut user = HashMap::new();
/// user.insert("name".to_string(), Value::from("Ada"));
/// user.insert("tags".to_string(), Value::Array(vec![Value::from(1), Value::from(2)]));
/// let root = Value::Object(user);
///
/// let name: String = root.root().get("name").value().unwrap();
/// assert_eq!(name, "Ada");
/// assert_eq!(root.root().get("tags").array_of::<i64>().unwrap(), vec![1, 2]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// JSON null
    Null,

    /// JSON boolean (true/false)
    Boolean(bool),

    /// Floating-point number
    Float(f64),

    /// Integer number (preserved separately from floats)
    Integer(i64),

    /// UTF-8 string
    String(String),

    /// Array of values (homogeneous or heterogeneous)
    Array(Vec<Value>),

    /// Object with string keys and value values
    Object(HashMap<String, Value>),
}

impl Value {
    pub fn kind(&self) -> Kind {
        match self {
            Value::Null => Kind::Null,
            Value::Boolean(_) => Kind::Boolean,
            Value::Float(_) => Kind::Float,
            Value::Integer(_) => Kind::Integer,
            Value::String(_) => Kind::String,
            Value::Array(_) => Kind::Array,
            Value::Object(_) => Kind::Object,
        }
    }

    /// Build an object from key/value pairs. Later duplicates win.
    pub fn object<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        Value::Object(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    /// Build an array from anything convertible into values.
    pub fn array<V, I>(items: I) -> Self
    where
        V: Into<Value>,
        I: IntoIterator<Item = V>,
    {
        Value::Array(items.into_iter().map(Into::into).collect())
    }
}

impl Tree for Value {
    fn kind(&self) -> Kind {
        Value::kind(self)
    }

    fn primitive(&self) -> Option<Primitive<'_>> {
        match self {
            Value::Null => Some(Primitive::Null),
            Value::Boolean(b) => Some(Primitive::Boolean(*b)),
            Value::Float(n) => Some(Primitive::Float(*n)),
            Value::Integer(n) => Some(Primitive::Integer(*n)),
            Value::String(s) => Some(Primitive::String(s)),
            Value::Array(_) | Value::Object(_) => None,
        }
    }

    fn field(&self, name: &str) -> Option<&Self> {
        match self {
            Value::Object(map) => map.get(name),
            _ => None,
        }
    }

    fn elements(&self) -> Option<&[Self]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    fn entries(&self) -> Option<Vec<(&str, &Self)>> {
        match self {
            Value::Object(map) => Some(map.iter().map(|(k, v)| (k.as_str(), v)).collect()),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Boolean(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Integer(i),
                None => n.as_f64().map_or(Value::Null, Value::Float),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(arr) => {
                Value::Array(arr.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(obj) => {
                Value::Object(obj.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Integer(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::array(items)
    }
}
