use std::fmt;

/// The shape of the value a node points at.
///
/// `Absent` is reported by nodes produced when navigation could not find
/// a child; every other kind describes a real value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Boolean,
    Integer,
    Float,
    String,
    Array,
    Object,
    Absent,
}

impl Kind {
    pub fn as_str(self) -> &'static str {
        match self {
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Integer => "integer",
            Kind::Float => "float",
            Kind::String => "string",
            Kind::Array => "array",
            Kind::Object => "object",
            Kind::Absent => "absent",
        }
    }

    /// Whether values of this kind decode through [`crate::Scalar`].
    pub fn is_scalar(self) -> bool {
        matches!(
            self,
            Kind::Null | Kind::Boolean | Kind::Integer | Kind::Float | Kind::String
        )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A borrowed view of a leaf value.
///
/// This is the wire form scalars decode from. Integers and floats stay
/// distinct so decoding never has to guess which one a number was.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive<'a> {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(&'a str),
}

impl Primitive<'_> {
    pub fn kind(&self) -> Kind {
        match self {
            Primitive::Null => Kind::Null,
            Primitive::Boolean(_) => Kind::Boolean,
            Primitive::Integer(_) => Kind::Integer,
            Primitive::Float(_) => Kind::Float,
            Primitive::String(_) => Kind::String,
        }
    }
}

impl fmt::Display for Primitive<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Primitive::Null => f.write_str("null"),
            Primitive::Boolean(b) => write!(f, "{}", b),
            Primitive::Integer(n) => write!(f, "{}", n),
            Primitive::Float(n) => write!(f, "{}", n),
            Primitive::String(s) => write!(f, "{:?}", s),
        }
    }
}
