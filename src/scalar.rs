//! Primitive types a node decodes into directly.
//!
//! Decoding is exact-kind: strings never become numbers, booleans never
//! become strings, and null only decodes into `Option`. Numbers convert
//! only when the target holds the value without rounding or saturating:
//!
//! | wire value | integer types          | `f64`              | `f32`                       | `Decimal`        |
//! |------------|------------------------|--------------------|-----------------------------|------------------|
//! | integer    | if it fits             | if exact (2^53)    | if exact (2^24)             | exact            |
//! | float      | type mismatch, even `3.0` | accepted        | if finite after narrowing   | if within range  |
//!
//! A number of the right kind that the target cannot hold is a range
//! error, never a substitute value.

use rust_decimal::Decimal;

use crate::{error::NodeError, key::Path, kind::Primitive};

/// Why a primitive could not be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    /// The primitive has the wrong kind for the target type.
    WrongKind,
    /// The primitive is a number the target type cannot hold exactly.
    OutOfRange,
}

impl DecodeError {
    pub(crate) fn into_node_error<T: Scalar>(self, path: &Path, primitive: Primitive<'_>) -> NodeError {
        match self {
            DecodeError::WrongKind => NodeError::TypeMismatch {
                path: path.clone(),
                expected: T::NAME,
                found: primitive.kind(),
            },
            DecodeError::OutOfRange => NodeError::NumberOutOfRange {
                path: path.clone(),
                value: primitive.to_string(),
                target: T::NAME,
            },
        }
    }
}

/// A type a leaf node can decode into.
pub trait Scalar: Sized {
    /// Name used in type mismatch errors.
    const NAME: &'static str;

    fn decode(primitive: Primitive<'_>) -> Result<Self, DecodeError>;
}

impl Scalar for bool {
    const NAME: &'static str = "boolean";

    fn decode(primitive: Primitive<'_>) -> Result<Self, DecodeError> {
        match primitive {
            Primitive::Boolean(b) => Ok(b),
            _ => Err(DecodeError::WrongKind),
        }
    }
}

impl Scalar for String {
    const NAME: &'static str = "string";

    fn decode(primitive: Primitive<'_>) -> Result<Self, DecodeError> {
        match primitive {
            Primitive::String(s) => Ok(s.to_string()),
            _ => Err(DecodeError::WrongKind),
        }
    }
}

macro_rules! integer_scalar {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Scalar for $ty {
                const NAME: &'static str = stringify!($ty);

                fn decode(primitive: Primitive<'_>) -> Result<Self, DecodeError> {
                    match primitive {
                        Primitive::Integer(n) => {
                            <$ty>::try_from(n).map_err(|_| DecodeError::OutOfRange)
                        }
                        _ => Err(DecodeError::WrongKind),
                    }
                }
            }
        )+
    };
}

integer_scalar!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

/// Whether `n` survives the trip through a float unchanged.
fn exact<F: Into<f64>>(n: i64, float: F) -> bool {
    let float: f64 = float.into();
    float as i128 == i128::from(n)
}

impl Scalar for f64 {
    const NAME: &'static str = "f64";

    fn decode(primitive: Primitive<'_>) -> Result<Self, DecodeError> {
        match primitive {
            Primitive::Float(n) => Ok(n),
            Primitive::Integer(n) if exact(n, n as f64) => Ok(n as f64),
            Primitive::Integer(_) => Err(DecodeError::OutOfRange),
            _ => Err(DecodeError::WrongKind),
        }
    }
}

impl Scalar for f32 {
    const NAME: &'static str = "f32";

    fn decode(primitive: Primitive<'_>) -> Result<Self, DecodeError> {
        match primitive {
            Primitive::Float(n) => {
                let narrowed = n as f32;
                if n.is_finite() && !narrowed.is_finite() {
                    return Err(DecodeError::OutOfRange);
                }
                Ok(narrowed)
            }
            Primitive::Integer(n) if exact(n, n as f32) => Ok(n as f32),
            Primitive::Integer(_) => Err(DecodeError::OutOfRange),
            _ => Err(DecodeError::WrongKind),
        }
    }
}

impl Scalar for Decimal {
    const NAME: &'static str = "decimal";

    fn decode(primitive: Primitive<'_>) -> Result<Self, DecodeError> {
        match primitive {
            Primitive::Integer(n) => Ok(Decimal::from(n)),
            Primitive::Float(n) if !n.is_finite() => Err(DecodeError::WrongKind),
            Primitive::Float(n) => Decimal::from_f64_retain(n).ok_or(DecodeError::OutOfRange),
            _ => Err(DecodeError::WrongKind),
        }
    }
}

/// Null decodes to `None`; anything else decodes as `T`.
impl<T: Scalar> Scalar for Option<T> {
    const NAME: &'static str = T::NAME;

    fn decode(primitive: Primitive<'_>) -> Result<Self, DecodeError> {
        match primitive {
            Primitive::Null => Ok(None),
            other => T::decode(other).map(Some),
        }
    }
}
