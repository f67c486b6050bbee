use std::{fmt, marker::PhantomData};

use crate::{error::Result, node::Node, scalar::Scalar, transform::Transform};

/// A type with a set of known cases, each identified by a raw scalar.
pub trait RawValue: Sized {
    type Raw: Scalar;

    /// The case for `raw`, or `None` if no case matches.
    fn from_raw(raw: Self::Raw) -> Option<Self>;
}

/// Implement [`RawValue`] for a fieldless enum.
///
/// ```
/// use keypath::{raw_value_enum, RawValue};
///
/// #[derive(Debug, PartialEq)]
/// enum Status {
///     Active,
///     Banned,
/// }
///
/// raw_value_enum!(Status: i64 {
///     Active = 1,
///     Banned = 2,
/// });
///
/// assert_eq!(Status::from_raw(2), Some(Status::Banned));
/// assert_eq!(Status::from_raw(9), None);
/// ```
#[macro_export]
macro_rules! raw_value_enum {
    ($ty:ty : $raw:ty { $($variant:ident = $value:expr),+ $(,)? }) => {
        impl $crate::RawValue for $ty {
            type Raw = $raw;

            fn from_raw(raw: $raw) -> ::std::option::Option<Self> {
                $(
                    if raw == $value {
                        return ::std::option::Option::Some(<$ty>::$variant);
                    }
                )+
                ::std::option::Option::None
            }
        }
    };
}

/// Transforms a node into one of `T`'s cases, or `None` when the raw value
/// matches no case.
///
/// An unknown raw value is a normal outcome. A missing node or a node of the
/// wrong kind is still an error.
pub struct RawValueTransform<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T> RawValueTransform<T> {
    pub fn new() -> Self {
        RawValueTransform {
            _marker: PhantomData,
        }
    }
}

impl<T> Default for RawValueTransform<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for RawValueTransform<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for RawValueTransform<T> {}

impl<T> fmt::Debug for RawValueTransform<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawValueTransform")
            .field("target", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: RawValue> Transform for RawValueTransform<T> {
    type Output = Option<T>;

    fn apply<N: Node>(&self, node: &N) -> Result<Option<T>> {
        let raw: T::Raw = node.value()?;
        let case = T::from_raw(raw);
        if case.is_none() {
            tracing::trace!(path = %node.path(), target = std::any::type_name::<T>(), "raw value matches no case");
        }
        Ok(case)
    }
}
