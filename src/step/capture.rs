// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Typed captures and their conversion into step handler arguments.

use std::{any, fmt, str::FromStr};

use derive_more::with_trait::{Display, Error};

use super::pattern::PlaceholderKind;

/// Value captured from a step text by a [`StepPattern`].
///
/// [`StepPattern`]: super::StepPattern
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Capture {
    /// Kind of the placeholder which captured this value.
    pub kind: PlaceholderKind,

    /// Captured text. Quotes of a `{string}` are already stripped.
    pub value: String,
}

impl Capture {
    /// Creates a new [`Capture`].
    #[must_use]
    pub fn new(kind: PlaceholderKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: value.into(),
        }
    }
}

/// Type usable as an argument of a step handler.
///
/// [`StepArg::accepts()`] is consulted when a handler is registered, so a
/// handler taking a `u32` can't be bound to a `{string}` placeholder.
/// [`StepArg::from_capture()`] converts the captured text when the handler
/// is invoked.
pub trait StepArg: Sized {
    /// Indicates whether a capture of the given `kind` may be converted into
    /// this type.
    fn accepts(kind: PlaceholderKind) -> bool;

    /// Converts the `capture` into this type.
    ///
    /// # Errors
    ///
    /// If the captured text doesn't represent a value of this type.
    fn from_capture(capture: Capture) -> Result<Self, ArgumentError>;
}

/// Error of converting a [`Capture`] into a step handler argument.
#[derive(Clone, Debug, Display, Error)]
#[display("cannot convert {kind} capture `{value}` into `{ty}`: {reason}")]
pub struct ArgumentError {
    /// Kind of the converted [`Capture`].
    pub kind: PlaceholderKind,

    /// Text of the converted [`Capture`].
    pub value: String,

    /// Name of the target type.
    pub ty: &'static str,

    /// Description of the failure.
    pub reason: String,
}

impl ArgumentError {
    /// Creates a new [`ArgumentError`] for converting the `capture` into `T`.
    #[must_use]
    pub fn new<T>(capture: Capture, reason: impl fmt::Display) -> Self {
        Self {
            kind: capture.kind,
            value: capture.value,
            ty: any::type_name::<T>(),
            reason: reason.to_string(),
        }
    }
}

fn parse<T>(capture: Capture) -> Result<T, ArgumentError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    capture
        .value
        .parse()
        .map_err(|e| ArgumentError::new::<T>(capture, e))
}

impl StepArg for String {
    fn accepts(_: PlaceholderKind) -> bool {
        true
    }

    fn from_capture(capture: Capture) -> Result<Self, ArgumentError> {
        Ok(capture.value)
    }
}

impl StepArg for bool {
    fn accepts(kind: PlaceholderKind) -> bool {
        kind == PlaceholderKind::Word || kind.is_untyped()
    }

    fn from_capture(capture: Capture) -> Result<Self, ArgumentError> {
        parse(capture)
    }
}

macro_rules! impl_step_arg {
    ($($ty:ty => $($kind:ident)|+;)*) => {$(
        impl StepArg for $ty {
            fn accepts(kind: PlaceholderKind) -> bool {
                matches!(kind, $(PlaceholderKind::$kind)|+) || kind.is_untyped()
            }

            fn from_capture(capture: Capture) -> Result<Self, ArgumentError> {
                parse(capture)
            }
        }
    )*};
}

impl_step_arg! {
    i8 => Int; i16 => Int; i32 => Int; i64 => Int; i128 => Int; isize => Int;
    u8 => Int; u16 => Int; u32 => Int; u64 => Int; u128 => Int; usize => Int;
    f32 => Float | Int;
    f64 => Float | Int;
}

/// Empty captures (e.g. of a non-participating regex group) become [`None`].
impl<T: StepArg> StepArg for Option<T> {
    fn accepts(kind: PlaceholderKind) -> bool {
        T::accepts(kind)
    }

    fn from_capture(capture: Capture) -> Result<Self, ArgumentError> {
        if capture.value.is_empty() {
            Ok(None)
        } else {
            T::from_capture(capture).map(Some)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cap(kind: PlaceholderKind, value: &str) -> Capture {
        Capture::new(kind, value)
    }

    #[test]
    fn typed_placeholders_restrict_target_types() {
        assert!(u32::accepts(PlaceholderKind::Int));
        assert!(!u32::accepts(PlaceholderKind::String));
        assert!(!u32::accepts(PlaceholderKind::Float));
        assert!(f64::accepts(PlaceholderKind::Int));
        assert!(!bool::accepts(PlaceholderKind::Int));
        assert!(String::accepts(PlaceholderKind::Float));
    }

    #[test]
    fn untyped_captures_are_accepted_by_everything() {
        for kind in [PlaceholderKind::Anonymous, PlaceholderKind::Group] {
            assert!(i64::accepts(kind));
            assert!(f32::accepts(kind));
            assert!(bool::accepts(kind));
            assert!(String::accepts(kind));
        }
    }

    #[test]
    fn converts_values() {
        assert_eq!(i32::from_capture(cap(PlaceholderKind::Int, "-7")).unwrap(), -7);
        assert_eq!(f64::from_capture(cap(PlaceholderKind::Float, "2.5")).unwrap(), 2.5);
        assert!(bool::from_capture(cap(PlaceholderKind::Word, "true")).unwrap());
        assert_eq!(
            String::from_capture(cap(PlaceholderKind::String, "bob")).unwrap(),
            "bob",
        );
    }

    #[test]
    fn reports_overflow() {
        let err = u8::from_capture(cap(PlaceholderKind::Int, "300")).unwrap_err();

        assert_eq!(err.ty, "u8");
        assert_eq!(err.value, "300");
        assert!(err.to_string().starts_with("cannot convert {int} capture `300` into `u8`"));
    }

    #[test]
    fn reports_unparsable_untyped_text() {
        let err = u32::from_capture(cap(PlaceholderKind::Group, "ten")).unwrap_err();

        assert_eq!(err.kind, PlaceholderKind::Group);
        assert!(err.to_string().contains("regex group"));
    }

    #[test]
    fn option_maps_empty_to_none() {
        assert_eq!(
            Option::<u32>::from_capture(cap(PlaceholderKind::Group, "")).unwrap(),
            None,
        );
        assert_eq!(
            Option::<u32>::from_capture(cap(PlaceholderKind::Group, "3")).unwrap(),
            Some(3),
        );
        assert!(!Option::<u32>::accepts(PlaceholderKind::Word));
    }
}
