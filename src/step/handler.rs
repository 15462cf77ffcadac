// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Typed step handlers.
//!
//! Any `Fn(&mut World, A1, .., An) -> R` with up to 6 [`StepArg`]s is a
//! [`Handler`], where `R` is either `()` or `Result<(), E>` with
//! `E: Into<anyhow::Error>`:
//! ```rust
//! # struct LoginWorld { username: String }
//! fn type_username(world: &mut LoginWorld, name: String) {
//!     world.username = name;
//! }
//!
//! fn wait(_: &mut LoginWorld, seconds: u32) -> anyhow::Result<()> {
//!     anyhow::ensure!(seconds < 60, "too long");
//!     Ok(())
//! }
//! ```
//!
//! Handlers needing the doc string or the data table of the step take the
//! matched [`Step`] right after the world:
//! ```rust
//! # use greencoffee::feature::Step;
//! # struct LoginWorld { username: String }
//! fn fill_in(world: &mut LoginWorld, step: &Step, field: String) {
//!     if let Some(text) = &step.docstring {
//!         world.username = format!("{field}: {text}");
//!     }
//! }
//! ```

use std::{any, marker::PhantomData};

use sealed::sealed;

use crate::feature::Step;

use super::{
    capture::{Capture, StepArg},
    error::StepError,
    pattern::PlaceholderKind,
};

/// Type-erased [`Handler`] stored inside a [`Collection`].
///
/// [`Collection`]: super::Collection
pub type BoxedHandler<World> =
    Box<dyn Fn(&mut World, &Step, Vec<Capture>) -> Result<(), StepError>>;

/// Marker of a [`Handler`] taking the matched [`Step`] along with the
/// captured `Args`.
#[derive(Debug)]
pub struct WithStep<Args>(PhantomData<Args>);

/// Declared type of a [`Handler`] argument.
#[derive(Clone, Copy, Debug)]
pub struct ArgSpec {
    /// Name of the argument type.
    pub ty: &'static str,

    accepts: fn(PlaceholderKind) -> bool,
}

impl ArgSpec {
    /// Describes an argument of type `T`.
    #[must_use]
    pub fn of<T: StepArg>() -> Self {
        Self {
            ty: any::type_name::<T>(),
            accepts: T::accepts,
        }
    }

    /// Indicates whether a capture of the given `kind` fits this argument.
    #[must_use]
    pub fn accepts(&self, kind: PlaceholderKind) -> bool {
        (self.accepts)(kind)
    }
}

/// Function handling a matched step.
///
/// `Args` is a tuple of the handler argument types, only used to tell apart
/// the implementations for different arities.
pub trait Handler<World, Args>: 'static {
    /// Declared argument types, in order.
    fn signature() -> Vec<ArgSpec>;

    /// Erases the handler type.
    fn into_boxed(self) -> BoxedHandler<World>;
}

/// Return type of a [`Handler`].
#[sealed]
pub trait IntoStepResult {
    /// Converts the returned value into a step outcome.
    ///
    /// # Errors
    ///
    /// If the handler returned an error.
    fn into_step_result(self) -> Result<(), StepError>;
}

#[sealed]
impl IntoStepResult for () {
    fn into_step_result(self) -> Result<(), StepError> {
        Ok(())
    }
}

#[sealed]
impl<E: Into<anyhow::Error>> IntoStepResult for Result<(), E> {
    fn into_step_result(self) -> Result<(), StepError> {
        self.map_err(|e| StepError::Failed(e.into()))
    }
}

macro_rules! impl_handler {
    ($($arg:ident $var:ident),*) => {
        impl<World, F, R, $($arg),*> Handler<World, ($($arg,)*)> for F
        where
            World: 'static,
            F: Fn(&mut World, $($arg),*) -> R + 'static,
            R: IntoStepResult,
            $($arg: StepArg,)*
        {
            fn signature() -> Vec<ArgSpec> {
                vec![$(ArgSpec::of::<$arg>()),*]
            }

            #[allow(unused_mut, unused_variables)]
            fn into_boxed(self) -> BoxedHandler<World> {
                Box::new(move |world: &mut World,
                               _: &Step,
                               captures: Vec<Capture>|
                      -> Result<(), StepError> {
                    let mut captures = captures.into_iter();
                    $(
                        let $var = $arg::from_capture(
                            captures.next().unwrap_or_else(|| {
                                unreachable!("arity is checked on registration")
                            }),
                        )?;
                    )*
                    (self)(world, $($var),*).into_step_result()
                })
            }
        }

        impl<World, F, R, $($arg),*> Handler<World, WithStep<($($arg,)*)>>
            for F
        where
            World: 'static,
            F: Fn(&mut World, &Step, $($arg),*) -> R + 'static,
            R: IntoStepResult,
            $($arg: StepArg,)*
        {
            fn signature() -> Vec<ArgSpec> {
                vec![$(ArgSpec::of::<$arg>()),*]
            }

            #[allow(unused_mut, unused_variables)]
            fn into_boxed(self) -> BoxedHandler<World> {
                Box::new(move |world: &mut World,
                               step: &Step,
                               captures: Vec<Capture>|
                      -> Result<(), StepError> {
                    let mut captures = captures.into_iter();
                    $(
                        let $var = $arg::from_capture(
                            captures.next().unwrap_or_else(|| {
                                unreachable!("arity is checked on registration")
                            }),
                        )?;
                    )*
                    (self)(world, step, $($var),*).into_step_result()
                })
            }
        }
    };
}

impl_handler!();
impl_handler!(A1 a1);
impl_handler!(A1 a1, A2 a2);
impl_handler!(A1 a1, A2 a2, A3 a3);
impl_handler!(A1 a1, A2 a2, A3 a3, A4 a4);
impl_handler!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5);
impl_handler!(A1 a1, A2 a2, A3 a3, A4 a4, A5 a5, A6 a6);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::step::StepKind;

    #[derive(Default)]
    struct World {
        calls: Vec<String>,
    }

    fn step(text: &str) -> Step {
        Step {
            keyword: "When".into(),
            kind: StepKind::When,
            text: text.into(),
            line: 4,
            docstring: None,
            table: None,
        }
    }

    fn boxed<Args, H: Handler<World, Args>>(handler: H) -> BoxedHandler<World> {
        handler.into_boxed()
    }

    fn signature<Args, H: Handler<World, Args>>(_: &H) -> Vec<&'static str> {
        H::signature().into_iter().map(|a| a.ty).collect()
    }

    #[test]
    fn reports_declared_signature() {
        let h = |_: &mut World, _: String, _: u32| {};

        assert_eq!(signature(&h), ["alloc::string::String", "u32"]);
    }

    #[test]
    fn converts_captures_in_order() {
        let h = boxed(|w: &mut World, name: String, age: u8| {
            w.calls.push(format!("{name}:{age}"));
        });
        let mut world = World::default();

        h(
            &mut world,
            &step("I type 'bob' aged 42"),
            vec![
                Capture::new(PlaceholderKind::String, "bob"),
                Capture::new(PlaceholderKind::Int, "42"),
            ],
        )
        .unwrap();

        assert_eq!(world.calls, ["bob:42"]);
    }

    #[test]
    fn propagates_handler_errors() {
        let h = boxed(|_: &mut World| -> anyhow::Result<()> {
            anyhow::bail!("login button not found")
        });

        let err = h(&mut World::default(), &step("I log in"), vec![]).unwrap_err();

        assert!(matches!(err, StepError::Failed(_)));
        assert_eq!(err.to_string(), "login button not found");
    }

    #[test]
    fn conversion_failure_skips_the_handler() {
        let h = boxed(|w: &mut World, _: u8| w.calls.push("called".into()));
        let mut world = World::default();

        let err = h(
            &mut world,
            &step("I wait 256 seconds"),
            vec![Capture::new(PlaceholderKind::Int, "256")],
        )
        .unwrap_err();

        assert!(matches!(err, StepError::Argument(_)));
        assert!(world.calls.is_empty());
    }

    #[test]
    fn plain_fns_are_handlers() {
        fn six(
            w: &mut World,
            a: i8,
            b: i16,
            c: i32,
            d: i64,
            e: f32,
            f: String,
        ) -> Result<(), std::io::Error> {
            w.calls.push(format!("{a} {b} {c} {d} {e} {f}"));
            Ok(())
        }
        let int = |v: &str| Capture::new(PlaceholderKind::Int, v);
        let mut world = World::default();

        boxed(six)(
            &mut world,
            &step("1 2 3 4 5.5 six"),
            vec![
                int("1"),
                int("2"),
                int("3"),
                int("4"),
                Capture::new(PlaceholderKind::Float, "5.5"),
                Capture::new(PlaceholderKind::Word, "six"),
            ],
        )
        .unwrap();

        assert_eq!(world.calls, ["1 2 3 4 5.5 six"]);
    }

    #[test]
    fn step_aware_handlers_see_attachments() {
        let h = boxed(|w: &mut World, s: &Step, field: String| {
            let rows = s.table.as_deref().unwrap_or_default();
            for row in rows {
                w.calls.push(format!("{field}={}", row.join(",")));
            }
            if let Some(doc) = &s.docstring {
                w.calls.push(format!("{field}:{doc}"));
            }
        });
        let mut world = World::default();
        let mut attached = step("I fill in 'notes'");
        attached.docstring = Some("call back".into());
        attached.table = Some(vec![vec!["Alice".into(), "555".into()]]);

        h(
            &mut world,
            &attached,
            vec![Capture::new(PlaceholderKind::String, "notes")],
        )
        .unwrap();

        assert_eq!(world.calls, ["notes=Alice,555", "notes:call back"]);
    }

    #[test]
    fn step_argument_is_not_a_capture() {
        let h = |_: &mut World, _: &Step, _: u32| {};

        assert_eq!(signature(&h), ["u32"]);
    }
}
