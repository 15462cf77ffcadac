// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Declarative shortcuts.

/// Builds a [`Collection`] out of a table of step definitions.
///
/// Every row is a [`Collection`] registration method (`given`, `when`,
/// `then`, or their `_regex` variants), a pattern and a handler. Evaluates to
/// a `Result<Collection<World>, RegistrationError>`.
///
/// ```rust
/// # use greencoffee::{steps, step::RegistrationError};
/// #[derive(Default)]
/// struct LoginWorld {
///     username: String,
///     contacts: usize,
/// }
///
/// # fn main() -> Result<(), RegistrationError> {
/// let steps = steps!(LoginWorld {
///     given "the login screen is shown" => |_: &mut LoginWorld| {};
///     when_regex "I type '(.*)' into the username field" =>
///         |w: &mut LoginWorld, name: String| w.username = name;
///     then "I see {int} contacts" =>
///         |w: &mut LoginWorld, n: usize| assert_eq!(w.contacts, n);
/// })?;
/// # assert_eq!(steps.len(), 3);
/// # Ok(())
/// # }
/// ```
///
/// [`Collection`]: crate::step::Collection
#[macro_export]
macro_rules! steps {
    ($world:ty { $($method:ident $pattern:literal => $handler:expr;)* }) => {
        (|| -> ::core::result::Result<
            $crate::step::Collection<$world>,
            $crate::step::RegistrationError,
        > {
            ::core::result::Result::Ok(
                $crate::step::Collection::<$world>::new()
                    $(.$method($pattern, $handler)?)*
            )
        })()
    };
}
