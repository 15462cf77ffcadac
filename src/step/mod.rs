// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step definitions: patterns, typed captures, handlers and the
//! [`Collection`] holding them.
//!
//! - [`pattern`]: step expressions and regexes, matching of step text
//! - [`capture`]: captured values and their conversion into arguments
//! - [`handler`]: typed handler functions
//! - [`collection`]: registration and lookup
//! - [`error`]: registration, matching and invocation errors

pub mod capture;
pub mod collection;
pub mod error;
pub mod handler;
pub mod location;
pub mod pattern;
pub mod regex;

pub use self::{
    capture::{ArgumentError, Capture, StepArg},
    collection::{Collection, Definition, Match, StepKind},
    error::{AmbiguousMatchError, RegistrationError, StepError},
    handler::{Handler, IntoStepResult, WithStep},
    location::Location,
    pattern::{PatternError, PlaceholderKind, StepPattern, Syntax},
    regex::HashableRegex,
};
