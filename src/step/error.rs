// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of building a step [`Collection`] and of matching steps against it.
//!
//! [`Collection`]: super::Collection

use std::{any::Any, fmt};

use derive_more::with_trait::{Display, Error};

use super::{capture::ArgumentError, location::Location, pattern::PatternError};

/// Error of a step text matching multiple [`StepPattern`]s of a
/// [`Collection`].
///
/// [`Collection`]: super::Collection
/// [`StepPattern`]: super::StepPattern
#[derive(Clone, Debug, Error)]
pub struct AmbiguousMatchError {
    /// Sources of the matching patterns with their registration
    /// [`Location`]s, sorted.
    #[error(not(source))]
    pub possible_matches: Vec<(String, Location)>,
}

impl fmt::Display for AmbiguousMatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Possible matches:")?;
        for (pattern, loc) in &self.possible_matches {
            write!(f, "\n{pattern} --> {loc}")?;
        }
        Ok(())
    }
}

/// Error of registering a step handler in a [`Collection`].
///
/// [`Collection`]: super::Collection
#[derive(Debug, Display, Error)]
pub enum RegistrationError {
    /// Pattern failed to compile.
    #[display("invalid step pattern `{pattern}`: {source}")]
    Pattern {
        /// Declared pattern.
        pattern: String,
        /// Compilation error.
        source: PatternError,
    },

    /// Handler takes a different number of arguments than the pattern
    /// captures.
    #[display(
        "step pattern `{pattern}` captures {captures} value(s), \
         but its handler takes {arguments} argument(s)"
    )]
    Arity {
        /// Declared pattern.
        pattern: String,
        /// Number of captures of the pattern.
        captures: usize,
        /// Number of handler arguments.
        arguments: usize,
    },

    /// Handler argument type can't be converted from the placeholder in the
    /// same position.
    #[display(
        "argument {position} of the handler for `{pattern}` is `{ty}`, \
         which can't hold a {placeholder} capture"
    )]
    Signature {
        /// Declared pattern.
        pattern: String,
        /// Zero-based argument position.
        position: usize,
        /// Placeholder in that position.
        placeholder: String,
        /// Name of the argument type.
        ty: &'static str,
    },

    /// Same pattern is already registered.
    #[display("step pattern `{pattern}` is already registered at {existing}")]
    Duplicate {
        /// Declared pattern.
        pattern: String,
        /// Location of the existing registration.
        existing: Location,
    },
}

/// Failure of a step handler invocation.
#[derive(Debug, Display, Error)]
pub enum StepError {
    /// Captured value couldn't be converted into a handler argument.
    #[display("{_0}")]
    Argument(ArgumentError),

    /// Handler returned an error.
    #[display("{_0:#}")]
    Failed(#[error(not(source))] anyhow::Error),

    /// Handler panicked.
    #[display("step panicked: {message}")]
    Panicked {
        /// Message of the panic payload.
        #[error(not(source))]
        message: String,
    },
}

impl From<ArgumentError> for StepError {
    fn from(err: ArgumentError) -> Self {
        Self::Argument(err)
    }
}

impl StepError {
    /// Creates a [`StepError::Panicked`] out of a [`catch_unwind()`] payload.
    ///
    /// [`catch_unwind()`]: std::panic::catch_unwind
    #[must_use]
    pub fn from_panic(payload: &(dyn Any + Send)) -> Self {
        let message = payload
            .downcast_ref::<String>()
            .cloned()
            .or_else(|| payload.downcast_ref::<&str>().map(|s| (*s).to_owned()))
            .unwrap_or_else(|| "opaque panic payload".to_owned());
        Self::Panicked { message }
    }
}
