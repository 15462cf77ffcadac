// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Errors of loading, parsing and running features.
//!
//! Building a [`Collection`] fails with a separate [`RegistrationError`], as
//! it happens before any feature is touched.
//!
//! [`Collection`]: crate::step::Collection
//! [`RegistrationError`]: crate::step::RegistrationError

use std::{io, path::PathBuf};

use derive_more::with_trait::Display;

use crate::{
    feature::ExpandExamplesError,
    step::{AmbiguousMatchError, StepError},
    ui::UiError,
};

/// Alias of a [`Result`](std::result::Result) with [`Error`].
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Failure aborting a feature run.
///
/// Nothing is retried: the first failure stops the run, leaving the world and
/// the application in whatever state the failing step left them.
#[derive(Debug, Display, derive_more::with_trait::Error)]
pub enum Error {
    /// Feature source couldn't be read.
    #[display(
        "Failed to read feature{}: {source}",
        path.as_deref().map(|p| format!(" `{}`", p.display())).unwrap_or_default(),
    )]
    Io {
        /// Path being read, if any.
        path: Option<PathBuf>,
        /// Underlying error.
        source: io::Error,
    },

    /// Feature text isn't valid Gherkin.
    #[display(
        "Failed to parse feature{}: {source}",
        path.as_deref().map(|p| format!(" `{}`", p.display())).unwrap_or_default(),
    )]
    Parse {
        /// Path of the feature, if known.
        path: Option<PathBuf>,
        /// Parser diagnostic.
        source: gherkin::ParseError,
    },

    /// Scenario Outline uses a template its Examples don't define.
    #[display("{_0}")]
    Expand(ExpandExamplesError),

    /// No step definition matches the step text.
    #[display("Step definition not found for: '{keyword}: {text}' (line {line})")]
    Unmatched {
        /// Step keyword.
        keyword: String,
        /// Step text.
        text: String,
        /// Step line.
        line: usize,
    },

    /// More than one step definition matches the step text.
    #[display("Ambiguous step '{keyword}: {text}' (line {line}): {source}")]
    Ambiguous {
        /// Step keyword.
        keyword: String,
        /// Step text.
        text: String,
        /// Step line.
        line: usize,
        /// Matching definitions.
        source: AmbiguousMatchError,
    },

    /// Step handler failed, panicked, or couldn't receive its arguments.
    #[display("Step '{keyword}: {text}' (line {line}) failed: {source}")]
    StepFailed {
        /// Step keyword.
        keyword: String,
        /// Step text.
        text: String,
        /// Step line.
        line: usize,
        /// Handler failure.
        source: StepError,
    },

    /// Application couldn't be restarted after a scenario.
    #[display("Failed to restart the application after '{after}': {source}")]
    Restart {
        /// Name of the scenario that ran last.
        after: String,
        /// Controller failure.
        source: UiError,
    },

    /// Progress output couldn't be written.
    #[display("Failed to write output: {_0}")]
    Output(io::Error),
}

impl From<ExpandExamplesError> for Error {
    fn from(err: ExpandExamplesError) -> Self {
        Self::Expand(err)
    }
}

impl Error {
    /// Line of the step this [`Error`] happened at, if any.
    #[must_use]
    pub const fn line(&self) -> Option<usize> {
        match self {
            Self::Unmatched { line, .. }
            | Self::Ambiguous { line, .. }
            | Self::StepFailed { line, .. } => Some(*line),
            Self::Expand(e) => Some(e.line),
            Self::Io { .. }
            | Self::Parse { .. }
            | Self::Restart { .. }
            | Self::Output(_) => None,
        }
    }
}
