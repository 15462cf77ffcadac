// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Default [`Writer`] printing to a terminal.

use std::io;

use super::{
    out::{Coloring, Styles},
    LineKind, Writer,
};
use crate::config::Config;

/// [`Writer`] printing styled lines into an [`io::Write`], the
/// [`console::Term`] of stdout by default.
#[derive(Debug)]
pub struct Term<Out: io::Write = console::Term> {
    output: Out,
    styles: Styles,
}

impl Term {
    /// Creates a [`Term`] printing into stdout.
    #[must_use]
    pub fn stdout() -> Self {
        Self::new(console::Term::stdout())
    }
}

impl Default for Term {
    fn default() -> Self {
        Self::stdout()
    }
}

impl<Out: io::Write> Term<Out> {
    /// Creates a [`Term`] printing into the given `output`.
    #[must_use]
    pub fn new(output: Out) -> Self {
        Self {
            output,
            styles: Styles::new(),
        }
    }

    /// Applies the given [`Coloring`] policy.
    #[must_use]
    pub fn with_coloring(mut self, coloring: Coloring) -> Self {
        self.styles.apply_coloring(coloring);
        self
    }

    /// Unwraps the underlying output.
    #[must_use]
    pub fn into_inner(self) -> Out {
        self.output
    }
}

impl<Out: io::Write> Writer for Term<Out> {
    fn write_line(&mut self, kind: LineKind, line: &str) -> io::Result<()> {
        writeln!(self.output, "{}", self.styles.line(kind, line))?;
        self.output.flush()
    }

    fn configure(&mut self, config: &Config) {
        self.styles.apply_coloring(config.coloring);
    }
}
