// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Styling of a console output.

use std::{borrow::Cow, str::FromStr};

use console::Style;

use super::LineKind;

/// Possible policies of a [`console`] output coloring.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Coloring {
    /// Letting [`console::colors_enabled()`] to decide, whether output should
    /// be colored.
    Auto,

    /// Forcing of a colored output.
    Always,

    /// Forcing of a non-colored output.
    Never,
}

impl FromStr for Coloring {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "always" => Ok(Self::Always),
            "never" => Ok(Self::Never),
            _ => Err("possible options: auto, always, never"),
        }
    }
}

/// [`Style`]s for terminal output.
#[derive(Clone, Debug)]
pub struct Styles {
    /// [`Style`] for rendering steps.
    pub ok: Style,

    /// [`Style`] for rendering failures.
    pub err: Style,

    /// [`Style`] for rendering background and scenario headers.
    pub header: Style,

    /// [`Style`] for rendering __bold__.
    pub bold: Style,

    /// [`Style`] for rendering descriptions.
    pub dim: Style,

    /// Indicates whether the terminal was detected.
    pub is_present: bool,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            ok: Style::new().green(),
            err: Style::new().red(),
            header: Style::new().blue(),
            bold: Style::new().bold(),
            dim: Style::new().dim(),
            is_present: console::Term::stdout().is_term()
                && console::colors_enabled(),
        }
    }
}

impl Styles {
    /// Creates new [`Styles`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies the given [`Coloring`] policy.
    pub fn apply_coloring(&mut self, color: Coloring) {
        match color {
            Coloring::Auto => {}
            Coloring::Always => self.is_present = true,
            Coloring::Never => self.is_present = false,
        }
    }

    /// If terminal is present styles `input` according to its [`LineKind`]
    /// or leaves "as is" otherwise.
    #[must_use]
    pub fn line<'a>(
        &self,
        kind: LineKind,
        input: impl Into<Cow<'a, str>>,
    ) -> Cow<'a, str> {
        let style = match kind {
            LineKind::Feature => &self.bold,
            LineKind::Description => &self.dim,
            LineKind::Scenario => &self.header,
            LineKind::Step => &self.ok,
            LineKind::Failure => &self.err,
        };
        if self.is_present {
            style
                .clone()
                .force_styling(true)
                .apply_to(input.into())
                .to_string()
                .into()
        } else {
            input.into()
        }
    }
}
