// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Tools for outputting the progress of a run.
//!
//! A [`Runner`] reports every feature, background, scenario and step to its
//! [`Writer`] right before running it:
//! ```text
//! Feature: Login
//! 	Users log in to see their contacts.
//! 	Background:
//! 		Given a clean database
//! 	Scenario: empty list
//! 		When I log in as 'nobody'
//! ```
//!
//! [`Runner`]: crate::Runner

pub mod collect;
pub mod discard;
pub mod out;
pub mod term;
pub mod trace;

use std::io;

use derive_more::with_trait::Display;

use crate::{
    config::Config,
    error::Error,
    feature::{FeatureDocument, ScenarioDefinition, Step},
};

#[doc(inline)]
pub use self::{
    collect::Collect,
    discard::Discard,
    out::{Coloring, Styles},
    term::Term,
    trace::Tracing,
};

/// Kind of an output line, driving its styling.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum LineKind {
    /// `Feature:` header.
    Feature,

    /// Description line of a feature, background or scenario.
    Description,

    /// `Background:` or `Scenario:` header.
    Scenario,

    /// Step about to run.
    Step,

    /// Failure aborting the run.
    Failure,
}

/// Sink of progress lines.
///
/// Only [`Writer::write_line()`] is required, the rest lays out the lines.
pub trait Writer {
    /// Writes a single `line` without the trailing newline.
    ///
    /// # Errors
    ///
    /// If the underlying output fails.
    fn write_line(&mut self, kind: LineKind, line: &str) -> io::Result<()>;

    /// Applies the [`Config`] of the [`Runner`] owning this [`Writer`].
    ///
    /// [`Runner`]: crate::Runner
    fn configure(&mut self, _: &Config) {}

    /// Outputs the `Feature:` header followed by its description.
    ///
    /// # Errors
    ///
    /// If the underlying output fails.
    fn feature(&mut self, feature: &FeatureDocument) -> io::Result<()> {
        self.write_line(
            LineKind::Feature,
            &format!("{}: {}", feature.keyword, feature.name),
        )?;
        self.description(feature.description.as_deref(), 1)
    }

    /// Outputs the header of a background or scenario followed by its
    /// description.
    ///
    /// # Errors
    ///
    /// If the underlying output fails.
    fn definition(&mut self, definition: &ScenarioDefinition) -> io::Result<()> {
        let header = if definition.name.is_empty() {
            format!("\t{}:", definition.keyword)
        } else {
            format!("\t{}: {}", definition.keyword, definition.name)
        };
        self.write_line(LineKind::Scenario, &header)?;
        self.description(definition.description.as_deref(), 2)
    }

    /// Outputs a step about to run.
    ///
    /// # Errors
    ///
    /// If the underlying output fails.
    fn step(&mut self, step: &Step) -> io::Result<()> {
        self.write_line(
            LineKind::Step,
            &format!("\t\t{} {}", step.keyword, step.text),
        )
    }

    /// Outputs the `error` aborting the run.
    ///
    /// # Errors
    ///
    /// If the underlying output fails.
    fn failed(&mut self, error: &Error) -> io::Result<()> {
        self.write_line(LineKind::Failure, &format!("\t\t{error}"))
    }

    /// Outputs `description` lines, trimmed and indented by the given number
    /// of tabs. Blank lines inside the description are kept.
    ///
    /// # Errors
    ///
    /// If the underlying output fails.
    fn description(
        &mut self,
        description: Option<&str>,
        indent: usize,
    ) -> io::Result<()> {
        let indent = "\t".repeat(indent);
        for line in description.map(str::trim).into_iter().flat_map(str::lines) {
            let line = line.trim();
            self.write_line(LineKind::Description, &format!("{indent}{line}"))?;
        }
        Ok(())
    }
}

impl<W: Writer + ?Sized> Writer for &mut W {
    fn write_line(&mut self, kind: LineKind, line: &str) -> io::Result<()> {
        (**self).write_line(kind, line)
    }

    fn configure(&mut self, config: &Config) {
        (**self).configure(config);
    }

    fn feature(&mut self, feature: &FeatureDocument) -> io::Result<()> {
        (**self).feature(feature)
    }

    fn definition(&mut self, definition: &ScenarioDefinition) -> io::Result<()> {
        (**self).definition(definition)
    }

    fn step(&mut self, step: &Step) -> io::Result<()> {
        (**self).step(step)
    }

    fn failed(&mut self, error: &Error) -> io::Result<()> {
        (**self).failed(error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lays_out_feature_and_definitions() {
        let doc = FeatureDocument::parse(
            "\
Feature: Login
  Users log in
  to see their contacts.

  Background:
    Given a clean database

  Scenario: empty list
    The user has no contacts.

    When I log in as 'nobody'
",
        )
        .unwrap();
        let mut out = Collect::new();

        out.feature(&doc).unwrap();
        for def in &doc.definitions {
            out.definition(def).unwrap();
            for step in &def.steps {
                out.step(step).unwrap();
            }
        }

        assert_eq!(
            out.lines(),
            [
                "Feature: Login",
                "\tUsers log in",
                "\tto see their contacts.",
                "\tBackground:",
                "\t\tGiven a clean database",
                "\tScenario: empty list",
                "\t\tThe user has no contacts.",
                "\t\tWhen I log in as 'nobody'",
            ],
        );
    }

    #[test]
    fn keeps_blank_lines_inside_descriptions() {
        let mut out = Collect::new();

        out.description(Some("\n  First paragraph.\n\n  Second one.\n\n"), 1)
            .unwrap();

        assert_eq!(out.lines(), ["\tFirst paragraph.", "\t", "\tSecond one."]);
        assert!(out.kinds().iter().all(|k| *k == LineKind::Description));
    }

    #[test]
    fn failures_are_indented_under_the_step() {
        let mut out = Collect::new();

        (&mut out)
            .failed(&Error::Unmatched {
                keyword: "When".into(),
                text: "I fly".into(),
                line: 3,
            })
            .unwrap();

        assert_eq!(
            out.lines(),
            ["\t\tStep definition not found for: 'When: I fly' (line 3)"],
        );
        assert_eq!(out.kinds(), [LineKind::Failure]);
    }
}
