// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Runner`] executing features.
//!
//! Everything runs sequentially on the calling thread: for every scenario,
//! the backgrounds in scope run first, then the scenario's own steps, then
//! the application is restarted unless it was the last scenario. The first
//! failure stops the run.

use std::{
    fmt, iter,
    panic::{self, AssertUnwindSafe},
};

use crate::{
    config::Config,
    error::{Error, Result},
    feature::{FeatureDocument, ScenarioDefinition, Step},
    source::FeatureSource,
    step::{Collection, StepError},
    ui::UiController,
    writer::{Term, Writer},
};

/// Counters of a finished run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// Scenarios run.
    pub scenarios: usize,

    /// Scenarios skipped by [`Config::filter_scenarios`].
    pub filtered: usize,

    /// Steps run, background steps included.
    pub steps: usize,

    /// Application restarts.
    pub restarts: usize,
}

/// Executor of features against a [`Collection`] of steps.
pub struct Runner<World, Wr = Term> {
    steps: Collection<World>,
    config: Config,
    writer: Wr,
}

impl<World, Wr: fmt::Debug> fmt::Debug for Runner<World, Wr> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("steps", &self.steps)
            .field("config", &self.config)
            .field("writer", &self.writer)
            .finish()
    }
}

impl<World> Runner<World> {
    /// Creates a [`Runner`] printing its progress into stdout.
    #[must_use]
    pub fn new(steps: Collection<World>) -> Self {
        Self::with_writer(steps, Term::stdout())
    }
}

impl<World, Wr: Writer> Runner<World, Wr> {
    /// Creates a [`Runner`] outputting its progress into the given [`Writer`].
    #[must_use]
    pub fn with_writer(steps: Collection<World>, writer: Wr) -> Self {
        Self {
            steps,
            config: Config::default(),
            writer,
        }
    }

    /// Replaces the [`Config`].
    #[must_use]
    pub fn with_config(mut self, config: Config) -> Self {
        self.writer.configure(&config);
        self.config = config;
        self
    }

    /// [`Collection`] of steps of this [`Runner`].
    #[must_use]
    pub const fn steps(&self) -> &Collection<World> {
        &self.steps
    }

    /// [`Config`] of this [`Runner`].
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// [`Writer`] of this [`Runner`].
    #[must_use]
    pub const fn writer(&self) -> &Wr {
        &self.writer
    }

    /// Unwraps the [`Writer`] of this [`Runner`].
    #[must_use]
    pub fn into_writer(self) -> Wr {
        self.writer
    }

    /// Parses the `feature_text` and runs it.
    ///
    /// # Errors
    ///
    /// On the first failure, see [`Runner::run_document()`].
    pub fn run<C>(
        &mut self,
        feature_text: &str,
        world: &mut World,
        controller: &mut C,
    ) -> Result<Summary>
    where
        C: UiController + ?Sized,
    {
        let doc = FeatureDocument::parse(feature_text)
            .map_err(|e| self.report(e))?;
        self.run_document(&doc, world, controller)
    }

    /// Parses the loaded `source` and runs it, keeping its path in errors.
    ///
    /// # Errors
    ///
    /// On the first failure, see [`Runner::run_document()`].
    pub fn run_source<C>(
        &mut self,
        source: &FeatureSource,
        world: &mut World,
        controller: &mut C,
    ) -> Result<Summary>
    where
        C: UiController + ?Sized,
    {
        let doc = match source.path() {
            Some(path) => FeatureDocument::parse_with_path(source.text(), path),
            None => FeatureDocument::parse(source.text()),
        }
        .map_err(|e| self.report(e))?;
        self.run_document(&doc, world, controller)
    }

    /// Runs the already parsed `doc`.
    ///
    /// The failure is output through [`Writer::failed()`] before being
    /// returned. Lines output before it stay.
    ///
    /// # Errors
    ///
    /// - [`Error::Unmatched`] if no step definition matches a step;
    /// - [`Error::Ambiguous`] if several step definitions match a step;
    /// - [`Error::StepFailed`] if a handler fails or panics;
    /// - [`Error::Restart`] if the `controller` fails to restart the
    ///   application;
    /// - [`Error::Output`] if the [`Writer`] fails.
    pub fn run_document<C>(
        &mut self,
        doc: &FeatureDocument,
        world: &mut World,
        controller: &mut C,
    ) -> Result<Summary>
    where
        C: UiController + ?Sized,
    {
        self.execute(doc, world, controller)
            .map_err(|e| self.report(e))
    }

    fn report(&mut self, err: Error) -> Error {
        if let Err(e) = self.writer.failed(&err) {
            tracing::warn!(error = %e, "failed to output the failure");
        }
        err
    }

    fn execute<C>(
        &mut self,
        doc: &FeatureDocument,
        world: &mut World,
        controller: &mut C,
    ) -> Result<Summary>
    where
        C: UiController + ?Sized,
    {
        let span = tracing::debug_span!("feature", name = %doc.name);
        let _guard = span.enter();

        self.writer.feature(doc).map_err(Error::Output)?;

        let scenarios = doc
            .scenarios()
            .filter(|s| self.config.accepts(s))
            .collect::<Vec<_>>();
        let mut summary = Summary {
            filtered: doc.scenarios().count() - scenarios.len(),
            ..Summary::default()
        };

        for (i, scenario) in scenarios.iter().enumerate() {
            self.run_scenario(doc, scenario, world, &mut summary)?;

            if i + 1 < scenarios.len() && self.config.restarts() {
                tracing::debug!(after = %scenario.name, "restarting application");
                controller.restart().map_err(|source| Error::Restart {
                    after: scenario.name.clone(),
                    source,
                })?;
                summary.restarts += 1;
            }
        }

        tracing::debug!(?summary, "feature finished");
        Ok(summary)
    }

    fn run_scenario(
        &mut self,
        doc: &FeatureDocument,
        scenario: &ScenarioDefinition,
        world: &mut World,
        summary: &mut Summary,
    ) -> Result<()> {
        let span = tracing::debug_span!(
            "scenario",
            name = %scenario.name,
            line = scenario.line,
        );
        let _guard = span.enter();

        for definition in doc.backgrounds_for(scenario).chain(iter::once(scenario)) {
            self.writer.definition(definition).map_err(Error::Output)?;
            for step in &definition.steps {
                self.run_step(step, world)?;
                summary.steps += 1;
            }
        }
        summary.scenarios += 1;
        Ok(())
    }

    fn run_step(&mut self, step: &Step, world: &mut World) -> Result<()> {
        let span = tracing::trace_span!(
            "step",
            keyword = %step.keyword,
            text = %step.text,
            line = step.line,
        );
        let _guard = span.enter();

        self.writer.step(step).map_err(Error::Output)?;

        let found = self.steps.find(&step.text).map_err(|source| {
            Error::Ambiguous {
                keyword: step.keyword.clone(),
                text: step.text.clone(),
                line: step.line,
                source,
            }
        })?;
        let Some(matched) = found else {
            return Err(Error::Unmatched {
                keyword: step.keyword.clone(),
                text: step.text.clone(),
                line: step.line,
            });
        };
        tracing::trace!(pattern = %matched.definition.pattern(), "matched");

        panic::catch_unwind(AssertUnwindSafe(|| matched.invoke(world, step)))
            .unwrap_or_else(|payload| Err(StepError::from_panic(&*payload)))
            .map_err(|source| Error::StepFailed {
                keyword: step.keyword.clone(),
                text: step.text.clone(),
                line: step.line,
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ui::UiError, writer::Collect};

    #[derive(Default)]
    struct Calls(Vec<String>);

    #[derive(Default)]
    struct Restarts(usize);

    impl UiController for Restarts {
        fn restart(&mut self) -> Result<(), UiError> {
            self.0 += 1;
            Ok(())
        }
    }

    fn runner() -> Runner<Calls, Collect> {
        let steps = Collection::new()
            .given("a clean database", |w: &mut Calls| w.0.push("db".into()))
            .unwrap()
            .when("I log in as {string}", |w: &mut Calls, name: String| {
                w.0.push(format!("login {name}"));
            })
            .unwrap();
        Runner::with_writer(steps, Collect::new())
    }

    const FEATURE: &str = "\
Feature: Login
  Background:
    Given a clean database

  Scenario: alice
    When I log in as 'alice'

  Scenario: bob
    When I log in as 'bob'
";

    #[test]
    fn runs_backgrounds_before_each_scenario() {
        let mut runner = runner();
        let (mut world, mut ui) = (Calls::default(), Restarts::default());

        let summary = runner.run(FEATURE, &mut world, &mut ui).unwrap();

        assert_eq!(world.0, ["db", "login alice", "db", "login bob"]);
        assert_eq!(ui.0, 1);
        assert_eq!(
            summary,
            Summary {
                scenarios: 2,
                filtered: 0,
                steps: 4,
                restarts: 1,
            },
        );
    }

    #[test]
    fn restarts_can_be_disabled() {
        let mut runner = runner()
            .with_config(Config::default().restart_between_scenarios(false));
        let (mut world, mut ui) = (Calls::default(), Restarts::default());

        let summary = runner.run(FEATURE, &mut world, &mut ui).unwrap();

        assert_eq!(ui.0, 0);
        assert_eq!(summary.restarts, 0);
    }

    #[test]
    fn restarts_only_between_filtered_scenarios() {
        let mut runner = runner().with_config(
            Config::default().filter_scenarios(regex::Regex::new("bob").unwrap()),
        );
        let (mut world, mut ui) = (Calls::default(), Restarts::default());

        let summary = runner.run(FEATURE, &mut world, &mut ui).unwrap();

        assert_eq!(world.0, ["db", "login bob"]);
        assert_eq!(ui.0, 0);
        assert_eq!(summary.filtered, 1);
    }

    #[test]
    fn parse_failures_are_reported() {
        let mut runner = runner();

        let err = runner
            .run("not gherkin at all\n", &mut Calls::default(), &mut Restarts::default())
            .unwrap_err();

        assert!(matches!(err, Error::Parse { .. }));
        assert_eq!(runner.writer().lines().len(), 1);
    }
}
