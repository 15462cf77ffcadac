// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Config`] of a [`Runner`].
//!
//! [`Runner`]: crate::Runner

use regex::Regex;
use smart_default::SmartDefault;

use crate::{feature::ScenarioDefinition, writer::Coloring};

/// Options of a [`Runner`].
///
/// ```rust
/// # use greencoffee::{Config, writer::Coloring};
/// let config = Config::default()
///     .restart_between_scenarios(false)
///     .coloring(Coloring::Never);
/// # assert!(!config.restarts());
/// ```
///
/// [`Runner`]: crate::Runner
#[derive(Clone, Debug, SmartDefault)]
pub struct Config {
    /// Whether the application is restarted between scenarios.
    #[default(true)]
    pub restart_between_scenarios: bool,

    /// Regex to filter scenarios by their name.
    pub filter_scenarios: Option<Regex>,

    /// Coloring policy of a console output.
    #[default(Coloring::Auto)]
    pub coloring: Coloring,
}

impl Config {
    /// Enables or disables restarting the application between scenarios.
    #[must_use]
    pub fn restart_between_scenarios(mut self, restart: bool) -> Self {
        self.restart_between_scenarios = restart;
        self
    }

    /// Runs only the scenarios whose name matches the `regex`.
    #[must_use]
    pub fn filter_scenarios(mut self, regex: Regex) -> Self {
        self.filter_scenarios = Some(regex);
        self
    }

    /// Sets the [`Coloring`] policy.
    #[must_use]
    pub fn coloring(mut self, coloring: Coloring) -> Self {
        self.coloring = coloring;
        self
    }

    /// Indicates whether the application is restarted between scenarios.
    #[must_use]
    pub const fn restarts(&self) -> bool {
        self.restart_between_scenarios
    }

    /// Indicates whether the `scenario` passes the name filter.
    #[must_use]
    pub fn accepts(&self, scenario: &ScenarioDefinition) -> bool {
        self.filter_scenarios
            .as_ref()
            .map_or(true, |re| re.is_match(&scenario.name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature::FeatureDocument;

    #[test]
    fn defaults() {
        let config = Config::default();

        assert!(config.restarts());
        assert!(config.filter_scenarios.is_none());
        assert_eq!(config.coloring, Coloring::Auto);
    }

    #[test]
    fn filters_by_scenario_name() {
        let doc = FeatureDocument::parse(
            "\
Feature: Contacts
  Scenario: empty list
    Then I see nothing

  Scenario: some contacts
    Then I see 3 contacts
",
        )
        .unwrap();
        let config =
            Config::default().filter_scenarios(Regex::new("^some").unwrap());

        let names = doc
            .scenarios()
            .filter(|s| config.accepts(s))
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>();

        assert_eq!(names, ["some contacts"]);
    }
}
