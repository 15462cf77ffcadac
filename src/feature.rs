// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Parsed [`FeatureDocument`].
//!
//! Feature text is parsed by the [`gherkin`] crate and then flattened into an
//! ordered list of [`ScenarioDefinition`]s:
//! - [`Rule`]s are unwrapped, their scenarios keep a reference to the rule so
//!   the rule's background runs for them only;
//! - [Scenario Outline][1]s are expanded into one scenario per [Examples][2]
//!   row.
//!
//! [1]: https://cucumber.io/docs/gherkin/reference#scenario-outline
//! [2]: https://cucumber.io/docs/gherkin/reference#examples

use std::path::{Path, PathBuf};

use derive_more::with_trait::{Display, Error};
use lazy_regex::regex;

use crate::{error::Error as RunError, source, step::StepKind};

/// Parsed feature.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeatureDocument {
    /// Keyword of the feature, as written.
    pub keyword: String,

    /// Name of the feature.
    pub name: String,

    /// Free-form description below the feature name.
    pub description: Option<String>,

    /// Backgrounds and scenarios in source order.
    pub definitions: Vec<ScenarioDefinition>,

    /// [`Rule`]s referenced by [`ScenarioDefinition::rule`].
    pub rules: Vec<Rule>,

    /// Path of the `.feature` file, if it was read from one.
    pub path: Option<PathBuf>,
}

/// Whether a [`ScenarioDefinition`] is a background or a scenario.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum DefinitionKind {
    /// Steps run before every scenario in scope.
    Background,

    /// Independent test case.
    Scenario,
}

/// `Rule:` grouping scenarios under a shared background.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Rule {
    /// Keyword of the rule, as written.
    pub keyword: String,

    /// Name of the rule.
    pub name: String,

    /// Line of the rule keyword.
    pub line: usize,
}

/// Background or scenario of a [`FeatureDocument`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ScenarioDefinition {
    /// Background or scenario.
    pub kind: DefinitionKind,

    /// Keyword, as written (`Background`, `Scenario`, `Example`,
    /// `Scenario Outline`, or a translation).
    pub keyword: String,

    /// Name, with outline templates substituted.
    pub name: String,

    /// Free-form description below the name.
    pub description: Option<String>,

    /// Steps in source order.
    pub steps: Vec<Step>,

    /// Line of the keyword, or of the examples row for expanded outlines.
    pub line: usize,

    /// Index into [`FeatureDocument::rules`] of the enclosing rule.
    pub rule: Option<usize>,
}

/// Single step of a [`ScenarioDefinition`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Step {
    /// Keyword as written, trimmed (`Given`, `And`, `*`, ...).
    pub keyword: String,

    /// Category resolved by the parser, `And` and `But` inheriting it from
    /// the previous step.
    pub kind: StepKind,

    /// Step text without the keyword, trimmed.
    pub text: String,

    /// Line of the step.
    pub line: usize,

    /// Attached doc string.
    pub docstring: Option<String>,

    /// Rows of the attached data table.
    pub table: Option<Vec<Vec<String>>>,
}

impl FeatureDocument {
    /// Parses the feature `text`.
    ///
    /// # Errors
    ///
    /// - [`RunError::Parse`] if the text is not valid Gherkin;
    /// - [`RunError::Expand`] if a Scenario Outline references a column its
    ///   Examples don't have.
    pub fn parse(text: &str) -> Result<Self, RunError> {
        Self::parse_inner(text, None)
    }

    /// Parses the feature `text` read from the given `path`, which is kept in
    /// error messages.
    ///
    /// # Errors
    ///
    /// See [`FeatureDocument::parse()`].
    pub fn parse_with_path(
        text: &str,
        path: impl AsRef<Path>,
    ) -> Result<Self, RunError> {
        Self::parse_inner(text, Some(path.as_ref().to_path_buf()))
    }

    fn parse_inner(text: &str, path: Option<PathBuf>) -> Result<Self, RunError> {
        let text = source::normalize(text);
        let feature =
            gherkin::Feature::parse(&text, gherkin::GherkinEnv::default())
                .map_err(|source| RunError::Parse {
                    path: path.clone(),
                    source,
                })?;

        let mut definitions = Vec::new();
        let mut rules = Vec::new();
        let expand = |scenario, rule, definitions: &mut Vec<ScenarioDefinition>| {
            expand_scenario(scenario, rule, path.as_deref()).map(|expanded| {
                definitions.extend(expanded);
            })
        };

        if let Some(bg) = feature.background {
            definitions.push(background(bg, None));
        }
        for scenario in feature.scenarios {
            expand(scenario, None, &mut definitions)?;
        }
        for rule in feature.rules {
            let index = rules.len();
            rules.push(Rule {
                keyword: rule.keyword,
                name: rule.name,
                line: rule.position.line,
            });
            if let Some(bg) = rule.background {
                definitions.push(background(bg, Some(index)));
            }
            for scenario in rule.scenarios {
                expand(scenario, Some(index), &mut definitions)?;
            }
        }

        Ok(Self {
            keyword: feature.keyword,
            name: feature.name,
            description: non_empty(feature.description),
            definitions,
            rules,
            path,
        })
    }

    /// Backgrounds in source order.
    pub fn backgrounds(&self) -> impl Iterator<Item = &ScenarioDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.kind == DefinitionKind::Background)
    }

    /// Scenarios in source order, including the ones inside rules.
    pub fn scenarios(&self) -> impl Iterator<Item = &ScenarioDefinition> {
        self.definitions
            .iter()
            .filter(|d| d.kind == DefinitionKind::Scenario)
    }

    /// Backgrounds to run before the given `scenario`: the feature's ones
    /// first, then the ones of its rule.
    pub fn backgrounds_for<'d>(
        &'d self,
        scenario: &'d ScenarioDefinition,
    ) -> impl Iterator<Item = &'d ScenarioDefinition> {
        self.backgrounds()
            .filter(|bg| bg.rule.is_none())
            .chain(
                self.backgrounds()
                    .filter(|bg| bg.rule.is_some() && bg.rule == scenario.rule),
            )
    }
}

fn non_empty(description: Option<String>) -> Option<String> {
    description.filter(|d| !d.trim().is_empty())
}

fn step(step: gherkin::Step) -> Step {
    Step {
        keyword: step.keyword.trim().to_owned(),
        kind: step.ty.into(),
        text: step.value.trim().to_owned(),
        line: step.position.line,
        docstring: step.docstring,
        table: step.table.map(|t| t.rows),
    }
}

fn background(bg: gherkin::Background, rule: Option<usize>) -> ScenarioDefinition {
    ScenarioDefinition {
        kind: DefinitionKind::Background,
        keyword: bg.keyword.trim().to_owned(),
        name: String::new(),
        description: non_empty(bg.description),
        steps: bg.steps.into_iter().map(step).collect(),
        line: bg.position.line,
        rule,
    }
}

/// Expands [`Examples`] of a Scenario Outline, if any, so this one:
/// ```gherkin
/// Scenario Outline: logging in as <user>
///   When I type '<user>' into the username field
///   Examples:
///     | user  |
///     | alice |
///     | bob   |
/// ```
/// becomes two scenarios, `logging in as alice` and `logging in as bob`.
///
/// # Errors
///
/// If a `<template>` names a column missing from the examples table.
///
/// [`Examples`]: gherkin::Examples
fn expand_scenario(
    scenario: gherkin::Scenario,
    rule: Option<usize>,
    path: Option<&Path>,
) -> Result<Vec<ScenarioDefinition>, ExpandExamplesError> {
    let keyword = scenario.keyword.trim().to_owned();
    let description = non_empty(scenario.description);

    if scenario.examples.is_empty() {
        return Ok(vec![ScenarioDefinition {
            kind: DefinitionKind::Scenario,
            keyword,
            name: scenario.name,
            description,
            steps: scenario.steps.into_iter().map(step).collect(),
            line: scenario.position.line,
            rule,
        }]);
    }

    let mut expanded = Vec::new();
    for examples in &scenario.examples {
        let Some(table) = &examples.table else {
            continue;
        };
        let Some((header, rows)) = table.rows.split_first() else {
            continue;
        };

        for (id, row) in rows.iter().enumerate() {
            let line = table.position.line + 1 + id;
            let replace = |text: &str, line: usize| {
                replace_templates(text, header, row).map_err(|name| {
                    ExpandExamplesError {
                        name,
                        line,
                        path: path.map(Path::to_path_buf),
                    }
                })
            };

            let steps = scenario
                .steps
                .iter()
                .map(|s| {
                    let mut s = step(s.clone());
                    s.text = replace(&s.text, s.line)?;
                    if let Some(doc) = &s.docstring {
                        s.docstring = Some(replace(doc, s.line)?);
                    }
                    for cell in s.table.iter_mut().flatten().flatten() {
                        *cell = replace(cell, s.line)?;
                    }
                    Ok::<_, ExpandExamplesError>(s)
                })
                .collect::<Result<Vec<_>, _>>()?;

            expanded.push(ScenarioDefinition {
                kind: DefinitionKind::Scenario,
                keyword: keyword.clone(),
                name: replace(&scenario.name, scenario.position.line)?,
                description: description.clone(),
                steps,
                line,
                rule,
            });
        }
    }
    Ok(expanded)
}

/// Substitutes `<name>` templates with the `row` values of the matching
/// `header` columns, returning the first unknown name on failure.
fn replace_templates(
    text: &str,
    header: &[String],
    row: &[String],
) -> Result<String, String> {
    let mut unknown = None;
    let replaced = regex!(r"<([^>\s]+)>").replace_all(text, |cap: &regex::Captures<'_>| {
        let name = &cap[1];
        header
            .iter()
            .position(|h| h == name)
            .and_then(|i| row.get(i))
            .cloned()
            .unwrap_or_else(|| {
                if unknown.is_none() {
                    unknown = Some(name.to_owned());
                }
                String::new()
            })
    });
    unknown.map_or_else(|| Ok(replaced.into_owned()), Err)
}

/// Error of a Scenario Outline template not found in its Examples.
#[derive(Clone, Debug, Display, Error)]
#[display(
    "Failed to resolve <{name}> at {}line {line}",
    path.as_deref().map(|p| format!("{}:", p.display())).unwrap_or_default(),
)]
pub struct ExpandExamplesError {
    /// Name of the unknown template.
    pub name: String,

    /// Line where the template is used.
    pub line: usize,

    /// Path to the `.feature` file, if known.
    pub path: Option<PathBuf>,
}
