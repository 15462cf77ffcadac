// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Collection`] of step [`Definition`]s.

use std::fmt;

use derive_more::with_trait::Display;
use itertools::Itertools as _;
use linked_hash_map::LinkedHashMap;

use crate::feature::Step;

use super::{
    capture::Capture,
    error::{AmbiguousMatchError, RegistrationError, StepError},
    handler::{BoxedHandler, Handler},
    location::Location,
    pattern::{PatternError, StepPattern},
    regex::HashableRegex,
};

/// Lifecycle category a step handler is declared with.
///
/// Only informational: steps are matched against every [`Definition`]
/// regardless of their [`StepKind`] or of the keyword used in the feature.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum StepKind {
    /// Precondition.
    Given,

    /// Action.
    When,

    /// Assertion.
    Then,
}

impl From<gherkin::StepType> for StepKind {
    fn from(ty: gherkin::StepType) -> Self {
        match ty {
            gherkin::StepType::Given => Self::Given,
            gherkin::StepType::When => Self::When,
            gherkin::StepType::Then => Self::Then,
        }
    }
}

/// [`StepPattern`] bound to a handler.
pub struct Definition<World> {
    kind: StepKind,
    pattern: StepPattern,
    location: Location,
    handler: BoxedHandler<World>,
}

impl<World> Definition<World> {
    /// [`StepKind`] this handler was registered with.
    #[must_use]
    pub const fn kind(&self) -> StepKind {
        self.kind
    }

    /// [`StepPattern`] of this handler.
    #[must_use]
    pub const fn pattern(&self) -> &StepPattern {
        &self.pattern
    }

    /// [`Location`] of the registration.
    #[must_use]
    pub const fn location(&self) -> Location {
        self.location
    }
}

impl<World> fmt::Debug for Definition<World> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("kind", &self.kind)
            .field("pattern", &self.pattern.source())
            .field("location", &self.location)
            .finish_non_exhaustive()
    }
}

/// Successful match of a step text against a [`Definition`].
pub struct Match<'c, World> {
    /// Matched [`Definition`].
    pub definition: &'c Definition<World>,

    /// Values captured from the step text, in declaration order.
    pub captures: Vec<Capture>,
}

impl<World> Match<'_, World> {
    /// Invokes the matched handler with the captured values and the matched
    /// `step`, whose doc string and data table are passed to the handlers
    /// asking for them.
    ///
    /// # Errors
    ///
    /// If a captured value can't be converted into the handler argument, or
    /// the handler itself fails.
    pub fn invoke(self, world: &mut World, step: &Step) -> Result<(), StepError> {
        (self.definition.handler)(world, step, self.captures)
    }
}

// Implemented manually to omit redundant `World: Debug` trait bound, imposed
// by `#[derive(Debug)]`.
impl<World> fmt::Debug for Match<'_, World> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Match")
            .field("definition", self.definition)
            .field("captures", &self.captures)
            .finish()
    }
}

/// Ordered collection of step [`Definition`]s.
///
/// Built explicitly, one handler at a time:
/// ```rust
/// # use greencoffee::step::{Collection, RegistrationError};
/// # #[derive(Default)]
/// # struct LoginWorld { username: String, logged_in: bool }
/// # fn main() -> Result<(), RegistrationError> {
/// let steps = Collection::<LoginWorld>::new()
///     .given("the login screen is shown", |_: &mut LoginWorld| {})?
///     .when_regex(
///         "I type '(.*)' into the username field",
///         |w: &mut LoginWorld, name: String| w.username = name,
///     )?
///     .then("I am logged in", |w: &mut LoginWorld| assert!(w.logged_in))?;
/// # assert_eq!(steps.len(), 3);
/// # Ok(())
/// # }
/// ```
///
/// Every step text has to match exactly one [`Definition`].
pub struct Collection<World> {
    definitions: LinkedHashMap<HashableRegex, Definition<World>>,
}

// Implemented manually to omit redundant `World: Default` trait bound, imposed
// by `#[derive(Default)]`.
impl<World> Default for Collection<World> {
    fn default() -> Self {
        Self {
            definitions: LinkedHashMap::new(),
        }
    }
}

impl<World> fmt::Debug for Collection<World> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.definitions.values()).finish()
    }
}

impl<World: 'static> Collection<World> {
    /// Creates a new empty [`Collection`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a [Given] handler for a step expression.
    ///
    /// # Errors
    ///
    /// See [`Collection::step()`].
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference#given
    #[track_caller]
    pub fn given<Args, H>(
        self,
        expression: &str,
        handler: H,
    ) -> Result<Self, RegistrationError>
    where
        H: Handler<World, Args>,
    {
        let pattern = compile(expression, StepPattern::expression)?;
        self.step(StepKind::Given, pattern, handler)
    }

    /// Registers a [When] handler for a step expression.
    ///
    /// # Errors
    ///
    /// See [`Collection::step()`].
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference#when
    #[track_caller]
    pub fn when<Args, H>(
        self,
        expression: &str,
        handler: H,
    ) -> Result<Self, RegistrationError>
    where
        H: Handler<World, Args>,
    {
        let pattern = compile(expression, StepPattern::expression)?;
        self.step(StepKind::When, pattern, handler)
    }

    /// Registers a [Then] handler for a step expression.
    ///
    /// # Errors
    ///
    /// See [`Collection::step()`].
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference#then
    #[track_caller]
    pub fn then<Args, H>(
        self,
        expression: &str,
        handler: H,
    ) -> Result<Self, RegistrationError>
    where
        H: Handler<World, Args>,
    {
        let pattern = compile(expression, StepPattern::expression)?;
        self.step(StepKind::Then, pattern, handler)
    }

    /// Registers a [Given] handler for a regular expression.
    ///
    /// # Errors
    ///
    /// See [`Collection::step()`].
    ///
    /// [Given]: https://cucumber.io/docs/gherkin/reference#given
    #[track_caller]
    pub fn given_regex<Args, H>(
        self,
        regex: &str,
        handler: H,
    ) -> Result<Self, RegistrationError>
    where
        H: Handler<World, Args>,
    {
        let pattern = compile(regex, StepPattern::regex)?;
        self.step(StepKind::Given, pattern, handler)
    }

    /// Registers a [When] handler for a regular expression.
    ///
    /// # Errors
    ///
    /// See [`Collection::step()`].
    ///
    /// [When]: https://cucumber.io/docs/gherkin/reference#when
    #[track_caller]
    pub fn when_regex<Args, H>(
        self,
        regex: &str,
        handler: H,
    ) -> Result<Self, RegistrationError>
    where
        H: Handler<World, Args>,
    {
        let pattern = compile(regex, StepPattern::regex)?;
        self.step(StepKind::When, pattern, handler)
    }

    /// Registers a [Then] handler for a regular expression.
    ///
    /// # Errors
    ///
    /// See [`Collection::step()`].
    ///
    /// [Then]: https://cucumber.io/docs/gherkin/reference#then
    #[track_caller]
    pub fn then_regex<Args, H>(
        self,
        regex: &str,
        handler: H,
    ) -> Result<Self, RegistrationError>
    where
        H: Handler<World, Args>,
    {
        let pattern = compile(regex, StepPattern::regex)?;
        self.step(StepKind::Then, pattern, handler)
    }

    /// Registers a handler for an already compiled [`StepPattern`].
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::Arity`] if the handler takes a different number
    ///   of arguments than the `pattern` captures;
    /// - [`RegistrationError::Signature`] if a handler argument can't hold the
    ///   placeholder in the same position;
    /// - [`RegistrationError::Duplicate`] if the same pattern is already
    ///   registered.
    #[track_caller]
    pub fn step<Args, H>(
        mut self,
        kind: StepKind,
        pattern: StepPattern,
        handler: H,
    ) -> Result<Self, RegistrationError>
    where
        H: Handler<World, Args>,
    {
        let location = Location::caller();

        let signature = H::signature();
        if signature.len() != pattern.kinds().len() {
            return Err(RegistrationError::Arity {
                pattern: pattern.source().to_owned(),
                captures: pattern.kinds().len(),
                arguments: signature.len(),
            });
        }
        if let Some((position, (placeholder, arg))) = pattern
            .kinds()
            .iter()
            .zip(&signature)
            .find_position(|(kind, arg)| !arg.accepts(**kind))
        {
            return Err(RegistrationError::Signature {
                pattern: pattern.source().to_owned(),
                position,
                placeholder: placeholder.to_string(),
                ty: arg.ty,
            });
        }

        self.insert(Definition {
            kind,
            pattern,
            location,
            handler: handler.into_boxed(),
        })?;
        Ok(self)
    }

    /// Moves all the [`Definition`]s of the `other` [`Collection`] into this
    /// one, keeping their order.
    ///
    /// # Errors
    ///
    /// With [`RegistrationError::Duplicate`] if both collections define the
    /// same pattern.
    pub fn append(mut self, other: Self) -> Result<Self, RegistrationError> {
        for (_, definition) in other.definitions {
            self.insert(definition)?;
        }
        Ok(self)
    }

    fn insert(
        &mut self,
        definition: Definition<World>,
    ) -> Result<(), RegistrationError> {
        let key = definition.pattern.compiled().clone();
        if let Some(existing) = self.definitions.get(&key) {
            return Err(RegistrationError::Duplicate {
                pattern: definition.pattern.source().to_owned(),
                existing: existing.location,
            });
        }

        tracing::trace!(
            kind = %definition.kind,
            pattern = %definition.pattern,
            location = %definition.location,
            "registered step",
        );
        _ = self.definitions.insert(key, definition);
        Ok(())
    }
}

impl<World> Collection<World> {
    /// Number of registered [`Definition`]s.
    #[must_use]
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    /// Indicates whether nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterates over the [`Definition`]s in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Definition<World>> {
        self.definitions.values()
    }

    /// Finds the [`Definition`] matching the whole step `text`.
    ///
    /// Every [`Definition`] is tried, so the result doesn't depend on the
    /// registration order.
    ///
    /// # Errors
    ///
    /// If the `text` matches more than one [`Definition`].
    pub fn find(
        &self,
        text: &str,
    ) -> Result<Option<Match<'_, World>>, AmbiguousMatchError> {
        let mut found = self
            .definitions
            .values()
            .filter_map(|definition| {
                definition
                    .pattern
                    .captures(text)
                    .map(|captures| Match { definition, captures })
            })
            .collect::<Vec<_>>();

        match found.len() {
            0 | 1 => Ok(found.pop()),
            _ => Err(AmbiguousMatchError {
                possible_matches: found
                    .into_iter()
                    .map(|m| {
                        let def = m.definition;
                        (def.pattern.source().to_owned(), def.location)
                    })
                    .sorted()
                    .collect(),
            }),
        }
    }
}

fn compile(
    pattern: &str,
    parse: impl FnOnce(String) -> Result<StepPattern, PatternError>,
) -> Result<StepPattern, RegistrationError> {
    parse(pattern.to_owned()).map_err(|source| RegistrationError::Pattern {
        pattern: pattern.to_owned(),
        source,
    })
}
