// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Step patterns and matching of step text against them.
//!
//! A [`StepPattern`] is either a [Cucumber Expression] with typed
//! placeholders, optional text and alternatives:
//! ```text
//! I have {int} cucumber(s) in my {word} basket/bag
//! ```
//! or a raw regular expression:
//! ```text
//! I type '(.*)' into the username field
//! ```
//! Both are compiled into an anchored [`Regex`], so the whole step text has
//! to match.
//!
//! [Cucumber Expression]: https://github.com/cucumber/cucumber-expressions

use std::fmt;

use cucumber_expressions::{Expression, SingleExpression};
use derive_more::with_trait::{Display, Error};
use regex::Regex;

use super::{capture::Capture, regex::HashableRegex};

/// Kind of a value captured by a [`StepPattern`].
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq)]
pub enum PlaceholderKind {
    /// `{int}` placeholder: an optionally negative integer.
    #[display("{{int}}")]
    Int,

    /// `{float}` placeholder: a decimal number with an optional exponent.
    #[display("{{float}}")]
    Float,

    /// `{word}` placeholder: a run of non-whitespace characters.
    #[display("{{word}}")]
    Word,

    /// `{string}` placeholder: a single- or double-quoted string. Quotes are
    /// not part of the captured value, and escaped quotes are unescaped.
    #[display("{{string}}")]
    String,

    /// `{}` placeholder: anything.
    #[display("{{}}")]
    Anonymous,

    /// Capturing group of a raw regular expression.
    #[display("regex group")]
    Group,
}

impl PlaceholderKind {
    /// Resolves a placeholder by the name written between the braces.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "int" => Self::Int,
            "float" => Self::Float,
            "word" => Self::Word,
            "string" => Self::String,
            "" => Self::Anonymous,
            _ => return None,
        })
    }

    /// Returns whether captures of this kind carry untyped text, which is
    /// only parsed when the handler is invoked.
    #[must_use]
    pub const fn is_untyped(self) -> bool {
        matches!(self, Self::Anonymous | Self::Group)
    }

    /// Strips the quotes of a `{string}` capture and unescapes the quote
    /// character inside.
    fn extract(self, raw: &str) -> String {
        if self != Self::String {
            return raw.to_owned();
        }
        for quote in ['"', '\''] {
            if let Some(inner) = raw
                .strip_prefix(quote)
                .and_then(|r| r.strip_suffix(quote))
            {
                return inner.replace(&format!("\\{quote}"), &quote.to_string());
            }
        }
        raw.to_owned()
    }
}

/// Syntax a [`StepPattern`] was declared with.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
pub enum Syntax {
    /// Step expression with typed placeholders and optional text.
    #[display("expression")]
    Expression,

    /// Raw regular expression.
    #[display("regex")]
    Regex,
}

/// Position of a captured value among the groups of the compiled [`Regex`].
#[derive(Clone, Copy, Debug)]
struct Slot {
    kind: PlaceholderKind,

    /// Index of the group spanning the whole value.
    group: usize,
}

/// Compiled step pattern.
#[derive(Clone, Debug)]
pub struct StepPattern {
    source: String,
    syntax: Syntax,
    regex: HashableRegex,
    slots: Vec<Slot>,
    kinds: Vec<PlaceholderKind>,
}

impl StepPattern {
    /// Compiles a [Cucumber Expression].
    ///
    /// Supports `{int}`, `{float}`, `{word}`, `{string}` and `{}`
    /// placeholders, `(optional text)`, `alternative/texts` and `\`-escaping.
    ///
    /// # Errors
    ///
    /// If the expression is malformed or names an unknown placeholder.
    ///
    /// [Cucumber Expression]: https://github.com/cucumber/cucumber-expressions
    pub fn expression(source: impl Into<String>) -> Result<Self, PatternError> {
        let source = source.into();
        let slots = expression_slots(&source)?;
        let regex = Expression::regex(source.as_str())
            .map_err(PatternError::expression)?;

        Ok(Self {
            regex: regex.into(),
            kinds: slots.iter().map(|s| s.kind).collect(),
            source,
            syntax: Syntax::Expression,
            slots,
        })
    }

    /// Compiles a raw regular expression. Every capturing group becomes an
    /// untyped capture.
    ///
    /// # Errors
    ///
    /// If the `source` is not a valid [`Regex`].
    pub fn regex(source: impl Into<String>) -> Result<Self, PatternError> {
        let source = source.into();
        let regex = Regex::new(&format!("^(?:{source})$"))?;
        let slots = (1..regex.captures_len())
            .map(|group| Slot {
                kind: PlaceholderKind::Group,
                group,
            })
            .collect::<Vec<_>>();
        Ok(Self {
            regex: regex.into(),
            kinds: vec![PlaceholderKind::Group; slots.len()],
            source,
            syntax: Syntax::Regex,
            slots,
        })
    }

    /// Pattern as it was declared.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// [`Syntax`] this pattern was declared with.
    #[must_use]
    pub const fn syntax(&self) -> Syntax {
        self.syntax
    }

    /// Compiled anchored [`Regex`].
    #[must_use]
    pub const fn compiled(&self) -> &HashableRegex {
        &self.regex
    }

    /// Kinds of the captured values, in declaration order.
    #[must_use]
    pub fn kinds(&self) -> &[PlaceholderKind] {
        &self.kinds
    }

    /// Matches the whole `text` against this pattern, returning the captured
    /// values in declaration order, or [`None`] if it doesn't match.
    #[must_use]
    pub fn captures(&self, text: &str) -> Option<Vec<Capture>> {
        let caps = self.regex.captures(text)?;
        Some(
            self.slots
                .iter()
                .map(|slot| {
                    let raw = caps.get(slot.group).map_or("", |m| m.as_str());
                    Capture::new(slot.kind, slot.kind.extract(raw))
                })
                .collect(),
        )
    }

    /// Checks whether the whole `text` matches this pattern.
    #[must_use]
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

impl fmt::Display for StepPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Locates the values captured by the placeholders of the `expression`.
///
/// Placeholders may expand into nested groups, so the group of every value is
/// found by the width of the placeholders before it.
fn expression_slots(expression: &str) -> Result<Vec<Slot>, PatternError> {
    let ast = Expression::parse(expression).map_err(PatternError::expression)?;

    let mut group = 1;
    let mut slots = Vec::new();
    for e in &ast.0 {
        let name = match e {
            SingleExpression::Parameter(par) => *par.fragment(),
            SingleExpression::Alternation(_)
            | SingleExpression::Optional(_)
            | SingleExpression::Text(_)
            | SingleExpression::Whitespaces(_) => continue,
        };
        let kind = PlaceholderKind::from_name(name).ok_or_else(|| {
            PatternError::UnknownPlaceholder {
                name: name.to_owned(),
            }
        })?;
        slots.push(Slot { kind, group });
        group += placeholder_width(name)?;
    }
    Ok(slots)
}

/// Number of capturing groups a placeholder named `name` compiles into.
fn placeholder_width(name: &str) -> Result<usize, PatternError> {
    let alone = format!("{{{name}}}");
    let regex =
        Expression::regex(alone.as_str()).map_err(PatternError::expression)?;
    Ok(regex.captures_len() - 1)
}

/// Error of compiling a [`StepPattern`].
#[derive(Clone, Debug, Display, Error)]
pub enum PatternError {
    /// Placeholder name is not one of the supported ones.
    #[display("unknown placeholder `{{{name}}}`")]
    UnknownPlaceholder {
        /// Name between the braces.
        #[error(not(source))]
        name: String,
    },

    /// Step expression is malformed.
    #[display("invalid step expression: {reason}")]
    Expression {
        /// Parser diagnostic.
        #[error(not(source))]
        reason: String,
    },

    /// Compiled pattern is not a valid regular expression.
    #[display("invalid regular expression: {_0}")]
    Regex(regex::Error),
}

impl PatternError {
    /// Wraps a diagnostic of the expression parser, which borrows the parsed
    /// input.
    fn expression(err: impl fmt::Display) -> Self {
        Self::Expression {
            reason: err.to_string(),
        }
    }
}

impl From<regex::Error> for PatternError {
    fn from(err: regex::Error) -> Self {
        Self::Regex(err)
    }
}
