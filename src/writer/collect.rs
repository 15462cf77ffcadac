// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Writer`] keeping the output in memory.

use std::io;

use derive_more::with_trait::{Deref, DerefMut};

use super::{LineKind, Writer};

/// [`Writer`] collecting plain lines in memory, mostly for asserting on the
/// output in tests.
#[derive(Clone, Debug, Default, Deref, DerefMut)]
pub struct Collect(Vec<(LineKind, String)>);

impl Collect {
    /// Creates an empty [`Collect`]or.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Collected lines, in output order.
    #[must_use]
    pub fn lines(&self) -> Vec<&str> {
        self.0.iter().map(|(_, l)| l.as_str()).collect()
    }

    /// [`LineKind`]s of the collected lines, in output order.
    #[must_use]
    pub fn kinds(&self) -> Vec<LineKind> {
        self.0.iter().map(|(k, _)| *k).collect()
    }
}

impl Writer for Collect {
    fn write_line(&mut self, kind: LineKind, line: &str) -> io::Result<()> {
        self.0.push((kind, line.to_owned()));
        Ok(())
    }
}
