// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! [`Writer`] emitting [`tracing`] events.

use std::io;

use super::{LineKind, Writer};

/// [`Writer`] turning every line into a [`tracing`] event with the
/// `greencoffee::output` target, so progress lines end up wherever the
/// installed subscriber sends its logs.
///
/// Failures are emitted at the `ERROR` level, everything else at `INFO`.
#[derive(Clone, Copy, Debug, Default)]
pub struct Tracing;

impl Writer for Tracing {
    fn write_line(&mut self, kind: LineKind, line: &str) -> io::Result<()> {
        let line = line.trim_start_matches('\t');
        match kind {
            LineKind::Failure => {
                tracing::error!(target: "greencoffee::output", %kind, "{line}");
            }
            LineKind::Feature
            | LineKind::Description
            | LineKind::Scenario
            | LineKind::Step => {
                tracing::info!(target: "greencoffee::output", %kind, "{line}");
            }
        }
        Ok(())
    }
}
