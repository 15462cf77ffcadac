// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Gherkin scenarios driving UI tests.
//!
//! Feature files describe the behaviour of an application:
//! ```gherkin
//! Feature: Login
//!   Background:
//!     Given the login screen is shown
//!
//!   Scenario: valid user
//!     When I type 'bob' into the username field
//!     Then I see 3 contacts
//! ```
//! Every step is dispatched to the single handler of a [`step::Collection`]
//! whose pattern matches its text, backgrounds run before each scenario, and
//! the application is restarted through an [`UiController`] between
//! scenarios:
//! ```rust
//! use greencoffee::{
//!     steps,
//!     ui::{ResourceId, UiAutomation, UiController, UiError, ViewAction, ViewSelector},
//!     writer::Discard,
//!     Runner,
//! };
//!
//! #[derive(Default)]
//! struct Device {
//!     typed: Vec<String>,
//! }
//!
//! impl UiAutomation for Device {
//!     fn perform(&mut self, _: &ViewSelector, action: &ViewAction) -> Result<(), UiError> {
//!         if let ViewAction::TypeText(text) = action {
//!             self.typed.push(text.clone());
//!         }
//!         Ok(())
//!     }
//!
//!     fn check_visible(&mut self, _: &ViewSelector) -> Result<(), UiError> {
//!         Ok(())
//!     }
//! }
//!
//! #[derive(Default)]
//! struct App {
//!     restarts: usize,
//! }
//!
//! impl UiController for App {
//!     fn restart(&mut self) -> Result<(), UiError> {
//!         self.restarts += 1;
//!         Ok(())
//!     }
//! }
//!
//! const USERNAME: ResourceId = ResourceId(0x7f0a_0001);
//!
//! # fn main() -> anyhow::Result<()> {
//! let steps = steps!(Device {
//!     given "the login screen is shown" =>
//!         |d: &mut Device| d.is_visible_with_id(USERNAME);
//!     when_regex "I type '(.*)' into the username field" =>
//!         |d: &mut Device, name: String| d.type_text_with_id(USERNAME, &name);
//!     then "I see {int} contacts" =>
//!         |d: &mut Device, _: u32| d.is_visible_with_text("Contacts");
//! })?;
//!
//! let (mut device, mut app) = (Device::default(), App::default());
//! let summary = Runner::with_writer(steps, Discard).run(
//!     "Feature: Login\n\
//!      \x20 Scenario: bob\n\
//!      \x20   When I type 'bob' into the username field\n\
//!      \x20 Scenario: alice\n\
//!      \x20   When I type 'alice' into the username field\n",
//!     &mut device,
//!     &mut app,
//! )?;
//!
//! assert_eq!(device.typed, ["bob", "alice"]);
//! assert_eq!(app.restarts, 1);
//! assert_eq!(summary.scenarios, 2);
//! # Ok(())
//! # }
//! ```

#[macro_use]
mod macros;

pub mod config;
pub mod error;
pub mod feature;
pub mod runner;
pub mod source;
pub mod step;
pub mod ui;
pub mod writer;

#[doc(no_inline)]
pub use gherkin;

#[doc(inline)]
pub use self::{
    config::Config,
    error::{Error, Result},
    feature::FeatureDocument,
    runner::{Runner, Summary},
    source::{Assets, FeatureSource},
    step::Collection,
    ui::{UiAutomation, UiController},
    writer::Writer,
};
