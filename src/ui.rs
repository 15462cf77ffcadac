// Copyright (c) 2018-2025  Brendan Molloy <brendan@bbqsrc.net>,
//                          Ilya Solovyiov <ilya.solovyiov@gmail.com>,
//                          Kai Ren <tyranron@gmail.com>
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Application under test.
//!
//! The [`Runner`] only needs an [`UiController`] to restart the application
//! between scenarios. Step handlers drive the screen through an
//! [`UiAutomation`] kept in their world.
//!
//! [`Runner`]: crate::Runner

use derive_more::with_trait::{Display, Error};

/// Android resource identifier of a view, as found in the generated `R`
/// class.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[display("0x{_0:08x}")]
pub struct ResourceId(pub u32);

/// How a view is looked up on the screen.
#[derive(Clone, Debug, Display, Eq, Hash, PartialEq)]
pub enum ViewSelector {
    /// View with the given [`ResourceId`].
    #[display("view with id {_0}")]
    Id(ResourceId),

    /// View displaying exactly the given text.
    #[display("view with text \"{_0}\"")]
    Text(String),
}

/// Action performed on a view.
#[derive(Clone, Debug, Display, Eq, PartialEq)]
pub enum ViewAction {
    /// Single tap.
    #[display("click")]
    Click,

    /// Typing the text into an editable view.
    #[display("type \"{_0}\"")]
    TypeText(String),
}

/// Failure reported by the application under test.
#[derive(Debug, Display, Error)]
pub enum UiError {
    /// No view matches the selector.
    #[display("no {_0} found")]
    NotFound(#[error(not(source))] ViewSelector),

    /// Matching view exists, but isn't displayed.
    #[display("{_0} is not visible")]
    NotVisible(#[error(not(source))] ViewSelector),

    /// Action couldn't be performed on the matching view.
    #[display("cannot {action} on {selector}: {reason}")]
    Action {
        /// Target of the action.
        selector: ViewSelector,
        /// Failed action.
        action: ViewAction,
        /// What went wrong.
        reason: String,
    },

    /// Backend-specific failure, restarts included.
    #[display("{_0:#}")]
    Backend(#[error(not(source))] anyhow::Error),
}

/// Lifecycle control over the application under test.
pub trait UiController {
    /// Relaunches the application, blocking until it's ready.
    ///
    /// # Errors
    ///
    /// If the application can't be relaunched.
    fn restart(&mut self) -> Result<(), UiError>;
}

impl<T: UiController + ?Sized> UiController for &mut T {
    fn restart(&mut self) -> Result<(), UiError> {
        (**self).restart()
    }
}

impl<T: UiController + ?Sized> UiController for Box<T> {
    fn restart(&mut self) -> Result<(), UiError> {
        (**self).restart()
    }
}

/// Blocking interaction with views on the screen.
///
/// Only [`perform()`] and [`check_visible()`] have to be implemented, the
/// rest are shortcuts for the common selectors.
///
/// [`check_visible()`]: UiAutomation::check_visible
/// [`perform()`]: UiAutomation::perform
pub trait UiAutomation {
    /// Performs the `action` on the view matching the `selector`.
    ///
    /// # Errors
    ///
    /// If no view matches or the action fails.
    fn perform(
        &mut self,
        selector: &ViewSelector,
        action: &ViewAction,
    ) -> Result<(), UiError>;

    /// Asserts that the view matching the `selector` is displayed.
    ///
    /// # Errors
    ///
    /// If no view matches or the matching one isn't displayed.
    fn check_visible(&mut self, selector: &ViewSelector) -> Result<(), UiError>;

    /// Clicks the view with the given `id`.
    ///
    /// # Errors
    ///
    /// See [`UiAutomation::perform()`].
    fn click_with_id(&mut self, id: ResourceId) -> Result<(), UiError> {
        self.perform(&ViewSelector::Id(id), &ViewAction::Click)
    }

    /// Clicks the view showing the given `text`.
    ///
    /// # Errors
    ///
    /// See [`UiAutomation::perform()`].
    fn click_with_text(&mut self, text: &str) -> Result<(), UiError> {
        self.perform(&ViewSelector::Text(text.to_owned()), &ViewAction::Click)
    }

    /// Types the `text` into the view with the given `id`.
    ///
    /// # Errors
    ///
    /// See [`UiAutomation::perform()`].
    fn type_text_with_id(
        &mut self,
        id: ResourceId,
        text: &str,
    ) -> Result<(), UiError> {
        self.perform(
            &ViewSelector::Id(id),
            &ViewAction::TypeText(text.to_owned()),
        )
    }

    /// Types the `text` into the view showing `label`.
    ///
    /// # Errors
    ///
    /// See [`UiAutomation::perform()`].
    fn type_text_with_text(
        &mut self,
        label: &str,
        text: &str,
    ) -> Result<(), UiError> {
        self.perform(
            &ViewSelector::Text(label.to_owned()),
            &ViewAction::TypeText(text.to_owned()),
        )
    }

    /// Asserts that the view with the given `id` is displayed.
    ///
    /// # Errors
    ///
    /// See [`UiAutomation::check_visible()`].
    fn is_visible_with_id(&mut self, id: ResourceId) -> Result<(), UiError> {
        self.check_visible(&ViewSelector::Id(id))
    }

    /// Asserts that a view showing the given `text` is displayed.
    ///
    /// # Errors
    ///
    /// See [`UiAutomation::check_visible()`].
    fn is_visible_with_text(&mut self, text: &str) -> Result<(), UiError> {
        self.check_visible(&ViewSelector::Text(text.to_owned()))
    }
}

impl<T: UiAutomation + ?Sized> UiAutomation for &mut T {
    fn perform(
        &mut self,
        selector: &ViewSelector,
        action: &ViewAction,
    ) -> Result<(), UiError> {
        (**self).perform(selector, action)
    }

    fn check_visible(&mut self, selector: &ViewSelector) -> Result<(), UiError> {
        (**self).check_visible(selector)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Screen {
        visible: Vec<ViewSelector>,
        log: Vec<String>,
    }

    impl UiAutomation for Screen {
        fn perform(
            &mut self,
            selector: &ViewSelector,
            action: &ViewAction,
        ) -> Result<(), UiError> {
            if !self.visible.contains(selector) {
                return Err(UiError::NotFound(selector.clone()));
            }
            self.log.push(format!("{action} on {selector}"));
            Ok(())
        }

        fn check_visible(&mut self, selector: &ViewSelector) -> Result<(), UiError> {
            if self.visible.contains(selector) {
                Ok(())
            } else {
                Err(UiError::NotVisible(selector.clone()))
            }
        }
    }

    const USERNAME: ResourceId = ResourceId(0x7f0a_0001);

    #[test]
    fn helpers_build_selectors_and_actions() {
        let mut screen = Screen {
            visible: vec![
                ViewSelector::Id(USERNAME),
                ViewSelector::Text("Login".into()),
            ],
            ..Screen::default()
        };

        screen.type_text_with_id(USERNAME, "bob").unwrap();
        screen.click_with_text("Login").unwrap();
        screen.is_visible_with_id(USERNAME).unwrap();

        assert_eq!(
            screen.log,
            [
                "type \"bob\" on view with id 0x7f0a0001",
                "click on view with text \"Login\"",
            ],
        );
    }

    #[test]
    fn helpers_propagate_failures() {
        let mut screen = Screen::default();

        let err = screen.is_visible_with_text("Contacts").unwrap_err();
        assert_eq!(err.to_string(), "view with text \"Contacts\" is not visible");

        let err = screen.click_with_id(USERNAME).unwrap_err();
        assert_eq!(err.to_string(), "no view with id 0x7f0a0001 found");
    }

    #[test]
    fn works_through_mutable_references() {
        fn login(ui: &mut dyn UiAutomation) -> Result<(), UiError> {
            ui.type_text_with_text("Username", "alice")
        }
        let mut screen = Screen {
            visible: vec![ViewSelector::Text("Username".into())],
            ..Screen::default()
        };

        login(&mut &mut screen).unwrap();

        assert_eq!(screen.log, ["type \"alice\" on view with text \"Username\""]);
    }
}
