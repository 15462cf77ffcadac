//! Contact list application simulated in memory and driven by the feature
//! files of `tests/features`.

use std::{cell::RefCell, rc::Rc};

use greencoffee::{
    error::Error,
    step::{Collection, RegistrationError},
    steps,
    ui::{ResourceId, UiAutomation, UiController, UiError, ViewAction, ViewSelector},
    writer::Collect,
    Assets, FeatureDocument, Runner,
};

const USERNAME: ResourceId = ResourceId(0x7f0a_0001);
const PASSWORD: ResourceId = ResourceId(0x7f0a_0002);
const LOGIN: ResourceId = ResourceId(0x7f0a_0003);
const CONTACTS_LIST: ResourceId = ResourceId(0x7f0a_0004);
const EMPTY_LIST_LABEL: ResourceId = ResourceId(0x7f0a_0005);

#[derive(Debug)]
enum Screen {
    Login {
        username: String,
        password: String,
        error: Option<String>,
    },
    Contacts(Vec<&'static str>),
}

impl Screen {
    fn login() -> Self {
        Self::Login {
            username: String::new(),
            password: String::new(),
            error: None,
        }
    }
}

fn contacts_of(username: &str, password: &str) -> Option<Vec<&'static str>> {
    match (username, password) {
        ("admin", "passw0rd") => Some(vec!["Alice", "Bob", "Carol"]),
        ("guest", "guest") => Some(vec![]),
        _ => None,
    }
}

/// State of the application shared by the [`Device`] and its [`Launcher`].
#[derive(Debug)]
struct App {
    screen: Screen,
    launches: usize,
}

type Shared = Rc<RefCell<App>>;

/// World of the steps.
struct Device(Shared);

struct Launcher(Shared);

impl UiController for Launcher {
    fn restart(&mut self) -> Result<(), UiError> {
        let mut app = self.0.borrow_mut();
        app.screen = Screen::login();
        app.launches += 1;
        Ok(())
    }
}

impl UiAutomation for Device {
    fn perform(
        &mut self,
        selector: &ViewSelector,
        action: &ViewAction,
    ) -> Result<(), UiError> {
        let mut app = self.0.borrow_mut();
        let Screen::Login { username, password, error } = &mut app.screen else {
            return Err(UiError::NotFound(selector.clone()));
        };

        let login = ViewSelector::Text("Login".into());
        match (selector, action) {
            (ViewSelector::Id(USERNAME), ViewAction::TypeText(text)) => {
                username.push_str(text);
            }
            (ViewSelector::Id(PASSWORD), ViewAction::TypeText(text)) => {
                password.push_str(text);
            }
            (_, ViewAction::Click)
                if *selector == login || *selector == ViewSelector::Id(LOGIN) =>
            {
                match contacts_of(username, password) {
                    Some(contacts) => app.screen = Screen::Contacts(contacts),
                    None => *error = Some("Invalid credentials".into()),
                }
            }
            _ => {
                return Err(UiError::Action {
                    selector: selector.clone(),
                    action: action.clone(),
                    reason: "not supported on the login screen".into(),
                });
            }
        }
        Ok(())
    }

    fn check_visible(&mut self, selector: &ViewSelector) -> Result<(), UiError> {
        let app = self.0.borrow();
        let visible = match (&app.screen, selector) {
            (Screen::Login { .. }, ViewSelector::Id(id)) => {
                [USERNAME, PASSWORD, LOGIN].contains(id)
            }
            (Screen::Login { error, .. }, ViewSelector::Text(text)) => {
                text == "Login" || error.as_deref() == Some(text.as_str())
            }
            (Screen::Contacts(list), ViewSelector::Id(id)) => {
                (*id == CONTACTS_LIST && !list.is_empty())
                    || (*id == EMPTY_LIST_LABEL && list.is_empty())
            }
            (Screen::Contacts(list), ViewSelector::Text(text)) => {
                list.contains(&text.as_str())
            }
        };
        if visible {
            Ok(())
        } else {
            Err(UiError::NotVisible(selector.clone()))
        }
    }
}

impl Device {
    fn contacts(&self) -> Option<usize> {
        match &self.0.borrow().screen {
            Screen::Contacts(list) => Some(list.len()),
            Screen::Login { .. } => None,
        }
    }

    fn login_form_is_empty(&self) -> bool {
        matches!(
            &self.0.borrow().screen,
            Screen::Login { username, password, error: None }
                if username.is_empty() && password.is_empty()
        )
    }
}

fn login_steps() -> Result<Collection<Device>, RegistrationError> {
    steps!(Device {
        given "I see an empty login form" => |d: &mut Device| {
            d.is_visible_with_id(USERNAME)?;
            d.is_visible_with_id(PASSWORD)?;
            anyhow::ensure!(d.login_form_is_empty(), "login form is not empty");
            Ok(())
        };
        when "I introduce an invalid username" =>
            |d: &mut Device| d.type_text_with_id(USERNAME, "nobody");
        when "I introduce an invalid password" =>
            |d: &mut Device| d.type_text_with_id(PASSWORD, "wrong");
        when_regex "I type '(.*)' into the username field" =>
            |d: &mut Device, name: String| d.type_text_with_id(USERNAME, &name);
        when_regex "I type '(.*)' into the password field" =>
            |d: &mut Device, password: String| d.type_text_with_id(PASSWORD, &password);
        when "I press the login button" => |d: &mut Device| d.click_with_id(LOGIN);
        then "I see an error message saying {string}" =>
            |d: &mut Device, message: String| d.is_visible_with_text(&message);
    })
}

fn contact_steps() -> Result<Collection<Device>, RegistrationError> {
    steps!(Device {
        when "I log in as {string} with password {string}" =>
            |d: &mut Device, user: String, password: String| {
                d.type_text_with_id(USERNAME, &user)?;
                d.type_text_with_id(PASSWORD, &password)?;
                d.click_with_text("Login")
            };
        then "I see {int} contacts" => |d: &mut Device, count: usize| {
            let shown = d.contacts().ok_or_else(|| anyhow::anyhow!("not logged in"))?;
            anyhow::ensure!(shown == count, "expected {count} contacts, got {shown}");
            if count > 0 {
                d.is_visible_with_id(CONTACTS_LIST)?;
            }
            Ok(())
        };
        then "I see the empty list label" =>
            |d: &mut Device| d.is_visible_with_id(EMPTY_LIST_LABEL);
        then "I don't see {string}" => |d: &mut Device, name: String| {
            match d.is_visible_with_text(&name) {
                Ok(()) => anyhow::bail!("{name} is visible"),
                Err(UiError::NotVisible(_) | UiError::NotFound(_)) => Ok(()),
                Err(e) => Err(e.into()),
            }
        };
    })
}

fn assets() -> Assets {
    Assets::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/features"))
}

fn launch() -> (Device, Launcher) {
    let app = Rc::new(RefCell::new(App {
        screen: Screen::login(),
        launches: 1,
    }));
    (Device(Rc::clone(&app)), Launcher(app))
}

fn runner() -> Runner<Device, Collect> {
    let steps = login_steps().unwrap().append(contact_steps().unwrap()).unwrap();
    Runner::with_writer(steps, Collect::new())
}

#[test]
fn login_feature_passes() {
    let (mut device, mut launcher) = launch();
    let mut runner = runner();

    let source = assets().load("login.feature").unwrap();
    let summary = runner.run_source(&source, &mut device, &mut launcher).unwrap();

    assert_eq!(summary.scenarios, 2);
    assert_eq!(summary.steps, 10);
    assert_eq!(launcher.0.borrow().launches, 2);
    assert_eq!(device.contacts(), Some(3));
    assert_eq!(
        runner.writer().lines()[..5],
        [
            "Feature: Login screen to authenticate users",
            "\tUsers log in with their username and password",
            "\tto see their contact list.",
            "\tBackground:",
            "\t\tGiven I see an empty login form",
        ],
    );
}

#[test]
fn contacts_feature_passes() {
    let (mut device, mut launcher) = launch();
    let mut runner = runner();

    let source = assets().load("contacts.feature").unwrap();
    let summary = runner.run_source(&source, &mut device, &mut launcher).unwrap();

    assert_eq!(summary.scenarios, 4);
    assert_eq!(summary.restarts, 3);
    assert!(runner
        .writer()
        .lines()
        .contains(&"\tScenario Outline: Logging in as guest"));
}

#[test]
fn undefined_step_stops_the_feature() {
    let (mut device, mut launcher) = launch();
    let mut runner = runner();

    let source = assets().load("undefined.feature").unwrap();
    let err = runner
        .run_source(&source, &mut device, &mut launcher)
        .unwrap_err();

    match err {
        Error::Unmatched { keyword, text, line } => {
            assert_eq!(keyword, "When");
            assert_eq!(text, "I shake the device");
            assert_eq!(line, 5);
        }
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(
        runner.writer().lines().last().copied(),
        Some("\t\tStep definition not found for: 'When: I shake the device' (line 5)"),
    );
}

#[test]
fn every_bundled_feature_parses_the_same_twice() {
    let assets = assets();
    let paths = assets.features().unwrap();

    assert_eq!(
        paths.iter().filter_map(|p| p.to_str()).collect::<Vec<_>>(),
        ["contacts.feature", "login.feature", "undefined.feature"],
    );
    for path in paths {
        let text = assets.load(&path).unwrap().into_text();
        assert_eq!(
            FeatureDocument::parse(&text).unwrap(),
            FeatureDocument::parse(&text).unwrap(),
            "{}",
            path.display(),
        );
    }
}
