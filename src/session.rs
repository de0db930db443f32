use crate::config::{Settings, SwitchPolicy};
use crate::git::{self, IdentityStore};
use crate::profile::{self, Profile};
use crate::select::{SelectList, Selectable};
use crate::store::{self, ProfileStore};

/// Field of a new profile collected by the add flow, in entry order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Alias,
}

impl Field {
    pub fn prompt(self) -> &'static str {
        match self {
            Field::Name => "Enter account name",
            Field::Email => "Enter account email",
            Field::Alias => "Enter account alias",
        }
    }
}

/// What a profile picked from the list will be used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Purpose {
    Switch,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Home,
    Menu,
    Collect(Field),
    Select(Purpose),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Activate,
    Up,
    Down,
    Input(char),
    Backspace,
    Back,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    List,
    Add,
    Switch,
    Delete,
}

impl MenuAction {
    pub const ALL: [MenuAction; 4] = [
        MenuAction::List,
        MenuAction::Add,
        MenuAction::Switch,
        MenuAction::Delete,
    ];

    fn name(self) -> &'static str {
        match self {
            MenuAction::List => "List",
            MenuAction::Add => "Add",
            MenuAction::Switch => "Switch",
            MenuAction::Delete => "Delete",
        }
    }

    fn description(self) -> &'static str {
        match self {
            MenuAction::List => "List all accounts",
            MenuAction::Add => "Add a new account",
            MenuAction::Switch => "Switch to another account",
            MenuAction::Delete => "Delete an account",
        }
    }
}

impl Selectable for MenuAction {
    fn label(&self) -> &str {
        self.name()
    }

    fn detail(&self) -> String {
        self.description().to_string()
    }

    fn filter_key(&self) -> &str {
        self.name()
    }
}

/// The interactive session: one step at a time, driven by [`Event`]s.
///
/// Every change to the profile list is written to the store before the
/// transition returns.
pub struct Session<I> {
    settings: Settings,
    store: ProfileStore,
    identity: I,
    profiles: Vec<Profile>,
    active: Profile,
    step: Step,
    input: String,
    draft: Profile,
    menu: SelectList<MenuAction>,
    picker: SelectList<Profile>,
    message: Option<String>,
}

impl<I: IdentityStore> Session<I> {
    /// Load (or seed) the saved profiles and work out which one is active.
    pub fn start(settings: Settings, identity: I) -> Self {
        let store = ProfileStore::new(settings.store_path.clone());
        let profiles = store::bootstrap(&store, &identity, &settings.protected_label);
        let detected = git::detect_identity(&identity);
        let active = store::detect_active(&profiles, &detected, &settings.unknown_label);
        tracing::info!(active = %active.alias, "session started");

        Self {
            settings,
            store,
            identity,
            profiles,
            active,
            step: Step::Home,
            input: String::new(),
            draft: Profile::default(),
            menu: SelectList::new(MenuAction::ALL.to_vec()),
            picker: SelectList::new(Vec::new()),
            message: None,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }

    pub fn active(&self) -> &Profile {
        &self.active
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn menu(&self) -> &SelectList<MenuAction> {
        &self.menu
    }

    pub fn picker(&self) -> &SelectList<Profile> {
        &self.picker
    }

    #[cfg(test)]
    pub fn identity(&self) -> &I {
        &self.identity
    }

    /// Process one event to completion.
    pub fn handle(&mut self, event: Event) -> Flow {
        // the previous message has been rendered by now
        self.message = None;

        match event {
            Event::Quit => return Flow::Exit,
            Event::Back => {
                self.go_home();
                return Flow::Continue;
            }
            _ => {}
        }

        match self.step {
            Step::Home => {
                if event == Event::Activate {
                    self.step = Step::Menu;
                }
            }
            Step::Menu => match event {
                Event::Up => self.menu.move_up(),
                Event::Down => self.menu.move_down(),
                Event::Activate => self.commit_menu(),
                _ => {}
            },
            Step::Collect(field) => match event {
                Event::Input(c) => self.input.push(c),
                Event::Backspace => {
                    self.input.pop();
                }
                Event::Activate => self.commit_field(field),
                _ => {}
            },
            Step::Select(purpose) => match event {
                Event::Up => self.picker.move_up(),
                Event::Down => self.picker.move_down(),
                Event::Input(c) => self.picker.push_filter(c),
                Event::Backspace => self.picker.pop_filter(),
                Event::Activate => return self.commit_selection(purpose),
                _ => {}
            },
        }
        Flow::Continue
    }

    fn go_home(&mut self) {
        self.step = Step::Home;
        self.input.clear();
        self.draft = Profile::default();
        self.picker = SelectList::new(Vec::new());
    }

    fn commit_menu(&mut self) {
        let Some(action) = self.menu.selected().copied() else {
            return;
        };

        match action {
            MenuAction::List => {
                self.message = Some(profile::format_profile_list(&self.profiles));
                self.step = Step::Home;
            }
            MenuAction::Add => {
                self.input.clear();
                self.draft = Profile::default();
                self.step = Step::Collect(Field::Name);
            }
            MenuAction::Switch => self.open_picker(Purpose::Switch),
            MenuAction::Delete => self.open_picker(Purpose::Delete),
        }
    }

    fn open_picker(&mut self, purpose: Purpose) {
        self.picker = SelectList::new(self.profiles.clone());
        self.step = Step::Select(purpose);
    }

    fn commit_field(&mut self, field: Field) {
        let value = std::mem::take(&mut self.input);
        match field {
            Field::Name => {
                self.draft.name = value;
                self.step = Step::Collect(Field::Email);
            }
            Field::Email => {
                self.draft.email = value;
                self.step = Step::Collect(Field::Alias);
            }
            Field::Alias => {
                self.draft.alias = value;
                let profile = std::mem::take(&mut self.draft);
                self.add_profile(profile);
            }
        }
    }

    fn add_profile(&mut self, profile: Profile) {
        self.step = Step::Home;

        if let Err(e) = profile.validate(&self.settings.protected_label) {
            self.message = Some(e.to_string());
            return;
        }

        tracing::info!(alias = %profile.alias, "adding profile");
        let message = format!("Added new account: {}", profile.identity_line());
        self.profiles.push(profile);
        self.persist(message);
    }

    fn commit_selection(&mut self, purpose: Purpose) -> Flow {
        // nothing highlighted: ignore the commit
        let Some(chosen) = self.picker.selected().cloned() else {
            return Flow::Continue;
        };
        self.go_home();

        match purpose {
            Purpose::Switch => self.switch_to(chosen),
            Purpose::Delete => {
                self.delete(chosen);
                Flow::Continue
            }
        }
    }

    fn switch_to(&mut self, chosen: Profile) -> Flow {
        tracing::info!(alias = %chosen.alias, "switching identity");

        match git::apply_identity(&self.identity, &chosen.name, &chosen.email) {
            Ok(()) => {
                self.message = Some(format!("Switched to account: {}", chosen.identity_line()));
                self.active = chosen;
                match self.settings.switch_policy {
                    SwitchPolicy::ReturnHome => Flow::Continue,
                    SwitchPolicy::Exit => Flow::Exit,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "switch failed");
                self.message = Some(format!("Failed to switch account: {e}"));
                Flow::Continue
            }
        }
    }

    fn delete(&mut self, chosen: Profile) {
        if chosen.is_protected(&self.settings.protected_label) {
            self.message = Some(format!(
                "You cannot delete the {} account.",
                self.settings.protected_label
            ));
            return;
        }

        if let Some(index) = self.profiles.iter().position(|p| *p == chosen) {
            self.profiles.remove(index);
        }
        tracing::info!(alias = %chosen.alias, "deleted profile");
        self.persist(format!("Deleted account: {}", chosen.identity_line()));
    }

    /// Flush the list and set `message`, adding a warning line if the write
    /// failed.
    fn persist(&mut self, message: String) {
        match self.store.save(&self.profiles) {
            Ok(()) => self.message = Some(message),
            Err(e) => {
                tracing::warn!(error = %e, "failed to save profiles");
                self.message = Some(format!("{message}\nWarning: {e}"));
            }
        }
    }
}
