//! Reusable interaction shapes: the confirmation dialog and numbered menus.

use std::cell::RefCell;
use std::rc::Rc;

use crate::navigation::builtin::{CancelCommand, ConfirmCommand};
use crate::navigation::{Command, State, StateRef, Step, Transition};
use crate::scope::Scope;
use crate::session::Session;
use crate::text::substitute_params;

/// Asks the player to confirm before entering `target`.
///
/// Only `confirm` and `cancel` are available locally. Confirm enters the
/// target; cancel returns to the state that raised the dialog.
pub struct ConfirmationDialog {
    target: StateRef,
    message_key: String,
}

impl ConfirmationDialog {
    /// An empty `message_key` uses the generic `confirmation_default` text.
    pub fn new(target: StateRef, message_key: &str) -> Self {
        let message_key = if message_key.is_empty() {
            "confirmation_default"
        } else {
            message_key
        };
        Self {
            target,
            message_key: message_key.to_string(),
        }
    }
}

impl State for ConfirmationDialog {
    fn id(&self) -> &str {
        "confirmation_dialog"
    }

    fn display(&self, session: &mut Session) {
        let text = session.ui.msg(&self.message_key);
        session.ui.line(&text);
    }

    fn handle(&self, session: &mut Session, _input: &str) -> Step {
        let prompt = session.ui.state_msg(self, "confirmation_prompt");
        session.ui.set_notice(prompt);
        Ok(Transition::Stay)
    }

    fn commands(&self) -> Vec<Rc<dyn Command>> {
        vec![Rc::new(ConfirmCommand), Rc::new(CancelCommand)]
    }

    fn confirmation_target(&self) -> Option<StateRef> {
        Some(Rc::clone(&self.target))
    }
}

/// Deferred value computed from the session when it is needed.
pub type Supplier<T> = Box<dyn Fn(&Session) -> T>;

/// One numbered menu entry.
///
/// `params` runs at display time, `target` at selection time; neither runs
/// earlier.
pub struct MenuOption {
    pub id: u32,
    /// Message key in the owning state's messages
    pub description: String,
    params: Option<Supplier<Vec<(String, String)>>>,
    target: Supplier<StateRef>,
}

impl MenuOption {
    pub fn new(id: u32, description: &str, target: impl Fn(&Session) -> StateRef + 'static) -> Self {
        Self {
            id,
            description: description.to_string(),
            params: None,
            target: Box::new(target),
        }
    }

    /// Substitute these parameters into the description when displayed.
    pub fn with_params(
        mut self,
        params: impl Fn(&Session) -> Vec<(String, String)> + 'static,
    ) -> Self {
        self.params = Some(Box::new(params));
        self
    }
}

/// Numbered menu. Option descriptions come from the owning state's messages;
/// the prompt and the invalid-option notice from the menu's own.
pub struct Menu {
    owner_scope: Scope,
    owner_id: String,
    options: Vec<MenuOption>,
    greeting: RefCell<Option<String>>,
}

impl Menu {
    pub fn new(owner_scope: Scope, owner_id: &str, mut options: Vec<MenuOption>) -> Self {
        options.sort_by_key(|option| option.id);
        Self {
            owner_scope,
            owner_id: owner_id.to_string(),
            options,
            greeting: RefCell::new(None),
        }
    }

    /// Text shown once, the first time the menu is displayed.
    pub fn with_greeting(self, greeting: impl Into<String>) -> Self {
        self.greeting.replace(Some(greeting.into()));
        self
    }
}

impl State for Menu {
    fn id(&self) -> &str {
        "menu"
    }

    fn display(&self, session: &mut Session) {
        if let Some(greeting) = self.greeting.take() {
            session.ui.line(&greeting);
        }
        for option in &self.options {
            let mut description =
                session
                    .ui
                    .scoped_state_msg(self.owner_scope, &self.owner_id, &option.description);
            if let Some(params) = &option.params {
                description = substitute_params(&description, &params(session));
            }
            session.ui.line(&format!("{}. {}", option.id, description));
        }
        let prompt = session.ui.state_msg(self, "make_your_choice");
        session.ui.line(&prompt);
    }

    fn handle(&self, session: &mut Session, input: &str) -> Step {
        let choice = session.ui.input.parse_int(input)?;
        let selected = u32::try_from(choice)
            .ok()
            .and_then(|id| self.options.iter().find(|option| option.id == id));

        match selected {
            Some(option) => Ok(Transition::To((option.target)(session))),
            None => {
                let notice = session.ui.state_msg(self, "invalid_option");
                session.ui.set_notice(notice);
                Ok(Transition::Stay)
            }
        }
    }
}
