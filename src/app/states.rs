use std::rc::Rc;

use crate::error::AppError;
use crate::navigation::builtin::{BackCommand, ExitState, InitGameState};
use crate::navigation::{Command, Menu, MenuOption, State, Step, StepError, Transition};
use crate::scope::Scope;
use crate::session::Session;
use crate::text::{capitalize, substitute_params};

/// Root state: loads the application documents, then opens the main menu.
pub struct StartState;

impl StartState {
    fn load_documents(session: &mut Session) -> Result<(), AppError> {
        let paths = session.paths.clone();
        let ui = &mut session.ui;

        let states = paths.app_states();
        ui.states
            .load(&mut ui.manager, &states, paths.namespace_of(&states))?;

        let messages = paths.app_messages();
        ui.messages
            .load(&mut ui.manager, &messages, paths.namespace_of(&messages))?;

        let overlay = paths.games_overlay();
        ui.messages
            .load_optional(&mut ui.manager, &overlay, paths.namespace_of(&overlay))
    }
}

impl State for StartState {
    fn id(&self) -> &str {
        "start"
    }

    fn scope(&self) -> Scope {
        Scope::App
    }

    fn init(&self, session: &mut Session) -> Result<(), StepError> {
        Self::load_documents(session)
            .map_err(|error| StepError::redirect(error, Rc::new(ExitState)))
    }

    fn handle(&self, session: &mut Session, _input: &str) -> Step {
        let welcome = session.ui.msg("welcome");
        Ok(Transition::to(main_menu().with_greeting(welcome)))
    }

    fn requires_input(&self) -> bool {
        false
    }
}

/// 0 exits, 1 opens the game list, 2 the language list.
pub fn main_menu() -> Menu {
    Menu::new(
        Scope::App,
        "main_menu",
        vec![
            MenuOption::new(0, "exit_option", |_| Rc::new(ExitState)),
            MenuOption::new(1, "play_option", |_| Rc::new(GameSelectionMenu)),
            MenuOption::new(2, "change_language_option", |_| {
                Rc::new(LanguageSelectionMenu)
            }),
        ],
    )
}

/// Lists the registered games; 0 returns to the start state.
pub struct GameSelectionMenu;

impl State for GameSelectionMenu {
    fn id(&self) -> &str {
        "game_selection_menu"
    }

    fn scope(&self) -> Scope {
        Scope::App
    }

    fn display(&self, session: &mut Session) {
        let welcome = session.ui.state_msg(self, "welcome");
        session.ui.line(&welcome);
        let exit = session.ui.state_msg(self, "exit_option");
        session.ui.line(&format!("0. {}", exit));
        let header = session.ui.state_msg(self, "available_games");
        session.ui.line(&format!("{}\r\n", header));

        let author_label = capitalize(&session.ui.state_msg(self, "author"));
        let ids: Vec<String> = session.games.iter().map(|g| g.id().to_string()).collect();
        for (i, id) in ids.iter().enumerate() {
            let name = session.ui.optional_msg(id, "name");
            let description = session.ui.optional_msg(id, "description");
            let author = session.ui.optional_msg(id, "author");
            session.ui.line(&format!(
                "{}. {}.\r\n{}\r\n{}: {}.\r\n",
                i + 1,
                name,
                description,
                author_label,
                author
            ));
        }

        let prompt = session.ui.state_msg(self, "make_your_choice");
        session.ui.line(&prompt);
    }

    fn handle(&self, session: &mut Session, input: &str) -> Step {
        let choice = session.ui.input.parse_int(input)?;
        if choice == 0 {
            let start = session.start.clone().unwrap_or_else(|| Rc::new(main_menu()));
            return Ok(Transition::To(start));
        }

        let game = usize::try_from(choice)
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|index| session.games.get(index))
            .cloned();
        match game {
            Some(game) => Ok(Transition::to(InitGameState::new(game))),
            None => {
                let notice = session.ui.state_msg(self, "invalid_option");
                session.ui.set_notice(notice);
                Ok(Transition::Stay)
            }
        }
    }
}

/// Lists the Available Languages and switches to the chosen one.
pub struct LanguageSelectionMenu;

impl State for LanguageSelectionMenu {
    fn id(&self) -> &str {
        "language_selection_menu"
    }

    fn scope(&self) -> Scope {
        Scope::App
    }

    fn display(&self, session: &mut Session) {
        let header = session.ui.state_msg(self, "available_languages");
        session.ui.line(&format!("{}\r\n", header));
        let lines: Vec<String> = session
            .ui
            .manager
            .available_languages()
            .iter()
            .map(|language| format!("{}: {}.", language.code(), language.display_name()))
            .collect();
        for line in lines {
            session.ui.line(&line);
        }
        let prompt = session.ui.state_msg(self, "prompt");
        session.ui.line(&format!("\r\n{}", prompt));
    }

    fn handle(&self, session: &mut Session, input: &str) -> Step {
        let chosen = session
            .ui
            .manager
            .available_languages()
            .iter()
            .find(|language| language.code() == input)
            .copied();

        let Some(language) = chosen else {
            let notice = session.ui.state_msg(self, "invalid_input");
            session.ui.set_notice(notice);
            return Ok(Transition::Stay);
        };

        session.switch_language(language.code())?;
        let selected = session.ui.state_msg(self, "selected");
        session.ui.line(&substitute_params(
            &selected,
            &[("language", language.display_name())],
        ));
        Ok(Transition::To(session.previous_state()?))
    }

    fn commands(&self) -> Vec<Rc<dyn Command>> {
        vec![Rc::new(BackCommand)]
    }
}
