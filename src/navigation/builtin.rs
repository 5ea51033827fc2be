//! Framework states and commands.

use std::fs;
use std::io::ErrorKind as IoErrorKind;
use std::path::Path;
use std::rc::Rc;

use chrono::DateTime;
use tracing::{debug, info};

use crate::error::AppError;
use crate::games::Game;
use crate::i18n::MessageLocalizer;
use crate::navigation::{Command, ConfirmationDialog, State, StepError, Step, Transition};
use crate::session::Session;
use crate::text::substitute_params;

/// Commands reachable from every state.
pub fn global_commands() -> Vec<Rc<dyn Command>> {
    vec![
        Rc::new(HelpCommand),
        Rc::new(QuitCommand),
        Rc::new(VersionCommand),
    ]
}

// ==================== States ====================

/// Terminal state: says goodbye and stops the main loop.
pub struct ExitState;

impl State for ExitState {
    fn id(&self) -> &str {
        "exit"
    }

    fn display(&self, session: &mut Session) {
        let farewell = session.ui.state_msg(self, "exit");
        session.ui.line(&farewell);
    }

    fn handle(&self, session: &mut Session, _input: &str) -> Step {
        session.running = false;
        Ok(Transition::Stay)
    }

    fn requires_input(&self) -> bool {
        false
    }
}

/// Leaves the active game and unwinds to the start state.
pub struct GameExitState;

impl State for GameExitState {
    fn id(&self) -> &str {
        "game_exit"
    }

    fn handle(&self, session: &mut Session, _input: &str) -> Step {
        session.active_game = None;
        session.ui.game_messages = MessageLocalizer::new();
        session.return_to_menu = true;
        Ok(Transition::Stay)
    }

    fn requires_input(&self) -> bool {
        false
    }
}

/// Loads a game's documents, then starts a fresh session of it.
///
/// The state document is required; the command and message documents are
/// optional. Any load failure falls back to [`GameExitState`].
pub struct InitGameState {
    game: Rc<dyn Game>,
}

impl InitGameState {
    pub fn new(game: Rc<dyn Game>) -> Self {
        Self { game }
    }

    fn load_documents(&self, session: &mut Session) -> Result<(), AppError> {
        let id = self.game.id();
        let paths = session.paths.clone();
        let ui = &mut session.ui;

        let states = paths.game_states(id);
        ui.states
            .load(&mut ui.manager, &states, paths.namespace_of(&states))?;

        let commands = paths.game_commands(id);
        if exists(&commands)? {
            ui.commands.load_local_translations(
                &mut ui.manager,
                &commands,
                paths.namespace_of(&commands),
            )?;
        }

        let messages = paths.game_messages(id);
        if exists(&messages)? {
            ui.game_messages
                .load(&mut ui.manager, &messages, paths.namespace_of(&messages))?;
        }
        Ok(())
    }
}

/// `false` only for a missing file; other I/O failures are errors.
fn exists(path: &Path) -> Result<bool, AppError> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if e.kind() == IoErrorKind::NotFound => Ok(false),
        Err(e) => Err(AppError::FileOpen {
            path: path.display().to_string(),
            reason: e.to_string(),
        }),
    }
}

impl State for InitGameState {
    fn id(&self) -> &str {
        "init_game"
    }

    fn init(&self, session: &mut Session) -> Result<(), StepError> {
        self.load_documents(session)
            .map_err(|error| StepError::redirect(error, Rc::new(GameExitState)))?;
        debug!(game = self.game.id(), "Game documents loaded");
        Ok(())
    }

    fn display(&self, session: &mut Session) {
        let name = session.ui.optional_msg(self.game.id(), "name");
        let welcome = session.ui.state_msg(self, "game_welcome");
        session.ui.line(&substitute_params(&welcome, &[("game", name)]));
    }

    fn handle(&self, session: &mut Session, _input: &str) -> Step {
        let game = self.game.new_session();
        let start = game.start_state();
        session.active_game = Some(game);
        info!(game = self.game.id(), "Game started");
        Ok(Transition::To(start))
    }

    fn requires_input(&self) -> bool {
        false
    }
}

// ==================== Global Commands ====================

/// Describes the current state and lists every available command.
pub struct HelpCommand;

impl Command for HelpCommand {
    fn id(&self) -> &str {
        "help"
    }

    fn execute(&self, session: &mut Session, _args: &[String]) -> Step {
        let state = session.current_state()?;
        let description = session.ui.state_description(state.as_ref());
        if description.is_empty() {
            let text = session.ui.msg("help_not_found");
            session.ui.line(&text);
        } else {
            session.ui.line(&description);
        }

        let header = session.ui.msg("available_commands");
        session.ui.line(&header);

        let registry = &session.ui.commands;
        let commands: Vec<_> = registry
            .local_commands()
            .iter()
            .chain(registry.global_commands())
            .cloned()
            .collect();
        for command in commands {
            match session.ui.commands.describe(&session.ui.manager, command.as_ref()) {
                Ok(info) => session.ui.line(&format!(
                    "{}: ({}).\r\n{}",
                    info.name,
                    info.aliases.join(", "),
                    info.description
                )),
                Err(error) => session.ui.error(&error),
            }
        }
        Ok(Transition::Stay)
    }
}

/// Asks for confirmation, then exits. `quit force` exits immediately.
pub struct QuitCommand;

impl Command for QuitCommand {
    fn id(&self) -> &str {
        "quit"
    }

    fn execute(&self, session: &mut Session, args: &[String]) -> Step {
        if args.first().map(String::as_str) == Some("force") {
            return Ok(Transition::to(ExitState));
        }
        match session.current_state() {
            Ok(state) if state.confirmation_target().is_none() => Ok(Transition::to(
                ConfirmationDialog::new(Rc::new(ExitState), "quit_confirm"),
            )),
            _ => Ok(Transition::Stay),
        }
    }
}

/// Prints the package version and build time.
pub struct VersionCommand;

impl Command for VersionCommand {
    fn id(&self) -> &str {
        "version"
    }

    fn execute(&self, session: &mut Session, _args: &[String]) -> Step {
        let template = session.ui.msg("version_info");
        let built = build_time_label(option_env!("GAME_HUB_BUILD_TIME"));
        session.ui.line(&substitute_params(
            &template,
            &[("version", env!("CARGO_PKG_VERSION")), ("built", built.as_str())],
        ));
        Ok(Transition::Stay)
    }
}

/// RFC 3339 timestamps render as `dd.mm.yyyy HH:MM:SS`; anything else verbatim.
fn build_time_label(raw: Option<&str>) -> String {
    match raw {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|time| time.format("%d.%m.%Y %H:%M:%S").to_string())
            .unwrap_or_else(|_| raw.to_string()),
        None => "-".to_string(),
    }
}

// ==================== Local Commands ====================

/// Returns to the previous state.
pub struct BackCommand;

impl Command for BackCommand {
    fn id(&self) -> &str {
        "back"
    }

    fn execute(&self, session: &mut Session, _args: &[String]) -> Step {
        Ok(Transition::To(session.previous_state()?))
    }
}

/// Enters the pending target of the active confirmation dialog.
pub struct ConfirmCommand;

impl Command for ConfirmCommand {
    fn id(&self) -> &str {
        "confirm"
    }

    fn execute(&self, session: &mut Session, _args: &[String]) -> Step {
        let current = session.current_state()?;
        match current.confirmation_target() {
            Some(target) => Ok(Transition::To(target)),
            None => Err(outside_dialog(session)),
        }
    }
}

/// Returns to the state that raised the active confirmation dialog.
pub struct CancelCommand;

impl Command for CancelCommand {
    fn id(&self) -> &str {
        "cancel"
    }

    fn execute(&self, session: &mut Session, _args: &[String]) -> Step {
        let current = session.current_state()?;
        if current.confirmation_target().is_none() {
            return Err(outside_dialog(session));
        }
        Ok(Transition::To(session.previous_state()?))
    }
}

fn outside_dialog(session: &mut Session) -> StepError {
    StepError {
        error: AppError::InvalidDialog,
        redirect: session.previous_state().ok(),
    }
}

/// Restarts the active game at its start state.
pub struct ExitCommand;

impl Command for ExitCommand {
    fn id(&self) -> &str {
        "exit"
    }

    fn execute(&self, session: &mut Session, _args: &[String]) -> Step {
        let game = session.active_game.clone().ok_or(AppError::NoActiveGame)?;
        Ok(Transition::To(game.start_state()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_time_label() {
        assert_eq!(
            build_time_label(Some("2024-03-05T14:07:09Z")),
            "05.03.2024 14:07:09"
        );
        assert_eq!(build_time_label(Some("dev")), "dev");
        assert_eq!(build_time_label(None), "-");
    }
}
