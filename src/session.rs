//! The run context every state and command operates on.

use std::rc::Rc;

use tracing::debug;

use crate::config::DataPaths;
use crate::console::Console;
use crate::error::{AppError, ErrorRenderer};
use crate::games::{Game, GameSession};
use crate::i18n::{Language, LocalizationManager, MessageLocalizer, StateLocalizer};
use crate::input::InputValidator;
use crate::navigation::{CommandRegistry, State, StateRef, StateStack};
use crate::random::RandomSource;
use crate::scope::Scope;
use crate::text::wrap_text;

/// Console, localization stores and input helpers.
///
/// The `*_msg` helpers are best-effort: a failed lookup renders the error to
/// the console and yields an empty string, so screens keep drawing.
pub struct Ui {
    console: Box<dyn Console>,
    pub manager: LocalizationManager,
    /// Core and application messages, plus per-game display sets
    pub messages: MessageLocalizer,
    /// Messages of the active game; replaced when the game ends
    pub game_messages: MessageLocalizer,
    pub states: StateLocalizer,
    pub commands: CommandRegistry,
    pub input: InputValidator,
    pub random: Box<dyn RandomSource>,
    notice: Option<String>,
    wrap_width: usize,
}

impl Ui {
    pub fn new(
        console: Box<dyn Console>,
        manager: LocalizationManager,
        random: Box<dyn RandomSource>,
        wrap_width: usize,
    ) -> Self {
        Self {
            console,
            manager,
            messages: MessageLocalizer::new(),
            game_messages: MessageLocalizer::new(),
            states: StateLocalizer::new(),
            commands: CommandRegistry::new(),
            input: InputValidator,
            random,
            notice: None,
            wrap_width,
        }
    }

    pub fn read_line(&mut self) -> Result<String, AppError> {
        self.console.read_line()
    }

    /// Write text, wrapped to the configured width.
    pub fn text(&mut self, text: &str) {
        let wrapped = wrap_text(text, self.wrap_width);
        self.console.write(&wrapped);
    }

    /// Write text followed by CRLF.
    pub fn line(&mut self, text: &str) {
        self.text(&format!("{}\r\n", text));
    }

    pub fn render_error(&self, error: &AppError) -> String {
        ErrorRenderer::new(&self.messages, &self.manager).render(error)
    }

    pub fn error(&mut self, error: &AppError) {
        let rendered = self.render_error(error);
        if !rendered.is_empty() {
            self.line(&rendered);
        }
    }

    /// Core or application message.
    pub fn msg(&mut self, key: &str) -> String {
        let result = self.messages.get(&self.manager, key).map(str::to_string);
        self.or_report(result)
    }

    /// Message of the active game.
    pub fn game_msg(&mut self, key: &str) -> String {
        let result = self.game_messages.get(&self.manager, key).map(str::to_string);
        self.or_report(result)
    }

    /// Entry of an optional message set, e.g. a game's display name.
    pub fn optional_msg(&mut self, set: &str, key: &str) -> String {
        let result = self
            .messages
            .get_optional(&self.manager, set, key)
            .map(str::to_string);
        self.or_report(result)
    }

    /// Message owned by `state`.
    pub fn state_msg(&mut self, state: &dyn State, key: &str) -> String {
        self.scoped_state_msg(state.scope(), state.id(), key)
    }

    /// Message owned by the state identified by `scope` and `id`.
    pub fn scoped_state_msg(&mut self, scope: Scope, id: &str, key: &str) -> String {
        let result = self
            .states
            .get_message(&self.manager, scope, id, key)
            .map(str::to_string);
        self.or_report(result)
    }

    pub fn state_description(&mut self, state: &dyn State) -> String {
        let result = self
            .states
            .get_description(&self.manager, state.scope(), state.id())
            .map(str::to_string);
        self.or_report(result)
    }

    /// Queue a line printed once the current turn has finished.
    pub fn set_notice(&mut self, text: impl Into<String>) {
        self.notice = Some(text.into());
    }

    pub fn flush_notice(&mut self) {
        if let Some(notice) = self.notice.take() {
            self.line(&notice);
        }
    }

    fn or_report(&mut self, result: Result<String, AppError>) -> String {
        result.unwrap_or_else(|error| {
            self.error(&error);
            String::new()
        })
    }
}

/// Navigation state, run flags, registered games and the UI.
pub struct Session {
    pub stack: StateStack,
    pub running: bool,
    /// Set to unwind to the start state after the current turn
    pub return_to_menu: bool,
    /// Root state of the application, set by the runtime
    pub start: Option<StateRef>,
    pub games: Vec<Rc<dyn Game>>,
    pub active_game: Option<Rc<dyn GameSession>>,
    pub paths: DataPaths,
    pub ui: Ui,
}

impl Session {
    pub fn new(paths: DataPaths, ui: Ui, games: Vec<Rc<dyn Game>>) -> Self {
        Self {
            stack: StateStack::new(),
            running: true,
            return_to_menu: false,
            start: None,
            games,
            active_game: None,
            paths,
            ui,
        }
    }

    pub fn current_state(&self) -> Result<StateRef, AppError> {
        self.stack.top().cloned().ok_or(AppError::StackEmpty)
    }

    /// Unwind past the current state; see [`StateStack::take_previous`].
    pub fn previous_state(&mut self) -> Result<StateRef, AppError> {
        self.stack.take_previous()
    }

    /// Switch the active language and rebuild the command indices for it.
    pub fn switch_language(&mut self, code: &str) -> Result<Language, AppError> {
        let language = self.ui.manager.set_language(code)?;
        self.ui.commands.rebuild(&self.ui.manager);
        debug!(language = language.code(), "Command indices rebuilt");
        Ok(language)
    }
}
