//! Bootstrap, the transition controller and the main loop.

use std::rc::Rc;

use tracing::{debug, info};

use crate::config::{Config, DataPaths};
use crate::console::Console;
use crate::error::AppError;
use crate::games::Game;
use crate::i18n::LocalizationManager;
use crate::navigation::builtin::{global_commands, ExitState};
use crate::navigation::{StateRef, StepError, Transition};
use crate::random::RandomSource;
use crate::session::{Session, Ui};

/// Enter `candidate`: push it, run its `init`, then register its local commands.
///
/// When `init` fails with a redirect, the candidate is replaced on the stack by
/// the redirect target (whose own `init` does not run) and the error is
/// returned. A failed command registration is returned too, but the
/// transition has already happened.
pub fn go_to_state(session: &mut Session, candidate: StateRef) -> Result<(), AppError> {
    debug!(scope = %candidate.scope(), state = candidate.id(), "Entering state");
    session.stack.push(Rc::clone(&candidate));

    if let Err(StepError { error, redirect }) = candidate.init(session) {
        if let Some(replacement) = redirect {
            session.stack.pop();
            debug!(
                from = candidate.id(),
                to = replacement.id(),
                error = %error,
                "Init redirected"
            );
            session.stack.push(replacement);
        }
        return Err(error);
    }

    let commands = candidate.commands();
    let ui = &mut session.ui;
    ui.commands.register_local(&ui.manager, commands)
}

fn same_state(a: &StateRef, b: &StateRef) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

/// Owns the session and drives it turn by turn.
pub struct Runtime {
    session: Session,
    start: StateRef,
}

impl Runtime {
    pub fn new(
        config: &Config,
        console: Box<dyn Console>,
        random: Box<dyn RandomSource>,
        games: Vec<Rc<dyn Game>>,
        start: StateRef,
    ) -> Result<Self, AppError> {
        let manager = LocalizationManager::new(&config.default_language)?;
        let ui = Ui::new(console, manager, random, config.wrap_width);
        let mut session = Session::new(config.paths(), ui, games);
        session.start = Some(Rc::clone(&start));
        Ok(Self { session, start })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Load the core catalogs and register the global commands.
    ///
    /// A failure is rendered to the console before it is returned; the caller
    /// must not start the loop afterwards.
    pub fn bootstrap(&mut self) -> Result<(), AppError> {
        let paths = self.session.paths.clone();
        if let Err(error) = load_core(&mut self.session.ui, &paths) {
            self.session.ui.error(&error);
            return Err(error);
        }
        info!(
            languages = self.session.ui.manager.available_languages().len(),
            "Core localization loaded"
        );
        Ok(())
    }

    /// Enter the start state and run turns until a state stops the loop.
    pub fn run(&mut self) {
        self.enter(Rc::clone(&self.start));
        while self.session.running {
            self.turn();
        }
        info!("Main loop finished");
    }

    /// One turn: display, read, dispatch, transition.
    pub fn turn(&mut self) {
        let current = match self.session.current_state() {
            Ok(state) => state,
            Err(error) => {
                self.session.ui.error(&error);
                self.reset_to_start();
                return;
            }
        };
        current.display(&mut self.session);

        let mut input = String::new();
        if current.requires_input() {
            match self.session.ui.read_line() {
                Ok(line) => input = line,
                Err(error) => {
                    self.session.ui.error(&error);
                    if error.is_end_of_input() {
                        self.enter(Rc::new(ExitState));
                    }
                    return;
                }
            }
        }

        let input = input.trim();
        let resolved = self.session.ui.commands.resolve(input);
        let step = match resolved {
            Some((command, args)) => {
                debug!(command = command.id(), args = args.len(), "Command resolved");
                command.execute(&mut self.session, &args)
            }
            None => current.handle(&mut self.session, input),
        };

        let (next, error) = match step {
            Ok(Transition::Stay) => (None, None),
            Ok(Transition::To(next)) => (Some(next), None),
            Err(StepError { error, redirect }) => (redirect, Some(error)),
        };

        let mut navigated = false;
        if let Some(error) = &error {
            self.session.ui.error(error);
            if error.is_stack_error() {
                self.reset_to_start();
                navigated = true;
            }
        }

        if self.session.return_to_menu {
            self.session.return_to_menu = false;
            self.reset_to_start();
        } else if !navigated {
            if let Some(next) = next.filter(|next| !same_state(next, &current)) {
                if same_state(&next, &self.start) {
                    self.session.stack.clear();
                }
                self.enter(next);
            }
        }

        self.session.ui.flush_notice();
    }

    fn enter(&mut self, state: StateRef) {
        if let Err(error) = go_to_state(&mut self.session, state) {
            self.session.ui.error(&error);
        }
    }

    fn reset_to_start(&mut self) {
        debug!("Navigation reset to start state");
        self.session.stack.clear();
        self.enter(Rc::clone(&self.start));
    }
}

fn load_core(ui: &mut Ui, paths: &DataPaths) -> Result<(), AppError> {
    let messages = paths.core_messages();
    ui.messages
        .load(&mut ui.manager, &messages, paths.namespace_of(&messages))?;

    let states = paths.core_states();
    ui.states
        .load(&mut ui.manager, &states, paths.namespace_of(&states))?;

    let global = paths.core_global_commands();
    ui.commands
        .load_global_translations(&mut ui.manager, &global, paths.namespace_of(&global))?;
    ui.commands.register_global(&ui.manager, global_commands())?;

    let local = paths.core_local_commands();
    ui.commands
        .load_local_translations(&mut ui.manager, &local, paths.namespace_of(&local))
}
