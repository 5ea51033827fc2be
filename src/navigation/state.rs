//! The state capability contract and the values a step produces.

use std::fmt;
use std::rc::Rc;

use crate::error::AppError;
use crate::navigation::Command;
use crate::scope::Scope;
use crate::session::Session;

/// Shared handle to a state. Two handles are the same state when they point
/// at the same allocation.
pub type StateRef = Rc<dyn State>;

/// Where navigation goes after a step.
#[derive(Debug)]
pub enum Transition {
    /// Keep the current state
    Stay,
    /// Enter another state
    To(StateRef),
}

impl Transition {
    pub fn to(state: impl State + 'static) -> Self {
        Transition::To(Rc::new(state))
    }
}

/// A failed step, optionally carrying the state to fall back to.
#[derive(Debug)]
pub struct StepError {
    pub error: AppError,
    pub redirect: Option<StateRef>,
}

impl StepError {
    pub fn redirect(error: AppError, to: StateRef) -> Self {
        Self {
            error,
            redirect: Some(to),
        }
    }
}

impl From<AppError> for StepError {
    fn from(error: AppError) -> Self {
        Self {
            error,
            redirect: None,
        }
    }
}

/// Result of handling input or executing a command.
pub type Step = Result<Transition, StepError>;

/// A screen of the application.
///
/// Every method except `id` has a default, so a state only implements what it
/// uses. States are created fresh for every transition and never shared
/// between two stack slots.
pub trait State {
    fn id(&self) -> &str;

    fn scope(&self) -> Scope {
        Scope::Core
    }

    /// Runs after the state is pushed. An error carrying a redirect replaces
    /// this state on the stack.
    fn init(&self, _session: &mut Session) -> Result<(), StepError> {
        Ok(())
    }

    fn display(&self, _session: &mut Session) {}

    /// Handle a line that did not resolve to a command.
    fn handle(&self, _session: &mut Session, _input: &str) -> Step {
        Ok(Transition::Stay)
    }

    fn requires_input(&self) -> bool {
        true
    }

    /// Local commands available while this state is active.
    fn commands(&self) -> Vec<Rc<dyn Command>> {
        Vec::new()
    }

    /// The pending target of a confirmation dialog; `None` for every other state.
    fn confirmation_target(&self) -> Option<StateRef> {
        None
    }
}

impl fmt::Debug for dyn State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.scope(), self.id())
    }
}
