//! The command capability contract.

use crate::navigation::Step;
use crate::scope::Scope;
use crate::session::Session;

/// An action the player invokes by (localized) name or alias.
pub trait Command {
    fn id(&self) -> &str;

    fn scope(&self) -> Scope {
        Scope::Core
    }

    /// Run the command. `args` holds the tokens after the command word.
    fn execute(&self, session: &mut Session, args: &[String]) -> Step;
}

impl std::fmt::Debug for dyn Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.scope(), self.id())
    }
}
