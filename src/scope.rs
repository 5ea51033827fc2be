//! Namespace partition shared by states, commands and localization lookups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The namespace a state or command belongs to.
///
/// Every state and command declares exactly one scope. The scope is part of
/// the localization lookup key, so the same id may exist in several scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Framework states and commands
    Core,
    /// Application screens
    App,
    /// Per-title game states and commands
    Game,
}

impl Scope {
    /// All scopes, in declaration order.
    pub const ALL: [Scope; 3] = [Scope::Core, Scope::App, Scope::Game];

    /// The lowercase key used in localization documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Core => "core",
            Scope::App => "app",
            Scope::Game => "game",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scope::ALL
            .into_iter()
            .find(|scope| scope.as_str() == s)
            .ok_or_else(|| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_roundtrip_through_str() {
        for scope in Scope::ALL {
            assert_eq!(scope.as_str().parse::<Scope>(), Ok(scope));
        }
    }

    #[test]
    fn test_unknown_scope_rejected() {
        assert_eq!("system".parse::<Scope>(), Err("system".to_string()));
        assert!("Core".parse::<Scope>().is_err());
    }

    #[test]
    fn test_scope_display() {
        assert_eq!(Scope::Game.to_string(), "game");
    }
}
