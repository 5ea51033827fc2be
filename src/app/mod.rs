//! Application screens: the root start state and the menus around the games.

mod states;

pub use states::{main_menu, GameSelectionMenu, LanguageSelectionMenu, StartState};
