//! Game contracts and the bundled titles.

pub mod guess_number;
pub mod rock_paper_scissors;

use std::rc::Rc;

use crate::navigation::StateRef;

/// A title listed in the game selection menu.
pub trait Game {
    /// Identifier used for data paths and display sets.
    fn id(&self) -> &str;

    /// Fresh play-through with default settings.
    fn new_session(&self) -> Rc<dyn GameSession>;
}

/// One play-through of a game.
pub trait GameSession {
    fn start_state(&self) -> StateRef;
}

/// Every bundled title, in menu order.
pub fn available() -> Vec<Rc<dyn Game>> {
    vec![
        Rc::new(guess_number::GuessNumber),
        Rc::new(rock_paper_scissors::RockPaperScissors),
    ]
}
