//! "Guess the number": pick a range and a difficulty, then find the secret
//! number with a limited number of attempts and bigger/smaller hints.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::AppError;
use crate::games::{Game, GameSession};
use crate::navigation::builtin::{BackCommand, ExitCommand, GameExitState};
use crate::navigation::{Command, Menu, MenuOption, State, StateRef, Step, StepError, Transition};
use crate::random::RandomSource;
use crate::scope::Scope;
use crate::session::Session;
use crate::text::substitute_params;

pub const GAME_ID: &str = "guessnumber";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Difficulty {
    VeryEasy = 1,
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::VeryEasy,
        Difficulty::Easy,
        Difficulty::Medium,
        Difficulty::Hard,
        Difficulty::VeryHard,
    ];

    /// Menu number of the level.
    pub fn number(self) -> i32 {
        self as i32
    }

    pub fn from_number(number: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.number() == number)
    }

    /// Message key of the level name.
    pub fn key(self) -> &'static str {
        match self {
            Difficulty::VeryEasy => "very_easy",
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
            Difficulty::VeryHard => "very_hard",
        }
    }

    /// Upper bound of the random bonus added to the attempt count.
    pub fn modifier(self) -> i64 {
        match self {
            Difficulty::VeryEasy => 10,
            Difficulty::Easy => 8,
            Difficulty::Medium => 4,
            Difficulty::Hard => 2,
            Difficulty::VeryHard => 0,
        }
    }
}

/// Settings and progress of one play-through.
#[derive(Debug, Clone)]
pub struct GuessData {
    /// Smallest allowed distance between the range bounds
    pub min_range_size: i32,
    pub lowest: i32,
    pub highest: i32,
    pub difficulty: Difficulty,
    pub min: i32,
    pub max: i32,
    secret: i32,
    attempts: i32,
    won: bool,
}

impl Default for GuessData {
    fn default() -> Self {
        Self {
            min_range_size: 20,
            lowest: 0,
            highest: i32::MAX,
            difficulty: Difficulty::Medium,
            min: 1,
            max: 100,
            secret: 0,
            attempts: 0,
            won: false,
        }
    }
}

impl GuessData {
    /// Draw a secret number and an attempt budget for a new round.
    pub fn prepare(&mut self, random: &mut dyn RandomSource) -> Result<(), AppError> {
        self.won = false;
        self.secret = random.generate(self.min.into(), self.max.into())?;
        self.attempts = self.calculate_attempts(random)?;
        Ok(())
    }

    /// `round(log2(range size))` plus a random bonus up to the difficulty modifier.
    pub fn calculate_attempts(&self, random: &mut dyn RandomSource) -> Result<i32, AppError> {
        let size = i64::from(self.max) - i64::from(self.min) + 1;
        if size < 1 || size > i64::from(self.highest) {
            return Err(AppError::InvalidRange {
                min: self.min.into(),
                max: self.max.into(),
            });
        }
        let base = (size as f64).log2().round() as i32;
        let bonus = random.generate(0, self.difficulty.modifier())?;
        Ok(base + bonus)
    }

    pub fn make_guess(&mut self, guess: i32) {
        self.attempts -= 1;
        if guess == self.secret {
            self.won = true;
        }
    }

    /// State message key describing where the secret lies relative to `guess`.
    pub fn hint(&self, guess: i32) -> &'static str {
        match guess.cmp(&self.secret) {
            std::cmp::Ordering::Less => "hint_bigger",
            std::cmp::Ordering::Greater => "hint_smaller",
            std::cmp::Ordering::Equal => "you_guessed",
        }
    }

    pub fn attempts(&self) -> i32 {
        self.attempts
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn is_lost(&self) -> bool {
        self.attempts < 1
    }
}

type Shared = Rc<RefCell<GuessData>>;

pub struct GuessNumber;

impl Game for GuessNumber {
    fn id(&self) -> &str {
        GAME_ID
    }

    fn new_session(&self) -> Rc<dyn GameSession> {
        Rc::new(GuessSession {
            data: Rc::new(RefCell::new(GuessData::default())),
        })
    }
}

pub struct GuessSession {
    data: Shared,
}

impl GameSession for GuessSession {
    fn start_state(&self) -> StateRef {
        Rc::new(StartState {
            data: Rc::clone(&self.data),
        })
    }
}

fn game_msg_or_key(session: &Session, key: &str) -> String {
    session
        .ui
        .game_messages
        .get(&session.ui.manager, key)
        .unwrap_or(key)
        .to_string()
}

// ==================== States ====================

struct StartState {
    data: Shared,
}

impl State for StartState {
    fn id(&self) -> &str {
        "start"
    }

    fn scope(&self) -> Scope {
        Scope::Game
    }

    fn handle(&self, _session: &mut Session, _input: &str) -> Step {
        Ok(Transition::To(main_menu(&self.data)))
    }

    fn requires_input(&self) -> bool {
        false
    }
}

fn main_menu(data: &Shared) -> StateRef {
    let (start, difficulty, params) = (Rc::clone(data), Rc::clone(data), Rc::clone(data));
    Rc::new(Menu::new(
        Scope::Game,
        "main_menu",
        vec![
            MenuOption::new(0, "exit_option", |_| Rc::new(GameExitState)),
            MenuOption::new(1, "start_game", move |_| {
                Rc::new(SelectMinNumberState {
                    data: Rc::clone(&start),
                })
            })
            .with_params(move |session| {
                let key = params.borrow().difficulty.key();
                vec![("difficulty".to_string(), game_msg_or_key(session, key))]
            }),
            MenuOption::new(2, "select_difficulty", move |_| {
                Rc::new(SelectDifficultyState {
                    data: Rc::clone(&difficulty),
                })
            }),
        ],
    ))
}

fn end_menu(data: &Shared) -> StateRef {
    let (retry, difficulty, menu) = (Rc::clone(data), Rc::clone(data), Rc::clone(data));
    Rc::new(Menu::new(
        Scope::Game,
        "end_game_menu",
        vec![
            MenuOption::new(1, "retry", move |_| {
                Rc::new(StartGameState {
                    data: Rc::clone(&retry),
                })
            }),
            MenuOption::new(2, "change_difficulty", move |_| {
                Rc::new(SelectDifficultyState {
                    data: Rc::clone(&difficulty),
                })
            }),
            MenuOption::new(3, "main_menu", move |_| main_menu(&menu)),
        ],
    ))
}

fn show_bound_prompt(state: &dyn State, session: &mut Session, current: i32) {
    let prompt = session.ui.state_msg(state, "prompt");
    session.ui.line(&prompt);
    let press_enter = session.ui.game_msg("press_enter");
    session.ui.line(&press_enter);
    let value = session.ui.game_msg("current_value");
    session
        .ui
        .line(&substitute_params(&value, &[("value", current.to_string())]));
}

/// Lower bound of the guessing range; blank keeps the current value.
struct SelectMinNumberState {
    data: Shared,
}

impl State for SelectMinNumberState {
    fn id(&self) -> &str {
        "select_min_number"
    }

    fn scope(&self) -> Scope {
        Scope::Game
    }

    fn display(&self, session: &mut Session) {
        let current = self.data.borrow().min;
        show_bound_prompt(self, session, current);
    }

    fn handle(&self, session: &mut Session, input: &str) -> Step {
        let (current, lowest, highest) = {
            let data = self.data.borrow();
            (data.min, data.lowest, data.highest)
        };
        let min = session
            .ui
            .input
            .parse_optional_int_in_range(input, current, lowest, highest)?;
        self.data.borrow_mut().min = min;
        Ok(Transition::to(SelectMaxNumberState {
            data: Rc::clone(&self.data),
        }))
    }

    fn commands(&self) -> Vec<Rc<dyn Command>> {
        vec![Rc::new(BackCommand)]
    }
}

/// Upper bound of the guessing range; must leave room for the minimum range size.
struct SelectMaxNumberState {
    data: Shared,
}

impl State for SelectMaxNumberState {
    fn id(&self) -> &str {
        "select_max_number"
    }

    fn scope(&self) -> Scope {
        Scope::Game
    }

    fn display(&self, session: &mut Session) {
        let current = self.data.borrow().max;
        show_bound_prompt(self, session, current);
    }

    fn handle(&self, session: &mut Session, input: &str) -> Step {
        let (current, min, highest, min_range_size) = {
            let data = self.data.borrow();
            (data.max, data.min, data.highest, data.min_range_size)
        };
        let max = session
            .ui
            .input
            .parse_optional_int_in_range(input, current, min, highest)?;

        if i64::from(max) - i64::from(min) < i64::from(min_range_size) {
            let text = session.ui.state_msg(self, "range_too_small");
            session.ui.line(&substitute_params(
                &text,
                &[("size", min_range_size.to_string())],
            ));
            return Ok(Transition::Stay);
        }

        self.data.borrow_mut().max = max;
        Ok(Transition::to(StartGameState {
            data: Rc::clone(&self.data),
        }))
    }

    fn commands(&self) -> Vec<Rc<dyn Command>> {
        vec![Rc::new(BackCommand)]
    }
}

/// Draws the secret number and announces the round.
struct StartGameState {
    data: Shared,
}

impl State for StartGameState {
    fn id(&self) -> &str {
        "start_game"
    }

    fn scope(&self) -> Scope {
        Scope::Game
    }

    fn init(&self, session: &mut Session) -> Result<(), StepError> {
        self.data
            .borrow_mut()
            .prepare(session.ui.random.as_mut())
            .map_err(|error| StepError::redirect(error, main_menu(&self.data)))
    }

    fn display(&self, session: &mut Session) {
        let params = {
            let data = self.data.borrow();
            [
                ("min", data.min.to_string()),
                ("max", data.max.to_string()),
                ("attempts", data.attempts().to_string()),
            ]
        };
        let text = session.ui.state_msg(self, "game_start");
        session.ui.line(&substitute_params(&text, &params));
    }

    fn handle(&self, _session: &mut Session, _input: &str) -> Step {
        Ok(Transition::to(GuessState {
            data: Rc::clone(&self.data),
        }))
    }

    fn requires_input(&self) -> bool {
        false
    }
}

/// The guessing itself.
struct GuessState {
    data: Shared,
}

impl State for GuessState {
    fn id(&self) -> &str {
        "game"
    }

    fn scope(&self) -> Scope {
        Scope::Game
    }

    fn display(&self, session: &mut Session) {
        let attempts = self.data.borrow().attempts();
        let text = session.ui.state_msg(self, "attempts_left");
        session
            .ui
            .line(&substitute_params(&text, &[("attempts", attempts.to_string())]));
    }

    fn handle(&self, session: &mut Session, input: &str) -> Step {
        let (min, max) = {
            let data = self.data.borrow();
            (data.min, data.max)
        };
        let guess = session.ui.input.parse_int_in_range(input, min, max)?;

        let hint = {
            let mut data = self.data.borrow_mut();
            data.make_guess(guess);
            if data.is_won() || data.is_lost() {
                None
            } else {
                Some(data.hint(guess))
            }
        };

        match hint {
            Some(key) => {
                let text = session.ui.state_msg(self, key);
                session.ui.line(&text);
                Ok(Transition::Stay)
            }
            None => Ok(Transition::to(EndGameState {
                data: Rc::clone(&self.data),
            })),
        }
    }

    fn commands(&self) -> Vec<Rc<dyn Command>> {
        vec![
            Rc::new(ExitCommand),
            Rc::new(RestartCommand {
                data: Rc::clone(&self.data),
            }),
        ]
    }
}

/// Announces the result.
struct EndGameState {
    data: Shared,
}

impl State for EndGameState {
    fn id(&self) -> &str {
        "end_game"
    }

    fn scope(&self) -> Scope {
        Scope::Game
    }

    fn display(&self, session: &mut Session) {
        let (key, secret) = {
            let data = self.data.borrow();
            (if data.is_won() { "win" } else { "loss" }, data.secret)
        };
        let text = session.ui.state_msg(self, key);
        session
            .ui
            .line(&substitute_params(&text, &[("number", secret.to_string())]));
    }

    fn handle(&self, _session: &mut Session, _input: &str) -> Step {
        Ok(Transition::To(end_menu(&self.data)))
    }

    fn requires_input(&self) -> bool {
        false
    }
}

struct SelectDifficultyState {
    data: Shared,
}

impl State for SelectDifficultyState {
    fn id(&self) -> &str {
        "select_difficulty_menu"
    }

    fn scope(&self) -> Scope {
        Scope::Game
    }

    fn display(&self, session: &mut Session) {
        let prompt = session.ui.state_msg(self, "prompt");
        session.ui.line(&prompt);
        for difficulty in Difficulty::ALL {
            let name = session.ui.game_msg(difficulty.key());
            session
                .ui
                .line(&format!("{}. {}.", difficulty.number(), name));
        }
    }

    fn handle(&self, session: &mut Session, input: &str) -> Step {
        let Ok(number) = session.ui.input.parse_int(input) else {
            let notice = session.ui.state_msg(self, "invalid_input");
            session.ui.set_notice(notice);
            return Ok(Transition::Stay);
        };
        let Some(difficulty) = Difficulty::from_number(number) else {
            let notice = session.ui.state_msg(self, "invalid_option");
            session.ui.set_notice(notice);
            return Ok(Transition::Stay);
        };

        self.data.borrow_mut().difficulty = difficulty;
        let name = session.ui.game_msg(difficulty.key());
        let selected = session.ui.state_msg(self, "selected");
        session
            .ui
            .line(&substitute_params(&selected, &[("difficulty", name)]));
        Ok(Transition::To(session.previous_state()?))
    }

    fn commands(&self) -> Vec<Rc<dyn Command>> {
        vec![Rc::new(BackCommand)]
    }
}

// ==================== Commands ====================

/// Starts a new round with the current settings.
struct RestartCommand {
    data: Shared,
}

impl Command for RestartCommand {
    fn id(&self) -> &str {
        "restart"
    }

    fn scope(&self) -> Scope {
        Scope::Game
    }

    fn execute(&self, _session: &mut Session, _args: &[String]) -> Step {
        Ok(Transition::to(StartGameState {
            data: Rc::clone(&self.data),
        }))
    }
}
