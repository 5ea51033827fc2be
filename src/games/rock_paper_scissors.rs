//! "Rock, paper, scissors" against a random bot over a chosen number of rounds.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::AppError;
use crate::games::{Game, GameSession};
use crate::navigation::builtin::{BackCommand, ExitCommand, GameExitState};
use crate::navigation::{Command, Menu, MenuOption, State, StateRef, Step, Transition};
use crate::random::RandomSource;
use crate::scope::Scope;
use crate::session::Session;
use crate::text::substitute_params;

pub const GAME_ID: &str = "rockpaperscissors";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    Rock,
    Scissors,
    Paper,
}

impl Move {
    /// Move chosen by the player's menu number.
    pub fn from_number(number: i32) -> Option<Self> {
        match number {
            1 => Some(Move::Rock),
            2 => Some(Move::Scissors),
            3 => Some(Move::Paper),
            _ => None,
        }
    }

    /// Message key of the move name.
    pub fn key(self) -> &'static str {
        match self {
            Move::Rock => "rock",
            Move::Scissors => "scissors",
            Move::Paper => "paper",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundResult {
    Win,
    Loss,
    Draw,
}

/// Outcome for the player, indexed by player move then bot move.
const WIN_TABLE: [[RoundResult; 3]; 3] = [
    [RoundResult::Draw, RoundResult::Win, RoundResult::Loss],
    [RoundResult::Loss, RoundResult::Draw, RoundResult::Win],
    [RoundResult::Win, RoundResult::Loss, RoundResult::Draw],
];

pub fn round_result(player: Move, bot: Move) -> RoundResult {
    WIN_TABLE[player.index()][bot.index()]
}

/// Settings and score of one match.
#[derive(Debug, Clone)]
pub struct RpsData {
    pub total_rounds: i32,
    pub min_rounds: i32,
    pub max_rounds: i32,
    current_round: i32,
    player_score: i32,
    bot_score: i32,
}

impl Default for RpsData {
    fn default() -> Self {
        Self {
            total_rounds: 3,
            min_rounds: 3,
            max_rounds: 100,
            current_round: 1,
            player_score: 0,
            bot_score: 0,
        }
    }
}

impl RpsData {
    pub fn reset(&mut self) {
        self.current_round = 1;
        self.player_score = 0;
        self.bot_score = 0;
    }

    /// Draw the bot's move; each move covers a third of 1..=3000.
    pub fn bot_move(random: &mut dyn RandomSource) -> Result<Move, AppError> {
        let roll = random.generate(1, 3000)?;
        Ok(match roll {
            ..=1000 => Move::Rock,
            1001..=2000 => Move::Scissors,
            _ => Move::Paper,
        })
    }

    /// Score one round. A draw gives both sides a point.
    pub fn play_round(&mut self, player: Move, bot: Move) -> RoundResult {
        self.current_round += 1;
        let result = round_result(player, bot);
        match result {
            RoundResult::Win => self.player_score += 1,
            RoundResult::Loss => self.bot_score += 1,
            RoundResult::Draw => {
                self.player_score += 1;
                self.bot_score += 1;
            }
        }
        result
    }

    pub fn is_over(&self) -> bool {
        self.current_round > self.total_rounds
    }

    pub fn is_won(&self) -> bool {
        self.player_score > self.bot_score
    }

    pub fn is_lost(&self) -> bool {
        self.player_score < self.bot_score
    }

    fn score_params(&self) -> [(&'static str, String); 2] {
        [
            ("player", self.player_score.to_string()),
            ("bot", self.bot_score.to_string()),
        ]
    }
}

type Shared = Rc<RefCell<RpsData>>;

pub struct RockPaperScissors;

impl Game for RockPaperScissors {
    fn id(&self) -> &str {
        GAME_ID
    }

    fn new_session(&self) -> Rc<dyn GameSession> {
        Rc::new(RpsSession {
            data: Rc::new(RefCell::new(RpsData::default())),
        })
    }
}

pub struct RpsSession {
    data: Shared,
}

impl GameSession for RpsSession {
    fn start_state(&self) -> StateRef {
        Rc::new(StartState {
            data: Rc::clone(&self.data),
        })
    }
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
    let (start, rounds, params) = (Rc::clone(data), Rc::clone(data), Rc::clone(data));
    Rc::new(Menu::new(
        Scope::Game,
        "main_menu",
        vec![
            MenuOption::new(0, "exit_option", |_| Rc::new(GameExitState)),
            MenuOption::new(1, "start_game", move |_| {
                start.borrow_mut().reset();
                Rc::new(GameState {
                    data: Rc::clone(&start),
                })
            })
            .with_params(move |_| {
                vec![("rounds".to_string(), params.borrow().total_rounds.to_string())]
            }),
            MenuOption::new(2, "select_rounds", move |_| {
                Rc::new(SelectRoundsState {
                    data: Rc::clone(&rounds),
                })
            }),
        ],
    ))
}

/// One throw per turn until every round is played.
struct GameState {
    data: Shared,
}

impl State for GameState {
    fn id(&self) -> &str {
        "game"
    }

    fn scope(&self) -> Scope {
        Scope::Game
    }

    fn display(&self, session: &mut Session) {
        let (score, round) = {
            let data = self.data.borrow();
            (
                data.score_params(),
                [
                    ("current", data.current_round.to_string()),
                    ("total", data.total_rounds.to_string()),
                ],
            )
        };
        let text = session.ui.state_msg(self, "score");
        session.ui.line(&substitute_params(&text, &score));
        let text = session.ui.state_msg(self, "current_round");
        session.ui.line(&substitute_params(&text, &round));
        let prompt = session.ui.state_msg(self, "prompt");
        session.ui.line(&prompt);
    }

    fn handle(&self, session: &mut Session, input: &str) -> Step {
        let number = session.ui.input.parse_int(input)?;
        let Some(player) = Move::from_number(number) else {
            let notice = session.ui.state_msg(self, "invalid_option");
            session.ui.set_notice(notice);
            return Ok(Transition::Stay);
        };
        let bot = RpsData::bot_move(session.ui.random.as_mut())?;

        let player_name = session.ui.game_msg(player.key());
        let bot_name = session.ui.game_msg(bot.key());
        let moves = session.ui.state_msg(self, "moves_info");
        session.ui.line(&substitute_params(
            &moves,
            &[("player", player_name), ("bot", bot_name)],
        ));

        let (result, over) = {
            let mut data = self.data.borrow_mut();
            let result = data.play_round(player, bot);
            (result, data.is_over())
        };
        let key = match result {
            RoundResult::Win => "round_win",
            RoundResult::Loss => "round_loss",
            RoundResult::Draw => "round_draw",
        };
        let text = session.ui.state_msg(self, key);
        session.ui.line(&text);

        if over {
            Ok(Transition::to(EndGameState {
                data: Rc::clone(&self.data),
            }))
        } else {
            Ok(Transition::Stay)
        }
    }

    fn commands(&self) -> Vec<Rc<dyn Command>> {
        vec![Rc::new(ExitCommand)]
    }
}

/// Final score, then back to the game menu for a rematch.
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
        let (score, key) = {
            let data = self.data.borrow();
            let key = if data.is_won() {
                "win"
            } else if data.is_lost() {
                "loss"
            } else {
                "draw"
            };
            (data.score_params(), key)
        };
        let text = session.ui.state_msg(self, "score");
        session.ui.line(&substitute_params(&text, &score));
        let text = session.ui.state_msg(self, key);
        session.ui.line(&text);
    }

    fn handle(&self, _session: &mut Session, _input: &str) -> Step {
        Ok(Transition::To(main_menu(&self.data)))
    }

    fn requires_input(&self) -> bool {
        false
    }
}

/// Number of rounds per match; blank keeps the current value.
struct SelectRoundsState {
    data: Shared,
}

impl State for SelectRoundsState {
    fn id(&self) -> &str {
        "select_rounds"
    }

    fn scope(&self) -> Scope {
        Scope::Game
    }

    fn display(&self, session: &mut Session) {
        let current = self.data.borrow().total_rounds;
        let prompt = session.ui.state_msg(self, "prompt");
        session.ui.line(&prompt);
        let value = session.ui.state_msg(self, "current_value");
        session
            .ui
            .line(&substitute_params(&value, &[("value", current.to_string())]));
    }

    fn handle(&self, session: &mut Session, input: &str) -> Step {
        let (current, min, max) = {
            let data = self.data.borrow();
            (data.total_rounds, data.min_rounds, data.max_rounds)
        };
        let rounds = session
            .ui
            .input
            .parse_optional_int_in_range(input, current, min, max)?;
        self.data.borrow_mut().total_rounds = rounds;

        let selected = session.ui.state_msg(self, "selected");
        session
            .ui
            .set_notice(substitute_params(&selected, &[("rounds", rounds.to_string())]));
        Ok(Transition::To(session.previous_state()?))
    }

    fn commands(&self) -> Vec<Rc<dyn Command>> {
        vec![Rc::new(BackCommand)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::check_bounds;

    /// Replays a fixed list of rolls.
    struct Rolls(Vec<i32>);

    impl RandomSource for Rolls {
        fn generate(&mut self, min: i64, max: i64) -> Result<i32, AppError> {
            check_bounds(min, max)?;
            Ok(self.0.remove(0))
        }
    }

    #[test]
    fn test_win_table() {
        use Move::*;
        assert_eq!(round_result(Rock, Scissors), RoundResult::Win);
        assert_eq!(round_result(Scissors, Paper), RoundResult::Win);
        assert_eq!(round_result(Paper, Rock), RoundResult::Win);
        assert_eq!(round_result(Scissors, Rock), RoundResult::Loss);
        assert_eq!(round_result(Paper, Scissors), RoundResult::Loss);
        assert_eq!(round_result(Rock, Paper), RoundResult::Loss);
        for m in [Rock, Scissors, Paper] {
            assert_eq!(round_result(m, m), RoundResult::Draw);
        }
    }

    #[test]
    fn test_bot_move_buckets() {
        let mut rolls = Rolls(vec![1, 1000, 1001, 2000, 2001, 3000]);
        let moves: Vec<Move> = (0..6)
            .map(|_| RpsData::bot_move(&mut rolls).unwrap())
            .collect();
        assert_eq!(
            moves,
            vec![
                Move::Rock,
                Move::Rock,
                Move::Scissors,
                Move::Scissors,
                Move::Paper,
                Move::Paper
            ]
        );
    }

    #[test]
    fn test_move_numbers() {
        assert_eq!(Move::from_number(1), Some(Move::Rock));
        assert_eq!(Move::from_number(3), Some(Move::Paper));
        assert_eq!(Move::from_number(0), None);
        assert_eq!(Move::from_number(4), None);
    }

    #[test]
    fn test_match_scoring() {
        let mut data = RpsData::default();
        assert_eq!(data.play_round(Move::Rock, Move::Rock), RoundResult::Draw);
        assert_eq!(data.play_round(Move::Scissors, Move::Rock), RoundResult::Loss);
        assert!(!data.is_over());
        assert_eq!(data.play_round(Move::Paper, Move::Rock), RoundResult::Win);
        assert!(data.is_over());
        // Draws score for both sides.
        assert_eq!((data.player_score, data.bot_score), (2, 2));
        assert!(!data.is_won() && !data.is_lost());

        data.reset();
        assert_eq!((data.current_round, data.player_score, data.bot_score), (1, 0, 0));
    }
}
