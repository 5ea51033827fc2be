//! States, commands and the machinery that moves between them.
//!
//! # Architecture
//!
//! - `state`: The `State` capability trait and step results
//! - `command`: The `Command` capability trait
//! - `stack`: Navigation history
//! - `registry`: Global and local command catalogs, input resolution
//! - `dialogs`: Confirmation dialog and numbered menus
//! - `builtin`: Framework states and commands

pub mod builtin;
mod command;
mod dialogs;
mod registry;
mod stack;
mod state;

pub use command::Command;
pub use dialogs::{ConfirmationDialog, Menu, MenuOption, Supplier};
pub use registry::{CommandInfo, CommandRegistry};
pub use stack::StateStack;
pub use state::{State, StateRef, Step, StepError, Transition};
