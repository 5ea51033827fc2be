//! Line-oriented console transport.
//!
//! [`StdConsole`] reads stdin on a dedicated thread. Lines, end of input and
//! interrupt requests all travel over one channel, so an interrupt only takes
//! effect where the main loop blocks waiting for the next line.
//!
//! On an interactive terminal the reader switches to raw mode and edits the
//! line with [`LineEditor`]; piped input is read line by line.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::io::{self, BufRead, IsTerminal, Write};
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crossterm::cursor::MoveToColumn;
use crossterm::event::{self, Event};
use crossterm::style::Print;
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::queue;
use tracing::{debug, error, warn};

use crate::editor::{EditOutcome, LineEditor};
use crate::error::AppError;

/// Prompt written before every read.
pub const PROMPT: &str = "> ";

/// One line in, text out.
pub trait Console {
    /// Block until the next line (without its terminator) is available.
    ///
    /// # Returns
    /// * `Err(AppError::EndOfInput)` on end of input or interrupt
    fn read_line(&mut self) -> Result<String, AppError>;

    fn write(&mut self, text: &str);
}

enum InputEvent {
    Line(String),
    Eof,
    Interrupt,
    Failed(String),
}

/// Requests the console to stop waiting for input.
#[derive(Clone)]
pub struct InterruptHandle {
    sender: Sender<InputEvent>,
}

impl InterruptHandle {
    pub fn interrupt(&self) {
        debug!("Interrupt requested");
        // The console is gone once the loop has finished.
        let _ = self.sender.send(InputEvent::Interrupt);
    }
}

/// Console over the process's stdin and stdout.
pub struct StdConsole {
    events: Receiver<InputEvent>,
    closed: bool,
    raw_mode: bool,
}

impl StdConsole {
    /// Start the stdin reader thread.
    pub fn spawn() -> (Self, InterruptHandle) {
        let (sender, events) = mpsc::channel();
        let reader = sender.clone();

        let raw_mode = io::stdin().is_terminal() && enter_raw_mode();
        if raw_mode {
            thread::spawn(move || read_keys(reader));
        } else {
            thread::spawn(move || read_lines(reader));
        }

        (
            Self {
                events,
                closed: false,
                raw_mode,
            },
            InterruptHandle { sender },
        )
    }
}

impl Drop for StdConsole {
    fn drop(&mut self) {
        if self.raw_mode {
            if let Err(e) = terminal::disable_raw_mode() {
                error!(error = %e, "Failed to restore the terminal");
            }
        }
    }
}

fn enter_raw_mode() -> bool {
    match terminal::enable_raw_mode() {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "Line editing unavailable, reading plain lines");
            false
        }
    }
}

fn read_lines(sender: Sender<InputEvent>) {
    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        line.clear();
        let event = match stdin.lock().read_line(&mut line) {
            Ok(0) => InputEvent::Eof,
            Ok(_) => InputEvent::Line(line.trim_end_matches(&['\r', '\n'][..]).to_string()),
            Err(e) => InputEvent::Failed(e.to_string()),
        };
        let last = !matches!(event, InputEvent::Line(_));
        if sender.send(event).is_err() || last {
            break;
        }
    }
}

fn read_keys(sender: Sender<InputEvent>) {
    let mut editor = LineEditor::new();
    loop {
        let outcome = match event::read() {
            Ok(Event::Key(key)) => editor.handle_key(key),
            Ok(_) => continue,
            Err(e) => {
                let _ = sender.send(InputEvent::Failed(e.to_string()));
                break;
            }
        };
        let input = match outcome {
            EditOutcome::Pending => {
                redraw(&editor);
                continue;
            }
            EditOutcome::Submit(line) => {
                echo("\r\n");
                InputEvent::Line(line)
            }
            EditOutcome::Interrupt => {
                echo("\r\n");
                InputEvent::Interrupt
            }
            EditOutcome::Eof => InputEvent::Eof,
        };
        let last = !matches!(input, InputEvent::Line(_));
        if sender.send(input).is_err() || last {
            break;
        }
    }
}

fn redraw(editor: &LineEditor) {
    let column = PROMPT.chars().count() + editor.cursor();
    let mut stdout = io::stdout().lock();
    let result = queue!(
        stdout,
        MoveToColumn(0),
        Clear(ClearType::CurrentLine),
        Print(PROMPT),
        Print(editor.line()),
        MoveToColumn(u16::try_from(column).unwrap_or(u16::MAX)),
    )
    .and_then(|_| stdout.flush());
    if let Err(e) = result {
        error!(error = %e, "Failed to redraw the input line");
    }
}

fn echo(text: &str) {
    let mut stdout = io::stdout().lock();
    if let Err(e) = stdout.write_all(text.as_bytes()).and_then(|_| stdout.flush()) {
        error!(error = %e, "Failed to write to stdout");
    }
}

impl Console for StdConsole {
    fn read_line(&mut self) -> Result<String, AppError> {
        if self.closed {
            return Err(AppError::EndOfInput);
        }
        self.write(PROMPT);

        match self.events.recv() {
            Ok(InputEvent::Line(line)) => Ok(line),
            Ok(InputEvent::Failed(reason)) => {
                self.closed = true;
                Err(AppError::ReadFailed { reason })
            }
            Ok(InputEvent::Eof) | Ok(InputEvent::Interrupt) | Err(_) => {
                self.closed = true;
                Err(AppError::EndOfInput)
            }
        }
    }

    fn write(&mut self, text: &str) {
        echo(text);
    }
}

/// Scripted console: replays lines, captures output, then reports end of input.
pub struct MemoryConsole {
    lines: VecDeque<String>,
    output: Rc<RefCell<String>>,
}

impl MemoryConsole {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            output: Rc::new(RefCell::new(String::new())),
        }
    }

    /// Shared handle to everything written so far.
    pub fn output(&self) -> Rc<RefCell<String>> {
        Rc::clone(&self.output)
    }
}

impl Console for MemoryConsole {
    fn read_line(&mut self) -> Result<String, AppError> {
        self.write(PROMPT);
        let line = self.lines.pop_front().ok_or(AppError::EndOfInput)?;
        self.output.borrow_mut().push_str(&line);
        self.output.borrow_mut().push_str("\r\n");
        Ok(line)
    }

    fn write(&mut self, text: &str) {
        self.output.borrow_mut().push_str(text);
    }
}
