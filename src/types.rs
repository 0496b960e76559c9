//! This module defines the core data structures and types used throughout the Turing Machine
//! simulator, including instruction records, step results, outcomes, and error types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::Rule;

/// The blank symbol used to pad the tape.
pub const BLANK_SYMBOL: char = ' ';
/// A special input symbol used in instruction sources to represent the blank symbol.
pub const INPUT_BLANK_SYMBOL: char = '_';
/// Matches any symbol in read position, means "leave the cell unchanged" in write position
/// and "do not move" in direction position.
pub const WILDCARD_SYMBOL: char = '*';
/// The reserved next-state token that terminates a run successfully.
pub const HALT_MARKER: &str = "halt";
/// The `--init-state` sentinel selecting the first declared state.
pub const SMALLEST_KEY: &str = "smallest_key";

/// Maps an instruction-source character to a tape symbol, rewriting `_` to the blank.
pub fn input_symbol(c: char) -> char {
    if c == INPUT_BLANK_SYMBOL {
        BLANK_SYMBOL
    } else {
        c
    }
}

/// The symbol pattern an instruction reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReadPattern {
    /// Matches exactly this symbol.
    Symbol(char),
    /// Matches any symbol not matched by an exact rule of the same state.
    Any,
}

impl From<char> for ReadPattern {
    fn from(c: char) -> Self {
        if c == WILDCARD_SYMBOL {
            ReadPattern::Any
        } else {
            ReadPattern::Symbol(input_symbol(c))
        }
    }
}

/// The symbol an instruction writes under the head.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WritePattern {
    /// Overwrites the cell with this symbol.
    Symbol(char),
    /// Leaves the cell unchanged.
    Keep,
}

impl From<char> for WritePattern {
    fn from(c: char) -> Self {
        if c == WILDCARD_SYMBOL {
            WritePattern::Keep
        } else {
            WritePattern::Symbol(input_symbol(c))
        }
    }
}

/// Represents the possible directions the head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
    /// Keep the head in the same position.
    Stay,
}

/// A direction field as it was written in the instruction source.
///
/// Unrecognized tokens are kept so the engine can fail with
/// [`ErrorKind::IncorrectDirection`] when the instruction actually runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectionToken {
    Known(Direction),
    Unknown(String),
}

impl DirectionToken {
    /// Tokenizes a direction field: `r`, `l` and `*` are the only recognized forms.
    ///
    /// Unlike symbol fields, which keep only their first character, the whole token
    /// must match, so `right` is [`DirectionToken::Unknown`] rather than `r`.
    pub fn parse(token: &str) -> Self {
        match token {
            "r" => DirectionToken::Known(Direction::Right),
            "l" => DirectionToken::Known(Direction::Left),
            "*" => DirectionToken::Known(Direction::Stay),
            other => DirectionToken::Unknown(other.to_string()),
        }
    }

    /// Returns the direction, or [`ErrorKind::IncorrectDirection`] for an unrecognized token.
    pub fn resolve(&self) -> Result<Direction, ErrorKind> {
        match self {
            DirectionToken::Known(direction) => Ok(*direction),
            DirectionToken::Unknown(_) => Err(ErrorKind::IncorrectDirection),
        }
    }
}

impl From<Direction> for DirectionToken {
    fn from(direction: Direction) -> Self {
        DirectionToken::Known(direction)
    }
}

/// A single transition rule: read pattern, write value, move direction, next state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instruction {
    pub read: ReadPattern,
    pub write: WritePattern,
    pub direction: DirectionToken,
    /// The next state name, or a token starting with the halt marker.
    pub next_state: String,
}

impl Instruction {
    /// Builds an instruction from instruction-source style fields,
    /// e.g. `Instruction::new('1', '0', "r", "a")`.
    pub fn new(read: char, write: char, direction: &str, next_state: &str) -> Self {
        Self {
            read: read.into(),
            write: write.into(),
            direction: DirectionToken::parse(direction),
            next_state: next_state.to_string(),
        }
    }
}

/// Decides which state names count as halting.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HaltMatch {
    /// Any state name starting with `halt` halts (`halt`, `halt-accept`, `halting_area`).
    #[default]
    Prefix,
    /// Only the exact name `halt` halts.
    Exact,
}

impl HaltMatch {
    /// Returns `true` if `state` is a halting state under this policy.
    pub fn is_halting(&self, state: &str) -> bool {
        match self {
            HaltMatch::Prefix => state.starts_with(HALT_MARKER),
            HaltMatch::Exact => state == HALT_MARKER,
        }
    }
}

/// How the engine picks the state it starts in.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InitialState {
    /// The first state declared in the instruction source.
    #[default]
    FirstDeclared,
    /// An explicitly named state.
    Named(String),
}

impl FromStr for InitialState {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            SMALLEST_KEY => InitialState::FirstDeclared,
            name => InitialState::Named(name.to_string()),
        })
    }
}

/// Run invocation settings.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunConfig {
    pub initial_state: InitialState,
    /// Gate each trace report behind a manual advance. Interpreted by interactive callers only.
    pub step_mode: bool,
    pub halt_match: HaltMatch,
}

/// Represents the outcome of a single execution step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// The machine performed a transition and keeps running.
    Continue,
    /// The machine reached a terminal outcome.
    Halt(Outcome),
}

/// The terminal outcome of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The run reached a halting state.
    NoError,
    /// The run was aborted.
    Failed(ErrorKind),
}

impl Outcome {
    /// Returns `true` for [`Outcome::NoError`].
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::NoError)
    }

    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::NoError => 0,
            Outcome::Failed(kind) => kind.exit_code(),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::NoError => f.write_str("everything works great!"),
            Outcome::Failed(kind) => write!(f, "{kind}"),
        }
    }
}

/// The closed set of conditions that abort a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Error)]
pub enum ErrorKind {
    /// A required resource (tape, instructions, trace destination) could not be opened.
    #[error("can not open file, please check file paths")]
    OpeningFile,
    /// A direction token was not one of `r`, `l` or `*`.
    #[error("incorrect direction in instructions")]
    IncorrectDirection,
    /// A state name is not a key of the instruction table.
    #[error("incorrect next state in instructions")]
    IncorrectState,
    /// No exact or wildcard instruction matched the current state and symbol.
    #[error("no instruction for current letter")]
    NoInstructionForLetter,
}

impl ErrorKind {
    /// Short machine-readable name of the kind.
    pub fn name(&self) -> &'static str {
        match self {
            ErrorKind::OpeningFile => "OpeningFile",
            ErrorKind::IncorrectDirection => "IncorrectDirection",
            ErrorKind::IncorrectState => "IncorrectState",
            ErrorKind::NoInstructionForLetter => "NoInstructionForLetter",
        }
    }

    /// Process exit code, one per kind in the 10..=13 range.
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorKind::OpeningFile => 10,
            ErrorKind::IncorrectDirection => 11,
            ErrorKind::IncorrectState => 12,
            ErrorKind::NoInstructionForLetter => 13,
        }
    }
}

/// Represents errors raised while loading or checking a machine, outside of the run itself.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MachineError {
    /// Indicates an error during the parsing of an instruction source.
    #[error("Instruction parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates a finding of the static analysis.
    #[error("Table validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations, such as reading a tape file.
    #[error("File error: {0}")]
    FileError(String),
}

impl MachineError {
    /// Process exit code; file errors share the code of [`ErrorKind::OpeningFile`].
    pub fn exit_code(&self) -> i32 {
        match self {
            MachineError::FileError(_) => ErrorKind::OpeningFile.exit_code(),
            MachineError::ParseError(_) => 20,
            MachineError::ValidationError(_) => 21,
        }
    }
}
