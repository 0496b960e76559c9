//! This module defines the `TuringMachine` struct, which simulates a single-tape deterministic
//! Turing Machine. It owns the tape, borrows the instruction table, and runs the
//! lookup → write → move → transition loop until a terminal outcome.

use crate::table::InstructionTable;
use crate::tape::Tape;
use crate::trace::{Configuration, TraceSink};
use crate::types::{ErrorKind, HaltMatch, InitialState, Outcome, RunConfig, Step};

/// Progress of the engine, distinct from the machine's control state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Running,
    Halted,
    /// The run was aborted. `last` is the live configuration when the error was detected.
    Failed {
        kind: ErrorKind,
        last: Configuration,
    },
}

impl Status {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Status::Running)
    }
}

/// Represents a single-tape Turing Machine.
///
/// The instruction table is borrowed read-only for the whole run; the tape is owned and
/// mutated only by [`TuringMachine::step_traced`].
pub struct TuringMachine<'a> {
    table: &'a InstructionTable,
    state: String,
    tape: Tape,
    halt_match: HaltMatch,
    status: Status,
    step_count: usize,
}

impl<'a> TuringMachine<'a> {
    /// Creates a machine in `state` over `tape`, with prefix halt matching.
    pub fn new(table: &'a InstructionTable, tape: Tape, state: impl Into<String>) -> Self {
        Self {
            table,
            state: state.into(),
            tape,
            halt_match: HaltMatch::default(),
            status: Status::Running,
            step_count: 0,
        }
    }

    /// Creates a machine from run settings.
    ///
    /// # Returns
    ///
    /// * `Err(ErrorKind::IncorrectState)` if the initial state is left to the table and the
    ///   table declares no state at all.
    pub fn from_config(
        table: &'a InstructionTable,
        tape: Tape,
        config: &RunConfig,
    ) -> Result<Self, ErrorKind> {
        let state = match &config.initial_state {
            InitialState::Named(name) => name.clone(),
            InitialState::FirstDeclared => table
                .first_state()
                .ok_or(ErrorKind::IncorrectState)?
                .to_string(),
        };

        Ok(Self::new(table, tape, state).with_halt_match(config.halt_match))
    }

    /// Sets the policy deciding which state names halt.
    pub fn with_halt_match(mut self, halt_match: HaltMatch) -> Self {
        self.halt_match = halt_match;
        self
    }

    /// Executes a single step without reporting.
    pub fn step(&mut self) -> Step {
        self.step_traced(&mut ())
    }

    /// Executes a single step, reporting the configuration to `sink` first.
    ///
    /// # Returns
    ///
    /// * `Step::Continue` if a transition was performed.
    /// * `Step::Halt(Outcome::NoError)` if the current state is a halting state.
    /// * `Step::Halt(Outcome::Failed(_))` if the step hit an error.
    ///
    /// Once a terminal outcome has been returned, every later call returns it again without
    /// reporting or touching the tape.
    pub fn step_traced<S: TraceSink + ?Sized>(&mut self, sink: &mut S) -> Step {
        if let Some(outcome) = self.outcome() {
            return Step::Halt(outcome);
        }

        if sink.report(&self.state, &self.tape).is_err() {
            return self.fail(ErrorKind::OpeningFile);
        }

        if self.halt_match.is_halting(&self.state) {
            self.status = Status::Halted;
            return Step::Halt(Outcome::NoError);
        }

        let table = self.table;
        let instruction = match table.lookup(&self.state, self.tape.read()) {
            Ok(instruction) => instruction,
            Err(kind) => return self.fail(kind),
        };

        // The write is not rolled back if the direction turns out to be invalid.
        self.tape.write(instruction.write);

        let direction = match instruction.direction.resolve() {
            Ok(direction) => direction,
            Err(kind) => return self.fail(kind),
        };
        self.tape.shift(direction);
        self.step_count += 1;

        let next = &instruction.next_state;
        let known = self.halt_match.is_halting(next) || self.table.contains_state(next);
        self.state.clone_from(next);

        if !known {
            return self.fail(ErrorKind::IncorrectState);
        }

        Step::Continue
    }

    /// Runs the machine until it halts or fails, without reporting.
    pub fn run(&mut self) -> Outcome {
        self.run_traced(&mut ())
    }

    /// Runs the machine until it halts or fails, reporting every step to `sink`.
    pub fn run_traced<S: TraceSink + ?Sized>(&mut self, sink: &mut S) -> Outcome {
        loop {
            if let Step::Halt(outcome) = self.step_traced(sink) {
                return outcome;
            }
        }
    }

    /// Executes at most `limit` steps. Returns `Step::Continue` if the machine is still running.
    pub fn run_for<S: TraceSink + ?Sized>(&mut self, limit: usize, sink: &mut S) -> Step {
        for _ in 0..limit {
            if let halt @ Step::Halt(_) = self.step_traced(sink) {
                return halt;
            }
        }

        match self.outcome() {
            Some(outcome) => Step::Halt(outcome),
            None => Step::Continue,
        }
    }

    /// Returns the terminal outcome, or `None` while running.
    pub fn outcome(&self) -> Option<Outcome> {
        match &self.status {
            Status::Running => None,
            Status::Halted => Some(Outcome::NoError),
            Status::Failed { kind, .. } => Some(Outcome::Failed(*kind)),
        }
    }

    /// Consumes the machine, returning its final status and tape.
    pub fn into_parts(self) -> (Status, Tape) {
        (self.status, self.tape)
    }

    /// Returns the current state of the Turing Machine.
    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn status(&self) -> &Status {
        &self.status
    }

    /// Returns the number of transitions executed so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Returns the live configuration.
    pub fn configuration(&self) -> Configuration {
        Configuration::capture(&self.state, &self.tape)
    }

    fn fail(&mut self, kind: ErrorKind) -> Step {
        self.status = Status::Failed {
            kind,
            last: self.configuration(),
        };
        Step::Halt(Outcome::Failed(kind))
    }
}
