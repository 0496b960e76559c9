//! This crate provides the core logic for a single-tape Turing Machine simulator.
//! It includes modules for parsing instruction tables, modelling the tape, running the
//! execution engine, tracing its configurations, and analyzing tables before a run.

pub mod analyzer;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod table;
pub mod tape;
pub mod trace;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the analysis entry points and `AnalysisError` from the analyzer module.
pub use analyzer::{analyze, check, AnalysisError};
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::ProgramLoader;
/// Re-exports the engine and its progress type from the machine module.
pub use machine::{Status, TuringMachine};
/// Re-exports the `parse` function from the parser module.
pub use parser::parse;
/// Re-exports `Program`, `ProgramInfo`, `ProgramManager`, and `PROGRAMS` from the programs module.
pub use programs::{Program, ProgramInfo, ProgramManager, PROGRAMS};
pub use table::InstructionTable;
pub use tape::Tape;
/// Re-exports the configuration snapshot and trace sinks from the trace module.
pub use trace::{Configuration, JsonTrace, TextTrace, TraceSink};
/// Re-exports instruction records, settings, outcomes and error types from the types module.
pub use types::{
    Direction, DirectionToken, ErrorKind, HaltMatch, InitialState, Instruction, MachineError,
    Outcome, ReadPattern, RunConfig, Step, WritePattern,
};
