//! Built-in instruction tables embedded in the binary.
//!
//! Each source carries its metadata in leading comments:
//!
//! ```text
//! ; name: flip
//! ; tape: 101
//! ```

use crate::parser::parse;
use crate::table::InstructionTable;
use crate::tape::Tape;
use crate::types::MachineError;

// Default embedded programs
const PROGRAM_TEXTS: [&str; 4] = [
    include_str!("../programs/flip.tm"),
    include_str!("../programs/binary-increment.tm"),
    include_str!("../programs/unary-addition.tm"),
    include_str!("../programs/busy-beaver-2.tm"),
];

lazy_static::lazy_static! {
    pub static ref PROGRAMS: Vec<Program> = PROGRAM_TEXTS
        .into_iter()
        .filter_map(|text| Program::from_source(text).ok())
        .collect();
}

/// An instruction table together with the tape it is meant to run on.
#[derive(Debug, Clone)]
pub struct Program {
    pub name: String,
    /// Initial tape contents, verbatim.
    pub tape: String,
    pub source: &'static str,
    pub table: InstructionTable,
}

impl Program {
    /// Parses an embedded source and its `; name:` / `; tape:` header comments.
    pub fn from_source(source: &'static str) -> Result<Self, MachineError> {
        let table = parse(source)?;
        let name = header(source, "name")
            .ok_or_else(|| MachineError::ValidationError("Missing 'name' header".to_string()))?;
        let tape = header(source, "tape").unwrap_or_default();

        Ok(Self {
            name: name.trim().to_string(),
            tape: tape.to_string(),
            source,
            table,
        })
    }

    /// Returns a fresh copy of the program's initial tape.
    pub fn initial_tape(&self) -> Tape {
        Tape::new(&self.tape)
    }
}

/// Finds `; <key>:` among the leading comment lines and returns the rest of the line,
/// without the single separating space.
fn header<'s>(source: &'s str, key: &str) -> Option<&'s str> {
    source
        .lines()
        .take_while(|line| line.starts_with(';'))
        .find_map(|line| {
            let rest = line[1..].trim_start().strip_prefix(key)?.strip_prefix(':')?;
            Some(rest.strip_prefix(' ').unwrap_or(rest))
        })
}

pub struct ProgramManager;

impl ProgramManager {
    /// Get the number of available programs
    pub fn count() -> usize {
        PROGRAMS.len()
    }

    /// Get a program by its index
    pub fn get_by_index(index: usize) -> Result<&'static Program, MachineError> {
        PROGRAMS.get(index).ok_or_else(|| {
            MachineError::ValidationError(format!("Program index {} out of range", index))
        })
    }

    /// Get a program by its name
    pub fn get_by_name(name: &str) -> Result<&'static Program, MachineError> {
        PROGRAMS
            .iter()
            .find(|program| program.name == name)
            .ok_or_else(|| MachineError::ValidationError(format!("Program '{}' not found", name)))
    }

    /// List all program names
    pub fn list_names() -> Vec<String> {
        PROGRAMS.iter().map(|program| program.name.clone()).collect()
    }

    /// Get information about a program by its index
    pub fn info(index: usize) -> Result<ProgramInfo, MachineError> {
        let program = Self::get_by_index(index)?;

        Ok(ProgramInfo {
            index,
            name: program.name.clone(),
            initial_state: program.table.first_state().unwrap_or_default().to_string(),
            initial_tape: program.tape.clone(),
            state_count: program.table.len(),
            instruction_count: program.table.instruction_count(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct ProgramInfo {
    pub index: usize,
    pub name: String,
    pub initial_state: String,
    pub initial_tape: String,
    pub state_count: usize,
    pub instruction_count: usize,
}
