//! This module provides the `ProgramLoader` struct, responsible for loading instruction tables
//! and initial tapes from files and strings.

use crate::parser::parse;
use crate::table::InstructionTable;
use crate::tape::Tape;
use crate::types::MachineError;
use std::fs;
use std::path::Path;

/// `ProgramLoader` is a utility struct for loading the inputs of a run.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads an instruction table from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(InstructionTable)` if the file is successfully read and parsed.
    /// * `Err(MachineError::FileError)` if the file cannot be read.
    /// * `Err(MachineError::ParseError)` if the file content is not a valid instruction source.
    pub fn load_table(path: &Path) -> Result<InstructionTable, MachineError> {
        parse(&read(path)?)
    }

    /// Loads an instruction table from the provided string content.
    pub fn load_table_from_string(content: &str) -> Result<InstructionTable, MachineError> {
        parse(content)
    }

    /// Loads the initial tape from the first line of the specified file.
    ///
    /// The line is taken verbatim, spaces included; only the line terminator is dropped.
    /// An empty file yields a tape of one blank cell.
    pub fn load_tape(path: &Path) -> Result<Tape, MachineError> {
        Ok(Self::load_tape_from_string(&read(path)?))
    }

    /// Builds the initial tape from the first line of `content`.
    pub fn load_tape_from_string(content: &str) -> Tape {
        let line = content.lines().next().unwrap_or_default();
        Tape::new(line)
    }
}

fn read(path: &Path) -> Result<String, MachineError> {
    fs::read_to_string(path).map_err(|e| {
        MachineError::FileError(format!("Failed to read file {}: {}", path.display(), e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_load_valid_table() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("instructions.txt");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"; increment\nq0 1 0 l q0\nq0 * 1 * halt\n")
            .unwrap();

        let table = ProgramLoader::load_table(&file_path).unwrap();
        assert_eq!(table.first_state(), Some("q0"));
        assert_eq!(table.instruction_count(), 2);
    }

    #[test]
    fn test_load_invalid_table() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("invalid.txt");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b"This is not valid").unwrap();

        let result = ProgramLoader::load_table(&file_path);
        assert!(matches!(result, Err(MachineError::ParseError(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.txt");

        let result = ProgramLoader::load_tape(&missing);
        match result {
            Err(MachineError::FileError(msg)) => assert!(msg.contains("missing.txt")),
            other => panic!("Expected FileError, got {:?}", other),
        }
        assert!(ProgramLoader::load_table(&missing).is_err());
    }

    #[test]
    fn test_load_tape_first_line_verbatim() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("input.txt");

        let mut file = File::create(&file_path).unwrap();
        file.write_all(b" 1 01 \r\nsecond line\n").unwrap();

        let tape = ProgramLoader::load_tape(&file_path).unwrap();
        assert_eq!(tape.to_string(), " 1 01 ");
        assert_eq!(tape.head(), 0);
    }

    #[test]
    fn test_load_tape_from_empty_string() {
        let tape = ProgramLoader::load_tape_from_string("");
        assert_eq!(tape.to_string(), " ");
    }
}
