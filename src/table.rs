//! The instruction table: state name to an ordered list of instructions, with exact-match
//! lookup and wildcard fallback. Built once, read-only afterwards.

use crate::types::{ErrorKind, Instruction, ReadPattern};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Maps each state to its instructions in the order they were declared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionTable {
    rules: HashMap<String, Vec<Instruction>>,
    /// States in first-seen order.
    order: Vec<String>,
}

impl InstructionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an instruction to `state`, registering the state on first sight.
    fn push(&mut self, state: String, instruction: Instruction) {
        match self.rules.get_mut(&state) {
            Some(instructions) => instructions.push(instruction),
            None => {
                self.order.push(state.clone());
                self.rules.insert(state, vec![instruction]);
            }
        }
    }

    /// Finds the instruction for `state` reading `symbol`.
    ///
    /// The first instruction whose read symbol equals `symbol` wins. Failing that, the last
    /// wildcard instruction of the state is used.
    ///
    /// # Returns
    ///
    /// * `Ok(&Instruction)` if an exact or wildcard instruction matches.
    /// * `Err(ErrorKind::IncorrectState)` if `state` is not a key of the table.
    /// * `Err(ErrorKind::NoInstructionForLetter)` if nothing matches.
    pub fn lookup(&self, state: &str, symbol: char) -> Result<&Instruction, ErrorKind> {
        let instructions = self.rules.get(state).ok_or(ErrorKind::IncorrectState)?;
        let mut fallback = None;

        for instruction in instructions {
            match instruction.read {
                ReadPattern::Symbol(c) if c == symbol => return Ok(instruction),
                ReadPattern::Any => fallback = Some(instruction),
                ReadPattern::Symbol(_) => {}
            }
        }

        fallback.ok_or(ErrorKind::NoInstructionForLetter)
    }

    /// Returns `true` if `state` has at least one instruction.
    pub fn contains_state(&self, state: &str) -> bool {
        self.rules.contains_key(state)
    }

    /// Returns the instructions of `state` in declaration order.
    pub fn instructions(&self, state: &str) -> Option<&[Instruction]> {
        self.rules.get(state).map(Vec::as_slice)
    }

    /// The first state declared. This is the default initial state.
    pub fn first_state(&self) -> Option<&str> {
        self.order.first().map(String::as_str)
    }

    /// Iterates over state names in declaration order.
    pub fn states(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Total number of instructions across all states.
    pub fn instruction_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }
}

impl FromIterator<(String, Instruction)> for InstructionTable {
    fn from_iter<I: IntoIterator<Item = (String, Instruction)>>(iter: I) -> Self {
        let mut table = Self::new();
        for (state, instruction) in iter {
            table.push(state, instruction);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, DirectionToken, WritePattern};

    fn table(rules: &[(&str, char, char, &str, &str)]) -> InstructionTable {
        rules
            .iter()
            .map(|&(state, read, write, direction, next)| {
                (
                    state.to_string(),
                    Instruction::new(read, write, direction, next),
                )
            })
            .collect()
    }

    #[test]
    fn test_exact_match_and_wildcard_fallback() {
        let table = table(&[("S1", 'a', 'x', "r", "S2"), ("S1", '*', 'y', "l", "S3")]);

        let exact = table.lookup("S1", 'a').unwrap();
        assert_eq!(exact.write, WritePattern::Symbol('x'));
        assert_eq!(exact.direction, DirectionToken::Known(Direction::Right));
        assert_eq!(exact.next_state, "S2");

        let fallback = table.lookup("S1", 'b').unwrap();
        assert_eq!(fallback.write, WritePattern::Symbol('y'));
        assert_eq!(fallback.direction, DirectionToken::Known(Direction::Left));
        assert_eq!(fallback.next_state, "S3");
    }

    #[test]
    fn test_exact_match_after_wildcard_still_wins() {
        let table = table(&[("s", '*', 'w', "*", "s"), ("s", 'a', 'e', "*", "s")]);

        assert_eq!(
            table.lookup("s", 'a').unwrap().write,
            WritePattern::Symbol('e')
        );
    }

    #[test]
    fn test_last_wildcard_is_the_default() {
        let table = table(&[("s", '*', '1', "*", "s"), ("s", '*', '2', "*", "s")]);

        assert_eq!(
            table.lookup("s", 'z').unwrap().write,
            WritePattern::Symbol('2')
        );
    }

    #[test]
    fn test_first_exact_match_wins() {
        let table = table(&[("s", 'a', '1', "*", "s"), ("s", 'a', '2', "*", "s")]);

        assert_eq!(
            table.lookup("s", 'a').unwrap().write,
            WritePattern::Symbol('1')
        );
    }

    #[test]
    fn test_blank_read_symbol() {
        let table = table(&[("s", '_', '1', "*", "halt")]);

        assert!(table.lookup("s", ' ').is_ok());
        assert_eq!(
            table.lookup("s", '_'),
            Err(ErrorKind::NoInstructionForLetter)
        );
    }

    #[test]
    fn test_lookup_errors() {
        let table = table(&[("s", 'a', '1', "*", "s")]);

        assert_eq!(table.lookup("missing", 'a'), Err(ErrorKind::IncorrectState));
        assert_eq!(
            table.lookup("s", 'b'),
            Err(ErrorKind::NoInstructionForLetter)
        );
    }

    #[test]
    fn test_declaration_order() {
        let table = table(&[
            ("zeta", 'a', 'a', "*", "alpha"),
            ("alpha", 'a', 'a', "*", "halt"),
            ("zeta", 'b', 'b', "*", "halt"),
        ]);

        assert_eq!(table.first_state(), Some("zeta"));
        assert_eq!(table.states().collect::<Vec<_>>(), vec!["zeta", "alpha"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.instruction_count(), 3);
        assert_eq!(table.instructions("zeta").map(<[_]>::len), Some(2));
        assert!(InstructionTable::new().first_state().is_none());
    }
}
