//! This module provides functions for analyzing instruction tables to detect common mistakes
//! before execution: undefined or unreachable states, unrecognized directions, and rules the
//! lookup order can never select.
//!
//! Analysis is advisory. The engine does not consult it and reports the same conditions
//! lazily, at the step that actually hits them.

use crate::table::InstructionTable;
use crate::types::{DirectionToken, HaltMatch, MachineError, ReadPattern};
use std::collections::HashSet;
use std::fmt;

/// Represents the findings of the analysis of an instruction table.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// The initial state is neither declared nor halting.
    InvalidStartState(String),
    /// Instructions reference states that are neither declared nor halting.
    UndefinedNextStates(Vec<String>),
    /// Instructions carry direction tokens other than `r`, `l` or `*`.
    UnrecognizedDirections(Vec<String>),
    /// Declared states that cannot be reached from the initial state.
    UnreachableStates(Vec<String>),
    /// States with more than one wildcard rule. Only the last one is ever used.
    ShadowedWildcards(Vec<String>),
    /// Exact rules repeating an earlier read symbol of the same state. They are never used.
    ShadowedInstructions(Vec<String>),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisError::InvalidStartState(state) => write!(f, "Invalid start state: {state}"),
            AnalysisError::UndefinedNextStates(refs) => {
                write!(f, "Instructions reference undefined states: {refs:?}")
            }
            AnalysisError::UnrecognizedDirections(refs) => {
                write!(f, "Unrecognized direction tokens: {refs:?}")
            }
            AnalysisError::UnreachableStates(states) => {
                write!(f, "Unreachable states detected: {states:?}")
            }
            AnalysisError::ShadowedWildcards(states) => {
                write!(f, "Only the last wildcard rule is used in states: {states:?}")
            }
            AnalysisError::ShadowedInstructions(refs) => {
                write!(f, "Instructions never selected: {refs:?}")
            }
        }
    }
}

impl From<AnalysisError> for MachineError {
    /// Converts an `AnalysisError` into a `MachineError::ValidationError`.
    fn from(error: AnalysisError) -> Self {
        MachineError::ValidationError(error.to_string())
    }
}

/// Runs every check over `table`, starting from `initial_state`.
///
/// # Returns
///
/// All findings, in a fixed check order. An empty vector means the table is clean.
pub fn analyze(
    table: &InstructionTable,
    initial_state: &str,
    halt_match: HaltMatch,
) -> Vec<AnalysisError> {
    [
        check_valid_start_state(table, initial_state, halt_match),
        check_undefined_next_states(table, halt_match),
        check_directions(table),
        check_unreachable_states(table, initial_state),
        check_shadowed_wildcards(table),
        check_shadowed_instructions(table),
    ]
    .into_iter()
    .filter_map(Result::err)
    .collect()
}

/// Like [`analyze`], but fails with the first finding as a `MachineError::ValidationError`.
pub fn check(
    table: &InstructionTable,
    initial_state: &str,
    halt_match: HaltMatch,
) -> Result<(), MachineError> {
    match analyze(table, initial_state, halt_match).into_iter().next() {
        Some(error) => Err(error.into()),
        None => Ok(()),
    }
}

fn check_valid_start_state(
    table: &InstructionTable,
    initial_state: &str,
    halt_match: HaltMatch,
) -> Result<(), AnalysisError> {
    if !table.contains_state(initial_state) && !halt_match.is_halting(initial_state) {
        return Err(AnalysisError::InvalidStartState(initial_state.to_string()));
    }

    Ok(())
}

/// Halting next states do not need to be declared.
fn check_undefined_next_states(
    table: &InstructionTable,
    halt_match: HaltMatch,
) -> Result<(), AnalysisError> {
    let undefined: Vec<String> = references(table)
        .filter(|(_, _, next)| !table.contains_state(next) && !halt_match.is_halting(next))
        .map(|(state, i, next)| format!("{state}[{i}] -> {next}"))
        .collect();

    if !undefined.is_empty() {
        return Err(AnalysisError::UndefinedNextStates(undefined));
    }

    Ok(())
}

fn check_directions(table: &InstructionTable) -> Result<(), AnalysisError> {
    let mut unrecognized = Vec::new();
    for state in table.states() {
        for (i, instruction) in table.instructions(state).unwrap_or_default().iter().enumerate() {
            if let DirectionToken::Unknown(token) = &instruction.direction {
                unrecognized.push(format!("{state}[{i}]: {token}"));
            }
        }
    }

    if !unrecognized.is_empty() {
        return Err(AnalysisError::UnrecognizedDirections(unrecognized));
    }

    Ok(())
}

/// Walks next-state edges from the initial state. Every declared state not visited is
/// unreachable.
fn check_unreachable_states(
    table: &InstructionTable,
    initial_state: &str,
) -> Result<(), AnalysisError> {
    let mut visited = HashSet::new();
    let mut queue = vec![initial_state];

    while let Some(state) = queue.pop() {
        if !visited.insert(state) {
            continue;
        }

        for instruction in table.instructions(state).unwrap_or_default() {
            if !visited.contains(instruction.next_state.as_str()) {
                queue.push(&instruction.next_state);
            }
        }
    }

    let unreachable: Vec<String> = table
        .states()
        .filter(|state| !visited.contains(state))
        .map(str::to_string)
        .collect();

    if !unreachable.is_empty() {
        return Err(AnalysisError::UnreachableStates(unreachable));
    }

    Ok(())
}

fn check_shadowed_wildcards(table: &InstructionTable) -> Result<(), AnalysisError> {
    let shadowed: Vec<String> = table
        .states()
        .filter(|state| {
            table
                .instructions(state)
                .unwrap_or_default()
                .iter()
                .filter(|instruction| instruction.read == ReadPattern::Any)
                .count()
                > 1
        })
        .map(str::to_string)
        .collect();

    if !shadowed.is_empty() {
        return Err(AnalysisError::ShadowedWildcards(shadowed));
    }

    Ok(())
}

fn check_shadowed_instructions(table: &InstructionTable) -> Result<(), AnalysisError> {
    let mut shadowed = Vec::new();
    for state in table.states() {
        let mut seen = HashSet::new();
        for (i, instruction) in table.instructions(state).unwrap_or_default().iter().enumerate() {
            if let ReadPattern::Symbol(symbol) = instruction.read {
                if !seen.insert(symbol) {
                    shadowed.push(format!("{state}[{i}] reads {symbol:?}"));
                }
            }
        }
    }

    if !shadowed.is_empty() {
        return Err(AnalysisError::ShadowedInstructions(shadowed));
    }

    Ok(())
}

/// Iterates `(state, index, next_state)` over every instruction in declaration order.
fn references(table: &InstructionTable) -> impl Iterator<Item = (&str, usize, &str)> {
    table.states().flat_map(move |state| {
        table
            .instructions(state)
            .unwrap_or_default()
            .iter()
            .enumerate()
            .map(move |(i, instruction)| (state, i, instruction.next_state.as_str()))
    })
}
