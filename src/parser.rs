//! This module provides the parser for instruction sources, utilizing the `pest` crate.
//! Each record is tokenized once here into a typed [`Instruction`]; nothing downstream
//! re-reads the text.

use crate::{
    table::InstructionTable,
    types::{DirectionToken, Instruction, MachineError, INPUT_BLANK_SYMBOL},
};
use pest::{
    iterators::{Pair, Pairs},
    Parser as PestParser,
};
use pest_derive::Parser as PestParser;

/// Derives a `PestParser` for the instruction grammar defined in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct InstructionParser;

/// Parses an instruction source into an [`InstructionTable`].
///
/// Lines whose first non-blank character is `;` are comments and whitespace-only lines are
/// skipped. Every other line is a record `<state> <read> <write> <direction> <next_state>`; fields after the fifth
/// are ignored. Records are grouped by state in the order encountered.
///
/// Direction tokens are not validated here: an unrecognized one is kept and reported by the
/// engine when the instruction runs.
///
/// # Returns
///
/// * `Ok(InstructionTable)` if every line is a comment, blank, or a well-formed record.
/// * `Err(MachineError::ParseError)` if a record has fewer than five fields.
/// * `Err(MachineError::ValidationError)` if the source holds no record at all.
pub fn parse(input: &str) -> Result<InstructionTable, MachineError> {
    let table: InstructionTable = InstructionParser::parse(Rule::table, input)
        .map_err(|e| MachineError::ParseError(Box::new(e)))?
        .flat_map(Pair::into_inner)
        .filter(|pair| pair.as_rule() == Rule::record)
        .map(parse_record)
        .collect();

    if table.is_empty() {
        return Err(MachineError::ValidationError(
            "No instructions found".to_string(),
        ));
    }

    Ok(table)
}

/// Parses a single record from a `Pair<Rule::record>` into its state and instruction.
fn parse_record(pair: Pair<Rule>) -> (String, Instruction) {
    let mut pairs = pair.into_inner();

    let state = parse_string(&mut pairs).to_string();
    let read = parse_symbol(parse_string(&mut pairs));
    let write = parse_symbol(parse_string(&mut pairs));
    let direction = DirectionToken::parse(parse_string(&mut pairs));
    let next_state = parse_string(&mut pairs).to_string();

    (
        state,
        Instruction {
            read: read.into(),
            write: write.into(),
            direction,
            next_state,
        },
    )
}

/// Takes the first character of a symbol field.
fn parse_symbol(field: &str) -> char {
    field.chars().next().unwrap_or(INPUT_BLANK_SYMBOL)
}

/// Extracts the string content of the next `Pair`. The grammar guarantees all five fields.
fn parse_string<'i>(pairs: &mut Pairs<'i, Rule>) -> &'i str {
    pairs.next().map(|p| p.as_str()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, ReadPattern, WritePattern, BLANK_SYMBOL};

    #[test]
    fn test_parse_simple_table() {
        let input = "; flip the first two cells\na 1 0 r a\na 0 1 r b\na * * * halt\nb * * * halt\n";

        let table = parse(input).unwrap();
        assert_eq!(table.states().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(table.instruction_count(), 4);
        assert_eq!(
            table.instructions("a").unwrap()[0],
            Instruction {
                read: ReadPattern::Symbol('1'),
                write: WritePattern::Symbol('0'),
                direction: DirectionToken::Known(Direction::Right),
                next_state: "a".into(),
            }
        );
    }

    #[test]
    fn test_parse_blank_and_wildcards() {
        let table = parse("s _ * l t\nt * _ * halt").unwrap();

        let s = &table.instructions("s").unwrap()[0];
        assert_eq!(s.read, ReadPattern::Symbol(BLANK_SYMBOL));
        assert_eq!(s.write, WritePattern::Keep);
        assert_eq!(s.direction, DirectionToken::Known(Direction::Left));

        let t = &table.instructions("t").unwrap()[0];
        assert_eq!(t.read, ReadPattern::Any);
        assert_eq!(t.write, WritePattern::Symbol(BLANK_SYMBOL));
        assert_eq!(t.direction, DirectionToken::Known(Direction::Stay));
    }

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let input = ";comment\n\n   \n\t\nq0 a b r halt\r\n; another\r\nq1 b a l q0\n";

        let table = parse(input).unwrap();
        assert_eq!(table.states().collect::<Vec<_>>(), vec!["q0", "q1"]);
        assert_eq!(table.instructions("q0").unwrap()[0].next_state, "halt");
    }

    #[test]
    fn test_parse_skips_indented_comments() {
        let table = parse("  ; note\n\t;tab note\na * * * halt\n").unwrap();

        assert_eq!(table.states().collect::<Vec<_>>(), vec!["a"]);
        assert_eq!(table.instruction_count(), 1);
    }

    #[test]
    fn test_parse_extra_whitespace_and_fields() {
        let table = parse("  q0\t a   b  r  halt   trailing note \n").unwrap();

        let instruction = &table.instructions("q0").unwrap()[0];
        assert_eq!(instruction.read, ReadPattern::Symbol('a'));
        assert_eq!(instruction.next_state, "halt");
    }

    #[test]
    fn test_parse_symbol_uses_first_character() {
        let table = parse("q0 ab cd r halt\n").unwrap();

        let instruction = &table.instructions("q0").unwrap()[0];
        assert_eq!(instruction.read, ReadPattern::Symbol('a'));
        assert_eq!(instruction.write, WritePattern::Symbol('c'));
    }

    #[test]
    fn test_parse_keeps_unknown_direction() {
        let table = parse("q0 a b R halt\n").unwrap();

        assert_eq!(
            table.instructions("q0").unwrap()[0].direction,
            DirectionToken::Unknown("R".to_string())
        );
    }

    #[test]
    fn test_parse_short_record() {
        let result = parse("q0 a b r halt\nq1 a b r\n");

        let error = result.unwrap_err();
        assert!(matches!(error, MachineError::ParseError(_)));
        assert!(error.to_string().contains("2:"));
    }

    #[test]
    fn test_parse_empty_source() {
        let error = parse("; only a comment\n\n").unwrap_err();

        assert_eq!(
            error,
            MachineError::ValidationError("No instructions found".to_string())
        );
        assert_eq!(
            error.to_string(),
            "Table validation error: No instructions found"
        );
    }
}
