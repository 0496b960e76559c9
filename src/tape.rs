//! The tape model: a linear sequence of symbols with a head index that grows by one blank
//! cell whenever the head moves past either end.

use crate::types::{Direction, WritePattern, BLANK_SYMBOL};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single tape with its read/write head.
///
/// The head always indexes a valid cell: `0 <= head < len`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tape {
    cells: Vec<char>,
    head: usize,
}

impl Tape {
    /// Creates a tape from its verbatim contents with the head over the first cell.
    ///
    /// Embedded spaces are blank cells. An empty input yields a single blank cell.
    pub fn new(content: &str) -> Self {
        let mut cells: Vec<char> = content.chars().collect();
        if cells.is_empty() {
            cells.push(BLANK_SYMBOL);
        }

        Self { cells, head: 0 }
    }

    /// Returns the symbol under the head.
    pub fn read(&self) -> char {
        self.cells[self.head]
    }

    /// Writes under the head. [`WritePattern::Keep`] leaves the cell unchanged.
    pub fn write(&mut self, pattern: WritePattern) {
        if let WritePattern::Symbol(symbol) = pattern {
            self.cells[self.head] = symbol;
        }
    }

    /// Moves the head one cell to the left, prepending a blank cell at the left edge.
    pub fn move_left(&mut self) {
        if self.head > 0 {
            self.head -= 1;
        } else {
            // Head stays at index 0, now over the new blank.
            self.cells.insert(0, BLANK_SYMBOL);
        }
    }

    /// Moves the head one cell to the right, appending a blank cell at the right edge.
    pub fn move_right(&mut self) {
        if self.head + 1 >= self.cells.len() {
            self.cells.push(BLANK_SYMBOL);
        }
        self.head += 1;
    }

    pub fn stay(&mut self) {}

    /// Moves the head in the given direction.
    pub fn shift(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Stay => self.stay(),
        }
    }

    /// Returns the head index.
    pub fn head(&self) -> usize {
        self.head
    }

    /// Returns the number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: a tape has at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[char] {
        &self.cells
    }
}

impl fmt::Display for Tape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.cells.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_tape() {
        let tape = Tape::new("1 0");
        assert_eq!(tape.cells(), &['1', ' ', '0']);
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.read(), '1');
    }

    #[test]
    fn test_empty_tape_has_one_blank() {
        let tape = Tape::new("");
        assert_eq!(tape.len(), 1);
        assert_eq!(tape.read(), BLANK_SYMBOL);
        assert!(!tape.is_empty());
    }

    #[test]
    fn test_write() {
        let mut tape = Tape::new("abc");
        tape.write(WritePattern::Symbol('x'));
        assert_eq!(tape.to_string(), "xbc");

        tape.write('_'.into());
        assert_eq!(tape.to_string(), " bc");
    }

    #[test]
    fn test_wildcard_write_is_noop() {
        for content in ["a", "b", " ", "*"] {
            let mut tape = Tape::new(content);
            let before = tape.read();
            tape.write('*'.into());
            assert_eq!(tape.read(), before);
        }
    }

    #[test]
    fn test_move_left_extends_tape() {
        let mut tape = Tape::new("ab");
        tape.move_left();

        assert_eq!(tape.head(), 0);
        assert_eq!(tape.to_string(), " ab");
        assert_eq!(tape.read(), BLANK_SYMBOL);
    }

    #[test]
    fn test_move_right_extends_tape() {
        let mut tape = Tape::new("ab");
        tape.move_right();
        assert_eq!(tape.head(), 1);
        assert_eq!(tape.len(), 2);

        tape.move_right();
        assert_eq!(tape.head(), 2);
        assert_eq!(tape.to_string(), "ab ");
        assert_eq!(tape.read(), BLANK_SYMBOL);
    }

    #[test]
    fn test_shift_stay() {
        let mut tape = Tape::new("ab");
        tape.shift(Direction::Stay);
        assert_eq!(tape.head(), 0);
        assert_eq!(tape.len(), 2);
    }

    #[test]
    fn test_growth_invariant() {
        // Deterministic pseudo-random walk over both edges.
        let mut tape = Tape::new("xyz");
        let mut seed: u32 = 7;
        let mut crossings = 0;

        for _ in 0..500 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let left = (seed >> 16) % 2 == 0;
            let at_edge = if left {
                tape.head() == 0
            } else {
                tape.head() == tape.len() - 1
            };
            let len_before = tape.len();

            if left {
                tape.move_left();
            } else {
                tape.move_right();
            }

            if at_edge {
                crossings += 1;
                assert_eq!(tape.len(), len_before + 1);
            } else {
                assert_eq!(tape.len(), len_before);
            }
            assert!(tape.head() < tape.len());
        }

        assert_eq!(tape.len(), 3 + crossings);
    }
}
