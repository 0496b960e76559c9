//! Trace reporting: snapshots of the machine configuration and the sinks that receive one
//! per step.

use crate::tape::Tape;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Width of the field the tape is right-aligned in when rendered as text.
pub const TAPE_FIELD_WIDTH: usize = 20;

/// A point-in-time copy of the machine: control state, tape contents and head position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Configuration {
    pub state: String,
    pub tape: String,
    pub head: usize,
}

impl Configuration {
    /// Captures the configuration of a live machine.
    pub fn capture(state: &str, tape: &Tape) -> Self {
        Self {
            state: state.to_string(),
            tape: tape.to_string(),
            head: tape.head(),
        }
    }

    /// Renders the configuration as three lines: the state, the tape right-aligned in a
    /// [`TAPE_FIELD_WIDTH`] column field, and a caret under the head.
    ///
    /// ```text
    /// State: a
    ///                  101
    ///                   ^
    /// ```
    pub fn render(&self) -> String {
        let pad = TAPE_FIELD_WIDTH.saturating_sub(self.tape.chars().count());
        format!(
            "State: {}\n{}{}\n{}^\n",
            self.state,
            " ".repeat(pad),
            self.tape,
            " ".repeat(pad + self.head)
        )
    }
}

/// Receives the configuration at the start of every step.
///
/// An error aborts the run with [`crate::ErrorKind::OpeningFile`].
pub trait TraceSink {
    fn report(&mut self, state: &str, tape: &Tape) -> io::Result<()>;
}

/// Discards every report.
impl TraceSink for () {
    fn report(&mut self, _state: &str, _tape: &Tape) -> io::Result<()> {
        Ok(())
    }
}

/// Records every configuration in order.
impl TraceSink for Vec<Configuration> {
    fn report(&mut self, state: &str, tape: &Tape) -> io::Result<()> {
        self.push(Configuration::capture(state, tape));
        Ok(())
    }
}

impl<S: TraceSink + ?Sized> TraceSink for &mut S {
    fn report(&mut self, state: &str, tape: &Tape) -> io::Result<()> {
        (**self).report(state, tape)
    }
}

impl<S: TraceSink + ?Sized> TraceSink for Box<S> {
    fn report(&mut self, state: &str, tape: &Tape) -> io::Result<()> {
        (**self).report(state, tape)
    }
}

/// Writes human-readable trace blocks, see [`Configuration::render`].
pub struct TextTrace<W: Write> {
    out: W,
}

impl<W: Write> TextTrace<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TraceSink for TextTrace<W> {
    fn report(&mut self, state: &str, tape: &Tape) -> io::Result<()> {
        self.out
            .write_all(Configuration::capture(state, tape).render().as_bytes())?;
        self.out.flush()
    }
}

/// Writes one JSON object per configuration, newline delimited.
pub struct JsonTrace<W: Write> {
    out: W,
}

impl<W: Write> JsonTrace<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> TraceSink for JsonTrace<W> {
    fn report(&mut self, state: &str, tape: &Tape) -> io::Result<()> {
        serde_json::to_writer(&mut self.out, &Configuration::capture(state, tape))?;
        writeln!(self.out)
    }
}
