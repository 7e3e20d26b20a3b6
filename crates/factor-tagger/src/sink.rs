use std::io::{self, Write};

use tagger_types::TaggedToken;

use crate::factor::FactorFormatter;

/// What a sink writes for each token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkKind {
    /// The formatted factor string.
    Factors,
    /// The tag alone.
    PosOnly,
}

struct Sink<'w> {
    kind: SinkKind,
    writer: &'w mut dyn Write,
}

/// Ordered set of output streams fed by a single emit loop.
///
/// Every separator and line break goes to all sinks, so the streams stay
/// line-aligned no matter which of them are configured.
pub struct FanOut<'w> {
    sinks: Vec<Sink<'w>>,
}

impl<'w> FanOut<'w> {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn with(mut self, kind: SinkKind, writer: &'w mut dyn Write) -> Self {
        self.sinks.push(Sink { kind, writer });
        self
    }

    /// Factor stream plus an optional POS-only stream.
    pub fn factors_and_pos(all: &'w mut dyn Write, pos: Option<&'w mut dyn Write>) -> Self {
        let fan_out = Self::new().with(SinkKind::Factors, all);
        match pos {
            Some(pos) => fan_out.with(SinkKind::PosOnly, pos),
            None => fan_out,
        }
    }

    pub fn token(&mut self, token: &TaggedToken, formatter: &FactorFormatter) -> io::Result<()> {
        for sink in &mut self.sinks {
            match sink.kind {
                SinkKind::Factors => sink.writer.write_all(formatter.format(token).as_bytes())?,
                SinkKind::PosOnly => sink.writer.write_all(token.tag.as_bytes())?,
            }
        }
        Ok(())
    }

    pub fn space(&mut self) -> io::Result<()> {
        self.raw(" ")
    }

    pub fn newline(&mut self) -> io::Result<()> {
        self.raw("\n")
    }

    /// Write the same text to every sink.
    pub fn raw(&mut self, text: &str) -> io::Result<()> {
        for sink in &mut self.sinks {
            sink.writer.write_all(text.as_bytes())?;
        }
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        for sink in &mut self.sinks {
            sink.writer.flush()?;
        }
        Ok(())
    }
}

impl Default for FanOut<'_> {
    fn default() -> Self {
        Self::new()
    }
}
