use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};

use tagger_types::EOF_MARKER;
use thiserror::Error;
use tracing::info;

use crate::config::PolicyConfig;
use crate::sink::{FanOut, SinkKind};
use crate::tree::TreeError;

/// Lines between progress messages on a stream.
pub const PROGRESS_INTERVAL: u64 = 500;

#[derive(Debug, Error)]
pub enum TagError {
    #[error("i/o error while tagging: {0}")]
    Io(#[from] io::Error),
    #[error("failed to build parse tree: {0}")]
    Parse(#[from] TreeError),
}

/// What one input line produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineCounts {
    pub words: u64,
    pub sentences: u64,
}

/// Totals for one tagged stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TagStats {
    pub lines: u64,
    pub words: u64,
    pub sentences: u64,
    pub elapsed: Duration,
}

impl TagStats {
    pub fn words_per_sec(&self) -> f64 {
        per_sec(self.words, self.elapsed)
    }

    pub fn lines_per_sec(&self) -> f64 {
        per_sec(self.lines, self.elapsed)
    }
}

fn per_sec(count: u64, elapsed: Duration) -> f64 {
    let secs = elapsed.as_secs_f64();
    if secs > 0.0 { count as f64 / secs } else { 0.0 }
}

/// The unit a tagger reports its throughput in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Throughput {
    Words,
    Lines,
}

/// Running counters for a stream, logging every [`PROGRESS_INTERVAL`] lines.
#[derive(Debug)]
pub struct Progress {
    started: Instant,
    lines: u64,
    words: u64,
    sentences: u64,
}

impl Progress {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
            lines: 0,
            words: 0,
            sentences: 0,
        }
    }

    pub fn record(&mut self, counts: LineCounts) {
        self.lines += 1;
        self.words += counts.words;
        self.sentences += counts.sentences;
        if self.lines % PROGRESS_INTERVAL == 0 {
            info!("{} lines done", self.lines);
        }
    }

    pub fn finish(self) -> TagStats {
        TagStats {
            lines: self.lines,
            words: self.words,
            sentences: self.sentences,
            elapsed: self.started.elapsed(),
        }
    }
}

/// A tagger that turns raw lines into annotated output lines.
///
/// Implementors provide [`LineTagger::tag_line`]; the single-line and stream
/// entry points, the EOF marker and progress reporting are shared.
pub trait LineTagger: Send + Sync {
    fn policy(&self) -> &PolicyConfig;

    /// Tag one raw line (without its line break) into `out`.
    fn tag_line(&self, line: &str, out: &mut FanOut<'_>) -> Result<LineCounts, TagError>;

    /// Whether a second, POS-only stream is written alongside the main one.
    fn writes_pos_stream(&self) -> bool;

    fn throughput(&self) -> Throughput;

    /// Tag one interactive request and flush.
    fn tag_single_line(&self, line: &str, out: &mut dyn Write) -> Result<LineCounts, TagError> {
        let mut fan_out = FanOut::new().with(SinkKind::Factors, out);
        let counts = self.tag_line(line, &mut fan_out)?;
        if self.policy().emit_eof_marker {
            fan_out.raw(EOF_MARKER)?;
            fan_out.newline()?;
        }
        fan_out.flush()?;
        Ok(counts)
    }

    /// Tag every line of `input`. `pos` is ignored unless
    /// [`LineTagger::writes_pos_stream`] is true.
    fn tag_multi_line<'a>(
        &self,
        input: &mut dyn BufRead,
        all: &'a mut dyn Write,
        pos: Option<&'a mut dyn Write>,
    ) -> Result<TagStats, TagError> {
        let pos = if self.writes_pos_stream() { pos } else { None };
        let mut fan_out = FanOut::factors_and_pos(all, pos);
        let mut progress = Progress::start();
        let mut buf = String::new();
        loop {
            buf.clear();
            if input.read_line(&mut buf)? == 0 {
                break;
            }
            let line = buf.trim_end_matches(['\n', '\r']);
            let counts = self.tag_line(line, &mut fan_out)?;
            progress.record(counts);
        }
        if self.policy().emit_eof_marker {
            fan_out.raw(EOF_MARKER)?;
            fan_out.newline()?;
        }
        fan_out.flush()?;

        let stats = progress.finish();
        match self.throughput() {
            Throughput::Words => info!(
                "tagged {} words in {} ms ({:.1} words/sec)",
                stats.words,
                stats.elapsed.as_millis(),
                stats.words_per_sec()
            ),
            Throughput::Lines => info!(
                "parsed {} lines in {} ms ({:.1} lines/sec)",
                stats.lines,
                stats.elapsed.as_millis(),
                stats.lines_per_sec()
            ),
        }
        Ok(stats)
    }
}
