//! Record parsing: raw input lines to typed facts.
//!
//! Each line holds one JSON object describing a disease. Parsing is
//! best-effort over a possibly dirty corpus: short lines and lines that do
//! not decode are counted and skipped, never fatal.

mod extract;
mod record;

pub use extract::{clean_symptom, clean_treatment, extract_facts, parse_drug_detail};
pub use record::{CureWay, RawRecord};

use std::io::BufRead;

use serde::{Deserialize, Serialize};

use crate::model::Fact;
use crate::progress::ProgressSink;

/// Lines shorter than this (in characters) are skipped unread.
pub const MIN_LINE_CHARS: usize = 3;

/// Counters describing one parse run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseStats {
    /// Lines read from the input.
    pub lines: usize,
    /// Lines skipped for being blank or too short.
    pub skipped_short: usize,
    /// Lines that failed to decode or had no disease name.
    pub malformed: usize,
    /// Records turned into facts.
    pub records: usize,
}

/// Facts extracted from an input, with parse statistics.
#[derive(Debug, Default)]
pub struct ParseResult {
    pub facts: Vec<Fact>,
    pub stats: ParseStats,
}

/// Outcome of parsing one line.
#[derive(Debug, PartialEq)]
pub enum LineOutcome {
    /// The line decoded into facts.
    Record(Vec<Fact>),
    /// The line was too short to hold a record.
    Short,
    /// The line could not be decoded.
    Malformed,
}

/// Parse a single input line.
pub fn parse_line(line: &str) -> LineOutcome {
    if line.chars().count() < MIN_LINE_CHARS {
        return LineOutcome::Short;
    }

    // Corpus exports often terminate each object with a comma.
    let trimmed = line.trim();
    let body = trimmed.strip_suffix(',').unwrap_or(trimmed);

    match serde_json::from_str::<RawRecord>(body) {
        Ok(record) => match extract_facts(record) {
            Some(facts) => LineOutcome::Record(facts),
            None => LineOutcome::Malformed,
        },
        Err(_) => LineOutcome::Malformed,
    }
}

/// Parses newline-delimited records, accumulating facts and statistics.
#[derive(Debug, Default)]
pub struct RecordParser {
    result: ParseResult,
}

impl RecordParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line.
    pub fn push_line(&mut self, line: &str) {
        let stats = &mut self.result.stats;
        stats.lines += 1;
        match parse_line(line) {
            LineOutcome::Record(facts) => {
                stats.records += 1;
                self.result.facts.extend(facts);
            }
            LineOutcome::Short => stats.skipped_short += 1,
            LineOutcome::Malformed => stats.malformed += 1,
        }
    }

    /// Finish parsing and hand over the facts.
    pub fn finish(self) -> ParseResult {
        self.result
    }

    /// Parse a whole in-memory input.
    pub fn parse_str(input: &str) -> ParseResult {
        let mut parser = Self::new();
        for line in input.split_inclusive('\n') {
            parser.push_raw(line.as_bytes());
        }
        parser.finish()
    }

    /// Parse from a buffered reader, advancing `progress` by bytes consumed.
    ///
    /// I/O errors are returned. Undecodable bytes within a line are replaced
    /// with U+FFFD before the line is decoded.
    pub fn parse_reader<R: BufRead>(mut reader: R, progress: &dyn ProgressSink) -> std::io::Result<ParseResult> {
        let mut parser = Self::new();
        let mut buf = Vec::new();
        loop {
            buf.clear();
            let read = reader.read_until(b'\n', &mut buf)?;
            if read == 0 {
                break;
            }
            parser.push_raw(&buf);
            progress.advance(read as u64);
        }
        Ok(parser.finish())
    }

    fn push_raw(&mut self, raw: &[u8]) {
        let line = String::from_utf8_lossy(raw);
        self.push_line(line.trim_end_matches(['\n', '\r']));
    }
}
