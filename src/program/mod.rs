//! Program storage for BASIC
//!
//! Holds the parsed lines of a program keyed by line number, together with the
//! sorted line index that defines execution order and valid jump targets.

use crate::error::{ErrorKind, Result};
use crate::parser::{create_keyword_map, ProgramLine};
use crate::LineNumber;
use log::info;
use std::collections::BTreeMap;

/// Program line storage
#[derive(Debug, Clone, Default)]
pub struct ProgramTable {
    lines: BTreeMap<LineNumber, ProgramLine>,
    index: Vec<LineNumber>,
}

impl ProgramTable {
    /// Parse every non-blank source line into a program
    ///
    /// Stops at the first line that fails to parse or repeats an earlier line
    /// number.
    pub fn load<I, S>(source_lines: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let keywords = create_keyword_map();
        let mut lines = BTreeMap::new();

        for raw in source_lines {
            let raw = raw.as_ref().trim();
            if raw.is_empty() {
                continue;
            }

            let line = ProgramLine::parse(raw, &keywords)?;
            let line_number = line.line_number();
            if lines.contains_key(&line_number) {
                return Err(ErrorKind::DuplicateLineNumber(line_number).into());
            }
            lines.insert(line_number, line);
        }

        let index = lines.keys().copied().collect();
        info!("Loaded program with {} lines", lines.len());
        Ok(Self { lines, index })
    }

    /// Parse a whole source text
    pub fn from_source(source: &str) -> Result<Self> {
        Self::load(source.lines())
    }

    /// Get a program line
    pub fn get(&self, line_number: LineNumber) -> Option<&ProgramLine> {
        self.lines.get(&line_number)
    }

    /// Line numbers in execution order
    pub fn line_numbers(&self) -> &[LineNumber] {
        &self.index
    }

    /// Position of a jump target in the line index
    ///
    /// Only exact line numbers match; there is no rounding to the next line.
    pub fn position_of(&self, target: i64) -> Option<usize> {
        let target = LineNumber::try_from(target).ok()?;
        self.index.binary_search(&target).ok()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate over lines in line-number order
    pub fn iter(&self) -> impl Iterator<Item = &ProgramLine> {
        self.lines.values()
    }

    /// Render the program in line-number order between listing markers
    pub fn listing(&self) -> String {
        let mut out = String::from("## BASIC Code ##\n");
        for line in self.iter() {
            out.push_str(&line.to_string());
            out.push('\n');
        }
        out.push_str("## END ##\n");
        out
    }
}
