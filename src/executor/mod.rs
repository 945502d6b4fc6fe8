//! Execution engine for BASIC programs
//!
//! Walks a [`ProgramTable`] in line-number order, applying each statement's
//! assignment and jump while PRINT output goes to a caller-supplied writer.

use crate::error::{BasicError, ErrorKind, Result};
use crate::program::ProgramTable;
use crate::variables::VariableStore;
use crate::LineNumber;
use log::{debug, info, trace};
use std::io::Write;

/// Program executor
///
/// Each [`step`](Executor::step) runs the line at the current position. The
/// executor is finished once the position runs past the last line; a GOTO
/// cycle never finishes.
#[derive(Debug)]
pub struct Executor<'p, W: Write> {
    program: &'p ProgramTable,
    // Index into program.line_numbers() of the next line to run
    position: usize,
    variables: VariableStore,
    output: W,
}

impl<'p, W: Write> Executor<'p, W> {
    /// Create an executor positioned at the first line, with no variables
    pub fn new(program: &'p ProgramTable, output: W) -> Self {
        Self {
            program,
            position: 0,
            variables: VariableStore::new(),
            output,
        }
    }

    /// Run until the program falls off its last line
    pub fn run(&mut self) -> Result<()> {
        while self.step()? {}
        self.output.flush()?;
        info!("Program finished");
        Ok(())
    }

    /// Execute one line
    ///
    /// Returns `false` without doing anything once the program has finished.
    pub fn step(&mut self) -> Result<bool> {
        let Some(line_number) = self.current_line() else {
            return Ok(false);
        };
        let line = self
            .program
            .get(line_number)
            .ok_or_else(|| BasicError::from(ErrorKind::InvalidJumpTarget(line_number.into())))?;

        debug!("Executing line {}: {}", line_number, line);
        let outcome = line.run(&self.variables, &mut self.output)?;

        if let Some((name, value)) = outcome.assign {
            trace!("{} = {}", name, value);
            self.variables.set(name, value);
        }

        match outcome.jump {
            Some(target) => {
                self.position = self.program.position_of(target).ok_or_else(|| {
                    BasicError::from(ErrorKind::InvalidJumpTarget(target)).at_line(line_number)
                })?;
                debug!("Jump from line {} to line {}", line_number, target);
            }
            None => self.position += 1,
        }

        Ok(true)
    }

    /// Line number that the next step will execute
    pub fn current_line(&self) -> Option<LineNumber> {
        self.program.line_numbers().get(self.position).copied()
    }

    pub fn is_finished(&self) -> bool {
        self.current_line().is_none()
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    /// Give back the output writer
    pub fn into_output(self) -> W {
        self.output
    }
}
