//! Line-numbered BASIC interpreter
//!
//! A minimal interpreter for a BASIC dialect where every line carries an explicit
//! line number, a statement keyword and its operands. Programs are loaded into a
//! [`ProgramTable`] and run by an [`Executor`] that walks the lines in order,
//! following GOTO and IF jumps over a single integer variable namespace.

pub mod executor;
pub mod parser;
pub mod program;
pub mod tokenizer;
pub mod variables;

// Re-export core types for convenience
pub use crate::error::{BasicError, ErrorKind, Result};
pub use executor::Executor;
pub use parser::{evaluate, BinaryOperator, Expression, Keyword, Outcome, ProgramLine, Statement};
pub use program::ProgramTable;
pub use tokenizer::tokenize;
pub use variables::{lookup, VariableStore};

/// Line numbers as written in the source
pub type LineNumber = u32;

/// Core error handling types for the interpreter
pub mod error {
    use crate::LineNumber;
    use std::fmt;
    use thiserror::Error;

    /// Result type for interpreter operations
    pub type Result<T> = std::result::Result<T, BasicError>;

    /// Every way loading or running a program can fail
    #[derive(Debug, Error)]
    pub enum ErrorKind {
        // Value and expression errors
        #[error("unknown variable `{0}`")]
        UnknownVariable(String),
        #[error("malformed expression: expected 3 tokens, found {0}")]
        MalformedExpression(usize),
        #[error("unknown operator `{0}`")]
        UnknownOperator(String),
        #[error("division by zero")]
        DivisionByZero,
        #[error("negative exponent {0}")]
        NegativeExponent(i64),
        #[error("integer overflow")]
        Overflow,

        // Statement errors
        #[error("malformed {0} statement")]
        MalformedStatement(&'static str),
        #[error("invalid variable name `{0}`")]
        InvalidVariableName(String),

        // Line and program errors
        #[error("the line \"{0}\" does not have a valid line number")]
        MissingLineNumber(String),
        #[error("line number {0} is out of range (maximum {max})", max = LineNumber::MAX)]
        LineNumberOutOfRange(String),
        #[error("missing statement keyword")]
        MissingStatement,
        #[error("unknown statement `{0}`")]
        UnknownStatement(String),
        #[error("multiple lines with line number {0}")]
        DuplicateLineNumber(LineNumber),
        #[error("invalid jump target {0}")]
        InvalidJumpTarget(i64),

        // Output errors
        #[error("output error: {0}")]
        Io(#[from] std::io::Error),
    }

    /// An [`ErrorKind`] together with the line it was raised on, when known
    #[derive(Debug)]
    pub struct BasicError {
        line: Option<LineNumber>,
        kind: ErrorKind,
    }

    impl BasicError {
        pub fn new(kind: ErrorKind) -> Self {
            Self { line: None, kind }
        }

        /// Tag the error with a line number, keeping any tag already present
        pub fn at_line(mut self, line: LineNumber) -> Self {
            self.line.get_or_insert(line);
            self
        }

        pub fn kind(&self) -> &ErrorKind {
            &self.kind
        }

        pub fn line(&self) -> Option<LineNumber> {
            self.line
        }
    }

    impl fmt::Display for BasicError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self.line {
                Some(line) => write!(f, "line {}: {}", line, self.kind),
                None => write!(f, "{}", self.kind),
            }
        }
    }

    impl std::error::Error for BasicError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            match &self.kind {
                ErrorKind::Io(e) => Some(e),
                _ => None,
            }
        }
    }

    impl From<ErrorKind> for BasicError {
        fn from(kind: ErrorKind) -> Self {
            Self::new(kind)
        }
    }

    impl From<std::io::Error> for BasicError {
        fn from(e: std::io::Error) -> Self {
            Self::new(ErrorKind::Io(e))
        }
    }

}
