//! Parser for BASIC lines, statements and expressions
//!
//! Turns tokenized source lines into [`ProgramLine`]s holding one of the five
//! statement variants, and evaluates the flat `value op value` expressions
//! those statements carry.

use crate::error::{BasicError, ErrorKind, Result};
use crate::tokenizer::tokenize;
use crate::variables::{lookup, VariableStore};
use crate::LineNumber;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    // Arithmetic
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    Power,

    // Comparison
    Equal,
    NotEqual,
    LessThan,
    LessThanOrEqual,
    GreaterThan,
    GreaterThanOrEqual,
}

const OPERATORS: &[(&str, BinaryOperator)] = &[
    ("+", BinaryOperator::Add),
    ("-", BinaryOperator::Subtract),
    ("*", BinaryOperator::Multiply),
    ("/", BinaryOperator::Divide),
    ("%", BinaryOperator::Modulo),
    ("^", BinaryOperator::Power),
    ("==", BinaryOperator::Equal),
    ("!=", BinaryOperator::NotEqual),
    ("<", BinaryOperator::LessThan),
    ("<=", BinaryOperator::LessThanOrEqual),
    (">", BinaryOperator::GreaterThan),
    (">=", BinaryOperator::GreaterThanOrEqual),
];

impl BinaryOperator {
    /// Look up an operator by its source symbol
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        OPERATORS
            .iter()
            .find(|(sym, _)| *sym == symbol)
            .map(|(_, op)| *op)
    }

    /// Apply the operator; comparisons yield 1 for true and 0 for false
    pub fn apply(self, left: i64, right: i64) -> Result<i64> {
        let result = match self {
            BinaryOperator::Add => left.checked_add(right),
            BinaryOperator::Subtract => left.checked_sub(right),
            BinaryOperator::Multiply => left.checked_mul(right),
            BinaryOperator::Divide => return floor_div(left, right),
            BinaryOperator::Modulo => return floor_mod(left, right),
            BinaryOperator::Power => return power(left, right),
            BinaryOperator::Equal => Some((left == right) as i64),
            BinaryOperator::NotEqual => Some((left != right) as i64),
            BinaryOperator::LessThan => Some((left < right) as i64),
            BinaryOperator::LessThanOrEqual => Some((left <= right) as i64),
            BinaryOperator::GreaterThan => Some((left > right) as i64),
            BinaryOperator::GreaterThanOrEqual => Some((left >= right) as i64),
        };
        result.ok_or_else(|| ErrorKind::Overflow.into())
    }
}

/// Division rounding towards negative infinity
fn floor_div(left: i64, right: i64) -> Result<i64> {
    if right == 0 {
        return Err(ErrorKind::DivisionByZero.into());
    }
    let quotient = left.checked_div(right).ok_or(ErrorKind::Overflow)?;
    if left % right != 0 && (left < 0) != (right < 0) {
        Ok(quotient - 1)
    } else {
        Ok(quotient)
    }
}

/// Remainder taking the sign of the divisor, paired with [`floor_div`]
fn floor_mod(left: i64, right: i64) -> Result<i64> {
    if right == 0 {
        return Err(ErrorKind::DivisionByZero.into());
    }
    // i64::MIN % -1 is zero, wrapping_rem gets that right without overflowing
    let remainder = left.wrapping_rem(right);
    if remainder != 0 && (remainder < 0) != (right < 0) {
        Ok(remainder + right)
    } else {
        Ok(remainder)
    }
}

fn power(base: i64, exponent: i64) -> Result<i64> {
    if exponent < 0 {
        return Err(ErrorKind::NegativeExponent(exponent).into());
    }
    // Bases whose powers never grow are exact for any exponent
    match base {
        0 => return Ok((exponent == 0) as i64),
        1 => return Ok(1),
        -1 => return Ok(if exponent % 2 == 0 { 1 } else { -1 }),
        _ => {}
    }
    let exponent = u32::try_from(exponent).map_err(|_| ErrorKind::Overflow)?;
    base.checked_pow(exponent)
        .ok_or_else(|| ErrorKind::Overflow.into())
}

/// Evaluate a flat `[left, operator, right]` expression
pub fn evaluate<S: AsRef<str>>(tokens: &[S], variables: &VariableStore) -> Result<i64> {
    match tokens {
        [left, op, right] => evaluate_parts(left.as_ref(), op.as_ref(), right.as_ref(), variables),
        _ => Err(ErrorKind::MalformedExpression(tokens.len()).into()),
    }
}

fn evaluate_parts(left: &str, op: &str, right: &str, variables: &VariableStore) -> Result<i64> {
    let left_val = lookup(left, variables)?;
    let right_val = lookup(right, variables)?;
    let op = BinaryOperator::from_symbol(op)
        .ok_or_else(|| ErrorKind::UnknownOperator(op.to_string()))?;
    op.apply(left_val, right_val)
}

/// A flat binary expression, kept as source tokens until evaluated
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub left: String,
    pub operator: String,
    pub right: String,
}

impl Expression {
    fn from_tokens(tokens: &[String]) -> Self {
        Self {
            left: tokens[0].clone(),
            operator: tokens[1].clone(),
            right: tokens[2].clone(),
        }
    }

    pub fn evaluate(&self, variables: &VariableStore) -> Result<i64> {
        evaluate_parts(&self.left, &self.operator, &self.right, variables)
    }
}

/// Statement keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Rem,
    Let,
    Goto,
    Print,
    If,
}

const KEYWORDS: &[(&str, Keyword)] = &[
    ("REM", Keyword::Rem),
    ("LET", Keyword::Let),
    ("GOTO", Keyword::Goto),
    ("PRINT", Keyword::Print),
    ("IF", Keyword::If),
];

impl Keyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Keyword::Rem => "REM",
            Keyword::Let => "LET",
            Keyword::Goto => "GOTO",
            Keyword::Print => "PRINT",
            Keyword::If => "IF",
        }
    }
}

/// Create the keyword lookup table used when parsing lines
pub fn create_keyword_map() -> HashMap<&'static str, Keyword> {
    KEYWORDS.iter().copied().collect()
}

/// What running a statement asks the executor to do
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Outcome {
    /// Line number to continue at instead of the next line
    pub jump: Option<i64>,
    /// Variable to set before moving on
    pub assign: Option<(String, i64)>,
}

/// The five statements
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// REM comment
    Rem { comment: String },
    /// LET var = e1 op e2
    Let {
        variable: String,
        expression: Expression,
    },
    /// GOTO target
    Goto { target: String },
    /// PRINT value
    Print { value: String },
    /// IF e1 op e2 GOTO target
    If {
        condition: Expression,
        target: String,
    },
}

impl Statement {
    /// Build a statement from the operand tokens that follow its keyword
    pub fn build(keyword: Keyword, operands: &[String]) -> Result<Self> {
        let malformed = || BasicError::from(ErrorKind::MalformedStatement(keyword.as_str()));

        match keyword {
            Keyword::Rem => Ok(Statement::Rem {
                comment: operands.join(" "),
            }),
            Keyword::Let => {
                if operands.len() != 5 || operands[1] != "=" {
                    return Err(malformed());
                }
                Ok(Statement::Let {
                    variable: operands[0].clone(),
                    expression: Expression::from_tokens(&operands[2..]),
                })
            }
            Keyword::Goto => match operands {
                [target] => Ok(Statement::Goto {
                    target: target.clone(),
                }),
                _ => Err(malformed()),
            },
            Keyword::Print => match operands {
                [value] => Ok(Statement::Print {
                    value: value.clone(),
                }),
                _ => Err(malformed()),
            },
            Keyword::If => {
                if operands.len() != 5 || operands[3] != "GOTO" {
                    return Err(malformed());
                }
                Ok(Statement::If {
                    condition: Expression::from_tokens(&operands[..3]),
                    target: operands[4].clone(),
                })
            }
        }
    }

    pub fn keyword(&self) -> Keyword {
        match self {
            Statement::Rem { .. } => Keyword::Rem,
            Statement::Let { .. } => Keyword::Let,
            Statement::Goto { .. } => Keyword::Goto,
            Statement::Print { .. } => Keyword::Print,
            Statement::If { .. } => Keyword::If,
        }
    }

    /// Run the statement against the current variables
    ///
    /// Statements never modify variables themselves; LET hands its assignment
    /// back in the [`Outcome`]. PRINT writes one value per line to `output`.
    pub fn run<W: Write>(&self, variables: &VariableStore, output: &mut W) -> Result<Outcome> {
        match self {
            Statement::Rem { .. } => Ok(Outcome::default()),
            Statement::Let {
                variable,
                expression,
            } => {
                if variable.starts_with(|c: char| c.is_ascii_digit()) {
                    return Err(ErrorKind::InvalidVariableName(variable.clone()).into());
                }
                let value = expression.evaluate(variables)?;
                Ok(Outcome {
                    jump: None,
                    assign: Some((variable.clone(), value)),
                })
            }
            Statement::Goto { target } => Ok(Outcome {
                jump: Some(lookup(target, variables)?),
                assign: None,
            }),
            Statement::Print { value } => {
                let value = lookup(value, variables)?;
                writeln!(output, "{}", value)?;
                output.flush()?;
                Ok(Outcome::default())
            }
            Statement::If { condition, target } => {
                let jump = if condition.evaluate(variables)? != 0 {
                    Some(lookup(target, variables)?)
                } else {
                    None
                };
                Ok(Outcome { jump, assign: None })
            }
        }
    }
}

/// A numbered source line and its statement
#[derive(Debug, Clone, PartialEq)]
pub struct ProgramLine {
    line_number: LineNumber,
    statement: Statement,
    tokens: Vec<String>,
}

impl ProgramLine {
    /// Parse a raw source line
    pub fn parse(raw: &str, keywords: &HashMap<&'static str, Keyword>) -> Result<Self> {
        Self::from_tokens(tokenize(raw), keywords)
    }

    /// Build a line from already tokenized source
    pub fn from_tokens(
        tokens: Vec<String>,
        keywords: &HashMap<&'static str, Keyword>,
    ) -> Result<Self> {
        let line_number = match tokens.first() {
            Some(token) if is_line_number(token) => token
                .parse::<LineNumber>()
                .map_err(|_| ErrorKind::LineNumberOutOfRange(token.clone()))?,
            _ => return Err(ErrorKind::MissingLineNumber(tokens.join(" ")).into()),
        };

        let keyword = tokens
            .get(1)
            .ok_or_else(|| BasicError::from(ErrorKind::MissingStatement).at_line(line_number))?;
        let keyword = *keywords.get(keyword.as_str()).ok_or_else(|| {
            BasicError::from(ErrorKind::UnknownStatement(keyword.clone())).at_line(line_number)
        })?;

        let statement =
            Statement::build(keyword, &tokens[2..]).map_err(|e| e.at_line(line_number))?;

        Ok(Self {
            line_number,
            statement,
            tokens,
        })
    }

    pub fn line_number(&self) -> LineNumber {
        self.line_number
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Run the line's statement, tagging any failure with the line number
    pub fn run<W: Write>(&self, variables: &VariableStore, output: &mut W) -> Result<Outcome> {
        self.statement
            .run(variables, output)
            .map_err(|e| e.at_line(self.line_number))
    }
}

impl fmt::Display for ProgramLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens.join(" "))
    }
}

/// Line numbers are plain digit strings; signs are not allowed
fn is_line_number(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}
