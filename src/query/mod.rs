// src/query/mod.rs

//! Package filter expressions
//!
//! Mirrors restrict what they download with a filter such as
//! `Priority (required) | Name (nginx), $Architecture (amd64)`.
//!
//! # Grammar
//!
//! ```text
//! query     := or
//! or        := and ('|' and)*
//! and       := not (',' not)*
//! not       := '!' not | primary
//! primary   := '(' or ')' | condition
//! condition := word [ '(' [operator] value ')' ] [ '{' architecture '}' ]
//! ```
//!
//! A condition whose word starts with an uppercase letter or `$` tests a
//! package field; any other word names a package. Operators are `=`
//! (default), `<<`, `<=`, `<`, `>>`, `>=`, `>`, `%` (glob) and `~` (regex).
//!
//! Only parsing lives here; the mirror edit workflow needs nothing more than
//! a pass/fail answer with a diagnostic.

mod lexer;
mod parser;

use std::fmt;
use thiserror::Error;

/// Parse a filter expression
pub fn parse(input: &str) -> Result<Query, QueryParseError> {
    parser::Parser::new(input)?.parse()
}

/// Parse failure with the byte offset where it was detected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message} at position {position}")]
pub struct QueryParseError {
    pub position: usize,
    pub message: String,
}

impl QueryParseError {
    pub(crate) fn new(position: usize, message: impl Into<String>) -> Self {
        Self {
            position,
            message: message.into(),
        }
    }
}

/// Parsed filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Or(Box<Query>, Box<Query>),
    And(Box<Query>, Box<Query>),
    Not(Box<Query>),
    Field(FieldCondition),
    Package(PackageCondition),
}

/// Comparison between a package attribute and an operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Equal,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    /// Shell-style glob
    Pattern,
    Regex,
}

impl Relation {
    pub(crate) fn from_operator(op: &str) -> Option<Self> {
        match op {
            "=" => Some(Relation::Equal),
            "<<" => Some(Relation::Less),
            // Plain `<` and `>` keep their historical Debian meaning
            "<=" | "<" => Some(Relation::LessOrEqual),
            ">>" => Some(Relation::Greater),
            ">=" | ">" => Some(Relation::GreaterOrEqual),
            "%" => Some(Relation::Pattern),
            "~" => Some(Relation::Regex),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Relation::Equal => "=",
            Relation::Less => "<<",
            Relation::LessOrEqual => "<=",
            Relation::Greater => ">>",
            Relation::GreaterOrEqual => ">=",
            Relation::Pattern => "%",
            Relation::Regex => "~",
        }
    }
}

/// Test on a package field, e.g. `Priority (required)` or `$Source`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldCondition {
    pub field: String,
    pub relation: Relation,
    /// `None` means "field is present"
    pub value: Option<String>,
}

/// Test on a package name, e.g. `nginx (>= 1.24) {amd64}`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageCondition {
    pub name: String,
    pub relation: Relation,
    pub version: Option<String>,
    pub architecture: Option<String>,
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Query::Or(l, r) => write!(f, "({l} | {r})"),
            Query::And(l, r) => write!(f, "({l}, {r})"),
            Query::Not(q) => write!(f, "!{q}"),
            Query::Field(c) => match &c.value {
                Some(v) => write!(f, "{} ({} {})", c.field, c.relation.as_str(), v),
                None => write!(f, "{}", c.field),
            },
            Query::Package(c) => {
                write!(f, "{}", c.name)?;
                if let Some(v) = &c.version {
                    write!(f, " ({} {})", c.relation.as_str(), v)?;
                }
                if let Some(a) = &c.architecture {
                    write!(f, " {{{a}}}")?;
                }
                Ok(())
            }
        }
    }
}
