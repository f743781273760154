//! Errors reported by the engine and the formula parser.

use thiserror::Error;

use crate::reference::Ref;
use crate::types::Var;

pub type Result<T, E = RobddError> = std::result::Result<T, E>;

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum RobddError {
    /// The formula mentions a variable that the valuation (or the diagram universe) does not know.
    #[error("variable {0} is not bound")]
    UnboundVariable(Var),

    #[error("node table is full (capacity {capacity})")]
    NodeTableFull { capacity: usize },

    #[error("operation cache is full (capacity {capacity})")]
    CacheFull { capacity: usize },

    #[error("invalid operator code {0}, expected 1 (AND), 2 (OR), 3 (IMPL) or 4 (EQUIV)")]
    InvalidOperator(u32),

    #[error("variables {0} and {1} are ordered differently in the two diagrams")]
    IncompatibleOrder(Var, Var),

    #[error("variable {0} is not in the variable order")]
    UnknownVariable(Var),

    #[error("node {0} does not exist")]
    UnknownNode(Ref),

    /// `mk` was asked for a node whose variable is not above both children.
    #[error("variable {var} must be above its children {low} and {high}")]
    UnorderedNode { var: Var, low: Ref, high: Ref },

    #[error("{name} must be in the range {min}..=31, got {bits}")]
    InvalidConfig {
        name: &'static str,
        bits: usize,
        min: usize,
    },

    #[error("diagram has no root, build it first")]
    NotBuilt,

    #[error(transparent)]
    Parse(#[from] ParseError),
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
#[error("parse error at offset {offset}: {kind}")]
pub struct ParseError {
    pub offset: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, Eq, PartialEq, Error)]
pub enum ParseErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEnd,

    #[error("unexpected token '{0}'")]
    UnexpectedToken(String),

    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("invalid variable name '{0}', expected a letter followed by a positive number")]
    InvalidVariable(String),

    #[error("trailing input '{0}'")]
    TrailingInput(String),
}

impl ParseError {
    pub fn new(offset: usize, kind: ParseErrorKind) -> Self {
        Self { offset, kind }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_messages() {
        let err = RobddError::InvalidOperator(7);
        assert!(err.to_string().starts_with("invalid operator code 7"));

        let err = RobddError::from(ParseError::new(3, ParseErrorKind::UnexpectedEnd));
        assert_eq!(
            err.to_string(),
            "parse error at offset 3: unexpected end of input"
        );

        let err = RobddError::InvalidConfig {
            name: "storage bits",
            bits: 40,
            min: 1,
        };
        assert_eq!(err.to_string(), "storage bits must be in the range 1..=31, got 40");

        let err = RobddError::IncompatibleOrder(Var::new(1), Var::new(2));
        assert_eq!(
            err.to_string(),
            "variables x1 and x2 are ordered differently in the two diagrams"
        );
    }
}
