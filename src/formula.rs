//! Boolean formula trees and their evaluation.
//!
//! A [`Formula`] is the input of [`Robdd::build`][crate::robdd::Robdd::build].
//! It is evaluated against an explicit, immutable [`Valuation`]; there are no
//! shared variable cells.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Result, RobddError};
use crate::order::VarOrder;
use crate::types::Var;

/// Binary boolean connectives understood by Apply and the formula tree.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinaryOp {
    And,
    Or,
    Impl,
    Equiv,
}

impl BinaryOp {
    pub const ALL: [BinaryOp; 4] = [BinaryOp::And, BinaryOp::Or, BinaryOp::Impl, BinaryOp::Equiv];

    /// The operator table.
    pub fn apply(self, a: bool, b: bool) -> bool {
        match self {
            BinaryOp::And => a && b,
            BinaryOp::Or => a || b,
            BinaryOp::Impl => !a || b,
            BinaryOp::Equiv => a == b,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            BinaryOp::And => "AND",
            BinaryOp::Or => "OR",
            BinaryOp::Impl => "IMPL",
            BinaryOp::Equiv => "EQUIV",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|op| op.keyword() == keyword)
    }
}

/// Menu codes: `1` AND, `2` OR, `3` IMPL, `4` EQUIV.
impl TryFrom<u32> for BinaryOp {
    type Error = RobddError;

    fn try_from(code: u32) -> Result<Self> {
        match code {
            1 => Ok(BinaryOp::And),
            2 => Ok(BinaryOp::Or),
            3 => Ok(BinaryOp::Impl),
            4 => Ok(BinaryOp::Equiv),
            _ => Err(RobddError::InvalidOperator(code)),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Formula {
    Const(bool),
    Var(Var),
    Not(Box<Formula>),
    Binary(BinaryOp, Box<Formula>, Box<Formula>),
}

impl Formula {
    pub fn constant(value: bool) -> Self {
        Formula::Const(value)
    }

    pub fn var(id: u32) -> Self {
        Formula::Var(Var::new(id))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(inner: Self) -> Self {
        Formula::Not(Box::new(inner))
    }

    pub fn binary(op: BinaryOp, lhs: Self, rhs: Self) -> Self {
        Formula::Binary(op, Box::new(lhs), Box::new(rhs))
    }

    pub fn and(lhs: Self, rhs: Self) -> Self {
        Self::binary(BinaryOp::And, lhs, rhs)
    }

    pub fn or(lhs: Self, rhs: Self) -> Self {
        Self::binary(BinaryOp::Or, lhs, rhs)
    }

    pub fn implies(lhs: Self, rhs: Self) -> Self {
        Self::binary(BinaryOp::Impl, lhs, rhs)
    }

    pub fn equiv(lhs: Self, rhs: Self) -> Self {
        Self::binary(BinaryOp::Equiv, lhs, rhs)
    }

    /// Variables in the order they are first met, reading the formula left to right.
    pub fn variables(&self) -> VarOrder {
        fn collect(formula: &Formula, order: &mut VarOrder) {
            match formula {
                Formula::Const(_) => {}
                Formula::Var(v) => {
                    order.push(*v);
                }
                Formula::Not(inner) => collect(inner, order),
                Formula::Binary(_, lhs, rhs) => {
                    collect(lhs, order);
                    collect(rhs, order);
                }
            }
        }

        let mut order = VarOrder::default();
        collect(self, &mut order);
        order
    }

    /// Evaluates the formula under `valuation`.
    ///
    /// AND, OR and IMPL short-circuit on their left operand, so a variable on
    /// the right is only required to be bound when it is actually read.
    pub fn eval(&self, valuation: &Valuation) -> Result<bool> {
        match self {
            Formula::Const(value) => Ok(*value),
            Formula::Var(v) => valuation.get(*v).ok_or(RobddError::UnboundVariable(*v)),
            Formula::Not(inner) => Ok(!inner.eval(valuation)?),
            Formula::Binary(op, lhs, rhs) => {
                let a = lhs.eval(valuation)?;
                match (op, a) {
                    (BinaryOp::And, false) => Ok(false),
                    (BinaryOp::Or, true) => Ok(true),
                    (BinaryOp::Impl, false) => Ok(true),
                    _ => Ok(op.apply(a, rhs.eval(valuation)?)),
                }
            }
        }
    }
}

/// Prefix syntax, e.g. `(AND x1 (NOT x2))`.
impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Const(true) => write!(f, "T"),
            Formula::Const(false) => write!(f, "F"),
            Formula::Var(v) => write!(f, "{}", v),
            Formula::Not(inner) => write!(f, "(NOT {})", inner),
            Formula::Binary(op, lhs, rhs) => write!(f, "({} {} {})", op, lhs, rhs),
        }
    }
}

/// A partial assignment of truth values, addressed by variable.
///
/// Storage grows with the number of bound variables, not with their identifiers.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Valuation {
    values: BTreeMap<Var, bool>,
}

impl Valuation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, var: Var) -> Option<bool> {
        self.values.get(&var).copied()
    }

    pub fn set(&mut self, var: Var, value: bool) {
        self.values.insert(var, value);
    }

    /// A copy of this valuation with `var` set to `value`.
    pub fn with(&self, var: Var, value: bool) -> Self {
        let mut result = self.clone();
        result.set(var, value);
        result
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Bound variables in ascending order of their identifiers.
    pub fn iter(&self) -> impl Iterator<Item = (Var, bool)> + '_ {
        self.values.iter().map(|(&var, &value)| (var, value))
    }
}

impl FromIterator<(Var, bool)> for Valuation {
    fn from_iter<I: IntoIterator<Item = (Var, bool)>>(iter: I) -> Self {
        let mut valuation = Valuation::new();
        for (var, value) in iter {
            valuation.set(var, value);
        }
        valuation
    }
}
