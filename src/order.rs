//! The variable universe of a diagram.
//!
//! A [`VarOrder`] is an ordered sequence of distinct variables. The 1-based
//! position of a variable in the sequence is its [`Level`]; levels strictly
//! increase from the root of a diagram towards its terminals.

use std::collections::{HashMap, HashSet};
use std::fmt;

use crate::error::{Result, RobddError};
use crate::types::{Level, Var};

#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct VarOrder {
    vars: Vec<Var>,
    levels: HashMap<Var, Level>,
}

impl VarOrder {
    /// Creates an order from a sequence of variables.
    ///
    /// Repeated variables keep their first position.
    pub fn new(vars: impl IntoIterator<Item = Var>) -> Self {
        let mut order = Self::default();
        for v in vars {
            order.push(v);
        }
        order
    }

    /// Order `x1 < x2 < ... < xn`.
    pub fn natural(num_vars: u32) -> Self {
        Self::new((1..=num_vars).map(Var::new))
    }

    /// Appends `var` at the bottom of the order, unless it is already present.
    pub fn push(&mut self, var: Var) -> Level {
        if let Some(&level) = self.levels.get(&var) {
            return level;
        }
        self.vars.push(var);
        let level = Level::new(self.vars.len() as u32);
        self.levels.insert(var, level);
        level
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn vars(&self) -> &[Var] {
        &self.vars
    }

    pub fn contains(&self, var: Var) -> bool {
        self.levels.contains_key(&var)
    }

    pub fn level(&self, var: Var) -> Option<Level> {
        self.levels.get(&var).copied()
    }

    /// Level of the terminal nodes: one below the last variable.
    pub fn terminal_level(&self) -> Level {
        Level::terminal(self.len())
    }

    /// Merges two orders into one that respects both.
    ///
    /// Variables shared by both orders must appear in the same relative order,
    /// otherwise no merged order exists. Ties between variables that only one
    /// side knows are broken in favour of `self`.
    pub fn merge(&self, other: &VarOrder) -> Result<VarOrder> {
        let shared: HashSet<Var> = self
            .vars
            .iter()
            .copied()
            .filter(|&v| other.contains(v))
            .collect();

        let mut merged = VarOrder::default();
        let (a, b) = (&self.vars, &other.vars);
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            if a[i] == b[j] {
                merged.push(a[i]);
                i += 1;
                j += 1;
            } else if !shared.contains(&a[i]) {
                merged.push(a[i]);
                i += 1;
            } else if !shared.contains(&b[j]) {
                merged.push(b[j]);
                j += 1;
            } else {
                // `a` puts a[i] before b[j], while `b` puts b[j] before a[i].
                return Err(RobddError::IncompatibleOrder(a[i], b[j]));
            }
        }
        for &v in a[i..].iter().chain(&b[j..]) {
            merged.push(v);
        }

        Ok(merged)
    }
}

impl fmt::Display for VarOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, v) in self.vars.iter().enumerate() {
            if i > 0 {
                write!(f, " < ")?;
            }
            write!(f, "{}", v)?;
        }
        write!(f, "]")
    }
}
