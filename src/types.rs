//! Type-safe wrappers for variables, levels and literals.
//!
//! A [`Var`] names a variable of the formula (`x7` is `Var(7)`), while a [`Level`]
//! is the 1-based position of a variable in a diagram's variable order. Nodes
//! store variables; levels are derived from the order of the owning diagram.
use std::fmt;

/// A variable identifier (1-indexed).
///
/// # Invariants
///
/// - Variable IDs must be >= 1 (0 is reserved for terminals)
/// - Variable IDs are independent of their position in the variable ordering
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Var(u32);

impl Var {
    /// Creates a new variable with the given ID.
    ///
    /// # Panics
    ///
    /// Panics if `id == 0`. Variables must be 1-indexed.
    pub fn new(id: u32) -> Self {
        assert_ne!(id, 0, "Variable IDs must be >= 1");
        Var(id)
    }

    /// Returns the raw variable ID as a `u32`.
    pub fn id(self) -> u32 {
        self.0
    }

    /// Positive literal of this variable.
    pub fn pos(self) -> Lit {
        Lit::new(self, true)
    }

    /// Negative literal of this variable.
    pub fn neg(self) -> Lit {
        Lit::new(self, false)
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

impl From<Var> for u32 {
    fn from(var: Var) -> Self {
        var.0
    }
}

/// A level in the variable ordering (1-indexed).
///
/// Level 1 is the topmost variable of the order. Terminals sit one level below
/// the last variable, so for a universe of `n` variables the terminal level is `n + 1`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Level(u32);

impl Level {
    /// Creates a new level with the given index.
    ///
    /// # Panics
    ///
    /// Panics if `index == 0`.
    pub fn new(index: u32) -> Self {
        assert_ne!(index, 0, "Levels must be >= 1");
        Level(index)
    }

    /// The level of the terminal nodes in a universe of `num_vars` variables.
    pub fn terminal(num_vars: usize) -> Self {
        Level(num_vars as u32 + 1)
    }

    /// Returns the raw level index.
    pub fn index(self) -> u32 {
        self.0
    }

    /// Number of levels strictly between `self` and `below`.
    ///
    /// # Panics
    ///
    /// Panics if `below` is not strictly below `self`.
    pub fn gap(self, below: Level) -> u32 {
        assert!(below > self, "{} is not below {}", below, self);
        below.0 - self.0 - 1
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl From<Level> for u32 {
    fn from(level: Level) -> Self {
        level.0
    }
}

/// A variable together with the value it is assigned on a path.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Lit {
    var: Var,
    value: bool,
}

impl Lit {
    pub fn new(var: Var, value: bool) -> Self {
        Self { var, value }
    }

    pub fn var(self) -> Var {
        self.var
    }

    pub fn value(self) -> bool {
        self.value
    }

    pub fn is_positive(self) -> bool {
        self.value
    }

    /// Signed integer form: `x3` is `3`, `~x3` is `-3`.
    pub fn to_dimacs(self) -> i32 {
        let id = self.var.id() as i32;
        if self.value {
            id
        } else {
            -id
        }
    }

    /// # Panics
    ///
    /// Panics if `lit == 0`.
    pub fn from_dimacs(lit: i32) -> Self {
        Self::new(Var::new(lit.unsigned_abs()), lit > 0)
    }
}

impl fmt::Display for Lit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value {
            write!(f, "{}", self.var)
        } else {
            write!(f, "~{}", self.var)
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_var_creation() {
        let v1 = Var::new(1);
        let v2 = Var::new(2);
        assert_eq!(v1.id(), 1);
        assert_eq!(v2.id(), 2);
        assert!(v1 < v2);
        assert_eq!(v2.to_string(), "x2");
    }

    #[test]
    #[should_panic(expected = "Variable IDs must be >= 1")]
    fn test_var_zero_panics() {
        Var::new(0);
    }

    #[test]
    fn test_level_gap() {
        let l1 = Level::new(1);
        let l3 = Level::new(3);
        assert_eq!(l1.gap(Level::new(2)), 0);
        assert_eq!(l1.gap(l3), 1);
        assert_eq!(Level::terminal(3), Level::new(4));
        assert_eq!(Level::terminal(0), Level::new(1));
    }

    #[test]
    #[should_panic(expected = "is not below")]
    fn test_level_gap_upwards_panics() {
        Level::new(3).gap(Level::new(2));
    }

    #[test]
    fn test_lit_dimacs() {
        let lit = Lit::from_dimacs(-5);
        assert_eq!(lit.var(), Var::new(5));
        assert!(!lit.is_positive());
        assert_eq!(lit.to_dimacs(), -5);
        assert_eq!(lit.to_string(), "~x5");
        assert_eq!(Var::new(2).pos().to_dimacs(), 2);
    }
}
