use std::fmt::{Display, Formatter};

/// Identity of a node: its position in the node table of the owning diagram.
///
/// Ids are dense and never change once assigned. `0` and `1` are the terminals.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Ref(u32);

impl Ref {
    /// The FALSE terminal.
    pub const ZERO: Ref = Ref(0);
    /// The TRUE terminal.
    pub const ONE: Ref = Ref(1);

    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn terminal(value: bool) -> Self {
        if value {
            Self::ONE
        } else {
            Self::ZERO
        }
    }

    /// Return the index of the reference.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    pub const fn is_terminal(self) -> bool {
        self.0 <= 1
    }

    /// Value of a terminal, `None` for decision nodes.
    pub const fn as_bool(self) -> Option<bool> {
        match self.0 {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        }
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_terminals() {
        assert!(Ref::ZERO.is_terminal());
        assert!(Ref::ONE.is_terminal());
        assert!(!Ref::new(2).is_terminal());
        assert_eq!(Ref::terminal(true), Ref::ONE);
        assert_eq!(Ref::ZERO.as_bool(), Some(false));
        assert_eq!(Ref::new(7).as_bool(), None);
        assert_eq!(Ref::new(7).to_string(), "@7");
    }
}
