use crate::reference::Ref;
use crate::types::Var;
use crate::utils::{pairing3, MyHash};

/// A record of the node table.
///
/// `variable == 0` marks a terminal; terminals point back to themselves.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Node {
    pub variable: u32,
    pub low: Ref,
    pub high: Ref,
}

impl Node {
    pub fn new(variable: Var, low: Ref, high: Ref) -> Self {
        Self {
            variable: variable.id(),
            low,
            high,
        }
    }

    pub fn terminal(node: Ref) -> Self {
        assert!(node.is_terminal(), "{} is not a terminal", node);
        Self {
            variable: 0,
            low: node,
            high: node,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.variable == 0
    }

    /// The tested variable, `None` for terminals.
    pub fn var(&self) -> Option<Var> {
        if self.is_terminal() {
            None
        } else {
            Some(Var::new(self.variable))
        }
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        pairing3(
            self.variable as u64,
            self.low.get() as u64,
            self.high.get() as u64,
        )
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_terminal_points_to_itself() {
        let one = Node::terminal(Ref::ONE);
        assert!(one.is_terminal());
        assert_eq!(one.low, Ref::ONE);
        assert_eq!(one.high, Ref::ONE);
        assert_eq!(one.var(), None);
    }

    #[test]
    fn test_hash_distinguishes_children() {
        let x = Var::new(1);
        let a = Node::new(x, Ref::ZERO, Ref::ONE);
        let b = Node::new(x, Ref::ONE, Ref::ZERO);
        assert_ne!(MyHash::hash(&a), MyHash::hash(&b));
        assert_eq!(a.var(), Some(x));
    }
}
