use std::collections::HashMap;

use log::debug;
use num_bigint::BigUint;

use crate::error::{Result, RobddError};
use crate::formula::Valuation;
use crate::reference::Ref;
use crate::robdd::Robdd;
use crate::types::Lit;

impl Robdd {
    /// Returns one satisfying assignment for the function rooted at `node`, if any exists.
    ///
    /// The assignment lists the variables tested along one path to the TRUE terminal,
    /// from the root down. Variables off the path are free.
    /// The low branch is taken whenever it does not lead straight to FALSE.
    ///
    /// Returns `None` if `node` is the constant false function.
    pub fn any_sat(&self, node: Ref) -> Result<Option<Vec<Lit>>> {
        self.node(node)?;

        if self.is_zero(node) {
            return Ok(None);
        }

        let mut path = Vec::new();
        let mut current = node;

        while !self.is_one(current) {
            let n = self.node_at(current);
            let var = match n.var() {
                Some(var) => var,
                None => unreachable!("FALSE is never reached on a satisfiable path"),
            };

            if !self.is_zero(n.low) {
                path.push(var.neg());
                current = n.low;
            } else {
                path.push(var.pos());
                current = n.high;
            }
        }

        Ok(Some(path))
    }

    /// Number of assignments over the whole variable order that satisfy `node`.
    pub fn sat_count(&self, node: Ref) -> Result<BigUint> {
        let root = self.node(node)?;
        let mut cache = HashMap::new();
        let count = self._sat_count(node, &mut cache);
        // Variables above the root are free.
        let skipped = self.level_of(&root).index() - 1;
        let count = count << skipped;
        debug!("sat_count(node = {}) -> {}", node, count);
        Ok(count)
    }

    /// Counts the assignments of the variables from the level of `node` downwards.
    fn _sat_count(&self, node: Ref, cache: &mut HashMap<Ref, BigUint>) -> BigUint {
        if self.is_zero(node) {
            return BigUint::ZERO;
        } else if self.is_one(node) {
            return BigUint::from(1u32);
        }

        if let Some(count) = cache.get(&node) {
            return count.clone();
        }

        let n = self.node_at(node);
        let level = self.level_of(&n);
        let low_gap = level.gap(self.level_of(&self.node_at(n.low)));
        let high_gap = level.gap(self.level_of(&self.node_at(n.high)));

        let count_low = self._sat_count(n.low, cache) << low_gap;
        let count_high = self._sat_count(n.high, cache) << high_gap;
        let count = count_low + count_high;

        cache.insert(node, count.clone());
        count
    }

    /// Value of the function rooted at `node` under `valuation`.
    ///
    /// Only the variables tested on the path taken need to be bound.
    pub fn eval(&self, node: Ref, valuation: &Valuation) -> Result<bool> {
        self.node(node)?;

        let mut current = node;
        loop {
            if let Some(value) = current.as_bool() {
                return Ok(value);
            }
            let n = self.node_at(current);
            let var = match n.var() {
                Some(var) => var,
                None => unreachable!("terminals are handled above"),
            };
            current = match valuation.get(var) {
                Some(true) => n.high,
                Some(false) => n.low,
                None => return Err(RobddError::UnboundVariable(var)),
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::ToBigUint;
    use test_log::test;

    use super::*;
    use crate::formula::{BinaryOp, Formula};
    use crate::order::VarOrder;
    use crate::parser::parse_formula;
    use crate::types::Var;

    fn build(input: &str) -> Robdd {
        Robdd::from_formula(&parse_formula(input).unwrap()).unwrap()
    }

    fn build_over(num_vars: u32, input: &str) -> (Robdd, Ref) {
        let mut bdd = Robdd::new(VarOrder::natural(num_vars));
        let root = bdd.build(&parse_formula(input).unwrap()).unwrap();
        (bdd, root)
    }

    fn lits(dimacs: &[i32]) -> Vec<Lit> {
        dimacs.iter().copied().map(Lit::from_dimacs).collect()
    }

    #[test]
    fn test_any_sat_cube() {
        let bdd = build("(AND x1 (AND (NOT x2) (NOT x3)))");
        let model = bdd.any_sat(bdd.root().unwrap()).unwrap();
        assert_eq!(model, Some(lits(&[1, -2, -3])));
    }

    #[test]
    fn test_any_sat_all_cubes() {
        for s1 in [1, -1] {
            for s2 in [1, -1] {
                for s3 in [1, -1] {
                    let cube = [s1, 2 * s2, 3 * s3];
                    let f = cube
                        .iter()
                        .map(|&lit: &i32| {
                            let v = Formula::var(lit.unsigned_abs());
                            if lit > 0 {
                                v
                            } else {
                                Formula::not(v)
                            }
                        })
                        .reduce(Formula::and)
                        .unwrap();
                    let mut bdd = Robdd::new(VarOrder::natural(3));
                    let root = bdd.build(&f).unwrap();
                    assert_eq!(bdd.any_sat(root).unwrap(), Some(lits(&cube)), "cube = {:?}", cube);
                }
            }
        }
    }

    #[test]
    fn test_any_sat_prefers_low() {
        let bdd = build("(OR x1 x2)");
        let model = bdd.any_sat(bdd.root().unwrap()).unwrap();
        assert_eq!(model, Some(lits(&[-1, 2])));
    }

    #[test]
    fn test_any_sat_unsat() {
        let bdd = build("(AND x1 (NOT x1))");
        assert_eq!(bdd.any_sat(bdd.root().unwrap()), Ok(None));
        assert_eq!(bdd.any_sat(Ref::ONE), Ok(Some(vec![])));
    }

    #[test]
    fn test_any_sat_unknown_node() {
        let bdd = build("x1");
        assert_eq!(bdd.any_sat(Ref::new(7)), Err(RobddError::UnknownNode(Ref::new(7))));
    }

    #[test]
    fn test_sat_count_terminal() {
        for n in 0..4 {
            let bdd = Robdd::new(VarOrder::natural(n));
            assert_eq!(bdd.sat_count(Ref::ZERO), Ok(BigUint::ZERO));
            assert_eq!(bdd.sat_count(Ref::ONE), Ok(1.to_biguint().unwrap() << n));
        }
    }

    #[test]
    fn test_sat_count_var() {
        for n in 1..4 {
            for i in 1..=n {
                let mut bdd = Robdd::new(VarOrder::natural(n));
                let x = bdd.mk_var(Var::new(i)).unwrap();
                assert_eq!(bdd.sat_count(x), Ok(1.to_biguint().unwrap() << (n - 1)));
            }
        }
    }

    #[test]
    fn test_sat_count_cube() {
        let (bdd, f) = build_over(4, "(AND x1 (AND (NOT x2) x3))");
        assert_eq!(bdd.sat_count(f), Ok(2.to_biguint().unwrap()));
    }

    #[test]
    fn test_sat_count_clause() {
        let (bdd, f) = build_over(3, "(OR x1 (OR (NOT x2) x3))");
        assert_eq!(bdd.sat_count(f), Ok(7.to_biguint().unwrap()));
    }

    #[test]
    fn test_sat_count_skipped_middle_variable() {
        // x2 is never tested.
        let (bdd, f) = build_over(3, "(EQUIV x1 x3)");
        assert_eq!(bdd.sat_count(f), Ok(4.to_biguint().unwrap()));
        let (bdd, f) = build_over(5, "(AND x2 x4)");
        assert_eq!(bdd.sat_count(f), Ok(8.to_biguint().unwrap()));
    }

    #[test]
    fn test_sat_count_examples() {
        let bdd = build("(AND x1 (NOT x1))");
        assert_eq!(bdd.sat_count(bdd.root().unwrap()), Ok(BigUint::ZERO));
        let bdd = build("(OR x1 (NOT x1))");
        assert_eq!(bdd.sat_count(bdd.root().unwrap()), Ok(2.to_biguint().unwrap()));
    }

    #[test]
    fn test_sat_count_after_apply() {
        let mut a = build("(IMPL x1 x2)");
        let b = build("(IMPL x2 x3)");
        let res = a.apply(&b, BinaryOp::And).unwrap();
        assert_eq!(a.sat_count(res), Ok(4.to_biguint().unwrap()));
    }

    #[test]
    fn test_eval() {
        let bdd = build("(EQUIV x1 (NOT x2))");
        let root = bdd.root().unwrap();
        let val = |a, b| Valuation::from_iter([(Var::new(1), a), (Var::new(2), b)]);
        assert_eq!(bdd.eval(root, &val(true, false)), Ok(true));
        assert_eq!(bdd.eval(root, &val(true, true)), Ok(false));
        assert_eq!(bdd.eval(root, &val(false, true)), Ok(true));
        assert_eq!(bdd.eval(Ref::ONE, &Valuation::new()), Ok(true));
    }

    #[test]
    fn test_eval_unbound() {
        let bdd = build("(AND x1 x2)");
        let root = bdd.root().unwrap();
        let only_x1 = Valuation::new().with(Var::new(1), true);
        assert_eq!(bdd.eval(root, &only_x1), Err(RobddError::UnboundVariable(Var::new(2))));
        // x2 is off the path.
        let only_x1 = Valuation::new().with(Var::new(1), false);
        assert_eq!(bdd.eval(root, &only_x1), Ok(false));
    }
}
