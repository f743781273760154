//! The ROBDD engine.
//!
//! A [`Robdd`] owns a node table, the canonicalization index over it, and a
//! variable order. Node ids are dense: `0` is FALSE, `1` is TRUE, and every
//! other node is appended by [`Robdd::mk`], which guarantees that at most one
//! node exists per `(variable, low, high)` triple and that no node tests a
//! variable redundantly (`low != high`).
//!
//! Diagrams are independent values. [`Robdd::apply`] reads a second diagram
//! and writes the combined function into `self`; [`Robdd::restrict`] writes
//! its result into a fresh diagram.
//!
//! # Example
//!
//! ```
//! use num_bigint::BigUint;
//! use robdd::formula::{BinaryOp, Formula};
//! use robdd::robdd::Robdd;
//!
//! let f: Formula = "(AND x1 x2)".parse().unwrap();
//! let mut a = Robdd::from_formula(&f).unwrap();
//! let b = Robdd::from_formula(&Formula::var(1)).unwrap();
//!
//! let root = a.apply(&b, BinaryOp::And).unwrap();
//! assert_eq!(a.sat_count(root).unwrap(), BigUint::from(1u32));
//! ```

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use log::{debug, info};

use crate::cache::{Cache, CacheStats};
use crate::error::{Result, RobddError};
use crate::formula::{BinaryOp, Formula, Valuation};
use crate::node::Node;
use crate::order::VarOrder;
use crate::reference::Ref;
use crate::table::Table;
use crate::types::{Level, Var};

/// Sizes of the fixed-capacity tables of a diagram.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct RobddConfig {
    /// The node table holds at most `2^storage_bits` nodes, terminals included.
    pub storage_bits: usize,
    /// The Apply cache holds at most `2^cache_bits` entries.
    pub cache_bits: usize,
}

impl Default for RobddConfig {
    fn default() -> Self {
        Self {
            storage_bits: 20,
            cache_bits: 16,
        }
    }
}

impl RobddConfig {
    pub fn with_storage_bits(mut self, bits: usize) -> Self {
        self.storage_bits = bits;
        self
    }

    pub fn with_cache_bits(mut self, bits: usize) -> Self {
        self.cache_bits = bits;
        self
    }

    /// Checks that both tables can be allocated; the node table needs room for the terminals.
    pub fn validate(&self) -> Result<()> {
        if !(1..=31).contains(&self.storage_bits) {
            return Err(RobddError::InvalidConfig {
                name: "storage bits",
                bits: self.storage_bits,
                min: 1,
            });
        }
        if self.cache_bits > 31 {
            return Err(RobddError::InvalidConfig {
                name: "cache bits",
                bits: self.cache_bits,
                min: 0,
            });
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct Robdd {
    order: VarOrder,
    storage: Table<Node>,
    config: RobddConfig,
    root: Option<Ref>,
    last_apply: CacheStats,
}

impl Robdd {
    /// Creates an empty diagram (terminals only) over the given variable order.
    pub fn new(order: VarOrder) -> Self {
        Self::with_config(order, RobddConfig::default())
    }

    /// Creates an empty diagram with explicit table sizes.
    ///
    /// # Panics
    ///
    /// Panics if `config` is rejected by [`RobddConfig::validate`].
    /// Use [`try_with_config`][Self::try_with_config] for sizes coming from user input.
    pub fn with_config(order: VarOrder, config: RobddConfig) -> Self {
        if let Err(e) = config.validate() {
            panic!("{}", e);
        }

        let mut storage = Table::new(config.storage_bits);

        // Allocate the terminal nodes:
        let zero = storage.add(Node::terminal(Ref::ZERO));
        let one = storage.add(Node::terminal(Ref::ONE));
        assert_eq!((zero, one), (Ok(0), Ok(1)), "Terminals must be (0) and (1)");

        Self {
            order,
            storage,
            config,
            root: None,
            last_apply: CacheStats::default(),
        }
    }

    pub fn try_with_config(order: VarOrder, config: RobddConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_config(order, config))
    }

    /// Builds the diagram of `formula` over the order in which its variables first appear.
    pub fn from_formula(formula: &Formula) -> Result<Self> {
        Self::from_formula_with_config(formula, RobddConfig::default())
    }

    pub fn from_formula_with_config(formula: &Formula, config: RobddConfig) -> Result<Self> {
        let mut bdd = Self::try_with_config(formula.variables(), config)?;
        bdd.build(formula)?;
        Ok(bdd)
    }
}

impl fmt::Debug for Robdd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Robdd")
            .field("order", &self.order.to_string())
            .field("capacity", &self.storage.capacity())
            .field("size", &self.storage.size())
            .field("root", &self.root)
            .finish()
    }
}

impl Robdd {
    pub fn order(&self) -> &VarOrder {
        &self.order
    }

    pub fn config(&self) -> RobddConfig {
        self.config
    }

    /// Root of the last build, apply or restrict that produced this diagram.
    pub fn root(&self) -> Option<Ref> {
        self.root
    }

    /// Number of nodes in the table, terminals included.
    pub fn len(&self) -> usize {
        self.storage.size()
    }

    /// `true` when the table holds only the two terminals.
    pub fn is_empty(&self) -> bool {
        self.storage.size() == 2
    }

    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Cache statistics of the most recent Apply.
    pub fn cache_stats(&self) -> CacheStats {
        self.last_apply
    }

    pub fn node(&self, node: Ref) -> Result<Node> {
        self.storage
            .get(node.index())
            .copied()
            .ok_or(RobddError::UnknownNode(node))
    }

    pub fn variable(&self, node: Ref) -> Result<Option<Var>> {
        Ok(self.node(node)?.var())
    }

    pub fn low(&self, node: Ref) -> Result<Ref> {
        Ok(self.node(node)?.low)
    }

    pub fn high(&self, node: Ref) -> Result<Ref> {
        Ok(self.node(node)?.high)
    }

    /// Variable index of `node` in this diagram's order.
    ///
    /// Terminals sit below every variable: their index is the universe size plus one.
    pub fn variable_index(&self, node: Ref) -> Result<Level> {
        let node = self.node(node)?;
        Ok(self.level_of(&node))
    }

    pub(crate) fn level_of(&self, node: &Node) -> Level {
        match node.var() {
            None => self.order.terminal_level(),
            Some(v) => match self.order.level(v) {
                Some(level) => level,
                None => unreachable!("node variable {} is missing from the order", v),
            },
        }
    }

    /// Stored record of an id that is known to exist.
    pub(crate) fn node_at(&self, node: Ref) -> Node {
        *self.storage.value(node.index())
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == Ref::ZERO
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == Ref::ONE
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        node.is_terminal()
    }

    /// Returns the unique node testing `v` with children `low` and `high`.
    ///
    /// If `low == high` the test is vacuous and `low` is returned without allocating.
    /// Otherwise `v` must be strictly above both children in the variable order.
    pub fn mk(&mut self, v: Var, low: Ref, high: Ref) -> Result<Ref> {
        debug!("mk(v = {}, low = {}, high = {})", v, low, high);

        let level = self.order.level(v).ok_or(RobddError::UnknownVariable(v))?;
        let low_node = self.node(low)?;
        let high_node = self.node(high)?;

        // Handle duplicates
        if low == high {
            debug!("mk: duplicates {} == {}", low, high);
            return Ok(low);
        }

        if level >= self.level_of(&low_node) || level >= self.level_of(&high_node) {
            return Err(RobddError::UnorderedNode { var: v, low, high });
        }

        let i = self
            .storage
            .put(Node::new(v, low, high))
            .map_err(|e| RobddError::NodeTableFull {
                capacity: e.capacity,
            })?;
        Ok(Ref::new(i as u32))
    }

    /// Single-variable diagram `v`.
    pub fn mk_var(&mut self, v: Var) -> Result<Ref> {
        self.mk(v, Ref::ZERO, Ref::ONE)
    }

    /// Builds `formula` by Shannon expansion over the whole variable order.
    ///
    /// Every variable of the formula must belong to the order. Variables of the
    /// order that the formula does not mention are expanded too and vanish through
    /// the reduction rule of [`mk`][Self::mk].
    pub fn build(&mut self, formula: &Formula) -> Result<Ref> {
        debug!("build(formula = {})", formula);

        if let Some(&v) = formula
            .variables()
            .vars()
            .iter()
            .find(|&&v| !self.order.contains(v))
        {
            return Err(RobddError::UnboundVariable(v));
        }

        let vars = self.order.vars().to_vec();
        let root = self.build_(formula, &vars, &Valuation::new())?;
        info!(
            "build: root = {}, {} nodes over {} variables",
            root,
            self.len(),
            vars.len()
        );
        self.root = Some(root);
        Ok(root)
    }

    fn build_(&mut self, formula: &Formula, vars: &[Var], valuation: &Valuation) -> Result<Ref> {
        match vars.split_first() {
            None => Ok(Ref::terminal(formula.eval(valuation)?)),
            Some((&v, rest)) => {
                let low = self.build_(formula, rest, &valuation.with(v, false))?;
                let high = self.build_(formula, rest, &valuation.with(v, true))?;
                self.mk(v, low, high)
            }
        }
    }

    /// Combines the roots of `self` and `other` as `self op other`.
    ///
    /// The result is written into `self` and becomes its root.
    pub fn apply(&mut self, other: &Robdd, op: BinaryOp) -> Result<Ref> {
        let u1 = self.root.ok_or(RobddError::NotBuilt)?;
        let u2 = other.root.ok_or(RobddError::NotBuilt)?;
        let res = self.apply_nodes(u1, other, u2, op)?;
        self.root = Some(res);
        Ok(res)
    }

    /// Combines node `u1` of `self` with node `u2` of `other` as `u1 op u2`.
    ///
    /// The variable order of `self` is extended with the variables of `other`
    /// first, so both orders must agree on the variables they share. Nodes
    /// already in `self` keep their ids. To combine two nodes of the same
    /// diagram, pass a clone of it as `other`.
    pub fn apply_nodes(&mut self, u1: Ref, other: &Robdd, u2: Ref, op: BinaryOp) -> Result<Ref> {
        debug!("apply(u1 = {}, u2 = {}, op = {})", u1, u2, op);

        self.node(u1)?;
        other.node(u2)?;

        let merged = self.order.merge(&other.order)?;
        if merged != self.order {
            debug!("apply: order {} extended to {}", self.order, merged);
            self.order = merged;
        }

        let mut cache = Cache::new(self.config.cache_bits);
        let res = self.apply_(u1, other, u2, op, &mut cache);
        self.last_apply = CacheStats::from(&cache);
        info!(
            "apply({}): result = {:?}, cache hits = {}, misses = {}",
            op,
            res,
            cache.hits(),
            cache.misses()
        );
        res
    }

    /// Level that drives the split in Apply: terminals compare below every variable.
    fn split_level(&self, node: &Node) -> u32 {
        match node.var() {
            None => u32::MAX,
            Some(v) => match self.order.level(v) {
                Some(level) => level.index(),
                None => unreachable!("variable {} is missing from the merged order", v),
            },
        }
    }

    fn apply_(
        &mut self,
        u1: Ref,
        other: &Robdd,
        u2: Ref,
        op: BinaryOp,
        cache: &mut Cache<(Ref, Ref), Ref>,
    ) -> Result<Ref> {
        if let Some(&res) = cache.get(&(u1, u2)) {
            debug!("cache: apply(u1 = {}, u2 = {}) -> {}", u1, u2, res);
            return Ok(res);
        }

        let res = if let (Some(a), Some(b)) = (u1.as_bool(), u2.as_bool()) {
            Ref::terminal(op.apply(a, b))
        } else {
            let n1 = self.node_at(u1);
            let n2 = other.node_at(u2);

            // The lower variable index drives the split; the other side is its own cofactor.
            let (v, (l1, h1), (l2, h2)) = match self.split_level(&n1).cmp(&self.split_level(&n2)) {
                Ordering::Equal => (n1.variable, (n1.low, n1.high), (n2.low, n2.high)),
                Ordering::Less => (n1.variable, (n1.low, n1.high), (u2, u2)),
                Ordering::Greater => (n2.variable, (u1, u1), (n2.low, n2.high)),
            };

            let low = self.apply_(l1, other, l2, op, cache)?;
            let high = self.apply_(h1, other, h2, op, cache)?;
            self.mk(Var::new(v), low, high)?
        };

        debug!("computed: apply(u1 = {}, u2 = {}) -> {}", u1, u2, res);
        cache.insert((u1, u2), res)?;
        Ok(res)
    }

    /// Fixes `v` to `value` in the function rooted at `u`.
    ///
    /// The result is written into a fresh diagram over the same variable order,
    /// which is returned together with its root.
    pub fn restrict(&self, u: Ref, v: Var, value: bool) -> Result<(Robdd, Ref)> {
        debug!("restrict(u = {}, v = {}, value = {})", u, v, value);

        self.node(u)?;
        let j = self.order.level(v).ok_or(RobddError::UnknownVariable(v))?;

        let mut out = Robdd::with_config(self.order.clone(), self.config);
        let mut cache = HashMap::new();
        let root = self.restrict_(u, j, value, &mut out, &mut cache)?;
        out.root = Some(root);
        info!("restrict: {}={} gives {} nodes", v, value, out.len());
        Ok((out, root))
    }

    fn restrict_(
        &self,
        u: Ref,
        j: Level,
        value: bool,
        out: &mut Robdd,
        cache: &mut HashMap<Ref, Ref>,
    ) -> Result<Ref> {
        if u.is_terminal() {
            return Ok(u);
        }

        if let Some(&res) = cache.get(&u) {
            return Ok(res);
        }

        let node = self.node_at(u);
        let res = match self.level_of(&node).cmp(&j) {
            Ordering::Equal => {
                // Eliminate the variable: only the matching branch survives.
                let branch = if value { node.high } else { node.low };
                self.restrict_(branch, j, value, out, cache)?
            }
            _ => {
                // Below `j` this copies the subgraph into `out` unchanged.
                let low = self.restrict_(node.low, j, value, out, cache)?;
                let high = self.restrict_(node.high, j, value, out, cache)?;
                out.mk(Var::new(node.variable), low, high)?
            }
        };
        cache.insert(u, res);
        Ok(res)
    }

    /// All nodes reachable from `nodes`, terminals included.
    pub fn descendants(&self, nodes: impl IntoIterator<Item = Ref>) -> HashSet<Ref> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from_iter(nodes);

        while let Some(node) = queue.pop_front() {
            if node.index() >= self.len() {
                continue;
            }
            if visited.insert(node) && !node.is_terminal() {
                let n = self.node_at(node);
                queue.push_back(n.low);
                queue.push_back(n.high);
            }
        }

        visited
    }

    /// Number of nodes reachable from `f`, terminals included.
    pub fn size(&self, f: Ref) -> usize {
        self.descendants([f]).len()
    }

    /// The whole node table, in id order.
    pub fn nodes(&self) -> Vec<NodeRecord> {
        self.storage
            .iter()
            .enumerate()
            .map(|(i, node)| NodeRecord {
                id: Ref::new(i as u32),
                level: self.level_of(node),
                low: node.low,
                high: node.high,
            })
            .collect()
    }

    /// Printable adjacency list of the node table.
    pub fn node_table(&self) -> NodeTable<'_> {
        NodeTable(self)
    }

    pub fn to_bracket_string(&self, node: Ref) -> String {
        if self.is_zero(node) {
            return "(0)".to_string();
        } else if self.is_one(node) {
            return "(1)".to_string();
        }

        let n = self.node_at(node);
        format!(
            "{}:(x{}, {}, {})",
            node,
            n.variable,
            self.to_bracket_string(n.high),
            self.to_bracket_string(n.low)
        )
    }
}

/// One row of the node table dump.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct NodeRecord {
    pub id: Ref,
    pub level: Level,
    pub low: Ref,
    pub high: Ref,
}

/// Adjacency list in `u i l h` rows: id, variable index, low child, high child.
pub struct NodeTable<'a>(&'a Robdd);

impl fmt::Display for NodeTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "u i l h")?;
        for record in self.0.nodes() {
            writeln!(
                f,
                "{} {} {} {}",
                record.id.get(),
                record.level.index(),
                record.low.get(),
                record.high.get()
            )?;
        }
        Ok(())
    }
}
