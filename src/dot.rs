//! ROBDD to DOT (Graphviz) conversion.
//!
//! The generated DOT output follows these conventions:
//! - **Terminal nodes** (0 and 1) are rendered as squares at the bottom (sink rank)
//! - **Variable nodes** are rendered as circles, one rank per variable index
//! - **Edges**: solid lines are high (then) edges, dashed lines are low (else) edges
//! - **Root nodes** are rendered as rectangles at the top (source rank)
//!
//! # Examples
//!
//! ```
//! use robdd::formula::Formula;
//! use robdd::robdd::Robdd;
//!
//! let f: Formula = "(AND x1 x2)".parse().unwrap();
//! let bdd = Robdd::from_formula(&f).unwrap();
//!
//! let dot = bdd.to_dot(&[bdd.root().unwrap()]).unwrap();
//! // Write to file and render with: dot -Tpng output.dot -o output.png
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::reference::Ref;
use crate::robdd::Robdd;
use crate::types::Level;

/// Configuration options for DOT output generation.
#[derive(Debug, Clone)]
pub struct DotConfig {
    /// Shape for variable nodes (default: "circle")
    pub node_shape: &'static str,
    /// Shape for terminal nodes (default: "square")
    pub terminal_shape: &'static str,
    /// Shape for root nodes (default: "rect")
    pub root_shape: &'static str,
    /// Style for high (then) edges (default: "solid")
    pub high_edge_style: &'static str,
    /// Style for low (else) edges (default: "dashed")
    pub low_edge_style: &'static str,
    /// Whether to use HTML labels for subscripts (default: true)
    pub use_html_labels: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            node_shape: "circle",
            terminal_shape: "square",
            root_shape: "rect",
            high_edge_style: "solid",
            low_edge_style: "dashed",
            use_html_labels: true,
        }
    }
}

impl Robdd {
    /// Converts the part of the diagram reachable from `roots` to DOT format.
    ///
    /// Shared nodes are rendered once. Nodes with the same variable index share a rank.
    pub fn to_dot(&self, roots: &[Ref]) -> Result<String, std::fmt::Error> {
        self.to_dot_with_config(roots, &DotConfig::default())
    }

    pub fn to_dot_with_config(&self, roots: &[Ref], config: &DotConfig) -> Result<String, std::fmt::Error> {
        let mut dot = String::new();
        writeln!(dot, "graph {{")?;
        writeln!(dot, "node [shape={}, fixedsize=true];", config.node_shape)?;

        // Terminal nodes (0 and 1)
        writeln!(dot, "{{ rank=sink")?;
        writeln!(dot, "0 [shape={}, label=\"0\"];", config.terminal_shape)?;
        writeln!(dot, "1 [shape={}, label=\"1\"];", config.terminal_shape)?;
        writeln!(dot, "}}")?;

        let mut all_nodes: Vec<Ref> = self
            .descendants(roots.iter().copied())
            .into_iter()
            .filter(|node| !node.is_terminal())
            .collect();
        all_nodes.sort();

        let mut levels = BTreeMap::<Level, Vec<Ref>>::new();
        for &id in all_nodes.iter() {
            let level = self.level_of(&self.node_at(id));
            levels.entry(level).or_default().push(id);
        }

        for level in levels.values() {
            writeln!(dot, "{{ rank=same")?;
            for &id in level.iter() {
                let var = self.node_at(id).variable;
                let label = if config.use_html_labels {
                    format!("<x<SUB>{}</SUB>>", var)
                } else {
                    format!("\"x{}\"", var)
                };
                writeln!(dot, "{} [label={}];", id.get(), label)?;
            }
            writeln!(dot, "}}")?;
        }

        for &id in all_nodes.iter() {
            let node = self.node_at(id);
            writeln!(dot, "{} -- {} [style={}];", id.get(), node.high.get(), config.high_edge_style)?;
            writeln!(dot, "{} -- {} [style={}];", id.get(), node.low.get(), config.low_edge_style)?;
        }

        writeln!(dot, "{{ rank=source")?;
        for (i, root) in roots.iter().enumerate() {
            writeln!(dot, "r{} [shape={}, label=\"{}\"];", i, config.root_shape, root)?;
        }
        writeln!(dot, "}}")?;

        for (i, root) in roots.iter().enumerate() {
            writeln!(dot, "r{} -- {};", i, root.get())?;
        }

        writeln!(dot, "}}")?;
        Ok(dot)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::formula::Formula;

    fn build(input: &str) -> Robdd {
        let f: Formula = input.parse().unwrap();
        Robdd::from_formula(&f).unwrap()
    }

    #[test]
    fn test_to_dot_basic() {
        let bdd = build("(AND (NOT x1) (AND x2 x3))");
        let dot = bdd.to_dot(&[bdd.root().unwrap()]).unwrap();

        assert!(dot.starts_with("graph {"));
        assert!(dot.ends_with("}\n"));
        assert_eq!(dot.matches("rank=same").count(), 3);
    }

    #[test]
    fn test_to_dot_edges() {
        let bdd = build("(AND x1 x2)");
        let dot = bdd.to_dot(&[bdd.root().unwrap()]).unwrap();

        assert!(dot.contains("3 -- 2 [style=solid];"));
        assert!(dot.contains("3 -- 0 [style=dashed];"));
        assert!(dot.contains("2 -- 1 [style=solid];"));
        assert!(dot.contains("r0 -- 3;"));
    }

    #[test]
    fn test_to_dot_constants() {
        let bdd = build("x1");
        let dot = bdd.to_dot(&[Ref::ZERO, Ref::ONE]).unwrap();
        assert!(!dot.contains("rank=same"));
        assert!(dot.contains("r1 -- 1;"));
    }

    #[test]
    fn test_to_dot_with_config() {
        let bdd = build("x1");
        let config = DotConfig {
            use_html_labels: false,
            ..DotConfig::default()
        };
        let dot = bdd.to_dot_with_config(&[bdd.root().unwrap()], &config).unwrap();
        assert!(dot.contains("2 [label=\"x1\"];"));
    }
}
