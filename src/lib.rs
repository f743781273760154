//! # robdd: Reduced Ordered Binary Decision Diagrams
//!
//! A Reduced Ordered Binary Decision Diagram (ROBDD) is a directed acyclic graph
//! representing a boolean function. For a fixed variable order it is **canonical**:
//! every boolean function has exactly one representation, so two functions are
//! equivalent exactly when their roots are the same node.
//!
//! Each [`Robdd`][crate::robdd::Robdd] owns its node table and its variable order.
//! Nodes are addressed by dense [`Ref`][crate::reference::Ref] ids, with `0` the
//! FALSE terminal and `1` the TRUE terminal.
//!
//! ## Basic Usage
//!
//! ```rust
//! use num_bigint::BigUint;
//! use robdd::formula::{BinaryOp, Formula};
//! use robdd::reference::Ref;
//! use robdd::robdd::Robdd;
//! use robdd::types::Var;
//!
//! // 1. Parse a formula in prefix syntax and build its diagram
//! let f: Formula = "(OR x1 (NOT x1))".parse().unwrap();
//! let taut = Robdd::from_formula(&f).unwrap();
//! assert_eq!(taut.root(), Some(Ref::ONE));
//!
//! // 2. Combine two diagrams
//! let mut a = Robdd::from_formula(&"(IMPL x1 x2)".parse().unwrap()).unwrap();
//! let b = Robdd::from_formula(&"(IMPL x2 x3)".parse().unwrap()).unwrap();
//! let g = a.apply(&b, BinaryOp::And).unwrap();
//!
//! // 3. Query the result
//! assert_eq!(a.sat_count(g).unwrap(), BigUint::from(4u32));
//! let witness = a.any_sat(g).unwrap().unwrap();
//! assert!(witness.iter().all(|lit| !lit.value()));
//!
//! // 4. Fix x2 to true
//! let (restricted, r) = a.restrict(g, Var::new(2), true).unwrap();
//! assert_eq!(restricted.sat_count(r).unwrap(), BigUint::from(4u32));
//! ```
//!
//! ## Core Components
//!
//! - **[`robdd`]**: the engine, with Mk, Build, Apply, Restrict and the node table dump.
//! - **[`sat`]**: model counting, witness search and evaluation.
//! - **[`formula`]** and **[`parser`]**: formula trees and their prefix syntax.
//! - **[`dot`]**: Graphviz export.

pub mod cache;
pub mod dot;
pub mod error;
pub mod formula;
pub mod node;
pub mod order;
pub mod parser;
pub mod reference;
pub mod robdd;
pub mod sat;
pub mod table;
pub mod types;
pub mod utils;
