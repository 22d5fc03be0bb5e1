//! Graph container for tensor-computation IR
//!
//! This module provides the core infrastructure for building and rewriting
//! graphs:
//!
//! - [`GraphModule`]: owns nodes and values, issues handles, tracks uses
//! - [`handle`]: stable [`NodeId`] / [`ValueId`] handles
//! - [`view`]: read-only snapshots returned by queries
//! - [`maps`]: slot tables and use lists
//!
//! # Overview
//!
//! Nodes and values reference each other only by handle. Every mutation
//! keeps the use-edge index consistent, so "who uses this value" is a lookup
//! proportional to the number of uses.
//!
//! # Example
//!
//! ```
//! use mlopt::prelude::*;
//!
//! let mut g = GraphModule::new();
//! let ty = TensorType::new(DType::F32, [4]);
//! let x = g.add_input("x", ty.clone());
//! let id = g.add_node("Identity", &[x], AttrMap::new(), &[ty.clone()]).unwrap();
//! let y = g.node_output(id, 0).unwrap();
//! let out = g.add_node("relu", &[y], AttrMap::new(), &[ty]).unwrap();
//!
//! // Bypass the identity and delete it
//! assert_eq!(g.replace_all_uses(y, x).unwrap(), 1);
//! g.remove_node(id).unwrap();
//!
//! assert_eq!(g.get_node(out).inputs, vec![x]);
//! assert!(g.verify().is_ok());
//! ```
//!
//! # Invariants
//!
//! | # | Invariant |
//! |---|-----------|
//! | 1 | handles are issued by a monotonic counter and never reused |
//! | 2 | every value has zero or one live producer |
//! | 3 | every node input references a live value |
//! | 4 | the data-dependency relation is acyclic |
//! | 5 | the use index is the exact inverse of operands and output slots |
//! | 6 | graph inputs are unique; output flags match the output sequence |

pub mod accessors;
pub mod context;
pub mod handle;
pub mod maps;
pub mod mutators;
pub mod order;
pub mod verify;
pub mod view;

// Re-export main types
pub use context::{GraphModule, CONST_OP, CONST_VALUE_ATTR};
pub use handle::{NodeId, ValueId};
pub use maps::{Use, UseList};
pub use view::{NodeView, ValueView};
