//! Reference passes
//!
//! Ready-to-use cleanup passes built on the public mutation API:
//!
//! - [`EliminateIdentity`]: bypass `Identity` nodes
//! - [`EliminateDeadNodes`]: remove nodes whose results are never observed
//!
//! # Example
//!
//! ```
//! use mlopt::prelude::*;
//!
//! let mut graph = GraphModule::new();
//! let x = graph.add_input("x", TensorType::new(DType::F32, [4]));
//! graph
//!     .add_node("relu", &[x], AttrMap::new(), &[TensorType::new(DType::F32, [4])])
//!     .unwrap();
//!
//! let mut dce = EliminateDeadNodes::new();
//! assert!(dce.run(&mut graph).unwrap());
//! assert_eq!(graph.num_nodes(), 0);
//! ```

/// Elimination passes
pub mod eliminate;

pub use eliminate::{EliminateDeadNodes, EliminateIdentity, IDENTITY_OP};
