//! Pass driver module
//!
//! - [`PassManager`]: ordered list of borrowed passes, each run once
//! - [`PassManagerOptions`]: opt-in verification around passes
//! - [`PassRunReport`]: per-pass change flags from a run
//!
//! # Example
//!
//! ```
//! use mlopt::prelude::*;
//!
//! let mut graph = GraphModule::new();
//! let x = graph.add_input("x", TensorType::new(DType::F32, [4]));
//! let id = graph
//!     .add_node("Identity", &[x], AttrMap::new(), &[TensorType::new(DType::F32, [4])])
//!     .unwrap();
//! let y = graph.node_output(id, 0).unwrap();
//! graph.add_output(y).unwrap();
//!
//! let mut identity = EliminateIdentity::new();
//! let mut pm = PassManager::new();
//! pm.add(&mut identity);
//!
//! let report = pm.run(&mut graph).unwrap();
//! assert!(report.any_changed());
//! assert_eq!(graph.outputs(), vec![x]);
//! ```

pub mod core;

pub use self::core::{PassManager, PassManagerOptions, PassOutcome, PassRunReport};
