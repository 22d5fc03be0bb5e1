//! # mlopt
//!
//! Graph IR container and pass driver for tensor-computation graphs.
//!
//! This crate provides the in-memory representation a graph optimizer
//! rewrites, together with a minimal driver for sequencing rewrite passes.
//!
//! ## Features
//!
//! - **Stable handles**: nodes and values are addressed by [`NodeId`] /
//!   [`ValueId`], never reused after removal
//! - **Use-edge index**: consumer lookups without scanning the graph
//! - **Safe mutation**: `replace_node`, `remove_node`, `replace_all_uses`
//!   validate before committing and reject cycles
//! - **Verification**: [`GraphModule::verify`] checks every structural
//!   invariant and names the one that fails
//! - **JSON persistence**: save and reload a graph with identical handles
//!
//! ## Example
//!
//! ```
//! use mlopt::prelude::*;
//!
//! let mut graph = GraphModule::new();
//! let x = graph.add_input("x", TensorType::new(DType::F32, [1, 3]));
//! let relu = graph
//!     .add_node("relu", &[x], AttrMap::new(), &[TensorType::new(DType::F32, [1, 3])])
//!     .unwrap();
//! let y = graph.node_output(relu, 0).unwrap();
//! graph.add_output(y).unwrap();
//!
//! assert_eq!(graph.topological_sort().unwrap(), vec![relu]);
//! graph.verify().unwrap();
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]

// ============================================================================
// Module declarations
// ============================================================================

pub mod attr;
pub mod error;
pub mod graph;
pub mod io;
pub mod tensor;
pub mod traits;
pub mod transform;
pub mod transformers;

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Prelude module - import commonly used types with `use mlopt::prelude::*`
pub mod prelude {
    pub use crate::attr::{attrs, AttrMap, AttrValue};
    pub use crate::error::{IrError, IrResult};
    pub use crate::graph::{GraphModule, NodeId, NodeView, Use, ValueId, ValueView};
    pub use crate::io::{load_graph, save_graph, JsonFormat};
    pub use crate::tensor::{DType, TensorType, UNKNOWN_DIM};
    pub use crate::traits::{FnPass, Pass};
    pub use crate::transform::{PassManager, PassManagerOptions, PassRunReport};
    pub use crate::transformers::{EliminateDeadNodes, EliminateIdentity};
}

// ============================================================================
// Crate-level re-exports
// ============================================================================

pub use error::{IrError, IrResult};
pub use graph::{GraphModule, NodeId, ValueId};
pub use traits::Pass;
pub use transform::PassManager;

// ============================================================================
// Version information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Version tag written into, and required from, serialized graphs
pub const IR_VERSION: u32 = 1;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_graph_is_shareable_for_reads() {
        fn assert_sync<T: Sync + Send>() {}
        assert_sync::<GraphModule>();
    }

    #[test]
    fn test_ir_version() {
        assert_eq!(IR_VERSION, 1);
        let text = GraphModule::new()
            .to_json_string(io::JsonFormat::Compact)
            .unwrap();
        assert!(text.contains(r#""ir_version":1"#));
    }
}
