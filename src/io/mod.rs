//! Graph I/O module
//!
//! This module provides functions for saving and loading graphs as JSON.
//!
//! # Example
//!
//! ```ignore
//! use mlopt::io::{load_graph, save_graph, JsonFormat};
//!
//! save_graph(&graph, "graph.json", JsonFormat::Pretty)?;
//! let reloaded = load_graph("graph.json")?;
//! assert_eq!(reloaded.nodes(), graph.nodes());
//! ```
//!
//! # Format
//!
//! | Field | Description |
//! |-------|-------------|
//! | `ir_version` | format version tag |
//! | `next_node_id` / `next_value_id` | handle counters |
//! | `inputs` / `outputs` | graph input and output sequences |
//! | `values` | handle, name, type, producer, flags |
//! | `nodes` | handle, op, inputs, outputs, attributes |

pub mod format;
pub mod reader;
pub mod writer;

// Re-exports
pub use format::{GraphDocument, NodeRecord, ValueRecord};
pub use reader::{load_graph, load_graph_from_str};
pub use writer::{graph_to_string, save_graph, JsonFormat};
