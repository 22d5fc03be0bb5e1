//! Graph reader
//!
//! Load graphs from JSON files or strings.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::info;

use crate::error::IrResult;
use crate::graph::GraphModule;

use super::format::GraphDocument;

/// Load a graph from a JSON file
///
/// The loaded graph keeps every handle of the saved one and is verified
/// before it is returned.
///
/// # Example
///
/// ```ignore
/// use mlopt::io::load_graph;
///
/// let graph = load_graph("graph.json")?;
/// println!("{} nodes", graph.num_nodes());
/// ```
pub fn load_graph<P: AsRef<Path>>(path: P) -> IrResult<GraphModule> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let doc: GraphDocument = serde_json::from_reader(BufReader::new(file))?;
    let graph = doc.into_graph()?;

    info!(
        path = %path.display(),
        nodes = graph.num_nodes(),
        values = graph.num_values(),
        "loaded graph"
    );
    Ok(graph)
}

/// Load a graph from a JSON string
pub fn load_graph_from_str(text: &str) -> IrResult<GraphModule> {
    let doc: GraphDocument = serde_json::from_str(text)?;
    doc.into_graph()
}

impl GraphModule {
    /// Deserialize a graph from a JSON file written by [`to_json`](Self::to_json)
    pub fn from_json<P: AsRef<Path>>(path: P) -> IrResult<GraphModule> {
        load_graph(path)
    }

    /// Deserialize a graph from a JSON string
    pub fn from_json_str(text: &str) -> IrResult<GraphModule> {
        load_graph_from_str(text)
    }
}
