//! Graph writer
//!
//! Save graphs as JSON documents to files or strings.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::info;

use crate::error::IrResult;
use crate::graph::GraphModule;

use super::format::GraphDocument;

/// JSON output layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonFormat {
    /// Indented, one field per line
    #[default]
    Pretty,
    /// Single line, no whitespace
    Compact,
}

/// Save a graph to a JSON file
///
/// # Example
///
/// ```ignore
/// use mlopt::io::save_graph;
///
/// save_graph(&graph, "graph.json", JsonFormat::Pretty)?;
/// ```
pub fn save_graph<P: AsRef<Path>>(graph: &GraphModule, path: P, format: JsonFormat) -> IrResult<()> {
    let path = path.as_ref();
    let doc = GraphDocument::from_graph(graph);

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    match format {
        JsonFormat::Pretty => serde_json::to_writer_pretty(&mut writer, &doc)?,
        JsonFormat::Compact => serde_json::to_writer(&mut writer, &doc)?,
    }
    writer.flush()?;

    info!(
        path = %path.display(),
        nodes = doc.nodes.len(),
        values = doc.values.len(),
        "saved graph"
    );
    Ok(())
}

/// Encode a graph to a JSON string
pub fn graph_to_string(graph: &GraphModule, format: JsonFormat) -> IrResult<String> {
    let doc = GraphDocument::from_graph(graph);
    let text = match format {
        JsonFormat::Pretty => serde_json::to_string_pretty(&doc)?,
        JsonFormat::Compact => serde_json::to_string(&doc)?,
    };
    Ok(text)
}

impl GraphModule {
    /// Serialize the whole graph to a pretty-printed JSON file
    pub fn to_json<P: AsRef<Path>>(&self, path: P) -> IrResult<()> {
        save_graph(self, path, JsonFormat::Pretty)
    }

    /// Serialize the whole graph to a JSON string
    pub fn to_json_string(&self, format: JsonFormat) -> IrResult<String> {
        graph_to_string(self, format)
    }
}
