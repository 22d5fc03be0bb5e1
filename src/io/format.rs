//! Persisted graph document
//!
//! The on-disk layout mirrors the container one-to-one: handles are stored
//! verbatim and the handle counters are kept, so a reloaded graph issues
//! exactly the handles the original would have issued next. The use index is
//! derived data and is rebuilt on load.

use serde::{Deserialize, Serialize};

use crate::attr::AttrMap;
use crate::error::{IrError, IrResult};
use crate::graph::context::pad_to;
use crate::graph::maps::{NodeEntry, Use, UseList, ValueEntry};
use crate::graph::{GraphModule, NodeId, ValueId};
use crate::tensor::TensorType;
use crate::IR_VERSION;

/// Top-level JSON document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphDocument {
    /// Format version, always [`IR_VERSION`] when written
    pub ir_version: u32,
    /// Next node handle to issue
    pub next_node_id: u32,
    /// Next value handle to issue
    pub next_value_id: u32,
    /// Graph input sequence
    pub inputs: Vec<ValueId>,
    /// Graph output sequence
    pub outputs: Vec<ValueId>,
    /// Live values, ascending by handle
    pub values: Vec<ValueRecord>,
    /// Live nodes, ascending by handle
    pub nodes: Vec<NodeRecord>,
}

/// Persisted value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueRecord {
    /// Value handle
    pub id: ValueId,
    /// Debug name
    #[serde(default)]
    pub name: String,
    /// Tensor type; unknown dimensions are written as `-1`
    #[serde(rename = "type")]
    pub ty: TensorType,
    /// Producing node, `null` for graph inputs
    pub producer: Option<NodeId>,
    /// Graph input flag
    #[serde(default)]
    pub is_input: bool,
    /// Graph output flag
    #[serde(default)]
    pub is_output: bool,
}

/// Persisted node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    /// Node handle
    pub id: NodeId,
    /// Operation name
    pub op: String,
    /// Input operands
    pub inputs: Vec<ValueId>,
    /// Produced values
    pub outputs: Vec<ValueId>,
    /// Attributes
    #[serde(default)]
    pub attrs: AttrMap,
}

fn malformed(detail: String) -> IrError {
    IrError::InvariantViolation(format!("malformed graph document: {}", detail))
}

impl GraphDocument {
    /// Snapshot a graph into a document
    pub fn from_graph(graph: &GraphModule) -> Self {
        let values = graph
            .live_values()
            .map(|(id, v)| ValueRecord {
                id,
                name: v.name.clone(),
                ty: v.ty.clone(),
                producer: v.producer,
                is_input: v.is_input,
                is_output: v.is_output,
            })
            .collect();

        let nodes = graph
            .live_nodes()
            .map(|(id, n)| NodeRecord {
                id,
                op: n.op.clone(),
                inputs: n.inputs.clone(),
                outputs: n.outputs.clone(),
                attrs: n.attrs.clone(),
            })
            .collect();

        Self {
            ir_version: IR_VERSION,
            next_node_id: graph.next_node_id().raw(),
            next_value_id: graph.next_value_id().raw(),
            inputs: graph.inputs.clone(),
            outputs: graph.outputs.clone(),
            values,
            nodes,
        }
    }

    /// Rebuild a graph from this document
    ///
    /// The result is verified before it is returned; a document that
    /// violates any container invariant is rejected.
    pub fn into_graph(self) -> IrResult<GraphModule> {
        if self.ir_version != IR_VERSION {
            return Err(IrError::UnsupportedVersion {
                found: self.ir_version,
                expected: IR_VERSION,
            });
        }

        let mut graph = GraphModule::new();
        graph.next_node = self.next_node_id;
        graph.next_value = self.next_value_id;

        // Tables only span the stored records; retired handles past the last
        // record stay implicit.
        if let Some(record) = self.values.iter().find(|r| r.id.raw() >= self.next_value_id) {
            return Err(malformed(format!("value {} is beyond next_value_id", record.id)));
        }
        if let Some(record) = self.nodes.iter().find(|r| r.id.raw() >= self.next_node_id) {
            return Err(malformed(format!("node {} is beyond next_node_id", record.id)));
        }
        let value_slots = self.values.iter().map(|r| r.id.index() + 1).max().unwrap_or(0);
        let node_slots = self.nodes.iter().map(|r| r.id.index() + 1).max().unwrap_or(0);
        pad_to(&mut graph.values, value_slots);
        pad_to(&mut graph.nodes, node_slots);

        for record in self.values {
            let slot = &mut graph.values[record.id.index()];
            if slot.is_some() {
                return Err(malformed(format!("value {} appears twice", record.id)));
            }
            *slot = Some(ValueEntry {
                ty: record.ty,
                producer: record.producer,
                name: record.name,
                is_input: record.is_input,
                is_output: record.is_output,
                uses: UseList::new(),
            });
            graph.value_count += 1;
        }

        for record in self.nodes {
            let slot = &mut graph.nodes[record.id.index()];
            if slot.is_some() {
                return Err(malformed(format!("node {} appears twice", record.id)));
            }
            *slot = Some(NodeEntry {
                op: record.op,
                inputs: record.inputs,
                outputs: record.outputs,
                attrs: record.attrs,
            });
            graph.node_count += 1;
        }

        graph.inputs = self.inputs;
        graph.outputs = self.outputs;
        graph.rebuild_use_index()?;
        graph.verify()?;

        Ok(graph)
    }
}

impl GraphModule {
    /// Recompute every use list from the operand lists and output slots
    fn rebuild_use_index(&mut self) -> IrResult<()> {
        let mut pending: Vec<(ValueId, Use)> = Vec::new();
        for (id, node) in self.live_nodes() {
            for (index, &input) in node.inputs.iter().enumerate() {
                pending.push((input, Use::Operand { node: id, index }));
            }
        }
        for (slot, &output) in self.outputs.iter().enumerate() {
            pending.push((output, Use::GraphOutput { slot }));
        }

        for (value, u) in pending {
            let entry = self.value_entry_mut(value).ok_or_else(|| {
                IrError::InvalidReference(format!("referenced value {} does not exist", value))
            })?;
            entry.add_use(u);
        }
        Ok(())
    }
}
