//! Graph container
//!
//! `GraphModule` is the central structure of the IR. It owns every node and
//! value, issues handles, and keeps the use-edge index in step with the
//! primary tables on every mutation.

use tracing::debug;

use crate::attr::{AttrMap, AttrValue};
use crate::error::{IrError, IrResult};
use crate::tensor::{DType, TensorType};

use super::handle::{NodeId, ValueId};
use super::maps::{NodeEntry, NodeTable, Use, UseList, ValueEntry, ValueTable};

/// Operation name reserved for constant-producing nodes
pub const CONST_OP: &str = "const";

/// Attribute holding the payload of a [`CONST_OP`] node
pub const CONST_VALUE_ATTR: &str = "value";

/// Mutable tensor-graph IR container
///
/// Nodes and values are addressed only through [`NodeId`] / [`ValueId`]
/// handles. Handles come from a per-kind counter (the slot table length) and
/// are never reused: removing a node retires its slot and the slots of its
/// output values.
///
/// # Example
///
/// ```
/// use mlopt::prelude::*;
///
/// let mut g = GraphModule::new();
/// let x = g.add_input("x", TensorType::new(DType::F32, [1, 3]));
/// let relu = g
///     .add_node("relu", &[x], AttrMap::new(), &[TensorType::new(DType::F32, [1, 3])])
///     .unwrap();
/// let y = g.node_output(relu, 0).unwrap();
/// g.add_output(y).unwrap();
///
/// assert!(g.verify().is_ok());
/// assert_eq!(g.topological_sort().unwrap(), vec![relu]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphModule {
    /// Node slots; `None` marks a retired handle
    pub(crate) nodes: NodeTable,

    /// Value slots; `None` marks a retired handle
    pub(crate) values: ValueTable,

    /// Graph input sequence
    pub(crate) inputs: Vec<ValueId>,

    /// Graph output sequence (a value may fill several slots)
    pub(crate) outputs: Vec<ValueId>,

    /// Number of live nodes
    pub(crate) node_count: usize,

    /// Number of live values
    pub(crate) value_count: usize,

    /// Next node handle to issue; never below `nodes.len()`
    pub(crate) next_node: u32,

    /// Next value handle to issue; never below `values.len()`
    pub(crate) next_value: u32,
}

impl GraphModule {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Add a graph input value
    ///
    /// The name is a debug label and need not be unique.
    pub fn add_input(&mut self, name: impl Into<String>, ty: TensorType) -> ValueId {
        let id = self.alloc_value(ty, None, name.into(), true);
        self.inputs.push(id);
        debug!(value = %id, "added graph input");
        id
    }

    /// Add a compute node
    ///
    /// One output value is allocated per entry of `output_types`, in order.
    /// Fails with [`IrError::InvalidReference`] if any input does not exist,
    /// in which case nothing is allocated.
    pub fn add_node(
        &mut self,
        op: impl Into<String>,
        inputs: &[ValueId],
        attrs: AttrMap,
        output_types: &[TensorType],
    ) -> IrResult<NodeId> {
        let op = op.into();
        for &input in inputs {
            if !self.has_value(input) {
                return Err(IrError::InvalidReference(format!(
                    "input {} of new '{}' node does not exist",
                    input, op
                )));
            }
        }

        Ok(self.insert_node(op, inputs.to_vec(), attrs, output_types))
    }

    /// Mark a value as a graph output
    ///
    /// Appends a new output slot on every call; the `is_output` flag is
    /// idempotent. Returns the same handle.
    pub fn add_output(&mut self, value: ValueId) -> IrResult<ValueId> {
        let slot = self.outputs.len();
        let entry = self.value_entry_mut(value).ok_or_else(|| {
            IrError::InvalidReference(format!("output value {} does not exist", value))
        })?;

        entry.is_output = true;
        entry.add_use(Use::GraphOutput { slot });
        self.outputs.push(value);

        debug!(value = %value, slot, "added graph output");
        Ok(value)
    }

    /// Add a constant node holding a scalar and return its single output
    ///
    /// The node uses the [`CONST_OP`] operation with the scalar stored under
    /// [`CONST_VALUE_ATTR`]; the output is a rank-0 tensor of `dtype`.
    pub fn add_const_scalar(&mut self, dtype: DType, scalar: impl Into<AttrValue>) -> ValueId {
        let mut attrs = AttrMap::new();
        attrs.insert(CONST_VALUE_ATTR.to_string(), scalar.into());

        let node = self.insert_node(
            CONST_OP.to_string(),
            Vec::new(),
            attrs,
            &[TensorType::scalar(dtype)],
        );

        self.node_entry(node)
            .and_then(|n| n.outputs.first().copied())
            .unwrap_or(ValueId::INVALID)
    }

    // ========================================================================
    // Internal storage helpers
    // ========================================================================

    /// Store an already-validated node and wire its use-edges
    pub(crate) fn insert_node(
        &mut self,
        op: String,
        inputs: Vec<ValueId>,
        attrs: AttrMap,
        output_types: &[TensorType],
    ) -> NodeId {
        let id = NodeId::new(self.next_node);
        self.next_node += 1;

        let outputs: Vec<ValueId> = output_types
            .iter()
            .map(|ty| self.alloc_value(ty.clone(), Some(id), String::new(), false))
            .collect();

        for (index, &input) in inputs.iter().enumerate() {
            if let Some(entry) = self.value_entry_mut(input) {
                entry.add_use(Use::Operand { node: id, index });
            }
        }

        debug!(node = %id, op = %op, inputs = inputs.len(), outputs = outputs.len(), "added node");

        pad_to(&mut self.nodes, id.index());
        self.nodes.push(Some(NodeEntry {
            op,
            inputs,
            outputs,
            attrs,
        }));
        self.node_count += 1;

        id
    }

    fn alloc_value(
        &mut self,
        ty: TensorType,
        producer: Option<NodeId>,
        name: String,
        is_input: bool,
    ) -> ValueId {
        let id = ValueId::new(self.next_value);
        self.next_value += 1;
        pad_to(&mut self.values, id.index());
        self.values.push(Some(ValueEntry {
            ty,
            producer,
            name,
            is_input,
            is_output: false,
            uses: UseList::new(),
        }));
        self.value_count += 1;
        id
    }

    pub(crate) fn node_entry(&self, id: NodeId) -> Option<&NodeEntry> {
        self.nodes.get(id.index()).and_then(Option::as_ref)
    }

    pub(crate) fn node_entry_mut(&mut self, id: NodeId) -> Option<&mut NodeEntry> {
        self.nodes.get_mut(id.index()).and_then(Option::as_mut)
    }

    pub(crate) fn value_entry(&self, id: ValueId) -> Option<&ValueEntry> {
        self.values.get(id.index()).and_then(Option::as_ref)
    }

    pub(crate) fn value_entry_mut(&mut self, id: ValueId) -> Option<&mut ValueEntry> {
        self.values.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Live node handles with their records, in handle order
    pub(crate) fn live_nodes(&self) -> impl Iterator<Item = (NodeId, &NodeEntry)> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|n| (NodeId::new(i as u32), n)))
    }

    /// Live value handles with their records, in handle order
    pub(crate) fn live_values(&self) -> impl Iterator<Item = (ValueId, &ValueEntry)> {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|v| (ValueId::new(i as u32), v)))
    }
}

/// Fill a slot table with retired markers up to (excluding) `len`
///
/// Slots past the end of a table read as retired, so a table only needs to
/// grow when a handle beyond it is issued.
pub(crate) fn pad_to<T>(table: &mut Vec<Option<T>>, len: usize) {
    if table.len() < len {
        table.resize_with(len, || None);
    }
}
