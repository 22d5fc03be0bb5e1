//! Read-only snapshots of nodes and values
//!
//! Views are copies taken at call time. They never track later mutation.

use crate::attr::{AttrMap, AttrValue};
use crate::tensor::TensorType;

use super::handle::{NodeId, ValueId};

/// Snapshot of a node
///
/// The default view (id = [`NodeId::INVALID`]) stands for an unknown or
/// retired node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeView {
    /// Node handle
    pub id: NodeId,
    /// Operation name
    pub op: String,
    /// Input operands, in order
    pub inputs: Vec<ValueId>,
    /// Produced values, in order
    pub outputs: Vec<ValueId>,
    /// Attributes
    pub attrs: AttrMap,
}

impl NodeView {
    /// Whether this view describes a live node
    pub fn is_valid(&self) -> bool {
        self.id.is_valid()
    }

    /// Look up an attribute by name
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }
}

/// Snapshot of a value
///
/// The default view (id = [`ValueId::INVALID`]) stands for an unknown or
/// retired value.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueView {
    /// Value handle
    pub id: ValueId,
    /// Tensor type
    pub ty: TensorType,
    /// Producing node; `None` for graph inputs
    pub producer: Option<NodeId>,
    /// Debug name (may be empty, need not be unique)
    pub name: String,
    /// Registered in the graph input sequence
    pub is_input: bool,
    /// Referenced by at least one graph output slot
    pub is_output: bool,
}

impl ValueView {
    /// Whether this view describes a live value
    pub fn is_valid(&self) -> bool {
        self.id.is_valid()
    }
}
