//! Read-only graph queries
//!
//! Every accessor returns owned snapshots, never references into the
//! tables, so callers cannot corrupt container state.

use super::context::GraphModule;
use super::handle::{NodeId, ValueId};
use super::maps::Use;
use super::view::{NodeView, ValueView};

impl GraphModule {
    // ========================================================================
    // Sequences and counts
    // ========================================================================

    /// Live node handles in creation order
    pub fn nodes(&self) -> Vec<NodeId> {
        self.live_nodes().map(|(id, _)| id).collect()
    }

    /// Graph input sequence
    pub fn inputs(&self) -> Vec<ValueId> {
        self.inputs.clone()
    }

    /// Graph output sequence
    pub fn outputs(&self) -> Vec<ValueId> {
        self.outputs.clone()
    }

    /// Number of live nodes
    pub fn num_nodes(&self) -> usize {
        self.node_count
    }

    /// Number of live values
    pub fn num_values(&self) -> usize {
        self.value_count
    }

    /// Next node handle the graph will issue
    pub fn next_node_id(&self) -> NodeId {
        NodeId::new(self.next_node)
    }

    /// Next value handle the graph will issue
    pub fn next_value_id(&self) -> ValueId {
        ValueId::new(self.next_value)
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// Check if a node exists
    pub fn has_node(&self, id: NodeId) -> bool {
        self.node_entry(id).is_some()
    }

    /// Check if a value exists
    pub fn has_value(&self, id: ValueId) -> bool {
        self.value_entry(id).is_some()
    }

    /// Snapshot of a node
    ///
    /// Unknown or retired handles yield [`NodeView::default`], whose id is
    /// [`NodeId::INVALID`].
    pub fn get_node(&self, id: NodeId) -> NodeView {
        match self.node_entry(id) {
            Some(n) => NodeView {
                id,
                op: n.op.clone(),
                inputs: n.inputs.clone(),
                outputs: n.outputs.clone(),
                attrs: n.attrs.clone(),
            },
            None => NodeView::default(),
        }
    }

    /// Snapshot of a value
    ///
    /// Unknown or retired handles yield [`ValueView::default`], whose id is
    /// [`ValueId::INVALID`].
    pub fn get_value(&self, id: ValueId) -> ValueView {
        match self.value_entry(id) {
            Some(v) => ValueView {
                id,
                ty: v.ty.clone(),
                producer: v.producer,
                name: v.name.clone(),
                is_input: v.is_input,
                is_output: v.is_output,
            },
            None => ValueView::default(),
        }
    }

    /// Output `index` of `node`
    pub fn node_output(&self, node: NodeId, index: usize) -> Option<ValueId> {
        self.node_entry(node)
            .and_then(|n| n.outputs.get(index).copied())
    }

    /// Operation name of `node`
    pub fn node_op(&self, node: NodeId) -> Option<&str> {
        self.node_entry(node).map(|n| n.op.as_str())
    }

    // ========================================================================
    // Use-edge queries
    // ========================================================================

    /// Every reference to `value` (operands and output slots)
    ///
    /// Order is unspecified; empty for unknown values.
    pub fn uses(&self, value: ValueId) -> Vec<Use> {
        self.value_entry(value)
            .map(|v| v.uses.to_vec())
            .unwrap_or_default()
    }

    /// Number of references to `value`
    pub fn num_uses(&self, value: ValueId) -> usize {
        self.value_entry(value).map(|v| v.uses.len()).unwrap_or(0)
    }

    /// Distinct nodes consuming `value`, ascending by handle
    pub fn consumers(&self, value: ValueId) -> Vec<NodeId> {
        let mut nodes: Vec<NodeId> = self
            .value_entry(value)
            .map(|v| v.uses.iter().filter_map(Use::node).collect())
            .unwrap_or_default();
        nodes.sort_unstable();
        nodes.dedup();
        nodes
    }

    /// Producing node of `value`; `None` for graph inputs and unknown values
    pub fn producer(&self, value: ValueId) -> Option<NodeId> {
        self.value_entry(value).and_then(|v| v.producer)
    }

    /// Check if any node consumes `value` (graph output slots do not count)
    pub fn has_consumers(&self, value: ValueId) -> bool {
        self.value_entry(value)
            .map(|v| v.has_operand_uses())
            .unwrap_or(false)
    }

    /// Check if a value is used exactly once
    pub fn is_single_use(&self, value: ValueId) -> bool {
        self.num_uses(value) == 1
    }

    /// Check if a value is unused (no consumers and not a graph output)
    pub fn is_unused(&self, value: ValueId) -> bool {
        self.value_entry(value)
            .map(|v| v.uses.is_empty() && !v.is_output)
            .unwrap_or(false)
    }

    /// Find nodes by op name, in creation order
    pub fn find_nodes_by_op(&self, op: &str) -> Vec<NodeId> {
        self.live_nodes()
            .filter(|(_, n)| n.op == op)
            .map(|(id, _)| id)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::AttrMap;
    use crate::tensor::{DType, TensorType};

    fn t() -> TensorType {
        TensorType::new(DType::F32, [4])
    }

    /// x → add(x, x) → relu → y
    fn make_test_graph() -> (GraphModule, ValueId, NodeId, NodeId) {
        let mut g = GraphModule::new();
        let x = g.add_input("x", t());
        let add = g.add_node("add", &[x, x], AttrMap::new(), &[t()]).unwrap();
        let sum = g.node_output(add, 0).unwrap();
        let relu = g.add_node("relu", &[sum], AttrMap::new(), &[t()]).unwrap();
        let y = g.node_output(relu, 0).unwrap();
        g.add_output(y).unwrap();
        (g, x, add, relu)
    }

    #[test]
    fn test_nodes_in_creation_order() {
        let (g, _, add, relu) = make_test_graph();
        assert_eq!(g.nodes(), vec![add, relu]);
        assert_eq!(g.num_nodes(), 2);
        assert_eq!(g.num_values(), 3);
    }

    #[test]
    fn test_get_node_unknown_is_invalid() {
        let (g, _, _, _) = make_test_graph();
        let view = g.get_node(NodeId::new(77));
        assert!(!view.is_valid());
        assert_eq!(view, NodeView::default());

        let value = g.get_value(ValueId::INVALID);
        assert!(!value.is_valid());
    }

    #[test]
    fn test_uses_track_operand_positions() {
        let (g, x, add, _) = make_test_graph();
        let mut uses = g.uses(x);
        uses.sort();
        assert_eq!(
            uses,
            vec![
                Use::Operand { node: add, index: 0 },
                Use::Operand { node: add, index: 1 },
            ]
        );
        assert_eq!(g.consumers(x), vec![add]);
        assert!(g.has_consumers(x));
    }

    #[test]
    fn test_output_slot_counts_as_use() {
        let (g, _, _, relu) = make_test_graph();
        let y = g.node_output(relu, 0).unwrap();
        assert_eq!(g.uses(y), vec![Use::GraphOutput { slot: 0 }]);
        assert!(g.is_single_use(y));
        assert!(!g.is_unused(y));
        assert!(g.consumers(y).is_empty());
        assert!(!g.has_consumers(y));
    }

    #[test]
    fn test_producer() {
        let (g, x, add, _) = make_test_graph();
        assert_eq!(g.producer(x), None);
        let sum = g.node_output(add, 0).unwrap();
        assert_eq!(g.producer(sum), Some(add));
    }

    #[test]
    fn test_find_nodes_by_op() {
        let (g, _, _, relu) = make_test_graph();
        assert_eq!(g.find_nodes_by_op("relu"), vec![relu]);
        assert!(g.find_nodes_by_op("softmax").is_empty());
        assert_eq!(g.node_op(relu), Some("relu"));
    }

    #[test]
    fn test_snapshot_is_detached() {
        let (g, _, add, _) = make_test_graph();
        let mut view = g.get_node(add);
        view.op = "mul".to_string();
        assert_eq!(g.get_node(add).op, "add");
    }
}
