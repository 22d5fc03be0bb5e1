//! Graph mutation operations
//!
//! Methods for rewriting the graph structure: replacing, removing, and
//! redirecting uses. Every method validates first and commits second, so a
//! failed call leaves the graph exactly as it was.

use tracing::debug;

use crate::attr::AttrMap;
use crate::error::{IrError, IrResult};

use super::context::GraphModule;
use super::handle::{NodeId, ValueId};
use super::maps::Use;

impl GraphModule {
    // ========================================================================
    // Validation helpers
    // ========================================================================

    fn require_node(&self, node: NodeId, role: &str) -> IrResult<()> {
        if self.has_node(node) {
            Ok(())
        } else {
            Err(IrError::InvalidReference(format!(
                "{} {} does not exist",
                role, node
            )))
        }
    }

    fn require_value(&self, value: ValueId, role: &str) -> IrResult<()> {
        if self.has_value(value) {
            Ok(())
        } else {
            Err(IrError::InvalidReference(format!(
                "{} {} does not exist",
                role, value
            )))
        }
    }

    // ========================================================================
    // Node mutation
    // ========================================================================

    /// Rewrite a node in place
    ///
    /// Swaps the operation, inputs, and attributes while keeping the node's
    /// handle and its output values, so downstream consumers need no
    /// rewiring. Returns the (unchanged) node handle.
    ///
    /// # Errors
    /// * [`IrError::InvalidReference`] if `node` or any new input is missing
    /// * [`IrError::WouldCreateCycle`] if a new input depends on `node`
    pub fn replace_node(
        &mut self,
        node: NodeId,
        new_op: impl Into<String>,
        new_inputs: &[ValueId],
        new_attrs: AttrMap,
    ) -> IrResult<NodeId> {
        self.require_node(node, "node")?;
        for &input in new_inputs {
            self.require_value(input, "replacement input")?;
        }

        if self.depends_on(new_inputs, node) {
            return Err(IrError::WouldCreateCycle(format!(
                "new inputs of {} depend on its own outputs",
                node
            )));
        }

        let new_op = new_op.into();
        let old_inputs = match self.node_entry_mut(node) {
            Some(entry) => {
                entry.op = new_op;
                entry.attrs = new_attrs;
                std::mem::replace(&mut entry.inputs, new_inputs.to_vec())
            }
            None => return Err(IrError::InvalidReference(format!("node {} vanished", node))),
        };

        for (index, &input) in old_inputs.iter().enumerate() {
            if let Some(entry) = self.value_entry_mut(input) {
                entry.remove_use(Use::Operand { node, index });
            }
        }
        for (index, &input) in new_inputs.iter().enumerate() {
            if let Some(entry) = self.value_entry_mut(input) {
                entry.add_use(Use::Operand { node, index });
            }
        }

        debug!(node = %node, inputs = new_inputs.len(), "replaced node");
        Ok(node)
    }

    /// Remove a node and retire its output values
    ///
    /// The handles of the node and its outputs stay permanently invalid.
    ///
    /// # Errors
    /// * [`IrError::InvalidReference`] if `node` does not exist
    /// * [`IrError::NodeInUse`] if any output is consumed or is a graph output
    pub fn remove_node(&mut self, node: NodeId) -> IrResult<()> {
        let entry = self.node_entry(node).ok_or_else(|| {
            IrError::InvalidReference(format!("node {} does not exist", node))
        })?;

        for &output in &entry.outputs {
            if let Some(value) = self.value_entry(output) {
                if !value.uses.is_empty() || value.is_output {
                    return Err(IrError::NodeInUse {
                        node,
                        value: output,
                    });
                }
            }
        }

        let Some(entry) = self.nodes.get_mut(node.index()).and_then(Option::take) else {
            return Err(IrError::InvalidReference(format!("node {} vanished", node)));
        };
        self.node_count -= 1;

        for (index, &input) in entry.inputs.iter().enumerate() {
            if let Some(value) = self.value_entry_mut(input) {
                value.remove_use(Use::Operand { node, index });
            }
        }

        for &output in &entry.outputs {
            if let Some(slot) = self.values.get_mut(output.index()) {
                if slot.take().is_some() {
                    self.value_count -= 1;
                }
            }
        }

        debug!(node = %node, op = %entry.op, "removed node");
        Ok(())
    }

    // ========================================================================
    // Use redirection
    // ========================================================================

    /// Redirect every reference to `from` so it points at `to`
    ///
    /// Rewrites node operands and graph output slots alike, and returns how
    /// many references changed. `from`'s producer is left in place; pair this
    /// with [`remove_node`](Self::remove_node) for a replace-and-delete
    /// rewrite. Calling it with `from == to` is a no-op returning 0.
    ///
    /// # Errors
    /// * [`IrError::InvalidReference`] if either value does not exist
    /// * [`IrError::WouldCreateCycle`] if `to` depends on a consumer of `from`
    pub fn replace_all_uses(&mut self, from: ValueId, to: ValueId) -> IrResult<usize> {
        self.require_value(from, "source value")?;
        self.require_value(to, "target value")?;

        if from == to {
            return Ok(0);
        }

        let uses = self
            .value_entry(from)
            .map(|v| v.uses.clone())
            .unwrap_or_default();
        if uses.is_empty() {
            return Ok(0);
        }

        let upstream = self.ancestors(&[to]);
        if let Some(consumer) = uses
            .iter()
            .filter_map(Use::node)
            .find(|c| upstream.contains(c))
        {
            return Err(IrError::WouldCreateCycle(format!(
                "{} depends on {}, which consumes {}",
                to, consumer, from
            )));
        }

        let mut moved_output = false;
        for u in &uses {
            match *u {
                Use::Operand { node, index } => {
                    if let Some(slot) = self
                        .node_entry_mut(node)
                        .and_then(|n| n.inputs.get_mut(index))
                    {
                        *slot = to;
                    }
                }
                Use::GraphOutput { slot } => {
                    if let Some(out) = self.outputs.get_mut(slot) {
                        *out = to;
                        moved_output = true;
                    }
                }
            }
        }

        if let Some(entry) = self.value_entry_mut(from) {
            entry.uses.clear();
            entry.is_output = false;
        }
        if let Some(entry) = self.value_entry_mut(to) {
            entry.uses.extend(uses.iter().copied());
            entry.is_output |= moved_output;
        }

        debug!(from = %from, to = %to, count = uses.len(), "replaced all uses");
        Ok(uses.len())
    }
}
