//! Elimination passes
//!
//! Passes that remove unnecessary nodes from the graph.

use tracing::debug;

use crate::error::IrResult;
use crate::graph::{GraphModule, NodeId};
use crate::traits::Pass;

/// Op name matched by [`EliminateIdentity`]
pub const IDENTITY_OP: &str = "Identity";

/// Remove nodes whose results are never observed
///
/// A node is dead when none of its outputs has a use and none is a graph
/// output. Removing a dead node can make its producers dead, so the pass
/// repeats until no dead node remains.
#[derive(Debug, Default)]
pub struct EliminateDeadNodes {
    removed: usize,
}

impl EliminateDeadNodes {
    /// Create the pass
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes removed by the most recent run
    pub fn removed(&self) -> usize {
        self.removed
    }

    fn dead_nodes(graph: &GraphModule) -> Vec<NodeId> {
        graph
            .nodes()
            .into_iter()
            .filter(|&n| {
                graph
                    .get_node(n)
                    .outputs
                    .iter()
                    .all(|&v| graph.is_unused(v))
            })
            .collect()
    }
}

impl Pass for EliminateDeadNodes {
    fn name(&self) -> &str {
        "EliminateDeadNodes"
    }

    fn run(&mut self, graph: &mut GraphModule) -> IrResult<bool> {
        self.removed = 0;
        loop {
            let dead = Self::dead_nodes(graph);
            if dead.is_empty() {
                break;
            }
            for node in dead {
                debug!(%node, "removing dead node");
                graph.remove_node(node)?;
                self.removed += 1;
            }
        }
        Ok(self.removed > 0)
    }
}

/// Bypass and remove `Identity` nodes
///
/// Every consumer of an identity's output, including graph output slots, is
/// redirected to the identity's input before the node is removed. Nodes with
/// other than one input and one output are left alone.
#[derive(Debug, Default)]
pub struct EliminateIdentity {
    removed: usize,
}

impl EliminateIdentity {
    /// Create the pass
    pub fn new() -> Self {
        Self::default()
    }

    /// Nodes removed by the most recent run
    pub fn removed(&self) -> usize {
        self.removed
    }
}

impl Pass for EliminateIdentity {
    fn name(&self) -> &str {
        "EliminateIdentity"
    }

    fn run(&mut self, graph: &mut GraphModule) -> IrResult<bool> {
        self.removed = 0;
        for node in graph.find_nodes_by_op(IDENTITY_OP) {
            let view = graph.get_node(node);
            let (&[input], &[output]) = (view.inputs.as_slice(), view.outputs.as_slice()) else {
                continue;
            };

            let rewired = graph.replace_all_uses(output, input)?;
            graph.remove_node(node)?;
            debug!(%node, rewired, "bypassed identity");
            self.removed += 1;
        }
        Ok(self.removed > 0)
    }
}
