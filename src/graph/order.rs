//! Deterministic ordering and reachability
//!
//! Both walks read the primary node tables only (not the use-edge index), so
//! they stay meaningful even when `verify` is hunting for index corruption.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::error::{IrError, IrResult};

use super::context::GraphModule;
use super::handle::{NodeId, ValueId};

impl GraphModule {
    /// Topological order of all live nodes (Kahn's algorithm)
    ///
    /// Producers come before consumers. Among nodes that are ready at the
    /// same time the smallest handle goes first, so the result only changes
    /// when the topology does.
    pub fn topological_sort(&self) -> IrResult<Vec<NodeId>> {
        let slots = self.nodes.len();
        let mut in_degree = vec![0usize; slots];
        let mut successors: Vec<SmallVec<[NodeId; 4]>> = vec![SmallVec::new(); slots];
        let mut live = 0usize;

        // One edge per operand whose producer is a live node
        for (id, node) in self.live_nodes() {
            live += 1;
            for &input in &node.inputs {
                if let Some(producer) = self.producer(input).filter(|p| self.has_node(*p)) {
                    in_degree[id.index()] += 1;
                    successors[producer.index()].push(id);
                }
            }
        }

        let mut ready: BinaryHeap<Reverse<NodeId>> = self
            .live_nodes()
            .filter(|(id, _)| in_degree[id.index()] == 0)
            .map(|(id, _)| Reverse(id))
            .collect();

        let mut order = Vec::with_capacity(live);
        while let Some(Reverse(id)) = ready.pop() {
            order.push(id);
            for &succ in &successors[id.index()] {
                let degree = &mut in_degree[succ.index()];
                *degree -= 1;
                if *degree == 0 {
                    ready.push(Reverse(succ));
                }
            }
        }

        if order.len() != live {
            let stuck: Vec<String> = self
                .live_nodes()
                .filter(|(id, _)| in_degree[id.index()] > 0)
                .map(|(id, _)| id.to_string())
                .collect();
            return Err(IrError::CycleDetected(format!(
                "{} node(s) never became ready: {}",
                stuck.len(),
                stuck.join(", ")
            )));
        }

        Ok(order)
    }

    /// All nodes that `values` transitively depend on (their producers and
    /// everything upstream of them)
    pub fn ancestors(&self, values: &[ValueId]) -> FxHashSet<NodeId> {
        let mut visited = FxHashSet::default();
        let mut stack: Vec<ValueId> = values.to_vec();

        while let Some(value) = stack.pop() {
            let Some(producer) = self.producer(value) else {
                continue;
            };
            if !visited.insert(producer) {
                continue;
            }
            if let Some(node) = self.node_entry(producer) {
                stack.extend(node.inputs.iter().copied());
            }
        }

        visited
    }

    /// Check if any of `values` depends on `node`
    pub fn depends_on(&self, values: &[ValueId], node: NodeId) -> bool {
        self.ancestors(values).contains(&node)
    }
}
