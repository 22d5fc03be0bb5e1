//! Structural verification
//!
//! Re-checks every container invariant from scratch against the primary
//! tables. Intended for use after running untrusted passes and in tests.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::{IrError, IrResult};

use super::context::GraphModule;
use super::handle::{NodeId, ValueId};
use super::maps::Use;

fn violation(invariant: u8, what: &str, detail: String) -> IrError {
    IrError::InvariantViolation(format!("invariant {} ({}): {}", invariant, what, detail))
}

impl GraphModule {
    /// Verify all structural invariants
    ///
    /// Returns the first violation found as [`IrError::InvariantViolation`],
    /// naming the invariant and the offending handle.
    pub fn verify(&self) -> IrResult<()> {
        self.verify_handles()?;
        self.verify_producers()?;
        self.verify_operands()?;
        self.topological_sort()
            .map_err(|e| violation(4, "acyclic", e.to_string()))?;
        self.verify_use_index()?;
        self.verify_io_sequences()?;
        Ok(())
    }

    /// Live counters match the tables, and no value is claimed as output by
    /// two nodes
    fn verify_handles(&self) -> IrResult<()> {
        let live_nodes = self.live_nodes().count();
        if live_nodes != self.node_count {
            return Err(violation(
                1,
                "handles",
                format!(
                    "node count {} but {} live node slots",
                    self.node_count, live_nodes
                ),
            ));
        }
        let live_values = self.live_values().count();
        if live_values != self.value_count {
            return Err(violation(
                1,
                "handles",
                format!(
                    "value count {} but {} live value slots",
                    self.value_count, live_values
                ),
            ));
        }

        if self.nodes.len() > self.next_node as usize
            || self.values.len() > self.next_value as usize
        {
            return Err(violation(
                1,
                "handles",
                format!(
                    "slot tables hold {} node(s) and {} value(s) but counters are at {} and {}",
                    self.nodes.len(),
                    self.values.len(),
                    self.next_node,
                    self.next_value
                ),
            ));
        }

        let mut owner: FxHashMap<ValueId, NodeId> = FxHashMap::default();
        for (id, node) in self.live_nodes() {
            for &output in &node.outputs {
                if let Some(prev) = owner.insert(output, id) {
                    return Err(violation(
                        1,
                        "handles",
                        format!("value {} is listed as output of both {} and {}", output, prev, id),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Every value is either produced by exactly one live node or is a graph
    /// input
    fn verify_producers(&self) -> IrResult<()> {
        for (id, value) in self.live_values() {
            let Some(producer) = value.producer else {
                if !value.is_input {
                    return Err(violation(
                        2,
                        "single producer",
                        format!("value {} has no producer and is not a graph input", id),
                    ));
                }
                continue;
            };
            match self.node_entry(producer) {
                None => {
                    return Err(violation(
                        2,
                        "single producer",
                        format!("value {} names producer {}, which does not exist", id, producer),
                    ))
                }
                Some(node) if !node.outputs.contains(&id) => {
                    return Err(violation(
                        2,
                        "single producer",
                        format!("value {} names producer {}, which does not list it", id, producer),
                    ))
                }
                Some(_) => {}
            }
        }

        for (id, node) in self.live_nodes() {
            for &output in &node.outputs {
                match self.value_entry(output) {
                    Some(value) if value.producer == Some(id) => {}
                    Some(_) => {
                        return Err(violation(
                            2,
                            "single producer",
                            format!("output {} of {} names a different producer", output, id),
                        ))
                    }
                    None => {
                        return Err(violation(
                            2,
                            "single producer",
                            format!("output {} of {} does not exist", output, id),
                        ))
                    }
                }
            }
        }
        Ok(())
    }

    fn verify_operands(&self) -> IrResult<()> {
        for (id, node) in self.live_nodes() {
            if let Some((index, input)) = node
                .inputs
                .iter()
                .enumerate()
                .find(|(_, v)| !self.has_value(**v))
            {
                return Err(violation(
                    3,
                    "live operands",
                    format!("input {} of {} references missing value {}", index, id, input),
                ));
            }
        }
        Ok(())
    }

    /// The use index must be exactly the inverse of operands plus output slots
    fn verify_use_index(&self) -> IrResult<()> {
        let mut expected: FxHashMap<ValueId, Vec<Use>> = FxHashMap::default();
        for (id, node) in self.live_nodes() {
            for (index, &input) in node.inputs.iter().enumerate() {
                expected
                    .entry(input)
                    .or_default()
                    .push(Use::Operand { node: id, index });
            }
        }
        for (slot, &output) in self.outputs.iter().enumerate() {
            expected
                .entry(output)
                .or_default()
                .push(Use::GraphOutput { slot });
        }

        for (id, value) in self.live_values() {
            let mut stored: Vec<Use> = value.uses.to_vec();
            stored.sort_unstable();
            let mut want = expected.remove(&id).unwrap_or_default();
            want.sort_unstable();

            if stored != want {
                return Err(violation(
                    5,
                    "use index",
                    format!(
                        "value {} has {} recorded use(s) but {} actual reference(s)",
                        id,
                        stored.len(),
                        want.len()
                    ),
                ));
            }
        }
        Ok(())
    }

    fn verify_io_sequences(&self) -> IrResult<()> {
        let mut seen: FxHashSet<ValueId> = FxHashSet::default();
        for &input in &self.inputs {
            if !seen.insert(input) {
                return Err(violation(
                    6,
                    "graph inputs",
                    format!("value {} appears twice in the input sequence", input),
                ));
            }
            match self.value_entry(input) {
                None => {
                    return Err(violation(
                        6,
                        "graph inputs",
                        format!("graph input {} does not exist", input),
                    ))
                }
                Some(v) if !v.is_input || v.producer.is_some() => {
                    return Err(violation(
                        6,
                        "graph inputs",
                        format!("graph input {} is not flagged as a producerless input", input),
                    ))
                }
                Some(_) => {}
            }
        }

        let output_set: FxHashSet<ValueId> = self.outputs.iter().copied().collect();
        for &output in &self.outputs {
            if !self.has_value(output) {
                return Err(violation(
                    6,
                    "graph outputs",
                    format!("graph output {} does not exist", output),
                ));
            }
        }

        for (id, value) in self.live_values() {
            if value.is_input && !seen.contains(&id) {
                return Err(violation(
                    6,
                    "graph inputs",
                    format!("value {} is flagged as input but not registered", id),
                ));
            }
            if value.is_output != output_set.contains(&id) {
                return Err(violation(
                    6,
                    "graph outputs",
                    format!(
                        "value {} output flag is {} but it fills {} output slot(s)",
                        id,
                        value.is_output,
                        self.outputs.iter().filter(|&&o| o == id).count()
                    ),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::AttrMap;
    use crate::graph::maps::{UseList, ValueEntry};
    use crate::tensor::{DType, TensorType};

    fn t() -> TensorType {
        TensorType::new(DType::I32, [3])
    }

    fn make_test_graph() -> (GraphModule, ValueId, NodeId, ValueId) {
        let mut g = GraphModule::new();
        let x = g.add_input("x", t());
        let relu = g.add_node("relu", &[x], AttrMap::new(), &[t()]).unwrap();
        let y = g.node_output(relu, 0).unwrap();
        g.add_output(y).unwrap();
        (g, x, relu, y)
    }

    fn expect_invariant(g: &GraphModule, invariant: &str) {
        match g.verify() {
            Err(IrError::InvariantViolation(msg)) => {
                assert!(msg.starts_with(invariant), "unexpected message: {}", msg)
            }
            other => panic!("expected violation of {}, got {:?}", invariant, other),
        }
    }

    #[test]
    fn test_valid_graph() {
        let (g, _, _, _) = make_test_graph();
        assert!(g.verify().is_ok());
        assert!(GraphModule::new().verify().is_ok());
    }

    #[test]
    fn test_count_mismatch() {
        let (mut g, _, _, _) = make_test_graph();
        g.node_count += 1;
        expect_invariant(&g, "invariant 1");
    }

    #[test]
    fn test_missing_producer() {
        let (mut g, _, relu, _) = make_test_graph();
        // Drop the node slot without touching its outputs.
        g.nodes[relu.index()] = None;
        g.node_count -= 1;
        expect_invariant(&g, "invariant 2");
    }

    #[test]
    fn test_value_without_producer_or_input_flag() {
        let (mut g, _, _, _) = make_test_graph();
        let orphan = g.next_value_id();
        g.values.push(Some(ValueEntry {
            ty: t(),
            producer: None,
            name: "orphan".to_string(),
            is_input: false,
            is_output: false,
            uses: UseList::new(),
        }));
        g.value_count += 1;
        g.next_value += 1;

        assert!(g.has_value(orphan));
        expect_invariant(&g, "invariant 2");
    }

    #[test]
    fn test_counter_behind_tables() {
        let (mut g, _, _, _) = make_test_graph();
        g.next_node = 0;
        expect_invariant(&g, "invariant 1");
    }

    #[test]
    fn test_dangling_operand() {
        let (mut g, _, relu, _) = make_test_graph();
        g.node_entry_mut(relu).unwrap().inputs.push(ValueId::new(50));
        expect_invariant(&g, "invariant 3");
    }

    #[test]
    fn test_cycle() {
        let (mut g, _, relu, y) = make_test_graph();
        g.node_entry_mut(relu).unwrap().inputs[0] = y;
        expect_invariant(&g, "invariant 4");
    }

    #[test]
    fn test_stale_use_index() {
        let (mut g, x, _, _) = make_test_graph();
        g.value_entry_mut(x).unwrap().uses.clear();
        expect_invariant(&g, "invariant 5");
    }

    #[test]
    fn test_output_flag_mismatch() {
        let (mut g, _, _, y) = make_test_graph();
        g.value_entry_mut(y).unwrap().is_output = false;
        expect_invariant(&g, "invariant 6");
    }

    #[test]
    fn test_duplicate_input() {
        let (mut g, x, _, _) = make_test_graph();
        g.inputs.push(x);
        expect_invariant(&g, "invariant 6");
    }
}
