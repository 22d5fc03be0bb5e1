//! Property tests for the graph container
//!
//! Random mutation sequences must keep every structural invariant, failed
//! mutations must leave the graph untouched, and serialization must preserve
//! the graph exactly.

use mlopt::prelude::*;
use proptest::prelude::*;

/// One step of a random edit script
///
/// Indices are reduced modulo the number of live handles when applied, so
/// any generated script is meaningful for any graph.
#[derive(Debug, Clone)]
enum Edit {
    AddInput(String),
    AddNode { op: String, inputs: Vec<usize>, outputs: usize, attrs: AttrMap },
    AddOutput(usize),
    AddConst(AttrValue),
    ReplaceNode { node: usize, inputs: Vec<usize>, attrs: AttrMap },
    RemoveNode(usize),
    ReplaceAllUses { from: usize, to: usize },
    StaleReference(u32),
}

/// Scalar attribute of any kind, including non-finite floats
fn attr_leaf_strategy() -> impl Strategy<Value = AttrValue> {
    prop_oneof![
        any::<i64>().prop_map(AttrValue::Int),
        any::<f64>().prop_map(AttrValue::Float),
        "[a-z0-9_ \\-\"]{0,8}".prop_map(AttrValue::String),
        any::<bool>().prop_map(AttrValue::Bool),
    ]
}

/// Attribute of any kind, lists nested up to three levels
fn attr_value_strategy() -> impl Strategy<Value = AttrValue> {
    attr_leaf_strategy().prop_recursive(3, 16, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(AttrValue::List)
    })
}

fn attr_map_strategy() -> impl Strategy<Value = AttrMap> {
    prop::collection::vec(("[a-z]{1,6}", attr_value_strategy()), 0..4)
        .prop_map(|pairs| attrs(pairs))
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        "[a-z]{0,4}".prop_map(Edit::AddInput),
        (
            "[A-Za-z]{1,6}",
            prop::collection::vec(any::<usize>(), 0..3),
            0usize..3,
            attr_map_strategy(),
        )
            .prop_map(|(op, inputs, outputs, attrs)| Edit::AddNode { op, inputs, outputs, attrs }),
        any::<usize>().prop_map(Edit::AddOutput),
        attr_value_strategy().prop_map(Edit::AddConst),
        (
            any::<usize>(),
            prop::collection::vec(any::<usize>(), 0..3),
            attr_map_strategy(),
        )
            .prop_map(|(node, inputs, attrs)| Edit::ReplaceNode { node, inputs, attrs }),
        any::<usize>().prop_map(Edit::RemoveNode),
        (any::<usize>(), any::<usize>()).prop_map(|(from, to)| Edit::ReplaceAllUses { from, to }),
        (0u32..64).prop_map(Edit::StaleReference),
    ]
}

fn ty() -> TensorType {
    TensorType::new(DType::F32, [2, UNKNOWN_DIM])
}

fn live_values(g: &GraphModule) -> Vec<ValueId> {
    (0..g.next_value_id().raw())
        .map(ValueId::new)
        .filter(|&v| g.has_value(v))
        .collect()
}

fn pick<T: Copy>(items: &[T], i: usize) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[i % items.len()])
    }
}

fn pick_all(items: &[ValueId], picks: &[usize]) -> Option<Vec<ValueId>> {
    picks.iter().map(|&i| pick(items, i)).collect()
}

/// Apply one edit; `None` when the edit had nothing to act on
fn apply(g: &mut GraphModule, edit: &Edit) -> Option<IrResult<()>> {
    let values = live_values(g);
    let nodes = g.nodes();
    let result = match edit {
        Edit::AddInput(name) => {
            g.add_input(name.as_str(), ty());
            Ok(())
        }
        Edit::AddNode { op, inputs, outputs, attrs } => {
            let inputs = pick_all(&values, inputs)?;
            let types = vec![ty(); *outputs];
            g.add_node(op.as_str(), &inputs, attrs.clone(), &types).map(|_| ())
        }
        Edit::AddOutput(i) => g.add_output(pick(&values, *i)?).map(|_| ()),
        Edit::AddConst(scalar) => {
            g.add_const_scalar(DType::F64, scalar.clone());
            Ok(())
        }
        Edit::ReplaceNode { node, inputs, attrs } => {
            let node = pick(&nodes, *node)?;
            let inputs = pick_all(&values, inputs)?;
            g.replace_node(node, "rewritten", &inputs, attrs.clone())
                .map(|_| ())
        }
        Edit::RemoveNode(i) => g.remove_node(pick(&nodes, *i)?),
        Edit::ReplaceAllUses { from, to } => {
            let from = pick(&values, *from)?;
            let to = pick(&values, *to)?;
            g.replace_all_uses(from, to).map(|_| ())
        }
        Edit::StaleReference(raw) => {
            let ghost = ValueId::new(g.next_value_id().raw() + raw);
            g.add_node("op", &[ghost], AttrMap::new(), &[ty()]).map(|_| ())
        }
    };
    Some(result)
}

fn snapshot(g: &GraphModule) -> String {
    g.to_json_string(JsonFormat::Compact).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn test_edits_preserve_invariants(edits in prop::collection::vec(edit_strategy(), 0..40)) {
        let mut g = GraphModule::new();
        for edit in &edits {
            let before = snapshot(&g);
            if let Some(Err(_)) = apply(&mut g, edit) {
                prop_assert_eq!(snapshot(&g), before, "failed {:?} changed the graph", edit);
            }
            prop_assert!(g.verify().is_ok(), "{:?} broke the graph: {:?}", edit, g.verify());
        }
    }

    #[test]
    fn test_topological_order_respects_edges(edits in prop::collection::vec(edit_strategy(), 0..40)) {
        let mut g = GraphModule::new();
        for edit in &edits {
            let _ = apply(&mut g, edit);
        }

        let order = g.topological_sort().unwrap();
        prop_assert_eq!(order.len(), g.num_nodes());

        let position = |n: NodeId| order.iter().position(|&m| m == n);
        for &n in &order {
            for input in g.get_node(n).inputs {
                if let Some(p) = g.producer(input) {
                    prop_assert!(position(p) < position(n));
                }
            }
        }
    }

    #[test]
    fn test_json_round_trip(edits in prop::collection::vec(edit_strategy(), 0..40)) {
        let mut g = GraphModule::new();
        for edit in &edits {
            let _ = apply(&mut g, edit);
        }

        let text = snapshot(&g);
        let loaded = GraphModule::from_json_str(&text).unwrap();

        prop_assert_eq!(snapshot(&loaded), text);
        prop_assert_eq!(loaded.nodes(), g.nodes());
        for v in live_values(&g) {
            prop_assert_eq!(loaded.uses(v).len(), g.uses(v).len());
            prop_assert_eq!(loaded.consumers(v), g.consumers(v));
        }
    }

    #[test]
    fn test_cleanup_passes_keep_outputs(edits in prop::collection::vec(edit_strategy(), 0..40)) {
        let mut g = GraphModule::new();
        for edit in &edits {
            let _ = apply(&mut g, edit);
        }
        let outputs = g.outputs().len();

        let mut identity = EliminateIdentity::new();
        let mut dce = EliminateDeadNodes::new();
        let mut pm = PassManager::new();
        pm.add(&mut identity);
        pm.add(&mut dce);
        pm.run(&mut g).unwrap();

        prop_assert!(g.verify().is_ok());
        prop_assert_eq!(g.outputs().len(), outputs);
        for n in g.nodes() {
            let view = g.get_node(n);
            prop_assert!(view.outputs.iter().any(|&v| !g.is_unused(v)));
        }
    }

    #[test]
    fn test_float_attribute_bits_survive_reload(value in any::<f64>()) {
        let mut g = GraphModule::new();
        let x = g.add_input("x", ty());
        let clip = g
            .add_node("clip", &[x], attrs([("max", value)]), &[ty()])
            .unwrap();

        let loaded = GraphModule::from_json_str(&snapshot(&g)).unwrap();
        let back = loaded.get_node(clip).attr("max").and_then(AttrValue::as_float);

        match back {
            Some(v) if value.is_nan() => prop_assert!(v.is_nan()),
            Some(v) => prop_assert_eq!(v.to_bits(), value.to_bits()),
            None => prop_assert!(false, "float attribute lost on reload"),
        }
    }
}
