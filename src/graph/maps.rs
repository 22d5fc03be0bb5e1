//! Graph storage types
//!
//! Nodes and values live in dense slot tables indexed by handle. A retired
//! entity keeps its slot as `None`, so handles stay stable and are never
//! handed out again.

use smallvec::SmallVec;

use crate::attr::AttrMap;
use crate::tensor::TensorType;

use super::handle::{NodeId, ValueId};

/// One reference to a value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Use {
    /// Input operand `index` of `node`
    Operand {
        /// Consuming node
        node: NodeId,
        /// Position in the consumer's input list
        index: usize,
    },
    /// Position `slot` in the graph output sequence
    GraphOutput {
        /// Index into the graph output sequence
        slot: usize,
    },
}

impl Use {
    /// Consuming node, if this is an operand use
    pub fn node(&self) -> Option<NodeId> {
        match self {
            Use::Operand { node, .. } => Some(*node),
            Use::GraphOutput { .. } => None,
        }
    }
}

/// Use list of a single value
/// SmallVec optimized for common case of 1-4 uses
pub type UseList = SmallVec<[Use; 4]>;

/// Stored node record
#[derive(Debug, Clone)]
pub(crate) struct NodeEntry {
    pub op: String,
    pub inputs: Vec<ValueId>,
    pub outputs: Vec<ValueId>,
    pub attrs: AttrMap,
}

/// Stored value record
#[derive(Debug, Clone)]
pub(crate) struct ValueEntry {
    pub ty: TensorType,
    pub producer: Option<NodeId>,
    pub name: String,
    pub is_input: bool,
    pub is_output: bool,
    pub uses: UseList,
}

impl ValueEntry {
    /// Whether any node consumes this value
    pub fn has_operand_uses(&self) -> bool {
        self.uses.iter().any(|u| matches!(u, Use::Operand { .. }))
    }

    pub fn add_use(&mut self, u: Use) {
        self.uses.push(u);
    }

    pub fn remove_use(&mut self, u: Use) {
        if let Some(pos) = self.uses.iter().position(|x| *x == u) {
            self.uses.swap_remove(pos);
        }
    }
}

/// Node slots, indexed by `NodeId`
pub(crate) type NodeTable = Vec<Option<NodeEntry>>;

/// Value slots, indexed by `ValueId`
pub(crate) type ValueTable = Vec<Option<ValueEntry>>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tensor::DType;

    fn make_value() -> ValueEntry {
        ValueEntry {
            ty: TensorType::scalar(DType::F32),
            producer: None,
            name: "x".to_string(),
            is_input: true,
            is_output: false,
            uses: UseList::new(),
        }
    }

    #[test]
    fn test_add_remove_use() {
        let mut v = make_value();
        let a = Use::Operand {
            node: NodeId::new(0),
            index: 0,
        };
        let b = Use::Operand {
            node: NodeId::new(0),
            index: 1,
        };

        v.add_use(a);
        v.add_use(b);
        assert!(v.has_operand_uses());

        v.remove_use(a);
        assert_eq!(v.uses.as_slice(), &[b]);

        v.remove_use(b);
        assert!(!v.has_operand_uses());
    }

    #[test]
    fn test_output_slot_is_not_operand_use() {
        let mut v = make_value();
        v.add_use(Use::GraphOutput { slot: 0 });
        assert!(!v.has_operand_uses());
        assert_eq!(v.uses[0].node(), None);
    }

    #[test]
    fn test_remove_only_one_duplicate() {
        let mut v = make_value();
        let slot = Use::GraphOutput { slot: 2 };
        v.add_use(slot);
        v.add_use(Use::GraphOutput { slot: 3 });
        v.remove_use(slot);
        assert_eq!(v.uses.len(), 1);
        assert_eq!(v.uses[0], Use::GraphOutput { slot: 3 });
    }
}
