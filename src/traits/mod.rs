//! Core traits for mlopt
//!
//! Defines the rewrite-pass interface every optimization implements.

use crate::error::IrResult;
use crate::graph::GraphModule;

/// A unit of graph rewriting
///
/// A pass receives the graph by mutable reference, attempts its rewrites
/// through the public mutation API, and reports whether anything changed.
/// Whatever it reports, it must leave the graph satisfying every invariant
/// checked by [`GraphModule::verify`].
///
/// # Example
///
/// ```
/// use mlopt::prelude::*;
///
/// struct RenameRelu;
///
/// impl Pass for RenameRelu {
///     fn name(&self) -> &str {
///         "RenameRelu"
///     }
///
///     fn run(&mut self, graph: &mut GraphModule) -> IrResult<bool> {
///         let relus = graph.find_nodes_by_op("relu");
///         for &id in &relus {
///             let node = graph.get_node(id);
///             graph.replace_node(id, "Relu", &node.inputs, node.attrs)?;
///         }
///         Ok(!relus.is_empty())
///     }
/// }
/// ```
pub trait Pass {
    /// Name of the pass, used in logs and run reports
    fn name(&self) -> &str;

    /// Apply the pass; returns `true` if the graph changed
    fn run(&mut self, graph: &mut GraphModule) -> IrResult<bool>;
}

/// Pass built from a closure
pub struct FnPass<F> {
    name: String,
    f: F,
}

impl<F> FnPass<F>
where
    F: FnMut(&mut GraphModule) -> IrResult<bool>,
{
    /// Wrap a closure as a named pass
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Pass for FnPass<F>
where
    F: FnMut(&mut GraphModule) -> IrResult<bool>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&mut self, graph: &mut GraphModule) -> IrResult<bool> {
        (self.f)(graph)
    }
}
