//! Pass driver
//!
//! Runs an ordered list of borrowed passes over a graph, each exactly once.

use tracing::{debug, info, warn};

use crate::error::{IrError, IrResult};
use crate::graph::GraphModule;
use crate::traits::Pass;

/// Driver configuration
///
/// Verification is off by default: checking the graph between passes is the
/// caller's decision.
#[derive(Debug, Clone, Default)]
pub struct PassManagerOptions {
    /// Verify the graph before the first pass
    pub verify_input: bool,
    /// Verify the graph after every pass
    pub verify_each: bool,
}

/// Result of one pass within a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PassOutcome {
    /// Pass name
    pub name: String,
    /// Whether the pass reported a change
    pub changed: bool,
}

/// Statistics from a driver run, one entry per pass in execution order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassRunReport {
    /// Per-pass outcomes
    pub passes: Vec<PassOutcome>,
}

impl PassRunReport {
    /// Whether any pass reported a change
    pub fn any_changed(&self) -> bool {
        self.passes.iter().any(|p| p.changed)
    }

    /// Names of passes that reported a change
    pub fn changed_passes(&self) -> Vec<&str> {
        self.passes
            .iter()
            .filter(|p| p.changed)
            .map(|p| p.name.as_str())
            .collect()
    }
}

/// Ordered sequence of rewrite passes
///
/// The manager borrows its passes; they are owned by the caller and must
/// outlive it. [`run`](Self::run) executes each registered pass exactly once,
/// in registration order. It never iterates to a fixed point and never skips
/// a pass because an earlier one reported no change.
///
/// # Example
///
/// ```
/// use mlopt::prelude::*;
///
/// let mut dce = EliminateDeadNodes::new();
/// let mut identity = EliminateIdentity::new();
///
/// let mut pm = PassManager::new();
/// pm.add(&mut identity);
/// pm.add(&mut dce);
///
/// let mut graph = GraphModule::new();
/// let report = pm.run(&mut graph).unwrap();
/// assert_eq!(report.passes.len(), 2);
/// ```
#[derive(Default)]
pub struct PassManager<'p> {
    passes: Vec<&'p mut dyn Pass>,
    options: PassManagerOptions,
}

impl<'p> PassManager<'p> {
    /// Create an empty pass manager
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the manager
    pub fn with_options(mut self, options: PassManagerOptions) -> Self {
        self.options = options;
        self
    }

    /// Current options
    pub fn options(&self) -> &PassManagerOptions {
        &self.options
    }

    /// Append a pass
    pub fn add(&mut self, pass: &'p mut dyn Pass) {
        self.passes.push(pass);
    }

    /// Remove all passes
    pub fn clear(&mut self) {
        self.passes.clear();
    }

    /// Number of registered passes
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if no pass is registered
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Registered pass names, in order
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run every pass once, in registration order
    ///
    /// A pass error stops the run and is returned; passes that already ran
    /// keep their effects.
    pub fn run(&mut self, graph: &mut GraphModule) -> IrResult<PassRunReport> {
        if self.options.verify_input {
            if let Err(e) = graph.verify() {
                warn!(error = %e, "input graph failed verification");
                return Err(e);
            }
        }

        let mut report = PassRunReport::default();
        for pass in self.passes.iter_mut() {
            let name = pass.name().to_string();
            debug!(pass = %name, "running pass");

            let changed = pass.run(graph)?;

            if self.options.verify_each {
                graph.verify().map_err(|e| {
                    warn!(pass = %name, error = %e, "graph failed verification after pass");
                    IrError::Pass {
                        name: name.clone(),
                        message: e.to_string(),
                    }
                })?;
            }

            info!(pass = %name, changed, nodes = graph.num_nodes(), "pass finished");
            report.passes.push(PassOutcome { name, changed });
        }

        Ok(report)
    }
}
