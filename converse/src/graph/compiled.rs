//! Compiled state graph and its run lifecycle.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::error::ProcessingError;

use super::node::Node;

/// Lifecycle of one graph run.
///
/// `Idle → Running` on invoke, then `Done` or `Failed`. Both end states are
/// terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Created, not yet invoked.
    Idle,
    /// A node is executing.
    Running,
    /// The finish node returned.
    Done,
    /// A node returned an error.
    Failed,
}

impl RunStatus {
    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

/// Immutable, validated graph. Built by [`StateGraph::compile`](super::StateGraph::compile).
pub struct CompiledGraph<S> {
    nodes: HashMap<String, Box<dyn Node<S>>>,
    edge_order: Vec<String>,
}

impl<S> CompiledGraph<S>
where
    S: Send + 'static,
{
    pub(super) fn new(nodes: HashMap<String, Box<dyn Node<S>>>, edge_order: Vec<String>) -> Self {
        Self { nodes, edge_order }
    }

    /// Id of the entry node.
    #[must_use]
    pub fn entry_point(&self) -> &str {
        self.edge_order.first().map_or("", String::as_str)
    }

    /// Id of the finish node.
    #[must_use]
    pub fn finish_point(&self) -> &str {
        self.edge_order.last().map_or("", String::as_str)
    }

    /// Start a new run in [`RunStatus::Idle`].
    #[must_use]
    pub const fn start(&self) -> GraphRun<'_, S> {
        GraphRun {
            graph: self,
            status: RunStatus::Idle,
        }
    }

    /// Start a run and invoke it once.
    ///
    /// # Errors
    ///
    /// Returns the first node error; later nodes do not run.
    pub async fn invoke(&self, state: S) -> Result<S, ProcessingError> {
        self.start().invoke(state).await
    }

    async fn execute(&self, mut state: S) -> Result<S, ProcessingError> {
        for id in &self.edge_order {
            let node = self
                .nodes
                .get(id)
                .ok_or_else(|| ProcessingError::MissingNode(id.clone()))?;
            debug!(node = %id, "running node");
            state = node.run(state).await?;
        }
        Ok(state)
    }
}

impl<S> fmt::Debug for CompiledGraph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledGraph")
            .field("edge_order", &self.edge_order)
            .finish_non_exhaustive()
    }
}

/// One execution of a [`CompiledGraph`].
#[derive(Debug)]
pub struct GraphRun<'g, S> {
    graph: &'g CompiledGraph<S>,
    status: RunStatus,
}

impl<S> GraphRun<'_, S>
where
    S: Send + 'static,
{
    /// Current lifecycle state.
    #[must_use]
    pub const fn status(&self) -> RunStatus {
        self.status
    }

    /// Run every node in edge order, starting from `state`.
    ///
    /// # Errors
    ///
    /// [`ProcessingError::AlreadyInvoked`] if this run left
    /// [`RunStatus::Idle`] before; otherwise the failing node's error.
    pub async fn invoke(&mut self, state: S) -> Result<S, ProcessingError> {
        if self.status != RunStatus::Idle {
            return Err(ProcessingError::AlreadyInvoked);
        }

        self.status = RunStatus::Running;
        match self.graph.execute(state).await {
            Ok(state) => {
                self.status = RunStatus::Done;
                Ok(state)
            }
            Err(e) => {
                warn!(error = %e, "graph run failed");
                self.status = RunStatus::Failed;
                Err(e)
            }
        }
    }
}
