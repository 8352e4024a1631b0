//! Graph node trait: one unit of work in a [`StateGraph`](super::StateGraph).

use async_trait::async_trait;

use crate::error::ProcessingError;

/// One step in a graph: state in, state out.
///
/// Nodes take the state by value and return a new one. The graph runner
/// passes the output to the next node in edge order, or returns it when the
/// node is the finish point.
#[async_trait]
pub trait Node<S>: Send + Sync {
    /// Node id (e.g. `"generate"`). Must be unique within a graph.
    fn id(&self) -> &str;

    /// Run this step.
    async fn run(&self, state: S) -> Result<S, ProcessingError>;
}
