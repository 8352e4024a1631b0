//! State graph builder: nodes plus a linear edge order.

use std::collections::HashMap;
use std::fmt;

use crate::error::CompilationError;

use super::compiled::CompiledGraph;
use super::node::Node;

/// Graph under construction.
///
/// Generic over state type `S`. Register nodes with [`add_node`](Self::add_node),
/// chain them with [`add_edge`](Self::add_edge), then [`compile`](Self::compile).
/// The first edge is the entry point and the last edge is the finish point;
/// a one-node graph uses the same node for both.
pub struct StateGraph<S> {
    nodes: HashMap<String, Box<dyn Node<S>>>,
    edge_order: Vec<String>,
}

impl<S> Default for StateGraph<S>
where
    S: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: Send + 'static,
{
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edge_order: Vec::new(),
        }
    }

    /// Adds a node under its own [`Node::id`]. Replaces a node with the same id.
    pub fn add_node(&mut self, node: impl Node<S> + 'static) -> &mut Self {
        self.nodes.insert(node.id().to_owned(), Box::new(node));
        self
    }

    /// Appends `to_id` to the chain.
    ///
    /// The id must be registered with [`add_node`](Self::add_node) before
    /// [`compile`](Self::compile).
    pub fn add_edge(&mut self, to_id: impl Into<String>) -> &mut Self {
        self.edge_order.push(to_id.into());
        self
    }

    /// Builds the executable graph.
    ///
    /// # Errors
    ///
    /// [`CompilationError::Empty`] if there are no edges, or
    /// [`CompilationError::NodeNotFound`] if an edge names an unknown node.
    pub fn compile(self) -> Result<CompiledGraph<S>, CompilationError> {
        if self.edge_order.is_empty() {
            return Err(CompilationError::Empty);
        }
        if let Some(id) = self.edge_order.iter().find(|id| !self.nodes.contains_key(*id)) {
            return Err(CompilationError::NodeNotFound(id.clone()));
        }

        Ok(CompiledGraph::new(self.nodes, self.edge_order))
    }
}

impl<S> fmt::Debug for StateGraph<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateGraph")
            .field("nodes", &self.nodes.keys().collect::<Vec<_>>())
            .field("edge_order", &self.edge_order)
            .finish()
    }
}
