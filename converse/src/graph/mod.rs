//! State graph: nodes plus linear edges, compile and invoke.
//!
//! Shaped like LangGraph's `StateGraph`: add nodes and edges, compile, then
//! invoke with a state. There are no conditional edges and no recovery
//! nodes; the first failing node ends the run.

mod compiled;
mod node;
mod state_graph;

pub use compiled::{CompiledGraph, GraphRun, RunStatus};
pub use node::Node;
pub use state_graph::StateGraph;
