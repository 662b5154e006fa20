//! Backward path resolution from a sink to its originating source.

use crate::error::ResolveError;
use crate::graph::{Node, NodeId, NodeKind, PipelineGraph};
use ahash::AHashSet;

/// Resolves the linear chain feeding `sink`, ordered from the ultimate
/// source to `sink` inclusive.
///
/// The walk follows the unique incoming edge of each node until it reaches a
/// node with none. Because every node has at most one incoming edge there are
/// no choice points, so the resolved chain is unique for a fixed graph state.
///
/// Edge insertion does not check for cycles, so the walk carries a mandatory
/// visited-set guard: revisiting a node fails with
/// [`ResolveError::CycleDetected`] instead of looping. A walk that terminates
/// on anything other than a source node fails with
/// [`ResolveError::NoSourceFound`].
pub fn resolve_path(graph: &PipelineGraph, sink: NodeId) -> Result<Vec<&Node>, ResolveError> {
    if graph.node(sink).is_none() {
        return Err(ResolveError::UnknownSink { id: sink });
    }

    let mut visited: AHashSet<NodeId> = AHashSet::new();
    let mut chain: Vec<&Node> = Vec::new();
    let mut current = sink;

    loop {
        if !visited.insert(current) {
            return Err(ResolveError::CycleDetected { id: current });
        }
        // Edges only ever reference live nodes (cascade delete), so the
        // lookup holds for every id reached through an incoming edge.
        let node = graph
            .node(current)
            .ok_or(ResolveError::UnknownSink { id: current })?;
        chain.push(node);

        match graph.incoming_edge(current) {
            Some(edge) => current = edge.source,
            None => break,
        }
    }

    let root = *chain.last().expect("chain contains at least the sink");
    if root.kind() != NodeKind::Source {
        return Err(ResolveError::NoSourceFound {
            id: root.id,
            kind: root.kind(),
        });
    }

    chain.reverse();
    Ok(chain)
}
