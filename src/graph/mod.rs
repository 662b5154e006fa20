//! The mutable pipeline graph owned by an interactive session.
//!
//! [`PipelineGraph`] holds the node set and the directed connections between
//! nodes. Its single structural invariant is that every node has **at most
//! one incoming connection**: restricted to incoming edges, the graph is a
//! forest. Outgoing fan-out is unrestricted; each downstream chain is
//! resolved independently by [`resolve_path`].
//!
//! Removing a node cascades the removal of every edge touching it, so an
//! edge can never reference a missing node id.

mod node;
pub mod resolve;

pub use node::*;
pub use resolve::resolve_path;

use crate::error::GraphError;
use ahash::AHashMap;

/// A directed connection carrying data from `source` to `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

/// A merge request applied to a node's payload through
/// [`PipelineGraph::update_payload`].
#[derive(Debug)]
pub enum PayloadPatch {
    /// Replace the source node's uploaded image.
    SourceData(ImageBlob),
    /// Merge these keys into the stage's parameter map, overwriting any that
    /// are already set.
    StageParams(ParamMap),
    /// Replace the sink's stored result. The previous handle (if any) is
    /// dropped, which runs its release hook.
    SinkResult(Option<ResultHandle>),
}

/// The node/edge store for one editor session.
#[derive(Debug, Default)]
pub struct PipelineGraph {
    nodes: AHashMap<NodeId, Node>,
    /// `target -> source`. Key uniqueness *is* the one-incoming-edge invariant.
    incoming: AHashMap<NodeId, NodeId>,
    next_id: u64,
}

impl PipelineGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a node with a freshly allocated id. Never fails.
    pub fn add_node(&mut self, payload: NodePayload, geometry: NodeGeometry) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(
            id,
            Node {
                id,
                payload,
                geometry,
            },
        );
        id
    }

    /// Connects `source` to `target`.
    ///
    /// Fails with [`GraphError::InvalidReference`] if either endpoint is
    /// missing, and with [`GraphError::MultipleInputs`] if `target` already
    /// has an incoming connection. Silent replacement is deliberately not
    /// offered: callers must [`remove_edge`](Self::remove_edge) first, which
    /// keeps the invariant observable.
    pub fn add_edge(&mut self, source: NodeId, target: NodeId) -> Result<(), GraphError> {
        for id in [source, target] {
            if !self.nodes.contains_key(&id) {
                return Err(GraphError::InvalidReference { id });
            }
        }
        if let Some(&existing_source) = self.incoming.get(&target) {
            return Err(GraphError::MultipleInputs {
                target,
                existing_source,
            });
        }
        self.incoming.insert(target, source);
        Ok(())
    }

    /// Removes the incoming edge of `target`, returning it if one existed.
    pub fn remove_edge(&mut self, target: NodeId) -> Option<Edge> {
        self.incoming
            .remove(&target)
            .map(|source| Edge { source, target })
    }

    /// Removes a node and every edge referencing it. No-op if absent.
    ///
    /// Dropping a sink node drops its stored [`ResultHandle`], which runs the
    /// release hook.
    pub fn remove_node(&mut self, id: NodeId) {
        if self.nodes.remove(&id).is_none() {
            return;
        }
        let before = self.incoming.len();
        self.incoming
            .retain(|&target, &mut source| target != id && source != id);
        tracing::debug!(node = %id, edges_removed = before - self.incoming.len(), "removed node");
    }

    /// Merges `patch` into the node's payload.
    ///
    /// Fails with [`GraphError::UnknownNode`] if the node is absent, and with
    /// [`GraphError::PayloadMismatch`] if the patch variant does not match
    /// the node's payload variant.
    pub fn update_payload(&mut self, id: NodeId, patch: PayloadPatch) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::UnknownNode { id })?;
        match (&mut node.payload, patch) {
            (NodePayload::Source(source), PayloadPatch::SourceData(blob)) => {
                source.data = Some(blob);
            }
            (NodePayload::Stage(stage), PayloadPatch::StageParams(params)) => {
                stage.params.extend(params);
            }
            (NodePayload::Sink(sink), PayloadPatch::SinkResult(result)) => {
                sink.result = result;
            }
            (payload, _) => {
                return Err(GraphError::PayloadMismatch {
                    id,
                    kind: payload.kind(),
                });
            }
        }
        Ok(())
    }

    /// Overwrites a node's presentation geometry (pass-through only).
    pub fn set_geometry(&mut self, id: NodeId, geometry: NodeGeometry) -> Result<(), GraphError> {
        let node = self
            .nodes
            .get_mut(&id)
            .ok_or(GraphError::UnknownNode { id })?;
        node.geometry = geometry;
        Ok(())
    }

    /// O(1) lookup of the unique incoming edge of `id`, if any.
    pub fn incoming_edge(&self, id: NodeId) -> Option<Edge> {
        self.incoming.get(&id).map(|&source| Edge {
            source,
            target: id,
        })
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&id)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All edges currently in the graph, in no particular order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.incoming.iter().map(|(&target, &source)| Edge {
            source,
            target,
        })
    }

    /// Ids of all sink nodes, sorted for deterministic iteration.
    pub fn sinks(&self) -> Vec<NodeId> {
        let mut sinks: Vec<NodeId> = self
            .nodes
            .values()
            .filter(|n| n.kind() == NodeKind::Sink)
            .map(|n| n.id)
            .collect();
        sinks.sort();
        sinks
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.incoming.len()
    }
}
