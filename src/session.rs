//! The command surface an editor front end talks to.
//!
//! Every verb here is a direct call: node placement, connection, parameter
//! saves, and run triggers arrive as explicit commands rather than ambient
//! UI events, and each one maps onto the graph store or dispatcher contract
//! it validates against.

use crate::dispatcher::{ExecutionDispatcher, SharedGraph};
use crate::engine::{EngineArtifact, ProcessingEngine};
use crate::error::{DispatchError, GraphError};
use crate::graph::{
    Edge, ImageBlob, NodeGeometry, NodeId, NodePayload, ParamMap, PayloadPatch, PipelineGraph,
};
use crate::registry::OperationKind;
use parking_lot::Mutex;
use std::sync::Arc;

/// One interactive editing session: a graph plus a dispatcher bound to a
/// processing engine.
pub struct EditorSession {
    graph: SharedGraph,
    dispatcher: ExecutionDispatcher,
}

impl EditorSession {
    pub fn new(engine: Arc<dyn ProcessingEngine>) -> Self {
        Self::with_graph(Arc::new(Mutex::new(PipelineGraph::new())), engine)
    }

    /// Wraps an existing graph (e.g. one imported from an editor document).
    pub fn with_graph(graph: SharedGraph, engine: Arc<dyn ProcessingEngine>) -> Self {
        let dispatcher = ExecutionDispatcher::new(Arc::clone(&graph), engine);
        Self { graph, dispatcher }
    }

    /// Direct access to the shared graph for callers that need more than the
    /// command surface.
    pub fn graph(&self) -> &SharedGraph {
        &self.graph
    }

    pub fn dispatcher(&self) -> &ExecutionDispatcher {
        &self.dispatcher
    }

    // --- Placement commands ---

    /// Places an empty source node at the given position.
    pub fn place_source(&self, geometry: NodeGeometry) -> NodeId {
        self.graph
            .lock()
            .add_node(NodePayload::empty_source(), geometry)
    }

    /// Places a stage node for a registered operation, with an empty
    /// parameter map (defaults are filled at compile time).
    pub fn place_stage(&self, op: OperationKind, geometry: NodeGeometry) -> NodeId {
        self.graph
            .lock()
            .add_node(NodePayload::stage(op.name()), geometry)
    }

    /// Places an empty sink node at the given position.
    pub fn place_sink(&self, geometry: NodeGeometry) -> NodeId {
        self.graph
            .lock()
            .add_node(NodePayload::empty_sink(), geometry)
    }

    // --- Connection commands ---

    /// Validates and applies a proposed connection.
    pub fn connect(&self, source: NodeId, target: NodeId) -> Result<(), GraphError> {
        self.graph.lock().add_edge(source, target)
    }

    /// Removes the incoming connection of `target`, returning it if present.
    pub fn disconnect(&self, target: NodeId) -> Option<Edge> {
        self.graph.lock().remove_edge(target)
    }

    /// Deletes a node, cascading the removal of its connections.
    pub fn delete_node(&self, id: NodeId) {
        self.graph.lock().remove_node(id);
    }

    // --- Payload commands ---

    /// Stores uploaded image data on a source node.
    pub fn upload_source(&self, id: NodeId, blob: ImageBlob) -> Result<(), GraphError> {
        self.graph
            .lock()
            .update_payload(id, PayloadPatch::SourceData(blob))
    }

    /// Merges edited parameters into a stage node.
    pub fn save_params(&self, id: NodeId, params: ParamMap) -> Result<(), GraphError> {
        self.graph
            .lock()
            .update_payload(id, PayloadPatch::StageParams(params))
    }

    // --- Execution and export ---

    /// Runs the pipeline rooted at `sink`.
    pub async fn run(&self, sink: NodeId) -> Result<(), DispatchError> {
        self.dispatcher.run(sink).await
    }

    /// The sink's current stored result, if any. Producing a downloadable
    /// file from it is the caller's concern; the artifact is opaque here.
    pub fn result(&self, sink: NodeId) -> Option<EngineArtifact> {
        let graph = self.graph.lock();
        graph
            .node(sink)?
            .as_sink()?
            .result
            .as_ref()
            .map(|handle| handle.artifact().clone())
    }
}
