//! Common test utilities for building pipeline graphs and stub engines.
use async_trait::async_trait;
use parking_lot::Mutex;
use rensa::prelude::*;
use std::sync::Arc;
use tokio::sync::Notify;

/// A tiny PNG-ish byte sequence standing in for uploaded image data.
#[allow(dead_code)]
pub const SAMPLE_BYTES: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

#[allow(dead_code)]
pub fn sample_blob() -> ImageBlob {
    ImageBlob::new(SAMPLE_BYTES.to_vec(), "photo.png", "image/png")
}

/// Builds `source -> stage* -> sink` with image data already uploaded.
///
/// Returns the source id, the stage ids in chain order, and the sink id.
#[allow(dead_code)]
pub fn linear_pipeline(graph: &mut PipelineGraph, ops: &[&str]) -> (NodeId, Vec<NodeId>, NodeId) {
    let source = graph.add_node(NodePayload::empty_source(), NodeGeometry::at(0.0, 0.0));
    graph
        .update_payload(source, PayloadPatch::SourceData(sample_blob()))
        .expect("Failed to upload to a fresh source");

    let mut stages = Vec::new();
    let mut previous = source;
    for (i, op) in ops.iter().enumerate() {
        let x = 200.0 * (i + 1) as f64;
        let stage = graph.add_node(NodePayload::stage(op), NodeGeometry::at(x, 0.0));
        graph.add_edge(previous, stage).expect("Failed to wire stage");
        stages.push(stage);
        previous = stage;
    }

    let x = 200.0 * (ops.len() + 1) as f64;
    let sink = graph.add_node(NodePayload::empty_sink(), NodeGeometry::at(x, 0.0));
    graph.add_edge(previous, sink).expect("Failed to wire sink");
    (source, stages, sink)
}

/// Wraps a graph for use with [`EditorSession::with_graph`].
#[allow(dead_code)]
pub fn shared(graph: PipelineGraph) -> SharedGraph {
    Arc::new(Mutex::new(graph))
}

/// Engine stub that records every request and returns a fixed artifact.
#[allow(dead_code)]
pub struct RecordingEngine {
    requests: Mutex<Vec<EngineRequest>>,
    artifact: EngineArtifact,
}

#[allow(dead_code)]
impl RecordingEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            artifact: EngineArtifact::new(b"processed".to_vec(), "image/png"),
        })
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<EngineRequest> {
        self.requests.lock().clone()
    }

    pub fn artifact(&self) -> &EngineArtifact {
        &self.artifact
    }
}

#[async_trait]
impl ProcessingEngine for RecordingEngine {
    async fn process(
        &self,
        request: EngineRequest,
    ) -> std::result::Result<EngineArtifact, EngineError> {
        self.requests.lock().push(request);
        Ok(self.artifact.clone())
    }
}

/// Engine stub that rejects every request.
#[allow(dead_code)]
pub struct FailingEngine;

#[allow(dead_code)]
impl FailingEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

#[async_trait]
impl ProcessingEngine for FailingEngine {
    async fn process(
        &self,
        _request: EngineRequest,
    ) -> std::result::Result<EngineArtifact, EngineError> {
        Err(EngineError::Rejected("stub engine always fails".to_string()))
    }
}

/// Engine stub that records the request, then blocks until released.
///
/// Lets a test hold a run in flight while it mutates the graph or dispatches
/// a second run. Each `release` call lets one pending `process` finish.
#[allow(dead_code)]
pub struct GatedEngine {
    requests: Mutex<Vec<EngineRequest>>,
    gate: Notify,
    artifact: EngineArtifact,
}

#[allow(dead_code)]
impl GatedEngine {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            gate: Notify::new(),
            artifact: EngineArtifact::new(b"gated".to_vec(), "image/png"),
        })
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    pub fn requests(&self) -> Vec<EngineRequest> {
        self.requests.lock().clone()
    }

    pub fn artifact(&self) -> &EngineArtifact {
        &self.artifact
    }
}

#[async_trait]
impl ProcessingEngine for GatedEngine {
    async fn process(
        &self,
        request: EngineRequest,
    ) -> std::result::Result<EngineArtifact, EngineError> {
        self.requests.lock().push(request);
        self.gate.notified().await;
        Ok(self.artifact.clone())
    }
}
