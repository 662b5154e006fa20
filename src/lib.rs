//! # Rensa - Pipeline Graph Model and Resolution Engine
//!
//! **Rensa** is the core of a node-based image-processing editor: a typed
//! graph of source, stage, and sink nodes, a resolution engine that turns the
//! subgraph behind a chosen sink into a strictly ordered operation list, and
//! the dispatch contract that sends that list to an external processing
//! engine and stores the result back on the sink. Rensa never touches pixels
//! itself — the engine does the image work; rensa owns the graph and the
//! ordering, validation, and reconciliation around each run.
//!
//! ## Core Workflow
//!
//! 1. **Build the graph**: place nodes and wire them, either through the
//!    [`EditorSession`](session::EditorSession) command surface or by
//!    importing an editor's JSON export via
//!    [`IntoGraph`](document::IntoGraph).
//! 2. **Resolve**: [`resolve_path`](graph::resolve_path) walks backward from
//!    a sink along the unique incoming edges to the originating source,
//!    rejecting cycles and dangling chains.
//! 3. **Compile**: [`compile`](compiler::compile) validates the chain shape
//!    and emits one [`OperationDescriptor`](compiler::OperationDescriptor)
//!    per stage, filling parameter defaults from the
//!    [operation registry](registry::OperationKind).
//! 4. **Dispatch**: the
//!    [`ExecutionDispatcher`](dispatcher::ExecutionDispatcher) snapshots the
//!    compiled pipeline, sends one request to a
//!    [`ProcessingEngine`](engine::ProcessingEngine), and commits the
//!    artifact to the sink — releasing the previous result handle — or
//!    surfaces the failure leaving the prior result intact.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rensa::prelude::*;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // The engine is an external service; HttpEngine speaks its
//!     // multipart `/process` contract.
//!     let engine = Arc::new(HttpEngine::new("http://localhost:8000"));
//!     let session = EditorSession::new(engine);
//!
//!     // source -> grayscale -> sink
//!     let source = session.place_source(NodeGeometry::at(0.0, 0.0));
//!     let stage = session.place_stage(OperationKind::Grayscale, NodeGeometry::at(200.0, 0.0));
//!     let sink = session.place_sink(NodeGeometry::at(400.0, 0.0));
//!     session.connect(source, stage)?;
//!     session.connect(stage, sink)?;
//!
//!     // A source without data compiles to MissingSourceData ("not ready"),
//!     // so upload first.
//!     let bytes = std::fs::read("photo.png")?;
//!     session.upload_source(source, ImageBlob::new(bytes, "photo.png", "image/png"))?;
//!
//!     session.run(sink).await?;
//!     if let Some(artifact) = session.result(sink) {
//!         std::fs::write("processed.png", &artifact.bytes)?;
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Invariants
//!
//! - Every node has at most one incoming connection; fan-out is free, fan-in
//!   is rejected at [`add_edge`](graph::PipelineGraph::add_edge).
//! - Removing a node cascades removal of its edges; edges never dangle.
//! - A dispatched run works on a snapshot: graph edits made while the engine
//!   round trip is in flight affect the next run, never the current one.
//! - At most one run per sink is in flight; overlapping runs are rejected.

pub mod compiler;
pub mod dispatcher;
pub mod document;
pub mod engine;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod registry;
pub mod session;
