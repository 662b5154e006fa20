//! Prelude module for convenient imports
//!
//! Re-exports the most commonly used types and traits from the rensa crate.
//! Import this module to get access to the core functionality without having
//! to import each type individually.
//!
//! # Example
//!
//! ```rust,no_run
//! use rensa::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn run_example() -> Result<()> {
//! // Build a session against a processing service
//! let engine = Arc::new(HttpEngine::new("http://localhost:8000"));
//! let session = EditorSession::new(engine);
//!
//! // Place and wire a minimal pipeline
//! let source = session.place_source(NodeGeometry::at(0.0, 0.0));
//! let stage = session.place_stage(OperationKind::Grayscale, NodeGeometry::at(200.0, 0.0));
//! let sink = session.place_sink(NodeGeometry::at(400.0, 0.0));
//! session.connect(source, stage)?;
//! session.connect(stage, sink)?;
//!
//! // Upload data and run
//! let bytes = std::fs::read("photo.png")?;
//! session.upload_source(source, ImageBlob::new(bytes, "photo.png", "image/png"))?;
//! session.run(sink).await?;
//! # Ok(())
//! # }
//! ```

// Graph model
pub use crate::graph::{
    Edge, ImageBlob, Node, NodeGeometry, NodeId, NodeKind, NodePayload, ParamMap, ParamValue,
    PayloadPatch, PipelineGraph, ResultHandle, SinkPayload, SourcePayload, StagePayload,
    resolve_path,
};

// Operation registry
pub use crate::registry::{OperationKind, ParamDefault, ParamRange, ParamSpec};

// Compilation
pub use crate::compiler::{CompiledPipeline, OperationDescriptor, compile};

// Engine boundary
pub use crate::engine::{EngineArtifact, EngineRequest, HttpEngine, ProcessingEngine};

// Dispatch and session surface
pub use crate::dispatcher::{ExecutionDispatcher, SharedGraph};
pub use crate::session::EditorSession;

// Document import
pub use crate::document::{GraphImport, IntoGraph, UiDocument};

// Error types
pub use crate::error::{
    CompileError, DispatchError, DocumentError, EngineError, GraphError, ResolveError,
};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
