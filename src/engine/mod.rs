//! The boundary to the external processing engine.
//!
//! The core never performs pixel work itself: it produces one
//! [`EngineRequest`] per run and treats the returned [`EngineArtifact`] as
//! opaque data to store, not interpret. [`ProcessingEngine`] is the seam —
//! the shipped implementation is [`HttpEngine`], and tests substitute their
//! own.

pub mod http;

pub use http::HttpEngine;

use crate::compiler::OperationDescriptor;
use crate::error::EngineError;
use crate::graph::ImageBlob;
use async_trait::async_trait;
use std::sync::Arc;

/// One complete run request: the original source data plus the ordered
/// operation list. The order must be executed verbatim.
#[derive(Debug, Clone)]
pub struct EngineRequest {
    pub source: ImageBlob,
    pub operations: Vec<OperationDescriptor>,
}

impl EngineRequest {
    /// The operation list as the JSON array the engine contract expects.
    pub fn operations_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.operations)
    }
}

/// The opaque result of a run: processed bytes plus their media type.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineArtifact {
    pub bytes: Arc<[u8]>,
    pub media_type: String,
}

impl EngineArtifact {
    pub fn new(bytes: impl Into<Arc<[u8]>>, media_type: &str) -> Self {
        Self {
            bytes: bytes.into(),
            media_type: media_type.to_string(),
        }
    }
}

/// An external service that executes a compiled pipeline.
#[async_trait]
pub trait ProcessingEngine: Send + Sync {
    async fn process(&self, request: EngineRequest) -> Result<EngineArtifact, EngineError>;
}
