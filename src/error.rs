use crate::graph::{NodeId, NodeKind};
use thiserror::Error;

/// Errors raised by the graph store when a mutation request is structurally
/// invalid. These are caller mistakes and are never retryable.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GraphError {
    #[error("connection references node '{id}', which does not exist")]
    InvalidReference { id: NodeId },

    #[error(
        "node '{target}' already has an incoming connection from '{existing_source}'; remove it before rewiring"
    )]
    MultipleInputs {
        target: NodeId,
        existing_source: NodeId,
    },

    #[error("unknown node '{id}'")]
    UnknownNode { id: NodeId },

    #[error("payload patch does not match the {kind} payload of node '{id}'")]
    PayloadMismatch { id: NodeId, kind: NodeKind },
}

/// Errors raised while resolving a sink backward to its originating source.
/// They indicate an invalid graph shape and surface as "pipeline not ready".
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("sink node '{id}' does not exist")]
    UnknownSink { id: NodeId },

    #[error("node '{id}' was revisited during resolution: the graph contains a cycle")]
    CycleDetected { id: NodeId },

    #[error("the chain ends at {kind} node '{id}' instead of a source")]
    NoSourceFound { id: NodeId, kind: NodeKind },
}

/// Errors raised while compiling a resolved chain into an operation list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The expected state right after a source node is placed but before any
    /// image has been uploaded. Callers treat this as "not ready", not as a
    /// failure dialog.
    #[error("source node '{id}' has no image data loaded yet")]
    MissingSourceData { id: NodeId },

    #[error("malformed chain: {message}")]
    MalformedChain { message: String },

    #[error("stage node '{id}' names an unregistered operation '{name}'")]
    UnknownOperation { id: NodeId, name: String },
}

/// Failures reported by the external processing engine or its transport.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("engine transport failure: {0}")]
    Transport(String),

    #[error("engine rejected the request: {0}")]
    Rejected(String),
}

/// Errors surfaced by a dispatched run. Resolver and compiler failures are
/// forwarded unchanged; the dispatcher adds no semantics of its own there.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DispatchError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Compile(#[from] CompileError),

    #[error("processing engine failed: {0}")]
    Engine(#[from] EngineError),

    /// A run for this sink was dispatched and has not completed. Overlapping
    /// runs on one sink are rejected rather than queued or left racing.
    #[error("a run is already in flight for sink '{sink}'")]
    RunInFlight { sink: NodeId },

    /// The sink vanished while the run was in flight, so there is nowhere to
    /// store the result.
    #[error("could not store the engine result: {0}")]
    Commit(#[from] GraphError),
}

/// Errors raised while converting an editor document into a [`PipelineGraph`].
///
/// [`PipelineGraph`]: crate::graph::PipelineGraph
#[derive(Debug)]
pub enum DocumentError {
    Json(serde_json::Error),

    DuplicateNodeId(String),

    UnknownNodeType { id: String, type_name: String },

    UnknownEndpoint {
        source: String,
        target: String,
        missing: String,
    },

    InvalidConnection {
        source: String,
        target: String,
        message: String,
    },
}

// `thiserror`'s derive treats the `source` fields below as error causes, which
// `String` cannot satisfy, so Display/Error/From are written out by hand.
impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::Json(err) => {
                write!(f, "failed to parse document JSON: {err}")
            }
            DocumentError::DuplicateNodeId(id) => {
                write!(f, "document contains duplicate node id '{id}'")
            }
            DocumentError::UnknownNodeType { id, type_name } => {
                write!(f, "node '{id}' has an unsupported type '{type_name}'")
            }
            DocumentError::UnknownEndpoint {
                source,
                target,
                missing,
            } => {
                write!(
                    f,
                    "edge '{source}' -> '{target}' references missing node '{missing}'"
                )
            }
            DocumentError::InvalidConnection {
                source,
                target,
                message,
            } => {
                write!(f, "edge '{source}' -> '{target}' is invalid: {message}")
            }
        }
    }
}

impl std::error::Error for DocumentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DocumentError::Json(err) => Some(err),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(err: serde_json::Error) -> Self {
        DocumentError::Json(err)
    }
}
