use crate::engine::EngineArtifact;
use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Opaque node identifier. Allocated by the graph store from a monotonically
/// increasing counter, so an id is never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub(crate) u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// The role a node plays in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Source,
    Stage,
    Sink,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Source => write!(f, "source"),
            NodeKind::Stage => write!(f, "stage"),
            NodeKind::Sink => write!(f, "sink"),
        }
    }
}

/// A single scalar or enum parameter value, as exchanged with the engine.
///
/// Serialized untagged so the wire format stays a flat JSON map of plain
/// values (`{"kernelSize": 5, "method": "sobel"}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Integer(v) => write!(f, "{}", v),
            ParamValue::Float(v) => write!(f, "{}", v),
            ParamValue::Text(v) => write!(f, "{}", v),
        }
    }
}

/// Flat parameter map attached to a stage node.
pub type ParamMap = AHashMap<String, ParamValue>;

/// The original image data held by a source node: shared bytes plus the
/// display metadata the presentation layer needs. Cloning is cheap.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBlob {
    pub bytes: Arc<[u8]>,
    pub file_name: String,
    pub media_type: String,
}

impl ImageBlob {
    pub fn new(bytes: impl Into<Arc<[u8]>>, file_name: &str, media_type: &str) -> Self {
        Self {
            bytes: bytes.into(),
            file_name: file_name.to_string(),
            media_type: media_type.to_string(),
        }
    }
}

/// A computed result stored on a sink node, together with an optional release
/// hook that runs exactly once when the handle is retired.
///
/// The hook exists for transient display resources owned by the presentation
/// layer (the original editor had to revoke object URLs by hand). Dropping the
/// handle — because the dispatcher replaced it, or because the sink node was
/// deleted — guarantees the hook fires; a failed run never touches the handle,
/// so the old resource stays alive.
pub struct ResultHandle {
    artifact: EngineArtifact,
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl ResultHandle {
    pub fn new(artifact: EngineArtifact) -> Self {
        Self {
            artifact,
            release: None,
        }
    }

    /// Creates a handle whose `release` hook runs when the handle is retired.
    pub fn with_release(artifact: EngineArtifact, release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            artifact,
            release: Some(Box::new(release)),
        }
    }

    pub fn artifact(&self) -> &EngineArtifact {
        &self.artifact
    }

    /// Attaches (or replaces) the release hook after the fact, once the
    /// presentation layer has acquired its display resource.
    pub fn set_release(&mut self, release: impl FnOnce() + Send + 'static) {
        self.release = Some(Box::new(release));
    }
}

impl Drop for ResultHandle {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for ResultHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultHandle")
            .field("artifact", &self.artifact)
            .field("release", &self.release.is_some())
            .finish()
    }
}

/// Kind-dependent mutable node state.
#[derive(Debug)]
pub enum NodePayload {
    Source(SourcePayload),
    Stage(StagePayload),
    Sink(SinkPayload),
}

impl NodePayload {
    pub fn kind(&self) -> NodeKind {
        match self {
            NodePayload::Source(_) => NodeKind::Source,
            NodePayload::Stage(_) => NodeKind::Stage,
            NodePayload::Sink(_) => NodeKind::Sink,
        }
    }

    /// Convenience constructor for a source node with nothing uploaded yet.
    pub fn empty_source() -> Self {
        NodePayload::Source(SourcePayload { data: None })
    }

    /// Convenience constructor for a stage node with an empty parameter map.
    /// The compiler fills absent keys from the operation's registered defaults.
    pub fn stage(op_name: &str) -> Self {
        NodePayload::Stage(StagePayload {
            op_name: op_name.to_string(),
            params: ParamMap::new(),
        })
    }

    /// Convenience constructor for a sink node with no result yet.
    pub fn empty_sink() -> Self {
        NodePayload::Sink(SinkPayload { result: None })
    }
}

#[derive(Debug, Default)]
pub struct SourcePayload {
    /// `None` until the user uploads an image.
    pub data: Option<ImageBlob>,
}

#[derive(Debug)]
pub struct StagePayload {
    /// Wire name of the operation this stage applies (e.g. `"grayscale"`).
    pub op_name: String,
    /// Explicitly set parameters; keys absent here compile to their defaults.
    pub params: ParamMap,
}

#[derive(Debug, Default)]
pub struct SinkPayload {
    /// The most recent computed result, replaced wholesale on each run.
    pub result: Option<ResultHandle>,
}

/// Position and size as laid out by the presentation layer. The core stores
/// this untouched and never interprets it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeGeometry {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
}

impl NodeGeometry {
    pub fn at(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            width: None,
            height: None,
        }
    }
}

/// A vertex in the pipeline graph.
#[derive(Debug)]
pub struct Node {
    pub id: NodeId,
    pub payload: NodePayload,
    pub geometry: NodeGeometry,
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        self.payload.kind()
    }

    /// Returns the stage payload, if this is a stage node.
    pub fn as_stage(&self) -> Option<&StagePayload> {
        match &self.payload {
            NodePayload::Stage(stage) => Some(stage),
            _ => None,
        }
    }

    /// Returns the source payload, if this is a source node.
    pub fn as_source(&self) -> Option<&SourcePayload> {
        match &self.payload {
            NodePayload::Source(source) => Some(source),
            _ => None,
        }
    }

    /// Returns the sink payload, if this is a sink node.
    pub fn as_sink(&self) -> Option<&SinkPayload> {
        match &self.payload {
            NodePayload::Sink(sink) => Some(sink),
            _ => None,
        }
    }
}
