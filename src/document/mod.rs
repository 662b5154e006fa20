//! Import of editor documents.
//!
//! The canvas front end exports its graph as JSON: a node list (with a
//! `type` string such as `input`, `function-blur`, or `output`, a canvas
//! position, and per-node `data`) and an edge list. [`UiDocument`] mirrors
//! that shape, and [`IntoGraph`] is the conversion seam — implement it for
//! your own document format to feed any editor into a [`PipelineGraph`].

use crate::error::DocumentError;
use crate::graph::{NodeGeometry, NodeId, NodePayload, ParamMap, PipelineGraph, StagePayload};
use crate::registry::OperationKind;
use ahash::AHashMap;
use itertools::Itertools;
use serde::Deserialize;

const SOURCE_TYPE: &str = "input";
const SINK_TYPE: &str = "output";
const STAGE_TYPE_PREFIX: &str = "function-";

/// Canvas position of a document node.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct UiPosition {
    pub x: f64,
    pub y: f64,
}

/// Per-node data bag of the editor export.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UiNodeData {
    #[serde(default, alias = "selectedFunction")]
    pub selected_function: Option<String>,
    #[serde(default)]
    pub params: ParamMap,
}

/// One node of the editor export.
#[derive(Debug, Clone, Deserialize)]
pub struct UiNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub position: UiPosition,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub data: UiNodeData,
}

/// One connection of the editor export.
#[derive(Debug, Clone, Deserialize)]
pub struct UiEdge {
    pub source: String,
    pub target: String,
}

/// A complete editor export.
#[derive(Debug, Clone, Deserialize)]
pub struct UiDocument {
    pub nodes: Vec<UiNode>,
    pub edges: Vec<UiEdge>,
}

impl UiDocument {
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// A converted document: the graph plus the mapping from the document's
/// string ids to the allocated [`NodeId`]s.
#[derive(Debug)]
pub struct GraphImport {
    pub graph: PipelineGraph,
    pub ids: AHashMap<String, NodeId>,
}

impl GraphImport {
    /// Looks up the allocated id for a document node id.
    pub fn node_id(&self, document_id: &str) -> Option<NodeId> {
        self.ids.get(document_id).copied()
    }
}

/// Conversion from a custom document format into a [`PipelineGraph`].
///
/// This is the extension point for front ends with their own export shape:
/// parse your format with your own structs, then implement `IntoGraph` to
/// translate it.
pub trait IntoGraph {
    fn into_graph(self) -> Result<GraphImport, DocumentError>;
}

impl IntoGraph for UiDocument {
    fn into_graph(self) -> Result<GraphImport, DocumentError> {
        if let Some(dup) = self.nodes.iter().map(|n| n.id.as_str()).duplicates().next() {
            return Err(DocumentError::DuplicateNodeId(dup.to_string()));
        }

        let mut graph = PipelineGraph::new();
        let mut ids: AHashMap<String, NodeId> = AHashMap::new();

        for node in &self.nodes {
            let payload = payload_for(node)?;
            let geometry = NodeGeometry {
                x: node.position.x,
                y: node.position.y,
                width: node.width,
                height: node.height,
            };
            let id = graph.add_node(payload, geometry);
            ids.insert(node.id.clone(), id);
        }

        for edge in &self.edges {
            let source = *ids
                .get(&edge.source)
                .ok_or_else(|| DocumentError::UnknownEndpoint {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    missing: edge.source.clone(),
                })?;
            let target = *ids
                .get(&edge.target)
                .ok_or_else(|| DocumentError::UnknownEndpoint {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    missing: edge.target.clone(),
                })?;
            graph
                .add_edge(source, target)
                .map_err(|e| DocumentError::InvalidConnection {
                    source: edge.source.clone(),
                    target: edge.target.clone(),
                    message: e.to_string(),
                })?;
        }

        Ok(GraphImport { graph, ids })
    }
}

/// Maps a document node type onto a typed payload.
fn payload_for(node: &UiNode) -> Result<NodePayload, DocumentError> {
    match node.node_type.as_str() {
        SOURCE_TYPE => Ok(NodePayload::empty_source()),
        SINK_TYPE => Ok(NodePayload::empty_sink()),
        ty if ty.starts_with(STAGE_TYPE_PREFIX) => {
            // The export carries the operation both in the type string and in
            // `data.selectedFunction`; the data field wins when present.
            let op_name = node
                .data
                .selected_function
                .as_deref()
                .unwrap_or(&ty[STAGE_TYPE_PREFIX.len()..]);
            if OperationKind::from_name(op_name).is_none() {
                return Err(DocumentError::UnknownNodeType {
                    id: node.id.clone(),
                    type_name: node.node_type.clone(),
                });
            }
            Ok(NodePayload::Stage(StagePayload {
                op_name: op_name.to_string(),
                params: node.data.params.clone(),
            }))
        }
        _ => Err(DocumentError::UnknownNodeType {
            id: node.id.clone(),
            type_name: node.node_type.clone(),
        }),
    }
}
