//! Turns a resolved chain into the ordered, validated operation list that is
//! handed to the external processing engine.

use crate::error::CompileError;
use crate::graph::{ImageBlob, Node, NodeId, NodeKind, ParamMap};
use crate::registry::OperationKind;
use serde::Serialize;

/// The compiled unit of work for one stage: an operation name plus its flat
/// parameter map. Descriptors are values — once emitted they are never
/// mutated, and their serialized form is the engine wire contract
/// (`{"type": ..., "params": {...}}`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OperationDescriptor {
    #[serde(rename = "type")]
    pub name: String,
    #[serde(rename = "params")]
    pub parameters: ParamMap,
}

/// The output of [`compile`]: the source payload plus the operation list in
/// execution order. The ordering is the contract handed to the engine and is
/// preserved verbatim from the chain.
#[derive(Debug, Clone)]
pub struct CompiledPipeline {
    pub source: ImageBlob,
    pub operations: Vec<OperationDescriptor>,
}

/// Compiles a resolved chain for `sink` into a [`CompiledPipeline`].
///
/// The chain shape is re-checked here rather than trusted: the resolver and
/// the one-incoming-edge invariant should already rule out malformed chains,
/// but the compiler is the last gate before the engine request.
///
/// - The chain must start with a source node carrying loaded data; a source
///   with nothing uploaded fails with [`CompileError::MissingSourceData`],
///   the normal "not ready" state right after placement.
/// - Every interior element must be a stage, and the final element must be
///   the requested sink; anything else is [`CompileError::MalformedChain`].
/// - Each stage must name a registered operation
///   ([`CompileError::UnknownOperation`] otherwise). Missing parameter keys
///   are filled from the operation's registered defaults; present values are
///   passed through structurally unvalidated.
pub fn compile(chain: &[&Node], sink: NodeId) -> Result<CompiledPipeline, CompileError> {
    let (first, rest) = chain.split_first().ok_or_else(|| {
        CompileError::MalformedChain {
            message: "chain is empty".to_string(),
        }
    })?;
    let (last, interior) = rest.split_last().unwrap_or((first, &[]));

    if last.id != sink {
        return Err(CompileError::MalformedChain {
            message: format!(
                "chain ends at node '{}' instead of the requested sink '{}'",
                last.id, sink
            ),
        });
    }
    if last.kind() != NodeKind::Sink {
        return Err(CompileError::MalformedChain {
            message: format!("requested sink '{}' is a {} node", last.id, last.kind()),
        });
    }

    let source = match first.as_source() {
        Some(payload) => payload
            .data
            .clone()
            .ok_or(CompileError::MissingSourceData { id: first.id })?,
        None => {
            return Err(CompileError::MalformedChain {
                message: format!(
                    "chain starts at {} node '{}' instead of a source",
                    first.kind(),
                    first.id
                ),
            });
        }
    };

    let mut operations = Vec::with_capacity(interior.len());
    for node in interior {
        let stage = node.as_stage().ok_or_else(|| CompileError::MalformedChain {
            message: format!("{} node '{}' appears mid-chain", node.kind(), node.id),
        })?;
        operations.push(compile_stage(node.id, &stage.op_name, &stage.params)?);
    }

    Ok(CompiledPipeline { source, operations })
}

/// Compiles a single stage into its descriptor, filling registry defaults
/// for absent keys.
fn compile_stage(
    id: NodeId,
    op_name: &str,
    params: &ParamMap,
) -> Result<OperationDescriptor, CompileError> {
    let kind = OperationKind::from_name(op_name).ok_or_else(|| CompileError::UnknownOperation {
        id,
        name: op_name.to_string(),
    })?;

    let mut parameters = params.clone();
    for spec in kind.params() {
        parameters
            .entry(spec.key.to_string())
            .or_insert_with(|| spec.default.value());
    }

    Ok(OperationDescriptor {
        name: kind.name().to_string(),
        parameters,
    })
}
