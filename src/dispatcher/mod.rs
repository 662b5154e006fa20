//! Dispatches compiled pipelines to the processing engine and reconciles
//! results back into the graph.
//!
//! A run snapshots the compiled operation list under the graph lock, then
//! releases the lock for the entire engine round trip — the only suspension
//! point in the core. The graph stays fully mutable while a run is in
//! flight; edits affect the *next* run, never the dispatched snapshot.
//!
//! Overlap policy: at most one in-flight run per sink. A second `run` on the
//! same sink is rejected with [`DispatchError::RunInFlight`] instead of
//! queueing or racing. The in-flight mark is held by an RAII guard, so it
//! clears on success, failure, and early return alike.

use crate::compiler::compile;
use crate::engine::{EngineRequest, ProcessingEngine};
use crate::error::DispatchError;
use crate::graph::{NodeId, PayloadPatch, PipelineGraph, ResultHandle, resolve_path};
use ahash::AHashSet;
use parking_lot::Mutex;
use std::sync::Arc;

/// The session-shared graph. The lock is only held for synchronous mutation
/// or the dispatch snapshot/commit, never across an `.await`.
pub type SharedGraph = Arc<Mutex<PipelineGraph>>;

/// Executes runs against one graph and one engine.
pub struct ExecutionDispatcher {
    graph: SharedGraph,
    engine: Arc<dyn ProcessingEngine>,
    in_flight: Arc<Mutex<AHashSet<NodeId>>>,
}

impl ExecutionDispatcher {
    pub fn new(graph: SharedGraph, engine: Arc<dyn ProcessingEngine>) -> Self {
        Self {
            graph,
            engine,
            in_flight: Arc::new(Mutex::new(AHashSet::new())),
        }
    }

    /// Resolves, compiles, and executes the pipeline rooted at `sink`.
    ///
    /// Resolver and compiler failures propagate unchanged. On engine success
    /// the sink's previous result handle is retired (its release hook runs)
    /// and the new artifact is stored; on engine failure the prior result is
    /// left untouched and [`DispatchError::Engine`] is surfaced. No partial
    /// result is ever written.
    pub async fn run(&self, sink: NodeId) -> Result<(), DispatchError> {
        let _guard = InFlightGuard::acquire(&self.in_flight, sink)?;

        let request = {
            let graph = self.graph.lock();
            let chain = resolve_path(&graph, sink)?;
            let pipeline = compile(&chain, sink)?;
            EngineRequest {
                source: pipeline.source,
                operations: pipeline.operations,
            }
        };

        tracing::info!(
            %sink,
            operations = request.operations.len(),
            "dispatching pipeline"
        );

        let artifact = match self.engine.process(request).await {
            Ok(artifact) => artifact,
            Err(err) => {
                tracing::warn!(%sink, error = %err, "engine run failed; prior result kept");
                return Err(DispatchError::Engine(err));
            }
        };

        // Commit. Replacing the payload drops the previous ResultHandle,
        // which runs its release hook. The sink may have been deleted while
        // the run was in flight.
        let mut graph = self.graph.lock();
        graph.update_payload(sink, PayloadPatch::SinkResult(Some(ResultHandle::new(artifact))))?;
        tracing::info!(%sink, "stored engine result");
        Ok(())
    }

    /// Whether a run is currently in flight for `sink`.
    pub fn is_in_flight(&self, sink: NodeId) -> bool {
        self.in_flight.lock().contains(&sink)
    }
}

/// Marks a sink as having a run in flight; clears the mark on drop.
struct InFlightGuard {
    set: Arc<Mutex<AHashSet<NodeId>>>,
    sink: NodeId,
}

impl InFlightGuard {
    fn acquire(set: &Arc<Mutex<AHashSet<NodeId>>>, sink: NodeId) -> Result<Self, DispatchError> {
        if !set.lock().insert(sink) {
            return Err(DispatchError::RunInFlight { sink });
        }
        Ok(Self {
            set: Arc::clone(set),
            sink,
        })
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.set.lock().remove(&self.sink);
    }
}
