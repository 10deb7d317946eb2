//! Sequential pipeline runner.

use crate::capture::{CaptureSink, OutputCapture};
use crate::context::InputContext;
use crate::core::RunResult;
use crate::errors::{QoreError, StageExecutionError};
use crate::events::{EventSink, NoOpEventSink};
use crate::executor::StageExecutor;
use crate::extraction::{Extraction, ExtractionEngine};
use crate::registry::{StageDescriptor, StageRegistry};
use futures::FutureExt;
use serde_json::json;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Runs one stage or every registered stage and extracts the answer.
///
/// Both entry points always return a [`RunResult`]; unknown stages and
/// executor failures come back as error results, never as `Err` or a
/// panic.
pub struct PipelineRunner {
    registry: Arc<StageRegistry>,
    executor: Arc<dyn StageExecutor>,
    events: Arc<dyn EventSink>,
    engine: ExtractionEngine,
}

impl std::fmt::Debug for PipelineRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipelineRunner")
            .field("stages", &self.registry.identifiers())
            .finish_non_exhaustive()
    }
}

impl PipelineRunner {
    /// Creates a runner over `registry` using `executor`.
    #[must_use]
    pub fn new(registry: Arc<StageRegistry>, executor: Arc<dyn StageExecutor>) -> Self {
        Self {
            registry,
            executor,
            events: Arc::new(NoOpEventSink),
            engine: ExtractionEngine::new(),
        }
    }

    /// Sets the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = events;
        self
    }

    /// Returns the registry.
    #[must_use]
    pub fn registry(&self) -> &StageRegistry {
        &self.registry
    }

    /// Runs exactly one stage and extracts the answer from its result.
    pub async fn run_stage(&self, stage_id: &str, inputs: &InputContext) -> RunResult {
        let run_id = Uuid::new_v4();
        let start = Instant::now();

        match self.try_run_stage(run_id, stage_id, inputs).await {
            Ok(extraction) => self.succeed(run_id, "stage", start, extraction).await,
            Err(err) => self.fail(run_id, "stage", &err).await,
        }
    }

    /// Runs every registered stage in registration order.
    ///
    /// All stage output is aggregated into one per-run capture and
    /// extracted once at the end. The first failing stage fails the whole
    /// run; results of stages that already finished are discarded.
    pub async fn run_all(&self, inputs: &InputContext) -> RunResult {
        let run_id = Uuid::new_v4();
        let start = Instant::now();

        let capture = OutputCapture::begin();
        let outcome = self.try_run_all(run_id, inputs, &capture.sink()).await;
        let captured = capture.finish();

        match outcome {
            Ok(()) => {
                let extraction = self.engine.extract_detailed(&captured);
                self.succeed(run_id, "all", start, extraction).await
            }
            Err(err) => self.fail(run_id, "all", &err).await,
        }
    }

    async fn try_run_stage(
        &self,
        run_id: Uuid,
        stage_id: &str,
        inputs: &InputContext,
    ) -> Result<Extraction, QoreError> {
        let stage = self.registry.resolve(stage_id)?;

        self.events.try_emit(
            "pipeline.started",
            Some(json!({
                "run_id": run_id.to_string(),
                "mode": "stage",
                "stages": [stage.id()],
            })),
        );

        let raw = self
            .execute_stage(run_id, stage, inputs, &CaptureSink::discard())
            .await?;
        Ok(self.engine.extract_detailed(&raw))
    }

    async fn try_run_all(
        &self,
        run_id: Uuid,
        inputs: &InputContext,
        sink: &CaptureSink,
    ) -> Result<(), QoreError> {
        self.events.try_emit(
            "pipeline.started",
            Some(json!({
                "run_id": run_id.to_string(),
                "mode": "all",
                "stages": self.registry.identifiers(),
            })),
        );

        for stage in self.registry.stages() {
            let raw = self.execute_stage(run_id, stage, inputs, sink).await?;
            sink.write(&raw);
            if !raw.is_empty() && !raw.ends_with('\n') {
                sink.write("\n");
            }
        }

        Ok(())
    }

    async fn execute_stage(
        &self,
        run_id: Uuid,
        stage: &StageDescriptor,
        inputs: &InputContext,
        log: &CaptureSink,
    ) -> Result<String, StageExecutionError> {
        debug!(run_id = %run_id, stage = %stage.kind, agent = %stage.agent.key, "Executing stage");
        self.events.try_emit(
            "stage.started",
            Some(json!({"run_id": run_id.to_string(), "stage": stage.id()})),
        );

        let start = Instant::now();
        // `execute` is called inside the guarded future; an executor may panic
        // before it returns one.
        let result = AssertUnwindSafe(async { self.executor.execute(stage, inputs, log).await })
            .catch_unwind()
            .await
            .unwrap_or_else(|payload| {
                Err(StageExecutionError::new(
                    stage.id(),
                    format!("executor panicked: {}", panic_message(payload.as_ref())),
                ))
            });
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        match result {
            Ok(result) => {
                self.events.try_emit(
                    "stage.completed",
                    Some(json!({
                        "run_id": run_id.to_string(),
                        "stage": stage.id(),
                        "duration_ms": duration_ms,
                    })),
                );
                Ok(result.into_raw_output())
            }
            Err(err) => {
                self.events.try_emit(
                    "stage.failed",
                    Some(json!({
                        "run_id": run_id.to_string(),
                        "stage": stage.id(),
                        "error": err.to_string(),
                        "duration_ms": duration_ms,
                    })),
                );
                Err(err)
            }
        }
    }

    // Terminal events are awaited so a sink has them before the caller sees
    // the result. Per-stage events use `try_emit`.
    async fn succeed(
        &self,
        run_id: Uuid,
        mode: &str,
        start: Instant,
        extraction: Extraction,
    ) -> RunResult {
        let duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        info!(
            run_id = %run_id,
            mode,
            tier = %extraction.tier,
            duration_ms,
            "Pipeline run completed"
        );
        self.events
            .emit(
                "pipeline.completed",
                Some(json!({
                    "run_id": run_id.to_string(),
                    "mode": mode,
                    "duration_ms": duration_ms,
                    "tier": extraction.tier,
                })),
            )
            .await;
        RunResult::success(extraction.answer)
    }

    async fn fail(&self, run_id: Uuid, mode: &str, err: &QoreError) -> RunResult {
        let message = err.to_string();
        warn!(run_id = %run_id, mode, error = %message, "Pipeline run failed");
        self.events
            .emit(
                "pipeline.failed",
                Some(json!({
                    "run_id": run_id.to_string(),
                    "mode": mode,
                    "error": &message,
                })),
            )
            .await;
        RunResult::error(message)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}
