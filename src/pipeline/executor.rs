use super::context::RunContext;
use super::core::{PipelineStage, StageOutcome};
use super::report::Report;
use super::stages::{
    ArchiveReadStage, ArchiveWriteStage, DatabaseStage, FileStage, NetworkStage,
    SerializationStage,
};
use super::writer;
use crate::logger::{LogLevel, LOGGER};
use serde_json::json;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

/// Pipeline executor that runs stages sequentially with total stage isolation
///
/// A failing stage is recorded in the report and the next stage runs anyway.
/// Nothing a stage does can abort the run.
///
/// # Example
/// ```no_run
/// use datapipe::pipeline::{Pipeline, RunContext};
///
/// let pipeline = Pipeline::standard();
/// let context = RunContext::default();
/// let report = pipeline.run_and_persist(&context);
/// println!("{}", report.render());
/// ```
pub struct Pipeline {
    name: String,
    stages: Vec<Box<dyn PipelineStage>>,
}

impl Pipeline {
    /// Create a new pipeline builder
    pub fn builder(name: impl Into<String>) -> PipelineBuilder {
        PipelineBuilder::new(name)
    }

    /// The fixed stage order: file, network, database, serialization, archive
    /// write, and archive read (only when a JAR path was given)
    pub fn standard() -> Self {
        Pipeline::builder("data-pipeline")
            .add_stage(FileStage::new())
            .add_stage(NetworkStage::new())
            .add_stage(DatabaseStage::new())
            .add_stage(SerializationStage::new())
            .add_stage(ArchiveWriteStage::new())
            .add_stage(ArchiveReadStage::new())
            .build()
    }

    /// Get the pipeline name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of stages
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// Run every stage in order and return the accumulated report
    pub fn run(&self, context: &RunContext) -> Report {
        LOGGER.log(
            LogLevel::Info,
            &format!(
                "Starting pipeline '{}' with {} stages (run: {})",
                self.name,
                self.stages.len(),
                context.run_id()
            ),
            "pipeline",
        );

        let pipeline_start = Instant::now();
        let mut report = Report::new(context.run_id());

        for (index, stage) in self.stages.iter().enumerate() {
            let stage_name = stage.name();

            if stage.should_skip(context) {
                LOGGER.log(
                    LogLevel::Info,
                    &format!(
                        "Skipping stage {}/{}: {} (run: {})",
                        index + 1,
                        self.stages.len(),
                        stage_name,
                        context.run_id()
                    ),
                    "pipeline",
                );
                report.mark_skipped(stage_name);
                continue;
            }

            LOGGER.log(
                LogLevel::Info,
                &format!(
                    "Executing stage {}/{}: {} (run: {})",
                    index + 1,
                    self.stages.len(),
                    stage_name,
                    context.run_id()
                ),
                "pipeline",
            );

            let stage_start = Instant::now();
            let outcome = execute_isolated(stage.as_ref(), context, &report);
            let duration = stage_start.elapsed();

            report.push(stage_name, outcome, duration);
        }

        LOGGER.log(
            LogLevel::Info,
            &format!(
                "Pipeline '{}' finished in {:.2}s with {} failed stage(s) (run: {})",
                self.name,
                pipeline_start.elapsed().as_secs_f64(),
                report.failure_count(),
                context.run_id()
            ),
            "pipeline",
        );

        report
    }

    /// Run every stage, then save the report to `<output_dir>/report.txt`
    ///
    /// A failure to save is logged as a warning and leaves the returned report
    /// untouched.
    pub fn run_and_persist(&self, context: &RunContext) -> Report {
        let report = self.run(context);

        match writer::persist_report(&report, context.output_dir()) {
            Ok(path) => LOGGER.log(
                LogLevel::Info,
                &format!("Plain report saved: {}", path.display()),
                "pipeline::writer",
            ),
            Err(e) => LOGGER.log(
                LogLevel::Warn,
                &format!("Could not save plain report: {}", e.detail()),
                "pipeline::writer",
            ),
        }

        report
    }
}

/// Invoke one stage inside the failure boundary
///
/// Errors are classified by their own kind; a panic is classified by the
/// stage's declared kind. Either way the failure is logged and turned into an
/// outcome.
fn execute_isolated(stage: &dyn PipelineStage, context: &RunContext, report: &Report) -> StageOutcome {
    let stage_name = stage.name();
    let result = panic::catch_unwind(AssertUnwindSafe(|| stage.execute(context, report)));

    let (kind, message, detail) = match result {
        Ok(Ok(summary)) => {
            LOGGER.log(
                LogLevel::Info,
                &format!("Stage '{}' completed (run: {})", stage_name, context.run_id()),
                "pipeline",
            );
            return StageOutcome::success(summary);
        }
        Ok(Err(e)) => (e.kind(), e.to_string(), e.detail()),
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            let detail = format!("stage panicked: {}", message);
            (stage.error_kind(), message, detail)
        }
    };

    let mut log_context = HashMap::new();
    log_context.insert("stage".to_string(), json!(stage_name));
    log_context.insert("kind".to_string(), json!(kind));
    log_context.insert("run_id".to_string(), json!(context.run_id()));

    LOGGER.log_with_context(
        stage.failure_level(),
        &format!("Stage '{}' failed: {}", stage_name, detail),
        "pipeline",
        log_context,
    );

    StageOutcome::failure(kind, message)
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Builder for constructing pipelines
pub struct PipelineBuilder {
    name: String,
    stages: Vec<Box<dyn PipelineStage>>,
}

impl PipelineBuilder {
    /// Create a new pipeline builder
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
        }
    }

    /// Add a stage to the pipeline
    pub fn add_stage<S: PipelineStage + 'static>(mut self, stage: S) -> Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Add a boxed stage to the pipeline
    pub fn add_boxed_stage(mut self, stage: Box<dyn PipelineStage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Build the pipeline
    pub fn build(self) -> Pipeline {
        Pipeline {
            name: self.name,
            stages: self.stages,
        }
    }
}
