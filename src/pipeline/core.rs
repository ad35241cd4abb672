use crate::error::{StageErrorKind, StageResult};
use crate::logger::LogLevel;
use serde::Serialize;

use super::context::RunContext;
use super::report::Report;

/// A single stage in a pipeline
///
/// Each stage performs one unit of work against an external system and returns
/// a report-ready summary. Stages never see each other's output; the only thing
/// they can read besides the run inputs is the report accumulated so far.
///
/// # Example
/// ```
/// use datapipe::error::{StageErrorKind, StageResult};
/// use datapipe::pipeline::{PipelineStage, Report, RunContext};
///
/// struct Greeting;
///
/// impl PipelineStage for Greeting {
///     fn execute(&self, context: &RunContext, _report: &Report) -> StageResult<String> {
///         Ok(format!("Hello from {}", context.url()))
///     }
///
///     fn name(&self) -> &str {
///         "GREETING"
///     }
///
///     fn error_kind(&self) -> StageErrorKind {
///         StageErrorKind::Network
///     }
/// }
/// ```
pub trait PipelineStage {
    /// Execute this stage and return the summary lines for the report
    fn execute(&self, context: &RunContext, report: &Report) -> StageResult<String>;

    /// Section tag used in the report and in log lines
    fn name(&self) -> &str;

    /// Kind recorded when this stage panics instead of returning an error
    fn error_kind(&self) -> StageErrorKind;

    /// Level at which a failure of this stage is logged
    fn failure_level(&self) -> LogLevel {
        LogLevel::Error
    }

    /// Check if this stage should be skipped for this run
    ///
    /// A skipped stage records nothing in the report.
    fn should_skip(&self, _context: &RunContext) -> bool {
        false
    }
}

/// Outcome of one stage, as recorded in the report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageOutcome {
    Success { summary: String },
    Failure { kind: StageErrorKind, message: String },
}

impl StageOutcome {
    pub fn success(summary: impl Into<String>) -> Self {
        StageOutcome::Success {
            summary: summary.into(),
        }
    }

    pub fn failure(kind: StageErrorKind, message: impl Into<String>) -> Self {
        StageOutcome::Failure {
            kind,
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StageOutcome::Success { .. })
    }

    /// Failure kind, if this outcome is a failure
    pub fn error_kind(&self) -> Option<StageErrorKind> {
        match self {
            StageOutcome::Success { .. } => None,
            StageOutcome::Failure { kind, .. } => Some(*kind),
        }
    }
}
