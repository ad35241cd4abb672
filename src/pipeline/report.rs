use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::time::Duration;

use super::core::StageOutcome;

/// One stage's block in the report
#[derive(Debug, Clone, Serialize)]
pub struct ReportSection {
    /// Stage tag, e.g. `FILE`
    pub stage: String,

    pub outcome: StageOutcome,

    /// Wall-clock time spent inside the stage
    #[serde(serialize_with = "serialize_millis")]
    pub duration: Duration,
}

impl ReportSection {
    /// Render this section as a plain-text block
    pub fn render(&self) -> String {
        let body = match &self.outcome {
            StageOutcome::Success { summary } => summary.clone(),
            StageOutcome::Failure { kind, message } => format!("{}: {}", kind.label(), message),
        };
        format!("[{}]\n{}\n\n", self.stage, body)
    }
}

fn serialize_millis<S: serde::Serializer>(duration: &Duration, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_u64(duration.as_millis() as u64)
}

/// Append-only record of a pipeline run
///
/// Sections appear in execution order and are never reordered, replaced, or
/// removed. Stages that were skipped leave no section behind; their names are
/// kept separately.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    run_id: String,
    started_at: DateTime<Utc>,
    sections: Vec<ReportSection>,
    skipped: Vec<String>,
}

impl Report {
    /// Create an empty report stamped with the current time
    pub fn new(run_id: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            started_at: Utc::now(),
            sections: Vec::new(),
            skipped: Vec::new(),
        }
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Append a stage block
    pub fn push(&mut self, stage: impl Into<String>, outcome: StageOutcome, duration: Duration) {
        self.sections.push(ReportSection {
            stage: stage.into(),
            outcome,
            duration,
        });
    }

    /// Note a stage that did not run
    pub fn mark_skipped(&mut self, stage: impl Into<String>) {
        self.skipped.push(stage.into());
    }

    pub fn sections(&self) -> &[ReportSection] {
        &self.sections
    }

    /// Find the section recorded for a stage
    pub fn section(&self, stage: &str) -> Option<&ReportSection> {
        self.sections.iter().find(|s| s.stage == stage)
    }

    pub fn skipped_stages(&self) -> &[String] {
        &self.skipped
    }

    /// Sections whose stage failed
    pub fn failures(&self) -> impl Iterator<Item = &ReportSection> {
        self.sections.iter().filter(|s| !s.outcome.is_success())
    }

    pub fn failure_count(&self) -> usize {
        self.failures().count()
    }

    /// Render the full plain-text report
    pub fn render(&self) -> String {
        let mut text = format!(
            "REPORT @ {}\n\n",
            self.started_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        );
        for section in &self.sections {
            text.push_str(&section.render());
        }
        text
    }
}
