use crate::archive;
use crate::error::{StageError, StageErrorKind, StageResult};
use crate::logger::{LogLevel, LOGGER};
use crate::pipeline::{PipelineStage, Report, RunContext};
use std::path::Path;

/// Name of the single entry written into the report archive
pub const REPORT_ENTRY_NAME: &str = "report.txt";

/// Maximum number of archive entries quoted in the report
const MAX_LISTED_ENTRIES: usize = 20;

/// Stage that zips the report accumulated so far
///
/// # Context Requirements
/// - `output_archive` - Destination zip; its directory is created if needed
///
/// # Report Output
/// - `ZIP created. Entries: [report.txt]`
/// - `Bytes written: N`
pub struct ArchiveWriteStage;

impl ArchiveWriteStage {
    /// Create a new archive write stage
    pub fn new() -> Self {
        Self
    }
}

impl Default for ArchiveWriteStage {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStage for ArchiveWriteStage {
    fn execute(&self, context: &RunContext, report: &Report) -> StageResult<String> {
        let zip_path = context.output_archive();
        let content = report.render();

        let written = archive::write_single_entry(zip_path, REPORT_ENTRY_NAME, &content)
            .map_err(|e| archive_error("Failed to write archive", zip_path, e))?;
        let entries = archive::list_entries(zip_path)
            .map_err(|e| archive_error("Failed to list archive", zip_path, e))?;

        LOGGER.log(
            LogLevel::Info,
            &format!(
                "ZIP created at {} (run: {})",
                zip_path.display(),
                context.run_id()
            ),
            "pipeline::archive",
        );

        Ok(format!(
            "ZIP created. Entries: [{}]\nBytes written: {}",
            entries.join(", "),
            written
        ))
    }

    fn name(&self) -> &str {
        "ZIP"
    }

    fn error_kind(&self) -> StageErrorKind {
        StageErrorKind::Archive
    }
}

/// Stage that lists the entries of an existing JAR or zip
///
/// This stage is optional and will be skipped if no JAR path was given.
///
/// # Report Output
/// - `JAR entries count: N`
/// - `First 20 entries:` followed by one ` - name` line per entry
pub struct ArchiveReadStage;

impl ArchiveReadStage {
    /// Create a new archive read stage
    pub fn new() -> Self {
        Self
    }
}

impl Default for ArchiveReadStage {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStage for ArchiveReadStage {
    fn execute(&self, context: &RunContext, _report: &Report) -> StageResult<String> {
        let jar_path = context
            .jar_path()
            .ok_or_else(|| StageError::archive("No JAR path given"))?;

        let entries = archive::list_entries(jar_path)
            .map_err(|e| archive_error("Failed to inspect JAR", jar_path, e))?;

        Ok(format_listing(&entries))
    }

    fn name(&self) -> &str {
        "JAR"
    }

    fn error_kind(&self) -> StageErrorKind {
        StageErrorKind::Archive
    }

    fn failure_level(&self) -> LogLevel {
        LogLevel::Warn
    }

    fn should_skip(&self, context: &RunContext) -> bool {
        context.jar_path().is_none()
    }
}

/// Full count, then at most the first 20 names
fn format_listing(entries: &[String]) -> String {
    let mut text = format!(
        "JAR entries count: {}\nFirst {} entries:",
        entries.len(),
        MAX_LISTED_ENTRIES
    );
    for name in entries.iter().take(MAX_LISTED_ENTRIES) {
        text.push_str("\n - ");
        text.push_str(name);
    }
    text
}

fn archive_error(what: &str, path: &Path, err: zip::result::ZipError) -> StageError {
    StageError::Archive {
        message: format!("{}: {}", what, path.display()),
        source: Some(err),
    }
}
