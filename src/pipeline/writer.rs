use crate::error::{StageError, StageResult};
use std::fs;
use std::path::{Path, PathBuf};

use super::report::Report;

/// File name of the plain-text report inside the output directory
pub const REPORT_FILE_NAME: &str = "report.txt";

/// Save the rendered report as UTF-8 to `<output_dir>/report.txt`
///
/// The directory is created if needed and an existing report is overwritten.
pub fn persist_report(report: &Report, output_dir: &Path) -> StageResult<PathBuf> {
    let path = output_dir.join(REPORT_FILE_NAME);

    fs::create_dir_all(output_dir)
        .and_then(|_| fs::write(&path, report.render()))
        .map_err(|e| StageError::File {
            message: format!("Failed to write report: {}", path.display()),
            source: Some(e),
        })?;

    Ok(path)
}
