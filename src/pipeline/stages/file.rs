use crate::error::{StageError, StageErrorKind, StageResult};
use crate::logger::{LogLevel, LOGGER};
use crate::pipeline::{PipelineStage, Report, RunContext};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Stage that reads the input file as UTF-8 lines
///
/// # Context Requirements
/// - `input_file` - Path to a text file
///
/// # Report Output
/// - `Read lines: N`
/// - `Sample: <first line>` or `(empty)`
pub struct FileStage;

impl FileStage {
    /// Create a new file stage
    pub fn new() -> Self {
        Self
    }
}

impl Default for FileStage {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStage for FileStage {
    fn execute(&self, context: &RunContext, _report: &Report) -> StageResult<String> {
        let lines = read_all_lines(context.input_file())?;

        LOGGER.log(
            LogLevel::Info,
            &format!(
                "Read {} lines from file (run: {})",
                lines.len(),
                context.run_id()
            ),
            "pipeline::file",
        );

        Ok(format!(
            "Read lines: {}\nSample: {}",
            lines.len(),
            lines.first().map(String::as_str).unwrap_or("(empty)")
        ))
    }

    fn name(&self) -> &str {
        "FILE"
    }

    fn error_kind(&self) -> StageErrorKind {
        StageErrorKind::File
    }
}

/// Read every line of a UTF-8 text file
///
/// Lines end at `\n`, `\r\n` or a lone `\r`. Fails with a file error naming
/// the absolute path when the file is missing or cannot be read.
pub fn read_all_lines(path: &Path) -> StageResult<Vec<String>> {
    let display_path = absolute_path(path);

    if !path.exists() {
        return Err(StageError::file(format!(
            "Input file not found: {}",
            display_path.display()
        )));
    }

    let read_error = |e: std::io::Error| StageError::File {
        message: format!("Failed to read file: {}", display_path.display()),
        source: Some(e),
    };

    let mut reader = BufReader::new(File::open(path).map_err(read_error)?);
    let mut text = String::new();
    reader.read_to_string(&mut text).map_err(read_error)?;

    Ok(split_lines(&text))
}

/// Split text into lines without their terminators
fn split_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        match rest.find(['\n', '\r']) {
            Some(idx) => {
                lines.push(rest[..idx].to_string());
                let terminator = if rest[idx..].starts_with("\r\n") { 2 } else { 1 };
                rest = &rest[idx + terminator..];
            }
            None => {
                lines.push(rest.to_string());
                break;
            }
        }
    }

    lines
}

fn absolute_path(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
