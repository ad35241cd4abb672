use std::path::{Path, PathBuf};
use std::time::Duration;
use uuid::Uuid;

/// Default input file read by the file stage
pub const DEFAULT_INPUT_FILE: &str = "input.txt";

/// Default URL fetched by the network stage
pub const DEFAULT_URL: &str = "https://example.com";

/// Default archive written by the zip stage
pub const DEFAULT_OUTPUT_ARCHIVE: &str = "out/report.zip";

/// Directory that receives the plain report and serialized records
pub const DEFAULT_OUTPUT_DIR: &str = "out";

/// Connect and read timeout for the network stage
pub const NETWORK_TIMEOUT: Duration = Duration::from_millis(20_000);

/// Inputs for a single pipeline run
///
/// The context is built once before the run starts and is only ever borrowed
/// immutably by stages.
///
/// # Example
/// ```
/// use datapipe::pipeline::RunContext;
///
/// let context = RunContext::new("input.txt", "https://example.com", "out/report.zip", "");
/// assert!(context.jar_path().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RunContext {
    run_id: String,
    input_file: PathBuf,
    url: String,
    output_archive: PathBuf,
    jar_path: Option<PathBuf>,
    output_dir: PathBuf,
    network_timeout: Duration,
}

impl RunContext {
    /// Create a run context from the four positional inputs
    ///
    /// A blank `jar_path` means the archive inspection stage is skipped.
    pub fn new(
        input_file: impl Into<PathBuf>,
        url: impl Into<String>,
        output_archive: impl Into<PathBuf>,
        jar_path: &str,
    ) -> Self {
        let jar_path = if jar_path.trim().is_empty() {
            None
        } else {
            Some(PathBuf::from(jar_path))
        };

        Self {
            run_id: Uuid::new_v4().to_string(),
            input_file: input_file.into(),
            url: url.into(),
            output_archive: output_archive.into(),
            jar_path,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            network_timeout: NETWORK_TIMEOUT,
        }
    }

    /// Redirect the report and serialized records to another directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    /// Override the network timeout
    pub fn with_network_timeout(mut self, timeout: Duration) -> Self {
        self.network_timeout = timeout;
        self
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn input_file(&self) -> &Path {
        &self.input_file
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn output_archive(&self) -> &Path {
        &self.output_archive
    }

    pub fn jar_path(&self) -> Option<&Path> {
        self.jar_path.as_deref()
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn network_timeout(&self) -> Duration {
        self.network_timeout
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new(DEFAULT_INPUT_FILE, DEFAULT_URL, DEFAULT_OUTPUT_ARCHIVE, "")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let context = RunContext::default();
        assert_eq!(context.input_file(), Path::new("input.txt"));
        assert_eq!(context.url(), "https://example.com");
        assert_eq!(context.output_archive(), Path::new("out/report.zip"));
        assert_eq!(context.output_dir(), Path::new("out"));
        assert_eq!(context.network_timeout(), Duration::from_secs(20));
        assert!(context.jar_path().is_none());
    }

    #[test]
    fn test_blank_jar_path_is_none() {
        let context = RunContext::new("a.txt", "http://x", "o.zip", "   ");
        assert!(context.jar_path().is_none());
    }

    #[test]
    fn test_jar_path_set() {
        let context = RunContext::new("a.txt", "http://x", "o.zip", "lib/app.jar");
        assert_eq!(context.jar_path(), Some(Path::new("lib/app.jar")));
    }

    #[test]
    fn test_run_ids_are_unique() {
        let a = RunContext::default();
        let b = RunContext::default();
        assert_ne!(a.run_id(), b.run_id());
    }

    #[test]
    fn test_output_dir_override() {
        let context = RunContext::default().with_output_dir("/tmp/elsewhere");
        assert_eq!(context.output_dir(), Path::new("/tmp/elsewhere"));
    }
}
