use clap::Parser;
use std::path::PathBuf;

use crate::pipeline::context::{DEFAULT_INPUT_FILE, DEFAULT_OUTPUT_ARCHIVE, DEFAULT_URL};
use crate::pipeline::RunContext;

/// Run the demonstration data pipeline and write a plain-text report
#[derive(Parser, Debug, Clone)]
#[command(name = "datapipe", version, about)]
pub struct Cli {
    /// Text file to read
    #[arg(default_value = DEFAULT_INPUT_FILE)]
    pub input_file: PathBuf,

    /// URL to fetch
    #[arg(default_value = DEFAULT_URL)]
    pub url: String,

    /// Zip archive to write the report into
    #[arg(default_value = DEFAULT_OUTPUT_ARCHIVE)]
    pub output_archive: PathBuf,

    /// JAR or zip to inspect; the inspection stage is skipped when empty
    #[arg(default_value = "")]
    pub jar_path: String,
}

impl Cli {
    pub fn into_context(self) -> RunContext {
        RunContext::new(self.input_file, self.url, self.output_archive, &self.jar_path)
    }
}
