use clap::Parser;
use datapipe::cli::Cli;
use datapipe::logger::{LogLevel, LOGGER};
use datapipe::pipeline::Pipeline;
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let context = Cli::parse().into_context();

    LOGGER.log(LogLevel::Info, "=== datapipe started ===", "main");
    LOGGER.log(
        LogLevel::Info,
        &format!("Input file: {}", context.input_file().display()),
        "main",
    );
    LOGGER.log(LogLevel::Info, &format!("URL: {}", context.url()), "main");
    LOGGER.log(
        LogLevel::Info,
        &format!("Output ZIP: {}", context.output_archive().display()),
        "main",
    );
    if let Some(jar_path) = context.jar_path() {
        LOGGER.log(
            LogLevel::Info,
            &format!("JAR to inspect: {}", jar_path.display()),
            "main",
        );
    }

    let report = Pipeline::standard().run_and_persist(&context);

    let problems = LOGGER
        .get_logs()
        .iter()
        .filter(|entry| entry.level >= LogLevel::Warn)
        .count();

    LOGGER.log(
        LogLevel::Info,
        &format!(
            "=== datapipe finished: {} section(s), {} failed, {} warning/error log entries ===",
            report.sections().len(),
            report.failure_count(),
            problems
        ),
        "main",
    );
}
