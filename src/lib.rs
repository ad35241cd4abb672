//! Demonstration batch pipeline with per-stage failure isolation
//!
//! The pipeline reads a file, fetches a URL, round-trips rows through an
//! in-memory database, saves and reloads two binary records, zips the report
//! and optionally lists a JAR. Any stage may fail; the failure is logged and
//! recorded in the report and the next stage runs regardless.

pub mod archive;
pub mod cli;
pub mod error;
pub mod logger;
pub mod pipeline;
pub mod records;

pub use error::{StageError, StageErrorKind, StageResult};
pub use pipeline::{Pipeline, Report, RunContext};
