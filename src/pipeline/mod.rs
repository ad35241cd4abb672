//! Sequential pipeline with per-stage failure isolation
//!
//! Each stage performs one unit of work and returns either a summary or a
//! classified [`StageError`](crate::error::StageError). The executor records
//! either outcome in the [`Report`] and always moves on to the next stage, so
//! a run always completes and always produces a report.
//!
//! # Example
//! ```no_run
//! use datapipe::pipeline::{Pipeline, RunContext};
//!
//! let context = RunContext::new("input.txt", "https://example.com", "out/report.zip", "");
//! let report = Pipeline::standard().run_and_persist(&context);
//!
//! for section in report.sections() {
//!     println!("{}: {}", section.stage, section.outcome.is_success());
//! }
//! ```

pub mod context;
pub mod core;
pub mod executor;
pub mod report;
pub mod stages;
pub mod writer;

// Re-export main types
pub use context::RunContext;
pub use core::{PipelineStage, StageOutcome};
pub use executor::{Pipeline, PipelineBuilder};
pub use report::{Report, ReportSection};
