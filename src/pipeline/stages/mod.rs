//! Stage adapters for the data pipeline
//!
//! The standard pipeline runs them in this order:
//! 1. FileStage - Read the input file as lines
//! 2. NetworkStage - GET the configured URL
//! 3. DatabaseStage - Round-trip demo events through an in-memory database
//! 4. SerializationStage - Save and reload two binary records
//! 5. ArchiveWriteStage - Zip the report accumulated so far
//! 6. ArchiveReadStage - List the entries of a JAR (optional)

pub mod archive;
pub mod database;
pub mod file;
pub mod network;
pub mod serialization;

// Re-export stages
pub use archive::{ArchiveReadStage, ArchiveWriteStage};
pub use database::DatabaseStage;
pub use file::FileStage;
pub use network::NetworkStage;
pub use serialization::SerializationStage;
