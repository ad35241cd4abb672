use crate::error::{StageError, StageErrorKind, StageResult};
use crate::logger::{LogLevel, LOGGER};
use crate::pipeline::{PipelineStage, Report, RunContext};
use crate::records::{self, AuditRecord, UserProfile};
use chrono::{SecondsFormat, Utc};
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the saved user profile inside the output directory
pub const PROFILE_FILE_NAME: &str = "userprofile.ser";

/// File name of the saved audit record inside the output directory
pub const AUDIT_FILE_NAME: &str = "audit.ext";

/// Stage that saves and reloads a user profile and an audit record
///
/// # Context Requirements
/// - `output_dir` - Receives `userprofile.ser` and `audit.ext`
///
/// # Report Output
/// - `Profile record saved+loaded: ...`
/// - `Audit record saved+loaded: ...`
pub struct SerializationStage;

impl SerializationStage {
    /// Create a new serialization stage
    pub fn new() -> Self {
        Self
    }
}

impl Default for SerializationStage {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineStage for SerializationStage {
    fn execute(&self, context: &RunContext, _report: &Report) -> StageResult<String> {
        let out_dir = context.output_dir();
        fs::create_dir_all(out_dir).map_err(|e| StageError::Serialization {
            message: format!("Failed to create output directory: {}", out_dir.display()),
            source: Some(e),
        })?;

        let profile = UserProfile::new("olena", 30, &["java", "sql", "oop"]);
        let audit = AuditRecord::new(
            "LOGIN",
            "olena",
            Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        );

        let loaded_profile = round_trip_profile(&out_dir.join(PROFILE_FILE_NAME), &profile)?;
        let loaded_audit = round_trip_audit(&out_dir.join(AUDIT_FILE_NAME), &audit)?;

        Ok(format!(
            "Profile record saved+loaded: {}\nAudit record saved+loaded: {}",
            loaded_profile, loaded_audit
        ))
    }

    fn name(&self) -> &str {
        "SERIALIZATION"
    }

    fn error_kind(&self) -> StageErrorKind {
        StageErrorKind::Serialization
    }
}

/// Save a profile, then load it back from the same file
pub fn round_trip_profile(path: &Path, profile: &UserProfile) -> StageResult<UserProfile> {
    save_profile(path, profile)?;
    load_profile(path)
}

/// Save an audit record, then load it back from the same file
pub fn round_trip_audit(path: &Path, audit: &AuditRecord) -> StageResult<AuditRecord> {
    save_audit(path, audit)?;
    load_audit(path)
}

pub fn save_profile(path: &Path, profile: &UserProfile) -> StageResult<()> {
    records::save(path, profile)?;
    log_saved("Profile record", path);
    Ok(())
}

pub fn load_profile(path: &Path) -> StageResult<UserProfile> {
    records::load(path)
}

pub fn save_audit(path: &Path, audit: &AuditRecord) -> StageResult<()> {
    records::save(path, audit)?;
    log_saved("Audit record", path);
    Ok(())
}

pub fn load_audit(path: &Path) -> StageResult<AuditRecord> {
    records::load(path)
}

fn log_saved(what: &str, path: &Path) {
    let shown: PathBuf = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    LOGGER.log(
        LogLevel::Info,
        &format!("{} saved: {}", what, shown.display()),
        "pipeline::serialization",
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_profile_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(PROFILE_FILE_NAME);
        let profile = UserProfile::new("olena", 30, &["java", "sql", "oop"]);

        let loaded = round_trip_profile(&path, &profile).unwrap();
        assert_eq!(loaded, profile);
    }

    #[test]
    fn test_audit_file_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join(AUDIT_FILE_NAME);
        let audit = AuditRecord::new("LOGIN", "olena", "2024-05-01T10:00:00.000Z");

        let loaded = round_trip_audit(&path, &audit).unwrap();
        assert_eq!(loaded, audit);
    }

    #[test]
    fn test_loading_wrong_shape_is_serialization_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("audit-as-profile.bin");
        save_audit(&path, &AuditRecord::new("LOGIN", "olena", "now")).unwrap();

        let err = load_profile(&path).unwrap_err();
        assert_eq!(err.kind(), StageErrorKind::Serialization);
        assert!(err.to_string().starts_with("Failed to load record: "));
    }

    #[test]
    fn test_loading_missing_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let err = load_audit(&temp_dir.path().join("nope.ext")).unwrap_err();
        assert_eq!(err.kind(), StageErrorKind::Serialization);
    }

    #[test]
    fn test_stage_writes_both_files() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("out");
        let context = RunContext::default().with_output_dir(&out_dir);

        let summary = SerializationStage::new()
            .execute(&context, &Report::new("run"))
            .unwrap();

        assert!(out_dir.join(PROFILE_FILE_NAME).exists());
        assert!(out_dir.join(AUDIT_FILE_NAME).exists());
        assert!(summary.contains("username: 'olena', age: 30, tags: [java, sql, oop]"));
        assert!(summary.contains("AuditRecord { type: 'LOGIN', username: 'olena'"));
    }

    #[test]
    fn test_stage_fails_when_output_dir_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("out");
        fs::write(&blocker, b"x").unwrap();
        let context = RunContext::default().with_output_dir(&blocker);

        let err = SerializationStage::new()
            .execute(&context, &Report::new("run"))
            .unwrap_err();
        assert_eq!(err.kind(), StageErrorKind::Serialization);
    }
}
