use std::fmt;
use std::io::{self, Read, Write};

use super::codec::{self, BinaryRecord};

/// Audit event that writes its own fields
///
/// Three length-prefixed UTF-8 strings in fixed order: event type, username,
/// creation timestamp. Missing values are stored as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuditRecord {
    pub event_type: String,
    pub username: String,
    pub created_at: String,
}

impl AuditRecord {
    pub fn new(
        event_type: impl Into<String>,
        username: impl Into<String>,
        created_at: impl Into<String>,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            username: username.into(),
            created_at: created_at.into(),
        }
    }

    /// Build a record from optional fields, defaulting each to empty
    pub fn from_optional(
        event_type: Option<&str>,
        username: Option<&str>,
        created_at: Option<&str>,
    ) -> Self {
        Self::new(
            event_type.unwrap_or_default(),
            username.unwrap_or_default(),
            created_at.unwrap_or_default(),
        )
    }
}

impl BinaryRecord for AuditRecord {
    fn encode<W: Write>(&self, out: &mut W) -> io::Result<()> {
        codec::write_str(out, &self.event_type)?;
        codec::write_str(out, &self.username)?;
        codec::write_str(out, &self.created_at)
    }

    fn decode<R: Read>(input: &mut R) -> io::Result<Self> {
        let event_type = codec::read_str(input)?;
        let username = codec::read_str(input)?;
        let created_at = codec::read_str(input)?;
        Ok(Self {
            event_type,
            username,
            created_at,
        })
    }
}

impl fmt::Display for AuditRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "AuditRecord {{ type: '{}', username: '{}', created_at: '{}' }}",
            self.event_type, self.username, self.created_at
        )
    }
}
