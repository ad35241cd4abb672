use std::fmt;
use std::io::{self, Read, Write};

use super::codec::{self, invalid_data, BinaryRecord};

/// Leading tag of an encoded profile
pub const PROFILE_MAGIC: [u8; 4] = *b"UPRF";

/// Current profile layout version
pub const PROFILE_VERSION: u8 = 1;

/// User profile persisted with a tagged, versioned layout
///
/// Layout: magic, version, username, age (i32), tag count (u16), tags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub username: String,
    pub age: i32,
    pub tags: Vec<String>,
}

impl UserProfile {
    pub fn new(username: impl Into<String>, age: i32, tags: &[&str]) -> Self {
        Self {
            username: username.into(),
            age,
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }
}

impl BinaryRecord for UserProfile {
    fn encode<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let tag_count = u16::try_from(self.tags.len())
            .map_err(|_| invalid_data(format!("too many tags: {}", self.tags.len())))?;

        out.write_all(&PROFILE_MAGIC)?;
        codec::write_u8(out, PROFILE_VERSION)?;
        codec::write_str(out, &self.username)?;
        codec::write_i32(out, self.age)?;
        codec::write_u16(out, tag_count)?;
        for tag in &self.tags {
            codec::write_str(out, tag)?;
        }
        Ok(())
    }

    fn decode<R: Read>(input: &mut R) -> io::Result<Self> {
        let mut magic = [0u8; 4];
        input.read_exact(&mut magic)?;
        if magic != PROFILE_MAGIC {
            return Err(invalid_data("not a user profile record"));
        }

        let version = codec::read_u8(input)?;
        if version != PROFILE_VERSION {
            return Err(invalid_data(format!(
                "unsupported user profile version {}",
                version
            )));
        }

        let username = codec::read_str(input)?;
        let age = codec::read_i32(input)?;
        let tag_count = codec::read_u16(input)?;
        let tags = (0..tag_count)
            .map(|_| codec::read_str(input))
            .collect::<io::Result<Vec<_>>>()?;

        Ok(Self {
            username,
            age,
            tags,
        })
    }
}

impl fmt::Display for UserProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "UserProfile {{ username: '{}', age: {}, tags: [{}] }}",
            self.username,
            self.age,
            self.tags.join(", ")
        )
    }
}
