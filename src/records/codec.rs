use crate::error::{StageError, StageResult};
use std::fs::{self, File};
use std::io::{self, BufWriter, Cursor, Read, Write};
use std::path::Path;

/// A record with an explicit, field-ordered binary layout
pub trait BinaryRecord: Sized {
    fn encode<W: Write>(&self, out: &mut W) -> io::Result<()>;

    fn decode<R: Read>(input: &mut R) -> io::Result<Self>;

    /// Encode into a fresh buffer
    fn to_bytes(&self) -> io::Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.encode(&mut buf)?;
        Ok(buf)
    }

    /// Decode a whole buffer, rejecting trailing bytes
    fn from_bytes(bytes: &[u8]) -> io::Result<Self> {
        let mut cursor = Cursor::new(bytes);
        let record = Self::decode(&mut cursor)?;
        if cursor.position() as usize != bytes.len() {
            return Err(invalid_data(format!(
                "{} trailing bytes after record",
                bytes.len() - cursor.position() as usize
            )));
        }
        Ok(record)
    }
}

/// Write a record to `path`, replacing any existing file
pub fn save<T: BinaryRecord>(path: &Path, record: &T) -> StageResult<()> {
    let write = || -> io::Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        record.encode(&mut out)?;
        out.flush()
    };

    write().map_err(|e| StageError::Serialization {
        message: format!("Failed to save record: {}", path.display()),
        source: Some(e),
    })
}

/// Read a record back from `path`
pub fn load<T: BinaryRecord>(path: &Path) -> StageResult<T> {
    fs::read(path)
        .and_then(|bytes| T::from_bytes(&bytes))
        .map_err(|e| StageError::Serialization {
            message: format!("Failed to load record: {}", path.display()),
            source: Some(e),
        })
}

pub(crate) fn invalid_data(message: impl Into<String>) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message.into())
}

/// Write a UTF-8 string prefixed with its byte length as u16 big-endian
pub fn write_str<W: Write>(out: &mut W, value: &str) -> io::Result<()> {
    let len = u16::try_from(value.len()).map_err(|_| {
        invalid_data(format!(
            "string of {} bytes exceeds {} byte limit",
            value.len(),
            u16::MAX
        ))
    })?;
    write_u16(out, len)?;
    out.write_all(value.as_bytes())
}

pub fn read_str<R: Read>(input: &mut R) -> io::Result<String> {
    let len = read_u16(input)? as usize;
    let mut buf = vec![0u8; len];
    input.read_exact(&mut buf)?;
    String::from_utf8(buf).map_err(|e| invalid_data(e.to_string()))
}

pub fn write_u8<W: Write>(out: &mut W, value: u8) -> io::Result<()> {
    out.write_all(&[value])
}

pub fn read_u8<R: Read>(input: &mut R) -> io::Result<u8> {
    let mut buf = [0u8; 1];
    input.read_exact(&mut buf)?;
    Ok(buf[0])
}

pub fn write_u16<W: Write>(out: &mut W, value: u16) -> io::Result<()> {
    out.write_all(&value.to_be_bytes())
}

pub fn read_u16<R: Read>(input: &mut R) -> io::Result<u16> {
    let mut buf = [0u8; 2];
    input.read_exact(&mut buf)?;
    Ok(u16::from_be_bytes(buf))
}

pub fn write_i32<W: Write>(out: &mut W, value: i32) -> io::Result<()> {
    out.write_all(&value.to_be_bytes())
}

pub fn read_i32<R: Read>(input: &mut R) -> io::Result<i32> {
    let mut buf = [0u8; 4];
    input.read_exact(&mut buf)?;
    Ok(i32::from_be_bytes(buf))
}
