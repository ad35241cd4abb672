use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use zip::result::ZipResult;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

/// Create (or overwrite) a zip holding one deflated entry
///
/// The parent directory is created first. Returns the number of content bytes
/// written.
pub fn write_single_entry<P: AsRef<Path>>(
    zip_path: P,
    entry_name: &str,
    content: &str,
) -> ZipResult<usize> {
    let zip_path = zip_path.as_ref();
    let parent = match zip_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let file = File::create(zip_path)?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let options = SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644);

    let bytes = content.as_bytes();
    zip.start_file(entry_name, options)?;
    zip.write_all(bytes)?;

    let mut writer = zip.finish()?;
    writer.flush()?;

    Ok(bytes.len())
}

/// List every entry name in archive order without extracting anything
pub fn list_entries<P: AsRef<Path>>(zip_path: P) -> ZipResult<Vec<String>> {
    let file = File::open(zip_path.as_ref())?;
    let mut archive = ZipArchive::new(file)?;

    let mut entries = Vec::with_capacity(archive.len());
    for i in 0..archive.len() {
        let entry = archive.by_index_raw(i)?;
        entries.push(entry.name().to_string());
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_list_single_entry() {
        let temp_dir = TempDir::new().unwrap();
        let zip_path = temp_dir.path().join("nested").join("report.zip");

        let written = write_single_entry(&zip_path, "report.txt", "héllo\n").unwrap();
        assert_eq!(written, "héllo\n".len());

        let entries = list_entries(&zip_path).unwrap();
        assert_eq!(entries, vec!["report.txt"]);
    }

    #[test]
    fn test_entry_content_round_trips() {
        let temp_dir = TempDir::new().unwrap();
        let zip_path = temp_dir.path().join("report.zip");
        write_single_entry(&zip_path, "report.txt", "line one\nline two\n").unwrap();

        let mut archive = ZipArchive::new(File::open(&zip_path).unwrap()).unwrap();
        let mut entry = archive.by_name("report.txt").unwrap();
        assert_eq!(entry.compression(), CompressionMethod::Deflated);
        let mut content = String::new();
        entry.read_to_string(&mut content).unwrap();
        assert_eq!(content, "line one\nline two\n");
    }

    #[test]
    fn test_overwrite_replaces_entries() {
        let temp_dir = TempDir::new().unwrap();
        let zip_path = temp_dir.path().join("report.zip");
        write_single_entry(&zip_path, "old.txt", "old").unwrap();
        write_single_entry(&zip_path, "report.txt", "new").unwrap();

        assert_eq!(list_entries(&zip_path).unwrap(), vec!["report.txt"]);
    }

    #[test]
    fn test_list_preserves_order() {
        let temp_dir = TempDir::new().unwrap();
        let zip_path = temp_dir.path().join("multi.jar");
        let mut zip = ZipWriter::new(File::create(&zip_path).unwrap());
        for name in ["META-INF/MANIFEST.MF", "com/example/App.class", "app.properties"] {
            zip.start_file(name, SimpleFileOptions::default()).unwrap();
            zip.write_all(b"x").unwrap();
        }
        zip.finish().unwrap();

        assert_eq!(
            list_entries(&zip_path).unwrap(),
            vec!["META-INF/MANIFEST.MF", "com/example/App.class", "app.properties"]
        );
    }

    #[test]
    fn test_list_missing_archive_fails() {
        let temp_dir = TempDir::new().unwrap();
        assert!(list_entries(temp_dir.path().join("missing.zip")).is_err());
    }

    #[test]
    fn test_list_non_zip_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("plain.txt");
        fs::write(&path, "definitely not a zip").unwrap();
        assert!(list_entries(&path).is_err());
    }
}
