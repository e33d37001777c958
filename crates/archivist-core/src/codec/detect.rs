//! Archive format detection.
//!
//! Magic bytes are checked first; the file extension is only consulted when
//! the content is not recognized (old-style tar without `ustar` magic,
//! truncated files).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use tracing::debug;

use super::ArchiveFormat;
use crate::ArchiveError;
use crate::Result;

const HEAD_LEN: u64 = 512;
const USTAR_OFFSET: usize = 257;
const USTAR_MAGIC: &[u8] = b"ustar";
const RAR_MAGIC: &[u8] = b"Rar!\x1a\x07";
const GZIP_MAGIC: &[u8] = &[0x1f, 0x8b];

/// Detects the format of the archive at `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, a gzip stream is corrupt,
/// or neither content nor extension identify a supported format.
///
/// # Examples
///
/// ```no_run
/// use archivist_core::codec::ArchiveFormat;
/// use archivist_core::codec::detect_format;
/// use std::path::Path;
///
/// let format = detect_format(Path::new("backup.tgz"))?;
/// assert_eq!(format, ArchiveFormat::TarGz);
/// # Ok::<(), archivist_core::ArchiveError>(())
/// ```
pub fn detect_format(path: &Path) -> Result<ArchiveFormat> {
    let head = read_head(File::open(path)?)?;

    let format = match detect_by_magic(&head) {
        Some(ArchiveFormat::Gzip) => detect_gzip_payload(path)?,
        Some(format) => format,
        None => detect_by_extension(path)?,
    };

    debug!(path = %path.display(), %format, "detected archive format");
    Ok(format)
}

/// Identifies a format from the first bytes of a file.
///
/// Gzip data is reported as [`ArchiveFormat::Gzip`]; telling a tar payload
/// apart needs decompression.
#[must_use]
pub fn detect_by_magic(head: &[u8]) -> Option<ArchiveFormat> {
    match head {
        [b'P', b'K', 0x03, 0x04, ..] | [b'P', b'K', 0x05, 0x06, ..] | [b'P', b'K', 0x07, 0x08, ..] => {
            Some(ArchiveFormat::Zip)
        }
        _ if head.starts_with(GZIP_MAGIC) => Some(ArchiveFormat::Gzip),
        _ if head.starts_with(RAR_MAGIC) => Some(ArchiveFormat::Rar),
        _ if is_tar_header(head) => Some(ArchiveFormat::Tar),
        _ => None,
    }
}

/// Identifies a format from the file name alone.
///
/// # Errors
///
/// Returns [`ArchiveError::UnsupportedFormat`] for unknown extensions.
pub fn detect_by_extension(path: &Path) -> Result<ArchiveFormat> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or(ArchiveError::UnsupportedFormat)?
        .to_ascii_lowercase();

    if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
        return Ok(ArchiveFormat::TarGz);
    }

    match Path::new(&name).extension().and_then(|e| e.to_str()) {
        Some("zip") => Ok(ArchiveFormat::Zip),
        Some("tar") => Ok(ArchiveFormat::Tar),
        Some("gz") => Ok(ArchiveFormat::Gzip),
        Some("rar") => Ok(ArchiveFormat::Rar),
        _ => Err(ArchiveError::UnsupportedFormat),
    }
}

/// Decompresses the first block of a gzip file to see whether it holds a
/// tar stream.
fn detect_gzip_payload(path: &Path) -> Result<ArchiveFormat> {
    let decoder = GzDecoder::new(File::open(path)?);
    let head = read_head(decoder)
        .map_err(|e| ArchiveError::InvalidArchive(format!("corrupt gzip stream: {e}")))?;

    // An empty tar stream is nothing but zeroed end-of-archive blocks.
    let empty_tar = head.len() == HEAD_LEN as usize && head.iter().all(|b| *b == 0);
    if is_tar_header(&head) || empty_tar {
        return Ok(ArchiveFormat::TarGz);
    }

    match detect_by_extension(path) {
        Ok(ArchiveFormat::TarGz) => Ok(ArchiveFormat::TarGz),
        _ => Ok(ArchiveFormat::Gzip),
    }
}

fn is_tar_header(head: &[u8]) -> bool {
    head.get(USTAR_OFFSET..USTAR_OFFSET + USTAR_MAGIC.len()) == Some(USTAR_MAGIC)
}

fn read_head<R: Read>(reader: R) -> std::io::Result<Vec<u8>> {
    let mut head = Vec::with_capacity(HEAD_LEN as usize);
    reader.take(HEAD_LEN).read_to_end(&mut head)?;
    Ok(head)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn gzip(data: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(data).unwrap();
        encoder.finish().unwrap()
    }

    fn tar_with(name: &str, data: &[u8]) -> Vec<u8> {
        let mut builder = ::tar::Builder::new(Vec::new());
        let mut header = ::tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder.append_data(&mut header, name, data).unwrap();
        builder.into_inner().unwrap()
    }

    #[test]
    fn test_magic_zip() {
        assert_eq!(
            detect_by_magic(&[0x50, 0x4B, 0x03, 0x04, 0, 0]),
            Some(ArchiveFormat::Zip)
        );
        assert_eq!(
            detect_by_magic(&[0x50, 0x4B, 0x05, 0x06]),
            Some(ArchiveFormat::Zip)
        );
    }

    #[test]
    fn test_magic_rar_and_gzip() {
        assert_eq!(
            detect_by_magic(b"Rar!\x1a\x07\x01\x00"),
            Some(ArchiveFormat::Rar)
        );
        assert_eq!(detect_by_magic(&[0x1f, 0x8b, 8]), Some(ArchiveFormat::Gzip));
    }

    #[test]
    fn test_magic_tar() {
        let data = tar_with("a.txt", b"hello");
        assert_eq!(detect_by_magic(&data), Some(ArchiveFormat::Tar));
    }

    #[test]
    fn test_magic_unknown() {
        assert_eq!(detect_by_magic(b"plain text"), None);
        assert_eq!(detect_by_magic(&[]), None);
    }

    #[test]
    fn test_extension_fallback() {
        let cases = [
            ("a.zip", ArchiveFormat::Zip),
            ("a.TAR", ArchiveFormat::Tar),
            ("a.tar.gz", ArchiveFormat::TarGz),
            ("a.tgz", ArchiveFormat::TarGz),
            ("a.gz", ArchiveFormat::Gzip),
            ("a.rar", ArchiveFormat::Rar),
        ];
        for (name, expected) in cases {
            assert_eq!(detect_by_extension(&PathBuf::from(name)).unwrap(), expected);
        }
        assert!(matches!(
            detect_by_extension(&PathBuf::from("a.7z")),
            Err(ArchiveError::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_gzip_payload_tar() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bundle.bin");
        std::fs::write(&path, gzip(&tar_with("x.txt", b"x"))).unwrap();

        assert_eq!(detect_format(&path).unwrap(), ArchiveFormat::TarGz);
    }

    #[test]
    fn test_gzip_payload_empty_tar() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.gz");
        let empty = ::tar::Builder::new(Vec::new()).into_inner().unwrap();
        std::fs::write(&path, gzip(&empty)).unwrap();

        assert_eq!(detect_format(&path).unwrap(), ArchiveFormat::TarGz);
    }

    #[test]
    fn test_gzip_payload_plain() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("notes.txt.gz");
        std::fs::write(&path, gzip(b"just some text")).unwrap();

        assert_eq!(detect_format(&path).unwrap(), ArchiveFormat::Gzip);
    }

    #[test]
    fn test_unrecognized_content_and_extension() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("data.bin");
        std::fs::write(&path, b"nothing to see").unwrap();

        assert!(matches!(
            detect_format(&path),
            Err(ArchiveError::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        assert!(matches!(
            detect_format(&temp.path().join("missing.zip")),
            Err(ArchiveError::Io(_))
        ));
    }
}
