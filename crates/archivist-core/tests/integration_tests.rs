//! Integration tests for archivist-core.
//!
//! These tests run full compress, extract and list workflows against the
//! real filesystem.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use archivist_core::ArchiveError;
use archivist_core::ArchiveFormat;
use archivist_core::Archiver;
use archivist_core::ArchiverConfig;
use archivist_core::CompressionKind;
use archivist_core::CompressionStrategy;
use archivist_core::ListTotal;
use archivist_core::OutputWarning;
use archivist_core::TraversalPolicy;
use archivist_core::codec::ArchiveEntry;
use archivist_core::codec::ArchiveReader;
use archivist_core::codec::EntryVisitor;
use archivist_core::codec::detect_format;
use archivist_core::sanitize::normalize;
use std::collections::BTreeMap;
use std::fs;
use std::io::Cursor;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use tempfile::TempDir;
use walkdir::WalkDir;

/// Reads every file below `root` into a map keyed by `/`-separated
/// relative path.
fn snapshot(root: &Path) -> BTreeMap<String, Vec<u8>> {
    WalkDir::new(root)
        .into_iter()
        .map(Result::unwrap)
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| {
            let relative = entry.path().strip_prefix(root).unwrap();
            let key = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            (key, fs::read(entry.path()).unwrap())
        })
        .collect()
}

fn build_tree(root: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

fn zip_with_entries(path: &Path, entries: &[(&str, &str)]) {
    let mut zip = zip::ZipWriter::new(fs::File::create(path).unwrap());
    let options = zip::write::SimpleFileOptions::default();
    for (name, data) in entries {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data.as_bytes()).unwrap();
    }
    zip.finish().unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Progress { current: usize, total: usize, file: PathBuf },
    Complete,
}

fn recording_archiver(config: ArchiverConfig) -> (Archiver, Arc<Mutex<Vec<Event>>>) {
    let log = Arc::new(Mutex::new(Vec::new()));
    let mut archiver = Archiver::with_config(config);

    let sink = Arc::clone(&log);
    archiver.on_progress(move |event| {
        sink.lock().unwrap().push(Event::Progress {
            current: event.current,
            total: event.total,
            file: event.file_name.clone(),
        });
    });
    let sink = Arc::clone(&log);
    archiver.on_complete(move |_| sink.lock().unwrap().push(Event::Complete));

    (archiver, log)
}

#[test]
fn test_zip_round_trip_reproduces_tree() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("root");
    build_tree(
        &source,
        &[
            ("x.txt", "top level"),
            ("sub/y.txt", "nested"),
            ("sub/deeper/z.bin", "\u{0}\u{1}\u{2}"),
        ],
    );
    let archive = temp.path().join("tree.zip");
    let restore = temp.path().join("restore");

    let mut archiver = Archiver::new();
    let created = archiver
        .compress(&archive, &source, CompressionKind::Zip)
        .unwrap();
    let extracted = archiver.uncompress(&archive, &restore).unwrap();

    assert_eq!(created.strategy, CompressionStrategy::Container);
    assert_eq!(created.files_added, 3);
    assert_eq!(extracted.files_extracted, 3);
    assert_eq!(snapshot(&source), snapshot(&restore));
}

#[test]
fn test_stream_round_trip_lists_base_names_in_order() {
    let temp = TempDir::new().unwrap();
    build_tree(temp.path(), &[("tmp/a.bin", "aaa"), ("tmp/b.bin", "bbbb")]);
    let files = vec![temp.path().join("tmp/a.bin"), temp.path().join("tmp/b.bin")];
    let archive = temp.path().join("files.tgz");

    let mut archiver = Archiver::new();
    archiver.compress_files(&archive, &files).unwrap();

    assert_eq!(archiver.list_files(&archive).unwrap(), vec!["a.bin", "b.bin"]);
}

#[test]
fn test_stream_compress_flattens_directories() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("src");
    build_tree(
        &source,
        &[
            ("z.txt", "z"),
            ("a.txt", "a"),
            ("m/inner.txt", "i"),
            ("b/one.txt", "1"),
        ],
    );
    let archive = temp.path().join("flat.gz");
    let restore = temp.path().join("restore");

    let mut archiver = Archiver::new();
    let report = archiver
        .compress(&archive, &source, CompressionKind::GZip)
        .unwrap();
    let names = archiver.list_files(&archive).unwrap();
    archiver.uncompress(&archive, &restore).unwrap();

    assert_eq!(report.strategy, CompressionStrategy::Stream);
    assert_eq!(names, vec!["one.txt", "inner.txt", "a.txt", "z.txt"]);
    assert_eq!(fs::read_to_string(restore.join("inner.txt")).unwrap(), "i");
    assert!(!restore.join("m").exists());
}

#[test]
fn test_every_non_zip_kind_uses_stream() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("one.txt");
    fs::write(&source, "1").unwrap();

    for kind in [
        CompressionKind::Unknown,
        CompressionKind::Rar,
        CompressionKind::GZip,
        CompressionKind::Tar,
    ] {
        let archive = temp.path().join(format!("out-{kind}"));
        let report = Archiver::new().compress(&archive, &source, kind).unwrap();
        assert_eq!(report.strategy, CompressionStrategy::Stream, "{kind}");
        assert_eq!(detect_format(&archive).unwrap(), ArchiveFormat::TarGz);
    }
}

#[test]
fn test_missing_source_creates_empty_archive() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("missing");

    for (kind, name) in [(CompressionKind::Zip, "e.zip"), (CompressionKind::Tar, "e.tgz")] {
        let archive = temp.path().join(name);
        let mut archiver = Archiver::new();
        archiver.compress(&archive, &missing, kind).unwrap();
        assert!(archiver.list_files(&archive).unwrap().is_empty(), "{kind}");
    }
}

#[test]
fn test_uncompress_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("root");
    build_tree(&source, &[("a.txt", "alpha"), ("d/b.txt", "beta")]);
    let archive = temp.path().join("a.zip");
    let restore = temp.path().join("restore");

    let mut archiver = Archiver::new();
    archiver
        .compress(&archive, &source, CompressionKind::Zip)
        .unwrap();
    archiver.uncompress(&archive, &restore).unwrap();
    let first = snapshot(&restore);

    fs::write(restore.join("a.txt"), "tampered with a much longer body").unwrap();
    archiver.uncompress(&archive, &restore).unwrap();

    assert_eq!(first, snapshot(&restore));
}

#[test]
fn test_progress_is_monotonic_then_completes_once() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("root");
    build_tree(
        &source,
        &[("1.txt", "1"), ("2.txt", "2"), ("3/3.txt", "3"), ("4.txt", "4")],
    );
    let archive = temp.path().join("p.zip");
    let restore = temp.path().join("restore");

    let (mut archiver, log) = recording_archiver(ArchiverConfig::default());
    archiver
        .compress(&archive, &source, CompressionKind::Zip)
        .unwrap();
    assert!(log.lock().unwrap().is_empty());

    archiver.uncompress(&archive, &restore).unwrap();

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 5);
    assert_eq!(log.last(), Some(&Event::Complete));
    for (index, event) in log[..4].iter().enumerate() {
        match event {
            Event::Progress {
                current,
                total,
                file,
            } => {
                assert_eq!(*current, index + 1);
                assert_eq!(total, current);
                assert!(file.starts_with(&restore));
                assert!(file.exists());
            }
            Event::Complete => panic!("completion before the last entry"),
        }
    }
}

#[test]
fn test_list_emits_progress_without_completion() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("l.zip");
    zip_with_entries(&archive, &[("a/b/c.txt", "c"), ("d.txt", "d")]);

    let (mut archiver, log) = recording_archiver(ArchiverConfig::default());
    let names = archiver.list_files(&archive).unwrap();

    let nested = PathBuf::from("a").join("b").join("c.txt");
    assert_eq!(names, vec![nested.to_string_lossy().into_owned(), "d.txt".into()]);
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            Event::Progress {
                current: 1,
                total: 2,
                file: nested,
            },
            Event::Progress {
                current: 2,
                total: 2,
                file: PathBuf::from("d.txt"),
            },
        ]
    );
    assert!(!temp.path().join("a").exists());
}

#[test]
fn test_list_legacy_total() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("l.zip");
    zip_with_entries(&archive, &[("a", "a"), ("b", "b"), ("c", "c")]);

    let config = ArchiverConfig::default().with_list_total(ListTotal::Legacy);
    let (mut archiver, log) = recording_archiver(config);
    archiver.list_files(&archive).unwrap();

    let totals: Vec<usize> = log
        .lock()
        .unwrap()
        .iter()
        .filter_map(|event| match event {
            Event::Progress { total, .. } => Some(*total),
            Event::Complete => None,
        })
        .collect();
    assert_eq!(totals, vec![3, 4, 5]);
}

#[test]
fn test_nested_key_lands_under_target() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("n.zip");
    zip_with_entries(&archive, &[("a/b/c.txt", "deep")]);
    let target = temp.path().join("target");

    archivist_core::uncompress(&archive, &target).unwrap();

    let expected = target.join("a").join("b").join("c.txt");
    assert_eq!(fs::read(expected).unwrap(), b"deep");
}

#[test]
fn test_traversal_rejected_by_default() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("evil.zip");
    zip_with_entries(&archive, &[("../evil", "x")]);
    let target = temp.path().join("target");

    let (mut archiver, log) = recording_archiver(ArchiverConfig::default());
    let err = archiver.uncompress(&archive, &target).unwrap_err();

    assert!(err.is_security_violation());
    assert!(!temp.path().join("evil").exists());
    assert!(log.lock().unwrap().is_empty());
}

#[test]
fn test_traversal_clamped() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("evil.zip");
    zip_with_entries(&archive, &[("../evil", "x"), ("keep/../../kept.txt", "y")]);
    let target = temp.path().join("target");

    let config = ArchiverConfig::default().with_traversal_policy(TraversalPolicy::Clamp);
    let report = Archiver::with_config(config)
        .uncompress(&archive, &target)
        .unwrap();

    assert_eq!(report.files_extracted, 2);
    assert_eq!(fs::read(target.join("evil")).unwrap(), b"x");
    assert_eq!(fs::read(target.join("kept.txt")).unwrap(), b"y");
    assert!(!temp.path().join("evil").exists());
}

#[test]
fn test_listing_shows_escaping_entries() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("evil.zip");
    zip_with_entries(&archive, &[("fine.txt", "f"), ("../evil", "x")]);

    let names = archivist_core::list_files(&archive).unwrap();

    assert_eq!(names, vec!["fine.txt".to_string(), normalize("../evil")]);
    assert!(!temp.path().join("evil").exists());
}

#[test]
fn test_blocked_directory_warning_reaches_subscriber() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("blocked.zip");
    zip_with_entries(&archive, &[("blocked/inner.txt", "x"), ("z_ok.txt", "z")]);
    let target = temp.path().join("target");
    fs::create_dir_all(&target).unwrap();
    fs::write(target.join("blocked"), "a file, not a directory").unwrap();

    let warnings = Arc::new(Mutex::new(Vec::new()));
    let (mut archiver, log) = recording_archiver(ArchiverConfig::default());
    let sink = Arc::clone(&warnings);
    archiver.on_warning(move |warning| sink.lock().unwrap().push(warning.clone()));

    let err = archiver.uncompress(&archive, &target).unwrap_err();

    assert!(matches!(err, ArchiveError::Io(_)));
    assert!(!target.join("z_ok.txt").exists());
    assert!(log.lock().unwrap().is_empty());
    let warnings = warnings.lock().unwrap();
    assert!(matches!(
        warnings.first(),
        Some(OutputWarning::DirectoryCreation { path, .. }) if *path == target.join("blocked")
    ));
}

#[test]
fn test_zip_target_inside_source() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("src");
    build_tree(&source, &[("a.txt", "a")]);
    let archive = source.join("zz.zip");

    archivist_core::compress(&archive, &source).unwrap();
    assert_eq!(archivist_core::list_files(&archive).unwrap(), vec!["a.txt"]);

    archivist_core::compress(&archive, &source).unwrap();
    assert_eq!(archivist_core::list_files(&archive).unwrap(), vec!["a.txt"]);
}

#[test]
fn test_tar_directory_entries_are_skipped() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("d.tar");
    let mut builder = tar::Builder::new(Vec::new());
    let mut dir = tar::Header::new_ustar();
    dir.set_entry_type(tar::EntryType::Directory);
    dir.set_size(0);
    dir.set_mode(0o755);
    dir.set_cksum();
    builder
        .append_data(&mut dir, "docs/", std::io::empty())
        .unwrap();
    let mut file = tar::Header::new_ustar();
    file.set_entry_type(tar::EntryType::Regular);
    file.set_size(5);
    file.set_mode(0o644);
    file.set_cksum();
    builder
        .append_data(&mut file, "docs/readme", b"hello".as_slice())
        .unwrap();
    fs::write(&archive, builder.into_inner().unwrap()).unwrap();
    let target = temp.path().join("target");

    let (mut archiver, log) = recording_archiver(ArchiverConfig::default());
    let report = archiver.uncompress(&archive, &target).unwrap();

    assert_eq!(report.files_extracted, 1);
    assert_eq!(report.directories_skipped, 1);
    assert_eq!(fs::read(target.join("docs").join("readme")).unwrap(), b"hello");
    assert_eq!(log.lock().unwrap().len(), 2);
}

#[test]
fn test_bare_gzip_extracts_single_file() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("notes.txt.gz");
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(b"plain notes").unwrap();
    fs::write(&archive, encoder.finish().unwrap()).unwrap();
    let target = temp.path().join("target");

    let mut archiver = Archiver::new();
    assert_eq!(archiver.list_files(&archive).unwrap(), vec!["notes.txt"]);
    archiver.uncompress(&archive, &target).unwrap();

    assert_eq!(fs::read(target.join("notes.txt")).unwrap(), b"plain notes");
}

struct SingleEntryRar;

impl ArchiveReader for SingleEntryRar {
    fn format(&self) -> ArchiveFormat {
        ArchiveFormat::Rar
    }

    fn file_count(&mut self) -> archivist_core::Result<usize> {
        Ok(1)
    }

    fn for_each_entry(&mut self, visit: &mut EntryVisitor<'_>) -> archivist_core::Result<()> {
        let mut data = Cursor::new(b"unrar'd".to_vec());
        let mut entry = ArchiveEntry::new("docs/manual.txt".into(), false, &mut data);
        visit(&mut entry)
    }
}

#[test]
fn test_rar_requires_registered_reader() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("legacy.rar");
    fs::write(&archive, b"Rar!\x1a\x07\x00payload").unwrap();
    let target = temp.path().join("target");

    let mut archiver = Archiver::new();
    assert!(matches!(
        archiver.list_files(&archive),
        Err(ArchiveError::ReaderUnavailable {
            format: ArchiveFormat::Rar
        })
    ));

    archiver.register_reader(ArchiveFormat::Rar, |_| Ok(Box::new(SingleEntryRar)));
    archiver.uncompress(&archive, &target).unwrap();

    assert_eq!(
        fs::read(target.join("docs").join("manual.txt")).unwrap(),
        b"unrar'd"
    );
}

#[test]
fn test_corrupt_zip_is_invalid_archive() {
    let temp = TempDir::new().unwrap();
    let archive = temp.path().join("broken.zip");
    fs::write(&archive, b"PK\x03\x04 this is not really a zip").unwrap();

    let result = Archiver::new().uncompress(&archive, temp.path().join("out"));
    assert!(matches!(
        result,
        Err(ArchiveError::InvalidArchive(_) | ArchiveError::Io(_))
    ));
}
