//! Tests for source file discovery.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use catalog_ingest::{DEFAULT_EXTENSIONS, IngestError, newest_source_file};

fn extensions() -> Vec<String> {
    DEFAULT_EXTENSIONS.iter().map(|e| (*e).to_string()).collect()
}

fn touch(dir: &Path, name: &str, age_secs: u64) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, "Código,Precio\nA1,1\n").expect("write file");
    let modified = SystemTime::now() - Duration::from_secs(age_secs);
    File::options()
        .write(true)
        .open(&path)
        .and_then(|file| file.set_modified(modified))
        .expect("set mtime");
    path
}

#[test]
fn newest_source_file_ignores_non_sources() {
    let dir = tempfile::tempdir().unwrap();
    let source = touch(dir.path(), "a.csv", 300);
    touch(dir.path(), "productos.json", 0);
    touch(dir.path(), "~$b.xlsx", 0);
    touch(dir.path(), ".b.xlsx", 0);
    fs::create_dir(dir.path().join("nested.xlsx")).unwrap();

    let found = newest_source_file(dir.path(), &extensions(), None).unwrap();
    assert_eq!(found, Some(source));
}

#[test]
fn newest_source_file_by_mtime() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "old.csv", 300);
    let newest = touch(dir.path(), "new.csv", 10);
    touch(dir.path(), "middle.csv", 100);

    let found = newest_source_file(dir.path(), &extensions(), None).unwrap();
    assert_eq!(found, Some(newest));
}

#[test]
fn newest_source_file_skips_excluded_name() {
    let dir = tempfile::tempdir().unwrap();
    let older = touch(dir.path(), "precios_0101.csv", 300);
    touch(dir.path(), "precios_0105.csv", 10);

    let found =
        newest_source_file(dir.path(), &extensions(), Some("precios_0105.csv")).unwrap();
    assert_eq!(found, Some(older));
}

#[test]
fn newest_source_file_empty_when_only_excluded() {
    let dir = tempfile::tempdir().unwrap();
    touch(dir.path(), "precios.csv", 10);

    let found = newest_source_file(dir.path(), &extensions(), Some("precios.csv")).unwrap();
    assert!(found.is_none());
}

#[test]
fn missing_directory_is_an_error() {
    let result = newest_source_file(Path::new("/no/such/catalog/dir"), &extensions(), None);
    assert!(matches!(result, Err(IngestError::DirectoryNotFound { .. })));
}
