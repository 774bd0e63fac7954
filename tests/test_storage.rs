use std::io::ErrorKind;

use tinyhttpd::http::stream::ByteStream;
use tinyhttpd::storage::{FsStorage, MemoryStorage, Storage, StoredFile};

fn read_all(file: &mut impl StoredFile) -> Vec<u8> {
    let mut bytes = Vec::new();
    while let Some(b) = file.next_byte() {
        bytes.push(b);
    }
    bytes
}

fn site() -> (tempfile::TempDir, FsStorage) {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("web")).unwrap();
    std::fs::write(dir.path().join("web/index.htm"), "<h1>%name%</h1>").unwrap();
    std::fs::write(dir.path().join("web/.secret"), "hidden").unwrap();
    std::fs::write(dir.path().join("outside.txt"), "nope").unwrap();
    let storage = FsStorage::new(dir.path());
    (dir, storage)
}

#[test]
fn test_fs_exists() {
    let (dir, storage) = site();

    assert_eq!(storage.root(), dir.path());
    assert!(storage.exists("/web/index.htm"));
    assert!(!storage.exists("/web/missing.htm"));
    // directories are not pages
    assert!(!storage.exists("/web"));
}

#[test]
fn test_fs_rejects_traversal_and_hidden_files() {
    let (_dir, storage) = site();

    assert!(!storage.exists("/web/../outside.txt"));
    assert!(!storage.exists("/web/.secret"));
    assert!(storage.open("/web/../outside.txt").is_err());
}

#[test]
fn test_fs_open_reads_contents() {
    let (_dir, storage) = site();

    let mut file = storage.open("/web/index.htm").unwrap();
    assert_eq!(file.size(), 15);
    assert_eq!(file.peek(), Some(b'<'));
    assert_eq!(read_all(&mut file), b"<h1>%name%</h1>");
}

#[test]
fn test_memory_storage() {
    let storage = MemoryStorage::new().with_file("/web/a.txt", "abc");

    assert!(storage.exists("/web/a.txt"));
    assert!(!storage.exists("/web/b.txt"));

    let mut file = storage.open("/web/a.txt").unwrap();
    assert_eq!(file.size(), 3);
    assert_eq!(read_all(&mut file), b"abc");

    let err = storage.open("/web/b.txt").err().unwrap();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}
