//! File storage the pages are served from.
//!
//! Paths handed to a [`Storage`] are the absolute, webroot-prefixed paths
//! built by the connection (`/web/index.htm`).

use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufReader, Cursor};
use std::path::{Component, Path, PathBuf};

use crate::http::stream::{ByteStream, PeekReader};

/// An open file. Dropping it closes it.
pub trait StoredFile: ByteStream {
    /// Total size in bytes.
    fn size(&self) -> u64;
}

pub trait Storage {
    type File: StoredFile;

    fn exists(&self, path: &str) -> bool;

    fn open(&self, path: &str) -> io::Result<Self::File>;
}

/// Storage backed by a directory on the local filesystem.
#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a request path onto the root directory.
    ///
    /// Rejects parent-directory components and hidden (dot) segments.
    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = path.trim_start_matches('/');
        if relative.split('/').any(|s| s.starts_with('.')) {
            return None;
        }

        let mut result = self.root.clone();
        for component in Path::new(relative).components() {
            match component {
                Component::Normal(c) => result.push(c),
                Component::CurDir => {}
                _ => return None,
            }
        }
        Some(result)
    }
}

pub struct FsFile {
    reader: PeekReader<BufReader<File>>,
    size: u64,
}

impl ByteStream for FsFile {
    fn peek(&mut self) -> Option<u8> {
        self.reader.peek()
    }

    fn next_byte(&mut self) -> Option<u8> {
        self.reader.next_byte()
    }
}

impl StoredFile for FsFile {
    fn size(&self) -> u64 {
        self.size
    }
}

impl Storage for FsStorage {
    type File = FsFile;

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).is_some_and(|p| p.is_file())
    }

    fn open(&self, path: &str) -> io::Result<FsFile> {
        let resolved = self
            .resolve(path)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "path outside of root"))?;
        let file = File::open(resolved)?;
        let size = file.metadata()?.len();
        Ok(FsFile {
            reader: PeekReader::new(BufReader::new(file)),
            size,
        })
    }
}

/// Storage holding its files in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) {
        self.files.insert(path.into(), contents.into());
    }

    pub fn with_file(mut self, path: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.insert(path, contents);
        self
    }
}

pub struct MemoryFile {
    reader: PeekReader<Cursor<Vec<u8>>>,
    size: u64,
}

impl ByteStream for MemoryFile {
    fn peek(&mut self) -> Option<u8> {
        self.reader.peek()
    }

    fn next_byte(&mut self) -> Option<u8> {
        self.reader.next_byte()
    }
}

impl StoredFile for MemoryFile {
    fn size(&self) -> u64 {
        self.size
    }
}

impl Storage for MemoryStorage {
    type File = MemoryFile;

    fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    fn open(&self, path: &str) -> io::Result<MemoryFile> {
        let contents = self
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, path.to_string()))?;
        Ok(MemoryFile {
            size: contents.len() as u64,
            reader: PeekReader::new(Cursor::new(contents)),
        })
    }
}
