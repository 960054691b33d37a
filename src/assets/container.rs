//! In-memory resource pack archive

use std::collections::BTreeMap;
use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use sha2::{Digest, Sha256};
use walkdir::WalkDir;
use zip::read::ZipArchive;
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

use crate::error::Result;

/// Path → bytes view of a loaded package.
///
/// Paths always use `/` separators and never start with one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceContainer {
    files: BTreeMap<String, Vec<u8>>,
}

impl ResourceContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read every file of a zip archive into memory
    pub fn from_zip_bytes(bytes: &[u8]) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(bytes))?;
        let mut files = BTreeMap::new();

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            if entry.is_dir() {
                continue;
            }
            let name = normalize_path(entry.name());
            if name.is_empty() {
                continue;
            }
            let mut buffer = Vec::new();
            entry.read_to_end(&mut buffer)?;
            files.insert(name, buffer);
        }

        Ok(Self { files })
    }

    /// Read a pack laid out as a directory tree
    pub fn from_dir(root: &Path) -> Result<Self> {
        let mut files = BTreeMap::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            let name = normalize_path(&relative.to_string_lossy());
            files.insert(name, fs::read(entry.path())?);
        }

        Ok(Self { files })
    }

    pub fn read(&self, path: &str) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn insert(&mut self, path: &str, bytes: Vec<u8>) {
        self.files.insert(normalize_path(path), bytes);
    }

    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.files.remove(path)
    }

    /// All file paths, sorted
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.files.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Write all files into a new deflate-compressed zip archive
    pub fn to_zip_bytes(&self) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, bytes) in &self.files {
            writer.start_file(name.as_str(), options)?;
            writer.write_all(bytes)?;
        }

        Ok(writer.finish()?.into_inner())
    }

    /// SHA-256 over every path and its contents, in path order
    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        for (name, bytes) in &self.files {
            hasher.update(name.as_bytes());
            hasher.update([0u8]);
            hasher.update((bytes.len() as u64).to_le_bytes());
            hasher.update(bytes);
        }
        format!("{:x}", hasher.finalize())
    }
}

fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
        .trim_start_matches('/')
        .trim_end_matches('/')
        .to_string()
}
